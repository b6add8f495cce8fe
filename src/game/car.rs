//! Car handling: steering, throttle, brake/reverse, coast, drift and boost

use super::body::CarBody;
use super::field::{CAR_RADIUS, FIELD};
use super::input::ControlInput;
use super::kickoff::MatchPhase;

/// Throttle acceleration (units/s^2)
pub const ACCEL: f32 = 1700.0;
pub const MAX_SPEED: f32 = 400.0;
/// Extra acceleration while boosting
pub const BOOST_ACCEL: f32 = 2600.0;
pub const BOOST_MAX_SPEED: f32 = 780.0;
/// Boost units burned per second
pub const BOOST_DRAIN: f32 = 40.0;
pub const BRAKE_ACCEL: f32 = 3200.0;
pub const REVERSE_ACCEL: f32 = 1200.0;
pub const REVERSE_MAX_SPEED: f32 = 230.0;
/// Yaw rate at full steer (rad/s)
pub const TURN_RATE: f32 = 6.5;
/// Yaw rate smoothing rate
pub const ANGULAR_DRAG: f32 = 9.0;
/// Exponential decay rate while coasting
pub const COAST_DECAY: f32 = 2.0;
/// Exponential decay of sideways slip when not drifting
pub const ALIGN_DECAY: f32 = 30.0;

/// Forward speed at which steering reaches full authority
const STEER_REFERENCE_SPEED: f32 = 220.0;
const MIN_TURN_FACTOR: f32 = 0.15;
/// Above this forward speed the brake pedal brakes; below it, it reverses
const BRAKE_TO_REVERSE_SPEED: f32 = 50.0;
/// Boost only engages unless rolling backwards faster than this
const BOOST_MIN_FORWARD_SPEED: f32 = -5.0;
/// Coasting cars under this speed stop dead
const COAST_DEAD_ZONE: f32 = 6.0;

/// Integrates one car for one fixed step
pub struct CarController;

impl CarController {
    pub fn step(car: &mut CarBody, input: &ControlInput, phase: MatchPhase, dt: f32) {
        car.boosting = false;
        if !phase.is_live() {
            return;
        }

        // Steering authority grows with forward speed
        let (sin, cos) = car.heading.sin_cos();
        let forward_speed = car.vx * cos + car.vy * sin;
        let steer_scale = (forward_speed.abs() / STEER_REFERENCE_SPEED).clamp(0.0, 1.0);
        let turn_factor = MIN_TURN_FACTOR + (1.0 - MIN_TURN_FACTOR) * steer_scale;

        let target_yaw_rate = input.steer * TURN_RATE * turn_factor;
        let blend = 1.0 - (-ANGULAR_DRAG * dt).exp();
        car.yaw_rate += (target_yaw_rate - car.yaw_rate) * blend;
        car.heading += car.yaw_rate * dt;

        // Velocity in the new local frame
        let (fy, fx) = car.heading.sin_cos();
        let (sx, sy) = (-fy, fx);
        let mut v_fwd = car.vx * fx + car.vy * fy;
        let mut v_side = car.vx * sx + car.vy * sy;

        if input.accel {
            v_fwd += ACCEL * input.accel_amt * dt;

            if input.boost && car.boost > 0.0 && v_fwd >= BOOST_MIN_FORWARD_SPEED {
                car.boosting = true;
                v_fwd += BOOST_ACCEL * dt;
                car.boost = (car.boost - BOOST_DRAIN * dt).max(0.0);
            }
        } else if input.brake {
            if v_fwd > BRAKE_TO_REVERSE_SPEED {
                v_fwd = (v_fwd - BRAKE_ACCEL * input.brake_amt * dt).max(0.0);
            } else {
                v_fwd -= REVERSE_ACCEL * input.brake_amt * dt;
            }
        } else {
            let k = (-COAST_DECAY * dt).exp();
            v_fwd *= k;
            v_side *= k;
            if v_fwd.hypot(v_side) < COAST_DEAD_ZONE {
                v_fwd = 0.0;
                v_side = 0.0;
            }
        }

        if !input.drift {
            v_side *= (-ALIGN_DECAY * dt).exp();
        }

        let forward_cap = if car.boosting && input.accel {
            BOOST_MAX_SPEED
        } else {
            MAX_SPEED
        };
        v_fwd = if v_fwd >= 0.0 {
            v_fwd.min(forward_cap)
        } else {
            v_fwd.max(-REVERSE_MAX_SPEED)
        };

        car.vx = fx * v_fwd + sx * v_side;
        car.vy = fy * v_fwd + sy * v_side;

        // Walls clip position only; velocity is left alone
        let (x, y) = FIELD.clamp_inside(car.x + car.vx * dt, car.y + car.vy * dt, CAR_RADIUS);
        car.x = x;
        car.y = y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::body::Side;
    use crate::util::time::fixed_step;

    fn live_step(car: &mut CarBody, input: &ControlInput) {
        CarController::step(car, input, MatchPhase::Live, fixed_step());
    }

    fn throttle() -> ControlInput {
        ControlInput {
            accel: true,
            accel_amt: 1.0,
            ..ControlInput::default()
        }
    }

    #[test]
    fn kickoff_freezes_car_but_clears_boosting() {
        let mut car = CarBody::spawn(Side::Blue);
        car.boosting = true;
        let before = car;
        CarController::step(&mut car, &throttle(), MatchPhase::Kickoff, fixed_step());
        assert!(!car.boosting);
        assert_eq!(car.x, before.x);
        assert_eq!(car.vx, 0.0);
    }

    #[test]
    fn throttle_accelerates_along_heading() {
        let mut car = CarBody::spawn(Side::Blue);
        live_step(&mut car, &throttle());
        assert!((car.vx - ACCEL * fixed_step()).abs() < 1e-3);
        assert!(car.vy.abs() < 1e-6);
        assert!(car.x > CarBody::spawn(Side::Blue).x);
    }

    #[test]
    fn speed_caps_without_boost() {
        let mut car = CarBody::spawn(Side::Blue);
        for _ in 0..240 {
            live_step(&mut car, &throttle());
        }
        assert!(car.speed() <= MAX_SPEED + 1e-3);
        assert_eq!(car.boost, 100.0);
    }

    #[test]
    fn boost_drains_and_raises_cap() {
        let mut car = CarBody::spawn(Side::Blue);
        let input = ControlInput {
            boost: true,
            ..throttle()
        };
        for _ in 0..60 {
            live_step(&mut car, &input);
        }
        assert!(car.boosting);
        assert!(car.speed() > MAX_SPEED);
        assert!(car.speed() <= BOOST_MAX_SPEED + 1e-3);
        assert!((car.boost - (100.0 - BOOST_DRAIN * 0.5)).abs() < 0.05);
    }

    #[test]
    fn boost_never_goes_negative() {
        let mut car = CarBody::spawn(Side::Blue);
        car.boost = 0.1;
        let input = ControlInput {
            boost: true,
            ..throttle()
        };
        for _ in 0..10 {
            live_step(&mut car, &input);
            assert!(car.boost >= 0.0);
        }
        assert_eq!(car.boost, 0.0);
        assert!(!car.boosting);
    }

    #[test]
    fn brake_stops_then_reverses() {
        let mut car = CarBody::spawn(Side::Blue);
        car.vx = 300.0;
        let brake = ControlInput {
            brake: true,
            brake_amt: 1.0,
            ..ControlInput::default()
        };
        live_step(&mut car, &brake);
        assert!(car.vx < 300.0 && car.vx > 0.0);

        for _ in 0..240 {
            live_step(&mut car, &brake);
        }
        assert!(car.vx < 0.0);
        assert!(car.vx >= -REVERSE_MAX_SPEED - 1e-3);
    }

    #[test]
    fn coasting_car_comes_to_exact_rest() {
        let mut car = CarBody::spawn(Side::Blue);
        car.vx = 50.0;
        for _ in 0..240 {
            live_step(&mut car, &ControlInput::neutral());
        }
        assert_eq!(car.vx, 0.0);
        assert_eq!(car.vy, 0.0);
    }

    #[test]
    fn steering_turns_faster_at_speed() {
        let steer = ControlInput {
            steer: 1.0,
            ..ControlInput::default()
        };

        let mut slow = CarBody::spawn(Side::Blue);
        live_step(&mut slow, &steer);

        let mut fast = CarBody::spawn(Side::Blue);
        fast.vx = 300.0;
        live_step(&mut fast, &steer);

        assert!(slow.heading > 0.0);
        assert!(fast.heading > slow.heading * 5.0);
    }

    #[test]
    fn side_slip_is_killed_unless_drifting() {
        let mut gripping = CarBody::spawn(Side::Blue);
        gripping.vx = 200.0;
        gripping.vy = 100.0;
        live_step(&mut gripping, &throttle());

        let mut drifting = gripping;
        drifting.vx = 200.0;
        drifting.vy = 100.0;
        drifting.heading = 0.0;
        drifting.yaw_rate = 0.0;
        let drift = ControlInput {
            drift: true,
            ..throttle()
        };
        live_step(&mut drifting, &drift);

        assert!(gripping.vy.abs() < drifting.vy.abs());
        assert!((drifting.vy - 100.0).abs() < 1e-3);
    }

    #[test]
    fn walls_clip_position_but_keep_velocity() {
        let mut car = CarBody::spawn(Side::Blue);
        car.x = FIELD.l + CAR_RADIUS;
        car.heading = std::f32::consts::PI;
        car.vx = -200.0;
        live_step(&mut car, &throttle());
        assert_eq!(car.x, FIELD.l + CAR_RADIUS);
        assert!(car.vx < -200.0);
    }
}
