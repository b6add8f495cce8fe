//! Car-ball and car-car contact resolution

use super::body::{BallBody, CarBody};
use super::field::{BALL_RADIUS, CAR_RADIUS, FIELD};
use super::kickoff::MatchPhase;

/// Car hitbox used against the ball: an oriented rectangle with rounded skin
pub const CAR_LENGTH: f32 = 38.0;
pub const CAR_WIDTH: f32 = 22.0;
pub const CAR_BODY_RADIUS: f32 = 14.0;

pub const BALL_RESTITUTION: f32 = 0.92;
pub const BALL_IMPULSE_SCALE: f32 = 0.78;
/// Share of the ball impulse fed back into the car
pub const CAR_REACTION: f32 = 0.18;
pub const CAR_CAR_RESTITUTION: f32 = 0.35;

const DEGENERATE_DISTANCE: f32 = 1e-6;

/// Resolves overlaps into positional correction plus a velocity impulse
pub struct CollisionResolver;

impl CollisionResolver {
    /// Returns true if the ball was touched
    pub fn car_ball(car: &mut CarBody, ball: &mut BallBody, phase: MatchPhase) -> bool {
        if !phase.is_live() {
            return false;
        }

        let half_len = CAR_LENGTH / 2.0;
        let half_width = CAR_WIDTH / 2.0;
        let (sin, cos) = car.heading.sin_cos();

        // Ball center in car space
        let rx = ball.x - car.x;
        let ry = ball.y - car.y;
        let lx = cos * rx + sin * ry;
        let ly = -sin * rx + cos * ry;

        let cx = lx.clamp(-half_len, half_len);
        let cy = ly.clamp(-half_width, half_width);

        let mut dx = lx - cx;
        let mut dy = ly - cy;
        let mut dist = dx.hypot(dy);

        if dist < DEGENERATE_DISTANCE {
            // Center inside the rectangle: leave through the nearer face
            let margin_x = half_len - lx.abs();
            let margin_y = half_width - ly.abs();
            if margin_x < margin_y {
                dx = if lx >= 0.0 { 1.0 } else { -1.0 };
                dy = 0.0;
            } else {
                dx = 0.0;
                dy = if ly >= 0.0 { 1.0 } else { -1.0 };
            }
            dist = 1.0;
        }

        let min_dist = CAR_BODY_RADIUS + BALL_RADIUS;
        if dist >= min_dist {
            return false;
        }

        let nxl = dx / dist;
        let nyl = dy / dist;
        let nx = cos * nxl - sin * nyl;
        let ny = sin * nxl + cos * nyl;

        let overlap = min_dist - dist;
        ball.x += nx * overlap;
        ball.y += ny * overlap;

        let rel_normal = (ball.vx - car.vx) * nx + (ball.vy - car.vy) * ny;
        if rel_normal > 0.0 {
            return true;
        }

        let j = -(1.0 + BALL_RESTITUTION) * rel_normal * BALL_IMPULSE_SCALE;
        ball.vx += nx * j;
        ball.vy += ny * j;
        car.vx -= nx * j * CAR_REACTION;
        car.vy -= ny * j * CAR_REACTION;
        true
    }

    /// Equal-mass circle contact. Returns true if the cars overlapped.
    pub fn car_car(a: &mut CarBody, b: &mut CarBody, phase: MatchPhase) -> bool {
        if !phase.is_live() {
            return false;
        }

        let dx = b.x - a.x;
        let dy = b.y - a.y;
        let d = dx.hypot(dy);
        let min_dist = CAR_RADIUS * 2.0;
        if d >= min_dist {
            return false;
        }

        // Stacked exactly: separate along +x (a to the left)
        let (nx, ny) = if d < DEGENERATE_DISTANCE {
            (1.0, 0.0)
        } else {
            (dx / d, dy / d)
        };

        let half = (min_dist - d) * 0.5;
        let (ax, ay) = FIELD.clamp_inside(a.x - nx * half, a.y - ny * half, CAR_RADIUS);
        let (bx, by) = FIELD.clamp_inside(b.x + nx * half, b.y + ny * half, CAR_RADIUS);
        a.x = ax;
        a.y = ay;
        b.x = bx;
        b.y = by;

        let rel_normal = (b.vx - a.vx) * nx + (b.vy - a.vy) * ny;
        if rel_normal > 0.0 {
            return true;
        }

        let j = -(1.0 + CAR_CAR_RESTITUTION) * rel_normal / 2.0;
        a.vx -= nx * j;
        a.vy -= ny * j;
        b.vx += nx * j;
        b.vy += ny * j;
        true
    }
}
