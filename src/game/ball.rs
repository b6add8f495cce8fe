//! Ball drag, wall bounces and goal detection

use super::body::{BallBody, Side};
use super::field::{BALL_RADIUS, FIELD, GOAL};
use super::kickoff::MatchPhase;

/// Exponential velocity decay rate
pub const BALL_DRAG: f32 = 0.75;
/// Wall restitution
pub const BOUNCE: f32 = 0.86;

/// Integrates the ball for one fixed step
pub struct BallPhysics;

impl BallPhysics {
    /// Returns the side that scored, if the ball fully crossed a goal line.
    ///
    /// On a goal the remaining wall checks are skipped; the caller resets the
    /// pitch before anything else reads the ball.
    pub fn step(ball: &mut BallBody, phase: MatchPhase, dt: f32) -> Option<Side> {
        if !phase.is_live() {
            return None;
        }

        ball.spin += ball.speed() / (BALL_RADIUS * 2.0) * dt;

        let drag = (-BALL_DRAG * dt).exp();
        ball.vx *= drag;
        ball.vy *= drag;
        ball.x += ball.vx * dt;
        ball.y += ball.vy * dt;

        if ball.y - BALL_RADIUS < FIELD.t {
            ball.y = FIELD.t + BALL_RADIUS;
            ball.vy = ball.vy.abs() * BOUNCE;
        }
        if ball.y + BALL_RADIUS > FIELD.b {
            ball.y = FIELD.b - BALL_RADIUS;
            ball.vy = -ball.vy.abs() * BOUNCE;
        }

        let in_mouth = FIELD.in_goal_mouth(ball.y);
        if in_mouth && ball.x + BALL_RADIUS < FIELD.l - GOAL.d {
            return Some(Side::Red);
        }
        if in_mouth && ball.x - BALL_RADIUS > FIELD.r + GOAL.d {
            return Some(Side::Blue);
        }

        // Side walls only exist outside the goal mouth
        if !in_mouth {
            if ball.x - BALL_RADIUS < FIELD.l {
                ball.x = FIELD.l + BALL_RADIUS;
                ball.vx = ball.vx.abs() * BOUNCE;
            }
            if ball.x + BALL_RADIUS > FIELD.r {
                ball.x = FIELD.r - BALL_RADIUS;
                ball.vx = -ball.vx.abs() * BOUNCE;
            }
        }

        None
    }

    /// Clip a ball displaced by car contact back onto the pitch.
    /// Velocity is untouched; the goal mouth stays open.
    pub fn confine(ball: &mut BallBody) {
        ball.y = ball.y.clamp(FIELD.t + BALL_RADIUS, FIELD.b - BALL_RADIUS);
        if !FIELD.in_goal_mouth(ball.y) {
            ball.x = ball.x.clamp(FIELD.l + BALL_RADIUS, FIELD.r - BALL_RADIUS);
        }
    }
}
