//! Match state and the fixed-order physics step

use super::ball::BallPhysics;
use super::body::{BallBody, CarBody, Side};
use super::car::CarController;
use super::collision::CollisionResolver;
use super::input::ControlInput;
use super::kickoff::{KickoffClock, MatchPhase};
use super::pads::BoostPadField;

/// Goals per side. Only ever incremented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    /// Blue, defending the left goal
    pub left: u32,
    /// Red, defending the right goal
    pub right: u32,
}

impl Score {
    fn credit(&mut self, scorer: Side) {
        match scorer {
            Side::Blue => self.left += 1,
            Side::Red => self.right += 1,
        }
    }
}

/// Something worth telling the outside world about after a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepEvent {
    /// Kickoff hold elapsed, ball released
    KickoffEnded,
    Goal { scorer: Side, score: Score },
}

/// Authoritative world state for one room
#[derive(Debug, Clone, PartialEq)]
pub struct MatchState {
    pub blue: CarBody,
    pub red: CarBody,
    pub ball: BallBody,
    pub pads: BoostPadField,
    pub score: Score,
    pub clock: KickoffClock,
}

impl MatchState {
    pub fn new() -> Self {
        Self {
            blue: CarBody::spawn(Side::Blue),
            red: CarBody::spawn(Side::Red),
            ball: BallBody::centered(),
            pads: BoostPadField::new(),
            score: Score::default(),
            clock: KickoffClock::new(),
        }
    }

    pub fn phase(&self) -> MatchPhase {
        self.clock.phase()
    }

    /// Put everything back on the spots and re-arm the countdown.
    /// Score is kept.
    pub fn reset_kickoff(&mut self) {
        self.blue = CarBody::spawn(Side::Blue);
        self.red = CarBody::spawn(Side::Red);
        self.ball = BallBody::centered();
        self.pads.reset();
        self.clock.restart();
    }

    /// One fixed step. `inputs` is `[blue, red]`.
    ///
    /// Order matters: ball physics and car-ball contact see the car
    /// positions produced earlier in the same step.
    pub fn step(&mut self, inputs: &[ControlInput; 2], dt: f32) -> Option<StepEvent> {
        let mut event = None;

        if self.clock.update(dt) {
            self.ball.vx = 0.0;
            self.ball.vy = 0.0;
            event = Some(StepEvent::KickoffEnded);
        }

        let phase = self.phase();
        CarController::step(&mut self.blue, &inputs[0], phase, dt);
        CarController::step(&mut self.red, &inputs[1], phase, dt);
        CollisionResolver::car_car(&mut self.blue, &mut self.red, phase);

        self.pads.tick(dt);
        if phase.is_live() {
            self.pads.try_pickup(&mut self.blue);
            self.pads.try_pickup(&mut self.red);
        }

        if let Some(scorer) = BallPhysics::step(&mut self.ball, phase, dt) {
            self.score.credit(scorer);
            self.reset_kickoff();
            return Some(StepEvent::Goal {
                scorer,
                score: self.score,
            });
        }

        let phase = self.phase();
        CollisionResolver::car_ball(&mut self.blue, &mut self.ball, phase);
        CollisionResolver::car_ball(&mut self.red, &mut self.ball, phase);
        BallPhysics::confine(&mut self.ball);

        event
    }
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new()
    }
}
