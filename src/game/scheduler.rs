//! Fixed-step accumulator decoupling physics rate from wall-clock jitter

use std::time::{Duration, Instant};

use crate::util::time::{fixed_step, MAX_FRAME_SECS};

use super::input::ControlInput;
use super::r#match::{MatchState, StepEvent};

/// Owns one room's world and converts elapsed real time into fixed steps
pub struct SimulationScheduler {
    state: MatchState,
    accumulator: f32,
    last_tick: Instant,
}

/// What happened during one scheduler invocation
#[derive(Debug, Default)]
pub struct TickReport {
    pub steps: u32,
    pub events: Vec<StepEvent>,
}

impl SimulationScheduler {
    pub fn new(now: Instant) -> Self {
        Self {
            state: MatchState::new(),
            accumulator: 0.0,
            last_tick: now,
        }
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut MatchState {
        &mut self.state
    }

    #[cfg(test)]
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Advance to `now`. `inputs` is sampled at the start of every step.
    pub fn advance_to<F>(&mut self, now: Instant, inputs: F) -> TickReport
    where
        F: FnMut() -> [ControlInput; 2],
    {
        let elapsed = now.saturating_duration_since(self.last_tick);
        self.last_tick = now;
        self.advance_by(elapsed, inputs)
    }

    /// Feed `elapsed` real time (capped after a stall) and run every whole step it covers
    pub fn advance_by<F>(&mut self, elapsed: Duration, mut inputs: F) -> TickReport
    where
        F: FnMut() -> [ControlInput; 2],
    {
        let dt = fixed_step();
        self.accumulator += elapsed.as_secs_f32().min(MAX_FRAME_SECS);

        let mut report = TickReport::default();
        while self.accumulator >= dt {
            let sample = inputs();
            if let Some(event) = self.state.step(&sample, dt) {
                report.events.push(event);
            }
            self.accumulator -= dt;
            report.steps += 1;
        }
        report
    }
}
