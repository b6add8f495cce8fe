//! Kickoff countdown and match phase

/// Seconds of countdown before the ball is released
pub const KICKOFF_COUNTDOWN: f32 = 5.0;
/// Extra hold after the countdown reaches zero ("GO!" on screen)
pub const GOAL_HOLD: f32 = 0.6;

/// Match phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPhase {
    /// Cars and ball frozen at spawn, countdown running
    Kickoff,
    /// Physics running
    Live,
}

impl MatchPhase {
    pub fn is_live(self) -> bool {
        self == MatchPhase::Live
    }
}

/// Timer driving Kickoff -> Live. The timer goes negative during the hold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KickoffClock {
    phase: MatchPhase,
    timer: f32,
}

impl KickoffClock {
    pub fn new() -> Self {
        Self {
            phase: MatchPhase::Kickoff,
            timer: KICKOFF_COUNTDOWN,
        }
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn timer(&self) -> f32 {
        self.timer
    }

    /// Advance by `dt`. Returns true on the step that goes Live.
    pub fn update(&mut self, dt: f32) -> bool {
        if self.phase != MatchPhase::Kickoff {
            return false;
        }
        self.timer -= dt;
        if self.timer <= -GOAL_HOLD {
            self.phase = MatchPhase::Live;
            return true;
        }
        false
    }

    /// Re-arm the countdown
    pub fn restart(&mut self) {
        self.phase = MatchPhase::Kickoff;
        self.timer = KICKOFF_COUNTDOWN;
    }
}

impl Default for KickoffClock {
    fn default() -> Self {
        Self::new()
    }
}
