//! Snapshot building and broadcast cadence

use serde::Serialize;
use std::time::{Duration, Instant};

use super::body::{BallBody, CarBody};
use super::field::{FieldBounds, GoalGeometry, FIELD, GOAL};
use super::pads::Pad;
use super::r#match::MatchState;

/// Full room state as sent to clients in a `state` frame
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Server wall clock (unix millis)
    pub t: u64,
    pub field: FieldBounds,
    pub goal: GoalGeometry,
    pub kickoff_active: bool,
    pub kickoff_timer: f32,
    #[serde(rename = "scoreL")]
    pub score_left: u32,
    #[serde(rename = "scoreR")]
    pub score_right: u32,
    pub blue: CarBody,
    pub red: CarBody,
    pub ball: BallBody,
    pub pads: Vec<Pad>,
}

/// Builds snapshots and throttles them to a fixed rate, regardless of how
/// many physics steps ran in between
pub struct SnapshotBuilder {
    interval: Duration,
    last_sent: Option<Instant>,
}

impl SnapshotBuilder {
    pub fn new(snapshots_per_second: u32) -> Self {
        Self {
            interval: Duration::from_secs(1) / snapshots_per_second.max(1),
            last_sent: None,
        }
    }

    /// Check if it's time to send a snapshot (arms the next window if so)
    pub fn should_send(&mut self, now: Instant) -> bool {
        match self.last_sent {
            Some(last) if now.saturating_duration_since(last) < self.interval => false,
            _ => {
                self.last_sent = Some(now);
                true
            }
        }
    }

    pub fn build(&self, t: u64, state: &MatchState) -> Snapshot {
        Snapshot {
            t,
            field: FIELD,
            goal: GOAL,
            kickoff_active: !state.phase().is_live(),
            kickoff_timer: state.clock.timer(),
            score_left: state.score.left,
            score_right: state.score.right,
            blue: state.blue,
            red: state.red,
            ball: state.ball,
            pads: state.pads.pads().to_vec(),
        }
    }
}
