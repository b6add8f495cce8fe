//! Game simulation modules

pub mod ball;
pub mod body;
pub mod car;
pub mod collision;
pub mod field;
pub mod input;
pub mod kickoff;
pub mod r#match;
pub mod pads;
pub mod scheduler;
pub mod snapshot;

pub use input::ControlInput;
pub use r#match::{MatchState, StepEvent};
pub use scheduler::SimulationScheduler;
pub use snapshot::{Snapshot, SnapshotBuilder};
