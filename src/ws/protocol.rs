//! WebSocket protocol message definitions
//! These are the wire types for client-server communication

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::game::Snapshot;

/// Player seat within a room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Seat {
    /// Host seat; drives the blue car and may reset the kickoff
    P1,
    /// Guest seat; drives the red car
    P2,
}

impl Seat {
    pub fn index(self) -> usize {
        match self {
            Seat::P1 => 0,
            Seat::P2 => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Seat::P1 => "p1",
            Seat::P2 => "p2",
        }
    }
}

impl std::fmt::Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Messages sent from client to server
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientMsg {
    /// Open a new room and take seat p1
    Create,

    /// Take a seat in an existing room
    Join {
        #[serde(default)]
        code: String,
    },

    /// Latest control state. Kept raw here; validated into a
    /// `ControlInput` before it reaches the simulation.
    Input {
        #[serde(default)]
        i: Value,
    },

    /// Restart the kickoff (p1 only)
    Reset,
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerMsg {
    /// Sent once on connect
    Hello { msg: String },

    /// Seat assignment after create/join
    Room { code: String, seat: Seat },

    /// Human-readable refusal
    Err { msg: String },

    /// Room snapshot
    State { snap: Snapshot },
}

impl ServerMsg {
    pub fn hello() -> Self {
        Self::Hello {
            msg: "connected".to_string(),
        }
    }

    pub fn error(err: impl std::fmt::Display) -> Self {
        Self::Err {
            msg: err.to_string(),
        }
    }

    pub fn to_frame(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
