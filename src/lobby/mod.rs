//! Rooms, seats and join codes

pub mod code;
pub mod manager;
pub mod room;

pub use manager::{LobbyError, RoomManager};
pub use room::{Frame, RoomHandle, RoomSettings};
