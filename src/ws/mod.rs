//! WebSocket transport and wire protocol

pub mod handler;
pub mod link;
pub mod protocol;
