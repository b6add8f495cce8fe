//! Registry of live rooms keyed by join code

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::util::time::unix_millis;
use crate::ws::protocol::Seat;

use super::code::{generate_code, normalize_code};
use super::room::{RoomHandle, RoomSettings, RoomTask, SeatClaim};

/// Refusals surfaced to clients. Display text goes out verbatim in `err` frames.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LobbyError {
    #[error("Room not found")]
    NotFound,

    #[error("Room full")]
    RoomFull,

    #[error("Server full")]
    ServerFull,
}

/// Owns every active room. Each room's world lives in its own worker task;
/// the manager only keeps the handles used for seating, input and fan-out.
pub struct RoomManager {
    rooms: DashMap<String, Arc<RoomHandle>>,
    settings: RoomSettings,
    max_rooms: usize,
    /// Slots taken against `max_rooms`, reserved before the insert
    open: AtomicUsize,
}

impl RoomManager {
    pub fn new(settings: RoomSettings, max_rooms: usize) -> Self {
        Self {
            rooms: DashMap::new(),
            settings,
            max_rooms,
            open: AtomicUsize::new(0),
        }
    }

    /// Open a room, start its worker and seat `conn_id` at p1
    pub fn create(&self, conn_id: Uuid) -> Result<(Arc<RoomHandle>, Seat), LobbyError> {
        if !self.reserve_slot() {
            return Err(LobbyError::ServerFull);
        }

        let mut rng = rand::thread_rng();
        let handle = loop {
            let code = generate_code(&mut rng);
            if let Entry::Vacant(slot) = self.rooms.entry(code.clone()) {
                let (task, handle) = RoomTask::new(code, self.settings);
                handle.seat_host(conn_id);
                slot.insert(handle.clone());
                tokio::spawn(task.run());
                break handle;
            }
        };

        info!(room = %handle.code, conn_id = %conn_id, rooms = self.rooms.len(), "Room created");
        Ok((handle, Seat::P1))
    }

    fn reserve_slot(&self) -> bool {
        self.open
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < self.max_rooms).then_some(n + 1)
            })
            .is_ok()
    }

    /// Seat `conn_id` in the room named by a user-typed code
    pub fn join(&self, raw_code: &str, conn_id: Uuid) -> Result<(Arc<RoomHandle>, Seat), LobbyError> {
        let code = normalize_code(raw_code);
        let handle = self.get(&code).ok_or(LobbyError::NotFound)?;

        match handle.claim_seat(conn_id) {
            SeatClaim::Seated(seat) => {
                info!(room = %code, conn_id = %conn_id, seat = %seat, "Player joined room");
                Ok((handle, seat))
            }
            SeatClaim::Full => Err(LobbyError::RoomFull),
            // Lost a race with the last player leaving
            SeatClaim::Closed => Err(LobbyError::NotFound),
        }
    }

    /// Free the connection's seat; tear the room down when nobody is left
    pub fn leave(&self, handle: &RoomHandle, conn_id: Uuid) {
        if handle.vacate(conn_id) {
            self.remove(&handle.code);
        } else {
            info!(room = %handle.code, conn_id = %conn_id, "Player left room");
        }
    }

    pub fn get(&self, code: &str) -> Option<Arc<RoomHandle>> {
        self.rooms.get(code).map(|r| r.value().clone())
    }

    /// Drop the room from the active set and stop its worker
    pub fn remove(&self, code: &str) -> Option<Arc<RoomHandle>> {
        let (_, handle) = self.rooms.remove(code)?;
        self.open.fetch_sub(1, Ordering::AcqRel);
        handle.close();
        let lived_secs = unix_millis().saturating_sub(handle.created_at) / 1000;
        info!(room = %code, lived_secs, rooms = self.rooms.len(), "Room closed");
        Some(handle)
    }

    pub fn active_rooms(&self) -> usize {
        self.rooms.len()
    }

    pub fn seated_players(&self) -> usize {
        self.rooms.iter().map(|r| r.value().occupied_seats()).sum()
    }
}
