//! WebSocket upgrade handler and per-connection session

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::app::AppState;
use crate::game::ControlInput;
use crate::lobby::code::normalize_code;
use crate::lobby::{Frame, LobbyError, RoomHandle, RoomManager};
use crate::util::rate_limit::ConnectionRateLimiter;
use crate::ws::link::ClientLink;
use crate::ws::protocol::{ClientMsg, Seat, ServerMsg};

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle the upgraded WebSocket connection
async fn handle_socket(socket: WebSocket, state: AppState) {
    let conn_id = Uuid::new_v4();
    info!(conn_id = %conn_id, "New WebSocket connection");

    let (mut ws_sink, mut ws_stream) = socket.split();
    let (link, mut outbound) = ClientLink::new();

    // Writer task: outbound queue -> WebSocket
    let writer_handle = tokio::spawn(async move {
        while let Some(frame) = outbound.recv().await {
            if let Err(e) = ws_sink.send(Message::Text(frame.to_string())).await {
                debug!(conn_id = %conn_id, error = %e, "WebSocket send failed");
                break;
            }
        }
    });

    link.send_msg(&ServerMsg::hello());

    let mut session = Session::new(conn_id, link);
    let rate_limiter = ConnectionRateLimiter::new();

    // Reader loop: WebSocket -> session
    while let Some(result) = ws_stream.next().await {
        match result {
            Ok(Message::Text(text)) => {
                if !rate_limiter.check_message() {
                    warn!(conn_id = %conn_id, "Rate limited client message");
                    continue;
                }

                match serde_json::from_str::<ClientMsg>(&text) {
                    Ok(msg) => session.handle(&state.rooms, msg),
                    Err(e) => {
                        debug!(conn_id = %conn_id, error = %e, "Dropping malformed client message");
                    }
                }
            }
            Ok(Message::Close(_)) => {
                info!(conn_id = %conn_id, "Client initiated close");
                break;
            }
            Ok(_) => {
                // Binary, ping and pong frames carry nothing for us
            }
            Err(e) => {
                error!(conn_id = %conn_id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    session.disconnect(&state.rooms);
    writer_handle.abort();

    info!(conn_id = %conn_id, "WebSocket connection closed");
}

/// A seat held by this connection plus the task feeding it room snapshots
struct Membership {
    room: Arc<RoomHandle>,
    seat: Seat,
    forwarder: JoinHandle<()>,
}

/// Per-connection protocol state
pub struct Session {
    conn_id: Uuid,
    link: ClientLink,
    membership: Option<Membership>,
}

impl Session {
    pub fn new(conn_id: Uuid, link: ClientLink) -> Self {
        Self {
            conn_id,
            link,
            membership: None,
        }
    }

    #[cfg(test)]
    pub fn seat(&self) -> Option<Seat> {
        self.membership.as_ref().map(|m| m.seat)
    }

    #[cfg(test)]
    pub fn room_code(&self) -> Option<&str> {
        self.membership.as_ref().map(|m| m.room.code.as_str())
    }

    /// Apply one client message. Refusals are reported to the client; nothing
    /// here ever closes the connection.
    pub fn handle(&mut self, rooms: &RoomManager, msg: ClientMsg) {
        match msg {
            ClientMsg::Create => {
                let result = rooms.create(self.conn_id);
                self.switch_to(rooms, result);
            }
            ClientMsg::Join { code } => {
                if let Some(m) = &self.membership {
                    if m.room.code == normalize_code(&code) {
                        // Already seated here: just repeat the assignment
                        self.link.send_msg(&ServerMsg::Room {
                            code: m.room.code.clone(),
                            seat: m.seat,
                        });
                        return;
                    }
                }
                let result = rooms.join(&code, self.conn_id);
                self.switch_to(rooms, result);
            }
            ClientMsg::Input { i } => {
                if let Some(m) = &self.membership {
                    m.room.submit_input(m.seat, ControlInput::from_untrusted(&i));
                }
            }
            ClientMsg::Reset => match &self.membership {
                Some(m) if m.seat == Seat::P1 => m.room.request_reset(),
                Some(m) => {
                    debug!(conn_id = %self.conn_id, room = %m.room.code, seat = %m.seat, "Ignoring reset from guest seat");
                }
                None => {}
            },
        }
    }

    /// Connection is gone: give up the seat
    pub fn disconnect(&mut self, rooms: &RoomManager) {
        self.leave_room(rooms);
    }

    /// Move into the new room only once it has accepted us; a refusal leaves
    /// the current seat untouched.
    fn switch_to(&mut self, rooms: &RoomManager, result: Result<(Arc<RoomHandle>, Seat), LobbyError>) {
        if result.is_ok() {
            self.leave_room(rooms);
        }
        self.enter(result);
    }

    fn enter(&mut self, result: Result<(Arc<RoomHandle>, Seat), LobbyError>) {
        match result {
            Ok((room, seat)) => {
                self.link.send_msg(&ServerMsg::Room {
                    code: room.code.clone(),
                    seat,
                });
                let forwarder = spawn_forwarder(self.conn_id, room.subscribe(), self.link.clone());
                self.membership = Some(Membership {
                    room,
                    seat,
                    forwarder,
                });
            }
            Err(e) => {
                debug!(conn_id = %self.conn_id, error = %e, "Room request refused");
                self.link.send_msg(&ServerMsg::error(e));
            }
        }
    }

    fn leave_room(&mut self, rooms: &RoomManager) {
        if let Some(m) = self.membership.take() {
            m.forwarder.abort();
            rooms.leave(&m.room, self.conn_id);
        }
    }
}

/// Room broadcast -> this client's outbound queue
fn spawn_forwarder(
    conn_id: Uuid,
    mut frames: broadcast::Receiver<Frame>,
    link: ClientLink,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match frames.recv().await {
                Ok(frame) => {
                    if !link.send_if_connected(frame) && !link.is_connected() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    // Snapshots are full state; skipping some is harmless
                    warn!(conn_id = %conn_id, lagged_count = n, "Client lagged, skipping snapshots");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}
