//! One room: the handle shared with connections and the worker that simulates it

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{broadcast, mpsc, watch};
use tokio::time::interval;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::game::{ControlInput, SimulationScheduler, SnapshotBuilder, StepEvent};
use crate::util::time::unix_millis;
use crate::ws::protocol::{Seat, ServerMsg};

/// Steps in one tick at which the worker is considered stalled; the
/// scheduler cap allows at most about six.
const STALL_STEPS: u32 = 5;

/// Serialized `state` frames fanned out to every connection in the room
pub type Frame = Arc<str>;

/// Commands from connections to the room worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomCommand {
    /// Back to kickoff; score is kept
    Reset,
    /// Room removed from the registry; stop simulating
    Close,
}

/// Who sits where. `closed` is set once the last seat empties so that a
/// racing join cannot resurrect a room that is being torn down.
#[derive(Debug, Default)]
struct Seats {
    p1: Option<Uuid>,
    p2: Option<Uuid>,
    closed: bool,
}

impl Seats {
    fn slot(&mut self, seat: Seat) -> &mut Option<Uuid> {
        match seat {
            Seat::P1 => &mut self.p1,
            Seat::P2 => &mut self.p2,
        }
    }

    fn occupied(&self) -> usize {
        self.p1.is_some() as usize + self.p2.is_some() as usize
    }
}

/// Outcome of trying to take a seat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatClaim {
    Seated(Seat),
    Full,
    Closed,
}

/// Settings shared by every room worker
#[derive(Debug, Clone, Copy)]
pub struct RoomSettings {
    pub tick_interval: Duration,
    pub broadcast_hz: u32,
}

/// Connection-side view of a running room
pub struct RoomHandle {
    pub code: String,
    /// Unix millis
    pub created_at: u64,
    seats: Mutex<Seats>,
    /// Latest input per seat, last write wins
    inputs: [watch::Sender<ControlInput>; 2],
    commands: mpsc::UnboundedSender<RoomCommand>,
    frames: broadcast::Sender<Frame>,
}

impl RoomHandle {
    /// Seat the creator at p1
    pub(crate) fn seat_host(&self, conn_id: Uuid) {
        self.seats.lock().p1 = Some(conn_id);
    }

    /// p2 first, then p1 if the host left
    pub fn claim_seat(&self, conn_id: Uuid) -> SeatClaim {
        let mut seats = self.seats.lock();
        if seats.closed {
            return SeatClaim::Closed;
        }
        let seat = if seats.p2.is_none() {
            Seat::P2
        } else if seats.p1.is_none() {
            Seat::P1
        } else {
            return SeatClaim::Full;
        };
        *seats.slot(seat) = Some(conn_id);
        SeatClaim::Seated(seat)
    }

    /// Free the connection's seat and neutralise its input.
    /// Returns true if the room is now empty (and marked closed).
    pub fn vacate(&self, conn_id: Uuid) -> bool {
        let mut seats = self.seats.lock();
        for seat in [Seat::P1, Seat::P2] {
            if *seats.slot(seat) == Some(conn_id) {
                *seats.slot(seat) = None;
                self.inputs[seat.index()].send_replace(ControlInput::neutral());
            }
        }
        if seats.occupied() == 0 {
            seats.closed = true;
        }
        seats.closed
    }

    pub fn occupied_seats(&self) -> usize {
        self.seats.lock().occupied()
    }

    /// Overwrite the seat's input cell. Never blocks.
    pub fn submit_input(&self, seat: Seat, input: ControlInput) {
        self.inputs[seat.index()].send_replace(input);
    }

    pub fn request_reset(&self) {
        let _ = self.commands.send(RoomCommand::Reset);
    }

    pub(crate) fn close(&self) {
        let _ = self.commands.send(RoomCommand::Close);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Frame> {
        self.frames.subscribe()
    }
}

/// The room's simulation worker. Owns the world exclusively.
pub struct RoomTask {
    code: String,
    scheduler: SimulationScheduler,
    snapshots: SnapshotBuilder,
    inputs: [watch::Receiver<ControlInput>; 2],
    commands: mpsc::UnboundedReceiver<RoomCommand>,
    frames: broadcast::Sender<Frame>,
    tick_interval: Duration,
}

impl RoomTask {
    pub fn new(code: String, settings: RoomSettings) -> (Self, Arc<RoomHandle>) {
        let (p1_tx, p1_rx) = watch::channel(ControlInput::neutral());
        let (p2_tx, p2_rx) = watch::channel(ControlInput::neutral());
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (frame_tx, _) = broadcast::channel(16);

        let handle = Arc::new(RoomHandle {
            code: code.clone(),
            created_at: unix_millis(),
            seats: Mutex::new(Seats::default()),
            inputs: [p1_tx, p2_tx],
            commands: command_tx,
            frames: frame_tx.clone(),
        });

        let task = Self {
            code,
            scheduler: SimulationScheduler::new(Instant::now()),
            snapshots: SnapshotBuilder::new(settings.broadcast_hz),
            inputs: [p1_rx, p2_rx],
            commands: command_rx,
            frames: frame_tx,
            tick_interval: settings.tick_interval,
        };

        (task, handle)
    }

    /// Run until the room is closed
    pub async fn run(mut self) {
        info!(room = %self.code, "Room simulation started");

        let mut ticker = interval(self.tick_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            if !self.drain_commands() {
                break;
            }

            self.tick(Instant::now());
        }

        info!(room = %self.code, "Room simulation stopped");
    }

    /// Apply pending commands. Returns false once the room should stop.
    pub(crate) fn drain_commands(&mut self) -> bool {
        loop {
            match self.commands.try_recv() {
                Ok(RoomCommand::Reset) => {
                    self.scheduler.state_mut().reset_kickoff();
                    info!(room = %self.code, "Kickoff reset by host");
                }
                Ok(RoomCommand::Close) => return false,
                Err(mpsc::error::TryRecvError::Empty) => return true,
                Err(mpsc::error::TryRecvError::Disconnected) => return false,
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn match_state_mut(&mut self) -> &mut crate::game::MatchState {
        self.scheduler.state_mut()
    }

    /// One scheduler invocation plus, if due, one broadcast.
    /// Returns the number of physics steps run.
    fn tick(&mut self, now: Instant) -> u32 {
        let [p1, p2] = &self.inputs;
        let report = self
            .scheduler
            .advance_to(now, || [*p1.borrow(), *p2.borrow()]);

        if report.steps >= STALL_STEPS {
            debug!(room = %self.code, steps = report.steps, "Room worker fell behind, catch-up capped");
        }

        for event in report.events {
            match event {
                StepEvent::Goal { scorer, score } => info!(
                    room = %self.code,
                    scorer = ?scorer,
                    score_left = score.left,
                    score_right = score.right,
                    "Goal"
                ),
                StepEvent::KickoffEnded => debug!(room = %self.code, "Kickoff over, ball live"),
            }
        }

        if self.snapshots.should_send(now) {
            let snap = self.snapshots.build(unix_millis(), self.scheduler.state());
            match (ServerMsg::State { snap }).to_frame() {
                // No subscribers is fine: nobody to tell
                Ok(frame) => {
                    let _ = self.frames.send(Frame::from(frame));
                }
                Err(e) => error!(room = %self.code, error = %e, "Failed to serialize snapshot"),
            }
        }

        report.steps
    }
}
