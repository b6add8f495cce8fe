//! Outbound side of a client connection

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error};

use super::protocol::ServerMsg;

/// Queue depth per client; a client this far behind starts losing frames
pub const LINK_CAPACITY: usize = 64;

/// Handle for pushing text frames to one client. Game code never touches the
/// socket; a writer task owns it and drains this queue.
#[derive(Clone)]
pub struct ClientLink {
    tx: mpsc::Sender<Arc<str>>,
}

impl ClientLink {
    pub fn new() -> (Self, mpsc::Receiver<Arc<str>>) {
        let (tx, rx) = mpsc::channel(LINK_CAPACITY);
        (Self { tx }, rx)
    }

    /// Queue a frame. Returns false if the client is gone or too far behind.
    pub fn send_if_connected(&self, frame: Arc<str>) -> bool {
        match self.tx.try_send(frame) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                debug!("Client queue full, dropping frame");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => false,
        }
    }

    /// Serialize and queue a message
    pub fn send_msg(&self, msg: &ServerMsg) -> bool {
        match msg.to_frame() {
            Ok(json) => self.send_if_connected(Arc::from(json)),
            Err(e) => {
                error!(error = %e, "Failed to serialize server message");
                false
            }
        }
    }

    pub fn is_connected(&self) -> bool {
        !self.tx.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delivers_while_receiver_alive() {
        let (link, mut rx) = ClientLink::new();
        assert!(link.send_msg(&ServerMsg::hello()));
        let frame = rx.recv().await.unwrap();
        assert_eq!(&*frame, r#"{"type":"hello","msg":"connected"}"#);
    }

    #[test]
    fn reports_disconnect() {
        let (link, rx) = ClientLink::new();
        drop(rx);
        assert!(!link.is_connected());
        assert!(!link.send_if_connected(Arc::from("x")));
    }

    #[test]
    fn full_queue_drops_instead_of_blocking() {
        let (link, _rx) = ClientLink::new();
        for _ in 0..LINK_CAPACITY {
            assert!(link.send_if_connected(Arc::from("x")));
        }
        assert!(!link.send_if_connected(Arc::from("x")));
        assert!(link.is_connected());
    }
}
