use std::sync::{Arc, Mutex, RwLock};
use tincan_core::{ConnectionId, RoomId};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Bound on the per-connection outbound queue. A client that falls this
/// many frames behind gets its queue closed rather than stalling the relay.
pub const OUTBOUND_QUEUE_CAPACITY: usize = 256;

/// Server-side state of one WebSocket client. The socket itself stays in
/// the read/write loops; everything else talks to the client through the
/// outbound queue held here.
pub struct Connection {
    id: ConnectionId,
    username: RwLock<String>,
    room_id: Mutex<Option<RoomId>>,
    outbound: Mutex<Option<mpsc::Sender<String>>>,
}

impl Connection {
    pub fn new(
        id: ConnectionId,
        username: impl Into<String>,
    ) -> (Arc<Self>, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(OUTBOUND_QUEUE_CAPACITY);
        let connection = Arc::new(Self {
            id,
            username: RwLock::new(username.into()),
            room_id: Mutex::new(None),
            outbound: Mutex::new(Some(tx)),
        });
        (connection, rx)
    }

    pub fn id(&self) -> ConnectionId {
        self.id.clone()
    }

    pub fn username(&self) -> String {
        self.username.read().unwrap().clone()
    }

    pub fn set_username(&self, username: impl Into<String>) {
        *self.username.write().unwrap() = username.into();
    }

    pub fn room_id(&self) -> Option<RoomId> {
        self.room_id.lock().unwrap().clone()
    }

    pub fn set_room_id(&self, room_id: Option<RoomId>) {
        *self.room_id.lock().unwrap() = room_id;
    }

    /// Queues a frame for the write loop. Never blocks: a full queue means
    /// the client stopped reading, so the queue is closed instead.
    pub fn enqueue(&self, text: String) -> bool {
        let mut outbound = self.outbound.lock().unwrap();
        let Some(tx) = outbound.as_ref() else {
            debug!("Dropping message for closed connection {:?}", self.id);
            return false;
        };

        match tx.try_send(text) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(
                    "Connection {:?} send queue full, closing connection",
                    self.id
                );
                *outbound = None;
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                *outbound = None;
                false
            }
        }
    }

    /// Drops the queue sender. The write loop drains what was already
    /// accepted and then terminates. Safe to call more than once.
    pub fn close_outbound(&self) {
        self.outbound.lock().unwrap().take();
    }

    pub fn is_open(&self) -> bool {
        self.outbound.lock().unwrap().is_some()
    }
}
