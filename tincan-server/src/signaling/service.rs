use crate::room::RoomManager;
use crate::transport::Connection;
use std::sync::Arc;
use thiserror::Error;
use tincan_core::{MessageType, SignalMessage};
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum SignalError {
    #[error("malformed signal message: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Диспетчер сигнальных сообщений. Работает синхронно на читающем цикле
/// соединения; все исходящие эффекты — неблокирующие enqueue.
#[derive(Clone)]
pub struct SignalingService {
    rooms: Arc<RoomManager>,
}

impl SignalingService {
    pub fn new(rooms: Arc<RoomManager>) -> Self {
        Self { rooms }
    }

    /// Parses one inbound frame and dispatches it. The sender field is
    /// always overwritten with the connection's real id before anything
    /// is relayed.
    pub fn handle_message(
        &self,
        connection: &Arc<Connection>,
        text: &str,
    ) -> Result<(), SignalError> {
        let mut message: SignalMessage = serde_json::from_str(text)?;
        message.from = Some(connection.id().to_string());

        match message.kind {
            MessageType::Join => self.handle_join(connection, &message),
            MessageType::Offer | MessageType::Answer | MessageType::Candidate => {
                self.relay(connection, message)
            }
            MessageType::Leave => self.handle_leave(connection),
            other => warn!("Unknown message type {:?} from {:?}", other, connection.id()),
        }

        Ok(())
    }

    /// Leave path for a dropped socket. Safe to call after an explicit
    /// leave already ran; it then observes no room and does nothing.
    pub fn disconnect(&self, connection: &Arc<Connection>) {
        self.handle_leave(connection);
    }

    fn handle_join(&self, connection: &Arc<Connection>, message: &SignalMessage) {
        if let Some(username) = message.username.as_deref().filter(|name| !name.is_empty()) {
            connection.set_username(username);
        }

        let room = self.rooms.find_or_create_room(connection);
        let room_id = room.id();

        self.send_to_connection(connection, &SignalMessage::ready(&room_id));

        if room.is_full() {
            if let Some(other) = room.other_member(&connection.id()) {
                self.send_to_connection(
                    connection,
                    &SignalMessage::peer_join(&other.id(), &other.username(), &room_id),
                );
                self.send_to_connection(
                    &other,
                    &SignalMessage::peer_join(&connection.id(), &connection.username(), &room_id),
                );

                info!(
                    "Room {:?} is ready with connections {:?} and {:?}",
                    room_id,
                    connection.id(),
                    other.id()
                );
            }
        }
    }

    fn handle_leave(&self, connection: &Arc<Connection>) {
        let room = connection
            .room_id()
            .and_then(|room_id| self.rooms.get_room(&room_id));

        if let Some(room) = room {
            if let Some(other) = room.other_member(&connection.id()) {
                self.send_to_connection(&other, &SignalMessage::leave(&connection.id()));
            }
        }

        self.rooms.remove_from_room(connection);
    }

    fn relay(&self, connection: &Arc<Connection>, mut message: SignalMessage) {
        let room = connection
            .room_id()
            .and_then(|room_id| self.rooms.get_room(&room_id));

        let Some(room) = room else {
            warn!("Room not found for connection {:?}", connection.id());
            return;
        };
        let Some(other) = room.other_member(&connection.id()) else {
            warn!("No other connection in room {:?}", room.id());
            return;
        };

        message.to = Some(other.id().to_string());
        self.send_to_connection(&other, &message);
    }

    fn send_to_connection(&self, connection: &Arc<Connection>, message: &SignalMessage) {
        match serde_json::to_string(message) {
            Ok(json) => {
                connection.enqueue(json);
            }
            Err(e) => error!("Failed to serialize signal message: {}", e),
        }
    }
}
