use crate::room::{Room, RoomRegistry};
use crate::transport::Connection;
use std::sync::Arc;
use tincan_core::RoomId;
use tracing::info;

/// Pairing service. Joins go through the single waiting-room slot: the
/// first client parks there, the second completes the pair.
pub struct RoomManager {
    registry: Arc<RoomRegistry>,
}

impl RoomManager {
    pub fn new(registry: Arc<RoomRegistry>) -> Self {
        Self { registry }
    }

    /// Places the connection into the waiting room when one is open, or
    /// creates a fresh room and publishes it as the new waiting room.
    ///
    /// The read-then-add sequence is deliberately not atomic across the
    /// registry and room locks. Two interleaved joins can both read the
    /// same waiting room, but `add_member` admits at most one of them;
    /// the loser falls through and opens the next waiting room.
    pub fn find_or_create_room(&self, connection: &Arc<Connection>) -> Arc<Room> {
        if let Some(waiting) = self.registry.waiting_room() {
            if !waiting.is_full() && waiting.add_member(connection) {
                info!(
                    "Connection {:?} joined waiting room {:?}",
                    connection.id(),
                    waiting.id()
                );
                self.registry.set_waiting_room(None);
                return waiting;
            }
        }

        let room = self.registry.create_room(RoomId::new());
        room.add_member(connection);
        self.registry.set_waiting_room(Some(room.id()));

        info!(
            "Created room {:?} for connection {:?}",
            room.id(),
            connection.id()
        );
        room
    }

    /// Takes the connection out of whatever room it occupies, deleting the
    /// room once it empties. Unroomed connections are left alone.
    pub fn remove_from_room(&self, connection: &Arc<Connection>) {
        let Some(room_id) = connection.room_id() else {
            return;
        };
        let Some(room) = self.registry.get_room(&room_id) else {
            return;
        };

        room.remove_member(&connection.id());
        info!(
            "Connection {:?} removed from room {:?}",
            connection.id(),
            room_id
        );

        if room.is_empty() {
            self.registry.delete_room(&room_id);
            info!("Room {:?} deleted (empty)", room_id);
        }
    }

    pub fn get_room(&self, id: &RoomId) -> Option<Arc<Room>> {
        self.registry.get_room(id)
    }

    pub fn room_count(&self) -> usize {
        self.registry.room_count()
    }
}
