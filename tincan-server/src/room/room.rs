use crate::transport::Connection;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tincan_core::{ConnectionId, RoomId};

/// Комната сводит ровно двух клиентов.
pub const ROOM_CAPACITY: usize = 2;

pub struct Room {
    id: RoomId,
    members: RwLock<HashMap<ConnectionId, Arc<Connection>>>,
}

impl Room {
    pub fn new(id: RoomId) -> Self {
        Self {
            id,
            members: RwLock::new(HashMap::new()),
        }
    }

    pub fn id(&self) -> RoomId {
        self.id.clone()
    }

    /// Admits the connection unless the room is already full. On success
    /// the connection's room slot is stamped with this room's id.
    pub fn add_member(&self, connection: &Arc<Connection>) -> bool {
        let mut members = self.members.write().unwrap();
        if members.len() >= ROOM_CAPACITY {
            return false;
        }

        members.insert(connection.id(), Arc::clone(connection));
        connection.set_room_id(Some(self.id.clone()));
        true
    }

    /// Removes the member, closing its outbound queue and clearing its
    /// room slot. Unknown ids are ignored.
    pub fn remove_member(&self, connection_id: &ConnectionId) {
        let mut members = self.members.write().unwrap();
        if let Some(connection) = members.remove(connection_id) {
            connection.close_outbound();
            connection.set_room_id(None);
        }
    }

    pub fn other_member(&self, connection_id: &ConnectionId) -> Option<Arc<Connection>> {
        let members = self.members.read().unwrap();
        members
            .iter()
            .find(|(id, _)| *id != connection_id)
            .map(|(_, connection)| Arc::clone(connection))
    }

    pub fn is_full(&self) -> bool {
        self.members.read().unwrap().len() >= ROOM_CAPACITY
    }

    pub fn is_empty(&self) -> bool {
        self.members.read().unwrap().is_empty()
    }

    pub fn member_count(&self) -> usize {
        self.members.read().unwrap().len()
    }
}
