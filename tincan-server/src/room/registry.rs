use crate::room::Room;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tincan_core::RoomId;

#[derive(Default)]
struct RegistryInner {
    rooms: HashMap<RoomId, Arc<Room>>,
    waiting: Option<RoomId>,
}

/// Concurrency-safe store of all live rooms plus the single waiting-room
/// slot used for pairing. One coarse lock guards both so every mutation
/// observed by concurrent joins is atomic.
#[derive(Default)]
pub struct RoomRegistry {
    inner: RwLock<RegistryInner>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_room(&self, id: RoomId) -> Arc<Room> {
        let room = Arc::new(Room::new(id.clone()));
        self.inner.write().unwrap().rooms.insert(id, Arc::clone(&room));
        room
    }

    /// Registers a room built elsewhere under its own id.
    pub fn store_room(&self, room: Arc<Room>) {
        self.inner.write().unwrap().rooms.insert(room.id(), room);
    }

    pub fn get_room(&self, id: &RoomId) -> Option<Arc<Room>> {
        self.inner.read().unwrap().rooms.get(id).cloned()
    }

    /// Deletes the room and, in the same critical section, clears the
    /// waiting slot when it pointed at the deleted room.
    pub fn delete_room(&self, id: &RoomId) {
        let mut inner = self.inner.write().unwrap();
        inner.rooms.remove(id);
        if inner.waiting.as_ref() == Some(id) {
            inner.waiting = None;
        }
    }

    /// Current waiting room, if the slot names a room that still exists.
    pub fn waiting_room(&self) -> Option<Arc<Room>> {
        let inner = self.inner.read().unwrap();
        let waiting = inner.waiting.as_ref()?;
        inner.rooms.get(waiting).cloned()
    }

    pub fn set_waiting_room(&self, id: Option<RoomId>) {
        self.inner.write().unwrap().waiting = id;
    }

    pub fn room_count(&self) -> usize {
        self.inner.read().unwrap().rooms.len()
    }
}
