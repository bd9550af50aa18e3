use serde_json::json;
use tincan_core::MessageType;

use crate::integration::init_tracing;
use crate::utils::{pair_clients, start_test_server};

#[tokio::test]
async fn test_leave_notifies_peer() {
    init_tracing();

    let (state, addr) = start_test_server().await;
    let clients = pair_clients(addr, "alice", "bob").await;
    let mut alice = clients.first;
    let mut bob = clients.second;
    assert_eq!(state.rooms.room_count(), 1);

    alice.send_json(json!({ "type": "leave" })).await;

    let notice = bob.recv_expect(MessageType::Leave).await;
    assert_eq!(notice.from.as_deref(), Some(clients.first_id.as_str()));

    // The server ends the leaver's connection.
    alice.expect_close().await;

    // Exactly one notice; the room stays up for the remaining member.
    bob.expect_silence().await;
    assert_eq!(state.rooms.room_count(), 1);

    bob.send_json(json!({ "type": "leave" })).await;
    bob.expect_close().await;
    assert_eq!(state.rooms.room_count(), 0);
}
