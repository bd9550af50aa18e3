use tincan_core::MessageType;

use crate::integration::init_tracing;
use crate::utils::{pair_clients, start_test_server};

#[tokio::test]
async fn test_disconnect_triggers_leave() {
    init_tracing();

    let (state, addr) = start_test_server().await;
    let clients = pair_clients(addr, "alice", "bob").await;
    let mut bob = clients.second;

    // Dropping the socket with no leave message behaves like a leave.
    clients.first.close().await;

    let notice = bob.recv_expect(MessageType::Leave).await;
    assert_eq!(notice.from.as_deref(), Some(clients.first_id.as_str()));

    bob.expect_silence().await;
    assert_eq!(state.rooms.room_count(), 1);

    bob.close().await;
}
