use crate::utils::TestClient;
use std::net::SocketAddr;
use tincan_core::MessageType;

pub struct PairedClients {
    pub first: TestClient,
    pub second: TestClient,
    pub room_id: String,
    pub first_id: String,
    pub second_id: String,
}

/// Connects two clients and drives them through pairing, consuming the
/// ready and join notices along the way.
pub async fn pair_clients(addr: SocketAddr, first: &str, second: &str) -> PairedClients {
    let mut a = TestClient::connect(addr, &format!("username={first}")).await;
    a.join(first).await;
    let room_id = a
        .recv_expect(MessageType::Ready)
        .await
        .room_id
        .expect("ready must carry the room id");

    let mut b = TestClient::connect(addr, &format!("username={second}")).await;
    b.join(second).await;
    b.recv_expect(MessageType::Ready).await;

    let first_id = b
        .recv_expect(MessageType::Join)
        .await
        .from
        .expect("join notice must carry the peer id");
    let second_id = a
        .recv_expect(MessageType::Join)
        .await
        .from
        .expect("join notice must carry the peer id");

    PairedClients {
        first: a,
        second: b,
        room_id,
        first_id,
        second_id,
    }
}
