use tincan_core::{IceCandidatePayload, MessageType};

use crate::integration::init_tracing;
use crate::utils::{pair_clients, start_test_server};

#[tokio::test]
async fn test_candidate_relay() {
    init_tracing();

    let (_state, addr) = start_test_server().await;
    let mut clients = pair_clients(addr, "alice", "bob").await;

    let candidate = r#"{"candidate":"candidate:842163049 1 udp 1677729535 192.0.2.1 54400 typ srflx raddr 0.0.0.0 rport 0","sdpMid":"0","sdpMLineIndex":0}"#;
    clients
        .second
        .send_text(&format!(r#"{{"type":"candidate","payload":{candidate}}}"#))
        .await;

    let relayed = clients.first.recv_expect(MessageType::Candidate).await;
    assert_eq!(relayed.from.as_deref(), Some(clients.second_id.as_str()));
    assert_eq!(relayed.to.as_deref(), Some(clients.first_id.as_str()));

    let raw = relayed.payload.expect("relayed payload");
    assert_eq!(raw.get(), candidate);

    // The relayed bytes still parse as a browser ICE candidate.
    let parsed: IceCandidatePayload = serde_json::from_str(raw.get()).expect("candidate shape");
    assert_eq!(parsed.sdp_mid.as_deref(), Some("0"));
    assert_eq!(parsed.sdp_m_line_index, Some(0));

    clients.first.close().await;
    clients.second.close().await;
}
