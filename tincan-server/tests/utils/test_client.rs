use futures::{SinkExt, StreamExt};
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::time::Duration;
use tincan_core::{MessageType, SignalMessage};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

pub const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// WebSocket client for driving the relay in tests. The server may pack
/// several newline-separated messages into one text frame; they are split
/// here and handed out one at a time.
pub struct TestClient {
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
    pending: VecDeque<String>,
}

impl TestClient {
    /// Connects to `/ws` with the given raw query string (may be empty).
    pub async fn connect(addr: SocketAddr, query: &str) -> Self {
        let url = if query.is_empty() {
            format!("ws://{addr}/ws")
        } else {
            format!("ws://{addr}/ws?{query}")
        };
        let (socket, _response) = connect_async(&url).await.expect("connect test client");

        Self {
            socket,
            pending: VecDeque::new(),
        }
    }

    pub async fn send_text(&mut self, text: &str) {
        self.socket
            .send(Message::Text(text.to_string().into()))
            .await
            .expect("send frame");
    }

    pub async fn send_json(&mut self, value: serde_json::Value) {
        self.send_text(&value.to_string()).await;
    }

    pub async fn join(&mut self, username: &str) {
        self.send_json(serde_json::json!({ "type": "join", "username": username }))
            .await;
    }

    /// Next raw message line, waiting up to `RECV_TIMEOUT`.
    pub async fn recv_raw(&mut self) -> String {
        loop {
            if let Some(line) = self.pending.pop_front() {
                return line;
            }

            let frame = tokio::time::timeout(RECV_TIMEOUT, self.socket.next())
                .await
                .expect("timed out waiting for a message")
                .expect("socket closed while waiting for a message")
                .expect("socket error while waiting for a message");

            if let Message::Text(text) = frame {
                self.pending
                    .extend(text.as_str().lines().map(str::to_string));
            }
        }
    }

    pub async fn recv(&mut self) -> SignalMessage {
        let raw = self.recv_raw().await;
        serde_json::from_str(&raw).expect("parse signal message")
    }

    /// Next message, asserting its type.
    pub async fn recv_expect(&mut self, kind: MessageType) -> SignalMessage {
        let message = self.recv().await;
        assert_eq!(message.kind, kind, "unexpected message: {message:?}");
        message
    }

    /// Asserts that no signaling message arrives for a short window.
    pub async fn expect_silence(&mut self) {
        assert!(
            self.pending.is_empty(),
            "unexpected buffered messages: {:?}",
            self.pending
        );

        match tokio::time::timeout(Duration::from_millis(300), self.socket.next()).await {
            Err(_) => {}
            Ok(Some(Ok(Message::Text(text)))) => panic!("unexpected message: {text}"),
            Ok(_) => {}
        }
    }

    /// Waits for the server to end the connection.
    pub async fn expect_close(&mut self) {
        loop {
            let frame = tokio::time::timeout(RECV_TIMEOUT, self.socket.next())
                .await
                .expect("timed out waiting for close");

            match frame {
                None | Some(Ok(Message::Close(_))) | Some(Err(_)) => return,
                Some(Ok(_)) => {}
            }
        }
    }

    pub async fn close(mut self) {
        let _ = self.socket.close(None).await;
    }
}
