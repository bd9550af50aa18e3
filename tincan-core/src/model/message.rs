use crate::model::connection::ConnectionId;
use crate::model::room::RoomId;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

/// Идентификатор отправителя для сообщений, созданных самим сервером
/// (`ready` и прочие служебные уведомления).
pub const SERVER_SENDER: &str = "server";

/// Типы сигнальных сообщений. Всё, что не распознано, попадает в
/// `Unknown` и отбрасывается диспетчером без ошибки клиенту.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Join,
    Offer,
    Answer,
    Candidate,
    Leave,
    Ready,
    Error,
    #[serde(other)]
    Unknown,
}

/// Сигнальное сообщение — плоский JSON-объект, общий для входящих и
/// исходящих кадров. `from` всегда проставляется сервером.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalMessage {
    #[serde(rename = "type")]
    pub kind: MessageType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Box<RawValue>>,
}

impl SignalMessage {
    /// Server acknowledgement carrying the room assigned to the sender.
    pub fn ready(room_id: &RoomId) -> Self {
        Self {
            kind: MessageType::Ready,
            from: Some(SERVER_SENDER.to_string()),
            to: None,
            room_id: Some(room_id.to_string()),
            username: None,
            payload: None,
        }
    }

    /// Notice sent to each member of a freshly paired room, describing
    /// the other occupant.
    pub fn peer_join(peer: &ConnectionId, username: &str, room_id: &RoomId) -> Self {
        Self {
            kind: MessageType::Join,
            from: Some(peer.to_string()),
            to: None,
            room_id: Some(room_id.to_string()),
            username: Some(username.to_string()),
            payload: None,
        }
    }

    /// Notice sent to the remaining peer when the other side leaves.
    pub fn leave(from: &ConnectionId) -> Self {
        Self {
            kind: MessageType::Leave,
            from: Some(from.to_string()),
            to: None,
            room_id: None,
            username: None,
            payload: None,
        }
    }
}

/// Форма `payload` для offer/answer. Сервер её не разбирает, тип
/// существует для клиентов и тестов.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SdpPayload {
    #[serde(rename = "type")]
    pub kind: String,
    pub sdp: String,
}

/// Форма `payload` для candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IceCandidatePayload {
    pub candidate: String,
    pub sdp_mid: Option<String>,
    pub sdp_m_line_index: Option<u32>,
}
