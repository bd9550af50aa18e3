pub mod model;

pub use model::{
    ConnectionId, IceCandidatePayload, MessageType, RoomId, SERVER_SENDER, SdpPayload,
    SignalMessage,
};
