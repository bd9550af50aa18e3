mod connection;
mod message;
mod room;

pub use connection::ConnectionId;
pub use message::{IceCandidatePayload, MessageType, SERVER_SENDER, SdpPayload, SignalMessage};
pub use room::RoomId;
