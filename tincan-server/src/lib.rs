pub mod auth;
pub mod config;
pub mod room;
pub mod server;
pub mod signaling;
pub mod transport;
pub mod user;
