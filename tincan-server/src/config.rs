use clap::Parser;

/// Command line and environment configuration for the server binary.
#[derive(Debug, Parser)]
#[command(name = "tincan-server")]
#[command(version, about = "WebRTC pairing and signaling relay")]
pub struct Config {
    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Interface address to bind.
    #[arg(long, env = "BIND_ADDRESS", default_value = "0.0.0.0")]
    pub bind: String,

    /// Tracing filter used when RUST_LOG is not set.
    #[arg(
        long,
        env = "LOG_FILTER",
        default_value = "tincan_server=info,tincan_core=info"
    )]
    pub log_filter: String,
}

impl Config {
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}
