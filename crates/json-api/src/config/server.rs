//! Server Config

use std::time::Duration;

use clap::Args;

/// Server runtime network settings.
#[derive(Debug, Args)]
pub struct ServerRuntimeConfig {
    /// Server host address
    #[arg(short = 'H', long, env = "SERVER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Server port
    #[arg(short, long, env = "SERVER_PORT", default_value = "8698")]
    pub port: u16,

    /// Seconds to wait for in-flight requests on shutdown; 0 waits indefinitely
    #[arg(long, env = "SHUTDOWN_GRACE_PERIOD_SECONDS", default_value_t = 30_u64)]
    pub shutdown_grace_period_seconds: u64,
}

impl ServerRuntimeConfig {
    /// Get the socket address for binding.
    #[must_use]
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Shutdown grace period, if bounded.
    #[must_use]
    pub fn shutdown_grace_period(&self) -> Option<Duration> {
        (self.shutdown_grace_period_seconds > 0)
            .then(|| Duration::from_secs(self.shutdown_grace_period_seconds))
    }
}
