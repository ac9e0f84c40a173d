//! HTTP server configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Bind address (host name or IP)
    #[serde(default = "default_address")]
    pub address: String,
    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Grace period for in-flight requests after a shutdown signal
    #[serde(default = "default_shutdown_grace_secs")]
    pub shutdown_grace_secs: u64,
}

fn default_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_shutdown_grace_secs() -> u64 {
    5
}

impl HttpConfig {
    /// `host:port`, bracketing IPv6 literals
    pub fn listen_addr(&self) -> String {
        if self.address.contains(':') && !self.address.starts_with('[') {
            format!("[{}]:{}", self.address, self.port)
        } else {
            format!("{}:{}", self.address, self.port)
        }
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            port: default_port(),
            shutdown_grace_secs: default_shutdown_grace_secs(),
        }
    }
}
