//! Service configuration loaded from the environment.
//!
//! - `HOST`: Bind host (default: 0.0.0.0)
//! - `PORT`: Bind port (default: 8002)
//! - `LOG_FORMAT`: "json" for structured logs, "pretty" for development (default: json)
//! - `DB_CONNECT_DEADLINE_SECS`: Give up connecting to the store after this long (default: 30)

use std::convert::Infallible;
use std::net::{AddrParseError, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event.
    Json,
    /// Human-readable multi-line output.
    Pretty,
}

/// Anything but "pretty" selects JSON.
impl FromStr for LogFormat {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("pretty") {
            Ok(Self::Pretty)
        } else {
            Ok(Self::Json)
        }
    }
}

/// Settings for the HTTP service binary.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Log output format.
    pub log_format: LogFormat,
    /// Deadline for establishing the store connection, in seconds.
    pub connect_deadline_secs: u64,
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// Unparseable numeric values fall back to their defaults.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8002),
            log_format: std::env::var("LOG_FORMAT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(LogFormat::Json),
            connect_deadline_secs: std::env::var("DB_CONNECT_DEADLINE_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        }
    }

    /// Address to bind.
    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    /// Store connection deadline.
    pub fn connect_deadline(&self) -> Duration {
        Duration::from_secs(self.connect_deadline_secs)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8002,
            log_format: LogFormat::Json,
            connect_deadline_secs: 30,
        }
    }
}
