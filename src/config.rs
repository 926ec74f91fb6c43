//! Configuration for the sysmon client
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;
use std::time::Duration;

/// Well-known path of the daemon's listening socket
pub const DEFAULT_SOCKET_PATH: &str = "/tmp/sysmonctl.socket";

/// Main configuration for a client connection
#[derive(Debug, Clone)]
pub struct ClientConfig {
    // -------------------------------------------------------------------------
    // Socket Configuration
    // -------------------------------------------------------------------------
    /// Path of the daemon's Unix domain socket
    pub socket_path: PathBuf,

    /// Socket read timeout (milliseconds, 0 blocks forever)
    pub read_timeout_ms: u64,

    /// Socket write timeout (milliseconds, 0 blocks forever)
    pub write_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Alert Type Configuration
    // -------------------------------------------------------------------------
    /// Optional TOML file holding the alert type id → name table
    pub types_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            socket_path: PathBuf::from(DEFAULT_SOCKET_PATH),
            read_timeout_ms: 10_000,
            write_timeout_ms: 10_000,
            types_path: None,
        }
    }
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    pub(crate) fn read_timeout(&self) -> Option<Duration> {
        (self.read_timeout_ms > 0).then(|| Duration::from_millis(self.read_timeout_ms))
    }

    pub(crate) fn write_timeout(&self) -> Option<Duration> {
        (self.write_timeout_ms > 0).then(|| Duration::from_millis(self.write_timeout_ms))
    }
}

/// Builder for ClientConfig
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the daemon socket path
    pub fn socket_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.socket_path = path.into();
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Set the alert type map file
    pub fn types_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.types_path = Some(path.into());
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}
