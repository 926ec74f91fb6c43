//! # sysmon
//!
//! Client for the system monitor daemon's alert protocol:
//! - Submit alerts
//! - Query stored alerts with a daemon-side filter
//! - Mark alerts as read
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Client                                │
//! │        (handshake, submit / query / mark-as-read)            │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │   Packet    │          │    Alert    │
//!   │   Framer    │          │   Record    │
//!   └──────┬──────┘          └──────┬──────┘
//!          │                        │
//!          └───────────┬────────────┘
//!                      ▼
//!              ┌─────────────┐
//!              │ Field Codec │
//!              └──────┬──────┘
//!                     │
//!                     ▼
//!          Unix domain socket (daemon)
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod alert;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, SysmonError};
pub use config::{ClientConfig, DEFAULT_SOCKET_PATH};
pub use alert::{Alert, AlertFlags, AlertTypeMap, Level};
pub use client::{Client, SharedClient};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of the sysmon client
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
