//! Client Module
//!
//! The client half of the daemon protocol.
//!
//! ## Request Flow
//! Every operation is one request packet followed by a blocking read of its
//! response, if the operation defines one. Nothing is pipelined.
//!
//! ```text
//!   Idle ──send──▶ AwaitResponse ──recv──▶ Idle
//! ```
//!
//! - connect:       VERSION → RESULT(OK)
//! - submit_alert:  ALERT_INSERT (no response)
//! - query_alerts:  ALERT_SELECT → RESULT(ALERT_MATCHES, n) → ALERT_RECORD × n
//! - mark_as_read:  ALERT_MARK_AS_READ (no response)

mod connection;
mod shared;

pub use shared::SharedClient;

use std::os::unix::net::UnixStream;
use std::path::Path;

use crate::alert::{Alert, AlertTypeMap};
use crate::config::ClientConfig;
use crate::error::{Result, SysmonError};
use crate::protocol::{
    decode_alert, encode_alert, Field, OpCode, Packet, PayloadWriter, ResultCode, PROTOCOL_VERSION,
};

use connection::Connection;

/// Filter used when the caller wants every alert
pub const DEFAULT_FILTER: &str = "ORDER BY stamp";

/// A connected, handshaken client
///
/// Owns its socket exclusively; the socket closes when the client drops.
pub struct Client {
    conn: Connection,

    /// Alert type names, fixed for the life of the client
    types: AlertTypeMap,
}

impl Client {
    /// Connect to the daemon at `path` with default settings
    pub fn connect(path: impl AsRef<Path>) -> Result<Self> {
        let config = ClientConfig::builder()
            .socket_path(path.as_ref())
            .build();
        Self::connect_with(&config)
    }

    /// Load the type map, connect and perform the version handshake
    pub fn connect_with(config: &ClientConfig) -> Result<Self> {
        let types = match &config.types_path {
            Some(path) => AlertTypeMap::load(path)?,
            None => AlertTypeMap::new(),
        };

        let conn = Connection::open(config)?;
        Self::establish(conn, types)
    }

    /// Handshake over an already connected stream
    pub fn from_stream(stream: UnixStream, types: AlertTypeMap, config: &ClientConfig) -> Result<Self> {
        let conn = Connection::from_stream(stream, config, "stream".to_string())?;
        Self::establish(conn, types)
    }

    fn establish(conn: Connection, types: AlertTypeMap) -> Result<Self> {
        let mut client = Self { conn, types };
        client.version_exchange()?;
        Ok(client)
    }

    /// Send our protocol version and require `RESULT(OK)` back
    fn version_exchange(&mut self) -> Result<()> {
        let mut payload = PayloadWriter::new();
        payload.write_var(Field::Version, PROTOCOL_VERSION.into())?;
        self.conn.send(&Packet::new(OpCode::Version, payload.finish()))?;

        let (code, _) = self.conn.recv()?.into_result()?;
        match code {
            ResultCode::Ok => {
                tracing::debug!(
                    "Handshake with {} complete (version 0x{:08x})",
                    self.conn.peer(),
                    PROTOCOL_VERSION
                );
                Ok(())
            }
            ResultCode::VersionMismatch => {
                tracing::warn!(
                    "Daemon at {} rejected protocol version 0x{:08x}",
                    self.conn.peer(),
                    PROTOCOL_VERSION
                );
                Err(SysmonError::Handshake(format!(
                    "Protocol version mismatch (client 0x{:08x})",
                    PROTOCOL_VERSION
                )))
            }
            other => Err(SysmonError::Handshake(format!(
                "Unexpected result code: {}",
                other
            ))),
        }
    }

    // =========================================================================
    // Requests
    // =========================================================================

    /// Submit an alert for insertion
    ///
    /// The daemon does not answer inserts, so this returns once the packet
    /// is written.
    pub fn submit_alert(&mut self, alert: &Alert) -> Result<()> {
        let payload = encode_alert(alert)?;
        self.conn.send(&Packet::new(OpCode::AlertInsert, payload))?;

        tracing::debug!("Submitted alert type={} flags=0x{:08x}", alert.alert_type(), alert.flags());
        Ok(())
    }

    /// Fetch the alerts matching `filter`, in the daemon's order
    ///
    /// The filter is passed to the daemon untouched.
    pub fn query_alerts(&mut self, filter: &str) -> Result<Vec<Alert>> {
        let mut payload = PayloadWriter::new();
        payload.write_string(filter.as_bytes())?;
        self.conn.send(&Packet::new(OpCode::AlertSelect, payload.finish()))?;

        let (code, mut reader) = self.conn.recv()?.into_result()?;
        if code != ResultCode::AlertMatches {
            tracing::warn!("Alert select answered with result {}", code);
            return Err(SysmonError::UnexpectedResponse(format!(
                "Unexpected result code: expected {}, got {}",
                ResultCode::AlertMatches,
                code
            )));
        }
        let matches = reader.read_var(Field::Matches)? as usize;
        reader.finish()?;

        tracing::debug!("Alert select matches: {}", matches);

        let mut alerts = Vec::with_capacity(matches.min(1024));
        for _ in 0..matches {
            let packet = self.conn.recv()?;
            if packet.opcode != OpCode::AlertRecord {
                tracing::warn!("Expected {} packet, got {}", OpCode::AlertRecord, packet.opcode);
                return Err(SysmonError::UnexpectedResponse(format!(
                    "Unexpected op-code: expected {}, got {}",
                    OpCode::AlertRecord,
                    packet.opcode
                )));
            }
            alerts.push(decode_alert(packet.payload.unwrap_or_default())?);
        }

        Ok(alerts)
    }

    /// Fetch every alert, oldest first
    pub fn all_alerts(&mut self) -> Result<Vec<Alert>> {
        self.query_alerts(DEFAULT_FILTER)
    }

    /// Mark the alert with `id` as read
    ///
    /// Like inserts, this gets no answer from the daemon.
    pub fn mark_as_read(&mut self, id: u64) -> Result<()> {
        let mut payload = PayloadWriter::new();
        payload.write_var(Field::Id, id)?;
        self.conn.send(&Packet::new(OpCode::AlertMarkAsRead, payload.finish()))?;

        tracing::debug!("Marked alert #{} as read", id);
        Ok(())
    }

    pub fn mark_alert_as_read(&mut self, alert: &Alert) -> Result<()> {
        self.mark_as_read(alert.id())
    }

    // =========================================================================
    // Alert types
    // =========================================================================

    pub fn type_id_for_name(&self, name: &str) -> Option<u32> {
        self.types.type_id_for_name(name)
    }

    pub fn type_name_for_id(&self, id: u32) -> Option<&str> {
        self.types.type_name_for_id(id)
    }

    pub fn types(&self) -> &AlertTypeMap {
        &self.types
    }
}
