//! Connection Handler
//!
//! Owns the daemon socket and moves whole packets across it.

use std::io::{BufReader, BufWriter};
use std::os::unix::net::UnixStream;

use crate::config::ClientConfig;
use crate::error::{Result, SysmonError};
use crate::protocol::{read_packet, write_packet, Packet};

/// A single socket connection to the daemon
pub(crate) struct Connection {
    /// Socket reader (buffered for efficiency)
    reader: BufReader<UnixStream>,

    /// Socket writer (buffered for efficiency)
    writer: BufWriter<UnixStream>,

    /// Socket path for logging
    peer: String,
}

impl Connection {
    /// Connect to the configured socket path
    ///
    /// A single attempt; any OS failure is returned with the path.
    pub fn open(config: &ClientConfig) -> Result<Self> {
        let path = &config.socket_path;
        let stream = UnixStream::connect(path).map_err(|source| SysmonError::Connection {
            path: path.clone(),
            source,
        })?;

        tracing::debug!("Connected to {}", path.display());
        Self::from_stream(stream, config, path.display().to_string())
    }

    /// Wrap an already connected stream
    ///
    /// Sets up buffered I/O and configures timeouts.
    pub fn from_stream(stream: UnixStream, config: &ClientConfig, peer: String) -> Result<Self> {
        stream.set_read_timeout(config.read_timeout())?;
        stream.set_write_timeout(config.write_timeout())?;

        // Clone stream for separate read/write handles
        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            peer,
        })
    }

    /// Send one packet
    pub fn send(&mut self, packet: &Packet) -> Result<()> {
        tracing::trace!(
            "Sending {} ({} bytes) to {}",
            packet.opcode,
            packet.payload_len(),
            self.peer
        );
        write_packet(&mut self.writer, packet)
    }

    /// Receive one packet, blocking until it is complete
    pub fn recv(&mut self) -> Result<Packet> {
        let packet = read_packet(&mut self.reader)?;
        tracing::trace!(
            "Received {} ({} bytes) from {}",
            packet.opcode,
            packet.payload_len(),
            self.peer
        );
        Ok(packet)
    }

    /// Get the peer description
    pub fn peer(&self) -> &str {
        &self.peer
    }
}
