//! Packet framing
//!
//! Encoding and decoding of the envelope that wraps every message.
//!
//! ## Wire Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │ Op (1)   │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! `Len` counts payload bytes only and is big-endian. A zero length means
//! the packet carries no payload.

use std::io::{ErrorKind, Read, Write};

use bytes::Bytes;

use super::field::Field;
use super::opcode::{OpCode, ResultCode};
use super::codec::PayloadReader;
use crate::error::{Result, SysmonError};

/// Header size: 1 byte op-code + 4 bytes length
pub const HEADER_SIZE: usize = 5;

/// Maximum payload size (16 MB)
pub const MAX_PAYLOAD_SIZE: u32 = 16 * 1024 * 1024;

/// One framed message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub opcode: OpCode,

    /// Payload bytes, `None` when the length is zero
    pub payload: Option<Bytes>,
}

impl Packet {
    /// Create a packet, normalizing an empty payload to `None`
    pub fn new(opcode: OpCode, payload: Bytes) -> Self {
        let payload = (!payload.is_empty()).then_some(payload);
        Self { opcode, payload }
    }

    /// Create a packet with no payload
    pub fn empty(opcode: OpCode) -> Self {
        Self {
            opcode,
            payload: None,
        }
    }

    /// Create a `RESULT` packet: code byte followed by optional extra data
    pub fn result(code: ResultCode, extra: &[u8]) -> Self {
        let mut payload = Vec::with_capacity(1 + extra.len());
        payload.push(code.into());
        payload.extend_from_slice(extra);
        Self::new(OpCode::Result, Bytes::from(payload))
    }

    pub fn payload_len(&self) -> usize {
        self.payload.as_ref().map_or(0, Bytes::len)
    }

    /// Reader over the payload (empty when there is none)
    pub fn reader(&self) -> PayloadReader {
        PayloadReader::new(self.payload.clone().unwrap_or_default())
    }

    /// Interpret this packet as a `RESULT`
    ///
    /// Returns the result code and a reader positioned after it.
    pub fn into_result(self) -> Result<(ResultCode, PayloadReader)> {
        if self.opcode != OpCode::Result {
            return Err(SysmonError::UnexpectedResponse(format!(
                "Unexpected op-code: expected {}, got {}",
                OpCode::Result,
                self.opcode
            )));
        }

        let mut reader = self.reader();
        if reader.remaining() < Field::Result.width() {
            return Err(SysmonError::UnexpectedResponse(
                "RESULT packet without a result code".to_string(),
            ));
        }
        let code = ResultCode::from(reader.read_var(Field::Result)? as u8);
        Ok((code, reader))
    }
}

// =============================================================================
// Buffer Encoding/Decoding
// =============================================================================

/// Encode a packet to bytes
///
/// Format: opcode (1) + payload_len (4) + payload
pub fn encode_packet(packet: &Packet) -> Vec<u8> {
    let payload = packet.payload.as_deref().unwrap_or(&[]);

    let mut message = Vec::with_capacity(HEADER_SIZE + payload.len());
    message.push(packet.opcode as u8);
    message.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    message.extend_from_slice(payload);

    message
}

/// Decode a packet from bytes
///
/// The buffer must hold exactly one packet.
pub fn decode_packet(bytes: &[u8]) -> Result<Packet> {
    if bytes.len() < HEADER_SIZE {
        return Err(SysmonError::ConnectionClosed {
            expected: HEADER_SIZE,
            received: bytes.len(),
        });
    }

    let (opcode, payload_len) = parse_header(&bytes[..HEADER_SIZE])?;

    let total_len = HEADER_SIZE + payload_len;
    if bytes.len() < total_len {
        return Err(SysmonError::ConnectionClosed {
            expected: payload_len,
            received: bytes.len() - HEADER_SIZE,
        });
    }
    if bytes.len() > total_len {
        return Err(SysmonError::MalformedPayload(format!(
            "{} bytes after packet end",
            bytes.len() - total_len
        )));
    }

    let payload = Bytes::copy_from_slice(&bytes[HEADER_SIZE..total_len]);
    Ok(Packet::new(opcode, payload))
}

fn parse_header(header: &[u8]) -> Result<(OpCode, usize)> {
    let opcode = OpCode::try_from(header[0])?;
    let payload_len = u32::from_be_bytes([header[1], header[2], header[3], header[4]]);

    if payload_len > MAX_PAYLOAD_SIZE {
        return Err(SysmonError::PayloadTooLarge {
            len: payload_len as usize,
            max: MAX_PAYLOAD_SIZE as usize,
        });
    }

    Ok((opcode, payload_len as usize))
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read a complete packet from a stream
///
/// Blocks until the header and the full payload have arrived. A stream that
/// ends early fails with `ConnectionClosed`, never a truncated packet.
pub fn read_packet<R: Read>(reader: &mut R) -> Result<Packet> {
    let mut header = [0u8; HEADER_SIZE];
    read_full(reader, &mut header)?;

    let (opcode, payload_len) = parse_header(&header)?;

    if payload_len == 0 {
        return Ok(Packet::empty(opcode));
    }

    let mut payload = vec![0u8; payload_len];
    read_full(reader, &mut payload)?;

    Ok(Packet::new(opcode, Bytes::from(payload)))
}

/// Write a packet to a stream
pub fn write_packet<W: Write>(writer: &mut W, packet: &Packet) -> Result<()> {
    let bytes = encode_packet(packet);
    writer.write_all(&bytes).map_err(map_io("write"))?;
    writer.flush().map_err(map_io("write"))?;
    Ok(())
}

/// Fill `buf` completely, looping over partial reads
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<()> {
    let mut filled = 0;

    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => {
                return Err(SysmonError::ConnectionClosed {
                    expected: buf.len(),
                    received: filled,
                })
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(map_io("read")(e)),
        }
    }

    Ok(())
}

/// Map socket timeouts to `Timeout`, everything else to `Io`
///
/// Unix sockets report an expired timeout as `WouldBlock`.
fn map_io(during: &'static str) -> impl Fn(std::io::Error) -> SysmonError {
    move |e| match e.kind() {
        ErrorKind::WouldBlock | ErrorKind::TimedOut => SysmonError::Timeout(during),
        _ => SysmonError::Io(e),
    }
}
