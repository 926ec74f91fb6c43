//! Op-code and result code definitions
//!
//! Tags carried in the packet header and in `RESULT` payloads.

use std::fmt;

use crate::error::{Result, SysmonError};

/// Compatibility token exchanged during the handshake
pub const PROTOCOL_VERSION: u32 = 0x2014_1112;

/// Packet op-codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OpCode {
    Null = 0x00,
    Version = 0x01,
    AlertInsert = 0x02,
    AlertSelect = 0x03,
    AlertMarkAsRead = 0x04,
    AlertRecord = 0x05,
    Result = 0xFF,
}

impl TryFrom<u8> for OpCode {
    type Error = SysmonError;

    fn try_from(byte: u8) -> Result<Self> {
        match byte {
            0x00 => Ok(OpCode::Null),
            0x01 => Ok(OpCode::Version),
            0x02 => Ok(OpCode::AlertInsert),
            0x03 => Ok(OpCode::AlertSelect),
            0x04 => Ok(OpCode::AlertMarkAsRead),
            0x05 => Ok(OpCode::AlertRecord),
            0xFF => Ok(OpCode::Result),
            _ => Err(SysmonError::UnexpectedResponse(format!(
                "Unknown op-code: 0x{:02x}",
                byte
            ))),
        }
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OpCode::Null => "NULL",
            OpCode::Version => "VERSION",
            OpCode::AlertInsert => "ALERT_INSERT",
            OpCode::AlertSelect => "ALERT_SELECT",
            OpCode::AlertMarkAsRead => "ALERT_MARK_AS_READ",
            OpCode::AlertRecord => "ALERT_RECORD",
            OpCode::Result => "RESULT",
        };
        f.write_str(name)
    }
}

/// Result codes carried as the first payload byte of a `RESULT` packet
///
/// Unknown bytes are kept as `Other` so callers can report them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultCode {
    Ok,
    VersionMismatch,
    AlertMatches,
    Other(u8),
}

impl From<u8> for ResultCode {
    fn from(byte: u8) -> Self {
        match byte {
            0x00 => ResultCode::Ok,
            0x01 => ResultCode::VersionMismatch,
            0x02 => ResultCode::AlertMatches,
            other => ResultCode::Other(other),
        }
    }
}

impl From<ResultCode> for u8 {
    fn from(code: ResultCode) -> u8 {
        match code {
            ResultCode::Ok => 0x00,
            ResultCode::VersionMismatch => 0x01,
            ResultCode::AlertMatches => 0x02,
            ResultCode::Other(byte) => byte,
        }
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultCode::Ok => f.write_str("OK"),
            ResultCode::VersionMismatch => f.write_str("VERSION_MISMATCH"),
            ResultCode::AlertMatches => f.write_str("ALERT_MATCHES"),
            ResultCode::Other(byte) => write!(f, "0x{:02x}", byte),
        }
    }
}
