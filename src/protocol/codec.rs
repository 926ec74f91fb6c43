//! Payload codec
//!
//! Field-level encoding and decoding of packet payloads.
//!
//! ## Alert Record Layout
//! ```text
//! ┌────────┬───────────┬───────────┬──────────┬──────────┬───────────┐
//! │ id (8) │ stamp (4) │ flags (4) │ type (4) │ user (4) │ groups(1) │
//! └────────┴───────────┴───────────┴──────────┴──────────┴───────────┘
//! ┌──────────────────┬──────────────┬──────────────┬─────────────────┐
//! │ group (4) × N    │ uuid (1 + n) │ icon (1 + n) │ desc (1 + n)    │
//! └──────────────────┴──────────────┴──────────────┴─────────────────┘
//! ```
//!
//! All integers are big-endian. The id is split into two u32 words, high
//! word first. Strings carry a one-byte length prefix; an absent string is
//! written as length 0.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use super::field::Field;
use crate::alert::Alert;
use crate::error::{Result, SysmonError};

// =============================================================================
// Writer
// =============================================================================

/// Appends fields to a payload buffer
#[derive(Debug, Default)]
pub struct PayloadWriter {
    buf: BytesMut,
}

impl PayloadWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an integer field using the field's catalog width
    ///
    /// Fails with `FieldOverflow` if the value does not fit.
    pub fn write_var(&mut self, field: Field, value: u64) -> Result<()> {
        if value > field.max_value() {
            return Err(SysmonError::FieldOverflow {
                field: field.name(),
                len: value as usize,
                max: field.max_value() as usize,
            });
        }

        match field.width() {
            1 => self.buf.put_u8(value as u8),
            4 => self.buf.put_u32(value as u32),
            _ => {
                self.buf.put_u32((value >> 32) as u32);
                self.buf.put_u32(value as u32);
            }
        }
        Ok(())
    }

    /// Append a length-prefixed short string
    pub fn write_string(&mut self, value: &[u8]) -> Result<()> {
        let max = Field::String.max_value() as usize;
        if value.len() > max {
            return Err(SysmonError::FieldOverflow {
                field: Field::String.name(),
                len: value.len(),
                max,
            });
        }

        self.buf.put_u8(value.len() as u8);
        self.buf.put_slice(value);
        Ok(())
    }

    /// Append a complete alert record
    pub fn write_alert(&mut self, alert: &Alert) -> Result<()> {
        let groups = alert.groups();
        let max_groups = Field::Groups.max_value() as usize;
        if groups.len() > max_groups {
            return Err(SysmonError::FieldOverflow {
                field: Field::Groups.name(),
                len: groups.len(),
                max: max_groups,
            });
        }

        self.write_var(Field::Id, alert.id())?;
        self.write_var(Field::Stamp, alert.stamp().into())?;
        self.write_var(Field::Flags, alert.flags().into())?;
        self.write_var(Field::Type, alert.alert_type().into())?;
        self.write_var(Field::User, alert.user().into())?;

        self.write_var(Field::Groups, groups.len() as u64)?;
        for &gid in groups {
            self.write_var(Field::Group, gid.into())?;
        }

        self.write_string(alert.uuid().unwrap_or_default().as_bytes())?;
        self.write_string(alert.icon().unwrap_or_default().as_bytes())?;
        self.write_string(alert.description().unwrap_or_default().as_bytes())?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Freeze the buffer into a payload
    pub fn finish(self) -> Bytes {
        self.buf.freeze()
    }
}

// =============================================================================
// Reader
// =============================================================================

/// Consumes fields from a received payload
#[derive(Debug)]
pub struct PayloadReader {
    buf: Bytes,
}

impl PayloadReader {
    pub fn new(payload: Bytes) -> Self {
        Self { buf: payload }
    }

    /// Read an integer field using the field's catalog width
    pub fn read_var(&mut self, field: Field) -> Result<u64> {
        self.ensure(field.width(), field.name())?;

        let value = match field.width() {
            1 => self.buf.get_u8() as u64,
            4 => self.buf.get_u32() as u64,
            _ => {
                let high = self.buf.get_u32() as u64;
                let low = self.buf.get_u32() as u64;
                (high << 32) | low
            }
        };
        Ok(value)
    }

    /// Read a length-prefixed short string
    ///
    /// A body that is not valid UTF-8 fails with `MalformedPayload`.
    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read_var(Field::String)? as usize;
        self.ensure(len, "string body")?;

        let raw = self.buf.split_to(len);
        String::from_utf8(raw.to_vec())
            .map_err(|e| SysmonError::MalformedPayload(format!("string body: {}", e)))
    }

    /// Read a complete alert record
    pub fn read_alert(&mut self) -> Result<Alert> {
        let id = self.read_var(Field::Id)?;
        let stamp = self.read_var(Field::Stamp)? as u32;
        let flags = self.read_var(Field::Flags)? as u32;
        let alert_type = self.read_var(Field::Type)? as u32;
        let user = self.read_var(Field::User)? as u32;

        let count = self.read_var(Field::Groups)? as usize;
        let mut groups = Vec::with_capacity(count);
        for _ in 0..count {
            groups.push(self.read_var(Field::Group)? as u32);
        }

        let uuid = non_empty(self.read_string()?);
        let icon = non_empty(self.read_string()?);
        let description = non_empty(self.read_string()?);

        Ok(Alert {
            id,
            stamp,
            flags,
            alert_type,
            user,
            groups,
            uuid,
            icon,
            description,
        })
    }

    /// Bytes not yet consumed
    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    /// Fail if any bytes are left over
    pub fn finish(self) -> Result<()> {
        if self.buf.has_remaining() {
            return Err(SysmonError::MalformedPayload(format!(
                "{} trailing bytes",
                self.buf.remaining()
            )));
        }
        Ok(())
    }

    fn ensure(&self, needed: usize, what: &str) -> Result<()> {
        if self.buf.remaining() < needed {
            return Err(SysmonError::MalformedPayload(format!(
                "{}: expected {} bytes, {} left",
                what,
                needed,
                self.buf.remaining()
            )));
        }
        Ok(())
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

// =============================================================================
// Whole-record helpers
// =============================================================================

/// Encode an alert record into a payload
pub fn encode_alert(alert: &Alert) -> Result<Bytes> {
    let mut writer = PayloadWriter::new();
    writer.write_alert(alert)?;
    Ok(writer.finish())
}

/// Decode a payload that holds exactly one alert record
pub fn decode_alert(payload: Bytes) -> Result<Alert> {
    let mut reader = PayloadReader::new(payload);
    let alert = reader.read_alert()?;
    reader.finish()?;
    Ok(alert)
}
