//! Protocol Module
//!
//! Defines the wire protocol spoken with the system monitor daemon.
//!
//! ## Packet Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │ Op (1)   │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Op-codes
//! - 0x00: NULL
//! - 0x01: VERSION            - Payload: version (4)
//! - 0x02: ALERT_INSERT       - Payload: alert record
//! - 0x03: ALERT_SELECT       - Payload: filter string
//! - 0x04: ALERT_MARK_AS_READ - Payload: id (8)
//! - 0x05: ALERT_RECORD       - Payload: alert record
//! - 0xFF: RESULT             - Payload: result (1) + result data
//!
//! ### Result Codes
//! - 0x00: OK
//! - 0x01: VERSION_MISMATCH
//! - 0x02: ALERT_MATCHES      - followed by matches (4)

mod opcode;
mod field;
mod codec;
mod frame;

pub use opcode::{OpCode, ResultCode, PROTOCOL_VERSION};
pub use field::{Field, FieldSpec, FIELDS};
pub use codec::{decode_alert, encode_alert, PayloadReader, PayloadWriter};
pub use frame::{
    decode_packet, encode_packet, read_packet, write_packet, Packet, HEADER_SIZE,
    MAX_PAYLOAD_SIZE,
};
