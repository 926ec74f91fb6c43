//! Codec Tests
//!
//! Tests for field and alert record encoding/decoding.

use bytes::Bytes;
use sysmon::protocol::{decode_alert, encode_alert, Field, PayloadReader, PayloadWriter};
use sysmon::{Alert, AlertFlags, SysmonError};

// =============================================================================
// Helper Functions
// =============================================================================

fn sample_alert() -> Alert {
    let mut alert = Alert::new();
    alert
        .set_id(42)
        .set_stamp(Some(1_415_750_400))
        .set_flag(AlertFlags::LVL_WARN)
        .set_flag(AlertFlags::FLG_PERSIST)
        .set_type(7)
        .set_user(1000)
        .add_group(1000)
        .add_group(10)
        .set_uuid("0a:00:27:00:00:00")
        .set_icon("firewall_incoming")
        .set_description("This is an example alert description!");
    alert
}

// =============================================================================
// Alert Record Tests
// =============================================================================

#[test]
fn test_alert_round_trip() {
    let alert = sample_alert();
    let decoded = decode_alert(encode_alert(&alert).unwrap()).unwrap();
    assert_eq!(decoded, alert);
}

#[test]
fn test_alert_round_trip_id_extremes() {
    for id in [0, 1, u32::MAX as u64, 1 << 32, u64::MAX] {
        let mut alert = sample_alert();
        alert.set_id(id);
        let decoded = decode_alert(encode_alert(&alert).unwrap()).unwrap();
        assert_eq!(decoded.id(), id);
    }
}

#[test]
fn test_alert_round_trip_every_flag_bit() {
    for bit in 0..32 {
        let mut alert = sample_alert();
        alert.set_flags(1 << bit);
        let decoded = decode_alert(encode_alert(&alert).unwrap()).unwrap();
        assert_eq!(decoded.flags(), 1 << bit);
    }

    let mut alert = sample_alert();
    alert.set_flags(u32::MAX);
    let decoded = decode_alert(encode_alert(&alert).unwrap()).unwrap();
    assert_eq!(decoded.flags(), u32::MAX);
}

#[test]
fn test_alert_round_trip_minimal() {
    let mut alert = Alert::new();
    alert.set_user(0).set_stamp(Some(0));
    let encoded = encode_alert(&alert).unwrap();

    // 8 + 4 * 4 + 1 group count + 3 empty strings
    assert_eq!(encoded.len(), 28);

    let decoded = decode_alert(encoded).unwrap();
    assert_eq!(decoded, alert);
    assert!(decoded.groups().is_empty());
    assert_eq!(decoded.uuid(), None);
    assert_eq!(decoded.icon(), None);
    assert_eq!(decoded.description(), None);
}

#[test]
fn test_alert_groups_keep_order_and_duplicates() {
    let mut alert = sample_alert();
    alert.clear_groups().add_group(5).add_group(3).add_group(5);
    let decoded = decode_alert(encode_alert(&alert).unwrap()).unwrap();
    assert_eq!(decoded.groups(), &[5, 3, 5]);
}

#[test]
fn test_alert_max_groups() {
    let mut alert = sample_alert();
    alert.clear_groups();
    for gid in 0..255 {
        alert.add_group(gid);
    }
    let decoded = decode_alert(encode_alert(&alert).unwrap()).unwrap();
    assert_eq!(decoded.groups().len(), 255);

    alert.add_group(255);
    let err = encode_alert(&alert).unwrap_err();
    assert!(matches!(
        err,
        SysmonError::FieldOverflow { field: "groups", len: 256, max: 255 }
    ));
}

#[test]
fn test_alert_long_description_rejected() {
    let mut alert = sample_alert();
    alert.set_description("x".repeat(255));
    assert!(encode_alert(&alert).is_ok());

    alert.set_description("x".repeat(256));
    let err = encode_alert(&alert).unwrap_err();
    assert!(matches!(err, SysmonError::FieldOverflow { field: "string", .. }));
}

// =============================================================================
// Wire Format Verification Tests
// =============================================================================

#[test]
fn test_wire_format_alert() {
    let mut alert = Alert::new();
    alert
        .set_id(0x0102_0304_0506_0708)
        .set_stamp(Some(0x1122_3344))
        .set_flags(0x0000_0201)
        .set_type(9)
        .set_user(1000)
        .add_group(0x0A0B_0C0D)
        .set_uuid("u")
        .set_description("hi");

    let encoded = encode_alert(&alert).unwrap();

    assert_eq!(&encoded[0..8], &[1, 2, 3, 4, 5, 6, 7, 8]); // id, high word first
    assert_eq!(&encoded[8..12], &[0x11, 0x22, 0x33, 0x44]); // stamp
    assert_eq!(&encoded[12..16], &[0x00, 0x00, 0x02, 0x01]); // flags
    assert_eq!(&encoded[16..20], &[0, 0, 0, 9]); // type
    assert_eq!(&encoded[20..24], &[0x00, 0x00, 0x03, 0xE8]); // user
    assert_eq!(encoded[24], 1); // group count
    assert_eq!(&encoded[25..29], &[0x0A, 0x0B, 0x0C, 0x0D]); // group
    assert_eq!(&encoded[29..31], &[1, b'u']); // uuid
    assert_eq!(encoded[31], 0); // icon absent
    assert_eq!(&encoded[32..35], &[2, b'h', b'i']); // description
    assert_eq!(encoded.len(), 35);
}

#[test]
fn test_id_split_into_words() {
    let mut writer = PayloadWriter::new();
    writer.write_var(Field::Id, u64::MAX).unwrap();
    let bytes = writer.finish();
    assert_eq!(&bytes[..], &[0xFF; 8]);

    let mut reader = PayloadReader::new(bytes);
    assert_eq!(reader.read_var(Field::Id).unwrap(), 0xFFFF_FFFF_FFFF_FFFF);
    reader.finish().unwrap();
}

// =============================================================================
// Field Tests
// =============================================================================

#[test]
fn test_write_var_overflow() {
    let mut writer = PayloadWriter::new();
    assert!(writer.write_var(Field::Result, 255).is_ok());
    assert!(matches!(
        writer.write_var(Field::Result, 256),
        Err(SysmonError::FieldOverflow { field: "result", .. })
    ));
    assert!(matches!(
        writer.write_var(Field::Stamp, u32::MAX as u64 + 1),
        Err(SysmonError::FieldOverflow { field: "stamp", .. })
    ));
    assert_eq!(writer.len(), 1);
}

#[test]
fn test_string_round_trip() {
    let mut writer = PayloadWriter::new();
    writer.write_string(b"ORDER BY stamp").unwrap();
    writer.write_string(b"").unwrap();
    assert_eq!(writer.len(), 1 + 14 + 1);

    let mut reader = PayloadReader::new(writer.finish());
    assert_eq!(reader.read_string().unwrap(), "ORDER BY stamp");
    assert_eq!(reader.read_string().unwrap(), "");
    reader.finish().unwrap();
}

#[test]
fn test_invalid_utf8_rejected() {
    let mut reader = PayloadReader::new(Bytes::from_static(&[2, 0xFF, b'a']));
    let result = reader.read_string();
    assert!(matches!(result, Err(SysmonError::MalformedPayload(_))));
}

#[test]
fn test_alert_with_invalid_utf8_description_rejected() {
    let mut payload = encode_alert(&sample_alert()).unwrap().to_vec();

    // Description is the last field: replace it with a 2-byte invalid body
    let desc_len = sample_alert().description().unwrap().len();
    payload.truncate(payload.len() - desc_len - 1);
    payload.extend_from_slice(&[2, 0xC3, 0x28]);

    let result = decode_alert(Bytes::from(payload));
    assert!(matches!(result, Err(SysmonError::MalformedPayload(_))));
}

// =============================================================================
// Error Handling Tests
// =============================================================================

#[test]
fn test_truncated_alert_payload() {
    let encoded = encode_alert(&sample_alert()).unwrap();

    for cut in [0, 4, 8, 25, encoded.len() - 1] {
        let result = decode_alert(encoded.slice(..cut));
        assert!(
            matches!(result, Err(SysmonError::MalformedPayload(_))),
            "cut at {} should fail",
            cut
        );
    }
}

#[test]
fn test_string_length_past_end() {
    let mut reader = PayloadReader::new(Bytes::from_static(&[10, b'a', b'b']));
    let err = reader.read_string().unwrap_err();
    assert!(err.to_string().contains("string body"));
}

#[test]
fn test_trailing_bytes_rejected() {
    let mut bytes = encode_alert(&sample_alert()).unwrap().to_vec();
    bytes.push(0);
    let err = decode_alert(Bytes::from(bytes)).unwrap_err();
    assert!(err.to_string().contains("trailing"));
}
