//! Outer envelope decoding.
//!
//! Every WebSocket data frame from the feed carries one envelope: routing
//! identifiers, a small string-to-string header map and an opaque payload
//! that holds the (possibly gzip-compressed) message batch. The envelope
//! is the first of the three wire layers; see [`crate::batch`] for the
//! second and [`crate::messages`] for the third.

use crate::cursor::ByteCursor;
use crate::Result;
use std::collections::HashMap;

/// Decoded outer envelope of one incoming frame.
///
/// The numeric identifiers are 64-bit-range varints carried as decimal
/// strings because their magnitude can exceed what downstream JSON
/// consumers represent exactly. Immutable after construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFrame {
    pub sequence_id: String,
    pub log_id: String,
    pub service_id: String,
    pub method_id: String,
    /// Header map; keys are unique, insertion order is irrelevant.
    pub headers: HashMap<String, String>,
    pub payload_encoding: String,
    pub payload_type: String,
    /// Opaque batch payload, compressed when the headers say so.
    pub payload: Vec<u8>,
    pub log_id_new: String,
}

/// Decode the outer envelope structure from raw frame bytes.
///
/// Unknown field numbers are skipped; a field number of 0 ends decoding
/// immediately. Errors surface only on structural corruption (truncated
/// varints, reads past the limit), which the caller treats as "no event".
pub fn decode_frame(data: &[u8]) -> Result<RawFrame> {
    let mut frame = RawFrame::default();
    let mut cursor = ByteCursor::new(data);

    cursor.scan_fields(|cur, field_number, _wire_type| {
        match field_number {
            1 => frame.sequence_id = cur.read_varint64_str(false)?,
            2 => frame.log_id = cur.read_varint64_str(false)?,
            3 => frame.service_id = cur.read_varint64_str(false)?,
            4 => frame.method_id = cur.read_varint64_str(false)?,
            5 => {
                let previous = cur.push_length_limit()?;
                let (key, value) = decode_header_entry(cur)?;
                if !key.is_empty() && !value.is_empty() {
                    frame.headers.insert(key, value);
                }
                cur.pop_limit(previous);
            }
            6 => frame.payload_encoding = cur.read_len_string()?,
            7 => frame.payload_type = cur.read_len_string()?,
            8 => frame.payload = cur.read_len_bytes()?,
            9 => frame.log_id_new = cur.read_len_string()?,
            _ => return Ok(false),
        }
        Ok(true)
    })?;

    Ok(frame)
}

/// One repeated key/value entry of the envelope's header map.
fn decode_header_entry(cursor: &mut ByteCursor<'_>) -> Result<(String, String)> {
    let mut key = String::new();
    let mut value = String::new();

    cursor.scan_fields(|cur, field_number, _wire_type| {
        match field_number {
            1 => key = cur.read_len_string()?,
            2 => value = cur.read_len_string()?,
            _ => return Ok(false),
        }
        Ok(true)
    })?;

    Ok((key, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::WireWriter;
    use crate::WireError;

    fn encode_frame(headers: &[(&str, &str)], payload: &[u8]) -> Vec<u8> {
        let mut writer = WireWriter::new();
        writer.varint_field(1, 101);
        writer.varint_field(2, 202);
        writer.varint_field(3, 303);
        writer.varint_field(4, 404);
        for (key, value) in headers {
            writer.message_field(5, |entry| {
                entry.string_field(1, key).string_field(2, value);
            });
        }
        writer.string_field(6, "pb");
        writer.string_field(7, "msg");
        writer.bytes_field(8, payload);
        writer.string_field(9, "log-new");
        writer.into_bytes()
    }

    #[test]
    fn decodes_all_known_fields() {
        let data = encode_frame(&[("compress_type", "gzip")], b"batch-bytes");
        let frame = decode_frame(&data).unwrap();

        assert_eq!(frame.sequence_id, "101");
        assert_eq!(frame.log_id, "202");
        assert_eq!(frame.service_id, "303");
        assert_eq!(frame.method_id, "404");
        assert_eq!(frame.headers.get("compress_type").map(String::as_str), Some("gzip"));
        assert_eq!(frame.payload_encoding, "pb");
        assert_eq!(frame.payload_type, "msg");
        assert_eq!(frame.payload, b"batch-bytes");
        assert_eq!(frame.log_id_new, "log-new");
    }

    #[test]
    fn multiple_header_entries_accumulate() {
        let data = encode_frame(&[("a", "1"), ("b", "2")], b"");
        let frame = decode_frame(&data).unwrap();
        assert_eq!(frame.headers.len(), 2);
        assert_eq!(frame.headers["a"], "1");
        assert_eq!(frame.headers["b"], "2");
    }

    #[test]
    fn empty_header_key_or_value_is_dropped() {
        let data = encode_frame(&[("", "x"), ("y", "")], b"");
        let frame = decode_frame(&data).unwrap();
        assert!(frame.headers.is_empty());
    }

    #[test]
    fn unknown_fields_are_skipped() {
        let mut writer = WireWriter::new();
        writer.varint_field(50, 9999);
        writer.string_field(51, "future");
        writer.bytes_field(8, b"payload");
        let frame = decode_frame(&writer.into_bytes()).unwrap();
        assert_eq!(frame.payload, b"payload");
    }

    #[test]
    fn field_number_zero_ends_decoding() {
        let mut writer = WireWriter::new();
        writer.varint_field(1, 7);
        writer.byte(0x00); // field 0 sentinel
        writer.bytes(&[0xff, 0xff, 0xff]); // garbage that must not be read
        let frame = decode_frame(&writer.into_bytes()).unwrap();
        assert_eq!(frame.sequence_id, "7");
        assert!(frame.payload.is_empty());
    }

    #[test]
    fn empty_input_yields_empty_frame() {
        let frame = decode_frame(&[]).unwrap();
        assert_eq!(frame, RawFrame::default());
    }

    #[test]
    fn truncated_payload_is_bounds_error() {
        let mut writer = WireWriter::new();
        writer.tag(8, 2).varint(100); // declares 100 payload bytes
        writer.bytes(b"short");
        assert!(matches!(decode_frame(&writer.into_bytes()), Err(WireError::Bounds { .. })));
    }
}
