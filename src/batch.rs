//! Batch (response) decoding.
//!
//! The decompressed envelope payload holds one batch: an ordered list of
//! typed sub-messages plus fetch/ack bookkeeping the relay uses to drive
//! its polling loop. Wire order of the messages is meaningful and is
//! preserved.

use crate::cursor::ByteCursor;
use crate::Result;

/// Decoded batch of typed sub-messages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawBatch {
    /// Sub-messages in wire order.
    pub messages: Vec<RawMessage>,
    pub cursor: String,
    pub fetch_interval: String,
    pub server_timestamp: String,
    pub internal_ext: String,
    pub fetch_type: u32,
    pub heartbeat_duration: String,
    pub need_ack: bool,
    pub push_server: String,
    pub live_cursor: String,
    pub history_no_more: bool,
}

/// One typed sub-message: a method-name discriminator plus opaque payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawMessage {
    pub method: String,
    pub payload: Vec<u8>,
    pub msg_id: String,
    pub msg_type: u32,
    pub offset: String,
    pub need_wrds_store: bool,
    pub wrds_version: String,
    pub wrds_sub_key: String,
}

/// Decode a batch from (already decompressed) payload bytes.
pub fn decode_batch(data: &[u8]) -> Result<RawBatch> {
    let mut batch = RawBatch::default();
    let mut cursor = ByteCursor::new(data);

    cursor.scan_fields(|cur, field_number, _wire_type| {
        match field_number {
            1 => {
                let previous = cur.push_length_limit()?;
                let message = decode_message(cur)?;
                batch.messages.push(message);
                cur.pop_limit(previous);
            }
            2 => batch.cursor = cur.read_len_string()?,
            3 => batch.fetch_interval = cur.read_varint64_str(false)?,
            4 => batch.server_timestamp = cur.read_varint64_str(false)?,
            5 => batch.internal_ext = cur.read_len_string()?,
            6 => batch.fetch_type = cur.read_varint32()?,
            8 => batch.heartbeat_duration = cur.read_varint64_str(false)?,
            9 => batch.need_ack = cur.read_bool()?,
            10 => batch.push_server = cur.read_len_string()?,
            11 => batch.live_cursor = cur.read_len_string()?,
            12 => batch.history_no_more = cur.read_bool()?,
            _ => return Ok(false),
        }
        Ok(true)
    })?;

    Ok(batch)
}

/// Decode one sub-message within an already narrowed cursor scope.
fn decode_message(cursor: &mut ByteCursor<'_>) -> Result<RawMessage> {
    let mut message = RawMessage::default();

    cursor.scan_fields(|cur, field_number, _wire_type| {
        match field_number {
            1 => message.method = cur.read_len_string()?,
            2 => message.payload = cur.read_len_bytes()?,
            3 => message.msg_id = cur.read_varint64_str(false)?,
            4 => message.msg_type = cur.read_varint32()?,
            5 => message.offset = cur.read_varint64_str(false)?,
            6 => message.need_wrds_store = cur.read_bool()?,
            7 => message.wrds_version = cur.read_varint64_str(false)?,
            8 => message.wrds_sub_key = cur.read_len_string()?,
            _ => return Ok(false),
        }
        Ok(true)
    })?;

    Ok(message)
}
