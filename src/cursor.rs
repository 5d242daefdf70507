//! Bounded byte cursor and primitive wire codec.
//!
//! [`ByteCursor`] is the foundation of every decode layer: a cursor over a
//! fixed byte buffer with an adjustable upper bound (the *limit*). Reads
//! never pass the limit; length-delimited sub-messages are decoded by
//! temporarily narrowing it via [`ByteCursor::push_length_limit`] and
//! restoring the previous value afterwards.
//!
//! The invariant `0 <= offset <= limit <= data.len()` holds at all times.
//! Any read that would violate it fails with [`WireError::Bounds`].
//!
//! ## Field scanning
//!
//! All message decoders in this crate are built on
//! [`ByteCursor::scan_fields`], a single generic tag loop: it reads
//! `(field_number, wire_type)` pairs, stops at field number 0 (the
//! end-of-stream sentinel), hands known fields to a per-message handler
//! and skips everything the handler declines. This keeps the tolerant
//! skip-unknown behavior in one place instead of one loop per message
//! kind.

use crate::{Result, WireError};

/// Maximum encoded length of a varint before decoding gives up.
///
/// Guards against unbounded work on corrupt input where the continuation
/// bit never clears.
pub const MAX_VARINT_BYTES: usize = 10;

/// Wire type of an encoded field, taken from the low three bits of its tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireType {
    /// Variable-length integer (LEB128).
    Varint,
    /// Fixed 8-byte value, little-endian.
    Fixed64,
    /// Length prefix followed by that many bytes of nested content.
    LengthDelimited,
    /// Deprecated group start marker; skipped recursively.
    StartGroup,
    /// Deprecated group end marker.
    EndGroup,
    /// Fixed 4-byte value, little-endian.
    Fixed32,
}

impl WireType {
    /// Extract the wire type from a raw field tag.
    pub fn from_tag(tag: u32) -> Result<Self> {
        match tag & 0x7 {
            0 => Ok(WireType::Varint),
            1 => Ok(WireType::Fixed64),
            2 => Ok(WireType::LengthDelimited),
            3 => Ok(WireType::StartGroup),
            4 => Ok(WireType::EndGroup),
            5 => Ok(WireType::Fixed32),
            other => Err(WireError::InvalidWireType { value: other as u8 }),
        }
    }
}

/// Cursor over a fixed byte buffer with bounded reads.
///
/// Owned exclusively by the decode call that created it; the borrowed
/// buffer never escapes.
#[derive(Debug)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    offset: usize,
    limit: usize,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor over the full buffer.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0, limit: data.len() }
    }

    /// Current read position.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Current upper bound for reads.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// True once the cursor has consumed everything up to the limit.
    pub fn at_end(&self) -> bool {
        self.offset >= self.limit
    }

    /// Advance past `count` bytes, returning the previous offset.
    fn advance(&mut self, count: usize) -> Result<usize> {
        let start = self.offset;
        if count > self.limit.saturating_sub(self.offset) {
            return Err(WireError::bounds(start, count, self.limit));
        }
        self.offset += count;
        Ok(start)
    }

    /// Read a single byte.
    pub fn read_byte(&mut self) -> Result<u8> {
        let at = self.advance(1)?;
        Ok(self.data[at])
    }

    /// Read a borrowed view of the next `count` bytes.
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        let at = self.advance(count)?;
        Ok(&self.data[at..at + count])
    }

    /// Read a varint-encoded boolean (any non-zero byte is true).
    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_byte()? != 0)
    }

    /// Decode an unsigned LEB128 varint into 32 bits.
    ///
    /// Bits beyond 32 are deliberately truncated, matching the upstream
    /// feed's decoder. Fails with [`WireError::Bounds`] if the buffer runs
    /// out before the continuation bit clears, and with
    /// [`WireError::MalformedVarint`] after [`MAX_VARINT_BYTES`] bytes.
    pub fn read_varint32(&mut self) -> Result<u32> {
        let mut value: u32 = 0;
        let mut shift: u32 = 0;
        for _ in 0..MAX_VARINT_BYTES {
            let byte = self.read_byte()?;
            if shift < 32 {
                value |= u32::from(byte & 0x7f) << shift;
            }
            shift += 7;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(WireError::MalformedVarint { max_bytes: MAX_VARINT_BYTES })
    }

    /// Decode a 64-bit-range varint and render it as a decimal string.
    ///
    /// Identifiers on this wire routinely exceed what downstream JSON
    /// consumers can represent exactly, so they are carried as strings.
    /// The value is accumulated in three sub-32-bit chunks and combined
    /// into exact 32-bit halves; `signed` renders the two's-complement
    /// interpretation. A varint whose continuation bit is still set on the
    /// tenth byte stops there, matching the upstream decoder.
    pub fn read_varint64_str(&mut self, signed: bool) -> Result<String> {
        let mut parts = [0u32; 3];
        for i in 0..MAX_VARINT_BYTES {
            let byte = self.read_byte()?;
            let bits = u32::from(byte & 0x7f);
            match i {
                0..=3 => parts[0] |= bits << (7 * i),
                4..=7 => parts[1] |= bits << (7 * (i - 4)),
                _ => parts[2] |= bits << (7 * (i - 8)),
            }
            if byte & 0x80 == 0 {
                break;
            }
        }

        let low = parts[0] | (parts[1] << 28);
        let high = (parts[1] >> 4) | (parts[2] << 24);
        let value = (u64::from(high) << 32) | u64::from(low);

        if signed {
            Ok((value as i64).to_string())
        } else {
            Ok(value.to_string())
        }
    }

    /// Read `count` bytes and decode them as UTF-8, leniently.
    ///
    /// Structurally invalid sequences become U+FFFD rather than failing;
    /// upstream payloads are not always well-formed text.
    pub fn read_utf8(&mut self, count: usize) -> Result<String> {
        let bytes = self.read_bytes(count)?;
        Ok(decode_utf8_lenient(bytes))
    }

    /// Read a length-prefixed UTF-8 string field.
    pub fn read_len_string(&mut self) -> Result<String> {
        let length = self.read_varint32()? as usize;
        self.read_utf8(length)
    }

    /// Read a length-prefixed byte field into an owned buffer.
    pub fn read_len_bytes(&mut self) -> Result<Vec<u8>> {
        let length = self.read_varint32()? as usize;
        Ok(self.read_bytes(length)?.to_vec())
    }

    /// Read a varint length prefix and narrow the limit to it.
    ///
    /// Returns the previous limit, which the caller must restore with
    /// [`ByteCursor::pop_limit`] once the sub-message has been consumed.
    /// Without the restore the narrowed limit would leak into every
    /// subsequent read.
    pub fn push_length_limit(&mut self) -> Result<usize> {
        let length = self.read_varint32()? as usize;
        let end = self
            .offset
            .checked_add(length)
            .filter(|&end| end <= self.limit)
            .ok_or_else(|| WireError::bounds(self.offset, length, self.limit))?;
        let previous = self.limit;
        self.limit = end;
        Ok(previous)
    }

    /// Restore a limit previously returned by [`ByteCursor::push_length_limit`].
    pub fn pop_limit(&mut self, previous: usize) {
        self.limit = previous;
    }

    /// Jump to the current limit, discarding the rest of a sub-message.
    pub fn skip_to_end(&mut self) {
        self.offset = self.limit;
    }

    /// Advance past one field of the given wire type without producing a
    /// value. Groups are skipped recursively until the matching end-group
    /// tag.
    pub fn skip_field(&mut self, wire_type: WireType) -> Result<()> {
        match wire_type {
            WireType::Varint => {
                self.read_varint32()?;
            }
            WireType::Fixed64 => {
                self.advance(8)?;
            }
            WireType::LengthDelimited => {
                let length = self.read_varint32()? as usize;
                self.advance(length)?;
            }
            WireType::StartGroup => {
                while !self.at_end() {
                    let tag = self.read_varint32()?;
                    let nested = WireType::from_tag(tag)?;
                    if nested == WireType::EndGroup {
                        break;
                    }
                    self.skip_field(nested)?;
                }
            }
            WireType::EndGroup => {}
            WireType::Fixed32 => {
                self.advance(4)?;
            }
        }
        Ok(())
    }

    /// Run the generic tag loop over the remainder of the cursor.
    ///
    /// The handler receives the cursor, the field number and the wire
    /// type, and returns `Ok(true)` when it consumed the field. Declined
    /// fields are skipped by wire type. A field number of 0 ends the scan
    /// immediately; it is the end-of-stream/corruption sentinel.
    pub fn scan_fields<F>(&mut self, mut handler: F) -> Result<()>
    where
        F: FnMut(&mut ByteCursor<'a>, u32, WireType) -> Result<bool>,
    {
        while !self.at_end() {
            let tag = self.read_varint32()?;
            let field_number = tag >> 3;
            if field_number == 0 {
                break;
            }
            let wire_type = WireType::from_tag(tag)?;
            if !handler(self, field_number, wire_type)? {
                self.skip_field(wire_type)?;
            }
        }
        Ok(())
    }
}

/// Decode bytes as UTF-8 with explicit 1/2/3/4-byte sequence handling.
///
/// Bad continuation bits, overlong encodings, surrogate code points and
/// out-of-range values each yield U+FFFD; decoding then resumes so valid
/// text after the damage survives.
pub fn decode_utf8_lenient(bytes: &[u8]) -> String {
    const REPLACEMENT: char = '\u{FFFD}';

    let mut out = String::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let c1 = bytes[i];

        if c1 & 0x80 == 0 {
            out.push(c1 as char);
            i += 1;
        } else if c1 & 0xe0 == 0xc0 {
            if i + 1 >= bytes.len() {
                out.push(REPLACEMENT);
                break;
            }
            let c2 = bytes[i + 1];
            if c2 & 0xc0 != 0x80 {
                out.push(REPLACEMENT);
                i += 1;
            } else {
                let cp = (u32::from(c1 & 0x1f) << 6) | u32::from(c2 & 0x3f);
                if cp < 0x80 {
                    // overlong two-byte form
                    out.push(REPLACEMENT);
                } else {
                    out.push(char::from_u32(cp).unwrap_or(REPLACEMENT));
                }
                i += 2;
            }
        } else if c1 & 0xf0 == 0xe0 {
            if i + 2 >= bytes.len() {
                out.push(REPLACEMENT);
                break;
            }
            let c2 = bytes[i + 1];
            let c3 = bytes[i + 2];
            if c2 & 0xc0 != 0x80 || c3 & 0xc0 != 0x80 {
                out.push(REPLACEMENT);
                i += 1;
            } else {
                let cp = (u32::from(c1 & 0x0f) << 12)
                    | (u32::from(c2 & 0x3f) << 6)
                    | u32::from(c3 & 0x3f);
                if cp < 0x800 || (0xd800..=0xdfff).contains(&cp) {
                    // overlong three-byte form or surrogate
                    out.push(REPLACEMENT);
                } else {
                    out.push(char::from_u32(cp).unwrap_or(REPLACEMENT));
                }
                i += 3;
            }
        } else if c1 & 0xf8 == 0xf0 {
            if i + 3 >= bytes.len() {
                out.push(REPLACEMENT);
                break;
            }
            let c2 = bytes[i + 1];
            let c3 = bytes[i + 2];
            let c4 = bytes[i + 3];
            if c2 & 0xc0 != 0x80 || c3 & 0xc0 != 0x80 || c4 & 0xc0 != 0x80 {
                out.push(REPLACEMENT);
                i += 1;
            } else {
                let cp = (u32::from(c1 & 0x07) << 18)
                    | (u32::from(c2 & 0x3f) << 12)
                    | (u32::from(c3 & 0x3f) << 6)
                    | u32::from(c4 & 0x3f);
                if !(0x10000..=0x10ffff).contains(&cp) {
                    // overlong four-byte form or beyond the Unicode range
                    out.push(REPLACEMENT);
                } else {
                    out.push(char::from_u32(cp).unwrap_or(REPLACEMENT));
                }
                i += 4;
            }
        } else {
            out.push(REPLACEMENT);
            i += 1;
        }
    }

    out
}
