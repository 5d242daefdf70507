//! Test utilities: a minimal reference wire encoder.
//!
//! The decoder under test never encodes, so tests build their inputs with
//! this writer. It produces the same length-prefixed, tag-based encoding
//! the webcast feed uses.

#![cfg(any(test, feature = "benchmark"))]

use flate2::Compression;
use flate2::write::GzEncoder;
use std::io::Write;

/// Append-only builder for wire-encoded test payloads.
#[derive(Default)]
pub struct WireWriter {
    buf: Vec<u8>,
}

impl WireWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn byte(&mut self, value: u8) -> &mut Self {
        self.buf.push(value);
        self
    }

    pub fn bytes(&mut self, value: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(value);
        self
    }

    /// LEB128 varint.
    pub fn varint(&mut self, mut value: u64) -> &mut Self {
        loop {
            let byte = (value & 0x7f) as u8;
            value >>= 7;
            if value != 0 {
                self.buf.push(byte | 0x80);
            } else {
                self.buf.push(byte);
                break;
            }
        }
        self
    }

    /// Field tag from a field number and raw wire type bits.
    pub fn tag(&mut self, field_number: u32, wire_type: u8) -> &mut Self {
        self.varint(u64::from(field_number << 3 | u32::from(wire_type)))
    }

    pub fn varint_field(&mut self, field_number: u32, value: u64) -> &mut Self {
        self.tag(field_number, 0).varint(value)
    }

    pub fn bytes_field(&mut self, field_number: u32, value: &[u8]) -> &mut Self {
        self.tag(field_number, 2).varint(value.len() as u64).bytes(value)
    }

    pub fn string_field(&mut self, field_number: u32, value: &str) -> &mut Self {
        self.bytes_field(field_number, value.as_bytes())
    }

    /// Nested length-delimited message built by the given closure.
    pub fn message_field(
        &mut self,
        field_number: u32,
        build: impl FnOnce(&mut WireWriter),
    ) -> &mut Self {
        let mut nested = WireWriter::new();
        build(&mut nested);
        self.bytes_field(field_number, &nested.buf)
    }
}

/// Gzip-compress a payload the way the feed does for large batches.
pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).expect("in-memory gzip write cannot fail");
    encoder.finish().expect("in-memory gzip finish cannot fail")
}
