//! Shared wire-format encoding helpers for integration tests.
//!
//! Kept deliberately small: just enough of an encoder to build frames
//! the way the upstream service does, without depending on crate
//! internals.

use flate2::Compression;
use flate2::write::GzEncoder;
use std::io::Write;

#[derive(Debug, Default)]
pub struct Encoder {
    buf: Vec<u8>,
}

impl Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn varint(&mut self, mut value: u64) -> &mut Self {
        loop {
            let byte = (value & 0x7f) as u8;
            value >>= 7;
            if value == 0 {
                self.buf.push(byte);
                break;
            }
            self.buf.push(byte | 0x80);
        }
        self
    }

    fn tag(&mut self, field: u32, wire_type: u32) -> &mut Self {
        self.varint(u64::from((field << 3) | wire_type))
    }

    pub fn varint_field(&mut self, field: u32, value: u64) -> &mut Self {
        self.tag(field, 0).varint(value)
    }

    pub fn bytes_field(&mut self, field: u32, data: &[u8]) -> &mut Self {
        self.tag(field, 2).varint(data.len() as u64);
        self.buf.extend_from_slice(data);
        self
    }

    pub fn string_field(&mut self, field: u32, value: &str) -> &mut Self {
        self.bytes_field(field, value.as_bytes())
    }

    pub fn message_field(&mut self, field: u32, build: impl FnOnce(&mut Encoder)) -> &mut Self {
        let mut nested = Encoder::new();
        build(&mut nested);
        self.bytes_field(field, &nested.buf)
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).expect("gzip write");
    encoder.finish().expect("gzip finish")
}

/// A user sub-message with the given nickname, field numbers per the wire.
pub fn user_payload(nickname: &str) -> Vec<u8> {
    let mut user = Encoder::new();
    user.varint_field(1, 7);
    user.string_field(3, nickname);
    user.varint_field(6, 3);
    user.into_bytes()
}

/// A chat sub-message payload.
pub fn chat_payload(nickname: &str, content: &str) -> Vec<u8> {
    let mut chat = Encoder::new();
    chat.bytes_field(2, &user_payload(nickname));
    chat.string_field(3, content);
    chat.into_bytes()
}

/// A batch carrying the given (method, payload) sub-messages.
pub fn batch(messages: &[(&str, &[u8])]) -> Vec<u8> {
    let mut enc = Encoder::new();
    for (method, payload) in messages {
        enc.message_field(1, |msg| {
            msg.string_field(1, method).bytes_field(2, payload);
        });
    }
    enc.into_bytes()
}

/// A full envelope frame wrapping `payload`, optionally declaring gzip.
pub fn frame(payload: &[u8], declare_gzip: bool) -> Vec<u8> {
    let mut enc = Encoder::new();
    enc.varint_field(1, 1);
    if declare_gzip {
        enc.message_field(5, |entry| {
            entry.string_field(1, "compress_type").string_field(2, "gzip");
        });
    }
    enc.bytes_field(8, payload);
    enc.into_bytes()
}
