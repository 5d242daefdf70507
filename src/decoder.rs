//! Top-level decode pipeline.
//!
//! [`WebcastDecoder`] ties the three wire layers together: envelope,
//! batch, then typed sub-messages, with gzip decompression in between
//! wherever the frame declares it or the bytes carry the gzip magic.
//! The public [`WebcastDecoder::decode`] entry never fails; anything
//! that cannot be decoded yields zero events and a log line.

use crate::batch::decode_batch;
use crate::envelope::{RawFrame, decode_frame};
use crate::error::WireError;
use crate::event::{EventClassifier, LiveEvent, Statistics};
use crate::Result;
use base64::Engine;
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD};
use flate2::read::GzDecoder;
use std::io::Read;
use tracing::{debug, warn};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Returns true when `url` points at the live feed this decoder understands.
pub fn is_applicable(url: &str) -> bool {
    url.contains("webcast") && url.contains("douyin.com")
}

fn looks_gzipped(data: &[u8]) -> bool {
    data.len() >= 2 && data[..2] == GZIP_MAGIC
}

fn gunzip(data: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = GzDecoder::new(data);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out).map_err(WireError::decompression)?;
    Ok(out)
}

/// Whether the envelope declares a gzip-compressed payload.
fn declares_gzip(frame: &RawFrame) -> bool {
    frame.payload_encoding == "gzip"
        || frame.headers.get("compress_type").is_some_and(|v| v == "gzip")
}

/// Stateful decoder for one live-feed connection.
///
/// Owns an [`EventClassifier`] and therefore the connection's statistics.
/// Create one decoder per connection; instances are independent.
#[derive(Debug, Default)]
pub struct WebcastDecoder {
    classifier: EventClassifier,
}

impl WebcastDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one binary frame into events. Never fails: corrupt or
    /// unrecognizable input yields an empty vector.
    pub fn decode(&mut self, data: &[u8]) -> Vec<LiveEvent> {
        match self.try_decode(data) {
            Ok(events) => events,
            Err(err) => {
                warn!(error = %err, len = data.len(), "frame decode failed, dropping frame");
                Vec::new()
            }
        }
    }

    /// Decode a textual frame: base64 (padded, then unpadded) is tried
    /// first, falling back to treating the text as raw bytes.
    pub fn decode_text(&mut self, text: &str) -> Vec<LiveEvent> {
        let bytes = STANDARD
            .decode(text)
            .or_else(|_| STANDARD_NO_PAD.decode(text))
            .unwrap_or_else(|_| {
                debug!("text frame is not base64, treating as raw bytes");
                text.as_bytes().to_vec()
            });
        self.decode(&bytes)
    }

    fn try_decode(&mut self, data: &[u8]) -> Result<Vec<LiveEvent>> {
        if data.is_empty() {
            return Ok(Vec::new());
        }

        let batch_bytes = self.extract_batch_bytes(data)?;
        let batch = decode_batch(&batch_bytes)?;
        debug!(messages = batch.messages.len(), "decoded message batch");

        let mut events = Vec::with_capacity(batch.messages.len());
        for mut message in batch.messages {
            if message.method.is_empty() || message.payload.is_empty() {
                continue;
            }
            // Individual payloads are occasionally gzipped too.
            if looks_gzipped(&message.payload) {
                match gunzip(&message.payload) {
                    Ok(inflated) => message.payload = inflated,
                    Err(err) => {
                        debug!(method = %message.method, error = %err, "payload gunzip failed, using raw bytes");
                    }
                }
            }
            if let Some(event) = self.classifier.classify(&message) {
                events.push(event);
            }
        }
        Ok(events)
    }

    /// Peel the envelope off `data` and return the decompressed batch bytes.
    ///
    /// Frames that do not parse as an envelope, or parse to an empty
    /// payload, are treated as a bare batch. That keeps replayed captures
    /// and fetch-style responses decodable through the same entry point.
    fn extract_batch_bytes(&self, data: &[u8]) -> Result<Vec<u8>> {
        match decode_frame(data) {
            Ok(frame) if !frame.payload.is_empty() => {
                if declares_gzip(&frame) {
                    return gunzip(&frame.payload);
                }
                if looks_gzipped(&frame.payload) {
                    return gunzip(&frame.payload);
                }
                Ok(frame.payload)
            }
            Ok(_) => {
                debug!("envelope carried no payload, treating input as bare batch");
                self.bare_batch_bytes(data)
            }
            Err(err) => {
                debug!(error = %err, "envelope decode failed, treating input as bare batch");
                self.bare_batch_bytes(data)
            }
        }
    }

    fn bare_batch_bytes(&self, data: &[u8]) -> Result<Vec<u8>> {
        if looks_gzipped(data) {
            return gunzip(data);
        }
        Ok(data.to_vec())
    }

    /// Snapshot of the statistics accumulated so far.
    pub fn statistics(&self) -> Statistics {
        self.classifier.statistics()
    }

    /// Reset accumulated statistics to zero.
    pub fn reset_statistics(&mut self) {
        self.classifier.reset_statistics();
    }
}
