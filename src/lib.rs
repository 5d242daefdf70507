//! Decoder for the Douyin live-stream webcast wire protocol.
//!
//! Castwire turns the binary WebSocket frames of a live-stream feed into
//! typed application events: chats, gifts, likes, member joins, follows
//! and viewer-count updates.
//!
//! # Features
//!
//! - **Three wire layers**: envelope, message batch, typed sub-messages
//! - **Never panics on input**: corrupt frames decode to zero events
//! - **Transparent gzip**: declared or sniffed, at frame and message level
//! - **Running statistics**: per-connection counters, no global state
//!
//! # Quick Start
//!
//! ```rust
//! use castwire::{Castwire, format_event};
//!
//! let mut decoder = Castwire::decoder();
//! # let frame_bytes: &[u8] = &[];
//! for event in decoder.decode(frame_bytes) {
//!     println!("{}", format_event(&event));
//! }
//! println!("{:?}", decoder.statistics());
//! ```

// Core types and error handling
mod cursor;
mod error;
#[cfg_attr(any(test, feature = "benchmark"), path = "test_utils.rs")]
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;

// Wire layers, innermost first
pub mod batch;
pub mod envelope;
pub mod messages;

// Application layer
pub mod decoder;
pub mod event;
pub mod format;

// Core exports
pub use cursor::{ByteCursor, WireType, decode_utf8_lenient};
pub use error::*;

// Wire layer exports
pub use batch::{RawBatch, RawMessage};
pub use envelope::RawFrame;

// Application exports
pub use decoder::{WebcastDecoder, is_applicable};
pub use event::{EventClassifier, EventDetail, EventKind, LiveEvent, Statistics};
pub use format::{format_event, format_statistics};

/// Unified entry point for webcast decoding.
///
/// A thin factory over the concrete types; useful when callers want one
/// import. Construct one decoder per connection.
///
/// # Example
///
/// ```rust
/// use castwire::Castwire;
///
/// assert!(Castwire::is_applicable(
///     "wss://webcast5-ws-web-lf.douyin.com/webcast/im/push/v2/"
/// ));
/// let mut decoder = Castwire::decoder();
/// assert!(decoder.decode(&[]).is_empty());
/// ```
pub struct Castwire;

impl Castwire {
    /// Create a fresh decoder with zeroed statistics.
    pub fn decoder() -> WebcastDecoder {
        WebcastDecoder::new()
    }

    /// Whether `url` points at a feed this crate can decode.
    pub fn is_applicable(url: &str) -> bool {
        decoder::is_applicable(url)
    }
}
