//! Event taxonomy, classification and running statistics.
//!
//! [`EventClassifier`] maps decoded sub-messages onto the output event
//! taxonomy and keeps running aggregate statistics. It owns its
//! [`Statistics`] instance; there is no process-wide singleton, so two
//! classifiers never interfere. Classification is synchronous and
//! single-threaded; wrap the classifier in a mutex if frames are decoded
//! concurrently.

use crate::batch::RawMessage;
use crate::messages::{
    ChatMessage, GiftMessage, LikeMessage, MemberMessage, RoomStatsMessage, RoomUserSeqMessage,
    SocialMessage, decode_chat, decode_gift, decode_like, decode_member, decode_room_stats,
    decode_room_user_seq, decode_social,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Known method names on the wire.
pub const METHOD_CHAT: &str = "WebcastChatMessage";
pub const METHOD_GIFT: &str = "WebcastGiftMessage";
pub const METHOD_LIKE: &str = "WebcastLikeMessage";
pub const METHOD_MEMBER: &str = "WebcastMemberMessage";
pub const METHOD_SOCIAL: &str = "WebcastSocialMessage";
pub const METHOD_ROOM_USER_SEQ: &str = "WebcastRoomUserSeqMessage";
pub const METHOD_ROOM_STATS: &str = "WebcastRoomStatsMessage";

/// Kind discriminator of a classified event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Chat,
    Gift,
    Like,
    MemberJoin,
    Social,
    ViewerSeq,
    RoomStats,
    Unknown,
}

impl EventKind {
    /// Short human-readable label, used by the formatter.
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Chat => "chat",
            EventKind::Gift => "gift",
            EventKind::Like => "like",
            EventKind::MemberJoin => "member join",
            EventKind::Social => "follow",
            EventKind::ViewerSeq => "viewer count",
            EventKind::RoomStats => "room stats",
            EventKind::Unknown => "unknown",
        }
    }
}

/// Decoded semantic payload of an event, one variant per message kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventDetail {
    Chat(ChatMessage),
    Gift(GiftMessage),
    Like(LikeMessage),
    MemberJoin(MemberMessage),
    Social(SocialMessage),
    ViewerSeq(RoomUserSeqMessage),
    RoomStats(RoomStatsMessage),
    /// Unrecognized method name, or a known method whose payload failed
    /// to decode. Carries nothing beyond the common fields.
    Unknown,
}

/// One structured application event produced from a sub-message.
///
/// Immutable once constructed; consumed by the formatter or any
/// downstream application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveEvent {
    pub kind: EventKind,
    /// Raw method name from the wire, kept for unknown kinds and logging.
    pub method: String,
    /// When this event was decoded (not when it happened upstream).
    pub decoded_at: DateTime<Utc>,
    pub detail: EventDetail,
}

/// Running aggregate statistics over classified events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_messages: u64,
    pub chat_count: u64,
    pub gift_count: u64,
    pub like_count: u64,
    pub member_count: u64,
    /// Most recent online-user total reported by a viewer-count update.
    pub last_known_online_users: u64,
}

/// Maps raw sub-messages to [`LiveEvent`]s and accumulates [`Statistics`].
#[derive(Debug, Default)]
pub struct EventClassifier {
    statistics: Statistics,
}

impl EventClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify one sub-message into an event, or `None` when the message
    /// carries no method name.
    ///
    /// Decoder failures never propagate: a known method whose payload is
    /// corrupt degrades to an [`EventKind::Unknown`] event carrying only
    /// the method name. Statistics are mutated exactly once per returned
    /// event.
    pub fn classify(&mut self, message: &RawMessage) -> Option<LiveEvent> {
        if message.method.is_empty() {
            return None;
        }

        let (kind, detail) = match self.decode_detail(&message.method, &message.payload) {
            Ok(classified) => classified,
            Err(err) => {
                debug!(method = %message.method, error = %err, "typed decode failed, degrading to unknown event");
                (EventKind::Unknown, EventDetail::Unknown)
            }
        };

        self.statistics.total_messages += 1;
        match kind {
            EventKind::Chat => self.statistics.chat_count += 1,
            EventKind::Gift => self.statistics.gift_count += 1,
            EventKind::Like => self.statistics.like_count += 1,
            EventKind::MemberJoin => self.statistics.member_count += 1,
            _ => {}
        }
        if let EventDetail::ViewerSeq(seq) = &detail {
            if let Ok(total) = seq.total.parse::<u64>() {
                self.statistics.last_known_online_users = total;
            }
        }

        Some(LiveEvent {
            kind,
            method: message.method.clone(),
            decoded_at: Utc::now(),
            detail,
        })
    }

    fn decode_detail(&self, method: &str, payload: &[u8]) -> crate::Result<(EventKind, EventDetail)> {
        Ok(match method {
            METHOD_CHAT => (EventKind::Chat, EventDetail::Chat(decode_chat(payload)?)),
            METHOD_GIFT => (EventKind::Gift, EventDetail::Gift(decode_gift(payload)?)),
            METHOD_LIKE => (EventKind::Like, EventDetail::Like(decode_like(payload)?)),
            METHOD_MEMBER => {
                (EventKind::MemberJoin, EventDetail::MemberJoin(decode_member(payload)?))
            }
            METHOD_SOCIAL => (EventKind::Social, EventDetail::Social(decode_social(payload)?)),
            METHOD_ROOM_USER_SEQ => {
                (EventKind::ViewerSeq, EventDetail::ViewerSeq(decode_room_user_seq(payload)?))
            }
            METHOD_ROOM_STATS => {
                (EventKind::RoomStats, EventDetail::RoomStats(decode_room_stats(payload)?))
            }
            _ => (EventKind::Unknown, EventDetail::Unknown),
        })
    }

    /// Snapshot of the current statistics.
    pub fn statistics(&self) -> Statistics {
        self.statistics
    }

    /// Reset all counters and the last known viewer count to zero.
    pub fn reset_statistics(&mut self) {
        self.statistics = Statistics::default();
    }
}
