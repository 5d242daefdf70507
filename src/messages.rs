//! Typed message decoders.
//!
//! The third wire layer: each known method name has a dedicated decoder
//! that knows the field layout of that message kind and extracts the
//! subset of fields the event taxonomy cares about. All decoders share
//! the generic tag loop from [`crate::cursor::ByteCursor::scan_fields`];
//! wire-type mismatches are not specially validated, so malformed input
//! degrades to partial or garbage field values rather than hard failure.

use crate::cursor::ByteCursor;
use crate::Result;
use serde::{Deserialize, Serialize};

/// Sender identity embedded in chat/gift/like/member/social messages.
///
/// The full user sub-message carries 80+ fields; only the ones the event
/// taxonomy needs are extracted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub short_id: String,
    pub nickname: String,
    pub gender: u32,
    pub level: u32,
}

/// Chat message: who said what.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub user: User,
    pub content: String,
}

/// Gift message with combo/repeat accounting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GiftMessage {
    pub user: User,
    pub gift: GiftDetail,
    pub gift_id: String,
    pub repeat_count: String,
    pub combo_count: String,
}

/// Gift catalog entry embedded in a gift message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GiftDetail {
    pub id: String,
    pub name: String,
    pub diamond_count: u32,
}

/// Like tap, with the sender's tap count and the room's running total.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LikeMessage {
    pub user: User,
    pub count: String,
    pub total: String,
}

/// Viewer entering the room.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemberMessage {
    pub user: User,
    pub member_count: String,
}

/// Follow notification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialMessage {
    pub user: User,
    pub follow_count: String,
}

/// Periodic online-count update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomUserSeqMessage {
    pub total: String,
    pub total_user: String,
}

/// Room statistics carrying pre-rendered display strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomStatsMessage {
    pub display_short: String,
    pub display_middle: String,
    pub display_long: String,
}

/// Decode the user sub-message within an already narrowed cursor scope.
fn decode_user(cursor: &mut ByteCursor<'_>) -> Result<User> {
    let mut user = User::default();

    cursor.scan_fields(|cur, field_number, _wire_type| {
        match field_number {
            1 => user.id = cur.read_varint64_str(false)?,
            2 => user.short_id = cur.read_varint64_str(false)?,
            3 => user.nickname = cur.read_len_string()?,
            4 => user.gender = cur.read_varint32()?,
            6 => user.level = cur.read_varint32()?,
            // fields 9-11 (avatars) and 22+ (nested club/grade structs)
            // are not part of the event taxonomy
            _ => return Ok(false),
        }
        Ok(true)
    })?;

    Ok(user)
}

pub fn decode_chat(data: &[u8]) -> Result<ChatMessage> {
    let mut message = ChatMessage::default();
    let mut cursor = ByteCursor::new(data);

    cursor.scan_fields(|cur, field_number, _wire_type| {
        match field_number {
            1 => {
                // common header, nothing we need
                let previous = cur.push_length_limit()?;
                cur.skip_to_end();
                cur.pop_limit(previous);
            }
            2 => {
                let previous = cur.push_length_limit()?;
                message.user = decode_user(cur)?;
                cur.pop_limit(previous);
            }
            3 => message.content = cur.read_len_string()?,
            _ => return Ok(false),
        }
        Ok(true)
    })?;

    Ok(message)
}

pub fn decode_gift(data: &[u8]) -> Result<GiftMessage> {
    let mut message = GiftMessage::default();
    let mut cursor = ByteCursor::new(data);

    cursor.scan_fields(|cur, field_number, _wire_type| {
        match field_number {
            2 => message.gift_id = cur.read_varint64_str(false)?,
            5 => message.repeat_count = cur.read_varint64_str(false)?,
            6 => message.combo_count = cur.read_varint64_str(false)?,
            7 => {
                let previous = cur.push_length_limit()?;
                message.user = decode_user(cur)?;
                cur.pop_limit(previous);
            }
            15 => {
                let previous = cur.push_length_limit()?;
                message.gift = decode_gift_detail(cur)?;
                cur.pop_limit(previous);
            }
            _ => return Ok(false),
        }
        Ok(true)
    })?;

    Ok(message)
}

fn decode_gift_detail(cursor: &mut ByteCursor<'_>) -> Result<GiftDetail> {
    let mut gift = GiftDetail::default();

    cursor.scan_fields(|cur, field_number, _wire_type| {
        match field_number {
            5 => gift.id = cur.read_varint64_str(false)?,
            12 => gift.diamond_count = cur.read_varint32()?,
            16 => gift.name = cur.read_len_string()?,
            _ => return Ok(false),
        }
        Ok(true)
    })?;

    Ok(gift)
}

pub fn decode_like(data: &[u8]) -> Result<LikeMessage> {
    let mut message = LikeMessage::default();
    let mut cursor = ByteCursor::new(data);

    cursor.scan_fields(|cur, field_number, _wire_type| {
        match field_number {
            2 => {
                let previous = cur.push_length_limit()?;
                message.user = decode_user(cur)?;
                cur.pop_limit(previous);
            }
            3 => message.count = cur.read_varint64_str(false)?,
            4 => message.total = cur.read_varint64_str(false)?,
            _ => return Ok(false),
        }
        Ok(true)
    })?;

    Ok(message)
}

pub fn decode_member(data: &[u8]) -> Result<MemberMessage> {
    let mut message = MemberMessage::default();
    let mut cursor = ByteCursor::new(data);

    cursor.scan_fields(|cur, field_number, _wire_type| {
        match field_number {
            1 => {
                let previous = cur.push_length_limit()?;
                cur.skip_to_end();
                cur.pop_limit(previous);
            }
            2 => {
                let previous = cur.push_length_limit()?;
                message.user = decode_user(cur)?;
                cur.pop_limit(previous);
            }
            3 => message.member_count = cur.read_varint64_str(false)?,
            _ => return Ok(false),
        }
        Ok(true)
    })?;

    Ok(message)
}

pub fn decode_social(data: &[u8]) -> Result<SocialMessage> {
    let mut message = SocialMessage::default();
    let mut cursor = ByteCursor::new(data);

    cursor.scan_fields(|cur, field_number, _wire_type| {
        match field_number {
            2 => {
                let previous = cur.push_length_limit()?;
                message.user = decode_user(cur)?;
                cur.pop_limit(previous);
            }
            3 => message.follow_count = cur.read_varint64_str(false)?,
            _ => return Ok(false),
        }
        Ok(true)
    })?;

    Ok(message)
}

pub fn decode_room_user_seq(data: &[u8]) -> Result<RoomUserSeqMessage> {
    let mut message = RoomUserSeqMessage::default();
    let mut cursor = ByteCursor::new(data);

    cursor.scan_fields(|cur, field_number, _wire_type| {
        match field_number {
            2 => message.total = cur.read_varint64_str(false)?,
            3 => message.total_user = cur.read_varint64_str(false)?,
            _ => return Ok(false),
        }
        Ok(true)
    })?;

    Ok(message)
}

pub fn decode_room_stats(data: &[u8]) -> Result<RoomStatsMessage> {
    let mut message = RoomStatsMessage::default();
    let mut cursor = ByteCursor::new(data);

    cursor.scan_fields(|cur, field_number, _wire_type| {
        match field_number {
            2 => message.display_short = cur.read_len_string()?,
            3 => message.display_middle = cur.read_len_string()?,
            4 => message.display_long = cur.read_len_string()?,
            _ => return Ok(false),
        }
        Ok(true)
    })?;

    Ok(message)
}
