//! Human-readable rendering of events and statistics.
//!
//! Presentation only: pure functions producing the fixed-width boxed
//! text the relay prints to its console. No side effects, no state.

use crate::event::{EventDetail, LiveEvent, Statistics};
use crate::messages::User;

const BOX_WIDTH: usize = 78;

fn rule(left: char, right: char) -> String {
    format!("{left}{}{right}", "═".repeat(BOX_WIDTH))
}

fn display_name(user: &User) -> &str {
    if user.nickname.is_empty() { "anonymous" } else { &user.nickname }
}

/// Render one event as a fixed-width text box.
pub fn format_event(event: &LiveEvent) -> String {
    let mut lines = Vec::new();
    lines.push(rule('╔', '╗'));
    lines.push(format!("║ webcast event: {}", event.kind.label()));
    lines.push(rule('╠', '╣'));
    lines.push(format!("║ time: {}", event.decoded_at.to_rfc3339()));

    match &event.detail {
        EventDetail::Chat(chat) => {
            lines.push(format!("║ user: {}", display_name(&chat.user)));
            lines.push(format!("║ content: {}", chat.content));
        }
        EventDetail::Gift(gift) => {
            lines.push(format!("║ user: {}", display_name(&gift.user)));
            let name = if gift.gift.name.is_empty() { "unknown gift" } else { &gift.gift.name };
            lines.push(format!("║ gift: {}", name));
            if !gift.repeat_count.is_empty() {
                lines.push(format!("║ repeat: {}", gift.repeat_count));
            }
        }
        EventDetail::Like(like) => {
            lines.push(format!("║ user: {}", display_name(&like.user)));
            if !like.total.is_empty() {
                lines.push(format!("║ room total likes: {}", like.total));
            }
        }
        EventDetail::MemberJoin(member) => {
            lines.push(format!("║ user: {} entered the room", display_name(&member.user)));
            if !member.member_count.is_empty() {
                lines.push(format!("║ member count: {}", member.member_count));
            }
        }
        EventDetail::Social(social) => {
            lines.push(format!("║ user: {} followed the host", display_name(&social.user)));
        }
        EventDetail::ViewerSeq(seq) => {
            lines.push(format!("║ online users: {}", seq.total));
        }
        EventDetail::RoomStats(stats) => {
            let display = [&stats.display_long, &stats.display_middle, &stats.display_short]
                .into_iter()
                .find(|s| !s.is_empty())
                .map(String::as_str)
                .unwrap_or("");
            lines.push(format!("║ room: {}", display));
        }
        EventDetail::Unknown => {
            lines.push(format!("║ method: {}", event.method));
        }
    }

    lines.push(rule('╚', '╝'));
    lines.join("\n")
}

/// Render a statistics snapshot as a fixed-width text box.
pub fn format_statistics(statistics: &Statistics) -> String {
    let mut lines = Vec::new();
    lines.push(rule('╔', '╗'));
    lines.push("║ webcast statistics".to_string());
    lines.push(rule('╠', '╣'));
    lines.push(format!("║ total messages: {}", statistics.total_messages));
    lines.push(format!("║ chat: {}", statistics.chat_count));
    lines.push(format!("║ gifts: {}", statistics.gift_count));
    lines.push(format!("║ likes: {}", statistics.like_count));
    lines.push(format!("║ member joins: {}", statistics.member_count));
    lines.push(format!("║ online users: {}", statistics.last_known_online_users));
    lines.push(rule('╚', '╝'));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKind;
    use crate::messages::{ChatMessage, RoomUserSeqMessage};
    use chrono::Utc;

    fn event(kind: EventKind, method: &str, detail: EventDetail) -> LiveEvent {
        LiveEvent { kind, method: method.to_string(), decoded_at: Utc::now(), detail }
    }

    #[test]
    fn chat_event_renders_user_and_content() {
        let chat = ChatMessage {
            user: User { nickname: "Alice".to_string(), ..User::default() },
            content: "hello".to_string(),
        };
        let text = format_event(&event(EventKind::Chat, "WebcastChatMessage", EventDetail::Chat(chat)));

        assert!(text.contains("webcast event: chat"));
        assert!(text.contains("user: Alice"));
        assert!(text.contains("content: hello"));
        assert!(text.starts_with('╔'));
        assert!(text.ends_with('╝'));
    }

    #[test]
    fn anonymous_fallback_for_empty_nickname() {
        let chat = ChatMessage::default();
        let text = format_event(&event(EventKind::Chat, "WebcastChatMessage", EventDetail::Chat(chat)));
        assert!(text.contains("user: anonymous"));
    }

    #[test]
    fn viewer_seq_renders_online_count() {
        let seq = RoomUserSeqMessage { total: "1234".to_string(), ..RoomUserSeqMessage::default() };
        let text = format_event(&event(
            EventKind::ViewerSeq,
            "WebcastRoomUserSeqMessage",
            EventDetail::ViewerSeq(seq),
        ));
        assert!(text.contains("online users: 1234"));
    }

    #[test]
    fn unknown_event_renders_method_name() {
        let text =
            format_event(&event(EventKind::Unknown, "WebcastFooBarMessage", EventDetail::Unknown));
        assert!(text.contains("webcast event: unknown"));
        assert!(text.contains("method: WebcastFooBarMessage"));
    }

    #[test]
    fn statistics_box_lists_every_counter() {
        let stats = Statistics {
            total_messages: 10,
            chat_count: 4,
            gift_count: 2,
            like_count: 1,
            member_count: 3,
            last_known_online_users: 555,
        };
        let text = format_statistics(&stats);
        assert!(text.contains("total messages: 10"));
        assert!(text.contains("chat: 4"));
        assert!(text.contains("gifts: 2"));
        assert!(text.contains("likes: 1"));
        assert!(text.contains("member joins: 3"));
        assert!(text.contains("online users: 555"));
    }

    #[test]
    fn formatting_has_no_side_effects() {
        let stats = Statistics::default();
        let first = format_statistics(&stats);
        let second = format_statistics(&stats);
        assert_eq!(first, second);
    }
}
