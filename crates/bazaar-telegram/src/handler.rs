// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Update mapping.
//!
//! Converts teloxide's `Message` and `CallbackQuery` into the transport-neutral
//! [`InboundEvent`] the bot core consumes. Nothing here talks to the network.

use bazaar_core::{
    CallbackPress, ChatId, InboundEvent, IncomingMessage, MessageContent, MessageId, MessageRef,
    PhotoRef, UserId,
};
use teloxide::types::{CallbackQuery, Message, PhotoSize};

/// Picks the largest size variant of a photo.
fn largest(photos: &[PhotoSize]) -> Option<&PhotoSize> {
    photos
        .iter()
        .max_by_key(|p| u64::from(p.width) * u64::from(p.height))
}

/// Extracts the content the bot understands. Photo captions are ignored.
pub fn extract_content(msg: &Message) -> MessageContent {
    if let Some(text) = msg.text() {
        return MessageContent::Text(text.to_string());
    }
    match msg.photo().and_then(largest) {
        Some(photo) => MessageContent::Photo(PhotoRef(photo.file.id.0.clone())),
        None => MessageContent::Unsupported,
    }
}

/// Maps a message to an inbound event. Messages without a sender (channel
/// posts, anonymous admins) are dropped.
pub fn message_event(msg: &Message) -> Option<InboundEvent> {
    let user = msg.from.as_ref()?;
    Some(InboundEvent::Message(IncomingMessage {
        chat: ChatId(msg.chat.id.0),
        sender: UserId(user.id.0),
        sender_username: user.username.clone(),
        message_id: MessageId(msg.id.0),
        is_private: msg.chat.is_private(),
        content: extract_content(msg),
        reply_to: msg.reply_to_message().map(|r| MessageId(r.id.0)),
    }))
}

pub fn callback_event(query: &CallbackQuery) -> InboundEvent {
    InboundEvent::Callback(CallbackPress {
        id: query.id.0.clone(),
        sender: UserId(query.from.id.0),
        data: query.data.clone(),
        message: query
            .message
            .as_ref()
            .map(|m| MessageRef::new(ChatId(m.chat().id.0), MessageId(m.id().0))),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;

    fn user(id: u64) -> Value {
        json!({ "id": id, "is_bot": false, "first_name": "Test", "username": "tester" })
    }

    fn private_chat(id: i64) -> Value {
        json!({ "id": id, "type": "private", "first_name": "Test" })
    }

    fn group_chat() -> Value {
        json!({ "id": -100123i64, "type": "supergroup", "title": "Moderation" })
    }

    fn message(extra: Value) -> Message {
        let mut base = json!({
            "message_id": 10,
            "date": 1700000000i64,
            "chat": private_chat(42),
            "from": user(42),
        });
        if let (Some(base), Some(extra)) = (base.as_object_mut(), extra.as_object()) {
            for (k, v) in extra {
                base.insert(k.clone(), v.clone());
            }
        }
        serde_json::from_value(base).expect("failed to deserialize mock message")
    }

    fn incoming(msg: &Message) -> IncomingMessage {
        match message_event(msg) {
            Some(InboundEvent::Message(m)) => m,
            other => panic!("expected message event, got {other:?}"),
        }
    }

    #[test]
    fn private_text_maps_identity_and_content() {
        let msg = message(json!({ "text": "/sell" }));
        let m = incoming(&msg);
        assert_eq!(m.chat, ChatId(42));
        assert_eq!(m.sender, UserId(42));
        assert_eq!(m.sender_username.as_deref(), Some("tester"));
        assert_eq!(m.message_id, MessageId(10));
        assert!(m.is_private);
        assert_eq!(m.content, MessageContent::Text("/sell".into()));
        assert!(m.reply_to.is_none());
    }

    #[test]
    fn photo_picks_largest_variant() {
        let msg = message(json!({
            "photo": [
                { "file_id": "small", "file_unique_id": "s", "file_size": 1000, "width": 90, "height": 90 },
                { "file_id": "large", "file_unique_id": "l", "file_size": 90000, "width": 1280, "height": 960 },
                { "file_id": "medium", "file_unique_id": "m", "file_size": 9000, "width": 320, "height": 240 }
            ],
            "caption": "ignored"
        }));
        assert_eq!(
            incoming(&msg).content,
            MessageContent::Photo(PhotoRef("large".into()))
        );
    }

    #[test]
    fn other_kinds_are_unsupported() {
        let msg = message(json!({ "location": { "latitude": 55.75, "longitude": 37.61 } }));
        assert_eq!(incoming(&msg).content, MessageContent::Unsupported);
    }

    #[test]
    fn group_reply_carries_replied_message() {
        let msg = message(json!({
            "chat": group_chat(),
            "from": user(100),
            "text": "фото размыты",
            "reply_to_message": {
                "message_id": 7,
                "date": 1700000000i64,
                "chat": group_chat(),
                "text": "prompt"
            }
        }));
        let m = incoming(&msg);
        assert!(!m.is_private);
        assert_eq!(m.chat, ChatId(-100123));
        assert_eq!(m.reply_to, Some(MessageId(7)));
        assert_eq!(
            m.reply_ref(),
            Some(MessageRef::new(ChatId(-100123), MessageId(7)))
        );
    }

    #[test]
    fn message_without_sender_is_dropped() {
        let json = json!({
            "message_id": 1,
            "date": 1700000000i64,
            "chat": private_chat(42),
            "text": "hello",
        });
        let msg: Message = serde_json::from_value(json).expect("failed to deserialize");
        assert!(message_event(&msg).is_none());
    }

    #[test]
    fn callback_query_maps_press() {
        let json = json!({
            "id": "4382bfdwdsb323b2d9",
            "from": user(100),
            "chat_instance": "-8123",
            "data": "approve:67e55044-10b1-426f-9247-bb680e5fe0c8",
            "message": {
                "message_id": 55,
                "date": 1700000000i64,
                "chat": group_chat(),
                "text": "ℹ️ Новое объявление на модерации"
            }
        });
        let query: CallbackQuery = serde_json::from_value(json).expect("failed to deserialize");
        let InboundEvent::Callback(press) = callback_event(&query) else {
            panic!("expected callback event");
        };
        assert_eq!(press.id, "4382bfdwdsb323b2d9");
        assert_eq!(press.sender, UserId(100));
        assert_eq!(
            press.data.as_deref(),
            Some("approve:67e55044-10b1-426f-9247-bb680e5fe0c8")
        );
        assert_eq!(
            press.message,
            Some(MessageRef::new(ChatId(-100123), MessageId(55)))
        );
    }
}
