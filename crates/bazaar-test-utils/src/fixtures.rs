// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builders for inbound events.
//!
//! Private chats share the user's id, as they do on Telegram.

use std::sync::atomic::{AtomicI32, Ordering};

use bazaar_core::{
    CallbackPress, ChatId, InboundEvent, IncomingMessage, MessageContent, MessageId, MessageRef,
    PhotoRef, UserId,
};

static NEXT_INBOUND_ID: AtomicI32 = AtomicI32::new(1);

fn next_id() -> MessageId {
    MessageId(NEXT_INBOUND_ID.fetch_add(1, Ordering::Relaxed))
}

pub fn private_message(user: u64, content: MessageContent) -> IncomingMessage {
    IncomingMessage {
        chat: ChatId(user as i64),
        sender: UserId(user),
        sender_username: None,
        message_id: next_id(),
        is_private: true,
        content,
        reply_to: None,
    }
}

pub fn private_text(user: u64, text: &str) -> InboundEvent {
    InboundEvent::Message(private_message(user, MessageContent::Text(text.to_string())))
}

pub fn private_photo(user: u64, file_id: &str) -> InboundEvent {
    InboundEvent::Message(private_message(
        user,
        MessageContent::Photo(PhotoRef(file_id.to_string())),
    ))
}

pub fn private_sticker(user: u64) -> InboundEvent {
    InboundEvent::Message(private_message(user, MessageContent::Unsupported))
}

/// A text message from `user` in a group chat.
pub fn group_text(chat: ChatId, user: u64, text: &str) -> InboundEvent {
    InboundEvent::Message(IncomingMessage {
        chat,
        sender: UserId(user),
        sender_username: None,
        message_id: next_id(),
        is_private: false,
        content: MessageContent::Text(text.to_string()),
        reply_to: None,
    })
}

/// A text reply from `user` to `to`, in the chat of `to`.
pub fn reply_text(to: MessageRef, user: u64, text: &str) -> InboundEvent {
    InboundEvent::Message(IncomingMessage {
        chat: to.chat,
        sender: UserId(user),
        sender_username: None,
        message_id: next_id(),
        is_private: false,
        content: MessageContent::Text(text.to_string()),
        reply_to: Some(to.id),
    })
}

/// A press of the inline button carrying `data`, attached to `message`.
pub fn button_press(user: u64, data: &str, message: Option<MessageRef>) -> InboundEvent {
    InboundEvent::Callback(CallbackPress {
        id: format!("cb-{}", next_id().0),
        sender: UserId(user),
        data: Some(data.to_string()),
        message,
    })
}
