// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transport-level types: identities, message references, inbound events,
//! and outbound payload shapes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of a user on the chat platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub u64);

/// Identity of a chat (private dialogue, group, or channel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChatId(pub i64);

/// Message identifier, unique only within its chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub i32);

/// Fully qualified reference to a delivered message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageRef {
    pub chat: ChatId,
    pub id: MessageId,
}

impl MessageRef {
    pub fn new(chat: ChatId, id: MessageId) -> Self {
        Self { chat, id }
    }
}

/// Opaque platform reference to an uploaded photo (Telegram `file_id`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhotoRef(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for MessageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.chat.0, self.id.0)
    }
}

/// Health status reported by transport health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Transport is fully operational.
    Healthy,
    /// Transport is not operational.
    Unhealthy(String),
}

/// A single inline button carrying callback data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineButton {
    pub label: String,
    pub data: String,
}

/// Keyboard attached to an outbound text message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keyboard {
    /// Buttons attached to the message itself, answered via callback presses.
    Inline(Vec<InlineButton>),
    /// Persistent reply keyboard whose buttons send their label as text.
    Reply(Vec<String>),
}

/// One element of a media group. Only the first item normally carries a caption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaItem {
    pub photo: PhotoRef,
    pub caption: Option<String>,
}

/// Content of an inbound message as far as the bot cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageContent {
    Text(String),
    /// Largest size variant of a photo.
    Photo(PhotoRef),
    /// Stickers, documents, voice, and anything else.
    Unsupported,
}

/// A message received from the transport.
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    pub chat: ChatId,
    pub sender: UserId,
    pub sender_username: Option<String>,
    pub message_id: MessageId,
    pub is_private: bool,
    pub content: MessageContent,
    /// Message this one replies to, when it is a reply.
    pub reply_to: Option<MessageId>,
}

impl IncomingMessage {
    pub fn message_ref(&self) -> MessageRef {
        MessageRef::new(self.chat, self.message_id)
    }

    /// Reference of the replied-to message, resolved within the same chat.
    pub fn reply_ref(&self) -> Option<MessageRef> {
        self.reply_to.map(|id| MessageRef::new(self.chat, id))
    }

    pub fn text(&self) -> Option<&str> {
        match &self.content {
            MessageContent::Text(t) => Some(t.as_str()),
            _ => None,
        }
    }
}

/// An inline button press.
#[derive(Debug, Clone)]
pub struct CallbackPress {
    /// Platform id used to answer the press.
    pub id: String,
    pub sender: UserId,
    pub data: Option<String>,
    /// Message the pressed button was attached to, if still accessible.
    pub message: Option<MessageRef>,
}

/// Everything the transport can deliver to the bot.
#[derive(Debug, Clone)]
pub enum InboundEvent {
    Message(IncomingMessage),
    Callback(CallbackPress),
}
