// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock transport for deterministic testing.
//!
//! `MockTransport` implements `Transport` with injectable inbound events,
//! captured outbound traffic, and per-chat failure injection.

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use bazaar_core::{
    BazaarError, ChatId, HealthStatus, InboundEvent, Keyboard, MediaItem, MessageId, MessageRef,
    Transport,
};

/// One captured outbound call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Text {
        message: MessageRef,
        text: String,
        keyboard: Option<Keyboard>,
        reply_to: Option<MessageRef>,
    },
    MediaGroup {
        chat: ChatId,
        messages: Vec<MessageRef>,
        media: Vec<MediaItem>,
    },
    Edit {
        message: MessageRef,
        text: String,
    },
    CallbackAnswer {
        callback_id: String,
        text: String,
        alert: bool,
    },
}

/// A mock chat transport for testing.
///
/// - **inbound**: events injected via `inject()` are returned by `receive()`;
///   after `close()` an empty queue yields [`BazaarError::Closed`]
/// - **sent**: every successful outbound call is captured in order
/// - **failures**: sends to chats marked with `fail_chat()` and, when
///   enabled, all edits return a transport error and are not captured;
///   `fail_next_receive()` makes one `receive()` fail before the queue is read
pub struct MockTransport {
    inbound: Mutex<VecDeque<InboundEvent>>,
    notify: Notify,
    closed: AtomicBool,
    receive_errors: Mutex<VecDeque<String>>,
    sent: Mutex<Vec<Sent>>,
    failing_chats: Mutex<HashSet<ChatId>>,
    fail_edits: AtomicBool,
    next_id: AtomicI32,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            inbound: Mutex::new(VecDeque::new()),
            notify: Notify::new(),
            closed: AtomicBool::new(false),
            receive_errors: Mutex::new(VecDeque::new()),
            sent: Mutex::new(Vec::new()),
            failing_chats: Mutex::new(HashSet::new()),
            fail_edits: AtomicBool::new(false),
            next_id: AtomicI32::new(1000),
        }
    }

    /// Queue an inbound event. The next `receive()` returns it.
    pub async fn inject(&self, event: InboundEvent) {
        self.inbound.lock().await.push_back(event);
        self.notify.notify_one();
    }

    /// End the inbound stream once the queue drains.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.notify.notify_one();
    }

    /// Make the next `receive()` return a transport error with `message`.
    pub async fn fail_next_receive(&self, message: &str) {
        self.receive_errors.lock().await.push_back(message.to_string());
        self.notify.notify_one();
    }

    /// Make every send to `chat` fail.
    pub async fn fail_chat(&self, chat: ChatId) {
        self.failing_chats.lock().await.insert(chat);
    }

    pub async fn heal_chat(&self, chat: ChatId) {
        self.failing_chats.lock().await.remove(&chat);
    }

    pub fn fail_edits(&self, fail: bool) {
        self.fail_edits.store(fail, Ordering::SeqCst);
    }

    pub async fn sent(&self) -> Vec<Sent> {
        self.sent.lock().await.clone()
    }

    pub async fn clear_sent(&self) {
        self.sent.lock().await.clear();
    }

    /// Texts sent to `chat`, in order.
    pub async fn texts_to(&self, chat: ChatId) -> Vec<String> {
        self.sent
            .lock()
            .await
            .iter()
            .filter_map(|s| match s {
                Sent::Text { message, text, .. } if message.chat == chat => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// The most recent text sent to `chat`.
    pub async fn last_text_to(&self, chat: ChatId) -> Option<String> {
        self.texts_to(chat).await.pop()
    }

    /// Media groups sent to `chat`, in order.
    pub async fn media_groups_to(&self, chat: ChatId) -> Vec<Vec<MediaItem>> {
        self.sent
            .lock()
            .await
            .iter()
            .filter_map(|s| match s {
                Sent::MediaGroup { chat: c, media, .. } if *c == chat => Some(media.clone()),
                _ => None,
            })
            .collect()
    }

    /// The text message sent with an inline keyboard most recently, with its reference.
    pub async fn last_keyboard_message(&self) -> Option<(MessageRef, Keyboard)> {
        self.sent.lock().await.iter().rev().find_map(|s| match s {
            Sent::Text {
                message,
                keyboard: Some(keyboard @ Keyboard::Inline(_)),
                ..
            } => Some((*message, keyboard.clone())),
            _ => None,
        })
    }

    pub async fn edits(&self) -> Vec<(MessageRef, String)> {
        self.sent
            .lock()
            .await
            .iter()
            .filter_map(|s| match s {
                Sent::Edit { message, text } => Some((*message, text.clone())),
                _ => None,
            })
            .collect()
    }

    pub async fn callback_answers(&self) -> Vec<(String, String, bool)> {
        self.sent
            .lock()
            .await
            .iter()
            .filter_map(|s| match s {
                Sent::CallbackAnswer {
                    callback_id,
                    text,
                    alert,
                } => Some((callback_id.clone(), text.clone(), *alert)),
                _ => None,
            })
            .collect()
    }

    fn next_ref(&self, chat: ChatId) -> MessageRef {
        MessageRef::new(chat, MessageId(self.next_id.fetch_add(1, Ordering::SeqCst)))
    }

    async fn check_chat(&self, chat: ChatId) -> Result<(), BazaarError> {
        if self.failing_chats.lock().await.contains(&chat) {
            return Err(BazaarError::transport(format!("mock delivery to chat {chat} failed")));
        }
        Ok(())
    }

    async fn record_text(
        &self,
        chat: ChatId,
        text: &str,
        keyboard: Option<Keyboard>,
        reply_to: Option<MessageRef>,
    ) -> Result<MessageRef, BazaarError> {
        self.check_chat(chat).await?;
        let message = self.next_ref(chat);
        self.sent.lock().await.push(Sent::Text {
            message,
            text: text.to_string(),
            keyboard,
            reply_to,
        });
        Ok(message)
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn name(&self) -> &str {
        "mock"
    }

    async fn health_check(&self) -> Result<HealthStatus, BazaarError> {
        Ok(HealthStatus::Healthy)
    }

    async fn connect(&mut self) -> Result<(), BazaarError> {
        Ok(())
    }

    async fn receive(&self) -> Result<InboundEvent, BazaarError> {
        if let Some(message) = self.receive_errors.lock().await.pop_front() {
            return Err(BazaarError::transport(message));
        }
        loop {
            {
                let mut queue = self.inbound.lock().await;
                if let Some(event) = queue.pop_front() {
                    return Ok(event);
                }
            }
            if self.closed.load(Ordering::SeqCst) {
                return Err(BazaarError::Closed("mock".into()));
            }
            self.notify.notified().await;
        }
    }

    async fn send_text(
        &self,
        chat: ChatId,
        text: &str,
        keyboard: Option<Keyboard>,
    ) -> Result<MessageRef, BazaarError> {
        self.record_text(chat, text, keyboard, None).await
    }

    async fn send_reply(&self, reply_to: MessageRef, text: &str) -> Result<MessageRef, BazaarError> {
        self.record_text(reply_to.chat, text, None, Some(reply_to)).await
    }

    async fn send_media_group(
        &self,
        chat: ChatId,
        media: Vec<MediaItem>,
    ) -> Result<Vec<MessageRef>, BazaarError> {
        self.check_chat(chat).await?;
        let messages: Vec<_> = media.iter().map(|_| self.next_ref(chat)).collect();
        self.sent.lock().await.push(Sent::MediaGroup {
            chat,
            messages: messages.clone(),
            media,
        });
        Ok(messages)
    }

    async fn edit_message_text(&self, message: MessageRef, text: &str) -> Result<(), BazaarError> {
        if self.fail_edits.load(Ordering::SeqCst) {
            return Err(BazaarError::transport(format!("mock edit of {message} failed")));
        }
        self.sent.lock().await.push(Sent::Edit {
            message,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn answer_callback(
        &self,
        callback_id: &str,
        text: &str,
        alert: bool,
    ) -> Result<(), BazaarError> {
        self.sent.lock().await.push(Sent::CallbackAnswer {
            callback_id: callback_id.to_string(),
            text: text.to_string(),
            alert,
        });
        Ok(())
    }
}
