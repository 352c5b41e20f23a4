// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transport trait for chat platform integrations.

use async_trait::async_trait;

use crate::error::BazaarError;
use crate::types::{ChatId, HealthStatus, InboundEvent, Keyboard, MediaItem, MessageRef};

/// Bidirectional chat transport.
///
/// The bot core only ever talks to the platform through this trait, so every
/// call is treated as a fallible remote operation.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Returns the human-readable name of this transport.
    fn name(&self) -> &str;

    /// Performs a health check and returns the transport's current status.
    async fn health_check(&self) -> Result<HealthStatus, BazaarError>;

    /// Starts receiving inbound events.
    async fn connect(&mut self) -> Result<(), BazaarError>;

    /// Receives the next inbound event.
    async fn receive(&self) -> Result<InboundEvent, BazaarError>;

    /// Sends a text message, optionally with a keyboard.
    async fn send_text(
        &self,
        chat: ChatId,
        text: &str,
        keyboard: Option<Keyboard>,
    ) -> Result<MessageRef, BazaarError>;

    /// Sends a replying text message. Transports without reply threading may
    /// ignore `reply_to`.
    async fn send_reply(
        &self,
        reply_to: MessageRef,
        text: &str,
    ) -> Result<MessageRef, BazaarError> {
        self.send_text(reply_to.chat, text, None).await
    }

    /// Sends an album of photos. Returns one reference per delivered item.
    async fn send_media_group(
        &self,
        chat: ChatId,
        media: Vec<MediaItem>,
    ) -> Result<Vec<MessageRef>, BazaarError>;

    /// Replaces the text of a previously sent message, dropping its keyboard.
    async fn edit_message_text(
        &self,
        message: MessageRef,
        text: &str,
    ) -> Result<(), BazaarError>;

    /// Answers an inline button press, optionally as a modal alert.
    async fn answer_callback(
        &self,
        callback_id: &str,
        text: &str,
        alert: bool,
    ) -> Result<(), BazaarError>;
}
