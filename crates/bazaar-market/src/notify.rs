// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Best-effort outbound notifications.
//!
//! A failed notification never undoes a decision. Each failure is logged,
//! counted, and recorded in the operation's [`DeliveryReport`].

use std::sync::Arc;

use bazaar_core::{BazaarError, ChatId, Keyboard, MessageRef, Transport};
use strum::Display;
use tracing::{debug, warn};

/// Kinds of best-effort messages sent as a side effect of a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Notice {
    /// Private message to the listing's author.
    Author,
    /// Edit of the moderation prompt showing the outcome.
    ModerationStatus,
    /// Line in the decision log chat.
    DecisionLog,
}

/// Which notifications of one operation did not go through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    failed: Vec<Notice>,
}

impl DeliveryReport {
    /// Records the outcome of one notification.
    pub fn record(&mut self, notice: Notice, result: Result<(), BazaarError>) {
        if let Err(e) = result {
            warn!(notice = %notice, error = %e, "notification failed");
            metrics::counter!("bazaar_notifications_failed_total", "notice" => notice.to_string())
                .increment(1);
            self.failed.push(notice);
        }
    }

    /// True when every attempted notification was delivered.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn failed(&self) -> &[Notice] {
        &self.failed
    }

    pub fn has_failed(&self, notice: Notice) -> bool {
        self.failed.contains(&notice)
    }
}

/// Thin wrapper over the transport for messages whose delivery is optional.
#[derive(Clone)]
pub struct Notifier {
    transport: Arc<dyn Transport>,
}

impl Notifier {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn send(&self, chat: ChatId, text: &str) -> Result<(), BazaarError> {
        self.transport.send_text(chat, text, None).await.map(|_| ())
    }

    pub async fn edit(&self, message: MessageRef, text: &str) -> Result<(), BazaarError> {
        self.transport.edit_message_text(message, text).await
    }

    /// Conversational reply outside any decision. Failures are only logged.
    pub async fn tell(&self, chat: ChatId, text: &str, keyboard: Option<Keyboard>) {
        if let Err(e) = self.transport.send_text(chat, text, keyboard).await {
            warn!(chat = %chat, error = %e, "failed to deliver reply");
        }
    }

    /// Like [`Notifier::tell`], threaded under `to`.
    pub async fn tell_reply(&self, to: MessageRef, text: &str) {
        if let Err(e) = self.transport.send_reply(to, text).await {
            warn!(message = %to, error = %e, "failed to deliver reply");
        }
    }

    /// Answers a button press. Failures are only logged.
    pub async fn answer(&self, callback_id: &str, text: &str, alert: bool) {
        if let Err(e) = self.transport.answer_callback(callback_id, text, alert).await {
            debug!(callback_id, error = %e, "failed to answer callback");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_collects_failures_only() {
        let mut report = DeliveryReport::default();
        report.record(Notice::Author, Ok(()));
        assert!(report.is_complete());

        report.record(Notice::ModerationStatus, Err(BazaarError::transport("boom")));
        report.record(Notice::DecisionLog, Ok(()));
        assert!(!report.is_complete());
        assert_eq!(report.failed(), &[Notice::ModerationStatus]);
        assert!(report.has_failed(Notice::ModerationStatus));
        assert!(!report.has_failed(Notice::Author));
    }

    #[test]
    fn notice_names_are_snake_case() {
        assert_eq!(Notice::ModerationStatus.to_string(), "moderation_status");
        assert_eq!(Notice::DecisionLog.to_string(), "decision_log");
    }
}
