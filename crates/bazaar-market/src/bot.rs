// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event dispatch for the listing bot.
//!
//! [`MarketBot::run`] pulls one inbound event at a time from the transport
//! and routes it: slash commands first, then replies to reason prompts, then
//! the seller's dialogue. Button presses go straight to the moderation
//! engine. Handling never fails; every problem ends as a logged warning or a
//! message back to whoever caused it.

use std::sync::Arc;

use bazaar_config::BazaarConfig;
use bazaar_core::{
    BazaarError, CallbackPress, InboundEvent, IncomingMessage, MessageRef, Transport,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::action::{ActionToken, ModerationAction};
use crate::commands::Command;
use crate::error::{ModerationError, ProtocolError};
use crate::form::{FormInput, FormRules, FormSession};
use crate::listing::Listing;
use crate::moderation::{ModerationEngine, Outcome};
use crate::notify::{Notice, Notifier};
use crate::session::{Progress, SessionStore};
use crate::texts;

pub struct MarketBot {
    transport: Arc<dyn Transport>,
    notifier: Notifier,
    sessions: SessionStore,
    engine: ModerationEngine,
    rules: FormRules,
}

impl MarketBot {
    pub fn new(transport: Arc<dyn Transport>, config: &BazaarConfig) -> Self {
        let engine = ModerationEngine::from_config(Arc::clone(&transport), &config.moderation);
        Self::with_engine(transport, engine, FormRules::from(&config.listing))
    }

    pub fn with_engine(
        transport: Arc<dyn Transport>,
        engine: ModerationEngine,
        rules: FormRules,
    ) -> Self {
        Self {
            notifier: Notifier::new(Arc::clone(&transport)),
            transport,
            sessions: SessionStore::new(),
            engine,
            rules,
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn engine(&self) -> &ModerationEngine {
        &self.engine
    }

    /// Processes inbound events until the transport closes or `cancel` fires.
    pub async fn run(&self, cancel: CancellationToken) -> Result<(), BazaarError> {
        info!(transport = self.transport.name(), "bot loop running");

        loop {
            tokio::select! {
                event = self.transport.receive() => {
                    match event {
                        Ok(event) => self.handle(event).await,
                        Err(e) if e.is_closed() => {
                            warn!(error = %e, "inbound stream closed, stopping");
                            break;
                        }
                        Err(e) => warn!(error = %e, "failed to receive event"),
                    }
                }
                _ = cancel.cancelled() => {
                    info!("shutdown requested, stopping bot loop");
                    break;
                }
            }
        }

        info!(
            pending = self.engine.queue().len(),
            sessions = self.sessions.len(),
            "bot loop stopped, in-memory state discarded"
        );
        Ok(())
    }

    pub async fn handle(&self, event: InboundEvent) {
        match event {
            InboundEvent::Message(msg) => self.on_message(msg).await,
            InboundEvent::Callback(press) => self.on_callback(press).await,
        }
    }

    async fn on_message(&self, msg: IncomingMessage) {
        if let Some(command) = msg.text().and_then(Command::parse) {
            return self.on_command(command, &msg).await;
        }

        if let Some(prompt) = msg.reply_ref()
            && self.engine.prompts().contains(prompt)
        {
            return self.on_reason_reply(prompt, &msg).await;
        }

        if !msg.is_private {
            return;
        }

        if self.sessions.contains(msg.sender) {
            return self.on_form_input(&msg).await;
        }

        match msg.text().and_then(Command::from_button) {
            Some(command) => self.on_command(command, &msg).await,
            None => self.notifier.tell(msg.chat, texts::IDLE_HINT, None).await,
        }
    }

    async fn on_command(&self, command: Command, msg: &IncomingMessage) {
        debug!(command = %command, user = %msg.sender, chat = %msg.chat, "command");
        match command {
            Command::Start => {
                self.notifier
                    .tell(msg.chat, texts::GREETING, Some(texts::main_keyboard()))
                    .await;
            }
            Command::Info => self.notifier.tell(msg.chat, texts::RULES, None).await,
            Command::Id => {
                self.notifier
                    .tell_reply(msg.message_ref(), &texts::whoami(msg.chat, msg.sender))
                    .await;
            }
            Command::Cancel => {
                if self.sessions.cancel(msg.sender) {
                    info!(user = %msg.sender, "submission cancelled");
                }
                self.notifier.tell(msg.chat, texts::CANCELLED, None).await;
            }
            Command::Sell if !msg.is_private => {
                self.notifier.tell(msg.chat, texts::PRIVATE_ONLY, None).await;
            }
            Command::Sell => {
                let step = self.sessions.start(msg.sender, msg.chat);
                info!(user = %msg.sender, "submission started");
                self.notifier
                    .tell(msg.chat, &texts::step_prompt(step, &self.rules), None)
                    .await;
            }
        }
    }

    async fn on_form_input(&self, msg: &IncomingMessage) {
        let input = FormInput::from(&msg.content);
        let Some(progress) = self.sessions.advance(msg.sender, input, &self.rules) else {
            return;
        };

        let reply = match progress {
            Progress::PhotoAdded { count } => texts::photo_progress(count, &self.rules),
            Progress::Advanced(step) => {
                debug!(user = %msg.sender, step = %step, "form advanced");
                texts::step_prompt(step, &self.rules)
            }
            Progress::Stayed { step, error } => {
                debug!(user = %msg.sender, step = %step, error = %error, "input rejected");
                texts::validation_notice(&error, step, &self.rules)
            }
            Progress::Completed { listing, session } => {
                return self.submit(listing, session, msg).await;
            }
        };
        self.notifier.tell(msg.chat, &reply, None).await;
    }

    async fn submit(&self, listing: Listing, session: FormSession, msg: &IncomingMessage) {
        match self.engine.submit(listing).await {
            Ok(_) => self.notifier.tell(msg.chat, texts::SUBMITTED, None).await,
            Err(e) => {
                warn!(user = %msg.sender, error = %e, "submission failed, session kept at the last step");
                self.sessions.restore(session);
                self.notifier.tell(msg.chat, texts::SUBMIT_FAILED, None).await;
            }
        }
    }

    async fn on_reason_reply(&self, prompt: MessageRef, msg: &IncomingMessage) {
        let reason = msg.text().unwrap_or_default();
        let reply = match self
            .engine
            .complete_rejection(prompt, msg.sender, reason)
            .await
        {
            Ok(decision) if decision.delivery.has_failed(Notice::Author) => {
                texts::REJECTION_UNDELIVERED.to_string()
            }
            Ok(_) => texts::REJECTION_DONE.to_string(),
            Err(ModerationError::Protocol(ProtocolError::UnknownPrompt)) => {
                debug!(prompt = %prompt, "prompt consumed concurrently");
                return;
            }
            Err(ModerationError::Protocol(e)) => texts::protocol_notice(&e),
            Err(ModerationError::InvalidReason(e)) => texts::reason_notice(&e),
            Err(ModerationError::NotFound(_)) => texts::ALREADY_PROCESSED.to_string(),
            Err(e) => {
                warn!(prompt = %prompt, admin = %msg.sender, error = %e, "rejection failed");
                texts::ACTION_FAILED.to_string()
            }
        };
        self.notifier.tell_reply(msg.message_ref(), &reply).await;
    }

    async fn on_callback(&self, press: CallbackPress) {
        let token = match press.data.as_deref().map(str::parse::<ActionToken>) {
            Some(Ok(token)) => token,
            Some(Err(e)) => {
                debug!(user = %press.sender, error = %e, "ignoring unknown button");
                return self.notifier.answer(&press.id, texts::UNKNOWN_ACTION, false).await;
            }
            None => {
                return self.notifier.answer(&press.id, texts::UNKNOWN_ACTION, false).await;
            }
        };

        let (text, alert) = match self
            .engine
            .decide(token.post_id, press.sender, token.action)
            .await
        {
            Ok(decision) => match decision.outcome {
                Outcome::Approved => (texts::PUBLISHED, false),
                Outcome::Rejected { .. } => (texts::REJECTED, false),
                Outcome::ReasonRequested { .. } => (texts::REASON_REQUESTED, false),
            },
            Err(ModerationError::Unauthorized(_)) => (texts::NOT_A_MODERATOR, true),
            Err(ModerationError::NotFound(_)) => (texts::ALREADY_PROCESSED, true),
            Err(e) => {
                warn!(post_id = %token.post_id, admin = %press.sender, error = %e, "moderation action failed");
                match token.action {
                    ModerationAction::Approve => (texts::PUBLISH_FAILED, true),
                    ModerationAction::Reject => (texts::ACTION_FAILED, true),
                }
            }
        };
        self.notifier.answer(&press.id, text, alert).await;
    }
}
