// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Moderation pipeline: submission to the review queue and exactly-once
//! approve/reject decisions.
//!
//! Every decision takes effect through [`PendingQueue::remove`]. Whoever gets
//! the entry out of the queue owns the decision; everyone else sees
//! [`ModerationError::NotFound`]. Notifications that follow a decision are
//! best-effort and reported in [`Decision::delivery`].

use std::collections::HashSet;
use std::sync::Arc;

use bazaar_config::model::ModerationConfig;
use bazaar_core::{BazaarError, ChatId, MediaItem, MessageRef, Transport, UserId};
use tracing::{debug, error, info, warn};

use crate::action::{review_keyboard, ModerationAction};
use crate::error::{ModerationError, ValidationError};
use crate::listing::{Listing, PostId};
use crate::notify::{DeliveryReport, Notice, Notifier};
use crate::queue::{PendingEntry, PendingQueue};
use crate::reasons::ReasonPrompts;
use crate::texts;

/// Where moderation traffic goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Destinations {
    /// Channel approved listings are published to.
    pub publication: ChatId,
    /// Chat that receives submissions for review.
    pub moderation: ChatId,
    /// Chat for rejection log lines. Falls back to `moderation`.
    pub log: Option<ChatId>,
}

impl Destinations {
    fn log_chat(&self) -> ChatId {
        self.log.unwrap_or(self.moderation)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModerationPolicy {
    pub admins: HashSet<UserId>,
    /// Reject asks the admin for a reason before taking effect.
    pub require_reject_reason: bool,
    pub max_reason_chars: usize,
}

impl ModerationPolicy {
    pub fn is_admin(&self, user: UserId) -> bool {
        self.admins.contains(&user)
    }

    /// Trims the reason and checks its length.
    pub fn validate_reason(&self, reason: &str) -> Result<String, ValidationError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(ValidationError::EmptyReason);
        }
        let len = reason.chars().count();
        if len > self.max_reason_chars {
            return Err(ValidationError::ReasonTooLong {
                len,
                max: self.max_reason_chars,
            });
        }
        Ok(reason.to_string())
    }
}

/// How a decision call ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Approved,
    Rejected { reason: Option<String> },
    /// Two-phase rejection started; the post is still pending.
    ReasonRequested { prompt: MessageRef },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub post_id: PostId,
    pub admin: UserId,
    pub outcome: Outcome,
    pub delivery: DeliveryReport,
}

pub struct ModerationEngine {
    transport: Arc<dyn Transport>,
    notifier: Notifier,
    queue: PendingQueue,
    prompts: ReasonPrompts,
    destinations: Destinations,
    policy: ModerationPolicy,
}

impl ModerationEngine {
    pub fn new(
        transport: Arc<dyn Transport>,
        destinations: Destinations,
        policy: ModerationPolicy,
    ) -> Self {
        Self {
            notifier: Notifier::new(Arc::clone(&transport)),
            transport,
            queue: PendingQueue::new(),
            prompts: ReasonPrompts::new(),
            destinations,
            policy,
        }
    }

    pub fn from_config(transport: Arc<dyn Transport>, config: &ModerationConfig) -> Self {
        let destinations = Destinations {
            publication: ChatId(config.channel_id),
            moderation: ChatId(config.moderation_chat_id),
            log: config.log_chat_id.map(ChatId),
        };
        let policy = ModerationPolicy {
            admins: config.admins.iter().copied().map(UserId).collect(),
            require_reject_reason: config.require_reject_reason,
            max_reason_chars: config.max_reason_chars,
        };
        Self::new(transport, destinations, policy)
    }

    pub fn queue(&self) -> &PendingQueue {
        &self.queue
    }

    pub fn prompts(&self) -> &ReasonPrompts {
        &self.prompts
    }

    pub fn destinations(&self) -> &Destinations {
        &self.destinations
    }

    pub fn is_admin(&self, user: UserId) -> bool {
        self.policy.is_admin(user)
    }

    /// Queues a listing and sends it to the moderation chat with the
    /// approve/reject buttons.
    ///
    /// If any part of the delivery fails the entry is dropped again and the
    /// transport error is returned, so nothing lingers in the queue that no
    /// moderator can see.
    pub async fn submit(&self, listing: Listing) -> Result<PostId, ModerationError> {
        let author = listing.author();
        let media = listing.media_group();
        let post_id = self.queue.insert(listing);

        match self.deliver_for_review(post_id, media).await {
            Ok(prompt) => {
                self.queue.attach_moderation_message(post_id, prompt);
                metrics::counter!("bazaar_listings_submitted_total").increment(1);
                info!(post_id = %post_id, user = %author, "listing submitted for moderation");
                Ok(post_id)
            }
            Err(e) => {
                self.queue.remove(post_id);
                warn!(post_id = %post_id, user = %author, error = %e, "failed to deliver listing for review");
                Err(e.into())
            }
        }
    }

    async fn deliver_for_review(
        &self,
        post_id: PostId,
        media: Vec<MediaItem>,
    ) -> Result<MessageRef, BazaarError> {
        let chat = self.destinations.moderation;
        self.transport.send_media_group(chat, media).await?;
        self.transport
            .send_text(chat, &texts::review_prompt(post_id), Some(review_keyboard(post_id)))
            .await
    }

    /// Applies an admin's button press.
    pub async fn decide(
        &self,
        post_id: PostId,
        admin: UserId,
        action: ModerationAction,
    ) -> Result<Decision, ModerationError> {
        if !self.is_admin(admin) {
            warn!(post_id = %post_id, user = %admin, "moderation action from non-admin");
            return Err(ModerationError::Unauthorized(admin));
        }

        match action {
            ModerationAction::Approve => self.approve(post_id, admin).await,
            ModerationAction::Reject if self.policy.require_reject_reason => {
                self.request_reason(post_id, admin).await
            }
            ModerationAction::Reject => self.reject(post_id, admin, None).await,
        }
    }

    async fn approve(&self, post_id: PostId, admin: UserId) -> Result<Decision, ModerationError> {
        let entry = self.take(post_id)?;

        if let Err(e) = self
            .transport
            .send_media_group(self.destinations.publication, entry.listing.media_group())
            .await
        {
            error!(post_id = %post_id, admin = %admin, error = %e, "publication failed, listing stays pending");
            self.queue.restore(entry);
            return Err(e.into());
        }
        self.close_prompts(post_id).await;

        let mut delivery = DeliveryReport::default();
        delivery.record(
            Notice::Author,
            self.notifier
                .send(entry.listing.author_chat(), texts::APPROVED_AUTHOR)
                .await,
        );
        if let Some(message) = entry.moderation_message {
            delivery.record(
                Notice::ModerationStatus,
                self.notifier
                    .edit(message, &texts::approved_status(post_id, admin))
                    .await,
            );
        }

        metrics::counter!("bazaar_decisions_total", "action" => "approve").increment(1);
        info!(post_id = %post_id, admin = %admin, "listing approved and published");
        Ok(Decision {
            post_id,
            admin,
            outcome: Outcome::Approved,
            delivery,
        })
    }

    async fn reject(
        &self,
        post_id: PostId,
        admin: UserId,
        reason: Option<String>,
    ) -> Result<Decision, ModerationError> {
        let entry = self.take(post_id)?;
        let listing = &entry.listing;
        self.close_prompts(post_id).await;

        let mut delivery = DeliveryReport::default();
        delivery.record(
            Notice::Author,
            self.notifier
                .send(listing.author_chat(), &texts::rejected_author(reason.as_deref()))
                .await,
        );
        if let Some(reason) = &reason {
            let line = texts::rejection_log(post_id, admin, listing.author(), reason);
            delivery.record(
                Notice::DecisionLog,
                self.notifier.send(self.destinations.log_chat(), &line).await,
            );
        }
        if let Some(message) = entry.moderation_message {
            delivery.record(
                Notice::ModerationStatus,
                self.notifier
                    .edit(message, &texts::rejected_status(post_id, admin, reason.as_deref()))
                    .await,
            );
        }

        metrics::counter!("bazaar_decisions_total", "action" => "reject").increment(1);
        info!(post_id = %post_id, admin = %admin, with_reason = reason.is_some(), "listing rejected");
        Ok(Decision {
            post_id,
            admin,
            outcome: Outcome::Rejected { reason },
            delivery,
        })
    }

    /// First phase of a two-phase rejection: ask the admin for a reason. The
    /// post stays pending.
    async fn request_reason(
        &self,
        post_id: PostId,
        admin: UserId,
    ) -> Result<Decision, ModerationError> {
        let entry = self
            .queue
            .get(post_id)
            .ok_or(ModerationError::NotFound(post_id))?;

        let text = texts::reason_request(post_id, admin);
        let prompt = match entry.moderation_message {
            Some(message) => self.transport.send_reply(message, &text).await?,
            None => {
                self.transport
                    .send_text(self.destinations.moderation, &text, None)
                    .await?
            }
        };
        self.prompts.register(prompt, post_id, admin);
        if !self.queue.contains(post_id) {
            // Decided while the prompt was being sent.
            self.close_prompts(post_id).await;
            return Err(ModerationError::NotFound(post_id));
        }

        debug!(post_id = %post_id, admin = %admin, prompt = %prompt, "waiting for rejection reason");
        Ok(Decision {
            post_id,
            admin,
            outcome: Outcome::ReasonRequested { prompt },
            delivery: DeliveryReport::default(),
        })
    }

    /// Second phase of a two-phase rejection: the admin replied to `prompt`
    /// with `reason`.
    ///
    /// A prompt owned by another admin, or a reason that fails validation,
    /// leaves the prompt in place so the right admin can answer again.
    pub async fn complete_rejection(
        &self,
        prompt: MessageRef,
        admin: UserId,
        reason: &str,
    ) -> Result<Decision, ModerationError> {
        self.prompts.check(prompt, admin)?;
        let reason = self
            .policy
            .validate_reason(reason)
            .map_err(ModerationError::InvalidReason)?;
        let claimed = self.prompts.consume(prompt, admin)?;
        self.reject(claimed.post_id, admin, Some(reason)).await
    }

    /// Retires reason prompts still open for a decided post, so a late reply
    /// has nothing to answer and the prompt map does not grow.
    async fn close_prompts(&self, post_id: PostId) {
        for prompt in self.prompts.discard_post(post_id) {
            if let Err(e) = self.notifier.edit(prompt, texts::PROMPT_CLOSED).await {
                warn!(post_id = %post_id, prompt = %prompt, error = %e, "failed to close reason prompt");
            }
        }
    }

        fn take(&self, post_id: PostId) -> Result<PendingEntry, ModerationError> {
        self.queue.remove(post_id).ok_or_else(|| {
            debug!(post_id = %post_id, "post already processed or unknown");
            ModerationError::NotFound(post_id)
        })
    }
}
