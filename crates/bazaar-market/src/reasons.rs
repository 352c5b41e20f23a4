// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pending rejection-reason prompts.
//!
//! When a two-phase rejection starts, the bot posts a prompt in the moderation
//! chat and waits for the same admin to reply to it with the reason. Prompts
//! are keyed by the prompt message, independent of any dialogue session.

use bazaar_core::{MessageRef, UserId};
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::error::ProtocolError;
use crate::listing::PostId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReasonPrompt {
    pub post_id: PostId,
    pub admin: UserId,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct ReasonPrompts {
    prompts: DashMap<MessageRef, ReasonPrompt>,
}

impl ReasonPrompts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, prompt: MessageRef, post_id: PostId, admin: UserId) {
        self.prompts.insert(
            prompt,
            ReasonPrompt {
                post_id,
                admin,
                created_at: Utc::now(),
            },
        );
    }

    pub fn contains(&self, prompt: MessageRef) -> bool {
        self.prompts.contains_key(&prompt)
    }

    /// Checks that `admin` may answer `prompt`, without consuming it.
    pub fn check(&self, prompt: MessageRef, admin: UserId) -> Result<PostId, ProtocolError> {
        match self.prompts.get(&prompt) {
            Some(p) if p.admin == admin => Ok(p.post_id),
            Some(p) => Err(ProtocolError::WrongAdmin { owner: p.admin }),
            None => Err(ProtocolError::UnknownPrompt),
        }
    }

    /// Removes the prompt if `admin` owns it. A prompt owned by someone else
    /// stays registered.
    pub fn consume(&self, prompt: MessageRef, admin: UserId) -> Result<ReasonPrompt, ProtocolError> {
        if let Some((_, p)) = self.prompts.remove_if(&prompt, |_, p| p.admin == admin) {
            return Ok(p);
        }
        match self.prompts.get(&prompt) {
            Some(p) => Err(ProtocolError::WrongAdmin { owner: p.admin }),
            None => Err(ProtocolError::UnknownPrompt),
        }
    }

    /// Drops every prompt that asks for a reason for `post_id` and returns
    /// their message refs.
    pub fn discard_post(&self, post_id: PostId) -> Vec<MessageRef> {
        let mut discarded = Vec::new();
        self.prompts.retain(|prompt, p| {
            if p.post_id == post_id {
                discarded.push(*prompt);
                false
            } else {
                true
            }
        });
        discarded
    }

    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use bazaar_core::{ChatId, MessageId};

    use super::*;

    fn prompt_ref(id: i32) -> MessageRef {
        MessageRef::new(ChatId(-100), MessageId(id))
    }

    #[test]
    fn owner_consumes_once() {
        let prompts = ReasonPrompts::new();
        let post_id = PostId::generate();
        prompts.register(prompt_ref(1), post_id, UserId(7));

        assert_eq!(prompts.check(prompt_ref(1), UserId(7)), Ok(post_id));
        let consumed = prompts.consume(prompt_ref(1), UserId(7)).unwrap();
        assert_eq!(consumed.post_id, post_id);
        assert_eq!(
            prompts.consume(prompt_ref(1), UserId(7)),
            Err(ProtocolError::UnknownPrompt)
        );
    }

    #[test]
    fn other_admin_cannot_consume() {
        let prompts = ReasonPrompts::new();
        prompts.register(prompt_ref(1), PostId::generate(), UserId(7));

        assert_eq!(
            prompts.consume(prompt_ref(1), UserId(8)),
            Err(ProtocolError::WrongAdmin { owner: UserId(7) })
        );
        assert_eq!(
            prompts.check(prompt_ref(1), UserId(8)),
            Err(ProtocolError::WrongAdmin { owner: UserId(7) })
        );
        assert!(prompts.contains(prompt_ref(1)));
        assert!(prompts.consume(prompt_ref(1), UserId(7)).is_ok());
    }

    #[test]
    fn prompts_are_scoped_by_chat() {
        let prompts = ReasonPrompts::new();
        prompts.register(prompt_ref(1), PostId::generate(), UserId(7));
        let elsewhere = MessageRef::new(ChatId(-200), MessageId(1));
        assert_eq!(
            prompts.check(elsewhere, UserId(7)),
            Err(ProtocolError::UnknownPrompt)
        );
    }

    #[test]
    fn discard_post_drops_only_that_post() {
        let prompts = ReasonPrompts::new();
        let (decided, open) = (PostId::generate(), PostId::generate());
        prompts.register(prompt_ref(1), decided, UserId(7));
        prompts.register(prompt_ref(2), decided, UserId(8));
        prompts.register(prompt_ref(3), open, UserId(7));

        let mut discarded = prompts.discard_post(decided);
        discarded.sort_by_key(|m| m.id.0);
        assert_eq!(discarded, vec![prompt_ref(1), prompt_ref(2)]);
        assert_eq!(prompts.len(), 1);
        assert!(prompts.contains(prompt_ref(3)));
        assert!(prompts.discard_post(decided).is_empty());
    }
}
