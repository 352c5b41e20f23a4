// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Listings awaiting a moderation decision.

use bazaar_core::MessageRef;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::listing::{Listing, PostId};

#[derive(Debug, Clone)]
pub struct PendingEntry {
    pub listing: Listing,
    /// The moderation chat message carrying the approve/reject buttons.
    pub moderation_message: Option<MessageRef>,
    pub submitted_at: DateTime<Utc>,
}

/// The single source of truth for "awaiting decision".
///
/// [`PendingQueue::remove`] is the only way a decision takes effect, and
/// it is an atomic test-and-delete: of any number of concurrent callers for
/// the same post, exactly one gets the entry.
#[derive(Debug, Default)]
pub struct PendingQueue {
    entries: DashMap<PostId, PendingEntry>,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, listing: Listing) -> PostId {
        let post_id = listing.post_id();
        self.entries.insert(
            post_id,
            PendingEntry {
                listing,
                moderation_message: None,
                submitted_at: Utc::now(),
            },
        );
        post_id
    }

    /// Records the moderation prompt. Returns false if the post was already
    /// decided.
    pub fn attach_moderation_message(&self, post_id: PostId, message: MessageRef) -> bool {
        match self.entries.get_mut(&post_id) {
            Some(mut entry) => {
                entry.moderation_message = Some(message);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, post_id: PostId) -> Option<PendingEntry> {
        self.entries.get(&post_id).map(|e| e.clone())
    }

    pub fn contains(&self, post_id: PostId) -> bool {
        self.entries.contains_key(&post_id)
    }

    pub fn remove(&self, post_id: PostId) -> Option<PendingEntry> {
        self.entries.remove(&post_id).map(|(_, entry)| entry)
    }

    /// Puts back an entry whose decision could not take effect.
    pub fn restore(&self, entry: PendingEntry) {
        self.entries.entry(entry.listing.post_id()).or_insert(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
