// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-seller dialogue state.

use bazaar_core::{ChatId, UserId};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::error::ValidationError;
use crate::form::{Advance, FormInput, FormRules, FormSession, FormStep};
use crate::listing::Listing;

/// What happened to a session after one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    /// The input was rejected; `step` is where the session now waits.
    Stayed {
        step: FormStep,
        error: ValidationError,
    },
    PhotoAdded {
        count: usize,
    },
    Advanced(FormStep),
    /// The session was removed from the store. It is handed back so the caller
    /// can reinstate it if the submission cannot be delivered.
    Completed {
        listing: Listing,
        session: FormSession,
    },
}

/// Dialogue sessions keyed by seller.
///
/// Every operation is a single map call, so no entry guard is ever held
/// across an `.await`.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<UserId, FormSession>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a fresh session, discarding any existing one for the user.
    pub fn start(&self, user: UserId, chat: ChatId) -> FormStep {
        let session = FormSession::new(user, chat);
        let step = session.step();
        self.sessions.insert(user, session);
        step
    }

    /// Clears the user's session. Returns whether one existed.
    pub fn cancel(&self, user: UserId) -> bool {
        self.sessions.remove(&user).is_some()
    }

    pub fn contains(&self, user: UserId) -> bool {
        self.sessions.contains_key(&user)
    }

    pub fn step(&self, user: UserId) -> Option<FormStep> {
        self.sessions.get(&user).map(|s| s.step())
    }

    /// Snapshot of the user's session.
    pub fn get(&self, user: UserId) -> Option<FormSession> {
        self.sessions.get(&user).map(|s| s.clone())
    }

    /// Applies one input to the user's session. `None` when the user has no
    /// session.
    pub fn advance(&self, user: UserId, input: FormInput, rules: &FormRules) -> Option<Progress> {
        let Entry::Occupied(mut entry) = self.sessions.entry(user) else {
            return None;
        };

        let progress = match entry.get_mut().apply(input, rules) {
            Ok(Advance::PhotoAdded { count }) => Progress::PhotoAdded { count },
            Ok(Advance::Next(step)) => Progress::Advanced(step),
            Ok(Advance::Complete(listing)) => Progress::Completed {
                listing,
                session: entry.remove(),
            },
            Err(error) => Progress::Stayed {
                step: entry.get().step(),
                error,
            },
        };
        Some(progress)
    }

    /// Puts a completed session back unless the user already started a new
    /// one. Returns whether it was reinstated.
    pub fn restore(&self, session: FormSession) -> bool {
        match self.sessions.entry(session.user()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(session);
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
