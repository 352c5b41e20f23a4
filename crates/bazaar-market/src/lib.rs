// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Listing submission dialogue and moderation pipeline.
//!
//! Sellers fill a guided form in a private chat ([`form`], [`session`]). The
//! finished [`Listing`] goes to a moderation chat where admins approve or
//! reject it exactly once ([`moderation`], [`queue`], [`reasons`]). The bot
//! talks to the chat platform only through [`bazaar_core::Transport`].

pub mod action;
pub mod bot;
pub mod caption;
pub mod commands;
pub mod contact;
pub mod error;
pub mod form;
pub mod listing;
pub mod moderation;
pub mod notify;
pub mod queue;
pub mod reasons;
pub mod session;
pub mod texts;

pub use action::{ActionToken, ModerationAction};
pub use bot::MarketBot;
pub use contact::{normalize_contact, Handle};
pub use error::{ModerationError, ProtocolError, ValidationError};
pub use form::{FormRules, FormSession, FormStep};
pub use listing::{Listing, PostId};
pub use moderation::{Decision, Destinations, ModerationEngine, ModerationPolicy, Outcome};
pub use notify::{DeliveryReport, Notice};
pub use queue::PendingQueue;
pub use reasons::ReasonPrompts;
pub use session::SessionStore;
