// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error taxonomy of the submission dialogue and the moderation pipeline.

use bazaar_core::{BazaarError, UserId};
use thiserror::Error;

use crate::form::FormStep;
use crate::listing::PostId;

/// User-correctable input problems. The dialogue stays on the same step.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{step} must not be empty")]
    EmptyField { step: FormStep },

    #[error("description is {len} characters, the limit is {max}")]
    DescriptionTooLong { len: usize, max: usize },

    #[error("at most {max} photos are allowed")]
    TooManyPhotos { max: usize },

    #[error("at least one photo is required")]
    NoPhotos,

    #[error("a photo or the completion keyword was expected")]
    ExpectedPhoto,

    #[error("a text answer was expected")]
    ExpectedText,

    #[error("contact is not a recognizable handle")]
    InvalidContact,

    #[error("caption is {len} characters, the limit is {max}")]
    CaptionTooLong { len: usize, max: usize },

    #[error("rejection reason must not be empty")]
    EmptyReason,

    #[error("rejection reason is {len} characters, the limit is {max}")]
    ReasonTooLong { len: usize, max: usize },
}

/// Inbound messages or button presses that do not fit the protocol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("reply does not answer a pending reason prompt")]
    UnknownPrompt,

    #[error("reason prompt belongs to admin {owner}")]
    WrongAdmin { owner: UserId },

    #[error("malformed moderation action token `{0}`")]
    MalformedToken(String),
}

/// Failures of a moderation operation.
#[derive(Debug, Error)]
pub enum ModerationError {
    #[error("user {0} is not a moderator")]
    Unauthorized(UserId),

    /// The post was already decided or never existed. This is the expected
    /// outcome of losing a race, not a bug.
    #[error("post {0} not found or already processed")]
    NotFound(PostId),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("invalid rejection reason: {0}")]
    InvalidReason(ValidationError),

    #[error(transparent)]
    Transport(#[from] BazaarError),
}
