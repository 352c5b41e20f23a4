// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Finalized listings and their identifiers.

use std::fmt;
use std::str::FromStr;

use bazaar_core::{ChatId, MediaItem, PhotoRef, UserId};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::form::FormRules;

/// Identifier of a submitted listing, carried in moderation action tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PostId(Uuid);

impl PostId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

impl FromStr for PostId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// A validated submission, ready for moderation. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    post_id: PostId,
    author: UserId,
    author_chat: ChatId,
    photos: Vec<PhotoRef>,
    caption: String,
}

impl Listing {
    /// Builds a listing with a freshly generated id.
    ///
    /// Fails when the photo count is outside `1..=max_photos` or the caption
    /// is longer than the transport accepts. Telegram counts caption length in
    /// UTF-16 code units, so astral characters such as emoji count twice.
    pub fn new(
        author: UserId,
        author_chat: ChatId,
        photos: Vec<PhotoRef>,
        caption: String,
        rules: &FormRules,
    ) -> Result<Self, ValidationError> {
        if photos.is_empty() {
            return Err(ValidationError::NoPhotos);
        }
        if photos.len() > rules.max_photos {
            return Err(ValidationError::TooManyPhotos {
                max: rules.max_photos,
            });
        }
        let len = caption.encode_utf16().count();
        if len > rules.caption_limit {
            return Err(ValidationError::CaptionTooLong {
                len,
                max: rules.caption_limit,
            });
        }

        Ok(Self {
            post_id: PostId::generate(),
            author,
            author_chat,
            photos,
            caption,
        })
    }

    pub fn post_id(&self) -> PostId {
        self.post_id
    }

    pub fn author(&self) -> UserId {
        self.author
    }

    /// Private chat with the author, used for notifications.
    pub fn author_chat(&self) -> ChatId {
        self.author_chat
    }

    pub fn photos(&self) -> &[PhotoRef] {
        &self.photos
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    /// The album as delivered to moderators and the channel: the caption rides
    /// on the first photo.
    pub fn media_group(&self) -> Vec<MediaItem> {
        self.photos
            .iter()
            .enumerate()
            .map(|(i, photo)| MediaItem {
                photo: photo.clone(),
                caption: (i == 0).then(|| self.caption.clone()),
            })
            .collect()
    }
}
