// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates constraints serde attributes cannot express. All checks run and
//! every failure is reported; nothing fails fast.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::BazaarConfig;

/// Telegram accepts between 2 and 10 items per album; a single photo is sent alone.
pub const MAX_MEDIA_GROUP: usize = 10;

/// Telegram's caption limit for media messages.
pub const MAX_CAPTION_CHARS: usize = 1024;

/// Validate a deserialized configuration for semantic correctness.
pub fn validate_config(config: &BazaarConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let listing = &config.listing;
    let moderation = &config.moderation;

    if listing.max_photos == 0 || listing.max_photos > MAX_MEDIA_GROUP {
        errors.push(ConfigError::validation(format!(
            "listing.max_photos must be between 1 and {MAX_MEDIA_GROUP}, got {}",
            listing.max_photos
        )));
    }

    if listing.caption_limit == 0 || listing.caption_limit > MAX_CAPTION_CHARS {
        errors.push(ConfigError::validation(format!(
            "listing.caption_limit must be between 1 and {MAX_CAPTION_CHARS}, got {}",
            listing.caption_limit
        )));
    }

    if listing.max_description_chars == 0 {
        errors.push(ConfigError::validation(
            "listing.max_description_chars must be at least 1",
        ));
    }

    if moderation.max_reason_chars == 0 {
        errors.push(ConfigError::validation(
            "moderation.max_reason_chars must be at least 1",
        ));
    }

    if moderation.channel_id != 0 && moderation.channel_id == moderation.moderation_chat_id {
        errors.push(ConfigError::validation(format!(
            "moderation.channel_id and moderation.moderation_chat_id must differ, both are {}",
            moderation.channel_id
        )));
    }

    let mut seen = HashSet::new();
    for admin in &moderation.admins {
        if !seen.insert(admin) {
            errors.push(ConfigError::validation(format!(
                "duplicate admin id `{admin}` in moderation.admins"
            )));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Additional requirements for actually running the bot.
///
/// Defaults are allowed to leave destinations and credentials unset so that
/// `bazaar config` works on an empty machine; `serve` and `check` do not.
pub fn validate_for_serve(config: &BazaarConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = match validate_config(config) {
        Ok(()) => Vec::new(),
        Err(errors) => errors,
    };

    match config.telegram.bot_token.as_deref() {
        None => errors.push(ConfigError::MissingKey {
            key: "telegram.bot_token".to_string(),
        }),
        Some(token) if token.trim().is_empty() => {
            errors.push(ConfigError::validation("telegram.bot_token must not be empty"));
        }
        Some(_) => {}
    }

    if config.moderation.channel_id == 0 {
        errors.push(ConfigError::MissingKey {
            key: "moderation.channel_id".to_string(),
        });
    }

    if config.moderation.moderation_chat_id == 0 {
        errors.push(ConfigError::MissingKey {
            key: "moderation.moderation_chat_id".to_string(),
        });
    }

    if config.moderation.admins.is_empty() {
        errors.push(ConfigError::validation(
            "moderation.admins must list at least one admin user id",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
