// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Bazaar listing bot.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Bazaar configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BazaarConfig {
    /// Process-level settings.
    #[serde(default)]
    pub bot: BotConfig,

    /// Telegram Bot API settings.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Destinations, admin allow-list, and rejection policy.
    #[serde(default)]
    pub moderation: ModerationConfig,

    /// Submission form limits.
    #[serde(default)]
    pub listing: ListingConfig,
}

/// Process-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BotConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Telegram bot integration configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Telegram Bot API token. Required by `serve` and `check`.
    #[serde(default)]
    pub bot_token: Option<String>,
}

/// Moderation pipeline configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ModerationConfig {
    /// Publication channel that receives approved listings. `0` means unset.
    #[serde(default)]
    pub channel_id: i64,

    /// Chat where listings are reviewed. `0` means unset.
    #[serde(default)]
    pub moderation_chat_id: i64,

    /// User ids allowed to approve or reject.
    #[serde(default)]
    pub admins: Vec<u64>,

    /// When set, rejecting asks the admin for a reason before the post is resolved.
    #[serde(default = "default_require_reject_reason")]
    pub require_reject_reason: bool,

    /// Maximum length of a rejection reason, in characters.
    #[serde(default = "default_max_reason_chars")]
    pub max_reason_chars: usize,

    /// Chat that receives a log line for every reasoned rejection.
    /// Falls back to the moderation chat.
    #[serde(default)]
    pub log_chat_id: Option<i64>,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            channel_id: 0,
            moderation_chat_id: 0,
            admins: Vec::new(),
            require_reject_reason: default_require_reject_reason(),
            max_reason_chars: default_max_reason_chars(),
            log_chat_id: None,
        }
    }
}

fn default_require_reject_reason() -> bool {
    true
}

fn default_max_reason_chars() -> usize {
    500
}

/// Submission form configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ListingConfig {
    /// Maximum photos per listing.
    #[serde(default = "default_max_photos")]
    pub max_photos: usize,

    /// Maximum description length, in characters.
    #[serde(default = "default_max_description_chars")]
    pub max_description_chars: usize,

    /// Maximum caption length accepted by the transport, in characters.
    #[serde(default = "default_caption_limit")]
    pub caption_limit: usize,

    /// Ask for the size as a separate step after the description.
    #[serde(default = "default_collect_size")]
    pub collect_size: bool,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            max_photos: default_max_photos(),
            max_description_chars: default_max_description_chars(),
            caption_limit: default_caption_limit(),
            collect_size: default_collect_size(),
        }
    }
}

fn default_max_photos() -> usize {
    5
}

fn default_max_description_chars() -> usize {
    700
}

fn default_caption_limit() -> usize {
    1024
}

fn default_collect_size() -> bool {
    true
}

impl BazaarConfig {
    /// Renders the configuration as TOML with the bot token masked.
    pub fn to_redacted_toml(&self) -> Result<String, toml::ser::Error> {
        let mut copy = self.clone();
        if let Some(token) = copy.telegram.bot_token.as_mut() {
            *token = redact_token(token);
        }
        toml::to_string_pretty(&copy)
    }
}

/// Keeps the numeric bot id before `:` and masks the secret part.
fn redact_token(token: &str) -> String {
    match token.split_once(':') {
        Some((id, _)) => format!("{id}:[REDACTED]"),
        None => "[REDACTED]".to_string(),
    }
}
