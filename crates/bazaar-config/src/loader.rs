// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./bazaar.toml` > `~/.config/bazaar/bazaar.toml` > `/etc/bazaar/bazaar.toml`
//! with environment variable overrides via `BAZAAR_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::BazaarConfig;

/// Config sections addressable through `BAZAAR_<SECTION>_<KEY>` variables.
const ENV_SECTIONS: &[&str] = &["bot", "telegram", "moderation", "listing"];

pub(crate) const SYSTEM_CONFIG: &str = "/etc/bazaar/bazaar.toml";
pub(crate) const LOCAL_CONFIG: &str = "bazaar.toml";

/// Path of the per-user config file, if a config directory is known.
pub(crate) fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("bazaar/bazaar.toml"))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/bazaar/bazaar.toml` (system-wide)
/// 3. `~/.config/bazaar/bazaar.toml` (user XDG config)
/// 4. `./bazaar.toml` (local directory)
/// 5. `BAZAAR_*` environment variables
pub fn load_config() -> Result<BazaarConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<BazaarConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BazaarConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<BazaarConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BazaarConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(BazaarConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG))
        .merge(env_provider())
}

/// Create the environment variable provider with explicit section-to-dot mapping.
///
/// Only the first `_` after a known section name becomes a dot, so
/// `BAZAAR_TELEGRAM_BOT_TOKEN` maps to `telegram.bot_token` and
/// `BAZAAR_MODERATION_MODERATION_CHAT_ID` to `moderation.moderation_chat_id`.
/// Lists are written in TOML syntax: `BAZAAR_MODERATION_ADMINS=[1,2]`.
fn env_provider() -> Env {
    Env::prefixed("BAZAAR_").map(|key| map_env_key(key.as_str()).into())
}

pub(crate) fn map_env_key(key: &str) -> String {
    for section in ENV_SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|r| r.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_split_on_section_only() {
        assert_eq!(map_env_key("telegram_bot_token"), "telegram.bot_token");
        assert_eq!(
            map_env_key("moderation_moderation_chat_id"),
            "moderation.moderation_chat_id"
        );
        assert_eq!(map_env_key("bot_log_level"), "bot.log_level");
        assert_eq!(map_env_key("listing_max_photos"), "listing.max_photos");
    }

    #[test]
    fn unknown_env_section_left_untouched() {
        assert_eq!(map_env_key("weather_city"), "weather_city");
    }
}
