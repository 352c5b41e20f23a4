// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Bazaar configuration system.

use bazaar_config::diagnostic::ConfigError;
use bazaar_config::model::BazaarConfig;
use bazaar_config::{load_and_validate_str, load_config_from_str, validate_for_serve};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_bazaar_config() {
    let toml = r#"
[bot]
log_level = "debug"

[telegram]
bot_token = "123:ABC"

[moderation]
channel_id = -1002328964343
moderation_chat_id = -1002726262070
admins = [6383171904, 42]
require_reject_reason = false
max_reason_chars = 200
log_chat_id = -1003

[listing]
max_photos = 4
max_description_chars = 300
caption_limit = 900
collect_size = false
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.bot.log_level, "debug");
    assert_eq!(config.telegram.bot_token.as_deref(), Some("123:ABC"));
    assert_eq!(config.moderation.channel_id, -1002328964343);
    assert_eq!(config.moderation.moderation_chat_id, -1002726262070);
    assert_eq!(config.moderation.admins, vec![6383171904, 42]);
    assert!(!config.moderation.require_reject_reason);
    assert_eq!(config.moderation.max_reason_chars, 200);
    assert_eq!(config.moderation.log_chat_id, Some(-1003));
    assert_eq!(config.listing.max_photos, 4);
    assert_eq!(config.listing.max_description_chars, 300);
    assert_eq!(config.listing.caption_limit, 900);
    assert!(!config.listing.collect_size);
    assert!(validate_for_serve(&config).is_ok());
}

/// Missing optional sections use defaults without error.
#[test]
fn missing_optional_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.bot.log_level, "info");
    assert!(config.telegram.bot_token.is_none());
    assert_eq!(config.moderation.channel_id, 0);
    assert!(config.moderation.admins.is_empty());
    assert!(config.moderation.require_reject_reason);
    assert_eq!(config.moderation.max_reason_chars, 500);
    assert!(config.moderation.log_chat_id.is_none());
    assert_eq!(config.listing.max_photos, 5);
    assert_eq!(config.listing.caption_limit, 1024);
    assert!(config.listing.collect_size);
}

/// A dotted override (what `BAZAAR_TELEGRAM_BOT_TOKEN` becomes) lands on
/// `telegram.bot_token`, not `telegram.bot.token`.
#[test]
fn dotted_override_sets_bot_token() {
    use figment::{providers::Serialized, Figment};

    let config: BazaarConfig = Figment::new()
        .merge(Serialized::defaults(BazaarConfig::default()))
        .merge(("telegram.bot_token", "xyz-from-env"))
        .extract()
        .expect("should set bot_token via dot notation");

    assert_eq!(config.telegram.bot_token.as_deref(), Some("xyz-from-env"));
}

/// Overrides merge over TOML values.
#[test]
fn override_wins_over_toml() {
    use figment::{
        providers::{Format, Serialized, Toml},
        Figment,
    };

    let config: BazaarConfig = Figment::new()
        .merge(Serialized::defaults(BazaarConfig::default()))
        .merge(Toml::string("[moderation]\nadmins = [1]\n"))
        .merge(("moderation.admins", vec![7u64, 8u64]))
        .extract()
        .expect("should merge override");

    assert_eq!(config.moderation.admins, vec![7, 8]);
}

/// Missing config files are silently skipped.
#[test]
fn missing_config_files_silently_skipped() {
    let path = std::path::Path::new("/nonexistent/path/bazaar.toml");
    let config = bazaar_config::load_and_validate_path(path).expect("missing file is skipped");
    assert_eq!(config.listing.max_photos, 5);
}

/// Unknown top-level section is rejected by deny_unknown_fields.
#[test]
fn deny_unknown_fields_at_top_level() {
    let err = load_config_from_str("[storage]\npath = \"x\"\n")
        .expect_err("unknown top-level section should be rejected");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("storage"),
        "error should mention unknown field, got: {err_str}"
    );
}

/// A typo in [moderation] produces an UnknownKey diagnostic with a suggestion.
#[test]
fn diagnostic_suggests_admins_for_admnis() {
    let toml = r#"
[moderation]
admnis = [1]
"#;

    let errors = load_and_validate_str(toml).expect_err("should produce errors");
    let found = errors.iter().any(|e| {
        matches!(e, ConfigError::UnknownKey { key, suggestion, valid_keys, .. } if {
            key == "admnis"
                && suggestion.as_deref() == Some("admins")
                && valid_keys.contains("moderation_chat_id")
        })
    });
    assert!(found, "expected UnknownKey for `admnis`, got: {errors:?}");
}

/// Wrong value type produces an InvalidType diagnostic naming the key.
#[test]
fn diagnostic_invalid_type_names_key() {
    let toml = r#"
[listing]
max_photos = "five"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject invalid type");
    assert!(
        errors.iter().any(|e| matches!(
            e,
            ConfigError::InvalidType { key, .. } if key.contains("max_photos")
        )),
        "got: {errors:?}"
    );
}

/// Semantic validation runs after deserialization.
#[test]
fn validation_catches_oversized_album() {
    let errors = load_and_validate_str("[listing]\nmax_photos = 12\n")
        .expect_err("album limit should fail");
    assert!(errors.iter().any(|e| {
        matches!(e, ConfigError::Validation { message } if message.contains("max_photos"))
    }));
}

/// ConfigError renders through miette with the suggestion in the help text.
#[test]
fn config_error_renders_with_miette() {
    use miette::{Diagnostic, GraphicalReportHandler};

    let error = ConfigError::UnknownKey {
        key: "chanel_id".to_string(),
        suggestion: Some("channel_id".to_string()),
        valid_keys: "channel_id, moderation_chat_id, admins".to_string(),
        span: None,
        src: None,
    };

    let help = error.help().expect("should have help text").to_string();
    assert!(help.contains("did you mean `channel_id`"), "got: {help}");

    let mut buf = String::new();
    GraphicalReportHandler::new()
        .render_report(&mut buf, &error)
        .expect("should render without error");
    assert!(buf.contains("chanel_id"));
}

/// Redacted rendering can be parsed back (what `bazaar config` prints).
#[test]
fn redacted_toml_parses_back() {
    let mut config = BazaarConfig::default();
    config.telegram.bot_token = Some("99:secret".into());
    config.moderation.admins = vec![5];

    let rendered = config.to_redacted_toml().expect("should render");
    let parsed = load_config_from_str(&rendered).expect("rendered config should parse");
    assert_eq!(parsed.telegram.bot_token.as_deref(), Some("99:[REDACTED]"));
    assert_eq!(parsed.moderation.admins, vec![5]);
}
