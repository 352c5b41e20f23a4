// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Contact normalization.
//!
//! Turns whatever the seller typed into a canonical `@handle`, or rejects it.
//! Recognized forms, in priority order:
//!
//! 1. a sharing link (`t.me/name`, `telegram.me/name`, `telegram.dog/name`)
//!    anywhere in the text, with or without scheme and `www.`;
//! 2. a bare identifier (`name`);
//! 3. an already marked identifier (`@name`).
//!
//! Identifier characters are ASCII letters, digits and underscore. Link hosts
//! match case-insensitively; the handle keeps the letter case it was typed in.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Prefix every canonical handle starts with.
pub const HANDLE_MARKER: char = '@';

static SHARE_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i:https?://)?(?i:www\.)?\b(?i:t\.me|telegram\.me|telegram\.dog)/@?(\w+)").unwrap()
});

/// A contact handle in canonical form: `@` followed by identifier characters.
///
/// Only [`normalize_contact`] constructs it, so holding a `Handle` means the
/// contact has been validated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Handle(String);

impl Handle {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn marked(name: &str) -> Handle {
    Handle(format!("{HANDLE_MARKER}{name}"))
}

/// Normalize free-text contact input. Returns `None` when the input is not a
/// recognizable handle.
pub fn normalize_contact(raw: &str) -> Option<Handle> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    // The name group takes any word characters so that a non-ASCII letter
    // rejects the whole name instead of cutting it short.
    if let Some(name) = SHARE_LINK.captures(raw).and_then(|c| c.get(1)) {
        return is_identifier(name.as_str()).then(|| marked(name.as_str()));
    }

    if is_identifier(raw) {
        return Some(marked(raw));
    }

    match raw.strip_prefix(HANDLE_MARKER) {
        Some(rest) if is_identifier(rest) => Some(Handle(raw.to_string())),
        _ => None,
    }
}
