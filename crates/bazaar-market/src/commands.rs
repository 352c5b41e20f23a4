// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slash commands and reply-keyboard aliases.

use strum::{Display, EnumString};

use crate::texts;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Command {
    Start,
    Info,
    Cancel,
    Sell,
    Id,
}

impl Command {
    /// Parses `/name` or `/name@botname`, ignoring trailing arguments.
    pub fn parse(text: &str) -> Option<Self> {
        let word = text.trim().strip_prefix('/')?.split_whitespace().next()?;
        let name = word.split_once('@').map_or(word, |(name, _)| name);
        name.to_lowercase().parse().ok()
    }

    /// Maps a reply-keyboard label to the command it stands for.
    pub fn from_button(text: &str) -> Option<Self> {
        match text.trim() {
            texts::SELL_BUTTON => Some(Command::Sell),
            texts::INFO_BUTTON => Some(Command::Info),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_addressed_commands() {
        assert_eq!(Command::parse("/start"), Some(Command::Start));
        assert_eq!(Command::parse("/sell@wm_market_bot"), Some(Command::Sell));
        assert_eq!(Command::parse("  /ID  "), Some(Command::Id));
        assert_eq!(Command::parse("/cancel now"), Some(Command::Cancel));
    }

    #[test]
    fn rejects_non_commands() {
        assert_eq!(Command::parse("start"), None);
        assert_eq!(Command::parse("/"), None);
        assert_eq!(Command::parse("/publish"), None);
        assert_eq!(Command::parse("готово"), None);
    }

    #[test]
    fn keyboard_labels_alias_commands() {
        assert_eq!(Command::from_button(texts::SELL_BUTTON), Some(Command::Sell));
        assert_eq!(Command::from_button(texts::INFO_BUTTON), Some(Command::Info));
        assert_eq!(Command::from_button("Разместить"), None);
    }
}
