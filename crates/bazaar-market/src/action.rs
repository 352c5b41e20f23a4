// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Moderation action tokens carried in inline button callback data.

use std::fmt;
use std::str::FromStr;

use bazaar_core::{InlineButton, Keyboard};
use strum::{Display, EnumString};

use crate::error::ProtocolError;
use crate::listing::PostId;

/// Callback data is capped at this many bytes by the Bot API.
pub const MAX_CALLBACK_DATA: usize = 64;

const SEPARATOR: char = ':';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ModerationAction {
    Approve,
    Reject,
}

/// `"<action>:<post_id>"`, e.g. `approve:6f1c...`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionToken {
    pub action: ModerationAction,
    pub post_id: PostId,
}

impl ActionToken {
    pub fn new(action: ModerationAction, post_id: PostId) -> Self {
        Self { action, post_id }
    }
}

impl fmt::Display for ActionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{SEPARATOR}{}", self.action, self.post_id)
    }
}

impl FromStr for ActionToken {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ProtocolError::MalformedToken(s.to_string());
        let (action, post_id) = s.split_once(SEPARATOR).ok_or_else(malformed)?;
        Ok(Self {
            action: action.parse().map_err(|_| malformed())?,
            post_id: post_id.parse().map_err(|_| malformed())?,
        })
    }
}

/// The approve/reject pair attached to a moderation prompt.
pub fn review_keyboard(post_id: PostId) -> Keyboard {
    Keyboard::Inline(vec![
        InlineButton {
            label: "✅ Одобрить".into(),
            data: ActionToken::new(ModerationAction::Approve, post_id).to_string(),
        },
        InlineButton {
            label: "❌ Отклонить".into(),
            data: ActionToken::new(ModerationAction::Reject, post_id).to_string(),
        },
    ])
}
