// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types shared by the transport boundary and the binary.

use thiserror::Error;

/// The primary error type used across the transport trait and process wiring.
#[derive(Debug, Error)]
pub enum BazaarError {
    /// Configuration errors (missing token, empty admin list, bad chat ids).
    #[error("configuration error: {0}")]
    Config(String),

    /// Outbound or inbound transport failures (network, API rejection).
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The inbound event stream has ended; no further events will arrive.
    #[error("{0} inbound stream closed")]
    Closed(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl BazaarError {
    /// Shorthand for a transport error without an underlying source.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            source: None,
        }
    }

    /// Whether this error means the inbound event stream has ended.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed(_))
    }
}
