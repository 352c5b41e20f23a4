// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Bazaar listing bot.
//!
//! This crate provides the error type, identity and message types, and the
//! [`Transport`] trait that every chat platform adapter implements.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::BazaarError;
pub use traits::Transport;
pub use types::{
    CallbackPress, ChatId, HealthStatus, InboundEvent, IncomingMessage, InlineButton, Keyboard,
    MediaItem, MessageContent, MessageId, MessageRef, PhotoRef, UserId,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bazaar_error_variants() {
        let _config = BazaarError::Config("test".into());
        let transport = BazaarError::Transport {
            message: "connection closed by peer".into(),
            source: Some(Box::new(std::io::Error::other("test"))),
        };
        let _internal = BazaarError::Internal("test".into());

        let closed = BazaarError::Closed("telegram".into());

        assert!(closed.is_closed());
        assert_eq!(closed.to_string(), "telegram inbound stream closed");
        assert!(!transport.is_closed());
        assert!(!BazaarError::transport("timeout").is_closed());
        assert!(!BazaarError::Config("closed".into()).is_closed());
    }

    #[test]
    fn transport_error_display() {
        let err = BazaarError::transport("send failed");
        assert_eq!(err.to_string(), "transport error: send failed");
    }

    #[test]
    fn transport_trait_is_object_safe() {
        fn _assert_dyn(_: &dyn Transport) {}
    }
}
