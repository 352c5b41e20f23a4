// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions at the platform boundary.
//!
//! Traits use `#[async_trait]` for dynamic dispatch compatibility.

pub mod transport;

pub use transport::Transport;
