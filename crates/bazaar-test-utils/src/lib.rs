// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Bazaar integration tests.
//!
//! # Components
//!
//! - [`MockTransport`] - in-memory transport with event injection, outbound
//!   capture, and failure injection
//! - [`fixtures`] - builders for inbound messages and button presses

pub mod fixtures;
pub mod mock_transport;

pub use mock_transport::{MockTransport, Sent};
