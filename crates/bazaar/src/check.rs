// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `bazaar check` command implementation.
//!
//! Verifies that the configuration is complete enough to serve and that the
//! bot token is accepted by Telegram.

use std::time::{Duration, Instant};

use bazaar_config::BazaarConfig;
use bazaar_core::{BazaarError, HealthStatus, Transport};
use bazaar_telegram::TelegramTransport;

/// Status of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Fail,
}

#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: &'static str,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

pub async fn run_check(config: &BazaarConfig) -> Result<(), BazaarError> {
    let mut results = vec![check_serve_config(config)];
    // Without a usable config there is no token to probe with.
    if results[0].status == CheckStatus::Pass {
        results.push(check_telegram(config).await);
    }

    println!();
    println!("  bazaar check");
    println!("  {}", "-".repeat(50));
    for result in &results {
        let symbol = match result.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "FAIL",
        };
        println!(
            "  [{symbol:>4}] {}: {} ({}ms)",
            result.name,
            result.message,
            result.duration.as_millis()
        );
    }
    println!();

    let failed = results
        .iter()
        .filter(|r| r.status == CheckStatus::Fail)
        .count();
    if failed == 0 {
        Ok(())
    } else {
        Err(BazaarError::Config(format!("{failed} check(s) failed")))
    }
}

fn check_serve_config(config: &BazaarConfig) -> CheckResult {
    let start = Instant::now();
    let (status, message) = match bazaar_config::validate_for_serve(config) {
        Ok(()) => (
            CheckStatus::Pass,
            format!(
                "{} admin(s), moderation chat {}",
                config.moderation.admins.len(),
                config.moderation.moderation_chat_id
            ),
        ),
        Err(errors) => {
            bazaar_config::render_errors(&errors);
            (
                CheckStatus::Fail,
                format!("{} error(s) in configuration", errors.len()),
            )
        }
    };
    CheckResult {
        name: "config",
        status,
        message,
        duration: start.elapsed(),
    }
}

async fn check_telegram(config: &BazaarConfig) -> CheckResult {
    let start = Instant::now();
    let (status, message) = match TelegramTransport::new(&config.telegram) {
        Err(e) => (CheckStatus::Fail, e.to_string()),
        Ok(transport) => match transport.health_check().await {
            Ok(HealthStatus::Healthy) => (CheckStatus::Pass, "getMe succeeded".to_string()),
            Ok(HealthStatus::Unhealthy(reason)) => (CheckStatus::Fail, reason),
            Err(e) => (CheckStatus::Fail, e.to_string()),
        },
    };
    CheckResult {
        name: "telegram",
        status,
        message,
        duration: start.elapsed(),
    }
}
