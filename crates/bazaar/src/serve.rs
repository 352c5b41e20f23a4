// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `bazaar serve` command implementation.

use std::sync::Arc;

use bazaar_config::BazaarConfig;
use bazaar_core::{BazaarError, Transport};
use bazaar_market::MarketBot;
use bazaar_telegram::TelegramTransport;
use tracing::info;

use crate::shutdown;

/// Converts collected config errors into a single process error after
/// rendering them.
pub(crate) fn reject_config(errors: &[bazaar_config::ConfigError]) -> BazaarError {
    bazaar_config::render_errors(errors);
    BazaarError::Config(format!(
        "{} configuration error(s), see above",
        errors.len()
    ))
}

/// Runs the bot against Telegram until a shutdown signal arrives or the
/// update stream ends. All sessions and pending listings live in memory and
/// are discarded on exit.
pub async fn run_serve(config: BazaarConfig) -> Result<(), BazaarError> {
    init_tracing(&config.bot.log_level);

    bazaar_config::validate_for_serve(&config).map_err(|errors| reject_config(&errors))?;

    info!(
        channel = config.moderation.channel_id,
        moderation_chat = config.moderation.moderation_chat_id,
        admins = config.moderation.admins.len(),
        "starting bazaar serve"
    );

    let mut telegram = TelegramTransport::new(&config.telegram)?;
    telegram.connect().await?;
    let telegram = Arc::new(telegram);

    let transport: Arc<dyn Transport> = telegram.clone();
    let bot = MarketBot::new(transport, &config);

    let cancel = shutdown::install_signal_handler();
    let result = bot.run(cancel).await;

    telegram.shutdown().await;
    info!("bazaar stopped");
    result
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("bazaar={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
