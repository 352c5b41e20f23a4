// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram transport for the Bazaar listing bot.
//!
//! Implements [`Transport`] over the Telegram Bot API via teloxide. Long
//! polling runs in a spawned dispatcher that forwards messages and inline
//! button presses into a bounded channel drained by [`Transport::receive`].

pub mod handler;

use async_trait::async_trait;
use bazaar_config::model::TelegramConfig;
use bazaar_core::{
    BazaarError, ChatId, HealthStatus, InboundEvent, Keyboard, MediaItem, MessageId, MessageRef,
    Transport,
};
use teloxide::dispatching::ShutdownToken;
use teloxide::prelude::*;
use teloxide::types::{
    CallbackQueryId, FileId, InlineKeyboardButton, InlineKeyboardMarkup, InputFile, InputMedia,
    InputMediaPhoto, KeyboardButton, KeyboardMarkup, ReplyMarkup, ReplyParameters,
};
use teloxide::RequestError;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

const INBOUND_CAPACITY: usize = 100;

/// Telegram transport implementing [`Transport`].
pub struct TelegramTransport {
    bot: Bot,
    inbound_rx: tokio::sync::Mutex<mpsc::Receiver<InboundEvent>>,
    inbound_tx: mpsc::Sender<InboundEvent>,
    polling_handle: Option<tokio::task::JoinHandle<()>>,
    shutdown_token: Option<ShutdownToken>,
}

impl TelegramTransport {
    /// Creates a new Telegram transport.
    ///
    /// Requires `config.bot_token` to be set.
    pub fn new(config: &TelegramConfig) -> Result<Self, BazaarError> {
        let token = config.bot_token.as_deref().ok_or_else(|| {
            BazaarError::Config("telegram.bot_token is required for the Telegram transport".into())
        })?;

        if token.trim().is_empty() {
            return Err(BazaarError::Config(
                "telegram.bot_token cannot be empty".into(),
            ));
        }

        let (inbound_tx, inbound_rx) = mpsc::channel(INBOUND_CAPACITY);

        Ok(Self {
            bot: Bot::new(token),
            inbound_rx: tokio::sync::Mutex::new(inbound_rx),
            inbound_tx,
            polling_handle: None,
            shutdown_token: None,
        })
    }

    /// Stops long polling and waits for the dispatcher task to finish.
    pub async fn shutdown(&self) {
        let Some(token) = self.shutdown_token.clone() else {
            return;
        };
        match token.shutdown() {
            Ok(done) => {
                done.await;
                info!("Telegram polling stopped");
            }
            Err(_) => debug!("Telegram dispatcher was not running"),
        }
    }
}

fn transport_err(action: &str, e: RequestError) -> BazaarError {
    BazaarError::Transport {
        message: format!("failed to {action}: {e}"),
        source: Some(Box::new(e)),
    }
}

fn tg_chat(chat: ChatId) -> teloxide::types::ChatId {
    teloxide::types::ChatId(chat.0)
}

fn tg_message(id: MessageId) -> teloxide::types::MessageId {
    teloxide::types::MessageId(id.0)
}

fn message_ref(msg: &Message) -> MessageRef {
    MessageRef::new(ChatId(msg.chat.id.0), MessageId(msg.id.0))
}

/// Converts a transport-neutral keyboard into Telegram reply markup.
///
/// Inline buttons go on one row. Reply keyboards are resized to fit.
pub fn to_markup(keyboard: Keyboard) -> ReplyMarkup {
    match keyboard {
        Keyboard::Inline(buttons) => {
            let row: Vec<InlineKeyboardButton> = buttons
                .into_iter()
                .map(|b| InlineKeyboardButton::callback(b.label, b.data))
                .collect();
            ReplyMarkup::InlineKeyboard(InlineKeyboardMarkup::new(vec![row]))
        }
        Keyboard::Reply(labels) => {
            let row: Vec<KeyboardButton> = labels.into_iter().map(KeyboardButton::new).collect();
            ReplyMarkup::Keyboard(KeyboardMarkup::new(vec![row]).resize_keyboard())
        }
    }
}

/// Converts album items into Telegram input media.
pub fn to_input_media(media: Vec<MediaItem>) -> Vec<InputMedia> {
    media
        .into_iter()
        .map(|item| {
            let mut photo = InputMediaPhoto::new(InputFile::file_id(FileId(item.photo.0)));
            if let Some(caption) = item.caption {
                photo = photo.caption(caption);
            }
            InputMedia::Photo(photo)
        })
        .collect()
}

async fn forward(tx: &mpsc::Sender<InboundEvent>, event: InboundEvent, kind: &'static str) {
    metrics::counter!("bazaar_telegram_updates_total", "kind" => kind).increment(1);
    if tx.send(event).await.is_err() {
        warn!("inbound channel closed, dropping update");
    }
}

#[async_trait]
impl Transport for TelegramTransport {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn health_check(&self) -> Result<HealthStatus, BazaarError> {
        match self.bot.get_me().await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(format!(
                "Telegram bot unreachable: {e}"
            ))),
        }
    }

    async fn connect(&mut self) -> Result<(), BazaarError> {
        if self.polling_handle.is_some() {
            return Ok(());
        }

        let message_tx = self.inbound_tx.clone();
        let callback_tx = self.inbound_tx.clone();

        let updates = dptree::entry()
            .branch(Update::filter_message().endpoint(move |msg: Message| {
                let tx = message_tx.clone();
                async move {
                    match handler::message_event(&msg) {
                        Some(event) => forward(&tx, event, "message").await,
                        None => debug!(msg_id = msg.id.0, "ignoring message without sender"),
                    }
                    respond(())
                }
            }))
            .branch(Update::filter_callback_query().endpoint(move |query: CallbackQuery| {
                let tx = callback_tx.clone();
                async move {
                    forward(&tx, handler::callback_event(&query), "callback").await;
                    respond(())
                }
            }));

        let mut dispatcher = Dispatcher::builder(self.bot.clone(), updates)
            .default_handler(|_| async {})
            .build();
        self.shutdown_token = Some(dispatcher.shutdown_token());

        info!("starting Telegram long polling");
        self.polling_handle = Some(tokio::spawn(async move {
            dispatcher.dispatch().await;
        }));
        Ok(())
    }

    async fn receive(&self) -> Result<InboundEvent, BazaarError> {
        let mut rx = self.inbound_rx.lock().await;
        rx.recv()
            .await
            .ok_or_else(|| BazaarError::Closed("Telegram".into()))
    }

    async fn send_text(
        &self,
        chat: ChatId,
        text: &str,
        keyboard: Option<Keyboard>,
    ) -> Result<MessageRef, BazaarError> {
        let mut request = self.bot.send_message(tg_chat(chat), text);
        if let Some(keyboard) = keyboard {
            request = request.reply_markup(to_markup(keyboard));
        }
        let sent = request
            .await
            .map_err(|e| transport_err("send message", e))?;
        Ok(message_ref(&sent))
    }

    async fn send_reply(
        &self,
        reply_to: MessageRef,
        text: &str,
    ) -> Result<MessageRef, BazaarError> {
        let sent = self
            .bot
            .send_message(tg_chat(reply_to.chat), text)
            .reply_parameters(ReplyParameters::new(tg_message(reply_to.id)))
            .await
            .map_err(|e| transport_err("send reply", e))?;
        Ok(message_ref(&sent))
    }

    async fn send_media_group(
        &self,
        chat: ChatId,
        media: Vec<MediaItem>,
    ) -> Result<Vec<MessageRef>, BazaarError> {
        let sent = self
            .bot
            .send_media_group(tg_chat(chat), to_input_media(media))
            .await
            .map_err(|e| transport_err("send media group", e))?;
        Ok(sent.iter().map(message_ref).collect())
    }

    async fn edit_message_text(
        &self,
        message: MessageRef,
        text: &str,
    ) -> Result<(), BazaarError> {
        match self
            .bot
            .edit_message_text(tg_chat(message.chat), tg_message(message.id), text)
            .await
        {
            Ok(_) => Ok(()),
            // Telegram rejects edits that leave the text unchanged.
            Err(e) if e.to_string().contains("message is not modified") => Ok(()),
            Err(e) => Err(transport_err("edit message", e)),
        }
    }

    async fn answer_callback(
        &self,
        callback_id: &str,
        text: &str,
        alert: bool,
    ) -> Result<(), BazaarError> {
        self.bot
            .answer_callback_query(CallbackQueryId(callback_id.to_string()))
            .text(text)
            .show_alert(alert)
            .await
            .map_err(|e| transport_err("answer callback", e))?;
        Ok(())
    }
}
