//! Telegram implementation of the chat client, built on `teloxide`.

use std::sync::Arc;

use async_trait::async_trait;
use teloxide::{
    prelude::*,
    types::{Message, Update},
};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, instrument, warn};

use crate::base::{
    config::Config,
    error::RelayError,
    types::{InboundUpdate, Res, Void},
};

use super::{ChatClient, GenericChatClient};

// Extra methods on `ChatClient` applied by the telegram implementation.

impl ChatClient {
    /// Creates a new Telegram chat client.
    pub async fn telegram(config: &Config) -> Res<Self> {
        let client = TelegramChatClient::new(config).await?;
        Ok(Self::new(Arc::new(client)))
    }
}

// Structs.

/// Telegram client implementation.
#[derive(Clone)]
struct TelegramChatClient {
    bot: Bot,
    username: String,
}

impl TelegramChatClient {
    /// Create a new Telegram chat client, validating the token against the API.
    #[instrument(name = "TelegramChatClient::new", skip_all)]
    pub async fn new(config: &Config) -> Res<Self> {
        let bot = Bot::new(&config.telegram_token);

        // Get the bot's identity, which also proves the token is valid.

        let me = bot.get_me().await.map_err(|e| RelayError::TransportAuthFailure(e.to_string()))?;
        let username = me.username.clone().unwrap_or_default();

        info!("Authorized on account `{}`.", username);

        Ok(Self { bot, username })
    }
}

#[async_trait]
impl GenericChatClient for TelegramChatClient {
    #[instrument(skip_all, fields(account = %self.username))]
    async fn start(&self, inbound: UnboundedSender<InboundUpdate>) -> Void {
        let handler = Update::filter_message().endpoint(move |msg: Message| {
            let inbound = inbound.clone();

            async move {
                let update = InboundUpdate {
                    chat_id: msg.chat.id.0,
                    text: msg.text().map(str::to_owned),
                };

                if inbound.send(update).is_err() {
                    warn!("Dropping update for chat `{}`: the event loop is gone.", msg.chat.id.0);
                }

                Ok::<(), anyhow::Error>(())
            }
        });

        info!("Starting Telegram dispatcher ...");

        // Long-poll until Ctrl-C.
        Dispatcher::builder(self.bot.clone(), handler).enable_ctrlc_handler().build().dispatch().await;

        info!("Telegram dispatcher stopped.");

        Ok(())
    }

    #[instrument(skip(self, text))]
    async fn send_message(&self, chat_id: i64, text: &str) -> Void {
        self.bot
            .send_message(ChatId(chat_id), text.to_string())
            .await
            .map_err(|e| anyhow::anyhow!("Failed to send message: {}", e))?;

        Ok(())
    }
}
