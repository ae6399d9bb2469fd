//! Runtime services and shared state for the all-bot.

use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{info, instrument};

use crate::{
    base::{
        config::Config,
        triggers::TriggerSet,
        types::{InboundUpdate, Res, Void},
    },
    interaction::update::handle_update,
    service::{chat::ChatClient, db::DbClient},
};

/// Runtime service context that can be shared across the application.
///
/// This struct holds the database client, chat client, trigger set, and configuration.
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct Runtime {
    /// The configuration for the application.
    pub config: Config,
    /// The trigger literals, fixed for the lifetime of the process.
    pub triggers: TriggerSet,
    /// The membership store client instance.
    pub db: DbClient,
    /// The chat client instance.
    pub chat: ChatClient,
}

impl Runtime {
    /// Create a new runtime instance.
    #[instrument(skip_all)]
    pub async fn new(config: Config) -> Res<Self> {
        // Open the membership store; it must be reachable before any update is handled.
        let db = DbClient::sqlite(&config.db_path)?;

        // Initialize the telegram client.
        let chat = ChatClient::telegram(&config).await?;

        let triggers = TriggerSet::for_locale(config.locale);

        Ok(Self { config, triggers, db, chat })
    }

    /// Starts the chat listener and processes its updates until it shuts down.
    pub async fn start(&self) -> Void {
        let (tx, rx) = mpsc::unbounded_channel();

        let chat = self.chat.clone();
        let listener = tokio::spawn(async move { chat.start(tx).await });

        self.run_loop(rx).await;

        listener.await?
    }

    /// Handles updates one at a time, in arrival order, until every sender is dropped.
    #[instrument(skip_all)]
    pub async fn run_loop(&self, mut updates: UnboundedReceiver<InboundUpdate>) {
        info!("Event loop started.");

        while let Some(update) = updates.recv().await {
            handle_update(update, &self.config, &self.triggers, &self.db, &self.chat).await;
        }

        info!("Event loop finished.");
    }
}
