//! Chat service integration for all-bot.
//!
//! This module provides functionality for interacting with chat platforms like Telegram:
//! - Receiving message updates
//! - Sending messages
//!
//! It defines the `GenericChatClient` trait that can be implemented for different
//! chat services, with a default implementation for Telegram.

pub mod telegram;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedSender;

use crate::base::types::{InboundUpdate, Void};

// Traits.

/// Generic "chat" trait that clients must implement.
///
/// This trait defines the core functionality for interacting with chat platforms
/// like Telegram. Implementing this trait allows different chat services to be used
/// with the all-bot.
#[async_trait]
pub trait GenericChatClient: Send + Sync + 'static {
    /// Start the chat client listener.
    ///
    /// Every message update is forwarded to `inbound` in arrival order. Returns
    /// once the listener shuts down, dropping the sender.
    async fn start(&self, inbound: UnboundedSender<InboundUpdate>) -> Void;

    /// Send a plain text message to a chat.
    async fn send_message(&self, chat_id: i64, text: &str) -> Void;
}

// Structs.

/// Chat client for the application.
///
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct ChatClient {
    inner: Arc<dyn GenericChatClient>,
}

impl Deref for ChatClient {
    type Target = dyn GenericChatClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl ChatClient {
    pub fn new(inner: Arc<dyn GenericChatClient>) -> Self {
        Self { inner }
    }
}
