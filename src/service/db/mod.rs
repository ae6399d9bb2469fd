//! Membership store integration for all-bot.
//!
//! The store is read-only: chats and members are provisioned out-of-band.

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::types::Res;

pub mod sqlite;

// Traits.

/// Generic database client trait that clients must implement.
///
/// This trait defines the two point reads the relay needs. Implementing this trait
/// allows different database backends to be used with the all-bot.
#[async_trait]
pub trait GenericDbClient: Send + Sync + 'static {
    /// Resolves the platform chat identifier to the store's internal chat identifier.
    ///
    /// Fails with `RelayError::UnknownChat` when the chat is not registered, and with
    /// `RelayError::StoreUnavailable` when the store cannot be queried.
    async fn resolve_internal_id(&self, platform_chat_id: i64) -> Res<i64>;

    /// Lists the member handles registered for the internal chat identifier, in store order.
    ///
    /// Returns an empty list when the chat has no registered members.
    async fn list_members(&self, internal_id: i64) -> Res<Vec<String>>;
}

// Structs.

/// Database client for all-bot.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct DbClient {
    inner: Arc<dyn GenericDbClient>,
}

impl Deref for DbClient {
    type Target = dyn GenericDbClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl DbClient {
    pub fn new(inner: Arc<dyn GenericDbClient>) -> Self {
        Self { inner }
    }
}
