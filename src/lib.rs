//! Library root for `all-bot`.
//!
//! All-bot is a Telegram group chat helper designed to:
//! - Ping every registered member of a chat when someone writes `@all`
//! - Post a link to a random joke when someone writes `@joke`
//!
//! Chat membership is read from a SQLite store provisioned out-of-band. The
//! architecture is built around traits for the chat transport and the store,
//! so either can be swapped out (or mocked in tests).

pub mod base;
pub mod interaction;
pub mod runtime;
pub mod service;

use base::{config::Config, types::Void};
use rustls::crypto;
use tracing::info;

/// Public async entry for the binary crate.
///
/// Sets up necessary services and starts the all-bot runtime:
/// - Initializes the crypto provider
/// - Creates the runtime context with the membership store and chat client
/// - Starts the main event loop for processing updates
pub async fn start(config: Config) -> Void {
    info!("Starting all-bot ...");

    // Start the crypto provider.
    crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install the default crypto provider."))?;

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config).await?;

    // Start the runtime.
    runtime.start().await?;

    info!("All-bot stopped.");

    Ok(())
}
