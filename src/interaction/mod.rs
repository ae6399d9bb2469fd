//! Event handling for all-bot.
//!
//! This module turns inbound chat updates into outbound messages:
//! - Resolving the chat against the membership store
//! - Classifying the message text against the trigger literals
//! - Composing and sending notifications, joke links, and help

pub mod update;
