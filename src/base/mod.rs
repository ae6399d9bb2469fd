//! Core components, types, and utilities for the all-bot.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration handling and environment variables.
//! - Trigger literals and the message classifier.
//! - Common types, result handling, and the error taxonomy.

pub mod config;
pub mod error;
pub mod triggers;
pub mod types;
