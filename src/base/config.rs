//! Load configuration via `config` crate with env-override support.

use std::{ops::Deref, sync::Arc};

use serde::Deserialize;

use super::{triggers::Locale, types::Res};

/// Default path of the membership database.
fn default_db_path() -> String {
    "chats.db".to_string()
}

/// Default path of the operational log.
fn default_log_file() -> String {
    "all_bot.log".to_string()
}

/// Default base URL of the joke channel.
fn default_joke_base_url() -> String {
    "https://t.me/myfavoritejumoreski".to_string()
}

/// Default number of posts in the joke channel.
fn default_joke_post_bound() -> u32 {
    11786
}

/// Configuration for the all-bot application.
#[derive(Debug, Clone)]
pub struct Config {
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ConfigInner {
    /// Telegram bot token (`ALL_BOT_TELEGRAM_TOKEN`).
    #[serde(default)]
    pub telegram_token: String,
    /// Path to the SQLite membership database (`ALL_BOT_DB_PATH`).
    #[serde(default = "default_db_path")]
    pub db_path: String,
    /// Path to the operational log file (`ALL_BOT_LOG_FILE`).
    /// Ignored in rehearsal mode, where logs go to stdout.
    #[serde(default = "default_log_file")]
    pub log_file: String,
    /// Rehearsal mode (`ALL_BOT_REHEARSAL`).
    /// Notifications list plain handles instead of `@` mentions, so nobody is actually pinged.
    #[serde(default)]
    pub rehearsal: bool,
    /// Trigger literal set to use (`ALL_BOT_LOCALE`): `multilingual` or `english`.
    #[serde(default)]
    pub locale: Locale,
    /// Base URL of the joke channel (`ALL_BOT_JOKE_BASE_URL`).
    #[serde(default = "default_joke_base_url")]
    pub joke_base_url: String,
    /// Exclusive upper bound of the joke post index (`ALL_BOT_JOKE_POST_BOUND`).
    #[serde(default = "default_joke_post_bound")]
    pub joke_post_bound: u32,
    /// Optional header placed before the mention list (`ALL_BOT_NOTIFY_PREFIX`).
    #[serde(default)]
    pub notify_prefix: Option<String>,
}

impl Config {
    /// Loads and validates the configuration from the environment and an optional TOML file.
    ///
    /// When `force_rehearsal` is set, rehearsal mode is enabled regardless of what the sources say.
    pub fn load(explicit_path: Option<&std::path::Path>, force_rehearsal: bool) -> Res<Self> {
        let result = Self::read(explicit_path, force_rehearsal)?;

        result.validate()?;

        Ok(result)
    }

    /// Reads the configuration sources without validating them, so that validation failures
    /// can be reported through the operational log configured by the result.
    ///
    /// The legacy `BOT_TOKEN` variable is the lowest-priority source of the token.
    pub fn read(explicit_path: Option<&std::path::Path>, force_rehearsal: bool) -> Res<Self> {
        let mut cfg = config::Config::builder().add_source(config::Environment::default().prefix("ALL_BOT"));

        if let Ok(token) = std::env::var("BOT_TOKEN") {
            cfg = cfg.set_default("telegram_token", token)?;
        }

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if std::path::Path::new(".hidden/config.toml").exists() {
            cfg = cfg.add_source(config::File::with_name(".hidden/config.toml"));
        }

        if force_rehearsal {
            cfg = cfg.set_override("rehearsal", true)?;
        }

        Ok(Config::from(cfg.build()?.try_deserialize::<ConfigInner>()?))
    }

    /// Checks the startup invariants of the configuration.
    pub fn validate(&self) -> Res<()> {
        if self.telegram_token.trim().is_empty() {
            return Err(anyhow::anyhow!("Empty token: set `ALL_BOT_TELEGRAM_TOKEN` (or the legacy `BOT_TOKEN`), or `telegram_token` in the config file."));
        }

        if self.joke_post_bound < 1 {
            return Err(anyhow::anyhow!("Joke post bound must be at least 1."));
        }

        if self.joke_base_url.trim().is_empty() {
            return Err(anyhow::anyhow!("Joke base URL must not be empty."));
        }

        Ok(())
    }
}

impl From<ConfigInner> for Config {
    fn from(inner: ConfigInner) -> Self {
        Self { inner: Arc::new(inner) }
    }
}
