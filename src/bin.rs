//! Binary entry point for `all-bot`.
//!
//! This module provides the command-line interface for all-bot with options
//! for configuration file paths, rehearsal mode, and logging verbosity. It
//! initializes logging and starts the service.

use std::{fs::OpenOptions, sync::Mutex};

use anyhow::Context;
use clap::Parser;
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::{Protocol, WithExportConfig};
use tracing_subscriber::{fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt};
use all_bot::base::{config::Config, types::Void};

/// All-bot – pings everyone in a Telegram group on `@all`, and tells jokes on `@joke`.
///
/// Configuration can come from `config.toml` or `ALL_BOT_*` environment variables.
#[derive(Parser, Debug)]
#[command(version, author, about, long_about = None)]
struct Args {
    /// Override the config file path (optional).
    ///
    /// By default, the bot will look for a config file at `.hidden/config.toml`
    /// in the current directory.
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,
    /// Rehearsal mode: list members without `@`, so nobody is actually pinged.
    ///
    /// Also sends logs to stdout instead of the log file.
    #[arg(short, long)]
    debug: bool,
    /// Export spans over OTLP/HTTP (configured through the standard `OTEL_*` variables).
    #[arg(long)]
    otlp: bool,
    /// Increase log verbosity (-v, -vv, etc.).
    ///
    /// Use multiple times to increase verbosity:
    /// - No flag: INFO level
    /// - -v: DEBUG level
    /// - -vv or more: TRACE level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Main entry point for the all-bot binary.
///
/// Loads configuration, sets up logging based on verbosity and mode, and starts the bot.
#[tokio::main]
async fn main() -> Void {
    let args = Args::parse();

    // Validation waits until the log sink exists, so a bad token lands in the log file.
    let config = Config::read(args.config.as_deref(), args.debug)?;

    // Construct the level filter.

    let level = match args.verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    let level_filter = tracing_subscriber::filter::LevelFilter::from_level(level);

    // Prepare the log layer: stdout while rehearsing, the log file otherwise.

    let (stdout, file) = if config.rehearsal {
        let stdout = tracing_subscriber::fmt::layer()
            .without_time()
            .with_ansi(true)
            .with_level(true)
            .with_file(false)
            .with_target(false)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE);

        (Some(stdout), None)
    } else {
        let log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.log_file)
            .with_context(|| format!("Couldn't open log file `{}`", config.log_file))?;

        let file = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_level(true)
            .with_target(false)
            .with_writer(Mutex::new(log_file));

        (None, Some(file))
    };

    // Prepare the otlp layer.

    let otel = if args.otlp {
        let exporter = opentelemetry_otlp::SpanExporter::builder().with_http().with_protocol(Protocol::HttpBinary).build()?;
        let tracer = opentelemetry_sdk::trace::SdkTracerProvider::builder().with_simple_exporter(exporter).build().tracer("all-bot");

        Some(tracing_opentelemetry::layer().with_tracer(tracer))
    } else {
        None
    };

    tracing_subscriber::registry().with(otel).with(level_filter).with(stdout).with(file).init();

    if let Err(err) = config.validate() {
        tracing::error!("Fatal: {:#}", err);
        return Err(err);
    }

    // Fatal errors end up in the operational log too, not just on stderr.
    if let Err(err) = all_bot::start(config).await {
        tracing::error!("Fatal: {:#}", err);
        return Err(err);
    }

    Ok(())
}
