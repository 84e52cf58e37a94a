//! Campaign Relay — replays normalized mobile analytics events into the
//! push-marketing sink.
//!
//! Loads configuration, initializes the registered integrations from the
//! project settings document, then dispatches a JSON-lines event log.

mod replay;

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::sync::Arc;

use anyhow::{bail, Context};
use campaign_core::config::AppConfig;
use campaign_integrations::sink::{recording_sink, tracing_sink};
use campaign_integrations::{
    EventRouter, IntegrationManager, MarketingSink, ProjectSettings, StaticHost,
};
use clap::Parser;
use tracing::{info, warn};

use crate::replay::replay;

#[derive(Parser, Debug)]
#[command(name = "campaign-relay")]
#[command(about = "Replay normalized analytics events into the push-marketing sink")]
#[command(version)]
struct Cli {
    /// Project settings document (overrides config)
    #[arg(long, env = "CAMPAIGN_RELAY__RELAY__SETTINGS_PATH")]
    settings: Option<String>,

    /// JSON-lines event log, `-` for stdin
    #[arg(long, default_value = "-")]
    events: String,

    /// Host log level: none, basic, info, verbose (overrides config)
    #[arg(long, env = "CAMPAIGN_RELAY__LOG_LEVEL")]
    log_level: Option<String>,

    /// Host capability; repeat to list several (replaces configured list)
    #[arg(long = "capability")]
    capabilities: Vec<String>,

    /// Print sink calls to stdout as JSON lines instead of logging them
    #[arg(long, default_value_t = false)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "campaign_relay=info,campaign_integrations=info".into()),
        )
        .with_writer(io::stderr)
        .json()
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    // Apply CLI overrides
    if let Some(level) = cli.log_level {
        config.log_level = level.parse()?;
    }
    if !cli.capabilities.is_empty() {
        config.host.capabilities = cli.capabilities;
    }
    if let Some(path) = cli.settings {
        config.relay.settings_path = Some(path);
    }

    info!(
        log_level = %config.log_level,
        capabilities = ?config.host.capabilities,
        "Configuration loaded"
    );

    let settings_path = config
        .relay
        .settings_path
        .clone()
        .context("no settings document; pass --settings or set CAMPAIGN_RELAY__RELAY__SETTINGS_PATH")?;
    let raw = std::fs::read_to_string(&settings_path)
        .with_context(|| format!("reading settings from {settings_path}"))?;
    let settings = ProjectSettings::from_json(&raw)?;

    let host = StaticHost::from_config(&config.host, config.log_level);
    let recorder = recording_sink();
    let sink: Arc<dyn MarketingSink> = if cli.dry_run {
        recorder.clone()
    } else {
        tracing_sink()
    };

    let mut manager = IntegrationManager::new();
    manager.register(Box::new(EventRouter::new(sink)));

    let report = manager.initialize_all(&settings, &host);
    if manager.ready_count() == 0 {
        bail!(
            "no integration initialized: {}",
            serde_json::to_string(&report)?
        );
    }

    let stats = if cli.events == "-" {
        replay(io::stdin().lock(), &manager)?
    } else {
        let file = File::open(&cli.events)
            .with_context(|| format!("opening event log {}", cli.events))?;
        replay(BufReader::new(file), &manager)?
    };

    if cli.dry_run {
        let mut out = io::stdout().lock();
        for call in recorder.calls() {
            writeln!(out, "{}", serde_json::to_string(&call)?)?;
        }
    }

    info!(
        dispatched = stats.dispatched,
        malformed = stats.malformed,
        integrations = ?manager.ready_keys(),
        "Replay complete"
    );

    Ok(())
}
