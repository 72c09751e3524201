#![allow(non_snake_case)]

use appointmentDiary::cli::{self, Cli};
use appointmentDiary::config::{AppConfig, LOG_FORMAT_KEY, LOG_LEVEL_KEY};
use clap::Parser;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_LEVEL: &str = "warn";

fn init_tracing(config: &AppConfig) {
    let filter = std::env::var("RUST_LOG")
        .ok()
        .or_else(|| config.get(LOG_LEVEL_KEY))
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
    let json_logs = config
        .get(LOG_FORMAT_KEY)
        .map(|v| v == "json")
        .unwrap_or(false);

    // stdout belongs to the menu
    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr);
    if json_logs {
        builder.with_target(false).json().init();
    } else {
        builder.init();
    }
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    let config = AppConfig::load(args.config.as_deref())?;
    init_tracing(&config);
    cli::run(args, config)
}
