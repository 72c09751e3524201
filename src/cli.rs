use std::io::{self, IsTerminal};
use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use tracing::info;

use crate::config::{AppConfig, TIMEZONE_KEY};
use crate::handlers::menu::MenuController;
use crate::handlers::prompt::{InquirePrompter, LinePrompter};
use crate::service::clock::{Clock, FixedClock, SystemClock};
use crate::service::datetime::parse_date;
use crate::service::registry::UserRegistry;

#[derive(Debug, Parser)]
#[command(name = "appointment-diary", about = "Per-user appointment diary on the console")]
pub struct Cli {
    /// KEY=VALUE config file (defaults to $CONFIG_FILE)
    #[arg(long)]
    pub config: Option<String>,

    /// IANA timezone used to decide what "today" is
    #[arg(long)]
    pub timezone: Option<String>,

    /// Pin "today" for the whole session (YYYY-MM-DD)
    #[arg(long, value_parser = parse_today)]
    pub today: Option<NaiveDate>,
}

fn parse_today(text: &str) -> Result<NaiveDate, String> {
    parse_date(text).map_err(|e| e.to_string())
}

/// Picks the clock: a pinned date wins, then the timezone flag, then the
/// config/env `TIMEZONE`, then host local time.
pub fn build_clock(cli: &Cli, config: &AppConfig) -> anyhow::Result<Arc<dyn Clock>> {
    if let Some(today) = cli.today {
        return Ok(Arc::new(FixedClock(today)));
    }
    match cli.timezone.clone().or_else(|| config.get(TIMEZONE_KEY)) {
        Some(name) => {
            let clock = SystemClock::from_name(&name).map_err(anyhow::Error::msg)?;
            Ok(Arc::new(clock))
        }
        None => Ok(Arc::new(SystemClock::default())),
    }
}

pub fn run(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    let clock = build_clock(&cli, &config)?;
    info!(today = %clock.today(), "starting appointment diary");
    let registry = UserRegistry::new(clock);
    let stdout = io::stdout();

    if io::stdin().is_terminal() {
        let mut controller = MenuController::new(registry, InquirePrompter, stdout.lock());
        controller.run().context("console I/O failed")?;
    } else {
        let prompter = LinePrompter::new(io::stdin().lock(), io::stdout());
        let mut controller = MenuController::new(registry, prompter, stdout.lock());
        controller.run().context("console I/O failed")?;
    }
    Ok(())
}
