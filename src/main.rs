mod app;
mod cli;
mod config;
mod consts;
mod error;
mod ledger;
mod menu;
mod output;
mod pipeline;
mod source;
mod utils;

use std::io::IsTerminal;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use app::{CommandContext, dispatch};
use cli::Cli;
use config::Config;
use utils::Timezone;

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("weekly_menu={default_level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .init();
}

fn main() -> ExitCode {
    let loaded = Config::load();
    let cli = Cli::parse().with_config(&loaded.config);
    init_logging(cli.debug);
    loaded.log();
    let config = loaded.config;

    let timezone = match Timezone::parse(cli.timezone.as_deref()) {
        Ok(tz) => tz,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let ctx = CommandContext {
        cli: &cli,
        config: &config,
        timezone,
    };

    match dispatch(&ctx) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
