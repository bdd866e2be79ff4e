//! CLI argument definitions
//!
//! Global CLI options and configuration merging logic.

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;
use crate::consts::DEFAULT_LEDGER_FILE;
use crate::menu::SlotCheck;

use super::commands::Commands;

#[derive(Parser)]
#[command(name = "weekly-menu")]
#[command(about = "Record the weekly set-meal menu into a CSV ledger, once per week", version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Option<Commands>,

    /// Ledger CSV file (default: weekly.csv)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub(crate) ledger: Option<PathBuf>,

    /// Timezone for reference dates (e.g., "Asia/Tokyo", "local"; default: UTC)
    #[arg(long, global = true, value_name = "TZ")]
    pub(crate) timezone: Option<String>,

    /// Require the captured slot numbers to read 9 then 15
    #[arg(long, global = true)]
    pub(crate) strict_slots: bool,

    /// Output as JSON
    #[arg(short, long, global = true)]
    pub(crate) json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub(crate) no_color: bool,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    pub(crate) debug: bool,
}

impl Cli {
    /// Merge config file values into CLI (CLI args take precedence)
    pub(crate) fn with_config(mut self, config: &Config) -> Self {
        if !self.strict_slots && config.strict_slots {
            self.strict_slots = true;
        }
        if !self.debug && config.debug {
            self.debug = true;
        }
        if self.ledger.is_none() {
            self.ledger = config.ledger.clone();
        }
        if self.timezone.is_none() {
            self.timezone = config.timezone.clone();
        }
        self
    }

    pub(crate) fn ledger_path(&self) -> PathBuf {
        self.ledger
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LEDGER_FILE))
    }

    pub(crate) fn slot_check(&self) -> SlotCheck {
        if self.strict_slots {
            SlotCheck::Strict
        } else {
            SlotCheck::Positional
        }
    }

    pub(crate) fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }
}
