//! CLI subcommand definitions

use std::path::PathBuf;

use clap::{Args, Subcommand};

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Find the newest weekly post, read its menu and record it (default)
    Run,
    /// Record menu text supplied directly instead of fetched
    Ingest(TextArgs),
    /// Extract and print the two records without writing them
    Parse(TextArgs),
    /// Report whether a week is already recorded
    Check {
        /// Reference date (YYYYMMDD or YYYY-MM-DD, default: today)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Print every recorded row
    List,
    /// Create an empty ledger containing only the header row
    Init,
}

/// Menu text plus the date it belongs to
#[derive(Args, Debug, Clone)]
pub(crate) struct TextArgs {
    /// Reference date (YYYYMMDD or YYYY-MM-DD, default: today)
    #[arg(short, long)]
    pub(crate) date: Option<String>,

    /// Read the menu text from a file
    #[arg(short, long, value_name = "PATH", conflicts_with = "text")]
    pub(crate) file: Option<PathBuf>,

    /// Menu text as recognized from the sign; "-" or absent reads stdin
    pub(crate) text: Option<String>,
}
