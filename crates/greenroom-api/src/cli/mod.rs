//! CLI command definitions and dispatch for the `greenroom` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod notify;
pub mod status;

use clap::{Parser, Subcommand};

/// Rehearsal scheduling chat bot and management API.
#[derive(Parser)]
#[command(name = "greenroom", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the webhook and API server.
    Serve {
        /// Port to listen on.
        #[arg(short, long, default_value = "8787")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Run the day-before practice reminder fan-out once and exit.
    ///
    /// The same work the /scheduled/daily_notification endpoint does;
    /// useful under cron or for a manual re-run after an outage.
    Notify {
        /// Practice date to notify for (YYYY-MM-DD). Defaults to
        /// tomorrow.
        #[arg(long)]
        date: Option<String>,
    },

    /// Show a storage summary (teams, groups, practices, accounts).
    Status,
}
