//! CLI commands and argument parsing

use crate::types::SinkFormat;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Daily snapshot of a B3 index portfolio
#[derive(Parser, Debug)]
#[command(name = "ibov-snapshot")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch every page and write the snapshot
    Run(RunArgs),

    /// Print the encoded request token for a page
    Token {
        /// 1-based page number
        page: u32,
    },

    /// Print the request parameters held in a token
    Decode {
        /// Base64 token as used in the request path
        token: String,
    },
}

/// Overrides for a snapshot run; unset flags keep the config values
#[derive(Args, Debug, Default, Clone)]
pub struct RunArgs {
    /// Output destination (local path or cloud URL)
    /// Supports: /path, s3://bucket/path, r2://bucket/path, gs://bucket/path, az://container/path
    #[arg(short, long)]
    pub output: Option<String>,

    /// Output format
    #[arg(short, long)]
    pub format: Option<SinkFormat>,

    /// Dataset name used in the output file name
    #[arg(long)]
    pub name: Option<String>,

    /// Run date stamped on the output (YYYY-MM-DD, default today)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Index code to snapshot (e.g., IBOV, IBXX)
    #[arg(long)]
    pub index: Option<String>,

    /// Pages fetched concurrently after discovery
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Give up on pages not started within this many seconds
    #[arg(long)]
    pub deadline_secs: Option<u64>,

    /// Fail the run when the API reports more pages than this
    #[arg(long)]
    pub max_pages: Option<u32>,

    /// Disable the request throttle
    #[arg(long)]
    pub no_throttle: bool,
}
