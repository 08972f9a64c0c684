//! CLI module
//!
//! Command-line interface for snapshot runs.
//!
//! # Commands
//!
//! - `run` - Fetch every page and write the snapshot
//! - `token` - Print the request token for a page
//! - `decode` - Print the parameters held in a token

mod commands;
pub mod logging;
mod runner;

pub use commands::{Cli, Commands, RunArgs};
pub use runner::Runner;
