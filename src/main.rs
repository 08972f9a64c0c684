//! ibov-snapshot CLI
//!
//! Exit codes: 0 complete, 2 partial, 1 failed or error.

use clap::Parser;
use ibov_snapshot::cli::{Cli, Runner};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let runner = Runner::new(cli);

    match runner.run().await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
