//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, RunArgs};
use crate::cli::logging;
use crate::config::SnapshotConfig;
use crate::engine::SnapshotEngine;
use crate::error::Result;
use crate::params::{EncodedToken, ParameterEncoder};
use chrono::Local;
use tracing::{debug, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command and return the process exit code
    pub async fn run(&self) -> Result<i32> {
        let config = self.load_config()?;
        let log_file = logging::init(&config.logging, self.cli.verbose, Local::now().date_naive())?;
        if let Some(path) = log_file {
            debug!("Logging to {}", path.display());
        }

        match &self.cli.command {
            Commands::Run(args) => self.snapshot(config, args).await,
            Commands::Token { page } => self.token(&config, *page),
            Commands::Decode { token } => self.decode(token),
        }
    }

    /// Load the config file, or defaults when none was given
    fn load_config(&self) -> Result<SnapshotConfig> {
        match &self.cli.config {
            Some(path) => SnapshotConfig::load(path),
            None => Ok(SnapshotConfig::default()),
        }
    }

    async fn snapshot(&self, mut config: SnapshotConfig, args: &RunArgs) -> Result<i32> {
        apply_overrides(&mut config, args);

        let mut engine = SnapshotEngine::from_config(&config)?;
        if let Some(date) = args.date {
            engine = engine.with_run_date(date);
        }
        info!(
            "Writing {} snapshot to {}",
            config.sink.format, config.sink.destination
        );

        let report = engine.run().await?;
        println!("{}", report.summary());
        Ok(report.status.exit_code())
    }

    fn token(&self, config: &SnapshotConfig, page: u32) -> Result<i32> {
        let token = config.encoder().encode(page)?;
        println!("{token}");
        Ok(0)
    }

    fn decode(&self, token: &str) -> Result<i32> {
        let request = ParameterEncoder::decode(&EncodedToken::new(token))?;
        println!("{}", serde_json::to_string(&request)?);
        Ok(0)
    }
}

/// Apply command-line overrides on top of the loaded config
pub(crate) fn apply_overrides(config: &mut SnapshotConfig, args: &RunArgs) {
    if let Some(output) = &args.output {
        config.sink.destination.clone_from(output);
    }
    if let Some(format) = args.format {
        config.sink.format = format;
    }
    if let Some(name) = &args.name {
        config.sink.dataset_name.clone_from(name);
    }
    if let Some(index) = &args.index {
        config.source.index.clone_from(index);
    }
    if let Some(concurrency) = args.concurrency {
        config.run.max_concurrency = concurrency;
    }
    if let Some(deadline) = args.deadline_secs {
        config.run.deadline_secs = Some(deadline);
    }
    if let Some(max_pages) = args.max_pages {
        config.run.max_pages = max_pages;
    }
    if args.no_throttle {
        config.http.throttle_ms = 0;
    }
}
