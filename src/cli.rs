//! Command-line argument parsing for the `revise` binary

use std::path::PathBuf;

use clap::Parser;

use crate::config::EngineConfig;

/// Replay an edit script and report the resulting buffer and history
#[derive(Parser, Debug)]
#[command(name = "revise", version, about = "Replay text edit scripts with undo/redo")]
pub struct CliArgs {
    /// YAML edit script to replay
    #[arg(value_name = "SCRIPT")]
    pub script: PathBuf,

    /// Print a JSON report instead of text
    #[arg(long)]
    pub json: bool,

    /// Override the history limit
    #[arg(long, value_name = "N")]
    pub max_history: Option<usize>,

    /// Config file to use instead of ~/.config/revise/config.yaml
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl CliArgs {
    /// Resolve the engine config from the config file and CLI overrides
    pub fn engine_config(&self) -> anyhow::Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::load_from(path)?,
            None => EngineConfig::load(),
        };
        if let Some(max) = self.max_history {
            config.max_history_size = max;
        }
        Ok(config)
    }
}
