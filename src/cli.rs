//! CLI command implementations for Upton.

pub(crate) mod replay;
pub(crate) mod turn;

mod output;

use clap::ValueEnum;
use std::error::Error;
use std::fmt;
use std::path::Path;

use upton::{AgentError, ConfigError, GameConfig, SnapshotBoard, TurnSnapshot};

/// Output format for every command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<AgentError> for CliError {
    fn from(e: AgentError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(e.to_string())
    }
}

/// Load the configuration file, or the stock catalog without one.
pub(crate) fn load_config(path: Option<&Path>) -> Result<GameConfig, CliError> {
    match path {
        Some(path) => GameConfig::load(path)
            .map_err(|e| CliError::new(format!("Failed to load {}: {e}", path.display()))),
        None => Ok(GameConfig::default()),
    }
}

/// Load a snapshot file into a board.
pub(crate) fn load_board(path: &Path, config: &GameConfig) -> Result<SnapshotBoard, CliError> {
    let snapshot = TurnSnapshot::load(path)
        .map_err(|e| CliError::new(format!("Failed to load {}: {e}", path.display())))?;
    Ok(SnapshotBoard::from_snapshot(config, &snapshot)?)
}
