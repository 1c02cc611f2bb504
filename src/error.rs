//! Error types for the agent.

use crate::config::UnitType;
use thiserror::Error;

/// Errors that abort the current turn's decision pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgentError {
    /// The board upgraded a different number of units than it just spawned
    /// for the same batch. The board is assumed trustworthy, so this is a
    /// logic error and no further construction is attempted this turn.
    #[error("{unit:?} batch spawned {spawned} units but upgraded {upgraded}")]
    UpgradeMismatch {
        /// Unit type of the batch.
        unit: UnitType,
        /// Units the board reported as spawned.
        spawned: u32,
        /// Units the board reported as upgraded.
        upgraded: u32,
    },

    /// A numeric flank selector outside `1..=2`.
    #[error("invalid flank selector: {0} (expected 1 = left or 2 = right)")]
    InvalidFlank(u8),
}

/// Errors raised while loading configuration or turn snapshots.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not valid JSON for the expected shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// `unitInformation` has fewer entries than the six unit kinds.
    #[error("unitInformation has {0} entries, expected 6")]
    MissingUnit(usize),

    /// A turn snapshot describes an impossible board.
    #[error("invalid snapshot: {0}")]
    Snapshot(String),
}

/// Result type for a turn's decision pass.
pub type AgentResult<T> = Result<T, AgentError>;
