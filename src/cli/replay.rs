//! Replay command implementation.

use super::output::{JsonTurn, format_text};
use super::{CliError, OutputFormat, load_board, load_config};
use std::path::{Path, PathBuf};
use upton::Agent;

/// Execute the replay command.
///
/// Snapshots are played in order through one agent, so hold turns carry
/// from one snapshot to the next.
///
/// # Errors
///
/// Returns an error if a file cannot be loaded or a turn aborts.
pub(crate) fn execute(
    snapshots: &[PathBuf],
    config: Option<&Path>,
    seed: u64,
    format: OutputFormat,
) -> Result<(), CliError> {
    let config = load_config(config)?;
    let mut agent = Agent::new(config, seed);
    let mut turns = Vec::with_capacity(snapshots.len());

    for path in snapshots {
        let mut board = load_board(path, agent.config())?;
        let report = agent
            .on_turn(&mut board)
            .map_err(|e| CliError::new(format!("{}: {e}", path.display())))?;
        let submission = board
            .submission()
            .cloned()
            .ok_or_else(|| CliError::new("turn was not submitted"))?;

        match format {
            OutputFormat::Text => {
                print!("{}", format_text(&report, &submission, agent.config()));
                println!();
            }
            OutputFormat::Json => turns.push((report, submission)),
        }
    }

    if format == OutputFormat::Json {
        let json: Vec<_> = turns
            .iter()
            .map(|(report, submission)| JsonTurn::new(report, submission, agent.config()))
            .collect();
        println!("{}", serde_json::to_string_pretty(&json)?);
    }

    Ok(())
}
