//! Turn command implementation.

use super::output::{JsonTurn, format_text};
use super::{CliError, OutputFormat, load_board, load_config};
use std::path::Path;
use upton::{Agent, AgentState};

/// Execute the turn command.
///
/// # Errors
///
/// Returns an error if a file cannot be loaded or the turn aborts.
pub(crate) fn execute(
    state: &Path,
    config: Option<&Path>,
    seed: u64,
    format: OutputFormat,
    carried: AgentState,
) -> Result<(), CliError> {
    let config = load_config(config)?;
    let mut board = load_board(state, &config)?;
    let mut agent = Agent::new(config, seed);
    agent.set_state(carried);

    let report = agent.on_turn(&mut board)?;
    let submission = board
        .submission()
        .ok_or_else(|| CliError::new("turn was not submitted"))?;

    match format {
        OutputFormat::Text => print!("{}", format_text(&report, submission, agent.config())),
        OutputFormat::Json => {
            let json = JsonTurn::new(&report, submission, agent.config());
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }

    Ok(())
}
