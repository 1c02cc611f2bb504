//! Output formatting utilities for CLI.

use std::fmt::Write;

use serde::Serialize;
use upton::board::{Command, WireSubmission};
use upton::strategy::DefenseOutcome;
use upton::{GameConfig, Stance, TurnReport, TurnSubmission};

/// JSON-serializable turn result.
#[derive(Debug, Serialize)]
pub(super) struct JsonTurn<'a> {
    /// What the strategy did.
    pub(super) report: &'a TurnReport,
    /// Commands in the engine's wire format.
    pub(super) submission: WireSubmission,
}

impl<'a> JsonTurn<'a> {
    /// Pair a report with its submission.
    pub(super) fn new(report: &'a TurnReport, submission: &TurnSubmission, config: &GameConfig) -> Self {
        Self {
            report,
            submission: submission.to_wire(config),
        }
    }
}

fn describe(command: &Command, config: &GameConfig) -> String {
    match *command {
        Command::Spawn {
            unit,
            location,
            count,
        } => {
            let shorthand = config.shorthand(unit);
            if count > 1 {
                format!("{shorthand} x{count} ({}, {})", location.x, location.y)
            } else {
                format!("{shorthand} ({}, {})", location.x, location.y)
            }
        }
        Command::Upgrade { location } => format!("UP ({}, {})", location.x, location.y),
        Command::Remove { location } => format!("RM ({}, {})", location.x, location.y),
    }
}

fn stance_text(stance: Stance) -> String {
    match stance {
        Stance::Hold => "hold".to_string(),
        Stance::Attack(flank) => format!("attack {flank:?} corner"),
    }
}

/// Format a turn as human-readable text.
pub(super) fn format_text(report: &TurnReport, submission: &TurnSubmission, config: &GameConfig) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Turn {} ({:?})", report.turn, report.phase);
    if let Some(decision) = &report.decision {
        let _ = writeln!(
            output,
            "  Decision: {} (a={} b={} c={} d={} e={} h={}, hold turns {})",
            stance_text(decision.stance),
            decision.vanguard,
            decision.wave,
            decision.supports,
            decision.release_demolishers,
            decision.reserve,
            decision.release_scouts,
            decision.state.hold_turns,
        );
    }
    for (flank, outcome) in &report.defense {
        let outcome = match outcome {
            DefenseOutcome::NoScreen => "no screen".to_string(),
            DefenseOutcome::ScreenOnly => "screen only".to_string(),
            DefenseOutcome::Escalated { level, aborted } => {
                format!("escalated to {level}{}", if *aborted { " (aborted)" } else { "" })
            }
        };
        let _ = writeln!(output, "  Defense {flank:?}: {outcome}");
    }
    let _ = writeln!(output, "  SP spent: {:.1}", report.sp_spent);

    for (phase, commands) in [("Build", &submission.build), ("Deploy", &submission.deploy)] {
        let _ = writeln!(output, "  {phase} ({}):", commands.len());
        for command in commands {
            let _ = writeln!(output, "    {}", describe(command, config));
        }
    }

    output
}
