//! Active defense of one of our corners.
//!
//! Each turn a temporary wall screen goes up in the corner. When the
//! opponent's matching corner is open, the screen is reinforced in steps
//! scaled to the MP the opponent could throw at it.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::board::{Coord, Flank, GameBoard, absent_or_removing};
use crate::config::{GameConfig, PlayerIndex, Resource, UnitType};
use crate::error::AgentResult;
use crate::strategy::construction::build;
use crate::strategy::layout::{ActiveDefenseLayout, active_defense};

/// What the active-defense pass did on one flank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DefenseOutcome {
    /// The wall screen could not be completed.
    NoScreen,
    /// Screen built; the opponent's corner is closed so nothing more was done.
    ScreenOnly,
    /// Screen built and reinforced.
    Escalated {
        /// Reinforcement steps completed, 0 to 3.
        level: u8,
        /// Whether a step failed and the rest were skipped.
        aborted: bool,
    },
}

/// Whether the opponent's corner facing this layout is open.
fn corner_open<B: GameBoard + ?Sized>(board: &B, layout: &ActiveDefenseLayout) -> bool {
    absent_or_removing(board.unit_at(layout.near_probe))
        && layout
            .alternate_probes
            .iter()
            .any(|&cell| absent_or_removing(board.unit_at(cell)))
}

/// Make sure an upgraded turret stands at `cell`.
fn ensure_upgraded_turret<B: GameBoard + ?Sized>(
    board: &mut B,
    config: &GameConfig,
    cell: Coord,
) -> AgentResult<bool> {
    match board.unit_at(cell).copied() {
        None => {
            build(board, config, &[cell], UnitType::Turret, true, false)?;
            Ok(board.unit_at(cell).is_some_and(|u| u.is_turret(true)))
        }
        Some(unit) if unit.is_turret(true) => Ok(true),
        Some(unit) if unit.is_turret(false) && !unit.pending_removal => {
            Ok(board.attempt_upgrade(&[cell]) == 1)
        }
        Some(_) => Ok(false),
    }
}

/// Run active defense on our `flank` corner.
///
/// # Errors
///
/// Propagates construction errors.
pub fn defend<B: GameBoard + ?Sized>(
    board: &mut B,
    config: &GameConfig,
    flank: Flank,
) -> AgentResult<DefenseOutcome> {
    let layout = active_defense(flank);
    let walls = layout.walls();

    let screened = build(board, config, &walls, UnitType::Wall, false, true)?;
    if screened < 2 {
        info!(?flank, screened, "wall screen incomplete");
        return Ok(DefenseOutcome::NoScreen);
    }

    if !corner_open(board, layout) {
        debug!(?flank, "opponent corner closed");
        return Ok(DefenseOutcome::ScreenOnly);
    }

    let enemy_mp = board.resource(Resource::Mp, PlayerIndex::Enemy);
    let [walls_at, first_turret_at, second_turret_at] = config.tuning.escalation_mp;
    let mut level = 0;

    if enemy_mp >= walls_at {
        if board.attempt_upgrade(&walls) != 2 {
            warn!(?flank, enemy_mp, "could not upgrade wall screen");
            return Ok(DefenseOutcome::Escalated { level, aborted: true });
        }
        level = 1;
    }
    for (threshold, slot) in [(first_turret_at, 2), (second_turret_at, 3)] {
        if enemy_mp < threshold {
            break;
        }
        if !ensure_upgraded_turret(board, config, layout.slots[slot])? {
            warn!(?flank, enemy_mp, slot, "could not place upgraded turret");
            return Ok(DefenseOutcome::Escalated { level, aborted: true });
        }
        level += 1;
    }

    debug!(?flank, enemy_mp, level, "active defense escalated");
    Ok(DefenseOutcome::Escalated { level, aborted: false })
}
