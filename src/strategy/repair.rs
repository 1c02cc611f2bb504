//! Self-repair of a fixed structure set.
//!
//! Worn structures are marked for removal so the engine clears them, and
//! vacant cells are rebuilt, falling down the structure hierarchy when the
//! preferred type cannot be afforded.

use tracing::{debug, warn};

use crate::board::{Coord, GameBoard};
use crate::config::{GameConfig, UnitType};
use crate::error::AgentResult;
use crate::strategy::construction::build;

/// Rebuild order, from most to least valuable.
pub const HIERARCHY: [UnitType; 3] = [UnitType::Turret, UnitType::Wall, UnitType::Support];

/// Keep `unit` standing at every cell of `locations`.
///
/// Present structures below `hp_threshold` of their max health are marked
/// for removal. Vacant cells are built as `unit` first, then as each cheaper
/// type after it in [`HIERARCHY`] for whatever is still vacant.
///
/// Returns `true` when every vacant cell was filled.
///
/// # Errors
///
/// Propagates construction errors.
pub fn repair<B: GameBoard + ?Sized>(
    board: &mut B,
    config: &GameConfig,
    locations: &[Coord],
    unit: UnitType,
    hp_threshold: f64,
    upgrade: bool,
) -> AgentResult<bool> {
    let (mut missing, present): (Vec<Coord>, Vec<Coord>) = locations
        .iter()
        .copied()
        .partition(|&cell| board.unit_at(cell).is_none());

    let worn: Vec<Coord> = present
        .into_iter()
        .filter(|&cell| {
            board
                .unit_at(cell)
                .is_some_and(|u| !u.pending_removal && u.health_fraction() < hp_threshold)
        })
        .collect();
    if !worn.is_empty() {
        let marked = board.attempt_remove(&worn);
        debug!(?unit, marked, "marked worn structures for removal");
    }

    if missing.is_empty() {
        return Ok(true);
    }

    let Some(start) = HIERARCHY.iter().position(|&tier| tier == unit) else {
        warn!(?unit, missing = missing.len(), "cannot repair with a mobile unit");
        return Ok(false);
    };

    let wanted = missing.len();
    let mut built = 0;
    for &tier in &HIERARCHY[start..] {
        built += build(board, config, &missing, tier, upgrade, false)?;
        missing.retain(|&cell| board.unit_at(cell).is_none());
        if missing.is_empty() {
            break;
        }
    }

    debug!(?unit, wanted, built, "repair pass");
    Ok(built as usize == wanted)
}
