//! Fixed build orders for the first turns.

use serde::Serialize;
use tracing::debug;

use crate::board::{Coord, GameBoard};
use crate::config::UnitType;

/// Number of scripted turns; adaptive play starts at this turn.
pub const OPENING_TURNS: u32 = 5;

/// One scripted board call.
#[derive(Debug, Clone, Copy)]
pub enum Step {
    /// Spawn a structure at each cell.
    Build(UnitType, &'static [Coord]),
    /// Upgrade the structures at each cell.
    Upgrade(&'static [Coord]),
    /// Mark the structures at each cell for removal.
    Remove(&'static [Coord]),
    /// Spawn `count` mobile units at each cell.
    Deploy(UnitType, &'static [Coord], u32),
}

const fn c(x: i32, y: i32) -> Coord {
    Coord::new(x, y)
}

const T0_TURRETS: &[Coord] = &[c(3, 12), c(24, 12), c(10, 10), c(17, 10)];
const T0_WALLS: &[Coord] = &[c(2, 12), c(2, 13), c(4, 12), c(23, 12), c(24, 13), c(25, 12)];

const T1_WALLS: &[Coord] = &[c(1, 13), c(2, 12), c(3, 13), c(24, 13), c(25, 12), c(26, 13)];
const T1_SUPPORTS: &[Coord] = &[c(17, 6)];

const T2_FUNNEL: &[Coord] = &[
    c(4, 11),
    c(5, 10),
    c(6, 9),
    c(7, 8),
    c(8, 7),
    c(9, 6),
    c(10, 5),
    c(11, 4),
    c(12, 3),
    c(13, 2),
    c(14, 2),
    c(15, 3),
    c(16, 4),
    c(17, 5),
    c(18, 6),
    c(19, 7),
    c(20, 8),
];
const T2_CORNERS: &[Coord] = &[c(0, 13), c(1, 13), c(2, 13), c(26, 13), c(27, 13)];
const T2_CENTER_TURRETS: &[Coord] = &[c(10, 10), c(17, 10)];

const BACK_ROW: &[Coord] = &[
    c(0, 13),
    c(1, 13),
    c(2, 13),
    c(4, 13),
    c(24, 13),
    c(25, 13),
    c(26, 13),
    c(27, 13),
];
const T3_WALLS: &[Coord] = &[
    c(4, 12),
    c(21, 12),
    c(22, 12),
    c(23, 12),
    c(19, 9),
    c(19, 10),
    c(20, 10),
];
const T3_TURRETS: &[Coord] = &[c(20, 9), c(22, 11)];

const T4_UPGRADE: &[Coord] = &[c(20, 9)];
const T4_SIDE_WALLS: &[Coord] = &[c(4, 12), c(23, 12)];

const TURN_0: &[Step] = &[
    Step::Build(UnitType::Turret, T0_TURRETS),
    Step::Upgrade(T0_TURRETS),
    Step::Build(UnitType::Wall, T0_WALLS),
    Step::Remove(T0_WALLS),
];

const TURN_1: &[Step] = &[
    Step::Build(UnitType::Wall, T1_WALLS),
    Step::Build(UnitType::Support, T1_SUPPORTS),
    Step::Remove(T1_WALLS),
    Step::Remove(T1_SUPPORTS),
    Step::Deploy(UnitType::Scout, &[c(20, 6)], 7),
];

const TURN_2: &[Step] = &[
    Step::Build(UnitType::Wall, T2_FUNNEL),
    Step::Build(UnitType::Wall, T2_CORNERS),
    Step::Remove(T2_CORNERS),
    Step::Remove(T2_CENTER_TURRETS),
    Step::Deploy(UnitType::Interceptor, &[c(20, 6)], 1),
];

const TURN_3: &[Step] = &[
    Step::Build(UnitType::Wall, BACK_ROW),
    Step::Build(UnitType::Wall, T3_WALLS),
    Step::Build(UnitType::Turret, T3_TURRETS),
    Step::Remove(BACK_ROW),
    Step::Remove(T3_WALLS),
    Step::Remove(T3_TURRETS),
    Step::Deploy(UnitType::Interceptor, &[c(22, 8), c(23, 9)], 2),
];

const TURN_4: &[Step] = &[
    Step::Build(UnitType::Turret, T3_TURRETS),
    Step::Upgrade(T4_UPGRADE),
    Step::Build(UnitType::Wall, BACK_ROW),
    Step::Build(UnitType::Wall, T4_SIDE_WALLS),
    Step::Remove(BACK_ROW),
    Step::Remove(T4_SIDE_WALLS),
    Step::Deploy(UnitType::Interceptor, &[c(22, 8)], 2),
];

/// The script for a turn, or `None` once the opening is over.
#[must_use]
pub fn script(turn: u32) -> Option<&'static [Step]> {
    match turn {
        0 => Some(TURN_0),
        1 => Some(TURN_1),
        2 => Some(TURN_2),
        3 => Some(TURN_3),
        4 => Some(TURN_4),
        _ => None,
    }
}

/// Counts of what an opening turn got through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OpeningSummary {
    /// Structures spawned.
    pub built: u32,
    /// Structures upgraded.
    pub upgraded: u32,
    /// Structures marked for removal.
    pub removed: u32,
    /// Mobile units spawned.
    pub deployed: u32,
}

/// Play the scripted turn. Rejected calls are skipped.
pub fn play<B: GameBoard + ?Sized>(board: &mut B, turn: u32) -> OpeningSummary {
    let mut summary = OpeningSummary::default();
    for step in script(turn).unwrap_or_default() {
        match *step {
            Step::Build(unit, cells) => summary.built += board.attempt_spawn(unit, cells, 1),
            Step::Upgrade(cells) => summary.upgraded += board.attempt_upgrade(cells),
            Step::Remove(cells) => summary.removed += board.attempt_remove(cells),
            Step::Deploy(unit, cells, count) => {
                summary.deployed += board.attempt_spawn(unit, cells, count);
            }
        }
    }
    debug!(turn, ?summary, "opening turn");
    summary
}
