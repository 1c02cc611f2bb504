//! Lane strength estimates from a handful of opponent probe cells.
//!
//! Each flank yields four features: upgraded turrets in the outer (`x`) and
//! inner (`y`) probe rows, unupgraded turrets across both rows (`z`), and the
//! corner wall state (`w`: 0 empty, 1 wall, 2 upgraded wall). They are scored
//! with `g(i, j, t) = 5.5·t + 2·i + 3·j`:
//!
//! - `term_a = g((x + z/4)·w, y·w, w)`: strength if an attacker must cross
//!   the corner
//! - `term_b = g(x + z/4, y, w)`: the lighter bypass estimate

use serde::Serialize;

use crate::board::{Coord, Flank, GameBoard, StationaryUnit};
use crate::config::{Tuning, UnitType};
use crate::strategy::layout::{MID_BOARD, lane_probes};

/// Score weight of the corner wall tier.
const CORNER_WEIGHT: f64 = 5.5;

/// Weight of discounted unupgraded turrets relative to upgraded ones.
const UNUPGRADED_DISCOUNT: f64 = 0.25;

/// Raw probe counts for one flank.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LaneFeatures {
    /// Upgraded turrets in the outer probe row.
    pub x: u32,
    /// Upgraded turrets in the inner probe row.
    pub y: u32,
    /// Unupgraded turrets across both rows.
    pub z: u32,
    /// Corner wall tier.
    pub w: u32,
}

/// Scored estimate of one flank's defense.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LaneReport {
    /// Flank the probes belong to.
    pub flank: Flank,
    /// Raw counts.
    pub features: LaneFeatures,
    /// Corner-crossing estimate.
    pub term_a: f64,
    /// Bypass estimate.
    pub term_b: f64,
}

/// The linear lane score.
#[must_use]
pub fn g(i: f64, j: f64, t: f64) -> f64 {
    CORNER_WEIGHT * t + 2.0 * i + 3.0 * j
}

impl LaneReport {
    /// Score a flank from its features.
    #[must_use]
    pub fn from_features(flank: Flank, features: LaneFeatures) -> Self {
        let x = f64::from(features.x);
        let y = f64::from(features.y);
        let z = f64::from(features.z);
        let w = f64::from(features.w);
        let turrets = x + UNUPGRADED_DISCOUNT * z;

        Self {
            flank,
            features,
            term_a: g(turrets * w, y * w, w),
            term_b: g(turrets, y, w),
        }
    }

    /// The corner term counted in both estimates.
    #[must_use]
    pub fn corner_bonus(&self) -> f64 {
        CORNER_WEIGHT * f64::from(self.features.w)
    }

    /// Combined estimate with the doubled corner term taken out once.
    ///
    /// Zero exactly when the probes saw no defense at all.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.term_a - self.corner_bonus() + self.term_b
    }

    /// Share of the combined estimate that comes from the bypass route.
    ///
    /// `None` for an undefended flank.
    #[must_use]
    pub fn bypass_ratio(&self) -> Option<f64> {
        let total = self.total();
        if total == 0.0 {
            None
        } else {
            Some((self.term_b - self.corner_bonus()) / total)
        }
    }
}

fn corner_tier(unit: Option<&StationaryUnit>) -> u32 {
    match unit {
        Some(u) if u.unit_type == UnitType::Wall && u.upgraded => 2,
        Some(u) if u.unit_type == UnitType::Wall => 1,
        _ => 0,
    }
}

fn count_turrets<B: GameBoard + ?Sized>(
    board: &B,
    cells: impl Iterator<Item = Coord>,
    upgraded: bool,
) -> u32 {
    let count = cells
        .filter(|&cell| board.unit_at(cell).is_some_and(|u| u.is_turret(upgraded)))
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Read the probe cells of a flank.
#[must_use]
pub fn features<B: GameBoard + ?Sized>(board: &B, flank: Flank) -> LaneFeatures {
    let probes = lane_probes(flank);

    LaneFeatures {
        x: count_turrets(board, probes.outer.iter().copied(), true),
        y: count_turrets(board, probes.inner.iter().copied(), true),
        z: count_turrets(board, probes.turret_cells(), false),
        w: corner_tier(board.unit_at(probes.corner)),
    }
}

/// Probe and score one flank. A pure read of the board.
#[must_use]
pub fn evaluate<B: GameBoard + ?Sized>(board: &B, flank: Flank) -> LaneReport {
    LaneReport::from_features(flank, features(board, flank))
}

/// Probe and score both flanks, left first.
#[must_use]
pub fn evaluate_both<B: GameBoard + ?Sized>(board: &B) -> [LaneReport; 2] {
    Flank::BOTH.map(|flank| evaluate(board, flank))
}

/// Whether the opponent's mid-board is packed with structures.
///
/// Counts one per occupied cell of the sampled rectangle.
#[must_use]
pub fn mid_board_saturation<B: GameBoard + ?Sized>(board: &B, tuning: &Tuning) -> bool {
    let (columns, rows) = MID_BOARD;
    let occupied = rows
        .flat_map(|y| columns.clone().map(move |x| Coord::new(x, y)))
        .filter(|&cell| board.unit_at(cell).is_some())
        .count();
    occupied >= tuning.saturation_threshold as usize
}
