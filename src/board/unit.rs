//! Stationary unit attributes.

use crate::config::UnitType;

/// A structure standing on the board.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StationaryUnit {
    /// Wall, support or turret.
    pub unit_type: UnitType,
    /// Remaining hit points.
    pub health: f64,
    /// Hit points at full health (reflects upgrades).
    pub max_health: f64,
    /// Whether the structure has been upgraded.
    pub upgraded: bool,
    /// Whether the structure will be removed at the end of the turn.
    pub pending_removal: bool,
}

impl StationaryUnit {
    /// A freshly built structure at full health.
    #[must_use]
    pub const fn new(unit_type: UnitType, max_health: f64) -> Self {
        Self {
            unit_type,
            health: max_health,
            max_health,
            upgraded: false,
            pending_removal: false,
        }
    }

    /// Remaining health as a fraction of full health.
    ///
    /// A unit reporting no maximum is treated as healthy.
    #[must_use]
    pub fn health_fraction(&self) -> f64 {
        if self.max_health > 0.0 {
            self.health / self.max_health
        } else {
            1.0
        }
    }

    /// Whether this is a turret at the given upgrade tier.
    #[must_use]
    pub fn is_turret(&self, upgraded: bool) -> bool {
        self.unit_type == UnitType::Turret && self.upgraded == upgraded
    }
}

/// A probe cell that is empty or about to be emptied.
#[must_use]
pub fn absent_or_removing(unit: Option<&StationaryUnit>) -> bool {
    unit.is_none_or(|u| u.pending_removal)
}
