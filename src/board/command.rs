//! Outbound commands.

use serde::Serialize;

use crate::board::Coord;
use crate::config::{GameConfig, UnitType};

/// A command accepted by the board during a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Place `count` units of a kind at a location.
    Spawn {
        /// Unit kind.
        unit: UnitType,
        /// Target cell.
        location: Coord,
        /// Units placed (always 1 for structures).
        count: u32,
    },
    /// Upgrade our structure at a location.
    Upgrade {
        /// Target cell.
        location: Coord,
    },
    /// Remove our structure at a location at the end of the turn.
    Remove {
        /// Target cell.
        location: Coord,
    },
}

/// Engine wire format for one command: `[shorthand, x, y]`.
pub type WireCommand = (String, i32, i32);

/// Upgrade shorthand on the wire.
const UPGRADE_SHORTHAND: &str = "UP";

/// Removal shorthand on the wire.
const REMOVE_SHORTHAND: &str = "RM";

impl Command {
    /// Whether the command belongs to the build phase (structures) rather
    /// than the deploy phase (mobile units).
    #[must_use]
    pub const fn is_build(&self) -> bool {
        match self {
            Command::Spawn { unit, .. } => unit.is_stationary(),
            Command::Upgrade { .. } | Command::Remove { .. } => true,
        }
    }

    /// Expand into wire entries; a spawn of `count` units repeats its entry.
    #[must_use]
    pub fn to_wire(&self, config: &GameConfig) -> Vec<WireCommand> {
        match *self {
            Command::Spawn {
                unit,
                location,
                count,
            } => (0..count)
                .map(|_| (config.shorthand(unit).to_string(), location.x, location.y))
                .collect(),
            Command::Upgrade { location } => {
                vec![(UPGRADE_SHORTHAND.to_string(), location.x, location.y)]
            }
            Command::Remove { location } => {
                vec![(REMOVE_SHORTHAND.to_string(), location.x, location.y)]
            }
        }
    }
}

/// Everything a turn sends to the engine, split by phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnSubmission {
    /// Structure spawns, upgrades and removals, in issue order.
    pub build: Vec<Command>,
    /// Mobile unit spawns, in issue order.
    pub deploy: Vec<Command>,
}

/// Serializable wire form of a submission.
#[derive(Debug, Serialize)]
pub struct WireSubmission {
    /// Build-phase entries.
    pub build: Vec<WireCommand>,
    /// Deploy-phase entries.
    pub deploy: Vec<WireCommand>,
}

impl TurnSubmission {
    /// Split an ordered command log into the two phases.
    #[must_use]
    pub fn from_log(log: &[Command]) -> Self {
        let (build, deploy) = log.iter().copied().partition(Command::is_build);
        Self { build, deploy }
    }

    /// Render in the engine's wire format.
    #[must_use]
    pub fn to_wire(&self, config: &GameConfig) -> WireSubmission {
        let expand = |commands: &[Command]| {
            commands
                .iter()
                .flat_map(|c| c.to_wire(config))
                .collect::<Vec<_>>()
        };
        WireSubmission {
            build: expand(&self.build),
            deploy: expand(&self.deploy),
        }
    }

    /// Count spawns of a unit kind across both phases.
    #[must_use]
    pub fn spawned(&self, unit: UnitType) -> u32 {
        self.build
            .iter()
            .chain(&self.deploy)
            .filter_map(|c| match c {
                Command::Spawn { unit: u, count, .. } if *u == unit => Some(*count),
                _ => None,
            })
            .sum()
    }

    /// Count upgrade commands.
    #[must_use]
    pub fn upgrades(&self) -> usize {
        self.build
            .iter()
            .filter(|c| matches!(c, Command::Upgrade { .. }))
            .count()
    }

    /// Count removal commands.
    #[must_use]
    pub fn removals(&self) -> usize {
        self.build
            .iter()
            .filter(|c| matches!(c, Command::Remove { .. }))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_by_phase() {
        let log = [
            Command::Spawn {
                unit: UnitType::Turret,
                location: Coord::new(3, 12),
                count: 1,
            },
            Command::Spawn {
                unit: UnitType::Scout,
                location: Coord::new(20, 6),
                count: 7,
            },
            Command::Upgrade {
                location: Coord::new(3, 12),
            },
        ];
        let submission = TurnSubmission::from_log(&log);
        assert_eq!(submission.build.len(), 2);
        assert_eq!(submission.deploy.len(), 1);
        assert_eq!(submission.spawned(UnitType::Scout), 7);
        assert_eq!(submission.spawned(UnitType::Turret), 1);
        assert_eq!(submission.upgrades(), 1);
        assert_eq!(submission.removals(), 0);
    }

    #[test]
    fn test_wire_format_repeats_mobile_spawns() {
        let config = GameConfig::default();
        let submission = TurnSubmission::from_log(&[
            Command::Spawn {
                unit: UnitType::Interceptor,
                location: Coord::new(22, 8),
                count: 2,
            },
            Command::Remove {
                location: Coord::new(2, 13),
            },
        ]);
        let wire = submission.to_wire(&config);
        assert_eq!(wire.build, vec![("RM".to_string(), 2, 13)]);
        assert_eq!(
            wire.deploy,
            vec![("SI".to_string(), 22, 8), ("SI".to_string(), 22, 8)]
        );
    }
}
