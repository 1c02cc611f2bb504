//! Budgeted construction of structure batches.
//!
//! A batch is built in priority order at the requested tier for as many cells
//! as SP affords, and whatever is left is retried at the plain tier. The loop
//! ends when every cell has been tried or nothing more is affordable at the
//! plain tier.

use tracing::{debug, warn};

use crate::board::{Coord, GameBoard};
use crate::config::{GameConfig, PlayerIndex, Resource, UnitType};
use crate::error::{AgentError, AgentResult};

/// Whole units of `cost` that `available` pays for.
// Non-negative and floored; saturates for absurd budgets.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
#[must_use]
pub fn affordable(available: f64, cost: f64) -> usize {
    if cost <= 0.0 || available <= 0.0 {
        return 0;
    }
    (available / cost).floor() as usize
}

/// Build `unit` at `locations` in order, spending current SP.
///
/// With `upgrade`, cells are built and upgraded while the upgraded cost is
/// affordable; the rest fall back to the plain tier. With `mark_remove`,
/// every structure built here is also marked for removal at the end of the
/// turn, keeping its defensive value for this turn only.
///
/// Returns how many structures were built across both tiers.
///
/// # Errors
///
/// Returns [`AgentError::UpgradeMismatch`] if the board upgrades a different
/// number of structures than it just spawned.
pub fn build<B: GameBoard + ?Sized>(
    board: &mut B,
    config: &GameConfig,
    locations: &[Coord],
    unit: UnitType,
    upgrade: bool,
    mark_remove: bool,
) -> AgentResult<u32> {
    let mut remaining = locations;
    let mut upgrade = upgrade;
    let mut built = 0;

    while !remaining.is_empty() {
        let cost = config.cost(unit, upgrade);
        if cost <= 0.0 {
            warn!(?unit, cost, "structure has no positive cost, not building");
            break;
        }

        let available = board.resource(Resource::Sp, PlayerIndex::Me);
        let count = affordable(available, cost).min(remaining.len());
        if count == 0 {
            if upgrade {
                debug!(?unit, available, cost, "upgraded tier unaffordable, degrading");
                upgrade = false;
                continue;
            }
            break;
        }

        let (batch, rest) = remaining.split_at(count);
        let vacant: Vec<Coord> = batch
            .iter()
            .copied()
            .filter(|&cell| board.unit_at(cell).is_none())
            .collect();
        let spawned = board.attempt_spawn(unit, batch, 1);
        let fresh: Vec<Coord> = vacant
            .into_iter()
            .filter(|&cell| board.unit_at(cell).is_some())
            .collect();

        if upgrade {
            let upgraded = board.attempt_upgrade(&fresh);
            if upgraded != spawned {
                return Err(AgentError::UpgradeMismatch {
                    unit,
                    spawned,
                    upgraded,
                });
            }
        }
        if mark_remove {
            board.attempt_remove(&fresh);
        }

        debug!(?unit, upgrade, requested = batch.len(), spawned, "built batch");
        built += spawned;
        remaining = rest;
        upgrade = false;
    }

    Ok(built)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Command, SnapshotBoard, StationaryUnit};

    fn row(count: i32) -> Vec<Coord> {
        (0..count).map(|x| Coord::new(x, 13)).collect()
    }

    #[test]
    fn test_affordable() {
        assert_eq!(affordable(12.0, 2.0), 6);
        assert_eq!(affordable(11.9, 2.0), 5);
        assert_eq!(affordable(1.0, 2.0), 0);
        assert_eq!(affordable(5.0, 0.0), 0);
        assert_eq!(affordable(-1.0, 1.0), 0);
    }

    #[test]
    fn test_upgraded_walls_fall_back_to_plain() {
        let config = GameConfig::default();
        // 6 upgraded walls at 2 SP each leave 1 SP for a single plain wall.
        let mut board = SnapshotBoard::empty(&config, 10, 13.0, 0.0);
        let cells = row(10);

        let built = build(&mut board, &config, &cells, UnitType::Wall, true, false).unwrap();

        assert_eq!(built, 7);
        assert!(cells[..6].iter().all(|&cell| board.unit_at(cell).unwrap().upgraded));
        assert!(!board.unit_at(cells[6]).unwrap().upgraded);
        assert!(cells[7..].iter().all(|&cell| board.unit_at(cell).is_none()));
        assert!(board.resource(Resource::Sp, PlayerIndex::Me).abs() < 1e-9);
    }

    #[test]
    fn test_budget_covering_every_upgrade_skips_plain_tier() {
        let config = GameConfig::default();
        let mut board = SnapshotBoard::empty(&config, 10, 16.0, 0.0);
        let cells = row(10);

        let built = build(&mut board, &config, &cells, UnitType::Wall, true, false).unwrap();

        assert_eq!(built, 8);
        assert!(cells[..8].iter().all(|&cell| board.unit_at(cell).unwrap().upgraded));
        assert!(cells[8..].iter().all(|&cell| board.unit_at(cell).is_none()));
    }

    #[test]
    fn test_upgraded_tier_can_exhaust_budget() {
        let config = GameConfig::default();
        let mut board = SnapshotBoard::empty(&config, 10, 12.0, 0.0);
        let cells = row(10);

        let built = build(&mut board, &config, &cells, UnitType::Wall, true, false).unwrap();

        assert_eq!(built, 6);
        assert!(cells[6..].iter().all(|&cell| board.unit_at(cell).is_none()));
        let spawns = board
            .commands()
            .iter()
            .filter(|c| matches!(c, Command::Spawn { .. }))
            .count();
        assert_eq!(spawns, 6);
    }

    #[test]
    fn test_unaffordable_upgrade_degrades() {
        let config = GameConfig::default();
        // Turret costs 2, upgraded 6.
        let mut board = SnapshotBoard::empty(&config, 10, 5.0, 0.0);
        let cells = [Coord::new(3, 12), Coord::new(24, 12), Coord::new(10, 10)];

        let built = build(&mut board, &config, &cells, UnitType::Turret, true, false).unwrap();

        assert_eq!(built, 2);
        assert!(board.unit_at(cells[0]).unwrap().is_turret(false));
        assert!(board.unit_at(cells[2]).is_none());
    }

    #[test]
    fn test_nothing_affordable_is_not_an_error() {
        let config = GameConfig::default();
        let mut board = SnapshotBoard::empty(&config, 10, 0.5, 0.0);
        let built = build(&mut board, &config, &row(3), UnitType::Wall, false, false).unwrap();
        assert_eq!(built, 0);
        assert!(board.commands().is_empty());
    }

    #[test]
    fn test_mark_remove_only_touches_new_structures() {
        let config = GameConfig::default();
        let mut board = SnapshotBoard::empty(&config, 10, 10.0, 0.0);
        board.place(Coord::new(1, 13), StationaryUnit::new(UnitType::Wall, 60.0));
        let cells = [Coord::new(0, 13), Coord::new(1, 13)];

        let built = build(&mut board, &config, &cells, UnitType::Wall, false, true).unwrap();

        assert_eq!(built, 1);
        assert!(board.unit_at(cells[0]).unwrap().pending_removal);
        assert!(!board.unit_at(cells[1]).unwrap().pending_removal);
        assert_eq!(
            board.commands().last(),
            Some(&Command::Remove { location: cells[0] })
        );
    }

    /// Board that reports spawns but refuses every upgrade.
    struct StubbornBoard(SnapshotBoard);

    impl GameBoard for StubbornBoard {
        fn turn_number(&self) -> u32 {
            self.0.turn_number()
        }
        fn resource(&self, resource: Resource, player: PlayerIndex) -> f64 {
            self.0.resource(resource, player)
        }
        fn unit_at(&self, location: Coord) -> Option<&StationaryUnit> {
            self.0.unit_at(location)
        }
        fn my_health(&self) -> f64 {
            self.0.my_health()
        }
        fn attempt_spawn(&mut self, unit: UnitType, locations: &[Coord], count: u32) -> u32 {
            self.0.attempt_spawn(unit, locations, count)
        }
        fn attempt_upgrade(&mut self, _locations: &[Coord]) -> u32 {
            0
        }
        fn attempt_remove(&mut self, locations: &[Coord]) -> u32 {
            self.0.attempt_remove(locations)
        }
        fn submit_turn(&mut self) {
            self.0.submit_turn();
        }
    }

    #[test]
    fn test_upgrade_mismatch_is_fatal() {
        let config = GameConfig::default();
        let mut board = StubbornBoard(SnapshotBoard::empty(&config, 10, 20.0, 0.0));
        let result = build(&mut board, &config, &row(2), UnitType::Wall, true, false);
        assert_eq!(
            result,
            Err(AgentError::UpgradeMismatch {
                unit: UnitType::Wall,
                spawned: 2,
                upgraded: 0,
            })
        );
    }
}
