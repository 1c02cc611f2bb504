//! In-memory board backed by a recorded turn snapshot.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::board::{Command, Coord, GameBoard, StationaryUnit, TurnSubmission};
use crate::config::{GameConfig, PlayerIndex, Resource, UnitType};
use crate::error::ConfigError;

/// Tolerance for comparing fractional resource amounts against costs.
const RESOURCE_EPSILON: f64 = 1e-9;

/// Default starting health of each player.
const DEFAULT_HEALTH: f64 = 30.0;

/// Health and resources of one player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerStats {
    /// Remaining health.
    pub health: f64,
    /// Structure points.
    pub sp: f64,
    /// Mobile points.
    pub mp: f64,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            health: DEFAULT_HEALTH,
            sp: 0.0,
            mp: 0.0,
        }
    }
}

/// A structure as recorded in a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapshotUnit {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
    /// Structure kind.
    #[serde(rename = "type")]
    pub unit_type: UnitType,
    /// Remaining hit points (defaults to full health).
    #[serde(default)]
    pub health: Option<f64>,
    /// Full hit points (defaults to the catalog value for the tier).
    #[serde(default)]
    pub max_health: Option<f64>,
    /// Whether the structure is upgraded.
    #[serde(default)]
    pub upgraded: bool,
    /// Whether the structure is marked for removal.
    #[serde(default)]
    pub pending_removal: bool,
}

/// A recorded turn state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TurnSnapshot {
    /// Turn number (0-indexed).
    pub turn: u32,
    /// Our stats.
    #[serde(default)]
    pub me: PlayerStats,
    /// Opponent stats.
    #[serde(default)]
    pub enemy: PlayerStats,
    /// Structures of both players.
    #[serde(default)]
    pub units: Vec<SnapshotUnit>,
}

impl TurnSnapshot {
    /// Parse a snapshot document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe a snapshot.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a snapshot file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

/// A board that applies the engine's placement rules to an in-memory copy of
/// one turn's state and records the accepted commands.
#[derive(Debug, Clone)]
pub struct SnapshotBoard {
    config: GameConfig,
    turn: u32,
    /// Indexed by `[player][resource]`.
    resources: [[f64; 2]; 2],
    health: [f64; 2],
    units: HashMap<Coord, StationaryUnit>,
    log: Vec<Command>,
    submission: Option<TurnSubmission>,
}

/// Whole units of `cost` that `budget` pays for, at most `count`.
// Clamped to `[0, count]`, so the cast cannot truncate.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn units_within(budget: f64, cost: f64, count: u32) -> u32 {
    (budget / cost).floor().clamp(0.0, f64::from(count)) as u32
}

const fn resource_slot(resource: Resource) -> usize {
    match resource {
        Resource::Mp => 0,
        Resource::Sp => 1,
    }
}

impl SnapshotBoard {
    /// An empty board at the given turn with our resources set.
    #[must_use]
    pub fn empty(config: &GameConfig, turn: u32, sp: f64, mp: f64) -> Self {
        let mut board = Self {
            config: config.clone(),
            turn,
            resources: [[0.0; 2]; 2],
            health: [DEFAULT_HEALTH; 2],
            units: HashMap::new(),
            log: Vec::new(),
            submission: None,
        };
        board.set_resource(Resource::Sp, PlayerIndex::Me, sp);
        board.set_resource(Resource::Mp, PlayerIndex::Me, mp);
        board
    }

    /// Build a board from a recorded snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if a unit is mobile, outside the arena, or shares a
    /// cell with another unit.
    pub fn from_snapshot(config: &GameConfig, snapshot: &TurnSnapshot) -> Result<Self, ConfigError> {
        let mut board = Self::empty(config, snapshot.turn, snapshot.me.sp, snapshot.me.mp);
        board.set_resource(Resource::Sp, PlayerIndex::Enemy, snapshot.enemy.sp);
        board.set_resource(Resource::Mp, PlayerIndex::Enemy, snapshot.enemy.mp);
        board.health = [snapshot.me.health, snapshot.enemy.health];

        for recorded in &snapshot.units {
            let location = Coord::new(recorded.x, recorded.y);
            if !recorded.unit_type.is_stationary() {
                return Err(ConfigError::Snapshot(format!(
                    "{:?} at ({}, {}) is not a structure",
                    recorded.unit_type, location.x, location.y
                )));
            }
            if !location.in_arena() {
                return Err(ConfigError::Snapshot(format!(
                    "({}, {}) is outside the arena",
                    location.x, location.y
                )));
            }
            let info = config.unit(recorded.unit_type);
            let full = if recorded.upgraded {
                info.upgraded_health()
            } else {
                info.start_health
            };
            let max_health = recorded.max_health.unwrap_or(full);
            let unit = StationaryUnit {
                unit_type: recorded.unit_type,
                health: recorded.health.unwrap_or(max_health),
                max_health,
                upgraded: recorded.upgraded,
                pending_removal: recorded.pending_removal,
            };
            if board.units.insert(location, unit).is_some() {
                return Err(ConfigError::Snapshot(format!(
                    "({}, {}) holds more than one structure",
                    location.x, location.y
                )));
            }
        }

        Ok(board)
    }

    /// Overwrite a resource pool.
    pub fn set_resource(&mut self, resource: Resource, player: PlayerIndex, amount: f64) {
        self.resources[player as usize][resource_slot(resource)] = amount.max(0.0);
    }

    /// Place a structure directly, bypassing costs (for setting up a board).
    pub fn place(&mut self, location: Coord, unit: StationaryUnit) {
        self.units.insert(location, unit);
    }

    /// Commands accepted so far, in issue order.
    #[must_use]
    pub fn commands(&self) -> &[Command] {
        &self.log
    }

    /// The submitted turn, once [`GameBoard::submit_turn`] has been called.
    #[must_use]
    pub fn submission(&self) -> Option<&TurnSubmission> {
        self.submission.as_ref()
    }

    /// The configuration this board charges costs from.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    fn my_pool(&mut self, resource: Resource) -> &mut f64 {
        &mut self.resources[PlayerIndex::Me as usize][resource_slot(resource)]
    }

    fn accepting(&self, action: &str) -> bool {
        if self.submission.is_some() {
            warn!(turn = self.turn, action, "command after submit ignored");
            return false;
        }
        true
    }

    fn spawn_structure(&mut self, unit: UnitType, location: Coord) -> bool {
        let cost = self.config.cost(unit, false);
        if !location.in_my_half() || self.units.contains_key(&location) {
            return false;
        }
        let sp = self.my_pool(Resource::Sp);
        if *sp + RESOURCE_EPSILON < cost {
            return false;
        }
        *sp = (*sp - cost).max(0.0);
        let health = self.config.unit(unit).start_health;
        self.units.insert(location, StationaryUnit::new(unit, health));
        self.log.push(Command::Spawn {
            unit,
            location,
            count: 1,
        });
        true
    }

    fn spawn_mobile(&mut self, unit: UnitType, location: Coord, count: u32) -> u32 {
        if location.deploy_edge().is_none() || self.units.contains_key(&location) {
            return 0;
        }
        let cost = self.config.cost(unit, false);
        let mp = self.my_pool(Resource::Mp);
        let placed = if cost > 0.0 {
            units_within(*mp + RESOURCE_EPSILON, cost, count)
        } else {
            count
        };
        if placed == 0 {
            return 0;
        }
        *mp = (*mp - cost * f64::from(placed)).max(0.0);
        self.log.push(Command::Spawn {
            unit,
            location,
            count: placed,
        });
        placed
    }
}

impl GameBoard for SnapshotBoard {
    fn turn_number(&self) -> u32 {
        self.turn
    }

    fn resource(&self, resource: Resource, player: PlayerIndex) -> f64 {
        self.resources[player as usize][resource_slot(resource)]
    }

    fn unit_at(&self, location: Coord) -> Option<&StationaryUnit> {
        self.units.get(&location)
    }

    fn my_health(&self) -> f64 {
        self.health[PlayerIndex::Me as usize]
    }

    fn attempt_spawn(&mut self, unit: UnitType, locations: &[Coord], count: u32) -> u32 {
        if !self.accepting("spawn") {
            return 0;
        }
        let placed = if unit.is_stationary() {
            let built = locations
                .iter()
                .filter(|&&location| self.spawn_structure(unit, location))
                .count();
            u32::try_from(built).unwrap_or(u32::MAX)
        } else {
            locations
                .iter()
                .map(|&location| self.spawn_mobile(unit, location, count))
                .sum()
        };
        debug!(?unit, requested = locations.len(), placed, "spawn");
        placed
    }

    fn attempt_upgrade(&mut self, locations: &[Coord]) -> u32 {
        if !self.accepting("upgrade") {
            return 0;
        }
        let mut upgraded = 0;
        for &location in locations {
            if !location.in_my_half() {
                continue;
            }
            let Some(unit) = self.units.get(&location).copied() else {
                continue;
            };
            let info = self.config.unit(unit.unit_type);
            if unit.upgraded || info.upgrade.is_none() {
                continue;
            }
            let cost = info.upgrade_cost();
            let max_health = info.upgraded_health();
            let sp = self.my_pool(Resource::Sp);
            if *sp + RESOURCE_EPSILON < cost {
                continue;
            }
            *sp = (*sp - cost).max(0.0);
            if let Some(slot) = self.units.get_mut(&location) {
                slot.upgraded = true;
                slot.health += max_health - slot.max_health;
                slot.max_health = max_health;
            }
            self.log.push(Command::Upgrade { location });
            upgraded += 1;
        }
        upgraded
    }

    fn attempt_remove(&mut self, locations: &[Coord]) -> u32 {
        if !self.accepting("remove") {
            return 0;
        }
        let mut removed = 0;
        for &location in locations {
            if !location.in_my_half() {
                continue;
            }
            match self.units.get_mut(&location) {
                Some(unit) if !unit.pending_removal => {
                    unit.pending_removal = true;
                    self.log.push(Command::Remove { location });
                    removed += 1;
                }
                _ => {}
            }
        }
        removed
    }

    fn submit_turn(&mut self) {
        if self.submission.is_some() {
            warn!(turn = self.turn, "turn already submitted");
            return;
        }
        self.submission = Some(TurnSubmission::from_log(&self.log));
    }
}
