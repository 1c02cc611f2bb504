//! Board access for the agent.
//!
//! The game engine owns the board. The agent sees it through [`GameBoard`],
//! which exposes the read queries a decision needs and the cumulative write
//! commands a turn issues. [`SnapshotBoard`] is an in-memory implementation
//! backed by a recorded [`TurnSnapshot`], used for replays and tests.
//!
//! - Arena geometry and the two flanks
//! - Stationary unit attributes
//! - Outbound commands and the per-turn submission
//! - Snapshot-backed board

mod arena;
mod command;
mod snapshot;
mod unit;

pub use arena::{ARENA_SIZE, Coord, Flank, HALF_HEIGHT};
pub use command::{Command, TurnSubmission, WireCommand, WireSubmission};
pub use snapshot::{PlayerStats, SnapshotBoard, SnapshotUnit, TurnSnapshot};
pub use unit::{StationaryUnit, absent_or_removing};

use crate::config::{PlayerIndex, Resource, UnitType};

/// Read/query and write/command interface to the engine's board.
///
/// Write commands are cumulative within a turn and affect what later reads
/// observe (resources drop as spawns are accepted, spawned structures show up
/// in [`GameBoard::unit_at`]). Nothing reaches the engine before
/// [`GameBoard::submit_turn`].
pub trait GameBoard {
    /// Current turn number (0-indexed).
    fn turn_number(&self) -> u32;

    /// Remaining amount of a currency for a player.
    fn resource(&self, resource: Resource, player: PlayerIndex) -> f64;

    /// The stationary unit at a location, if any.
    fn unit_at(&self, location: Coord) -> Option<&StationaryUnit>;

    /// The agent's remaining health.
    fn my_health(&self) -> f64;

    /// Request `count` units of `unit` at each location.
    ///
    /// Stationary units ignore `count` beyond 1. Returns the number of units
    /// the board accepted.
    fn attempt_spawn(&mut self, unit: UnitType, locations: &[Coord], count: u32) -> u32;

    /// Request upgrades of our structures. Returns the number accepted.
    fn attempt_upgrade(&mut self, locations: &[Coord]) -> u32;

    /// Mark our structures for removal at the end of the turn. Returns the
    /// number accepted.
    fn attempt_remove(&mut self, locations: &[Coord]) -> u32;

    /// Finalize the turn's commands.
    fn submit_turn(&mut self);
}
