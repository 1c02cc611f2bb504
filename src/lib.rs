// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Upton: a heuristic agent for a two-player lane-combat tower-defense game.
//!
//! Each turn the agent reads the engine's board, decides which structures to
//! build, repair or remove and which mobile units to deploy, and submits the
//! commands back to the engine.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Agent (state, seeded coin)        │
//! ├─────────────────────────────────────┤
//! │   Strategy: opening | adaptive      │
//! │   repair · lanes · decide · defend  │
//! ├─────────────────────────────────────┤
//! │   Construction engine               │
//! ├─────────────────────────────────────┤
//! │   GameBoard (engine or snapshot)    │
//! └─────────────────────────────────────┘
//! ```

pub mod agent;
pub mod board;
pub mod config;
pub mod error;
pub mod strategy;

pub use agent::Agent;
pub use board::{Command, Coord, Flank, GameBoard, SnapshotBoard, TurnSnapshot, TurnSubmission};
pub use config::{GameConfig, Tuning, UnitType};
pub use error::{AgentError, AgentResult, ConfigError};
pub use strategy::{AgentState, Decision, Stance, Strategy, TurnReport};
