//! The agent: configuration, cross-turn state and the coin, driving one
//! [`Strategy`] turn per engine callback.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{error, info};

use crate::board::GameBoard;
use crate::config::GameConfig;
use crate::error::AgentResult;
use crate::strategy::{AgentState, Strategy, TurnReport};

/// A playing agent for one match.
#[derive(Debug, Clone)]
pub struct Agent {
    config: GameConfig,
    state: AgentState,
    rng: ChaCha8Rng,
    seed: u64,
}

impl Agent {
    /// An agent with fresh state and a seeded coin.
    #[must_use]
    pub fn new(config: GameConfig, seed: u64) -> Self {
        info!(seed, "agent ready");
        Self {
            config,
            state: AgentState::default(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Play one turn and submit it.
    ///
    /// The turn is submitted even if the strategy stops early.
    ///
    /// # Errors
    ///
    /// Returns the error that cut the turn short.
    pub fn on_turn<B: GameBoard + ?Sized>(&mut self, board: &mut B) -> AgentResult<TurnReport> {
        let result = Strategy::new(&self.config).play_turn(board, &mut self.state, &mut self.rng);
        board.submit_turn();
        if let Err(err) = &result {
            error!(turn = board.turn_number(), %err, "turn aborted");
        }
        result
    }

    /// State carried into the next turn.
    #[must_use]
    pub const fn state(&self) -> AgentState {
        self.state
    }

    /// Replace the carried state, e.g. when a one-shot `turn` resumes a match.
    pub fn set_state(&mut self, state: AgentState) {
        self.state = state;
    }

    /// Match configuration.
    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Seed the coin was created from.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::SnapshotBoard;

    #[test]
    fn test_turn_is_always_submitted() {
        let config = GameConfig::default();
        let mut agent = Agent::new(config.clone(), 1);
        let mut board = SnapshotBoard::empty(&config, 0, 40.0, 5.0);
        agent.on_turn(&mut board).unwrap();
        assert!(board.submission().is_some());
    }

    #[test]
    fn test_state_carries_between_turns() {
        let config = GameConfig::default();
        let mut agent = Agent::new(config.clone(), 1);
        for turn in 5..8 {
            let mut board = SnapshotBoard::empty(&config, turn, 0.0, 0.0);
            agent.on_turn(&mut board).unwrap();
        }
        assert_eq!(agent.state().hold_turns, 3);
        agent.set_state(AgentState::default());
        assert_eq!(agent.state().hold_turns, 0);
        assert_eq!(agent.seed(), 1);
    }
}
