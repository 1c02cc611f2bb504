//! Turn strategy.
//!
//! The first [`OPENING_TURNS`] turns follow a fixed script. After that each
//! turn runs the adaptive pipeline in a fixed order:
//!
//! 1. self-repair of the core defenses, stopping at the first set that
//!    cannot be fully restored
//! 2. wall maintenance for every turn band that has started
//! 3. lane evaluation and the allocation [`decide`]
//! 4. execution: active defense, supports and mobile deploys
//! 5. extra defenses until the turn's SP spending cap is reached
//!
//! Every step reads the board as the previous steps left it.

pub mod construction;
pub mod decision;
pub mod defense;
pub mod lanes;
pub mod layout;
pub mod opening;
pub mod repair;

pub use decision::{AgentState, Decision, DecisionInput, Stance, decide};
pub use defense::DefenseOutcome;
pub use lanes::{LaneFeatures, LaneReport};
pub use opening::{OPENING_TURNS, OpeningSummary};

use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::board::{Coord, Flank, GameBoard};
use crate::config::{GameConfig, PlayerIndex, Resource, UnitType};
use crate::error::AgentResult;
use construction::build;
use layout::{EXTRA_DEFENSES, REPAIR_PRIORITIES, WALL_BANDS, launch};
use repair::repair;

/// Which part of the game a turn belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Scripted turns.
    Opening,
    /// Decision-driven turns.
    Adaptive,
}

impl Phase {
    /// Phase of a turn number.
    #[must_use]
    pub const fn of(turn: u32) -> Self {
        if turn < OPENING_TURNS {
            Phase::Opening
        } else {
            Phase::Adaptive
        }
    }
}

/// What a turn did, for logs and CLI output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnReport {
    /// Turn number.
    pub turn: u32,
    /// Phase of the turn.
    pub phase: Phase,
    /// Opening counts, on scripted turns.
    pub opening: Option<OpeningSummary>,
    /// Lane estimates, on adaptive turns.
    pub lanes: Option<[LaneReport; 2]>,
    /// Allocation, on adaptive turns.
    pub decision: Option<Decision>,
    /// Priority repair sets fully restored before the first shortfall.
    pub repaired_sets: usize,
    /// Active wall bands fully restored.
    pub wall_bands: usize,
    /// Active defense per defended flank.
    pub defense: Vec<(Flank, DefenseOutcome)>,
    /// Supports built behind the launch point.
    pub supports_built: u32,
    /// Mobile units spawned.
    pub mobile_deployed: u32,
    /// Extra defenses built or upgraded.
    pub extra_built: u32,
    /// SP spent over the turn.
    pub sp_spent: f64,
}

impl TurnReport {
    fn new(turn: u32) -> Self {
        Self {
            turn,
            phase: Phase::of(turn),
            opening: None,
            lanes: None,
            decision: None,
            repaired_sets: 0,
            wall_bands: 0,
            defense: Vec::new(),
            supports_built: 0,
            mobile_deployed: 0,
            extra_built: 0,
            sp_spent: 0.0,
        }
    }
}

fn spawn_count(allocation: i32) -> u32 {
    u32::try_from(allocation).unwrap_or(0)
}

fn my_sp<B: GameBoard + ?Sized>(board: &B) -> f64 {
    board.resource(Resource::Sp, PlayerIndex::Me)
}

/// Runs one turn against a board.
#[derive(Debug, Clone, Copy)]
pub struct Strategy<'a> {
    config: &'a GameConfig,
}

impl<'a> Strategy<'a> {
    /// A strategy charging costs from `config`.
    #[must_use]
    pub const fn new(config: &'a GameConfig) -> Self {
        Self { config }
    }

    /// Issue this turn's commands. Does not submit the turn.
    ///
    /// `state` is read and updated in place; `rng` supplies the coin for an
    /// undecidable attack.
    ///
    /// # Errors
    ///
    /// Returns the first construction error; commands issued before it stay
    /// on the board.
    pub fn play_turn<B, R>(
        &self,
        board: &mut B,
        state: &mut AgentState,
        rng: &mut R,
    ) -> AgentResult<TurnReport>
    where
        B: GameBoard + ?Sized,
        R: Rng,
    {
        let turn = board.turn_number();
        let start_sp = my_sp(board);
        let mut report = TurnReport::new(turn);

        match report.phase {
            Phase::Opening => {
                report.opening = Some(opening::play(board, turn));
            }
            Phase::Adaptive => {
                self.repair_pass(board, turn, &mut report)?;
                self.decide_and_execute(board, state, rng, &mut report)?;
                report.extra_built = self.extra_defenses(board, start_sp)?;
            }
        }

        report.sp_spent = start_sp - my_sp(board);
        info!(
            turn,
            phase = ?report.phase,
            stance = ?report.decision.map(|d| d.stance),
            sp_spent = report.sp_spent,
            deployed = report.mobile_deployed,
            "turn played"
        );
        Ok(report)
    }

    fn repair_pass<B: GameBoard + ?Sized>(
        &self,
        board: &mut B,
        turn: u32,
        report: &mut TurnReport,
    ) -> AgentResult<()> {
        for set in &REPAIR_PRIORITIES {
            if !repair(board, self.config, set.locations, set.unit, set.hp_threshold, set.upgrade)? {
                debug!(unit = ?set.unit, "priority repair short, skipping lower sets");
                break;
            }
            report.repaired_sets += 1;
        }

        for band in WALL_BANDS.iter().filter(|band| turn >= band.from_turn) {
            let set = &band.set;
            if repair(board, self.config, set.locations, set.unit, set.hp_threshold, set.upgrade)? {
                report.wall_bands += 1;
            }
        }
        Ok(())
    }

    fn decide_and_execute<B, R>(
        &self,
        board: &mut B,
        state: &mut AgentState,
        rng: &mut R,
        report: &mut TurnReport,
    ) -> AgentResult<()>
    where
        B: GameBoard + ?Sized,
        R: Rng,
    {
        let reports = lanes::evaluate_both(board);
        let input = DecisionInput {
            lanes: reports,
            mp: board.resource(Resource::Mp, PlayerIndex::Me),
            sp: my_sp(board),
            turn: board.turn_number(),
            saturated: lanes::mid_board_saturation(board, &self.config.tuning),
        };
        let decision = decide(&input, *state, &self.config.tuning, || rng.gen_bool(0.5));
        *state = decision.state;
        info!(
            stance = ?decision.stance,
            f = decision.stance.selector(),
            a = decision.vanguard,
            b = decision.wave,
            c = decision.supports,
            d = decision.release_demolishers,
            e = decision.reserve,
            h = decision.release_scouts,
            sp_left = decision.sp_left,
            hold_turns = decision.state.hold_turns,
            "decision"
        );
        report.lanes = Some(reports);
        report.decision = Some(decision);

        let defended: &[Flank] = match decision.stance.launch_side() {
            Some(Flank::Left) => &[Flank::Left],
            Some(Flank::Right) => &[Flank::Right],
            None => &Flank::BOTH,
        };
        for &flank in defended {
            let outcome = defense::defend(board, self.config, flank)?;
            report.defense.push((flank, outcome));
        }

        if let Some(side) = decision.stance.launch_side() {
            let layout = launch(side);
            let vacant: Vec<_> = layout
                .supports
                .iter()
                .copied()
                .filter(|&cell| board.unit_at(cell).is_none())
                .take(decision.supports as usize)
                .collect();
            report.supports_built = build(board, self.config, &vacant, UnitType::Support, false, false)?;

            report.mobile_deployed += deploy(board, UnitType::Interceptor, layout.vanguard, decision.vanguard);
            report.mobile_deployed += deploy(board, UnitType::Scout, layout.wave, decision.wave);
        }

        if decision.releases() {
            let [left, right] = &reports;
            let weaker = if right.total() < left.total() {
                Flank::Right
            } else {
                Flank::Left
            };
            let wave = launch(weaker.opposite()).wave;
            report.mobile_deployed += deploy(board, UnitType::Demolisher, wave, decision.release_demolishers);
            report.mobile_deployed += deploy(board, UnitType::Scout, wave, decision.release_scouts);
        }
        Ok(())
    }

    /// Spend on extra defenses in priority order, one cell at a time, until
    /// the turn has spent its share of the starting SP.
    fn extra_defenses<B: GameBoard + ?Sized>(&self, board: &mut B, start_sp: f64) -> AgentResult<u32> {
        let cap = self.config.tuning.extra_spend_fraction * start_sp;
        let mut built = 0;

        for extra in &EXTRA_DEFENSES {
            for &cell in extra.locations {
                if start_sp - my_sp(board) > cap {
                    debug!(built, "extra defense budget spent");
                    return Ok(built);
                }
                match board.unit_at(cell) {
                    None => {
                        built += build(board, self.config, &[cell], extra.unit, extra.upgrade, false)?;
                    }
                    Some(unit)
                        if extra.upgrade
                            && unit.unit_type == extra.unit
                            && !unit.upgraded
                            && !unit.pending_removal =>
                    {
                        built += board.attempt_upgrade(&[cell]);
                    }
                    Some(_) => {}
                }
            }
        }
        Ok(built)
    }
}

fn deploy<B: GameBoard + ?Sized>(board: &mut B, unit: UnitType, cell: Coord, allocation: i32) -> u32 {
    let count = spawn_count(allocation);
    if count == 0 {
        return 0;
    }
    board.attempt_spawn(unit, &[cell], count)
}
