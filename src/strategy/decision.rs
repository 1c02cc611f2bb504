//! The per-turn allocation decision.
//!
//! [`decide`] is pure: it reads the two lane reports and the resource pools
//! and returns how many units of each kind to commit, along with the
//! hysteresis state to carry into the next turn.

use serde::Serialize;

use crate::board::Flank;
use crate::config::Tuning;
use crate::strategy::lanes::LaneReport;

/// Which way the turn commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stance {
    /// Keep MP and defend both flanks.
    Hold,
    /// Send an offensive at the opponent's corner on this flank.
    Attack(Flank),
}

impl Stance {
    /// Our deploy edge the offensive launches from.
    ///
    /// Units cross the arena, so an attack on one flank launches from the
    /// opposite edge.
    #[must_use]
    pub const fn launch_side(self) -> Option<Flank> {
        match self {
            Stance::Hold => None,
            Stance::Attack(target) => Some(target.opposite()),
        }
    }

    /// Numeric form: 0 for hold, otherwise the launch side's selector.
    #[must_use]
    pub const fn selector(self) -> u8 {
        match self.launch_side() {
            None => 0,
            Some(side) => side.selector(),
        }
    }
}

/// State carried between turns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AgentState {
    /// Consecutive turns spent holding.
    pub hold_turns: u32,
}

/// Everything [`decide`] reads.
#[derive(Debug, Clone, Copy)]
pub struct DecisionInput {
    /// Lane reports, left then right.
    pub lanes: [LaneReport; 2],
    /// Our MP.
    pub mp: f64,
    /// Our SP.
    pub sp: f64,
    /// Turn number.
    pub turn: u32,
    /// Whether the opponent's mid-board is saturated.
    pub saturated: bool,
}

/// Unit allocation for one turn.
///
/// Counts stay signed and unclamped; the executor treats negatives as zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Decision {
    /// Hold or attack.
    pub stance: Stance,
    /// Interceptors escorting the offensive.
    pub vanguard: i32,
    /// Scouts in the offensive wave.
    pub wave: i32,
    /// Supports to build behind the launch point.
    pub supports: u32,
    /// Demolishers released after a long hold.
    pub release_demolishers: i32,
    /// MP kept back this turn.
    pub reserve: u32,
    /// Scouts released after a long hold.
    pub release_scouts: i32,
    /// SP expected to remain for extra defenses.
    pub sp_left: f64,
    /// State for the next turn.
    pub state: AgentState,
}

impl Decision {
    /// Whether a hold release fires this turn.
    #[must_use]
    pub const fn releases(&self) -> bool {
        self.release_demolishers > 0 || self.release_scouts > 0
    }
}

// Allocations are small; saturating float-to-int is the wanted behavior.
#[allow(clippy::cast_possible_truncation)]
fn floor_i32(value: f64) -> i32 {
    value.floor() as i32
}

fn need(report: &LaneReport, margin: f64, period_bonus: f64) -> f64 {
    report.total() + margin + period_bonus
}

/// Choose the turn's stance and allocation.
///
/// `coin` breaks the tie when both flanks are undefended; `true` picks the
/// left corner. It is called at most once.
#[must_use]
pub fn decide(
    input: &DecisionInput,
    state: AgentState,
    tuning: &Tuning,
    coin: impl FnOnce() -> bool,
) -> Decision {
    let [left, right] = &input.lanes;
    let period = tuning.reserve_period.max(1);
    let reserve = input.turn / period + 1;
    let period_bonus = f64::from(input.turn / period);
    let mp = input.mp;

    // An attack needs MP strictly above a flank's need.
    let holding = mp <= need(left, tuning.hold_margin, period_bonus)
        && mp <= need(right, tuning.hold_margin, period_bonus);

    let stance = if holding {
        Stance::Hold
    } else {
        let open = [left, right].map(|report| report.total() == 0.0);
        match open {
            [true, true] | [true, false] | [false, true] if mp < tuning.strike_min_mp => Stance::Hold,
            [true, true] => Stance::Attack(if coin() { Flank::Left } else { Flank::Right }),
            [true, false] => Stance::Attack(Flank::Left),
            [false, true] => Stance::Attack(Flank::Right),
            [false, false] => {
                let ratio = |report: &LaneReport| report.bypass_ratio().unwrap_or(0.0);
                if ratio(left) >= ratio(right) {
                    Stance::Attack(Flank::Right)
                } else {
                    Stance::Attack(Flank::Left)
                }
            }
        }
    };

    let mut decision = Decision {
        stance,
        vanguard: 0,
        wave: 0,
        supports: 0,
        release_demolishers: 0,
        reserve,
        release_scouts: 0,
        sp_left: 0.0,
        state: AgentState::default(),
    };

    match stance {
        Stance::Hold => {
            let hold_turns = state.hold_turns + 1;
            if hold_turns >= tuning.release_threshold {
                let spare = mp - f64::from(reserve);
                if input.saturated {
                    decision.release_demolishers = floor_i32(spare / 3.0);
                } else {
                    decision.release_scouts = floor_i32(spare);
                }
            } else {
                decision.state.hold_turns = hold_turns;
            }
        }
        Stance::Attack(target) => {
            let report = match target {
                Flank::Left => left,
                Flank::Right => right,
            };
            decision.vanguard = if report.total() == 0.0 {
                tuning.strike_vanguard
            } else {
                floor_i32(report.term_a)
            };
            decision.wave = floor_i32(mp) - decision.vanguard;
            decision.supports = tuning.support_count;
        }
    }

    decision.sp_left = input.sp
        - f64::from(decision.vanguard)
        - f64::from(decision.wave)
        - 2.0 * f64::from(decision.release_demolishers)
        - f64::from(reserve);
    decision
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::lanes::LaneFeatures;

    fn report(flank: Flank, x: u32, y: u32, z: u32, w: u32) -> LaneReport {
        LaneReport::from_features(flank, LaneFeatures { x, y, z, w })
    }

    fn input(left: LaneReport, right: LaneReport, mp: f64) -> DecisionInput {
        DecisionInput {
            lanes: [left, right],
            mp,
            sp: 50.0,
            turn: 10,
            saturated: false,
        }
    }

    fn defended() -> DecisionInput {
        // total 9.5 on each side, need 13.5
        input(report(Flank::Left, 1, 0, 0, 1), report(Flank::Right, 1, 0, 0, 1), 5.0)
    }

    fn no_coin() -> bool {
        panic!("coin must not be flipped")
    }

    #[test]
    fn test_low_mp_holds() {
        let tuning = Tuning::default();
        let decision = decide(&defended(), AgentState { hold_turns: 2 }, &tuning, no_coin);
        assert_eq!(decision.stance, Stance::Hold);
        assert_eq!(decision.stance.selector(), 0);
        assert_eq!((decision.vanguard, decision.wave, decision.supports), (0, 0, 0));
        assert_eq!(decision.state.hold_turns, 3);
        assert!(!decision.releases());
    }

    #[test]
    fn test_mp_equal_to_need_holds() {
        let tuning = Tuning::default();
        let mut input = defended();
        input.mp = 13.5;
        let decision = decide(&input, AgentState { hold_turns: 1 }, &tuning, no_coin);
        assert_eq!(decision.stance, Stance::Hold);
        assert_eq!(decision.state.hold_turns, 2);

        input.mp = 14.0;
        let decision = decide(&input, AgentState::default(), &tuning, no_coin);
        assert!(matches!(decision.stance, Stance::Attack(_)));
    }

    #[test]
    fn test_release_after_long_hold() {
        let tuning = Tuning::default();
        let mut state = AgentState::default();
        for turn in 1..=8 {
            let decision = decide(&defended(), state, &tuning, no_coin);
            assert!(!decision.releases(), "released early on hold turn {turn}");
            assert_eq!(decision.state.hold_turns, turn);
            state = decision.state;
        }
        let decision = decide(&defended(), state, &tuning, no_coin);
        // reserve at turn 10 is 1
        assert_eq!(decision.release_scouts, 4);
        assert_eq!(decision.release_demolishers, 0);
        assert_eq!(decision.state.hold_turns, 0);
    }

    #[test]
    fn test_saturated_release_sends_demolishers() {
        let tuning = Tuning::default();
        let mut input = defended();
        input.mp = 11.0;
        input.saturated = true;
        let decision = decide(&input, AgentState { hold_turns: 8 }, &tuning, no_coin);
        assert_eq!(decision.stance, Stance::Hold);
        assert_eq!(decision.release_demolishers, 3);
        assert_eq!(decision.release_scouts, 0);
        assert!((decision.sp_left - (50.0 - 6.0 - 1.0)).abs() < 1e-9);
    }

    #[test]
    fn test_attacks_flank_with_lower_bypass_ratio() {
        let tuning = Tuning::default();
        // left: total 15.5, ratio 5/15.5; right: total 4, ratio 1
        let input = input(report(Flank::Left, 1, 1, 0, 1), report(Flank::Right, 2, 0, 0, 0), 40.0);
        let decision = decide(&input, AgentState { hold_turns: 5 }, &tuning, no_coin);
        assert_eq!(decision.stance, Stance::Attack(Flank::Left));
        assert_eq!(decision.stance.launch_side(), Some(Flank::Right));
        assert_eq!(decision.stance.selector(), 2);
        assert_eq!(decision.vanguard, 10);
        assert_eq!(decision.wave, 30);
        assert_eq!(decision.supports, 2);
        assert_eq!(decision.state.hold_turns, 0);
        assert!((decision.sp_left - 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_equal_ratios_attack_right() {
        let tuning = Tuning::default();
        let input = input(report(Flank::Left, 1, 1, 0, 1), report(Flank::Right, 1, 1, 0, 1), 40.0);
        let decision = decide(&input, AgentState::default(), &tuning, no_coin);
        assert_eq!(decision.stance, Stance::Attack(Flank::Right));
        assert_eq!(decision.stance.selector(), 1);
    }

    #[test]
    fn test_undefended_flank_is_struck() {
        let tuning = Tuning::default();
        let input = input(report(Flank::Left, 1, 1, 0, 1), report(Flank::Right, 0, 0, 0, 0), 12.5);
        let decision = decide(&input, AgentState { hold_turns: 3 }, &tuning, no_coin);
        assert_eq!(decision.stance, Stance::Attack(Flank::Right));
        assert_eq!(decision.vanguard, 6);
        assert_eq!(decision.wave, 6);
        assert_eq!(decision.state.hold_turns, 0);
    }

    #[test]
    fn test_coin_picks_between_open_flanks() {
        let tuning = Tuning::default();
        let open = report(Flank::Left, 0, 0, 0, 0);
        let input = input(open, LaneReport { flank: Flank::Right, ..open }, 20.0);
        let heads = decide(&input, AgentState::default(), &tuning, || true);
        let tails = decide(&input, AgentState::default(), &tuning, || false);
        assert_eq!(heads.stance, Stance::Attack(Flank::Left));
        assert_eq!(tails.stance, Stance::Attack(Flank::Right));
        assert_eq!(heads.wave, 14);
    }

    #[test]
    fn test_open_flank_with_low_mp_holds() {
        let tuning = Tuning::default();
        // need on the open flank is 4, so MP 7 does not hold by need alone
        let input = input(report(Flank::Left, 0, 0, 0, 0), report(Flank::Right, 1, 1, 0, 1), 7.0);
        let decision = decide(&input, AgentState::default(), &tuning, no_coin);
        assert_eq!(decision.stance, Stance::Hold);
        assert_eq!(decision.state.hold_turns, 1);
    }

    #[test]
    fn test_reserve_grows_with_turn() {
        let tuning = Tuning::default();
        let mut input = defended();
        input.turn = 45;
        let decision = decide(&input, AgentState::default(), &tuning, no_coin);
        assert_eq!(decision.reserve, 3);
    }
}
