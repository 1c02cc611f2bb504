//! Property-based tests for construction, repair, lane evaluation and the
//! allocation decision.
//!
//! Run with: cargo test --release prop_strategy

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use proptest::prelude::*;

use upton::board::StationaryUnit;
use upton::config::{PlayerIndex, Resource};
use upton::strategy::construction::{affordable, build};
use upton::strategy::lanes::{LaneFeatures, LaneReport, evaluate_both};
use upton::strategy::layout::{CORNER_WALLS, lane_probes};
use upton::strategy::repair::repair;
use upton::strategy::{AgentState, DecisionInput, Stance, decide};
use upton::{Coord, Flank, GameBoard, GameConfig, SnapshotBoard, Tuning, UnitType};

fn structure() -> impl Strategy<Value = UnitType> {
    prop_oneof![
        Just(UnitType::Wall),
        Just(UnitType::Support),
        Just(UnitType::Turret),
    ]
}

/// Distinct cells in our half.
fn own_cells() -> impl Strategy<Value = Vec<Coord>> {
    prop::collection::btree_set((0i32..28, 0i32..14), 0..20).prop_map(|cells| {
        cells
            .into_iter()
            .map(|(x, y)| Coord::new(x, y))
            .filter(|c| c.in_my_half())
            .collect()
    })
}

fn probe_unit() -> impl Strategy<Value = Option<(UnitType, bool)>> {
    prop::option::of((structure(), any::<bool>()))
}

fn features() -> impl Strategy<Value = LaneFeatures> {
    (0u32..3, 0u32..4, 0u32..6, 0u32..3).prop_map(|(x, y, z, w)| LaneFeatures { x, y, z, w })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2000))]

    /// Construction never spawns more than the budget pays for.
    #[test]
    fn prop_build_respects_budget(
        sp in 0.0f64..60.0,
        unit in structure(),
        upgrade in any::<bool>(),
        cells in own_cells(),
    ) {
        let config = GameConfig::default();
        let mut board = SnapshotBoard::empty(&config, 10, sp, 0.0);

        let built = build(&mut board, &config, &cells, unit, upgrade, false).unwrap();

        let ceiling = affordable(sp, config.cost(unit, false));
        prop_assert!(built as usize <= ceiling.min(cells.len()));
        prop_assert!(board.resource(Resource::Sp, PlayerIndex::Me) >= 0.0);
        let spent = sp - board.resource(Resource::Sp, PlayerIndex::Me);
        prop_assert!(spent <= sp + 1e-9);
    }

    /// With enough SP for every cell at the plain tier, nothing is left vacant.
    #[test]
    fn prop_repair_fills_affordable_gaps(
        missing in prop::collection::vec(any::<bool>(), CORNER_WALLS.len()),
    ) {
        let config = GameConfig::default();
        let mut board = SnapshotBoard::empty(&config, 10, 0.0, 0.0);
        let mut gaps = 0;
        for (&cell, &gone) in CORNER_WALLS.iter().zip(&missing) {
            if gone {
                gaps += 1;
            } else {
                board.place(cell, StationaryUnit::new(UnitType::Wall, 60.0));
            }
        }
        board.set_resource(Resource::Sp, PlayerIndex::Me, f64::from(gaps));

        let complete = repair(&mut board, &config, CORNER_WALLS, UnitType::Wall, 0.6, false).unwrap();

        prop_assert!(complete);
        prop_assert!(CORNER_WALLS.iter().all(|&cell| board.unit_at(cell).is_some()));
    }

    /// Reading the probes twice gives the same reports.
    #[test]
    fn prop_lane_evaluation_idempotent(
        units in prop::collection::vec(probe_unit(), 12),
    ) {
        let config = GameConfig::default();
        let mut board = SnapshotBoard::empty(&config, 10, 0.0, 0.0);
        let cells: Vec<Coord> = Flank::BOTH
            .iter()
            .flat_map(|&flank| {
                let probes = lane_probes(flank);
                probes.turret_cells().chain(std::iter::once(probes.corner)).collect::<Vec<_>>()
            })
            .collect();
        for (&cell, unit) in cells.iter().zip(&units) {
            if let Some((unit_type, upgraded)) = *unit {
                let mut placed = StationaryUnit::new(unit_type, 100.0);
                placed.upgraded = upgraded;
                board.place(cell, placed);
            }
        }

        let first = evaluate_both(&board);
        let second = evaluate_both(&board);
        prop_assert_eq!(first, second);
        for report in first {
            prop_assert!(report.total() >= 0.0);
        }
    }

    /// Holding never commits units; attacking always builds supports.
    #[test]
    fn prop_decision_shape(
        left in features(),
        right in features(),
        mp in 0.0f64..60.0,
        sp in 0.0f64..60.0,
        turn in 5u32..200,
        hold_turns in 0u32..8,
        coin in any::<bool>(),
    ) {
        let tuning = Tuning::default();
        let input = DecisionInput {
            lanes: [
                LaneReport::from_features(Flank::Left, left),
                LaneReport::from_features(Flank::Right, right),
            ],
            mp,
            sp,
            turn,
            saturated: false,
        };
        let decision = decide(&input, AgentState { hold_turns }, &tuning, || coin);

        match decision.stance {
            Stance::Hold => {
                prop_assert_eq!((decision.vanguard, decision.wave, decision.supports), (0, 0, 0));
                let released = decision.releases() || decision.state.hold_turns == 0;
                prop_assert!(released || decision.state.hold_turns == hold_turns + 1);
            }
            Stance::Attack(_) => {
                prop_assert_eq!(decision.supports, tuning.support_count);
                prop_assert_eq!(decision.state.hold_turns, 0);
                prop_assert!(f64::from(decision.vanguard + decision.wave) <= mp);
            }
        }
        prop_assert_eq!(decision.reserve, turn / tuning.reserve_period + 1);
    }
}
