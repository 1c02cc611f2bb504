//! Fixed map layout: every literal coordinate the adaptive strategy uses.
//!
//! Left-flank cells have low x. Right-flank tables are the mirror images of
//! the left ones.

use crate::board::{Coord, Flank};
use crate::config::UnitType;

const fn c(x: i32, y: i32) -> Coord {
    Coord::new(x, y)
}

/// Opponent corner cells sampled to estimate one flank's defense.
#[derive(Debug, Clone, Copy)]
pub struct LaneProbes {
    /// Outer turret row; upgraded turrets here count as `x`.
    pub outer: &'static [Coord],
    /// Inner turret row; upgraded turrets here count as `y`.
    pub inner: &'static [Coord],
    /// Corner cell whose wall state gives `w`.
    pub corner: Coord,
}

impl LaneProbes {
    /// Both turret groups; unupgraded turrets anywhere here count as `z`.
    pub fn turret_cells(&self) -> impl Iterator<Item = Coord> + '_ {
        self.outer.iter().chain(self.inner).copied()
    }
}

const LEFT_PROBES: LaneProbes = LaneProbes {
    outer: &[c(1, 15), c(2, 15)],
    inner: &[c(1, 14), c(2, 14), c(3, 14)],
    corner: c(0, 14),
};

const RIGHT_PROBES: LaneProbes = LaneProbes {
    outer: &[c(25, 15), c(26, 15)],
    inner: &[c(24, 14), c(25, 14), c(26, 14)],
    corner: c(27, 14),
};

/// Probe cells for a flank.
#[must_use]
pub const fn lane_probes(flank: Flank) -> &'static LaneProbes {
    match flank {
        Flank::Left => &LEFT_PROBES,
        Flank::Right => &RIGHT_PROBES,
    }
}

/// Opponent mid-board rectangle `(x range, y range)` sampled for saturation.
pub const MID_BOARD: (std::ops::RangeInclusive<i32>, std::ops::RangeInclusive<i32>) = (8..=19, 14..=16);

/// Active-defense cells for one flank.
#[derive(Debug, Clone, Copy)]
pub struct ActiveDefenseLayout {
    /// Slots 0 and 1 hold the wall screen, slots 2 and 3 the turrets.
    pub slots: [Coord; 4],
    /// Opponent cell nearest the screen.
    pub near_probe: Coord,
    /// Opponent cells behind the near probe.
    pub alternate_probes: [Coord; 2],
}

impl ActiveDefenseLayout {
    /// The two wall-screen cells.
    #[must_use]
    pub fn walls(&self) -> [Coord; 2] {
        [self.slots[0], self.slots[1]]
    }
}

const LEFT_DEFENSE: ActiveDefenseLayout = ActiveDefenseLayout {
    slots: [c(0, 13), c(1, 13), c(1, 12), c(2, 12)],
    near_probe: c(0, 14),
    alternate_probes: [c(1, 14), c(1, 15)],
};

const RIGHT_DEFENSE: ActiveDefenseLayout = ActiveDefenseLayout {
    slots: [c(27, 13), c(26, 13), c(26, 12), c(25, 12)],
    near_probe: c(27, 14),
    alternate_probes: [c(26, 14), c(26, 15)],
};

/// Active-defense cells for a flank.
#[must_use]
pub const fn active_defense(flank: Flank) -> &'static ActiveDefenseLayout {
    match flank {
        Flank::Left => &LEFT_DEFENSE,
        Flank::Right => &RIGHT_DEFENSE,
    }
}

/// Deploy cells on one of our deploy edges.
#[derive(Debug, Clone, Copy)]
pub struct LaunchLayout {
    /// Where interceptors go.
    pub vanguard: Coord,
    /// Where scouts and demolishers go.
    pub wave: Coord,
    /// Supports built behind the launch point.
    pub supports: [Coord; 2],
}

const LEFT_LAUNCH: LaunchLayout = LaunchLayout {
    vanguard: c(5, 8),
    wave: c(7, 6),
    supports: [c(10, 6), c(11, 5)],
};

const RIGHT_LAUNCH: LaunchLayout = LaunchLayout {
    vanguard: c(22, 8),
    wave: c(20, 6),
    supports: [c(17, 6), c(16, 5)],
};

/// Deploy cells on the edge of a flank.
#[must_use]
pub const fn launch(flank: Flank) -> &'static LaunchLayout {
    match flank {
        Flank::Left => &LEFT_LAUNCH,
        Flank::Right => &RIGHT_LAUNCH,
    }
}

/// A set of structures the repair pass keeps standing.
#[derive(Debug, Clone, Copy)]
pub struct RepairSet {
    /// Preferred structure type.
    pub unit: UnitType,
    /// Cells to maintain.
    pub locations: &'static [Coord],
    /// Health fraction below which a structure is rebuilt.
    pub hp_threshold: f64,
    /// Whether missing structures are rebuilt upgraded.
    pub upgrade: bool,
}

/// Corner turrets on both flanks.
pub const FLANK_TURRETS: &[Coord] = &[c(3, 12), c(24, 12), c(5, 11), c(22, 11)];

/// Walls shielding the corner turrets.
pub const CORNER_WALLS: &[Coord] = &[c(2, 13), c(25, 13), c(3, 13), c(24, 13), c(4, 12), c(23, 12)];

/// Centre turrets.
pub const CENTER_TURRETS: &[Coord] = &[c(10, 10), c(17, 10)];

/// Repair sets in priority order.
pub const REPAIR_PRIORITIES: [RepairSet; 3] = [
    RepairSet {
        unit: UnitType::Turret,
        locations: FLANK_TURRETS,
        hp_threshold: 0.5,
        upgrade: false,
    },
    RepairSet {
        unit: UnitType::Wall,
        locations: CORNER_WALLS,
        hp_threshold: 0.6,
        upgrade: false,
    },
    RepairSet {
        unit: UnitType::Turret,
        locations: CENTER_TURRETS,
        hp_threshold: 0.4,
        upgrade: false,
    },
];

/// V-shaped wall line funnelling attackers toward the centre.
pub const FUNNEL_WALLS: &[Coord] = &[
    c(4, 11),
    c(5, 10),
    c(6, 9),
    c(7, 8),
    c(8, 7),
    c(9, 6),
    c(10, 5),
    c(11, 4),
    c(12, 3),
    c(13, 2),
    c(14, 2),
    c(15, 3),
    c(16, 4),
    c(17, 5),
    c(18, 6),
    c(19, 7),
    c(20, 8),
];

/// Front-row walls added from the middle game on.
pub const FRONT_WALLS: &[Coord] = &[c(5, 12), c(22, 12), c(6, 12), c(21, 12)];

/// Second-row walls added in the late game.
pub const SECOND_ROW_WALLS: &[Coord] = &[c(6, 11), c(21, 11), c(7, 10), c(20, 10)];

/// Wall maintenance for one band of turns.
#[derive(Debug, Clone, Copy)]
pub struct WallBand {
    /// First turn of the band.
    pub from_turn: u32,
    /// Walls maintained from `from_turn` on.
    pub set: RepairSet,
}

/// Cumulative wall bands; every band whose `from_turn` has passed applies.
///
/// Bands have no end turn, so a later band adds walls rather than replacing
/// the earlier sets.
pub const WALL_BANDS: [WallBand; 3] = [
    WallBand {
        from_turn: 5,
        set: RepairSet {
            unit: UnitType::Wall,
            locations: FUNNEL_WALLS,
            hp_threshold: 0.3,
            upgrade: false,
        },
    },
    WallBand {
        from_turn: 21,
        set: RepairSet {
            unit: UnitType::Wall,
            locations: FRONT_WALLS,
            hp_threshold: 0.5,
            upgrade: true,
        },
    },
    WallBand {
        from_turn: 51,
        set: RepairSet {
            unit: UnitType::Wall,
            locations: SECOND_ROW_WALLS,
            hp_threshold: 0.5,
            upgrade: true,
        },
    },
];

/// An entry in the extra-defense spending list.
#[derive(Debug, Clone, Copy)]
pub struct ExtraDefense {
    /// Structure type.
    pub unit: UnitType,
    /// Cells in the order they are filled.
    pub locations: &'static [Coord],
    /// Whether to build (or bring existing ones up to) the upgraded tier.
    pub upgrade: bool,
}

/// Extra defenses in priority order.
pub const EXTRA_DEFENSES: [ExtraDefense; 6] = [
    ExtraDefense {
        unit: UnitType::Turret,
        locations: FLANK_TURRETS,
        upgrade: true,
    },
    ExtraDefense {
        unit: UnitType::Wall,
        locations: CORNER_WALLS,
        upgrade: true,
    },
    ExtraDefense {
        unit: UnitType::Turret,
        locations: &[c(6, 10), c(21, 10)],
        upgrade: false,
    },
    ExtraDefense {
        unit: UnitType::Wall,
        locations: FRONT_WALLS,
        upgrade: true,
    },
    ExtraDefense {
        unit: UnitType::Support,
        locations: &[c(13, 3), c(14, 3)],
        upgrade: false,
    },
    ExtraDefense {
        unit: UnitType::Turret,
        locations: &[c(11, 9), c(16, 9)],
        upgrade: true,
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn own_structure_cells() -> Vec<Coord> {
        let mut cells: Vec<Coord> = REPAIR_PRIORITIES
            .iter()
            .flat_map(|set| set.locations.iter().copied())
            .chain(WALL_BANDS.iter().flat_map(|band| band.set.locations.iter().copied()))
            .collect();
        for flank in Flank::BOTH {
            cells.extend(active_defense(flank).slots);
            cells.extend(launch(flank).supports);
        }
        cells
    }

    #[test]
    fn test_structure_cells_in_my_half() {
        for cell in own_structure_cells() {
            assert!(cell.in_my_half(), "{cell:?} outside our half");
        }
        for extra in EXTRA_DEFENSES {
            for cell in extra.locations {
                assert!(cell.in_my_half(), "{cell:?} outside our half");
            }
        }
    }

    #[test]
    fn test_structure_sets_disjoint() {
        let cells = own_structure_cells();
        let unique: HashSet<_> = cells.iter().collect();
        assert_eq!(unique.len(), cells.len());
    }

    #[test]
    fn test_launch_cells_on_edges() {
        let structures: HashSet<_> = own_structure_cells().into_iter().collect();
        for flank in Flank::BOTH {
            let layout = launch(flank);
            assert_eq!(layout.vanguard.deploy_edge(), Some(flank));
            assert_eq!(layout.wave.deploy_edge(), Some(flank));
            assert!(!structures.contains(&layout.vanguard));
            assert!(!structures.contains(&layout.wave));
        }
    }

    #[test]
    fn test_probes_in_enemy_half() {
        for flank in Flank::BOTH {
            let probes = lane_probes(flank);
            assert!(probes.corner.in_enemy_half());
            assert_eq!(probes.turret_cells().count(), 5);
            assert!(probes.turret_cells().all(Coord::in_enemy_half));
            let defense = active_defense(flank);
            assert!(defense.near_probe.in_enemy_half());
            assert!(defense.alternate_probes.iter().all(|c| c.in_enemy_half()));
        }
    }

    #[test]
    fn test_right_tables_mirror_left() {
        let left = lane_probes(Flank::Left);
        let right = lane_probes(Flank::Right);
        assert_eq!(left.corner.mirror(), right.corner);
        for (l, r) in left.turret_cells().zip(right.turret_cells()) {
            assert_eq!(l.mirror().y, r.y);
        }
        assert_eq!(
            active_defense(Flank::Left).slots.map(Coord::mirror),
            active_defense(Flank::Right).slots
        );
        assert_eq!(launch(Flank::Left).wave.mirror(), launch(Flank::Right).wave);
        assert_eq!(
            launch(Flank::Left).supports.map(Coord::mirror),
            launch(Flank::Right).supports
        );
    }
}
