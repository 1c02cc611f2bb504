//! Arena coordinates and flanks.
//!
//! The arena is a 28×28 diamond. We own the bottom triangle (rows 0..=13),
//! the opponent the top one. Row `y` of our half spans `13 - y ..= 14 + y`.

use serde::{Deserialize, Serialize};

use crate::error::AgentError;

/// Width and height of the arena.
pub const ARENA_SIZE: i32 = 28;

/// Rows per half.
pub const HALF_HEIGHT: i32 = ARENA_SIZE / 2;

/// A cell on the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    /// Column.
    pub x: i32,
    /// Row (0 is our back edge).
    pub y: i32,
}

impl Coord {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Reflect across the vertical centre line.
    #[must_use]
    pub const fn mirror(self) -> Self {
        Self::new(ARENA_SIZE - 1 - self.x, self.y)
    }

    /// Whether the cell lies inside the diamond.
    #[must_use]
    pub const fn in_arena(self) -> bool {
        if self.y < 0 || self.y >= ARENA_SIZE {
            return false;
        }
        let row = if self.y < HALF_HEIGHT {
            self.y
        } else {
            ARENA_SIZE - 1 - self.y
        };
        self.x >= HALF_HEIGHT - 1 - row && self.x <= HALF_HEIGHT + row
    }

    /// Whether the cell lies in our half.
    #[must_use]
    pub const fn in_my_half(self) -> bool {
        self.y < HALF_HEIGHT && self.in_arena()
    }

    /// Whether the cell lies in the opponent's half.
    #[must_use]
    pub const fn in_enemy_half(self) -> bool {
        self.y >= HALF_HEIGHT && self.in_arena()
    }

    /// Our deploy edge this cell lies on, if any.
    #[must_use]
    pub const fn deploy_edge(self) -> Option<Flank> {
        if !self.in_my_half() {
            None
        } else if self.y == HALF_HEIGHT - 1 - self.x {
            Some(Flank::Left)
        } else if self.y == self.x - HALF_HEIGHT {
            Some(Flank::Right)
        } else {
            None
        }
    }
}

impl From<[i32; 2]> for Coord {
    fn from([x, y]: [i32; 2]) -> Self {
        Self::new(x, y)
    }
}

/// One of the two symmetric lanes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flank {
    /// Low-x side.
    Left,
    /// High-x side.
    Right,
}

impl Flank {
    /// Both flanks, left first.
    pub const BOTH: [Flank; 2] = [Flank::Left, Flank::Right];

    /// The other flank.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Flank::Left => Flank::Right,
            Flank::Right => Flank::Left,
        }
    }

    /// Numeric selector used in decision logs (1 = left, 2 = right).
    #[must_use]
    pub const fn selector(self) -> u8 {
        match self {
            Flank::Left => 1,
            Flank::Right => 2,
        }
    }
}

/// Decodes the numeric selector a host engine passes for a flank.
impl TryFrom<u8> for Flank {
    type Error = AgentError;

    fn try_from(selector: u8) -> Result<Self, Self::Error> {
        match selector {
            1 => Ok(Flank::Left),
            2 => Ok(Flank::Right),
            other => Err(AgentError::InvalidFlank(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diamond_bounds() {
        assert!(Coord::new(0, 13).in_arena());
        assert!(Coord::new(27, 13).in_arena());
        assert!(Coord::new(13, 0).in_arena());
        assert!(Coord::new(14, 0).in_arena());
        assert!(!Coord::new(12, 0).in_arena());
        assert!(!Coord::new(0, 12).in_arena());
        assert!(Coord::new(0, 14).in_arena());
        assert!(Coord::new(13, 27).in_arena());
        assert!(!Coord::new(0, 15).in_arena());
        assert!(!Coord::new(28, 13).in_arena());
    }

    #[test]
    fn test_halves() {
        assert!(Coord::new(3, 12).in_my_half());
        assert!(!Coord::new(3, 14).in_my_half());
        assert!(Coord::new(1, 14).in_enemy_half());
        assert!(!Coord::new(1, 13).in_enemy_half());
    }

    #[test]
    fn test_deploy_edges() {
        assert_eq!(Coord::new(20, 6).deploy_edge(), Some(Flank::Right));
        assert_eq!(Coord::new(22, 8).deploy_edge(), Some(Flank::Right));
        assert_eq!(Coord::new(7, 6).deploy_edge(), Some(Flank::Left));
        assert_eq!(Coord::new(0, 13).deploy_edge(), Some(Flank::Left));
        assert_eq!(Coord::new(10, 10).deploy_edge(), None);
        assert_eq!(Coord::new(13, 14).deploy_edge(), None);
    }

    #[test]
    fn test_mirror_maps_edges() {
        let right = Coord::new(23, 9);
        assert_eq!(right.mirror(), Coord::new(4, 9));
        assert_eq!(right.mirror().deploy_edge(), Some(Flank::Left));
        assert_eq!(right.mirror().mirror(), right);
    }

    #[test]
    fn test_flank_selector() {
        assert_eq!(Flank::try_from(1), Ok(Flank::Left));
        assert_eq!(Flank::try_from(2), Ok(Flank::Right));
        assert_eq!(Flank::try_from(0), Err(AgentError::InvalidFlank(0)));
        assert_eq!(Flank::try_from(Flank::Right.selector()), Ok(Flank::Right));
        assert_eq!(Flank::Left.opposite(), Flank::Right);
    }
}
