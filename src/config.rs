//! Match configuration: the unit catalog handed over at match start and the
//! strategy tuning knobs.
//!
//! The catalog is read once and passed by reference to every component that
//! needs unit identifiers or costs.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Every unit kind in the game, in the engine's `unitInformation` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitType {
    /// Cheap blocking structure.
    Wall,
    /// Structure that shields friendly mobile units passing nearby.
    Support,
    /// Structure that fires at enemy mobile units.
    Turret,
    /// Fast, fragile mobile unit.
    Scout,
    /// Slow mobile unit that targets structures.
    Demolisher,
    /// Mobile unit that targets other mobile units.
    Interceptor,
}

impl UnitType {
    /// All unit kinds in catalog order.
    pub const ALL: [UnitType; 6] = [
        UnitType::Wall,
        UnitType::Support,
        UnitType::Turret,
        UnitType::Scout,
        UnitType::Demolisher,
        UnitType::Interceptor,
    ];

    /// Index into the engine's `unitInformation` array.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            UnitType::Wall => 0,
            UnitType::Support => 1,
            UnitType::Turret => 2,
            UnitType::Scout => 3,
            UnitType::Demolisher => 4,
            UnitType::Interceptor => 5,
        }
    }

    /// Stationary units are paid with SP and occupy a cell; mobile units are
    /// paid with MP.
    #[must_use]
    pub const fn is_stationary(self) -> bool {
        matches!(self, UnitType::Wall | UnitType::Support | UnitType::Turret)
    }
}

/// The two currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resource {
    /// Mobile points, spent on scouts, demolishers and interceptors.
    #[serde(rename = "MP")]
    Mp,
    /// Structure points, spent on walls, supports and turrets.
    #[serde(rename = "SP")]
    Sp,
}

/// Which side of the table a query refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerIndex {
    /// The agent.
    Me = 0,
    /// The opponent.
    Enemy = 1,
}

/// Catalog entry for one unit kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitInfo {
    /// Engine shorthand used on the wire (e.g. `"FF"`).
    pub shorthand: String,
    /// Base cost in SP.
    #[serde(rename = "cost1", default)]
    pub sp_cost: f64,
    /// Base cost in MP.
    #[serde(rename = "cost2", default)]
    pub mp_cost: f64,
    /// Hit points of a freshly placed unit.
    #[serde(rename = "startHealth", default)]
    pub start_health: f64,
    /// Upgrade data, if the unit can be upgraded.
    #[serde(default)]
    pub upgrade: Option<UpgradeInfo>,
}

/// Catalog entry for a unit's upgrade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UpgradeInfo {
    /// Additional SP charged for the upgrade.
    #[serde(rename = "cost1", default)]
    pub sp_cost: f64,
    /// Hit points once upgraded (`None` keeps the base value).
    #[serde(rename = "startHealth", default)]
    pub start_health: Option<f64>,
}

impl UnitInfo {
    fn stock(shorthand: &str, sp: f64, mp: f64, health: f64, upgrade: Option<UpgradeInfo>) -> Self {
        Self {
            shorthand: shorthand.to_string(),
            sp_cost: sp,
            mp_cost: mp,
            start_health: health,
            upgrade,
        }
    }

    /// SP charged for an upgrade (0 when the unit has no upgrade).
    #[must_use]
    pub fn upgrade_cost(&self) -> f64 {
        self.upgrade.map_or(0.0, |u| u.sp_cost)
    }

    /// Maximum health after an upgrade.
    #[must_use]
    pub fn upgraded_health(&self) -> f64 {
        self.upgrade
            .and_then(|u| u.start_health)
            .unwrap_or(self.start_health)
    }
}

/// Strategy tuning knobs. Every field has a default, so a config document may
/// override any subset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Consecutive hold turns that trigger a release deployment.
    pub release_threshold: u32,
    /// Minimum MP before striking an undefended flank.
    pub strike_min_mp: f64,
    /// Interceptors committed to an undefended-flank strike.
    pub strike_vanguard: i32,
    /// Flat MP margin added to a flank's defense estimate before attacking.
    pub hold_margin: f64,
    /// Turns per step of the escalating MP reserve.
    pub reserve_period: u32,
    /// Supports built alongside an attack.
    pub support_count: u32,
    /// Opponent MP tiers that escalate active defense.
    pub escalation_mp: [f64; 3],
    /// Fraction of the turn's starting SP after which extra defenses stop.
    pub extra_spend_fraction: f64,
    /// Occupied mid-board probe cells that mark the opponent as saturated.
    pub saturation_threshold: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            release_threshold: 9,
            strike_min_mp: 10.0,
            strike_vanguard: 6,
            hold_margin: 4.0,
            reserve_period: 20,
            support_count: 2,
            escalation_mp: [15.0, 25.0, 35.0],
            extra_spend_fraction: 0.4,
            saturation_threshold: 8,
        }
    }
}

/// Configuration document as the engine sends it.
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(rename = "unitInformation")]
    unit_information: Vec<UnitInfo>,
    #[serde(default)]
    tuning: Tuning,
}

/// Immutable match configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Catalog indexed by [`UnitType::index`].
    units: [UnitInfo; 6],
    /// Strategy tuning.
    pub tuning: Tuning,
}

impl Default for GameConfig {
    fn default() -> Self {
        let upgrade = |sp_cost, start_health| Some(UpgradeInfo { sp_cost, start_health });
        Self {
            units: [
                UnitInfo::stock("FF", 1.0, 0.0, 60.0, upgrade(1.0, Some(120.0))),
                UnitInfo::stock("EF", 4.0, 0.0, 30.0, upgrade(4.0, None)),
                UnitInfo::stock("DF", 2.0, 0.0, 75.0, upgrade(4.0, None)),
                UnitInfo::stock("PI", 0.0, 1.0, 15.0, None),
                UnitInfo::stock("EI", 0.0, 3.0, 5.0, None),
                UnitInfo::stock("SI", 0.0, 1.0, 40.0, None),
            ],
            tuning: Tuning::default(),
        }
    }
}

impl GameConfig {
    /// Build a configuration from an explicit catalog.
    #[must_use]
    pub fn new(units: [UnitInfo; 6], tuning: Tuning) -> Self {
        Self { units, tuning }
    }

    /// Parse the engine's configuration document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or lists fewer than six units.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(json)?;
        let count = raw.unit_information.len();
        let units: [UnitInfo; 6] = raw
            .unit_information
            .into_iter()
            .take(6)
            .collect::<Vec<_>>()
            .try_into()
            .map_err(|_| ConfigError::MissingUnit(count))?;
        Ok(Self {
            units,
            tuning: raw.tuning,
        })
    }

    /// Read and parse a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Catalog entry for a unit kind.
    #[must_use]
    pub fn unit(&self, unit: UnitType) -> &UnitInfo {
        &self.units[unit.index()]
    }

    /// Engine shorthand for a unit kind.
    #[must_use]
    pub fn shorthand(&self, unit: UnitType) -> &str {
        &self.unit(unit).shorthand
    }

    /// Cost of one unit in its own currency, including the upgrade if
    /// requested (upgrades only apply to stationary units).
    #[must_use]
    pub fn cost(&self, unit: UnitType, upgrade: bool) -> f64 {
        let info = self.unit(unit);
        if unit.is_stationary() {
            info.sp_cost + if upgrade { info.upgrade_cost() } else { 0.0 }
        } else {
            info.mp_cost
        }
    }
}
