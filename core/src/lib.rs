#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Waypoint Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values describing what
//! changed. Systems consume immutable snapshots such as [`CritterView`] and
//! answer with plain data, never with references into world storage.

use std::{fmt, str::FromStr, time::Duration};

pub use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Waypoint Defence.";

/// Highest level a tower can reach through upgrades.
pub const MAX_TOWER_LEVEL: u8 = 3;

/// Price of the upgrade from level 1 to level 2.
pub const LEVEL_2_UPGRADE_COST: u32 = 100;

/// Price of the upgrade from level 2 to level 3.
pub const LEVEL_3_UPGRADE_COST: u32 = 200;

/// Fraction of the total investment returned when a tower is sold.
pub const REFUND_RATIO: f32 = 0.75;

/// Damage multiplier applied by special towers against top-tier critters.
pub const SPECIAL_DAMAGE_MULTIPLIER: f32 = 12.0;

/// Fraction of the projectile damage dealt to critters caught in a splash.
pub const SPLASH_DAMAGE_RATIO: f32 = 0.5;

/// Distance unit used to scale the splash radius of area towers per level.
pub const AOE_BASE_UNIT: f32 = 64.0;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that the next wave of the campaign begins spawning.
    StartNextWave,
    /// Requests placement of a tower on the tile containing `position`.
    PlaceTower {
        /// Type of tower to construct.
        kind: TowerKind,
        /// World-space position; snapped to the centre of its tile.
        position: Vec2,
    },
    /// Requests an upgrade of the tower standing on the tile containing `position`.
    UpgradeTower {
        /// World-space position identifying the tower's tile.
        position: Vec2,
    },
    /// Requests the sale of the tower standing on the tile containing `position`.
    SellTower {
        /// World-space position identifying the tower's tile.
        position: Vec2,
    },
    /// Adds the provided delta to the player's currency without any checks.
    AdjustCurrency {
        /// Signed amount added to the balance.
        delta: i64,
    },
    /// Restores the initial campaign state and clears every entity.
    Reset,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that a wave began populating the spawn queue.
    WaveStarted {
        /// One-based wave number.
        wave: u32,
        /// Number of critters queued for the wave.
        queued: usize,
    },
    /// Confirms that a critter left the spawn queue and entered the path.
    CritterSpawned {
        /// Identifier assigned to the critter.
        critter: CritterId,
        /// Type tag of the critter.
        kind: CritterKind,
    },
    /// Reports damage applied to a critter by a projectile.
    CritterDamaged {
        /// Critter that received the damage.
        critter: CritterId,
        /// Amount subtracted from the critter's health.
        amount: f32,
        /// Whether the damage was the special bonus variant.
        special: bool,
    },
    /// Reports that a dead critter was removed and its reward credited.
    CritterKilled {
        /// Critter that was removed.
        critter: CritterId,
        /// Type tag of the critter.
        kind: CritterKind,
        /// Currency credited to the player.
        reward: u32,
    },
    /// Reports that a critter reached the end of the path and was removed.
    CritterEscaped {
        /// Critter that escaped.
        critter: CritterId,
        /// Type tag of the critter.
        kind: CritterKind,
        /// Life points remaining after the penalty.
        life_points: u32,
    },
    /// Announces that every critter of the wave was spawned and removed.
    WaveCompleted {
        /// One-based wave number that finished.
        wave: u32,
    },
    /// Announces that life points reached zero.
    GameOver {
        /// Wave that was in progress when the game ended.
        wave: u32,
    },
    /// Announces that the final wave of the campaign was cleared.
    CampaignComplete,
    /// Reports a change of the player's currency balance.
    CurrencyChanged {
        /// Signed amount that was applied.
        delta: i64,
        /// Balance after the change.
        balance: i64,
    },
    /// Confirms that a tower was placed into the world.
    TowerPlaced {
        /// Identifier assigned to the tower by the world.
        tower: TowerId,
        /// Type of tower that was placed.
        kind: TowerKind,
        /// Snapped world-space position of the tower.
        position: Vec2,
    },
    /// Confirms that a tower advanced a level.
    TowerUpgraded {
        /// Identifier of the upgraded tower.
        tower: TowerId,
        /// Level reached by the tower.
        level: u8,
        /// Currency spent on the upgrade.
        cost: u32,
    },
    /// Confirms that a tower was sold and removed.
    TowerSold {
        /// Identifier of the sold tower.
        tower: TowerId,
        /// Currency credited to the player.
        refund: u32,
    },
    /// Reports that a tower's adaptive selector switched strategies.
    StrategyChanged {
        /// Tower whose selector switched.
        tower: TowerId,
        /// Strategy active before the switch.
        from: StrategyKind,
        /// Strategy active after the switch.
        to: StrategyKind,
    },
    /// Confirms that a tower launched a projectile.
    ProjectileFired {
        /// Tower that fired.
        tower: TowerId,
        /// Identifier of the new projectile.
        projectile: ProjectileId,
        /// Critter captured as the projectile's target.
        target: CritterId,
    },
    /// Announces that the campaign state was restored to its initial values.
    GameReset,
    /// Reports that a tower placement request was refused.
    TowerPlacementRejected {
        /// Type of tower requested for placement.
        kind: TowerKind,
        /// Position provided in the request.
        position: Vec2,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Reports that a tower upgrade request was refused.
    TowerUpgradeRejected {
        /// Position provided in the request.
        position: Vec2,
        /// Specific reason the upgrade failed.
        reason: UpgradeError,
    },
    /// Reports that a tower sale request was refused.
    TowerSaleRejected {
        /// Position provided in the request.
        position: Vec2,
        /// Specific reason the sale failed.
        reason: SaleError,
    },
    /// Reports that a wave start request was refused.
    WaveStartRejected {
        /// Specific reason the wave could not start.
        reason: WaveStartError,
    },
}

/// Unique identifier assigned to a critter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CritterId(u32);

impl CritterId {
    /// Creates a new critter identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the projectile identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Type tag carried by every critter.
///
/// The tag drives max-health lookup, escape penalties and bonus damage; the
/// visual asset key is derived from it and never inspected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CritterKind {
    /// Weakest critter, the only type in the first wave.
    Basic,
    /// Sturdier critter mixed into later waves.
    Medium,
    /// Top-tier critter that special towers specialise against.
    Strong,
}

impl CritterKind {
    /// Critter type that special towers and focus decorations prioritise.
    pub const TOP_TIER: Self = Self::Strong;

    /// Reports whether the critter belongs to the top tier.
    #[must_use]
    pub const fn is_top_tier(self) -> bool {
        matches!(self, Self::Strong)
    }

    /// Reference health used to express a critter's health as a ratio.
    #[must_use]
    pub const fn max_health(self) -> f32 {
        match self {
            Self::Basic => 110.0,
            Self::Medium => 225.0,
            Self::Strong => 1_000.0,
        }
    }

    /// Penalty applied when a critter of this type reaches the exit.
    #[must_use]
    pub const fn escape_penalty(self) -> EscapePenalty {
        match self {
            Self::Basic => EscapePenalty::new(10, 1),
            Self::Medium => EscapePenalty::new(50, 2),
            Self::Strong => EscapePenalty::new(100, 3),
        }
    }

    /// Visual asset identifier handed to renderers.
    #[must_use]
    pub const fn asset_key(self) -> &'static str {
        match self {
            Self::Basic => "textures/critter.png",
            Self::Medium => "textures/critter2.png",
            Self::Strong => "textures/critter3.png",
        }
    }

    /// Human-readable label for inspection panels.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Basic => "Basic critter",
            Self::Medium => "Medium critter",
            Self::Strong => "Strong critter",
        }
    }
}

/// Currency and life-point cost of letting a critter through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EscapePenalty {
    currency: i64,
    life_points: u32,
}

impl EscapePenalty {
    /// Creates a new penalty descriptor.
    #[must_use]
    pub const fn new(currency: i64, life_points: u32) -> Self {
        Self {
            currency,
            life_points,
        }
    }

    /// Currency removed from the player's balance.
    #[must_use]
    pub const fn currency(&self) -> i64 {
        self.currency
    }

    /// Life points removed from the player.
    #[must_use]
    pub const fn life_points(&self) -> u32 {
        self.life_points
    }
}

/// Types of towers that can be constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TowerKind {
    /// Single-target tower.
    Basic,
    /// Tower whose projectiles splash nearby critters.
    Area,
    /// Tower dealing bonus damage to top-tier critters.
    Special,
}

impl TowerKind {
    /// Every tower kind in shop order.
    pub const ALL: [Self; 3] = [Self::Basic, Self::Area, Self::Special];

    /// Purchase price of a level 1 tower.
    #[must_use]
    pub const fn cost(self) -> u32 {
        match self {
            Self::Basic => 100,
            Self::Area => 150,
            Self::Special => 125,
        }
    }

    /// Unmodified level 1 stats of the tower kind.
    #[must_use]
    pub const fn base_stats(self) -> TowerStats {
        match self {
            Self::Basic => TowerStats::new(150.0, 50.0, 2.0, 0.0),
            Self::Area => TowerStats::new(120.0, 75.0, 1.6, AOE_BASE_UNIT),
            Self::Special => TowerStats::new(140.0, 85.0, 2.0, 0.0),
        }
    }

    /// Visual asset identifier for the tower at the provided level.
    ///
    /// Levels outside `1..=3` are clamped into that range.
    #[must_use]
    pub const fn asset_key(self, level: u8) -> &'static str {
        match (self, level) {
            (Self::Basic, 0 | 1) => "textures/stage_1.png",
            (Self::Basic, 2) => "textures/stage_2.png",
            (Self::Basic, _) => "textures/stage_3.png",
            (Self::Area, 0 | 1) => "textures/area1.png",
            (Self::Area, 2) => "textures/area2.png",
            (Self::Area, _) => "textures/area3.png",
            (Self::Special, 0 | 1) => "textures/special1.png",
            (Self::Special, 2) => "textures/special2.png",
            (Self::Special, _) => "textures/special3.png",
        }
    }

    /// Damage multiplier applied against top-tier critters.
    #[must_use]
    pub const fn special_multiplier(self) -> f32 {
        match self {
            Self::Special => SPECIAL_DAMAGE_MULTIPLIER,
            Self::Basic | Self::Area => 1.0,
        }
    }

    /// Human-readable label for shop and inspection panels.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Basic => "Basic Tower",
            Self::Area => "Area Tower",
            Self::Special => "Special Tower",
        }
    }
}

impl TryFrom<u8> for TowerKind {
    type Error = SetupError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        match index {
            0 => Ok(Self::Basic),
            1 => Ok(Self::Area),
            2 => Ok(Self::Special),
            other => Err(SetupError::UnknownTowerKind(other.to_string())),
        }
    }
}

impl FromStr for TowerKind {
    type Err = SetupError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "area" => Ok(Self::Area),
            "special" => Ok(Self::Special),
            _ => Err(SetupError::UnknownTowerKind(value.to_owned())),
        }
    }
}

impl fmt::Display for TowerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Combat statistics of a tower.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerStats {
    /// Targeting radius in world units.
    pub range: f32,
    /// Damage carried by each projectile.
    pub power: f32,
    /// Shots per second.
    pub fire_rate: f32,
    /// Splash radius of fired projectiles; zero disables splash.
    pub aoe_radius: f32,
}

impl TowerStats {
    /// Creates a new stat block.
    #[must_use]
    pub const fn new(range: f32, power: f32, fire_rate: f32, aoe_radius: f32) -> Self {
        Self {
            range,
            power,
            fire_rate,
            aoe_radius,
        }
    }
}

/// Identifies one of the targeting algorithms a tower can delegate to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StrategyKind {
    /// Multi-factor score blending progress, health and proximity.
    Smart,
    /// Critter furthest along the path.
    ExitProximity,
    /// Critter with the most remaining health.
    Strongest,
    /// Critter with the least remaining health.
    Weakest,
    /// Critter nearest to the tower.
    Closest,
}

impl StrategyKind {
    /// Every strategy kind in table order.
    pub const ALL: [Self; 5] = [
        Self::Smart,
        Self::ExitProximity,
        Self::Strongest,
        Self::Weakest,
        Self::Closest,
    ];

    /// Position of the strategy inside fixed-size lookup tables.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Smart => 0,
            Self::ExitProximity => 1,
            Self::Strongest => 2,
            Self::Weakest => 3,
            Self::Closest => 4,
        }
    }

    /// Human-readable label for diagnostics panels.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Smart => "Smart Targeting",
            Self::ExitProximity => "Target Closest to Exit",
            Self::Strongest => "Target Strongest",
            Self::Weakest => "Target Weakest",
            Self::Closest => "Target Closest",
        }
    }
}

/// Pending critter description produced by the wave content table.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CritterSpec {
    /// Type tag of the critter.
    pub kind: CritterKind,
    /// Movement speed in world units per second.
    pub speed: f32,
    /// Starting health.
    pub health: f32,
    /// Currency granted when the critter is killed.
    pub reward: u32,
}

impl CritterSpec {
    /// Creates a new critter description.
    #[must_use]
    pub const fn new(kind: CritterKind, speed: f32, health: f32, reward: u32) -> Self {
        Self {
            kind,
            speed,
            health,
            reward,
        }
    }

    /// Visual asset identifier of the described critter.
    #[must_use]
    pub const fn asset_key(&self) -> &'static str {
        self.kind.asset_key()
    }
}

/// Immutable representation of a single critter used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct CritterSnapshot {
    /// Unique identifier assigned to the critter.
    pub id: CritterId,
    /// Type tag of the critter.
    pub kind: CritterKind,
    /// Current world-space position.
    pub position: Vec2,
    /// Remaining health.
    pub health: f32,
    /// Index of the waypoint the critter is heading towards.
    pub waypoint: usize,
    /// Movement speed in world units per second.
    pub speed: f32,
    /// Currency granted when the critter is killed.
    pub reward: u32,
    /// Whether the critter's health dropped to zero.
    pub dead: bool,
    /// Whether the critter walked past the final waypoint.
    pub reached_end: bool,
}

impl CritterSnapshot {
    /// Reports whether the critter can still be targeted or damaged.
    #[must_use]
    pub const fn is_live(&self) -> bool {
        !self.dead && !self.reached_end
    }

    /// Remaining health relative to the type's reference maximum.
    #[must_use]
    pub fn health_ratio(&self) -> f32 {
        (self.health / self.kind.max_health()).clamp(0.0, 1.0)
    }
}

/// Read-only snapshot describing all critters on the path.
#[derive(Clone, Debug, Default)]
pub struct CritterView {
    snapshots: Vec<CritterSnapshot>,
}

impl CritterView {
    /// Creates a new critter view from the provided snapshots.
    ///
    /// Identifiers are allocated in spawn order, so sorting by id reproduces
    /// the world's container order.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<CritterSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured critter snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &CritterSnapshot> {
        self.snapshots.iter()
    }

    /// Iterator over critters that are neither dead nor escaped.
    pub fn live(&self) -> impl Iterator<Item = &CritterSnapshot> {
        self.snapshots.iter().filter(|snapshot| snapshot.is_live())
    }

    /// Looks up the snapshot for the provided identifier.
    #[must_use]
    pub fn get(&self, id: CritterId) -> Option<&CritterSnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of captured snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view contains no snapshots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<CritterSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Kind of tower that was constructed.
    pub kind: TowerKind,
    /// Snapped world-space position of the tower.
    pub position: Vec2,
    /// Current level in `1..=3`.
    pub level: u8,
    /// Stats after every decoration has been applied.
    pub stats: TowerStats,
    /// Strategy chosen during the most recent targeting cycle.
    pub strategy: StrategyKind,
    /// Number of decorations layered onto the tower.
    pub decorations: usize,
    /// Currency returned if the tower were sold now.
    pub refund_value: u32,
    /// Price of the next upgrade, zero at max level.
    pub upgrade_cost: u32,
    /// Damage multiplier against top-tier critters.
    pub special_multiplier: f32,
    /// Visual asset identifier for the current level.
    pub asset_key: &'static str,
}

/// Read-only snapshot describing all towers on the map.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view contains no snapshots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of an in-flight projectile.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier allocated to the projectile.
    pub id: ProjectileId,
    /// Tower that fired the projectile.
    pub tower: TowerId,
    /// Current world-space position.
    pub position: Vec2,
    /// Critter captured when the projectile was fired.
    pub target: CritterId,
    /// Splash radius resolved on impact.
    pub aoe_radius: f32,
    /// Whether the projectile deals bonus damage to top-tier critters.
    pub special: bool,
}

/// Reasons a tower placement request may be refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The requested tile is part of the critter path.
    OnPath,
    /// A tower already stands on the requested tile.
    Occupied,
    /// The player cannot afford the tower.
    InsufficientFunds,
}

/// Reasons a tower upgrade request may be refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeError {
    /// No tower stands on the requested tile.
    MissingTower,
    /// The tower already reached the highest level.
    MaxLevel,
    /// The player cannot afford the upgrade.
    InsufficientFunds,
}

/// Reasons a tower sale request may be refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SaleError {
    /// No tower stands on the requested tile.
    MissingTower,
}

/// Reasons a wave start request may be refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WaveStartError {
    /// Life points reached zero; only a reset can resume play.
    GameOver,
    /// The final wave was already cleared.
    CampaignComplete,
    /// The current wave is still spawning or has critters on the path.
    WaveInProgress,
}

/// Fatal configuration or content failures detected while constructing state.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum SetupError {
    /// The map supplied no waypoints for critters to follow.
    #[error("critter path is empty; the map must supply at least one waypoint")]
    EmptyPath,
    /// The map tile length was zero, negative or not finite.
    #[error("tile length must be positive and finite (received {tile_length})")]
    InvalidTileLength {
        /// Offending tile length.
        tile_length: f32,
    },
    /// The configured tile length disagrees with the map's tile length.
    #[error("configured tile length {configured} does not match the map's {map}")]
    TileLengthMismatch {
        /// Tile length from the configuration.
        configured: f32,
        /// Tile length reported by the map.
        map: f32,
    },
    /// A path tile lies outside the map grid.
    #[error("path tile ({column}, {row}) lies outside the map grid")]
    PathTileOutOfBounds {
        /// Column of the offending tile.
        column: u32,
        /// Row of the offending tile.
        row: u32,
    },
    /// Two consecutive path tiles do not share an edge.
    #[error("path tile {index} does not share an edge with its successor")]
    DisconnectedPath {
        /// Index of the first tile of the broken pair.
        index: usize,
    },
    /// A tower type tag could not be resolved.
    #[error("unknown tower kind `{0}`")]
    UnknownTowerKind(String),
    /// A configuration value was rejected.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Map collaborator consulted by the world for paths and placement checks.
pub trait PathMap: fmt::Debug {
    /// Ordered world-space waypoints critters walk along.
    fn waypoints(&self) -> Vec<Vec2>;

    /// Reports whether the tile containing `position` belongs to the path.
    fn is_path_tile(&self, position: Vec2) -> bool;

    /// Side length of a single tile, used for placement snapping.
    fn tile_length(&self) -> f32;
}

#[cfg(test)]
mod tests {
    use super::{
        CritterId, CritterKind, CritterSnapshot, CritterView, PlacementError, SetupError,
        StrategyKind, TowerId, TowerKind, Vec2,
    };
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    fn snapshot(id: u32, dead: bool) -> CritterSnapshot {
        CritterSnapshot {
            id: CritterId::new(id),
            kind: CritterKind::Basic,
            position: Vec2::ZERO,
            health: 55.0,
            waypoint: 0,
            speed: 100.0,
            reward: 5,
            dead,
            reached_end: false,
        }
    }

    #[test]
    fn tower_id_round_trips_through_bincode() {
        assert_round_trip(&TowerId::new(42));
    }

    #[test]
    fn placement_error_round_trips_through_bincode() {
        assert_round_trip(&PlacementError::Occupied);
    }

    #[test]
    fn tower_kind_parses_names_and_shop_indices() {
        assert_eq!("Area".parse::<TowerKind>(), Ok(TowerKind::Area));
        assert_eq!(TowerKind::try_from(2), Ok(TowerKind::Special));
        assert_eq!(
            TowerKind::try_from(7),
            Err(SetupError::UnknownTowerKind("7".to_owned()))
        );
        assert!("laser".parse::<TowerKind>().is_err());
    }

    #[test]
    fn only_strong_critters_are_top_tier() {
        assert!(CritterKind::Strong.is_top_tier());
        assert!(!CritterKind::Medium.is_top_tier());
        assert_eq!(CritterKind::TOP_TIER, CritterKind::Strong);
    }

    #[test]
    fn area_towers_start_with_one_unit_of_splash() {
        assert_eq!(TowerKind::Area.base_stats().aoe_radius, 64.0);
        assert_eq!(TowerKind::Basic.base_stats().aoe_radius, 0.0);
    }

    #[test]
    fn strategy_indices_cover_lookup_table() {
        for (position, kind) in StrategyKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), position);
        }
    }

    #[test]
    fn critter_view_orders_by_id_and_filters_dead() {
        let view = CritterView::from_snapshots(vec![snapshot(3, false), snapshot(1, true)]);
        let ids: Vec<_> = view.iter().map(|snapshot| snapshot.id.get()).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(view.live().count(), 1);
        assert!(view.get(CritterId::new(3)).is_some());
        assert!(view.get(CritterId::new(2)).is_none());
    }

    #[test]
    fn health_ratio_is_clamped_against_reference_maximum() {
        let mut critter = snapshot(1, false);
        assert!((critter.health_ratio() - 0.5).abs() < f32::EPSILON);
        critter.health = 500.0;
        assert_eq!(critter.health_ratio(), 1.0);
    }
}
