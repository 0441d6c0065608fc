#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Lane Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems and
//! presentation collaborators to react to. Systems consume read-only views
//! such as [`EnemyView`] and [`TowerView`] and respond with plain data.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod geometry;

pub use glam::Vec2;

/// Frame rate that enemy and projectile speeds are expressed against.
///
/// A speed of `2.0` moves two pixels per reference frame, so a tick of `dt`
/// seconds advances `speed * dt * REFERENCE_FRAME_RATE` pixels.
pub const REFERENCE_FRAME_RATE: f32 = 60.0;

/// Highest level a tower can be upgraded to.
pub const MAX_TOWER_LEVEL: u8 = 3;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that the next wave begins. Ignored while a wave is active.
    StartWave,
    /// Requests placement of a tower on the provided grid cell.
    PlaceTower {
        /// Type of tower to construct.
        kind: TowerKind,
        /// Cell that will hold the tower.
        cell: CellCoord,
    },
    /// Requests that a tower advances to its next level.
    UpgradeTower {
        /// Identifier of the tower to upgrade.
        tower: TowerId,
    },
    /// Requests that a tower is sold back for part of its investment.
    SellTower {
        /// Identifier of the tower to sell.
        tower: TowerId,
    },
    /// Changes how a tower chooses among enemies in range.
    SetTargeting {
        /// Identifier of the tower to reconfigure.
        tower: TowerId,
        /// Targeting rule applied from the next tick onwards.
        mode: TargetingMode,
    },
    /// Requests activation of a global player ability.
    UseAbility {
        /// Ability to activate.
        kind: AbilityKind,
        /// World-space point targeted by the ability, when it needs one.
        target: Option<Vec2>,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that a new wave began spawning.
    WaveStarted {
        /// One-based number of the wave.
        wave: u32,
        /// Number of enemies scheduled for the wave.
        enemies: u32,
    },
    /// Confirms that an enemy entered the path.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Kind of the enemy.
        kind: EnemyKind,
    },
    /// Reports that an enemy died and its bounty was paid out.
    EnemyKilled {
        /// Identifier of the defeated enemy.
        enemy: EnemyId,
        /// Kind of the defeated enemy.
        kind: EnemyKind,
        /// Whether the enemy was a boss.
        boss: bool,
        /// Money credited to the player, including active multipliers.
        reward: u32,
        /// Score credited to the player.
        score: u32,
    },
    /// Reports that an enemy reached the end of the path.
    EnemyLeaked {
        /// Identifier of the enemy that escaped.
        enemy: EnemyId,
        /// Kind of the enemy that escaped.
        kind: EnemyKind,
        /// Lives taken from the player.
        lives: u32,
    },
    /// Total damage applied to enemies during one tick.
    DamageDealt {
        /// Sum of health and shield removed.
        amount: f32,
    },
    /// An area attack detonated.
    Detonation {
        /// Impact point of the blast.
        position: Vec2,
        /// Radius covered by the blast.
        radius: f32,
    },
    /// A chain attack jumped between two enemies.
    ChainArc {
        /// Position of the enemy the arc started from.
        from: Vec2,
        /// Position of the enemy the arc reached.
        to: Vec2,
    },
    /// Announces that the active wave has no pending spawns and no live enemies.
    WaveCompleted {
        /// One-based number of the completed wave.
        wave: u32,
        /// Lives lost while the wave was active.
        lives_lost: u32,
    },
    /// Confirms that a tower was placed into the world.
    TowerPlaced {
        /// Identifier assigned to the tower by the world.
        tower: TowerId,
        /// Type of tower that was placed.
        kind: TowerKind,
        /// Cell occupied by the tower.
        cell: CellCoord,
        /// Money spent on the tower.
        cost: u32,
    },
    /// Reports that a tower placement request was rejected.
    TowerPlacementRejected {
        /// Type of tower requested for placement.
        kind: TowerKind,
        /// Cell provided in the placement request.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a tower advanced a level.
    TowerUpgraded {
        /// Identifier of the upgraded tower.
        tower: TowerId,
        /// Level reached by the tower.
        level: u8,
        /// Money spent on the upgrade.
        cost: u32,
    },
    /// Reports that an upgrade request was rejected.
    TowerUpgradeRejected {
        /// Identifier of the tower targeted for the upgrade.
        tower: TowerId,
        /// Specific reason the upgrade failed.
        reason: UpgradeError,
    },
    /// Confirms that a tower was sold.
    TowerSold {
        /// Identifier of the removed tower.
        tower: TowerId,
        /// Cell freed by the sale.
        cell: CellCoord,
        /// Money refunded to the player.
        refund: u32,
    },
    /// Reports that a sale request was rejected.
    TowerSaleRejected {
        /// Identifier of the tower targeted for the sale.
        tower: TowerId,
        /// Specific reason the sale failed.
        reason: SaleError,
    },
    /// Confirms that a tower switched targeting rules.
    TargetingChanged {
        /// Identifier of the reconfigured tower.
        tower: TowerId,
        /// Newly active targeting rule.
        mode: TargetingMode,
    },
    /// Confirms that an ability was activated.
    AbilityUsed {
        /// Ability that was activated.
        kind: AbilityKind,
        /// Money spent on the activation.
        cost: u32,
    },
    /// Reports that an ability activation was rejected.
    AbilityRejected {
        /// Ability that was requested.
        kind: AbilityKind,
        /// Specific reason the activation failed.
        reason: AbilityError,
    },
    /// Reports how many enemies a mass freeze caught.
    EnemiesFrozen {
        /// Number of enemies that received the freeze.
        count: u32,
    },
    /// Reports that the player regained lives.
    PlayerHealed {
        /// Lives restored after clamping to the maximum.
        amount: u32,
    },
    /// Announces that the session ended.
    GameOver {
        /// Whether the player survived the final wave.
        victory: bool,
        /// Wave counter when the session ended.
        wave: u32,
        /// Final score.
        score: u64,
    },
    /// Announces that an achievement was unlocked.
    AchievementUnlocked {
        /// Identifier of the achievement.
        achievement: String,
    },
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
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

/// Unique identifier assigned to an in-flight projectile.
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

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }
}

/// Kinds of enemies that waves are composed of.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    /// Baseline walker.
    Basic,
    /// Fragile and quick.
    Fast,
    /// Slow with a deep health pool.
    Tank,
    /// Cheap enemies sent in large numbers.
    Swarm,
    /// Wave leader that shrugs off slows.
    Boss,
    /// Reduces incoming damage through armor.
    Armored,
    /// Carries a regenerating shield.
    Shielded,
    /// Periodically heals nearby enemies.
    Healer,
    /// Regenerates its own health.
    Regenerator,
    /// Airborne enemy that some towers cannot reach.
    Flyer,
}

impl EnemyKind {
    /// Every enemy kind in declaration order.
    pub const ALL: [EnemyKind; 10] = [
        Self::Basic,
        Self::Fast,
        Self::Tank,
        Self::Swarm,
        Self::Boss,
        Self::Armored,
        Self::Shielded,
        Self::Healer,
        Self::Regenerator,
        Self::Flyer,
    ];
}

/// Types of towers that can be constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TowerKind {
    /// Balanced single-target tower.
    Basic,
    /// Long range, heavy hits, slow cadence.
    Sniper,
    /// Fast cadence, light hits.
    Rapid,
    /// Area damage on impact.
    Splash,
    /// Continuous beam.
    Laser,
    /// Slows its targets.
    Ice,
    /// Poisons its targets.
    Poison,
    /// Chains lightning between enemies.
    Electric,
    /// Heavy area damage against ground enemies.
    Artillery,
    /// Never fires; boosts the damage of nearby towers.
    Support,
    /// Sets its targets on fire.
    Flame,
}

impl TowerKind {
    /// Every tower kind in declaration order.
    pub const ALL: [TowerKind; 11] = [
        Self::Basic,
        Self::Sniper,
        Self::Rapid,
        Self::Splash,
        Self::Laser,
        Self::Ice,
        Self::Poison,
        Self::Electric,
        Self::Artillery,
        Self::Support,
        Self::Flame,
    ];

    /// Canonical lowercase name used by configuration files and adapters.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Sniper => "sniper",
            Self::Rapid => "rapid",
            Self::Splash => "splash",
            Self::Laser => "laser",
            Self::Ice => "ice",
            Self::Poison => "poison",
            Self::Electric => "electric",
            Self::Artillery => "artillery",
            Self::Support => "support",
            Self::Flame => "flame",
        }
    }

    /// Resolves a tower kind from its canonical name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

/// Global abilities the player can trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilityKind {
    /// Flat damage to every enemy inside a circle.
    Airstrike,
    /// Freezes every living enemy.
    FreezeAll,
    /// Multiplies bounties for a while.
    CashBoost,
    /// Multiplies tower damage for a while.
    DamageBoost,
    /// Restores player lives immediately.
    HealthRestore,
}

impl AbilityKind {
    /// Every ability in registry order.
    pub const ALL: [AbilityKind; 5] = [
        Self::Airstrike,
        Self::FreezeAll,
        Self::CashBoost,
        Self::DamageBoost,
        Self::HealthRestore,
    ];

    /// Position of the ability inside fixed-size registries.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Airstrike => 0,
            Self::FreezeAll => 1,
            Self::CashBoost => 2,
            Self::DamageBoost => 3,
            Self::HealthRestore => 4,
        }
    }
}

/// Time-boxed modifiers that can be attached to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    /// Reduces speed by a fraction.
    Slow,
    /// Drains health per second.
    Poison,
    /// Drains health per second.
    Burn,
    /// Stops movement entirely.
    Freeze,
}

impl StatusKind {
    const fn bit(self) -> u8 {
        match self {
            Self::Slow => 1,
            Self::Poison => 1 << 1,
            Self::Burn => 1 << 2,
            Self::Freeze => 1 << 3,
        }
    }
}

/// Parameters of a status effect as applied to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatusEffect {
    /// Kind of the modifier.
    pub kind: StatusKind,
    /// Seconds the effect remains active.
    pub duration: f32,
    /// Slow fraction for [`StatusKind::Slow`], damage per second for the
    /// damage-over-time kinds, unused for [`StatusKind::Freeze`].
    pub magnitude: f32,
}

impl StatusEffect {
    /// Creates a new status effect description.
    #[must_use]
    pub const fn new(kind: StatusKind, duration: f32, magnitude: f32) -> Self {
        Self {
            kind,
            duration,
            magnitude,
        }
    }
}

/// Compact set of status kinds, used for presentation icons.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct StatusSet {
    bits: u8,
}

impl StatusSet {
    /// Adds the provided kind to the set.
    pub fn insert(&mut self, kind: StatusKind) {
        self.bits |= kind.bit();
    }

    /// Reports whether the set contains the provided kind.
    #[must_use]
    pub const fn contains(&self, kind: StatusKind) -> bool {
        self.bits & kind.bit() != 0
    }

    /// Reports whether the set is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }
}

/// Rule a tower uses to choose among the enemies in its range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetingMode {
    /// Enemy furthest along the path.
    #[default]
    First,
    /// Enemy least far along the path.
    Last,
    /// Enemy nearest to the tower.
    Closest,
    /// Enemy with the most current health.
    Strongest,
    /// Enemy with the least current health.
    Weakest,
}

/// Difficulty rows available in the difficulty table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    /// More lives and money, weaker enemies.
    Easy,
    /// Reference tuning.
    #[default]
    Normal,
    /// Fewer lives and money, tougher enemies.
    Hard,
}

impl Difficulty {
    /// Every difficulty from easiest to hardest.
    pub const ALL: [Difficulty; 3] = [Self::Easy, Self::Normal, Self::Hard];

    /// Resolves a difficulty from its lowercase name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "easy" => Some(Self::Easy),
            "normal" => Some(Self::Normal),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum PlacementError {
    /// The session already ended.
    #[error("the session has ended")]
    SessionOver,
    /// The requested cell lies beyond the grid bounds.
    #[error("cell lies outside the map")]
    OutOfBounds,
    /// The requested cell belongs to the enemy path.
    #[error("cell is part of the enemy path")]
    OnPath,
    /// The requested cell already holds a tower.
    #[error("cell already holds a tower")]
    Occupied,
    /// The player cannot afford the tower.
    #[error("tower costs {required} but only {available} is available")]
    InsufficientFunds {
        /// Price of the tower.
        required: u32,
        /// Money held by the player.
        available: u32,
    },
}

/// Reasons a tower upgrade request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum UpgradeError {
    /// The session already ended.
    #[error("the session has ended")]
    SessionOver,
    /// No tower with the provided identifier exists.
    #[error("no such tower")]
    MissingTower,
    /// The tower already reached the highest level.
    #[error("tower is already at the maximum level")]
    MaxLevel,
    /// The player cannot afford the upgrade.
    #[error("upgrade costs {required} but only {available} is available")]
    InsufficientFunds {
        /// Price of the upgrade.
        required: u32,
        /// Money held by the player.
        available: u32,
    },
}

/// Reasons a tower sale request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum SaleError {
    /// The session already ended.
    #[error("the session has ended")]
    SessionOver,
    /// No tower with the provided identifier exists.
    #[error("no such tower")]
    MissingTower,
}

/// Reasons an ability activation may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum AbilityError {
    /// The session already ended.
    #[error("the session has ended")]
    SessionOver,
    /// The ability is still recharging.
    #[error("ability is cooling down")]
    CoolingDown,
    /// The player cannot afford the ability.
    #[error("ability costs {required} but only {available} is available")]
    InsufficientFunds {
        /// Price of the ability.
        required: u32,
        /// Money held by the player.
        available: u32,
    },
    /// The ability needs a target point and none was given.
    #[error("ability requires a target point")]
    MissingTarget,
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Kind of the enemy.
    pub kind: EnemyKind,
    /// Pixel-space position.
    pub position: Vec2,
    /// Body radius used for projectile hits.
    pub radius: f32,
    /// Current health.
    pub health: f32,
    /// Health after wave and difficulty scaling.
    pub max_health: f32,
    /// Current shield.
    pub shield: f32,
    /// Shield capacity.
    pub max_shield: f32,
    /// Distance travelled along the waypoint sequence.
    pub progress: f32,
    /// Status effects currently attached.
    pub statuses: StatusSet,
    /// Whether the enemy is airborne.
    pub flying: bool,
    /// Whether the enemy is a boss.
    pub boss: bool,
    /// Whether the enemy is still alive.
    pub alive: bool,
    /// Whether the enemy reached the end of the path.
    pub reached_end: bool,
}

impl EnemySnapshot {
    /// Reports whether the enemy can still be attacked.
    #[must_use]
    pub const fn is_targetable(&self) -> bool {
        self.alive && !self.reached_end
    }
}

/// Read-only snapshot describing all enemies on the field.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot of a single enemy.
    #[must_use]
    pub fn get(&self, id: EnemyId) -> Option<&EnemySnapshot> {
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

    /// Reports whether the view holds no snapshots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Kind of tower that was constructed.
    pub kind: TowerKind,
    /// Grid cell holding the tower.
    pub cell: CellCoord,
    /// Pixel-space centre of the tower.
    pub position: Vec2,
    /// Current level.
    pub level: u8,
    /// Current attack range in pixels.
    pub range: f32,
    /// Current damage per hit, or per second for beams.
    pub damage: u32,
    /// Current shots per second.
    pub fire_rate: f32,
    /// Targeting rule in use.
    pub targeting: TargetingMode,
    /// Whether the tower can attack airborne enemies.
    pub hits_flying: bool,
    /// Whether the tower wants a target this tick.
    pub ready: bool,
}

/// Read-only snapshot describing all towers placed on the map.
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

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Target chosen for a ready tower during a tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerTarget {
    /// Tower that will attack.
    pub tower: TowerId,
    /// Enemy selected as the target.
    pub enemy: EnemyId,
    /// Pixel-space centre of the tower.
    pub tower_position: Vec2,
    /// Pixel-space position of the enemy when it was selected.
    pub enemy_position: Vec2,
}

/// Presentation data for an in-flight projectile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier of the projectile.
    pub id: ProjectileId,
    /// Kind of the tower that launched it.
    pub source: TowerKind,
    /// Pixel-space position.
    pub position: Vec2,
}

/// Presentation data for one ability slot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AbilitySnapshot {
    /// Ability described by the slot.
    pub kind: AbilityKind,
    /// Price of an activation.
    pub cost: u32,
    /// Recharge progress from `0.0` (just used) to `1.0` (ready).
    pub cooldown_fraction: f32,
    /// Whether the ability's duration window is open.
    pub active: bool,
}

/// Player resources as visible to presentation code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerSnapshot {
    /// Remaining lives.
    pub health: u32,
    /// Lives cap for the session's difficulty.
    pub max_health: u32,
    /// Spendable money.
    pub money: u32,
    /// Accumulated score.
    pub score: u64,
    /// Number of the most recently started wave.
    pub wave: u32,
}

#[cfg(test)]
mod tests {
    use super::{
        CellCoord, EnemyId, EnemyKind, EnemySnapshot, EnemyView, PlacementError, StatusKind,
        StatusSet, TowerId, TowerKind, Vec2,
    };
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn tower_id_round_trips_through_bincode() {
        assert_round_trip(&TowerId::new(42));
    }

    #[test]
    fn placement_error_round_trips_through_bincode() {
        assert_round_trip(&PlacementError::InsufficientFunds {
            required: 100,
            available: 40,
        });
    }

    #[test]
    fn tower_names_resolve_back_to_kinds() {
        for kind in TowerKind::ALL {
            assert_eq!(TowerKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(TowerKind::from_name("catapult"), None);
    }

    #[test]
    fn status_set_tracks_membership() {
        let mut set = StatusSet::default();
        assert!(set.is_empty());
        set.insert(StatusKind::Burn);
        set.insert(StatusKind::Freeze);
        assert!(set.contains(StatusKind::Burn));
        assert!(set.contains(StatusKind::Freeze));
        assert!(!set.contains(StatusKind::Slow));
    }

    #[test]
    fn enemy_view_lookup_uses_sorted_identifiers() {
        let view = EnemyView::from_snapshots(vec![snapshot(9), snapshot(2), snapshot(5)]);
        let ids: Vec<u32> = view.iter().map(|enemy| enemy.id.get()).collect();
        assert_eq!(ids, vec![2, 5, 9]);
        assert_eq!(view.get(EnemyId::new(5)).map(|enemy| enemy.id), Some(EnemyId::new(5)));
        assert!(view.get(EnemyId::new(3)).is_none());
    }

    fn snapshot(id: u32) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(id),
            kind: EnemyKind::Basic,
            position: Vec2::ZERO,
            radius: 8.0,
            health: 50.0,
            max_health: 50.0,
            shield: 0.0,
            max_shield: 0.0,
            progress: 0.0,
            statuses: StatusSet::default(),
            flying: false,
            boss: false,
            alive: true,
            reached_end: false,
        }
    }
}
