#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Configuration tables consumed by the Lane Defence simulation.
//!
//! Every balance value the engine reads lives here as data: tower and enemy
//! stats, wave compositions, difficulty multipliers, map layouts, ability
//! parameters and achievement thresholds. [`Tables::default`] carries the
//! shipped values and [`Tables::from_toml_str`] loads replacements.

use std::{fs, path::Path};

use lane_defence_core::{
    AbilityKind, CellCoord, Difficulty, EnemyKind, StatusEffect, TowerKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod defaults;

/// Errors raised while loading or validating configuration tables.
#[derive(Debug, Error)]
pub enum TableError {
    /// The table file could not be read.
    #[error("failed to read tables from {path}")]
    Io {
        /// Path that was being read.
        path: String,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// The TOML document did not match the table schema.
    #[error("malformed tables document")]
    Parse(#[from] toml::de::Error),
    /// A keyed table lists the same kind twice or leaves one out.
    #[error("{table} table must list every kind exactly once")]
    IncompleteTable {
        /// Name of the offending table.
        table: &'static str,
    },
    /// The wave table holds no waves.
    #[error("wave table is empty")]
    EmptyWaveTable,
    /// A wave spawns nothing.
    #[error("wave {wave} spawns no enemies")]
    EmptyWave {
        /// One-based number of the wave.
        wave: u32,
    },
    /// No map layout carries the requested name.
    #[error("unknown map layout `{0}`")]
    UnknownMap(String),
    /// A map layout's corners do not describe a walkable path.
    #[error("map layout `{name}` is malformed: {detail}")]
    MalformedMap {
        /// Name of the layout.
        name: String,
        /// Description of the defect.
        detail: String,
    },
    /// Pathfinding found no route from the layout's start to its end.
    #[error("map layout `{0}` has no route from start to end")]
    UnroutablePath(String),
    /// A numeric rule is outside its permitted domain.
    #[error("invalid rule `{0}`")]
    InvalidRule(&'static str),
}

/// Complete set of configuration tables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tables {
    /// Global numeric rules.
    pub rules: Rules,
    /// Stats for every tower kind.
    pub towers: TowerTable,
    /// Stats for every enemy kind.
    pub enemies: EnemyTable,
    /// Wave compositions in play order.
    pub waves: Vec<Wave>,
    /// Multipliers for every difficulty.
    pub difficulties: DifficultyTable,
    /// Named map layouts.
    pub maps: Vec<MapLayout>,
    /// Parameters of every ability.
    pub abilities: AbilityTable,
    /// Achievement definitions.
    pub achievements: Vec<AchievementDef>,
}

impl Default for Tables {
    fn default() -> Self {
        defaults::tables()
    }
}

impl Tables {
    /// Parses and validates tables from a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, TableError> {
        let tables: Tables = toml::from_str(contents)?;
        tables.validate()?;
        Ok(tables)
    }

    /// Reads, parses and validates tables from a TOML file.
    pub fn from_path(path: &Path) -> Result<Self, TableError> {
        let contents = fs::read_to_string(path).map_err(|source| TableError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Checks the cross-table invariants the simulation relies upon.
    pub fn validate(&self) -> Result<(), TableError> {
        self.rules.validate()?;
        if self.waves.is_empty() {
            return Err(TableError::EmptyWaveTable);
        }
        for (index, wave) in self.waves.iter().enumerate() {
            if wave.total() == 0 {
                return Err(TableError::EmptyWave {
                    wave: index as u32 + 1,
                });
            }
        }
        for layout in &self.maps {
            let _ = layout.path_cells(self.rules.columns, self.rules.rows)?;
        }
        Ok(())
    }

    /// Composition of the provided one-based wave.
    ///
    /// Waves beyond the end of the table reuse the final entry.
    #[must_use]
    pub fn wave(&self, number: u32) -> Option<&Wave> {
        let index = (number.max(1) - 1) as usize;
        self.waves.get(index).or_else(|| self.waves.last())
    }

    /// Looks up a map layout by name.
    pub fn map(&self, name: &str) -> Result<&MapLayout, TableError> {
        self.maps
            .iter()
            .find(|layout| layout.name == name)
            .ok_or_else(|| TableError::UnknownMap(name.to_owned()))
    }
}

/// Global numeric rules shared by every component.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rules {
    /// Number of grid columns.
    pub columns: u32,
    /// Number of grid rows.
    pub rows: u32,
    /// Edge length of a grid cell in pixels.
    pub cell_size: f32,
    /// Lives at the start of a normal-difficulty game.
    pub starting_health: u32,
    /// Money at the start of a normal-difficulty game.
    pub starting_money: u32,
    /// Seconds between consecutive spawns of a wave.
    pub spawn_interval: f32,
    /// Extra enemy health per wave after the first.
    pub health_growth_per_wave: f64,
    /// Extra enemy reward per wave after the first.
    pub reward_growth_per_wave: f64,
    /// Base of the exponential upgrade cost curve.
    pub upgrade_cost_growth: f64,
    /// Damage multiplier applied per upgrade.
    pub upgrade_damage_growth: f64,
    /// Range multiplier applied per upgrade.
    pub upgrade_range_growth: f64,
    /// Fire rate multiplier applied per upgrade.
    pub upgrade_fire_rate_growth: f32,
    /// Fraction of the total investment refunded on sale.
    pub sell_fraction: f64,
    /// Maximum distance between consecutive chain hops.
    pub chain_distance: f32,
    /// Distance after which a projectile that has not hit is discarded.
    pub projectile_max_travel: f32,
    /// Lives lost per leaked enemy.
    pub leak_damage: u32,
}

impl Rules {
    fn validate(&self) -> Result<(), TableError> {
        if self.columns == 0 || self.rows == 0 {
            return Err(TableError::InvalidRule("columns and rows"));
        }
        if !(self.cell_size > 0.0) {
            return Err(TableError::InvalidRule("cell_size"));
        }
        if !(self.spawn_interval >= 0.0) {
            return Err(TableError::InvalidRule("spawn_interval"));
        }
        if !(0.0..=1.0).contains(&self.sell_fraction) {
            return Err(TableError::InvalidRule("sell_fraction"));
        }
        Ok(())
    }
}

/// How a tower's attacks resolve.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AttackBehavior {
    /// Seeking projectile dealing flat damage once.
    Direct,
    /// Seeking projectile damaging every enemy near the impact point.
    Splash {
        /// Blast radius in pixels.
        radius: f32,
    },
    /// Seeking projectile dealing damage and attaching a status effect.
    Status {
        /// Effect attached on impact.
        effect: StatusEffect,
    },
    /// Seeking projectile whose damage jumps between nearby enemies.
    Chain {
        /// Maximum number of distinct enemies hit, primary target included.
        count: u32,
        /// Damage multiplier applied per hop.
        reduction: f32,
    },
    /// Continuous damage per second against a target re-acquired each tick.
    Beam,
    /// Never fires; boosts the damage of nearby towers.
    Support {
        /// Radius of the aura in pixels.
        buff_range: f32,
        /// Damage multiplier granted to towers inside the aura.
        damage_buff: f32,
    },
}

/// Base stats of a tower kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TowerStats {
    /// Kind described by the row.
    pub kind: TowerKind,
    /// Construction price.
    pub cost: u32,
    /// Damage per hit, or per second for beams.
    pub damage: u32,
    /// Attack range in pixels.
    pub range: u32,
    /// Shots per second; zero for towers that never fire.
    pub fire_rate: f32,
    /// Projectile speed in pixels per reference frame.
    #[serde(default)]
    pub projectile_speed: f32,
    /// Whether the tower can attack airborne enemies.
    #[serde(default = "default_true")]
    pub hits_flying: bool,
    /// Attack resolution.
    pub behavior: AttackBehavior,
}

fn default_true() -> bool {
    true
}

/// Periodic heal emitted by healer enemies.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HealAura {
    /// Radius of the heal in pixels.
    pub range: f32,
    /// Health restored to every other enemy in range.
    pub amount: f32,
    /// Seconds between heals.
    pub interval: f32,
}

/// Base stats of an enemy kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyStats {
    /// Kind described by the row.
    pub kind: EnemyKind,
    /// Health at wave one on normal difficulty.
    pub health: f32,
    /// Movement speed in pixels per reference frame.
    pub speed: f32,
    /// Bounty at wave one.
    pub reward: u32,
    /// Body radius in pixels.
    pub size: f32,
    /// Fraction of post-shield damage absorbed.
    #[serde(default)]
    pub armor: f32,
    /// Shield capacity.
    #[serde(default)]
    pub shield: f32,
    /// Shield regained per second while below capacity.
    #[serde(default)]
    pub shield_regen: f32,
    /// Health regained per second.
    #[serde(default)]
    pub regen: f32,
    /// Heal emitted to nearby enemies.
    #[serde(default)]
    pub heal: Option<HealAura>,
    /// Whether the enemy is airborne.
    #[serde(default)]
    pub flying: bool,
    /// Whether the enemy is a boss.
    #[serde(default)]
    pub boss: bool,
    /// Whether slow effects are ignored.
    #[serde(default)]
    pub immune_to_slow: bool,
}

/// Number of enemies of one kind inside a wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveGroup {
    /// Kind of the enemies.
    pub kind: EnemyKind,
    /// Number of enemies.
    pub count: u32,
}

/// Composition of a single wave.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wave {
    /// Groups spawned by the wave.
    pub groups: Vec<WaveGroup>,
}

impl Wave {
    /// Builds a wave from `(kind, count)` pairs.
    #[must_use]
    pub fn from_pairs(pairs: &[(EnemyKind, u32)]) -> Self {
        Self {
            groups: pairs
                .iter()
                .map(|&(kind, count)| WaveGroup { kind, count })
                .collect(),
        }
    }

    /// Total number of enemies spawned by the wave.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.groups.iter().map(|group| group.count).sum()
    }

    /// Number of enemies of the provided kind.
    #[must_use]
    pub fn count_of(&self, kind: EnemyKind) -> u32 {
        self.groups
            .iter()
            .filter(|group| group.kind == kind)
            .map(|group| group.count)
            .sum()
    }
}

/// Multipliers associated with a difficulty.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DifficultyRow {
    /// Difficulty described by the row.
    pub difficulty: Difficulty,
    /// Multiplier on starting lives.
    pub health_multiplier: f64,
    /// Multiplier on starting money.
    pub money_multiplier: f64,
    /// Multiplier on enemy health.
    pub enemy_health_multiplier: f32,
    /// Multiplier on enemy speed.
    pub enemy_speed_multiplier: f32,
}

/// Parameters of a global ability.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AbilityStats {
    /// Ability described by the row.
    pub kind: AbilityKind,
    /// Activation price.
    pub cost: u32,
    /// Seconds between activations.
    pub cooldown: f32,
    /// Seconds the effect window stays open; zero for instant abilities.
    #[serde(default)]
    pub duration: f32,
    /// Damage, multiplier or lives restored, depending on the ability.
    #[serde(default)]
    pub magnitude: f32,
    /// Area radius in pixels for targeted abilities.
    #[serde(default)]
    pub radius: f32,
}

/// Counter an achievement compares against its threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementCondition {
    /// Total enemies killed.
    Kills,
    /// Bosses killed.
    BossKills,
    /// Towers built.
    TowersBuilt,
    /// Waves completed.
    Waves,
    /// Money earned from bounties.
    MoneyEarned,
    /// Waves completed without losing a life.
    PerfectWave,
    /// Tower upgrades purchased.
    Upgrades,
}

/// Definition of one achievement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AchievementDef {
    /// Stable identifier used by persistence.
    pub id: String,
    /// Human-readable title.
    pub name: String,
    /// Counter compared against the threshold.
    pub condition: AchievementCondition,
    /// Counter value that unlocks the achievement.
    pub threshold: u64,
}

/// Named path layout expressed as corner cells.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapLayout {
    /// Name used to select the layout.
    pub name: String,
    /// Path corners from start to end; consecutive corners share a row or column.
    pub corners: Vec<CellCoord>,
}

impl MapLayout {
    /// First cell of the path.
    #[must_use]
    pub fn start(&self) -> Option<CellCoord> {
        self.corners.first().copied()
    }

    /// Last cell of the path.
    #[must_use]
    pub fn end(&self) -> Option<CellCoord> {
        self.corners.last().copied()
    }

    /// Expands the corners into every cell covered by the path.
    pub fn path_cells(&self, columns: u32, rows: u32) -> Result<Vec<CellCoord>, TableError> {
        let malformed = |detail: String| TableError::MalformedMap {
            name: self.name.clone(),
            detail,
        };
        if self.corners.len() < 2 {
            return Err(malformed("at least two corners are required".to_owned()));
        }
        for corner in &self.corners {
            if corner.column() >= columns || corner.row() >= rows {
                return Err(malformed(format!(
                    "corner ({}, {}) lies outside the {columns}x{rows} grid",
                    corner.column(),
                    corner.row()
                )));
            }
        }

        let mut cells = vec![self.corners[0]];
        for pair in self.corners.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            if from.column() != to.column() && from.row() != to.row() {
                return Err(malformed(format!(
                    "segment ({}, {}) -> ({}, {}) is diagonal",
                    from.column(),
                    from.row(),
                    to.column(),
                    to.row()
                )));
            }
            let steps = from.manhattan_distance(to);
            for step in 1..=steps {
                let column = towards(from.column(), to.column(), step);
                let row = towards(from.row(), to.row(), step);
                let cell = CellCoord::new(column, row);
                if !cells.contains(&cell) {
                    cells.push(cell);
                }
            }
        }
        Ok(cells)
    }
}

fn towards(from: u32, to: u32, step: u32) -> u32 {
    if to >= from {
        from + step.min(to - from)
    } else {
        from - step.min(from - to)
    }
}

macro_rules! keyed_table {
    ($(#[$meta:meta])* $name:ident, $row:ty, $repr:literal, $kind:ty, $label:literal, $field:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
        #[serde(try_from = $repr, into = $repr)]
        pub struct $name(Vec<$row>);

        impl $name {
            /// Row describing the provided kind.
            #[must_use]
            pub fn get(&self, kind: $kind) -> &$row {
                &self.0[kind as usize]
            }

            /// Mutable row describing the provided kind.
            pub fn get_mut(&mut self, kind: $kind) -> &mut $row {
                &mut self.0[kind as usize]
            }

            /// Iterator over every row in kind order.
            pub fn iter(&self) -> impl Iterator<Item = &$row> {
                self.0.iter()
            }
        }

        impl TryFrom<Vec<$row>> for $name {
            type Error = TableError;

            fn try_from(mut rows: Vec<$row>) -> Result<Self, Self::Error> {
                rows.sort_by_key(|row| row.$field);
                let complete = rows.len() == <$kind>::ALL.len()
                    && rows
                        .iter()
                        .zip(<$kind>::ALL)
                        .all(|(row, kind)| row.$field == kind);
                if complete {
                    Ok(Self(rows))
                } else {
                    Err(TableError::IncompleteTable { table: $label })
                }
            }
        }

        impl From<$name> for Vec<$row> {
            fn from(table: $name) -> Self {
                table.0
            }
        }
    };
}

keyed_table!(
    /// Tower stats indexed by kind.
    TowerTable, TowerStats, "Vec<TowerStats>", TowerKind, "tower", kind
);
keyed_table!(
    /// Enemy stats indexed by kind.
    EnemyTable, EnemyStats, "Vec<EnemyStats>", EnemyKind, "enemy", kind
);
keyed_table!(
    /// Ability parameters indexed by kind.
    AbilityTable, AbilityStats, "Vec<AbilityStats>", AbilityKind, "ability", kind
);
keyed_table!(
    /// Difficulty multipliers indexed by difficulty.
    DifficultyTable, DifficultyRow, "Vec<DifficultyRow>", Difficulty, "difficulty", difficulty
);

#[cfg(test)]
mod tests {
    use super::{MapLayout, TableError, Tables};
    use lane_defence_core::{AbilityKind, CellCoord, Difficulty, EnemyKind, TowerKind};

    #[test]
    fn shipped_tables_validate() {
        let tables = Tables::default();
        tables.validate().expect("shipped tables are valid");
        assert_eq!(tables.waves.len(), 20);
        assert_eq!(tables.towers.iter().count(), TowerKind::ALL.len());
        assert_eq!(tables.enemies.iter().count(), EnemyKind::ALL.len());
    }

    #[test]
    fn keyed_tables_index_by_kind() {
        let tables = Tables::default();
        assert_eq!(tables.towers.get(TowerKind::Sniper).cost, 200);
        assert_eq!(tables.enemies.get(EnemyKind::Boss).health, 500.0);
        assert_eq!(tables.abilities.get(AbilityKind::CashBoost).magnitude, 2.0);
        assert_eq!(
            tables.difficulties.get(Difficulty::Hard).difficulty,
            Difficulty::Hard
        );
    }

    #[test]
    fn waves_beyond_the_table_reuse_the_last_entry() {
        let tables = Tables::default();
        let last = tables.waves.last().expect("waves");
        assert_eq!(tables.wave(20), Some(last));
        assert_eq!(tables.wave(57), Some(last));
        assert_eq!(tables.wave(1).map(|wave| wave.count_of(EnemyKind::Basic)), Some(10));
    }

    #[test]
    fn corners_expand_into_contiguous_cells() {
        let layout = MapLayout {
            name: "hook".to_owned(),
            corners: vec![
                CellCoord::new(0, 1),
                CellCoord::new(3, 1),
                CellCoord::new(3, 0),
            ],
        };
        let cells = layout.path_cells(5, 5).expect("valid layout");
        assert_eq!(
            cells,
            vec![
                CellCoord::new(0, 1),
                CellCoord::new(1, 1),
                CellCoord::new(2, 1),
                CellCoord::new(3, 1),
                CellCoord::new(3, 0),
            ]
        );
    }

    #[test]
    fn diagonal_segments_are_rejected() {
        let layout = MapLayout {
            name: "bent".to_owned(),
            corners: vec![CellCoord::new(0, 0), CellCoord::new(2, 2)],
        };
        assert!(matches!(
            layout.path_cells(5, 5),
            Err(TableError::MalformedMap { .. })
        ));
    }

    #[test]
    fn unknown_maps_are_reported() {
        let tables = Tables::default();
        assert!(tables.map("classic").is_ok());
        assert!(matches!(
            tables.map("volcano"),
            Err(TableError::UnknownMap(name)) if name == "volcano"
        ));
    }

    #[test]
    fn toml_round_trip_preserves_tables() {
        let tables = Tables::default();
        let document = toml::to_string(&tables).expect("serialize tables");
        let restored = Tables::from_toml_str(&document).expect("parse tables");
        assert_eq!(restored, tables);
    }

    #[test]
    fn tables_missing_a_kind_are_rejected() {
        let tables = Tables::default();
        let mut document = toml::Value::try_from(&tables).expect("value");
        let towers = document
            .get_mut("towers")
            .and_then(toml::Value::as_array_mut)
            .expect("tower array");
        let _ = towers.pop();
        let contents = toml::to_string(&document).expect("serialize");
        assert!(matches!(
            Tables::from_toml_str(&contents),
            Err(TableError::Parse(_))
        ));
    }
}
