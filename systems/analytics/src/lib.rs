#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Lifetime statistics and achievement tracking driven by world events.

mod store;

use std::collections::BTreeSet;

use lane_defence_core::Event;
use lane_defence_tables::{AchievementCondition, AchievementDef};
use serde::{Deserialize, Serialize};
use tracing::info;

pub use store::{load, save, try_load, try_save, SaveData, StoreError};

/// Counters accumulated across every game played.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Statistics {
    /// Enemies killed.
    pub total_kills: u64,
    /// Bosses killed.
    pub boss_kills: u64,
    /// Towers placed.
    pub towers_built: u64,
    /// Towers sold.
    pub towers_sold: u64,
    /// Tower upgrades purchased.
    pub upgrades: u64,
    /// Waves cleared.
    pub waves_completed: u64,
    /// Money received from bounties and sales.
    pub money_earned: u64,
    /// Money paid for towers, upgrades and abilities.
    pub money_spent: u64,
    /// Damage applied to enemies.
    pub damage_dealt: f64,
    /// Lives lost to leaking enemies.
    pub lives_lost: u64,
    /// Waves cleared without losing a life.
    pub perfect_waves: u64,
    /// Games that reached a game over.
    pub games_played: u64,
    /// Highest wave number ever started or cleared.
    pub highest_wave: u32,
    /// Best final score.
    pub highest_score: u64,
    /// Simulated seconds played.
    pub total_playtime: f64,
}

impl Statistics {
    /// Current value of the counter an achievement condition watches.
    #[must_use]
    pub fn counter(&self, condition: AchievementCondition) -> u64 {
        match condition {
            AchievementCondition::Kills => self.total_kills,
            AchievementCondition::BossKills => self.boss_kills,
            AchievementCondition::TowersBuilt => self.towers_built,
            AchievementCondition::Waves => self.waves_completed,
            AchievementCondition::MoneyEarned => self.money_earned,
            AchievementCondition::PerfectWave => self.perfect_waves,
            AchievementCondition::Upgrades => self.upgrades,
        }
    }
}

/// Counters for the game currently being played.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GameTally {
    /// Enemies killed this game.
    pub kills: u64,
    /// Bounty money earned this game.
    pub money_earned: u64,
    /// Damage applied this game.
    pub damage_dealt: f64,
}

/// Pure system folding world events into statistics and achievement unlocks.
#[derive(Clone, Debug)]
pub struct Analytics {
    definitions: Vec<AchievementDef>,
    statistics: Statistics,
    unlocked: BTreeSet<String>,
    game: GameTally,
}

impl Analytics {
    /// Creates an analytics system with zeroed counters.
    #[must_use]
    pub fn new(definitions: Vec<AchievementDef>) -> Self {
        Self::restore(definitions, SaveData::default())
    }

    /// Creates an analytics system that continues from previously saved data.
    #[must_use]
    pub fn restore(definitions: Vec<AchievementDef>, saved: SaveData) -> Self {
        Self {
            definitions,
            statistics: saved.statistics,
            unlocked: saved.achievements,
            game: GameTally::default(),
        }
    }

    /// Lifetime counters.
    #[must_use]
    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    /// Counters of the current game.
    #[must_use]
    pub fn game(&self) -> &GameTally {
        &self.game
    }

    /// Achievement definitions being tracked.
    #[must_use]
    pub fn definitions(&self) -> &[AchievementDef] {
        &self.definitions
    }

    /// Reports whether the achievement with `id` has been unlocked.
    #[must_use]
    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked.contains(id)
    }

    /// Number of unlocked achievements.
    #[must_use]
    pub fn unlocked_count(&self) -> usize {
        self.unlocked.len()
    }

    /// Progress towards an achievement in `[0, 1]`.
    ///
    /// Unlocked achievements report `1.0`, unknown ones `0.0`.
    #[must_use]
    pub fn progress(&self, id: &str) -> f32 {
        if self.is_unlocked(id) {
            return 1.0;
        }
        let Some(definition) = self.definitions.iter().find(|def| def.id == id) else {
            return 0.0;
        };
        if definition.threshold == 0 {
            return 1.0;
        }
        let current = self.statistics.counter(definition.condition) as f64;
        (current / definition.threshold as f64).min(1.0) as f32
    }

    /// Clears the per-game tally at the start of a new game.
    pub fn start_game(&mut self) {
        self.game = GameTally::default();
    }

    /// Captures the persistent portion of the analytics state.
    #[must_use]
    pub fn save_data(&self) -> SaveData {
        SaveData {
            statistics: self.statistics.clone(),
            achievements: self.unlocked.clone(),
        }
    }

    /// Folds world events into the counters and emits newly unlocked achievements.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Event>) {
        if events.is_empty() {
            return;
        }

        for event in events {
            self.record(event);
        }
        self.unlock_reached(out);
    }

    fn record(&mut self, event: &Event) {
        let stats = &mut self.statistics;
        match event {
            Event::TimeAdvanced { dt } => stats.total_playtime += dt.as_secs_f64(),
            Event::EnemyKilled { boss, reward, .. } => {
                stats.total_kills += 1;
                if *boss {
                    stats.boss_kills += 1;
                }
                stats.money_earned += u64::from(*reward);
                self.game.kills += 1;
                self.game.money_earned += u64::from(*reward);
            }
            Event::EnemyLeaked { lives, .. } => stats.lives_lost += u64::from(*lives),
            Event::DamageDealt { amount } => {
                stats.damage_dealt += f64::from(*amount);
                self.game.damage_dealt += f64::from(*amount);
            }
            Event::WaveStarted { wave, .. } => {
                stats.highest_wave = stats.highest_wave.max(*wave);
            }
            Event::WaveCompleted { wave, lives_lost } => {
                stats.waves_completed += 1;
                if *lives_lost == 0 {
                    stats.perfect_waves += 1;
                }
                stats.highest_wave = stats.highest_wave.max(*wave);
            }
            Event::TowerPlaced { cost, .. } => {
                stats.towers_built += 1;
                stats.money_spent += u64::from(*cost);
            }
            Event::TowerUpgraded { cost, .. } => {
                stats.upgrades += 1;
                stats.money_spent += u64::from(*cost);
            }
            Event::TowerSold { refund, .. } => {
                stats.towers_sold += 1;
                stats.money_earned += u64::from(*refund);
            }
            Event::AbilityUsed { cost, .. } => stats.money_spent += u64::from(*cost),
            Event::GameOver { score, .. } => {
                stats.games_played += 1;
                stats.highest_score = stats.highest_score.max(*score);
            }
            _ => {}
        }
    }

    fn unlock_reached(&mut self, out: &mut Vec<Event>) {
        for definition in &self.definitions {
            if self.unlocked.contains(&definition.id) {
                continue;
            }
            if self.statistics.counter(definition.condition) < definition.threshold {
                continue;
            }

            let _ = self.unlocked.insert(definition.id.clone());
            info!(achievement = %definition.id, name = %definition.name, "achievement unlocked");
            out.push(Event::AchievementUnlocked {
                achievement: definition.id.clone(),
            });
        }
    }
}
