#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Lane Defence.
//!
//! The world owns every mutable piece of a running game: the map, enemies,
//! towers, projectiles, abilities and player resources. Adapters mutate it
//! exclusively through [`apply`], which validates commands, advances the
//! simulation in a fixed order and reports the outcome as [`Event`] values.
//! Read access goes through the [`query`] module.

mod abilities;
mod enemies;
mod map;
mod navigation;
mod projectiles;
mod status;
mod towers;

use std::time::Duration;

use lane_defence_core::{
    geometry, AbilityError, AbilityKind, CellCoord, Command, Difficulty, EnemyId, EnemyKind,
    EnemyView, Event, PlacementError, SaleError, StatusEffect, StatusKind, TargetingMode,
    TowerId, TowerKind, TowerTarget, TowerView, UpgradeError, Vec2,
};
use lane_defence_system_spawning::{Config as SpawnConfig, WaveSpawner};
use lane_defence_system_tower_combat::{
    aura_multiplier, Armament, AttackOrder, Aura, DamageOrder, TowerCombat,
};
use lane_defence_system_tower_targeting::TowerTargeting;
use lane_defence_tables::{AttackBehavior, DifficultyRow, TableError, Tables};
use tracing::{debug, info};

use crate::{
    abilities::AbilityRegistry,
    enemies::{Enemy, HealPulse},
    projectiles::{Flight, Launch, Mark, ProjectileRegistry},
    towers::{TowerRegistry, TowerState},
};

pub use map::Map;

const DEFAULT_SEED: u64 = 0x4d59_5df4_d0f3_3173;
const DEFAULT_VICTORY_WAVE: u32 = 20;

/// Selects the map, difficulty and random seed of a game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Name of the map layout to load.
    pub map: String,
    /// Difficulty row applied to the player and to enemies.
    pub difficulty: Difficulty,
    /// Seed of the wave shuffle.
    pub seed: u64,
    /// Wave whose completion wins the game; `None` plays endlessly.
    pub victory_wave: Option<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            map: "classic".to_owned(),
            difficulty: Difficulty::Normal,
            seed: DEFAULT_SEED,
            victory_wave: Some(DEFAULT_VICTORY_WAVE),
        }
    }
}

/// State of the game as a whole.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Outcome {
    /// The game is still being played.
    #[default]
    Running,
    /// The player completed the final wave.
    Victory,
    /// The player ran out of lives.
    Defeat,
}

#[derive(Clone, Copy, Debug)]
struct Player {
    health: u32,
    max_health: u32,
    money: u32,
    score: u64,
}

/// Represents the authoritative Lane Defence world state.
#[derive(Debug)]
pub struct World {
    tables: Tables,
    config: Config,
    map: Map,
    difficulty: DifficultyRow,
    player: Player,
    wave: u32,
    wave_lives_lost: u32,
    outcome: Outcome,
    enemies: Vec<Enemy>,
    next_enemy_id: u32,
    towers: TowerRegistry,
    projectiles: ProjectileRegistry,
    abilities: AbilityRegistry,
    spawner: WaveSpawner,
    targeting: TowerTargeting,
    combat: TowerCombat,
    released: Vec<EnemyKind>,
    pulses: Vec<HealPulse>,
    targets: Vec<TowerTarget>,
    attacks: Vec<AttackOrder>,
    damage_orders: Vec<DamageOrder>,
}

impl World {
    /// Creates a world for the provided tables and game configuration.
    ///
    /// Fails when the tables are inconsistent, the map is unknown, or its
    /// path cannot be routed from start to end.
    pub fn new(tables: Tables, config: Config) -> Result<Self, TableError> {
        tables.validate()?;
        let map = Map::from_layout(tables.map(&config.map)?, &tables.rules)?;
        let difficulty = *tables.difficulties.get(config.difficulty);
        let spawn_interval = Duration::try_from_secs_f32(tables.rules.spawn_interval)
            .map_err(|_| TableError::InvalidRule("spawn_interval"))?;

        let max_health =
            (f64::from(tables.rules.starting_health) * difficulty.health_multiplier) as u32;
        let money = (f64::from(tables.rules.starting_money) * difficulty.money_multiplier) as u32;

        Ok(Self {
            abilities: AbilityRegistry::new(&tables.abilities),
            spawner: WaveSpawner::new(SpawnConfig::new(spawn_interval, config.seed)),
            map,
            difficulty,
            player: Player {
                health: max_health,
                max_health,
                money,
                score: 0,
            },
            wave: 0,
            wave_lives_lost: 0,
            outcome: Outcome::Running,
            enemies: Vec::new(),
            next_enemy_id: 0,
            towers: TowerRegistry::new(),
            projectiles: ProjectileRegistry::default(),
            targeting: TowerTargeting::new(),
            combat: TowerCombat::new(),
            released: Vec::new(),
            pulses: Vec::new(),
            targets: Vec::new(),
            attacks: Vec::new(),
            damage_orders: Vec::new(),
            tables,
            config,
        })
    }

    /// Builds a tower on the provided cell.
    pub fn place_tower(
        &mut self,
        kind: TowerKind,
        cell: CellCoord,
        out_events: &mut Vec<Event>,
    ) -> Result<TowerId, PlacementError> {
        if self.outcome != Outcome::Running {
            return Err(PlacementError::SessionOver);
        }
        if !self.map.contains(cell) {
            return Err(PlacementError::OutOfBounds);
        }
        if self.map.is_path(cell) {
            return Err(PlacementError::OnPath);
        }
        if self.towers.occupant(cell).is_some() {
            return Err(PlacementError::Occupied);
        }

        let stats = *self.tables.towers.get(kind);
        if self.player.money < stats.cost {
            return Err(PlacementError::InsufficientFunds {
                required: stats.cost,
                available: self.player.money,
            });
        }

        self.player.money -= stats.cost;
        let tower = self
            .towers
            .insert(&stats, cell, self.map.cell_center(cell));
        debug!(tower = tower.get(), kind = kind.name(), ?cell, cost = stats.cost, "tower placed");
        out_events.push(Event::TowerPlaced {
            tower,
            kind,
            cell,
            cost: stats.cost,
        });
        Ok(tower)
    }

    /// Advances a tower to its next level.
    ///
    /// Returns the level reached.
    pub fn upgrade_tower(
        &mut self,
        tower: TowerId,
        out_events: &mut Vec<Event>,
    ) -> Result<u8, UpgradeError> {
        if self.outcome != Outcome::Running {
            return Err(UpgradeError::SessionOver);
        }
        let Some(state) = self.towers.get_mut(tower) else {
            return Err(UpgradeError::MissingTower);
        };
        let Some(cost) = state.upgrade_cost(&self.tables.rules) else {
            return Err(UpgradeError::MaxLevel);
        };
        if self.player.money < cost {
            return Err(UpgradeError::InsufficientFunds {
                required: cost,
                available: self.player.money,
            });
        }

        self.player.money -= cost;
        state.upgrade(cost, &self.tables.rules);
        let level = state.level;
        debug!(tower = tower.get(), level, cost, "tower upgraded");
        out_events.push(Event::TowerUpgraded { tower, level, cost });
        Ok(level)
    }

    /// Removes a tower and refunds part of everything spent on it.
    ///
    /// Returns the refund.
    pub fn sell_tower(
        &mut self,
        tower: TowerId,
        out_events: &mut Vec<Event>,
    ) -> Result<u32, SaleError> {
        if self.outcome != Outcome::Running {
            return Err(SaleError::SessionOver);
        }
        let Some(state) = self.towers.remove(tower) else {
            return Err(SaleError::MissingTower);
        };

        let refund = state.sell_value(&self.tables.rules);
        self.player.money = self.player.money.saturating_add(refund);
        self.projectiles.discard_from(tower);
        debug!(tower = tower.get(), refund, "tower sold");
        out_events.push(Event::TowerSold {
            tower,
            cell: state.cell,
            refund,
        });
        Ok(refund)
    }

    /// Activates a global ability.
    pub fn use_ability(
        &mut self,
        kind: AbilityKind,
        target: Option<Vec2>,
        out_events: &mut Vec<Event>,
    ) -> Result<(), AbilityError> {
        if self.outcome != Outcome::Running {
            return Err(AbilityError::SessionOver);
        }
        let cost = self.abilities.check(kind, self.player.money, target)?;

        self.player.money -= cost;
        self.abilities.activate(kind, target);
        debug!(ability = ?kind, cost, "ability used");
        out_events.push(Event::AbilityUsed { kind, cost });

        if kind == AbilityKind::HealthRestore {
            let restore = self.abilities.stats(kind).magnitude.max(0.0) as u32;
            let amount = restore.min(self.player.max_health - self.player.health);
            self.player.health += amount;
            out_events.push(Event::PlayerHealed { amount });
        }
        Ok(())
    }

    fn set_targeting(&mut self, tower: TowerId, mode: TargetingMode, out_events: &mut Vec<Event>) {
        if let Some(state) = self.towers.get_mut(tower) {
            state.targeting = mode;
            out_events.push(Event::TargetingChanged { tower, mode });
        }
    }

    fn start_wave(&mut self, out_events: &mut Vec<Event>) {
        if self.outcome != Outcome::Running || self.spawner.is_active() {
            return;
        }

        let number = self.wave.saturating_add(1);
        let Some(wave) = self.tables.wave(number) else {
            return;
        };
        if !self.spawner.start(wave) {
            return;
        }

        self.wave = number;
        self.wave_lives_lost = 0;
        let enemies = wave.total();
        info!(wave = number, enemies, "wave started");
        out_events.push(Event::WaveStarted {
            wave: number,
            enemies,
        });
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        if self.outcome != Outcome::Running {
            return;
        }

        let seconds = dt.as_secs_f32();
        out_events.push(Event::TimeAdvanced { dt });

        self.abilities.update(seconds);
        self.spawn_released(dt, out_events);

        let mut dealt = self.update_enemies(seconds);
        self.collect_casualties(out_events);

        dealt += self.fire_towers(seconds);
        dealt += self.advance_projectiles(seconds, out_events);
        self.collect_casualties(out_events);

        dealt += self.resolve_ability_effects(out_events);
        self.collect_casualties(out_events);

        if dealt > 0.0 {
            out_events.push(Event::DamageDealt { amount: dealt });
        }

        self.settle_wave(out_events);
    }

    fn spawn_released(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        self.released.clear();
        self.spawner
            .handle(&[Event::TimeAdvanced { dt }], &mut self.released);

        let start = self.map.waypoints().first().copied().unwrap_or(Vec2::ZERO);
        for kind in self.released.drain(..) {
            let id = EnemyId::new(self.next_enemy_id);
            self.next_enemy_id = self.next_enemy_id.saturating_add(1);
            self.enemies.push(Enemy::spawn(
                id,
                self.tables.enemies.get(kind),
                self.wave,
                &self.tables.rules,
                &self.difficulty,
                start,
            ));
            out_events.push(Event::EnemySpawned { enemy: id, kind });
        }
    }

    fn update_enemies(&mut self, dt: f32) -> f32 {
        self.pulses.clear();
        self.pulses
            .extend(self.enemies.iter_mut().filter_map(|enemy| enemy.heal_pulse(dt)));
        for pulse in &self.pulses {
            for enemy in &mut self.enemies {
                if enemy.id != pulse.source
                    && geometry::distance(enemy.position(), pulse.position) <= pulse.range
                {
                    enemy.heal(pulse.amount);
                }
            }
        }

        let waypoints = self.map.waypoints();
        self.enemies
            .iter_mut()
            .map(|enemy| enemy.update(dt, waypoints))
            .sum()
    }

    fn collect_casualties(&mut self, out_events: &mut Vec<Event>) {
        let cash_multiplier = f64::from(self.abilities.multiplier(AbilityKind::CashBoost));
        let leak_damage = self.tables.rules.leak_damage;

        for enemy in &self.enemies {
            if !enemy.is_alive() {
                let paid = (f64::from(enemy.reward) * cash_multiplier) as u32;
                self.player.money = self.player.money.saturating_add(paid);
                self.player.score = self.player.score.saturating_add(u64::from(enemy.reward));
                out_events.push(Event::EnemyKilled {
                    enemy: enemy.id,
                    kind: enemy.kind,
                    boss: enemy.boss,
                    reward: paid,
                    score: enemy.reward,
                });
            } else if enemy.reached_end() {
                self.player.health = self.player.health.saturating_sub(leak_damage);
                self.wave_lives_lost = self.wave_lives_lost.saturating_add(leak_damage);
                out_events.push(Event::EnemyLeaked {
                    enemy: enemy.id,
                    kind: enemy.kind,
                    lives: leak_damage,
                });
            }
        }

        self.enemies.retain(Enemy::is_targetable);
    }

    fn fire_towers(&mut self, dt: f32) -> f32 {
        for tower in self.towers.iter_mut() {
            if tower.cooldown > 0.0 {
                tower.cooldown -= dt;
            }
        }

        let auras: Vec<Aura> = self
            .towers
            .iter()
            .filter_map(|tower| match tower.behavior {
                AttackBehavior::Support {
                    buff_range,
                    damage_buff,
                } => Some(Aura {
                    position: tower.position,
                    range: buff_range,
                    multiplier: damage_buff,
                }),
                _ => None,
            })
            .collect();

        let enemies = self.enemy_view();
        let towers = TowerView::from_snapshots(self.towers.iter().map(TowerState::snapshot).collect());
        self.targeting.handle(&towers, &enemies, &mut self.targets);

        let boost = self.abilities.multiplier(AbilityKind::DamageBoost);
        let arsenal: Vec<Armament> = self
            .towers
            .iter()
            .map(|tower| Armament {
                tower: tower.id,
                kind: tower.kind,
                damage: tower.damage() as f32 * aura_multiplier(tower.position, &auras) * boost,
                projectile_speed: tower.projectile_speed,
                hits_flying: tower.hits_flying,
                behavior: tower.behavior,
            })
            .collect();

        self.attacks.clear();
        self.combat.handle(&self.targets, &arsenal, &mut self.attacks);

        let mut dealt = 0.0;
        for order in self.attacks.drain(..) {
            match order {
                AttackOrder::Launch {
                    tower,
                    kind,
                    target,
                    origin,
                    speed,
                    payload,
                } => {
                    let _ = self.projectiles.launch(Launch {
                        tower,
                        source: kind,
                        target,
                        origin,
                        speed,
                        payload,
                    });
                    if let Some(state) = self.towers.get_mut(tower) {
                        state.cooldown = 1.0 / state.fire_rate();
                    }
                }
                AttackOrder::Beam {
                    target,
                    damage_per_second,
                    ..
                } => {
                    if let Some(enemy) = find_enemy_mut(&mut self.enemies, target) {
                        dealt += enemy.take_damage(damage_per_second * dt);
                    }
                }
            }
        }
        dealt
    }

    fn advance_projectiles(&mut self, dt: f32, out_events: &mut Vec<Event>) -> f32 {
        let max_travel = self.tables.rules.projectile_max_travel;
        let chain_distance = self.tables.rules.chain_distance;
        let mut in_flight = self.projectiles.take();
        let mut survivors = Vec::with_capacity(in_flight.len());
        let mut dealt = 0.0;

        for mut projectile in in_flight.drain(..) {
            let mark = find_enemy(&self.enemies, projectile.target)
                .filter(|enemy| enemy.is_targetable())
                .map(|enemy| Mark {
                    position: enemy.position(),
                    radius: enemy.radius(),
                });

            match projectile.advance(dt, mark, max_travel) {
                Flight::Travelling => survivors.push(projectile),
                Flight::Fizzled => {}
                Flight::Arrived(impact) => {
                    let enemies = self.enemy_view();
                    self.damage_orders.clear();
                    self.combat.resolve_impact(
                        &projectile.payload,
                        impact,
                        projectile.target,
                        &enemies,
                        chain_distance,
                        &mut self.damage_orders,
                        out_events,
                    );
                    for order in self.damage_orders.drain(..) {
                        if let Some(enemy) = find_enemy_mut(&mut self.enemies, order.enemy) {
                            dealt += enemy.take_damage(order.amount);
                            if let Some(status) = order.status {
                                enemy.apply_status(status);
                            }
                        }
                    }
                }
            }
        }

        self.projectiles.restore(survivors);
        dealt
    }

    fn resolve_ability_effects(&mut self, out_events: &mut Vec<Event>) -> f32 {
        let pending = self.abilities.take_pending();
        let mut dealt = 0.0;

        if let Some(centre) = pending.airstrike {
            let stats = *self.abilities.stats(AbilityKind::Airstrike);
            for enemy in &mut self.enemies {
                if enemy.is_targetable()
                    && geometry::distance(enemy.position(), centre) <= stats.radius
                {
                    dealt += enemy.take_damage(stats.magnitude);
                }
            }
            out_events.push(Event::Detonation {
                position: centre,
                radius: stats.radius,
            });
        }

        if pending.freeze {
            let duration = self.abilities.stats(AbilityKind::FreezeAll).duration;
            let freeze = StatusEffect::new(StatusKind::Freeze, duration, 0.0);
            let mut count = 0;
            for enemy in self.enemies.iter_mut().filter(|enemy| enemy.is_targetable()) {
                enemy.apply_status(freeze);
                count += 1;
            }
            out_events.push(Event::EnemiesFrozen { count });
        }

        dealt
    }

    fn settle_wave(&mut self, out_events: &mut Vec<Event>) {
        if self.spawner.settle(self.enemies.len()) {
            info!(
                wave = self.wave,
                lives_lost = self.wave_lives_lost,
                "wave completed"
            );
            out_events.push(Event::WaveCompleted {
                wave: self.wave,
                lives_lost: self.wave_lives_lost,
            });
            if self
                .config
                .victory_wave
                .is_some_and(|victory| self.wave >= victory)
            {
                self.outcome = Outcome::Victory;
            }
        }

        if self.player.health == 0 {
            self.outcome = Outcome::Defeat;
        }

        if self.outcome != Outcome::Running {
            let victory = self.outcome == Outcome::Victory;
            info!(
                victory,
                wave = self.wave,
                score = self.player.score,
                "game over"
            );
            out_events.push(Event::GameOver {
                victory,
                wave: self.wave,
                score: self.player.score,
            });
        }
    }

    fn enemy_view(&self) -> EnemyView {
        EnemyView::from_snapshots(self.enemies.iter().map(Enemy::snapshot).collect())
    }

    fn body_radius(&self) -> f32 {
        (self.map.cell_size() / 3.0).floor()
    }
}

/// Enemies are stored in spawn order, which is also identifier order.
fn find_enemy(enemies: &[Enemy], id: EnemyId) -> Option<&Enemy> {
    enemies
        .binary_search_by_key(&id, |enemy| enemy.id)
        .ok()
        .map(|index| &enemies[index])
}

fn find_enemy_mut(enemies: &mut [Enemy], id: EnemyId) -> Option<&mut Enemy> {
    enemies
        .binary_search_by_key(&id, |enemy| enemy.id)
        .ok()
        .map(|index| &mut enemies[index])
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => world.tick(dt, out_events),
        Command::StartWave => world.start_wave(out_events),
        Command::PlaceTower { kind, cell } => {
            if let Err(reason) = world.place_tower(kind, cell, out_events) {
                out_events.push(Event::TowerPlacementRejected { kind, cell, reason });
            }
        }
        Command::UpgradeTower { tower } => {
            if let Err(reason) = world.upgrade_tower(tower, out_events) {
                out_events.push(Event::TowerUpgradeRejected { tower, reason });
            }
        }
        Command::SellTower { tower } => {
            if let Err(reason) = world.sell_tower(tower, out_events) {
                out_events.push(Event::TowerSaleRejected { tower, reason });
            }
        }
        Command::SetTargeting { tower, mode } => world.set_targeting(tower, mode, out_events),
        Command::UseAbility { kind, target } => {
            if let Err(reason) = world.use_ability(kind, target, out_events) {
                out_events.push(Event::AbilityRejected { kind, reason });
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{Config, Map, Outcome, World};
    use lane_defence_core::{
        AbilitySnapshot, CellCoord, EnemySnapshot, EnemyView, PlayerSnapshot, ProjectileSnapshot,
        TowerId, TowerSnapshot, TowerView, Vec2,
    };
    use lane_defence_tables::Tables;

    /// Player resources and the current wave number.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        PlayerSnapshot {
            health: world.player.health,
            max_health: world.player.max_health,
            money: world.player.money,
            score: world.player.score,
            wave: world.wave,
        }
    }

    /// Number of the most recently started wave; zero before the first.
    #[must_use]
    pub fn wave(world: &World) -> u32 {
        world.wave
    }

    /// Reports whether a wave is still spawning or has enemies on the field.
    #[must_use]
    pub fn wave_active(world: &World) -> bool {
        world.spawner.is_active()
    }

    /// Number of enemies of the active wave that have not spawned yet.
    #[must_use]
    pub fn pending_spawns(world: &World) -> usize {
        world.spawner.pending()
    }

    /// Whether the game is still running, won or lost.
    #[must_use]
    pub fn outcome(world: &World) -> Outcome {
        world.outcome
    }

    /// Captures a read-only view of the enemies on the field.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        world.enemy_view()
    }

    /// Captures a read-only view of the placed towers.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(world.towers.iter().map(|tower| tower.snapshot()).collect())
    }

    /// Identifies the tower whose body contains the provided pixel position.
    #[must_use]
    pub fn tower_at(world: &World, point: Vec2) -> Option<TowerId> {
        world.towers.at(point, world.body_radius())
    }

    /// Presentation data for every projectile in flight, in launch order.
    #[must_use]
    pub fn projectiles(world: &World) -> Vec<ProjectileSnapshot> {
        world
            .projectiles
            .iter()
            .map(|projectile| projectile.snapshot())
            .collect()
    }

    /// Cooldown and activity of every ability, in registry order.
    #[must_use]
    pub fn abilities(world: &World) -> Vec<AbilitySnapshot> {
        world.abilities.snapshots()
    }

    /// Provides read-only access to the loaded map.
    #[must_use]
    pub fn map(world: &World) -> &Map {
        &world.map
    }

    /// Reports whether a tower could be placed on the cell, ignoring money.
    #[must_use]
    pub fn is_buildable(world: &World, cell: CellCoord) -> bool {
        world.map.is_buildable(cell) && world.towers.occupant(cell).is_none()
    }

    /// Price of the tower's next level, or `None` when it is missing or maxed.
    #[must_use]
    pub fn upgrade_cost(world: &World, tower: TowerId) -> Option<u32> {
        world
            .towers
            .get(tower)
            .and_then(|state| state.upgrade_cost(&world.tables.rules))
    }

    /// Money the tower would return if sold now.
    #[must_use]
    pub fn sell_value(world: &World, tower: TowerId) -> Option<u32> {
        world
            .towers
            .get(tower)
            .map(|state| state.sell_value(&world.tables.rules))
    }

    /// Tables the world was created with.
    #[must_use]
    pub fn tables(world: &World) -> &Tables {
        &world.tables
    }

    /// Configuration the world was created with.
    #[must_use]
    pub fn config(world: &World) -> &Config {
        &world.config
    }

    /// Everything presentation code needs to draw one frame.
    #[derive(Clone, Debug)]
    pub struct FrameSnapshot {
        /// Player resources.
        pub player: PlayerSnapshot,
        /// Whether a wave is in progress.
        pub wave_active: bool,
        /// Game outcome so far.
        pub outcome: Outcome,
        /// Enemies on the field, by identifier.
        pub enemies: Vec<EnemySnapshot>,
        /// Placed towers, by identifier.
        pub towers: Vec<TowerSnapshot>,
        /// Projectiles in flight.
        pub projectiles: Vec<ProjectileSnapshot>,
        /// Ability slots.
        pub abilities: Vec<AbilitySnapshot>,
    }

    /// Captures a complete frame snapshot.
    #[must_use]
    pub fn frame(world: &World) -> FrameSnapshot {
        FrameSnapshot {
            player: player(world),
            wave_active: wave_active(world),
            outcome: outcome(world),
            enemies: enemy_view(world).into_vec(),
            towers: tower_view(world).into_vec(),
            projectiles: projectiles(world),
            abilities: abilities(world),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> World {
        World::new(Tables::default(), Config::default()).expect("default world")
    }

    fn tick(world: &mut World, events: &mut Vec<Event>) {
        apply(
            world,
            Command::Tick {
                dt: Duration::from_secs_f32(1.0 / 60.0),
            },
            events,
        );
    }

    #[test]
    fn new_world_scales_player_resources_by_difficulty() {
        let easy = World::new(
            Tables::default(),
            Config {
                difficulty: Difficulty::Easy,
                ..Config::default()
            },
        )
        .expect("easy world");
        let player = query::player(&easy);
        assert_eq!(player.health, 30);
        assert_eq!(player.max_health, 30);
        assert_eq!(player.money, 975);
        assert_eq!(player.wave, 0);
    }

    #[test]
    fn unknown_maps_are_rejected() {
        let result = World::new(
            Tables::default(),
            Config {
                map: "labyrinth".to_owned(),
                ..Config::default()
            },
        );
        assert!(matches!(result, Err(TableError::UnknownMap(name)) if name == "labyrinth"));
    }

    #[test]
    fn placement_validation_order_is_fixed() {
        let mut world = world();
        let mut events = Vec::new();

        assert_eq!(
            world.place_tower(TowerKind::Basic, CellCoord::new(40, 40), &mut events),
            Err(PlacementError::OutOfBounds)
        );
        assert_eq!(
            world.place_tower(TowerKind::Basic, CellCoord::new(0, 7), &mut events),
            Err(PlacementError::OnPath)
        );
        let tower = world
            .place_tower(TowerKind::Basic, CellCoord::new(0, 0), &mut events)
            .expect("placed");
        assert_eq!(
            world.place_tower(TowerKind::Basic, CellCoord::new(0, 0), &mut events),
            Err(PlacementError::Occupied)
        );
        assert_eq!(
            world.place_tower(TowerKind::Artillery, CellCoord::new(1, 0), &mut events),
            Ok(TowerId::new(1))
        );
        assert_eq!(
            world.place_tower(TowerKind::Sniper, CellCoord::new(2, 0), &mut events),
            Err(PlacementError::InsufficientFunds {
                required: 200,
                available: 150,
            })
        );
        assert_eq!(tower, TowerId::new(0));
        assert!(!query::is_buildable(&world, CellCoord::new(0, 0)));
    }

    #[test]
    fn selecting_a_tower_uses_its_body_radius() {
        let mut world = world();
        let mut events = Vec::new();
        let tower = world
            .place_tower(TowerKind::Basic, CellCoord::new(2, 2), &mut events)
            .expect("placed");

        assert_eq!(query::tower_at(&world, Vec2::new(100.0, 100.0)), Some(tower));
        assert_eq!(query::tower_at(&world, Vec2::new(113.0, 100.0)), Some(tower));
        assert_eq!(query::tower_at(&world, Vec2::new(114.0, 100.0)), None);
    }

    #[test]
    fn start_wave_is_ignored_while_a_wave_is_active() {
        let mut world = world();
        let mut events = Vec::new();

        apply(&mut world, Command::StartWave, &mut events);
        apply(&mut world, Command::StartWave, &mut events);

        assert_eq!(
            events,
            vec![Event::WaveStarted {
                wave: 1,
                enemies: 10,
            }]
        );
        assert!(query::wave_active(&world));
    }

    #[test]
    fn first_tick_of_a_wave_spawns_an_enemy() {
        let mut world = world();
        let mut events = Vec::new();
        apply(&mut world, Command::StartWave, &mut events);
        events.clear();

        tick(&mut world, &mut events);

        assert!(events
            .iter()
            .any(|event| matches!(event, Event::EnemySpawned { kind: EnemyKind::Basic, .. })));
        assert_eq!(query::enemy_view(&world).len(), 1);
        assert_eq!(query::pending_spawns(&world), 9);
    }

    #[test]
    fn targeting_changes_require_an_existing_tower() {
        let mut world = world();
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::SetTargeting {
                tower: TowerId::new(3),
                mode: TargetingMode::Strongest,
            },
            &mut events,
        );
        assert!(events.is_empty());

        let tower = world
            .place_tower(TowerKind::Basic, CellCoord::new(0, 0), &mut events)
            .expect("placed");
        events.clear();
        apply(
            &mut world,
            Command::SetTargeting {
                tower,
                mode: TargetingMode::Strongest,
            },
            &mut events,
        );
        assert_eq!(
            events,
            vec![Event::TargetingChanged {
                tower,
                mode: TargetingMode::Strongest,
            }]
        );
        assert_eq!(
            query::tower_view(&world).iter().next().map(|tower| tower.targeting),
            Some(TargetingMode::Strongest)
        );
    }

    #[test]
    fn health_restore_is_clamped_to_the_maximum() {
        let mut world = world();
        let mut events = Vec::new();
        world.player.health = 18;

        world
            .use_ability(AbilityKind::HealthRestore, None, &mut events)
            .expect("affordable");

        assert_eq!(query::player(&world).health, 20);
        assert_eq!(query::player(&world).money, 400);
        assert!(events.contains(&Event::PlayerHealed { amount: 2 }));
    }
}
