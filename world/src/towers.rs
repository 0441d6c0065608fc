//! Authoritative tower state management utilities.

use std::collections::BTreeMap;

use lane_defence_core::{
    geometry, CellCoord, TargetingMode, TowerId, TowerKind, TowerSnapshot, Vec2, MAX_TOWER_LEVEL,
};
use lane_defence_tables::{AttackBehavior, Rules, TowerStats};

/// Snapshot of a tower stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct TowerState {
    /// Identifier allocated by the world for the tower.
    pub(crate) id: TowerId,
    /// Kind of tower that was constructed.
    pub(crate) kind: TowerKind,
    /// Cell occupied by the tower.
    pub(crate) cell: CellCoord,
    /// Pixel-space centre of the cell.
    pub(crate) position: Vec2,
    pub(crate) level: u8,
    pub(crate) targeting: TargetingMode,
    /// Seconds until the tower may fire again.
    pub(crate) cooldown: f32,
    pub(crate) behavior: AttackBehavior,
    pub(crate) projectile_speed: f32,
    pub(crate) hits_flying: bool,
    base_cost: u32,
    damage: u32,
    range: u32,
    fire_rate: f32,
    total_invested: u32,
}

impl TowerState {
    fn new(id: TowerId, stats: &TowerStats, cell: CellCoord, position: Vec2) -> Self {
        Self {
            id,
            kind: stats.kind,
            cell,
            position,
            level: 1,
            targeting: TargetingMode::default(),
            cooldown: 0.0,
            behavior: stats.behavior,
            projectile_speed: stats.projectile_speed,
            hits_flying: stats.hits_flying,
            base_cost: stats.cost,
            damage: stats.damage,
            range: stats.range,
            fire_rate: stats.fire_rate,
            total_invested: stats.cost,
        }
    }

    pub(crate) fn damage(&self) -> u32 {
        self.damage
    }

    pub(crate) fn fire_rate(&self) -> f32 {
        self.fire_rate
    }

    /// Price of the next level, or `None` once the tower is maxed out.
    pub(crate) fn upgrade_cost(&self, rules: &Rules) -> Option<u32> {
        if self.level >= MAX_TOWER_LEVEL {
            return None;
        }
        let growth = rules.upgrade_cost_growth.powi(i32::from(self.level));
        Some((f64::from(self.base_cost) * growth) as u32)
    }

    /// Compounds the upgrade curve onto the current stats.
    pub(crate) fn upgrade(&mut self, cost: u32, rules: &Rules) {
        self.level = self.level.saturating_add(1);
        self.damage = (f64::from(self.damage) * rules.upgrade_damage_growth) as u32;
        self.range = (f64::from(self.range) * rules.upgrade_range_growth) as u32;
        self.fire_rate *= rules.upgrade_fire_rate_growth;
        self.total_invested = self.total_invested.saturating_add(cost);
    }

    pub(crate) fn sell_value(&self, rules: &Rules) -> u32 {
        (f64::from(self.total_invested) * rules.sell_fraction) as u32
    }

    /// Beams re-acquire every tick; other towers wait out their cooldown.
    pub(crate) fn is_ready(&self) -> bool {
        self.fire_rate > 0.0
            && (matches!(self.behavior, AttackBehavior::Beam) || self.cooldown <= 0.0)
    }

    pub(crate) fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            kind: self.kind,
            cell: self.cell,
            position: self.position,
            level: self.level,
            range: self.range as f32,
            damage: self.damage,
            fire_rate: self.fire_rate,
            targeting: self.targeting,
            hits_flying: self.hits_flying,
            ready: self.is_ready(),
        }
    }
}

/// Registry that stores towers and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, TowerState>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    pub(crate) fn insert(&mut self, stats: &TowerStats, cell: CellCoord, position: Vec2) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().saturating_add(1));
        let _ = self
            .entries
            .insert(id, TowerState::new(id, stats, cell, position));
        id
    }

    pub(crate) fn get(&self, id: TowerId) -> Option<&TowerState> {
        self.entries.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: TowerId) -> Option<&mut TowerState> {
        self.entries.get_mut(&id)
    }

    pub(crate) fn remove(&mut self, id: TowerId) -> Option<TowerState> {
        self.entries.remove(&id)
    }

    pub(crate) fn occupant(&self, cell: CellCoord) -> Option<TowerId> {
        self.entries
            .values()
            .find(|tower| tower.cell == cell)
            .map(|tower| tower.id)
    }

    /// Tower whose body contains the provided point, lowest identifier first.
    pub(crate) fn at(&self, point: Vec2, body_radius: f32) -> Option<TowerId> {
        self.entries
            .values()
            .find(|tower| geometry::distance(point, tower.position) <= body_radius)
            .map(|tower| tower.id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &TowerState> {
        self.entries.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut TowerState> {
        self.entries.values_mut()
    }
}
