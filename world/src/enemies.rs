//! Enemy entities: wave scaling, damage resolution, regeneration and movement.

use lane_defence_core::{
    geometry, EnemyId, EnemyKind, EnemySnapshot, StatusEffect, StatusKind, Vec2,
    REFERENCE_FRAME_RATE,
};
use lane_defence_tables::{DifficultyRow, EnemyStats, HealAura, Rules};

use crate::status::StatusEffects;

/// Heal released by a healer enemy during a tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct HealPulse {
    pub(crate) source: EnemyId,
    pub(crate) position: Vec2,
    pub(crate) range: f32,
    pub(crate) amount: f32,
}

#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    pub(crate) id: EnemyId,
    pub(crate) kind: EnemyKind,
    pub(crate) reward: u32,
    pub(crate) boss: bool,
    max_health: f32,
    health: f32,
    max_shield: f32,
    shield: f32,
    shield_regen: f32,
    armor: f32,
    regen: f32,
    speed: f32,
    radius: f32,
    flying: bool,
    immune_to_slow: bool,
    heal: Option<HealAura>,
    heal_timer: f32,
    position: Vec2,
    waypoint: usize,
    travelled: f32,
    statuses: StatusEffects,
    alive: bool,
    reached_end: bool,
}

impl Enemy {
    /// Creates an enemy at the first waypoint, scaled for the wave and difficulty.
    pub(crate) fn spawn(
        id: EnemyId,
        stats: &EnemyStats,
        wave: u32,
        rules: &Rules,
        difficulty: &DifficultyRow,
        start: Vec2,
    ) -> Self {
        let waves_survived = f64::from(wave.saturating_sub(1));
        let scaled_health = (f64::from(stats.health)
            * (1.0 + waves_survived * rules.health_growth_per_wave))
            .trunc() as f32;
        let max_health = scaled_health * difficulty.enemy_health_multiplier;
        let reward =
            (f64::from(stats.reward) * (1.0 + waves_survived * rules.reward_growth_per_wave)) as u32;

        Self {
            id,
            kind: stats.kind,
            reward,
            boss: stats.boss,
            max_health,
            health: max_health,
            max_shield: stats.shield,
            shield: stats.shield,
            shield_regen: stats.shield_regen,
            armor: stats.armor.clamp(0.0, 1.0),
            regen: stats.regen,
            speed: stats.speed * difficulty.enemy_speed_multiplier,
            radius: stats.size,
            flying: stats.flying,
            immune_to_slow: stats.immune_to_slow,
            heal: stats.heal,
            heal_timer: 0.0,
            position: start,
            waypoint: 0,
            travelled: 0.0,
            statuses: StatusEffects::default(),
            alive: true,
            reached_end: false,
        }
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.alive
    }

    pub(crate) fn reached_end(&self) -> bool {
        self.reached_end
    }

    pub(crate) fn is_targetable(&self) -> bool {
        self.alive && !self.reached_end
    }

    pub(crate) fn position(&self) -> Vec2 {
        self.position
    }

    pub(crate) fn radius(&self) -> f32 {
        self.radius
    }

    /// Resolves a hit through shield, then armor, then health.
    ///
    /// Returns the amount of shield and health actually removed. Hitting a
    /// dead enemy does nothing.
    pub(crate) fn take_damage(&mut self, amount: f32) -> f32 {
        if !self.alive || amount <= 0.0 {
            return 0.0;
        }

        let absorbed = self.shield.min(amount);
        self.shield -= absorbed;
        let remainder = (amount - absorbed) * (1.0 - self.armor);
        absorbed + self.lose_health(remainder)
    }

    /// Drains health directly, ignoring shield and armor.
    pub(crate) fn take_true_damage(&mut self, amount: f32) -> f32 {
        if !self.alive || amount <= 0.0 {
            return 0.0;
        }
        self.lose_health(amount)
    }

    fn lose_health(&mut self, amount: f32) -> f32 {
        let removed = amount.min(self.health).max(0.0);
        self.health -= amount;
        if self.health <= 0.0 {
            self.health = 0.0;
            self.alive = false;
            self.statuses.clear();
        }
        removed
    }

    /// Attaches a status effect, replacing any effect of the same kind.
    pub(crate) fn apply_status(&mut self, effect: StatusEffect) {
        if !self.alive || (effect.kind == StatusKind::Slow && self.immune_to_slow) {
            return;
        }
        self.statuses.apply(effect);
    }

    pub(crate) fn heal(&mut self, amount: f32) {
        if self.alive {
            self.health = (self.health + amount).min(self.max_health);
        }
    }

    /// Advances the healer cooldown and reports a pulse when it fires.
    pub(crate) fn heal_pulse(&mut self, dt: f32) -> Option<HealPulse> {
        let aura = self.heal?;
        if !self.is_targetable() {
            return None;
        }

        self.heal_timer += dt;
        if self.heal_timer < aura.interval {
            return None;
        }
        self.heal_timer = 0.0;
        Some(HealPulse {
            source: self.id,
            position: self.position,
            range: aura.range,
            amount: aura.amount,
        })
    }

    /// Runs regeneration, status effects and movement for one tick.
    ///
    /// Returns the damage dealt by damage-over-time effects.
    pub(crate) fn update(&mut self, dt: f32, waypoints: &[Vec2]) -> f32 {
        if !self.is_targetable() {
            return 0.0;
        }

        if self.regen > 0.0 {
            self.health = (self.health + self.regen * dt).min(self.max_health);
        }
        if self.shield < self.max_shield {
            self.shield = (self.shield + self.shield_regen * dt).min(self.max_shield);
        }

        let tick = self.statuses.tick(dt);
        let dealt = self.take_true_damage(tick.damage);
        if !self.alive || tick.frozen {
            return dealt;
        }

        let step = self.speed * tick.speed_multiplier * dt * REFERENCE_FRAME_RATE;
        self.advance(step, waypoints);
        dealt
    }

    fn advance(&mut self, step: f32, waypoints: &[Vec2]) {
        let Some(target) = waypoints.get(self.waypoint).copied() else {
            self.reached_end = true;
            return;
        };

        let remaining = geometry::distance(self.position, target);
        if remaining < step {
            self.position = target;
            self.travelled += remaining;
            self.waypoint += 1;
            if self.waypoint >= waypoints.len() {
                self.reached_end = true;
            }
        } else {
            self.position += geometry::direction(self.position, target) * step;
            self.travelled += step;
        }
    }

    pub(crate) fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            radius: self.radius,
            health: self.health,
            max_health: self.max_health,
            shield: self.shield,
            max_shield: self.max_shield,
            progress: self.travelled,
            statuses: self.statuses.kinds(),
            flying: self.flying,
            boss: self.boss,
            alive: self.alive,
            reached_end: self.reached_end,
        }
    }
}
