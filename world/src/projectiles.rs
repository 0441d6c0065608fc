//! Seeking projectiles in flight between a tower and its target.

use lane_defence_core::{
    geometry, EnemyId, ProjectileId, ProjectileSnapshot, TowerId, TowerKind, Vec2,
    REFERENCE_FRAME_RATE,
};
use lane_defence_system_tower_combat::Payload;

/// Outcome of advancing a projectile for one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Flight {
    /// Still travelling.
    Travelling,
    /// Reached its target at the provided impact point.
    Arrived(Vec2),
    /// Target vanished or the projectile outran its maximum travel.
    Fizzled,
}

/// Position and body radius of the enemy a projectile seeks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Mark {
    pub(crate) position: Vec2,
    pub(crate) radius: f32,
}

#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    pub(crate) id: ProjectileId,
    pub(crate) tower: TowerId,
    pub(crate) target: EnemyId,
    pub(crate) payload: Payload,
    source: TowerKind,
    position: Vec2,
    speed: f32,
    travelled: f32,
}

impl Projectile {
    /// Moves towards the mark, landing once it is within one step plus the
    /// target's radius.
    pub(crate) fn advance(&mut self, dt: f32, mark: Option<Mark>, max_travel: f32) -> Flight {
        let Some(mark) = mark else {
            return Flight::Fizzled;
        };

        let step = self.speed * dt * REFERENCE_FRAME_RATE;
        let distance = geometry::distance(self.position, mark.position);
        if distance < step + mark.radius {
            self.position = mark.position;
            return Flight::Arrived(mark.position);
        }

        self.position += geometry::direction(self.position, mark.position) * step;
        self.travelled += step;
        if self.travelled > max_travel {
            return Flight::Fizzled;
        }
        Flight::Travelling
    }

    pub(crate) fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: self.id,
            source: self.source,
            position: self.position,
        }
    }
}

/// Parameters of a freshly launched projectile.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Launch {
    pub(crate) tower: TowerId,
    pub(crate) source: TowerKind,
    pub(crate) target: EnemyId,
    pub(crate) origin: Vec2,
    pub(crate) speed: f32,
    pub(crate) payload: Payload,
}

/// Projectiles in launch order.
#[derive(Debug, Default)]
pub(crate) struct ProjectileRegistry {
    entries: Vec<Projectile>,
    next_projectile_id: u32,
}

impl ProjectileRegistry {
    pub(crate) fn launch(&mut self, launch: Launch) -> ProjectileId {
        let id = ProjectileId::new(self.next_projectile_id);
        self.next_projectile_id = self.next_projectile_id.saturating_add(1);
        self.entries.push(Projectile {
            id,
            tower: launch.tower,
            target: launch.target,
            payload: launch.payload,
            source: launch.source,
            position: launch.origin,
            speed: launch.speed,
            travelled: 0.0,
        });
        id
    }

    /// Drops every projectile fired by the provided tower.
    pub(crate) fn discard_from(&mut self, tower: TowerId) {
        self.entries.retain(|projectile| projectile.tower != tower);
    }

    /// Moves the projectiles out so the world can resolve them against enemies.
    pub(crate) fn take(&mut self) -> Vec<Projectile> {
        std::mem::take(&mut self.entries)
    }

    /// Returns survivors after resolution, keeping launch order.
    pub(crate) fn restore(&mut self, survivors: Vec<Projectile>) {
        self.entries = survivors;
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.entries.iter()
    }
}
