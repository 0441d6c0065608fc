#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns tower targets into attacks and resolves impacts.
//!
//! Firing is split in two halves. [`TowerCombat::handle`] converts the
//! targets chosen for ready towers into [`AttackOrder`] values: seeking
//! projectiles for discrete attacks and per-tick beam damage for continuous
//! ones. When a projectile arrives, [`TowerCombat::resolve_impact`] expands
//! its payload into [`DamageOrder`] values against the current enemy view.
//! Neither half mutates enemies; the world applies the orders.

use lane_defence_core::{
    geometry, EnemyId, EnemyView, Event, StatusEffect, TowerId, TowerKind, TowerTarget, Vec2,
};
use lane_defence_tables::AttackBehavior;

/// Firing parameters of a single tower for the current tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Armament {
    /// Tower the parameters belong to.
    pub tower: TowerId,
    /// Kind of the tower.
    pub kind: TowerKind,
    /// Damage per hit, or per second for beams, after every multiplier.
    pub damage: f32,
    /// Projectile speed in pixels per reference frame.
    pub projectile_speed: f32,
    /// Whether the tower's attacks can affect airborne enemies.
    pub hits_flying: bool,
    /// Attack resolution.
    pub behavior: AttackBehavior,
}

/// Effect carried by a projectile until it lands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ImpactEffect {
    /// Damage the target only.
    Single,
    /// Damage every enemy inside the radius around the impact point.
    Splash {
        /// Blast radius in pixels.
        radius: f32,
    },
    /// Damage the target and attach a status effect.
    Status(StatusEffect),
    /// Damage the target, then jump to nearby enemies with decaying damage.
    Chain {
        /// Maximum number of distinct enemies hit, primary target included.
        count: u32,
        /// Damage multiplier applied per hop.
        reduction: f32,
    },
}

/// Damage and effect delivered when a projectile lands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Payload {
    /// Damage dealt to the primary target.
    pub damage: f32,
    /// Additional behaviour on impact.
    pub effect: ImpactEffect,
    /// Whether airborne enemies are affected by area damage.
    pub hits_flying: bool,
}

/// Attack produced for a tower during a tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AttackOrder {
    /// Spawn a projectile that seeks the target.
    Launch {
        /// Tower that fired.
        tower: TowerId,
        /// Kind of the tower that fired.
        kind: TowerKind,
        /// Enemy the projectile seeks.
        target: EnemyId,
        /// Launch position.
        origin: Vec2,
        /// Projectile speed in pixels per reference frame.
        speed: f32,
        /// Payload delivered on impact.
        payload: Payload,
    },
    /// Apply continuous beam damage this tick.
    Beam {
        /// Tower emitting the beam.
        tower: TowerId,
        /// Enemy struck by the beam.
        target: EnemyId,
        /// Damage per second.
        damage_per_second: f32,
    },
}

/// Damage and status to apply to a single enemy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DamageOrder {
    /// Enemy to strike.
    pub enemy: EnemyId,
    /// Raw damage before shield and armor.
    pub amount: f32,
    /// Status effect attached after the damage.
    pub status: Option<StatusEffect>,
}

/// Damage aura projected by a support tower.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aura {
    /// Centre of the aura.
    pub position: Vec2,
    /// Radius of the aura.
    pub range: f32,
    /// Damage multiplier granted inside the radius.
    pub multiplier: f32,
}

/// Damage multiplier a tower at `position` receives from support auras.
///
/// Auras do not stack; the strongest covering aura wins.
#[must_use]
pub fn aura_multiplier(position: Vec2, auras: &[Aura]) -> f32 {
    auras
        .iter()
        .filter(|aura| geometry::distance(position, aura.position) <= aura.range)
        .map(|aura| aura.multiplier)
        .fold(1.0, f32::max)
}

/// Tower combat system that converts targets into attacks.
#[derive(Debug, Default)]
pub struct TowerCombat {
    scratch: Vec<AttackOrder>,
    chained: Vec<EnemyId>,
}

impl TowerCombat {
    /// Creates a new tower combat system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits attack orders for every target whose tower can fire.
    ///
    /// `arsenal` must be sorted by tower identifier. Targets for towers
    /// missing from the arsenal, or for support towers, are skipped.
    pub fn handle(
        &mut self,
        targets: &[TowerTarget],
        arsenal: &[Armament],
        out: &mut Vec<AttackOrder>,
    ) {
        if targets.is_empty() || arsenal.is_empty() {
            return;
        }

        self.scratch.clear();

        for target in targets {
            let Some(armament) = find_armament(arsenal, target.tower) else {
                continue;
            };

            let effect = match armament.behavior {
                AttackBehavior::Direct => ImpactEffect::Single,
                AttackBehavior::Splash { radius } => ImpactEffect::Splash { radius },
                AttackBehavior::Status { effect } => ImpactEffect::Status(effect),
                AttackBehavior::Chain { count, reduction } => {
                    ImpactEffect::Chain { count, reduction }
                }
                AttackBehavior::Beam => {
                    self.scratch.push(AttackOrder::Beam {
                        tower: target.tower,
                        target: target.enemy,
                        damage_per_second: armament.damage,
                    });
                    continue;
                }
                AttackBehavior::Support { .. } => continue,
            };

            self.scratch.push(AttackOrder::Launch {
                tower: target.tower,
                kind: armament.kind,
                target: target.enemy,
                origin: target.tower_position,
                speed: armament.projectile_speed,
                payload: Payload {
                    damage: armament.damage,
                    effect,
                    hits_flying: armament.hits_flying,
                },
            });
        }

        out.append(&mut self.scratch);
    }

    /// Expands a landed payload into damage orders.
    ///
    /// `impact` is the projectile position on arrival and `primary` the enemy
    /// it was seeking. Cosmetic detonation and chain-arc events are appended
    /// to `out_events`.
    #[allow(clippy::too_many_arguments)]
    pub fn resolve_impact(
        &mut self,
        payload: &Payload,
        impact: Vec2,
        primary: EnemyId,
        enemies: &EnemyView,
        chain_distance: f32,
        out: &mut Vec<DamageOrder>,
        out_events: &mut Vec<Event>,
    ) {
        match payload.effect {
            ImpactEffect::Single => out.push(DamageOrder {
                enemy: primary,
                amount: payload.damage,
                status: None,
            }),
            ImpactEffect::Status(effect) => out.push(DamageOrder {
                enemy: primary,
                amount: payload.damage,
                status: Some(effect),
            }),
            ImpactEffect::Splash { radius } => {
                for enemy in enemies.iter() {
                    if !enemy.is_targetable() || (enemy.flying && !payload.hits_flying) {
                        continue;
                    }
                    if geometry::distance(impact, enemy.position) <= radius {
                        out.push(DamageOrder {
                            enemy: enemy.id,
                            amount: payload.damage,
                            status: None,
                        });
                    }
                }
                out_events.push(Event::Detonation {
                    position: impact,
                    radius,
                });
            }
            ImpactEffect::Chain { count, reduction } => {
                self.resolve_chain(
                    payload.damage,
                    count,
                    reduction,
                    primary,
                    enemies,
                    chain_distance,
                    out,
                    out_events,
                );
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn resolve_chain(
        &mut self,
        damage: f32,
        count: u32,
        reduction: f32,
        primary: EnemyId,
        enemies: &EnemyView,
        chain_distance: f32,
        out: &mut Vec<DamageOrder>,
        out_events: &mut Vec<Event>,
    ) {
        let Some(first) = enemies.get(primary) else {
            return;
        };
        if !first.is_targetable() || count == 0 {
            return;
        }

        self.chained.clear();
        self.chained.push(primary);
        out.push(DamageOrder {
            enemy: primary,
            amount: damage,
            status: None,
        });

        let mut current = first.position;
        let mut hop_damage = damage;
        for _ in 1..count {
            let nearest = enemies
                .iter()
                .filter(|enemy| enemy.is_targetable() && !self.chained.contains(&enemy.id))
                .map(|enemy| (geometry::distance(current, enemy.position), enemy))
                .filter(|(distance, _)| *distance < chain_distance)
                .min_by(|(a, left), (b, right)| a.total_cmp(b).then(left.id.cmp(&right.id)));

            let Some((_, next)) = nearest else {
                break;
            };

            hop_damage *= reduction;
            out.push(DamageOrder {
                enemy: next.id,
                amount: hop_damage,
                status: None,
            });
            out_events.push(Event::ChainArc {
                from: current,
                to: next.position,
            });
            self.chained.push(next.id);
            current = next.position;
        }
    }
}

fn find_armament(arsenal: &[Armament], tower: TowerId) -> Option<&Armament> {
    arsenal
        .binary_search_by_key(&tower, |armament| armament.tower)
        .ok()
        .map(|index| &arsenal[index])
}
