//! Fixed registry of the five player abilities.

use lane_defence_core::{AbilityError, AbilityKind, AbilitySnapshot, Vec2};
use lane_defence_tables::{AbilityStats, AbilityTable};

#[derive(Clone, Debug)]
struct AbilityState {
    stats: AbilityStats,
    cooldown: f32,
    active: bool,
    time_active: f32,
}

impl AbilityState {
    fn new(stats: AbilityStats) -> Self {
        Self {
            stats,
            cooldown: 0.0,
            active: false,
            time_active: 0.0,
        }
    }

    fn update(&mut self, dt: f32) {
        if self.cooldown > 0.0 {
            self.cooldown = (self.cooldown - dt).max(0.0);
        }
        if self.active && self.stats.duration > 0.0 {
            self.time_active += dt;
            if self.time_active >= self.stats.duration {
                self.active = false;
            }
        }
    }
}

/// Effects that must be resolved by the world after an activation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct PendingEffects {
    /// Centre of an airstrike awaiting resolution.
    pub(crate) airstrike: Option<Vec2>,
    /// Set when a mass freeze was activated and not yet applied.
    pub(crate) freeze: bool,
}

/// One slot per ability, built once per session and indexed by
/// [`AbilityKind::index`].
#[derive(Clone, Debug)]
pub(crate) struct AbilityRegistry {
    slots: [AbilityState; AbilityKind::ALL.len()],
    pending: PendingEffects,
}

impl AbilityRegistry {
    pub(crate) fn new(table: &AbilityTable) -> Self {
        Self {
            slots: AbilityKind::ALL.map(|kind| AbilityState::new(*table.get(kind))),
            pending: PendingEffects::default(),
        }
    }

    fn slot(&self, kind: AbilityKind) -> &AbilityState {
        &self.slots[kind.index()]
    }

    pub(crate) fn stats(&self, kind: AbilityKind) -> &AbilityStats {
        &self.slot(kind).stats
    }

    /// Validates an activation without touching any state.
    ///
    /// Returns the price to charge on success.
    pub(crate) fn check(
        &self,
        kind: AbilityKind,
        money: u32,
        target: Option<Vec2>,
    ) -> Result<u32, AbilityError> {
        let slot = self.slot(kind);
        if slot.cooldown > 0.0 {
            return Err(AbilityError::CoolingDown);
        }
        if money < slot.stats.cost {
            return Err(AbilityError::InsufficientFunds {
                required: slot.stats.cost,
                available: money,
            });
        }
        if kind == AbilityKind::Airstrike && target.is_none() {
            return Err(AbilityError::MissingTarget);
        }
        Ok(slot.stats.cost)
    }

    /// Starts the cooldown and, for timed abilities, the active window.
    pub(crate) fn activate(&mut self, kind: AbilityKind, target: Option<Vec2>) {
        let slot = &mut self.slots[kind.index()];
        slot.cooldown = slot.stats.cooldown;
        slot.active = slot.stats.duration > 0.0;
        slot.time_active = 0.0;

        match kind {
            AbilityKind::Airstrike => self.pending.airstrike = target,
            AbilityKind::FreezeAll => self.pending.freeze = true,
            AbilityKind::CashBoost | AbilityKind::DamageBoost | AbilityKind::HealthRestore => {}
        }
    }

    pub(crate) fn update(&mut self, dt: f32) {
        for slot in &mut self.slots {
            slot.update(dt);
        }
    }

    /// Hands out pending one-shot effects exactly once.
    pub(crate) fn take_pending(&mut self) -> PendingEffects {
        std::mem::take(&mut self.pending)
    }

    /// Current multiplier of a timed boost; `1.0` outside its window.
    pub(crate) fn multiplier(&self, kind: AbilityKind) -> f32 {
        let slot = self.slot(kind);
        if slot.active {
            slot.stats.magnitude
        } else {
            1.0
        }
    }

    pub(crate) fn snapshots(&self) -> Vec<AbilitySnapshot> {
        self.slots
            .iter()
            .map(|slot| AbilitySnapshot {
                kind: slot.stats.kind,
                cost: slot.stats.cost,
                cooldown_fraction: if slot.stats.cooldown > 0.0 {
                    (1.0 - slot.cooldown / slot.stats.cooldown).clamp(0.0, 1.0)
                } else {
                    1.0
                },
                active: slot.active,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lane_defence_tables::Tables;

    fn registry() -> AbilityRegistry {
        AbilityRegistry::new(&Tables::default().abilities)
    }

    #[test]
    fn activation_starts_the_cooldown() {
        let mut abilities = registry();
        assert_eq!(abilities.check(AbilityKind::CashBoost, 500, None), Ok(100));
        abilities.activate(AbilityKind::CashBoost, None);
        assert_eq!(
            abilities.check(AbilityKind::CashBoost, 500, None),
            Err(AbilityError::CoolingDown)
        );
        assert_eq!(abilities.multiplier(AbilityKind::CashBoost), 2.0);
    }

    #[test]
    fn rejections_follow_a_fixed_order() {
        let abilities = registry();
        assert_eq!(
            abilities.check(AbilityKind::Airstrike, 10, None),
            Err(AbilityError::InsufficientFunds {
                required: 150,
                available: 10,
            })
        );
        assert_eq!(
            abilities.check(AbilityKind::Airstrike, 500, None),
            Err(AbilityError::MissingTarget)
        );
    }

    #[test]
    fn boost_window_closes_after_its_duration() {
        let mut abilities = registry();
        abilities.activate(AbilityKind::DamageBoost, None);
        assert_eq!(abilities.multiplier(AbilityKind::DamageBoost), 2.5);
        abilities.update(9.0);
        assert_eq!(abilities.multiplier(AbilityKind::DamageBoost), 2.5);
        abilities.update(1.0);
        assert_eq!(abilities.multiplier(AbilityKind::DamageBoost), 1.0);
    }

    #[test]
    fn pending_effects_are_handed_out_once() {
        let mut abilities = registry();
        abilities.activate(AbilityKind::FreezeAll, None);
        abilities.activate(AbilityKind::Airstrike, Some(Vec2::new(5.0, 5.0)));

        let pending = abilities.take_pending();
        assert!(pending.freeze);
        assert_eq!(pending.airstrike, Some(Vec2::new(5.0, 5.0)));
        assert_eq!(abilities.take_pending(), PendingEffects::default());
    }

    #[test]
    fn every_kind_owns_the_slot_at_its_index() {
        let abilities = registry();
        for kind in AbilityKind::ALL {
            assert_eq!(abilities.stats(kind).kind, kind);
            assert_eq!(abilities.snapshots()[kind.index()].kind, kind);
        }
    }

    #[test]
    fn cooldown_fraction_recovers_to_one() {
        let mut abilities = registry();
        abilities.activate(AbilityKind::HealthRestore, None);
        let fraction = |abilities: &AbilityRegistry| {
            abilities.snapshots()[AbilityKind::HealthRestore.index()].cooldown_fraction
        };
        assert_eq!(fraction(&abilities), 0.0);
        abilities.update(45.0);
        assert!((fraction(&abilities) - 0.5).abs() < 1e-6);
        abilities.update(45.0);
        assert_eq!(fraction(&abilities), 1.0);
        assert!(!abilities.snapshots()[AbilityKind::HealthRestore.index()].active);
    }
}
