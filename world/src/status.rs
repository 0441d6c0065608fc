//! Time-boxed status effects attached to enemies.

use lane_defence_core::{StatusEffect, StatusKind, StatusSet};

const KINDS: [StatusKind; 4] = [
    StatusKind::Slow,
    StatusKind::Poison,
    StatusKind::Burn,
    StatusKind::Freeze,
];

#[derive(Clone, Copy, Debug, PartialEq)]
struct ActiveStatus {
    remaining: f32,
    magnitude: f32,
}

/// Combined outcome of advancing every active effect by one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct StatusTick {
    /// Factor applied to the enemy's base speed.
    pub(crate) speed_multiplier: f32,
    /// Whether movement is suppressed this tick.
    pub(crate) frozen: bool,
    /// Health drained by damage-over-time effects.
    pub(crate) damage: f32,
}

/// At most one effect per kind; re-applying a kind replaces it outright.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct StatusEffects {
    slots: [Option<ActiveStatus>; 4],
}

impl StatusEffects {
    pub(crate) fn apply(&mut self, effect: StatusEffect) {
        if effect.duration <= 0.0 {
            return;
        }
        self.slots[effect.kind as usize] = Some(ActiveStatus {
            remaining: effect.duration,
            magnitude: effect.magnitude,
        });
    }

    pub(crate) fn tick(&mut self, dt: f32) -> StatusTick {
        let mut outcome = StatusTick {
            speed_multiplier: 1.0,
            frozen: false,
            damage: 0.0,
        };

        for (kind, slot) in KINDS.iter().zip(self.slots.iter_mut()) {
            let Some(active) = slot else {
                continue;
            };

            let window = dt.min(active.remaining);
            match kind {
                StatusKind::Slow => {
                    outcome.speed_multiplier *= (1.0 - active.magnitude).clamp(0.0, 1.0);
                }
                StatusKind::Poison | StatusKind::Burn => {
                    outcome.damage += active.magnitude * window;
                }
                StatusKind::Freeze => outcome.frozen = true,
            }

            active.remaining -= dt;
            if active.remaining <= 0.0 {
                *slot = None;
            }
        }

        if outcome.frozen {
            outcome.speed_multiplier = 0.0;
        }
        outcome
    }

    pub(crate) fn clear(&mut self) {
        self.slots = [None; 4];
    }

    pub(crate) fn kinds(&self) -> StatusSet {
        let mut set = StatusSet::default();
        for (kind, slot) in KINDS.iter().zip(self.slots.iter()) {
            if slot.is_some() {
                set.insert(*kind);
            }
        }
        set
    }

    #[cfg(test)]
    pub(crate) fn remaining(&self, kind: StatusKind) -> Option<f32> {
        self.slots[kind as usize].map(|active| active.remaining)
    }
}
