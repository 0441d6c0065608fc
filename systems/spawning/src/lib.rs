#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave spawning system.
//!
//! A wave's `{kind → count}` table is expanded into individual spawn entries,
//! the kinds are shuffled with a seeded generator, and the entries are then
//! given strictly increasing offsets so spawn density stays constant no matter
//! how the wave is composed.

use std::{collections::VecDeque, time::Duration};

use lane_defence_core::{EnemyKind, Event};
use lane_defence_tables::Wave;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    spawn_interval: Duration,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided spawn cadence and seed.
    #[must_use]
    pub const fn new(spawn_interval: Duration, rng_seed: u64) -> Self {
        Self {
            spawn_interval,
            rng_seed,
        }
    }
}

/// Lifecycle of a wave as seen by the spawner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WavePhase {
    /// No wave is running.
    Idle,
    /// Enemies remain queued for release.
    Spawning,
    /// Every enemy was released; waiting for the field to clear.
    Draining,
}

/// Single queued spawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnEntry {
    /// Kind of enemy to release.
    pub kind: EnemyKind,
    /// Time since the wave started at which the enemy is released.
    pub offset: Duration,
}

/// Spawning system that owns the per-wave release schedule.
#[derive(Debug)]
pub struct WaveSpawner {
    spawn_interval: Duration,
    rng: ChaCha8Rng,
    queue: VecDeque<SpawnEntry>,
    elapsed: Duration,
    phase: WavePhase,
}

impl WaveSpawner {
    /// Creates a new idle spawner using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            spawn_interval: config.spawn_interval,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            queue: VecDeque::new(),
            elapsed: Duration::ZERO,
            phase: WavePhase::Idle,
        }
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> WavePhase {
        self.phase
    }

    /// Reports whether a wave is spawning or draining.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.phase != WavePhase::Idle
    }

    /// Number of enemies still waiting to be released.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Read-only access to the queued entries in release order.
    pub fn queued(&self) -> impl Iterator<Item = &SpawnEntry> {
        self.queue.iter()
    }

    /// Schedules the provided wave.
    ///
    /// Returns `false` without touching the schedule while another wave is
    /// still active.
    pub fn start(&mut self, wave: &Wave) -> bool {
        if self.is_active() {
            return false;
        }

        let mut kinds: Vec<EnemyKind> = wave
            .groups
            .iter()
            .flat_map(|group| std::iter::repeat(group.kind).take(group.count as usize))
            .collect();
        kinds.shuffle(&mut self.rng);

        self.queue = kinds
            .into_iter()
            .enumerate()
            .map(|(index, kind)| SpawnEntry {
                kind,
                offset: self.spawn_interval.saturating_mul(index as u32),
            })
            .collect();
        self.elapsed = Duration::ZERO;
        self.phase = if self.queue.is_empty() {
            WavePhase::Draining
        } else {
            WavePhase::Spawning
        };
        true
    }

    /// Consumes time events and releases every entry whose offset elapsed.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<EnemyKind>) {
        if self.phase != WavePhase::Spawning {
            return;
        }

        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                self.elapsed = self.elapsed.saturating_add(*dt);
            }
        }

        while let Some(entry) = self.queue.front() {
            if entry.offset > self.elapsed {
                break;
            }
            out.push(entry.kind);
            let _ = self.queue.pop_front();
        }

        if self.queue.is_empty() {
            self.phase = WavePhase::Draining;
        }
    }

    /// Closes the wave once the field is clear.
    ///
    /// Returns `true` exactly once per wave, on the call that observes an
    /// empty queue and no live enemies.
    pub fn settle(&mut self, live_enemies: usize) -> bool {
        if self.phase == WavePhase::Draining && live_enemies == 0 {
            self.phase = WavePhase::Idle;
            return true;
        }
        false
    }
}
