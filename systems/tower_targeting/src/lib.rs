#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that computes deterministic tower targets from world snapshots.

use lane_defence_core::{
    geometry, EnemyId, EnemySnapshot, EnemyView, TargetingMode, TowerTarget, TowerView, Vec2,
};

/// Selects the enemy a tower at `origin` should attack.
///
/// Only living enemies that have not left the field and lie within `range`
/// are eligible. Airborne enemies are skipped unless `hits_flying` is set.
/// Ties on the mode's metric resolve towards the smaller enemy identifier.
/// The query never mutates the view and may be called any number of times.
#[must_use]
pub fn select_target(
    enemies: &EnemyView,
    origin: Vec2,
    range: f32,
    mode: TargetingMode,
    hits_flying: bool,
) -> Option<&EnemySnapshot> {
    let mut best: Option<BestCandidate<'_>> = None;

    for enemy in enemies.iter() {
        if !enemy.is_targetable() || (enemy.flying && !hits_flying) {
            continue;
        }

        let distance = geometry::distance(origin, enemy.position);
        if distance > range {
            continue;
        }

        let current = BestCandidate {
            score: score(mode, enemy, distance),
            id: enemy.id,
            enemy,
        };

        match &mut best {
            Some(existing) => {
                if current.precedes(existing) {
                    *existing = current;
                }
            }
            None => best = Some(current),
        }
    }

    best.map(|candidate| candidate.enemy)
}

/// Converts the mode's metric into a value where smaller is better.
fn score(mode: TargetingMode, enemy: &EnemySnapshot, distance: f32) -> f32 {
    match mode {
        TargetingMode::First => -enemy.progress,
        TargetingMode::Last => enemy.progress,
        TargetingMode::Closest => distance,
        TargetingMode::Strongest => -enemy.health,
        TargetingMode::Weakest => enemy.health,
    }
}

#[derive(Clone, Copy, Debug)]
struct BestCandidate<'a> {
    score: f32,
    id: EnemyId,
    enemy: &'a EnemySnapshot,
}

impl BestCandidate<'_> {
    fn precedes(&self, other: &Self) -> bool {
        if self.score != other.score {
            return self.score < other.score;
        }

        self.id < other.id
    }
}

/// Tower targeting system that assigns targets to every ready tower.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    scratch: Vec<TowerTarget>,
}

impl TowerTargeting {
    /// Creates a new tower targeting system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes tower targets for the provided world snapshot.
    ///
    /// The output buffer is cleared before populating it with the latest
    /// assignments. Towers that are not ready, or that never fire, receive no
    /// assignment.
    pub fn handle(&mut self, towers: &TowerView, enemies: &EnemyView, out: &mut Vec<TowerTarget>) {
        out.clear();

        if enemies.is_empty() {
            return;
        }

        self.scratch.clear();
        for tower in towers.iter() {
            if !tower.ready || tower.fire_rate <= 0.0 {
                continue;
            }

            let Some(enemy) = select_target(
                enemies,
                tower.position,
                tower.range,
                tower.targeting,
                tower.hits_flying,
            ) else {
                continue;
            };

            self.scratch.push(TowerTarget {
                tower: tower.id,
                enemy: enemy.id,
                tower_position: tower.position,
                enemy_position: enemy.position,
            });
        }

        out.append(&mut self.scratch);
    }
}

#[cfg(test)]
mod tests {
    use super::{select_target, TowerTargeting};
    use lane_defence_core::{
        CellCoord, EnemyId, EnemyKind, EnemySnapshot, EnemyView, StatusSet, TargetingMode,
        TowerId, TowerKind, TowerSnapshot, TowerView, Vec2,
    };

    fn enemy(id: u32, x: f32, progress: f32, health: f32) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(id),
            kind: EnemyKind::Basic,
            position: Vec2::new(x, 0.0),
            radius: 8.0,
            health,
            max_health: 100.0,
            shield: 0.0,
            max_shield: 0.0,
            progress,
            statuses: StatusSet::default(),
            flying: false,
            boss: false,
            alive: true,
            reached_end: false,
        }
    }

    fn tower(id: u32, ready: bool) -> TowerSnapshot {
        TowerSnapshot {
            id: TowerId::new(id),
            kind: TowerKind::Basic,
            cell: CellCoord::new(0, 0),
            position: Vec2::ZERO,
            level: 1,
            range: 120.0,
            damage: 10,
            fire_rate: 1.0,
            targeting: TargetingMode::First,
            hits_flying: true,
            ready,
        }
    }

    fn pick(view: &EnemyView, mode: TargetingMode) -> Option<u32> {
        select_target(view, Vec2::ZERO, 120.0, mode, true).map(|enemy| enemy.id.get())
    }

    #[test]
    fn each_mode_applies_its_metric() {
        let view = EnemyView::from_snapshots(vec![
            enemy(1, 30.0, 300.0, 40.0),
            enemy(2, 10.0, 500.0, 90.0),
            enemy(3, 60.0, 100.0, 10.0),
        ]);

        assert_eq!(pick(&view, TargetingMode::First), Some(2));
        assert_eq!(pick(&view, TargetingMode::Last), Some(3));
        assert_eq!(pick(&view, TargetingMode::Closest), Some(2));
        assert_eq!(pick(&view, TargetingMode::Strongest), Some(2));
        assert_eq!(pick(&view, TargetingMode::Weakest), Some(3));
    }

    #[test]
    fn range_boundary_is_inclusive() {
        let view = EnemyView::from_snapshots(vec![enemy(1, 120.0, 0.0, 50.0)]);
        assert_eq!(pick(&view, TargetingMode::First), Some(1));

        let view = EnemyView::from_snapshots(vec![enemy(1, 120.5, 0.0, 50.0)]);
        assert_eq!(pick(&view, TargetingMode::First), None);
    }

    #[test]
    fn dead_and_escaped_enemies_are_ignored() {
        let mut dead = enemy(1, 10.0, 900.0, 0.0);
        dead.alive = false;
        let mut escaped = enemy(2, 10.0, 800.0, 50.0);
        escaped.reached_end = true;
        let view = EnemyView::from_snapshots(vec![dead, escaped, enemy(3, 10.0, 5.0, 50.0)]);

        assert_eq!(pick(&view, TargetingMode::First), Some(3));
    }

    #[test]
    fn ground_towers_skip_flying_enemies() {
        let mut flyer = enemy(1, 10.0, 900.0, 50.0);
        flyer.flying = true;
        let view = EnemyView::from_snapshots(vec![flyer, enemy(2, 10.0, 5.0, 50.0)]);

        let ground = select_target(&view, Vec2::ZERO, 120.0, TargetingMode::First, false);
        assert_eq!(ground.map(|enemy| enemy.id), Some(EnemyId::new(2)));
        let anti_air = select_target(&view, Vec2::ZERO, 120.0, TargetingMode::First, true);
        assert_eq!(anti_air.map(|enemy| enemy.id), Some(EnemyId::new(1)));
    }

    #[test]
    fn smaller_enemy_id_wins_ties() {
        let view = EnemyView::from_snapshots(vec![
            enemy(20, 10.0, 50.0, 50.0),
            enemy(10, 40.0, 50.0, 50.0),
        ]);
        assert_eq!(pick(&view, TargetingMode::First), Some(10));
    }

    #[test]
    fn only_ready_towers_receive_targets() {
        let mut system = TowerTargeting::new();
        let towers = TowerView::from_snapshots(vec![tower(2, true), tower(1, false)]);
        let enemies = EnemyView::from_snapshots(vec![enemy(7, 50.0, 10.0, 50.0)]);
        let mut out = Vec::new();

        system.handle(&towers, &enemies, &mut out);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].tower, TowerId::new(2));
        assert_eq!(out[0].enemy, EnemyId::new(7));
        assert_eq!(out[0].enemy_position, Vec2::new(50.0, 0.0));
    }

    #[test]
    fn output_is_cleared_when_nothing_is_in_range() {
        let mut system = TowerTargeting::new();
        let towers = TowerView::from_snapshots(vec![tower(1, true)]);
        let enemies = EnemyView::from_snapshots(vec![enemy(1, 50.0, 10.0, 50.0)]);
        let mut out = Vec::new();
        system.handle(&towers, &enemies, &mut out);
        assert_eq!(out.len(), 1);

        let far = EnemyView::from_snapshots(vec![enemy(1, 500.0, 10.0, 50.0)]);
        system.handle(&towers, &far, &mut out);
        assert!(out.is_empty());
    }
}
