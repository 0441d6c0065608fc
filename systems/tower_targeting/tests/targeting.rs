use lane_defence_core::{
    CellCoord, EnemyId, EnemyKind, EnemySnapshot, EnemyView, StatusSet, TargetingMode, TowerId,
    TowerKind, TowerSnapshot, TowerTarget, TowerView, Vec2,
};
use lane_defence_system_tower_targeting::{select_target, TowerTargeting};

const RANGE: f32 = 100.0;

fn enemy(id: u32, position: Vec2, progress: f32, health: f32) -> EnemySnapshot {
    EnemySnapshot {
        id: EnemyId::new(id),
        kind: EnemyKind::Basic,
        position,
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

fn tower(id: u32, position: Vec2, mode: TargetingMode, hits_flying: bool) -> TowerSnapshot {
    TowerSnapshot {
        id: TowerId::new(id),
        kind: TowerKind::Basic,
        cell: CellCoord::new(0, 0),
        position,
        level: 1,
        range: RANGE,
        damage: 10,
        fire_rate: 1.0,
        targeting: mode,
        hits_flying,
        ready: true,
    }
}

fn chosen(view: &EnemyView, mode: TargetingMode) -> Option<u32> {
    select_target(view, Vec2::ZERO, RANGE, mode, true).map(|enemy| enemy.id.get())
}

#[test]
fn every_mode_breaks_ties_towards_the_smaller_id() {
    // Same progress, same health and the same distance from the origin.
    let view = EnemyView::from_snapshots(vec![
        enemy(9, Vec2::new(0.0, 60.0), 40.0, 70.0),
        enemy(4, Vec2::new(60.0, 0.0), 40.0, 70.0),
        enemy(6, Vec2::new(-60.0, 0.0), 40.0, 70.0),
    ]);

    for mode in [
        TargetingMode::First,
        TargetingMode::Last,
        TargetingMode::Closest,
        TargetingMode::Strongest,
        TargetingMode::Weakest,
    ] {
        assert_eq!(chosen(&view, mode), Some(4), "{mode:?}");
    }
}

#[test]
fn ties_only_matter_when_the_metric_is_equal() {
    let view = EnemyView::from_snapshots(vec![
        enemy(1, Vec2::new(90.0, 0.0), 10.0, 30.0),
        enemy(2, Vec2::new(20.0, 0.0), 10.0, 80.0),
        enemy(3, Vec2::new(50.0, 0.0), 75.0, 30.0),
    ]);

    assert_eq!(chosen(&view, TargetingMode::First), Some(3));
    assert_eq!(chosen(&view, TargetingMode::Last), Some(1));
    assert_eq!(chosen(&view, TargetingMode::Closest), Some(2));
    assert_eq!(chosen(&view, TargetingMode::Strongest), Some(2));
    assert_eq!(chosen(&view, TargetingMode::Weakest), Some(1));
}

#[test]
fn enemy_exactly_at_range_is_eligible() {
    let view = EnemyView::from_snapshots(vec![
        enemy(7, Vec2::new(0.0, RANGE), 90.0, 50.0),
        enemy(8, Vec2::new(RANGE + 0.01, 0.0), 95.0, 50.0),
    ]);

    assert_eq!(chosen(&view, TargetingMode::First), Some(7));
    assert_eq!(chosen(&view, TargetingMode::Closest), Some(7));
}

#[test]
fn boundary_tie_still_prefers_the_smaller_id() {
    let view = EnemyView::from_snapshots(vec![
        enemy(12, Vec2::new(RANGE, 0.0), 20.0, 50.0),
        enemy(5, Vec2::new(-RANGE, 0.0), 20.0, 50.0),
    ]);

    assert_eq!(chosen(&view, TargetingMode::Closest), Some(5));
    assert_eq!(chosen(&view, TargetingMode::First), Some(5));
}

#[test]
fn selection_leaves_the_view_untouched() {
    let view = EnemyView::from_snapshots(vec![
        enemy(1, Vec2::new(10.0, 0.0), 5.0, 50.0),
        enemy(2, Vec2::new(20.0, 0.0), 15.0, 50.0),
    ]);
    let before: Vec<EnemySnapshot> = view.iter().cloned().collect();

    let first = chosen(&view, TargetingMode::First);
    let again = chosen(&view, TargetingMode::First);

    assert_eq!(first, Some(2));
    assert_eq!(first, again);
    assert!(view.iter().eq(before.iter()));
}

#[test]
fn ground_towers_fall_back_to_walkers_while_anti_air_takes_the_flyer() {
    let mut flyer = enemy(1, Vec2::new(30.0, 0.0), 80.0, 50.0);
    flyer.flying = true;
    let enemies =
        EnemyView::from_snapshots(vec![flyer, enemy(2, Vec2::new(30.0, 0.0), 10.0, 50.0)]);
    let towers = TowerView::from_snapshots(vec![
        tower(1, Vec2::ZERO, TargetingMode::First, false),
        tower(2, Vec2::ZERO, TargetingMode::First, true),
    ]);
    let mut system = TowerTargeting::new();
    let mut out = Vec::new();

    system.handle(&towers, &enemies, &mut out);

    assert_eq!(
        out,
        vec![
            TowerTarget {
                tower: TowerId::new(1),
                enemy: EnemyId::new(2),
                tower_position: Vec2::ZERO,
                enemy_position: Vec2::new(30.0, 0.0),
            },
            TowerTarget {
                tower: TowerId::new(2),
                enemy: EnemyId::new(1),
                tower_position: Vec2::ZERO,
                enemy_position: Vec2::new(30.0, 0.0),
            },
        ]
    );
}

#[test]
fn towers_that_never_fire_are_skipped() {
    let mut support = tower(3, Vec2::ZERO, TargetingMode::First, true);
    support.fire_rate = 0.0;
    let enemies = EnemyView::from_snapshots(vec![enemy(1, Vec2::new(10.0, 0.0), 0.0, 50.0)]);
    let mut system = TowerTargeting::new();
    let mut out = Vec::new();

    system.handle(&TowerView::from_snapshots(vec![support]), &enemies, &mut out);

    assert!(out.is_empty());
}
