use lane_defence_core::{
    AbilityKind, CellCoord, Command, Event, TargetingMode, TowerId, TowerKind, Vec2,
};
use lane_defence_system_builder::{Builder, BuilderInput, PointerButton, Selection};

const CELL: f32 = 40.0;

fn primary(x: f32, y: f32) -> BuilderInput {
    BuilderInput::click(Vec2::new(x, y), PointerButton::Primary)
}

#[test]
fn placement_mode_persists_across_clicks() {
    let mut builder = Builder::new(CELL);
    builder.begin_placement(TowerKind::Sniper);
    let mut commands = Vec::new();

    builder.handle(&[], primary(45.0, 85.0), |_| None, &mut commands);
    builder.handle(&[], primary(130.0, 10.0), |_| None, &mut commands);

    assert_eq!(
        commands,
        vec![
            Command::PlaceTower {
                kind: TowerKind::Sniper,
                cell: CellCoord::new(1, 2),
            },
            Command::PlaceTower {
                kind: TowerKind::Sniper,
                cell: CellCoord::new(3, 0),
            },
        ],
    );
    assert_eq!(builder.selection(), Selection::Placing(TowerKind::Sniper));
}

#[test]
fn clicks_outside_the_grid_origin_emit_nothing() {
    let mut builder = Builder::new(CELL);
    builder.begin_placement(TowerKind::Basic);
    let mut commands = Vec::new();

    builder.handle(&[], primary(-5.0, 20.0), |_| None, &mut commands);

    assert!(commands.is_empty());
}

#[test]
fn secondary_click_cancels_placement() {
    let mut builder = Builder::new(CELL);
    builder.begin_placement(TowerKind::Basic);
    let mut commands = Vec::new();

    builder.handle(
        &[],
        BuilderInput::click(Vec2::new(10.0, 10.0), PointerButton::Secondary),
        |_| None,
        &mut commands,
    );
    builder.handle(&[], primary(10.0, 10.0), |_| None, &mut commands);

    assert!(commands.is_empty());
    assert_eq!(builder.selection(), Selection::None);
}

#[test]
fn selecting_a_tower_enables_upgrade_and_sale() {
    let mut builder = Builder::new(CELL);
    let mut commands = Vec::new();

    builder.handle(
        &[],
        primary(60.0, 60.0),
        |point| (point == Vec2::new(60.0, 60.0)).then_some(TowerId::new(4)),
        &mut commands,
    );
    assert_eq!(builder.selection(), Selection::Tower(TowerId::new(4)));

    builder.upgrade_selected(&mut commands);
    builder.retarget_selected(TargetingMode::Strongest, &mut commands);
    builder.sell_selected(&mut commands);

    assert_eq!(
        commands,
        vec![
            Command::UpgradeTower {
                tower: TowerId::new(4),
            },
            Command::SetTargeting {
                tower: TowerId::new(4),
                mode: TargetingMode::Strongest,
            },
            Command::SellTower {
                tower: TowerId::new(4),
            },
        ],
    );
}

#[test]
fn clicking_empty_ground_deselects() {
    let mut builder = Builder::new(CELL);
    let mut commands = Vec::new();

    builder.handle(&[], primary(60.0, 60.0), |_| Some(TowerId::new(1)), &mut commands);
    builder.handle(&[], primary(300.0, 60.0), |_| None, &mut commands);

    assert_eq!(builder.selection(), Selection::None);
    builder.sell_selected(&mut commands);
    assert!(commands.is_empty());
}

#[test]
fn sold_tower_is_deselected() {
    let mut builder = Builder::new(CELL);
    let mut commands = Vec::new();
    builder.handle(&[], primary(60.0, 60.0), |_| Some(TowerId::new(2)), &mut commands);

    builder.handle(
        &[Event::TowerSold {
            tower: TowerId::new(2),
            cell: CellCoord::new(1, 1),
            refund: 70,
        }],
        BuilderInput::default(),
        |_| None,
        &mut commands,
    );

    assert_eq!(builder.selection(), Selection::None);
}

#[test]
fn cancel_key_and_wave_trigger_are_honoured() {
    let mut builder = Builder::new(CELL);
    builder.begin_placement(TowerKind::Laser);
    let mut commands = Vec::new();

    builder.handle(
        &[],
        BuilderInput {
            cancel: true,
            start_wave: true,
            ..BuilderInput::default()
        },
        |_| None,
        &mut commands,
    );

    assert_eq!(commands, vec![Command::StartWave]);
    assert_eq!(builder.selection(), Selection::None);
}

#[test]
fn abilities_are_forwarded_regardless_of_selection() {
    let mut builder = Builder::new(CELL);
    builder.begin_placement(TowerKind::Ice);
    let mut commands = Vec::new();

    builder.use_ability(
        AbilityKind::Airstrike,
        Some(Vec2::new(200.0, 120.0)),
        &mut commands,
    );
    builder.use_ability(AbilityKind::FreezeAll, None, &mut commands);

    assert_eq!(
        commands,
        vec![
            Command::UseAbility {
                kind: AbilityKind::Airstrike,
                target: Some(Vec2::new(200.0, 120.0)),
            },
            Command::UseAbility {
                kind: AbilityKind::FreezeAll,
                target: None,
            },
        ],
    );
    assert_eq!(builder.selection(), Selection::Placing(TowerKind::Ice));
}
