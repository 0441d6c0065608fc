use std::{path::PathBuf, time::Duration};

use lane_defence_core::{AbilityKind, CellCoord, EnemyKind, Event, TowerId, TowerKind, Vec2};
use lane_defence_system_analytics as analytics;
use lane_defence_system_builder::{BuilderInput, PointerButton, Selection};
use lane_defence_system_session::{Session, SessionConfig, MAX_STEP};
use lane_defence_tables::{MapLayout, Tables, Wave};
use lane_defence_world::{query, Config};

const FRAME: Duration = Duration::from_nanos(16_666_667);

fn lane_tables() -> Tables {
    let mut tables = Tables::default();
    tables.rules.columns = 3;
    tables.rules.rows = 3;
    tables.rules.cell_size = 100.0;
    tables.maps = vec![MapLayout {
        name: "lane".to_owned(),
        corners: vec![CellCoord::new(0, 1), CellCoord::new(2, 1)],
    }];
    tables.waves = vec![Wave::from_pairs(&[(EnemyKind::Basic, 1)])];
    tables
}

fn lane_session(tables: Tables, stats_path: Option<PathBuf>) -> Session {
    Session::new(
        tables,
        SessionConfig {
            world: Config {
                map: "lane".to_owned(),
                victory_wave: None,
                ..Config::default()
            },
            stats_path,
        },
    )
    .expect("lane session")
}

fn run_frames(session: &mut Session, frames: usize) -> Vec<Event> {
    let mut log = Vec::new();
    for _ in 0..frames {
        log.extend_from_slice(session.advance(FRAME));
    }
    log
}

#[test]
fn game_over_persists_statistics_for_the_next_session() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("stats.json");
    let mut tables = lane_tables();
    tables.rules.starting_health = 1;

    let mut session = lane_session(tables.clone(), Some(path.clone()));
    assert!(session.start_wave());
    let log = run_frames(&mut session, 200);

    assert!(session.is_over());
    assert!(log
        .iter()
        .any(|event| matches!(event, Event::GameOver { victory: false, .. })));

    let saved = analytics::load(&path);
    assert_eq!(saved.statistics.games_played, 1);
    assert_eq!(saved.statistics.lives_lost, 1);
    assert_eq!(saved.statistics.highest_wave, 1);

    let next = lane_session(tables, Some(path));
    assert_eq!(next.analytics().statistics().games_played, 1);
    assert!(!next.is_over());
}

#[test]
fn kills_unlock_achievements_and_restart_keeps_lifetime_counters() {
    let mut session = lane_session(lane_tables(), None);
    assert!(session.place_tower(TowerKind::Sniper, CellCoord::new(1, 0)));
    assert!(session.start_wave());
    let log = run_frames(&mut session, 60);

    assert!(log.contains(&Event::AchievementUnlocked {
        achievement: "first_blood".to_owned(),
    }));
    assert_eq!(session.analytics().game().kills, 1);

    session.restart().expect("restart");
    let world = session.world();
    assert_eq!(query::player(world).money, 650);
    assert_eq!(query::wave(world), 0);
    assert_eq!(query::tower_view(world).iter().count(), 0);
    assert_eq!(session.analytics().statistics().total_kills, 1);
    assert_eq!(session.analytics().game().kills, 0);
    assert!(session.events().is_empty());
}

#[test]
fn pointer_input_places_selects_and_sells_towers() {
    let mut session = lane_session(lane_tables(), None);
    session.begin_placement(TowerKind::Basic);

    let _ = session.input(BuilderInput::click(
        Vec2::new(50.0, 50.0),
        PointerButton::Primary,
    ));
    let _ = session.input(BuilderInput::click(
        Vec2::new(250.0, 250.0),
        PointerButton::Primary,
    ));
    assert_eq!(query::tower_view(session.world()).iter().count(), 2);
    assert_eq!(query::player(session.world()).money, 450);
    assert_eq!(session.selection(), Selection::Placing(TowerKind::Basic));

    let events = session.input(BuilderInput::click(
        Vec2::new(150.0, 150.0),
        PointerButton::Primary,
    ));
    assert!(matches!(
        events,
        [Event::TowerPlacementRejected { .. }]
    ));

    assert_eq!(
        session.select_tower_at(Vec2::new(50.0, 50.0)),
        Some(TowerId::new(0))
    );
    assert!(session
        .upgrade_selected()
        .iter()
        .any(|event| matches!(event, Event::TowerUpgraded { level: 2, .. })));
    assert!(session
        .sell_selected()
        .iter()
        .any(|event| matches!(event, Event::TowerSold { .. })));
    assert_eq!(session.selection(), Selection::None);

    let _ = session.input(BuilderInput::click(
        Vec2::new(250.0, 250.0),
        PointerButton::Secondary,
    ));
    assert_eq!(session.select_tower_at(Vec2::new(10.0, 150.0)), None);
}

#[test]
fn abilities_report_whether_they_were_used() {
    let mut session = lane_session(lane_tables(), None);
    assert!(session.use_ability(AbilityKind::CashBoost, None));
    assert!(!session.use_ability(AbilityKind::CashBoost, None));
    assert!(!session.use_ability(AbilityKind::Airstrike, None));
    assert_eq!(query::player(session.world()).money, 550);
    assert_eq!(session.analytics().statistics().money_spent, 100);
}

#[test]
fn long_frames_are_clamped() {
    let mut session = lane_session(lane_tables(), None);
    let events = session.advance(Duration::from_secs(5));
    assert_eq!(events, [Event::TimeAdvanced { dt: MAX_STEP }].as_slice());

    let frame = session.frame();
    assert_eq!(frame.events, vec![Event::TimeAdvanced { dt: MAX_STEP }]);
    assert_eq!(frame.selection, Selection::None);
    assert!(!frame.snapshot.wave_active);
}
