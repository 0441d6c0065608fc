use std::time::Duration;

use lane_defence_core::{
    AbilityKind, CellCoord, Command, EnemyKind, Event, TargetingMode, TowerId, TowerKind,
};
use lane_defence_tables::{Tables, Wave};
use lane_defence_world::{self as world, query, Config, World};

#[test]
fn deterministic_replay_produces_identical_streams() {
    let first = replay(Tables::default(), Config::default());
    let second = replay(Tables::default(), Config::default());

    assert_eq!(first, second, "replay diverged between runs");
    assert!(first
        .events
        .iter()
        .any(|event| event.starts_with("EnemyKilled")));
}

#[test]
fn spawn_order_depends_on_the_seed() {
    let mut tables = Tables::default();
    tables.waves = vec![Wave::from_pairs(&[
        (EnemyKind::Basic, 5),
        (EnemyKind::Fast, 5),
        (EnemyKind::Tank, 2),
    ])];
    let spawn_order = |seed: u64| -> Vec<String> {
        replay(
            tables.clone(),
            Config {
                seed,
                ..Config::default()
            },
        )
        .events
        .into_iter()
        .filter(|event| event.starts_with("EnemySpawned"))
        .collect()
    };

    let reference = spawn_order(1);
    assert!(
        (2..8).any(|seed| spawn_order(seed) != reference),
        "every seed produced the same spawn order"
    );
}

#[derive(Debug, PartialEq)]
struct ReplayOutcome {
    events: Vec<String>,
    money: u32,
    score: u64,
    health: u32,
}

fn replay(tables: Tables, config: Config) -> ReplayOutcome {
    let mut world = World::new(tables, config).expect("world");
    let mut log = Vec::new();

    for command in scripted_commands() {
        let mut events = Vec::new();
        world::apply(&mut world, command, &mut events);
        record_events(&events, &mut log);
    }

    let player = query::player(&world);
    ReplayOutcome {
        events: log,
        money: player.money,
        score: player.score,
        health: player.health,
    }
}

fn record_events(events: &[Event], log: &mut Vec<String>) {
    log.extend(
        events
            .iter()
            .filter(|event| !matches!(event, Event::TimeAdvanced { .. }))
            .map(|event| format!("{event:?}")),
    );
}

fn scripted_commands() -> Vec<Command> {
    let frame = Command::Tick {
        dt: Duration::from_millis(16),
    };
    let mut commands = vec![
        Command::PlaceTower {
            kind: TowerKind::Basic,
            cell: CellCoord::new(5, 6),
        },
        Command::PlaceTower {
            kind: TowerKind::Splash,
            cell: CellCoord::new(7, 9),
        },
        Command::SetTargeting {
            tower: TowerId::new(1),
            mode: TargetingMode::Strongest,
        },
        Command::StartWave,
    ];
    commands.extend(std::iter::repeat(frame.clone()).take(600));
    commands.push(Command::UseAbility {
        kind: AbilityKind::FreezeAll,
        target: None,
    });
    commands.push(Command::StartWave);
    commands.extend(std::iter::repeat(frame).take(900));
    commands
}
