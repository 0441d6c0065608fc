#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Lane Defence headlessly.

mod layout_transfer;

use std::{path::PathBuf, time::Duration};

use anyhow::{bail, Context, Result};
use clap::Parser;
use lane_defence_core::{CellCoord, Command, Difficulty, Event, TowerKind};
use lane_defence_system_session::{Session, SessionConfig};
use lane_defence_tables::Tables;
use lane_defence_world::{query, Config, Outcome};
use layout_transfer::TowerLayoutSnapshot;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Simulated frames per second.
const FRAME_RATE: u32 = 60;
/// Simulated seconds after which a wave is abandoned.
const WAVE_TIME_LIMIT_SECS: u32 = 600;

/// Plays a headless game of Lane Defence and reports the outcome.
#[derive(Debug, Parser)]
#[command(name = "lane-defence", version)]
struct Cli {
    /// Name of the map layout to play on.
    #[arg(long, default_value = "classic")]
    map: String,
    /// Difficulty: easy, normal or hard.
    #[arg(long, default_value = "normal", value_parser = parse_difficulty)]
    difficulty: Difficulty,
    /// Seed of the wave shuffle.
    #[arg(long)]
    seed: Option<u64>,
    /// TOML file overriding the built-in tables.
    #[arg(long)]
    tables: Option<PathBuf>,
    /// JSON file holding lifetime statistics.
    #[arg(long)]
    stats: Option<PathBuf>,
    /// Number of waves to play before stopping.
    #[arg(long, default_value_t = 5)]
    waves: u32,
    /// Tower to place before the first wave, written as `kind@column,row`.
    #[arg(long = "tower", value_parser = parse_tower)]
    towers: Vec<(TowerKind, CellCoord)>,
    /// Layout string produced by `--export-layout`.
    #[arg(long)]
    layout: Option<String>,
    /// Prints the layout string of the placed towers and exits.
    #[arg(long)]
    export_layout: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let tables = match &cli.tables {
        Some(path) => Tables::from_path(path)
            .with_context(|| format!("failed to load tables from {}", path.display()))?,
        None => Tables::default(),
    };

    let mut world = Config {
        map: cli.map.clone(),
        difficulty: cli.difficulty,
        victory_wave: Some(cli.waves),
        ..Config::default()
    };
    if let Some(seed) = cli.seed {
        world.seed = seed;
    }

    let mut session = Session::new(
        tables,
        SessionConfig {
            world,
            stats_path: cli.stats.clone(),
        },
    )
    .context("failed to start the session")?;

    if let Some(layout) = &cli.layout {
        import_layout(&mut session, layout)?;
    }
    for (kind, cell) in &cli.towers {
        if !session.place_tower(*kind, *cell) {
            warn!(kind = kind.name(), ?cell, "tower could not be placed");
        }
    }

    if cli.export_layout {
        let map = query::map(session.world());
        let snapshot = TowerLayoutSnapshot::capture(
            map.columns(),
            map.rows(),
            map.name(),
            query::tower_view(session.world()).iter(),
        );
        println!("{}", snapshot.encode()?);
        return Ok(());
    }

    play(&mut session, cli.waves);
    report(&session);
    Ok(())
}

fn play(session: &mut Session, waves: u32) {
    let frame = Duration::from_secs(1) / FRAME_RATE;
    let frame_limit = FRAME_RATE * WAVE_TIME_LIMIT_SECS;

    for _ in 0..waves {
        if session.is_over() || !session.start_wave() {
            break;
        }
        for _ in 0..frame_limit {
            for event in session.advance(frame) {
                if let Event::AchievementUnlocked { achievement } = event {
                    println!("achievement unlocked: {achievement}");
                }
            }
            if session.is_over() || !query::wave_active(session.world()) {
                break;
            }
        }
        if query::wave_active(session.world()) {
            warn!(
                wave = query::wave(session.world()),
                "wave did not finish in time"
            );
            break;
        }
    }
}

fn report(session: &Session) {
    let world = session.world();
    let player = query::player(world);
    let outcome = match query::outcome(world) {
        Outcome::Running => "stopped",
        Outcome::Victory => "victory",
        Outcome::Defeat => "defeat",
    };
    info!(outcome, wave = player.wave, score = player.score, "game finished");

    let stats = session.analytics().statistics();
    println!("outcome: {outcome}");
    println!("wave:    {}", player.wave);
    println!("score:   {}", player.score);
    println!("lives:   {}/{}", player.health, player.max_health);
    println!("money:   {}", player.money);
    println!(
        "lifetime: {} kills, {} waves, {} games, best score {}",
        stats.total_kills, stats.waves_completed, stats.games_played, stats.highest_score
    );
    println!(
        "achievements: {}/{}",
        session.analytics().unlocked_count(),
        session.analytics().definitions().len()
    );
}

fn import_layout(session: &mut Session, layout: &str) -> Result<()> {
    let snapshot = TowerLayoutSnapshot::decode(layout).context("invalid layout string")?;
    let map = query::map(session.world());
    if (snapshot.columns, snapshot.rows) != (map.columns(), map.rows()) {
        bail!(
            "layout was made for a {}x{} grid but the map is {}x{}",
            snapshot.columns,
            snapshot.rows,
            map.columns(),
            map.rows()
        );
    }
    if snapshot.map != map.name() {
        warn!(layout = %snapshot.map, map = map.name(), "layout was made for another map");
    }

    for tower in &snapshot.towers {
        if !session.place_tower(tower.kind, tower.cell) {
            warn!(kind = tower.kind.name(), cell = ?tower.cell, "tower could not be placed");
            continue;
        }
        let Some(id) = query::tower_at(
            session.world(),
            query::map(session.world()).cell_center(tower.cell),
        ) else {
            continue;
        };
        for _ in 1..tower.level {
            let upgraded = session
                .submit(Command::UpgradeTower { tower: id })
                .iter()
                .any(|event| matches!(event, Event::TowerUpgraded { .. }));
            if !upgraded {
                warn!(tower = id.get(), "tower could not be upgraded");
                break;
            }
        }
    }
    Ok(())
}

fn parse_difficulty(value: &str) -> Result<Difficulty, String> {
    Difficulty::from_name(&value.to_ascii_lowercase())
        .ok_or_else(|| format!("unknown difficulty '{value}', expected easy, normal or hard"))
}

fn parse_tower(value: &str) -> Result<(TowerKind, CellCoord), String> {
    let (kind, cell) = value
        .split_once('@')
        .ok_or_else(|| format!("expected kind@column,row, got '{value}'"))?;
    let kind = TowerKind::from_name(kind.trim())
        .ok_or_else(|| format!("unknown tower kind '{kind}'"))?;
    let (column, row) = cell
        .split_once(',')
        .ok_or_else(|| format!("expected column,row, got '{cell}'"))?;
    let column = column
        .trim()
        .parse()
        .map_err(|_| format!("invalid column '{column}'"))?;
    let row = row
        .trim()
        .parse()
        .map_err(|_| format!("invalid row '{row}'"))?;
    Ok((kind, CellCoord::new(column, row)))
}
