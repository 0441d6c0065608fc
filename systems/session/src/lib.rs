#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Orchestrates one running game: the world, player input and lifetime statistics.

use std::{path::PathBuf, time::Duration};

use lane_defence_core::{
    AbilityKind, CellCoord, Command, Event, TargetingMode, TowerId, TowerKind, Vec2,
};
use lane_defence_system_analytics::{self as analytics, Analytics};
use lane_defence_system_builder::{Builder, BuilderInput, PointerButton, Selection};
use lane_defence_tables::{TableError, Tables};
use lane_defence_world::{
    self as world,
    query::{self, FrameSnapshot},
    Config, Outcome, World,
};
use tracing::{debug, info};

/// Longest simulated step accepted by [`Session::advance`].
pub const MAX_STEP: Duration = Duration::from_millis(250);

/// Settings of a session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionConfig {
    /// Map, difficulty and seed of every game played in the session.
    pub world: Config,
    /// File holding lifetime statistics; `None` keeps them in memory only.
    pub stats_path: Option<PathBuf>,
}

/// Presentation data for one frame.
#[derive(Clone, Debug)]
pub struct Frame {
    /// Read-only view of the field.
    pub snapshot: FrameSnapshot,
    /// Events produced by the most recent call into the session.
    pub events: Vec<Event>,
    /// Current builder selection.
    pub selection: Selection,
}

/// Owns one game at a time and routes commands, input and events between systems.
#[derive(Debug)]
pub struct Session {
    tables: Tables,
    config: SessionConfig,
    world: World,
    builder: Builder,
    analytics: Analytics,
    events: Vec<Event>,
    unlocked: Vec<Event>,
    commands: Vec<Command>,
}

impl Session {
    /// Starts a session, loading saved statistics when a path is configured.
    pub fn new(tables: Tables, config: SessionConfig) -> Result<Self, TableError> {
        let world = World::new(tables.clone(), config.world.clone())?;
        let saved = config
            .stats_path
            .as_deref()
            .map(analytics::load)
            .unwrap_or_default();
        let analytics = Analytics::restore(tables.achievements.clone(), saved);
        info!(
            map = %config.world.map,
            difficulty = ?config.world.difficulty,
            seed = config.world.seed,
            "session started"
        );

        Ok(Self {
            builder: Builder::new(tables.rules.cell_size),
            tables,
            config,
            world,
            analytics,
            events: Vec::new(),
            unlocked: Vec::new(),
            commands: Vec::new(),
        })
    }

    /// Discards the current game and starts a fresh one with the same settings.
    ///
    /// Lifetime statistics carry over; abilities, towers and the wave counter reset.
    pub fn restart(&mut self) -> Result<(), TableError> {
        self.world = World::new(self.tables.clone(), self.config.world.clone())?;
        self.builder = Builder::new(self.tables.rules.cell_size);
        self.analytics.start_game();
        self.events.clear();
        debug!("session restarted");
        Ok(())
    }

    /// Advances the game by `dt`, clamped to [`MAX_STEP`].
    pub fn advance(&mut self, dt: Duration) -> &[Event] {
        self.submit(Command::Tick {
            dt: dt.min(MAX_STEP),
        })
    }

    /// Applies a single command and returns the events it produced.
    pub fn submit(&mut self, command: Command) -> &[Event] {
        self.events.clear();
        world::apply(&mut self.world, command, &mut self.events);
        self.settle();
        &self.events
    }

    /// Routes one frame of pointer and keyboard input through the builder.
    pub fn input(&mut self, input: BuilderInput) -> &[Event] {
        self.commands.clear();
        let world = &self.world;
        self.builder.handle(
            &[],
            input,
            |point| query::tower_at(world, point),
            &mut self.commands,
        );
        self.flush_commands()
    }

    /// Places a tower on `cell`; returns whether the placement succeeded.
    pub fn place_tower(&mut self, kind: TowerKind, cell: CellCoord) -> bool {
        self.submit(Command::PlaceTower { kind, cell })
            .iter()
            .any(|event| matches!(event, Event::TowerPlaced { .. }))
    }

    /// Starts the next wave unless one is already running.
    pub fn start_wave(&mut self) -> bool {
        self.submit(Command::StartWave)
            .iter()
            .any(|event| matches!(event, Event::WaveStarted { .. }))
    }

    /// Activates an ability; returns `false` when it was rejected.
    pub fn use_ability(&mut self, kind: AbilityKind, target: Option<Vec2>) -> bool {
        self.commands.clear();
        self.builder.use_ability(kind, target, &mut self.commands);
        self.flush_commands()
            .iter()
            .any(|event| matches!(event, Event::AbilityUsed { .. }))
    }

    /// Arms a tower kind for placement by pointer clicks.
    pub fn begin_placement(&mut self, kind: TowerKind) {
        self.builder.begin_placement(kind);
    }

    /// Drops any armed placement or tower selection.
    pub fn cancel_selection(&mut self) {
        self.builder.cancel();
    }

    /// Selects the tower under a pixel position, if any, disarming placement.
    pub fn select_tower_at(&mut self, point: Vec2) -> Option<TowerId> {
        self.builder.cancel();
        let _ = self.input(BuilderInput::click(point, PointerButton::Primary));
        match self.builder.selection() {
            Selection::Tower(tower) => Some(tower),
            Selection::None | Selection::Placing(_) => None,
        }
    }

    /// Upgrades the selected tower.
    pub fn upgrade_selected(&mut self) -> &[Event] {
        self.commands.clear();
        self.builder.upgrade_selected(&mut self.commands);
        self.flush_commands()
    }

    /// Sells the selected tower.
    pub fn sell_selected(&mut self) -> &[Event] {
        self.commands.clear();
        self.builder.sell_selected(&mut self.commands);
        self.flush_commands()
    }

    /// Changes the targeting rule of the selected tower.
    pub fn retarget_selected(&mut self, mode: TargetingMode) -> &[Event] {
        self.commands.clear();
        self.builder.retarget_selected(mode, &mut self.commands);
        self.flush_commands()
    }

    /// Read access to the running game.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Lifetime statistics and achievements.
    #[must_use]
    pub fn analytics(&self) -> &Analytics {
        &self.analytics
    }

    /// Current builder selection.
    #[must_use]
    pub fn selection(&self) -> Selection {
        self.builder.selection()
    }

    /// Events produced by the most recent call into the session.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Whether the current game has ended.
    #[must_use]
    pub fn is_over(&self) -> bool {
        query::outcome(&self.world) != Outcome::Running
    }

    /// Captures everything presentation code needs for the current frame.
    #[must_use]
    pub fn frame(&self) -> Frame {
        Frame {
            snapshot: query::frame(&self.world),
            events: self.events.clone(),
            selection: self.builder.selection(),
        }
    }

    fn flush_commands(&mut self) -> &[Event] {
        self.events.clear();
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }
        self.settle();
        &self.events
    }

    fn settle(&mut self) {
        self.unlocked.clear();
        self.analytics.handle(&self.events, &mut self.unlocked);
        self.events.append(&mut self.unlocked);

        let mut ignored = Vec::new();
        self.builder
            .handle(&self.events, BuilderInput::default(), |_| None, &mut ignored);

        let game_over = self
            .events
            .iter()
            .any(|event| matches!(event, Event::GameOver { .. }));
        if game_over {
            self.persist();
        }
    }

    fn persist(&self) {
        let Some(path) = self.config.stats_path.as_deref() else {
            return;
        };
        let _ = analytics::save(path, &self.analytics.save_data());
    }
}
