#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure input system translating pointer and keyboard actions into commands.

use lane_defence_core::{
    geometry, AbilityKind, Command, Event, TargetingMode, TowerId, TowerKind, Vec2,
};

/// Pointer buttons the builder reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    /// Places the pending tower or selects the tower under the pointer.
    Primary,
    /// Cancels placement and clears the selection.
    Secondary,
}

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BuilderInput {
    /// Pointer click registered on this frame, in pixel space.
    pub click: Option<(Vec2, PointerButton)>,
    /// Indicates whether the player pressed the cancel key on this frame.
    pub cancel: bool,
    /// Indicates whether the player requested the next wave on this frame.
    pub start_wave: bool,
}

impl BuilderInput {
    /// Creates an input descriptor holding a single click.
    #[must_use]
    pub const fn click(position: Vec2, button: PointerButton) -> Self {
        Self {
            click: Some((position, button)),
            cancel: false,
            start_wave: false,
        }
    }
}

/// What the player is currently interacting with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Selection {
    /// Nothing is selected.
    #[default]
    None,
    /// A tower kind is armed for placement; it stays armed across placements.
    Placing(TowerKind),
    /// An existing tower is selected.
    Tower(TowerId),
}

/// Input system that tracks the current selection and emits commands.
#[derive(Clone, Debug)]
pub struct Builder {
    cell_size: f32,
    selection: Selection,
}

impl Builder {
    /// Creates a new builder for a map with the provided cell size.
    #[must_use]
    pub const fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            selection: Selection::None,
        }
    }

    /// Current selection.
    #[must_use]
    pub const fn selection(&self) -> Selection {
        self.selection
    }

    /// Arms the provided tower kind for placement and drops any tower selection.
    pub fn begin_placement(&mut self, kind: TowerKind) {
        self.selection = Selection::Placing(kind);
    }

    /// Clears placement and selection.
    pub fn cancel(&mut self) {
        self.selection = Selection::None;
    }

    /// Consumes world events and frame input to emit commands.
    ///
    /// The `tower_at` closure should mirror the semantics of the world's
    /// `query::tower_at` helper so the system can identify the clicked tower.
    pub fn handle<F>(
        &mut self,
        events: &[Event],
        input: BuilderInput,
        mut tower_at: F,
        out: &mut Vec<Command>,
    ) where
        F: FnMut(Vec2) -> Option<TowerId>,
    {
        for event in events {
            match event {
                Event::TowerSold { tower, .. } => {
                    if self.selection == Selection::Tower(*tower) {
                        self.selection = Selection::None;
                    }
                }
                Event::GameOver { .. } => self.selection = Selection::None,
                _ => {}
            }
        }

        if input.cancel {
            self.cancel();
        }

        if input.start_wave {
            out.push(Command::StartWave);
        }

        let Some((position, button)) = input.click else {
            return;
        };

        match button {
            PointerButton::Secondary => self.cancel(),
            PointerButton::Primary => match self.selection {
                Selection::Placing(kind) => {
                    if let Some(cell) = geometry::pixel_to_grid(position, self.cell_size) {
                        out.push(Command::PlaceTower { kind, cell });
                    }
                }
                Selection::None | Selection::Tower(_) => {
                    self.selection = tower_at(position).map_or(Selection::None, Selection::Tower);
                }
            },
        }
    }

    /// Emits an upgrade request for the selected tower.
    pub fn upgrade_selected(&self, out: &mut Vec<Command>) {
        if let Selection::Tower(tower) = self.selection {
            out.push(Command::UpgradeTower { tower });
        }
    }

    /// Emits a sale request for the selected tower.
    pub fn sell_selected(&self, out: &mut Vec<Command>) {
        if let Selection::Tower(tower) = self.selection {
            out.push(Command::SellTower { tower });
        }
    }

    /// Emits a targeting change for the selected tower.
    pub fn retarget_selected(&self, mode: TargetingMode, out: &mut Vec<Command>) {
        if let Selection::Tower(tower) = self.selection {
            out.push(Command::SetTargeting { tower, mode });
        }
    }

    /// Emits an ability activation aimed at the provided point.
    pub fn use_ability(&self, kind: AbilityKind, target: Option<Vec2>, out: &mut Vec<Command>) {
        out.push(Command::UseAbility { kind, target });
    }
}
