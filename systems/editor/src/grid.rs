use log::debug;
use quadcaster_core::{CellCoord, EditCommand, EditEvent, GridTool, ScaleDirection};
use quadcaster_system_history::EditHistory;
use quadcaster_world::{scale, GridMap};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Everything the grid editor can undo: the map and the tool selection.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GridEditorState {
    /// Map being edited.
    pub map: GridMap,
    /// Tool applied by cell actions.
    pub tool: GridTool,
    /// Cell actions paint walls.
    pub brush: bool,
    /// Cell actions erase walls.
    pub eraser: bool,
}

/// Editor for uniform grids.
#[derive(Clone, Debug, Default)]
pub struct GridEditor {
    state: GridEditorState,
    history: EditHistory<GridEditorState>,
}

impl GridEditor {
    /// Creates an editor for `map` with the wall tool selected and an empty history.
    #[must_use]
    pub fn new(map: GridMap) -> Self {
        Self {
            state: GridEditorState {
                map,
                ..GridEditorState::default()
            },
            history: EditHistory::new(),
        }
    }

    /// Current editor state.
    #[must_use]
    pub const fn state(&self) -> &GridEditorState {
        &self.state
    }

    /// Map being edited.
    #[must_use]
    pub const fn map(&self) -> &GridMap {
        &self.state.map
    }

    /// Reports whether an undo would change anything.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Reports whether a redo would change anything.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Applies a command, appending the resulting events to `out`.
    ///
    /// Commands addressed to the quadtree editor are ignored.
    pub fn apply(&mut self, command: EditCommand, out: &mut Vec<EditEvent>) {
        match command {
            EditCommand::GridCellAction { cell } => {
                self.history.record(&self.state);
                self.cell_action(cell, out);
            }
            EditCommand::SelectGridTool { tool } => {
                self.history.record(&self.state);
                self.state.tool = tool;
                out.push(EditEvent::GridToolChanged { tool });
            }
            EditCommand::SetBrush { enabled } => {
                self.history.record(&self.state);
                self.state.brush = enabled;
                if enabled {
                    self.state.eraser = false;
                }
                out.push(self.brush_event());
            }
            EditCommand::SetEraser { enabled } => {
                self.history.record(&self.state);
                self.state.eraser = enabled;
                if enabled {
                    self.state.brush = false;
                }
                out.push(self.brush_event());
            }
            EditCommand::GenerateMaze {
                wall_probability,
                seed,
            } => {
                self.history.record(&self.state);
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                let walls = self
                    .state
                    .map
                    .generate_random_maze(wall_probability, &mut rng);
                debug!("generated maze with {walls} walls from seed {seed:#x}");
                out.push(EditEvent::MazeGenerated { walls });
            }
            EditCommand::Scale { direction } => self.rescale(direction, out),
            EditCommand::Undo => {
                if self.history.undo(&mut self.state) {
                    out.push(EditEvent::Undone);
                }
            }
            EditCommand::Redo => {
                if self.history.redo(&mut self.state) {
                    out.push(EditEvent::Redone);
                }
            }
            EditCommand::QuadClick { .. }
            | EditCommand::SelectQuadMode { .. }
            | EditCommand::SelectPlacingType { .. }
            | EditCommand::SwitchMapKind { .. } => {}
        }
    }

    fn cell_action(&mut self, cell: CellCoord, out: &mut Vec<EditEvent>) {
        let map = &mut self.state.map;
        match self.state.tool {
            GridTool::Wall => {
                let changed = match (self.state.brush, self.state.eraser) {
                    (true, false) => map.paint_wall(cell),
                    (false, true) => map.erase_wall(cell),
                    _ => map.toggle_wall(cell),
                };
                if let Some(state) = changed {
                    out.push(EditEvent::GridCellChanged { cell, state });
                }
            }
            GridTool::Player => {
                if map.cell(cell).is_none() {
                    debug!("ignoring player placement outside the grid at {cell:?}");
                    return;
                }
                let x = f64::from(cell.column());
                let y = f64::from(cell.row());
                map.set_player(x, y);
                out.push(EditEvent::PlayerPlaced { x, y });
            }
        }
    }

    fn rescale(&mut self, direction: ScaleDirection, out: &mut Vec<EditEvent>) {
        if direction == ScaleDirection::Up && self.state.map.scale_level() == 0 {
            out.push(EditEvent::ScaleRejected);
            return;
        }
        self.history.record(&self.state);
        let _ = scale(&mut self.state.map, direction);
        let scale_level = self.state.map.scale_level();
        debug!(
            "grid scaled {direction:?} to {}x{} at level {scale_level}",
            self.state.map.width(),
            self.state.map.height()
        );
        out.push(EditEvent::MapScaled {
            direction,
            scale_level,
        });
    }

    const fn brush_event(&self) -> EditEvent {
        EditEvent::BrushModeChanged {
            brush: self.state.brush,
            eraser: self.state.eraser,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quadcaster_core::CellState;

    #[test]
    fn out_of_bounds_player_placement_changes_nothing() {
        let mut editor = GridEditor::new(GridMap::new(4, 4));
        let mut events = Vec::new();

        editor.apply(
            EditCommand::SelectGridTool {
                tool: GridTool::Player,
            },
            &mut events,
        );
        events.clear();
        editor.apply(
            EditCommand::GridCellAction {
                cell: CellCoord::new(9, 9),
            },
            &mut events,
        );

        assert!(events.is_empty());
        assert_eq!(editor.map().player(), (1.0, 1.0));
    }

    #[test]
    fn brush_and_eraser_both_off_toggles() {
        let mut editor = GridEditor::default();
        let mut events = Vec::new();
        let cell = CellCoord::new(0, 0);

        editor.apply(EditCommand::GridCellAction { cell }, &mut events);
        editor.apply(EditCommand::GridCellAction { cell }, &mut events);

        assert_eq!(
            events,
            vec![
                EditEvent::GridCellChanged {
                    cell,
                    state: CellState::Wall
                },
                EditEvent::GridCellChanged {
                    cell,
                    state: CellState::Empty
                },
            ]
        );
    }
}
