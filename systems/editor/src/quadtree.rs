use log::debug;
use quadcaster_core::{
    EditCommand, EditEvent, PlacingType, QuadCellType, QuadMode, ScaleDirection,
};
use quadcaster_system_history::EditHistory;
use quadcaster_world::{scale, QuadtreeMap};

/// Everything the quadtree editor can undo: the tree and the mode selection.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QuadtreeEditorState {
    /// Map being edited.
    pub map: QuadtreeMap,
    /// What a click does.
    pub mode: QuadMode,
    /// What a click places while in [`QuadMode::Place`].
    pub placing: PlacingType,
}

/// Editor for quadtree levels.
#[derive(Clone, Debug, Default)]
pub struct QuadtreeEditor {
    state: QuadtreeEditorState,
    history: EditHistory<QuadtreeEditorState>,
}

impl QuadtreeEditor {
    /// Creates an editor for `map` in subdivide mode with an empty history.
    #[must_use]
    pub fn new(map: QuadtreeMap) -> Self {
        Self {
            state: QuadtreeEditorState {
                map,
                ..QuadtreeEditorState::default()
            },
            history: EditHistory::new(),
        }
    }

    /// Current editor state.
    #[must_use]
    pub const fn state(&self) -> &QuadtreeEditorState {
        &self.state
    }

    /// Map being edited.
    #[must_use]
    pub const fn map(&self) -> &QuadtreeMap {
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
    /// Commands addressed to the grid editor are ignored.
    pub fn apply(&mut self, command: EditCommand, out: &mut Vec<EditEvent>) {
        match command {
            EditCommand::QuadClick { x, y } => {
                self.history.record(&self.state);
                self.click(x, y, out);
            }
            EditCommand::SelectQuadMode { mode } => {
                self.history.record(&self.state);
                self.state.mode = mode;
                out.push(EditEvent::QuadModeChanged { mode });
            }
            EditCommand::SelectPlacingType { placing } => {
                self.history.record(&self.state);
                self.state.placing = placing;
                out.push(EditEvent::PlacingTypeChanged { placing });
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
            EditCommand::GridCellAction { .. }
            | EditCommand::SelectGridTool { .. }
            | EditCommand::SetBrush { .. }
            | EditCommand::SetEraser { .. }
            | EditCommand::GenerateMaze { .. }
            | EditCommand::SwitchMapKind { .. } => {}
        }
    }

    fn click(&mut self, x: f64, y: f64, out: &mut Vec<EditEvent>) {
        let map = &mut self.state.map;
        match (self.state.mode, self.state.placing) {
            (QuadMode::Subdivide, _) => {
                if let Some(rect) = map.subdivide_at(x, y) {
                    debug!("subdivided {rect:?}");
                    out.push(EditEvent::CellSubdivided { rect });
                }
            }
            (QuadMode::Place, PlacingType::Wall) => {
                if let Some((rect, cell_type)) = map.toggle_wall_at(x, y) {
                    out.push(EditEvent::QuadCellChanged { rect, cell_type });
                }
            }
            (QuadMode::Place, PlacingType::Player) => {
                let rect = map.place_player(x, y);
                let (player_x, player_y) = map.player();
                debug!("player placed in {rect:?}");
                out.push(EditEvent::QuadCellChanged {
                    rect,
                    cell_type: QuadCellType::Player,
                });
                out.push(EditEvent::PlayerPlaced {
                    x: player_x,
                    y: player_y,
                });
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
        debug!("quadtree scaled {direction:?} to level {scale_level}");
        out.push(EditEvent::MapScaled {
            direction,
            scale_level,
        });
    }
}
