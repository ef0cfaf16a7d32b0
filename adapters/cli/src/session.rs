//! Editor and play orchestration driven by the rendering backend's frame loop.

use std::{fmt::Display, time::Duration};

use anyhow::Result;
use glam::Vec2;
use log::{debug, error, info};
use quadcaster_core::{
    CellCoord, EditCommand, EditEvent, GridTool, MapKind, PlacingType, QuadMode, ScaleDirection,
    WallQuery,
};
use quadcaster_rendering::{
    level_tiles, minimap, project_columns, BrickTexture, Color, Control, DistanceShade,
    EditorView, FrameInput, MapPalette, PlayView, Presentation, RenderingBackend, Scene,
    ScreenSize, Shortcut, TextureSampler,
};
use quadcaster_system_editor::WorkspaceEditor;
use quadcaster_system_movement::{MovementSettings, PlaySession};
use quadcaster_system_raycaster::{CasterSettings, RayCaster};
use quadcaster_world::{Project, ProjectRepository};

/// Wall probability used when a maze is generated without an explicit one.
pub(crate) const DEFAULT_WALL_PROBABILITY: f64 = 0.3;

/// Rendering tunables shared by every frame of a session.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct ViewOptions {
    pub caster: CasterSettings,
    pub movement: MovementSettings,
    pub view_height: u32,
    pub bricks: bool,
}

/// How the session was started, which decides what `Escape` does while playing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Entry {
    Editor,
    PlayOnly,
}

#[derive(Clone, Debug)]
enum Mode {
    Editing,
    Playing(PlaySession),
}

/// One open project, either being edited or explored.
pub(crate) struct Session<R> {
    name: String,
    repository: R,
    workspace: WorkspaceEditor,
    mode: Mode,
    entry: Entry,
    caster: RayCaster,
    movement: MovementSettings,
    screen: ScreenSize,
    sampler: Box<dyn TextureSampler>,
    drag_cell: Option<CellCoord>,
    notice: String,
    dirty: bool,
}

impl<R> Session<R>
where
    R: ProjectRepository,
    R::Error: Display,
{
    /// Opens the project in the editor.
    pub(crate) fn edit(name: &str, repository: R, project: Project, options: ViewOptions) -> Self {
        Self::with_entry(name, repository, project, options, Entry::Editor)
    }

    /// Opens the project directly in play mode; leaving play ends the session.
    pub(crate) fn play(name: &str, repository: R, project: Project, options: ViewOptions) -> Self {
        Self::with_entry(name, repository, project, options, Entry::PlayOnly)
    }

    fn with_entry(
        name: &str,
        repository: R,
        project: Project,
        options: ViewOptions,
        entry: Entry,
    ) -> Self {
        let caster = RayCaster::new(options.caster);
        let screen = ScreenSize::new(
            u32::try_from(caster.settings().num_rays).unwrap_or(u32::MAX),
            options.view_height.max(1),
        );
        let sampler: Box<dyn TextureSampler> = if options.bricks {
            Box::new(BrickTexture::default())
        } else {
            Box::new(DistanceShade::default())
        };

        let mut session = Self {
            name: name.to_owned(),
            repository,
            workspace: WorkspaceEditor::from_project(project),
            mode: Mode::Editing,
            entry,
            caster,
            movement: options.movement,
            screen,
            sampler,
            drag_cell: None,
            notice: String::new(),
            dirty: true,
        };
        if entry == Entry::PlayOnly {
            session.start_play();
        }
        session
    }

    /// Scene matching the current mode.
    pub(crate) fn scene(&self) -> Scene {
        match &self.mode {
            Mode::Editing => Scene::Editor(self.editor_view()),
            Mode::Playing(play) => Scene::Play(self.play_view(play)),
        }
    }

    /// Hands the session to `backend` and blocks until the window closes.
    pub(crate) fn run<B>(mut self, backend: B) -> Result<()>
    where
        B: RenderingBackend,
        R: 'static,
    {
        let presentation = Presentation::new(
            format!("Quadcaster - {}", self.name),
            Color::from_rgb_u8(0, 0, 0),
            self.scene(),
        );
        self.dirty = false;
        backend.run(presentation, move |dt, input, scene| {
            self.update(dt, input, scene)
        })
    }

    /// Applies one frame of input and refreshes `scene` when something changed.
    pub(crate) fn update(&mut self, dt: Duration, input: FrameInput, scene: &mut Scene) -> Control {
        let control = match self.mode {
            Mode::Editing => self.update_editor(&input),
            Mode::Playing(_) => self.update_play(dt, &input),
        };
        if control == Control::Exit {
            return control;
        }

        match &self.mode {
            Mode::Playing(play) => *scene = Scene::Play(self.play_view(play)),
            Mode::Editing if self.dirty => *scene = Scene::Editor(self.editor_view()),
            Mode::Editing => {}
        }
        self.dirty = false;
        Control::Continue
    }

    fn update_editor(&mut self, input: &FrameInput) -> Control {
        let mut events = Vec::new();
        for shortcut in &input.shortcuts {
            match shortcut {
                Shortcut::Exit => {
                    info!("closing editor for '{}'", self.name);
                    return Control::Exit;
                }
                Shortcut::Play => {
                    self.start_play();
                    return Control::Continue;
                }
                Shortcut::Save => self.save(),
                other => {
                    if let Some(command) = self.shortcut_command(*other) {
                        self.workspace.apply(command, &mut events);
                    }
                }
            }
        }

        self.apply_pointer(input, &mut events);

        if !events.is_empty() {
            self.note_events(&events);
            self.dirty = true;
        }
        Control::Continue
    }

    fn shortcut_command(&self, shortcut: Shortcut) -> Option<EditCommand> {
        let grid = self.workspace.grid().state();
        let quadtree = self.workspace.quadtree().state();
        let active = self.workspace.active_kind();

        let command = match (shortcut, active) {
            (Shortcut::Undo, _) => EditCommand::Undo,
            (Shortcut::Redo, _) => EditCommand::Redo,
            (Shortcut::ScaleDown, _) => EditCommand::Scale {
                direction: ScaleDirection::Down,
            },
            (Shortcut::ScaleUp, _) => EditCommand::Scale {
                direction: ScaleDirection::Up,
            },
            (Shortcut::SwitchMapKind, MapKind::Grid) => EditCommand::SwitchMapKind {
                kind: MapKind::Quadtree,
            },
            (Shortcut::SwitchMapKind, MapKind::Quadtree) => EditCommand::SwitchMapKind {
                kind: MapKind::Grid,
            },
            (Shortcut::CycleTool, MapKind::Grid) => EditCommand::SelectGridTool {
                tool: match grid.tool {
                    GridTool::Wall => GridTool::Player,
                    GridTool::Player => GridTool::Wall,
                },
            },
            (Shortcut::CycleTool, MapKind::Quadtree) => EditCommand::SelectPlacingType {
                placing: match quadtree.placing {
                    PlacingType::Wall => PlacingType::Player,
                    PlacingType::Player => PlacingType::Wall,
                },
            },
            (Shortcut::CycleMode, MapKind::Quadtree) => EditCommand::SelectQuadMode {
                mode: match quadtree.mode {
                    QuadMode::Subdivide => QuadMode::Place,
                    QuadMode::Place => QuadMode::Subdivide,
                },
            },
            (Shortcut::ToggleBrush, MapKind::Grid) => EditCommand::SetBrush {
                enabled: !grid.brush,
            },
            (Shortcut::ToggleEraser, MapKind::Grid) => EditCommand::SetEraser {
                enabled: !grid.eraser,
            },
            (Shortcut::GenerateMaze, MapKind::Grid) => EditCommand::GenerateMaze {
                wall_probability: DEFAULT_WALL_PROBABILITY,
                seed: rand::random(),
            },
            _ => return None,
        };
        Some(command)
    }

    fn apply_pointer(&mut self, input: &FrameInput, events: &mut Vec<EditEvent>) {
        let Some(cursor) = input.cursor_map_space else {
            self.drag_cell = None;
            return;
        };
        if !input.primary_held && !input.primary_pressed {
            self.drag_cell = None;
            return;
        }

        match self.workspace.active_kind() {
            MapKind::Grid => {
                let state = self.workspace.grid().state();
                let painting = state.tool == GridTool::Wall && (state.brush || state.eraser);
                let cell = cursor_cell(cursor);
                let fresh_drag = painting && input.primary_held && self.drag_cell != Some(cell);
                if input.primary_pressed || fresh_drag {
                    self.drag_cell = Some(cell);
                    self.workspace
                        .apply(EditCommand::GridCellAction { cell }, events);
                }
            }
            MapKind::Quadtree => {
                if input.primary_pressed {
                    self.workspace.apply(
                        EditCommand::QuadClick {
                            x: f64::from(cursor.x),
                            y: f64::from(cursor.y),
                        },
                        events,
                    );
                }
            }
        }
    }

    fn note_events(&mut self, events: &[EditEvent]) {
        for event in events {
            debug!("editor event: {event:?}");
            let notice = match event {
                EditEvent::ScaleRejected => "already at the authored resolution".to_owned(),
                EditEvent::MazeGenerated { walls } => format!("generated {walls} walls"),
                EditEvent::MapScaled { scale_level, .. } => format!("scale level {scale_level}"),
                EditEvent::MapKindChanged { kind } => format!("editing the {} map", kind.as_str()),
                EditEvent::Undone => "undone".to_owned(),
                EditEvent::Redone => "redone".to_owned(),
                _ => continue,
            };
            self.notice = notice;
        }
    }

    fn save(&mut self) {
        match self.repository.save(&self.name, &self.workspace.project()) {
            Ok(()) => self.notice = format!("saved '{}'", self.name),
            Err(err) => {
                error!("failed to save '{}': {err}", self.name);
                self.notice = format!("save failed: {err}");
            }
        }
        self.dirty = true;
    }

    fn start_play(&mut self) {
        let level = self.workspace.level();
        info!(
            "playing '{}' on the {} map",
            self.name,
            level.kind().as_str()
        );
        self.mode = Mode::Playing(PlaySession::new(level, self.movement));
        self.drag_cell = None;
    }

    fn update_play(&mut self, dt: Duration, input: &FrameInput) -> Control {
        if input.pressed(Shortcut::Exit) {
            return match self.entry {
                Entry::PlayOnly => {
                    info!("leaving '{}'", self.name);
                    Control::Exit
                }
                Entry::Editor => {
                    debug!("returning to the editor");
                    self.mode = Mode::Editing;
                    self.dirty = true;
                    Control::Continue
                }
            };
        }

        if let Mode::Playing(play) = &mut self.mode {
            let mut events = Vec::new();
            for motion in &input.motions {
                play.advance(*motion, dt, &mut events);
            }
        }
        Control::Continue
    }

    fn editor_view(&self) -> EditorView {
        let level = self.workspace.level();
        let bounds = level.bounds();
        let (player_x, player_y) = level.player();
        EditorView {
            map_size: Vec2::new(bounds.width() as f32, bounds.height() as f32),
            tiles: level_tiles(&level, &MapPalette::EDITOR),
            player: Vec2::new(player_x as f32, player_y as f32),
            status: self.status_line(),
        }
    }

    fn status_line(&self) -> String {
        let tool = match self.workspace.active_kind() {
            MapKind::Grid => {
                let state = self.workspace.grid().state();
                let stroke = match (state.brush, state.eraser) {
                    (true, _) => " brush",
                    (_, true) => " eraser",
                    _ => "",
                };
                format!("grid {:?}{stroke}", state.tool)
            }
            MapKind::Quadtree => {
                let state = self.workspace.quadtree().state();
                match state.mode {
                    QuadMode::Subdivide => "quadtree subdivide".to_owned(),
                    QuadMode::Place => format!("quadtree place {:?}", state.placing),
                }
            }
        };
        let (can_undo, can_redo) = match self.workspace.active_kind() {
            MapKind::Grid => (
                self.workspace.grid().can_undo(),
                self.workspace.grid().can_redo(),
            ),
            MapKind::Quadtree => (
                self.workspace.quadtree().can_undo(),
                self.workspace.quadtree().can_redo(),
            ),
        };
        let history = match (can_undo, can_redo) {
            (true, true) => " | undo redo",
            (true, false) => " | undo",
            (false, true) => " | redo",
            (false, false) => "",
        };

        let mut status = format!("{} | {tool}{history}", self.name);
        if !self.notice.is_empty() {
            status.push_str(" | ");
            status.push_str(&self.notice);
        }
        status
    }

    fn play_view(&self, play: &PlaySession) -> PlayView {
        let pose = play.pose();
        let rays = self.caster.cast(pose, play.level());
        PlayView {
            screen: self.screen,
            ceiling: Color::from_rgb_u8(0x00, 0x00, 0x00),
            floor: Color::from_rgb_u8(0x22, 0x22, 0x22),
            columns: project_columns(&rays, self.screen, self.sampler.as_ref()),
            minimap: minimap(play.level(), pose, &rays),
        }
    }
}

fn cursor_cell(cursor: Vec2) -> CellCoord {
    CellCoord::new(cursor.x.max(0.0).floor() as u32, cursor.y.max(0.0).floor() as u32)
}
