#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Quadcaster.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! The dependency is therefore declared without default features.
//!
//! The editor toolbar uses Macroquad's immediate-mode UI module. All
//! UI-specific calls live inside the local `ui` module.

mod ui;

use self::ui::{draw_toolbar_ui, ToolbarUiContext};
use anyhow::Result;
use glam::Vec2;
use macroquad::input::{
    is_key_down, is_key_pressed, is_mouse_button_down, is_mouse_button_pressed, mouse_position,
    KeyCode, MouseButton,
};
use quadcaster_core::Motion;
use quadcaster_rendering::{
    Color, Control, EditorView, FrameInput, MapTile, Minimap, PlayView, Presentation,
    RenderingBackend, Scene, Shortcut,
};
use std::time::Duration;

const TOOLBAR_WIDTH: f32 = 190.0;
const STATUS_BAR_HEIGHT: f32 = 28.0;
const VIEWPORT_SHARE: f32 = 0.62;
const PADDING: f32 = 8.0;

/// Tracks toolbar-sourced shortcuts so they can be merged with keyboard input on the next frame.
#[doc(hidden)]
#[derive(Clone, Debug, Default)]
pub struct ToolbarInputState {
    latched: Vec<Shortcut>,
}

impl ToolbarInputState {
    /// Returns the shortcuts requested since the last call and clears the latch
    /// so each press fires only once.
    pub fn take_shortcuts(&mut self) -> Vec<Shortcut> {
        std::mem::take(&mut self.latched)
    }

    /// Records that a toolbar button requested `shortcut` this frame.
    pub fn register(&mut self, shortcut: Shortcut) {
        if !self.latched.contains(&shortcut) {
            self.latched.push(shortcut);
        }
    }
}

/// Edge-triggered shortcuts and held movement keys observed during a single frame.
#[derive(Clone, Debug, Default, PartialEq)]
struct KeyboardShortcuts {
    shortcuts: Vec<Shortcut>,
    motions: Vec<Motion>,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self::from_keys(is_key_pressed, is_key_down)
    }

    fn from_keys<P, H>(pressed: P, held: H) -> Self
    where
        P: Fn(KeyCode) -> bool,
        H: Fn(KeyCode) -> bool,
    {
        let bindings = [
            (KeyCode::Enter, Shortcut::Play),
            (KeyCode::Escape, Shortcut::Exit),
            (KeyCode::S, Shortcut::Save),
            (KeyCode::Z, Shortcut::Undo),
            (KeyCode::Y, Shortcut::Redo),
            (KeyCode::RightBracket, Shortcut::ScaleDown),
            (KeyCode::LeftBracket, Shortcut::ScaleUp),
            (KeyCode::M, Shortcut::SwitchMapKind),
            (KeyCode::T, Shortcut::CycleTool),
            (KeyCode::Tab, Shortcut::CycleMode),
            (KeyCode::B, Shortcut::ToggleBrush),
            (KeyCode::E, Shortcut::ToggleEraser),
            (KeyCode::G, Shortcut::GenerateMaze),
        ];
        let movement = [
            (KeyCode::Up, Motion::Forward),
            (KeyCode::Down, Motion::Backward),
            (KeyCode::Left, Motion::TurnLeft),
            (KeyCode::Right, Motion::TurnRight),
        ];

        Self {
            shortcuts: bindings
                .into_iter()
                .filter(|(key, _)| pressed(*key))
                .map(|(_, shortcut)| shortcut)
                .collect(),
            motions: movement
                .into_iter()
                .filter(|(key, _)| held(*key))
                .map(|(_, motion)| motion)
                .collect(),
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Clone, Copy, Debug)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    window_width: i32,
    window_height: i32,
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self {
            swap_interval: None,
            window_width: 960,
            window_height: 720,
        }
    }
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(mut self, enabled: bool) -> Self {
        self.swap_interval = Some(i32::from(enabled));
        self
    }

    /// Configures the initial window size in pixels.
    #[must_use]
    pub fn with_window_size(mut self, width: i32, height: i32) -> Self {
        self.window_width = width.max(1);
        self.window_height = height.max(1);
        self
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> Control + 'static,
    {
        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: self.window_width,
            window_height: self.window_height,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = self.swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let mut toolbar_input = ToolbarInputState::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                macroquad::window::clear_background(background);

                let screen = Vec2::new(
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );
                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));

                let layout_before = SceneLayout::from_scene(&scene, screen);
                let (cursor_x, cursor_y) = mouse_position();
                let mut shortcuts = keyboard.shortcuts;
                for shortcut in toolbar_input.take_shortcuts() {
                    if !shortcuts.contains(&shortcut) {
                        shortcuts.push(shortcut);
                    }
                }
                let frame_input = gather_frame_input(
                    &scene,
                    &layout_before,
                    Vec2::new(cursor_x, cursor_y),
                    PointerButtons {
                        pressed: is_mouse_button_pressed(MouseButton::Left),
                        held: is_mouse_button_down(MouseButton::Left),
                    },
                    shortcuts,
                    keyboard.motions,
                );

                if update_scene(frame_dt, frame_input, &mut scene) == Control::Exit {
                    break;
                }

                let layout = SceneLayout::from_scene(&scene, screen);
                match &scene {
                    Scene::Editor(view) => {
                        draw_editor(view, &layout);
                        let mut toolbar = macroquad::ui::root_ui();
                        let pressed = draw_toolbar_ui(
                            &mut toolbar,
                            ToolbarUiContext {
                                origin: macroquad::math::Vec2::new(
                                    (screen.x - TOOLBAR_WIDTH).max(0.0),
                                    0.0,
                                ),
                                size: macroquad::math::Vec2::new(TOOLBAR_WIDTH, screen.y),
                                background: to_macroquad_color(Color::from_rgb_u8(38, 38, 44)),
                            },
                        );
                        for shortcut in pressed {
                            toolbar_input.register(shortcut);
                        }
                    }
                    Scene::Play(view) => draw_play(view, &layout),
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Uniform scale and offset that fit a content rectangle into a screen area.
#[derive(Clone, Copy, Debug, PartialEq)]
struct SceneMetrics {
    scale: f32,
    offset: Vec2,
    content: Vec2,
}

impl SceneMetrics {
    fn fit(content: Vec2, area_origin: Vec2, area_size: Vec2) -> Self {
        let scale = if content.x <= f32::EPSILON || content.y <= f32::EPSILON {
            0.0
        } else {
            (area_size.x / content.x).min(area_size.y / content.y).max(0.0)
        };
        let offset = area_origin + (area_size - content * scale).max(Vec2::ZERO) * 0.5;
        Self {
            scale,
            offset,
            content,
        }
    }

    fn to_screen(&self, point: Vec2) -> Vec2 {
        self.offset + point * self.scale
    }

    /// Inverse of [`SceneMetrics::to_screen`], or `None` outside the content.
    fn to_content(&self, screen: Vec2) -> Option<Vec2> {
        if self.scale <= f32::EPSILON {
            return None;
        }
        let point = (screen - self.offset) / self.scale;
        let inside =
            point.x >= 0.0 && point.y >= 0.0 && point.x < self.content.x && point.y < self.content.y;
        inside.then_some(point)
    }
}

/// Screen placement of every part of a scene.
#[derive(Clone, Copy, Debug, PartialEq)]
enum SceneLayout {
    Editor {
        map: SceneMetrics,
        status_origin: Vec2,
    },
    Play {
        viewport: SceneMetrics,
        minimap: SceneMetrics,
    },
}

impl SceneLayout {
    fn from_scene(scene: &Scene, screen: Vec2) -> Self {
        match scene {
            Scene::Editor(view) => {
                let area_origin = Vec2::new(PADDING, STATUS_BAR_HEIGHT + PADDING);
                let area_size = (screen
                    - Vec2::new(TOOLBAR_WIDTH + 2.0 * PADDING, STATUS_BAR_HEIGHT + 2.0 * PADDING))
                .max(Vec2::ZERO);
                Self::Editor {
                    map: SceneMetrics::fit(view.map_size, area_origin, area_size),
                    status_origin: Vec2::new(PADDING, STATUS_BAR_HEIGHT - PADDING),
                }
            }
            Scene::Play(view) => {
                let viewport_height = screen.y * VIEWPORT_SHARE;
                let virtual_screen =
                    Vec2::new(view.screen.width as f32, view.screen.height as f32);
                let minimap_origin = Vec2::new(PADDING, viewport_height + PADDING);
                let minimap_size =
                    (Vec2::new(screen.x, screen.y - viewport_height) - 2.0 * PADDING)
                        .max(Vec2::ZERO);
                Self::Play {
                    viewport: SceneMetrics::fit(
                        virtual_screen,
                        Vec2::ZERO,
                        Vec2::new(screen.x, viewport_height),
                    ),
                    minimap: SceneMetrics::fit(view.minimap.map_size, minimap_origin, minimap_size),
                }
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct PointerButtons {
    pressed: bool,
    held: bool,
}

fn gather_frame_input(
    scene: &Scene,
    layout: &SceneLayout,
    cursor: Vec2,
    buttons: PointerButtons,
    shortcuts: Vec<Shortcut>,
    motions: Vec<Motion>,
) -> FrameInput {
    let mut input = FrameInput {
        shortcuts,
        ..FrameInput::default()
    };

    match (scene, layout) {
        (Scene::Editor(_), SceneLayout::Editor { map, .. }) => {
            input.cursor_map_space = map.to_content(cursor);
            if input.cursor_map_space.is_some() {
                input.primary_pressed = buttons.pressed;
                input.primary_held = buttons.held;
            }
        }
        (Scene::Play(_), _) => input.motions = motions,
        (Scene::Editor(_), SceneLayout::Play { .. }) => {}
    }

    input
}

fn draw_editor(view: &EditorView, layout: &SceneLayout) {
    let SceneLayout::Editor { map, status_origin } = layout else {
        return;
    };

    draw_tiles(&view.tiles, map);
    let outline = Color::from_rgb_u8(30, 30, 30);
    for tile in &view.tiles {
        let origin = map.to_screen(tile.origin);
        let size = tile.size * map.scale;
        macroquad::shapes::draw_rectangle_lines(
            origin.x,
            origin.y,
            size.x,
            size.y,
            1.0,
            to_macroquad_color(outline),
        );
    }

    let player = map.to_screen(view.player);
    macroquad::shapes::draw_circle(
        player.x,
        player.y,
        (map.scale * 0.3).max(3.0),
        to_macroquad_color(Color::from_rgb_u8(0xd0, 0x30, 0x30)),
    );

    let _ = macroquad::text::draw_text(
        &view.status,
        status_origin.x,
        status_origin.y,
        22.0,
        to_macroquad_color(Color::from_rgb_u8(235, 235, 235)),
    );
}

fn draw_play(view: &PlayView, layout: &SceneLayout) {
    let SceneLayout::Play { viewport, minimap } = layout else {
        return;
    };

    let width = view.screen.width as f32;
    let height = view.screen.height as f32;
    fill_rect(viewport, Vec2::ZERO, Vec2::new(width, height / 2.0), view.ceiling);
    fill_rect(
        viewport,
        Vec2::new(0.0, height / 2.0),
        Vec2::new(width, height / 2.0),
        view.floor,
    );

    for column in &view.columns {
        let top = column.top.clamp(0.0, height);
        let bottom = column.bottom.clamp(0.0, height);
        if bottom <= top {
            continue;
        }
        fill_rect(
            viewport,
            Vec2::new(column.index as f32, top),
            Vec2::new(1.0, bottom - top),
            column.color,
        );
    }

    draw_minimap(&view.minimap, minimap);
}

fn draw_minimap(view: &Minimap, metrics: &SceneMetrics) {
    draw_tiles(&view.tiles, metrics);

    let player = metrics.to_screen(view.player);
    let ray_color = to_macroquad_color(view.palette.ray);
    for end in &view.ray_ends {
        let end = metrics.to_screen(*end);
        macroquad::shapes::draw_line(player.x, player.y, end.x, end.y, 1.0, ray_color);
    }
    macroquad::shapes::draw_circle(player.x, player.y, 3.0, to_macroquad_color(view.palette.player));
}

fn draw_tiles(tiles: &[MapTile], metrics: &SceneMetrics) {
    for tile in tiles {
        fill_rect(metrics, tile.origin, tile.size, tile.color);
    }
}

fn fill_rect(metrics: &SceneMetrics, origin: Vec2, size: Vec2, color: Color) {
    let origin = metrics.to_screen(origin);
    let size = size * metrics.scale;
    macroquad::shapes::draw_rectangle(origin.x, origin.y, size.x, size.y, to_macroquad_color(color));
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quadcaster_rendering::{MapPalette, ScreenSize};

    fn editor_scene(map_size: Vec2) -> Scene {
        Scene::Editor(EditorView {
            map_size,
            tiles: Vec::new(),
            player: Vec2::ZERO,
            status: String::new(),
        })
    }

    fn play_scene() -> Scene {
        Scene::Play(PlayView {
            screen: ScreenSize::default(),
            ceiling: Color::from_rgb_u8(0, 0, 0),
            floor: Color::from_rgb_u8(0x22, 0x22, 0x22),
            columns: Vec::new(),
            minimap: Minimap {
                map_size: Vec2::new(8.0, 8.0),
                tiles: Vec::new(),
                player: Vec2::new(3.0, 3.0),
                ray_ends: Vec::new(),
                palette: MapPalette::MINIMAP,
            },
        })
    }

    #[test]
    fn scene_metrics_round_trip_points_inside_content() {
        let metrics = SceneMetrics::fit(
            Vec2::new(8.0, 4.0),
            Vec2::new(10.0, 20.0),
            Vec2::new(400.0, 400.0),
        );

        assert_eq!(metrics.scale, 50.0);
        assert_eq!(metrics.offset, Vec2::new(10.0, 120.0));
        let screen = metrics.to_screen(Vec2::new(2.5, 1.5));
        let content = metrics.to_content(screen).expect("inside content");
        assert!((content - Vec2::new(2.5, 1.5)).length() < 1e-4);
        assert_eq!(metrics.to_content(Vec2::new(5.0, 5.0)), None);
    }

    #[test]
    fn degenerate_content_never_maps_cursor() {
        let metrics = SceneMetrics::fit(Vec2::ZERO, Vec2::ZERO, Vec2::new(100.0, 100.0));
        assert_eq!(metrics.to_content(Vec2::new(1.0, 1.0)), None);
    }

    #[test]
    fn clicks_only_register_over_the_map() {
        let scene = editor_scene(Vec2::new(8.0, 8.0));
        let screen = Vec2::new(800.0, 600.0);
        let layout = SceneLayout::from_scene(&scene, screen);
        let buttons = PointerButtons {
            pressed: true,
            held: true,
        };

        let outside = gather_frame_input(
            &scene,
            &layout,
            Vec2::new(screen.x - 5.0, 5.0),
            buttons,
            Vec::new(),
            Vec::new(),
        );
        assert!(!outside.primary_pressed, "toolbar clicks must not edit the map");
        assert_eq!(outside.cursor_map_space, None);

        let SceneLayout::Editor { map, .. } = layout else {
            panic!("editor scene must produce an editor layout");
        };
        let inside_cursor = map.to_screen(Vec2::new(1.5, 2.5));
        let inside = gather_frame_input(&scene, &layout, inside_cursor, buttons, Vec::new(), Vec::new());
        assert!(inside.primary_pressed);
        let cursor = inside.cursor_map_space.expect("cursor over the map");
        assert!((cursor - Vec2::new(1.5, 2.5)).length() < 1e-3);
    }

    #[test]
    fn motions_only_reach_the_play_view() {
        let motions = vec![Motion::Forward, Motion::TurnLeft];
        let editor = editor_scene(Vec2::new(8.0, 8.0));
        let play = play_scene();
        let screen = Vec2::new(800.0, 600.0);

        let editor_input = gather_frame_input(
            &editor,
            &SceneLayout::from_scene(&editor, screen),
            Vec2::ZERO,
            PointerButtons::default(),
            Vec::new(),
            motions.clone(),
        );
        let play_input = gather_frame_input(
            &play,
            &SceneLayout::from_scene(&play, screen),
            Vec2::ZERO,
            PointerButtons::default(),
            vec![Shortcut::Exit],
            motions.clone(),
        );

        assert!(editor_input.motions.is_empty());
        assert_eq!(play_input.motions, motions);
        assert!(play_input.pressed(Shortcut::Exit));
    }

    #[test]
    fn play_layout_keeps_viewport_above_minimap() {
        let layout = SceneLayout::from_scene(&play_scene(), Vec2::new(640.0, 800.0));
        let SceneLayout::Play { viewport, minimap } = layout else {
            panic!("play scene must produce a play layout");
        };
        let viewport_bottom = viewport.to_screen(Vec2::new(0.0, 200.0)).y;
        assert!(viewport_bottom <= minimap.offset.y + 1e-3);
        assert_eq!(viewport.scale, 2.0);
    }

    #[test]
    fn key_bindings_map_to_shortcuts_and_motions() {
        let keyboard = KeyboardShortcuts::from_keys(
            |key| matches!(key, KeyCode::Z | KeyCode::Enter),
            |key| matches!(key, KeyCode::Up | KeyCode::Right),
        );

        assert_eq!(keyboard.shortcuts, vec![Shortcut::Play, Shortcut::Undo]);
        assert_eq!(keyboard.motions, vec![Motion::Forward, Motion::TurnRight]);
    }
}
