#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Quadcaster adapters.
//!
//! Scenes are plain data: coloured rectangles in map units for the editor and
//! minimap, and one wall slice per screen column for the first-person view.
//! Backends only rasterise what a [`Scene`] describes.

mod map_view;
mod projection;

pub use map_view::{level_tiles, minimap, MapPalette, MapTile, Minimap};
pub use projection::{
    project_columns, BrickTexture, DistanceShade, ScreenSize, TextureSampler, WallColumn,
};

use anyhow::Result as AnyResult;
use glam::Vec2;
use quadcaster_core::Motion;
use std::time::Duration;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);
        self.map_channels(|channel| channel + (1.0 - channel) * amount)
    }

    /// Returns a new color darkened towards black by the provided amount.
    #[must_use]
    pub fn darken(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);
        self.map_channels(|channel| channel * (1.0 - amount))
    }

    fn map_channels<F>(self, f: F) -> Self
    where
        F: Fn(f32) -> f32,
    {
        Self {
            red: f(self.red),
            green: f(self.green),
            blue: f(self.blue),
            alpha: self.alpha,
        }
    }
}

/// Discrete requests recognised by backends, independent of the key bound to them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shortcut {
    /// Enter play mode from the editor.
    Play,
    /// Leave the current view.
    Exit,
    /// Persist the project.
    Save,
    /// Undo the last edit.
    Undo,
    /// Redo the last undone edit.
    Redo,
    /// Double the map resolution.
    ScaleDown,
    /// Halve the map resolution.
    ScaleUp,
    /// Swap between the grid and quadtree editors.
    SwitchMapKind,
    /// Cycle the grid tool or the quadtree placing type.
    CycleTool,
    /// Toggle between quadtree subdivide and place modes.
    CycleMode,
    /// Toggle brush painting.
    ToggleBrush,
    /// Toggle erasing.
    ToggleEraser,
    /// Fill the grid randomly.
    GenerateMaze,
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Movement keys held on this frame.
    pub motions: Vec<Motion>,
    /// Shortcuts pressed on this frame.
    pub shortcuts: Vec<Shortcut>,
    /// Cursor position in map units when it hovers the edited map.
    pub cursor_map_space: Option<Vec2>,
    /// Whether the primary button was pressed on this frame.
    pub primary_pressed: bool,
    /// Whether the primary button is held down.
    pub primary_held: bool,
}

impl FrameInput {
    /// Reports whether the shortcut was pressed on this frame.
    #[must_use]
    pub fn pressed(&self, shortcut: Shortcut) -> bool {
        self.shortcuts.contains(&shortcut)
    }
}

/// Editor canvas: the edited map drawn as coloured tiles in map units.
#[derive(Clone, Debug, PartialEq)]
pub struct EditorView {
    /// Extent of the map in map units.
    pub map_size: Vec2,
    /// Cells or leaves to draw.
    pub tiles: Vec<MapTile>,
    /// Player start in map units.
    pub player: Vec2,
    /// Single-line description of the active tool and history.
    pub status: String,
}

/// First-person view together with its minimap.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayView {
    /// Virtual screen the wall columns are expressed in.
    pub screen: ScreenSize,
    /// Color of the upper half of the screen.
    pub ceiling: Color,
    /// Color of the lower half of the screen.
    pub floor: Color,
    /// One wall slice per ray, left to right.
    pub columns: Vec<WallColumn>,
    /// Top-down overview of the level.
    pub minimap: Minimap,
}

/// Content presented on a frame.
#[derive(Clone, Debug, PartialEq)]
pub enum Scene {
    /// Level editing canvas.
    Editor(EditorView),
    /// First-person exploration.
    Play(PlayView),
}

/// Outcome of a scene update telling the backend whether to keep scheduling frames.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Control {
    /// Render the scene and schedule another frame.
    #[default]
    Continue,
    /// Stop the loop; no further updates are made.
    Exit,
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene shown before the first update.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Quadcaster scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until the update closure requests an exit.
    ///
    /// The `update_scene` closure receives the frame delta and the input
    /// captured by the adapter, and may replace the scene before it is drawn.
    /// Once it returns [`Control::Exit`] the backend stops calling it.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> Control + 'static;
}
