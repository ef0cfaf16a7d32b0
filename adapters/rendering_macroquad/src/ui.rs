//! Immediate-mode UI helpers for the Macroquad rendering backend.
//!
//! This module hosts all uses of `macroquad::ui` so the rest of the adapter can
//! remain agnostic of Macroquad's UI types.

use macroquad::{
    color::{Color, WHITE},
    math::{RectOffset, Vec2},
    ui::{hash, Ui},
};
use quadcaster_rendering::Shortcut;

/// Buttons offered by the editor toolbar, top to bottom.
const TOOLBAR_BUTTONS: [(&str, Shortcut); 13] = [
    ("Play [Enter]", Shortcut::Play),
    ("Save [S]", Shortcut::Save),
    ("Undo [Z]", Shortcut::Undo),
    ("Redo [Y]", Shortcut::Redo),
    ("Finer grid []]", Shortcut::ScaleDown),
    ("Coarser grid [[]", Shortcut::ScaleUp),
    ("Switch map [M]", Shortcut::SwitchMapKind),
    ("Cycle tool [T]", Shortcut::CycleTool),
    ("Cycle mode [Tab]", Shortcut::CycleMode),
    ("Brush [B]", Shortcut::ToggleBrush),
    ("Eraser [E]", Shortcut::ToggleEraser),
    ("Random maze [G]", Shortcut::GenerateMaze),
    ("Quit [Esc]", Shortcut::Exit),
];

/// Snapshot of the toolbar's layout for the current frame.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ToolbarUiContext {
    /// Top-left corner of the toolbar in screen coordinates.
    pub origin: Vec2,
    /// Toolbar dimensions in screen space.
    pub size: Vec2,
    /// Background colour applied to the window skin.
    pub background: Color,
}

/// Renders the editor toolbar and returns the shortcuts whose buttons were pressed.
pub(crate) fn draw_toolbar_ui(ui: &mut Ui, context: ToolbarUiContext) -> Vec<Shortcut> {
    let mut skin = ui.default_skin();
    skin.margin = 0.0;

    let window_style = ui
        .style_builder()
        .color(context.background)
        .color_hovered(context.background)
        .color_clicked(context.background)
        .color_selected(context.background)
        .color_selected_hovered(context.background)
        .color_inactive(context.background)
        .text_color(WHITE)
        .margin(RectOffset::new(12.0, 12.0, 12.0, 12.0))
        .build();
    skin.window_style = window_style;

    let button_style = ui
        .style_builder()
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .color(Color::from_rgba(70, 70, 70, 255))
        .color_hovered(Color::from_rgba(96, 96, 96, 255))
        .color_clicked(Color::from_rgba(56, 56, 56, 255))
        .margin(RectOffset::new(0.0, 0.0, 6.0, 6.0))
        .build();
    skin.button_style = button_style;

    ui.push_skin(&skin);

    let mut pressed = Vec::new();
    let _ = ui.window(hash!("editor_toolbar"), context.origin, context.size, |ui| {
        for (label, shortcut) in TOOLBAR_BUTTONS {
            if ui.button(None, label) {
                pressed.push(shortcut);
            }
        }
    });

    ui.pop_skin();

    pressed
}
