#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Level editors driven by [`EditCommand`] values.
//!
//! Each editor owns the map it edits together with its tool selection, and
//! keeps an [`EditHistory`] of full snapshots of both. Every mutating command
//! records a snapshot first, so undo restores the tool flags as well as the
//! map. Processing a command appends [`EditEvent`] values describing what
//! changed.
//!
//! [`EditCommand`]: quadcaster_core::EditCommand
//! [`EditEvent`]: quadcaster_core::EditEvent
//! [`EditHistory`]: quadcaster_system_history::EditHistory

mod grid;
mod quadtree;
mod workspace;

pub use grid::{GridEditor, GridEditorState};
pub use quadtree::{QuadtreeEditor, QuadtreeEditorState};
pub use workspace::WorkspaceEditor;
