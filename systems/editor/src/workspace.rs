use log::{debug, info};
use quadcaster_core::{EditCommand, EditEvent, MapKind};
use quadcaster_world::{Level, Project};

use crate::{GridEditor, QuadtreeEditor};

/// Both editors of a project plus the representation currently in use.
#[derive(Clone, Debug, Default)]
pub struct WorkspaceEditor {
    grid: GridEditor,
    quadtree: QuadtreeEditor,
    active: MapKind,
}

impl WorkspaceEditor {
    /// Opens editors on both maps of the project.
    #[must_use]
    pub fn from_project(project: Project) -> Self {
        let Project {
            grid_map,
            quadtree_map,
            active_map_kind,
        } = project;
        info!("opening workspace with the {} editor", active_map_kind.as_str());
        Self {
            grid: GridEditor::new(grid_map),
            quadtree: QuadtreeEditor::new(quadtree_map),
            active: active_map_kind,
        }
    }

    /// Representation currently edited.
    #[must_use]
    pub const fn active_kind(&self) -> MapKind {
        self.active
    }

    /// Grid editor, active or not.
    #[must_use]
    pub const fn grid(&self) -> &GridEditor {
        &self.grid
    }

    /// Quadtree editor, active or not.
    #[must_use]
    pub const fn quadtree(&self) -> &QuadtreeEditor {
        &self.quadtree
    }

    /// Routes a command to the active editor, or switches editors.
    pub fn apply(&mut self, command: EditCommand, out: &mut Vec<EditEvent>) {
        if let EditCommand::SwitchMapKind { kind } = command {
            if kind != self.active {
                debug!("switching to the {} editor", kind.as_str());
                self.active = kind;
                out.push(EditEvent::MapKindChanged { kind });
            }
            return;
        }

        match self.active {
            MapKind::Grid => self.grid.apply(command, out),
            MapKind::Quadtree => self.quadtree.apply(command, out),
        }
    }

    /// Owned snapshot of both maps, ready to be saved.
    #[must_use]
    pub fn project(&self) -> Project {
        Project {
            grid_map: self.grid.map().clone(),
            quadtree_map: self.quadtree.map().clone(),
            active_map_kind: self.active,
        }
    }

    /// Owned copy of the active map, ready to be played.
    #[must_use]
    pub fn level(&self) -> Level {
        match self.active {
            MapKind::Grid => Level::Grid(self.grid.map().clone()),
            MapKind::Quadtree => Level::Quadtree(self.quadtree.map().clone()),
        }
    }
}
