#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative map state for Quadcaster.
//!
//! A project carries two independent level representations: a uniform
//! [`GridMap`] and a recursively subdivided [`QuadtreeMap`]. Both answer the
//! [`WallQuery`] capability, which is all the ray caster and the play session
//! ever need to know about a level.

mod grid;
mod project;
mod quadtree;
mod scale;

pub use grid::GridMap;
pub use project::{load_or_init, InMemoryProjects, Project, ProjectRepository};
pub use quadtree::{Leaves, QuadCell, QuadtreeMap};
pub use scale::{scale, Scalable};

use quadcaster_core::{MapBounds, MapKind, ScaleDirection, WallQuery};
use thiserror::Error;

/// Structural problems detected while building or loading a map.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MapShapeError {
    /// The grid has no rows or no columns.
    #[error("grid must have at least one row and one column")]
    EmptyGrid,
    /// Row or column counts do not fit the coordinate type.
    #[error("grid dimensions exceed the supported range")]
    TooLarge,
    /// The number of rows disagrees with the declared height.
    #[error("expected {expected} rows but found {actual}")]
    RowCount {
        /// Declared height.
        expected: u32,
        /// Rows actually present.
        actual: usize,
    },
    /// A row's length disagrees with the declared width.
    #[error("row {row} has {actual} cells but the grid is {expected} wide")]
    RowWidth {
        /// Index of the offending row.
        row: usize,
        /// Declared width.
        expected: u32,
        /// Cells actually present.
        actual: usize,
    },
    /// A subdivided quadtree node does not carry exactly four children.
    #[error("subdivided cell has {count} children, expected 4")]
    ChildCount {
        /// Children actually present.
        count: usize,
    },
}

/// Playable level: whichever map representation the project has active.
#[derive(Clone, Debug, PartialEq)]
pub enum Level {
    /// Uniform occupancy grid.
    Grid(GridMap),
    /// Recursively subdivided quadtree.
    Quadtree(QuadtreeMap),
}

impl Level {
    /// Representation carried by the level.
    #[must_use]
    pub const fn kind(&self) -> MapKind {
        match self {
            Self::Grid(_) => MapKind::Grid,
            Self::Quadtree(_) => MapKind::Quadtree,
        }
    }

    /// Authored player start.
    #[must_use]
    pub const fn player(&self) -> (f64, f64) {
        match self {
            Self::Grid(grid) => grid.player(),
            Self::Quadtree(tree) => tree.player(),
        }
    }

    /// Resolution doublings applied since authoring.
    #[must_use]
    pub const fn scale_level(&self) -> u32 {
        match self {
            Self::Grid(grid) => grid.scale_level(),
            Self::Quadtree(tree) => tree.scale_level(),
        }
    }
}

impl WallQuery for Level {
    fn bounds(&self) -> MapBounds {
        match self {
            Self::Grid(grid) => grid.bounds(),
            Self::Quadtree(tree) => tree.bounds(),
        }
    }

    fn is_wall(&self, x: f64, y: f64) -> bool {
        match self {
            Self::Grid(grid) => grid.is_wall(x, y),
            Self::Quadtree(tree) => tree.is_wall(x, y),
        }
    }
}

impl Scalable for Level {
    fn scale_level(&self) -> u32 {
        Level::scale_level(self)
    }

    fn rescale(&mut self, direction: ScaleDirection) {
        match self {
            Self::Grid(grid) => grid.rescale(direction),
            Self::Quadtree(tree) => tree.rescale(direction),
        }
    }
}
