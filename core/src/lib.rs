#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Quadcaster workspace.
//!
//! This crate defines the vocabulary that connects the map model, the pure
//! systems and the adapters. Editors receive [`EditCommand`] values describing
//! desired mutations, apply them to the authoritative maps and broadcast
//! [`EditEvent`] values describing what changed. The play view submits
//! [`Motion`] commands and observes [`PlayEvent`] values. Every map kind exposes
//! the [`WallQuery`] capability so ray casting and collision are written once.

use serde::{Deserialize, Serialize};

/// Side length of the square footprint a player occupies, in map units.
pub const PLAYER_FOOTPRINT: f64 = 1.0;

/// Occupancy of a single grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellState {
    /// Open floor the player may walk through.
    #[default]
    Empty,
    /// Solid wall that blocks movement and rays.
    Wall,
}

impl CellState {
    /// Reports whether the cell blocks movement.
    #[must_use]
    pub const fn is_wall(self) -> bool {
        matches!(self, Self::Wall)
    }

    /// Returns the opposite occupancy.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Empty => Self::Wall,
            Self::Wall => Self::Empty,
        }
    }
}

/// Type carried by a quadtree leaf.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuadCellType {
    /// Open floor.
    #[default]
    Empty,
    /// Solid wall.
    Wall,
    /// Leaf marking the authored player start.
    Player,
}

/// Discriminates the two map representations a project carries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapKind {
    /// Uniform boolean occupancy grid.
    #[default]
    Grid,
    /// Recursively subdivided quadtree.
    Quadtree,
}

impl MapKind {
    /// Stable lowercase identifier used in transfer strings and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::Quadtree => "quadtree",
        }
    }

    /// Parses the identifier produced by [`MapKind::as_str`].
    #[must_use]
    pub fn from_identifier(value: &str) -> Option<Self> {
        match value {
            "grid" => Some(Self::Grid),
            "quadtree" => Some(Self::Quadtree),
            _ => None,
        }
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Axis-aligned rectangle expressed in map units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Rect {
    /// Creates a rectangle from its origin and extent.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Half-open containment test: `[x, x + width) × [y, y + height)`.
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    /// Center point of the rectangle.
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Multiplies origin and extent by `factor`.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(
            self.x * factor,
            self.y * factor,
            self.width * factor,
            self.height * factor,
        )
    }

    /// Splits the rectangle into its NW, NE, SW and SE quadrants.
    #[must_use]
    pub fn quadrants(&self) -> [Self; 4] {
        let half_width = self.width / 2.0;
        let half_height = self.height / 2.0;
        [
            Self::new(self.x, self.y, half_width, half_height),
            Self::new(self.x + half_width, self.y, half_width, half_height),
            Self::new(self.x, self.y + half_height, half_width, half_height),
            Self::new(
                self.x + half_width,
                self.y + half_height,
                half_width,
                half_height,
            ),
        ]
    }
}

/// Rectangular extent of a map anchored at the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapBounds {
    width: f64,
    height: f64,
}

impl MapBounds {
    /// Creates bounds spanning `[0, width) × [0, height)`.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Horizontal extent of the map.
    #[must_use]
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// Vertical extent of the map.
    #[must_use]
    pub const fn height(&self) -> f64 {
        self.height
    }

    /// Reports whether the point lies inside the bounds.
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= 0.0 && x < self.width && y >= 0.0 && y < self.height
    }
}

/// Capability shared by every map representation: a solid-or-open predicate
/// over continuous map coordinates.
pub trait WallQuery {
    /// Rectangle the map occupies; everything outside it is solid.
    fn bounds(&self) -> MapBounds;

    /// Reports whether the point lies inside a wall.
    ///
    /// Points the map cannot resolve (outside the bounds, or lost between
    /// quadtree children) are reported as walls.
    fn is_wall(&self, x: f64, y: f64) -> bool;
}

impl<T: WallQuery + ?Sized> WallQuery for &T {
    fn bounds(&self) -> MapBounds {
        (**self).bounds()
    }

    fn is_wall(&self, x: f64, y: f64) -> bool {
        (**self).is_wall(x, y)
    }
}

/// Position and heading of the player in map units and radians.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlayerPose {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position; grows downwards.
    pub y: f64,
    /// Heading in radians, zero facing +x and growing clockwise on screen.
    pub angle: f64,
}

impl PlayerPose {
    /// Creates a pose from its components.
    #[must_use]
    pub const fn new(x: f64, y: f64, angle: f64) -> Self {
        Self { x, y, angle }
    }
}

/// Result of marching a single screen-column ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    /// Absolute angle of the ray in radians.
    pub angle: f64,
    /// Distance travelled before the ray stopped.
    pub distance: f64,
    /// Horizontal coordinate of the point that stopped the ray.
    pub hit_x: f64,
    /// Vertical coordinate of the point that stopped the ray.
    pub hit_y: f64,
    /// Whether the wall face was classified as vertical.
    pub was_hit_vertical: bool,
    /// Normalised position along the wall face, in `[0, 1)`.
    pub hit_offset: f64,
}

/// Direction of a resolution change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScaleDirection {
    /// Doubles the resolution; every length is multiplied by two.
    Down,
    /// Halves the resolution; every length is multiplied by one half.
    Up,
}

impl ScaleDirection {
    /// Multiplier applied to geometry and player coordinates.
    #[must_use]
    pub const fn factor(self) -> f64 {
        match self {
            Self::Down => 2.0,
            Self::Up => 0.5,
        }
    }
}

/// Tool selected in the grid editor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GridTool {
    /// Clicking edits wall occupancy.
    #[default]
    Wall,
    /// Clicking relocates the player.
    Player,
}

/// Interaction mode of the quadtree editor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum QuadMode {
    /// Clicking splits the leaf under the cursor.
    #[default]
    Subdivide,
    /// Clicking places the selected [`PlacingType`].
    Place,
}

/// What the quadtree editor places while in [`QuadMode::Place`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PlacingType {
    /// Toggles the wall state of the leaf under the cursor.
    #[default]
    Wall,
    /// Moves the player into the leaf under the cursor.
    Player,
}

/// Commands that express every permissible editor mutation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EditCommand {
    /// Applies the active grid tool to the provided cell.
    GridCellAction {
        /// Cell targeted by the action.
        cell: CellCoord,
    },
    /// Selects the grid editor tool.
    SelectGridTool {
        /// Tool to activate.
        tool: GridTool,
    },
    /// Enables or disables brush painting; enabling clears the eraser.
    SetBrush {
        /// Requested brush state.
        enabled: bool,
    },
    /// Enables or disables erasing; enabling clears the brush.
    SetEraser {
        /// Requested eraser state.
        enabled: bool,
    },
    /// Replaces the grid with a random fill.
    GenerateMaze {
        /// Probability that any given cell becomes a wall.
        wall_probability: f64,
        /// Seed for the deterministic random source.
        seed: u64,
    },
    /// Applies the active quadtree mode at a point in map units.
    QuadClick {
        /// Horizontal map coordinate.
        x: f64,
        /// Vertical map coordinate.
        y: f64,
    },
    /// Selects the quadtree editor mode.
    SelectQuadMode {
        /// Mode to activate.
        mode: QuadMode,
    },
    /// Selects what quadtree place mode drops.
    SelectPlacingType {
        /// Placing type to activate.
        placing: PlacingType,
    },
    /// Rescales the active map.
    Scale {
        /// Direction of the resolution change.
        direction: ScaleDirection,
    },
    /// Switches which map representation is being edited and played.
    SwitchMapKind {
        /// Map kind to activate.
        kind: MapKind,
    },
    /// Restores the state preceding the most recent recorded action.
    Undo,
    /// Re-applies the most recently undone action.
    Redo,
}

/// Events broadcast by editors after processing commands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EditEvent {
    /// A grid cell changed occupancy.
    GridCellChanged {
        /// Cell that changed.
        cell: CellCoord,
        /// Occupancy after the change.
        state: CellState,
    },
    /// The player start moved.
    PlayerPlaced {
        /// Horizontal player coordinate.
        x: f64,
        /// Vertical player coordinate.
        y: f64,
    },
    /// A quadtree leaf was split into four children.
    CellSubdivided {
        /// Rectangle of the cell that was split.
        rect: Rect,
    },
    /// A quadtree leaf changed type.
    QuadCellChanged {
        /// Rectangle of the leaf that changed.
        rect: Rect,
        /// Type after the change.
        cell_type: QuadCellType,
    },
    /// The grid editor tool changed.
    GridToolChanged {
        /// Tool now active.
        tool: GridTool,
    },
    /// Brush and eraser flags changed.
    BrushModeChanged {
        /// Whether painting is active.
        brush: bool,
        /// Whether erasing is active.
        eraser: bool,
    },
    /// The quadtree editor mode changed.
    QuadModeChanged {
        /// Mode now active.
        mode: QuadMode,
    },
    /// The quadtree placing type changed.
    PlacingTypeChanged {
        /// Placing type now active.
        placing: PlacingType,
    },
    /// The active map was rescaled.
    MapScaled {
        /// Direction that was applied.
        direction: ScaleDirection,
        /// Scale level after the change.
        scale_level: u32,
    },
    /// A scale request was refused because the map is at its authored resolution.
    ScaleRejected,
    /// The grid was refilled randomly.
    MazeGenerated {
        /// Number of wall cells produced.
        walls: usize,
    },
    /// The active map kind changed.
    MapKindChanged {
        /// Kind now active.
        kind: MapKind,
    },
    /// A history entry was restored by undo.
    Undone,
    /// A history entry was restored by redo.
    Redone,
}

/// Movement and rotation requests issued while playing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Motion {
    /// Step along the current heading.
    Forward,
    /// Step against the current heading.
    Backward,
    /// Rotate counter-clockwise on screen.
    TurnLeft,
    /// Rotate clockwise on screen.
    TurnRight,
}

/// Events emitted by the play session after processing motion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlayEvent {
    /// The player moved to a new position.
    Moved {
        /// Horizontal coordinate after the move.
        x: f64,
        /// Vertical coordinate after the move.
        y: f64,
    },
    /// A move was refused because the destination is solid.
    Blocked {
        /// Horizontal coordinate that was refused.
        x: f64,
        /// Vertical coordinate that was refused.
        y: f64,
    },
    /// The player rotated.
    Turned {
        /// Heading after the rotation.
        angle: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::{CellCoord, CellState, MapBounds, MapKind, QuadCellType, Rect, ScaleDirection};
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn cell_state_round_trips_through_bincode() {
        assert_round_trip(&CellState::Wall);
        assert_round_trip(&CellState::Empty);
    }

    #[test]
    fn quad_cell_type_round_trips_through_bincode() {
        assert_round_trip(&QuadCellType::Player);
    }

    #[test]
    fn cell_coord_round_trips_through_bincode() {
        assert_round_trip(&CellCoord::new(5, 7));
    }

    #[test]
    fn map_kind_identifiers_are_stable() {
        for kind in [MapKind::Grid, MapKind::Quadtree] {
            assert_eq!(MapKind::from_identifier(kind.as_str()), Some(kind));
        }
        assert_eq!(MapKind::from_identifier("hex"), None);
    }

    #[test]
    fn toggled_is_an_involution() {
        for state in [CellState::Empty, CellState::Wall] {
            assert_eq!(state.toggled().toggled(), state);
            assert_ne!(state.toggled(), state);
        }
    }

    #[test]
    fn rect_contains_is_half_open() {
        let rect = Rect::new(1.0, 1.0, 2.0, 2.0);
        assert!(rect.contains(1.0, 1.0));
        assert!(rect.contains(2.999, 2.999));
        assert!(!rect.contains(3.0, 2.0));
        assert!(!rect.contains(2.0, 3.0));
    }

    #[test]
    fn quadrants_tile_the_parent() {
        let rect = Rect::new(0.0, 0.0, 8.0, 4.0);
        let quadrants = rect.quadrants();
        let area: f64 = quadrants.iter().map(|q| q.width * q.height).sum();
        assert!((area - 32.0).abs() < f64::EPSILON);
        assert_eq!(quadrants[0], Rect::new(0.0, 0.0, 4.0, 2.0));
        assert_eq!(quadrants[1], Rect::new(4.0, 0.0, 4.0, 2.0));
        assert_eq!(quadrants[2], Rect::new(0.0, 2.0, 4.0, 2.0));
        assert_eq!(quadrants[3], Rect::new(4.0, 2.0, 4.0, 2.0));
    }

    #[test]
    fn scale_factors_are_reciprocal() {
        let product = ScaleDirection::Down.factor() * ScaleDirection::Up.factor();
        assert!((product - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn bounds_reject_points_on_far_edges() {
        let bounds = MapBounds::new(8.0, 8.0);
        assert!(bounds.contains(0.0, 0.0));
        assert!(!bounds.contains(8.0, 4.0));
        assert!(!bounds.contains(-0.01, 4.0));
    }
}
