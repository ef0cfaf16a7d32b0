//! Fixed-resolution occupancy grid with a player start.

use quadcaster_core::{CellCoord, CellState, MapBounds, WallQuery};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::MapShapeError;

const DEFAULT_SIDE: u32 = 8;

/// Uniform boolean occupancy grid together with the authored player start.
///
/// `cells` always holds exactly `height` rows of exactly `width` columns;
/// construction and deserialization both enforce the shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GridMapRecord", into = "GridMapRecord")]
pub struct GridMap {
    cells: Vec<Vec<CellState>>,
    width: u32,
    height: u32,
    player_x: f64,
    player_y: f64,
    scale_level: u32,
}

impl Default for GridMap {
    fn default() -> Self {
        Self::new(DEFAULT_SIDE, DEFAULT_SIDE)
    }
}

impl GridMap {
    /// Creates an all-empty grid with the player on the central cell.
    ///
    /// Zero dimensions are raised to one so the grid is never degenerate.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            cells: vec![vec![CellState::Empty; width as usize]; height as usize],
            width,
            height,
            player_x: f64::from((width - 1) / 2),
            player_y: f64::from((height - 1) / 2),
            scale_level: 0,
        }
    }

    /// Builds a grid from explicit rows, validating that they form a rectangle.
    pub fn from_rows(rows: Vec<Vec<CellState>>) -> Result<Self, MapShapeError> {
        let height = u32::try_from(rows.len()).map_err(|_| MapShapeError::TooLarge)?;
        let width = rows.first().map_or(0, Vec::len);
        let width = u32::try_from(width).map_err(|_| MapShapeError::TooLarge)?;
        let grid = Self {
            cells: rows,
            width,
            height,
            player_x: f64::from(width.saturating_sub(1) / 2),
            player_y: f64::from(height.saturating_sub(1) / 2),
            scale_level: 0,
        };
        grid.validate()?;
        Ok(grid)
    }

    fn validate(&self) -> Result<(), MapShapeError> {
        if self.width == 0 || self.height == 0 {
            return Err(MapShapeError::EmptyGrid);
        }
        if self.cells.len() != self.height as usize {
            return Err(MapShapeError::RowCount {
                expected: self.height,
                actual: self.cells.len(),
            });
        }
        if let Some((row, cells)) = self
            .cells
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != self.width as usize)
        {
            return Err(MapShapeError::RowWidth {
                row,
                expected: self.width,
                actual: cells.len(),
            });
        }
        Ok(())
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Count of resolution doublings applied since authoring.
    #[must_use]
    pub const fn scale_level(&self) -> u32 {
        self.scale_level
    }

    /// Authored player start in map units.
    #[must_use]
    pub const fn player(&self) -> (f64, f64) {
        (self.player_x, self.player_y)
    }

    /// Rows of the grid, top to bottom.
    #[must_use]
    pub fn rows(&self) -> &[Vec<CellState>] {
        &self.cells
    }

    /// Occupancy of the provided cell, or `None` when it lies outside the grid.
    #[must_use]
    pub fn cell(&self, cell: CellCoord) -> Option<CellState> {
        self.cells
            .get(cell.row() as usize)
            .and_then(|row| row.get(cell.column() as usize))
            .copied()
    }

    /// Number of wall cells.
    #[must_use]
    pub fn wall_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|state| state.is_wall())
            .count()
    }

    fn cell_mut(&mut self, cell: CellCoord) -> Option<&mut CellState> {
        self.cells
            .get_mut(cell.row() as usize)
            .and_then(|row| row.get_mut(cell.column() as usize))
    }

    /// Flips the occupancy of a cell. Out-of-bounds cells are ignored.
    ///
    /// Returns the new occupancy when the cell exists.
    pub fn toggle_wall(&mut self, cell: CellCoord) -> Option<CellState> {
        let slot = self.cell_mut(cell)?;
        *slot = slot.toggled();
        Some(*slot)
    }

    /// Marks a cell as wall. Out-of-bounds cells are ignored.
    pub fn paint_wall(&mut self, cell: CellCoord) -> Option<CellState> {
        self.assign(cell, CellState::Wall)
    }

    /// Marks a cell as empty. Out-of-bounds cells are ignored.
    pub fn erase_wall(&mut self, cell: CellCoord) -> Option<CellState> {
        self.assign(cell, CellState::Empty)
    }

    fn assign(&mut self, cell: CellCoord, state: CellState) -> Option<CellState> {
        let slot = self.cell_mut(cell)?;
        *slot = state;
        Some(state)
    }

    /// Moves the player start. Walls are not consulted; only play enforces collision.
    pub fn set_player(&mut self, x: f64, y: f64) {
        self.player_x = x;
        self.player_y = y;
    }

    /// Refills every cell independently: wall with `wall_probability`, empty otherwise.
    ///
    /// The fill carries no connectivity guarantee. Probabilities outside
    /// `[0, 1]` are clamped. Returns the number of walls produced.
    pub fn generate_random_maze<R>(&mut self, wall_probability: f64, rng: &mut R) -> usize
    where
        R: Rng + ?Sized,
    {
        let probability = if wall_probability.is_nan() {
            0.0
        } else {
            wall_probability.clamp(0.0, 1.0)
        };

        for state in self.cells.iter_mut().flatten() {
            *state = if rng.gen_bool(probability) {
                CellState::Wall
            } else {
                CellState::Empty
            };
        }
        self.wall_count()
    }

    /// Replaces every cell with a 2×2 block of itself and doubles the player position.
    pub(crate) fn double_resolution(&mut self) {
        let width = self.width as usize * 2;
        let mut cells = Vec::with_capacity(self.cells.len() * 2);
        for row in &self.cells {
            let doubled: Vec<CellState> = row.iter().flat_map(|state| [*state, *state]).collect();
            debug_assert_eq!(doubled.len(), width);
            cells.push(doubled.clone());
            cells.push(doubled);
        }
        self.cells = cells;
        self.width *= 2;
        self.height *= 2;
        self.player_x *= 2.0;
        self.player_y *= 2.0;
        self.scale_level = self.scale_level.saturating_add(1);
    }

    /// Keeps the top-left cell of every 2×2 block and halves the player position.
    ///
    /// Callers gate on a positive scale level, which guarantees even dimensions.
    pub(crate) fn halve_resolution(&mut self) {
        let width = (self.width / 2).max(1);
        let height = (self.height / 2).max(1);
        self.cells = self
            .cells
            .iter()
            .step_by(2)
            .take(height as usize)
            .map(|row| row.iter().step_by(2).take(width as usize).copied().collect())
            .collect();
        self.width = width;
        self.height = height;
        self.player_x *= 0.5;
        self.player_y *= 0.5;
        self.scale_level = self.scale_level.saturating_sub(1);
    }
}

impl WallQuery for GridMap {
    fn bounds(&self) -> MapBounds {
        MapBounds::new(f64::from(self.width), f64::from(self.height))
    }

    fn is_wall(&self, x: f64, y: f64) -> bool {
        if !(x >= 0.0 && y >= 0.0) {
            return true;
        }
        let column = x.floor();
        let row = y.floor();
        if column >= f64::from(self.width) || row >= f64::from(self.height) {
            return true;
        }
        self.cell(CellCoord::new(column as u32, row as u32))
            .map_or(true, CellState::is_wall)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GridMapRecord {
    cells: Vec<Vec<CellState>>,
    width: u32,
    height: u32,
    player_x: f64,
    player_y: f64,
    #[serde(default)]
    scale_level: u32,
}

impl TryFrom<GridMapRecord> for GridMap {
    type Error = MapShapeError;

    fn try_from(record: GridMapRecord) -> Result<Self, Self::Error> {
        let grid = Self {
            cells: record.cells,
            width: record.width,
            height: record.height,
            player_x: record.player_x,
            player_y: record.player_y,
            scale_level: record.scale_level,
        };
        grid.validate()?;
        Ok(grid)
    }
}

impl From<GridMap> for GridMapRecord {
    fn from(grid: GridMap) -> Self {
        Self {
            cells: grid.cells,
            width: grid.width,
            height: grid.height,
            player_x: grid.player_x,
            player_y: grid.player_y,
            scale_level: grid.scale_level,
        }
    }
}
