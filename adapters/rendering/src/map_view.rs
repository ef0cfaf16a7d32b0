//! Top-down views of a level: editor canvas tiles and the play minimap.

use glam::Vec2;
use quadcaster_core::{CellState, PlayerPose, QuadCellType, Ray, WallQuery};
use quadcaster_world::{GridMap, Level, QuadtreeMap};

use crate::Color;

/// Axis-aligned coloured rectangle in map units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapTile {
    /// Top-left corner.
    pub origin: Vec2,
    /// Width and height.
    pub size: Vec2,
    /// Fill color.
    pub color: Color,
}

/// Colors used for each kind of map content.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapPalette {
    /// Solid cells.
    pub wall: Color,
    /// Open cells.
    pub empty: Color,
    /// Quadtree leaf holding the player start.
    pub player_cell: Color,
    /// Player marker.
    pub player: Color,
    /// Ray fan lines on the minimap.
    pub ray: Color,
}

impl MapPalette {
    /// Palette of the play-mode minimap.
    pub const MINIMAP: Self = Self {
        wall: Color::from_rgb_u8(0x44, 0x44, 0x44),
        empty: Color::from_rgb_u8(0x00, 0x00, 0x00),
        player_cell: Color::from_rgb_u8(0x00, 0x00, 0x00),
        player: Color::from_rgb_u8(0xff, 0x00, 0x00),
        ray: Color::from_rgb_u8(0xff, 0xff, 0x00),
    };

    /// Palette of the editor canvas.
    pub const EDITOR: Self = Self {
        wall: Color::from_rgb_u8(0x5a, 0x5a, 0x66),
        empty: Color::from_rgb_u8(0xdd, 0xdd, 0xd5),
        player_cell: Color::from_rgb_u8(0x3c, 0xb3, 0x71),
        player: Color::from_rgb_u8(0xd0, 0x30, 0x30),
        ray: Color::from_rgb_u8(0xff, 0xff, 0x00),
    };
}

/// Tiles for every grid cell or quadtree leaf of the level.
#[must_use]
pub fn level_tiles(level: &Level, palette: &MapPalette) -> Vec<MapTile> {
    match level {
        Level::Grid(grid) => grid_tiles(grid, palette),
        Level::Quadtree(tree) => quadtree_tiles(tree, palette),
    }
}

fn grid_tiles(grid: &GridMap, palette: &MapPalette) -> Vec<MapTile> {
    grid.rows()
        .iter()
        .enumerate()
        .flat_map(|(y, row)| {
            row.iter().enumerate().map(move |(x, state)| MapTile {
                origin: Vec2::new(x as f32, y as f32),
                size: Vec2::ONE,
                color: match state {
                    CellState::Wall => palette.wall,
                    CellState::Empty => palette.empty,
                },
            })
        })
        .collect()
}

fn quadtree_tiles(tree: &QuadtreeMap, palette: &MapPalette) -> Vec<MapTile> {
    tree.leaves()
        .map(|leaf| {
            let rect = leaf.rect();
            MapTile {
                origin: Vec2::new(rect.x as f32, rect.y as f32),
                size: Vec2::new(rect.width as f32, rect.height as f32),
                color: match leaf.cell_type() {
                    Some(QuadCellType::Wall) => palette.wall,
                    Some(QuadCellType::Player) => palette.player_cell,
                    Some(QuadCellType::Empty) | None => palette.empty,
                },
            }
        })
        .collect()
}

/// Top-down overview drawn next to the first-person view.
#[derive(Clone, Debug, PartialEq)]
pub struct Minimap {
    /// Extent of the level in map units.
    pub map_size: Vec2,
    /// Cells or leaves of the level.
    pub tiles: Vec<MapTile>,
    /// Current player position.
    pub player: Vec2,
    /// End point of every ray, travelled distance along the ray angle.
    pub ray_ends: Vec<Vec2>,
    /// Colors used by the overview.
    pub palette: MapPalette,
}

/// Builds the minimap for the pose and the rays cast from it.
#[must_use]
pub fn minimap(level: &Level, pose: PlayerPose, rays: &[Ray]) -> Minimap {
    let bounds = level.bounds();
    let palette = MapPalette::MINIMAP;
    Minimap {
        map_size: Vec2::new(bounds.width() as f32, bounds.height() as f32),
        tiles: level_tiles(level, &palette),
        player: Vec2::new(pose.x as f32, pose.y as f32),
        ray_ends: rays
            .iter()
            .map(|ray| {
                let (sin, cos) = ray.angle.sin_cos();
                Vec2::new(
                    (pose.x + cos * ray.distance) as f32,
                    (pose.y + sin * ray.distance) as f32,
                )
            })
            .collect(),
        palette,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quadcaster_core::CellCoord;

    #[test]
    fn grid_tiles_cover_every_cell() {
        let mut grid = GridMap::new(3, 2);
        let _ = grid.paint_wall(CellCoord::new(2, 1));
        let tiles = level_tiles(&Level::Grid(grid), &MapPalette::EDITOR);

        assert_eq!(tiles.len(), 6);
        let wall = tiles
            .iter()
            .find(|tile| tile.origin == Vec2::new(2.0, 1.0))
            .expect("tile for the wall cell");
        assert_eq!(wall.color, MapPalette::EDITOR.wall);
    }

    #[test]
    fn quadtree_tiles_follow_leaves() {
        let mut tree = QuadtreeMap::new(8.0, 8.0);
        let _ = tree.subdivide_at(1.0, 1.0);
        let _ = tree.place_player(6.0, 6.0);
        let tiles = level_tiles(&Level::Quadtree(tree), &MapPalette::EDITOR);

        let area: f32 = tiles.iter().map(|tile| tile.size.x * tile.size.y).sum();
        assert!((area - 64.0).abs() < 1e-4);
        assert_eq!(
            tiles
                .iter()
                .filter(|tile| tile.color == MapPalette::EDITOR.player_cell)
                .count(),
            1
        );
    }

    #[test]
    fn ray_ends_lie_along_each_ray() {
        let level = Level::Grid(GridMap::new(8, 8));
        let pose = PlayerPose::new(2.0, 3.0, 0.0);
        let rays = [Ray {
            angle: std::f64::consts::FRAC_PI_2,
            distance: 2.0,
            hit_x: 2.0,
            hit_y: 5.0,
            was_hit_vertical: false,
            hit_offset: 0.0,
        }];

        let view = minimap(&level, pose, &rays);

        assert_eq!(view.map_size, Vec2::new(8.0, 8.0));
        assert!((view.ray_ends[0] - Vec2::new(2.0, 5.0)).length() < 1e-5);
        assert_eq!(view.player, Vec2::new(2.0, 3.0));
    }
}
