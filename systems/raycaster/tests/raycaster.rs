use std::f64::consts::{FRAC_PI_2, PI};

use quadcaster_core::{CellCoord, MapBounds, PlayerPose, WallQuery};
use quadcaster_system_raycaster::{CasterSettings, RayCaster};
use quadcaster_world::{GridMap, QuadtreeMap};

fn grid_with_walls(width: u32, height: u32, walls: &[(u32, u32)]) -> GridMap {
    let mut grid = GridMap::new(width, height);
    for &(column, row) in walls {
        let _ = grid.paint_wall(CellCoord::new(column, row));
    }
    grid
}

#[test]
fn centre_ray_hits_the_wall_below_the_player() {
    let grid = grid_with_walls(8, 8, &[(2, 2)]);
    let caster = RayCaster::default();

    let rays = caster.cast(PlayerPose::new(2.5, 0.5, FRAC_PI_2), &grid);
    let centre = rays[160];

    assert!(
        (centre.distance - 1.5).abs() <= caster.settings().step_size + 1e-9,
        "centre ray should stop at the top face of the wall, got {}",
        centre.distance
    );
    assert!(!centre.was_hit_vertical, "a top face is horizontal");
    assert!(grid.is_wall(centre.hit_x, centre.hit_y));
    assert!((centre.hit_offset - 0.5).abs() < 1e-6);
}

#[test]
fn every_cast_produces_one_ray_per_column() {
    let grid = GridMap::default();
    for num_rays in [1, 17, 320] {
        let caster = RayCaster::new(CasterSettings {
            num_rays,
            ..CasterSettings::default()
        });
        let rays = caster.cast(PlayerPose::new(3.5, 3.5, 0.3), &grid);
        assert_eq!(rays.len(), num_rays);
    }
}

#[test]
fn ray_results_respect_their_documented_ranges() {
    let grid = grid_with_walls(8, 8, &[(0, 0), (5, 2), (6, 6), (1, 5)]);
    let caster = RayCaster::default();
    let max_depth = caster.settings().max_depth;

    for heading in [0.0, 0.7, PI, 4.0, -2.5] {
        for ray in caster.cast(PlayerPose::new(3.3, 3.7, heading), &grid) {
            assert!(ray.distance > 0.0 && ray.distance <= max_depth);
            assert!((0.0..1.0).contains(&ray.hit_offset));
        }
    }
}

#[test]
fn rays_leaving_the_map_report_max_depth() {
    let grid = GridMap::new(8, 8);
    let caster = RayCaster::default();

    let rays = caster.cast(PlayerPose::new(4.0, 4.0, 1.0), &grid);

    assert!(rays.iter().all(|ray| ray.distance == caster.settings().max_depth));
    assert!(rays.iter().all(|ray| !ray.was_hit_vertical));
    assert!(rays
        .iter()
        .all(|ray| !MapBounds::new(8.0, 8.0).contains(ray.hit_x, ray.hit_y)));
}

#[test]
fn escaped_rays_report_the_origin_as_hit_point() {
    let grid = GridMap::new(64, 64);
    let caster = RayCaster::default();

    let ray = caster.cast_ray(32.0, 32.0, 0.0, &grid);

    assert_eq!((ray.hit_x, ray.hit_y), (0.0, 0.0));
    assert_eq!(ray.hit_offset, 0.0);
    assert!(!ray.was_hit_vertical);
    assert!(ray.distance <= caster.settings().max_depth);
    assert!(ray.distance > caster.settings().max_depth - 2.0 * caster.settings().step_size);
}

#[test]
fn casting_is_deterministic() {
    let grid = grid_with_walls(6, 6, &[(1, 1), (4, 2), (2, 4)]);
    let caster = RayCaster::default();
    let pose = PlayerPose::new(2.7, 2.2, 0.9);

    assert_eq!(caster.cast(pose, &grid), caster.cast(pose, &grid));
}

#[test]
fn side_faces_are_classified_as_vertical() {
    let grid = grid_with_walls(8, 8, &[(5, 3)]);
    let caster = RayCaster::default();

    let ray = caster.cast_ray(2.5, 3.5, 0.0, &grid);

    assert!(ray.was_hit_vertical, "marching along +x meets a west face");
    assert!((ray.distance - 2.5).abs() <= caster.settings().step_size + 1e-9);
    assert!((ray.hit_offset - 0.5).abs() < 1e-6);
}

#[test]
fn quadtree_maps_are_cast_like_grids() {
    let mut tree = QuadtreeMap::new(8.0, 8.0);
    let _ = tree.subdivide_at(1.0, 1.0);
    let _ = tree.paint_wall_at(5.0, 1.0);
    let caster = RayCaster::default();

    let ray = caster.cast_ray(1.5, 1.5, 0.0, &tree);

    assert!(ray.distance < caster.settings().max_depth);
    assert!(tree.is_wall(ray.hit_x, ray.hit_y));
    assert!(ray.hit_x >= 4.0 && ray.hit_x < 4.0 + caster.settings().step_size + 1e-9);
}

#[test]
fn border_walled_corner_keeps_every_ray_in_range() {
    let border: Vec<(u32, u32)> = (0..8)
        .flat_map(|i| [(i, 0), (i, 7), (0, i), (7, i)])
        .collect();
    let grid = grid_with_walls(8, 8, &border);
    let caster = RayCaster::default();
    let max_depth = caster.settings().max_depth;

    for step in 0..64 {
        let heading = f64::from(step) * 2.0 * PI / 64.0;
        for ray in caster.cast(PlayerPose::new(0.5, 0.5, heading), &grid) {
            assert!(
                (0.0..=max_depth).contains(&ray.distance),
                "heading {heading}: distance {} out of range",
                ray.distance
            );
        }
    }
}
