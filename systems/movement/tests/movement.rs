use std::{f64::consts::PI, time::Duration};

use quadcaster_core::{CellCoord, Motion, PlayEvent};
use quadcaster_system_movement::{MovementSettings, PlaySession};
use quadcaster_world::{GridMap, Level, QuadtreeMap};

fn session_in_grid(walls: &[(u32, u32)], player: (f64, f64)) -> PlaySession {
    let mut grid = GridMap::new(8, 8);
    for &(column, row) in walls {
        let _ = grid.paint_wall(CellCoord::new(column, row));
    }
    grid.set_player(player.0, player.1);
    PlaySession::new(Level::Grid(grid), MovementSettings::default())
}

#[test]
fn session_starts_at_the_authored_player() {
    let session = session_in_grid(&[], (2.5, 4.5));
    let pose = session.pose();
    assert_eq!((pose.x, pose.y, pose.angle), (2.5, 4.5, 0.0));
}

#[test]
fn forward_moves_along_the_heading() {
    let mut session = session_in_grid(&[], (2.5, 2.5));
    let mut events = Vec::new();

    session.apply(Motion::Forward, &mut events);

    let pose = session.pose();
    assert!((pose.x - 2.71).abs() < 1e-12);
    assert!((pose.y - 2.5).abs() < 1e-12);
    assert!(matches!(events.as_slice(), [PlayEvent::Moved { .. }]));
}

#[test]
fn moving_into_a_wall_is_rejected_but_turning_is_not() {
    let mut session = session_in_grid(&[(3, 2)], (2.9, 2.5));
    let mut events = Vec::new();

    session.apply(Motion::Forward, &mut events);
    assert_eq!(
        (session.pose().x, session.pose().y),
        (2.9, 2.5),
        "a blocked move must not change the position"
    );
    assert!(matches!(events.as_slice(), [PlayEvent::Blocked { .. }]));

    events.clear();
    session.apply(Motion::TurnRight, &mut events);
    assert!((session.pose().angle - 0.069).abs() < 1e-12);
    assert_eq!(
        events,
        vec![PlayEvent::Turned {
            angle: session.pose().angle
        }]
    );
}

#[test]
fn backward_walks_against_the_heading() {
    let mut session = session_in_grid(&[], (4.0, 4.0));
    let mut events = Vec::new();

    session.apply(Motion::TurnLeft, &mut events);
    session.apply(Motion::Backward, &mut events);

    let pose = session.pose();
    let angle = -0.069_f64;
    assert!((pose.x - (4.0 - angle.cos() * 0.21)).abs() < 1e-12);
    assert!((pose.y - (4.0 - angle.sin() * 0.21)).abs() < 1e-12);
}

#[test]
fn map_edges_are_solid() {
    let mut session = session_in_grid(&[], (0.1, 4.0));
    let mut events = Vec::new();

    for _ in 0..46 {
        session.apply(Motion::TurnRight, &mut events);
    }
    assert!((session.pose().angle - 46.0 * 0.069).abs() < 1e-9);
    assert!((session.pose().angle - PI).abs() < 0.07);

    events.clear();
    session.apply(Motion::Forward, &mut events);
    assert!(matches!(events.as_slice(), [PlayEvent::Blocked { .. }]));
    assert_eq!(session.pose().x, 0.1);
}

#[test]
fn advance_scales_speed_by_frame_time() {
    let mut session = session_in_grid(&[], (2.0, 2.0));
    let mut events = Vec::new();

    session.advance(Motion::Forward, Duration::from_millis(100), &mut events);
    assert!((session.pose().x - (2.0 + 0.21 * 6.0)).abs() < 1e-9);

    session.advance(Motion::TurnLeft, Duration::ZERO, &mut events);
    assert_eq!(events.len(), 1, "a zero-length tick does nothing");
}

#[test]
fn quadtree_levels_collide_on_wall_leaves() {
    let mut tree = QuadtreeMap::new(8.0, 8.0);
    let _ = tree.subdivide_at(4.0, 4.0);
    let _ = tree.paint_wall_at(5.0, 1.0);
    let _ = tree.place_player(1.0, 1.0);
    let mut session = PlaySession::new(Level::Quadtree(tree), MovementSettings::default());

    let mut events = Vec::new();
    for _ in 0..20 {
        session.apply(Motion::Forward, &mut events);
    }

    assert!(session.pose().x < 4.0, "the wall quadrant must stop the player");
    assert!(events
        .iter()
        .any(|event| matches!(event, PlayEvent::Blocked { .. })));
}

#[test]
fn long_frames_cannot_carry_the_player_through_a_wall() {
    let column: Vec<(u32, u32)> = (0..8).map(|row| (3, row)).collect();
    let mut session = session_in_grid(&column, (2.5, 2.5));
    let mut events = Vec::new();

    session.advance(Motion::Forward, Duration::from_millis(150), &mut events);

    let x = session.pose().x;
    assert!(x < 3.0, "player crossed the wall column: x={x}");
    assert!(x > 2.9, "the free part of the step is still taken: x={x}");
    assert!(matches!(
        events.as_slice(),
        [PlayEvent::Moved { .. }, PlayEvent::Blocked { .. }]
    ));
}
