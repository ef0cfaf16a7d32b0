#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Collision-checked first-person movement through a level.
//!
//! [`PlaySession`] is the single owner of the player pose while playing.
//! Translations are validated against the level's wall predicate before they
//! are committed; rotations always succeed.

use std::time::Duration;

use log::trace;
use quadcaster_core::{Motion, PlayEvent, PlayerPose, WallQuery};
use quadcaster_world::Level;
use serde::Deserialize;

/// Longest translation checked against walls in one go, in map units.
///
/// Shorter than a grid cell so a long frame cannot carry the player across a
/// one-cell wall.
pub const MAX_SUBSTEP: f64 = 0.25;

/// Speeds applied per motion command.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct MovementSettings {
    /// Distance travelled by one forward or backward command, in map units.
    pub move_speed: f64,
    /// Angle turned by one rotation command, in radians.
    pub turn_speed: f64,
    /// Command rate the per-command speeds are calibrated for, in hertz.
    ///
    /// [`PlaySession::advance`] scales both speeds by `dt × reference_rate`.
    pub reference_rate: f64,
}

impl Default for MovementSettings {
    fn default() -> Self {
        Self {
            move_speed: 0.21,
            turn_speed: 0.069,
            reference_rate: 60.0,
        }
    }
}

/// Play-mode state: the level being explored and the player's pose.
#[derive(Clone, Debug)]
pub struct PlaySession {
    level: Level,
    pose: PlayerPose,
    settings: MovementSettings,
}

impl PlaySession {
    /// Starts a session at the level's authored player position, facing +x.
    #[must_use]
    pub fn new(level: Level, settings: MovementSettings) -> Self {
        let (x, y) = level.player();
        Self {
            level,
            pose: PlayerPose::new(x, y, 0.0),
            settings,
        }
    }

    /// Current pose of the player.
    #[must_use]
    pub const fn pose(&self) -> PlayerPose {
        self.pose
    }

    /// Level being explored.
    #[must_use]
    pub const fn level(&self) -> &Level {
        &self.level
    }

    /// Speeds in use.
    #[must_use]
    pub const fn settings(&self) -> &MovementSettings {
        &self.settings
    }

    /// Applies one discrete motion command at full per-command speed.
    pub fn apply(&mut self, motion: Motion, out: &mut Vec<PlayEvent>) {
        self.step(motion, 1.0, out);
    }

    /// Applies a held motion for `dt` of wall-clock time.
    pub fn advance(&mut self, motion: Motion, dt: Duration, out: &mut Vec<PlayEvent>) {
        let scale = dt.as_secs_f64() * self.settings.reference_rate;
        if scale > 0.0 {
            self.step(motion, scale, out);
        }
    }

    fn step(&mut self, motion: Motion, scale: f64, out: &mut Vec<PlayEvent>) {
        let distance = self.settings.move_speed * scale;
        let turn = self.settings.turn_speed * scale;
        match motion {
            Motion::Forward => self.translate(distance, out),
            Motion::Backward => self.translate(-distance, out),
            Motion::TurnLeft => self.turn(-turn, out),
            Motion::TurnRight => self.turn(turn, out),
        }
    }

    /// Walks `distance` in sub-steps of at most [`MAX_SUBSTEP`], committing the
    /// last free position when a sub-step lands in a wall.
    fn translate(&mut self, distance: f64, out: &mut Vec<PlayEvent>) {
        let (sin, cos) = self.pose.angle.sin_cos();
        let (origin_x, origin_y) = (self.pose.x, self.pose.y);
        let substeps = (distance.abs() / MAX_SUBSTEP).ceil().max(1.0);

        let mut reached = None;
        let mut step = 1.0;
        while step <= substeps {
            let travelled = distance * step / substeps;
            let x = origin_x + cos * travelled;
            let y = origin_y + sin * travelled;

            if self.level.is_wall(x, y) {
                trace!("move to ({x:.3}, {y:.3}) blocked");
                if let Some((x, y)) = reached {
                    self.commit(x, y, out);
                }
                out.push(PlayEvent::Blocked { x, y });
                return;
            }
            reached = Some((x, y));
            step += 1.0;
        }

        if let Some((x, y)) = reached {
            self.commit(x, y, out);
        }
    }

    fn commit(&mut self, x: f64, y: f64, out: &mut Vec<PlayEvent>) {
        self.pose.x = x;
        self.pose.y = y;
        out.push(PlayEvent::Moved { x, y });
    }

    fn turn(&mut self, delta: f64, out: &mut Vec<PlayEvent>) {
        self.pose.angle += delta;
        out.push(PlayEvent::Turned {
            angle: self.pose.angle,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::MovementSettings;

    #[test]
    fn default_speeds_match_the_classic_controls() {
        let settings = MovementSettings::default();
        assert_eq!(settings.move_speed, 0.21);
        assert_eq!(settings.turn_speed, 0.069);
    }
}
