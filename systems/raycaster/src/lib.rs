#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fixed-step ray marching over any map that answers [`WallQuery`].
//!
//! One ray is cast per screen column, spread evenly across the field of view
//! starting at the left edge. Each ray advances in constant increments and
//! stops at the first sample that lies in a wall or outside the map.

use std::f64::consts::FRAC_PI_3;

use quadcaster_core::{PlayerPose, Ray, WallQuery};
use serde::Deserialize;

/// Tunables of the ray caster.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CasterSettings {
    /// Rays cast per frame, one per screen column.
    pub num_rays: usize,
    /// Horizontal field of view in radians.
    pub fov: f64,
    /// Longest distance a ray may travel.
    pub max_depth: f64,
    /// Distance advanced between wall samples.
    pub step_size: f64,
}

impl Default for CasterSettings {
    fn default() -> Self {
        Self {
            num_rays: 320,
            fov: FRAC_PI_3,
            max_depth: 20.0,
            step_size: 0.1,
        }
    }
}

/// Casts fans of rays with fixed settings.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RayCaster {
    settings: CasterSettings,
}

impl RayCaster {
    /// Creates a caster using the provided settings.
    ///
    /// A step or depth that is not a positive finite number is replaced by
    /// its default so marching always terminates within `[0, max_depth]`.
    #[must_use]
    pub fn new(settings: CasterSettings) -> Self {
        let defaults = CasterSettings::default();
        let mut settings = settings;
        if !is_positive_finite(settings.step_size) {
            settings.step_size = defaults.step_size;
        }
        if !is_positive_finite(settings.max_depth) {
            settings.max_depth = defaults.max_depth;
        }
        Self { settings }
    }

    /// Settings the caster was created with.
    #[must_use]
    pub const fn settings(&self) -> &CasterSettings {
        &self.settings
    }

    /// Absolute angle of the ray for screen column `index`.
    #[must_use]
    pub fn ray_angle(&self, heading: f64, index: usize) -> f64 {
        let step = self.settings.fov / self.settings.num_rays.max(1) as f64;
        heading - self.settings.fov / 2.0 + index as f64 * step
    }

    /// Casts exactly `num_rays` rays from the pose, left to right.
    #[must_use]
    pub fn cast<M>(&self, pose: PlayerPose, map: &M) -> Vec<Ray>
    where
        M: WallQuery + ?Sized,
    {
        (0..self.settings.num_rays)
            .map(|index| self.cast_ray(pose.x, pose.y, self.ray_angle(pose.angle, index), map))
            .collect()
    }

    /// Marches a single ray from `(origin_x, origin_y)` along `angle`.
    #[must_use]
    pub fn cast_ray<M>(&self, origin_x: f64, origin_y: f64, angle: f64, map: &M) -> Ray
    where
        M: WallQuery + ?Sized,
    {
        let CasterSettings {
            max_depth,
            step_size,
            ..
        } = self.settings;
        let (dir_y, dir_x) = angle.sin_cos();
        let bounds = map.bounds();

        let mut distance = 0.0;
        let mut stop = None;
        while stop.is_none() && distance < max_depth {
            distance += step_size;
            let x = origin_x + dir_x * distance;
            let y = origin_y + dir_y * distance;

            if !bounds.contains(x, y) {
                distance = max_depth;
                stop = Some((x, y, false));
            } else if map.is_wall(x, y) {
                stop = Some((x, y, faces_vertical_wall(x, y)));
            }
        }

        let (hit_x, hit_y, was_hit_vertical) = stop.unwrap_or((0.0, 0.0, false));
        let along = if was_hit_vertical { hit_y } else { hit_x };

        Ray {
            angle,
            distance: distance.clamp(0.0, max_depth),
            hit_x,
            hit_y,
            was_hit_vertical,
            hit_offset: unit_fraction(along),
        }
    }
}

fn is_positive_finite(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// A sample closer to the cell's vertical midline than to its horizontal one
/// sits on a north or south face; otherwise it sits on an east or west face.
fn faces_vertical_wall(x: f64, y: f64) -> bool {
    let from_center_x = (x - (x.floor() + 0.5)).abs();
    let from_center_y = (y - (y.floor() + 0.5)).abs();
    from_center_x > from_center_y
}

/// Fractional part normalised into `[0, 1)`.
fn unit_fraction(value: f64) -> f64 {
    let fraction = value.rem_euclid(1.0);
    if fraction.is_finite() && fraction < 1.0 {
        fraction
    } else {
        0.0
    }
}
