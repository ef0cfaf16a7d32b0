//! Resolution changes shared by both map representations.

use quadcaster_core::ScaleDirection;

use crate::{GridMap, QuadtreeMap};

/// Map whose resolution can be doubled or halved.
pub trait Scalable {
    /// Resolution doublings applied since authoring.
    fn scale_level(&self) -> u32;

    /// Applies the resolution change unconditionally, adjusting the level.
    fn rescale(&mut self, direction: ScaleDirection);
}

/// Rescales `map` in `direction` and reports whether anything changed.
///
/// Scaling up is refused at level zero so a map never drops below its
/// authored resolution.
pub fn scale<M>(map: &mut M, direction: ScaleDirection) -> bool
where
    M: Scalable + ?Sized,
{
    if direction == ScaleDirection::Up && map.scale_level() == 0 {
        return false;
    }
    map.rescale(direction);
    true
}

impl Scalable for GridMap {
    fn scale_level(&self) -> u32 {
        GridMap::scale_level(self)
    }

    fn rescale(&mut self, direction: ScaleDirection) {
        match direction {
            ScaleDirection::Down => self.double_resolution(),
            ScaleDirection::Up => self.halve_resolution(),
        }
    }
}

impl Scalable for QuadtreeMap {
    fn scale_level(&self) -> u32 {
        QuadtreeMap::scale_level(self)
    }

    fn rescale(&mut self, direction: ScaleDirection) {
        let level = match direction {
            ScaleDirection::Down => self.scale_level().saturating_add(1),
            ScaleDirection::Up => self.scale_level().saturating_sub(1),
        };
        self.scale_geometry(direction.factor(), level);
    }
}
