//! Perspective projection of cast rays into vertical wall slices.

use quadcaster_core::Ray;

use crate::Color;

const VERTICAL_FACE_DARKENING: f32 = 0.25;

/// Size of the virtual screen the first-person view is rendered to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenSize {
    /// Width in virtual pixels; one column per ray.
    pub width: u32,
    /// Height in virtual pixels.
    pub height: u32,
}

impl ScreenSize {
    /// Creates a screen size descriptor.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for ScreenSize {
    fn default() -> Self {
        Self::new(320, 200)
    }
}

/// Vertical wall slice covering one screen column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallColumn {
    /// Screen column index, left to right.
    pub index: u32,
    /// Top edge of the slice in virtual pixels; may be negative when close.
    pub top: f32,
    /// Bottom edge of the slice in virtual pixels.
    pub bottom: f32,
    /// Texel column sampled for the slice.
    pub texture_column: u32,
    /// Color the slice is drawn with.
    pub color: Color,
}

impl WallColumn {
    /// Height of the slice in virtual pixels.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

/// Opaque wall texture lookup: texel column and distance to color.
pub trait TextureSampler {
    /// Number of texel columns across one wall face.
    fn width(&self) -> u32;

    /// Color of `column` seen from `distance` map units away.
    fn sample(&self, column: u32, distance: f64) -> Color;

    /// Texel column for a normalised offset along the wall face.
    fn texel_column(&self, hit_offset: f64) -> u32 {
        let width = self.width().max(1);
        let column = (hit_offset.clamp(0.0, 1.0) * f64::from(width)).floor();
        (column as u32).min(width - 1)
    }
}

/// Two-tone shading that only depends on distance: light grey up close,
/// dark grey further away.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DistanceShade {
    /// Distance below which walls count as near.
    pub near_distance: f64,
    /// Color of near walls.
    pub near: Color,
    /// Color of far walls.
    pub far: Color,
}

impl Default for DistanceShade {
    fn default() -> Self {
        Self {
            near_distance: 3.0,
            near: Color::from_rgb_u8(0x99, 0x99, 0x99),
            far: Color::from_rgb_u8(0x55, 0x55, 0x55),
        }
    }
}

impl TextureSampler for DistanceShade {
    fn width(&self) -> u32 {
        1
    }

    fn sample(&self, _column: u32, distance: f64) -> Color {
        if distance < self.near_distance {
            self.near
        } else {
            self.far
        }
    }
}

/// Procedural brick pattern with mortar joints and distance fog.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BrickTexture {
    /// Texel columns across one wall face.
    pub width: u32,
    /// Texel columns per brick, mortar included.
    pub brick_width: u32,
    /// Brick face color.
    pub brick: Color,
    /// Mortar joint color.
    pub mortar: Color,
    /// Distance at which walls fade fully into black.
    pub fog_distance: f64,
}

impl Default for BrickTexture {
    fn default() -> Self {
        Self {
            width: 64,
            brick_width: 16,
            brick: Color::from_rgb_u8(0x8b, 0x3a, 0x2b),
            mortar: Color::from_rgb_u8(0x6e, 0x6a, 0x62),
            fog_distance: 20.0,
        }
    }
}

impl TextureSampler for BrickTexture {
    fn width(&self) -> u32 {
        self.width
    }

    fn sample(&self, column: u32, distance: f64) -> Color {
        let base = if column % self.brick_width.max(1) == 0 {
            self.mortar
        } else {
            self.brick
        };
        let fog = if self.fog_distance > 0.0 {
            (distance / self.fog_distance).clamp(0.0, 1.0)
        } else {
            0.0
        };
        base.darken(fog as f32 * 0.85)
    }
}

/// Projects rays into wall slices on `screen`.
///
/// The slice spans `[h/2 − h/d, h − (h/2 − h/d)]` for screen height `h` and
/// ray distance `d`. Faces classified as vertical are drawn darker so corners
/// read clearly.
#[must_use]
pub fn project_columns<S>(rays: &[Ray], screen: ScreenSize, sampler: &S) -> Vec<WallColumn>
where
    S: TextureSampler + ?Sized,
{
    let height = f64::from(screen.height);
    rays.iter()
        .zip(0_u32..)
        .map(|(ray, index)| {
            let distance = ray.distance.max(f64::EPSILON);
            let ceiling = height / 2.0 - height / distance;
            let floor = height - ceiling;
            let texture_column = sampler.texel_column(ray.hit_offset);
            let color = sampler.sample(texture_column, ray.distance);
            let color = if ray.was_hit_vertical {
                color.darken(VERTICAL_FACE_DARKENING)
            } else {
                color
            };
            WallColumn {
                index,
                top: ceiling as f32,
                bottom: floor as f32,
                texture_column,
                color,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ray(distance: f64, hit_offset: f64, was_hit_vertical: bool) -> Ray {
        Ray {
            angle: 0.0,
            distance,
            hit_x: 0.0,
            hit_y: 0.0,
            was_hit_vertical,
            hit_offset,
        }
    }

    #[test]
    fn slices_shrink_with_distance_and_stay_centred() {
        let screen = ScreenSize::default();
        let columns = project_columns(
            &[ray(1.5, 0.0, false), ray(4.0, 0.0, false), ray(20.0, 0.0, false)],
            screen,
            &DistanceShade::default(),
        );

        assert_eq!(columns.len(), 3);
        assert!(columns[0].height() > columns[1].height());
        assert!(columns[1].height() > columns[2].height());
        for column in &columns {
            assert!((column.top + column.bottom - 200.0).abs() < 1e-3);
        }
        assert!((columns[1].top - 50.0).abs() < 1e-4);
        assert_eq!(columns[2].index, 2);
    }

    #[test]
    fn texture_column_follows_hit_offset() {
        let texture = BrickTexture::default();
        assert_eq!(texture.texel_column(0.0), 0);
        assert_eq!(texture.texel_column(0.5), 32);
        assert_eq!(texture.texel_column(0.999), 63);
        assert_eq!(texture.texel_column(1.0), 63);
    }

    #[test]
    fn distance_shade_switches_at_three_units() {
        let shade = DistanceShade::default();
        assert_eq!(shade.sample(0, 2.9), shade.near);
        assert_eq!(shade.sample(0, 3.0), shade.far);
    }

    #[test]
    fn vertical_faces_are_darker() {
        let shade = DistanceShade::default();
        let columns = project_columns(
            &[ray(2.0, 0.3, false), ray(2.0, 0.3, true)],
            ScreenSize::default(),
            &shade,
        );
        assert!(columns[1].color.red < columns[0].color.red);
    }

    #[test]
    fn bricks_fade_with_distance_and_show_mortar() {
        let texture = BrickTexture::default();
        assert_eq!(texture.sample(0, 0.0), texture.mortar);
        assert_eq!(texture.sample(5, 0.0), texture.brick);
        assert!(texture.sample(5, 10.0).red < texture.brick.red);
    }
}
