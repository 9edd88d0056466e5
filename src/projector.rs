//! Turns ray hits into flat-shaded screen columns.

use crate::camera::Camera;
use crate::error::{EngineError, Result};
use crate::raycaster::HitRecord;

/// Vertical scale applied to `screen_height / perpendicular_distance`.
pub const WALL_SCALE: f32 = 16.0;

/// One screen column to fill. May extend past the screen; the drawing
/// surface clips.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Linear gray level, 255 at the camera and 0 at `max_range`. Not
    /// clamped: hits beyond `max_range` go negative.
    pub shade: f32,
    /// Fan index of the ray this column came from.
    pub ray: usize,
    pub obstacle: usize,
}

impl Projection {
    /// Shade clamped to a displayable gray level.
    #[inline]
    pub fn gray(&self) -> u8 {
        self.shade.clamp(0.0, 255.0) as u8
    }
}

/// Linear remap of `x` from `[in_min, in_max]` to `[out_min, out_max]`,
/// extrapolating outside the input range.
#[inline]
pub fn map_range(x: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    (x - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projector {
    pub screen: [u32; 2], // (width, height) in pixels
    pub x_offset: f32,
    /// Fraction of the screen width given to the 3D view, as `1 / divider`.
    /// Zero means full width.
    pub divider: u32,
}

impl Projector {
    pub fn new(screen: [u32; 2], x_offset: f32, divider: u32) -> Self {
        Self {
            screen,
            x_offset,
            divider,
        }
    }

    /// Integer column width for a fan of `rays` entries.
    pub fn column_width(&self, rays: usize) -> Result<u32> {
        if rays == 0 {
            return Err(EngineError::invalid("hits", "cannot project a zero-length fan"));
        }
        let view = if self.divider > 0 {
            self.screen[0] / self.divider
        } else {
            self.screen[0]
        };
        Ok((view as usize / rays) as u32)
    }

    /// Projects a fan of hits into columns, in fan order. Misses produce no
    /// column but still take up their slot.
    pub fn project<I>(&self, hits: I, camera: &Camera) -> Result<Vec<Projection>>
    where
        I: IntoIterator<Item = Option<HitRecord>>,
        I::IntoIter: ExactSizeIterator,
    {
        let hits = hits.into_iter();
        let width = self.column_width(hits.len())? as f32;
        let screen_h = self.screen[1] as f32;

        let columns = hits
            .enumerate()
            .filter_map(|(i, hit)| hit.map(|hit| (i, hit)))
            .map(|(i, hit)| {
                let height = self.column_height(&hit, camera);
                Projection {
                    x: self.x_offset + i as f32 * width,
                    y: screen_h / 2.0 - height / 2.0,
                    width,
                    height,
                    shade: map_range(hit.distance, 0.0, camera.max_range, 255.0, 0.0),
                    ray: i,
                    obstacle: hit.obstacle,
                }
            })
            .collect();
        Ok(columns)
    }

    /// Height of a wall column after fish-eye correction. A perpendicular
    /// distance of exactly zero divides by 1 instead, giving
    /// `screen_h * WALL_SCALE`.
    #[inline]
    pub fn column_height(&self, hit: &HitRecord, camera: &Camera) -> f32 {
        let screen_h = self.screen[1] as f32;
        let perpendicular = perpendicular_distance(hit, camera);
        if perpendicular != 0.0 {
            screen_h / perpendicular * WALL_SCALE
        } else {
            screen_h * WALL_SCALE
        }
    }
}

/// Hit distance projected onto the camera heading.
#[inline]
pub fn perpendicular_distance(hit: &HitRecord, camera: &Camera) -> f32 {
    hit.distance * (hit.angle - camera.angle).to_radians().cos()
}
