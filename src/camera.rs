use std::iter::FusedIterator;

use crate::error::{EngineError, Result};
use crate::geometry::Obstacle;
use crate::raycaster::{HitRecord, RayCaster, check_range, ray_end};
use crate::world::WorldBounds;

/// Player viewpoint. All angles are in degrees and are never normalised.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub pos: [f32; 2], // (x, y) position in world space
    pub angle: f32,    // heading, dx = cos, dy = sin
    pub fov: f32,
    pub max_range: f32, // ray length limit
    pub speed: f32,     // world units per movement call
    pub density: f32,   // degrees between neighbouring rays, >= 1
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            pos: [0.0, 0.0],
            angle: 90.0,
            fov: 90.0,
            max_range: 200.0,
            speed: 0.5,
            density: 5.0,
        }
    }
}

impl Camera {
    pub fn new(pos: [f32; 2], angle: f32) -> Self {
        Self {
            pos,
            angle,
            ..Self::default()
        }
    }

    /// Checks the fan parameters.
    pub fn validate(&self) -> Result<()> {
        if !(self.density.is_finite() && self.density >= 1.0) {
            return Err(EngineError::invalid(
                "density",
                format!("must be at least 1 degree per ray, got {}", self.density),
            ));
        }
        if !(self.fov.is_finite() && self.fov >= 0.0) {
            return Err(EngineError::invalid(
                "fov",
                format!("fan would be empty for a field of view of {}", self.fov),
            ));
        }
        check_range("max_range", self.max_range)
    }

    /// Number of rays per fan: `floor(fov / density) + 1`.
    #[inline]
    pub fn ray_count(&self) -> usize {
        (self.fov / self.density).floor() as usize + 1
    }

    /// Fires one ray per angular sample across the field of view, left edge
    /// first. The returned iterator casts lazily and yields exactly
    /// [`ray_count`](Self::ray_count) entries.
    pub fn sweep<'a>(&self, obstacles: &'a [Obstacle], caster: RayCaster) -> Result<Sweep<'a>> {
        self.validate()?;
        caster.validate()?;
        Ok(Sweep {
            origin: self.pos,
            start: self.angle - self.fov / 2.0,
            density: self.density,
            max_range: self.max_range,
            caster,
            obstacles,
            next: 0,
            len: self.ray_count(),
        })
    }

    pub fn forward(&mut self) {
        self.pos = ray_end(self.pos, self.speed, self.angle);
    }

    pub fn backward(&mut self) {
        self.pos = ray_end(self.pos, -self.speed, self.angle);
    }

    pub fn strafe_left(&mut self) {
        self.pos = ray_end(self.pos, self.speed, self.angle - 90.0);
    }

    pub fn strafe_right(&mut self) {
        self.pos = ray_end(self.pos, self.speed, self.angle + 90.0);
    }

    #[inline]
    pub fn rotate(&mut self, delta_deg: f32) {
        self.angle += delta_deg;
    }

    pub fn set_pos(&mut self, x: f32, y: f32) {
        self.pos = [x, y];
    }

    /// Applies toroidal wrap after movement.
    pub fn wrap(&mut self, bounds: &WorldBounds) -> bool {
        let from = self.pos;
        let moved = bounds.wrap(&mut self.pos);
        if moved {
            tracing::debug!(?from, to = ?self.pos, "camera wrapped around world bounds");
        }
        moved
    }
}

/// One frame's fan of rays. Finite, consumed once.
#[derive(Clone, Debug)]
pub struct Sweep<'a> {
    origin: [f32; 2],
    start: f32,
    density: f32,
    max_range: f32,
    caster: RayCaster,
    obstacles: &'a [Obstacle],
    next: usize,
    len: usize,
}

impl Iterator for Sweep<'_> {
    type Item = Option<HitRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.len {
            return None;
        }
        let angle = self.start + self.next as f32 * self.density;
        self.next += 1;
        Some(
            self.caster
                .march(self.origin, angle, self.obstacles, self.max_range),
        )
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = self.len - self.next;
        (rest, Some(rest))
    }
}

impl ExactSizeIterator for Sweep<'_> {}

impl FusedIterator for Sweep<'_> {}
