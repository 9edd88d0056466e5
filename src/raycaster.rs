//! Stepped ray marcher.
//!
//! A test point walks outward from the origin in fixed increments and is
//! checked against every obstacle at each increment. The first obstacle (by
//! index) that contains the point at the first colliding step wins. This is
//! nearest by march order, not by exact geometric distance.

use crate::error::{EngineError, Result};
use crate::geometry::{Obstacle, RAY_MARGIN};

/// March limit used when the caller has no range of its own.
pub const DEFAULT_MAX_DISTANCE: f32 = 500.0;

/// Result of a ray that stopped on an obstacle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitRecord {
    pub position: [f32; 2],
    pub distance: f32,
    /// Absolute ray angle in degrees.
    pub angle: f32,
    /// Index into the obstacle list.
    pub obstacle: usize,
}

/// Point at `distance` from `origin` along `angle_deg` (dx = cos, dy = sin).
#[inline]
pub fn ray_end(origin: [f32; 2], distance: f32, angle_deg: f32) -> [f32; 2] {
    let (s, c) = angle_deg.to_radians().sin_cos();
    [origin[0] + distance * c, origin[1] + distance * s]
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayCaster {
    /// March increment in world units.
    pub step: f32,
    /// Slack added around each obstacle's box so thin walls are not skipped.
    pub margin: [f32; 2],
}

impl Default for RayCaster {
    fn default() -> Self {
        Self {
            step: 1.0,
            margin: RAY_MARGIN,
        }
    }
}

impl RayCaster {
    pub fn new(step: f32) -> Result<Self> {
        let caster = Self {
            step,
            ..Self::default()
        };
        caster.validate()?;
        Ok(caster)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.step.is_finite() && self.step > 0.0) {
            return Err(EngineError::invalid(
                "step",
                format!("must be a positive finite number, got {}", self.step),
            ));
        }
        Ok(())
    }

    /// Casts one ray and returns the nearest hit by march order, or `None`
    /// once `max_distance` is reached without a collision.
    pub fn cast_to_nearest(
        &self,
        origin: [f32; 2],
        angle_deg: f32,
        obstacles: &[Obstacle],
        max_distance: f32,
    ) -> Result<Option<HitRecord>> {
        self.validate()?;
        check_range("max_distance", max_distance)?;
        Ok(self.march(origin, angle_deg, obstacles, max_distance))
    }

    /// Same as [`cast_to_nearest`](Self::cast_to_nearest) without the step
    /// and range checks. Callers must have validated both.
    pub(crate) fn march(
        &self,
        origin: [f32; 2],
        angle_deg: f32,
        obstacles: &[Obstacle],
        max_distance: f32,
    ) -> Option<HitRecord> {
        if obstacles.is_empty() {
            return None;
        }
        let (s, c) = angle_deg.to_radians().sin_cos();

        // Distance is derived from the step index so it does not drift.
        let steps = (max_distance / self.step).ceil() as u64;
        for i in 0..steps {
            let distance = i as f32 * self.step;
            if distance >= max_distance {
                break;
            }
            let point = [origin[0] + distance * c, origin[1] + distance * s];
            if let Some(obstacle) = obstacles.iter().position(|o| o.collides(point, self.margin)) {
                return Some(HitRecord {
                    position: point,
                    distance,
                    angle: angle_deg,
                    obstacle,
                });
            }
        }
        None
    }
}

/// A march limit must be positive and finite so the march ends.
pub(crate) fn check_range(name: &'static str, max_distance: f32) -> Result<()> {
    if !(max_distance.is_finite() && max_distance > 0.0) {
        return Err(EngineError::invalid(
            name,
            format!("must be a positive finite distance, got {max_distance}"),
        ));
    }
    Ok(())
}
