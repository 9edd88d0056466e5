//! Pseudo-3D raycasting renderer.
//!
//! Each frame a fan of rays is marched from the camera across its field of
//! view against a flat list of wall segments. Every hit becomes one
//! flat-shaded vertical band whose height falls off with the fish-eye
//! corrected distance.
//!
//! ```
//! use raycast_engine::{Camera, FrameConfig, World, render_frame};
//!
//! let world = World::demo();
//! let camera = Camera::new([200.0, 250.0], 290.0);
//! let columns = render_frame(&camera, &world, &FrameConfig::new([1280, 640])).unwrap();
//! assert!(columns.len() <= camera.ray_count());
//! ```

pub mod camera;
pub mod config;
pub mod error;
pub mod geometry;
pub mod input;
pub mod projector;
pub mod raycaster;
pub mod renderer;
pub mod scaler;
pub mod world;

pub use camera::{Camera, Sweep};
pub use config::EngineConfig;
pub use error::{ConfigError, EngineError, Result};
pub use geometry::{CompositeObstacle, Obstacle, Segment, SideMask};
pub use projector::{Projection, Projector};
pub use raycaster::{HitRecord, RayCaster};
pub use world::{World, WorldBounds};

/// Display and march settings that stay fixed for a session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameConfig {
    pub projector: Projector,
    pub caster: RayCaster,
}

impl FrameConfig {
    /// Full-width view with the default one-unit march step.
    pub fn new(screen: [u32; 2]) -> Self {
        Self {
            projector: Projector::new(screen, 0.0, 0),
            caster: RayCaster::default(),
        }
    }
}

/// Casts the fan for `camera` and keeps the raw hits.
pub fn cast_fan(camera: &Camera, world: &World, config: &FrameConfig) -> Result<Vec<Option<HitRecord>>> {
    Ok(camera.sweep(&world.obstacles, config.caster)?.collect())
}

/// Produces this frame's wall columns, left to right.
pub fn render_frame(camera: &Camera, world: &World, config: &FrameConfig) -> Result<Vec<Projection>> {
    let sweep = camera.sweep(&world.obstacles, config.caster)?;
    let columns = config.projector.project(sweep, camera)?;
    tracing::trace!(
        rays = camera.ray_count(),
        columns = columns.len(),
        "frame projected"
    );
    Ok(columns)
}
