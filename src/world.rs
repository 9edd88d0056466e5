use crate::geometry::{Obstacle, SideMask};

/// Static scene: obstacles in ray-test priority order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct World {
    pub obstacles: Vec<Obstacle>,
}

impl World {
    pub fn new(obstacles: Vec<Obstacle>) -> Self {
        Self { obstacles }
    }

    /// The built-in scene used when no obstacles are configured.
    pub fn demo() -> Self {
        Self::new(vec![
            Obstacle::wall([250.0, 100.0], [400.0, 100.0]),
            Obstacle::wall([400.0, 50.0], [400.0, 350.0]),
            Obstacle::block([200.0, 150.0], [50.0, 50.0]),
            Obstacle::hollow([10.0, 10.0], [400.0, 400.0], SideMask::NONE),
            Obstacle::hollow([150.0, 150.0], [50.0, 50.0], SideMask::RIGHT | SideMask::BOTTOM),
        ])
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }
}

/// Rectangle `[0, width] x [0, height]` the camera wraps around.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldBounds {
    pub width: f32,
    pub height: f32,
}

impl WorldBounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Toroidal wrap: crossing an edge re-enters at the opposite edge, the
    /// other coordinate untouched. Returns true if the point moved.
    pub fn wrap(&self, pos: &mut [f32; 2]) -> bool {
        let before = *pos;
        if pos[0] > self.width {
            pos[0] = 0.0;
        } else if pos[0] < 0.0 {
            pos[0] = self.width;
        }
        if pos[1] > self.height {
            pos[1] = 0.0;
        } else if pos[1] < 0.0 {
            pos[1] = self.height;
        }
        *pos != before
    }
}
