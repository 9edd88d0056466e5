//! Per-frame camera update from held commands and pointer motion.

use std::collections::HashSet;

use crate::camera::Camera;
use crate::world::WorldBounds;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    Forward,
    Backward,
    StrafeLeft,
    StrafeRight,
    TurnLeft,
    TurnRight,
}

/// Turn rates in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TurnRates {
    /// Per frame while a turn command is held.
    pub keys: f32,
    /// Per horizontal pointer motion event. Only the sign of each event's
    /// motion is used.
    pub pointer: f32,
}

impl Default for TurnRates {
    fn default() -> Self {
        Self {
            keys: 2.0,
            pointer: 0.25,
        }
    }
}

#[derive(Debug, Default)]
pub struct InputState {
    held: HashSet<Command>,
    // Net count of right (+1) and left (-1) motion events.
    pointer_steps: i32,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, command: Command) {
        self.held.insert(command);
    }

    pub fn release(&mut self, command: Command) {
        self.held.remove(&command);
    }

    pub fn is_held(&self, command: Command) -> bool {
        self.held.contains(&command)
    }

    /// Records one pointer motion event.
    pub fn add_pointer_motion(&mut self, dx: f64) {
        if dx > 0.0 {
            self.pointer_steps += 1;
        } else if dx < 0.0 {
            self.pointer_steps -= 1;
        }
    }

    /// Drops everything, e.g. when the window loses focus.
    pub fn clear(&mut self) {
        self.held.clear();
        self.pointer_steps = 0;
    }

    /// Rotates then moves `camera` for one frame and wraps it into `bounds`.
    /// Each pointer motion event since the last call turns by `turn.pointer`.
    pub fn apply(&mut self, camera: &mut Camera, turn: TurnRates, bounds: &WorldBounds) {
        let steps = std::mem::take(&mut self.pointer_steps);
        if steps != 0 {
            camera.rotate(turn.pointer * steps as f32);
        }

        if self.is_held(Command::TurnRight) {
            camera.rotate(turn.keys);
        }
        if self.is_held(Command::TurnLeft) {
            camera.rotate(-turn.keys);
        }
        if self.is_held(Command::Forward) {
            camera.forward();
        }
        if self.is_held(Command::Backward) {
            camera.backward();
        }
        if self.is_held(Command::StrafeLeft) {
            camera.strafe_left();
        }
        if self.is_held(Command::StrafeRight) {
            camera.strafe_right();
        }

        camera.wrap(bounds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> WorldBounds {
        WorldBounds::new(640.0, 640.0)
    }

    #[test]
    fn held_keys_turn_and_move() {
        let mut cam = Camera {
            speed: 2.0,
            ..Camera::new([100.0, 100.0], 0.0)
        };
        let mut input = InputState::new();
        input.press(Command::Forward);
        input.press(Command::TurnRight);
        input.apply(&mut cam, TurnRates::default(), &bounds());
        assert_eq!(cam.angle, 2.0);
        assert!(cam.pos[0] > 101.9);

        input.release(Command::Forward);
        input.release(Command::TurnRight);
        let before = cam;
        input.apply(&mut cam, TurnRates::default(), &bounds());
        assert_eq!(cam, before);
    }

    #[test]
    fn opposite_commands_cancel() {
        let mut cam = Camera {
            speed: 2.0,
            ..Camera::new([100.0, 100.0], 0.0)
        };
        let mut input = InputState::new();
        input.press(Command::Forward);
        input.press(Command::Backward);
        input.press(Command::TurnLeft);
        input.press(Command::TurnRight);
        input.apply(&mut cam, TurnRates::default(), &bounds());
        assert_eq!(cam.angle, 0.0);
        assert!((cam.pos[0] - 100.0).abs() < 1e-4);
    }

    #[test]
    fn each_pointer_event_turns_by_its_sign() {
        let mut cam = Camera::new([100.0, 100.0], 0.0);
        let mut input = InputState::new();
        input.add_pointer_motion(37.0);
        input.apply(&mut cam, TurnRates::default(), &bounds());
        assert_eq!(cam.angle, 0.25);

        // Consumed by the previous frame.
        input.apply(&mut cam, TurnRates::default(), &bounds());
        assert_eq!(cam.angle, 0.25);

        for _ in 0..3 {
            input.add_pointer_motion(5.0);
        }
        input.apply(&mut cam, TurnRates::default(), &bounds());
        assert_eq!(cam.angle, 1.0);

        // Zero motion is not a turn.
        input.add_pointer_motion(0.0);
        input.apply(&mut cam, TurnRates::default(), &bounds());
        assert_eq!(cam.angle, 1.0);

        // Left and right events within a frame offset each other.
        for dx in [-3.0, -1.0, -2.0, 1.0] {
            input.add_pointer_motion(dx);
        }
        input.apply(&mut cam, TurnRates::default(), &bounds());
        assert_eq!(cam.angle, 0.5);
    }

    #[test]
    fn movement_wraps_around_bounds() {
        let mut cam = Camera {
            speed: 2.0,
            ..Camera::new([639.5, 300.0], 0.0)
        };
        let mut input = InputState::new();
        input.press(Command::Forward);
        input.apply(&mut cam, TurnRates::default(), &bounds());
        assert_eq!(cam.pos, [0.0, 300.0]);

        input.clear();
        input.press(Command::Backward);
        input.apply(&mut cam, TurnRates::default(), &bounds());
        assert_eq!(cam.pos, [640.0, 300.0]);
    }
}
