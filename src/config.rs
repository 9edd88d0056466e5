//! Startup configuration, read once from a TOML file.
//!
//! ```toml
//! game_mode = true
//! game_screen = [1280, 640]
//! fov = 90.0
//! density = 1.0
//! max_range = 800.0
//!
//! [[obstacle]]
//! kind = "wall"
//! start = [250.0, 100.0]
//! end = [400.0, 100.0]
//! ```
//!
//! Every key is optional. Without any `[[obstacle]]` the demo scene is used.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::FrameConfig;
use crate::camera::Camera;
use crate::error::{ConfigError, EngineError};
use crate::geometry::{Color, Obstacle, SideMask, WHITE};
use crate::input::TurnRates;
use crate::projector::Projector;
use crate::raycaster::RayCaster;
use crate::world::{World, WorldBounds};

/// Scene entry as written in the config file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ObstacleSpec {
    Wall {
        start: [f32; 2],
        end: [f32; 2],
        #[serde(default = "default_color")]
        color: Color,
    },
    Block {
        origin: [f32; 2],
        size: [f32; 2],
        #[serde(default = "default_color")]
        color: Color,
    },
    Hollow {
        origin: [f32; 2],
        size: [f32; 2],
        #[serde(default = "default_color")]
        color: Color,
        /// Omitted sides in top, left, right, bottom order.
        #[serde(default)]
        omit: [bool; 4],
    },
}

fn default_color() -> Color {
    WHITE
}

impl ObstacleSpec {
    pub fn build(&self) -> Obstacle {
        match *self {
            ObstacleSpec::Wall { start, end, color } => Obstacle::wall(start, end).with_color(color),
            ObstacleSpec::Block {
                origin,
                size,
                color,
            } => Obstacle::block(origin, size).with_color(color),
            ObstacleSpec::Hollow {
                origin,
                size,
                color,
                omit,
            } => Obstacle::hollow(origin, size, SideMask::from_flags(omit)).with_color(color),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Full-screen 3D view. When false the screen is split with the overhead
    /// map on the left.
    pub game_mode: bool,
    pub game_screen: [u32; 2],
    pub map_screen: [u32; 2],
    pub fov: f32,
    pub density: f32,
    pub max_range: f32,
    pub movement_speed: f32,
    pub step: f32,
    pub turn_speed: f32,
    pub mouse_turn: f32,
    pub start: [f32; 2],
    pub start_angle: f32,
    #[serde(rename = "obstacle")]
    pub obstacles: Vec<ObstacleSpec>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            game_mode: true,
            game_screen: [1280, 640],
            map_screen: [1280, 640],
            fov: 90.0,
            density: 1.0,
            max_range: 800.0,
            movement_speed: 2.0,
            step: 1.0,
            turn_speed: 2.0,
            mouse_turn: 0.25,
            start: [200.0, 250.0],
            start_angle: 290.0,
            obstacles: Vec::new(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        tracing::info!(path = %path.display(), game_mode = config.game_mode, "loaded config");
        Ok(config)
    }

    /// Loads `path` if given and readable, defaults otherwise. Parse and
    /// validation errors are still returned.
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            tracing::debug!("no config path given, using defaults");
            return Ok(Self::default());
        };
        match Self::load(path.as_ref()) {
            Err(ConfigError::Io(e)) => {
                tracing::debug!(path = %path.as_ref().display(), error = %e, "config unreadable, using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        self.camera().validate()?;
        self.caster().validate()?;
        let [w, h] = self.screen();
        if w == 0 || h == 0 {
            return Err(EngineError::invalid(
                "screen",
                format!("screen size must be nonzero, got {w}x{h}"),
            ));
        }
        Ok(())
    }

    /// Window size for the active mode.
    pub fn screen(&self) -> [u32; 2] {
        if self.game_mode {
            self.game_screen
        } else {
            self.map_screen
        }
    }

    pub fn camera(&self) -> Camera {
        Camera {
            pos: self.start,
            angle: self.start_angle,
            fov: self.fov,
            max_range: self.max_range,
            speed: self.movement_speed,
            density: self.density,
        }
    }

    pub fn caster(&self) -> RayCaster {
        RayCaster {
            step: self.step,
            ..RayCaster::default()
        }
    }

    pub fn world(&self) -> World {
        if self.obstacles.is_empty() {
            World::demo()
        } else {
            World::new(self.obstacles.iter().map(ObstacleSpec::build).collect())
        }
    }

    /// The camera roams the left half of the screen area.
    pub fn bounds(&self) -> WorldBounds {
        let [w, h] = self.screen();
        WorldBounds::new((w / 2) as f32, h as f32)
    }

    pub fn turn_rates(&self) -> TurnRates {
        TurnRates {
            keys: self.turn_speed,
            pointer: self.mouse_turn,
        }
    }

    pub fn frame_config(&self) -> FrameConfig {
        let screen = self.screen();
        let projector = if self.game_mode {
            Projector::new(screen, 0.0, 0)
        } else {
            Projector::new(screen, (screen[0] / 2) as f32, 2)
        };
        FrameConfig {
            projector,
            caster: self.caster(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.world(), World::demo());
    }

    #[test]
    fn partial_file_overrides_only_given_keys() {
        let config = EngineConfig::from_toml_str(
            r#"
            game_mode = false
            map_screen = [800, 400]
            density = 5.0
            "#,
        )
        .unwrap();
        assert!(!config.game_mode);
        assert_eq!(config.screen(), [800, 400]);
        assert_eq!(config.fov, 90.0);
        assert_eq!(config.camera().density, 5.0);
        assert_eq!(config.bounds(), WorldBounds::new(400.0, 400.0));

        let frame = config.frame_config();
        assert_eq!(frame.projector.x_offset, 400.0);
        assert_eq!(frame.projector.divider, 2);
    }

    #[test]
    fn game_mode_uses_full_width() {
        let frame = EngineConfig::default().frame_config();
        assert_eq!(frame.projector.x_offset, 0.0);
        assert_eq!(frame.projector.divider, 0);
        assert_eq!(frame.projector.screen, [1280, 640]);
    }

    #[test]
    fn obstacles_replace_demo_scene() {
        let config = EngineConfig::from_toml_str(
            r#"
            [[obstacle]]
            kind = "wall"
            start = [0.0, 0.0]
            end = [10.0, 0.0]

            [[obstacle]]
            kind = "hollow"
            origin = [0.0, 0.0]
            size = [20.0, 20.0]
            color = [255, 0, 0]
            omit = [false, true, false, false]

            [[obstacle]]
            kind = "block"
            origin = [5.0, 5.0]
            size = [2.0, 2.0]
            "#,
        )
        .unwrap();
        let world = config.world();
        assert_eq!(world.obstacles.len(), 3);
        assert_eq!(world.obstacles[0], Obstacle::wall([0.0, 0.0], [10.0, 0.0]));
        assert_eq!(world.obstacles[1].segments().len(), 3);
        assert_eq!(world.obstacles[1].color(), [255, 0, 0]);
        assert!(matches!(world.obstacles[2], Obstacle::Block(_)));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = EngineConfig::from_toml_str("density = 0.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(EngineError::InvalidArgument { name: "density", .. })));

        let err = EngineConfig::from_toml_str("step = -1.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = EngineConfig::from_toml_str("game_screen = [0, 640]").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = EngineConfig::from_toml_str("fov = \"wide\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config =
            EngineConfig::load_or_default(Some("/nonexistent/raycast_engine.toml")).unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(
            EngineConfig::load_or_default(None::<&str>).unwrap(),
            EngineConfig::default()
        );
    }
}
