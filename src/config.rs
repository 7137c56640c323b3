use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::physics::{FIXED_TIME_STEP, GRAVITY, SCREEN_HEIGHT, SCREEN_WIDTH};

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

const fn default_screen_width() -> f32 {
    SCREEN_WIDTH
}
const fn default_screen_height() -> f32 {
    SCREEN_HEIGHT
}
const fn default_gravity() -> [f32; 2] {
    GRAVITY
}
const fn default_timestep() -> f32 {
    FIXED_TIME_STEP
}
const fn default_floor_height() -> f32 {
    80.0
}
const fn default_floor_friction() -> f32 {
    10.0
}
const fn default_columns() -> u32 {
    6
}
const fn default_rows() -> u32 {
    12
}
const fn default_box_size() -> f32 {
    45.0
}
const fn default_box_mass() -> f32 {
    12.0
}
const fn default_friction() -> f32 {
    0.3
}
const fn default_box_spacing() -> f32 {
    50.0
}
const fn default_box_gap() -> f32 {
    0.01
}
const fn default_stack_origin_x() -> f32 {
    300.0
}
const fn default_coin_mass() -> f32 {
    60.0
}
const fn default_coin_radius() -> f32 {
    10.0
}
const fn default_coin_speed() -> f32 {
    2000.0
}
const fn default_drag_gain() -> f32 {
    20.0
}
const fn default_pick_tolerance() -> f32 {
    1.0
}
const fn default_max_entities() -> usize {
    256
}

// ---------------------------------------------------------------------------
// SceneConfig
// ---------------------------------------------------------------------------

/// Everything needed to build a [`Scene`](crate::Scene).
///
/// All lengths are in world units (pixels, y up).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    #[serde(default = "default_screen_width")]
    pub screen_width: f32,
    #[serde(default = "default_screen_height")]
    pub screen_height: f32,

    /// Gravity vector [x, y].
    #[serde(default = "default_gravity")]
    pub gravity: [f32; 2],

    /// Simulated seconds per tick (default: 1/80).
    #[serde(default = "default_timestep")]
    pub timestep: f32,

    #[serde(default = "default_floor_height")]
    pub floor_height: f32,
    /// High so the stacks do not slide.
    #[serde(default = "default_floor_friction")]
    pub floor_friction: f32,

    /// Stack grid, `columns x rows` boxes.
    #[serde(default = "default_columns")]
    pub columns: u32,
    #[serde(default = "default_rows")]
    pub rows: u32,
    #[serde(default = "default_box_size")]
    pub box_size: f32,
    #[serde(default = "default_box_mass")]
    pub box_mass: f32,
    #[serde(default = "default_friction")]
    pub box_friction: f32,
    /// Horizontal distance between column centres.
    #[serde(default = "default_box_spacing")]
    pub box_spacing: f32,
    /// Vertical gap between stacked boxes so they do not start interpenetrating.
    #[serde(default = "default_box_gap")]
    pub box_gap: f32,
    #[serde(default = "default_stack_origin_x")]
    pub stack_origin_x: f32,

    #[serde(default = "default_coin_mass")]
    pub coin_mass: f32,
    #[serde(default = "default_coin_radius")]
    pub coin_radius: f32,
    #[serde(default = "default_friction")]
    pub coin_friction: f32,
    /// Initial horizontal speed of a shot coin.
    #[serde(default = "default_coin_speed")]
    pub coin_speed: f32,

    /// Multiplier from pointer delta to dragged body velocity.
    #[serde(default = "default_drag_gain")]
    pub drag_gain: f32,
    /// Point query radius used to pick entities.
    #[serde(default = "default_pick_tolerance")]
    pub pick_tolerance: f32,
    /// Entities whose body drops below this height are removed.
    #[serde(default)]
    pub removal_threshold: f32,
    /// Live entity cap; the oldest entity is evicted when a spawn would exceed it.
    #[serde(default = "default_max_entities")]
    pub max_entities: usize,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            screen_width: default_screen_width(),
            screen_height: default_screen_height(),
            gravity: default_gravity(),
            timestep: default_timestep(),
            floor_height: default_floor_height(),
            floor_friction: default_floor_friction(),
            columns: default_columns(),
            rows: default_rows(),
            box_size: default_box_size(),
            box_mass: default_box_mass(),
            box_friction: default_friction(),
            box_spacing: default_box_spacing(),
            box_gap: default_box_gap(),
            stack_origin_x: default_stack_origin_x(),
            coin_mass: default_coin_mass(),
            coin_radius: default_coin_radius(),
            coin_friction: default_friction(),
            coin_speed: default_coin_speed(),
            drag_gain: default_drag_gain(),
            pick_tolerance: default_pick_tolerance(),
            removal_threshold: 0.0,
            max_entities: default_max_entities(),
        }
    }
}

impl SceneConfig {
    /// Validate configuration. Returns Err on invalid values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("screen_width", self.screen_width),
            ("screen_height", self.screen_height),
            ("timestep", self.timestep),
            ("floor_friction", self.floor_friction),
            ("box_size", self.box_size),
            ("box_mass", self.box_mass),
            ("box_friction", self.box_friction),
            ("coin_mass", self.coin_mass),
            ("coin_radius", self.coin_radius),
            ("coin_friction", self.coin_friction),
            ("pick_tolerance", self.pick_tolerance),
        ];
        for (field, value) in positive {
            // Written as a negated comparison so NaN is rejected too.
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        if self.max_entities == 0 {
            return Err(ConfigError::NonPositive {
                field: "max_entities",
                value: 0.0,
            });
        }
        let boxes = self.columns as usize * self.rows as usize;
        if boxes >= self.max_entities {
            return Err(ConfigError::GridExceedsCap {
                boxes,
                max_entities: self.max_entities,
            });
        }
        Ok(())
    }

    /// Load from TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }
}
