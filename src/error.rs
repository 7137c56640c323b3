use rapier2d::prelude::RigidBodyHandle;
use thiserror::Error;

use crate::entity::EntityId;

/// Errors raised while loading or validating a [`SceneConfig`](crate::SceneConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid value for {field}: {value} (must be > 0)")]
    NonPositive { field: &'static str, value: f32 },

    #[error("{boxes} stacked boxes leave no room under max_entities = {max_entities}")]
    GridExceedsCap { boxes: usize, max_entities: usize },
}

/// Errors raised by the scene, the input handlers and the frame loop.
///
/// `MissingBody` and `UnknownBody` mean an entity and the physics world
/// disagree; they are logic errors and callers are expected to bail out.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Entity {0} has no rigid body in the physics world")]
    MissingBody(EntityId),

    #[error("Rigid body {0:?} is not in the physics world")]
    UnknownBody(RigidBodyHandle),
}
