mod physics;
mod entity;
mod error;
mod config;
mod world;
mod scene;
pub mod input;
pub mod frame;
pub mod render;

// Re-export public items
pub use physics::{
    moment_for_box, moment_for_circle, BodySnapshot, FIXED_TIME_STEP, GRAVITY, SCREEN_HEIGHT,
    SCREEN_WIDTH,
};
pub use entity::{EntityId, EntityKind, RenderableEntity, VisualTransform};
pub use error::{ConfigError, SceneError};
pub use config::SceneConfig;
pub use world::{BodyHandles, PhysicsWorld};
pub use scene::{Scene, StaticLine};
pub use input::{InputState, MouseButton};
pub use frame::{tick, Accumulator, FrameTiming};
pub use render::{render_scene, Canvas, Sprite};
