use std::fmt;

use rapier2d::prelude::*;

use crate::physics::BodySnapshot;

/// Stable identifier of a renderable entity. Never reused within a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntityKind {
    Box { width: Real, height: Real },
    Circle { radius: Real },
}

impl EntityKind {
    /// Size of the sprite quad in world units.
    pub fn sprite_size(&self) -> [f32; 2] {
        match *self {
            EntityKind::Box { width, height } => [width, height],
            EntityKind::Circle { radius } => [radius * 2.0, radius * 2.0],
        }
    }
}

/// Where the sprite is drawn. The angle is in degrees, counter-clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VisualTransform {
    pub position: [f32; 2],
    pub angle_degrees: f32,
}

impl VisualTransform {
    pub fn from_snapshot(snapshot: &BodySnapshot) -> Self {
        Self {
            position: snapshot.position,
            angle_degrees: snapshot.rotation.to_degrees(),
        }
    }
}

/// A sprite paired with the rigid body it mirrors.
///
/// The entity only holds handles; the bodies and colliders are owned by the
/// [`PhysicsWorld`](crate::PhysicsWorld).
#[derive(Debug, Clone)]
pub struct RenderableEntity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub body: RigidBodyHandle,
    pub collider: ColliderHandle,
    pub transform: VisualTransform,
}

impl RenderableEntity {
    pub fn is_circle(&self) -> bool {
        matches!(self.kind, EntityKind::Circle { .. })
    }
}
