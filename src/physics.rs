use rapier2d::prelude::*;

// Simulation constants
pub const FIXED_TIME_STEP: Real = 1.0 / 80.0;
pub const GRAVITY: [Real; 2] = [0.0, -900.0];

// Screen constants (world units are pixels, y up)
pub const SCREEN_WIDTH: f32 = 1200.0;
pub const SCREEN_HEIGHT: f32 = 800.0;

// Rapier tunes its tolerances for ~1 unit objects; our boxes are ~50 px.
pub const LENGTH_UNIT: Real = 50.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodySnapshot {
    pub position: [f32; 2],
    pub velocity: [f32; 2],
    pub rotation: f32,
}

/// Moment of inertia of a solid box about its centre.
pub fn moment_for_box(mass: Real, width: Real, height: Real) -> Real {
    mass * (width * width + height * height) / 12.0
}

/// Moment of inertia of a ring (or disc when `inner_radius` is 0) about its centre.
pub fn moment_for_circle(mass: Real, inner_radius: Real, outer_radius: Real) -> Real {
    mass * (inner_radius * inner_radius + outer_radius * outer_radius) / 2.0
}
