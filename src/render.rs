//! Render dispatch.
//!
//! Drawing goes through the [`Canvas`] trait so the scene can be rendered by
//! the macroquad window or recorded in tests. Coordinates handed to a canvas
//! are world coordinates (y up); flipping to screen space is the canvas' job.

use std::time::Instant;

use crate::entity::{EntityKind, VisualTransform};
use crate::frame::FrameTiming;
use crate::scene::Scene;

pub const FLOOR_LINE_THICKNESS: f32 = 2.0;
pub const TEXT_SIZE: f32 = 12.0;

/// Sprite to draw, centred on `transform.position`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub kind: EntityKind,
    pub transform: VisualTransform,
}

/// Drawing backend used by [`render_scene`].
pub trait Canvas {
    /// Clear the frame. Called once before anything else.
    fn begin_frame(&mut self);

    fn draw_sprite(&mut self, sprite: &Sprite);

    fn draw_line(&mut self, a: [f32; 2], b: [f32; 2], thickness: f32);

    /// Text with its baseline at `position`.
    fn draw_text(&mut self, text: &str, position: [f32; 2], size: f32);
}

/// Draw one frame of `scene`.
///
/// Sprites first, then the static lines, then the two timing readouts. The
/// drawing time shown is the time spent on sprites and lines of this frame.
pub fn render_scene(scene: &Scene, timing: &FrameTiming, canvas: &mut impl Canvas) {
    canvas.begin_frame();
    let draw_start_time = Instant::now();

    for entity in scene.entities() {
        canvas.draw_sprite(&Sprite {
            kind: entity.kind,
            transform: entity.transform,
        });
    }

    for line in scene.static_lines() {
        if let Some((a, b)) = scene.world().segment_endpoints(line.handles.collider) {
            canvas.draw_line(a, b, FLOOR_LINE_THICKNESS);
        }
    }

    let draw_time = draw_start_time.elapsed();
    let top = scene.config().screen_height;
    canvas.draw_text(
        &format!("Processing time: {:.3}", timing.processing.as_secs_f64()),
        [20.0, top - 20.0],
        TEXT_SIZE,
    );
    canvas.draw_text(
        &format!("Drawing time: {:.3}", draw_time.as_secs_f64()),
        [20.0, top - 40.0],
        TEXT_SIZE,
    );
}
