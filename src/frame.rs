use std::time::{Duration, Instant};

use crate::error::SceneError;
use crate::input::InputState;
use crate::scene::Scene;

// ---------------------------------------------------------------------------
// FrameTiming
// ---------------------------------------------------------------------------

/// Wall-clock cost of the last tick. Display only.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameTiming {
    pub processing: Duration,
    /// Entities removed by the cleanup pass of the tick.
    pub removed: usize,
}

// ---------------------------------------------------------------------------
// Tick
// ---------------------------------------------------------------------------

/// Run one fixed simulation tick.
///
/// 1. remove entities that fell below the threshold (and drop the drag if
///    it held one of them),
/// 2. step the world by one fixed timestep,
/// 3. pin the dragged body to the last pointer position with zero velocity,
/// 4. copy body transforms into the sprites.
///
/// Wall-clock time of the whole tick is returned in [`FrameTiming`].
pub fn tick(scene: &mut Scene, input: &mut InputState) -> Result<FrameTiming, SceneError> {
    let start_time = Instant::now();

    let removed = scene.remove_fallen()?;
    input.forget(&removed);

    scene.world_mut().step();

    if let Some(id) = input.dragged {
        let body = scene.entity(id).ok_or(SceneError::MissingBody(id))?.body;
        let world = scene.world_mut();
        world.set_body_position(body, input.last_pointer)?;
        world.set_body_velocity(body, [0.0, 0.0])?;
    }

    scene.sync_transforms()?;

    Ok(FrameTiming {
        processing: start_time.elapsed(),
        removed: removed.len(),
    })
}

// ---------------------------------------------------------------------------
// Accumulator
// ---------------------------------------------------------------------------

/// Fixed-timestep accumulator.
///
/// Collects real frame time and hands out whole simulation steps, capped per
/// frame so a slow frame cannot snowball into ever longer catch-up.
#[derive(Debug, Clone)]
pub struct Accumulator {
    accumulated: Duration,
    timestep: Duration,
    max_steps: u32,
    steps_this_frame: u32,
}

impl Accumulator {
    pub fn new(timestep_secs: f32) -> Self {
        Self {
            accumulated: Duration::ZERO,
            timestep: Duration::from_secs_f32(timestep_secs),
            max_steps: 5,
            steps_this_frame: 0,
        }
    }

    #[must_use]
    pub const fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Feed a frame delta and reset the per-frame step counter.
    pub fn accumulate(&mut self, delta: Duration) {
        self.accumulated = self.accumulated.saturating_add(delta);
        self.steps_this_frame = 0;
    }

    /// Consume one timestep if enough time has accumulated and the frame cap
    /// is not reached.
    pub fn should_step(&mut self) -> bool {
        if self.steps_this_frame >= self.max_steps {
            // Drop the backlog instead of carrying it into the next frame.
            self.accumulated = self.accumulated.min(self.timestep);
            return false;
        }
        if self.accumulated >= self.timestep {
            self.accumulated -= self.timestep;
            self.steps_this_frame += 1;
            return true;
        }
        false
    }
}
