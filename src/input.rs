use log::debug;

use crate::entity::EntityId;
use crate::error::SceneError;
use crate::scene::Scene;

/// Pointer buttons the demo reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    /// Grabs and drags entities.
    Primary,
    /// Shoots a coin.
    Secondary,
    Middle,
}

/// Per-scene pointer state shared by the input handlers and the frame loop.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputState {
    /// Entity currently held by the pointer, if any. At most one.
    pub dragged: Option<EntityId>,
    /// Last pointer position reported while pressing or dragging.
    pub last_pointer: [f32; 2],
}

impl InputState {
    pub fn is_dragging(&self) -> bool {
        self.dragged.is_some()
    }

    /// Drop the drag if it refers to one of `removed`.
    pub fn forget(&mut self, removed: &[EntityId]) {
        if self.dragged.is_some_and(|id| removed.contains(&id)) {
            debug!("dragged entity removed, releasing drag");
            self.dragged = None;
        }
    }
}

/// Primary press picks up the topmost entity under the pointer, secondary
/// press shoots a coin from the pointer position.
pub fn on_mouse_press(
    scene: &mut Scene,
    input: &mut InputState,
    point: [f32; 2],
    button: MouseButton,
) -> Result<(), SceneError> {
    match button {
        MouseButton::Primary => {
            input.last_pointer = point;
            if let Some(id) = scene.entity_at(point, scene.config().pick_tolerance) {
                debug!("grabbed entity {id}");
                input.dragged = Some(id);
            }
        }
        MouseButton::Secondary => {
            scene.spawn_coin(point, input.dragged)?;
        }
        MouseButton::Middle => {}
    }
    Ok(())
}

/// Primary release lets go of whatever is held.
pub fn on_mouse_release(input: &mut InputState, button: MouseButton) {
    if button == MouseButton::Primary {
        input.dragged = None;
    }
}

/// While dragging, move the held body to the pointer and give it velocity
/// proportional to the pointer delta.
///
/// The frame loop pins the body and zeroes its velocity after every step,
/// so the velocity set here does not survive the next tick.
pub fn on_mouse_motion(
    scene: &mut Scene,
    input: &mut InputState,
    point: [f32; 2],
    delta: [f32; 2],
) -> Result<(), SceneError> {
    let Some(id) = input.dragged else {
        return Ok(());
    };
    let body = scene.entity(id).ok_or(SceneError::MissingBody(id))?.body;
    let gain = scene.config().drag_gain;
    input.last_pointer = point;
    let world = scene.world_mut();
    world.set_body_position(body, point)?;
    world.set_body_velocity(body, [delta[0] * gain, delta[1] * gain])?;
    Ok(())
}

/// Scrolling has no effect on the scene. Returns whether anything changed.
pub fn on_mouse_scroll(_input: &mut InputState, _delta: [f32; 2]) -> bool {
    false
}
