//! Input-controlled movement component.
//!
//! Entities tagged with [`InputControlled`] follow the player's horizontal
//! movement intent (see [`crate::systems::inputcontroller`]).

use bevy_ecs::prelude::Component;

/// Walks left/right while the matching intent is held.
#[derive(Component, Clone, Copy, Debug)]
pub struct InputControlled {
    /// Walking speed in world units per second. One tick moves the entity by
    /// `speed * tick length`.
    pub speed: f32,
}

impl InputControlled {
    pub fn new(speed: f32) -> Self {
        Self { speed }
    }
}
