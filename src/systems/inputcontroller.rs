//! Keyboard-driven walking.
//!
//! Turns the held intents in [`InputState`] into horizontal velocity for every
//! [`InputControlled`] entity. Velocity is set outright each tick; there is
//! no acceleration or friction on the horizontal axis.

use bevy_ecs::prelude::*;

use crate::components::animation::{Animation, Facing};
use crate::components::inputcontrolled::InputControlled;
use crate::components::rigidbody::RigidBody;
use crate::components::signals::{MOVING, Signals};
use crate::resources::input::InputState;

/// Direction of travel for the held keys.
///
/// Exactly one key held walks that way. Both held cancel out, the same as
/// neither, so the result never depends on event order.
pub fn horizontal_intent(left: bool, right: bool) -> Option<Facing> {
    match (left, right) {
        (true, false) => Some(Facing::Left),
        (false, true) => Some(Facing::Right),
        _ => None,
    }
}

pub fn input_intent_controller(
    mut query: Query<(
        &InputControlled,
        &mut RigidBody,
        Option<&mut Animation>,
        Option<&mut Signals>,
    )>,
    input: Res<InputState>,
) {
    let intent = horizontal_intent(input.move_left.active, input.move_right.active);
    for (controlled, mut rigidbody, animation, signals) in query.iter_mut() {
        rigidbody.velocity.x = intent.map_or(0.0, |dir| dir.sign() * controlled.speed);
        if let (Some(dir), Some(mut animation)) = (intent, animation) {
            // keep the last facing while standing
            if animation.facing != dir {
                animation.facing = dir;
            }
        }
        if let Some(mut signals) = signals {
            if signals.has_flag(MOVING) != intent.is_some() {
                signals.set_flag_to(MOVING, intent.is_some());
            }
        }
    }
}
