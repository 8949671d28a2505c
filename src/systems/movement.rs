use bevy_ecs::prelude::*;
use raylib::prelude::*;

use crate::components::mapposition::MapPosition;
use crate::components::rigidbody::RigidBody;
use crate::resources::worldtime::WorldTime;

/// One semi-implicit Euler step: velocity first, then position with the new velocity.
pub fn integrate(pos: Vector2, body: &mut RigidBody, dt: f32) -> Vector2 {
    body.velocity += body.total_acceleration().scale_by(dt);
    pos + body.velocity.scale_by(dt)
}

pub fn movement(mut query: Query<(&mut MapPosition, &mut RigidBody)>, time: Res<WorldTime>) {
    let dt = time.delta_f32();
    for (mut position, mut rigidbody) in query.iter_mut() {
        if rigidbody.frozen {
            continue;
        }
        position.pos = integrate(position.pos, &mut rigidbody, dt);
    }
}
