//! Time update system.
//!
//! Advances the shared [`WorldTime`](crate::resources::worldtime::WorldTime)
//! resource by exactly one fixed tick per loop iteration.
use bevy_ecs::prelude::*;

use crate::resources::worldtime::WorldTime;

/// Step the simulated clock by one tick.
pub fn update_world_time(world: &mut World) {
    let mut wt = world.resource_mut::<WorldTime>();
    wt.tick += 1;
    wt.elapsed = wt.tick as f64 * wt.delta;
}
