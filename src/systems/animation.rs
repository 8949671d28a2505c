//! Animation systems.
//!
//! - [`animation_controller`] picks the clip each entity should play from its
//!   [`Signals`] and switches to it. Asking for the clip that is already
//!   playing keeps the current frame.
//! - [`animation`] advances playback by the fixed tick and points the
//!   [`Sprite`] at the current frame of the clip's sheet.
//!
//! Run the controller before `animation` so a switch shows frame 0 in the
//! same tick.

use bevy_ecs::prelude::*;

use crate::components::animation::{Animation, AnimationController};
use crate::components::signals::{ANIMATION_ENDED, Signals};
use crate::components::sprite::Sprite;
use crate::resources::worldtime::WorldTime;

/// Switch each entity to the clip its controller selects.
///
/// A selected clip missing from the table is a setup defect; the error is
/// returned to the schedule instead of being skipped.
pub fn animation_controller(
    mut query: Query<(&AnimationController, &mut Animation, &mut Signals)>,
) -> bevy_ecs::error::Result {
    for (controller, mut animation, mut signals) in query.iter_mut() {
        let wanted = controller.select(&signals);
        if animation.clip_name() == Some(wanted) {
            continue;
        }
        let wanted = wanted.to_string();
        if animation.play(&wanted)? {
            log::debug!("animation switched to '{}'", wanted);
            signals.clear_flag(ANIMATION_ENDED);
        }
    }
    Ok(())
}

/// Advance playback and update the sprite frame.
pub fn animation(
    mut query: Query<(&mut Animation, &mut Sprite, Option<&mut Signals>)>,
    time: Res<WorldTime>,
) {
    for (mut animation, mut sprite, signals) in query.iter_mut() {
        if animation.advance(time.delta) {
            if let Some(mut signals) = signals {
                signals.set_flag(ANIMATION_ENDED);
            }
        }

        let Some(clip) = animation.current_clip() else {
            continue;
        };
        let rect = clip.frame_rect(animation.frame_index());
        let flip_h = animation.flip_h();
        sprite.show_frame(&clip.sheet, rect);
        sprite.flip_h = flip_h;
    }
}
