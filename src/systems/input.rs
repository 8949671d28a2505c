//! Input system.
//!
//! [`update_input_state`] is the event source: it polls Raylib for key edges
//! and window close, turns them into [`InputEvent`]s and folds them into
//! [`InputState`]. A quit request raises the [`ExitFlag`], and so does an
//! interrupt caught by [`interrupt_quit`].
use bevy_ecs::prelude::*;
use raylib::ffi::KeyboardKey;

use crate::resources::exitflag::{ExitFlag, Interrupt};
use crate::resources::input::{InputEvent, InputState};

/// Poll Raylib for keyboard input and update the `InputState` resource.
pub fn update_input_state(
    mut input: ResMut<InputState>,
    mut exit: ResMut<ExitFlag>,
    rl: NonSendMut<raylib::RaylibHandle>,
) {
    let mut events: Vec<InputEvent> = Vec::new();
    if rl.window_should_close() {
        events.push(InputEvent::Quit);
    }

    let watched: [KeyboardKey; 3] = [
        input.move_left.key_binding,
        input.move_right.key_binding,
        input.quit_key,
    ];
    for key in watched {
        if rl.is_key_pressed(key) {
            events.push(InputEvent::KeyDown { key, repeat: false });
        }
        if rl.is_key_released(key) {
            events.push(InputEvent::KeyUp { key });
        }
    }

    for event in events {
        if input.apply(event) && !exit.is_requested() {
            log::info!("quit requested ({:?})", event);
            exit.request();
        }
    }
}

/// Turn a caught interrupt into a quit request.
pub fn interrupt_quit(interrupt: Option<Res<Interrupt>>, mut exit: ResMut<ExitFlag>) {
    let Some(interrupt) = interrupt else {
        return;
    };
    if interrupt.is_raised() && !exit.is_requested() {
        log::info!("quit requested (interrupt)");
        exit.request();
    }
}
