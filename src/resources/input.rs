//! Movement intent resource.
//!
//! The raw event source (see [`crate::systems::input`]) turns hardware state
//! into [`InputEvent`]s; [`InputState::apply`] folds them into the boolean
//! intents the simulation reads. Defaults bind A/D to walking and Escape to
//! quitting.
use bevy_ecs::prelude::*;
use raylib::prelude::*;

#[derive(Debug, Clone, Copy)]
/// Boolean key state with an associated keyboard binding.
pub struct BoolState {
    /// Whether the key is currently held.
    pub active: bool,
    /// The key bound to this action.
    pub key_binding: KeyboardKey,
}

impl BoolState {
    pub fn bound_to(key_binding: KeyboardKey) -> Self {
        Self {
            active: false,
            key_binding,
        }
    }
}

impl Default for BoolState {
    fn default() -> Self {
        Self::bound_to(KeyboardKey::KEY_NULL)
    }
}

/// Discrete input produced by the event source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Window close or interrupt.
    Quit,
    KeyDown { key: KeyboardKey, repeat: bool },
    KeyUp { key: KeyboardKey },
}

/// Held movement intents plus the quit binding.
#[derive(Resource, Debug, Clone)]
pub struct InputState {
    pub move_left: BoolState,
    pub move_right: BoolState,
    pub quit_key: KeyboardKey,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            move_left: BoolState::bound_to(KeyboardKey::KEY_A),
            move_right: BoolState::bound_to(KeyboardKey::KEY_D),
            quit_key: KeyboardKey::KEY_ESCAPE,
        }
    }
}

impl InputState {
    /// Fold one event into the intents. Returns `true` when the event asks to quit.
    ///
    /// Each binding is handled on its own; the quit key never touches the
    /// movement intents. Auto-repeat key downs are ignored.
    pub fn apply(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::Quit => return true,
            InputEvent::KeyDown { repeat: true, .. } => {}
            InputEvent::KeyDown { key, .. } if key == self.quit_key => return true,
            InputEvent::KeyDown { key, .. } if key == self.move_right.key_binding => {
                self.move_right.active = true;
            }
            InputEvent::KeyDown { key, .. } if key == self.move_left.key_binding => {
                self.move_left.active = true;
            }
            InputEvent::KeyDown { .. } => {}
            InputEvent::KeyUp { key } if key == self.move_right.key_binding => {
                self.move_right.active = false;
            }
            InputEvent::KeyUp { key } if key == self.move_left.key_binding => {
                self.move_left.active = false;
            }
            InputEvent::KeyUp { .. } => {}
        }
        false
    }
}
