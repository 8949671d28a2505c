// Signals for communication between systems

use bevy_ecs::prelude::Component;
use rustc_hash::FxHashSet;

/// Flag written by the intent controller while the entity walks.
pub const MOVING: &str = "moving";
/// Flag written by the animation system when a one-shot clip completes.
pub const ANIMATION_ENDED: &str = "animation_ended";

#[derive(Debug, Clone, Default, Component)]
pub struct Signals {
    pub flags: FxHashSet<String>,
}

impl Signals {
    pub fn with_flag(mut self, key: impl Into<String>) -> Self {
        self.set_flag(key);
        self
    }
    pub fn set_flag(&mut self, key: impl Into<String>) {
        self.flags.insert(key.into());
    }
    pub fn clear_flag(&mut self, key: &str) {
        self.flags.remove(key);
    }
    pub fn set_flag_to(&mut self, key: &str, value: bool) {
        if value {
            self.set_flag(key);
        } else {
            self.clear_flag(key);
        }
    }
    pub fn has_flag(&self, key: &str) -> bool {
        self.flags.contains(key)
    }
}
