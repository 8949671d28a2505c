//! Font store resource.
//!
//! A non-send resource that stores loaded fonts keyed by string IDs.
//! Fonts are loaded during setup and referenced by key from
//! [`TextLabel`](crate::components::textlabel::TextLabel) components.
//!
//! Note: This is a non-send resource because Raylib fonts must be accessed
//! from the main thread only.

use raylib::prelude::Font;
use rustc_hash::FxHashMap;

/// Map of font keys to loaded fonts.
///
/// This is a non-send resource; use `NonSend<FontStore>` in system parameters.
#[derive(Default)]
pub struct FontStore {
    fonts: FxHashMap<String, Font>,
}

impl FontStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, id: impl Into<String>, font: Font) {
        self.fonts.insert(id.into(), font);
    }

    pub fn get(&self, id: &str) -> Option<&Font> {
        self.fonts.get(id)
    }

    /// Unload all fonts.
    pub fn clear(&mut self) {
        self.fonts.clear();
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}
