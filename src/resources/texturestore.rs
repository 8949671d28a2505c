//! Texture store resource.
//!
//! Owns every sprite texture loaded at startup, keyed by string. Sprites and
//! animation clips refer to textures by key only; each texture is released
//! exactly once, when the store is dropped during teardown.

use bevy_ecs::prelude::Resource;
use raylib::prelude::Texture2D;
use rustc_hash::FxHashMap;

use crate::spritesheet::SheetSizes;

#[derive(Resource, Default)]
pub struct TextureStore {
    map: FxHashMap<String, Texture2D>,
}

impl TextureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a texture. A key is loaded once; a second insert replaces and frees the first.
    pub fn insert(&mut self, key: impl Into<String>, texture: Texture2D) {
        let key = key.into();
        if self.map.insert(key.clone(), texture).is_some() {
            log::warn!("Texture '{}' replaced; previous texture unloaded", key);
        }
    }

    pub fn get(&self, key: &str) -> Option<&Texture2D> {
        self.map.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Pixel size of every stored texture, for descriptor bounds checks.
    pub fn sheet_sizes(&self) -> SheetSizes {
        self.map
            .iter()
            .map(|(key, tex)| (key.clone(), (tex.width, tex.height)))
            .collect()
    }
}
