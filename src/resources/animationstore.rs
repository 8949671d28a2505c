//! Animation resource registry.
//!
//! Clips are loaded once per character from a spritesheet descriptor (see
//! [`crate::spritesheet`]) into an [`AnimationTable`]. Tables are immutable
//! after loading and shared behind an [`Arc`] by every entity of that
//! character; the [`AnimationStore`] resource keeps them reachable by
//! character key.

use std::sync::Arc;

use bevy_ecs::prelude::Resource;
use rustc_hash::FxHashMap;

/// Pixel rectangle inside a spritesheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl FrameRect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// True when the whole rectangle lies inside a `sheet_width` x `sheet_height` image.
    pub fn fits_within(&self, sheet_width: i32, sheet_height: i32) -> bool {
        self.x >= 0
            && self.y >= 0
            && i64::from(self.x) + i64::from(self.width) <= i64::from(sheet_width)
            && i64::from(self.y) + i64::from(self.height) <= i64::from(sheet_height)
    }
}

/// Immutable data describing one named clip of a spritesheet.
///
/// Frame `i` is the `origin` rectangle shifted by `i * (stride_x, stride_y)`.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    pub name: String,
    /// Texture key in [`crate::resources::texturestore::TextureStore`].
    pub sheet: String,
    /// Source rectangle of the first frame.
    pub origin: FrameRect,
    pub stride_x: i32,
    pub stride_y: i32,
    /// Number of frames. Always at least 1.
    pub frame_count: usize,
    /// Playback speed. Zero means the clip never advances.
    pub fps: f32,
    /// Whether the clip restarts after the last frame.
    pub looped: bool,
}

impl AnimationClip {
    /// Source rectangle of frame `index`, clamped to the last frame.
    ///
    /// Offsets saturate at the `i32` range; loaded clips never get there.
    pub fn frame_rect(&self, index: usize) -> FrameRect {
        let i = self.clamp_index(index);
        FrameRect {
            x: self.origin.x.saturating_add(i.saturating_mul(self.stride_x)),
            y: self.origin.y.saturating_add(i.saturating_mul(self.stride_y)),
            width: self.origin.width,
            height: self.origin.height,
        }
    }

    /// Like [`frame_rect`](Self::frame_rect), but `None` when an offset
    /// leaves the `i32` range.
    pub fn checked_frame_rect(&self, index: usize) -> Option<FrameRect> {
        let i = self.clamp_index(index);
        Some(FrameRect {
            x: self.origin.x.checked_add(i.checked_mul(self.stride_x)?)?,
            y: self.origin.y.checked_add(i.checked_mul(self.stride_y)?)?,
            width: self.origin.width,
            height: self.origin.height,
        })
    }

    fn clamp_index(&self, index: usize) -> i32 {
        let last = index.min(self.frame_count.saturating_sub(1));
        i32::try_from(last).unwrap_or(i32::MAX)
    }

    /// Total playback time of one pass through the clip, if it advances at all.
    pub fn duration(&self) -> Option<f64> {
        if self.fps > 0.0 {
            Some(self.frame_count as f64 / self.fps as f64)
        } else {
            None
        }
    }
}

/// Clip name to clip mapping for one character.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationTable {
    clips: FxHashMap<String, AnimationClip>,
}

impl AnimationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a clip, returning the clip it replaced (if the name was taken).
    pub fn insert(&mut self, clip: AnimationClip) -> Option<AnimationClip> {
        self.clips.insert(clip.name.clone(), clip)
    }

    pub fn get(&self, name: &str) -> Option<&AnimationClip> {
        self.clips.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.clips.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn clips(&self) -> impl Iterator<Item = &AnimationClip> {
        self.clips.values()
    }

    /// Distinct sheet keys referenced by the clips.
    pub fn sheets(&self) -> Vec<&str> {
        let mut sheets: Vec<&str> = self.clips.values().map(|c| c.sheet.as_str()).collect();
        sheets.sort_unstable();
        sheets.dedup();
        sheets
    }
}

/// Central registry of animation tables keyed by character.
#[derive(Resource, Default)]
pub struct AnimationStore {
    tables: FxHashMap<String, Arc<AnimationTable>>,
}

impl AnimationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a character's table and hand back the shared handle.
    pub fn insert(&mut self, character: impl Into<String>, table: AnimationTable) -> Arc<AnimationTable> {
        let table = Arc::new(table);
        self.tables.insert(character.into(), Arc::clone(&table));
        table
    }

    pub fn get(&self, character: &str) -> Option<Arc<AnimationTable>> {
        self.tables.get(character).cloned()
    }
}
