use bevy_ecs::prelude::Component;
use raylib::prelude::{Rectangle, Vector2};

use crate::resources::animationstore::FrameRect;

/// Sprite is identified by a texture key, its size in world units and an offset
/// selecting the current frame inside the spritesheet.
/// The origin is the pivot (in pixels) relative to the destination top-left.
#[derive(Component, Clone, Debug)]
pub struct Sprite {
    pub tex_key: String,
    pub width: f32,
    pub height: f32,
    pub offset: Vector2,
    pub origin: Vector2,
    pub flip_h: bool,
}

impl Sprite {
    pub fn new(tex_key: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            tex_key: tex_key.into(),
            width,
            height,
            offset: Vector2 { x: 0.0, y: 0.0 },
            origin: Vector2 { x: 0.0, y: 0.0 },
            flip_h: false,
        }
    }

    /// Point the sprite at frame `rect` of sheet `tex_key`.
    pub fn show_frame(&mut self, tex_key: &str, rect: FrameRect) {
        if self.tex_key != tex_key {
            self.tex_key = tex_key.to_string();
        }
        self.offset = Vector2 {
            x: rect.x as f32,
            y: rect.y as f32,
        };
        self.width = rect.width as f32;
        self.height = rect.height as f32;
    }

    /// Rectangle sampled from the texture. A negative width mirrors the frame.
    pub fn source_rect(&self) -> Rectangle {
        Rectangle {
            x: self.offset.x,
            y: self.offset.y,
            width: if self.flip_h { -self.width } else { self.width },
            height: self.height,
        }
    }

    /// Rectangle covered on screen when the sprite sits at `pos`.
    pub fn dest_rect(&self, pos: Vector2) -> Rectangle {
        Rectangle {
            x: pos.x,
            y: pos.y,
            width: self.width,
            height: self.height,
        }
    }
}
