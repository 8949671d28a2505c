//! Text label component.
//!
//! A [`TextLabel`] keeps its string, styling and the texture rasterised from
//! it. The texture type is generic so the label logic does not need a live
//! renderer; the game uses `TextLabel<Texture2D>`.

use bevy_ecs::prelude::Component;
use raylib::prelude::{Color, Rectangle};

use crate::error::ResourceError;

#[derive(Component, Debug)]
pub struct TextLabel<T: Send + Sync + 'static> {
    content: String,
    /// Key in [`crate::resources::fontstore::FontStore`].
    pub font: String,
    pub font_size: f32,
    pub spacing: f32,
    pub color: Color,
    /// Screen rectangle the texture is stretched into.
    pub dest: Rectangle,
    texture: Option<T>,
}

impl<T: Send + Sync + 'static> TextLabel<T> {
    /// Label without a texture yet; call [`TextLabel::set_text`] to rasterise it.
    pub fn new(
        font: impl Into<String>,
        font_size: f32,
        spacing: f32,
        color: Color,
        dest: Rectangle,
    ) -> Self {
        Self {
            content: String::new(),
            font: font.into(),
            font_size,
            spacing,
            color,
            dest,
            texture: None,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn texture(&self) -> Option<&T> {
        self.texture.as_ref()
    }

    /// Replace the text and regenerate the texture with `rasterize`.
    ///
    /// The old texture is released before `rasterize` runs, so the label never
    /// owns two textures at once. On failure the label is left without a
    /// texture and is skipped by the renderer.
    pub fn set_text<F>(&mut self, text: impl Into<String>, rasterize: F) -> Result<(), ResourceError>
    where
        F: FnOnce(&TextLabel<T>) -> Result<T, ResourceError>,
    {
        drop(self.texture.take());
        self.content = text.into();
        let texture = rasterize(&*self)?;
        self.texture = Some(texture);
        Ok(())
    }
}
