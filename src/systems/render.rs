//! Frame rendering.
//!
//! Clears the backbuffer, draws every sprite with exactly one textured quad,
//! then every text label, and presents when the draw handle drops.

use bevy_ecs::prelude::*;
use raylib::prelude::*;

use crate::components::mapposition::MapPosition;
use crate::components::sprite::Sprite;
use crate::components::textlabel::TextLabel;
use crate::resources::texturestore::TextureStore;

const BACKGROUND: Color = Color::BLACK;

pub fn render_system(
    mut rl: NonSendMut<raylib::RaylibHandle>,
    th: NonSend<raylib::RaylibThread>,
    textures: Res<TextureStore>,
    sprites: Query<(&Sprite, &MapPosition)>,
    labels: Query<&TextLabel<Texture2D>>,
) {
    let mut d = rl.begin_drawing(&th);
    d.clear_background(BACKGROUND);

    for (sprite, position) in sprites.iter() {
        // keys are checked when the entity is spawned
        if let Some(tex) = textures.get(&sprite.tex_key) {
            d.draw_texture_pro(
                tex,
                sprite.source_rect(),
                sprite.dest_rect(position.pos),
                sprite.origin,
                0.0,
                Color::WHITE,
            );
        }
    }

    for label in labels.iter() {
        if let Some(tex) = label.texture() {
            let src = Rectangle {
                x: 0.0,
                y: 0.0,
                width: tex.width as f32,
                height: tex.height as f32,
            };
            d.draw_texture_pro(
                tex,
                src,
                label.dest,
                Vector2 { x: 0.0, y: 0.0 },
                0.0,
                Color::WHITE,
            );
        }
    }
}
