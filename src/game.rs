//! Scene setup and teardown.
//!
//! [`setup`] acquires everything the game needs, in order: the font, sprite
//! textures, the animation table, the player and title entities, and finally
//! the audio thread with its music and footstep sound. [`teardown`] releases
//! them in reverse, before the window itself goes away.

use std::ffi::CString;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use bevy_ecs::prelude::*;
use log::info;
use raylib::ffi;
use raylib::prelude::*;

use crate::components::animation::{Animation, AnimationController, Condition};
use crate::components::inputcontrolled::InputControlled;
use crate::components::mapposition::MapPosition;
use crate::components::rigidbody::RigidBody;
use crate::components::signals::{MOVING, Signals};
use crate::components::sprite::Sprite;
use crate::components::textlabel::TextLabel;
use crate::error::{AnimationError, GameError, LoadError, ResourceError};
use crate::events::audio::AudioCmd;
use crate::resources::animationstore::{AnimationStore, AnimationTable};
use crate::resources::audio::{send_audio_cmd, setup_audio, shutdown_audio, wait_for_assets};
use crate::resources::exitflag::ExitFlag;
use crate::resources::fontstore::FontStore;
use crate::resources::gameconfig::GameConfig;
use crate::resources::input::InputState;
use crate::resources::texturestore::TextureStore;
use crate::resources::worldtime::WorldTime;
use crate::spritesheet::load_descriptor;
use crate::systems::audio::FootstepAudio;

pub const PLAYER: &str = "player";
pub const WALK_SHEET: &str = "player_walk";
pub const IDLE_SHEET: &str = "player_idle";
pub const IDLE_CLIP: &str = "idle";
pub const WALK_CLIP: &str = "walk";

const PLAYER_DESCRIPTOR: &str = "player_walk.txt";
const PLAYER_START: Vector2 = Vector2 { x: 150.0, y: 150.0 };
const PLAYER_FRAME: (f32, f32) = (66.0, 92.0);

const TITLE_FONT: &str = "hack";
const TITLE_FONT_FILE: &str = "Hack-Regular.ttf";
const TITLE_FONT_SIZE: i32 = 96;
const TITLE_TEXT: &str = "this is chuckie egg";
const TITLE_RECT: Rectangle = Rectangle {
    x: 50.0,
    y: 250.0,
    width: 300.0,
    height: 40.0,
};

pub const MUSIC_ID: &str = "background_music";
pub const FOOTSTEP_ID: &str = "player_footstep";
const FOOTSTEP_VOLUME: f32 = 0.4;
const AUDIO_LOAD_TIMEOUT: Duration = Duration::from_secs(5);

/// Load a texture from disk.
pub fn load_texture(
    rl: &mut RaylibHandle,
    thread: &RaylibThread,
    path: &Path,
) -> Result<Texture2D, LoadError> {
    let path_str = path.to_string_lossy();
    rl.load_texture(thread, &path_str)
        .map_err(|e| LoadError::Texture {
            path: path_str.to_string(),
            reason: e.to_string(),
        })
}

/// Rasterise a label's text with `font` into a new texture.
pub fn rasterize_text(
    rl: &mut RaylibHandle,
    thread: &RaylibThread,
    font: &Font,
    label: &TextLabel<Texture2D>,
) -> Result<Texture2D, ResourceError> {
    let text = label.content();
    let c_text = CString::new(text).map_err(|e| ResourceError::TextRaster {
        text: text.to_string(),
        reason: e.to_string(),
    })?;
    let image = unsafe {
        let raw = ffi::ImageTextEx(
            **font,
            c_text.as_ptr(),
            label.font_size,
            label.spacing,
            label.color.into(),
        );
        Image::from_raw(raw)
    };
    rl.load_texture_from_image(thread, &image)
        .map_err(|e| ResourceError::Texture(e.to_string()))
}

/// Walk while the `moving` signal is set, otherwise stand idle.
pub fn player_controller() -> AnimationController {
    AnimationController::new(IDLE_CLIP).with_rule(Condition::has_flag(MOVING), WALK_CLIP)
}

/// Check that a character can be drawn for its whole life.
///
/// The initial clip and every clip the controller can pick must exist, and
/// every sheet the table references must already be loaded.
pub fn validate_character(
    table: &AnimationTable,
    initial_clip: &str,
    controller: &AnimationController,
    has_texture: impl Fn(&str) -> bool,
) -> Result<(), LoadError> {
    if !table.contains(initial_clip) {
        return Err(LoadError::MissingClip {
            name: initial_clip.to_string(),
        });
    }
    controller.validate_clips(table)?;
    for clip in table.clips() {
        if !has_texture(&clip.sheet) {
            return Err(LoadError::UnknownSheet {
                clip: clip.name.clone(),
                sheet: clip.sheet.clone(),
            });
        }
    }
    Ok(())
}

/// Everything needed to put an animated, controllable character in the world.
pub struct CharacterSpec {
    pub table: Arc<AnimationTable>,
    pub initial_clip: String,
    pub controller: AnimationController,
    pub position: Vector2,
    pub frame_size: (f32, f32),
    pub speed: f32,
    pub gravity: f32,
}

/// Validate `spec` against the loaded textures and spawn the character.
pub fn spawn_character(world: &mut World, spec: CharacterSpec) -> Result<Entity, LoadError> {
    {
        let textures = world
            .get_resource::<TextureStore>()
            .ok_or_else(|| LoadError::Texture {
                path: String::new(),
                reason: "texture store not initialised".into(),
            })?;
        validate_character(&spec.table, &spec.initial_clip, &spec.controller, |key| {
            textures.contains(key)
        })?;
    }

    let animation = Animation::with_clip(Arc::clone(&spec.table), &spec.initial_clip).map_err(
        |e| match e {
            AnimationError::UnknownClip { name } => LoadError::MissingClip { name },
        },
    )?;
    let mut sprite = Sprite::new("", spec.frame_size.0, spec.frame_size.1);
    if let (Some(clip), Some(rect)) = (animation.current_clip(), animation.source_rect()) {
        sprite.show_frame(&clip.sheet, rect);
    }

    let entity = world
        .spawn((
            MapPosition::new(spec.position.x, spec.position.y),
            sprite,
            animation,
            spec.controller,
            RigidBody::with_gravity(spec.gravity),
            InputControlled::new(spec.speed),
            Signals::default(),
        ))
        .id();
    Ok(entity)
}

/// Acquire every asset and spawn the scene.
///
/// Inserts the simulation resources, then loads in order: font, sprite
/// textures, animation table, entities, audio. Any failure aborts; call
/// [`teardown`] to release what was acquired so far.
pub fn setup(
    rl: &mut RaylibHandle,
    thread: &RaylibThread,
    world: &mut World,
    config: &GameConfig,
) -> Result<(), GameError> {
    world.insert_resource(config.clone());
    world.insert_resource(WorldTime::fixed(config.tick_rate));
    world.insert_resource(InputState::default());
    world.insert_resource(ExitFlag::default());

    // Fonts
    let font_path = config.asset(TITLE_FONT_FILE);
    let font = rl
        .load_font_ex(thread, &font_path.to_string_lossy(), TITLE_FONT_SIZE, None)
        .map_err(|e| LoadError::Font {
            path: font_path.display().to_string(),
            reason: e.to_string(),
        })?;
    let mut fonts = FontStore::new();
    fonts.add(TITLE_FONT, font);
    world.insert_non_send_resource(fonts);

    // Sprite textures
    let mut textures = TextureStore::new();
    for key in [WALK_SHEET, IDLE_SHEET] {
        let texture = load_texture(rl, thread, &config.asset(&format!("{}.png", key)))?;
        info!("Loaded texture '{}' ({}x{})", key, texture.width, texture.height);
        textures.insert(key, texture);
    }
    let sheet_sizes = textures.sheet_sizes();
    world.insert_resource(textures);

    // Animations
    let table = load_descriptor(config.asset(PLAYER_DESCRIPTOR), WALK_SHEET, &sheet_sizes)?;
    let mut store = AnimationStore::new();
    let table = store.insert(PLAYER, table);
    world.insert_resource(store);

    // Entities
    let player = spawn_character(
        world,
        CharacterSpec {
            table,
            initial_clip: IDLE_CLIP.to_string(),
            controller: player_controller(),
            position: PLAYER_START,
            frame_size: PLAYER_FRAME,
            speed: config.walk_speed,
            gravity: config.gravity,
        },
    )?;
    info!("Spawned player {:?}", player);

    let mut label = TextLabel::new(TITLE_FONT, TITLE_FONT_SIZE as f32, 1.0, Color::WHITE, TITLE_RECT);
    {
        let fonts = world.non_send_resource::<FontStore>();
        let font = fonts.get(TITLE_FONT).ok_or_else(|| LoadError::Font {
            path: TITLE_FONT.to_string(),
            reason: "font not loaded".into(),
        })?;
        label.set_text(TITLE_TEXT, |label| rasterize_text(rl, thread, font, label))?;
    }
    world.spawn(label);

    // Audio
    setup_audio(world);
    send_audio_cmd(
        world,
        AudioCmd::LoadMusic {
            id: MUSIC_ID.into(),
            path: config.asset("background_music.ogg").to_string_lossy().into_owned(),
        },
    );
    send_audio_cmd(
        world,
        AudioCmd::LoadFx {
            id: FOOTSTEP_ID.into(),
            path: config.asset("player_footstep.ogg").to_string_lossy().into_owned(),
        },
    );
    wait_for_assets(world, &[MUSIC_ID, FOOTSTEP_ID], AUDIO_LOAD_TIMEOUT)?;
    send_audio_cmd(
        world,
        AudioCmd::VolumeFx {
            id: FOOTSTEP_ID.into(),
            vol: FOOTSTEP_VOLUME,
        },
    );
    send_audio_cmd(
        world,
        AudioCmd::PlayMusic {
            id: MUSIC_ID.into(),
            looped: true,
        },
    );
    world.insert_resource(FootstepAudio::new(FOOTSTEP_ID));

    info!("Setup complete");
    Ok(())
}

/// Release everything [`setup`] acquired, in reverse order.
///
/// Safe to call after a partial setup. The Raylib handle and thread are
/// dropped last, closing the window.
pub fn teardown(world: &mut World) {
    shutdown_audio(world);
    // label textures go with their entities
    world.clear_entities();
    world.remove_resource::<AnimationStore>();
    world.remove_resource::<TextureStore>();
    if let Some(mut fonts) = world.remove_non_send_resource::<FontStore>() {
        fonts.clear();
    }
    world.remove_non_send_resource::<RaylibThread>();
    world.remove_non_send_resource::<RaylibHandle>();
    info!("Teardown complete");
}
