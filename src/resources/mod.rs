//! ECS resources made available to systems.
//!
//! - `animationstore` – animation tables shared between entities of a character
//! - `audio` – bridge and channels for the background audio thread
//! - `exitflag` – quit request checked by the main loop, interrupt latch
//! - `fontstore` – loaded fonts (non-send)
//! - `gameconfig` – INI-backed settings
//! - `input` – movement intents and key bindings
//! - `texturestore` – loaded textures keyed by string IDs
//! - `worldtime` – fixed-step simulation time
pub mod animationstore;
pub mod audio;
pub mod exitflag;
pub mod fontstore;
pub mod gameconfig;
pub mod input;
pub mod texturestore;
pub mod worldtime;
