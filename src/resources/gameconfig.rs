//! Game configuration resource.
//!
//! Settings loaded from an INI file. Every value has a safe default, so a
//! missing file or key simply keeps the default.
//!
//! # Configuration File Format
//!
//! ```ini
//! [window]
//! width = 1400
//! height = 1400
//! title = My Game
//! target_fps = 60
//! vsync = true
//!
//! [simulation]
//! tick_rate = 50
//! gravity = 200.0
//! walk_speed = 500.0
//!
//! [assets]
//! dir = ./assets
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

use crate::error::LoadError;

/// Default safe values for startup
const DEFAULT_WINDOW_WIDTH: u32 = 1400;
const DEFAULT_WINDOW_HEIGHT: u32 = 1400;
const DEFAULT_TITLE: &str = "My Game";
const DEFAULT_TARGET_FPS: u32 = 60;
const DEFAULT_VSYNC: bool = true;
const DEFAULT_TICK_RATE: u32 = 50;
const DEFAULT_GRAVITY: f32 = 200.0;
const DEFAULT_WALK_SPEED: f32 = 500.0;
const DEFAULT_ASSETS_DIR: &str = "./assets";
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

#[derive(Resource, Debug, Clone)]
pub struct GameConfig {
    pub window_width: u32,
    pub window_height: u32,
    pub title: String,
    /// Frame-rate limiter target. Independent of `tick_rate`.
    pub target_fps: u32,
    pub vsync: bool,
    /// Simulation ticks per simulated second.
    pub tick_rate: u32,
    /// Downward acceleration in world units per second squared.
    pub gravity: f32,
    /// Player walking speed in world units per second.
    pub walk_speed: f32,
    pub assets_dir: PathBuf,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            title: DEFAULT_TITLE.to_string(),
            target_fps: DEFAULT_TARGET_FPS,
            vsync: DEFAULT_VSYNC,
            tick_rate: DEFAULT_TICK_RATE,
            gravity: DEFAULT_GRAVITY,
            walk_speed: DEFAULT_WALK_SPEED,
            assets_dir: PathBuf::from(DEFAULT_ASSETS_DIR),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Path of an asset relative to `assets_dir`.
    pub fn asset(&self, name: &str) -> PathBuf {
        self.assets_dir.join(name)
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    pub fn load_from_file(&mut self) -> Result<(), LoadError> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| LoadError::Config(format!("{}: {}", self.config_path.display(), e)))?;
        self.apply(&config);

        info!(
            "Loaded config: {}x{} window, fps={}, vsync={}, tick_rate={}, gravity={}, walk_speed={}",
            self.window_width,
            self.window_height,
            self.target_fps,
            self.vsync,
            self.tick_rate,
            self.gravity,
            self.walk_speed
        );

        Ok(())
    }

    /// Load configuration from INI text.
    pub fn load_from_str(&mut self, src: &str) -> Result<(), LoadError> {
        let mut config = Ini::new();
        config.read(src.to_string()).map_err(LoadError::Config)?;
        self.apply(&config);
        Ok(())
    }

    fn apply(&mut self, config: &Ini) {
        // [window] section
        if let Some(width) = config.getuint("window", "width").ok().flatten() {
            self.window_width = width as u32;
        }
        if let Some(height) = config.getuint("window", "height").ok().flatten() {
            self.window_height = height as u32;
        }
        if let Some(title) = config.get("window", "title") {
            self.title = title;
        }
        if let Some(fps) = config.getuint("window", "target_fps").ok().flatten() {
            self.target_fps = fps as u32;
        }
        if let Some(vsync) = config.getbool("window", "vsync").ok().flatten() {
            self.vsync = vsync;
        }

        // [simulation] section
        if let Some(rate) = config.getuint("simulation", "tick_rate").ok().flatten() {
            self.tick_rate = (rate as u32).max(1);
        }
        if let Some(gravity) = config.getfloat("simulation", "gravity").ok().flatten() {
            self.gravity = gravity as f32;
        }
        if let Some(speed) = config.getfloat("simulation", "walk_speed").ok().flatten() {
            self.walk_speed = speed as f32;
        }

        // [assets] section
        if let Some(dir) = config.get("assets", "dir") {
            self.assets_dir = PathBuf::from(dir);
        }
    }

    /// Save configuration to the INI file.
    pub fn save_to_file(&self) -> Result<(), LoadError> {
        let mut config = Ini::new();

        config.set("window", "width", Some(self.window_width.to_string()));
        config.set("window", "height", Some(self.window_height.to_string()));
        config.set("window", "title", Some(self.title.clone()));
        config.set("window", "target_fps", Some(self.target_fps.to_string()));
        config.set("window", "vsync", Some(self.vsync.to_string()));

        config.set("simulation", "tick_rate", Some(self.tick_rate.to_string()));
        config.set("simulation", "gravity", Some(self.gravity.to_string()));
        config.set("simulation", "walk_speed", Some(self.walk_speed.to_string()));

        config.set(
            "assets",
            "dir",
            Some(self.assets_dir.to_string_lossy().into_owned()),
        );

        config
            .write(&self.config_path)
            .map_err(|e| LoadError::Config(format!("{}: {}", self.config_path.display(), e)))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }
}
