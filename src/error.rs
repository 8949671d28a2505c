//! Error types.
//!
//! Three families cover every failure the game can hit:
//! - [`LoadError`] – assets and descriptors that are missing or malformed.
//!   Always fatal at startup.
//! - [`AnimationError`] – a request for a clip that the entity's table does
//!   not contain. A programming error; never silently ignored.
//! - [`ResourceError`] – the rendering backend refused to create a texture.
//!
//! [`GameError`] wraps all of them for the top-level `run` in `main.rs`.

use std::path::PathBuf;

use thiserror::Error;

/// Failure while loading startup data (descriptors, textures, fonts, audio, config).
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("line {line}: clip '{name}' has frame count {count}, must be at least 1")]
    InvalidFrameCount { line: usize, name: String, count: i64 },

    #[error("line {line}: clip name is empty")]
    EmptyName { line: usize },

    #[error("clip '{clip}' refers to unknown sheet '{sheet}'")]
    UnknownSheet { clip: String, sheet: String },

    #[error(
        "clip '{clip}' frame {frame} ({x},{y} {width}x{height}) lies outside sheet '{sheet}' ({sheet_width}x{sheet_height})"
    )]
    FrameOutOfBounds {
        clip: String,
        sheet: String,
        frame: usize,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        sheet_width: i32,
        sheet_height: i32,
    },

    #[error("animation clip '{name}' is required but missing from the table")]
    MissingClip { name: String },

    #[error("invalid JSON descriptor: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to load texture '{path}': {reason}")]
    Texture { path: String, reason: String },

    #[error("failed to load font '{path}': {reason}")]
    Font { path: String, reason: String },

    #[error("failed to load audio '{id}': {reason}")]
    Audio { id: String, reason: String },

    #[error("failed to load config: {0}")]
    Config(String),
}

/// Request to play a clip the animation table does not define.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnimationError {
    #[error("unknown animation clip '{name}'")]
    UnknownClip { name: String },
}

/// Texture creation failure reported by the rendering backend.
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("texture creation failed: {0}")]
    Texture(String),

    #[error("could not rasterize text '{text}': {reason}")]
    TextRaster { text: String, reason: String },
}

/// Anything that aborts startup.
#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Animation(#[from] AnimationError),

    #[error(transparent)]
    Resource(#[from] ResourceError),
}
