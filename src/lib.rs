//! Chuckie library.
//!
//! A small 2D side-scroller: a spritesheet descriptor loader, a per-entity
//! animation state machine, a fixed-step physics integrator and renderable
//! sprite entities, wired together with `bevy_ecs` and drawn with Raylib.
//! Exposed as a library for the binary and the integration tests.

pub mod components;
pub mod error;
pub mod events;
pub mod game;
pub mod resources;
pub mod spritesheet;
pub mod systems;
