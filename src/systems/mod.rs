//! ECS systems.
//!
//! - [`input`] – polls Raylib and folds key edges into the input intents
//! - [`inputcontroller`] – turns intents into horizontal velocity and facing
//! - [`movement`] – integrates forces and velocity into positions
//! - [`animation`] – clip selection and frame advance
//! - [`audio`] – audio thread, channel bridge and footstep triggers
//! - [`render`] – draws sprites and text labels
//! - [`time`] – fixed-step simulation clock
pub mod animation;
pub mod audio;
pub mod input;
pub mod inputcontroller;
pub mod movement;
pub mod render;
pub mod time;
