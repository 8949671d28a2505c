//! ECS components for entities.
//!
//! Submodules overview:
//! - [`animation`] – clip playback state machine and rule-based clip controller
//! - [`inputcontrolled`] – marks entities driven by the player's movement intent
//! - [`mapposition`] – world-space position of an entity
//! - [`rigidbody`] – velocity and named acceleration forces (gravity)
//! - [`signals`] – per-entity flags for cross-system communication
//! - [`sprite`] – texture key, frame offset and flip used by the renderer
//! - [`textlabel`] – text content with at most one backing texture

pub mod animation;
pub mod inputcontrolled;
pub mod mapposition;
pub mod rigidbody;
pub mod signals;
pub mod sprite;
pub mod textlabel;
