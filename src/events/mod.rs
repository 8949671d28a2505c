//! Messages exchanged across systems.
//!
//! - [`audio`] – commands and replies for the background audio thread
pub mod audio;
