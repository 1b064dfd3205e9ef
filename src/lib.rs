//! A first-person walk through an endless grid of rooms.
//!
//! Floor and ceiling tiles, plus randomly placed walls, are streamed in a
//! square window around the player and despawned once they fall outside it.

pub mod config;
pub mod core;
pub mod input;
pub mod player;
#[cfg(feature = "visual_debug")]
pub mod visual_debug;
pub mod world;
