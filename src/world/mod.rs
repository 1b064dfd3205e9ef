//! Procedural room grid streamed around the player.

pub mod grid;
mod scene;
mod streamer;
mod systems;


use bevy::prelude::*;
pub use grid::{GridKey, planar_distance};
pub use scene::{ChunkTile, SceneBuilder, TerrainAssets, WallBlock, setup_terrain_assets};
pub use streamer::{
  Chunk, ChunkStreamer, SpawnSearch, SyncReport, TerrainBuilder, Wall, WallLayout,
};
pub use systems::{PlayerSpawn, prepare_world, stream_around_player};

/// Per-frame chunk and wall streaming around the player.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct WorldStreamingSet;

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
  fn build(&self, app: &mut App) {
    app
      .add_systems(Startup, (setup_terrain_assets, prepare_world).chain())
      .add_systems(Update, stream_around_player.in_set(WorldStreamingSet));
  }
}
