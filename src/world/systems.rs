//! Startup placement and per-frame streaming systems.

use bevy::prelude::*;

use super::scene::{SceneBuilder, TerrainAssets};
use super::streamer::{ChunkStreamer, SpawnSearch};
use crate::config::ConfigLoaded;
use crate::player::components::Player;

/// Where the player is spawned, chosen by the safe-spawn search.
#[derive(Resource, Debug, Clone, Copy)]
pub struct PlayerSpawn(pub Vec3);

/// System: builds the initial grid, clears the landing zone and searches for
/// a spawn point away from walls.
pub fn prepare_world(mut commands: Commands, config: Res<ConfigLoaded>, assets: Res<TerrainAssets>) {
  let mut streamer = ChunkStreamer::new(config.streaming.clone());

  let search = {
    let mut builder = SceneBuilder::new(&mut commands, &assets);
    streamer.initial_placement(&mut builder);
    streamer.find_safe_spawn(&mut builder)
  };

  if let SpawnSearch::Found { cell, .. } = search {
    info!("Spawn cell {cell} accepted after {} attempt(s)", search.attempts());
  }

  commands.insert_resource(PlayerSpawn(search.position()));
  commands.insert_resource(streamer);
}

/// System: streams chunks and walls around the player whenever it moves.
pub fn stream_around_player(
  mut commands: Commands,
  assets: Res<TerrainAssets>,
  mut streamer: ResMut<ChunkStreamer>,
  players: Query<&Transform, With<Player>>,
) {
  let Ok(transform) = players.single() else {
    return;
  };

  let mut builder = SceneBuilder::new(&mut commands, &assets);
  if let Some(report) = streamer.update(transform.translation, &mut builder) {
    if !report.is_empty() {
      trace!("Streaming sync: {:?}", report);
    }
  }
}
