//! App-level streaming test.
//!
//! Drives the real `stream_around_player` system with `MinimalPlugins`:
//! 1. Spawn the player and let the first frame build the window
//! 2. Walk across cell boundaries and check spawned/despawned entities
//! 3. Stand still and check nothing is touched

use bevy::prelude::*;
use infinite_rooms::config::StreamingConfig;
use infinite_rooms::player::components::Player;
use infinite_rooms::world::{
  ChunkStreamer, ChunkTile, GridKey, TerrainAssets, WallBlock, stream_around_player,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

const CELL_SIZE: f32 = 10.0;

struct TestHarness {
  app: App,
  player: Entity,
}

impl TestHarness {
  fn new(seed: u64, start: Vec3) -> Self {
    let mut app = App::new();
    app
      .add_plugins(MinimalPlugins)
      .insert_resource(TerrainAssets {
        cell_size: CELL_SIZE,
        ceiling_height: 10.0,
        ceiling_thickness: 1.0,
        ..default()
      })
      .insert_resource(ChunkStreamer::with_rng(
        StreamingConfig::default(),
        StdRng::seed_from_u64(seed),
      ))
      .add_systems(Update, stream_around_player);

    let player = app
      .world_mut()
      .spawn((Player, Transform::from_translation(start)))
      .id();

    app.update();

    Self { app, player }
  }

  fn move_player(&mut self, position: Vec3) {
    self
      .app
      .world_mut()
      .get_mut::<Transform>(self.player)
      .unwrap()
      .translation = position;
    self.app.update();
  }

  fn streamer(&self) -> &ChunkStreamer {
    self.app.world().resource::<ChunkStreamer>()
  }

  fn tile_keys(&mut self) -> Vec<GridKey> {
    let mut q = self.app.world_mut().query::<&ChunkTile>();
    q.iter(self.app.world()).map(|tile| tile.0).collect()
  }

  fn wall_keys(&mut self) -> Vec<GridKey> {
    let mut q = self.app.world_mut().query::<&WallBlock>();
    q.iter(self.app.world()).map(|wall| wall.0).collect()
  }

  fn entity_count(&self) -> usize {
    self.app.world().entities().len() as usize
  }
}

fn cell_center(x: i32, z: i32) -> Vec3 {
  let center = GridKey::new(x, z).center(CELL_SIZE);
  Vec3::new(center.x, 1.0, center.y)
}

#[test]
fn first_frame_builds_window_around_player() {
  let mut harness = TestHarness::new(1, cell_center(0, 0));

  let tiles = harness.tile_keys();
  assert_eq!(tiles.len(), 121 * 3);
  assert!(tiles.iter().all(|key| key.chebyshev(GridKey::ORIGIN) <= 5));

  let walls = harness.wall_keys();
  // 25 even/even slots, minus the player's own cell
  assert_eq!(walls.len(), 24);
  assert!(walls.iter().all(|key| key.is_wall_slot()));
  assert!(!walls.contains(&GridKey::ORIGIN));

  assert_eq!(harness.streamer().chunk_count(), 121);
  assert_eq!(harness.streamer().wall_count(), 24);
}

#[test]
fn crossing_a_cell_boundary_streams_the_leading_edge() {
  let mut harness = TestHarness::new(2, Vec3::new(9.0, 1.0, 5.0));

  harness.move_player(Vec3::new(11.0, 1.0, 5.0));

  let tiles = harness.tile_keys();
  assert_eq!(tiles.len(), 121 * 3);
  let center = GridKey::new(1, 0);
  assert!(tiles.iter().all(|key| key.chebyshev(center) <= 5));
  for z in -5..=5 {
    assert!(tiles.contains(&GridKey::new(6, z)));
    assert!(!tiles.contains(&GridKey::new(-5, z)));
  }
  assert!(harness.wall_keys().iter().all(|key| key.chebyshev(center) <= 5));
  assert_eq!(harness.streamer().player_cell(), Some(center));
}

#[test]
fn standing_still_touches_nothing() {
  let mut harness = TestHarness::new(3, cell_center(2, -3));
  let entities = harness.entity_count();
  let mut tiles = harness.tile_keys();
  tiles.sort_by_key(|key| (key.x, key.z));

  for _ in 0..5 {
    harness.app.update();
  }

  let mut after = harness.tile_keys();
  after.sort_by_key(|key| (key.x, key.z));
  assert_eq!(harness.entity_count(), entities);
  assert_eq!(after, tiles);
}

#[test]
fn walking_far_away_despawns_old_terrain() {
  let mut harness = TestHarness::new(4, cell_center(0, 0));
  let tracked = 1 + harness.tile_keys().len() + harness.wall_keys().len();
  let untracked = harness.entity_count() - tracked;

  for step in 1..=12 {
    harness.move_player(cell_center(step * 2, 0));
  }

  let center = GridKey::new(24, 0);
  let tiles = harness.tile_keys();
  assert_eq!(tiles.len(), 121 * 3);
  assert!(tiles.iter().all(|key| key.chebyshev(center) <= 5));

  let walls = harness.wall_keys();
  assert_eq!(walls.len(), harness.streamer().wall_count());
  assert!(!walls.contains(&center));
  // Evicted tiles and walls are gone from the world, not just the maps
  assert_eq!(
    harness.entity_count(),
    untracked + 1 + tiles.len() + walls.len()
  );
}
