//! Sparse chunk and wall bookkeeping around the player.
//!
//! [`ChunkStreamer`] decides which grid cells hold terrain and walls. The
//! engine entities themselves are created and destroyed through a
//! [`TerrainBuilder`], so the same logic runs against `Commands` in the game
//! and against a bare `World` in tests.

use std::collections::{HashMap, HashSet};

use bevy::prelude::{Entity, Resource, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::grid::{GridKey, planar_distance};
use crate::config::StreamingConfig;

/// Creates and destroys the engine entities backing chunks and walls.
pub trait TerrainBuilder {
  /// Spawns the floor, ceiling and light proxy for one cell.
  fn spawn_chunk(&mut self, key: GridKey) -> Chunk;

  /// Spawns a wall obstacle with the given layout.
  fn spawn_wall(&mut self, key: GridKey, layout: &WallLayout) -> Entity;

  fn despawn(&mut self, entity: Entity);
}

/// The terrain entities of one grid cell.
#[derive(Debug)]
pub struct Chunk {
  floor: Entity,
  ceiling: Entity,
  light: Entity,
}

impl Chunk {
  pub fn new(floor: Entity, ceiling: Entity, light: Entity) -> Self {
    Self {
      floor,
      ceiling,
      light,
    }
  }

  pub fn entities(&self) -> [Entity; 3] {
    [self.floor, self.ceiling, self.light]
  }

  /// Releases every entity the chunk owns.
  pub fn destroy(self, builder: &mut impl TerrainBuilder) {
    for entity in self.entities() {
      builder.despawn(entity);
    }
  }
}

/// Placement of a wall box in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallLayout {
  /// Center of the box; its base rests on the floor.
  pub center: Vec3,
  /// Full extents of the box.
  pub size: Vec3,
}

/// A wall obstacle occupying one grid cell.
#[derive(Debug)]
pub struct Wall {
  entity: Entity,
  layout: WallLayout,
}

impl Wall {
  pub fn entity(&self) -> Entity {
    self.entity
  }

  pub fn layout(&self) -> &WallLayout {
    &self.layout
  }

  pub fn destroy(self, builder: &mut impl TerrainBuilder) {
    builder.despawn(self.entity);
  }
}

/// Entity changes made by one sync pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
  pub chunks_spawned: usize,
  pub walls_spawned: usize,
  pub chunks_evicted: usize,
  pub walls_evicted: usize,
}

impl SyncReport {
  pub fn is_empty(&self) -> bool {
    *self == Self::default()
  }
}

/// Outcome of [`ChunkStreamer::find_safe_spawn`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnSearch {
  /// A clear position was found on attempt `attempts`.
  Found {
    position: Vec3,
    cell: GridKey,
    attempts: u32,
  },
  /// Every attempt was rejected; `position` is the configured fallback.
  Fallback { position: Vec3, attempts: u32 },
}

impl SpawnSearch {
  pub fn position(&self) -> Vec3 {
    match *self {
      Self::Found { position, .. } | Self::Fallback { position, .. } => position,
    }
  }

  pub fn attempts(&self) -> u32 {
    match *self {
      Self::Found { attempts, .. } | Self::Fallback { attempts, .. } => attempts,
    }
  }
}

/// Streams terrain chunks and walls in a square window around the player.
///
/// A key holds a chunk (and, for even/even keys, possibly a wall) from the
/// first sync that covers it until a sync centered more than
/// `active_radius` cells away evicts it.
#[derive(Resource)]
pub struct ChunkStreamer {
  settings: StreamingConfig,
  chunks: HashMap<GridKey, Chunk>,
  walls: HashMap<GridKey, Wall>,
  player_cell: Option<GridKey>,
  last_position: Option<Vec3>,
  rng: StdRng,
}

impl ChunkStreamer {
  /// Creates an empty streamer, seeded from `settings.seed` or OS entropy.
  pub fn new(settings: StreamingConfig) -> Self {
    let rng = match settings.seed {
      Some(seed) => StdRng::seed_from_u64(seed),
      None => StdRng::from_os_rng(),
    };
    Self::with_rng(settings, rng)
  }

  pub fn with_rng(settings: StreamingConfig, rng: StdRng) -> Self {
    Self {
      settings,
      chunks: HashMap::new(),
      walls: HashMap::new(),
      player_cell: None,
      last_position: None,
      rng,
    }
  }

  pub fn settings(&self) -> &StreamingConfig {
    &self.settings
  }

  /// Replaces the settings, keeping every tracked entity and the RNG state.
  pub fn apply_settings(&mut self, settings: StreamingConfig) {
    bevy::log::info!(
      "Streaming settings updated (active radius {} -> {})",
      self.settings.active_radius,
      settings.active_radius
    );
    self.settings = settings;
  }

  pub fn chunk_count(&self) -> usize {
    self.chunks.len()
  }

  pub fn wall_count(&self) -> usize {
    self.walls.len()
  }

  pub fn has_chunk(&self, key: GridKey) -> bool {
    self.chunks.contains_key(&key)
  }

  pub fn chunk(&self, key: GridKey) -> Option<&Chunk> {
    self.chunks.get(&key)
  }

  pub fn wall(&self, key: GridKey) -> Option<&Wall> {
    self.walls.get(&key)
  }

  pub fn walls(&self) -> impl Iterator<Item = (GridKey, &Wall)> + '_ {
    self.walls.iter().map(|(key, wall)| (*key, wall))
  }

  /// Cell of the last move-triggered sync.
  pub fn player_cell(&self) -> Option<GridKey> {
    self.player_cell
  }

  /// Spawns the chunk for `key` unless one exists. Returns whether it did.
  pub fn ensure_chunk(&mut self, key: GridKey, builder: &mut impl TerrainBuilder) -> bool {
    if self.chunks.contains_key(&key) {
      return false;
    }
    let chunk = builder.spawn_chunk(key);
    self.chunks.insert(key, chunk);
    true
  }

  /// Spawns a randomly sized wall in `key` if it is an even/even slot, is
  /// not excluded and has no wall yet. Returns whether it did.
  pub fn ensure_wall(
    &mut self,
    key: GridKey,
    exclude: &HashSet<GridKey>,
    builder: &mut impl TerrainBuilder,
  ) -> bool {
    if !key.is_wall_slot() || exclude.contains(&key) || self.walls.contains_key(&key) {
      return false;
    }
    let layout = self.roll_wall_layout(key);
    let entity = builder.spawn_wall(key, &layout);
    self.walls.insert(key, Wall { entity, layout });
    true
  }

  /// Despawns the wall in `key`, if any.
  pub fn remove_wall(&mut self, key: GridKey, builder: &mut impl TerrainBuilder) -> bool {
    match self.walls.remove(&key) {
      Some(wall) => {
        wall.destroy(builder);
        true
      }
      None => false,
    }
  }

  /// Fills the active window around `center`, then evicts everything outside
  /// it.
  pub fn sync_around_cell(
    &mut self,
    center: GridKey,
    exclude: &HashSet<GridKey>,
    builder: &mut impl TerrainBuilder,
  ) -> SyncReport {
    self.sync_region(center, self.settings.active_radius, exclude, builder)
  }

  fn sync_region(
    &mut self,
    center: GridKey,
    radius: u32,
    exclude: &HashSet<GridKey>,
    builder: &mut impl TerrainBuilder,
  ) -> SyncReport {
    let mut report = SyncReport::default();

    for key in center.square(radius) {
      if self.ensure_chunk(key, builder) {
        report.chunks_spawned += 1;
      }
      if self.ensure_wall(key, exclude, builder) {
        report.walls_spawned += 1;
      }
    }

    let stale_chunks: Vec<GridKey> = self
      .chunks
      .keys()
      .filter(|key| key.chebyshev(center) > radius)
      .copied()
      .collect();
    for key in stale_chunks {
      if let Some(chunk) = self.chunks.remove(&key) {
        chunk.destroy(builder);
        report.chunks_evicted += 1;
      }
    }

    let stale_walls: Vec<GridKey> = self
      .walls
      .keys()
      .filter(|key| key.chebyshev(center) > radius)
      .copied()
      .collect();
    for key in stale_walls {
      if self.remove_wall(key, builder) {
        report.walls_evicted += 1;
      }
    }

    report
  }

  /// Per-frame driver. Does nothing unless `position` differs from the last
  /// observed one.
  pub fn update(&mut self, position: Vec3, builder: &mut impl TerrainBuilder) -> Option<SyncReport> {
    if self.last_position == Some(position) {
      return None;
    }
    self.last_position = Some(position);
    self.on_player_moved(position, builder)
  }

  /// Re-syncs the window when the player enters a new cell. The player's
  /// own cell never keeps a wall.
  pub fn on_player_moved(
    &mut self,
    position: Vec3,
    builder: &mut impl TerrainBuilder,
  ) -> Option<SyncReport> {
    let cell = GridKey::from_position(position, self.settings.cell_size);
    if self.player_cell == Some(cell) {
      return None;
    }

    let exclude = HashSet::from([cell]);
    let mut report = self.sync_around_cell(cell, &exclude, builder);
    if self.remove_wall(cell, builder) {
      report.walls_evicted += 1;
    }
    self.player_cell = Some(cell);

    bevy::log::debug!(
      "Player entered cell {cell}: +{} chunks, +{} walls, -{} chunks, -{} walls",
      report.chunks_spawned,
      report.walls_spawned,
      report.chunks_evicted,
      report.walls_evicted
    );
    Some(report)
  }

  /// Builds the window around the origin and clears walls from the safety
  /// window so the spawn search starts from open ground.
  pub fn initial_placement(&mut self, builder: &mut impl TerrainBuilder) -> SyncReport {
    let mut report = self.sync_around_cell(GridKey::ORIGIN, &HashSet::new(), builder);

    let window = self.settings.safety_window;
    let cleared: Vec<GridKey> = self
      .walls
      .keys()
      .filter(|key| key.chebyshev(GridKey::ORIGIN) <= window)
      .copied()
      .collect();
    for key in cleared {
      if self.remove_wall(key, builder) {
        report.walls_evicted += 1;
      }
    }

    bevy::log::info!(
      "Initial placement: {} chunks, {} walls after clearing the landing zone",
      self.chunk_count(),
      self.wall_count()
    );
    report
  }

  /// Rejection-samples a spawn point away from every tracked wall, falling
  /// back to the configured position when all attempts fail.
  pub fn find_safe_spawn(&mut self, builder: &mut impl TerrainBuilder) -> SpawnSearch {
    let spawn = self.settings.spawn.clone();
    let cell_size = self.settings.cell_size;
    let no_exclusions = HashSet::new();

    for attempt in 1..=spawn.max_attempts {
      let cell = GridKey::new(
        self
          .rng
          .random_range(-spawn.search_range..=spawn.search_range),
        self
          .rng
          .random_range(-spawn.search_range..=spawn.search_range),
      );

      self.sync_region(cell, spawn.buffer_radius, &no_exclusions, builder);
      self.remove_wall(cell, builder);

      let center = cell.center(cell_size);
      let position = Vec3::new(
        center.x + self.rng.random_range(-spawn.jitter..=spawn.jitter),
        spawn.height,
        center.y + self.rng.random_range(-spawn.jitter..=spawn.jitter),
      );

      if self.is_clear(position, spawn.clearance) {
        bevy::log::info!("Spawned player at {position} in grid {cell} (attempt {attempt})");
        return SpawnSearch::Found {
          position,
          cell,
          attempts: attempt,
        };
      }
    }

    let position = Vec3::from(spawn.fallback);
    bevy::log::warn!(
      "Could not find safe spawn after {} attempts. Spawning at {position}.",
      spawn.max_attempts
    );
    SpawnSearch::Fallback {
      position,
      attempts: spawn.max_attempts,
    }
  }

  /// True when no tracked wall center lies within `clearance` of `position`
  /// on the XZ plane.
  pub fn is_clear(&self, position: Vec3, clearance: f32) -> bool {
    self
      .walls
      .values()
      .all(|wall| planar_distance(position, wall.layout.center) >= clearance)
  }

  fn roll_wall_layout(&mut self, key: GridKey) -> WallLayout {
    let wall = &self.settings.wall;
    let width = self.rng.random_range(wall.min_extent..=wall.max_extent) as f32;
    let depth = self.rng.random_range(wall.min_extent..=wall.max_extent) as f32;
    let center = key.center(self.settings.cell_size);
    let offset_x = self.rng.random_range(-wall.jitter..=wall.jitter);
    let offset_z = self.rng.random_range(-wall.jitter..=wall.jitter);

    WallLayout {
      center: Vec3::new(center.x + offset_x, wall.height / 2.0, center.y + offset_z),
      size: Vec3::new(width, wall.height, depth),
    }
  }
}
