mod plugin;

use std::error::Error;
use std::path::Path;
use std::{fmt, io};

use bevy::{asset::Asset, prelude::*, reflect::TypePath};
pub use plugin::ConfigPlugin;
use serde::{Deserialize, Deserializer, de};

/// Path of the config file relative to the working directory.
pub const CONFIG_PATH: &str = "assets/config/game.config.toml";

/// Asset path of the config file, used for hot-reload.
pub const CONFIG_ASSET_PATH: &str = "config/game.config.toml";

#[derive(Asset, TypePath, Deserialize, Debug, Clone)]
pub struct GameConfig {
  pub window: WindowConfig,
  pub physics: PhysicsConfig,
  pub player: PlayerConfig,
  pub streaming: StreamingConfig,
  pub terrain: TerrainConfig,
}

#[derive(Deserialize, Debug, Clone)]
pub struct WindowConfig {
  pub width: u32,
  pub height: u32,
  pub title: String,
  #[serde(default)]
  pub fullscreen: bool,
}

#[derive(Deserialize, Debug, Clone)]
pub struct PhysicsConfig {
  pub gravity: f32,
}

#[derive(Deserialize, Debug, Clone)]
pub struct PlayerConfig {
  pub eye_height: f32,
  pub collider_radius: f32,
  pub collider_length: f32,
  pub walk_speed: f32,
  pub acceleration: f32,
  pub air_acceleration: f32,
  pub jump_speed: f32,
  pub mouse_sensitivity: f32,
  pub fov_degrees: f32,
  pub snap_to_ground: f32,
}

/// Grid streaming and placement parameters.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct StreamingConfig {
  /// Fixed RNG seed. `None` draws from OS entropy, so runs diverge.
  pub seed: Option<u64>,
  /// World units per grid cell.
  pub cell_size: f32,
  /// Chebyshev radius (cells) kept around the player.
  pub active_radius: u32,
  /// Half-width (cells) of the wall-free landing zone around the origin.
  pub safety_window: u32,
  pub wall: WallConfig,
  pub spawn: SpawnConfig,
}

impl Default for StreamingConfig {
  fn default() -> Self {
    Self {
      seed: None,
      cell_size: 10.0,
      active_radius: 5,
      safety_window: 5,
      wall: WallConfig::default(),
      spawn: SpawnConfig::default(),
    }
  }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WallConfig {
  /// Smallest footprint extent, inclusive.
  pub min_extent: u32,
  /// Largest footprint extent, inclusive.
  pub max_extent: u32,
  pub height: f32,
  /// Max offset of the wall center from the cell center, per axis.
  pub jitter: f32,
}

impl Default for WallConfig {
  fn default() -> Self {
    Self {
      min_extent: 15,
      max_extent: 25,
      height: 10.0,
      jitter: 5.0,
    }
  }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SpawnConfig {
  pub max_attempts: u32,
  /// Candidate cells are drawn from `[-search_range, search_range]` per axis.
  pub search_range: i32,
  /// Radius generated around each candidate before checking it.
  pub buffer_radius: u32,
  /// Max offset of the spawn point from the cell center, per axis.
  pub jitter: f32,
  /// Minimum planar distance to any wall center.
  pub clearance: f32,
  pub height: f32,
  pub fallback: [f32; 3],
}

impl Default for SpawnConfig {
  fn default() -> Self {
    Self {
      max_attempts: 100,
      search_range: 5,
      buffer_radius: 5,
      jitter: 4.0,
      clearance: 10.0,
      height: 1.0,
      fallback: [0.0, 1.0, 0.0],
    }
  }
}

#[derive(Deserialize, Debug, Clone)]
pub struct TerrainConfig {
  pub ceiling_height: f32,
  pub ceiling_thickness: f32,
  pub light_size: f32,
  pub light_emissive_strength: f32,
  pub floor: SurfaceConfig,
  pub ceiling: SurfaceConfig,
  pub light: SurfaceConfig,
  pub wall: SurfaceConfig,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SurfaceConfig {
  #[serde(deserialize_with = "deserialize_hex_color")]
  pub color: [f32; 3],
  /// Optional texture path, relative to the asset folder.
  #[serde(default)]
  pub texture: Option<String>,
}

fn deserialize_hex_color<'de, D>(deserializer: D) -> Result<[f32; 3], D::Error>
where
  D: Deserializer<'de>,
{
  let s: String = Deserialize::deserialize(deserializer)?;
  let s = s.trim_start_matches('#');
  if !s.is_ascii() || s.len() != 6 {
    return Err(de::Error::custom("hex color must be 6 ASCII characters"));
  }
  let r = u8::from_str_radix(&s[0..2], 16).map_err(de::Error::custom)?;
  let g = u8::from_str_radix(&s[2..4], 16).map_err(de::Error::custom)?;
  let b = u8::from_str_radix(&s[4..6], 16).map_err(de::Error::custom)?;
  Ok([r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0])
}

/// Error raised while loading or validating the config file.
#[derive(Debug)]
pub enum ConfigError {
  /// The file could not be read.
  Io(io::Error),
  /// The file is not valid TOML for [`GameConfig`].
  Parse(toml::de::Error),
  /// The file parsed but holds values the game cannot run with.
  Invalid(String),
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Io(e) => write!(f, "failed to read config: {e}"),
      Self::Parse(e) => write!(f, "failed to parse config: {e}"),
      Self::Invalid(reason) => write!(f, "invalid config: {reason}"),
    }
  }
}

impl Error for ConfigError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    match self {
      Self::Io(e) => Some(e),
      Self::Parse(e) => Some(e),
      Self::Invalid(_) => None,
    }
  }
}

impl From<io::Error> for ConfigError {
  fn from(err: io::Error) -> Self {
    Self::Io(err)
  }
}

impl From<toml::de::Error> for ConfigError {
  fn from(err: toml::de::Error) -> Self {
    Self::Parse(err)
  }
}

impl GameConfig {
  /// Parses and validates a config from TOML text.
  pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
    let config: GameConfig = toml::from_str(text)?;
    config.validate()?;
    Ok(config)
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    self.streaming.validate()?;
    if self.player.collider_radius <= 0.0 || self.player.collider_length < 0.0 {
      return Err(ConfigError::Invalid(
        "player collider must have a positive radius".into(),
      ));
    }
    Ok(())
  }
}

impl GameConfig {
  /// Validates a hot-reloaded config against the running one. Terrain meshes
  /// and chunk keys are built for the startup cell size, so it must not change.
  pub fn validate_reload(&self, current: &ConfigLoaded) -> Result<(), ConfigError> {
    self.validate()?;
    if self.streaming.cell_size != current.streaming.cell_size {
      return Err(ConfigError::Invalid(format!(
        "streaming.cell_size cannot change while running ({} -> {})",
        current.streaming.cell_size, self.streaming.cell_size
      )));
    }
    Ok(())
  }
}

impl StreamingConfig {
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.cell_size.is_nan() || self.cell_size <= 0.0 {
      return Err(ConfigError::Invalid(format!(
        "streaming.cell_size must be positive, got {}",
        self.cell_size
      )));
    }
    if self.wall.min_extent > self.wall.max_extent {
      return Err(ConfigError::Invalid(format!(
        "streaming.wall extents inverted: {} > {}",
        self.wall.min_extent, self.wall.max_extent
      )));
    }
    if self.wall.jitter < 0.0 || self.spawn.jitter < 0.0 {
      return Err(ConfigError::Invalid("jitter must not be negative".into()));
    }
    if self.spawn.jitter >= self.cell_size / 2.0 {
      return Err(ConfigError::Invalid(format!(
        "streaming.spawn.jitter {} would leave a {}-unit cell",
        self.spawn.jitter, self.cell_size
      )));
    }
    if self.spawn.search_range < 0 {
      return Err(ConfigError::Invalid(
        "streaming.spawn.search_range must not be negative".into(),
      ));
    }
    Ok(())
  }
}

/// Reads, parses and validates the config file at `path`.
pub fn load_config_file(path: impl AsRef<Path>) -> Result<GameConfig, ConfigError> {
  let text = std::fs::read_to_string(path)?;
  GameConfig::from_toml_str(&text)
}

#[derive(Resource)]
pub struct ConfigHandle(pub Handle<GameConfig>);

#[derive(Resource, Debug, Clone)]
pub struct ConfigLoaded {
  pub window: WindowConfig,
  pub physics: PhysicsConfig,
  pub player: PlayerConfig,
  pub streaming: StreamingConfig,
  pub terrain: TerrainConfig,
}

impl From<GameConfig> for ConfigLoaded {
  fn from(config: GameConfig) -> Self {
    Self {
      window: config.window,
      physics: config.physics,
      player: config.player,
      streaming: config.streaming,
      terrain: config.terrain,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const BUNDLED: &str = include_str!("../../assets/config/game.config.toml");

  #[test]
  fn bundled_config_parses_and_validates() {
    let config = GameConfig::from_toml_str(BUNDLED).unwrap();

    assert_eq!(config.streaming.active_radius, 5);
    assert_eq!(config.streaming.cell_size, 10.0);
    assert_eq!(config.streaming.spawn.max_attempts, 100);
    assert_eq!(config.window.width, 864);
    assert_eq!(config.window.height, 1536);
    assert!(config.window.fullscreen);
  }

  #[test]
  fn streaming_section_falls_back_to_defaults() {
    let streaming: StreamingConfig = toml::from_str("active_radius = 3").unwrap();

    assert_eq!(streaming.active_radius, 3);
    assert_eq!(streaming.wall, WallConfig::default());
    assert_eq!(streaming.spawn, SpawnConfig::default());
    assert_eq!(streaming.seed, None);
  }

  #[test]
  fn rejects_malformed_hex_color() {
    let result: Result<SurfaceConfig, _> = toml::from_str(r##"color = "#12345""##);
    assert!(result.is_err());
  }

  #[test]
  fn rejects_multibyte_hex_color_without_panicking() {
    let result: Result<SurfaceConfig, _> = toml::from_str(r#"color = "€abc""#);
    assert!(result.is_err());

    let edited = BUNDLED.replacen(r##""#8c7a32""##, r#""€abc""#, 1);
    let err = GameConfig::from_toml_str(&edited).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
  }

  #[test]
  fn reload_rejects_cell_size_change() {
    let running = ConfigLoaded::from(GameConfig::from_toml_str(BUNDLED).unwrap());
    let mut reloaded = GameConfig::from_toml_str(BUNDLED).unwrap();
    reloaded.streaming.active_radius = 3;
    assert!(reloaded.validate_reload(&running).is_ok());

    reloaded.streaming.cell_size = 20.0;
    let err = reloaded.validate_reload(&running).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
  }

  #[test]
  fn parses_hex_color_with_and_without_hash() {
    let a: SurfaceConfig = toml::from_str(r##"color = "#ff0000""##).unwrap();
    let b: SurfaceConfig = toml::from_str(r#"color = "00ff00""#).unwrap();

    assert_eq!(a.color, [1.0, 0.0, 0.0]);
    assert_eq!(b.color, [0.0, 1.0, 0.0]);
    assert!(a.texture.is_none());
  }

  #[test]
  fn rejects_spawn_jitter_that_leaves_cell() {
    let mut streaming = StreamingConfig::default();
    streaming.spawn.jitter = 5.0;

    let err = streaming.validate().unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
  }

  #[test]
  fn rejects_inverted_wall_extents() {
    let mut streaming = StreamingConfig::default();
    streaming.wall.min_extent = 30;

    assert!(streaming.validate().is_err());
  }

  #[test]
  fn parse_errors_surface_as_parse_variant() {
    let err = GameConfig::from_toml_str("window = 3").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
  }
}
