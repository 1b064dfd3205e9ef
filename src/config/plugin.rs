use bevy::{asset::AssetEvent, ecs::message::MessageReader, prelude::*, window::PrimaryWindow};
use bevy_common_assets::toml::TomlAssetPlugin;

use super::{CONFIG_ASSET_PATH, ConfigHandle, ConfigLoaded, GameConfig};
use crate::core::GravityConfig;
use crate::world::ChunkStreamer;

/// Watches the config asset and pushes changes to the systems that consume
/// it. Expects [`ConfigLoaded`] to be inserted before the app runs.
pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
  fn build(&self, app: &mut App) {
    app
      .add_plugins(TomlAssetPlugin::<GameConfig>::new(&["config.toml"]))
      .add_systems(PreStartup, watch_config_asset)
      .add_systems(Update, watch_config_changes)
      .add_systems(
        Update,
        (
          update_window_on_config_change,
          update_gravity_on_config_change,
          update_streaming_on_config_change,
        )
          .after(watch_config_changes),
      );
  }
}

fn watch_config_asset(mut commands: Commands, asset_server: Res<AssetServer>) {
  let handle: Handle<GameConfig> = asset_server.load(CONFIG_ASSET_PATH);
  commands.insert_resource(ConfigHandle(handle));
}

fn watch_config_changes(
  mut commands: Commands,
  config_handle: Res<ConfigHandle>,
  current: Res<ConfigLoaded>,
  mut messages: MessageReader<AssetEvent<GameConfig>>,
  configs: Res<Assets<GameConfig>>,
) {
  for event in messages.read() {
    if let AssetEvent::Modified { id } = event {
      if config_handle.0.id() == *id {
        if let Some(config) = configs.get(&config_handle.0) {
          if let Err(err) = config.validate_reload(&current) {
            warn!("Ignoring reloaded config: {err}");
            continue;
          }
          info!("Config reloaded!");
          commands.insert_resource(ConfigLoaded::from(config.clone()));
        }
      }
    }
  }
}

fn update_window_on_config_change(
  config: Res<ConfigLoaded>,
  mut windows: Query<&mut Window, With<PrimaryWindow>>,
) {
  if config.is_changed() && !config.is_added() {
    if let Ok(mut window) = windows.single_mut() {
      window
        .resolution
        .set(config.window.width as f32, config.window.height as f32);
      window.title.clone_from(&config.window.title);
    }
  }
}

fn update_gravity_on_config_change(
  config: Res<ConfigLoaded>,
  gravity: Option<ResMut<GravityConfig>>,
) {
  if let Some(mut gravity) = gravity {
    if config.is_changed() {
      gravity.value = config.physics.gravity;
    }
  }
}

/// New streaming settings take effect at the player's next cell change.
fn update_streaming_on_config_change(
  config: Res<ConfigLoaded>,
  streamer: Option<ResMut<ChunkStreamer>>,
) {
  if let Some(mut streamer) = streamer {
    if config.is_changed() && streamer.settings() != &config.streaming {
      streamer.apply_settings(config.streaming.clone());
    }
  }
}
