use bevy::{
  prelude::*,
  window::{MonitorSelection, PresentMode, WindowMode, WindowResolution},
};
use infinite_rooms::config::{self, ConfigLoaded};
use infinite_rooms::{core, input, player, world};

fn main() -> AppExit {
  let config = match config::load_config_file(config::CONFIG_PATH) {
    Ok(config) => config,
    Err(err) => {
      eprintln!("{err}");
      return AppExit::from_code(1);
    }
  };

  let mode = if config.window.fullscreen {
    WindowMode::BorderlessFullscreen(MonitorSelection::Primary)
  } else {
    WindowMode::Windowed
  };

  let mut app = App::new();

  app
    .add_plugins(DefaultPlugins.set(WindowPlugin {
      primary_window: Some(Window {
        resolution: WindowResolution::new(config.window.width, config.window.height),
        title: config.window.title.clone(),
        present_mode: PresentMode::AutoVsync,
        mode,
        ..default()
      }),
      ..default()
    }))
    .insert_resource(ConfigLoaded::from(config))
    .add_plugins(config::ConfigPlugin)
    .add_plugins(core::CorePlugin)
    .add_plugins(input::InputPlugin)
    .add_plugins(world::WorldPlugin)
    .add_plugins(player::PlayerPlugin);

  #[cfg(feature = "visual_debug")]
  app.add_plugins(infinite_rooms::visual_debug::VisualDebugPlugin);

  app.run()
}
