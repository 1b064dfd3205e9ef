pub mod lifecycle;
mod lighting;
mod physics;

use bevy::prelude::*;
pub use physics::GravityConfig;

pub struct CorePlugin;

impl Plugin for CorePlugin {
  fn build(&self, app: &mut App) {
    app
      .add_plugins(physics::PhysicsPlugin)
      .add_systems(
        Startup,
        (lifecycle::grab_cursor, lighting::spawn_lighting),
      )
      .add_systems(Update, lifecycle::quit_on_key);
  }
}

#[cfg(test)]
mod tests {
  use bevy::prelude::*;

  use super::lifecycle;

  fn quit_app() -> App {
    let mut app = App::new();
    app
      .add_plugins(MinimalPlugins)
      .init_resource::<ButtonInput<KeyCode>>()
      .add_systems(Update, lifecycle::quit_on_key);
    app
  }

  #[test]
  fn escape_exits_with_success() {
    let mut app = quit_app();
    app.update();
    assert!(app.should_exit().is_none());

    app
      .world_mut()
      .resource_mut::<ButtonInput<KeyCode>>()
      .press(KeyCode::Escape);
    app.update();

    assert_eq!(app.should_exit(), Some(AppExit::Success));
  }

  #[test]
  fn other_keys_do_not_exit() {
    let mut app = quit_app();
    app
      .world_mut()
      .resource_mut::<ButtonInput<KeyCode>>()
      .press(KeyCode::KeyW);
    app.update();

    assert!(app.should_exit().is_none());
  }
}
