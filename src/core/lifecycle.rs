use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;
use bevy::window::{CursorGrabMode, CursorOptions, PrimaryWindow};

/// Keys that shut the game down.
pub const QUIT_KEYS: [KeyCode; 2] = [KeyCode::KeyQ, KeyCode::Escape];

/// Locks and hides the cursor for mouse look.
pub fn grab_cursor(mut cursors: Query<&mut CursorOptions, With<PrimaryWindow>>) {
  if let Ok(mut cursor) = cursors.single_mut() {
    cursor.grab_mode = CursorGrabMode::Locked;
    cursor.visible = false;
  }
}

/// Requests an orderly shutdown with exit status 0 on a quit key.
pub fn quit_on_key(keyboard: Res<ButtonInput<KeyCode>>, mut exit: MessageWriter<AppExit>) {
  if keyboard.any_just_pressed(QUIT_KEYS) {
    info!("Quit requested, shutting down");
    exit.write(AppExit::Success);
  }
}
