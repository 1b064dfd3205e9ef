use bevy::input::mouse::AccumulatedMouseMotion;
use bevy::prelude::*;

use super::components::{LookAngles, LookSensitivity, Player, PlayerCamera};

/// Yaw turns the body, pitch tilts the camera child.
pub fn mouse_look(
  mouse_motion: Res<AccumulatedMouseMotion>,
  mut players: Query<(&mut LookAngles, &LookSensitivity, &mut Transform), With<Player>>,
  mut cameras: Query<&mut Transform, (With<PlayerCamera>, Without<Player>)>,
) {
  let delta = mouse_motion.delta;
  if delta == Vec2::ZERO {
    return;
  }

  let Ok((mut look, sensitivity, mut body)) = players.single_mut() else {
    return;
  };
  look.apply_mouse_delta(delta, sensitivity.0);
  body.rotation = look.body_rotation();

  for mut camera in &mut cameras {
    camera.rotation = look.camera_rotation();
  }
}
