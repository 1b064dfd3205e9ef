use bevy::prelude::*;

#[derive(Component)]
pub struct Player;

/// Marker for the first-person camera, a child of the player body.
#[derive(Component)]
pub struct PlayerCamera;

#[derive(Component, Default)]
pub struct CharacterVelocity(pub Vec3);

#[derive(Component)]
pub struct CharacterMovementConfig {
  pub walk_speed: f32,
  pub acceleration: f32,
  pub air_acceleration: f32,
  pub jump_speed: f32,
}

#[derive(Component, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocomotionState {
  #[default]
  Grounded,
  Airborne,
}

/// Accumulated mouse-look angles, in radians.
#[derive(Component, Default, Debug, Clone, Copy, PartialEq)]
pub struct LookAngles {
  pub yaw: f32,
  pub pitch: f32,
}

impl LookAngles {
  /// Pitch limit, just short of straight up or down.
  pub const MAX_PITCH: f32 = 1.54;

  /// Applies a mouse delta in pixels. Moving the mouse right turns right,
  /// moving it down looks down.
  pub fn apply_mouse_delta(&mut self, delta: Vec2, sensitivity: f32) {
    self.yaw -= delta.x * sensitivity;
    self.pitch = (self.pitch - delta.y * sensitivity).clamp(-Self::MAX_PITCH, Self::MAX_PITCH);
  }

  pub fn body_rotation(&self) -> Quat {
    Quat::from_rotation_y(self.yaw)
  }

  pub fn camera_rotation(&self) -> Quat {
    Quat::from_rotation_x(self.pitch)
  }
}

/// Per-player look settings.
#[derive(Component)]
pub struct LookSensitivity(pub f32);
