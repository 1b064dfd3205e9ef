use bevy::prelude::*;

/// Dim key light so walls read against the emissive ceiling panels.
pub fn spawn_lighting(mut commands: Commands) {
  commands.spawn((
    DirectionalLight {
      illuminance: 2_500.0,
      shadows_enabled: false,
      ..default()
    },
    Transform::from_xyz(4.0, 10.0, 2.0).looking_at(Vec3::ZERO, Vec3::Y),
  ));
}
