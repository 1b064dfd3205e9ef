use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::components::{
  CharacterMovementConfig, CharacterVelocity, LocomotionState, LookAngles, LookSensitivity,
  Player, PlayerCamera,
};
use crate::config::ConfigLoaded;
use crate::input::{PlayerInput, player_input_actions};
use crate::world::PlayerSpawn;

/// Spawn the player at the position chosen by the world's spawn search
pub fn spawn_player(mut commands: Commands, config: Res<ConfigLoaded>, spawn: Res<PlayerSpawn>) {
  info!("Spawning player at {:?}", spawn.0);
  spawn_player_entity(&mut commands, &config, spawn.0);
}

fn spawn_player_entity(commands: &mut Commands, config: &ConfigLoaded, spawn_pos: Vec3) {
  let player = &config.player;

  // Rapier capsule_y uses half_height (cylinder part) and radius
  let half_height = player.collider_length / 2.0;

  commands
    .spawn((
      (
        Player,
        Transform::from_translation(spawn_pos),
        Visibility::default(),
        RigidBody::KinematicPositionBased,
        Collider::capsule_y(half_height, player.collider_radius),
        KinematicCharacterController {
          snap_to_ground: Some(CharacterLength::Absolute(player.snap_to_ground)),
          ..default()
        },
      ),
      (
        CharacterVelocity::default(),
        CharacterMovementConfig {
          walk_speed: player.walk_speed,
          acceleration: player.acceleration,
          air_acceleration: player.air_acceleration,
          jump_speed: player.jump_speed,
        },
        LocomotionState::Airborne, // Start airborne so gravity applies until landing
        LookAngles::default(),
        LookSensitivity(player.mouse_sensitivity),
        PlayerInput,
        player_input_actions(),
      ),
    ))
    .with_children(|parent| {
      parent.spawn((
        PlayerCamera,
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
          fov: player.fov_degrees.to_radians(),
          ..default()
        }),
        Transform::from_xyz(0.0, player.eye_height, 0.0),
      ));
    });
}
