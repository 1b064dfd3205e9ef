use bevy::prelude::*;
use bevy_enhanced_input::prelude::*;
use bevy_rapier3d::prelude::*;

use super::components::{
  CharacterMovementConfig, CharacterVelocity, LocomotionState, LookAngles, Player,
};
use crate::core::GravityConfig;
use crate::input::{Jump, Move, PlayerInput};

const TERMINAL_VELOCITY: f32 = 50.0;

/// World-space walking direction for a `Move` input, turned by `yaw`.
pub fn planar_direction(input: Vec2, yaw: f32) -> Vec3 {
  let local = Vec3::new(input.x, 0.0, -input.y);
  (Quat::from_rotation_y(yaw) * local).normalize_or_zero()
}

/// Runs in PostUpdate AFTER physics to read fresh ground state.
pub fn sync_ground_from_physics(
  mut players: Query<
    (
      &mut LocomotionState,
      &mut CharacterVelocity,
      Option<&KinematicCharacterControllerOutput>,
    ),
    With<Player>,
  >,
) {
  for (mut state, mut velocity, output) in &mut players {
    let physics_grounded = output.is_some_and(|o| o.grounded);

    match *state {
      LocomotionState::Grounded => {
        if !physics_grounded {
          *state = LocomotionState::Airborne;
        }
      }
      LocomotionState::Airborne => {
        // Landing only counts once we are falling, not on the jump frame
        if physics_grounded && velocity.0.y <= 0.0 {
          velocity.0.y = 0.0;
          *state = LocomotionState::Grounded;
        }
      }
    }
  }
}

pub fn handle_movement_input(
  mut players: Query<
    (
      &Actions<PlayerInput>,
      &mut CharacterVelocity,
      &CharacterMovementConfig,
      &LocomotionState,
      &LookAngles,
    ),
    With<Player>,
  >,
  move_actions: Query<(&Action<Move>, &ActionState)>,
  time: Res<Time>,
) {
  for (actions, mut velocity, config, state, look) in &mut players {
    let mut move_value = Vec2::ZERO;
    for action_entity in actions.iter() {
      if let Ok((action, action_state)) = move_actions.get(action_entity) {
        // Only use input when action is active (Fired or Ongoing)
        if matches!(action_state, ActionState::Fired | ActionState::Ongoing) {
          move_value = **action;
        }
      }
    }

    let target = planar_direction(move_value, look.yaw) * config.walk_speed;
    let accel = if *state == LocomotionState::Grounded {
      config.acceleration
    } else {
      config.air_acceleration
    };

    // Smoothly interpolate horizontal velocity towards target
    let t = (accel * time.delta_secs()).min(1.0);
    velocity.0.x += (target.x - velocity.0.x) * t;
    velocity.0.z += (target.z - velocity.0.z) * t;
  }
}

pub fn handle_jump_input(
  mut players: Query<
    (
      &Actions<PlayerInput>,
      &mut CharacterVelocity,
      &CharacterMovementConfig,
      &mut LocomotionState,
    ),
    With<Player>,
  >,
  jump_actions: Query<&ActionState, With<Action<Jump>>>,
) {
  for (actions, mut velocity, config, mut state) in &mut players {
    if *state != LocomotionState::Grounded {
      continue;
    }
    let jumped = actions
      .iter()
      .filter_map(|entity| jump_actions.get(entity).ok())
      .any(|action_state| matches!(action_state, ActionState::Fired));
    if jumped {
      trace!("Jump at vel={:?}", velocity.0);
      velocity.0.y = config.jump_speed;
      *state = LocomotionState::Airborne;
    }
  }
}

/// Applies gravity while airborne, clamped to terminal velocity.
pub fn apply_locomotion_physics(
  mut players: Query<(&mut CharacterVelocity, &LocomotionState), With<Player>>,
  gravity: Res<GravityConfig>,
  time: Res<Time>,
) {
  for (mut velocity, state) in &mut players {
    match state {
      LocomotionState::Grounded => {
        velocity.0.y = 0.0;
      }
      LocomotionState::Airborne => {
        velocity.0.y -= gravity.value * time.delta_secs();
        velocity.0.y = velocity.0.y.max(-TERMINAL_VELOCITY);
      }
    }
  }
}

pub fn apply_velocity_to_controller(
  mut players: Query<(&CharacterVelocity, &mut KinematicCharacterController), With<Player>>,
  time: Res<Time>,
) {
  for (velocity, mut controller) in &mut players {
    controller.translation = Some(velocity.0 * time.delta_secs());
  }
}
