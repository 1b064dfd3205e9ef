use std::f32::consts::FRAC_PI_2;
use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

use super::components::*;
use super::movement;
use crate::core::GravityConfig;

fn assert_close(a: Vec3, b: Vec3) {
  assert!((a - b).length() < 1e-5, "{a:?} != {b:?}");
}

#[test]
fn forward_input_walks_along_negative_z() {
  assert_close(
    movement::planar_direction(Vec2::Y, 0.0),
    Vec3::new(0.0, 0.0, -1.0),
  );
  assert_close(movement::planar_direction(Vec2::X, 0.0), Vec3::X);
}

#[test]
fn direction_follows_yaw_and_is_normalized() {
  // Quarter turn left: forward now points along -X
  assert_close(
    movement::planar_direction(Vec2::Y, FRAC_PI_2),
    Vec3::new(-1.0, 0.0, 0.0),
  );

  let diagonal = movement::planar_direction(Vec2::new(1.0, 1.0), 0.3);
  assert!((diagonal.length() - 1.0).abs() < 1e-5);
  assert_eq!(diagonal.y, 0.0);
  assert_eq!(movement::planar_direction(Vec2::ZERO, 1.0), Vec3::ZERO);
}

#[test]
fn look_pitch_is_clamped() {
  let mut look = LookAngles::default();

  look.apply_mouse_delta(Vec2::new(0.0, -10_000.0), 0.01);
  assert_eq!(look.pitch, LookAngles::MAX_PITCH);

  look.apply_mouse_delta(Vec2::new(0.0, 20_000.0), 0.01);
  assert_eq!(look.pitch, -LookAngles::MAX_PITCH);
}

#[test]
fn mouse_right_turns_right() {
  let mut look = LookAngles::default();
  look.apply_mouse_delta(Vec2::new(100.0, 0.0), 0.002);

  let forward = look.body_rotation() * Vec3::NEG_Z;
  assert!(forward.x > 0.0, "expected a right turn, got {forward:?}");
}

#[test]
fn player_falls_with_gravity() {
  let mut app = App::new();

  app
    .add_plugins(MinimalPlugins)
    .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(16)))
    .insert_resource(GravityConfig { value: 20.0 })
    .add_systems(Update, movement::apply_locomotion_physics);

  let player = app
    .world_mut()
    .spawn((Player, CharacterVelocity::default(), LocomotionState::Airborne))
    .id();

  for _ in 0..200 {
    app.update();
  }

  let velocity = app.world().get::<CharacterVelocity>(player).unwrap().0;
  // 200 frames of 16ms at 20 u/s^2 would reach -64 without the clamp
  assert_eq!(velocity.y, -50.0, "should settle at terminal velocity");
}

#[test]
fn grounded_player_has_no_vertical_velocity() {
  let mut app = App::new();

  app
    .add_plugins(MinimalPlugins)
    .insert_resource(GravityConfig { value: 20.0 })
    .add_systems(Update, movement::apply_locomotion_physics);

  let player = app
    .world_mut()
    .spawn((
      Player,
      CharacterVelocity(Vec3::new(1.0, -3.0, 0.0)),
      LocomotionState::Grounded,
    ))
    .id();

  app.update();

  let velocity = app.world().get::<CharacterVelocity>(player).unwrap().0;
  assert_eq!(velocity, Vec3::new(1.0, 0.0, 0.0));
}
