use std::f32::consts::FRAC_PI_2;

use bevy::prelude::*;

use crate::player::components::{CharacterVelocity, Player};
use crate::world::ChunkStreamer;

/// Gizmo overlay state, toggled with F3.
#[derive(Resource, Default)]
pub struct StreamingOverlay {
  pub enabled: bool,
}

pub struct VisualDebugPlugin;

impl Plugin for VisualDebugPlugin {
  fn build(&self, app: &mut App) {
    app
      .init_resource::<StreamingOverlay>()
      .add_systems(PreUpdate, toggle_overlay)
      .add_systems(Update, draw_streaming_overlay);
  }
}

fn toggle_overlay(keyboard: Res<ButtonInput<KeyCode>>, mut overlay: ResMut<StreamingOverlay>) {
  if keyboard.just_pressed(KeyCode::F3) {
    overlay.enabled = !overlay.enabled;
    info!(
      "Streaming overlay {}",
      if overlay.enabled { "ENABLED" } else { "DISABLED" }
    );
  }
}

/// Draws the active window border (cyan), the player's cell (yellow), the
/// spawn clearance ring around every wall (red) and the player's velocity
/// (green).
fn draw_streaming_overlay(
  mut gizmos: Gizmos,
  overlay: Res<StreamingOverlay>,
  streamer: Option<Res<ChunkStreamer>>,
  players: Query<(&Transform, &CharacterVelocity), With<Player>>,
) {
  const OVERLAY_HEIGHT: f32 = 0.05;

  if !overlay.enabled {
    return;
  }
  let Some(streamer) = streamer else {
    return;
  };
  let settings = streamer.settings();
  let cell_size = settings.cell_size;

  if let Some(cell) = streamer.player_cell() {
    let center = cell.center(cell_size);
    let center = Vec3::new(center.x, OVERLAY_HEIGHT, center.y);
    let window = (2 * settings.active_radius + 1) as f32 * cell_size;
    draw_square(&mut gizmos, center, window, Color::srgb(0.0, 1.0, 1.0));
    draw_square(&mut gizmos, center, cell_size, Color::srgb(1.0, 1.0, 0.0));
  }

  for (_, wall) in streamer.walls() {
    let center = wall.layout().center;
    gizmos.circle(
      Isometry3d::new(
        Vec3::new(center.x, OVERLAY_HEIGHT, center.z),
        Quat::from_rotation_x(FRAC_PI_2),
      ),
      settings.spawn.clearance,
      Color::srgb(1.0, 0.2, 0.2),
    );
  }

  for (transform, velocity) in &players {
    if velocity.0.length_squared() > 0.01 {
      let start = transform.translation;
      gizmos.line(start, start + velocity.0, Color::srgb(0.0, 1.0, 0.0));
    }
  }
}

fn draw_square(gizmos: &mut Gizmos, center: Vec3, size: f32, color: Color) {
  let h = size / 2.0;
  let corners = [
    center + Vec3::new(-h, 0.0, -h),
    center + Vec3::new(h, 0.0, -h),
    center + Vec3::new(h, 0.0, h),
    center + Vec3::new(-h, 0.0, h),
  ];
  for i in 0..corners.len() {
    gizmos.line(corners[i], corners[(i + 1) % corners.len()], color);
  }
}
