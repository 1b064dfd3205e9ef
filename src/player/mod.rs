pub mod components;
pub mod look;
pub mod movement;
mod spawn;

#[cfg(test)]
mod tests;

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::world::WorldStreamingSet;

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
  fn build(&self, app: &mut App) {
    // The world picks the spawn point during Startup
    app.add_systems(PostStartup, spawn::spawn_player);

    app
      .add_systems(
        Update,
        (
          look::mouse_look,
          movement::handle_jump_input,
          movement::handle_movement_input,
          movement::apply_locomotion_physics,
          movement::apply_velocity_to_controller,
        )
          .chain()
          .before(WorldStreamingSet),
      )
      // Read physics output AFTER Rapier writeback
      .add_systems(
        PostUpdate,
        movement::sync_ground_from_physics.after(PhysicsSet::Writeback),
      );
  }
}
