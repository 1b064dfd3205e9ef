//! Engine-side construction of chunk and wall entities.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::grid::GridKey;
use super::streamer::{Chunk, TerrainBuilder, WallLayout};
use crate::config::{ConfigLoaded, SurfaceConfig};

/// Collider half-thickness of a floor tile.
const FLOOR_HALF_THICKNESS: f32 = 0.05;
/// Thickness of the light panel under each ceiling block.
const LIGHT_THICKNESS: f32 = 0.05;

/// Marks the floor, ceiling and light entities of a chunk.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkTile(pub GridKey);

/// Marks a wall obstacle entity.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallBlock(pub GridKey);

/// Shared meshes, materials and dimensions for terrain entities.
#[derive(Resource, Default, Clone)]
pub struct TerrainAssets {
  pub cell_size: f32,
  pub ceiling_height: f32,
  pub ceiling_thickness: f32,
  pub floor_mesh: Handle<Mesh>,
  pub ceiling_mesh: Handle<Mesh>,
  pub light_mesh: Handle<Mesh>,
  /// Unit cube, scaled per wall.
  pub wall_mesh: Handle<Mesh>,
  pub floor_material: Handle<StandardMaterial>,
  pub ceiling_material: Handle<StandardMaterial>,
  pub light_material: Handle<StandardMaterial>,
  pub wall_material: Handle<StandardMaterial>,
}

pub fn setup_terrain_assets(
  mut commands: Commands,
  config: Res<ConfigLoaded>,
  asset_server: Res<AssetServer>,
  mut meshes: ResMut<Assets<Mesh>>,
  mut materials: ResMut<Assets<StandardMaterial>>,
) {
  let terrain = &config.terrain;
  let cell = config.streaming.cell_size;

  let surface_material = |surface: &SurfaceConfig| StandardMaterial {
    base_color: Color::srgb(surface.color[0], surface.color[1], surface.color[2]),
    base_color_texture: surface.texture.clone().map(|path| asset_server.load(path)),
    perceptual_roughness: 0.9,
    ..default()
  };

  let floor_material = materials.add(surface_material(&terrain.floor));
  let ceiling_material = materials.add(surface_material(&terrain.ceiling));
  let wall_material = materials.add(surface_material(&terrain.wall));
  let light_color = Color::srgb(
    terrain.light.color[0],
    terrain.light.color[1],
    terrain.light.color[2],
  );
  let light_material = materials.add(StandardMaterial {
    emissive: light_color.to_linear() * terrain.light_emissive_strength,
    ..surface_material(&terrain.light)
  });

  commands.insert_resource(TerrainAssets {
    cell_size: cell,
    ceiling_height: terrain.ceiling_height,
    ceiling_thickness: terrain.ceiling_thickness,
    floor_mesh: meshes.add(Plane3d::default().mesh().size(cell, cell)),
    ceiling_mesh: meshes.add(Cuboid::new(cell, terrain.ceiling_thickness, cell)),
    light_mesh: meshes.add(Cuboid::new(
      terrain.light_size,
      LIGHT_THICKNESS,
      terrain.light_size,
    )),
    wall_mesh: meshes.add(Cuboid::new(1.0, 1.0, 1.0)),
    floor_material,
    ceiling_material,
    light_material,
    wall_material,
  });
}

/// [`TerrainBuilder`] that spawns entities through [`Commands`].
pub struct SceneBuilder<'a, 'w, 's> {
  commands: &'a mut Commands<'w, 's>,
  assets: &'a TerrainAssets,
}

impl<'a, 'w, 's> SceneBuilder<'a, 'w, 's> {
  pub fn new(commands: &'a mut Commands<'w, 's>, assets: &'a TerrainAssets) -> Self {
    Self { commands, assets }
  }
}

impl TerrainBuilder for SceneBuilder<'_, '_, '_> {
  fn spawn_chunk(&mut self, key: GridKey) -> Chunk {
    let assets = self.assets;
    let center = key.center(assets.cell_size);
    let half_cell = assets.cell_size / 2.0;
    let half_ceiling = assets.ceiling_thickness / 2.0;

    let floor = self
      .commands
      .spawn((
        ChunkTile(key),
        Mesh3d(assets.floor_mesh.clone()),
        MeshMaterial3d(assets.floor_material.clone()),
        Transform::from_xyz(center.x, 0.0, center.y),
        RigidBody::Fixed,
        Collider::cuboid(half_cell, FLOOR_HALF_THICKNESS, half_cell),
      ))
      .id();

    let ceiling = self
      .commands
      .spawn((
        ChunkTile(key),
        Mesh3d(assets.ceiling_mesh.clone()),
        MeshMaterial3d(assets.ceiling_material.clone()),
        Transform::from_xyz(center.x, assets.ceiling_height + half_ceiling, center.y),
        RigidBody::Fixed,
        Collider::cuboid(half_cell, half_ceiling, half_cell),
      ))
      .id();

    let light = self
      .commands
      .spawn((
        ChunkTile(key),
        Mesh3d(assets.light_mesh.clone()),
        MeshMaterial3d(assets.light_material.clone()),
        Transform::from_xyz(
          center.x,
          assets.ceiling_height - LIGHT_THICKNESS / 2.0,
          center.y,
        ),
      ))
      .id();

    Chunk::new(floor, ceiling, light)
  }

  fn spawn_wall(&mut self, key: GridKey, layout: &WallLayout) -> Entity {
    self
      .commands
      .spawn((
        WallBlock(key),
        Mesh3d(self.assets.wall_mesh.clone()),
        MeshMaterial3d(self.assets.wall_material.clone()),
        Transform::from_translation(layout.center).with_scale(layout.size),
        RigidBody::Fixed,
        // Scaled by the transform to the layout size.
        Collider::cuboid(0.5, 0.5, 0.5),
      ))
      .id()
  }

  fn despawn(&mut self, entity: Entity) {
    self.commands.entity(entity).despawn();
  }
}
