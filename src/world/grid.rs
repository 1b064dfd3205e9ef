//! Integer grid coordinates on the XZ plane.

use std::fmt;

use bevy::math::{Vec2, Vec3};

/// Identifies one square cell of the XZ grid.
///
/// Cell `(x, z)` covers world positions
/// `[x * cell_size, (x + 1) * cell_size)` on X and likewise on Z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GridKey {
  pub x: i32,
  pub z: i32,
}

impl GridKey {
  pub const ORIGIN: Self = Self { x: 0, z: 0 };

  pub const fn new(x: i32, z: i32) -> Self {
    Self { x, z }
  }

  /// Returns the cell containing `position`, ignoring its height.
  pub fn from_position(position: Vec3, cell_size: f32) -> Self {
    Self {
      x: (position.x / cell_size).floor() as i32,
      z: (position.z / cell_size).floor() as i32,
    }
  }

  /// Chebyshev distance in cells.
  pub fn chebyshev(self, other: Self) -> u32 {
    self.x.abs_diff(other.x).max(self.z.abs_diff(other.z))
  }

  /// Center of the cell on the XZ plane (`x` maps to X, `y` maps to Z).
  pub fn center(self, cell_size: f32) -> Vec2 {
    Vec2::new(
      (self.x as f32 + 0.5) * cell_size,
      (self.z as f32 + 0.5) * cell_size,
    )
  }

  /// True for cells that may hold a wall: both coordinates even.
  pub fn is_wall_slot(self) -> bool {
    self.x.rem_euclid(2) == 0 && self.z.rem_euclid(2) == 0
  }

  /// Iterates every key in the square of the given Chebyshev `radius`
  /// around `self`, row by row.
  pub fn square(self, radius: u32) -> impl Iterator<Item = GridKey> {
    let r = radius as i32;
    let (cx, cz) = (self.x, self.z);
    ((cx - r)..=(cx + r)).flat_map(move |x| ((cz - r)..=(cz + r)).map(move |z| GridKey::new(x, z)))
  }
}

impl fmt::Display for GridKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "({}, {})", self.x, self.z)
  }
}

/// Distance between two points projected onto the XZ plane.
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
  Vec2::new(a.x - b.x, a.z - b.z).length()
}
