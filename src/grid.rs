//! Grid identity and tile-space math.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::entity::EntityId;
use crate::transform::Box2;

/// Marks an entity as a grid hosting a tile-aligned coordinate space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridInfo {
    /// Edge length of one tile in grid-local units
    pub tile_size: u16,
}

impl GridInfo {
    pub fn new(tile_size: u16) -> Self {
        Self {
            tile_size: tile_size.max(1),
        }
    }

    pub fn tile_size_f32(&self) -> f32 {
        f32::from(self.tile_size)
    }

    /// Tile containing a grid-local position.
    pub fn tile_indices(&self, local: Vec2) -> IVec2 {
        (local / self.tile_size_f32()).floor().as_ivec2()
    }

    /// Grid-local bounds of a tile.
    pub fn tile_local_bounds(&self, indices: IVec2) -> Box2 {
        let size = self.tile_size_f32();
        Box2::from_origin_size(indices.as_vec2() * size, Vec2::splat(size))
    }

    pub fn tile_center(&self, indices: IVec2) -> Vec2 {
        (indices.as_vec2() + Vec2::splat(0.5)) * self.tile_size_f32()
    }

    /// Centre of the tile that contains `local`.
    pub fn snap_to_tile_center(&self, local: Vec2) -> Vec2 {
        self.tile_center(self.tile_indices(local))
    }
}

impl Default for GridInfo {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Tile definition stored in a grid cell. Type id 0 is space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub type_id: u16,
}

impl Tile {
    pub const EMPTY: Tile = Tile { type_id: 0 };

    pub fn new(type_id: u16) -> Self {
        Self { type_id }
    }

    pub fn is_empty(&self) -> bool {
        self.type_id == Self::EMPTY.type_id
    }
}

/// Raised by the grid service when a tile changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileChangedEvent {
    pub grid: EntityId,
    pub indices: IVec2,
    pub old_tile: Tile,
    pub new_tile: Tile,
}

impl TileChangedEvent {
    pub fn became_empty(&self) -> bool {
        self.new_tile.is_empty()
    }
}
