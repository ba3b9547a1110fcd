//! Spatial lookup service consumed by tile detachment.

use bitflags::bitflags;
use tracing::trace;

use crate::entity::EntityId;
use crate::hierarchy::HierarchyIndex;
use crate::transform::Box2;

bitflags! {
    /// Which entities a bounds query returns.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct LookupFlags: u8 {
        /// Entities anchored to a tile.
        const ANCHORED    = 0b0000_0001;
        /// Entities free to move.
        const DYNAMIC     = 0b0000_0010;
        /// Only entities whose direct parent is a grid or map.
        const UNCONTAINED = 0b0000_0100;
    }
}

impl Default for LookupFlags {
    fn default() -> Self {
        LookupFlags::ANCHORED | LookupFlags::DYNAMIC
    }
}

/// Answers "which entities are in this box".
///
/// `bounds` is expressed in the local frame of `reference`. Results may be
/// approximate (a superset); callers re-check what they rely on.
pub trait SpatialLookup {
    fn query_entities_in_bounds(
        &self,
        index: &HierarchyIndex,
        reference: EntityId,
        bounds: Box2,
        flags: LookupFlags,
    ) -> Vec<EntityId>;
}

/// Linear scan over every node. Fine for tests and small worlds.
#[derive(Clone, Copy, Debug, Default)]
pub struct BruteForceLookup;

impl BruteForceLookup {
    fn accepts(index: &HierarchyIndex, entity: EntityId, anchored: bool, flags: LookupFlags) -> bool {
        let kind_ok = if anchored {
            flags.contains(LookupFlags::ANCHORED)
        } else {
            flags.contains(LookupFlags::DYNAMIC)
        };
        if !kind_ok {
            return false;
        }
        if !flags.contains(LookupFlags::UNCONTAINED) {
            return true;
        }
        match index.parent(entity) {
            Ok(Some(parent)) => index.is_grid(parent) || index.is_map(parent),
            _ => false,
        }
    }
}

impl SpatialLookup for BruteForceLookup {
    fn query_entities_in_bounds(
        &self,
        index: &HierarchyIndex,
        reference: EntityId,
        bounds: Box2,
        flags: LookupFlags,
    ) -> Vec<EntityId> {
        let Ok(to_local) = index.get_inv_world_matrix(reference) else {
            return Vec::new();
        };

        let mut found = Vec::new();
        for (entity, node) in index.iter() {
            if entity == reference || !Self::accepts(index, entity, node.anchored(), flags) {
                continue;
            }
            let Ok(world) = index.get_world_position(entity) else {
                continue;
            };
            if bounds.contains(to_local.transform_point2(world)) {
                found.push(entity);
            }
        }
        trace!(?reference, hits = found.len(), "bounds query");
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityRegistry;
    use crate::grid::GridInfo;
    use glam::Vec2;

    #[test]
    fn test_query_in_grid_frame() {
        let mut registry = EntityRegistry::new();
        let mut index = HierarchyIndex::new();
        let map = registry.spawn();
        index.add_map(map).unwrap();
        let grid = registry.spawn();
        index.insert_with_parent(grid, map, Vec2::new(50.0, 0.0)).unwrap();
        index.add_grid(grid, GridInfo::new(1)).unwrap();

        let inside = registry.spawn();
        index.insert_with_parent(inside, grid, Vec2::new(0.5, 0.5)).unwrap();
        let outside = registry.spawn();
        index.insert_with_parent(outside, grid, Vec2::new(3.5, 0.5)).unwrap();
        let nested = registry.spawn();
        index.insert_with_parent(nested, inside, Vec2::ZERO).unwrap();
        let floating = registry.spawn();
        index.insert_with_parent(floating, map, Vec2::new(50.5, 0.5)).unwrap();

        let tile = GridInfo::new(1).tile_local_bounds(glam::IVec2::ZERO);
        let mut all = BruteForceLookup.query_entities_in_bounds(&index, grid, tile, LookupFlags::default());
        all.sort();
        let mut expected = vec![inside, nested, floating];
        expected.sort();
        assert_eq!(all, expected);

        let uncontained = BruteForceLookup.query_entities_in_bounds(
            &index,
            grid,
            tile,
            LookupFlags::default() | LookupFlags::UNCONTAINED,
        );
        assert!(!uncontained.contains(&nested));
        assert!(uncontained.contains(&floating));
    }

    #[test]
    fn test_anchored_filter() {
        let mut registry = EntityRegistry::new();
        let mut index = HierarchyIndex::new();
        let grid = registry.spawn();
        index.add_grid(grid, GridInfo::new(1)).unwrap();
        let wall = registry.spawn();
        index.insert_with_parent(wall, grid, Vec2::new(0.5, 0.5)).unwrap();
        index.anchor(wall).unwrap();
        let bounds = Box2::new(Vec2::ZERO, Vec2::ONE);

        assert!(BruteForceLookup
            .query_entities_in_bounds(&index, grid, bounds, LookupFlags::DYNAMIC)
            .is_empty());
        assert_eq!(
            BruteForceLookup.query_entities_in_bounds(&index, grid, bounds, LookupFlags::ANCHORED),
            vec![wall]
        );
    }
}
