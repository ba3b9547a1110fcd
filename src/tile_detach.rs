//! Releases entities standing on a grid tile that just became empty.
//!
//! Entities parented directly to the grid whose local position lies inside
//! the removed tile are moved to the grid's map, keeping their world pose.
//! Entities already queued for deletion go to nullspace instead.
//! Entities nested inside something else on the tile stay with their container.

#[cfg(feature = "profiling")]
use tracing::info_span;
use tracing::{debug, trace, warn};

use crate::entity::{EntityId, EntityLifecycle};
use crate::error::Result;
use crate::grid::TileChangedEvent;
use crate::hierarchy::HierarchyIndex;
use crate::lookup::{LookupFlags, SpatialLookup};

pub struct TileDetachResolver {
    flags: LookupFlags,
}

impl TileDetachResolver {
    pub fn new() -> Self {
        Self {
            flags: LookupFlags::default() | LookupFlags::UNCONTAINED,
        }
    }

    pub fn with_flags(flags: LookupFlags) -> Self {
        Self { flags }
    }

    pub fn flags(&self) -> LookupFlags {
        self.flags
    }

    /// React to a tile change. Returns how many entities were released.
    ///
    /// Only tiles that became empty are handled. A grid without a transform
    /// or without an enclosing map is left alone.
    pub fn handle_tile_changed(
        &self,
        index: &mut HierarchyIndex,
        lookup: &dyn SpatialLookup,
        lifecycle: &dyn EntityLifecycle,
        event: &TileChangedEvent,
    ) -> Result<usize> {
        if !event.became_empty() {
            return Ok(0);
        }

        let grid = event.grid;
        let Some(info) = index.grid_info(grid) else {
            trace!(?grid, "tile change on entity without grid transform");
            return Ok(0);
        };
        let Some(map) = index.resolve_grid_and_map(grid)?.map else {
            trace!(?grid, "tile change on grid outside any map");
            return Ok(0);
        };

        #[cfg(feature = "profiling")]
        let span = info_span!("tile_detach", x = event.indices.x, y = event.indices.y);
        #[cfg(feature = "profiling")]
        let _span_guard = span.enter();

        let bounds = info.tile_local_bounds(event.indices);
        let candidates = lookup.query_entities_in_bounds(index, grid, bounds, self.flags);

        let mut on_tile: Vec<EntityId> = candidates
            .into_iter()
            .filter(|&entity| {
                index.node(entity).is_ok_and(|node| {
                    node.parent() == Some(grid) && bounds.contains(node.local_position())
                })
            })
            .collect();
        // Approximate lookups may report an entity more than once.
        on_tile.sort_unstable();
        on_tile.dedup();

        let mut released = 0;
        for &entity in &on_tile {
            let result = if lifecycle.is_queued_for_deletion(entity) {
                index.detach_to_nullspace(entity)
            } else {
                index.set_parent_preserving_world(entity, Some(map))
            };
            match result {
                Ok(()) => released += 1,
                Err(e) => warn!(?entity, error = %e, "could not release entity from emptied tile"),
            }
        }

        debug!(
            ?grid,
            tile = ?event.indices,
            released,
            "released entities from emptied tile"
        );
        Ok(released)
    }
}

impl Default for TileDetachResolver {
    fn default() -> Self {
        Self::new()
    }
}
