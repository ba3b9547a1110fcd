// Copyright 2024 Saptak Santra
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Hierarchy index: sole owner and mutator of every [`TransformNode`].
//!
//! All mutations go through a single commit path that updates local fields,
//! marks cached world state stale for the node and its subtree, and queues a
//! [`MoveEvent`]. Nothing is recomputed on write; world matrices and the
//! enclosing grid/map are resolved on first read and memoized on the nodes.

use glam::{Affine2, IVec2, Vec2};
use slotmap::SecondaryMap;
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use crate::config::{TransformConfig, MAX_MOVE_QUEUE_CAPACITY};
use crate::coordinates::CoordinateFrame;
use crate::entity::EntityId;
use crate::error::{Result, TransformError};
use crate::event::{MoveEvent, MoveQueues};
use crate::grid::GridInfo;
use crate::node::{Dirty, FrameRefs, TransformNode, WorldCache};
use crate::transform::Angle;

/// Arena of transform nodes keyed by entity.
pub struct HierarchyIndex {
    nodes: SecondaryMap<EntityId, TransformNode>,

    /// Moves committed since the last flush
    moves: MoveQueues,

    /// Used by `add_default_grid`
    default_grid: GridInfo,
}

impl HierarchyIndex {
    pub fn new() -> Self {
        Self::with_config(&TransformConfig::default())
    }

    pub fn with_config(config: &TransformConfig) -> Self {
        Self {
            nodes: SecondaryMap::new(),
            // Configs built in code skip `validate`.
            moves: MoveQueues::with_capacity(
                config.move_queue_capacity.min(MAX_MOVE_QUEUE_CAPACITY),
            ),
            default_grid: GridInfo::new(config.default_tile_size),
        }
    }

    // ------------------------------------------------------------------
    // Node access
    // ------------------------------------------------------------------

    pub fn contains(&self, entity: EntityId) -> bool {
        self.nodes.contains_key(entity)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, entity: EntityId) -> Result<&TransformNode> {
        self.nodes
            .get(entity)
            .ok_or(TransformError::UnknownEntity(entity))
    }

    fn node_mut(&mut self, entity: EntityId) -> Result<&mut TransformNode> {
        self.nodes
            .get_mut(entity)
            .ok_or(TransformError::UnknownEntity(entity))
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &TransformNode)> {
        self.nodes.iter()
    }

    pub fn parent(&self, entity: EntityId) -> Result<Option<EntityId>> {
        Ok(self.node(entity)?.parent)
    }

    pub fn children(&self, entity: EntityId) -> Result<&[EntityId]> {
        Ok(self.node(entity)?.children())
    }

    /// Ancestors of `entity`, nearest first. Empty for unknown entities.
    pub fn ancestors(&self, entity: EntityId) -> Ancestors<'_> {
        Ancestors {
            index: self,
            next: self.nodes.get(entity).and_then(|n| n.parent),
        }
    }

    pub fn is_ancestor_of(&self, ancestor: EntityId, entity: EntityId) -> bool {
        self.ancestors(entity).any(|a| a == ancestor)
    }

    pub fn is_grid(&self, entity: EntityId) -> bool {
        self.nodes.get(entity).is_some_and(|n| n.is_grid())
    }

    pub fn is_map(&self, entity: EntityId) -> bool {
        self.nodes.get(entity).is_some_and(|n| n.is_map())
    }

    pub fn grid_info(&self, entity: EntityId) -> Option<GridInfo> {
        self.nodes.get(entity).and_then(|n| n.grid)
    }

    pub fn pending_moves(&self) -> &MoveQueues {
        &self.moves
    }

    /// Hand the queued moves to the scheduler, leaving empty queues behind.
    pub(crate) fn take_moves(&mut self) -> MoveQueues {
        std::mem::take(&mut self.moves)
    }

    // ------------------------------------------------------------------
    // Node creation and frame identity
    // ------------------------------------------------------------------

    /// Give `entity` a transform in nullspace. Returns false if it already had one.
    pub fn insert(&mut self, entity: EntityId) -> bool {
        if self.nodes.contains_key(entity) {
            return false;
        }
        self.nodes.insert(entity, TransformNode::new(None, Vec2::ZERO));
        true
    }

    pub fn insert_with_parent(
        &mut self,
        entity: EntityId,
        parent: EntityId,
        local_position: Vec2,
    ) -> Result<()> {
        if !self.contains(parent) || parent == entity {
            return Err(TransformError::invalid_parent(
                entity,
                Some(parent),
                "parent has no transform",
            ));
        }
        self.insert(entity);
        self.set_parent(entity, Some(parent), local_position)
    }

    /// Flag `entity` as a map root, creating its node if needed.
    pub fn add_map(&mut self, entity: EntityId) -> Result<()> {
        if let Some(node) = self.nodes.get(entity) {
            if node.parent.is_some() {
                return Err(TransformError::invalid_parent(
                    entity,
                    node.parent,
                    "a map cannot have a parent",
                ));
            }
        }
        self.insert(entity);
        let node = self.node_mut(entity)?;
        node.map = true;
        node.anchored = false;
        self.invalidate_subtree(entity, Dirty::None, true);
        Ok(())
    }

    /// Flag `entity` as a grid, creating its node if needed.
    pub fn add_grid(&mut self, entity: EntityId, info: GridInfo) -> Result<()> {
        self.insert(entity);
        let node = self.node_mut(entity)?;
        node.grid = Some(info);
        node.anchored = false;
        self.invalidate_subtree(entity, Dirty::None, true);
        Ok(())
    }

    pub fn add_default_grid(&mut self, entity: EntityId) -> Result<()> {
        self.add_grid(entity, self.default_grid)
    }

    /// Drop every node and any pending moves.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.moves.clear();
    }

    // ------------------------------------------------------------------
    // World-space queries
    // ------------------------------------------------------------------

    /// Resolve the world cache of `entity`, recomputing only stale ancestors.
    fn world_cache(&self, entity: EntityId) -> Result<WorldCache> {
        let node = self.node(entity)?;
        if node.dirty().is_clean() {
            return Ok(node.world_cache());
        }

        // Walk up to the first clean ancestor; a clean node never has a stale ancestor.
        let mut stale: SmallVec<[&TransformNode; 16]> = SmallVec::new();
        stale.push(node);
        let mut base = WorldCache::IDENTITY;
        let mut cursor = node.parent;
        while let Some(id) = cursor {
            let ancestor = self.node(id)?;
            if ancestor.dirty().is_clean() {
                base = ancestor.world_cache();
                break;
            }
            stale.push(ancestor);
            cursor = ancestor.parent;
        }

        for node in stale.iter().rev() {
            base = WorldCache {
                matrix: base.matrix * node.local_matrix(),
                rotation: base.rotation + node.local_rotation,
            };
            node.store_world(base);
        }
        Ok(base)
    }

    pub fn get_world_matrix(&self, entity: EntityId) -> Result<Affine2> {
        Ok(self.world_cache(entity)?.matrix)
    }

    pub fn get_inv_world_matrix(&self, entity: EntityId) -> Result<Affine2> {
        Ok(self.world_cache(entity)?.matrix.inverse())
    }

    pub fn get_world_position(&self, entity: EntityId) -> Result<Vec2> {
        Ok(self.world_cache(entity)?.matrix.translation)
    }

    pub fn get_world_rotation(&self, entity: EntityId) -> Result<Angle> {
        let node = self.node(entity)?;
        // Position-only staleness leaves the cached rotation valid.
        if !node.dirty().rotation() {
            return Ok(node.world_cache().rotation);
        }
        Ok(self.world_cache(entity)?.rotation)
    }

    pub fn get_world_position_rotation(&self, entity: EntityId) -> Result<(Vec2, Angle)> {
        let cache = self.world_cache(entity)?;
        Ok((cache.matrix.translation, cache.rotation))
    }

    /// Enclosing grid and map of `entity`, memoized until its ancestor chain changes.
    pub fn resolve_grid_and_map(&self, entity: EntityId) -> Result<FrameRefs> {
        let node = self.node(entity)?;
        if let Some(refs) = node.cached_frame_refs() {
            return Ok(refs);
        }

        let mut unresolved: SmallVec<[(EntityId, &TransformNode); 16]> = SmallVec::new();
        unresolved.push((entity, node));
        let mut base = FrameRefs::default();
        let mut cursor = node.parent;
        while let Some(id) = cursor {
            let ancestor = self.node(id)?;
            if let Some(refs) = ancestor.cached_frame_refs() {
                base = refs;
                break;
            }
            unresolved.push((id, ancestor));
            cursor = ancestor.parent;
        }

        for (id, node) in unresolved.iter().rev() {
            if node.is_map() {
                base.map = Some(*id);
            }
            if node.is_grid() {
                base.grid = Some(*id);
            }
            node.set_frame_refs(base);
        }
        Ok(base)
    }

    /// Express a world position in the enclosing grid (or map) frame.
    fn project_into_frame(&self, world: Vec2, refs: FrameRefs) -> Result<CoordinateFrame> {
        match refs.grid.or(refs.map) {
            Some(frame) => {
                let local = self.get_inv_world_matrix(frame)?.transform_point2(world);
                Ok(CoordinateFrame::new(frame, local))
            }
            None => Ok(CoordinateFrame::nullspace(world)),
        }
    }

    /// Fast path check: local coordinates are already grid (or map) relative.
    fn parent_is_mover_frame(node: &TransformNode, parent: EntityId, refs: FrameRefs) -> bool {
        refs.grid == Some(parent)
            || (refs.grid.is_none() && refs.map == Some(parent))
            || node.is_grid()
            || node.is_map()
    }

    /// Coordinates of `entity` relative to its enclosing grid, or map when off-grid.
    pub fn get_mover_coordinates(&self, entity: EntityId) -> Result<CoordinateFrame> {
        let node = self.node(entity)?;
        let Some(parent) = node.parent else {
            return Ok(node.coordinates());
        };

        let refs = self.resolve_grid_and_map(entity)?;
        if Self::parent_is_mover_frame(node, parent, refs) {
            return Ok(node.coordinates());
        }

        let world = self.get_world_position(entity)?;
        self.project_into_frame(world, refs)
    }

    /// [`get_mover_coordinates`](Self::get_mover_coordinates) plus the world rotation.
    pub fn get_mover_coordinate_rotation(
        &self,
        entity: EntityId,
    ) -> Result<(CoordinateFrame, Angle)> {
        let node = self.node(entity)?;
        let Some(parent) = node.parent else {
            return Ok((node.coordinates(), node.local_rotation));
        };

        let refs = self.resolve_grid_and_map(entity)?;
        if Self::parent_is_mover_frame(node, parent, refs) {
            return Ok((node.coordinates(), self.get_world_rotation(entity)?));
        }

        let (world, rotation) = self.get_world_position_rotation(entity)?;
        Ok((self.project_into_frame(world, refs)?, rotation))
    }

    /// Re-express arbitrary coordinates relative to their frame's enclosing grid or map.
    pub fn to_mover_coordinates(&self, coordinates: CoordinateFrame) -> Result<CoordinateFrame> {
        let Some(parent) = coordinates.frame else {
            return Ok(coordinates);
        };

        let refs = self.resolve_grid_and_map(parent)?;
        if refs.grid == Some(parent) || refs.map == Some(parent) {
            return Ok(coordinates);
        }

        let world = self
            .get_world_matrix(parent)?
            .transform_point2(coordinates.position);
        self.project_into_frame(world, refs)
    }

    /// Grid tile under `entity`, or its floored world position when off-grid.
    pub fn tile_position(&self, entity: EntityId) -> Result<IVec2> {
        let refs = self.resolve_grid_and_map(entity)?;
        let grid = match refs.grid {
            Some(grid) if grid != entity => grid,
            _ => return Ok(self.get_world_position(entity)?.floor().as_ivec2()),
        };

        let info = self.grid_info(grid).unwrap_or(self.default_grid);
        let coordinates = self.get_mover_coordinates(entity)?;
        let local = if coordinates.frame == Some(grid) {
            coordinates.position
        } else {
            let world = self.get_world_position(entity)?;
            self.get_inv_world_matrix(grid)?.transform_point2(world)
        };
        Ok(info.tile_indices(local))
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    /// Reject parent links that would leave the tree invalid.
    fn validate_parent(&self, entity: EntityId, new_parent: Option<EntityId>) -> Result<()> {
        let node = self.node(entity)?;
        let Some(parent) = new_parent else {
            return Ok(());
        };

        let reason = if node.is_map() {
            "a map cannot have a parent"
        } else if parent == entity {
            "cannot parent an entity to itself"
        } else if !self.contains(parent) {
            "parent has no transform"
        } else if self.is_ancestor_of(entity, parent) {
            "parent is a descendant of the entity"
        } else {
            return Ok(());
        };
        Err(TransformError::invalid_parent(entity, new_parent, reason))
    }

    /// Mark stale world state on `root` and every descendant.
    ///
    /// `frames` also drops memoized grid/map refs; required whenever the ancestor chain changes.
    fn invalidate_subtree(&self, root: EntityId, own: Dirty, frames: bool) {
        let Some(node) = self.nodes.get(root) else {
            return;
        };
        node.mark_dirty(own);
        if frames {
            node.invalidate_frame_refs();
        }

        let flags = own.for_descendants();
        if flags.is_clean() && !frames {
            return;
        }

        let mut stack: SmallVec<[EntityId; 16]> = node.children.iter().copied().collect();
        while let Some(id) = stack.pop() {
            let Some(child) = self.nodes.get(id) else {
                continue;
            };
            // A fully stale node already has a fully stale subtree.
            if !frames && child.dirty() == Dirty::Both {
                continue;
            }
            child.mark_dirty(flags);
            if frames {
                child.invalidate_frame_refs();
            }
            stack.extend(child.children.iter().copied());
        }
    }

    /// Single write path for pose and parent. Caller validates the parent first.
    ///
    /// Returns false when nothing changed (no event is queued).
    fn commit_pose(
        &mut self,
        entity: EntityId,
        parent: Option<EntityId>,
        position: Vec2,
        rotation: Angle,
    ) -> Result<bool> {
        let node = self.node(entity)?;
        let old_coordinates = node.coordinates();
        let old_rotation = node.local_rotation;
        let old_parent = node.parent;
        let is_grid = node.is_grid();

        let parent_changed = old_parent != parent;
        let position_changed = node.local_position != position;
        let rotation_changed = node.local_rotation != rotation;
        if !(parent_changed || position_changed || rotation_changed) {
            return Ok(false);
        }

        if parent_changed {
            if let Some(old) = old_parent.and_then(|p| self.nodes.get_mut(p)) {
                old.remove_child(entity);
            }
            if let Some(new) = parent.and_then(|p| self.nodes.get_mut(p)) {
                new.add_child(entity);
            }
        }

        let node = self.node_mut(entity)?;
        node.parent = parent;
        node.local_position = position;
        node.local_rotation = rotation;

        let own = if parent_changed {
            Dirty::Both
        } else {
            Dirty::from_parts(position_changed, rotation_changed)
        };
        self.invalidate_subtree(entity, own, parent_changed);

        let new_coordinates = CoordinateFrame {
            frame: parent,
            position,
        };
        self.moves.enqueue(
            MoveEvent {
                entity,
                old_coordinates,
                new_coordinates,
                old_rotation,
                new_rotation: rotation,
            },
            is_grid,
        );
        Ok(true)
    }

    /// Local pose under `new_parent` that keeps the given world pose.
    fn local_pose_under(
        &self,
        new_parent: Option<EntityId>,
        world_position: Vec2,
        world_rotation: Angle,
    ) -> Result<(Vec2, Angle)> {
        match new_parent {
            Some(parent) => {
                let (matrix, parent_rotation) = {
                    let cache = self.world_cache(parent)?;
                    (cache.matrix, cache.rotation)
                };
                let local = matrix.inverse().transform_point2(world_position);
                Ok((local, (world_rotation - parent_rotation).reduced()))
            }
            None => Ok((world_position, world_rotation.reduced())),
        }
    }

    /// Re-link `entity` under `new_parent` (nullspace when `None`) at `local_position`.
    ///
    /// Fails with `InvalidParent` and changes nothing if the link would form a cycle.
    pub fn set_parent(
        &mut self,
        entity: EntityId,
        new_parent: Option<EntityId>,
        local_position: Vec2,
    ) -> Result<()> {
        self.validate_parent(entity, new_parent)?;

        let node = self.node_mut(entity)?;
        let rotation = node.local_rotation;
        let position = if node.parent == new_parent && node.anchored {
            trace!(?entity, "ignoring offset change on anchored entity");
            node.local_position
        } else {
            if node.anchored {
                node.anchored = false;
            }
            local_position
        };

        if self.commit_pose(entity, new_parent, position, rotation)? {
            trace!(?entity, parent = ?new_parent, "set parent");
        }
        Ok(())
    }

    pub fn set_coordinates(&mut self, entity: EntityId, coordinates: CoordinateFrame) -> Result<()> {
        self.set_parent(entity, coordinates.frame, coordinates.position)
    }

    /// Re-link `entity` under `new_parent` keeping its world position and rotation.
    pub fn set_parent_preserving_world(
        &mut self,
        entity: EntityId,
        new_parent: Option<EntityId>,
    ) -> Result<()> {
        self.validate_parent(entity, new_parent)?;

        let (world_position, world_rotation) = self.get_world_position_rotation(entity)?;
        let (position, mut rotation) =
            self.local_pose_under(new_parent, world_position, world_rotation)?;

        let node = self.node_mut(entity)?;
        if node.no_local_rotation {
            rotation = node.local_rotation;
        }
        if node.parent != new_parent {
            node.anchored = false;
        }

        self.commit_pose(entity, new_parent, position, rotation)?;
        debug!(?entity, parent = ?new_parent, "reparented preserving world pose");
        Ok(())
    }

    /// Move `entity` to nullspace at the origin.
    pub fn detach_to_nullspace(&mut self, entity: EntityId) -> Result<()> {
        let node = self.node_mut(entity)?;
        node.anchored = false;
        let rotation = node.local_rotation;
        self.commit_pose(entity, None, Vec2::ZERO, rotation)?;
        debug!(?entity, "detached to nullspace");
        Ok(())
    }

    /// Ignored for anchored entities.
    pub fn set_local_position(&mut self, entity: EntityId, position: Vec2) -> Result<()> {
        let node = self.node(entity)?;
        if node.anchored {
            trace!(?entity, "ignoring position write on anchored entity");
            return Ok(());
        }
        let (parent, rotation) = (node.parent, node.local_rotation);
        self.commit_pose(entity, parent, position, rotation)?;
        Ok(())
    }

    /// Ignored for entities with `no_local_rotation`.
    pub fn set_local_rotation(&mut self, entity: EntityId, rotation: Angle) -> Result<()> {
        let node = self.node(entity)?;
        if node.no_local_rotation {
            trace!(?entity, "ignoring rotation write on no-local-rotation entity");
            return Ok(());
        }
        let (parent, position) = (node.parent, node.local_position);
        self.commit_pose(entity, parent, position, rotation)?;
        Ok(())
    }

    /// Both writes in one move event; each half follows the single-field rules.
    pub fn set_local_position_rotation(
        &mut self,
        entity: EntityId,
        position: Vec2,
        rotation: Angle,
    ) -> Result<()> {
        let node = self.node(entity)?;
        let position = if node.anchored {
            node.local_position
        } else {
            position
        };
        let rotation = if node.no_local_rotation {
            node.local_rotation
        } else {
            rotation
        };
        let parent = node.parent;
        self.commit_pose(entity, parent, position, rotation)?;
        Ok(())
    }

    pub fn set_world_position(&mut self, entity: EntityId, world_position: Vec2) -> Result<()> {
        let local = match self.node(entity)?.parent {
            Some(parent) => self
                .get_inv_world_matrix(parent)?
                .transform_point2(world_position),
            None => world_position,
        };
        self.set_local_position(entity, local)
    }

    pub fn set_world_rotation(&mut self, entity: EntityId, world_rotation: Angle) -> Result<()> {
        let local = match self.node(entity)?.parent {
            Some(parent) => world_rotation - self.get_world_rotation(parent)?,
            None => world_rotation,
        };
        self.set_local_rotation(entity, local.reduced())
    }

    /// Pin `entity` to the centre of its tile. Returns false unless the direct parent is a grid.
    pub fn anchor(&mut self, entity: EntityId) -> Result<bool> {
        let node = self.node(entity)?;
        if node.anchored {
            return Ok(true);
        }
        let Some(parent) = node.parent else {
            return Ok(false);
        };
        let Some(info) = self.grid_info(parent) else {
            return Ok(false);
        };

        let snapped = info.snap_to_tile_center(node.local_position);
        let rotation = node.local_rotation;
        self.commit_pose(entity, Some(parent), snapped, rotation)?;
        self.node_mut(entity)?.anchored = true;
        Ok(true)
    }

    pub fn unanchor(&mut self, entity: EntityId) -> Result<()> {
        self.node_mut(entity)?.anchored = false;
        Ok(())
    }

    /// Enabling the flag also resets the local rotation to zero.
    pub fn set_no_local_rotation(&mut self, entity: EntityId, value: bool) -> Result<()> {
        let node = self.node_mut(entity)?;
        node.no_local_rotation = value;
        if value && node.local_rotation != Angle::ZERO {
            let (parent, position) = (node.parent, node.local_position);
            self.commit_pose(entity, parent, position, Angle::ZERO)?;
        }
        Ok(())
    }

    /// Drop the node of a deleted entity.
    ///
    /// Children move to the removed node's parent (nullspace if it had none),
    /// keeping their world pose. Anchoring on moved children is cleared.
    pub fn remove(&mut self, entity: EntityId) -> Result<()> {
        let node = self.node(entity)?;
        let new_parent = node.parent;
        let children: SmallVec<[EntityId; 8]> = node.children.iter().copied().collect();

        for child in children {
            let (world_position, world_rotation) = self.get_world_position_rotation(child)?;
            let (position, mut rotation) =
                self.local_pose_under(new_parent, world_position, world_rotation)?;

            let child_node = self.node_mut(child)?;
            child_node.anchored = false;
            if child_node.no_local_rotation {
                rotation = child_node.local_rotation;
            }
            self.commit_pose(child, new_parent, position, rotation)?;
        }

        if let Some(parent) = new_parent.and_then(|p| self.nodes.get_mut(p)) {
            parent.remove_child(entity);
        }
        self.nodes.remove(entity);
        debug!(?entity, "removed transform");
        Ok(())
    }

    /// Overwrite replicated fields as received from the authority.
    ///
    /// Creates the node if missing. `parent` must already be present.
    pub(crate) fn apply_state(
        &mut self,
        entity: EntityId,
        parent: Option<EntityId>,
        position: Vec2,
        rotation: Angle,
        anchored: bool,
        no_local_rotation: bool,
    ) -> Result<()> {
        if self.contains(entity) {
            self.validate_parent(entity, parent)?;
        } else if parent.is_some_and(|p| p == entity || !self.contains(p)) {
            return Err(TransformError::invalid_parent(
                entity,
                parent,
                "parent has no transform",
            ));
        } else {
            self.insert(entity);
        }

        self.commit_pose(entity, parent, position, rotation)?;

        let parent_is_grid = parent.is_some_and(|p| self.is_grid(p));
        if anchored && !parent_is_grid {
            warn!(?entity, "anchored state received for entity not parented to a grid");
        }
        let node = self.node_mut(entity)?;
        node.anchored = anchored && parent_is_grid;
        node.no_local_rotation = no_local_rotation;
        self.invalidate_subtree(entity, Dirty::Both, false);
        Ok(())
    }
}

impl Default for HierarchyIndex {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the ancestors of an entity, nearest first.
pub struct Ancestors<'a> {
    index: &'a HierarchyIndex,
    next: Option<EntityId>,
}

impl Iterator for Ancestors<'_> {
    type Item = EntityId;

    fn next(&mut self) -> Option<EntityId> {
        let current = self.next?;
        self.next = self.index.nodes.get(current).and_then(|n| n.parent);
        Some(current)
    }
}
