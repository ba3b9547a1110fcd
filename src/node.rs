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

//! Per-entity transform record.
//!
//! A [`TransformNode`] stores the authoritative local pose and the parent link.
//! World-space values and the enclosing grid/map are derived lazily by
//! [`HierarchyIndex`](crate::hierarchy::HierarchyIndex) and memoized here behind
//! `Cell`s, so queries only need a shared borrow of the index.

use std::cell::Cell;

use glam::{Affine2, Vec2};
use smallvec::SmallVec;

use crate::coordinates::CoordinateFrame;
use crate::entity::EntityId;
use crate::grid::GridInfo;
use crate::transform::{pose_matrix, Angle};

/// Which parts of the cached world transform are stale.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Dirty {
    #[default]
    None,
    Position,
    Rotation,
    Both,
}

impl Dirty {
    pub(crate) fn from_parts(position: bool, rotation: bool) -> Self {
        match (position, rotation) {
            (true, true) => Dirty::Both,
            (true, false) => Dirty::Position,
            (false, true) => Dirty::Rotation,
            (false, false) => Dirty::None,
        }
    }

    pub fn union(self, other: Dirty) -> Dirty {
        Self::from_parts(
            self.position() || other.position(),
            self.rotation() || other.rotation(),
        )
    }

    pub fn position(self) -> bool {
        matches!(self, Dirty::Position | Dirty::Both)
    }

    pub fn rotation(self) -> bool {
        matches!(self, Dirty::Rotation | Dirty::Both)
    }

    pub fn is_clean(self) -> bool {
        self == Dirty::None
    }

    /// What descendants of a node dirtied with `self` must be marked with.
    /// A parent's rotation moves every child, so it turns into `Both`.
    pub fn for_descendants(self) -> Dirty {
        if self.rotation() {
            Dirty::Both
        } else {
            self
        }
    }
}

/// Enclosing grid and map of a node, as resolved from its ancestor chain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameRefs {
    pub grid: Option<EntityId>,
    pub map: Option<EntityId>,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct WorldCache {
    pub matrix: Affine2,
    pub rotation: Angle,
}

impl WorldCache {
    pub const IDENTITY: WorldCache = WorldCache {
        matrix: Affine2::IDENTITY,
        rotation: Angle::ZERO,
    };
}

/// Transform record owned by the hierarchy index.
#[derive(Clone, Debug)]
pub struct TransformNode {
    pub(crate) local_position: Vec2,
    pub(crate) local_rotation: Angle,
    pub(crate) parent: Option<EntityId>,
    pub(crate) children: SmallVec<[EntityId; 4]>,
    pub(crate) grid: Option<GridInfo>,
    pub(crate) map: bool,
    pub(crate) anchored: bool,
    pub(crate) no_local_rotation: bool,

    /// `None` until resolved; cleared whenever the ancestor chain changes
    frame_refs: Cell<Option<FrameRefs>>,
    world: Cell<WorldCache>,
    dirty: Cell<Dirty>,
}

impl TransformNode {
    pub(crate) fn new(parent: Option<EntityId>, local_position: Vec2) -> Self {
        Self {
            local_position,
            local_rotation: Angle::ZERO,
            parent,
            children: SmallVec::new(),
            grid: None,
            map: false,
            anchored: false,
            no_local_rotation: false,
            frame_refs: Cell::new(None),
            world: Cell::new(WorldCache::IDENTITY),
            dirty: Cell::new(Dirty::Both),
        }
    }

    pub fn local_position(&self) -> Vec2 {
        self.local_position
    }

    pub fn local_rotation(&self) -> Angle {
        self.local_rotation
    }

    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    pub fn children(&self) -> &[EntityId] {
        &self.children
    }

    pub fn is_grid(&self) -> bool {
        self.grid.is_some()
    }

    pub fn is_map(&self) -> bool {
        self.map
    }

    pub fn grid_info(&self) -> Option<GridInfo> {
        self.grid
    }

    pub fn anchored(&self) -> bool {
        self.anchored
    }

    pub fn no_local_rotation(&self) -> bool {
        self.no_local_rotation
    }

    /// Local pose as coordinates in the parent's frame.
    pub fn coordinates(&self) -> CoordinateFrame {
        CoordinateFrame {
            frame: self.parent,
            position: self.local_position,
        }
    }

    pub fn local_matrix(&self) -> Affine2 {
        pose_matrix(self.local_position, self.local_rotation)
    }

    /// Enclosing grid/map if already resolved since the last structural change.
    pub fn cached_frame_refs(&self) -> Option<FrameRefs> {
        self.frame_refs.get()
    }

    pub fn dirty(&self) -> Dirty {
        self.dirty.get()
    }

    pub(crate) fn add_child(&mut self, child: EntityId) {
        if !self.children.contains(&child) {
            self.children.push(child);
        }
    }

    pub(crate) fn remove_child(&mut self, child: EntityId) -> bool {
        if let Some(pos) = self.children.iter().position(|&c| c == child) {
            self.children.remove(pos);
            true
        } else {
            false
        }
    }

    pub(crate) fn mark_dirty(&self, flags: Dirty) {
        self.dirty.set(self.dirty.get().union(flags));
    }

    pub(crate) fn world_cache(&self) -> WorldCache {
        self.world.get()
    }

    pub(crate) fn store_world(&self, cache: WorldCache) {
        self.world.set(cache);
        self.dirty.set(Dirty::None);
    }

    pub(crate) fn set_frame_refs(&self, refs: FrameRefs) {
        self.frame_refs.set(Some(refs));
    }

    pub(crate) fn invalidate_frame_refs(&self) {
        self.frame_refs.set(None);
    }
}
