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

//! Entity identifiers and the entity lifecycle service.

use std::fmt;

use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, Key, KeyData, SlotMap};

use crate::error::{Result, TransformError};

new_key_type! {
    /// Unique entity identifier backed by slotmap's generational keys.
    pub struct EntityId;
}

/// Wire identifier of an entity, as carried in replicated snapshots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NetEntity(pub u64);

impl NetEntity {
    /// Local entity this wire id refers to.
    pub fn entity(self) -> EntityId {
        EntityId::from(KeyData::from_ffi(self.0))
    }
}

impl From<EntityId> for NetEntity {
    fn from(entity: EntityId) -> Self {
        NetEntity(entity.data().as_ffi())
    }
}

impl fmt::Display for NetEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Entity lifecycle queries consumed by the transform subsystem.
pub trait EntityLifecycle {
    /// Entity no longer exists (or never did).
    fn is_deleted(&self, entity: EntityId) -> bool;

    /// Entity still exists but will be removed at the next deletion flush.
    fn is_queued_for_deletion(&self, entity: EntityId) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
struct EntityMeta {
    queued_for_deletion: bool,
}

/// Minimal entity registry with deferred deletion.
#[derive(Debug, Default)]
pub struct EntityRegistry {
    entities: SlotMap<EntityId, EntityMeta>,

    /// Deferred removal queue, drained by `flush_deletions`
    deletion_queue: Vec<EntityId>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new live entity.
    pub fn spawn(&mut self) -> EntityId {
        self.entities.insert(EntityMeta::default())
    }

    /// Remove an entity immediately.
    pub fn despawn(&mut self, entity: EntityId) -> Result<()> {
        self.entities
            .remove(entity)
            .map(|_| ())
            .ok_or(TransformError::UnknownEntity(entity))
    }

    /// Mark an entity for removal at the next `flush_deletions`.
    pub fn queue_deletion(&mut self, entity: EntityId) -> Result<()> {
        let meta = self
            .entities
            .get_mut(entity)
            .ok_or(TransformError::UnknownEntity(entity))?;

        if !meta.queued_for_deletion {
            meta.queued_for_deletion = true;
            self.deletion_queue.push(entity);
        }
        Ok(())
    }

    /// Remove every queued entity, returning the ids that were actually removed.
    pub fn flush_deletions(&mut self) -> Vec<EntityId> {
        let mut removed = Vec::with_capacity(self.deletion_queue.len());
        for entity in self.deletion_queue.drain(..) {
            if self.entities.remove(entity).is_some() {
                removed.push(entity);
            }
        }
        removed
    }

    pub fn is_alive(&self, entity: EntityId) -> bool {
        self.entities.contains_key(entity)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl EntityLifecycle for EntityRegistry {
    fn is_deleted(&self, entity: EntityId) -> bool {
        !self.entities.contains_key(entity)
    }

    fn is_queued_for_deletion(&self, entity: EntityId) -> bool {
        self.entities
            .get(entity)
            .is_some_and(|meta| meta.queued_for_deletion)
    }
}
