//! Per-tick driver tying the hierarchy, move dispatch and tile detachment together.

use tracing::debug;

use crate::config::TransformConfig;
use crate::entity::{EntityId, EntityLifecycle};
use crate::error::Result;
use crate::event_subscriber::MoveSubscriber;
use crate::grid::TileChangedEvent;
use crate::hierarchy::HierarchyIndex;
use crate::lookup::SpatialLookup;
use crate::scheduler::{FlushReport, MoveEventScheduler, SubscriberId};
use crate::tile_detach::TileDetachResolver;

pub struct TransformSystem {
    config: TransformConfig,
    index: HierarchyIndex,
    scheduler: MoveEventScheduler,
    resolver: TileDetachResolver,
}

impl TransformSystem {
    pub fn new() -> Self {
        Self::with_config(TransformConfig::default())
    }

    pub fn with_config(config: TransformConfig) -> Self {
        Self {
            index: HierarchyIndex::with_config(&config),
            scheduler: MoveEventScheduler::new().with_reject_invalid(config.reject_invalid_moves),
            resolver: TileDetachResolver::new(),
            config,
        }
    }

    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    pub fn index(&self) -> &HierarchyIndex {
        &self.index
    }

    pub fn index_mut(&mut self) -> &mut HierarchyIndex {
        &mut self.index
    }

    pub fn scheduler(&self) -> &MoveEventScheduler {
        &self.scheduler
    }

    pub fn subscribe<S: MoveSubscriber + 'static>(&mut self, subscriber: S) -> SubscriberId {
        self.scheduler.subscribe(subscriber)
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.scheduler.unsubscribe(id)
    }

    /// Dispatch every move committed since the previous call. Call once per tick.
    pub fn update(&mut self, lifecycle: &dyn EntityLifecycle) -> FlushReport {
        self.scheduler.flush(&mut self.index, lifecycle)
    }

    pub fn handle_tile_changed(
        &mut self,
        event: &TileChangedEvent,
        lookup: &dyn SpatialLookup,
        lifecycle: &dyn EntityLifecycle,
    ) -> Result<usize> {
        self.resolver
            .handle_tile_changed(&mut self.index, lookup, lifecycle, event)
    }

    /// Drop the transform of a deleted entity. Entities without one are ignored.
    pub fn handle_entity_deleted(&mut self, entity: EntityId) -> Result<()> {
        if !self.index.contains(entity) {
            return Ok(());
        }
        self.index.remove(entity)?;
        debug!(?entity, "transform dropped with entity");
        Ok(())
    }
}

impl Default for TransformSystem {
    fn default() -> Self {
        Self::new()
    }
}
