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

//! Per-tick move dispatch.
//!
//! Moves queued by the hierarchy are drained once per simulation step:
//! every grid move first, then every other move, each queue in FIFO order.
//! Events for entities deleted since the move, or whose destination frame
//! is no longer valid, are dropped without being dispatched.

#[cfg(feature = "profiling")]
use tracing::info_span;
use tracing::trace;

use crate::entity::EntityLifecycle;
use crate::event::MoveEvent;
use crate::event_subscriber::MoveSubscriber;
use crate::hierarchy::HierarchyIndex;

/// Handle returned by [`MoveEventScheduler::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

/// Outcome of a single flush
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FlushReport {
    pub dispatched: usize,
    pub skipped_deleted: usize,
    pub skipped_invalid: usize,
}

impl FlushReport {
    pub fn total(&self) -> usize {
        self.dispatched + self.skipped_deleted + self.skipped_invalid
    }
}

enum Verdict {
    Dispatch,
    Deleted,
    Invalid,
}

pub struct MoveEventScheduler {
    subscribers: Vec<(SubscriberId, Box<dyn MoveSubscriber>)>,
    next_id: u64,
    reject_invalid: bool,
}

impl MoveEventScheduler {
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
            next_id: 0,
            reject_invalid: true,
        }
    }

    /// Keep dispatching moves whose destination is non-finite or dangling.
    pub fn with_reject_invalid(mut self, reject: bool) -> Self {
        self.reject_invalid = reject;
        self
    }

    /// Register a subscriber. Dispatch follows registration order.
    pub fn subscribe<S: MoveSubscriber + 'static>(&mut self, subscriber: S) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Returns false if `id` was not registered.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn subscriber_names(&self) -> impl Iterator<Item = &str> {
        self.subscribers.iter().map(|(_, s)| s.name())
    }

    fn classify(
        &self,
        event: &MoveEvent,
        index: &HierarchyIndex,
        lifecycle: &dyn EntityLifecycle,
    ) -> Verdict {
        if lifecycle.is_deleted(event.entity) || !index.contains(event.entity) {
            return Verdict::Deleted;
        }
        if !self.reject_invalid {
            return Verdict::Dispatch;
        }

        let coordinates = &event.new_coordinates;
        let frame_ok = match coordinates.frame {
            Some(frame) => !lifecycle.is_deleted(frame) && index.contains(frame),
            None => true,
        };
        if coordinates.is_finite() && frame_ok {
            Verdict::Dispatch
        } else {
            Verdict::Invalid
        }
    }

    /// Drain the index's pending moves and dispatch them.
    ///
    /// Both queues are empty afterwards. Subscribers only see the index read-only.
    pub fn flush(
        &mut self,
        index: &mut HierarchyIndex,
        lifecycle: &dyn EntityLifecycle,
    ) -> FlushReport {
        let mut batch = index.take_moves();
        let index: &HierarchyIndex = index;
        let mut report = FlushReport::default();

        #[cfg(feature = "profiling")]
        let span = info_span!(
            "scheduler.flush",
            grid_moves = batch.grid_len(),
            other_moves = batch.other_len()
        );
        #[cfg(feature = "profiling")]
        let _span_guard = span.enter();

        for event in batch.drain_ordered() {
            match self.classify(&event, index, lifecycle) {
                Verdict::Deleted => {
                    trace!(entity = ?event.entity, "skipping move of deleted entity");
                    report.skipped_deleted += 1;
                }
                Verdict::Invalid => {
                    trace!(entity = ?event.entity, new = ?event.new_coordinates, "skipping invalid move");
                    report.skipped_invalid += 1;
                }
                Verdict::Dispatch => {
                    for (_, subscriber) in self.subscribers.iter_mut() {
                        subscriber.on_move(&event, index);
                    }
                    report.dispatched += 1;
                }
            }
        }
        report
    }
}

impl Default for MoveEventScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EntityId, EntityRegistry};
    use crate::event_subscriber::CallbackSubscriber;
    use crate::grid::GridInfo;
    use glam::Vec2;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder(
        scheduler: &mut MoveEventScheduler,
    ) -> (SubscriberId, Rc<RefCell<Vec<EntityId>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        let id = scheduler.subscribe(CallbackSubscriber::new(move |ev, _| {
            sink.borrow_mut().push(ev.entity)
        }));
        (id, log)
    }

    #[test]
    fn test_grid_moves_dispatch_first() {
        let mut registry = EntityRegistry::new();
        let mut index = HierarchyIndex::new();
        let mut scheduler = MoveEventScheduler::new();
        let (_, log) = recorder(&mut scheduler);

        let map = registry.spawn();
        index.add_map(map).unwrap();
        let item = registry.spawn();
        index.insert_with_parent(item, map, Vec2::ZERO).unwrap();
        let grid = registry.spawn();
        index.insert_with_parent(grid, map, Vec2::ZERO).unwrap();
        index.add_grid(grid, GridInfo::default()).unwrap();
        scheduler.flush(&mut index, &registry);
        log.borrow_mut().clear();

        index.set_local_position(item, Vec2::ONE).unwrap();
        index.set_local_position(grid, Vec2::ONE).unwrap();
        index.set_local_position(item, Vec2::X).unwrap();

        let report = scheduler.flush(&mut index, &registry);
        assert_eq!(report.dispatched, 3);
        assert_eq!(*log.borrow(), vec![grid, item, item]);
        assert!(index.pending_moves().is_empty());

        let report = scheduler.flush(&mut index, &registry);
        assert_eq!(report.total(), 0);
    }

    #[test]
    fn test_deleted_entity_skipped() {
        let mut registry = EntityRegistry::new();
        let mut index = HierarchyIndex::new();
        let mut scheduler = MoveEventScheduler::new();
        let (_, log) = recorder(&mut scheduler);

        let a = registry.spawn();
        index.insert(a);
        index.set_local_position(a, Vec2::ONE).unwrap();
        registry.despawn(a).unwrap();

        let report = scheduler.flush(&mut index, &registry);
        assert_eq!(report.skipped_deleted, 1);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_non_finite_skipped_unless_disabled() {
        let mut registry = EntityRegistry::new();
        let mut index = HierarchyIndex::new();
        let a = registry.spawn();
        index.insert(a);

        let mut strict = MoveEventScheduler::new();
        index.set_local_position(a, Vec2::new(f32::NAN, 0.0)).unwrap();
        assert_eq!(strict.flush(&mut index, &registry).skipped_invalid, 1);

        let mut lenient = MoveEventScheduler::new().with_reject_invalid(false);
        index.set_local_position(a, Vec2::new(f32::INFINITY, 0.0)).unwrap();
        assert_eq!(lenient.flush(&mut index, &registry).dispatched, 1);
    }

    #[test]
    fn test_unsubscribe() {
        let mut registry = EntityRegistry::new();
        let mut index = HierarchyIndex::new();
        let mut scheduler = MoveEventScheduler::new();
        let (id, log) = recorder(&mut scheduler);
        assert!(scheduler.unsubscribe(id));
        assert!(!scheduler.unsubscribe(id));

        let a = registry.spawn();
        index.insert(a);
        index.set_local_position(a, Vec2::ONE).unwrap();
        assert_eq!(scheduler.flush(&mut index, &registry).dispatched, 1);
        assert!(log.borrow().is_empty());
    }
}
