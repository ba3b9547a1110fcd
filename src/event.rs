//! Move notifications and the two-class queue they wait in until the next flush.

use std::collections::VecDeque;

use crate::coordinates::CoordinateFrame;
use crate::entity::EntityId;
use crate::transform::Angle;

/// Raised once for every committed change to an entity's local pose or parent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveEvent {
    pub entity: EntityId,
    pub old_coordinates: CoordinateFrame,
    pub new_coordinates: CoordinateFrame,
    pub old_rotation: Angle,
    pub new_rotation: Angle,
}

impl MoveEvent {
    pub fn parent_changed(&self) -> bool {
        self.old_coordinates.frame != self.new_coordinates.frame
    }

    pub fn position_changed(&self) -> bool {
        self.old_coordinates.position != self.new_coordinates.position
    }

    pub fn rotation_changed(&self) -> bool {
        self.old_rotation != self.new_rotation
    }
}

/// Pending moves, split into grid moves and everything else.
#[derive(Debug, Default)]
pub struct MoveQueues {
    grid_moves: VecDeque<MoveEvent>,
    other_moves: VecDeque<MoveEvent>,
}

impl MoveQueues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            grid_moves: VecDeque::with_capacity(capacity),
            other_moves: VecDeque::with_capacity(capacity),
        }
    }

    /// Queue a move; `is_grid` selects the priority class.
    pub fn enqueue(&mut self, event: MoveEvent, is_grid: bool) {
        if is_grid {
            self.grid_moves.push_back(event);
        } else {
            self.other_moves.push_back(event);
        }
    }

    /// Drain every grid move, then every other move, each in FIFO order.
    pub fn drain_ordered(&mut self) -> impl Iterator<Item = MoveEvent> + '_ {
        self.grid_moves.drain(..).chain(self.other_moves.drain(..))
    }

    pub fn grid_len(&self) -> usize {
        self.grid_moves.len()
    }

    pub fn other_len(&self) -> usize {
        self.other_moves.len()
    }

    pub fn len(&self) -> usize {
        self.grid_moves.len() + self.other_moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grid_moves.is_empty() && self.other_moves.is_empty()
    }

    pub fn clear(&mut self) {
        self.grid_moves.clear();
        self.other_moves.clear();
    }
}
