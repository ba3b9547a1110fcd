//! Coordinates expressed relative to a reference-frame entity.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::entity::EntityId;

/// A position in the local space of `frame`, or in nullspace when `frame` is `None`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoordinateFrame {
    pub frame: Option<EntityId>,
    pub position: Vec2,
}

impl CoordinateFrame {
    pub const NULLSPACE: CoordinateFrame = CoordinateFrame {
        frame: None,
        position: Vec2::ZERO,
    };

    pub fn new(frame: EntityId, position: Vec2) -> Self {
        Self {
            frame: Some(frame),
            position,
        }
    }

    pub fn nullspace(position: Vec2) -> Self {
        Self {
            frame: None,
            position,
        }
    }

    pub fn is_nullspace(&self) -> bool {
        self.frame.is_none()
    }

    /// Both components are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.position.is_finite()
    }

    pub fn with_position(&self, position: Vec2) -> Self {
        Self {
            frame: self.frame,
            position,
        }
    }

    pub fn offset(&self, delta: Vec2) -> Self {
        self.with_position(self.position + delta)
    }
}

impl Default for CoordinateFrame {
    fn default() -> Self {
        Self::NULLSPACE
    }
}
