//! Convenient re-exports of commonly used types.
//!
//! The prelude can be imported with:
//! ```
//! use archetype_xform::prelude::*;
//! ```

pub use crate::config::TransformConfig;
pub use crate::coordinates::CoordinateFrame;
pub use crate::entity::{EntityId, EntityLifecycle, EntityRegistry, NetEntity};
pub use crate::error::{Result, TransformError};
pub use crate::event::MoveEvent;
pub use crate::event_subscriber::{CallbackSubscriber, ChannelSubscriber, MoveSubscriber};
pub use crate::grid::{GridInfo, Tile, TileChangedEvent};
pub use crate::hierarchy::HierarchyIndex;
pub use crate::lookup::{BruteForceLookup, LookupFlags, SpatialLookup};
pub use crate::scheduler::{FlushReport, MoveEventScheduler};
pub use crate::serialization::{StateCodec, TransformState};
pub use crate::system::TransformSystem;
pub use crate::transform::Angle;
pub use glam::Vec2;
