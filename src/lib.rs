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

//! Archetype Xform - lazily resolved 2D transform hierarchy
//!
//! Parent/child transforms with world state derived on demand, grid-first
//! move notifications, tile-removal detachment and snapshot replication.

pub mod config;
pub mod coordinates;
pub mod entity;
pub mod error;
pub mod event;
pub mod event_subscriber;
pub mod grid;
pub mod hierarchy;
pub mod lookup;
pub mod node;
pub mod prelude;
pub mod scheduler;
pub mod serialization;
pub mod system;
pub mod tile_detach;
pub mod transform;

pub use config::*;
pub use coordinates::*;
pub use entity::*;
pub use error::*;
pub use event::*;
pub use event_subscriber::*;
pub use grid::*;
pub use hierarchy::*;
pub use lookup::*;
pub use node::*;
pub use scheduler::*;
pub use serialization::*;
pub use system::*;
pub use tile_detach::*;
pub use transform::*;
