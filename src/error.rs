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

//! Error types

use std::fmt;

use crate::entity::{EntityId, NetEntity};

/// Transform subsystem error type
#[derive(Debug, Clone, PartialEq)]
pub enum TransformError {
    /// Entity has no transform node (never inserted, or already removed)
    UnknownEntity(EntityId),

    /// Parent change rejected; nothing was mutated
    InvalidParent {
        entity: EntityId,
        parent: Option<EntityId>,
        reason: &'static str,
    },

    /// Snapshot names a parent that has no local transform node yet
    UnresolvedParent(NetEntity),

    /// Snapshot or config serialization error
    SerializationError(String),

    /// Snapshot or config deserialization error
    DeserializationError(String),

    /// Invalid configuration value
    ConfigError(String),

    /// IO error (file operations, etc.)
    IoError(String),
}

impl TransformError {
    pub(crate) fn invalid_parent(
        entity: EntityId,
        parent: Option<EntityId>,
        reason: &'static str,
    ) -> Self {
        TransformError::InvalidParent {
            entity,
            parent,
            reason,
        }
    }

    /// True for errors the caller is expected to retry later.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, TransformError::UnresolvedParent(_))
    }
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformError::UnknownEntity(entity) => {
                write!(f, "Entity {entity:?} has no transform")
            }
            TransformError::InvalidParent {
                entity,
                parent,
                reason,
            } => write!(f, "Invalid parent {parent:?} for entity {entity:?}: {reason}"),
            TransformError::UnresolvedParent(net) => {
                write!(f, "Snapshot parent {net} is not known locally")
            }
            TransformError::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
            TransformError::DeserializationError(msg) => {
                write!(f, "Deserialization error: {msg}")
            }
            TransformError::ConfigError(msg) => write!(f, "Config error: {msg}"),
            TransformError::IoError(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for TransformError {}

impl From<std::io::Error> for TransformError {
    fn from(err: std::io::Error) -> Self {
        TransformError::IoError(err.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, TransformError>;
