//! Snapshot codec for replicating transforms.
//!
//! A [`TransformState`] carries the authoritative fields of one node: parent,
//! local offset, local rotation and the two behaviour flags. World caches and
//! frame refs are never sent; the receiver derives them lazily after applying.

use ahash::AHashMap;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use speedy::{Readable, Writable};
use tracing::{trace, warn};

use crate::entity::{EntityId, NetEntity};
use crate::error::{Result, TransformError};
use crate::hierarchy::HierarchyIndex;
use crate::transform::Angle;

/// Replicated state of a single transform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformState {
    pub parent: Option<NetEntity>,
    pub local_position: Vec2,
    pub local_rotation: Angle,
    pub no_local_rotation: bool,
    pub anchored: bool,
}

const FLAG_NO_LOCAL_ROTATION: u8 = 0b01;
const FLAG_ANCHORED: u8 = 0b10;

/// Compact binary layout of [`TransformState`]
#[derive(Debug, Readable, Writable)]
struct WireState {
    parent: Option<u64>,
    x: f32,
    y: f32,
    theta: f32,
    flags: u8,
}

impl TransformState {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| TransformError::SerializationError(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| TransformError::DeserializationError(e.to_string()))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut flags = 0;
        if self.no_local_rotation {
            flags |= FLAG_NO_LOCAL_ROTATION;
        }
        if self.anchored {
            flags |= FLAG_ANCHORED;
        }
        let wire = WireState {
            parent: self.parent.map(|p| p.0),
            x: self.local_position.x,
            y: self.local_position.y,
            theta: self.local_rotation.theta,
            flags,
        };
        wire.write_to_vec()
            .map_err(|e| TransformError::SerializationError(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let wire = WireState::read_from_buffer(bytes)
            .map_err(|e| TransformError::DeserializationError(e.to_string()))?;
        Ok(Self {
            parent: wire.parent.map(NetEntity),
            local_position: Vec2::new(wire.x, wire.y),
            local_rotation: Angle::new(wire.theta),
            no_local_rotation: wire.flags & FLAG_NO_LOCAL_ROTATION != 0,
            anchored: wire.flags & FLAG_ANCHORED != 0,
        })
    }
}

/// Builds outgoing snapshots and applies incoming ones.
pub struct StateCodec;

impl StateCodec {
    /// Project a node onto its replicated fields.
    pub fn encode(index: &HierarchyIndex, entity: EntityId) -> Result<TransformState> {
        let node = index.node(entity)?;
        Ok(TransformState {
            parent: node.parent().map(NetEntity::from),
            local_position: node.local_position(),
            local_rotation: node.local_rotation(),
            no_local_rotation: node.no_local_rotation(),
            anchored: node.anchored(),
        })
    }

    /// Snapshot every node in the index.
    pub fn encode_all(index: &HierarchyIndex) -> Result<Vec<(NetEntity, TransformState)>> {
        index
            .iter()
            .map(|(entity, _)| {
                Self::encode(index, entity).map(|state| (NetEntity::from(entity), state))
            })
            .collect()
    }

    /// Overwrite `entity`'s transform with a received state.
    ///
    /// Fails with [`TransformError::UnresolvedParent`] while the parent is not
    /// known locally; nothing is written in that case and the caller may retry
    /// once the parent arrives. Applying queues a move like any other write.
    pub fn decode_apply(
        index: &mut HierarchyIndex,
        entity: EntityId,
        state: &TransformState,
    ) -> Result<()> {
        let parent = match state.parent {
            Some(net) => {
                let local = net.entity();
                if !index.contains(local) {
                    trace!(?entity, parent = %net, "snapshot parent not yet known");
                    return Err(TransformError::UnresolvedParent(net));
                }
                Some(local)
            }
            None => None,
        };

        index.apply_state(
            entity,
            parent,
            state.local_position,
            state.local_rotation,
            state.anchored,
            state.no_local_rotation,
        )
    }
}

/// Holds snapshots whose parent has not arrived yet.
///
/// States are parked under the missing parent and applied as soon as that
/// parent's own state is applied through the buffer.
#[derive(Debug, Default)]
pub struct SnapshotBuffer {
    waiting: AHashMap<NetEntity, Vec<(EntityId, TransformState)>>,
}

impl SnapshotBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `state`, parking it if its parent is unknown.
    ///
    /// Returns how many states were applied, including any parked children
    /// unblocked by this one.
    ///
    /// A state rejected outright does not stop the others: every unblocked
    /// child is still applied, and the first rejection is returned afterwards.
    pub fn apply(
        &mut self,
        index: &mut HierarchyIndex,
        entity: EntityId,
        state: TransformState,
    ) -> Result<usize> {
        let mut applied = 0;
        let mut first_error = None;
        let mut ready = vec![(entity, state)];
        while let Some((entity, state)) = ready.pop() {
            match StateCodec::decode_apply(index, entity, &state) {
                Ok(()) => {
                    applied += 1;
                    if let Some(children) = self.waiting.remove(&NetEntity::from(entity)) {
                        ready.extend(children);
                    }
                }
                Err(TransformError::UnresolvedParent(parent)) => {
                    self.waiting.entry(parent).or_default().push((entity, state));
                }
                Err(e) => {
                    warn!(?entity, error = %e, "snapshot rejected");
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(applied),
        }
    }

    /// Number of parked states
    pub fn pending(&self) -> usize {
        self.waiting.values().map(Vec::len).sum()
    }

    /// Drop parked states whose parent will never arrive.
    pub fn discard_waiting_on(&mut self, parent: NetEntity) -> usize {
        self.waiting.remove(&parent).map_or(0, |v| v.len())
    }

    pub fn clear(&mut self) {
        self.waiting.clear();
    }
}
