//! Move event subscribers

use crossbeam::channel::{Sender, TrySendError};
use tracing::{debug, warn};

use crate::event::MoveEvent;
use crate::hierarchy::HierarchyIndex;

/// Receives move events during a scheduler flush.
///
/// The index is read-only while events are dispatched; world queries on it
/// resolve lazily as usual.
pub trait MoveSubscriber {
    fn on_move(&mut self, event: &MoveEvent, index: &HierarchyIndex);

    /// Subscriber name for debugging
    fn name(&self) -> &str {
        "UnnamedSubscriber"
    }
}

/// Logs every dispatched move at debug level
pub struct LoggingSubscriber;

impl MoveSubscriber for LoggingSubscriber {
    fn on_move(&mut self, event: &MoveEvent, _index: &HierarchyIndex) {
        debug!(
            entity = ?event.entity,
            old = ?event.old_coordinates,
            new = ?event.new_coordinates,
            rotation = event.new_rotation.theta,
            "move"
        );
    }

    fn name(&self) -> &str {
        "LoggingSubscriber"
    }
}

type MoveCallback = Box<dyn FnMut(&MoveEvent, &HierarchyIndex)>;

/// Callback-based subscriber
pub struct CallbackSubscriber {
    callback: MoveCallback,
}

impl CallbackSubscriber {
    pub fn new<F>(callback: F) -> Self
    where
        F: FnMut(&MoveEvent, &HierarchyIndex) + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }
}

impl MoveSubscriber for CallbackSubscriber {
    fn on_move(&mut self, event: &MoveEvent, index: &HierarchyIndex) {
        (self.callback)(event, index);
    }

    fn name(&self) -> &str {
        "CallbackSubscriber"
    }
}

/// Forwards events to a channel so other threads can consume them.
pub struct ChannelSubscriber {
    sender: Sender<MoveEvent>,
    disconnected: bool,
}

impl ChannelSubscriber {
    pub fn new(sender: Sender<MoveEvent>) -> Self {
        Self {
            sender,
            disconnected: false,
        }
    }

    pub fn is_disconnected(&self) -> bool {
        self.disconnected
    }
}

impl MoveSubscriber for ChannelSubscriber {
    fn on_move(&mut self, event: &MoveEvent, _index: &HierarchyIndex) {
        if self.disconnected {
            return;
        }
        match self.sender.try_send(*event) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                warn!(entity = ?event.entity, "move channel full, dropping event");
            }
            Err(TrySendError::Disconnected(_)) => {
                warn!("move channel receiver dropped");
                self.disconnected = true;
            }
        }
    }

    fn name(&self) -> &str {
        "ChannelSubscriber"
    }
}
