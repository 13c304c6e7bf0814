//! # paperwork-signals
//!
//! Typed publish/subscribe for the paperwork runtime. A [`Signal`] has one
//! owner that sends and any number of named receivers. The theme runtime uses
//! it to tell mounted forms that new style variables were published, and form
//! sessions use it to announce structural changes.
//!
//! ## Usage
//!
//! ```
//! use paperwork_signals::Signal;
//! use std::sync::Arc;
//!
//! struct Published(u64);
//!
//! let signal: Signal<Published> = Signal::new();
//! signal.connect("renderer", Arc::new(|p: &Published| {
//!     println!("re-render at revision {}", p.0);
//! }));
//!
//! assert_eq!(signal.send(&Published(1)), 1);
//! ```

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// The type signature for a signal receiver callback.
///
/// Receivers must be `Send + Sync` so that a signal can be shared by handles
/// held in different places.
pub type SignalReceiver<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// A signal that can be connected to and dispatched.
///
/// Receivers are called in the order they were connected.
pub struct Signal<T: 'static> {
    receivers: RwLock<Vec<(String, SignalReceiver<T>)>>,
}

impl<T: 'static> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("receivers", &self.receiver_ids())
            .finish()
    }
}

impl<T: 'static> Signal<T> {
    /// Creates a new signal with no connected receivers.
    pub fn new() -> Self {
        Self {
            receivers: RwLock::new(Vec::new()),
        }
    }

    /// Connects a receiver to this signal.
    ///
    /// If a receiver with the same id is already connected it is replaced and
    /// keeps its position.
    pub fn connect(&self, receiver_id: impl Into<String>, callback: SignalReceiver<T>) {
        let id = receiver_id.into();
        let mut receivers = self.receivers.write().unwrap_or_else(PoisonError::into_inner);

        if let Some(entry) = receivers.iter_mut().find(|(rid, _)| *rid == id) {
            entry.1 = callback;
        } else {
            tracing::trace!(receiver = %id, "signal receiver connected");
            receivers.push((id, callback));
        }
    }

    /// Disconnects the receiver with the given id.
    ///
    /// Returns `true` if a receiver was found and removed.
    pub fn disconnect(&self, receiver_id: &str) -> bool {
        let mut receivers = self.receivers.write().unwrap_or_else(PoisonError::into_inner);
        let len_before = receivers.len();
        receivers.retain(|(id, _)| id != receiver_id);
        receivers.len() < len_before
    }

    /// Sends the payload to all connected receivers.
    ///
    /// Returns the number of receivers notified. The receiver list is
    /// snapshotted first, so a receiver may connect or disconnect others
    /// without deadlocking.
    pub fn send(&self, payload: &T) -> usize {
        let snapshot: Vec<SignalReceiver<T>> = self
            .receivers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();
        for callback in &snapshot {
            callback(payload);
        }
        snapshot.len()
    }

    /// Returns the number of connected receivers.
    pub fn receiver_count(&self) -> usize {
        self.receivers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns the ids of connected receivers in call order.
    pub fn receiver_ids(&self) -> Vec<String> {
        self.receivers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(id, _)| id.clone())
            .collect()
    }
}
