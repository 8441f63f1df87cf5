//! Single-slot mailbox for cross-thread sensor ingestion.

use std::sync::{Mutex, PoisonError};

/// A last-value-wins, single-slot mailbox.
///
/// The one cross-thread boundary in the teleop core: a background
/// ingestion thread (the external force-sensor feed) publishes readings,
/// and the simulation thread takes at most one per tick. Publishing
/// replaces any unread value; there is no queue, and a reader only ever
/// observes the latest reading.
///
/// Intended for exactly one writer and one reader; nothing breaks with
/// more, but ordering guarantees stop meaning anything.
///
/// # Example
///
/// ```
/// use teleop_hand::LatestCell;
///
/// let cell = LatestCell::new();
/// cell.publish(1.5);
/// cell.publish(2.5); // replaces the unread 1.5
///
/// assert_eq!(cell.take(), Some(2.5));
/// assert_eq!(cell.take(), None);
/// ```
#[derive(Debug, Default)]
pub struct LatestCell<T> {
    slot: Mutex<Option<T>>,
}

impl<T> LatestCell<T> {
    /// Create an empty cell.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Publish a value, replacing any unread one.
    pub fn publish(&self, value: T) {
        *self.lock() = Some(value);
    }

    /// Take the latest value, leaving the cell empty.
    pub fn take(&self) -> Option<T> {
        self.lock().take()
    }

    /// Check whether an unread value is waiting.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.lock().is_some()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<T>> {
        // A poisoned slot only means the writer panicked mid-publish;
        // the stored Option is still coherent.
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The external force-sensor feed.
pub type ForceFeed = LatestCell<f64>;
