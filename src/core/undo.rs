//! Short-lived handle on the most recently deleted transaction.

use chrono::{DateTime, Duration, Utc};

use crate::domain::Transaction;

/// Default time a deletion stays undoable.
pub const DEFAULT_UNDO_WINDOW_SECS: i64 = 5;

/// A deleted transaction together with its expiry.
#[derive(Debug, Clone, PartialEq)]
pub struct UndoEntry {
    pub transaction: Transaction,
    pub deleted_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Holds at most one deleted transaction until it is restored, cancelled,
/// or its window elapses.
///
/// The buffer only tracks the expiry; it does not restore anything itself.
/// Time is passed in by the caller so the buffer stays synchronous.
#[derive(Debug, Clone)]
pub struct UndoBuffer {
    entry: Option<UndoEntry>,
    window: Duration,
}

impl UndoBuffer {
    pub fn new(window: Duration) -> Self {
        Self {
            entry: None,
            window,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn set_window(&mut self, window: Duration) {
        self.window = window;
    }

    /// Starts a fresh window for `transaction`. A previously held entry is
    /// dropped and returned.
    pub fn hold(&mut self, transaction: Transaction, now: DateTime<Utc>) -> Option<Transaction> {
        let displaced = self.entry.take().map(|entry| entry.transaction);
        self.entry = Some(UndoEntry {
            transaction,
            deleted_at: now,
            expires_at: now + self.window,
        });
        displaced
    }

    pub fn pending(&self) -> Option<&UndoEntry> {
        self.entry.as_ref()
    }

    /// Whether an entry is held and its window is still open at `now`.
    pub fn is_pending(&self, now: DateTime<Utc>) -> bool {
        self.entry
            .as_ref()
            .map(|entry| now < entry.expires_at)
            .unwrap_or(false)
    }

    /// Fires the timer: drops and returns the entry if it has expired.
    pub fn poll(&mut self, now: DateTime<Utc>) -> Option<Transaction> {
        let expired = self
            .entry
            .as_ref()
            .map(|entry| now >= entry.expires_at)
            .unwrap_or(false);
        if !expired {
            return None;
        }
        let entry = self.entry.take()?;
        tracing::debug!(id = %entry.transaction.id, "undo window elapsed");
        Some(entry.transaction)
    }

    /// Cancels the timer and yields the held transaction for restoring.
    pub fn take(&mut self) -> Option<Transaction> {
        self.entry.take().map(|entry| entry.transaction)
    }

    /// Discards the held transaction without restoring it.
    pub fn cancel(&mut self) {
        if let Some(entry) = self.entry.take() {
            tracing::debug!(id = %entry.transaction.id, "undo cancelled");
        }
    }
}

impl Default for UndoBuffer {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_UNDO_WINDOW_SECS))
    }
}
