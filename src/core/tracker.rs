//! Facade the presentation layer talks to.

use std::{collections::HashMap, sync::Arc};

use chrono::{Duration, NaiveDate};

use crate::{
    config::{Config, ConfigManager},
    core::{
        ids::{IdGenerator, UuidGenerator},
        ledger_store::LedgerStore,
        sample_data,
        services::{DateRange, LedgerSnapshot, NettingReport},
        split_store::SplitStore,
        time::{Clock, SystemClock},
        undo::UndoBuffer,
    },
    domain::{
        RecordId, SplitExpense, SplitGroup, SplitStatus, Transaction, TransactionKind,
        TransactionPatch,
    },
    storage::{open_storage, Persistence},
};

const MAX_UNDO_WINDOW_SECS: u64 = 24 * 60 * 60;

/// Owns the ledger, the split data and the undo buffer.
///
/// All calls are synchronous and their effects are visible to the next read.
/// Nothing here returns an error: lookups that miss yield `None` or `false`,
/// and persistence failures are logged and absorbed by the stores.
pub struct FinanceTracker {
    ledger: LedgerStore,
    splits: SplitStore,
    undo: UndoBuffer,
    clock: Arc<dyn Clock>,
    durable: bool,
}

impl FinanceTracker {
    pub fn new(persistence: Persistence) -> Self {
        Self::with_services(persistence, Arc::new(UuidGenerator), Arc::new(SystemClock))
    }

    pub fn with_services(
        persistence: Persistence,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let durable = persistence.backend().is_durable();
        let persistence = Arc::new(persistence);
        Self {
            ledger: LedgerStore::load_with(persistence.clone(), ids.clone(), clock.clone()),
            splits: SplitStore::load_with(persistence, ids, clock.clone()),
            undo: UndoBuffer::default(),
            clock,
            durable,
        }
    }

    /// Opens the tracker described by `config`, storing data under the
    /// manager's base directory. Without a manager everything stays in memory.
    pub fn open(manager: Option<&ConfigManager>, config: &Config) -> Self {
        let data_dir = manager.map(|manager| manager.data_dir(config));
        let mut tracker = Self::new(Persistence::new(open_storage(data_dir)));
        let window_secs = config.undo_window_secs.min(MAX_UNDO_WINDOW_SECS);
        tracker.set_undo_window(Duration::seconds(window_secs as i64));
        if config.seed_sample_data {
            let today = tracker.clock.today();
            sample_data::seed_if_empty(&mut tracker, today);
        }
        tracker
    }

    /// Whether data survives a restart.
    pub fn is_durable(&self) -> bool {
        self.durable
    }

    pub fn ledger(&self) -> &LedgerStore {
        &self.ledger
    }

    pub fn splits(&self) -> &SplitStore {
        &self.splits
    }

    pub fn undo_buffer(&self) -> &UndoBuffer {
        &self.undo
    }

    pub fn set_undo_window(&mut self, window: Duration) {
        self.undo.set_window(window);
    }

    pub fn list_transactions(&self) -> &[Transaction] {
        self.ledger.list()
    }

    pub fn add_transaction(
        &mut self,
        kind: TransactionKind,
        amount: f64,
        category: impl Into<String>,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> Transaction {
        self.ledger.add(kind, amount, category, description, date)
    }

    /// Deletes a transaction and parks it in the undo buffer.
    pub fn delete_transaction(&mut self, id: &RecordId) -> Option<Transaction> {
        let removed = self.ledger.delete(id)?;
        self.undo.hold(removed.clone(), self.clock.now());
        Some(removed)
    }

    /// Restores a caller-held record. A matching undo entry is cancelled so
    /// its timer cannot fire afterwards.
    pub fn restore_transaction(&mut self, transaction: Transaction) {
        let held = self
            .undo
            .pending()
            .map(|entry| entry.transaction.id == transaction.id)
            .unwrap_or(false);
        if held {
            self.undo.cancel();
        }
        self.ledger.restore(transaction);
    }

    /// Restores the most recent deletion if its window is still open.
    pub fn undo_delete(&mut self) -> Option<Transaction> {
        self.undo.poll(self.clock.now());
        let transaction = self.undo.take()?;
        self.ledger.restore(transaction.clone());
        Some(transaction)
    }

    /// Expires the undo entry if its window has elapsed, returning it.
    pub fn poll_undo(&mut self) -> Option<Transaction> {
        self.undo.poll(self.clock.now())
    }

    pub fn update_transaction(&mut self, id: &RecordId, patch: TransactionPatch) -> bool {
        self.ledger.update(id, patch)
    }

    pub fn balance(&self) -> f64 {
        self.ledger.balance()
    }

    pub fn total_by_kind(&self, kind: TransactionKind, range: Option<DateRange>) -> f64 {
        self.ledger.total_by_kind(kind, range)
    }

    pub fn category_totals(
        &self,
        kind: TransactionKind,
        range: Option<DateRange>,
    ) -> HashMap<String, f64> {
        self.ledger.category_totals(kind, range)
    }

    pub fn transactions_in_range(&self, range: DateRange) -> Vec<&Transaction> {
        self.ledger.transactions_in_range(range)
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        self.ledger.snapshot()
    }

    pub fn list_groups(&self) -> &[SplitGroup] {
        self.splits.list_groups()
    }

    pub fn create_group<S: Into<String>>(
        &mut self,
        name: impl Into<String>,
        members: impl IntoIterator<Item = S>,
    ) -> SplitGroup {
        self.splits.create_group(name, members)
    }

    pub fn list_expenses(&self) -> &[SplitExpense] {
        self.splits.list_expenses()
    }

    #[allow(clippy::too_many_arguments)]
    pub fn add_expense<S: Into<String>>(
        &mut self,
        group_id: impl Into<RecordId>,
        description: impl Into<String>,
        amount: f64,
        paid_by: impl Into<String>,
        split_between: impl IntoIterator<Item = S>,
        date: NaiveDate,
    ) -> SplitExpense {
        self.splits
            .add_expense(group_id, description, amount, paid_by, split_between, date)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn add_expense_with_status<S: Into<String>>(
        &mut self,
        group_id: impl Into<RecordId>,
        description: impl Into<String>,
        amount: f64,
        paid_by: impl Into<String>,
        split_between: impl IntoIterator<Item = S>,
        date: NaiveDate,
        status: SplitStatus,
    ) -> SplitExpense {
        self.splits.add_expense_with_status(
            group_id,
            description,
            amount,
            paid_by,
            split_between,
            date,
            status,
        )
    }

    pub fn recompute_groups(&mut self) -> NettingReport {
        self.splits.recompute()
    }
}

impl Default for FinanceTracker {
    fn default() -> Self {
        Self::new(Persistence::in_memory())
    }
}
