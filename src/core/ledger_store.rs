//! The persisted transaction collection.

use std::{collections::HashMap, sync::Arc};

use chrono::NaiveDate;

use crate::{
    core::{
        ids::{IdGenerator, UuidGenerator},
        services::{DateRange, LedgerSnapshot, SummaryService},
        time::{Clock, SystemClock},
    },
    domain::{
        common::{find_by_id, position_by_id},
        RecordId, Transaction, TransactionKind, TransactionPatch,
    },
    storage::{Persistence, TRANSACTIONS_KEY},
};

/// Owns the ledger's transactions, newest first.
///
/// Every mutation rewrites the whole collection through [`Persistence`]. A
/// failed write leaves the in-memory list authoritative for the rest of the
/// session; [`LedgerStore::is_persisted`] reports whether the last write landed.
pub struct LedgerStore {
    transactions: Vec<Transaction>,
    persistence: Arc<Persistence>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    persisted: bool,
}

impl LedgerStore {
    /// Loads the stored transactions using random ids and the system clock.
    pub fn load(persistence: Arc<Persistence>) -> Self {
        Self::load_with(persistence, Arc::new(UuidGenerator), Arc::new(SystemClock))
    }

    pub fn load_with(
        persistence: Arc<Persistence>,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let transactions: Vec<Transaction> = persistence.read_records(TRANSACTIONS_KEY);
        tracing::debug!(count = transactions.len(), "loaded transactions");
        Self {
            transactions,
            persistence,
            ids,
            clock,
            persisted: true,
        }
    }

    /// Transactions, most recently added first.
    pub fn list(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn get(&self, id: &RecordId) -> Option<&Transaction> {
        find_by_id(&self.transactions, id)
    }

    /// Records a new transaction at the head of the ledger.
    ///
    /// Inputs are stored as given; amount and date plausibility are the
    /// caller's concern.
    pub fn add(
        &mut self,
        kind: TransactionKind,
        amount: f64,
        category: impl Into<String>,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> Transaction {
        let transaction = Transaction::new(
            self.ids.next_id(),
            kind,
            amount,
            category,
            description,
            date,
            self.clock.now(),
        );
        tracing::debug!(id = %transaction.id, %kind, amount, "adding transaction");
        self.transactions.insert(0, transaction.clone());
        self.persist();
        transaction
    }

    /// Removes the transaction with `id` and hands it back for a later
    /// [`LedgerStore::restore`]. `None` when no record matches.
    pub fn delete(&mut self, id: &RecordId) -> Option<Transaction> {
        let position = position_by_id(&self.transactions, id)?;
        let removed = self.transactions.remove(position);
        tracing::debug!(%id, "deleted transaction");
        self.persist();
        Some(removed)
    }

    /// Re-inserts a previously held record at the head of the ledger.
    ///
    /// The original position is not recovered. Restoring the same record
    /// twice stores it twice.
    pub fn restore(&mut self, transaction: Transaction) {
        tracing::debug!(id = %transaction.id, "restoring transaction");
        self.transactions.insert(0, transaction);
        self.persist();
    }

    /// Applies `patch` to the matching record in place. Returns `false`, and
    /// changes nothing, when `id` is unknown.
    pub fn update(&mut self, id: &RecordId, patch: TransactionPatch) -> bool {
        let Some(position) = position_by_id(&self.transactions, id) else {
            tracing::debug!(%id, "update skipped; transaction not found");
            return false;
        };
        self.transactions[position].apply(patch);
        tracing::debug!(%id, "updated transaction");
        self.persist();
        true
    }

    pub fn balance(&self) -> f64 {
        SummaryService::balance(&self.transactions)
    }

    pub fn total_by_kind(&self, kind: TransactionKind, range: Option<DateRange>) -> f64 {
        SummaryService::total_by_kind(&self.transactions, kind, range)
    }

    pub fn category_totals(
        &self,
        kind: TransactionKind,
        range: Option<DateRange>,
    ) -> HashMap<String, f64> {
        SummaryService::category_totals(&self.transactions, kind, range)
    }

    pub fn transactions_in_range(&self, range: DateRange) -> Vec<&Transaction> {
        SummaryService::transactions_in_range(&self.transactions, range)
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        SummaryService::snapshot(&self.transactions)
    }

    /// Whether the most recent write reached the backend.
    pub fn is_persisted(&self) -> bool {
        self.persisted
    }

    fn persist(&mut self) {
        self.persisted = self
            .persistence
            .write_records(TRANSACTIONS_KEY, &self.transactions);
    }
}
