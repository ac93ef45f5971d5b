#![doc(test(attr(deny(warnings))))]

//! Pocket Ledger keeps a personal income/expense ledger and shared-expense
//! groups, persisted as JSON, and derives balances, category breakdowns and
//! per-group "owed to me" / "I owe" totals.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod storage;
pub mod utils;

pub use crate::core::{FinanceTracker, LedgerStore, SplitStore, UndoBuffer};
pub use crate::domain::{
    RecordId, SplitExpense, SplitGroup, SplitStatus, Transaction, TransactionKind, TransactionPatch,
    YOU,
};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Pocket Ledger tracing initialized.");
    });
}
