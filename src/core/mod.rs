//! Stores, aggregates and the netting engine.

pub mod ids;
pub mod ledger_store;
pub mod sample_data;
pub mod services;
pub mod split_store;
pub mod time;
pub mod tracker;
pub mod undo;
pub mod utils;

pub use ledger_store::LedgerStore;
pub use split_store::SplitStore;
pub use tracker::FinanceTracker;
pub use undo::{UndoBuffer, UndoEntry};
