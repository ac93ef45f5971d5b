pub mod common;
pub mod split;
pub mod transaction;

pub use common::{Displayable, Identifiable, RecordId};
pub use split::{SplitExpense, SplitGroup, SplitStatus, YOU};
pub use transaction::{Transaction, TransactionKind, TransactionPatch};
