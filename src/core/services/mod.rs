pub mod netting_service;
pub mod summary_service;

pub use netting_service::{NettingReport, NettingService};
pub use summary_service::{DateRange, LedgerSnapshot, SummaryService};
