//! Recomputes per-group debt totals from the split expense history.

use std::collections::HashMap;

use crate::domain::{RecordId, SplitExpense, SplitGroup, YOU};

/// Outcome of a netting pass, for logging and diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NettingReport {
    pub groups: usize,
    pub applied: usize,
    pub orphaned: usize,
}

pub struct NettingService;

impl NettingService {
    /// Full recompute of `total_owed` / `total_owes` for every group.
    ///
    /// Totals are reset first, so the result depends only on `expenses`.
    /// Expenses whose group is missing are skipped. The two totals are kept
    /// separate and never offset against each other.
    pub fn recompute(groups: &mut [SplitGroup], expenses: &[SplitExpense]) -> NettingReport {
        let mut index: HashMap<RecordId, usize> = HashMap::with_capacity(groups.len());
        for (position, group) in groups.iter_mut().enumerate() {
            group.reset_totals();
            index.entry(group.id.clone()).or_insert(position);
        }

        let mut report = NettingReport {
            groups: groups.len(),
            ..NettingReport::default()
        };
        for expense in expenses {
            let Some(&position) = index.get(&expense.group_id) else {
                report.orphaned += 1;
                continue;
            };
            Self::apply(&mut groups[position], expense);
            report.applied += 1;
        }
        report
    }

    fn apply(group: &mut SplitGroup, expense: &SplitExpense) {
        let share = expense.per_person_share();
        if expense.paid_by_you() {
            let others = expense
                .split_between
                .iter()
                .filter(|name| name.as_str() != YOU)
                .count();
            group.total_owed += others as f64 * share;
        } else if expense.includes_you() {
            group.total_owes += share;
        }
    }
}
