//! Demo content for a first run.

use chrono::{Duration, NaiveDate};

use crate::{
    core::tracker::FinanceTracker,
    domain::{SplitStatus, TransactionKind},
};

/// What [`seed_if_empty`] inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub transactions: usize,
    pub groups: usize,
    pub expenses: usize,
}

const SAMPLE_TRANSACTIONS: &[(TransactionKind, f64, &str, &str, i64)] = &[
    (TransactionKind::Income, 50000.0, "Salary", "Monthly salary", 1),
    (TransactionKind::Expense, 2500.0, "Food & Dining", "Grocery shopping", 0),
    (TransactionKind::Expense, 350.0, "Travel", "Uber ride", 2),
    (TransactionKind::Expense, 799.0, "Subscriptions", "Netflix", 3),
    (TransactionKind::Income, 15000.0, "Freelance", "Freelance project", 4),
    (TransactionKind::Expense, 1200.0, "Shopping", "New headphones", 5),
    (TransactionKind::Expense, 4200.0, "Travel", "Bus pass", 6),
];

/// Seeds demo transactions and split groups when the respective collections
/// are empty. Dates are `today` minus a few days; group totals come from the
/// regular netting pass.
pub fn seed_if_empty(tracker: &mut FinanceTracker, today: NaiveDate) -> SeedReport {
    let mut report = SeedReport::default();

    if tracker.list_transactions().is_empty() {
        for &(kind, amount, category, description, days_ago) in SAMPLE_TRANSACTIONS {
            tracker.add_transaction(
                kind,
                amount,
                category,
                description,
                today - Duration::days(days_ago),
            );
            report.transactions += 1;
        }
    }

    if tracker.list_groups().is_empty() {
        let roommates = tracker.create_group("Roommates", ["You", "John", "Sarah", "Mike"]);
        let friends = tracker.create_group(
            "College Friends",
            ["You", "Alice", "Bob", "Charlie", "David", "Emma"],
        );
        report.groups = 2;

        tracker.add_expense(
            &roommates.id,
            "Dinner at Pizza Place",
            1500.0,
            "You",
            ["You", "John", "Sarah", "Mike"],
            today,
        );
        tracker.add_expense_with_status(
            &friends.id,
            "Movie Tickets",
            800.0,
            "You",
            ["You", "Alice", "Bob", "Charlie"],
            today - Duration::days(2),
            SplitStatus::Settled,
        );
        report.expenses = 2;
    }

    if report != SeedReport::default() {
        tracing::info!(
            transactions = report.transactions,
            groups = report.groups,
            expenses = report.expenses,
            "seeded sample data"
        );
    }
    report
}
