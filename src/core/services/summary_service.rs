//! Read-side aggregates over a ledger snapshot.
//!
//! Every function here is pure: it takes a slice of transactions and never
//! mutates or caches anything.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::domain::{Transaction, TransactionKind};

/// Inclusive calendar-date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Whether the transaction's date parses and falls in the window.
    /// Unparseable dates never match.
    pub fn contains_transaction(&self, transaction: &Transaction) -> bool {
        transaction
            .date()
            .map(|date| self.contains(date))
            .unwrap_or(false)
    }
}

/// Headline figures for a dashboard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LedgerSnapshot {
    pub balance: f64,
    pub total_income: f64,
    pub total_expense: f64,
    pub transaction_count: usize,
}

pub struct SummaryService;

impl SummaryService {
    /// Income minus expenses over every transaction.
    pub fn balance(transactions: &[Transaction]) -> f64 {
        transactions.iter().map(Transaction::signed_amount).sum()
    }

    /// Sum of amounts of `kind`, optionally restricted to `range`.
    pub fn total_by_kind(
        transactions: &[Transaction],
        kind: TransactionKind,
        range: Option<DateRange>,
    ) -> f64 {
        Self::matching(transactions, kind, range)
            .map(|txn| txn.amount)
            .sum()
    }

    /// Amount of `kind` per category, optionally restricted to `range`.
    ///
    /// Summing the values gives [`SummaryService::total_by_kind`] for the same
    /// arguments.
    pub fn category_totals(
        transactions: &[Transaction],
        kind: TransactionKind,
        range: Option<DateRange>,
    ) -> HashMap<String, f64> {
        let mut totals: HashMap<String, f64> = HashMap::new();
        for txn in Self::matching(transactions, kind, range) {
            *totals.entry(txn.category.clone()).or_insert(0.0) += txn.amount;
        }
        totals
    }

    /// Transactions of any kind whose date falls within `range`.
    pub fn transactions_in_range(
        transactions: &[Transaction],
        range: DateRange,
    ) -> Vec<&Transaction> {
        transactions
            .iter()
            .filter(|txn| range.contains_transaction(txn))
            .collect()
    }

    pub fn snapshot(transactions: &[Transaction]) -> LedgerSnapshot {
        LedgerSnapshot {
            balance: Self::balance(transactions),
            total_income: Self::total_by_kind(transactions, TransactionKind::Income, None),
            total_expense: Self::total_by_kind(transactions, TransactionKind::Expense, None),
            transaction_count: transactions.len(),
        }
    }

    fn matching(
        transactions: &[Transaction],
        kind: TransactionKind,
        range: Option<DateRange>,
    ) -> impl Iterator<Item = &Transaction> {
        transactions.iter().filter(move |txn| {
            txn.kind == kind
                && range
                    .map(|window| window.contains_transaction(txn))
                    .unwrap_or(true)
        })
    }
}
