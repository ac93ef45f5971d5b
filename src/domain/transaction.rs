//! Domain models for income and expense records.

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use crate::domain::common::*;

/// A single income or expense entry in the ledger.
///
/// `date` keeps the user-supplied calendar date as text so a record with a
/// damaged date still loads; ranged queries skip it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: RecordId,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: f64,
    pub category: String,
    pub description: String,
    pub date: String,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        id: impl Into<RecordId>,
        kind: TransactionKind,
        amount: f64,
        category: impl Into<String>,
        description: impl Into<String>,
        date: NaiveDate,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            amount,
            category: category.into(),
            description: description.into(),
            date: format_calendar_date(date),
            created_at,
        }
    }

    /// The calendar date, if the stored text parses.
    pub fn date(&self) -> Option<NaiveDate> {
        parse_calendar_date(&self.date)
    }

    /// Amount with the sign it contributes to the balance.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }

    /// Overwrites every field present in `patch`.
    pub fn apply(&mut self, patch: TransactionPatch) {
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(date) = patch.date {
            self.date = format_calendar_date(date);
        }
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

impl Displayable for Transaction {
    fn display_label(&self) -> String {
        format!(
            "{} {} {:.2} [{}] {}",
            self.date, self.kind, self.amount, self.category, self.description
        )
    }
}

/// Direction of money flow for a [`Transaction`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        };
        f.write_str(label)
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" | "in" => Ok(TransactionKind::Income),
            "expense" | "out" => Ok(TransactionKind::Expense),
            other => Err(format!("unknown transaction kind `{other}`")),
        }
    }
}

/// Partial update for a [`Transaction`]; `None` leaves a field untouched.
///
/// `id` and `created_at` are not patchable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionPatch {
    pub kind: Option<TransactionKind>,
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        self.kind.is_none()
            && self.amount.is_none()
            && self.category.is_none()
            && self.description.is_none()
            && self.date.is_none()
    }
}
