//! Shared-expense groups and the expenses recorded against them.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use crate::domain::common::*;

/// Participant name that stands for the owner of the ledger.
pub const YOU: &str = "You";

/// A named set of participants sharing expenses.
///
/// `total_owed` and `total_owes` are relative to [`YOU`] and are rewritten on
/// every netting pass; they are never set directly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SplitGroup {
    pub id: RecordId,
    pub name: String,
    pub members: Vec<String>,
    #[serde(default)]
    pub total_owed: f64,
    #[serde(default)]
    pub total_owes: f64,
    pub created_at: DateTime<Utc>,
}

impl SplitGroup {
    /// Builds a group with zeroed totals. Duplicate member names are dropped,
    /// keeping first occurrence order.
    pub fn new(
        id: impl Into<RecordId>,
        name: impl Into<String>,
        members: impl IntoIterator<Item = impl Into<String>>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            members: dedup_names(members),
            total_owed: 0.0,
            total_owes: 0.0,
            created_at,
        }
    }

    pub fn reset_totals(&mut self) {
        self.total_owed = 0.0;
        self.total_owes = 0.0;
    }

    /// Display-only signed figure: positive when others owe [`YOU`] more than
    /// [`YOU`] owes them. The stored totals stay separate.
    pub fn net_balance(&self) -> f64 {
        self.total_owed - self.total_owes
    }

    pub fn has_member(&self, name: &str) -> bool {
        self.members.iter().any(|member| member == name)
    }
}

impl Identifiable for SplitGroup {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

impl Displayable for SplitGroup {
    fn display_label(&self) -> String {
        format!("{} ({} members)", self.name, self.members.len())
    }
}

/// One shared bill inside a [`SplitGroup`].
///
/// `group_id` is a soft reference compared as text; an expense whose group
/// cannot be found is an orphan and is ignored by netting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SplitExpense {
    pub id: RecordId,
    pub group_id: RecordId,
    pub description: String,
    pub amount: f64,
    pub paid_by: String,
    pub split_between: Vec<String>,
    #[serde(default)]
    pub status: SplitStatus,
    pub date: String,
    pub created_at: DateTime<Utc>,
}

impl SplitExpense {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<RecordId>,
        group_id: impl Into<RecordId>,
        description: impl Into<String>,
        amount: f64,
        paid_by: impl Into<String>,
        split_between: impl IntoIterator<Item = impl Into<String>>,
        date: NaiveDate,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            group_id: group_id.into(),
            description: description.into(),
            amount,
            paid_by: paid_by.into(),
            split_between: dedup_names(split_between),
            status: SplitStatus::Pending,
            date: format_calendar_date(date),
            created_at,
        }
    }

    pub fn with_status(mut self, status: SplitStatus) -> Self {
        self.status = status;
        self
    }

    pub fn date(&self) -> Option<NaiveDate> {
        parse_calendar_date(&self.date)
    }

    /// Equal share of the amount per participant; zero when nobody is listed.
    pub fn per_person_share(&self) -> f64 {
        if self.split_between.is_empty() {
            0.0
        } else {
            self.amount / self.split_between.len() as f64
        }
    }

    pub fn paid_by_you(&self) -> bool {
        self.paid_by == YOU
    }

    pub fn includes_you(&self) -> bool {
        self.split_between.iter().any(|name| name == YOU)
    }
}

impl Identifiable for SplitExpense {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

impl Displayable for SplitExpense {
    fn display_label(&self) -> String {
        format!(
            "{} {:.2} paid by {} [{}]",
            self.description, self.amount, self.paid_by, self.status
        )
    }
}

/// Settlement state of a [`SplitExpense`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SplitStatus {
    #[default]
    Pending,
    Settled,
}

impl fmt::Display for SplitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SplitStatus::Pending => "pending",
            SplitStatus::Settled => "settled",
        };
        f.write_str(label)
    }
}

fn dedup_names(names: impl IntoIterator<Item = impl Into<String>>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::new();
    for name in names {
        let name = name.into();
        if !unique.contains(&name) {
            unique.push(name);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn expense(split_between: &[&str]) -> SplitExpense {
        SplitExpense::new(
            Uuid::from_u128(7),
            Uuid::from_u128(1),
            "Dinner",
            120.0,
            "A",
            split_between.iter().copied(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            Utc::now(),
        )
    }

    #[test]
    fn unknown_group_reference_still_decodes() {
        let raw = r#"{"id": "1714550400000-42", "groupId": "deleted-group",
            "description": "Cab", "amount": 30, "paidBy": "You",
            "splitBetween": ["You", "A"], "status": "pending", "date": "2024-05-01",
            "createdAt": "2024-05-01T09:00:00.000Z"}"#;
        let expense: SplitExpense = serde_json::from_str(raw).unwrap();
        assert_eq!(expense.group_id, RecordId::from("deleted-group"));
        assert_eq!(expense.id.as_str(), "1714550400000-42");
    }

    #[test]
    fn share_divides_evenly() {
        assert_eq!(expense(&["You", "A", "B"]).per_person_share(), 40.0);
    }

    #[test]
    fn share_is_zero_without_participants() {
        assert_eq!(expense(&[]).per_person_share(), 0.0);
    }

    #[test]
    fn members_are_an_ordered_set() {
        let group = SplitGroup::new(Uuid::nil(), "Trip", ["You", "A", "You", "B"], Utc::now());
        assert_eq!(group.members, vec!["You", "A", "B"]);
        assert!(group.has_member("B"));
    }

    #[test]
    fn status_uses_lowercase_on_the_wire() {
        let json = serde_json::to_value(expense(&["You"]).with_status(SplitStatus::Settled))
            .unwrap();
        assert_eq!(json["status"], "settled");
        assert_eq!(json["paidBy"], "A");
        assert_eq!(json["splitBetween"][0], "You");
    }

    #[test]
    fn net_balance_is_display_only() {
        let mut group = SplitGroup::new(Uuid::nil(), "Flat", ["You"], Utc::now());
        group.total_owed = 30.0;
        group.total_owes = 50.0;
        assert_eq!(group.net_balance(), -20.0);
        assert_eq!(group.total_owed, 30.0);
    }
}
