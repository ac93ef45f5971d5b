//! Shared-expense groups and their bills.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::{
    core::{
        ids::{IdGenerator, UuidGenerator},
        services::{NettingReport, NettingService},
        time::{Clock, SystemClock},
    },
    domain::{common::find_by_id, RecordId, SplitExpense, SplitGroup, SplitStatus},
    storage::{Persistence, SPLIT_EXPENSES_KEY, SPLIT_GROUPS_KEY},
};

/// Owns split groups and split expenses, both newest first.
///
/// The store is append-only. Any mutation is followed by a full netting pass
/// that rewrites every group's totals and persists the groups.
pub struct SplitStore {
    groups: Vec<SplitGroup>,
    expenses: Vec<SplitExpense>,
    persistence: Arc<Persistence>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    persisted: bool,
}

impl SplitStore {
    pub fn load(persistence: Arc<Persistence>) -> Self {
        Self::load_with(persistence, Arc::new(UuidGenerator), Arc::new(SystemClock))
    }

    pub fn load_with(
        persistence: Arc<Persistence>,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let groups: Vec<SplitGroup> = persistence.read_records(SPLIT_GROUPS_KEY);
        let expenses: Vec<SplitExpense> = persistence.read_records(SPLIT_EXPENSES_KEY);
        tracing::debug!(
            groups = groups.len(),
            expenses = expenses.len(),
            "loaded split data"
        );
        Self {
            groups,
            expenses,
            persistence,
            ids,
            clock,
            persisted: true,
        }
    }

    pub fn list_groups(&self) -> &[SplitGroup] {
        &self.groups
    }

    pub fn list_expenses(&self) -> &[SplitExpense] {
        &self.expenses
    }

    pub fn group(&self, id: &RecordId) -> Option<&SplitGroup> {
        find_by_id(&self.groups, id)
    }

    pub fn expenses_for_group(&self, group_id: &RecordId) -> Vec<&SplitExpense> {
        self.expenses
            .iter()
            .filter(|expense| &expense.group_id == group_id)
            .collect()
    }

    /// Creates a group with zeroed totals, then recomputes all groups.
    pub fn create_group<S: Into<String>>(
        &mut self,
        name: impl Into<String>,
        members: impl IntoIterator<Item = S>,
    ) -> SplitGroup {
        let group = SplitGroup::new(self.ids.next_id(), name, members, self.clock.now());
        tracing::debug!(id = %group.id, name = %group.name, "creating split group");
        self.groups.insert(0, group);
        self.recompute();
        self.groups[0].clone()
    }

    /// Records a pending expense and recomputes all groups.
    #[allow(clippy::too_many_arguments)]
    pub fn add_expense<S: Into<String>>(
        &mut self,
        group_id: impl Into<RecordId>,
        description: impl Into<String>,
        amount: f64,
        paid_by: impl Into<String>,
        split_between: impl IntoIterator<Item = S>,
        date: NaiveDate,
    ) -> SplitExpense {
        self.add_expense_with_status(
            group_id,
            description,
            amount,
            paid_by,
            split_between,
            date,
            SplitStatus::Pending,
        )
    }

    /// Like [`SplitStore::add_expense`] with an explicit settlement status.
    #[allow(clippy::too_many_arguments)]
    pub fn add_expense_with_status<S: Into<String>>(
        &mut self,
        group_id: impl Into<RecordId>,
        description: impl Into<String>,
        amount: f64,
        paid_by: impl Into<String>,
        split_between: impl IntoIterator<Item = S>,
        date: NaiveDate,
        status: SplitStatus,
    ) -> SplitExpense {
        let expense = SplitExpense::new(
            self.ids.next_id(),
            group_id,
            description,
            amount,
            paid_by,
            split_between,
            date,
            self.clock.now(),
        )
        .with_status(status);
        tracing::debug!(
            id = %expense.id,
            group_id = %expense.group_id,
            amount,
            "adding split expense"
        );
        self.expenses.insert(0, expense.clone());
        let expenses_saved = self
            .persistence
            .write_records(SPLIT_EXPENSES_KEY, &self.expenses);
        self.recompute();
        self.persisted &= expenses_saved;
        expense
    }

    /// Full netting pass over every group, followed by a write of the groups.
    pub fn recompute(&mut self) -> NettingReport {
        let report = NettingService::recompute(&mut self.groups, &self.expenses);
        if report.orphaned > 0 {
            tracing::debug!(orphaned = report.orphaned, "skipped orphan split expenses");
        }
        self.persisted = self
            .persistence
            .write_records(SPLIT_GROUPS_KEY, &self.groups);
        report
    }

    /// Whether the writes of the most recent mutation all reached the backend.
    pub fn is_persisted(&self) -> bool {
        self.persisted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ids::SequentialIds;
    use crate::storage::{StorageBackend, SPLIT_EXPENSES_KEY};

    fn store() -> SplitStore {
        SplitStore::load_with(
            Arc::new(Persistence::in_memory()),
            Arc::new(SequentialIds::new()),
            Arc::new(SystemClock),
        )
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, 15).unwrap()
    }

    #[test]
    fn new_group_starts_at_zero() {
        let mut store = store();
        let group = store.create_group("Roommates", ["You", "John", "Sarah"]);
        assert_eq!(group.total_owed, 0.0);
        assert_eq!(group.total_owes, 0.0);
        assert_eq!(store.list_groups().len(), 1);
    }

    #[test]
    fn groups_and_expenses_are_newest_first() {
        let mut store = store();
        let first = store.create_group("One", ["You"]);
        let second = store.create_group("Two", ["You"]);
        assert_eq!(store.list_groups()[0].id, second.id);
        assert_eq!(store.list_groups()[1].id, first.id);

        let a = store.add_expense(&first.id, "a", 10.0, "You", ["You"], today());
        let b = store.add_expense(&first.id, "b", 10.0, "You", ["You"], today());
        assert_eq!(store.list_expenses()[0].id, b.id);
        assert_eq!(store.list_expenses()[1].id, a.id);
    }

    #[test]
    fn adding_an_expense_recomputes_its_group() {
        let mut store = store();
        let group = store.create_group("G", ["You", "A", "B", "C"]);
        let expense = store.add_expense(&group.id, "Dinner", 300.0, "You", ["You", "A", "B", "C"], today());

        assert_eq!(expense.status, SplitStatus::Pending);
        let stored = store.group(&group.id).expect("group exists");
        assert_eq!(stored.total_owed, 225.0);
        assert_eq!(stored.total_owes, 0.0);
    }

    #[test]
    fn orphan_expense_is_stored_but_ignored() {
        let mut store = store();
        let group = store.create_group("G", ["You", "A"]);
        store.add_expense("deleted-group", "Ghost", 100.0, "You", ["You", "A"], today());

        assert_eq!(store.list_expenses().len(), 1);
        assert_eq!(store.group(&group.id).map(|g| g.total_owed), Some(0.0));
        assert_eq!(store.recompute().orphaned, 1);
    }

    #[test]
    fn expenses_for_group_filters_by_reference() {
        let mut store = store();
        let one = store.create_group("One", ["You", "A"]);
        let two = store.create_group("Two", ["You", "B"]);
        store.add_expense(&one.id, "x", 10.0, "A", ["You", "A"], today());
        store.add_expense(&two.id, "y", 10.0, "B", ["You", "B"], today());
        store.add_expense(&one.id, "z", 10.0, "You", ["You", "A"], today());

        let descriptions: Vec<_> = store
            .expenses_for_group(&one.id)
            .into_iter()
            .map(|expense| expense.description.as_str())
            .collect();
        assert_eq!(descriptions, vec!["z", "x"]);
    }

    #[test]
    fn orphan_with_foreign_group_reference_does_not_hide_valid_expenses() {
        let persistence = Arc::new(Persistence::in_memory());
        let raw = r#"[
            {"id":"1714550400000-1","groupId":"deleted-group","description":"Old cab",
             "amount":80,"paidBy":"You","splitBetween":["You","A"],"status":"pending",
             "date":"2024-05-01","createdAt":"2024-05-01T09:00:00Z"},
            {"id":"1714550400000-2","groupId":"00000000-0000-0000-0000-000000000001",
             "description":"Lunch","amount":40,"paidBy":"You","splitBetween":["You","A"],
             "status":"pending","date":"2024-05-02","createdAt":"2024-05-02T09:00:00Z"}
        ]"#;
        persistence.backend().save(SPLIT_EXPENSES_KEY, raw).unwrap();

        let mut store = SplitStore::load_with(
            persistence.clone(),
            Arc::new(SequentialIds::new()),
            Arc::new(SystemClock),
        );
        assert_eq!(store.list_expenses().len(), 2);

        let group = store.create_group("Lunch club", ["You", "A"]);
        assert_eq!(group.id.as_str(), "00000000-0000-0000-0000-000000000001");
        assert_eq!(group.total_owed, 20.0);

        let report = store.recompute();
        assert_eq!(report.orphaned, 1);
        assert_eq!(report.applied, 1);
        let stored: Vec<SplitExpense> = persistence.read_records(SPLIT_EXPENSES_KEY);
        assert_eq!(stored.len(), 2);
    }
}
