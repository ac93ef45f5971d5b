mod common;

use std::{fs, sync::Arc};

use common::{day, file_persistence, fixed_clock, reopen};
use pocket_ledger::{
    config::{Config, ConfigManager},
    core::{ids::SequentialIds, LedgerStore},
    domain::RecordId,
    storage::{open_storage, Persistence, StorageBackend, SPLIT_EXPENSES_KEY, TRANSACTIONS_KEY},
    FinanceTracker, TransactionKind, YOU,
};
use tempfile::tempdir;

fn ledger_on(persistence: Persistence) -> LedgerStore {
    LedgerStore::load_with(
        Arc::new(persistence),
        Arc::new(SequentialIds::new()),
        fixed_clock(),
    )
}

#[test]
fn transactions_survive_a_reload() {
    let (persistence, temp) = file_persistence();
    let written = {
        let mut store = ledger_on(persistence);
        store.add(TransactionKind::Income, 500.0, "Salary", "", day(2024, 1, 1));
        store.add(TransactionKind::Expense, 75.0, "Food", "Dinner", day(2024, 1, 2));
        assert!(store.is_persisted());
        store.list().to_vec()
    };

    let reloaded = ledger_on(reopen(&temp));
    assert_eq!(reloaded.list(), written.as_slice());
    assert_eq!(reloaded.balance(), 425.0);
}

#[test]
fn persisted_records_use_the_documented_field_names() {
    let (persistence, temp) = file_persistence();
    let mut store = ledger_on(persistence);
    store.add(TransactionKind::Expense, 12.0, "Food", "Tea", day(2024, 6, 9));

    let raw = fs::read_to_string(temp.path().join("transactions.json")).expect("file");
    let json: serde_json::Value = serde_json::from_str(&raw).expect("json");
    let record = &json[0];
    assert_eq!(record["type"], "expense");
    assert_eq!(record["date"], "2024-06-09");
    assert!(record.get("createdAt").is_some());
}

#[test]
fn malformed_file_reads_as_empty_and_is_replaced_on_write() {
    let (persistence, temp) = file_persistence();
    let path = temp.path().join("transactions.json");
    fs::write(&path, "{ not json").unwrap();

    let mut store = ledger_on(persistence);
    assert!(store.is_empty());

    store.add(TransactionKind::Income, 10.0, "Gift", "", day(2024, 2, 2));
    let reloaded = ledger_on(reopen(&temp));
    assert_eq!(reloaded.len(), 1);
}

#[test]
fn record_with_bad_date_loads_but_is_excluded_from_ranges() {
    let (persistence, temp) = file_persistence();
    let raw = r#"[{"id":"00000000-0000-0000-0000-000000000001","type":"expense","amount":30.0,
        "category":"Food","description":"","date":"someday","createdAt":"2024-01-01T00:00:00Z"}]"#;
    persistence.backend().save(TRANSACTIONS_KEY, raw).unwrap();

    let store = ledger_on(reopen(&temp));
    assert_eq!(store.len(), 1);
    assert_eq!(store.total_by_kind(TransactionKind::Expense, None), 30.0);
    let range = pocket_ledger::core::services::DateRange::new(day(2000, 1, 1), day(2100, 1, 1));
    assert_eq!(store.total_by_kind(TransactionKind::Expense, Some(range)), 0.0);
}

#[test]
fn failed_write_keeps_the_in_memory_change() {
    let (persistence, temp) = file_persistence();
    let mut store = ledger_on(persistence);
    fs::create_dir_all(temp.path().join("transactions.json")).unwrap();

    store.add(TransactionKind::Expense, 5.0, "Food", "", day(2024, 2, 2));
    assert_eq!(store.len(), 1);
    assert!(!store.is_persisted());
}

#[test]
fn unusable_directory_falls_back_to_memory() {
    let temp = tempdir().unwrap();
    let blocker = temp.path().join("not-a-dir");
    fs::write(&blocker, "x").unwrap();

    let backend = open_storage(Some(blocker));
    assert!(!backend.is_durable());

    let mut tracker = FinanceTracker::new(Persistence::new(backend));
    assert!(!tracker.is_durable());
    tracker.add_transaction(TransactionKind::Income, 1.0, "Gift", "", day(2024, 1, 1));
    assert_eq!(tracker.list_transactions().len(), 1);
}

#[test]
fn missing_directory_falls_back_to_memory() {
    let backend = open_storage(None);
    assert!(!backend.is_durable());
    assert!(backend.load(TRANSACTIONS_KEY).unwrap().is_none());
}

#[test]
fn tracker_opens_under_the_configured_base() {
    let temp = tempdir().unwrap();
    let manager = ConfigManager::with_base_dir(temp.path().to_path_buf());
    let config = Config {
        seed_sample_data: true,
        ..Config::default()
    };
    manager.save(&config).unwrap();

    let loaded = manager.load().unwrap();
    assert_eq!(loaded, config);

    let seeded_len = {
        let tracker = FinanceTracker::open(Some(&manager), &loaded);
        assert!(tracker.is_durable());
        assert!(!tracker.list_groups().is_empty());
        tracker.list_transactions().len()
    };
    assert!(temp.path().join("data").join("transactions.json").exists());

    let reopened = FinanceTracker::open(Some(&manager), &loaded);
    assert_eq!(reopened.list_transactions().len(), seeded_len);
}

#[test]
fn records_with_timestamp_ids_and_dangling_groups_are_kept() {
    let (persistence, temp) = file_persistence();
    let transactions = r#"[
        {"id":"6f1c7a52-3b0e-4a51-9d0c-0a0c4f1b2e11","type":"income","amount":50000,
         "category":"Salary","description":"","date":"2024-04-30","createdAt":"2024-05-01T08:00:00.000Z"},
        {"id":"1714550400000-123456789","type":"expense","amount":250,
         "category":"Food","description":"","date":"2024-05-01","createdAt":"2024-05-01T09:00:00.000Z"}
    ]"#;
    let expenses = r#"[
        {"id":"1714550400000-1","groupId":"deleted-group","description":"Old cab","amount":80,
         "paidBy":"You","splitBetween":["You","A"],"status":"pending","date":"2024-05-01",
         "createdAt":"2024-05-01T09:00:00.000Z"},
        {"id":"1714550400000-2","groupId":"1714550400000-9","description":"Pizza","amount":90,
         "paidBy":"A","splitBetween":["You","A","B"],"status":"pending","date":"2024-05-02",
         "createdAt":"2024-05-02T09:00:00.000Z"}
    ]"#;
    persistence.backend().save(TRANSACTIONS_KEY, transactions).unwrap();
    persistence.backend().save(SPLIT_EXPENSES_KEY, expenses).unwrap();

    {
        let mut tracker = FinanceTracker::with_services(
            reopen(&temp),
            Arc::new(SequentialIds::new()),
            fixed_clock(),
        );
        assert_eq!(tracker.list_transactions().len(), 2);
        assert_eq!(tracker.list_expenses().len(), 2);
        assert_eq!(tracker.balance(), 49750.0);

        tracker.add_transaction(TransactionKind::Expense, 50.0, "Food", "", day(2024, 5, 3));
        let removed = tracker
            .delete_transaction(&RecordId::from("1714550400000-123456789"))
            .expect("legacy id resolves");
        assert_eq!(removed.amount, 250.0);
        tracker.restore_transaction(removed);

        tracker.create_group("Flat", [YOU, "A"]);
        let report = tracker.recompute_groups();
        assert_eq!(report.orphaned, 2);
    }

    let reloaded = FinanceTracker::with_services(
        reopen(&temp),
        Arc::new(SequentialIds::starting_at(10)),
        fixed_clock(),
    );
    assert_eq!(reloaded.list_transactions().len(), 3);
    assert_eq!(reloaded.balance(), 50000.0 - 250.0 - 50.0);
    assert_eq!(reloaded.list_expenses().len(), 2);
    assert_eq!(reloaded.list_groups().len(), 1);
}
