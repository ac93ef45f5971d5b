use assert_cmd::Command;
use predicates::{prelude::*, str::contains};
use tempfile::TempDir;

fn cli(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("pocket_ledger_cli").unwrap();
    cmd.env("POCKET_LEDGER_HOME", home.path())
        .env("NO_COLOR", "1")
        .env("RUST_LOG", "off");
    cmd
}

#[test]
fn script_mode_runs_basic_flow() {
    let home = TempDir::new().unwrap();
    let input = "\
add income 100 Salary \"Pay day\" 2024-11-30
add expense 40 Food Lunch 2024-12-01
balance
exit
";

    cli(&home)
        .env("POCKET_LEDGER_CLI_SCRIPT", "1")
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Balance: ₹60.00"));

    let json =
        std::fs::read_to_string(home.path().join("data").join("transactions.json")).unwrap();
    assert!(json.contains("\"Pay day\""));
}

#[test]
fn data_persists_between_invocations() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["add", "expense", "25", "Food"])
        .assert()
        .success();

    cli(&home)
        .arg("balance")
        .assert()
        .success()
        .stdout(contains("Balance: -₹25.00"));
}

#[test]
fn split_flow_reports_group_totals() {
    let home = TempDir::new().unwrap();
    let input = "\
create-group Trip A B C
add-expense Trip 300 You Hotel You,A,B,C 2024-03-01
add-expense trip 90 A Fuel You,A,B 2024-03-02
groups
";

    cli(&home)
        .env("POCKET_LEDGER_CLI_SCRIPT", "1")
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("owed to you: ₹225.00  you owe: ₹30.00"));
}

#[test]
fn unknown_command_fails_outside_script_mode() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .arg("frobnicate")
        .assert()
        .failure()
        .stderr(contains("unknown command"));
}

#[test]
fn undo_hint_is_only_offered_within_a_session() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["add", "expense", "25", "Food"])
        .assert()
        .success();

    cli(&home)
        .args(["delete", "latest"])
        .assert()
        .success()
        .stdout(contains("Deleted").and(contains("undo").not()));

    cli(&home)
        .env("POCKET_LEDGER_CLI_SCRIPT", "1")
        .write_stdin("add expense 5 Food\ndelete latest\nundo\nbalance\n")
        .assert()
        .success()
        .stdout(contains("run `undo` to restore").and(contains("Balance: -₹5.00")));
}
