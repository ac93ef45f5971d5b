use chrono::NaiveDate;

use crate::{
    core::{sample_data, services::DateRange},
    domain::{
        common::DATE_FORMAT, Displayable, RecordId, Transaction, TransactionKind,
        TransactionPatch, YOU,
    },
};

use super::{output, CliContext, CommandError};

/// Whether the session should keep reading commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

type CommandResult = Result<Flow, CommandError>;

pub fn print_usage() {
    output::info(
        "Usage: pocket_ledger_cli <command> [args]\n\
         Commands:\n  \
         list\n  \
         add <income|expense> <amount> <category> [description] [YYYY-MM-DD]\n  \
         delete <id|latest>\n  \
         undo\n  \
         update <id> [--kind K] [--amount N] [--category C] [--description D] [--date YYYY-MM-DD]\n  \
         balance\n  \
         totals [from to]\n  \
         categories <income|expense> [from to]\n  \
         groups\n  \
         create-group <name> <member>...\n  \
         expenses [group]\n  \
         add-expense <group> <amount> <paid-by> <description> <member,member,...> [YYYY-MM-DD]\n  \
         recompute\n  \
         seed\n  \
         exit",
    );
}

/// Runs a single already-tokenised command.
pub fn dispatch(ctx: &mut CliContext, args: &[String]) -> CommandResult {
    let Some((command, rest)) = args.split_first() else {
        return Ok(Flow::Continue);
    };
    match command.as_str() {
        "list" => list(ctx),
        "add" => add(ctx, rest),
        "delete" => delete(ctx, rest),
        "undo" => undo(ctx),
        "update" => update(ctx, rest),
        "balance" => balance(ctx),
        "totals" => totals(ctx, rest),
        "categories" => categories(ctx, rest),
        "groups" => groups(ctx),
        "create-group" => create_group(ctx, rest),
        "expenses" => expenses(ctx, rest),
        "add-expense" => add_expense(ctx, rest),
        "recompute" => recompute(ctx),
        "seed" => seed(ctx),
        "help" => {
            print_usage();
            Ok(Flow::Continue)
        }
        "exit" | "quit" => Ok(Flow::Exit),
        other => Err(CommandError::Usage(format!("unknown command `{other}`"))),
    }
}

fn list(ctx: &mut CliContext) -> CommandResult {
    let transactions = ctx.tracker.list_transactions();
    output::section(format!("Transactions ({})", transactions.len()));
    for txn in transactions {
        output::info(format!("{}  {}", txn.id, txn.display_label()));
    }
    Ok(Flow::Continue)
}

fn add(ctx: &mut CliContext, args: &[String]) -> CommandResult {
    let [kind, amount, category, tail @ ..] = args else {
        return Err(CommandError::Usage(
            "add <income|expense> <amount> <category> [description] [date]".into(),
        ));
    };
    let kind = parse_kind(kind)?;
    let amount = parse_amount(amount)?;
    let description = tail.first().cloned().unwrap_or_default();
    let date = match tail.get(1) {
        Some(raw) => parse_date(raw)?,
        None => ctx.today,
    };
    let txn = ctx
        .tracker
        .add_transaction(kind, amount, category.as_str(), description, date);
    output::success(format!(
        "Added {} of {} ({})",
        txn.kind,
        ctx.money(txn.amount),
        txn.id
    ));
    Ok(Flow::Continue)
}

fn delete(ctx: &mut CliContext, args: &[String]) -> CommandResult {
    let [target] = args else {
        return Err(CommandError::Usage("delete <id|latest>".into()));
    };
    let id = if target == "latest" {
        ctx.tracker
            .list_transactions()
            .first()
            .map(|txn| txn.id.clone())
            .ok_or_else(|| CommandError::NotFound("the ledger is empty".into()))?
    } else {
        parse_id(target)?
    };
    let removed = ctx
        .tracker
        .delete_transaction(&id)
        .ok_or_else(|| CommandError::NotFound(format!("transaction {id}")))?;
    output::success(deleted_message(&removed, ctx.script_mode));
    Ok(Flow::Continue)
}

/// The undo buffer lives in memory, so the hint only makes sense while the
/// same process keeps reading commands.
fn deleted_message(removed: &Transaction, script_mode: bool) -> String {
    let mut message = format!("Deleted {} ({})", removed.display_label(), removed.id);
    if script_mode {
        message.push_str("; run `undo` to restore");
    }
    message
}

fn undo(ctx: &mut CliContext) -> CommandResult {
    match ctx.tracker.undo_delete() {
        Some(txn) => output::success(format!("Restored {}", txn.display_label())),
        None => output::warning("nothing to undo"),
    }
    Ok(Flow::Continue)
}

fn update(ctx: &mut CliContext, args: &[String]) -> CommandResult {
    let Some((target, flags)) = args.split_first() else {
        return Err(CommandError::Usage("update <id> [--field value]...".into()));
    };
    let id = parse_id(target)?;
    let mut patch = TransactionPatch::default();
    let mut flags = flags.iter();
    while let Some(flag) = flags.next() {
        let value = flags
            .next()
            .ok_or_else(|| CommandError::Usage(format!("{flag} needs a value")))?;
        match flag.as_str() {
            "--kind" => patch.kind = Some(parse_kind(value)?),
            "--amount" => patch.amount = Some(parse_amount(value)?),
            "--category" => patch.category = Some(value.clone()),
            "--description" => patch.description = Some(value.clone()),
            "--date" => patch.date = Some(parse_date(value)?),
            other => {
                return Err(CommandError::InvalidArgument(format!("unknown flag `{other}`")))
            }
        }
    }
    if patch.is_empty() {
        return Err(CommandError::Usage("update needs at least one field".into()));
    }
    if ctx.tracker.update_transaction(&id, patch) {
        output::success(format!("Updated {id}"));
        Ok(Flow::Continue)
    } else {
        Err(CommandError::NotFound(format!("transaction {id}")))
    }
}

fn balance(ctx: &mut CliContext) -> CommandResult {
    let snapshot = ctx.tracker.snapshot();
    output::info(format!("Balance: {}", ctx.money(snapshot.balance)));
    output::info(format!("Income: {}", ctx.money(snapshot.total_income)));
    output::info(format!("Expenses: {}", ctx.money(snapshot.total_expense)));
    Ok(Flow::Continue)
}

fn totals(ctx: &mut CliContext, args: &[String]) -> CommandResult {
    let range = parse_range(args)?;
    let income = ctx.tracker.total_by_kind(TransactionKind::Income, range);
    let expense = ctx.tracker.total_by_kind(TransactionKind::Expense, range);
    output::info(format!("Income: {}", ctx.money(income)));
    output::info(format!("Expenses: {}", ctx.money(expense)));
    Ok(Flow::Continue)
}

fn categories(ctx: &mut CliContext, args: &[String]) -> CommandResult {
    let Some((kind, rest)) = args.split_first() else {
        return Err(CommandError::Usage("categories <income|expense> [from to]".into()));
    };
    let kind = parse_kind(kind)?;
    let range = parse_range(rest)?;
    let mut totals: Vec<_> = ctx
        .tracker
        .category_totals(kind, range)
        .into_iter()
        .collect();
    totals.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    output::section(format!("{kind} by category"));
    for (category, amount) in totals {
        output::info(format!("{category}: {}", ctx.money(amount)));
    }
    Ok(Flow::Continue)
}

fn groups(ctx: &mut CliContext) -> CommandResult {
    let groups = ctx.tracker.list_groups();
    output::section(format!("Groups ({})", groups.len()));
    for group in groups {
        output::info(format!(
            "{}  {}  owed to you: {}  you owe: {}",
            group.id,
            group.display_label(),
            ctx.money(group.total_owed),
            ctx.money(group.total_owes)
        ));
    }
    Ok(Flow::Continue)
}

fn create_group(ctx: &mut CliContext, args: &[String]) -> CommandResult {
    let Some((name, others)) = args.split_first() else {
        return Err(CommandError::Usage("create-group <name> <member>...".into()));
    };
    let mut members = vec![YOU.to_string()];
    members.extend(others.iter().cloned());
    let group = ctx.tracker.create_group(name.as_str(), members);
    output::success(format!(
        "Created group {} ({})",
        group.display_label(),
        group.id
    ));
    Ok(Flow::Continue)
}

fn expenses(ctx: &mut CliContext, args: &[String]) -> CommandResult {
    let group_id = match args.first() {
        Some(reference) => Some(resolve_group(ctx, reference)?),
        None => None,
    };
    let expenses: Vec<_> = ctx
        .tracker
        .list_expenses()
        .iter()
        .filter(|expense| {
            group_id
                .as_ref()
                .map(|id| &expense.group_id == id)
                .unwrap_or(true)
        })
        .collect();
    output::section(format!("Split expenses ({})", expenses.len()));
    for expense in expenses {
        output::info(format!(
            "{}  {}  {}",
            expense.date,
            expense.display_label(),
            expense.split_between.join(", ")
        ));
    }
    Ok(Flow::Continue)
}

fn add_expense(ctx: &mut CliContext, args: &[String]) -> CommandResult {
    let [group, amount, paid_by, description, members, tail @ ..] = args else {
        return Err(CommandError::Usage(
            "add-expense <group> <amount> <paid-by> <description> <member,member,...> [date]"
                .into(),
        ));
    };
    let group_id = resolve_group(ctx, group)?;
    let amount = parse_amount(amount)?;
    let split_between: Vec<String> = members
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect();
    let date = match tail.first() {
        Some(raw) => parse_date(raw)?,
        None => ctx.today,
    };
    let expense = ctx.tracker.add_expense(
        group_id,
        description.as_str(),
        amount,
        paid_by.as_str(),
        split_between,
        date,
    );
    output::success(format!(
        "Added split expense {} ({})",
        expense.display_label(),
        expense.id
    ));
    Ok(Flow::Continue)
}

fn recompute(ctx: &mut CliContext) -> CommandResult {
    let report = ctx.tracker.recompute_groups();
    output::success(format!(
        "Recomputed {} groups ({} expenses applied, {} orphaned)",
        report.groups, report.applied, report.orphaned
    ));
    Ok(Flow::Continue)
}

fn seed(ctx: &mut CliContext) -> CommandResult {
    let today = ctx.today;
    let report = sample_data::seed_if_empty(&mut ctx.tracker, today);
    output::success(format!(
        "Seeded {} transactions, {} groups, {} split expenses",
        report.transactions, report.groups, report.expenses
    ));
    Ok(Flow::Continue)
}

/// Accepts an existing group id or a case-insensitive group name.
fn resolve_group(ctx: &CliContext, reference: &str) -> Result<RecordId, CommandError> {
    let groups = ctx.tracker.list_groups();
    groups
        .iter()
        .find(|group| group.id.as_str() == reference)
        .or_else(|| {
            groups
                .iter()
                .find(|group| group.name.eq_ignore_ascii_case(reference))
        })
        .map(|group| group.id.clone())
        .ok_or_else(|| CommandError::NotFound(format!("group `{reference}`")))
}

fn parse_kind(raw: &str) -> Result<TransactionKind, CommandError> {
    raw.parse().map_err(CommandError::InvalidArgument)
}

fn parse_amount(raw: &str) -> Result<f64, CommandError> {
    raw.parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
        .ok_or_else(|| CommandError::InvalidArgument(format!("`{raw}` is not an amount")))
}

fn parse_date(raw: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|_| CommandError::InvalidArgument(format!("`{raw}` is not a YYYY-MM-DD date")))
}

fn parse_id(raw: &str) -> Result<RecordId, CommandError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CommandError::InvalidArgument("empty transaction id".into()));
    }
    Ok(RecordId::new(trimmed))
}

fn parse_range(args: &[String]) -> Result<Option<DateRange>, CommandError> {
    match args {
        [] => Ok(None),
        [from, to] => Ok(Some(DateRange::new(parse_date(from)?, parse_date(to)?))),
        _ => Err(CommandError::Usage("expected both <from> and <to> dates".into())),
    }
}
