//! Thin command-line front end over [`FinanceTracker`].
//!
//! Commands come either from argv (one per invocation) or, when
//! `POCKET_LEDGER_CLI_SCRIPT=1`, line by line from stdin.

pub mod commands;
pub mod output;

use std::{
    env,
    io::{self, BufRead},
};

use chrono::NaiveDate;
use thiserror::Error;

use crate::{
    config::{Config, ConfigManager},
    core::FinanceTracker,
};

pub use commands::{dispatch, Flow};

/// Environment variable switching the binary into script mode.
pub const SCRIPT_ENV: &str = "POCKET_LEDGER_CLI_SCRIPT";

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("usage: {0}")]
    Usage(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// State shared by every command in a session.
pub struct CliContext {
    pub tracker: FinanceTracker,
    pub config: Config,
    pub today: NaiveDate,
    /// Whether later commands run in the same process (and can use `undo`).
    pub script_mode: bool,
}

impl CliContext {
    pub fn new(tracker: FinanceTracker, config: Config, today: NaiveDate) -> Self {
        Self {
            tracker,
            config,
            today,
            script_mode: false,
        }
    }

    pub fn with_script_mode(mut self, script_mode: bool) -> Self {
        self.script_mode = script_mode;
        self
    }

    pub fn money(&self, amount: f64) -> String {
        output::money(&self.config.currency_symbol, amount)
    }
}

/// Entry point used by the `pocket_ledger_cli` binary.
pub fn run_cli() -> Result<(), CommandError> {
    let manager = ConfigManager::new();
    let config = manager
        .as_ref()
        .map(ConfigManager::load_or_default)
        .unwrap_or_default();
    let tracker = FinanceTracker::open(manager.as_ref(), &config);
    if !tracker.is_durable() {
        output::warning("no durable storage available; changes last for this session only");
    }
    let today = chrono::Local::now().date_naive();
    let script_mode = env::var(SCRIPT_ENV).map(|value| value == "1").unwrap_or(false);
    let mut context = CliContext::new(tracker, config, today).with_script_mode(script_mode);

    if script_mode {
        let stdin = io::stdin();
        return run_script(&mut context, stdin.lock());
    }

    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        commands::print_usage();
        return Err(CommandError::Usage("no command given".into()));
    }
    dispatch(&mut context, &args).map(|_| ())
}

/// Executes one command per line. Blank lines and `#` comments are skipped;
/// a failing command is reported and the script carries on.
pub fn run_script(context: &mut CliContext, reader: impl BufRead) -> Result<(), CommandError> {
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let args = match shell_words::split(trimmed) {
            Ok(args) => args,
            Err(err) => {
                output::error(format!("cannot parse `{trimmed}`: {err}"));
                continue;
            }
        };
        match dispatch(context, &args) {
            Ok(Flow::Exit) => break,
            Ok(Flow::Continue) => {}
            Err(err) => output::error(err),
        }
    }
    Ok(())
}
