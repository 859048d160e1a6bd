//! These structs provide the CLI interface for the hearth CLI.

use crate::model::{Amount, EntryColumn, EntryKind};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// hearth: a household ledger that lives in a Google sheet.
///
/// Entries, a monthly calendar and a filtered analysis view are all computed
/// from one spreadsheet, so the same ledger can be edited from the sheet
/// itself or from this program. Run `hearth init` first to create the data
/// directory and point it at your sheet.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory and initialize the configuration file.
    ///
    /// This is the first command you should run. You need the URL of the
    /// Google Sheet that holds (or will hold) your ledger, and optionally a
    /// downloaded service-account key JSON with access to that sheet. Without
    /// a key the ledger reads as empty; you can also supply the key later via
    /// the HEARTH_SERVICE_ACCOUNT_JSON environment variable.
    Init(InitArgs),
    /// Open the password gate for this session.
    Unlock(UnlockArgs),
    /// Record one income or expense entry.
    Add(AddArgs),
    /// Show the most recent entries with their row numbers.
    List(ListArgs),
    /// Change one field of one entry row.
    Edit(EditArgs),
    /// Delete one entry row by its row number.
    Delete(DeleteArgs),
    /// Show this month's totals and budget progress.
    Summary(SummaryArgs),
    /// Show a month as a calendar with per-day totals.
    Calendar(CalendarArgs),
    /// Search entries by date range, category and owner.
    Report(ReportArgs),
    /// Manage monthly recurring entries.
    Recurring(RecurringArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where hearth data and configuration is held. Defaults to
    /// ~/hearth
    #[arg(long, env = "HEARTH_HOME", default_value_t = default_hearth_home())]
    hearth_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, hearth_home: PathBuf) -> Self {
        Self {
            log_level,
            hearth_home: hearth_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn hearth_home(&self) -> &DisplayPath {
        &self.hearth_home
    }
}

/// Args for the `hearth init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The URL to your ledger Google sheet. It looks like this:
    /// https://docs.google.com/spreadsheets/d/1a7Km9FxQwRbPt82JvN4LzYpH5OcGnWsT6iDuE3VhMjX
    #[arg(long)]
    sheet_url: String,

    /// The path to your downloaded service-account key JSON. This file will
    /// be moved to the default secrets location in the data directory.
    #[arg(long)]
    credentials: Option<PathBuf>,

    /// A shared password that locks the ledger until `hearth unlock` is run.
    #[arg(long)]
    password: Option<String>,
}

impl InitArgs {
    pub fn new(
        sheet_url: impl Into<String>,
        credentials: Option<PathBuf>,
        password: Option<String>,
    ) -> Self {
        Self {
            sheet_url: sheet_url.into(),
            credentials,
            password,
        }
    }

    pub fn sheet_url(&self) -> &str {
        &self.sheet_url
    }

    pub fn credentials(&self) -> Option<&Path> {
        self.credentials.as_deref()
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }
}

/// Args for the `hearth unlock` command.
#[derive(Debug, Parser, Clone)]
pub struct UnlockArgs {
    /// The shared ledger password.
    password: String,
}

impl UnlockArgs {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
        }
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

/// Args for the `hearth add` command.
#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    /// Entry date, e.g. 2025-06-14. Defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Whether this is an "expense" or an "income".
    #[arg(long)]
    kind: EntryKind,

    /// Who the entry belongs to, e.g. Husband, Wife or Shared.
    #[arg(long)]
    owner: String,

    /// A category from the set matching --kind.
    #[arg(long)]
    category: String,

    /// Free-text description.
    #[arg(long, default_value = "")]
    description: String,

    /// The amount in whole currency units.
    #[arg(long)]
    amount: Amount,
}

impl AddArgs {
    pub fn new(
        date: Option<NaiveDate>,
        kind: EntryKind,
        owner: impl Into<String>,
        category: impl Into<String>,
        description: impl Into<String>,
        amount: Amount,
    ) -> Self {
        Self {
            date,
            kind,
            owner: owner.into(),
            category: category.into(),
            description: description.into(),
            amount,
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }
}

/// Args for the `hearth list` command.
#[derive(Debug, Parser, Clone)]
pub struct ListArgs {
    /// How many of the most recent entries to show.
    #[arg(long, default_value_t = 15)]
    limit: usize,
}

impl ListArgs {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

/// Args for the `hearth edit` command.
#[derive(Debug, Parser, Clone)]
pub struct EditArgs {
    /// The 0-based row number, as shown by `hearth list`.
    #[arg(long)]
    row: usize,

    /// The field to change: date, kind, owner, category, description or
    /// amount.
    #[arg(long)]
    field: EntryColumn,

    /// The new value for the field.
    #[arg(long)]
    value: String,
}

impl EditArgs {
    pub fn new(row: usize, field: EntryColumn, value: impl Into<String>) -> Self {
        Self {
            row,
            field,
            value: value.into(),
        }
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn field(&self) -> EntryColumn {
        self.field
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Args for the `hearth delete` command.
#[derive(Debug, Parser, Clone)]
pub struct DeleteArgs {
    /// The 0-based row number, as shown by `hearth list`.
    #[arg(long)]
    row: usize,
}

impl DeleteArgs {
    pub fn new(row: usize) -> Self {
        Self { row }
    }

    pub fn row(&self) -> usize {
        self.row
    }
}

/// Args for the `hearth summary` command.
#[derive(Debug, Parser, Clone)]
pub struct SummaryArgs {
    /// Year to summarize. Defaults to the current year.
    #[arg(long)]
    year: Option<i32>,

    /// Month to summarize (1-12). Defaults to the current month.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: Option<u32>,

    /// Set a new monthly spending target before summarizing.
    #[arg(long)]
    budget: Option<Amount>,
}

impl SummaryArgs {
    pub fn new(year: Option<i32>, month: Option<u32>, budget: Option<Amount>) -> Self {
        Self {
            year,
            month,
            budget,
        }
    }

    pub fn year(&self) -> Option<i32> {
        self.year
    }

    pub fn month(&self) -> Option<u32> {
        self.month
    }

    pub fn budget(&self) -> Option<Amount> {
        self.budget
    }
}

/// Args for the `hearth calendar` command.
#[derive(Debug, Parser, Clone)]
pub struct CalendarArgs {
    /// Year to show. Defaults to the current year.
    #[arg(long)]
    year: Option<i32>,

    /// Month to show (1-12). Defaults to the current month.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: Option<u32>,

    /// Show the entries of this single date instead of the month grid.
    #[arg(long)]
    date: Option<NaiveDate>,
}

impl CalendarArgs {
    pub fn new(year: Option<i32>, month: Option<u32>, date: Option<NaiveDate>) -> Self {
        Self { year, month, date }
    }

    pub fn year(&self) -> Option<i32> {
        self.year
    }

    pub fn month(&self) -> Option<u32> {
        self.month
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }
}

/// Args for the `hearth report` command.
#[derive(Debug, Parser, Clone)]
pub struct ReportArgs {
    /// Start of the date range (inclusive). Defaults to the first of the
    /// current month.
    #[arg(long)]
    from: Option<NaiveDate>,

    /// End of the date range (inclusive). Defaults to today.
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Categories to keep; repeat for more than one. All when omitted.
    #[arg(long = "category")]
    categories: Vec<String>,

    /// Owners to keep; repeat for more than one. All when omitted.
    #[arg(long = "owner")]
    owners: Vec<String>,
}

impl ReportArgs {
    pub fn new(
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        categories: Vec<String>,
        owners: Vec<String>,
    ) -> Self {
        Self {
            from,
            to,
            categories,
            owners,
        }
    }

    pub fn from(&self) -> Option<NaiveDate> {
        self.from
    }

    pub fn to(&self) -> Option<NaiveDate> {
        self.to
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn owners(&self) -> &[String] {
        &self.owners
    }
}

/// Args for the `hearth recurring` command.
#[derive(Debug, Parser, Clone)]
pub struct RecurringArgs {
    #[command(subcommand)]
    command: RecurringSubcommand,
}

impl RecurringArgs {
    pub fn new(command: RecurringSubcommand) -> Self {
        Self { command }
    }

    pub fn command(&self) -> &RecurringSubcommand {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum RecurringSubcommand {
    /// Define a new monthly recurring entry.
    Add(RecurringAddArgs),
    /// Show the defined recurring entries with their row numbers.
    List,
    /// Delete one recurring entry by its row number.
    Delete(RecurringDeleteArgs),
    /// Write this month's instance of every recurring entry into the ledger.
    Apply(ApplyArgs),
}

/// Args for the `hearth recurring add` command.
#[derive(Debug, Parser, Clone)]
pub struct RecurringAddArgs {
    /// Day of month (1-31) the entry recurs on. Days past the end of a short
    /// month clamp to its last day.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=31))]
    day: u32,

    /// Whether this is an "expense" or an "income".
    #[arg(long)]
    kind: EntryKind,

    /// Who the entry belongs to.
    #[arg(long)]
    owner: String,

    /// A category from the set matching --kind.
    #[arg(long)]
    category: String,

    /// Free-text description.
    #[arg(long, default_value = "")]
    description: String,

    /// The amount in whole currency units.
    #[arg(long)]
    amount: Amount,
}

impl RecurringAddArgs {
    pub fn new(
        day: u32,
        kind: EntryKind,
        owner: impl Into<String>,
        category: impl Into<String>,
        description: impl Into<String>,
        amount: Amount,
    ) -> Self {
        Self {
            day,
            kind,
            owner: owner.into(),
            category: category.into(),
            description: description.into(),
            amount,
        }
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }
}

/// Args for the `hearth recurring delete` command.
#[derive(Debug, Parser, Clone)]
pub struct RecurringDeleteArgs {
    /// The 0-based row number, as shown by `hearth recurring list`.
    #[arg(long)]
    row: usize,
}

impl RecurringDeleteArgs {
    pub fn new(row: usize) -> Self {
        Self { row }
    }

    pub fn row(&self) -> usize {
        self.row
    }
}

/// Args for the `hearth recurring apply` command.
#[derive(Debug, Parser, Clone)]
pub struct ApplyArgs {
    /// Year to expand into. Defaults to the current year.
    #[arg(long)]
    year: Option<i32>,

    /// Month to expand into (1-12). Defaults to the current month.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: Option<u32>,
}

impl ApplyArgs {
    pub fn new(year: Option<i32>, month: Option<u32>) -> Self {
        Self { year, month }
    }

    pub fn year(&self) -> Option<i32> {
        self.year
    }

    pub fn month(&self) -> Option<u32> {
        self.month
    }
}

fn default_hearth_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("hearth"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --hearth-home or HEARTH_HOME instead of relying on the default \
                hearth home directory. If you continue using the program right now, you may have \
                problems!",
            );
            PathBuf::from("hearth")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}
