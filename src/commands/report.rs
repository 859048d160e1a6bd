//! Report command handler: the filtered analysis view.

use crate::args::ReportArgs;
use crate::commands::{entry_table, ListedEntry, Out};
use crate::model::{Amount, EntryKind};
use crate::store::LedgerStore;
use crate::views::EntryFilter;
use crate::{Config, Menu, Mode, Result, Session};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// The analysis view's structured output.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub income: u64,
    pub expense: u64,
    pub rows: Vec<ListedEntry>,
}

/// Searches the ledger with an inclusive date range intersected with
/// category and owner filters, and shows period totals over the matches.
///
/// The category filter accepts names from both category sets regardless of
/// kind, like the edit path.
pub async fn report(config: Config, mode: Mode, args: ReportArgs) -> Result<Out<Report>> {
    let mut session = Session::load(&config).await;
    session.require_unlocked(&config)?;

    let today = chrono::Local::now().date_naive();
    let from = args
        .from()
        .unwrap_or_else(|| today.with_day(1).unwrap_or(today));
    let to = args.to().unwrap_or(today);

    let filter = EntryFilter::new(from, to)
        .with_categories(args.categories().to_vec())
        .with_owners(args.owners().to_vec());

    let store = LedgerStore::new(config.clone(), mode);
    let entries = store.list_all().await;

    session.set_menu(Menu::Report);
    session.save(&config).await?;

    let mut rows: Vec<ListedEntry> = entries
        .into_iter()
        .enumerate()
        .filter(|(_, e)| filter.matches(e))
        .map(|(row, entry)| ListedEntry { row, entry })
        .collect();

    let income: u64 = kind_total(&rows, EntryKind::Income);
    let expense: u64 = kind_total(&rows, EntryKind::Expense);
    rows.sort_by(|a, b| b.entry.date().cmp(&a.entry.date()));

    let message = if rows.is_empty() {
        format!("{from} to {to}: no matching entries.")
    } else {
        format!(
            "{from} to {to}: income {}, expense {}\n{}",
            Amount::new(income),
            Amount::new(expense),
            entry_table(&rows)
        )
    };

    Ok(Out::new(
        message,
        Report {
            from,
            to,
            income,
            expense,
            rows,
        },
    ))
}

fn kind_total(rows: &[ListedEntry], kind: EntryKind) -> u64 {
    rows.iter()
        .filter(|l| l.entry.kind() == kind)
        .map(|l| l.entry.amount().value())
        .sum()
}
