//! Calendar command handler: the month grid and single-day detail views.

use crate::args::CalendarArgs;
use crate::commands::summary::month_title;
use crate::commands::{entry_table, ListedEntry, Out};
use crate::model::Amount;
use crate::store::LedgerStore;
use crate::views::{self, DayTotals};
use crate::{Config, Menu, Mode, Result, Session};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

/// Width of one day cell in the rendered grid.
const CELL: usize = 10;

const WEEKDAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// The calendar view's structured output: either a whole month or one day.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CalendarOut {
    Month {
        year: i32,
        month: u32,
        days: BTreeMap<u32, DayTotals>,
    },
    Day {
        date: NaiveDate,
        totals: DayTotals,
        entries: Vec<ListedEntry>,
    },
}

/// Shows a Sunday-first month grid with per-day income and expense sums, or,
/// with `--date`, the detail of a single day.
pub async fn calendar(
    config: Config,
    mode: Mode,
    args: CalendarArgs,
) -> Result<Out<CalendarOut>> {
    let mut session = Session::load(&config).await;
    session.require_unlocked(&config)?;

    let store = LedgerStore::new(config.clone(), mode);
    let entries = store.list_all().await;

    session.set_menu(Menu::Calendar);
    session.save(&config).await?;

    if let Some(date) = args.date() {
        let totals = views::daily_totals(&entries, date);
        let day_entries: Vec<ListedEntry> = entries
            .into_iter()
            .enumerate()
            .filter(|(_, e)| e.date() == date)
            .map(|(row, entry)| ListedEntry { row, entry })
            .collect();

        let message = if day_entries.is_empty() {
            format!("No entries on {date}.")
        } else {
            format!(
                "{date}: income {}, expense {}\n{}",
                Amount::new(totals.income),
                Amount::new(totals.expense),
                entry_table(&day_entries)
            )
        };
        return Ok(Out::new(
            message,
            CalendarOut::Day {
                date,
                totals,
                entries: day_entries,
            },
        ));
    }

    let today = chrono::Local::now().date_naive();
    let year = args.year().unwrap_or_else(|| today.year());
    let month = args.month().unwrap_or_else(|| today.month());
    let days = views::month_daily_totals(&entries, year, month);

    let message = format!(
        "{}\n{}",
        month_title(year, month),
        render_month(year, month, &days)
    );
    Ok(Out::new(message, CalendarOut::Month { year, month, days }))
}

/// Lays the month out as text, one block of three lines per week: day
/// numbers, expense sums, income sums.
fn render_month(year: i32, month: u32, days: &BTreeMap<u32, DayTotals>) -> String {
    let w = CELL;
    let mut lines = Vec::new();
    let header: String = WEEKDAY_NAMES
        .iter()
        .map(|name| format!("{name:>w$}"))
        .collect();
    lines.push(header);

    for week in views::month_grid(year, month) {
        let mut day_line = String::new();
        let mut expense_line = String::new();
        let mut income_line = String::new();
        for cell in week {
            let (day, expense, income) = match cell {
                None => (String::new(), String::new(), String::new()),
                Some(day) => {
                    let totals = days.get(&day).copied().unwrap_or_default();
                    let expense = if totals.expense > 0 {
                        format!("-{}", Amount::new(totals.expense))
                    } else {
                        String::new()
                    };
                    let income = if totals.income > 0 {
                        format!("+{}", Amount::new(totals.income))
                    } else {
                        String::new()
                    };
                    (day.to_string(), expense, income)
                }
            };
            day_line.push_str(&format!("{day:>w$}"));
            expense_line.push_str(&format!("{expense:>w$}"));
            income_line.push_str(&format!("{income:>w$}"));
        }
        lines.push(day_line);
        for extra in [expense_line, income_line] {
            if !extra.trim().is_empty() {
                lines.push(extra);
            }
        }
    }
    lines.join("\n")
}
