//! Pure functions that reshape the in-memory entry table for display.
//!
//! Nothing in this module touches the backing store; every function takes the
//! already-fetched rows and computes totals, subsets or calendar layouts.

use crate::model::{Amount, Entry, EntryKind, RecurringTemplate};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Income and expense sums for one date.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DayTotals {
    pub income: u64,
    pub expense: u64,
}

/// Sum of amounts over entries matching year, month and kind.
pub fn monthly_total(entries: &[Entry], year: i32, month: u32, kind: EntryKind) -> u64 {
    entries
        .iter()
        .filter(|e| e.date().year() == year && e.date().month() == month && e.kind() == kind)
        .map(|e| e.amount().value())
        .sum()
}

/// Income and expense sums for a single date.
pub fn daily_totals(entries: &[Entry], date: NaiveDate) -> DayTotals {
    let mut totals = DayTotals::default();
    for entry in entries.iter().filter(|e| e.date() == date) {
        match entry.kind() {
            EntryKind::Income => totals.income += entry.amount().value(),
            EntryKind::Expense => totals.expense += entry.amount().value(),
        }
    }
    totals
}

/// The analysis view's search condition: an inclusive date range intersected
/// with category-membership and owner-membership predicates. An empty
/// category or owner list means "no restriction".
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EntryFilter {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub categories: Vec<String>,
    pub owners: Vec<String>,
}

impl EntryFilter {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from,
            to,
            categories: Vec::new(),
            owners: Vec::new(),
        }
    }

    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_owners(mut self, owners: Vec<String>) -> Self {
        self.owners = owners;
        self
    }

    pub fn matches(&self, entry: &Entry) -> bool {
        entry.date() >= self.from
            && entry.date() <= self.to
            && (self.categories.is_empty()
                || self.categories.iter().any(|c| c == entry.category()))
            && (self.owners.is_empty() || self.owners.iter().any(|o| o == entry.owner()))
    }
}

/// Returns the entries matching `filter`, in their original order.
pub fn filter_entries(entries: &[Entry], filter: &EntryFilter) -> Vec<Entry> {
    entries
        .iter()
        .filter(|e| filter.matches(e))
        .cloned()
        .collect()
}

/// The distinct owners observed in the data, in first-seen order.
pub fn distinct_owners(entries: &[Entry]) -> Vec<String> {
    let mut owners: Vec<String> = Vec::new();
    for entry in entries {
        if !owners.iter().any(|o| o == entry.owner()) {
            owners.push(entry.owner().to_string());
        }
    }
    owners
}

/// The number of days in the given month.
pub fn last_day_of_month(year: i32, month: u32) -> u32 {
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    next.and_then(|d| d.pred_opt()).map(|d| d.day()).unwrap_or(31)
}

/// Expands each template into one concrete entry for the given month, dated
/// `min(template.day, last day of month)`.
pub fn expand_recurring(
    templates: &[RecurringTemplate],
    year: i32,
    month: u32,
) -> Vec<Entry> {
    let last = last_day_of_month(year, month);
    templates
        .iter()
        .filter_map(|t| {
            let day = t.day().min(last);
            let date = NaiveDate::from_ymd_opt(year, month, day)?;
            Some(Entry::new(
                date,
                t.kind(),
                t.owner(),
                t.category(),
                t.description(),
                t.amount(),
            ))
        })
        .collect()
}

/// The calendar layout of a month: one array per week, Sunday first, with
/// `None` for the cells that pad the first and last weeks.
pub fn month_grid(year: i32, month: u32) -> Vec<[Option<u32>; 7]> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    let last = last_day_of_month(year, month);
    let mut weeks = Vec::new();
    let mut week = [None; 7];
    for day in 1..=last {
        let date = first.with_day(day).unwrap_or(first);
        let slot = date.weekday().num_days_from_sunday() as usize;
        week[slot] = Some(day);
        if slot == 6 {
            weeks.push(week);
            week = [None; 7];
        }
    }
    if week.iter().any(Option::is_some) {
        weeks.push(week);
    }
    weeks
}

/// Per-day totals for every day of the month that has at least one entry.
pub fn month_daily_totals(
    entries: &[Entry],
    year: i32,
    month: u32,
) -> BTreeMap<u32, DayTotals> {
    let mut days: BTreeMap<u32, DayTotals> = BTreeMap::new();
    for entry in entries
        .iter()
        .filter(|e| e.date().year() == year && e.date().month() == month)
    {
        let totals = days.entry(entry.date().day()).or_default();
        match entry.kind() {
            EntryKind::Income => totals.income += entry.amount().value(),
            EntryKind::Expense => totals.expense += entry.amount().value(),
        }
    }
    days
}

/// Fraction of the budget target spent, clamped to 1.0. A zero target reads
/// as no progress rather than a division error.
pub fn budget_progress(expense_total: u64, target: Amount) -> f64 {
    if target.is_zero() {
        return 0.0;
    }
    (expense_total as f64 / target.value() as f64).min(1.0)
}
