//! Command handlers for the hearth CLI.
//!
//! This module contains implementations for all CLI subcommands.

mod add;
mod calendar;
mod delete;
mod edit;
mod init;
mod list;
mod recurring;
mod report;
mod summary;
mod unlock;

use crate::model::Entry;
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info};

pub use add::add;
pub use calendar::calendar;
pub use delete::delete;
pub use edit::edit;
pub use init::init;
pub use list::list;
pub use recurring::{recurring_add, recurring_apply, recurring_delete, recurring_list};
pub use report::report;
pub use summary::summary;
pub use unlock::unlock;

/// The output type for a command. This allows the command to return a
/// consistent message and, optionally, structured data.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the
    /// command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to `info!` and the structured data (if it exists) as
    /// JSON to `debug!`.
    pub fn print(&self) {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

/// An entry paired with the 0-based store row it was read from, which is what
/// `edit` and `delete` take.
#[derive(Debug, Clone, Serialize)]
pub struct ListedEntry {
    pub row: usize,
    #[serde(flatten)]
    pub entry: Entry,
}

/// Pairs entries with their store rows and orders them newest date first,
/// matching the dashboard's "recent entries" table.
pub(crate) fn recent_first(entries: Vec<Entry>) -> Vec<ListedEntry> {
    let mut listed: Vec<ListedEntry> = entries
        .into_iter()
        .enumerate()
        .map(|(row, entry)| ListedEntry { row, entry })
        .collect();
    listed.sort_by(|a, b| b.entry.date().cmp(&a.entry.date()));
    listed
}

/// Renders a padded text table. Columns named in `right_align` are
/// right-aligned (row numbers and amounts).
pub(crate) fn render_table(
    headers: &[&str],
    rows: &[Vec<String>],
    right_align: &[usize],
) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (ix, cell) in row.iter().enumerate() {
            if ix < widths.len() {
                widths[ix] = widths[ix].max(cell.len());
            }
        }
    }

    let render_row = |cells: &[String]| -> String {
        let mut line = String::new();
        for (ix, cell) in cells.iter().enumerate() {
            if ix > 0 {
                line.push_str("  ");
            }
            let width = widths.get(ix).copied().unwrap_or(0);
            if right_align.contains(&ix) {
                line.push_str(&format!("{cell:>width$}"));
            } else {
                line.push_str(&format!("{cell:<width$}"));
            }
        }
        line.trim_end().to_string()
    };

    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let mut lines = vec![render_row(&header_cells)];
    for row in rows {
        lines.push(render_row(row));
    }
    lines.join("\n")
}

/// The table of entries shown by `list`, `calendar --date` and `report`.
pub(crate) fn entry_table(listed: &[ListedEntry]) -> String {
    let headers = [
        "Row",
        "Date",
        "Kind",
        "Owner",
        "Category",
        "Description",
        "Amount",
    ];
    let rows: Vec<Vec<String>> = listed
        .iter()
        .map(|l| {
            vec![
                l.row.to_string(),
                l.entry.date().to_string(),
                l.entry.kind().to_string(),
                l.entry.owner().to_string(),
                l.entry.category().to_string(),
                l.entry.description().to_string(),
                l.entry.amount().to_string(),
            ]
        })
        .collect();
    render_table(&headers, &rows, &[0, 6])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Amount, EntryKind};
    use chrono::NaiveDate;

    fn entry(d: u32) -> Entry {
        Entry::new(
            NaiveDate::from_ymd_opt(2025, 6, d).unwrap(),
            EntryKind::Expense,
            "Wife",
            "Groceries",
            "x",
            Amount::new(100),
        )
    }

    #[test]
    fn test_recent_first_orders_by_date_desc() {
        let listed = recent_first(vec![entry(3), entry(7), entry(1)]);
        let rows: Vec<usize> = listed.iter().map(|l| l.row).collect();
        assert_eq!(rows, vec![1, 0, 2]);
    }

    #[test]
    fn test_recent_first_keeps_row_order_on_ties() {
        let listed = recent_first(vec![entry(3), entry(3)]);
        let rows: Vec<usize> = listed.iter().map(|l| l.row).collect();
        assert_eq!(rows, vec![0, 1]);
    }

    #[test]
    fn test_render_table_alignment() {
        let table = render_table(
            &["Row", "Name"],
            &[
                vec!["1".to_string(), "short".to_string()],
                vec!["10".to_string(), "longer name".to_string()],
            ],
            &[0],
        );
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "Row  Name");
        assert_eq!(lines[1], "  1  short");
        assert_eq!(lines[2], " 10  longer name");
    }

    #[test]
    fn test_entry_table_has_header_and_rows() {
        let listed = recent_first(vec![entry(3)]);
        let table = entry_table(&listed);
        assert!(table.starts_with("Row"));
        assert!(table.contains("2025-06-03"));
        assert!(table.contains("Groceries"));
    }
}
