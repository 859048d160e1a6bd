//! Implements the very simple `Sheet` trait using in-memory data for testing
//! purposes.
//!
//! Note: this is compiled even in the "production" version of this app so that
//! we can run the whole app, top-to-bottom, without using Google Sheets.

use crate::api::{Sheet, SheetRange, RECURRING_SHEET};
use crate::Result;
use anyhow::{bail, Context};
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Mutex, MutexGuard, OnceLock};

/// The worksheets of one in-memory spreadsheet.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub(crate) struct TestSheetState {
    /// Rows of the first worksheet, which holds ledger entries.
    pub(crate) ledger: Vec<Vec<String>>,
    /// Rows of the `Recurring` worksheet.
    pub(crate) recurring: Vec<Vec<String>>,
}

/// Spreadsheets live for the whole process so that separate short-lived
/// connections observe each other's writes, keyed by spreadsheet id.
static SPREADSHEETS: OnceLock<Mutex<HashMap<String, TestSheetState>>> = OnceLock::new();

fn spreadsheets() -> MutexGuard<'static, HashMap<String, TestSheetState>> {
    SPREADSHEETS
        .get_or_init(|| Mutex::new(HashMap::new()))
        .lock()
        .unwrap()
}

/// An implementation of the `Sheet` trait that does not use Google sheets.
/// A spreadsheet id seen for the first time is seeded with sample data.
pub(crate) struct TestSheet {
    spreadsheet_id: String,
}

impl TestSheet {
    pub(crate) fn new(spreadsheet_id: impl Into<String>) -> Self {
        let spreadsheet_id = spreadsheet_id.into();
        spreadsheets()
            .entry(spreadsheet_id.clone())
            .or_insert_with(seed_data);
        Self { spreadsheet_id }
    }

    /// Gets the current state of this spreadsheet.
    pub(crate) fn get_state(&self) -> TestSheetState {
        spreadsheets()
            .get(&self.spreadsheet_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Replaces the state of this spreadsheet.
    pub(crate) fn set_state(&self, state: TestSheetState) {
        spreadsheets().insert(self.spreadsheet_id.clone(), state);
    }

    fn with_tab<T>(
        &self,
        tab: Option<&str>,
        f: impl FnOnce(&mut Vec<Vec<String>>) -> Result<T>,
    ) -> Result<T> {
        let mut all = spreadsheets();
        let state = all
            .get_mut(&self.spreadsheet_id)
            .with_context(|| format!("Spreadsheet '{}' not found", self.spreadsheet_id))?;
        match tab {
            None => f(&mut state.ledger),
            Some(RECURRING_SHEET) => f(&mut state.recurring),
            Some(name) => bail!("Sheet '{name}' not found"),
        }
    }
}

#[async_trait::async_trait]
impl Sheet for TestSheet {
    async fn get(&mut self, range: &str) -> Result<Vec<Vec<String>>> {
        let (tab, span) = parse_range(range)?;
        self.with_tab(tab, |rows| {
            let first = span.start_row.unwrap_or(0);
            let rows = rows.iter().skip(first);
            Ok(match span.end_row {
                Some(last) => rows.take(last.saturating_sub(first) + 1).cloned().collect(),
                None => rows.cloned().collect(),
            })
        })
    }

    async fn write_ranges(&mut self, data: &[SheetRange]) -> Result<()> {
        for sheet_range in data {
            let (tab, span) = parse_range(&sheet_range.range)?;
            let start_row = span
                .start_row
                .with_context(|| format!("Range '{}' has no row to write at", sheet_range.range))?;
            self.with_tab(tab, |rows| {
                for (r, value_row) in sheet_range.values.iter().enumerate() {
                    let row_ix = start_row + r;
                    while rows.len() <= row_ix {
                        rows.push(Vec::new());
                    }
                    let row = &mut rows[row_ix];
                    for (c, value) in value_row.iter().enumerate() {
                        let col_ix = span.start_col + c;
                        while row.len() <= col_ix {
                            row.push(String::new());
                        }
                        row[col_ix] = value.clone();
                    }
                }
                Ok(())
            })?;
        }
        Ok(())
    }

    async fn clear_ranges(&mut self, ranges: &[&str]) -> Result<()> {
        for range in ranges {
            let (tab, span) = parse_range(range)?;
            let start_row = span.start_row.unwrap_or(0);
            self.with_tab(tab, |rows| {
                match span.end_row {
                    // Open-ended clears drop every row from the start down.
                    None => rows.truncate(start_row),
                    Some(last) => {
                        for row in rows.iter_mut().skip(start_row).take(last - start_row + 1) {
                            for cell in row.iter_mut() {
                                cell.clear();
                            }
                        }
                    }
                }
                Ok(())
            })?;
        }
        Ok(())
    }
}

/// A parsed A1 span. Rows are 0-based here; `None` means unbounded.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
struct Span {
    start_col: usize,
    start_row: Option<usize>,
    end_row: Option<usize>,
}

/// Splits an A1 range like `Recurring!A2:F` into its optional worksheet name
/// and cell span. Supports the single-column-letter ranges this app uses.
fn parse_range(range: &str) -> Result<(Option<&str>, Span)> {
    let (tab, cells) = match range.split_once('!') {
        Some((tab, cells)) => (Some(tab), cells),
        None => (None, range),
    };
    let (start, end) = match cells.split_once(':') {
        Some((start, end)) => (start, Some(end)),
        None => (cells, None),
    };
    let (start_col, start_row) = parse_cell(start)?;
    let end_row = match end {
        Some(end) => parse_cell(end)?.1,
        // A single-cell range spans exactly its own row.
        None => start_row,
    };
    Ok((
        tab,
        Span {
            start_col,
            start_row,
            end_row,
        },
    ))
}

/// Parses `A2` into (column 0, row 1); a bare column letter has no row.
fn parse_cell(cell: &str) -> Result<(usize, Option<usize>)> {
    let mut chars = cell.chars();
    let letter = chars
        .next()
        .with_context(|| format!("Empty cell reference in '{cell}'"))?;
    if !letter.is_ascii_uppercase() {
        bail!("Cell reference '{cell}' does not start with a column letter");
    }
    let col = (letter as u8 - b'A') as usize;
    let digits = chars.as_str();
    if digits.is_empty() {
        return Ok((col, None));
    }
    let row: usize = digits
        .parse()
        .with_context(|| format!("Invalid row number in cell reference '{cell}'"))?;
    if row == 0 {
        bail!("Row numbers start at 1 in '{cell}'");
    }
    Ok((col, Some(row - 1)))
}

/// Seed worksheets for a fresh test spreadsheet.
fn seed_data() -> TestSheetState {
    TestSheetState {
        ledger: load_csv(LEDGER_DATA).unwrap(),
        recurring: load_csv(RECURRING_DATA).unwrap(),
    }
}

/// Loads data from a CSV-formatted string.
fn load_csv(csv_data: &str) -> Result<Vec<Vec<String>>> {
    let bytes = csv_data.as_bytes();
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false) // Ensure headers are treated as part of the data
        .from_reader(Cursor::new(bytes));

    let mut rows: Vec<Vec<String>> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let row: Vec<String> = record.iter().map(|field| field.to_string()).collect();
        rows.push(row);
    }
    Ok(rows)
}

/// Seed ledger entries.
const LEDGER_DATA: &str = r##"Date,Kind,Owner,Category,Description,Amount
2025-06-02,income,Husband,Salary,June salary,3200000
2025-06-03,expense,Wife,Groceries,farmers market,48200
2025-06-05,expense,Shared,Housing & Utilities,electricity bill,88400
2025-06-07,expense,Husband,Dining Out,friday takeout,32000
2025-06-10,income,Wife,Side Income,freelance article,250000
2025-06-12,expense,Wife,Medical & Health,pharmacy,15600
2025-06-15,expense,Shared,Shopping,summer fans,129000
2025-06-18,expense,Husband,Transportation,transit card top-up,55000
2025-06-21,expense,Shared,Baby & Childcare,diapers,64300
2025-06-25,expense,Shared,Savings,monthly savings transfer,500000
"##;

/// Seed recurring templates.
const RECURRING_DATA: &str = r##"Day,Kind,Owner,Category,Description,Amount
25,expense,Shared,Housing & Utilities,rent,650000
31,expense,Shared,Savings,sweep leftover to savings,200000
10,income,Husband,Salary,payday,3200000
"##;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cell() {
        assert_eq!(parse_cell("A2").unwrap(), (0, Some(1)));
        assert_eq!(parse_cell("F12").unwrap(), (5, Some(11)));
        assert_eq!(parse_cell("F").unwrap(), (5, None));
        assert!(parse_cell("2A").is_err());
        assert!(parse_cell("A0").is_err());
        assert!(parse_cell("").is_err());
    }

    #[test]
    fn test_parse_range_with_tab() {
        let (tab, span) = parse_range("Recurring!A1:F").unwrap();
        assert_eq!(tab, Some("Recurring"));
        assert_eq!(span.start_col, 0);
        assert_eq!(span.start_row, Some(0));
        assert_eq!(span.end_row, None);
    }

    #[test]
    fn test_parse_range_single_cell() {
        let (tab, span) = parse_range("D3").unwrap();
        assert_eq!(tab, None);
        assert_eq!(span.start_col, 3);
        assert_eq!(span.start_row, Some(2));
        assert_eq!(span.end_row, Some(2));
    }

    #[tokio::test]
    async fn test_get_returns_seed_rows() {
        let mut sheet = TestSheet::new("seed-check");
        let rows = sheet.get("A1:F").await.unwrap();
        assert_eq!(rows[0][0], "Date");
        assert!(rows.len() > 1);
        let recurring = sheet.get("Recurring!A1:F").await.unwrap();
        assert_eq!(recurring[0][0], "Day");
    }

    #[tokio::test]
    async fn test_get_unknown_tab_fails() {
        let mut sheet = TestSheet::new("unknown-tab");
        assert!(sheet.get("Budget!A1:F").await.is_err());
    }

    #[tokio::test]
    async fn test_write_single_cell() {
        let mut sheet = TestSheet::new("write-cell");
        sheet
            .write_ranges(&[SheetRange {
                range: "D2".to_string(),
                values: vec![vec!["Shopping".to_string()]],
            }])
            .await
            .unwrap();
        let rows = sheet.get("A1:F").await.unwrap();
        assert_eq!(rows[1][3], "Shopping");
    }

    #[tokio::test]
    async fn test_write_appends_row_beyond_grid() {
        let mut sheet = TestSheet::new("write-append");
        let before = sheet.get("A1:F").await.unwrap().len();
        let row: Vec<String> = ["2025-07-01", "expense", "Wife", "Groceries", "", "100"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        sheet
            .write_ranges(&[SheetRange {
                range: format!("A{n}:F{n}", n = before + 1),
                values: vec![row.clone()],
            }])
            .await
            .unwrap();
        let rows = sheet.get("A1:F").await.unwrap();
        assert_eq!(rows.len(), before + 1);
        assert_eq!(rows[before], row);
    }

    #[tokio::test]
    async fn test_open_ended_clear_truncates() {
        let mut sheet = TestSheet::new("clear-tail");
        sheet.clear_ranges(&["A2:F"]).await.unwrap();
        let rows = sheet.get("A1:F").await.unwrap();
        assert_eq!(rows.len(), 1, "only the header row should remain");
    }
}
