//! Access to the backing spreadsheet through the `Sheet` trait.
//!
//! Ledger entries live on the spreadsheet's first worksheet and are addressed
//! with unqualified A1 ranges; recurring templates live on a worksheet named
//! `Recurring`.

mod auth;
mod google;
mod test_sheet;

use crate::{Config, Result};

#[cfg(test)]
pub(crate) use test_sheet::TestSheetState;
pub(crate) use test_sheet::TestSheet;

/// Name of the worksheet that holds recurring templates.
pub(crate) const RECURRING_SHEET: &str = "Recurring";

/// OAuth scope required for Sheets API access.
const SHEET_SCOPES: &[&str] = &["https://www.googleapis.com/auth/spreadsheets"];

/// Selects the `Sheet` implementation. When `HEARTH_IN_TEST_MODE` is set and
/// non-zero in length the in-memory sheet is used, otherwise Google Sheets.
/// This allows running the whole program without hitting the Google APIs.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub enum Mode {
    #[default]
    Google,
    Test,
}

impl Mode {
    pub fn from_env() -> Mode {
        match std::env::var("HEARTH_IN_TEST_MODE") {
            Ok(value) if !value.is_empty() => Mode::Test,
            _ => Mode::Google,
        }
    }
}

/// A rectangle of cell values targeted at an A1 range.
#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) struct SheetRange {
    pub(crate) range: String,
    pub(crate) values: Vec<Vec<String>>,
}

/// The operations the ledger store needs from a spreadsheet backend.
#[async_trait::async_trait]
pub(crate) trait Sheet {
    /// Fetches the cell values in `range`, as rows of strings.
    async fn get(&mut self, range: &str) -> Result<Vec<Vec<String>>>;

    /// Writes each rectangle of values at its range.
    async fn write_ranges(&mut self, data: &[SheetRange]) -> Result<()>;

    /// Clears the cell contents of each range.
    async fn clear_ranges(&mut self, ranges: &[&str]) -> Result<()>;
}

/// Opens a connection to the configured spreadsheet using the implementation
/// selected by `mode`.
pub(crate) async fn connect(config: &Config, mode: Mode) -> Result<Box<dyn Sheet + Send>> {
    match mode {
        Mode::Google => Ok(Box::new(google::GoogleSheet::new(config.clone()).await?)),
        Mode::Test => Ok(Box::new(TestSheet::new(config.spreadsheet_id()))),
    }
}
