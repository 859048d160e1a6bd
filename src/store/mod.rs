//! The ledger store: row-oriented access to the entry and recurring-template
//! worksheets.
//!
//! Every operation opens a fresh short-lived connection, one synchronous round
//! trip per user action. Read failures of any kind (missing credentials,
//! missing sheet, malformed header, unparseable row) downgrade to an empty
//! result so the dashboard always renders; write failures surface to the
//! caller.

use crate::api::{self, Mode, Sheet, SheetRange, RECURRING_SHEET};
use crate::model::{
    is_entry_header, is_template_header, Amount, Entry, EntryColumn, RecurringTemplate,
    ENTRY_HEADERS, TEMPLATE_HEADERS,
};
use crate::views;
use crate::{Config, Result};
use anyhow::{ensure, Context};
use std::str::FromStr;
use tracing::debug;

pub struct LedgerStore {
    config: Config,
    mode: Mode,
}

impl LedgerStore {
    pub fn new(config: Config, mode: Mode) -> Self {
        Self { config, mode }
    }

    async fn connect(&self) -> Result<Box<dyn Sheet + Send>> {
        api::connect(&self.config, self.mode).await
    }

    /// Every stored entry in persisted order. Any backend or parse failure
    /// reads as an empty ledger.
    pub async fn list_all(&self) -> Vec<Entry> {
        match self.try_list_all().await {
            Ok(entries) => entries,
            Err(e) => {
                debug!("Reading the ledger as empty: {e:#}");
                Vec::new()
            }
        }
    }

    async fn try_list_all(&self) -> Result<Vec<Entry>> {
        let mut sheet = self.connect().await?;
        let rows = sheet.get(&range_all(None)).await?;
        parse_rows(rows, is_entry_header, Entry::from_row, "ledger")
    }

    /// Adds one entry at the end of the ledger sheet, writing the header row
    /// first if the sheet is empty. Durability is not confirmed; callers
    /// re-fetch to verify.
    pub async fn append(&self, entry: &Entry) -> Result<()> {
        self.append_row(None, &ENTRY_HEADERS, entry.to_row()).await
    }

    /// Mutates one field of the 0-based data row `row_index`. Amount values
    /// have thousands separators stripped and are coerced to an integer, with
    /// the raw string written as-is if it does not parse.
    pub async fn update_field(
        &self,
        row_index: usize,
        field: EntryColumn,
        value: &str,
    ) -> Result<()> {
        let value = if field == EntryColumn::Amount {
            normalize_amount(value)
        } else {
            value.to_string()
        };
        let mut sheet = self.connect().await?;
        let cell = cell_range(None, field.letter(), data_row_number(row_index));
        sheet
            .write_ranges(&[SheetRange {
                range: cell,
                values: vec![vec![value]],
            }])
            .await
    }

    /// Removes the 0-based data row `row_index`. Later rows shift up by one,
    /// invalidating previously displayed indices.
    pub async fn delete(&self, row_index: usize) -> Result<()> {
        self.delete_row(None, row_index).await
    }

    /// Every stored recurring template, with the same swallow-to-empty
    /// contract as `list_all`.
    pub async fn list_templates(&self) -> Vec<RecurringTemplate> {
        match self.try_list_templates().await {
            Ok(templates) => templates,
            Err(e) => {
                debug!("Reading the recurring sheet as empty: {e:#}");
                Vec::new()
            }
        }
    }

    async fn try_list_templates(&self) -> Result<Vec<RecurringTemplate>> {
        let mut sheet = self.connect().await?;
        let rows = sheet.get(&range_all(Some(RECURRING_SHEET))).await?;
        parse_rows(
            rows,
            is_template_header,
            RecurringTemplate::from_row,
            "recurring",
        )
    }

    /// Adds one template at the end of the recurring sheet.
    pub async fn append_template(&self, template: &RecurringTemplate) -> Result<()> {
        self.append_row(
            Some(RECURRING_SHEET),
            &TEMPLATE_HEADERS,
            template.to_row(),
        )
        .await
    }

    /// Removes the 0-based template row `row_index`.
    pub async fn delete_template(&self, row_index: usize) -> Result<()> {
        self.delete_row(Some(RECURRING_SHEET), row_index).await
    }

    /// Expands every stored template for the given month and appends the
    /// produced entries to the ledger. Returns what was appended.
    pub async fn apply_recurring(&self, year: i32, month: u32) -> Result<Vec<Entry>> {
        let templates = self.list_templates().await;
        let entries = views::expand_recurring(&templates, year, month);
        for entry in &entries {
            self.append(entry).await?;
        }
        Ok(entries)
    }

    async fn append_row(
        &self,
        tab: Option<&str>,
        headers: &[&str],
        row: Vec<String>,
    ) -> Result<()> {
        let mut sheet = self.connect().await?;
        let existing = sheet.get(&range_all(tab)).await.unwrap_or_default();

        let mut data = Vec::new();
        let mut next_row = existing.len() + 1;
        if existing.is_empty() {
            data.push(SheetRange {
                range: row_range(tab, 1),
                values: vec![headers.iter().map(|h| h.to_string()).collect()],
            });
            next_row = 2;
        }
        data.push(SheetRange {
            range: row_range(tab, next_row),
            values: vec![row],
        });
        sheet.write_ranges(&data).await
    }

    async fn delete_row(&self, tab: Option<&str>, row_index: usize) -> Result<()> {
        let mut sheet = self.connect().await?;
        let rows = sheet.get(&range_all(tab)).await?;
        let data_len = rows.len().saturating_sub(1);
        ensure!(
            row_index < data_len,
            "Row index {row_index} is out of range (the sheet has {data_len} data rows)"
        );

        let mut data_rows: Vec<Vec<String>> = rows.into_iter().skip(1).collect();
        data_rows.remove(row_index);

        // The values API has no structural row delete, so rewrite the data
        // rows below the header.
        sheet.clear_ranges(&[&clear_data_range(tab)]).await?;
        if !data_rows.is_empty() {
            let last_row = data_rows.len() + 1;
            sheet
                .write_ranges(&[SheetRange {
                    range: span_range(tab, 2, last_row),
                    values: data_rows,
                }])
                .await?;
        }
        Ok(())
    }
}

/// Parses header-plus-data rows into records, requiring the fixed header row.
fn parse_rows<T>(
    rows: Vec<Vec<String>>,
    is_header: impl Fn(&[String]) -> bool,
    parse: impl Fn(&[String]) -> Result<T>,
    what: &str,
) -> Result<Vec<T>> {
    let mut iter = rows.into_iter();
    let header = iter
        .next()
        .with_context(|| format!("The {what} sheet is empty"))?;
    ensure!(
        is_header(&header),
        "The {what} sheet is missing its header row"
    );
    iter.filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .map(|row| parse(&row))
        .collect()
}

/// Strips thousands separators and coerces to an integer, falling back to the
/// raw string when it does not parse.
fn normalize_amount(raw: &str) -> String {
    match Amount::from_str(raw) {
        Ok(amount) => amount.plain(),
        Err(_) => raw.to_string(),
    }
}

/// Sheet row number (1-based, after the header) for a 0-based data row index.
fn data_row_number(row_index: usize) -> usize {
    row_index + 2
}

fn qualify(tab: Option<&str>, range: String) -> String {
    match tab {
        Some(tab) => format!("{tab}!{range}"),
        None => range,
    }
}

fn range_all(tab: Option<&str>) -> String {
    qualify(tab, "A1:F".to_string())
}

fn row_range(tab: Option<&str>, row: usize) -> String {
    qualify(tab, format!("A{row}:F{row}"))
}

fn span_range(tab: Option<&str>, first_row: usize, last_row: usize) -> String {
    qualify(tab, format!("A{first_row}:F{last_row}"))
}

fn cell_range(tab: Option<&str>, letter: char, row: usize) -> String {
    qualify(tab, format!("{letter}{row}"))
}

fn clear_data_range(tab: Option<&str>) -> String {
    qualify(tab, "A2:F".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::TestSheetState;
    use crate::model::EntryKind;
    use crate::test::TestEnv;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_entry() -> Entry {
        Entry::new(
            date(2025, 7, 4),
            EntryKind::Expense,
            "Wife",
            "Groceries",
            "corner shop",
            Amount::new(12_300),
        )
    }

    #[tokio::test]
    async fn test_append_then_list_roundtrip() {
        let env = TestEnv::new().await;
        let store = env.store();
        let entry = sample_entry();

        store.append(&entry).await.unwrap();

        let listed = store.list_all().await;
        assert!(listed.contains(&entry));
    }

    #[tokio::test]
    async fn test_append_writes_header_on_empty_sheet() {
        let env = TestEnv::new().await;
        env.set_state(TestSheetState::default());
        let store = env.store();

        store.append(&sample_entry()).await.unwrap();

        let state = env.get_state();
        assert_eq!(state.ledger.len(), 2);
        assert_eq!(state.ledger[0], ENTRY_HEADERS.map(String::from).to_vec());
    }

    #[tokio::test]
    async fn test_list_all_empty_when_sheet_has_no_header() {
        let env = TestEnv::new().await;
        env.set_state(TestSheetState {
            ledger: vec![vec!["What".to_string(), "Ever".to_string()]],
            ..env.get_state()
        });
        assert!(env.store().list_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_list_all_empty_when_any_row_is_malformed() {
        let env = TestEnv::new().await;
        let store = env.store();
        store.append(&sample_entry()).await.unwrap();

        let mut state = env.get_state();
        state.ledger.push(vec!["not-a-date".to_string(), "expense".to_string()]);
        env.set_state(state);

        assert!(store.list_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_list_all_empty_without_credentials_in_google_mode() {
        let env = TestEnv::new().await;
        // Google mode with no service-account key configured: the connection
        // fails and the ledger reads as empty.
        let store = LedgerStore::new(env.config(), Mode::Google);
        assert!(store.list_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_delete_shifts_later_rows_up() {
        let env = TestEnv::new().await;
        let store = env.store();
        for day in 1..=3 {
            let mut entry = sample_entry();
            entry.date = date(2025, 7, day);
            store.append(&entry).await.unwrap();
        }

        let before = store.list_all().await;
        store.delete(0).await.unwrap();
        let after = store.list_all().await;

        assert_eq!(after.len(), before.len() - 1);
        assert_eq!(after[0], before[1]);
    }

    #[tokio::test]
    async fn test_delete_out_of_range_is_an_error() {
        let env = TestEnv::new().await;
        let store = env.store();
        store.append(&sample_entry()).await.unwrap();

        let result = store.delete(5).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("out of range"));
    }

    #[tokio::test]
    async fn test_update_field_normalizes_amount() {
        let env = TestEnv::new().await;
        let store = env.store();
        store.append(&sample_entry()).await.unwrap();

        store
            .update_field(0, EntryColumn::Amount, "1,000")
            .await
            .unwrap();

        let listed = store.list_all().await;
        assert_eq!(listed[0].amount().value(), 1000);
        // The cell itself holds the separator-free digits.
        assert_eq!(env.get_state().ledger[1][5], "1000");
    }

    #[tokio::test]
    async fn test_update_field_amount_falls_back_to_raw_string() {
        let env = TestEnv::new().await;
        let store = env.store();
        store.append(&sample_entry()).await.unwrap();

        store
            .update_field(0, EntryColumn::Amount, "a bunch")
            .await
            .unwrap();

        assert_eq!(env.get_state().ledger[1][5], "a bunch");
        // The unparseable amount poisons the whole read, per the
        // all-or-empty loading rule.
        assert!(store.list_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_update_field_category() {
        let env = TestEnv::new().await;
        let store = env.store();
        store.append(&sample_entry()).await.unwrap();

        store
            .update_field(0, EntryColumn::Category, "Shopping")
            .await
            .unwrap();

        let listed = store.list_all().await;
        assert_eq!(listed[0].category(), "Shopping");
    }

    #[tokio::test]
    async fn test_template_roundtrip_and_delete() {
        let env = TestEnv::new().await;
        let store = env.store();
        let rent = RecurringTemplate::new(
            25,
            EntryKind::Expense,
            "Shared",
            "Housing & Utilities",
            "rent",
            Amount::new(650_000),
        );
        let savings = RecurringTemplate::new(
            1,
            EntryKind::Expense,
            "Shared",
            "Savings",
            "auto-transfer",
            Amount::new(100_000),
        );

        store.append_template(&rent).await.unwrap();
        store.append_template(&savings).await.unwrap();
        assert_eq!(store.list_templates().await, vec![rent, savings.clone()]);

        store.delete_template(0).await.unwrap();
        assert_eq!(store.list_templates().await, vec![savings]);
    }

    #[tokio::test]
    async fn test_apply_recurring_appends_clamped_entries() {
        let env = TestEnv::new().await;
        let store = env.store();
        store
            .append_template(&RecurringTemplate::new(
                31,
                EntryKind::Expense,
                "Shared",
                "Savings",
                "sweep",
                Amount::new(200_000),
            ))
            .await
            .unwrap();

        let applied = store.apply_recurring(2025, 6).await.unwrap();
        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].date(), date(2025, 6, 30));

        let listed = store.list_all().await;
        assert!(listed.contains(&applied[0]));
    }
}
