use crate::model::Amount;
use crate::Result;
use anyhow::{anyhow, bail, Context};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The date format used in sheet cells.
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// Whether a ledger entry is money going out or coming in.
#[derive(
    Default, Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    #[default]
    Expense,
    Income,
}

serde_plain::derive_display_from_serialize!(EntryKind);
serde_plain::derive_fromstr_from_deserialize!(EntryKind);

/// Represents a single data row from the ledger sheet.
///
/// An entry has no surrogate key; its identity is its 0-based position among
/// the data rows, which shifts when earlier rows are deleted.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Entry {
    pub(crate) date: NaiveDate,
    pub(crate) kind: EntryKind,
    pub(crate) owner: String,
    pub(crate) category: String,
    pub(crate) description: String,
    pub(crate) amount: Amount,
}

impl Entry {
    pub fn new(
        date: NaiveDate,
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

    pub fn date(&self) -> NaiveDate {
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

    /// Parses one data row. Cells beyond the row's length read as empty, the
    /// way the values API reports rows with blank trailing cells.
    pub fn from_row(values: &[String]) -> Result<Self> {
        let cell = |col: EntryColumn| values.get(col.index()).map(String::as_str).unwrap_or("");

        let date = NaiveDate::parse_from_str(cell(EntryColumn::Date), DATE_FORMAT)
            .with_context(|| format!("Invalid date cell '{}'", cell(EntryColumn::Date)))?;
        let kind = EntryKind::from_str(cell(EntryColumn::Kind))
            .map_err(|_| anyhow!("Invalid kind cell '{}'", cell(EntryColumn::Kind)))?;
        let amount = Amount::from_str(cell(EntryColumn::Amount))
            .with_context(|| format!("Invalid amount cell '{}'", cell(EntryColumn::Amount)))?;

        Ok(Self {
            date,
            kind,
            owner: cell(EntryColumn::Owner).to_string(),
            category: cell(EntryColumn::Category).to_string(),
            description: cell(EntryColumn::Description).to_string(),
            amount,
        })
    }

    /// The sheet-cell rendition of this entry, in header order.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.date.format(DATE_FORMAT).to_string(),
            self.kind.to_string(),
            self.owner.clone(),
            self.category.clone(),
            self.description.clone(),
            self.amount.plain(),
        ]
    }
}

/// The fixed columns of the ledger sheet, in sheet order.
#[derive(
    Default, Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EntryColumn {
    #[default]
    Date,
    Kind,
    Owner,
    Category,
    Description,
    Amount,
}

serde_plain::derive_display_from_serialize!(EntryColumn);
serde_plain::derive_fromstr_from_deserialize!(EntryColumn);

impl EntryColumn {
    pub fn from_header(header: impl AsRef<str>) -> Result<EntryColumn> {
        match header.as_ref() {
            DATE_STR => Ok(EntryColumn::Date),
            KIND_STR => Ok(EntryColumn::Kind),
            OWNER_STR => Ok(EntryColumn::Owner),
            CATEGORY_STR => Ok(EntryColumn::Category),
            DESCRIPTION_STR => Ok(EntryColumn::Description),
            AMOUNT_STR => Ok(EntryColumn::Amount),
            bad => bail!("Invalid ledger column name '{bad}'"),
        }
    }

    pub fn as_header_str(&self) -> &'static str {
        match self {
            EntryColumn::Date => DATE_STR,
            EntryColumn::Kind => KIND_STR,
            EntryColumn::Owner => OWNER_STR,
            EntryColumn::Category => CATEGORY_STR,
            EntryColumn::Description => DESCRIPTION_STR,
            EntryColumn::Amount => AMOUNT_STR,
        }
    }

    /// 0-based column index within the sheet.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// The A1-notation column letter.
    pub fn letter(&self) -> char {
        (b'A' + self.index() as u8) as char
    }
}

pub(super) const DATE_STR: &str = "Date";
pub(super) const KIND_STR: &str = "Kind";
pub(super) const OWNER_STR: &str = "Owner";
pub(super) const CATEGORY_STR: &str = "Category";
pub(super) const DESCRIPTION_STR: &str = "Description";
pub(super) const AMOUNT_STR: &str = "Amount";

/// The fixed header row of the ledger sheet.
pub const ENTRY_HEADERS: [&str; 6] = [
    DATE_STR,
    KIND_STR,
    OWNER_STR,
    CATEGORY_STR,
    DESCRIPTION_STR,
    AMOUNT_STR,
];

/// Returns true if `row` is exactly the ledger header row.
pub(crate) fn is_entry_header(row: &[String]) -> bool {
    row.len() == ENTRY_HEADERS.len() && row.iter().zip(ENTRY_HEADERS).all(|(cell, h)| cell == h)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_from_row() {
        let entry = Entry::from_row(&row(&[
            "2025-03-14",
            "expense",
            "Wife",
            "Groceries",
            "weekly shop",
            "84,500",
        ]))
        .unwrap();
        assert_eq!(entry.date(), NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());
        assert_eq!(entry.kind(), EntryKind::Expense);
        assert_eq!(entry.owner(), "Wife");
        assert_eq!(entry.category(), "Groceries");
        assert_eq!(entry.description(), "weekly shop");
        assert_eq!(entry.amount().value(), 84500);
    }

    #[test]
    fn test_row_roundtrip() {
        let entry = Entry::new(
            NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
            EntryKind::Income,
            "Husband",
            "Salary",
            "January pay",
            Amount::new(3_200_000),
        );
        let parsed = Entry::from_row(&entry.to_row()).unwrap();
        assert_eq!(entry, parsed);
    }

    #[test]
    fn test_from_row_short_row_reads_empty_cells() {
        // A row that ends early still parses; the amount cell reads as zero.
        let entry = Entry::from_row(&row(&["2025-03-14", "income", "Shared"])).unwrap();
        assert_eq!(entry.category(), "");
        assert!(entry.amount().is_zero());
    }

    #[test]
    fn test_from_row_bad_date() {
        let result = Entry::from_row(&row(&["14/03/2025", "expense", "", "", "", "1"]));
        assert!(result.is_err());
    }

    #[test]
    fn test_from_row_bad_kind() {
        let result = Entry::from_row(&row(&["2025-03-14", "spending", "", "", "", "1"]));
        assert!(result.is_err());
    }

    #[test]
    fn test_kind_strings() {
        assert_eq!(EntryKind::Expense.to_string(), "expense");
        assert_eq!(EntryKind::from_str("income").unwrap(), EntryKind::Income);
        assert!(EntryKind::from_str("Income ").is_err());
    }

    #[test]
    fn test_column_letters() {
        assert_eq!(EntryColumn::Date.letter(), 'A');
        assert_eq!(EntryColumn::Amount.letter(), 'F');
    }

    #[test]
    fn test_column_from_header() {
        for header in ENTRY_HEADERS {
            let col = EntryColumn::from_header(header).unwrap();
            assert_eq!(col.as_header_str(), header);
        }
        assert!(EntryColumn::from_header("Memo").is_err());
    }

    #[test]
    fn test_is_entry_header() {
        let header: Vec<String> = ENTRY_HEADERS.iter().map(|s| s.to_string()).collect();
        assert!(is_entry_header(&header));
        assert!(!is_entry_header(&row(&["Date", "Kind"])));
        assert!(!is_entry_header(&row(&[
            "date", "kind", "owner", "category", "description", "amount",
        ])));
    }
}
