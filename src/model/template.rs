use crate::model::{Amount, EntryKind};
use crate::Result;
use anyhow::{anyhow, bail, ensure, Context};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Represents a single data row from the recurring-templates sheet.
///
/// A template is a monthly-recurring entry definition: the `day` field is the
/// day-of-month the produced entry should carry, clamped to the month's last
/// day when the month is shorter.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RecurringTemplate {
    pub(crate) day: u32,
    pub(crate) kind: EntryKind,
    pub(crate) owner: String,
    pub(crate) category: String,
    pub(crate) description: String,
    pub(crate) amount: Amount,
}

impl RecurringTemplate {
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

    /// Parses one data row of the recurring sheet.
    pub fn from_row(values: &[String]) -> Result<Self> {
        let cell =
            |col: TemplateColumn| values.get(col.index()).map(String::as_str).unwrap_or("");

        let day: u32 = cell(TemplateColumn::Day)
            .trim()
            .parse()
            .with_context(|| format!("Invalid day cell '{}'", cell(TemplateColumn::Day)))?;
        ensure!(
            (1..=31).contains(&day),
            "Day-of-month {day} is outside 1-31"
        );
        let kind = EntryKind::from_str(cell(TemplateColumn::Kind))
            .map_err(|_| anyhow!("Invalid kind cell '{}'", cell(TemplateColumn::Kind)))?;
        let amount = Amount::from_str(cell(TemplateColumn::Amount))
            .with_context(|| format!("Invalid amount cell '{}'", cell(TemplateColumn::Amount)))?;

        Ok(Self {
            day,
            kind,
            owner: cell(TemplateColumn::Owner).to_string(),
            category: cell(TemplateColumn::Category).to_string(),
            description: cell(TemplateColumn::Description).to_string(),
            amount,
        })
    }

    /// The sheet-cell rendition of this template, in header order.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.day.to_string(),
            self.kind.to_string(),
            self.owner.clone(),
            self.category.clone(),
            self.description.clone(),
            self.amount.plain(),
        ]
    }
}

/// The fixed columns of the recurring sheet, in sheet order.
#[derive(
    Default, Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TemplateColumn {
    #[default]
    Day,
    Kind,
    Owner,
    Category,
    Description,
    Amount,
}

serde_plain::derive_display_from_serialize!(TemplateColumn);
serde_plain::derive_fromstr_from_deserialize!(TemplateColumn);

impl TemplateColumn {
    pub fn from_header(header: impl AsRef<str>) -> Result<TemplateColumn> {
        match header.as_ref() {
            DAY_STR => Ok(TemplateColumn::Day),
            KIND_STR => Ok(TemplateColumn::Kind),
            OWNER_STR => Ok(TemplateColumn::Owner),
            CATEGORY_STR => Ok(TemplateColumn::Category),
            DESCRIPTION_STR => Ok(TemplateColumn::Description),
            AMOUNT_STR => Ok(TemplateColumn::Amount),
            bad => bail!("Invalid recurring column name '{bad}'"),
        }
    }

    /// 0-based column index within the sheet.
    pub fn index(&self) -> usize {
        *self as usize
    }
}

pub(super) const DAY_STR: &str = "Day";
pub(super) const KIND_STR: &str = "Kind";
pub(super) const OWNER_STR: &str = "Owner";
pub(super) const CATEGORY_STR: &str = "Category";
pub(super) const DESCRIPTION_STR: &str = "Description";
pub(super) const AMOUNT_STR: &str = "Amount";

/// The fixed header row of the recurring sheet.
pub const TEMPLATE_HEADERS: [&str; 6] = [
    DAY_STR,
    KIND_STR,
    OWNER_STR,
    CATEGORY_STR,
    DESCRIPTION_STR,
    AMOUNT_STR,
];

/// Returns true if `row` is exactly the recurring header row.
pub(crate) fn is_template_header(row: &[String]) -> bool {
    row.len() == TEMPLATE_HEADERS.len()
        && row.iter().zip(TEMPLATE_HEADERS).all(|(cell, h)| cell == h)
}
