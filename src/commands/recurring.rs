//! Recurring-template command handlers.

use crate::args::{ApplyArgs, RecurringAddArgs, RecurringDeleteArgs};
use crate::commands::summary::month_title;
use crate::commands::{render_table, Out};
use crate::model::{categories_for, is_valid_for, Entry, RecurringTemplate};
use crate::store::LedgerStore;
use crate::{Config, Menu, Mode, Result, Session};
use anyhow::ensure;
use chrono::Datelike;
use serde::Serialize;

/// A template paired with the 0-based store row it was read from.
#[derive(Debug, Clone, Serialize)]
pub struct ListedTemplate {
    pub row: usize,
    #[serde(flatten)]
    pub template: RecurringTemplate,
}

/// Defines a new monthly recurring entry. The same write-time category rule
/// as `add` applies.
pub async fn recurring_add(
    config: Config,
    mode: Mode,
    args: RecurringAddArgs,
) -> Result<Out<RecurringTemplate>> {
    let mut session = Session::load(&config).await;
    session.require_unlocked(&config)?;

    ensure!(
        is_valid_for(args.kind(), args.category()),
        "'{}' is not an {} category. Expected one of: {}",
        args.category(),
        args.kind(),
        categories_for(args.kind()).join(", ")
    );

    let template = RecurringTemplate::new(
        args.day(),
        args.kind(),
        args.owner(),
        args.category(),
        args.description(),
        args.amount(),
    );

    let store = LedgerStore::new(config.clone(), mode);
    store.append_template(&template).await?;

    session.set_menu(Menu::Home);
    session.save(&config).await?;

    let message = format!(
        "Saved recurring {} of {} ({}) on day {}",
        template.kind(),
        template.amount(),
        template.category(),
        template.day()
    );
    Ok(Out::new(message, template))
}

/// Shows the defined recurring entries with the row numbers that
/// `recurring delete` takes.
pub async fn recurring_list(config: Config, mode: Mode) -> Result<Out<Vec<ListedTemplate>>> {
    let mut session = Session::load(&config).await;
    session.require_unlocked(&config)?;

    let store = LedgerStore::new(config.clone(), mode);
    let templates = store.list_templates().await;

    session.set_menu(Menu::Home);
    session.save(&config).await?;

    if templates.is_empty() {
        return Ok(Out::new("No recurring entries.".to_string(), Vec::new()));
    }

    let listed: Vec<ListedTemplate> = templates
        .into_iter()
        .enumerate()
        .map(|(row, template)| ListedTemplate { row, template })
        .collect();
    let message = template_table(&listed);
    Ok(Out::new(message, listed))
}

/// Deletes one recurring entry by its 0-based row number.
pub async fn recurring_delete(
    config: Config,
    mode: Mode,
    args: RecurringDeleteArgs,
) -> Result<Out<()>> {
    let mut session = Session::load(&config).await;
    session.require_unlocked(&config)?;

    let store = LedgerStore::new(config.clone(), mode);
    store.delete_template(args.row()).await?;

    session.set_menu(Menu::Home);
    session.save(&config).await?;

    let message = format!(
        "Deleted recurring row {}. Rows after it have shifted up by one.",
        args.row()
    );
    Ok(Out::new_message(message))
}

/// Writes one concrete entry per template into the ledger for the chosen
/// month, clamping day-of-month to the month's last day.
pub async fn recurring_apply(
    config: Config,
    mode: Mode,
    args: ApplyArgs,
) -> Result<Out<Vec<Entry>>> {
    let mut session = Session::load(&config).await;
    session.require_unlocked(&config)?;

    let today = chrono::Local::now().date_naive();
    let year = args.year().unwrap_or_else(|| today.year());
    let month = args.month().unwrap_or_else(|| today.month());

    let store = LedgerStore::new(config.clone(), mode);
    let applied = store.apply_recurring(year, month).await?;

    session.set_menu(Menu::Home);
    session.save(&config).await?;

    let message = format!(
        "Applied {} recurring entr{} for {}",
        applied.len(),
        if applied.len() == 1 { "y" } else { "ies" },
        month_title(year, month)
    );
    Ok(Out::new(message, applied))
}

fn template_table(listed: &[ListedTemplate]) -> String {
    let headers = [
        "Row",
        "Day",
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
                l.template.day().to_string(),
                l.template.kind().to_string(),
                l.template.owner().to_string(),
                l.template.category().to_string(),
                l.template.description().to_string(),
                l.template.amount().to_string(),
            ]
        })
        .collect();
    render_table(&headers, &rows, &[0, 1, 6])
}
