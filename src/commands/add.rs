//! Add command handler.

use crate::args::AddArgs;
use crate::commands::Out;
use crate::model::{categories_for, is_valid_for, Entry};
use crate::store::LedgerStore;
use crate::{Config, Menu, Mode, Result, Session};
use anyhow::ensure;

/// Records one entry at the end of the ledger.
///
/// The category must belong to the enumeration matching the entry's kind;
/// this is the only place that rule is enforced (`edit` accepts the union of
/// both category sets).
pub async fn add(config: Config, mode: Mode, args: AddArgs) -> Result<Out<Entry>> {
    let mut session = Session::load(&config).await;
    session.require_unlocked(&config)?;

    ensure!(
        is_valid_for(args.kind(), args.category()),
        "'{}' is not an {} category. Expected one of: {}",
        args.category(),
        args.kind(),
        categories_for(args.kind()).join(", ")
    );

    let date = args
        .date()
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let entry = Entry::new(
        date,
        args.kind(),
        args.owner(),
        args.category(),
        args.description(),
        args.amount(),
    );

    let store = LedgerStore::new(config.clone(), mode);
    store.append(&entry).await?;

    session.set_menu(Menu::Home);
    session.save(&config).await?;

    let message = format!(
        "Saved {} of {} ({}) dated {}",
        entry.kind(),
        entry.amount(),
        entry.category(),
        entry.date()
    );
    Ok(Out::new(message, entry))
}
