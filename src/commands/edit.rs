//! Edit command handler.

use crate::args::EditArgs;
use crate::commands::Out;
use crate::model::{all_categories, EntryColumn, EntryKind};
use crate::store::LedgerStore;
use crate::{Config, Menu, Mode, Result, Session};
use anyhow::ensure;
use std::str::FromStr;

/// Changes one field of one entry row.
///
/// Unlike `add`, the category check here accepts the union of the income and
/// expense sets, so an edit can leave an entry with a category that does not
/// match its kind. Amount values are normalized by the store; other fields
/// are written as given.
pub async fn edit(config: Config, mode: Mode, args: EditArgs) -> Result<Out<()>> {
    let mut session = Session::load(&config).await;
    session.require_unlocked(&config)?;

    match args.field() {
        EntryColumn::Kind => {
            ensure!(
                EntryKind::from_str(args.value()).is_ok(),
                "Kind must be 'expense' or 'income', got '{}'",
                args.value()
            );
        }
        EntryColumn::Category => {
            let all = all_categories();
            ensure!(
                all.contains(&args.value()),
                "'{}' is not a category. Expected one of: {}",
                args.value(),
                all.join(", ")
            );
        }
        _ => {}
    }

    let store = LedgerStore::new(config.clone(), mode);
    store
        .update_field(args.row(), args.field(), args.value())
        .await?;

    session.set_menu(Menu::Home);
    session.save(&config).await?;

    let message = format!("Updated {} of row {}", args.field(), args.row());
    Ok(Out::new_message(message))
}
