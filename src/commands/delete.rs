//! Delete command handler.

use crate::args::DeleteArgs;
use crate::commands::Out;
use crate::store::LedgerStore;
use crate::{Config, Menu, Mode, Result, Session};

/// Deletes one entry row by its 0-based row number.
pub async fn delete(config: Config, mode: Mode, args: DeleteArgs) -> Result<Out<()>> {
    let mut session = Session::load(&config).await;
    session.require_unlocked(&config)?;

    let store = LedgerStore::new(config.clone(), mode);
    store.delete(args.row()).await?;

    session.set_menu(Menu::Report);
    session.save(&config).await?;

    let message = format!(
        "Deleted row {}. Rows after it have shifted up by one.",
        args.row()
    );
    Ok(Out::new_message(message))
}
