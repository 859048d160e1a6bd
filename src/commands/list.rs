//! List command handler.

use crate::args::ListArgs;
use crate::commands::{entry_table, recent_first, ListedEntry, Out};
use crate::store::LedgerStore;
use crate::{Config, Menu, Mode, Result, Session};

/// Shows the most recent entries with the row numbers that `edit` and
/// `delete` take. Row numbers are positions, so any deletion renumbers the
/// rows after it.
pub async fn list(config: Config, mode: Mode, args: ListArgs) -> Result<Out<Vec<ListedEntry>>> {
    let mut session = Session::load(&config).await;
    session.require_unlocked(&config)?;

    let store = LedgerStore::new(config.clone(), mode);
    let entries = store.list_all().await;

    session.set_menu(Menu::Home);
    session.save(&config).await?;

    if entries.is_empty() {
        return Ok(Out::new("No data.".to_string(), Vec::new()));
    }

    let mut listed = recent_first(entries);
    listed.truncate(args.limit());
    let message = entry_table(&listed);
    Ok(Out::new(message, listed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::add;
    use crate::model::{Amount, EntryKind};
    use crate::test::TestEnv;
    use chrono::NaiveDate;

    async fn seed(env: &TestEnv, day: u32, amount: u64) {
        let args = crate::args::AddArgs::new(
            NaiveDate::from_ymd_opt(2025, 7, day),
            EntryKind::Expense,
            "Wife",
            "Groceries",
            "",
            Amount::new(amount),
        );
        add(env.config(), Mode::Test, args).await.unwrap();
    }

    #[tokio::test]
    async fn test_list_empty_ledger() {
        let env = TestEnv::new().await;
        let out = list(env.config(), Mode::Test, ListArgs::new(15)).await.unwrap();
        assert_eq!(out.message(), "No data.");
        assert!(out.structure().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_newest_first_with_row_numbers() {
        let env = TestEnv::new().await;
        seed(&env, 1, 100).await;
        seed(&env, 9, 200).await;
        seed(&env, 5, 300).await;

        let out = list(env.config(), Mode::Test, ListArgs::new(15)).await.unwrap();

        let rows: Vec<usize> = out.structure().unwrap().iter().map(|l| l.row).collect();
        assert_eq!(rows, vec![1, 2, 0]);
        assert!(out.message().contains("2025-07-09"));
    }

    #[tokio::test]
    async fn test_list_honors_limit() {
        let env = TestEnv::new().await;
        for day in 1..=4 {
            seed(&env, day, 100).await;
        }

        let out = list(env.config(), Mode::Test, ListArgs::new(2)).await.unwrap();

        assert_eq!(out.structure().unwrap().len(), 2);
    }
}
