//! Summary command handler: the home view's monthly totals and budget meter.

use crate::args::SummaryArgs;
use crate::commands::Out;
use crate::model::{Amount, EntryKind};
use crate::store::LedgerStore;
use crate::views;
use crate::{Config, Menu, Mode, Result, Session};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

const PROGRESS_BAR_WIDTH: usize = 20;

/// The month's totals and budget progress.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub year: i32,
    pub month: u32,
    pub income: u64,
    pub expense: u64,
    pub budget_target: u64,
    pub progress: f64,
}

/// Shows income and expense totals for a month plus progress against the
/// session's spending target. `--budget` updates the target first.
pub async fn summary(config: Config, mode: Mode, args: SummaryArgs) -> Result<Out<Summary>> {
    let mut session = Session::load(&config).await;
    session.require_unlocked(&config)?;

    if let Some(budget) = args.budget() {
        session.set_budget_target(budget.value());
    }

    let today = chrono::Local::now().date_naive();
    let year = args.year().unwrap_or_else(|| today.year());
    let month = args.month().unwrap_or_else(|| today.month());

    let store = LedgerStore::new(config.clone(), mode);
    let entries = store.list_all().await;

    let income = views::monthly_total(&entries, year, month, EntryKind::Income);
    let expense = views::monthly_total(&entries, year, month, EntryKind::Expense);
    let target = Amount::new(session.budget_target());
    let progress = views::budget_progress(expense, target);

    session.set_menu(Menu::Home);
    session.save(&config).await?;

    let message = format!(
        "{title}: income {income}, expense {expense}\n\
         Budget goal: {spent} of {target} used ({percent:.1}%)\n\
         [{bar}]",
        title = month_title(year, month),
        income = Amount::new(income),
        expense = Amount::new(expense),
        spent = Amount::new(expense),
        target = target,
        percent = progress * 100.0,
        bar = progress_bar(progress),
    );

    Ok(Out::new(
        message,
        Summary {
            year,
            month,
            income,
            expense,
            budget_target: target.value(),
            progress,
        },
    ))
}

/// "June 2025" style month heading.
pub(crate) fn month_title(year: i32, month: u32) -> String {
    match NaiveDate::from_ymd_opt(year, month, 1) {
        Some(first) => first.format("%B %Y").to_string(),
        None => format!("{year}-{month:02}"),
    }
}

fn progress_bar(progress: f64) -> String {
    let filled = (progress * PROGRESS_BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(PROGRESS_BAR_WIDTH);
    format!(
        "{}{}",
        "#".repeat(filled),
        "-".repeat(PROGRESS_BAR_WIDTH - filled)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::add;
    use crate::test::TestEnv;
    use chrono::NaiveDate;

    async fn seed(env: &TestEnv, kind: EntryKind, category: &str, amount: u64) {
        let args = crate::args::AddArgs::new(
            NaiveDate::from_ymd_opt(2025, 6, 10),
            kind,
            "Shared",
            category,
            "",
            Amount::new(amount),
        );
        add(env.config(), Mode::Test, args).await.unwrap();
    }

    #[tokio::test]
    async fn test_summary_totals_and_progress() {
        let env = TestEnv::new().await;
        seed(&env, EntryKind::Income, "Salary", 3_000_000).await;
        seed(&env, EntryKind::Expense, "Groceries", 500_000).await;

        let args = SummaryArgs::new(Some(2025), Some(6), Some(Amount::new(1_000_000)));
        let out = summary(env.config(), Mode::Test, args).await.unwrap();

        let s = out.structure().unwrap();
        assert_eq!(s.income, 3_000_000);
        assert_eq!(s.expense, 500_000);
        assert_eq!(s.budget_target, 1_000_000);
        assert_eq!(s.progress, 0.5);
        assert!(out.message().contains("June 2025"));
        assert!(out.message().contains("(50.0%)"));
    }

    #[tokio::test]
    async fn test_summary_empty_month_is_zero() {
        let env = TestEnv::new().await;

        let args = SummaryArgs::new(Some(2025), Some(6), None);
        let out = summary(env.config(), Mode::Test, args).await.unwrap();

        let s = out.structure().unwrap();
        assert_eq!(s.income, 0);
        assert_eq!(s.expense, 0);
        assert_eq!(s.progress, 0.0);
    }

    #[tokio::test]
    async fn test_summary_budget_update_persists() {
        let env = TestEnv::new().await;

        let args = SummaryArgs::new(Some(2025), Some(6), Some(Amount::new(1_500_000)));
        summary(env.config(), Mode::Test, args).await.unwrap();

        let session = Session::load(&env.config()).await;
        assert_eq!(session.budget_target(), 1_500_000);
    }

    #[test]
    fn test_progress_bar_widths() {
        assert_eq!(progress_bar(0.0), "-".repeat(20));
        assert_eq!(progress_bar(1.0), "#".repeat(20));
        assert_eq!(progress_bar(0.5), format!("{}{}", "#".repeat(10), "-".repeat(10)));
    }
}
