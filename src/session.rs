//! Session state for the dashboard.
//!
//! The mutable UI state — the active menu, the budget target and the
//! password-gate flag — lives in an explicit `Session` value, persisted at
//! `$HEARTH_HOME/session.json` and passed through the command functions
//! rather than held as ambient globals.

use crate::{utils, Config, Result};
use anyhow::bail;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default monthly spending target.
const DEFAULT_BUDGET_TARGET: u64 = 2_000_000;

/// The dashboard's three menus.
#[derive(
    Default, Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Menu {
    #[default]
    Home,
    Calendar,
    Report,
}

serde_plain::derive_display_from_serialize!(Menu);
serde_plain::derive_fromstr_from_deserialize!(Menu);

/// The mutable per-user state of the dashboard.
///
/// The password gate has exactly two states, locked and unlocked. Unlocking
/// is one-way: there is no timeout and no re-lock.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Session {
    menu: Menu,
    budget_target: u64,
    unlocked: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            menu: Menu::default(),
            budget_target: DEFAULT_BUDGET_TARGET,
            unlocked: false,
        }
    }
}

impl Session {
    /// Loads the session file, starting fresh if it is missing or unreadable.
    pub async fn load(config: &Config) -> Session {
        match utils::deserialize(config.session_path()).await {
            Ok(session) => session,
            Err(e) => {
                debug!("Starting a fresh session: {e:#}");
                Session::default()
            }
        }
    }

    /// Saves the session file.
    pub async fn save(&self, config: &Config) -> Result<()> {
        let data = serde_json::to_string_pretty(self)?;
        utils::write(config.session_path(), data).await
    }

    pub fn menu(&self) -> Menu {
        self.menu
    }

    pub fn set_menu(&mut self, menu: Menu) {
        self.menu = menu;
    }

    pub fn budget_target(&self) -> u64 {
        self.budget_target
    }

    pub fn set_budget_target(&mut self, target: u64) {
        self.budget_target = target;
    }

    pub fn unlocked(&self) -> bool {
        self.unlocked
    }

    /// Errors unless the gate is open. A config without a password has no
    /// gate at all.
    pub fn require_unlocked(&self, config: &Config) -> Result<()> {
        if config.password().is_some() && !self.unlocked {
            bail!("This ledger is locked. Run `hearth unlock` first.")
        }
        Ok(())
    }

    /// Compares `attempt` against the configured password and opens the gate
    /// on a match. The mismatch message is deliberately generic.
    pub fn unlock(&mut self, config: &Config, attempt: &str) -> Result<()> {
        match config.password() {
            None => {
                self.unlocked = true;
                Ok(())
            }
            Some(expected) if expected == attempt => {
                self.unlocked = true;
                Ok(())
            }
            Some(_) => bail!("Password mismatch"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_session_defaults() {
        let env = TestEnv::new().await;
        let session = Session::load(&env.config()).await;
        assert_eq!(session.menu(), Menu::Home);
        assert_eq!(session.budget_target(), DEFAULT_BUDGET_TARGET);
        assert!(!session.unlocked());
    }

    #[tokio::test]
    async fn test_session_save_and_load() {
        let env = TestEnv::new().await;
        let mut session = Session::load(&env.config()).await;
        session.set_menu(Menu::Report);
        session.set_budget_target(1_500_000);
        session.save(&env.config()).await.unwrap();

        let loaded = Session::load(&env.config()).await;
        assert_eq!(loaded, session);
    }

    #[tokio::test]
    async fn test_gate_absent_without_password() {
        let env = TestEnv::new().await;
        let session = Session::load(&env.config()).await;
        assert!(session.require_unlocked(&env.config()).is_ok());
    }

    #[tokio::test]
    async fn test_gate_blocks_until_unlocked() {
        let env = TestEnv::with_password("hunter2").await;
        let mut session = Session::load(&env.config()).await;
        assert!(session.require_unlocked(&env.config()).is_err());

        session.unlock(&env.config(), "hunter2").unwrap();
        assert!(session.require_unlocked(&env.config()).is_ok());
    }

    #[tokio::test]
    async fn test_unlock_mismatch_is_generic() {
        let env = TestEnv::with_password("hunter2").await;
        let mut session = Session::load(&env.config()).await;
        let err = session.unlock(&env.config(), "letmein").unwrap_err();
        assert_eq!(err.to_string(), "Password mismatch");
        assert!(!session.unlocked());
    }

    #[tokio::test]
    async fn test_unlock_persists_across_loads() {
        let env = TestEnv::with_password("hunter2").await;
        let mut session = Session::load(&env.config()).await;
        session.unlock(&env.config(), "hunter2").unwrap();
        session.save(&env.config()).await.unwrap();

        let reloaded = Session::load(&env.config()).await;
        assert!(reloaded.unlocked());
        assert!(reloaded.require_unlocked(&env.config()).is_ok());
    }
}
