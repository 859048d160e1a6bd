//! Unlock command handler.

use crate::args::UnlockArgs;
use crate::commands::Out;
use crate::{Config, Result, Session};

/// Opens the password gate. The gate stays open until the session file is
/// removed; there is no re-lock and no timeout.
pub async fn unlock(config: Config, args: UnlockArgs) -> Result<Out<()>> {
    let mut session = Session::load(&config).await;
    session.unlock(&config, args.password())?;
    session.save(&config).await?;
    Ok(Out::new_message("Unlocked"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_unlock_with_correct_password() {
        let env = TestEnv::with_password("hunter2").await;

        let out = unlock(env.config(), UnlockArgs::new("hunter2")).await.unwrap();

        assert_eq!(out.message(), "Unlocked");
        let session = Session::load(&env.config()).await;
        assert!(session.unlocked());
    }

    #[tokio::test]
    async fn test_unlock_with_wrong_password() {
        let env = TestEnv::with_password("hunter2").await;

        let result = unlock(env.config(), UnlockArgs::new("letmein")).await;

        assert!(result.is_err());
        assert_eq!(result.unwrap_err().to_string(), "Password mismatch");
        let session = Session::load(&env.config()).await;
        assert!(!session.unlocked());
    }
}
