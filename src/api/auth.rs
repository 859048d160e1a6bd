//! Service-account authentication for the Google Sheets API.
//!
//! The key is read from the credentials file configured at init time, or, in
//! deployed environments, from the `HEARTH_SERVICE_ACCOUNT_JSON` environment
//! variable holding the key JSON itself.

use crate::api::SHEET_SCOPES;
use crate::{Config, Result};
use anyhow::{bail, Context};
use tracing::debug;

/// Environment variable that may carry the service-account key JSON.
pub(crate) const SERVICE_ACCOUNT_ENV: &str = "HEARTH_SERVICE_ACCOUNT_JSON";

/// Obtains a fresh access token for the Sheets API.
pub(super) async fn access_token(config: &Config) -> Result<String> {
    let key = load_key(config).await?;
    let auth = yup_oauth2::ServiceAccountAuthenticator::builder(key)
        .build()
        .await
        .context("Failed to build the service-account authenticator")?;
    let token = auth
        .token(SHEET_SCOPES)
        .await
        .context("Failed to obtain an access token")?;
    token
        .token()
        .map(str::to_string)
        .context("The authenticator returned an empty access token")
}

/// Loads the service-account key from the configured file, falling back to the
/// deployment secret.
async fn load_key(config: &Config) -> Result<yup_oauth2::ServiceAccountKey> {
    let path = config.credentials_path();
    if path.is_file() {
        debug!("Reading service-account key from {}", path.display());
        return yup_oauth2::read_service_account_key(&path)
            .await
            .with_context(|| {
                format!("Failed to read service-account key at {}", path.display())
            });
    }

    if let Ok(json) = std::env::var(SERVICE_ACCOUNT_ENV) {
        if !json.is_empty() {
            debug!("Reading service-account key from {SERVICE_ACCOUNT_ENV}");
            return yup_oauth2::parse_service_account_key(json).with_context(|| {
                format!("Failed to parse the service-account key in {SERVICE_ACCOUNT_ENV}")
            });
        }
    }

    bail!(
        "No service-account credentials found at '{}' or in {SERVICE_ACCOUNT_ENV}",
        path.display()
    )
}
