//! Configuration file handling.
//!
//! The configuration file is stored at `$HEARTH_HOME/config.json` and holds
//! the Google Sheet URL, the service-account key location and the optional
//! shared password for the dashboard gate.

use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "hearth";
const CONFIG_VERSION: u8 = 1;
const SECRETS: &str = ".secrets";
const SERVICE_ACCOUNT_JSON: &str = "service_account.json";
const CONFIG_JSON: &str = "config.json";
const SESSION_JSON: &str = "session.json";

/// The `Config` object represents the configuration of the app. You
/// instantiate it by providing the path to `$HEARTH_HOME` and from there it
/// loads `$HEARTH_HOME/config.json`. It provides paths to the other items
/// expected inside the hearth home directory.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    secrets: PathBuf,
    config_path: PathBuf,
    session_path: PathBuf,
    config_file: ConfigFile,
    spreadsheet_id: String,
}

impl Config {
    /// Creates the data directory and an initial `config.json`.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the root of the data directory,
    ///   e.g. `$HOME/hearth`
    /// - `credentials` - An optional downloaded service-account key JSON.
    ///   When given it is moved to its default location in the data
    ///   directory. Running without one is allowed; the ledger then reads as
    ///   empty until a key is supplied.
    /// - `sheet_url` - The URL of the Google Sheet where the ledger is
    ///   stored.
    /// - `password` - Optional shared password gating the dashboard.
    pub async fn create(
        dir: impl Into<PathBuf>,
        credentials: Option<&Path>,
        sheet_url: &str,
        password: Option<String>,
    ) -> Result<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the hearth home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let secrets_dir = root.join(SECRETS);
        utils::make_dir(&secrets_dir).await?;

        // Move the service-account key to its default location, if one was
        // provided.
        if let Some(credentials) = credentials {
            let destination = secrets_dir.join(SERVICE_ACCOUNT_JSON);
            utils::rename(credentials, destination).await?;
        }

        let config_path = root.join(CONFIG_JSON);
        let config_file = ConfigFile {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            sheet_url: sheet_url.to_string(),
            credentials_path: None,
            password,
        };
        config_file.save(&config_path).await?;

        let spreadsheet_id = extract_spreadsheet_id(sheet_url)
            .context("Failed to extract spreadsheet ID from sheet URL")?
            .to_string();

        Ok(Self {
            root: root.clone(),
            secrets: secrets_dir,
            config_path,
            session_path: root.join(SESSION_JSON),
            config_file,
            spreadsheet_id,
        })
    }

    /// Validates that `hearth_home` and its config file exist, loads the
    /// config file and returns the loaded configuration object.
    pub async fn load(hearth_home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = hearth_home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("Hearth home is missing; run `hearth init` first")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;

        let spreadsheet_id = extract_spreadsheet_id(&config_file.sheet_url)
            .context("Failed to extract spreadsheet ID from sheet URL")?
            .to_string();

        Ok(Self {
            root: root.clone(),
            secrets: root.join(SECRETS),
            config_path,
            session_path: root.join(SESSION_JSON),
            config_file,
            spreadsheet_id,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn session_path(&self) -> &Path {
        &self.session_path
    }

    pub fn secrets(&self) -> &Path {
        &self.secrets
    }

    pub fn sheet_url(&self) -> &str {
        &self.config_file.sheet_url
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    /// The shared dashboard password, if one is configured.
    pub fn password(&self) -> Option<&str> {
        self.config_file.password.as_deref()
    }

    /// Returns the stored `credentials_path` if it is absolute, otherwise
    /// resolves it relative to the hearth home.
    pub fn credentials_path(&self) -> PathBuf {
        let p = self.config_file.credentials_path();
        if p.is_absolute() {
            return p;
        }
        self.root.join(p)
    }
}

/// Represents the serialization and deserialization format of the
/// configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "hearth",
///   "config_version": 1,
///   "sheet_url": "https://docs.google.com/spreadsheets/d/7KpXm2RfZwNJgs84QhVYno5DU6iM9Wlr3bCzAv1txRpL",
///   "credentials_path": ".secrets/service_account.json",
///   "password": "hunter2"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "hearth"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// URL to the ledger Google Sheet
    sheet_url: String,

    /// Path to the service-account key file (optional, relative to the hearth
    /// home or absolute). Defaults to $HEARTH_HOME/.secrets/service_account.json
    #[serde(skip_serializing_if = "Option::is_none")]
    credentials_path: Option<PathBuf>,

    /// Shared password for the dashboard gate (optional). Stored and compared
    /// in plain text, exactly one notch above no gate at all.
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<String>,
}

impl ConfigFile {
    /// Loads a ConfigFile asynchronously from the specified path.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file at {}", path.display()))?;

        let config: ConfigFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }

    /// Gets the credentials path, defaulting to
    /// `.secrets/service_account.json` under the hearth home.
    pub fn credentials_path(&self) -> PathBuf {
        self.credentials_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(SECRETS).join(SERVICE_ACCOUNT_JSON))
    }
}

/// Extracts the spreadsheet ID from a Google Sheets URL
///
/// # Arguments
/// * `url` - The Google Sheets URL (e.g., "https://docs.google.com/spreadsheets/d/SPREADSHEET_ID/...")
///
/// # Returns
/// The spreadsheet ID or an error if the URL format is invalid. Returns an
/// empty string if the URL is empty.
fn extract_spreadsheet_id(url: &str) -> Result<&str> {
    if url.is_empty() {
        return Ok(url);
    }

    // URL format: https://docs.google.com/spreadsheets/d/SPREADSHEET_ID/...
    // or: https://docs.google.com/spreadsheets/d/SPREADSHEET_ID?foo=bar
    let parts: Vec<&str> = url.split('/').collect();
    for (i, part) in parts.iter().enumerate() {
        if *part == "d" && i + 1 < parts.len() {
            // Extract the ID and remove any query parameters or fragments
            let id_part = parts[i + 1];
            let id = id_part
                .split('?')
                .next()
                .unwrap_or(id_part)
                .split('#')
                .next()
                .unwrap_or(id_part);
            return Ok(id);
        }
    }
    Err(anyhow::anyhow!(
        "Invalid Google Sheets URL format. Expected: https://docs.google.com/spreadsheets/d/SPREADSHEET_ID"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SHEET_URL: &str =
        "https://docs.google.com/spreadsheets/d/7KpXm2RfZwNJgs84QhVYno5DU6iM9Wlr3bCzAv1txRpL/edit";

    #[tokio::test]
    async fn test_config_create() {
        let dir = TempDir::new().unwrap();
        let home_dir = dir.path().join("hearth_home");
        let key_source_file = dir.path().join("key.json");
        let key_content = "{}";
        utils::write(&key_source_file, key_content).await.unwrap();

        let config = Config::create(&home_dir, Some(&key_source_file), SHEET_URL, None)
            .await
            .unwrap();

        assert_eq!(SHEET_URL, config.sheet_url());
        assert_eq!(
            "7KpXm2RfZwNJgs84QhVYno5DU6iM9Wlr3bCzAv1txRpL",
            config.spreadsheet_id()
        );
        assert!(config.secrets().is_dir());
        let found_key = utils::read(&config.credentials_path()).await.unwrap();
        assert_eq!(key_content, found_key);
        assert!(config.password().is_none());
    }

    #[tokio::test]
    async fn test_config_create_without_credentials() {
        let dir = TempDir::new().unwrap();
        let config = Config::create(dir.path().join("home"), None, SHEET_URL, None)
            .await
            .unwrap();
        assert!(!config.credentials_path().is_file());
    }

    #[tokio::test]
    async fn test_config_create_then_load() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("home");
        let created = Config::create(&home, None, SHEET_URL, Some("hunter2".to_string()))
            .await
            .unwrap();

        let loaded = Config::load(&home).await.unwrap();
        assert_eq!(created.sheet_url(), loaded.sheet_url());
        assert_eq!(created.spreadsheet_id(), loaded.spreadsheet_id());
        assert_eq!(loaded.password(), Some("hunter2"));
    }

    #[tokio::test]
    async fn test_config_load_missing_home_fails() {
        let dir = TempDir::new().unwrap();
        let result = Config::load(dir.path().join("nope")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_config_file_load_invalid_app_name() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.json");
        let json = r#"{
            "app_name": "wrong_app",
            "config_version": 1,
            "sheet_url": "https://docs.google.com/spreadsheets/d/test"
        }"#;
        utils::write(&config_path, json).await.unwrap();

        let result = ConfigFile::load(&config_path).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid app_name"));
    }

    #[tokio::test]
    async fn test_config_file_serialization_omits_none_fields() {
        let config = ConfigFile {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            sheet_url: SHEET_URL.to_string(),
            credentials_path: None,
            password: None,
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("credentials_path"));
        assert!(!json.contains("password"));
    }

    #[test]
    fn test_extract_spreadsheet_id() {
        let id = extract_spreadsheet_id(SHEET_URL).unwrap();
        assert_eq!(id, "7KpXm2RfZwNJgs84QhVYno5DU6iM9Wlr3bCzAv1txRpL");

        let url2 = "https://docs.google.com/spreadsheets/d/ABC123";
        assert_eq!(extract_spreadsheet_id(url2).unwrap(), "ABC123");

        let with_query =
            "https://docs.google.com/spreadsheets/d/ABC123?foo=bar";
        assert_eq!(extract_spreadsheet_id(with_query).unwrap(), "ABC123");

        assert!(extract_spreadsheet_id("https://example.com/invalid").is_err());

        // Empty URL should return empty string
        assert_eq!(extract_spreadsheet_id("").unwrap(), "");
    }
}
