//! Configuration file handling.
//!
//! The configuration file is stored at `$BILLS_HOME/config.json` and says where the state and
//! override documents live and how many backups to keep.

use crate::backup::Backup;
use crate::error::{ErrorType, IntoResult};
use crate::model::{BillingState, Overrides};
use crate::{store, utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

const APP_NAME: &str = "bills";
const CONFIG_VERSION: u8 = 1;
const BACKUP_COPIES: u32 = 5;
const BACKUPS: &str = ".backups";
const CONFIG_JSON: &str = "config.json";
const STATE_JSON: &str = "state.json";
const OVERRIDES_JSON: &str = "overrides.json";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$BILLS_HOME` and from there it loads `$BILLS_HOME/config.json`. It provides paths
/// to the state and override documents and to the backups directory.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    backups: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the data directory and:
    /// - Creates an initial `config.json` file with default settings
    /// - Writes the default roster to `state.json` and an empty `overrides.json`
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the root of the data directory, e.g. `$HOME/bills`
    ///
    /// # Errors
    /// - Returns an error if the directory already holds a `config.json`.
    /// - Returns an error if any file operations fail.
    pub async fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        Self::create_layout(dir.into())
            .await
            .pub_result(ErrorType::Config)
    }

    async fn create_layout(maybe_relative: PathBuf) -> Result<Self> {
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the bills home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        if config_path.is_file() {
            bail!(
                "The directory is already initialized, '{}' exists",
                config_path.display()
            )
        }

        let backups = root.join(BACKUPS);
        utils::make_dir(&backups).await?;

        let config_file = ConfigFile::default();
        config_file.save(&config_path).await?;

        let config = Self {
            root,
            backups,
            config_path,
            config_file,
        };

        store::save_state(config.state_path(), &BillingState::default()).await?;
        store::save_overrides(config.overrides_path(), &Overrides::new()).await?;
        debug!("Created bills home at {}", config.root.display());
        Ok(config)
    }

    /// This will
    /// - validate that `bills_home` exists and that the config file exists
    /// - load the config file
    /// - validate that the backups directory exists
    /// - return the loaded configuration object
    pub async fn load(bills_home: impl Into<PathBuf>) -> Result<Self> {
        Self::load_layout(bills_home.into())
            .await
            .pub_result(ErrorType::Config)
    }

    async fn load_layout(maybe_relative: PathBuf) -> Result<Self> {
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("Bills Home is missing, run 'bills init' first")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;

        let config = Self {
            backups: root.join(BACKUPS),
            root,
            config_path,
            config_file,
        };
        if !config.backups.is_dir() {
            bail!(
                "The backups directory is missing '{}'",
                config.backups.display()
            )
        }
        Ok(config)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn backups(&self) -> &Path {
        &self.backups
    }

    pub fn backup_copies(&self) -> u32 {
        self.config_file.backup_copies
    }

    /// Creates a new `Backup` instance for managing backup files.
    pub fn backup(&self) -> Backup {
        Backup::new(self)
    }

    /// The path of the primary state document.
    pub fn state_path(&self) -> PathBuf {
        self.resolve(self.config_file.state_path())
    }

    /// The path of the override document.
    pub fn overrides_path(&self) -> PathBuf {
        self.resolve(self.config_file.overrides_path())
    }

    pub async fn load_state(&self) -> Result<BillingState> {
        store::load_state(&self.state_path()).await
    }

    pub async fn save_state(&self, state: &BillingState) -> Result<()> {
        store::save_state(self.state_path(), state).await
    }

    pub async fn load_overrides(&self) -> Result<Overrides> {
        store::load_overrides(&self.overrides_path()).await
    }

    pub async fn save_overrides(&self, overrides: &Overrides) -> Result<()> {
        store::save_overrides(self.overrides_path(), overrides).await
    }

    /// Checks if `p` is relative, and if so, resolves it against the home directory.
    fn resolve(&self, p: PathBuf) -> PathBuf {
        if p.is_absolute() {
            return p;
        }
        self.root.join(p)
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "bills",
///   "config_version": 1,
///   "backup_copies": 5,
///   "state_path": "state.json",
///   "overrides_path": "/mnt/shared/overrides.json"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "bills"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Number of backup copies to keep per kind of backup
    backup_copies: u32,

    /// Path to the state document (optional, relative to the home directory or absolute)
    /// Defaults to $BILLS_HOME/state.json if not specified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    state_path: Option<PathBuf>,

    /// Path to the override document (optional, relative to the home directory or absolute)
    /// Defaults to $BILLS_HOME/overrides.json if not specified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    overrides_path: Option<PathBuf>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            backup_copies: BACKUP_COPIES,
            state_path: None,
            overrides_path: None,
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if it belongs to another app.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path)
            .await
            .context("Failed to load the config file")?;

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

    pub fn state_path(&self) -> PathBuf {
        self.state_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(STATE_JSON))
    }

    pub fn overrides_path(&self) -> PathBuf {
        self.overrides_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(OVERRIDES_JSON))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::error_type;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_config_create() {
        let dir = TempDir::new().unwrap();
        let home_dir = dir.path().join("bills_home");

        let config = Config::create(&home_dir).await.unwrap();

        assert!(config.backups().is_dir());
        assert!(config.config_path().is_file());
        assert!(config.state_path().is_file());
        assert!(config.overrides_path().is_file());
        assert_eq!(config.backup_copies(), BACKUP_COPIES);

        let state = config.load_state().await.unwrap();
        assert_eq!(state, BillingState::default());
        assert!(config.load_overrides().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_config_create_twice_fails() {
        let dir = TempDir::new().unwrap();
        Config::create(dir.path()).await.unwrap();
        assert!(Config::create(dir.path()).await.is_err());
    }

    #[tokio::test]
    async fn test_config_load() {
        let dir = TempDir::new().unwrap();
        let created = Config::create(dir.path()).await.unwrap();
        let loaded = Config::load(dir.path()).await.unwrap();
        assert_eq!(created.root(), loaded.root());
        assert_eq!(created.state_path(), loaded.state_path());
    }

    #[tokio::test]
    async fn test_config_load_missing_home() {
        let dir = TempDir::new().unwrap();
        let result = Config::load(dir.path().join("nope")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_config_load_missing_config_file() {
        let dir = TempDir::new().unwrap();
        let e = Config::load(dir.path()).await.unwrap_err();
        assert_eq!(error_type(&e), Some(ErrorType::Config));
        assert!(format!("{e:#}").contains("config file is missing"));
    }

    #[test]
    fn test_config_file_default() {
        let config = ConfigFile::default();
        assert_eq!(config.backup_copies, 5);
        assert_eq!(config.state_path(), PathBuf::from(STATE_JSON));
        assert_eq!(config.overrides_path(), PathBuf::from(OVERRIDES_JSON));
    }

    #[tokio::test]
    async fn test_config_file_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        let original = ConfigFile {
            backup_copies: 9,
            state_path: Some(PathBuf::from("month/state.json")),
            ..ConfigFile::default()
        };
        original.save(&config_path).await.unwrap();
        let loaded = ConfigFile::load(&config_path).await.unwrap();
        assert_eq!(original, loaded);
    }

    #[tokio::test]
    async fn test_config_file_load_invalid_app_name() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        let json = r#"{
            "app_name": "ledger",
            "config_version": 1,
            "backup_copies": 5
        }"#;
        utils::write(&config_path, json).await.unwrap();

        let result = ConfigFile::load(&config_path).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid app_name"));
    }

    #[test]
    fn test_config_file_serialization_omits_none_fields() {
        let json = serde_json::to_string(&ConfigFile::default()).unwrap();
        assert!(!json.contains("state_path"));
        assert!(!json.contains("overrides_path"));
    }

    #[tokio::test]
    async fn test_relative_and_absolute_paths() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::create(dir.path()).await.unwrap();
        config.config_file.state_path = Some(PathBuf::from("sub/state.json"));
        assert_eq!(config.state_path(), config.root().join("sub/state.json"));
        let abs = dir.path().join("elsewhere.json");
        config.config_file.overrides_path = Some(abs.clone());
        assert_eq!(config.overrides_path(), abs);
    }
}
