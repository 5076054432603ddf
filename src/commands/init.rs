use crate::commands::Out;
use crate::{Config, Result};
use std::path::Path;

/// Creates the data directory, its backups directory and:
/// - Creates an initial `config.json` file with default settings
/// - Writes `state.json` with the default roster and an empty `overrides.json`
///
/// # Arguments
/// - `bills_home` - The directory that will be the root of data directory, e.g. `$HOME/bills`
///
/// # Errors
/// - Returns a `Config` error if the directory is already initialized or any file operation fails.
pub async fn init(bills_home: &Path) -> Result<Out<()>> {
    let config = Config::create(bills_home).await?;
    Ok(format!(
        "Successfully created the bills directory at {}",
        config.root().display()
    )
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{error_type, ErrorType};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_then_load() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("bills");
        let out = init(&home).await.unwrap();
        assert!(out.message().contains("Successfully created"));
        let config = Config::load(&home).await.unwrap();
        assert_eq!(config.load_state().await.unwrap().units().len(), 7);
    }

    #[tokio::test]
    async fn test_init_twice_is_config_error() {
        let dir = TempDir::new().unwrap();
        init(dir.path()).await.unwrap();
        let e = init(dir.path()).await.unwrap_err();
        assert_eq!(error_type(&e), Some(ErrorType::Config));
    }
}
