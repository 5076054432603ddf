//! Reads and writes the two persisted documents: the state and the overrides.
//!
//! Errors leaving this module are already tagged: a file that cannot be read or written is a
//! `Storage` error, a file that can be read but not understood is a `Format` error.

use crate::error::{ErrorType, IntoResult};
use crate::model::{BillingState, Overrides};
use crate::{utils, Result};
use anyhow::Context;
use std::path::Path;
use tracing::{debug, trace};

pub(crate) async fn load_state(path: &Path) -> Result<BillingState> {
    let json = utils::read(path).await.pub_result(ErrorType::Storage)?;
    let state = BillingState::from_json(&json)
        .with_context(|| format!("The state file at {} is invalid", path.display()))
        .pub_result(ErrorType::Format)?;
    trace!("Loaded {} units from {}", state.units().len(), path.display());
    Ok(state)
}

pub(crate) async fn save_state(path: impl AsRef<Path>, state: &BillingState) -> Result<()> {
    let path = path.as_ref();
    let json = state.to_json().pub_result(ErrorType::Format)?;
    utils::write_atomic(path, json)
        .await
        .pub_result(ErrorType::Storage)?;
    debug!("Saved state to {}", path.display());
    Ok(())
}

/// Loads the override document. A missing file means no overrides.
pub(crate) async fn load_overrides(path: &Path) -> Result<Overrides> {
    if !path.is_file() {
        debug!("No override file at {}", path.display());
        return Ok(Overrides::new());
    }
    let json = utils::read(path).await.pub_result(ErrorType::Storage)?;
    let mut overrides = parse_overrides(&json)
        .with_context(|| format!("The override file at {} is invalid", path.display()))
        .pub_result(ErrorType::Format)?;
    overrides.compact();
    Ok(overrides)
}

pub(crate) async fn save_overrides(path: impl AsRef<Path>, overrides: &Overrides) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(overrides)
        .context("Unable to serialize the overrides")
        .pub_result(ErrorType::Format)?;
    utils::write_atomic(path, json)
        .await
        .pub_result(ErrorType::Storage)?;
    debug!("Saved {} override entries to {}", overrides.len(), path.display());
    Ok(())
}

/// Parses an override document.
pub fn parse_overrides(json: &str) -> Result<Overrides> {
    serde_json::from_str(json).context("The document is not a valid override document")
}
