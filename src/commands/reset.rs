use crate::args::ResetArgs;
use crate::backup;
use crate::commands::{confirmed, Out};
use crate::error::{ErrorType, IntoResult};
use crate::model::{BillingState, Overrides};
use crate::{Config, Result};
use tracing::debug;

/// Puts back the default roster with empty receipts, no extras and no overrides.
///
/// Backups of the state, and of the overrides if there are any, are written first.
pub async fn reset(config: Config, args: ResetArgs) -> Result<Out<BillingState>> {
    confirmed(args.yes(), "reset")?;
    let state = config.load_state().await?;
    let overrides = config.load_overrides().await?;

    let backups = config.backup();
    let path = backups
        .save_json(backup::RESET, &state)
        .await
        .pub_result(ErrorType::Storage)?;
    debug!("Backed up the state to {}", path.display());
    if !overrides.is_empty() {
        let path = backups
            .save_json(backup::OVERRIDES, &overrides)
            .await
            .pub_result(ErrorType::Storage)?;
        debug!("Backed up the overrides to {}", path.display());
    }

    let fresh = BillingState::default();
    config.save_state(&fresh).await?;
    config.save_overrides(&Overrides::new()).await?;
    Ok(Out::new(
        "Reset to the default roster, the previous state is in the backups directory",
        fresh,
    ))
}
