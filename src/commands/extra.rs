use crate::args::{ExtraAddArgs, ExtraRemoveArgs};
use crate::commands::{confirmed, Out};
use crate::error::{ErrorType, IntoResult};
use crate::model::{Amount, ExtraCharge};
use crate::{Config, Result};

/// Charges an amount to one unit. The new charge gets a random id.
///
/// # Errors
/// - Returns a `Request` error if the name is empty or the unit is not on the roster.
pub async fn extra_add(config: Config, args: ExtraAddArgs) -> Result<Out<ExtraCharge>> {
    let mut state = config.load_state().await?;
    let extra = state
        .add_extra(ExtraCharge::new(
            args.name().trim(),
            args.amount(),
            args.unit().trim(),
        ))
        .pub_result(ErrorType::Request)?
        .clone();
    config.save_state(&state).await?;

    let message = format!(
        "Added extra {} '{}' of {} to unit {}",
        extra.id(),
        extra.name(),
        Amount::from(extra.amount()),
        extra.unit_id()
    );
    Ok(Out::new(message, extra))
}

/// Removes an extra charge by id.
pub async fn extra_remove(config: Config, args: ExtraRemoveArgs) -> Result<Out<ExtraCharge>> {
    confirmed(args.yes(), &format!("remove extra {}", args.id()))?;
    let mut state = config.load_state().await?;
    let extra = state
        .remove_extra(args.id())
        .pub_result(ErrorType::Request)?;
    config.save_state(&state).await?;

    let message = format!(
        "Removed extra '{}' of {} from unit {}",
        extra.name(),
        Amount::from(extra.amount()),
        extra.unit_id()
    );
    Ok(Out::new(message, extra))
}
