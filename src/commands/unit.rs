//! Roster commands.

use crate::args::{UnitAddArgs, UnitRemoveArgs, UnitUpdateArgs};
use crate::commands::{confirmed, plural, Out};
use crate::error::{ErrorType, IntoResult};
use crate::model::{Amount, RemovedUnit, Unit};
use crate::{Config, Result};
use anyhow::anyhow;
use tracing::debug;

/// Adds a unit to the end of the roster.
///
/// # Errors
/// - Returns a `Request` error if the id is empty or already taken.
pub async fn unit_add(config: Config, args: UnitAddArgs) -> Result<Out<Unit>> {
    let mut state = config.load_state().await?;
    state
        .add_unit(Unit::new(args.id(), args.people(), args.rent()))
        .pub_result(ErrorType::Request)?;
    config.save_state(&state).await?;

    let unit = state
        .units()
        .last()
        .cloned()
        .ok_or_else(|| anyhow!("The roster is empty after adding a unit"))
        .pub_result(ErrorType::Storage)?;
    Ok(Out::new(format!("Added unit {}", unit.id()), unit))
}

/// Removes a unit, the extras assigned to it and its overrides.
///
/// # Errors
/// - Returns a `Request` error if `--yes` was not given or the unit does not exist.
pub async fn unit_remove(config: Config, args: UnitRemoveArgs) -> Result<Out<RemovedUnit>> {
    confirmed(args.yes(), &format!("remove unit {}", args.id()))?;
    let mut state = config.load_state().await?;
    let mut overrides = config.load_overrides().await?;

    let removed = state.remove_unit(args.id()).pub_result(ErrorType::Request)?;
    let had_overrides = overrides.remove_unit(args.id());
    config.save_state(&state).await?;
    if had_overrides {
        config.save_overrides(&overrides).await?;
    }

    let n = removed.extras.len();
    let mut message = format!("Removed unit {}", removed.unit.id());
    if n > 0 {
        message.push_str(&format!(" and {n} extra{}", plural(n)));
    }
    if had_overrides {
        message.push_str(", its overrides were cleared");
    }
    Ok(Out::new(message, removed))
}

/// Changes the occupants and rent of a unit and optionally renames it. A rename moves the unit's
/// extras and overrides to the new id.
///
/// # Errors
/// - Returns a `Request` error if nothing was asked for, the unit does not exist or the new id is
///   taken.
pub async fn unit_update(config: Config, args: UnitUpdateArgs) -> Result<Out<Unit>> {
    if args.people().is_none() && args.rent().is_none() && args.rename().is_none() {
        return Err(anyhow!("Nothing to update, pass --people, --rent or --rename"))
            .pub_result(ErrorType::Request);
    }
    let mut state = config.load_state().await?;
    state
        .update_unit(args.id(), args.people(), args.rent())
        .pub_result(ErrorType::Request)?;

    let mut id = args.id().to_string();
    if let Some(to) = args.rename() {
        state.rename_unit(&id, to).pub_result(ErrorType::Request)?;
        let mut overrides = config.load_overrides().await?;
        if overrides.get(&id).is_some() {
            overrides.rename_unit(&id, to.trim());
            config.save_overrides(&overrides).await?;
            debug!("Moved the overrides of {id} to {}", to.trim());
        }
        id = to.trim().to_string();
    }
    config.save_state(&state).await?;

    let unit = state
        .unit(&id)
        .cloned()
        .ok_or_else(|| anyhow!("Unit '{id}' not found"))
        .pub_result(ErrorType::Request)?;
    let message = format!(
        "Unit {} has {} occupant{} and pays {} rent",
        unit.id(),
        unit.people(),
        plural(unit.people() as usize),
        Amount::from(unit.rent())
    );
    Ok(Out::new(message, unit))
}
