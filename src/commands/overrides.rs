//! Manual override commands.

use crate::args::{OverrideClearAllArgs, OverrideClearArgs, OverrideSetArgs};
use crate::backup;
use crate::commands::{confirmed, plural, Out};
use crate::error::{ErrorType, IntoResult};
use crate::model::{Amount, Field, FieldOverrides};
use crate::{Config, Result};
use anyhow::anyhow;
use tracing::debug;

/// Replaces one computed figure of a unit. Returns every override the unit now has.
///
/// # Errors
/// - Returns a `Request` error if the unit is not on the roster.
pub async fn override_set(config: Config, args: OverrideSetArgs) -> Result<Out<FieldOverrides>> {
    let state = config.load_state().await?;
    if state.unit(args.unit()).is_none() {
        return Err(anyhow!("Unit '{}' not found", args.unit())).pub_result(ErrorType::Request);
    }

    let mut overrides = config.load_overrides().await?;
    overrides.set(args.unit(), args.field(), args.amount());
    config.save_overrides(&overrides).await?;

    let entry = overrides.get(args.unit()).copied().unwrap_or_default();
    let message = format!(
        "The {} of unit {} is now {}",
        args.field(),
        args.unit(),
        Amount::from(args.amount())
    );
    Ok(Out::new(message, entry))
}

/// Goes back to the computed value of one field, or of every field when no field is given.
/// Returns the fields that were cleared. Clearing a field without an override is not an error.
pub async fn override_clear(config: Config, args: OverrideClearArgs) -> Result<Out<Vec<Field>>> {
    let mut overrides = config.load_overrides().await?;
    let cleared = match args.field() {
        Some(field) => {
            if overrides.clear(args.unit(), field) {
                vec![field]
            } else {
                Vec::new()
            }
        }
        None => overrides.clear_unit(args.unit()),
    };

    if cleared.is_empty() {
        return Ok(Out::new(
            format!("Unit {} had nothing to clear", args.unit()),
            cleared,
        ));
    }
    config.save_overrides(&overrides).await?;

    let names: Vec<String> = cleared.iter().map(|f| f.to_string()).collect();
    let message = format!(
        "Unit {} uses the computed {} again",
        args.unit(),
        names.join(", ")
    );
    Ok(Out::new(message, cleared))
}

/// Removes every override. A backup of the overrides is written first.
pub async fn override_clear_all(config: Config, args: OverrideClearAllArgs) -> Result<Out<usize>> {
    confirmed(args.yes(), "clear every override")?;
    let mut overrides = config.load_overrides().await?;
    if overrides.is_empty() {
        return Ok(Out::new("There were no overrides to clear", 0));
    }

    let path = config
        .backup()
        .save_json(backup::OVERRIDES, &overrides)
        .await
        .pub_result(ErrorType::Storage)?;
    debug!("Backed up the overrides to {}", path.display());

    let n = overrides.clear_all();
    config.save_overrides(&overrides).await?;
    Ok(Out::new(
        format!("Cleared the overrides of {n} unit{}", plural(n)),
        n,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::error_type;
    use crate::model::{OverrideState, Source};
    use crate::test::TestEnv;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_override_set_and_clear() {
        let env = TestEnv::new().await;
        let out = override_set(
            env.config(),
            OverrideSetArgs::new("201", Field::Gas, Decimal::from(4500)),
        )
        .await
        .unwrap();
        assert_eq!(out.message(), "The gas of unit 201 is now $ 4.500");
        assert_eq!(out.structure().unwrap().fields(), vec![Field::Gas]);

        override_set(
            env.config(),
            OverrideSetArgs::new("201", Field::Water, Decimal::from(100)),
        )
        .await
        .unwrap();
        let overrides = env.overrides().await;
        assert_eq!(overrides.state("201"), OverrideState::Overridden);
        assert_eq!(overrides.source("201", Field::Electricity), Source::Computed);

        let out = override_clear(env.config(), OverrideClearArgs::new("201", Some(Field::Gas)))
            .await
            .unwrap();
        assert_eq!(out.structure().unwrap(), &vec![Field::Gas]);
        assert_eq!(env.overrides().await.state("201"), OverrideState::Overridden);

        let out = override_clear(env.config(), OverrideClearArgs::new("201", None))
            .await
            .unwrap();
        assert_eq!(out.structure().unwrap(), &vec![Field::Water]);
        assert_eq!(env.overrides().await.state("201"), OverrideState::Computed);
    }

    #[tokio::test]
    async fn test_override_set_unknown_unit() {
        let env = TestEnv::new().await;
        let e = override_set(
            env.config(),
            OverrideSetArgs::new("999", Field::Gas, Decimal::ONE),
        )
        .await
        .unwrap_err();
        assert_eq!(error_type(&e), Some(ErrorType::Request));
        assert!(env.overrides().await.is_empty());
    }

    #[tokio::test]
    async fn test_override_clear_nothing() {
        let env = TestEnv::new().await;
        let out = override_clear(env.config(), OverrideClearArgs::new("201", Some(Field::Rent)))
            .await
            .unwrap();
        assert!(out.structure().unwrap().is_empty());
        assert_eq!(out.message(), "Unit 201 had nothing to clear");
    }

    #[tokio::test]
    async fn test_override_clear_all_backs_up() {
        let env = TestEnv::new().await;
        for unit in ["201", "202"] {
            override_set(
                env.config(),
                OverrideSetArgs::new(unit, Field::Rent, Decimal::ZERO),
            )
            .await
            .unwrap();
        }

        let e = override_clear_all(env.config(), OverrideClearAllArgs::new(false))
            .await
            .unwrap_err();
        assert_eq!(error_type(&e), Some(ErrorType::Request));
        assert_eq!(env.overrides().await.len(), 2);

        let out = override_clear_all(env.config(), OverrideClearAllArgs::new(true))
            .await
            .unwrap();
        assert_eq!(out.message(), "Cleared the overrides of 2 units");
        assert!(env.overrides().await.is_empty());
        let backups = env.backups().await;
        assert_eq!(backups.len(), 1);
        assert!(backups[0].starts_with("overrides."));
    }
}
