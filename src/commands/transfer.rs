//! Moving the state in and out of the home directory as a JSON document.

use crate::args::{ExportArgs, ImportArgs};
use crate::backup;
use crate::commands::{confirmed, plural, Out};
use crate::error::{ErrorType, IntoResult};
use crate::model::BillingState;
use crate::{utils, Config, Result};
use anyhow::Context;
use tracing::{debug, warn};

/// Replaces the state with the document at `args.file()`.
///
/// The document is validated before anything is written: it must be JSON, it must have a `units`
/// array and unit ids must be unique. If the current state holds any units or extras, `--yes` is
/// required and a backup of it is written first. Overrides are left as they are.
///
/// # Errors
/// - `Storage` if the file cannot be read.
/// - `Format` if the file is not a state document.
/// - `Request` if `--yes` is needed and was not given.
pub async fn import(config: Config, args: ImportArgs) -> Result<Out<BillingState>> {
    let json = utils::read(args.file())
        .await
        .pub_result(ErrorType::Storage)?;
    let imported = BillingState::from_json(&json)
        .with_context(|| format!("Unable to import {}", args.file().display()))
        .pub_result(ErrorType::Format)?;

    let current = config.load_state().await?;
    if !current.units().is_empty() || !current.extras().is_empty() {
        confirmed(args.yes(), "replace the current state")?;
        let path = config
            .backup()
            .save_json(backup::IMPORT, &current)
            .await
            .pub_result(ErrorType::Storage)?;
        debug!("Backed up the state to {}", path.display());
    }
    config.save_state(&imported).await?;

    let overrides = config.load_overrides().await?;
    for (unit_id, _) in overrides.iter() {
        if imported.unit(unit_id).is_none() {
            warn!("Unit {unit_id} has overrides but is not in the imported roster");
        }
    }

    let n = imported.units().len();
    let message = format!(
        "Imported {n} unit{} from {}",
        plural(n),
        args.file().display()
    );
    Ok(Out::new(message, imported))
}

/// Writes the state as pretty-printed JSON to `args.file()`, or to stdout when no file is given.
pub async fn export(config: Config, args: ExportArgs) -> Result<Out<()>> {
    let state = config.load_state().await?;
    let json = state.to_json().pub_result(ErrorType::Format)?;
    match args.file() {
        Some(path) => {
            utils::write(path, json)
                .await
                .pub_result(ErrorType::Storage)?;
            Ok(format!("Exported the state to {}", path.display()).into())
        }
        None => Ok(Out::new_message("Exported the state").with_report(json)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::allocate;
    use crate::error::error_type;
    use crate::model::{ExtraCharge, Field, Overrides, Receipt, SanitationCharge};
    use crate::test::TestEnv;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_export_import_round_trip() {
        let env = TestEnv::new().await;
        let mut state = env.state().await;
        state.update_unit("401", Some(0), None).unwrap();
        state.set_aseo(Receipt::B, SanitationCharge::new(Decimal::from(9000)));
        state
            .add_extra(ExtraCharge::new("Internet", Decimal::from(15000), "201"))
            .unwrap();
        env.set_state(&state).await;
        let mut overrides = Overrides::new();
        overrides.set("202", Field::Water, Decimal::from(777));
        env.set_overrides(&overrides).await;

        let before = allocate(&env.state().await.input(), &env.overrides().await);

        let file = env.outside("export.json");
        export(env.config(), ExportArgs::new(Some(file.clone())))
            .await
            .unwrap();

        let mut reset = BillingState::default();
        reset.update_unit("201", Some(9), None).unwrap();
        env.set_state(&reset).await;

        import(env.config(), ImportArgs::new(&file, true))
            .await
            .unwrap();
        let after = allocate(&env.state().await.input(), &env.overrides().await);
        assert_eq!(before, after);
        assert_eq!(env.backups().await.len(), 1);
    }

    #[tokio::test]
    async fn test_export_to_stdout() {
        let env = TestEnv::new().await;
        let out = export(env.config(), ExportArgs::default()).await.unwrap();
        let json: serde_json::Value = serde_json::from_str(out.report().unwrap()).unwrap();
        assert_eq!(json["units"].as_array().unwrap().len(), 7);
        assert!(json.get("electricityA").is_some());
    }

    #[tokio::test]
    async fn test_import_invalid_documents_leave_state() {
        let env = TestEnv::new().await;
        let before = env.state().await;
        for (name, content) in [
            ("not-json.json", "units: 1"),
            ("no-units.json", r#"{"water": {"totalPrice": 1}}"#),
            (
                "duplicate.json",
                r#"{"units": [{"id": "201"}, {"id": "201"}]}"#,
            ),
            (
                "duplicate-extra.json",
                r#"{"units": [{"id": "201"}], "extras": [
                    {"id": "e", "name": "Gym", "amount": 1, "unitId": "201"},
                    {"id": "e", "name": "Gym", "amount": 2, "unitId": "201"}
                ]}"#,
            ),
        ] {
            let file = env.outside(name);
            utils::write(&file, content).await.unwrap();
            let e = import(env.config(), ImportArgs::new(&file, true))
                .await
                .unwrap_err();
            assert_eq!(error_type(&e), Some(ErrorType::Format), "{name}");
        }
        assert_eq!(env.state().await, before);
        assert!(env.backups().await.is_empty());
    }

    #[tokio::test]
    async fn test_import_requires_yes() {
        let env = TestEnv::new().await;
        let file = env.outside("small.json");
        utils::write(&file, r#"{"units": [{"id": "1", "people": 2}]}"#)
            .await
            .unwrap();
        let e = import(env.config(), ImportArgs::new(&file, false))
            .await
            .unwrap_err();
        assert_eq!(error_type(&e), Some(ErrorType::Request));
        assert_eq!(env.state().await.units().len(), 7);
    }

    #[tokio::test]
    async fn test_import_into_empty_state_needs_no_yes() {
        let env = TestEnv::new().await;
        env.set_state(&BillingState::empty()).await;
        let file = env.outside("small.json");
        utils::write(&file, r#"{"units": [{"id": "1", "people": "2", "rent": -4}]}"#)
            .await
            .unwrap();
        let out = import(env.config(), ImportArgs::new(&file, false))
            .await
            .unwrap();
        assert_eq!(out.message(), format!("Imported 1 unit from {}", file.display()));
        let state = env.state().await;
        assert_eq!(state.unit("1").unwrap().people(), 2);
        assert_eq!(state.unit("1").unwrap().rent(), Decimal::ZERO);
        assert!(env.backups().await.is_empty());
    }

    #[tokio::test]
    async fn test_import_missing_file() {
        let env = TestEnv::new().await;
        let e = import(env.config(), ImportArgs::new(env.outside("nope.json"), true))
            .await
            .unwrap_err();
        assert_eq!(error_type(&e), Some(ErrorType::Storage));
    }
}
