//! Read-only commands: the full breakdown and one unit's bill.

use crate::args::{ShowArgs, SummaryArgs};
use crate::commands::Out;
use crate::engine::{allocate, summarize, Allocation, Diagnostics, Includes, UnitSummary};
use crate::error::{ErrorType, IntoResult};
use crate::model::Amount;
use crate::{render, Config, Result};
use anyhow::{anyhow, Context};
use tracing::warn;

/// Computes what every unit owes and renders it as a table, CSV or JSON.
///
/// The `Allocation` is returned as the structured output either way. Problems that do not stop
/// the allocation, such as a receipt slot that matches no unit, are logged as warnings.
pub async fn show(config: Config, args: ShowArgs) -> Result<Out<Allocation>> {
    let allocation = compute(&config).await?;
    warn_about(&allocation.diagnostics);

    let report = if args.json() {
        serde_json::to_string_pretty(&allocation)
            .context("Unable to serialize the allocation")
            .pub_result(ErrorType::Format)?
    } else if args.csv() {
        render::csv(&allocation).pub_result(ErrorType::Format)?
    } else if args.details() {
        format!(
            "{}\n{}",
            render::table(&allocation),
            render::diagnostics(&allocation.diagnostics)
        )
    } else {
        render::table(&allocation)
    };

    let n = allocation.units.len();
    let message = format!(
        "Allocated {} to {n} unit{}",
        Amount::from(allocation.grand_total()),
        super::plural(n)
    );
    Ok(Out::new(message, allocation).with_report(report))
}

/// Renders the bill of one unit with the concepts in `args.exclude()` left out.
pub async fn summary(config: Config, args: SummaryArgs) -> Result<Out<UnitSummary>> {
    let allocation = compute(&config).await?;
    let unit = allocation
        .get(args.unit())
        .ok_or_else(|| anyhow!("Unit '{}' not found", args.unit()))
        .pub_result(ErrorType::Request)?;

    let summary = summarize(unit, &Includes::excluding(args.exclude()));
    let report = if args.json() {
        serde_json::to_string_pretty(&summary)
            .context("Unable to serialize the summary")
            .pub_result(ErrorType::Format)?
    } else {
        render::summary(&summary)
    };
    let message = format!(
        "Unit {} owes {}",
        summary.unit_id,
        Amount::from(summary.total)
    );
    Ok(Out::new(message, summary).with_report(report))
}

async fn compute(config: &Config) -> Result<Allocation> {
    let state = config.load_state().await?;
    let overrides = config.load_overrides().await?;
    Ok(allocate(&state.input(), &overrides))
}

fn warn_about(d: &Diagnostics) {
    for (name, receipt) in [("A", &d.electricity_a), ("B", &d.electricity_b)] {
        for meter in receipt.meters.iter().filter(|m| m.unit_id.is_none()) {
            warn!(
                "No unit matches meter '{}' of electricity receipt {name}, its {} kWh are not billed",
                meter.pattern, meter.kwh
            );
        }
    }
    for (name, group) in [
        ("gas A", &d.gas_a),
        ("gas B", &d.gas_b),
        ("aseo A", &d.aseo_a),
        ("aseo B", &d.aseo_b),
    ] {
        for pattern in &group.unresolved {
            warn!("No unit matches '{pattern}' of {name}");
        }
    }
    if !d.unassigned_extras.is_empty() {
        warn!(
            "{} extra{} belong to units that are not on the roster: {}",
            d.unassigned_extras.len(),
            super::plural(d.unassigned_extras.len()),
            d.unassigned_extras.join(", ")
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::error_type;
    use crate::model::{Field, MeterReading, Overrides, Receipt};
    use crate::test::TestEnv;
    use rust_decimal::Decimal;

    async fn env_with_receipt_a() -> TestEnv {
        let env = TestEnv::new().await;
        let mut state = env.state().await;
        let receipt = state.electricity_mut(Receipt::A);
        receipt.set_total_kwh(Decimal::from(300));
        receipt.set_total_price(Decimal::from(90000));
        receipt.set_reading("202", MeterReading::new(Decimal::from(20), Decimal::from(50)));
        env.set_state(&state).await;
        env
    }

    #[tokio::test]
    async fn test_show_table() {
        let env = env_with_receipt_a().await;
        let out = show(env.config(), ShowArgs::default()).await.unwrap();
        let allocation = out.structure().unwrap();
        assert_eq!(
            allocation.get("201").unwrap().electricity,
            Decimal::from(81000)
        );
        assert_eq!(allocation.get("202").unwrap().electricity, Decimal::from(9000));
        assert!(out.report().unwrap().starts_with("Unit"));
        assert_eq!(out.message(), "Allocated $ 90.000 to 7 units");
    }

    #[tokio::test]
    async fn test_show_json_and_details() {
        let env = env_with_receipt_a().await;
        let out = show(env.config(), ShowArgs::new(true, false, false))
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(out.report().unwrap()).unwrap();
        assert!(json["units"].is_array());
        assert!(json["diagnostics"]["electricityA"].is_object());

        let out = show(env.config(), ShowArgs::new(false, false, true))
            .await
            .unwrap();
        assert!(out.report().unwrap().contains("per kWh"));
    }

    #[tokio::test]
    async fn test_show_applies_overrides() {
        let env = env_with_receipt_a().await;
        let mut overrides = Overrides::new();
        overrides.set("201", Field::Electricity, Decimal::from(80000));
        env.set_overrides(&overrides).await;

        let out = show(env.config(), ShowArgs::default()).await.unwrap();
        let unit = out.structure().unwrap().get("201").unwrap();
        assert_eq!(unit.electricity, Decimal::from(80000));
        assert_eq!(unit.overridden, vec![Field::Electricity]);
        assert!(out.report().unwrap().contains("80.000*"));
    }

    #[tokio::test]
    async fn test_summary_without_rent() {
        let env = env_with_receipt_a().await;
        let mut state = env.state().await;
        state
            .update_unit("201", None, Some(Decimal::from(300000)))
            .unwrap();
        env.set_state(&state).await;

        let out = summary(
            env.config(),
            SummaryArgs::new("201", vec![Field::Rent], false),
        )
        .await
        .unwrap();
        assert_eq!(out.structure().unwrap().total, Decimal::from(81000));
        assert_eq!(out.message(), "Unit 201 owes $ 81.000");
    }

    #[tokio::test]
    async fn test_summary_unknown_unit() {
        let env = TestEnv::new().await;
        let e = summary(env.config(), SummaryArgs::new("999", vec![], false))
            .await
            .unwrap_err();
        assert_eq!(error_type(&e), Some(ErrorType::Request));
    }
}
