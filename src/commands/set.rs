//! Commands that enter the month's receipts.

use crate::args::{ElectricityArgs, GroupPriceArgs, PriceArgs, ReadingArgs};
use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::model::{
    Amount, ElectricityReceipt, GasCharge, MeterReading, SanitationCharge, WaterCharge,
};
use crate::{Config, Result};
use anyhow::anyhow;

/// Sets the total consumption and/or the total price of an electricity receipt.
pub async fn set_electricity(
    config: Config,
    args: ElectricityArgs,
) -> Result<Out<ElectricityReceipt>> {
    if args.kwh().is_none() && args.price().is_none() {
        return Err(anyhow!("Nothing to set, pass --kwh or --price")).pub_result(ErrorType::Request);
    }
    let mut state = config.load_state().await?;
    let receipt = state.electricity_mut(args.receipt());
    if let Some(kwh) = args.kwh() {
        receipt.set_total_kwh(kwh);
    }
    if let Some(price) = args.price() {
        receipt.set_total_price(price);
    }
    let receipt = receipt.clone();
    config.save_state(&state).await?;

    let message = format!(
        "Electricity receipt {}: {} kWh for {}",
        args.receipt(),
        receipt.total_kwh(),
        Amount::from(receipt.total_price())
    );
    Ok(Out::new(message, receipt))
}

/// Sets the previous and/or current reading of one sub-meter of an electricity receipt.
///
/// # Errors
/// - Returns a `Request` error if the receipt has no sub-meter for `args.meter()`.
pub async fn set_reading(config: Config, args: ReadingArgs) -> Result<Out<MeterReading>> {
    if args.previous().is_none() && args.current().is_none() {
        return Err(anyhow!("Nothing to set, pass --previous or --current"))
            .pub_result(ErrorType::Request);
    }
    let layout = args.receipt().meter_layout();
    let meter = args.meter().trim();
    if !layout.sub_metered.iter().any(|m| *m == meter) {
        return Err(anyhow!(
            "Electricity receipt {} has no meter '{meter}', its meters are {}",
            args.receipt(),
            layout.sub_metered.join(", ")
        ))
        .pub_result(ErrorType::Request);
    }

    let mut state = config.load_state().await?;
    let receipt = state.electricity_mut(args.receipt());
    let old = receipt.reading(meter);
    let reading = MeterReading::new(
        args.previous().unwrap_or(old.previous()),
        args.current().unwrap_or(old.current()),
    );
    receipt.set_reading(meter, reading);
    config.save_state(&state).await?;

    let message = format!(
        "Meter {meter} of electricity receipt {}: {} -> {} ({} kWh)",
        args.receipt(),
        reading.previous(),
        reading.current(),
        reading.consumption()
    );
    Ok(Out::new(message, reading))
}

/// Sets the total of the water receipt.
pub async fn set_water(config: Config, args: PriceArgs) -> Result<Out<WaterCharge>> {
    let mut state = config.load_state().await?;
    let water = WaterCharge::new(args.price());
    state.set_water(water);
    config.save_state(&state).await?;
    Ok(Out::new(
        format!("Water receipt: {}", Amount::from(water.total_price())),
        water,
    ))
}

/// Sets the price of a gas receipt.
pub async fn set_gas(config: Config, args: GroupPriceArgs) -> Result<Out<GasCharge>> {
    let mut state = config.load_state().await?;
    let gas = GasCharge::new(args.price());
    state.set_gas(args.receipt(), gas);
    config.save_state(&state).await?;
    Ok(Out::new(
        format!(
            "Gas receipt {}: {}",
            args.receipt(),
            Amount::from(gas.price())
        ),
        gas,
    ))
}

/// Sets the price of a sanitation charge.
pub async fn set_aseo(config: Config, args: GroupPriceArgs) -> Result<Out<SanitationCharge>> {
    let mut state = config.load_state().await?;
    let aseo = SanitationCharge::new(args.price());
    state.set_aseo(args.receipt(), aseo);
    config.save_state(&state).await?;
    Ok(Out::new(
        format!(
            "Aseo charge {}: {}",
            args.receipt(),
            Amount::from(aseo.price())
        ),
        aseo,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::error_type;
    use crate::model::Receipt;
    use crate::test::TestEnv;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_set_electricity_keeps_unset_values() {
        let env = TestEnv::new().await;
        set_electricity(
            env.config(),
            ElectricityArgs::new(Receipt::B, Some(Decimal::from(500)), None),
        )
        .await
        .unwrap();
        let out = set_electricity(
            env.config(),
            ElectricityArgs::new(Receipt::B, None, Some(Decimal::from(100000))),
        )
        .await
        .unwrap();
        assert_eq!(out.message(), "Electricity receipt B: 500 kWh for $ 100.000");

        let state = env.state().await;
        let receipt = state.electricity(Receipt::B);
        assert_eq!(receipt.total_kwh(), Decimal::from(500));
        assert_eq!(receipt.total_price(), Decimal::from(100000));
        assert_eq!(state.electricity(Receipt::A).total_kwh(), Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_set_reading() {
        let env = TestEnv::new().await;
        set_reading(
            env.config(),
            ReadingArgs::new(Receipt::A, "202", Some(Decimal::from(20)), None),
        )
        .await
        .unwrap();
        let out = set_reading(
            env.config(),
            ReadingArgs::new(Receipt::A, "202", None, Some(Decimal::from(50))),
        )
        .await
        .unwrap();
        assert_eq!(out.structure().unwrap().consumption(), Decimal::from(30));
        let state = env.state().await;
        assert_eq!(
            state.electricity(Receipt::A).reading("202").previous(),
            Decimal::from(20)
        );
    }

    #[tokio::test]
    async fn test_set_reading_unknown_meter() {
        let env = TestEnv::new().await;
        let e = set_reading(
            env.config(),
            ReadingArgs::new(Receipt::A, "401", None, Some(Decimal::from(50))),
        )
        .await
        .unwrap_err();
        assert_eq!(error_type(&e), Some(ErrorType::Request));
        assert!(format!("{e:#}").contains("its meters are 202"));
    }

    #[tokio::test]
    async fn test_set_water_gas_aseo() {
        let env = TestEnv::new().await;
        set_water(env.config(), PriceArgs::new(Decimal::from(30000)))
            .await
            .unwrap();
        set_gas(
            env.config(),
            GroupPriceArgs::new(Receipt::A, Decimal::from(20000)),
        )
        .await
        .unwrap();
        let out = set_aseo(
            env.config(),
            GroupPriceArgs::new(Receipt::B, Decimal::from(9000)),
        )
        .await
        .unwrap();
        assert_eq!(out.message(), "Aseo charge B: $ 9.000");

        let state = env.state().await;
        assert_eq!(state.water().total_price(), Decimal::from(30000));
        assert_eq!(state.gas(Receipt::A).price(), Decimal::from(20000));
        assert_eq!(state.gas(Receipt::B).price(), Decimal::ZERO);
        assert_eq!(state.aseo(Receipt::B).price(), Decimal::from(9000));
    }
}
