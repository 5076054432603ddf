use super::{rate, resolve, ElectricityDiagnostics, MeterShare, Share};
use crate::model::layout::MeterLayout;
use crate::model::numeric::floor;
use crate::model::{ElectricityReceipt, Unit};
use rust_decimal::Decimal;

/// Bills each sub-metered unit its own reading and the residual unit whatever is left of the
/// receipt's total, all at the receipt's price per kWh.
pub(super) fn allocate(
    units: &[Unit],
    receipt: &ElectricityReceipt,
    layout: &MeterLayout,
    shares: &mut [Share],
) -> ElectricityDiagnostics {
    let price_per_kwh = rate(receipt.total_price(), receipt.total_kwh());
    let mut meters = Vec::with_capacity(layout.sub_metered.len() + 1);

    let mut metered = Decimal::ZERO;
    for pattern in layout.sub_metered {
        let kwh = receipt.reading(pattern).consumption();
        metered = metered.saturating_add(kwh);
        meters.push(charge(units, shares, pattern, kwh, price_per_kwh, false));
    }

    let residual = floor(receipt.total_kwh().saturating_sub(metered));
    meters.push(charge(
        units,
        shares,
        layout.residual,
        residual,
        price_per_kwh,
        true,
    ));

    ElectricityDiagnostics {
        price_per_kwh,
        meters,
    }
}

fn charge(
    units: &[Unit],
    shares: &mut [Share],
    pattern: &str,
    kwh: Decimal,
    price_per_kwh: Decimal,
    residual: bool,
) -> MeterShare {
    let cost = kwh.saturating_mul(price_per_kwh);
    let payer = resolve(units, pattern);
    if let Some(ix) = payer {
        shares[ix].electricity = shares[ix].electricity.saturating_add(cost);
    }
    MeterShare {
        pattern: pattern.to_string(),
        unit_id: payer.map(|ix| units[ix].id().to_string()),
        kwh,
        cost,
        residual,
    }
}
