//! The allocation engine.
//!
//! `allocate` turns a snapshot of the roster, the month's receipts and the extras ledger into a
//! per-unit breakdown. It is a pure function: no I/O, no logging, no state kept between calls.
//!
//! The work happens in three passes:
//! 1. Each allocator adds its share of a receipt to running totals kept per roster position.
//! 2. Manual overrides replace whole fields of those totals.
//! 3. Every field is rounded to cents and the rounded fields are summed.

mod electricity;
mod extras;
mod per_capita;
mod resolve;
mod sanitation;
mod summary;

pub use resolve::resolve;
pub use summary::{summarize, Includes, SummaryLine, UnitSummary};

use crate::model::layout::{
    ASEO_A, ASEO_B_ALWAYS, ASEO_B_WHEN_OCCUPIED, ELECTRICITY_A, ELECTRICITY_B, GAS_A, GAS_B,
};
use crate::model::numeric::saturating_sum;
use crate::model::{
    round, totals_by_name, ElectricityReceipt, ExtraCharge, Field, GasCharge, OverrideState,
    Overrides, SanitationCharge, Source, Unit, WaterCharge,
};
use rust_decimal::Decimal;
use serde::Serialize;

/// Borrowed view of everything the engine reads.
#[derive(Debug, Clone, Copy)]
pub struct AllocationInput<'a> {
    pub units: &'a [Unit],
    pub electricity_a: &'a ElectricityReceipt,
    pub electricity_b: &'a ElectricityReceipt,
    pub water: &'a WaterCharge,
    pub gas_a: &'a GasCharge,
    pub gas_b: &'a GasCharge,
    pub aseo_a: &'a SanitationCharge,
    pub aseo_b: &'a SanitationCharge,
    pub extras: &'a [ExtraCharge],
}

/// One line of a unit's extras, in the order the extras were entered.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtraLine {
    pub name: String,
    pub amount: Decimal,
}

/// The final breakdown of one unit.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitAllocation {
    pub unit_id: String,
    pub electricity: Decimal,
    pub water: Decimal,
    pub gas: Decimal,
    pub aseo: Decimal,
    pub rent: Decimal,
    pub extras: Decimal,
    pub extras_detail: Vec<ExtraLine>,
    /// Sum of the six rounded fields.
    pub total: Decimal,
    /// Fields whose value came from a manual override, in display order.
    pub overridden: Vec<Field>,
}

impl UnitAllocation {
    pub fn get(&self, field: Field) -> Decimal {
        match field {
            Field::Electricity => self.electricity,
            Field::Water => self.water,
            Field::Gas => self.gas,
            Field::Aseo => self.aseo,
            Field::Rent => self.rent,
            Field::Extras => self.extras,
        }
    }

    pub fn source(&self, field: Field) -> Source {
        if self.overridden.contains(&field) {
            Source::Overridden
        } else {
            Source::Computed
        }
    }

    pub fn state(&self) -> OverrideState {
        if self.overridden.is_empty() {
            OverrideState::Computed
        } else {
            OverrideState::Overridden
        }
    }

    /// The unit's extras summed by name, in first-seen order.
    pub fn extras_by_name(&self) -> Vec<(String, Decimal)> {
        totals_by_name(
            self.extras_detail
                .iter()
                .map(|line| (line.name.as_str(), line.amount)),
        )
    }
}

/// The consumption and cost attributed to one meter slot of an electricity receipt.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeterShare {
    /// The unit number printed on the meter, e.g. `"202"`.
    pub pattern: String,
    /// The unit that pays for it, or `None` when no unit on the roster matches.
    pub unit_id: Option<String>,
    pub kwh: Decimal,
    pub cost: Decimal,
    /// Whether `kwh` is what the sub-meters left over.
    pub residual: bool,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectricityDiagnostics {
    pub price_per_kwh: Decimal,
    pub meters: Vec<MeterShare>,
}

/// How a gas or sanitation charge was split.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupDiagnostics {
    /// Units that paid a share.
    pub members: Vec<String>,
    /// Group patterns that matched no unit.
    pub unresolved: Vec<String>,
    /// Units that matched but were left out because nobody lives there.
    pub unoccupied: Vec<String>,
    /// Price per person (gas) or per member (sanitation).
    pub rate: Decimal,
}

/// Intermediate figures, for checking the numbers by hand.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics {
    pub electricity_a: ElectricityDiagnostics,
    pub electricity_b: ElectricityDiagnostics,
    pub water_per_head: Decimal,
    pub gas_a: GroupDiagnostics,
    pub gas_b: GroupDiagnostics,
    pub aseo_a: GroupDiagnostics,
    pub aseo_b: GroupDiagnostics,
    /// Ids of extras whose unit is not on the roster.
    pub unassigned_extras: Vec<String>,
}

/// The result of `allocate`: one entry per unit in roster order, plus diagnostics.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Allocation {
    pub units: Vec<UnitAllocation>,
    pub diagnostics: Diagnostics,
}

impl Allocation {
    pub fn get(&self, unit_id: &str) -> Option<&UnitAllocation> {
        self.units.iter().find(|u| u.unit_id == unit_id)
    }

    /// Sum of every unit's total.
    pub fn grand_total(&self) -> Decimal {
        saturating_sum(self.units.iter().map(|u| u.total))
    }

    /// Distinct extra names across all units, in first-seen order.
    pub fn extra_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for line in self.units.iter().flat_map(|u| u.extras_detail.iter()) {
            if !names.contains(&line.name) {
                names.push(line.name.clone());
            }
        }
        names
    }
}

/// Running totals for one roster position before overrides and rounding.
#[derive(Debug, Default, Clone)]
pub(crate) struct Share {
    pub(crate) electricity: Decimal,
    pub(crate) water: Decimal,
    pub(crate) gas: Decimal,
    pub(crate) aseo: Decimal,
    pub(crate) extras: Decimal,
    pub(crate) extras_detail: Vec<ExtraLine>,
}

/// `amount / per`, or zero when `per` is not positive. A quotient too large for a `Decimal`
/// saturates.
pub(crate) fn rate(amount: Decimal, per: Decimal) -> Decimal {
    if per <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    match amount.checked_div(per) {
        Some(q) => q,
        None if amount.is_sign_negative() => Decimal::MIN,
        None => Decimal::MAX,
    }
}

/// Splits the month's charges among the units of `input` and applies `overrides`.
pub fn allocate(input: &AllocationInput<'_>, overrides: &Overrides) -> Allocation {
    let units = input.units;
    let mut shares = vec![Share::default(); units.len()];

    let electricity_a =
        electricity::allocate(units, input.electricity_a, &ELECTRICITY_A, &mut shares);
    let electricity_b =
        electricity::allocate(units, input.electricity_b, &ELECTRICITY_B, &mut shares);
    let water_per_head = per_capita::water(units, input.water, &mut shares);
    let gas_a = per_capita::gas(units, GAS_A, input.gas_a, &mut shares);
    let gas_b = per_capita::gas(units, GAS_B, input.gas_b, &mut shares);
    let aseo_a = sanitation::allocate(units, ASEO_A, &[], input.aseo_a, &mut shares);
    let aseo_b = sanitation::allocate(
        units,
        &[ASEO_B_ALWAYS],
        ASEO_B_WHEN_OCCUPIED,
        input.aseo_b,
        &mut shares,
    );
    let unassigned_extras = extras::allocate(units, input.extras, &mut shares);

    let results = units
        .iter()
        .zip(shares)
        .map(|(unit, share)| finish(unit, share, overrides))
        .collect();

    Allocation {
        units: results,
        diagnostics: Diagnostics {
            electricity_a,
            electricity_b,
            water_per_head,
            gas_a,
            gas_b,
            aseo_a,
            aseo_b,
            unassigned_extras,
        },
    }
}

/// Applies overrides, then rounds each field and sums the rounded fields.
fn finish(unit: &Unit, share: Share, overrides: &Overrides) -> UnitAllocation {
    let id = unit.id();
    let field = |f: Field, computed: Decimal| round(overrides.apply(id, f, computed));

    let electricity = field(Field::Electricity, share.electricity);
    let water = field(Field::Water, share.water);
    let gas = field(Field::Gas, share.gas);
    let aseo = field(Field::Aseo, share.aseo);
    let rent = field(Field::Rent, unit.rent());
    let extras = field(Field::Extras, share.extras);
    let total = round(saturating_sum([electricity, water, gas, aseo, rent, extras]));

    UnitAllocation {
        unit_id: id.to_string(),
        electricity,
        water,
        gas,
        aseo,
        rent,
        extras,
        extras_detail: share.extras_detail,
        total,
        overridden: overrides
            .get(id)
            .map(|entry| entry.fields())
            .unwrap_or_default(),
    }
}
