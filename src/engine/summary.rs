//! A single unit's bill with a chosen subset of concepts, e.g. everything but rent.

use super::UnitAllocation;
use crate::model::numeric::saturating_sum;
use crate::model::{round, Field, Source};
use rust_decimal::Decimal;
use serde::Serialize;

/// Which concepts appear on a unit summary.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub struct Includes {
    pub electricity: bool,
    pub water: bool,
    pub gas: bool,
    pub aseo: bool,
    pub extras: bool,
    pub rent: bool,
}

impl Default for Includes {
    fn default() -> Self {
        Self {
            electricity: true,
            water: true,
            gas: true,
            aseo: true,
            extras: true,
            rent: true,
        }
    }
}

impl Includes {
    /// Everything except `excluded`.
    pub fn excluding(excluded: &[Field]) -> Self {
        let mut includes = Self::default();
        for field in excluded {
            *includes.slot_mut(*field) = false;
        }
        includes
    }

    pub fn includes(&self, field: Field) -> bool {
        match field {
            Field::Electricity => self.electricity,
            Field::Water => self.water,
            Field::Gas => self.gas,
            Field::Aseo => self.aseo,
            Field::Rent => self.rent,
            Field::Extras => self.extras,
        }
    }

    fn slot_mut(&mut self, field: Field) -> &mut bool {
        match field {
            Field::Electricity => &mut self.electricity,
            Field::Water => &mut self.water,
            Field::Gas => &mut self.gas,
            Field::Aseo => &mut self.aseo,
            Field::Rent => &mut self.rent,
            Field::Extras => &mut self.extras,
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryLine {
    pub label: String,
    pub field: Field,
    pub amount: Decimal,
    pub source: Source,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitSummary {
    pub unit_id: String,
    pub lines: Vec<SummaryLine>,
    pub total: Decimal,
}

/// The order concepts appear on a printed bill.
const ORDER: [Field; 6] = [
    Field::Electricity,
    Field::Water,
    Field::Gas,
    Field::Aseo,
    Field::Extras,
    Field::Rent,
];

/// Builds the bill of one unit showing only the concepts in `includes`.
///
/// Extras are listed one line per charge unless the unit's extras are overridden, in which case
/// the overridden amount is shown as one line.
pub fn summarize(unit: &UnitAllocation, includes: &Includes) -> UnitSummary {
    let mut lines = Vec::new();
    for field in ORDER.into_iter().filter(|f| includes.includes(*f)) {
        let source = unit.source(field);
        if field == Field::Extras && source == Source::Computed && !unit.extras_detail.is_empty() {
            lines.extend(unit.extras_detail.iter().map(|extra| SummaryLine {
                label: extra.name.clone(),
                field,
                amount: extra.amount,
                source,
            }));
        } else {
            lines.push(SummaryLine {
                label: label(field).to_string(),
                field,
                amount: unit.get(field),
                source,
            });
        }
    }
    let total = round(saturating_sum(lines.iter().map(|l| l.amount)));
    UnitSummary {
        unit_id: unit.unit_id.clone(),
        lines,
        total,
    }
}

fn label(field: Field) -> &'static str {
    match field {
        Field::Electricity => "Electricity",
        Field::Water => "Water",
        Field::Gas => "Gas",
        Field::Aseo => "Aseo",
        Field::Rent => "Rent",
        Field::Extras => "Extras",
    }
}
