use crate::model::numeric::{de_count, de_money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A billable dwelling in the building.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    /// Free text chosen by the operator, e.g. `201` or `Depto 201`.
    pub(crate) id: String,
    /// How many people live in the unit.
    #[serde(default, deserialize_with = "de_count")]
    pub(crate) people: u32,
    /// The fixed monthly rent.
    #[serde(default, deserialize_with = "de_money")]
    pub(crate) rent: Decimal,
}

impl Unit {
    pub fn new(id: impl Into<String>, people: u32, rent: Decimal) -> Self {
        Self {
            id: id.into(),
            people,
            rent: crate::model::numeric::floor(rent),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn people(&self) -> u32 {
        self.people
    }

    pub fn rent(&self) -> Decimal {
        self.rent
    }

    pub(crate) fn set_people(&mut self, people: u32) {
        self.people = people;
    }

    pub(crate) fn set_rent(&mut self, rent: Decimal) {
        self.rent = crate::model::numeric::floor(rent);
    }
}
