//! The primary state document: roster, receipts and extras for the current month.

use crate::engine::AllocationInput;
use crate::model::layout::{MeterLayout, DEFAULT_UNITS, ELECTRICITY_A, ELECTRICITY_B};
use crate::model::{
    ElectricityReceipt, ExtraCharge, GasCharge, SanitationCharge, Unit, WaterCharge,
};
use crate::Result;
use anyhow::{bail, ensure, Context};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Which of the two receipts of a kind is meant.
#[derive(
    Debug, Default, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Receipt {
    #[default]
    A,
    B,
}

serde_plain::derive_display_from_serialize!(Receipt);
serde_plain::derive_fromstr_from_deserialize!(Receipt);

impl Receipt {
    /// The meter layout of this electricity receipt.
    pub fn meter_layout(self) -> &'static MeterLayout {
        match self {
            Receipt::A => &ELECTRICITY_A,
            Receipt::B => &ELECTRICITY_B,
        }
    }
}

/// Everything the operator has entered for the current month.
///
/// `units` is the only required key of the serialized form; a document without it is not a
/// state document. Every other key falls back to an empty value.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingState {
    pub(crate) units: Vec<Unit>,
    #[serde(default = "default_electricity_a")]
    pub(crate) electricity_a: ElectricityReceipt,
    #[serde(default = "default_electricity_b")]
    pub(crate) electricity_b: ElectricityReceipt,
    #[serde(default)]
    pub(crate) water: WaterCharge,
    #[serde(default)]
    pub(crate) gas_a: GasCharge,
    #[serde(default)]
    pub(crate) gas_b: GasCharge,
    #[serde(default)]
    pub(crate) aseo_a: SanitationCharge,
    #[serde(default)]
    pub(crate) aseo_b: SanitationCharge,
    #[serde(default)]
    pub(crate) extras: Vec<ExtraCharge>,
}

fn default_electricity_a() -> ElectricityReceipt {
    ElectricityReceipt::for_layout(Receipt::A.meter_layout())
}

fn default_electricity_b() -> ElectricityReceipt {
    ElectricityReceipt::for_layout(Receipt::B.meter_layout())
}

impl Default for BillingState {
    /// The building's seven units with one occupant each and empty receipts.
    fn default() -> Self {
        Self {
            units: DEFAULT_UNITS
                .iter()
                .map(|id| Unit::new(*id, 1, Decimal::ZERO))
                .collect(),
            electricity_a: default_electricity_a(),
            electricity_b: default_electricity_b(),
            water: WaterCharge::default(),
            gas_a: GasCharge::default(),
            gas_b: GasCharge::default(),
            aseo_a: SanitationCharge::default(),
            aseo_b: SanitationCharge::default(),
            extras: Vec::new(),
        }
    }
}

/// What went away with a removed unit.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct RemovedUnit {
    pub unit: Unit,
    pub extras: Vec<ExtraCharge>,
}

impl BillingState {
    /// A state with no units and empty receipts.
    pub fn empty() -> Self {
        Self {
            units: Vec::new(),
            ..Self::default()
        }
    }

    /// Parses a state document, rejecting anything that is not one.
    pub fn from_json(json: &str) -> Result<Self> {
        let state: BillingState =
            serde_json::from_str(json).context("The document is not a valid state document")?;
        state.validate()?;
        Ok(state)
    }

    /// Serializes the state as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Unable to serialize the state")
    }

    /// Unit ids must be unique and non-empty, and so must extra ids.
    pub fn validate(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        for unit in &self.units {
            ensure!(!unit.id().trim().is_empty(), "A unit has an empty id");
            ensure!(seen.insert(unit.id()), "Unit '{}' appears twice", unit.id());
        }
        let mut seen = BTreeSet::new();
        for extra in &self.extras {
            ensure!(!extra.id().trim().is_empty(), "An extra has an empty id");
            ensure!(seen.insert(extra.id()), "Extra '{}' appears twice", extra.id());
        }
        Ok(())
    }

    /// Borrows the parts of the state that the engine reads.
    pub fn input(&self) -> AllocationInput<'_> {
        AllocationInput {
            units: &self.units,
            electricity_a: &self.electricity_a,
            electricity_b: &self.electricity_b,
            water: &self.water,
            gas_a: &self.gas_a,
            gas_b: &self.gas_b,
            aseo_a: &self.aseo_a,
            aseo_b: &self.aseo_b,
            extras: &self.extras,
        }
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn unit(&self, id: &str) -> Option<&Unit> {
        self.units.iter().find(|u| u.id() == id)
    }

    pub fn extras(&self) -> &[ExtraCharge] {
        &self.extras
    }

    pub fn electricity(&self, receipt: Receipt) -> &ElectricityReceipt {
        match receipt {
            Receipt::A => &self.electricity_a,
            Receipt::B => &self.electricity_b,
        }
    }

    pub fn electricity_mut(&mut self, receipt: Receipt) -> &mut ElectricityReceipt {
        match receipt {
            Receipt::A => &mut self.electricity_a,
            Receipt::B => &mut self.electricity_b,
        }
    }

    pub fn water(&self) -> &WaterCharge {
        &self.water
    }

    pub fn set_water(&mut self, water: WaterCharge) {
        self.water = water;
    }

    pub fn gas(&self, receipt: Receipt) -> &GasCharge {
        match receipt {
            Receipt::A => &self.gas_a,
            Receipt::B => &self.gas_b,
        }
    }

    pub fn set_gas(&mut self, receipt: Receipt, charge: GasCharge) {
        match receipt {
            Receipt::A => self.gas_a = charge,
            Receipt::B => self.gas_b = charge,
        }
    }

    pub fn aseo(&self, receipt: Receipt) -> &SanitationCharge {
        match receipt {
            Receipt::A => &self.aseo_a,
            Receipt::B => &self.aseo_b,
        }
    }

    pub fn set_aseo(&mut self, receipt: Receipt, charge: SanitationCharge) {
        match receipt {
            Receipt::A => self.aseo_a = charge,
            Receipt::B => self.aseo_b = charge,
        }
    }

    /// Adds a unit to the end of the roster.
    pub fn add_unit(&mut self, unit: Unit) -> Result<()> {
        let id = unit.id().trim();
        ensure!(!id.is_empty(), "A unit id is required");
        if self.unit(id).is_some() {
            bail!("Unit '{id}' already exists");
        }
        let unit = Unit::new(id, unit.people(), unit.rent());
        self.units.push(unit);
        Ok(())
    }

    /// Removes a unit and every extra assigned to it. The caller is responsible for dropping the
    /// unit's overrides with `Overrides::remove_unit`.
    pub fn remove_unit(&mut self, id: &str) -> Result<RemovedUnit> {
        let Some(ix) = self.units.iter().position(|u| u.id() == id) else {
            bail!("Unit '{id}' not found");
        };
        let unit = self.units.remove(ix);
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.extras)
            .into_iter()
            .partition(|e| e.unit_id() == id);
        self.extras = kept;
        Ok(RemovedUnit {
            unit,
            extras: removed,
        })
    }

    /// Changes the occupant count and/or rent of a unit.
    pub fn update_unit(
        &mut self,
        id: &str,
        people: Option<u32>,
        rent: Option<Decimal>,
    ) -> Result<&Unit> {
        let Some(unit) = self.units.iter_mut().find(|u| u.id() == id) else {
            bail!("Unit '{id}' not found");
        };
        if let Some(people) = people {
            unit.set_people(people);
        }
        if let Some(rent) = rent {
            unit.set_rent(rent);
        }
        Ok(&*unit)
    }

    /// Renames a unit and points its extras at the new id. The caller is responsible for moving
    /// the unit's overrides with `Overrides::rename_unit`.
    pub fn rename_unit(&mut self, from: &str, to: &str) -> Result<()> {
        let to = to.trim();
        ensure!(!to.is_empty(), "A unit id is required");
        if from == to {
            return Ok(());
        }
        if self.unit(to).is_some() {
            bail!("Unit '{to}' already exists");
        }
        let Some(unit) = self.units.iter_mut().find(|u| u.id() == from) else {
            bail!("Unit '{from}' not found");
        };
        unit.id = to.to_string();
        for extra in self.extras.iter_mut().filter(|e| e.unit_id() == from) {
            extra.unit_id = to.to_string();
        }
        Ok(())
    }

    /// Adds an extra charge. Its unit must be on the roster.
    pub fn add_extra(&mut self, extra: ExtraCharge) -> Result<&ExtraCharge> {
        ensure!(!extra.name().trim().is_empty(), "An extra needs a name");
        if self.unit(extra.unit_id()).is_none() {
            bail!("Unit '{}' not found", extra.unit_id());
        }
        self.extras.push(extra);
        Ok(&self.extras[self.extras.len() - 1])
    }

    pub fn remove_extra(&mut self, id: &str) -> Result<ExtraCharge> {
        let Some(ix) = self.extras.iter().position(|e| e.id() == id) else {
            bail!("Extra '{id}' not found");
        };
        Ok(self.extras.remove(ix))
    }
}
