//! The shared receipts of one month: electricity, water, gas and sanitation.

use crate::model::layout::MeterLayout;
use crate::model::numeric::{de_money, floor};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A sub-meter's readings at the start and end of the period, in kWh.
#[derive(Default, Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeterReading {
    #[serde(default, deserialize_with = "de_money")]
    pub(crate) previous: Decimal,
    #[serde(default, deserialize_with = "de_money")]
    pub(crate) current: Decimal,
}

impl MeterReading {
    pub fn new(previous: Decimal, current: Decimal) -> Self {
        Self {
            previous: floor(previous),
            current: floor(current),
        }
    }

    pub fn previous(&self) -> Decimal {
        self.previous
    }

    pub fn current(&self) -> Decimal {
        self.current
    }

    /// The kWh used in the period. A current reading below the previous one means no usage.
    pub fn consumption(&self) -> Decimal {
        floor(self.current.saturating_sub(self.previous))
    }
}

/// One electricity receipt with the sub-meter readings of the units it covers.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectricityReceipt {
    #[serde(default, deserialize_with = "de_money")]
    pub(crate) total_kwh: Decimal,
    #[serde(default, deserialize_with = "de_money")]
    pub(crate) total_price: Decimal,
    /// Sub-meter readings keyed by unit number, e.g. `"202"`.
    #[serde(default)]
    pub(crate) readings: BTreeMap<String, MeterReading>,
}

impl ElectricityReceipt {
    pub fn new(total_kwh: Decimal, total_price: Decimal) -> Self {
        Self {
            total_kwh: floor(total_kwh),
            total_price: floor(total_price),
            readings: BTreeMap::new(),
        }
    }

    /// An empty receipt with a zeroed reading for every sub-meter in `layout`.
    pub fn for_layout(layout: &MeterLayout) -> Self {
        let mut receipt = Self::default();
        for pattern in layout.sub_metered {
            receipt
                .readings
                .insert(pattern.to_string(), MeterReading::default());
        }
        receipt
    }

    pub fn total_kwh(&self) -> Decimal {
        self.total_kwh
    }

    pub fn total_price(&self) -> Decimal {
        self.total_price
    }

    /// The reading for `pattern`, or zeros when none has been entered.
    pub fn reading(&self, pattern: &str) -> MeterReading {
        self.readings.get(pattern).copied().unwrap_or_default()
    }

    pub(crate) fn set_total_kwh(&mut self, value: Decimal) {
        self.total_kwh = floor(value);
    }

    pub(crate) fn set_total_price(&mut self, value: Decimal) {
        self.total_price = floor(value);
    }

    pub(crate) fn set_reading(&mut self, pattern: impl Into<String>, reading: MeterReading) {
        self.readings.insert(pattern.into(), reading);
    }
}

/// The building's water receipt.
#[derive(Default, Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterCharge {
    #[serde(default, deserialize_with = "de_money")]
    pub(crate) total_price: Decimal,
}

impl WaterCharge {
    pub fn new(total_price: Decimal) -> Self {
        Self {
            total_price: floor(total_price),
        }
    }

    pub fn total_price(&self) -> Decimal {
        self.total_price
    }
}

/// A flat charge shared by a fixed group of units. Used for both gas and sanitation receipts.
#[derive(Default, Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupCharge {
    #[serde(default, deserialize_with = "de_money")]
    pub(crate) price: Decimal,
}

impl GroupCharge {
    pub fn new(price: Decimal) -> Self {
        Self {
            price: floor(price),
        }
    }

    pub fn price(&self) -> Decimal {
        self.price
    }
}

/// A gas receipt, split per person within its group.
pub type GasCharge = GroupCharge;

/// A sanitation ("aseo") charge, split evenly among its group's members.
pub type SanitationCharge = GroupCharge;
