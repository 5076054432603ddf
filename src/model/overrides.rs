//! Manual overrides: operator-supplied values that replace computed figures for a unit.
//!
//! A unit with no entry is *computed*. Setting any field makes it *overridden* and it stays that
//! way until every field is cleared or the unit is removed. Empty entries are never stored, so
//! the presence of a key is the state.

use crate::model::numeric::de_opt_signed;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The per-unit figures that can be overridden.
#[derive(
    Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Electricity,
    Water,
    Gas,
    Aseo,
    Rent,
    Extras,
}

serde_plain::derive_display_from_serialize!(Field);
serde_plain::derive_fromstr_from_deserialize!(Field);

impl Field {
    /// Every field, in display order.
    pub const ALL: [Field; 6] = [
        Field::Electricity,
        Field::Water,
        Field::Gas,
        Field::Aseo,
        Field::Rent,
        Field::Extras,
    ];
}

/// Where a displayed figure came from.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Computed,
    Overridden,
}

/// Whether a unit has any override at all.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideState {
    Computed,
    Overridden,
}

/// The overridden fields of one unit. `None` means use the computed value.
#[derive(Default, Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct FieldOverrides {
    #[serde(
        default,
        deserialize_with = "de_opt_signed",
        skip_serializing_if = "Option::is_none"
    )]
    electricity: Option<Decimal>,
    #[serde(
        default,
        deserialize_with = "de_opt_signed",
        skip_serializing_if = "Option::is_none"
    )]
    water: Option<Decimal>,
    #[serde(
        default,
        deserialize_with = "de_opt_signed",
        skip_serializing_if = "Option::is_none"
    )]
    gas: Option<Decimal>,
    #[serde(
        default,
        deserialize_with = "de_opt_signed",
        skip_serializing_if = "Option::is_none"
    )]
    aseo: Option<Decimal>,
    #[serde(
        default,
        deserialize_with = "de_opt_signed",
        skip_serializing_if = "Option::is_none"
    )]
    rent: Option<Decimal>,
    #[serde(
        default,
        deserialize_with = "de_opt_signed",
        skip_serializing_if = "Option::is_none"
    )]
    extras: Option<Decimal>,
}

impl FieldOverrides {
    pub fn get(&self, field: Field) -> Option<Decimal> {
        *self.slot(field)
    }

    pub fn is_empty(&self) -> bool {
        Field::ALL.iter().all(|f| self.get(*f).is_none())
    }

    /// The fields that hold a value, in display order.
    pub fn fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|f| self.get(*f).is_some())
            .collect()
    }

    fn set(&mut self, field: Field, value: Option<Decimal>) {
        *self.slot_mut(field) = value;
    }

    fn slot(&self, field: Field) -> &Option<Decimal> {
        match field {
            Field::Electricity => &self.electricity,
            Field::Water => &self.water,
            Field::Gas => &self.gas,
            Field::Aseo => &self.aseo,
            Field::Rent => &self.rent,
            Field::Extras => &self.extras,
        }
    }

    fn slot_mut(&mut self, field: Field) -> &mut Option<Decimal> {
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

/// All manual overrides, keyed by unit id. Persisted apart from the main state.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Overrides(BTreeMap<String, FieldOverrides>);

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces `field` of `unit_id` with `value`.
    pub fn set(&mut self, unit_id: impl Into<String>, field: Field, value: Decimal) {
        self.0.entry(unit_id.into()).or_default().set(field, Some(value));
    }

    /// Goes back to the computed value of `field`. Returns whether anything was cleared.
    pub fn clear(&mut self, unit_id: &str, field: Field) -> bool {
        let Some(entry) = self.0.get_mut(unit_id) else {
            return false;
        };
        let cleared = entry.get(field).is_some();
        entry.set(field, None);
        if entry.is_empty() {
            self.0.remove(unit_id);
        }
        cleared
    }

    /// Clears every field of `unit_id`. Returns the fields that were cleared.
    pub fn clear_unit(&mut self, unit_id: &str) -> Vec<Field> {
        self.0
            .remove(unit_id)
            .map(|entry| entry.fields())
            .unwrap_or_default()
    }

    /// Clears every override. Returns how many units had one.
    pub fn clear_all(&mut self) -> usize {
        let n = self.0.len();
        self.0.clear();
        n
    }

    /// Drops the entry of a unit that left the roster.
    pub fn remove_unit(&mut self, unit_id: &str) -> bool {
        self.0.remove(unit_id).is_some()
    }

    /// Moves the entry of a unit whose id changed.
    pub fn rename_unit(&mut self, from: &str, to: &str) {
        if let Some(entry) = self.0.remove(from) {
            self.0.insert(to.to_string(), entry);
        }
    }

    pub fn get(&self, unit_id: &str) -> Option<&FieldOverrides> {
        self.0.get(unit_id)
    }

    pub fn value(&self, unit_id: &str, field: Field) -> Option<Decimal> {
        self.get(unit_id).and_then(|entry| entry.get(field))
    }

    pub fn state(&self, unit_id: &str) -> OverrideState {
        if self.0.contains_key(unit_id) {
            OverrideState::Overridden
        } else {
            OverrideState::Computed
        }
    }

    pub fn source(&self, unit_id: &str, field: Field) -> Source {
        match self.value(unit_id, field) {
            Some(_) => Source::Overridden,
            None => Source::Computed,
        }
    }

    /// Returns `computed` unless `field` of `unit_id` is overridden.
    pub fn apply(&self, unit_id: &str, field: Field, computed: Decimal) -> Decimal {
        self.value(unit_id, field).unwrap_or(computed)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldOverrides)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Drops entries that hold no value, e.g. from a hand-edited file with only `null`s.
    pub(crate) fn compact(&mut self) {
        self.0.retain(|_, entry| !entry.is_empty());
    }
}
