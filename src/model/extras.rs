use crate::model::numeric::de_signed;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A one-off charge billed in full to a single unit.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtraCharge {
    pub(crate) id: String,
    pub(crate) name: String,
    #[serde(default, deserialize_with = "de_signed")]
    pub(crate) amount: Decimal,
    pub(crate) unit_id: String,
}

impl ExtraCharge {
    /// Creates a charge with a freshly generated id.
    pub fn new(name: impl Into<String>, amount: Decimal, unit_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().simple().to_string(),
            name: name.into(),
            amount,
            unit_id: unit_id.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn unit_id(&self) -> &str {
        &self.unit_id
    }
}

/// Sums extras by name, keeping the order in which each name first appears.
pub fn totals_by_name<'a>(extras: impl IntoIterator<Item = (&'a str, Decimal)>) -> Vec<(String, Decimal)> {
    let mut totals: Vec<(String, Decimal)> = Vec::new();
    for (name, amount) in extras {
        match totals.iter_mut().find(|(n, _)| n == name) {
            Some((_, total)) => *total = total.saturating_add(amount),
            None => totals.push((name.to_string(), amount)),
        }
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ids_are_unique() {
        let a = ExtraCharge::new("Internet", Decimal::from(15000), "201");
        let b = ExtraCharge::new("Internet", Decimal::from(15000), "201");
        assert_ne!(a.id(), b.id());
        assert_eq!(a.id().len(), 32);
    }

    #[test]
    fn test_totals_by_name_keeps_first_seen_order() {
        let totals = totals_by_name(vec![
            ("Internet", Decimal::from(10)),
            ("Repair", Decimal::from(5)),
            ("Internet", Decimal::from(7)),
        ]);
        assert_eq!(
            totals,
            vec![
                ("Internet".to_string(), Decimal::from(17)),
                ("Repair".to_string(), Decimal::from(5)),
            ]
        );
    }

    #[test]
    fn test_deserialize_stored_shape() {
        let extra: ExtraCharge = serde_json::from_str(
            r#"{"id": "lq2x9a", "name": "Internet", "amount": 15000, "unitId": "201"}"#,
        )
        .unwrap();
        assert_eq!(extra.unit_id(), "201");
        assert_eq!(extra.amount(), Decimal::from(15000));
    }
}
