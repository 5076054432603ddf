//! Charges split by head count: water across the whole building, gas within a group.

use super::resolve::resolve_group;
use super::{rate, GroupDiagnostics, Share};
use crate::model::numeric::saturating_sum;
use crate::model::{GasCharge, Unit, WaterCharge};
use rust_decimal::Decimal;

fn people(units: &[Unit], members: impl IntoIterator<Item = usize>) -> Decimal {
    saturating_sum(
        members
            .into_iter()
            .map(|ix| Decimal::from(units[ix].people())),
    )
}

/// Every unit pays for its occupants. Returns the price per head.
pub(super) fn water(units: &[Unit], water: &WaterCharge, shares: &mut [Share]) -> Decimal {
    let per_head = rate(water.total_price(), people(units, 0..units.len()));
    for (unit, share) in units.iter().zip(shares.iter_mut()) {
        share.water = share
            .water
            .saturating_add(Decimal::from(unit.people()).saturating_mul(per_head));
    }
    per_head
}

/// The units of `group` pay for their occupants. With nobody living in the group the charge is
/// dropped.
pub(super) fn gas(
    units: &[Unit],
    group: &[&str],
    charge: &GasCharge,
    shares: &mut [Share],
) -> GroupDiagnostics {
    let (members, unresolved) = resolve_group(units, group);
    let per_head = rate(charge.price(), people(units, members.iter().copied()));
    for ix in &members {
        let cost = Decimal::from(units[*ix].people()).saturating_mul(per_head);
        shares[*ix].gas = shares[*ix].gas.saturating_add(cost);
    }
    GroupDiagnostics {
        members: members.iter().map(|ix| units[*ix].id().to_string()).collect(),
        unresolved: unresolved.iter().map(|p| p.to_string()).collect(),
        unoccupied: Vec::new(),
        rate: per_head,
    }
}
