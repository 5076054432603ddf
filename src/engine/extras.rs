use super::{ExtraLine, Share};
use crate::model::{ExtraCharge, Unit};

/// Bills each extra in full to its unit. Returns the ids of extras whose unit is not on the
/// roster.
pub(super) fn allocate(units: &[Unit], extras: &[ExtraCharge], shares: &mut [Share]) -> Vec<String> {
    let mut unassigned = Vec::new();
    for extra in extras {
        match units.iter().position(|u| u.id() == extra.unit_id()) {
            Some(ix) => {
                let share = &mut shares[ix];
                share.extras = share.extras.saturating_add(extra.amount());
                share.extras_detail.push(ExtraLine {
                    name: extra.name().to_string(),
                    amount: extra.amount(),
                });
            }
            None => unassigned.push(extra.id().to_string()),
        }
    }
    unassigned
}
