use super::resolve::resolve_group;
use super::{rate, GroupDiagnostics, Share};
use crate::model::{SanitationCharge, Unit};
use rust_decimal::Decimal;

/// Splits a sanitation charge evenly among its members.
///
/// Units matched by `always` are members regardless of occupancy. Units matched by
/// `when_occupied` are members only while at least one person lives there. Group B relies on this
/// asymmetry: 500 always pays its share, 401 and 402 only when occupied. With no members the
/// charge is dropped.
pub(super) fn allocate(
    units: &[Unit],
    always: &[&str],
    when_occupied: &[&str],
    charge: &SanitationCharge,
    shares: &mut [Share],
) -> GroupDiagnostics {
    let (mut members, mut unresolved) = resolve_group(units, always);
    let (candidates, missing) = resolve_group(units, when_occupied);
    unresolved.extend(missing);

    let mut unoccupied = Vec::new();
    for ix in candidates {
        if members.contains(&ix) {
            continue;
        }
        if units[ix].people() > 0 {
            members.push(ix);
        } else {
            unoccupied.push(units[ix].id().to_string());
        }
    }

    let per_member = rate(charge.price(), Decimal::from(members.len() as u64));
    for ix in &members {
        shares[*ix].aseo = shares[*ix].aseo.saturating_add(per_member);
    }

    GroupDiagnostics {
        members: members.iter().map(|ix| units[*ix].id().to_string()).collect(),
        unresolved: unresolved.iter().map(|p| p.to_string()).collect(),
        unoccupied,
        rate: per_member,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::layout::{ASEO_A, ASEO_B_ALWAYS, ASEO_B_WHEN_OCCUPIED};

    fn units(rows: &[(&str, u32)]) -> Vec<Unit> {
        rows.iter()
            .map(|(id, people)| Unit::new(*id, *people, Decimal::ZERO))
            .collect()
    }

    fn group_b(u: &[Unit], price: u32) -> (Vec<Share>, GroupDiagnostics) {
        let mut shares = vec![Share::default(); u.len()];
        let d = allocate(
            u,
            &[ASEO_B_ALWAYS],
            ASEO_B_WHEN_OCCUPIED,
            &SanitationCharge::new(Decimal::from(price)),
            &mut shares,
        );
        (shares, d)
    }

    #[test]
    fn test_group_a_ignores_occupancy() {
        let u = units(&[("201", 0), ("202", 3)]);
        let mut shares = vec![Share::default(); u.len()];
        let d = allocate(
            &u,
            ASEO_A,
            &[],
            &SanitationCharge::new(Decimal::from(5000)),
            &mut shares,
        );
        assert_eq!(shares[0].aseo, Decimal::from(2500));
        assert_eq!(shares[1].aseo, Decimal::from(2500));
        assert_eq!(d.members.len(), 2);
    }

    #[test]
    fn test_group_b_empty_anchor_still_pays() {
        let u = units(&[("401", 2), ("402", 1), ("500", 0)]);
        let (shares, d) = group_b(&u, 9000);
        assert_eq!(d.members, vec!["500", "401", "402"]);
        assert!(shares.iter().all(|s| s.aseo == Decimal::from(3000)));
    }

    #[test]
    fn test_group_b_only_anchor_when_others_empty() {
        let u = units(&[("401", 0), ("402", 0), ("500", 1)]);
        let (shares, d) = group_b(&u, 9000);
        assert_eq!(shares[2].aseo, Decimal::from(9000));
        assert_eq!(shares[0].aseo, Decimal::ZERO);
        assert_eq!(shares[1].aseo, Decimal::ZERO);
        assert_eq!(d.unoccupied, vec!["401", "402"]);
    }

    #[test]
    fn test_group_b_one_sibling_occupied() {
        let u = units(&[("401", 0), ("402", 4), ("500", 1)]);
        let (shares, _) = group_b(&u, 9000);
        assert_eq!(shares[1].aseo, Decimal::from(4500));
        assert_eq!(shares[2].aseo, Decimal::from(4500));
    }

    #[test]
    fn test_group_b_without_members_drops_charge() {
        let u = units(&[("101", 1), ("401", 0)]);
        let (shares, d) = group_b(&u, 9000);
        assert!(shares.iter().all(|s| s.aseo.is_zero()));
        assert_eq!(d.rate, Decimal::ZERO);
        assert_eq!(d.unresolved, vec!["500", "402"]);
    }
}
