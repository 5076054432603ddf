use crate::model::Unit;

/// Finds the roster position of the unit that pays for the meter or receipt slot `pattern`.
///
/// Receipts name fixed unit numbers such as `"201"` while roster ids are free text. A unit whose
/// id is exactly `pattern` wins, then the first unit in roster order whose id contains it (e.g.
/// `Depto 201`). `None` means nobody pays for this slot.
pub fn resolve(units: &[Unit], pattern: &str) -> Option<usize> {
    units
        .iter()
        .position(|u| u.id() == pattern)
        .or_else(|| units.iter().position(|u| u.id().contains(pattern)))
}

/// Resolves every pattern of a group. Units matched by more than one pattern appear once.
/// Returns the matched positions and the patterns that matched nothing.
pub(crate) fn resolve_group<'a>(
    units: &[Unit],
    patterns: &[&'a str],
) -> (Vec<usize>, Vec<&'a str>) {
    let mut members = Vec::new();
    let mut unresolved = Vec::new();
    for pattern in patterns {
        match resolve(units, pattern) {
            Some(ix) if !members.contains(&ix) => members.push(ix),
            Some(_) => {}
            None => unresolved.push(*pattern),
        }
    }
    (members, unresolved)
}
