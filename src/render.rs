//! Plain-text and CSV renderings of an allocation for the terminal.

use crate::engine::{Allocation, Diagnostics, ElectricityDiagnostics, GroupDiagnostics, UnitSummary};
use crate::model::numeric::saturating_sum;
use crate::model::{Amount, AmountFormat, Field, Source};
use crate::Result;
use anyhow::Context;
use rust_decimal::Decimal;
use std::fmt::Write;

/// Appended to a figure that came from a manual override.
pub const OVERRIDE_MARK: &str = "*";

const PLAIN: AmountFormat = AmountFormat::new(false);

/// The fixed columns before the per-extra columns.
const LEADING: [(Field, &str); 4] = [
    (Field::Electricity, "Electricity"),
    (Field::Water, "Water"),
    (Field::Gas, "Gas"),
    (Field::Aseo, "Aseo"),
];

/// Renders the breakdown of every unit as an aligned table, one row per unit plus a totals row.
///
/// Each distinct extra name gets its own column. The `Extras` column holds the unit's extras
/// figure, which is what the total uses, so an overridden extras value is visible there.
pub fn table(allocation: &Allocation) -> String {
    let names = allocation.extra_names();
    let mut header = vec!["Unit".to_string()];
    header.extend(LEADING.iter().map(|(_, label)| label.to_string()));
    header.extend(names.iter().cloned());
    header.extend(["Extras", "Rent", "Total"].map(String::from));

    let mut rows = vec![header];
    let mut any_override = false;
    for unit in &allocation.units {
        let mut row = vec![unit.unit_id.clone()];
        for (field, _) in LEADING {
            row.push(cell(unit.get(field), unit.source(field)));
        }
        let by_name = unit.extras_by_name();
        for name in &names {
            let value = by_name.iter().find(|(n, _)| n == name).map(|(_, v)| *v);
            row.push(value.map(plain).unwrap_or_default());
        }
        row.push(cell(unit.extras, unit.source(Field::Extras)));
        row.push(cell(unit.rent, unit.source(Field::Rent)));
        row.push(plain(unit.total));
        any_override |= !unit.overridden.is_empty();
        rows.push(row);
    }

    let mut footer = vec!["Total".to_string()];
    for (field, _) in LEADING {
        footer.push(plain(saturating_sum(
            allocation.units.iter().map(|u| u.get(field)),
        )));
    }
    for name in &names {
        let sum = saturating_sum(
            allocation
                .units
                .iter()
                .flat_map(|u| u.extras_detail.iter())
                .filter(|line| &line.name == name)
                .map(|line| line.amount),
        );
        footer.push(plain(sum));
    }
    footer.push(plain(saturating_sum(allocation.units.iter().map(|u| u.extras))));
    footer.push(plain(saturating_sum(allocation.units.iter().map(|u| u.rent))));
    footer.push(plain(allocation.grand_total()));
    rows.push(footer);

    let mut out = align(&rows);
    if any_override {
        out.push_str(&format!("{OVERRIDE_MARK} manual override\n"));
    }
    out
}

/// Renders the intermediate figures of an allocation.
pub fn diagnostics(d: &Diagnostics) -> String {
    let mut out = String::new();
    electricity(&mut out, "Electricity A", &d.electricity_a);
    electricity(&mut out, "Electricity B", &d.electricity_b);
    let _ = writeln!(out, "Water: {} per person", Amount::from(d.water_per_head));
    group(&mut out, "Gas A", "per person", &d.gas_a);
    group(&mut out, "Gas B", "per person", &d.gas_b);
    group(&mut out, "Aseo A", "per unit", &d.aseo_a);
    group(&mut out, "Aseo B", "per unit", &d.aseo_b);
    if !d.unassigned_extras.is_empty() {
        let _ = writeln!(
            out,
            "Extras without a unit: {}",
            d.unassigned_extras.join(", ")
        );
    }
    out
}

fn electricity(out: &mut String, title: &str, d: &ElectricityDiagnostics) {
    let _ = writeln!(out, "{title}: {} per kWh", Amount::from(d.price_per_kwh));
    for meter in &d.meters {
        let payer = meter.unit_id.as_deref().unwrap_or("nobody");
        let kind = if meter.residual { "residual" } else { "meter" };
        let _ = writeln!(
            out,
            "  {kind} {}: {} kWh -> {payer} {}",
            meter.pattern,
            meter.kwh,
            Amount::from(meter.cost)
        );
    }
}

fn group(out: &mut String, title: &str, per: &str, d: &GroupDiagnostics) {
    let members = if d.members.is_empty() {
        "none".to_string()
    } else {
        d.members.join(", ")
    };
    let _ = writeln!(out, "{title}: {} {per} [{members}]", Amount::from(d.rate));
    if !d.unoccupied.is_empty() {
        let _ = writeln!(out, "  unoccupied: {}", d.unoccupied.join(", "));
    }
    if !d.unresolved.is_empty() {
        let _ = writeln!(out, "  no unit matches: {}", d.unresolved.join(", "));
    }
}

/// Renders one unit's bill as a two-column card.
pub fn summary(s: &UnitSummary) -> String {
    let mut rows = vec![vec![format!("Unit {}", s.unit_id), String::new()]];
    for line in &s.lines {
        let mut amount = Amount::from(line.amount).to_string();
        if line.source == Source::Overridden {
            amount.push_str(OVERRIDE_MARK);
        }
        rows.push(vec![line.label.clone(), amount]);
    }
    rows.push(vec!["Total".to_string(), Amount::from(s.total).to_string()]);
    align(&rows)
}

/// Writes the breakdown as CSV with plain decimal numbers, one row per unit.
pub fn csv(allocation: &Allocation) -> Result<String> {
    let names = allocation.extra_names();
    let mut wtr = csv::Writer::from_writer(Vec::new());

    let mut header: Vec<String> = vec!["unit".into()];
    header.extend(["electricity", "water", "gas", "aseo"].map(String::from));
    header.extend(names.iter().cloned());
    header.extend(["extras", "rent", "total", "overridden"].map(String::from));
    wtr.write_record(&header)
        .context("Unable to write the CSV header")?;

    for unit in &allocation.units {
        let mut record = vec![unit.unit_id.clone()];
        for (field, _) in LEADING {
            record.push(unit.get(field).to_string());
        }
        let by_name = unit.extras_by_name();
        for name in &names {
            let value = by_name.iter().find(|(n, _)| n == name).map(|(_, v)| *v);
            record.push(value.map(|v| v.to_string()).unwrap_or_default());
        }
        record.push(unit.extras.to_string());
        record.push(unit.rent.to_string());
        record.push(unit.total.to_string());
        record.push(
            unit.overridden
                .iter()
                .map(|f| f.to_string())
                .collect::<Vec<_>>()
                .join(";"),
        );
        wtr.write_record(&record)
            .with_context(|| format!("Unable to write the CSV row of unit {}", unit.unit_id))?;
    }

    let bytes = wtr.into_inner().context("Unable to flush the CSV writer")?;
    String::from_utf8(bytes).context("The CSV output is not UTF-8")
}

fn plain(value: Decimal) -> String {
    Amount::new_with_format(value, PLAIN).to_string()
}

fn cell(value: Decimal, source: Source) -> String {
    let mut s = plain(value);
    if source == Source::Overridden {
        s.push_str(OVERRIDE_MARK);
    }
    s
}

/// Pads every column to its widest cell. The first column is left aligned, the rest right aligned.
fn align(rows: &[Vec<String>]) -> String {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|c| {
            rows.iter()
                .filter_map(|r| r.get(c))
                .map(|s| s.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    for row in rows {
        let mut line = String::new();
        for (c, text) in row.iter().enumerate() {
            let width = widths[c];
            if c == 0 {
                let _ = write!(line, "{text:<width$}");
            } else {
                let _ = write!(line, "  {text:>width$}");
            }
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{allocate, summarize, Includes};
    use crate::model::{BillingState, ExtraCharge, MeterReading, Overrides, Receipt};

    fn state() -> BillingState {
        let mut state = BillingState::default();
        let receipt = state.electricity_mut(Receipt::A);
        receipt.set_total_kwh(Decimal::from(300));
        receipt.set_total_price(Decimal::from(90000));
        receipt.set_reading("202", MeterReading::new(Decimal::from(20), Decimal::from(50)));
        state
            .add_extra(ExtraCharge::new("Internet", Decimal::from(12000), "201"))
            .unwrap();
        state
    }

    #[test]
    fn test_table_has_extra_columns_and_totals() {
        let state = state();
        let allocation = allocate(&state.input(), &Overrides::new());
        let out = table(&allocation);
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("Unit"));
        assert!(lines[0].contains("Internet"));
        let row_201 = lines.iter().find(|l| l.starts_with("201")).unwrap();
        assert!(row_201.contains("81.000"));
        assert!(row_201.contains("12.000"));
        assert!(row_201.ends_with("93.000"));
        assert!(lines.last().unwrap().starts_with("Total"));
        assert!(!out.contains(OVERRIDE_MARK));
    }

    #[test]
    fn test_table_marks_overrides() {
        let state = state();
        let mut overrides = Overrides::new();
        overrides.set("202", Field::Electricity, Decimal::from(5000));
        let allocation = allocate(&state.input(), &overrides);
        let out = table(&allocation);
        let row_202 = out.lines().find(|l| l.starts_with("202")).unwrap();
        assert!(row_202.contains("5.000*"));
        assert!(out.ends_with("* manual override\n"));
    }

    #[test]
    fn test_summary_card() {
        let state = state();
        let allocation = allocate(&state.input(), &Overrides::new());
        let s = summarize(
            allocation.get("201").unwrap(),
            &Includes::excluding(&[Field::Rent]),
        );
        let out = summary(&s);
        assert!(out.starts_with("Unit 201"));
        assert!(out.contains("Internet"));
        assert!(out.lines().last().unwrap().ends_with("$ 93.000"));
    }

    #[test]
    fn test_diagnostics_names_payers() {
        let state = state();
        let allocation = allocate(&state.input(), &Overrides::new());
        let out = diagnostics(&allocation.diagnostics);
        assert!(out.contains("Electricity A: $ 300 per kWh"));
        assert!(out.contains("meter 202: 30 kWh -> 202 $ 9.000"));
        assert!(out.contains("residual 201: 270 kWh -> 201 $ 81.000"));
    }

    #[test]
    fn test_csv_rows() {
        let state = state();
        let allocation = allocate(&state.input(), &Overrides::new());
        let out = csv(&allocation).unwrap();
        let mut lines = out.lines();
        assert_eq!(
            lines.next().unwrap(),
            "unit,electricity,water,gas,aseo,Internet,extras,rent,total,overridden"
        );
        assert_eq!(out.lines().count(), 1 + state.units().len());
        let row_201 = out.lines().find(|l| l.starts_with("201,")).unwrap();
        assert!(row_201.contains(",12000"));
    }
}
