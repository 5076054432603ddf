//! The physical layout of the building's meters and shared receipts.
//!
//! Receipts are tied to fixed unit numbers. The engine finds the unit that pays for each slot with
//! `engine::resolve`, so the roster ids only need to contain these numbers.

/// Which units an electricity receipt covers and how its consumption is split.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct MeterLayout {
    /// Units with their own sub-meter, in reading order.
    pub sub_metered: &'static [&'static str],
    /// The unit that pays whatever the sub-meters do not account for.
    pub residual: &'static str,
}

/// Electricity receipt A: 202 has a sub-meter, 201 pays the rest.
pub const ELECTRICITY_A: MeterLayout = MeterLayout {
    sub_metered: &["202"],
    residual: "201",
};

/// Electricity receipt B: 401 and 500 have sub-meters, 402 pays the rest.
pub const ELECTRICITY_B: MeterLayout = MeterLayout {
    sub_metered: &["401", "500"],
    residual: "402",
};

/// Units sharing gas receipt A.
pub const GAS_A: &[&str] = &["201", "202"];

/// Units sharing gas receipt B.
pub const GAS_B: &[&str] = &["401", "402"];

/// Units sharing sanitation charge A, billed regardless of occupancy.
pub const ASEO_A: &[&str] = &["201", "202"];

/// The unit that always shares sanitation charge B.
pub const ASEO_B_ALWAYS: &str = "500";

/// Units that share sanitation charge B only while someone lives there.
pub const ASEO_B_WHEN_OCCUPIED: &[&str] = &["401", "402"];

/// The roster a new home directory starts with.
pub const DEFAULT_UNITS: &[&str] = &["101", "201", "202", "300", "401", "402", "500"];
