//! Types that represent the data model, such as `Unit`, the receipts and `Overrides`.
mod amount;
mod extras;
pub mod layout;
pub mod numeric;
mod overrides;
mod receipts;
mod state;
mod unit;

pub use amount::{round, Amount, AmountFormat, MONEY_DP};
pub use extras::{totals_by_name, ExtraCharge};
pub use overrides::{Field, FieldOverrides, OverrideState, Overrides, Source};
pub use receipts::{
    ElectricityReceipt, GasCharge, GroupCharge, MeterReading, SanitationCharge, WaterCharge,
};
pub use state::{BillingState, Receipt, RemovedUnit};
pub use unit::Unit;
