//! These structs provide the CLI interface for the bills CLI.

use crate::model::numeric::{count_arg, money_arg, signed_arg};
use crate::model::{Field, Receipt};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// bills: split a building's monthly utility receipts among its units.
///
/// Enter the month's electricity, water, gas and sanitation (aseo) receipts, the occupants and
/// rent of each unit and any extra charges. The program works out what every unit owes. Any
/// figure can be replaced by hand with `bills override set`, and `bills show` marks those
/// figures so you can tell them apart from the computed ones.
///
/// Run `bills init` first. It creates the data directory, `~/bills` unless you pass
/// --bills-home, with the building's default roster.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory with the default roster and empty receipts.
    ///
    /// The default roster is units 101, 201, 202, 300, 401, 402 and 500, with one occupant each
    /// and no rent. Use the `unit` subcommands to adjust it.
    Init,
    /// Print what every unit owes.
    Show(ShowArgs),
    /// Print the bill of one unit, optionally leaving out some concepts.
    Summary(SummaryArgs),
    /// Add, remove or change units.
    Unit(UnitArgs),
    /// Enter the month's receipts.
    Set(SetArgs),
    /// Add or remove extra charges.
    Extra(ExtraArgs),
    /// Replace computed figures by hand, or go back to the computed ones.
    Override(OverrideArgs),
    /// Replace the state with a JSON document, e.g. one written by `bills export`.
    Import(ImportArgs),
    /// Write the state as JSON to a file or to stdout.
    Export(ExportArgs),
    /// Go back to the default roster with empty receipts, no extras and no overrides.
    Reset(ResetArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where the bills data and configuration is held. Defaults to ~/bills
    #[arg(long, env = "BILLS_HOME", default_value_t = default_bills_home())]
    bills_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, bills_home: PathBuf) -> Self {
        Self {
            log_level,
            bills_home: bills_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn bills_home(&self) -> &DisplayPath {
        &self.bills_home
    }
}

/// Args for the `bills show` command.
#[derive(Debug, Default, Parser, Clone)]
pub struct ShowArgs {
    /// Print the allocation and its diagnostics as JSON.
    #[arg(long, conflicts_with = "csv")]
    json: bool,

    /// Print the breakdown as CSV.
    #[arg(long)]
    csv: bool,

    /// Also print the intermediate figures: price per kWh, meter consumption, group members.
    #[arg(long)]
    details: bool,
}

impl ShowArgs {
    pub fn new(json: bool, csv: bool, details: bool) -> Self {
        Self { json, csv, details }
    }

    pub fn json(&self) -> bool {
        self.json
    }

    pub fn csv(&self) -> bool {
        self.csv
    }

    pub fn details(&self) -> bool {
        self.details
    }
}

/// Args for the `bills summary` command.
#[derive(Debug, Parser, Clone)]
pub struct SummaryArgs {
    /// The unit to summarize.
    unit: String,

    /// A concept to leave out of the bill. Repeat to leave out several.
    #[arg(long, value_enum)]
    exclude: Vec<Field>,

    /// Print the summary as JSON.
    #[arg(long)]
    json: bool,
}

impl SummaryArgs {
    pub fn new(unit: impl Into<String>, exclude: Vec<Field>, json: bool) -> Self {
        Self {
            unit: unit.into(),
            exclude,
            json,
        }
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn exclude(&self) -> &[Field] {
        &self.exclude
    }

    pub fn json(&self) -> bool {
        self.json
    }
}

/// Args for the `bills unit` command.
#[derive(Debug, Parser, Clone)]
pub struct UnitArgs {
    #[command(subcommand)]
    command: UnitCommand,
}

impl UnitArgs {
    pub fn command(&self) -> &UnitCommand {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum UnitCommand {
    /// Add a unit to the end of the roster.
    Add(UnitAddArgs),
    /// Remove a unit together with its extras and overrides.
    Remove(UnitRemoveArgs),
    /// Change the occupants, rent or id of a unit.
    Update(UnitUpdateArgs),
}

#[derive(Debug, Parser, Clone)]
pub struct UnitAddArgs {
    /// The unit id, e.g. "301".
    id: String,

    /// Number of occupants. Anything that is not a number counts as 0.
    #[arg(long, default_value = "1", value_parser = count_arg)]
    people: u32,

    /// Monthly rent. Anything that is not a number counts as 0.
    #[arg(long, default_value = "0", value_parser = money_arg)]
    rent: Decimal,
}

impl UnitAddArgs {
    pub fn new(id: impl Into<String>, people: u32, rent: Decimal) -> Self {
        Self {
            id: id.into(),
            people,
            rent,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn people(&self) -> u32 {
        self.people
    }

    pub fn rent(&self) -> Decimal {
        self.rent
    }
}

#[derive(Debug, Parser, Clone)]
pub struct UnitRemoveArgs {
    /// The unit id.
    id: String,

    /// Confirm the removal. The unit's extras and overrides are removed too.
    #[arg(long)]
    yes: bool,
}

impl UnitRemoveArgs {
    pub fn new(id: impl Into<String>, yes: bool) -> Self {
        Self { id: id.into(), yes }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn yes(&self) -> bool {
        self.yes
    }
}

#[derive(Debug, Default, Parser, Clone)]
pub struct UnitUpdateArgs {
    /// The unit id.
    id: String,

    /// New number of occupants.
    #[arg(long, value_parser = count_arg)]
    people: Option<u32>,

    /// New monthly rent.
    #[arg(long, value_parser = money_arg)]
    rent: Option<Decimal>,

    /// New id for the unit. Its extras and overrides follow it.
    #[arg(long)]
    rename: Option<String>,
}

impl UnitUpdateArgs {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_people(mut self, people: u32) -> Self {
        self.people = Some(people);
        self
    }

    pub fn with_rent(mut self, rent: Decimal) -> Self {
        self.rent = Some(rent);
        self
    }

    pub fn with_rename(mut self, rename: impl Into<String>) -> Self {
        self.rename = Some(rename.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn people(&self) -> Option<u32> {
        self.people
    }

    pub fn rent(&self) -> Option<Decimal> {
        self.rent
    }

    pub fn rename(&self) -> Option<&str> {
        self.rename.as_deref()
    }
}

/// Args for the `bills set` command.
#[derive(Debug, Parser, Clone)]
pub struct SetArgs {
    #[command(subcommand)]
    command: SetCommand,
}

impl SetArgs {
    pub fn command(&self) -> &SetCommand {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum SetCommand {
    /// Set the total consumption and price of an electricity receipt.
    Electricity(ElectricityArgs),
    /// Set the previous and current reading of a sub-meter.
    ///
    /// Receipt A has the meter of 202. Receipt B has the meters of 401 and 500.
    Reading(ReadingArgs),
    /// Set the water receipt, split per person among all units.
    Water(PriceArgs),
    /// Set a gas receipt. Receipt A is split per person among 201 and 202, receipt B among 401
    /// and 402.
    Gas(GroupPriceArgs),
    /// Set a sanitation (aseo) charge. Charge A is split evenly between 201 and 202. Charge B is
    /// split among 500 and whichever of 401 and 402 have occupants.
    Aseo(GroupPriceArgs),
}

#[derive(Debug, Parser, Clone)]
pub struct ElectricityArgs {
    /// Which receipt.
    #[arg(value_enum)]
    receipt: Receipt,

    /// Total kWh on the receipt.
    #[arg(long, value_parser = money_arg)]
    kwh: Option<Decimal>,

    /// Total price on the receipt.
    #[arg(long, value_parser = money_arg)]
    price: Option<Decimal>,
}

impl ElectricityArgs {
    pub fn new(receipt: Receipt, kwh: Option<Decimal>, price: Option<Decimal>) -> Self {
        Self {
            receipt,
            kwh,
            price,
        }
    }

    pub fn receipt(&self) -> Receipt {
        self.receipt
    }

    pub fn kwh(&self) -> Option<Decimal> {
        self.kwh
    }

    pub fn price(&self) -> Option<Decimal> {
        self.price
    }
}

#[derive(Debug, Parser, Clone)]
pub struct ReadingArgs {
    /// Which receipt.
    #[arg(value_enum)]
    receipt: Receipt,

    /// The unit number on the meter, e.g. "202".
    meter: String,

    /// The reading at the start of the period.
    #[arg(long, value_parser = money_arg)]
    previous: Option<Decimal>,

    /// The reading at the end of the period.
    #[arg(long, value_parser = money_arg)]
    current: Option<Decimal>,
}

impl ReadingArgs {
    pub fn new(
        receipt: Receipt,
        meter: impl Into<String>,
        previous: Option<Decimal>,
        current: Option<Decimal>,
    ) -> Self {
        Self {
            receipt,
            meter: meter.into(),
            previous,
            current,
        }
    }

    pub fn receipt(&self) -> Receipt {
        self.receipt
    }

    pub fn meter(&self) -> &str {
        &self.meter
    }

    pub fn previous(&self) -> Option<Decimal> {
        self.previous
    }

    pub fn current(&self) -> Option<Decimal> {
        self.current
    }
}

#[derive(Debug, Parser, Clone)]
pub struct PriceArgs {
    /// Total price on the receipt.
    #[arg(value_parser = money_arg)]
    price: Decimal,
}

impl PriceArgs {
    pub fn new(price: Decimal) -> Self {
        Self { price }
    }

    pub fn price(&self) -> Decimal {
        self.price
    }
}

#[derive(Debug, Parser, Clone)]
pub struct GroupPriceArgs {
    /// Which receipt.
    #[arg(value_enum)]
    receipt: Receipt,

    /// Total price on the receipt.
    #[arg(value_parser = money_arg)]
    price: Decimal,
}

impl GroupPriceArgs {
    pub fn new(receipt: Receipt, price: Decimal) -> Self {
        Self { receipt, price }
    }

    pub fn receipt(&self) -> Receipt {
        self.receipt
    }

    pub fn price(&self) -> Decimal {
        self.price
    }
}

/// Args for the `bills extra` command.
#[derive(Debug, Parser, Clone)]
pub struct ExtraArgs {
    #[command(subcommand)]
    command: ExtraCommand,
}

impl ExtraArgs {
    pub fn command(&self) -> &ExtraCommand {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum ExtraCommand {
    /// Charge an amount to one unit, e.g. `bills extra add 201 Internet 15000`.
    Add(ExtraAddArgs),
    /// Remove an extra charge by its id. `bills export` lists the ids.
    Remove(ExtraRemoveArgs),
}

#[derive(Debug, Parser, Clone)]
pub struct ExtraAddArgs {
    /// The unit that pays the charge.
    unit: String,

    /// What the charge is for. Charges with the same name share a column in `bills show`.
    name: String,

    /// The amount. May be negative, e.g. for a discount.
    #[arg(value_parser = signed_arg, allow_hyphen_values = true)]
    amount: Decimal,
}

impl ExtraAddArgs {
    pub fn new(unit: impl Into<String>, name: impl Into<String>, amount: Decimal) -> Self {
        Self {
            unit: unit.into(),
            name: name.into(),
            amount,
        }
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }
}

#[derive(Debug, Parser, Clone)]
pub struct ExtraRemoveArgs {
    /// The id of the extra charge.
    id: String,

    /// Confirm the removal.
    #[arg(long)]
    yes: bool,
}

impl ExtraRemoveArgs {
    pub fn new(id: impl Into<String>, yes: bool) -> Self {
        Self { id: id.into(), yes }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn yes(&self) -> bool {
        self.yes
    }
}

/// Args for the `bills override` command.
#[derive(Debug, Parser, Clone)]
pub struct OverrideArgs {
    #[command(subcommand)]
    command: OverrideCommand,
}

impl OverrideArgs {
    pub fn command(&self) -> &OverrideCommand {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum OverrideCommand {
    /// Replace one computed figure of a unit with the given amount.
    Set(OverrideSetArgs),
    /// Go back to the computed figure for one field, or for every field of the unit.
    Clear(OverrideClearArgs),
    /// Remove every override of every unit.
    ClearAll(OverrideClearAllArgs),
}

#[derive(Debug, Parser, Clone)]
pub struct OverrideSetArgs {
    /// The unit id.
    unit: String,

    /// The figure to replace.
    #[arg(value_enum)]
    field: Field,

    /// The amount to use instead of the computed one.
    #[arg(value_parser = signed_arg, allow_hyphen_values = true)]
    amount: Decimal,
}

impl OverrideSetArgs {
    pub fn new(unit: impl Into<String>, field: Field, amount: Decimal) -> Self {
        Self {
            unit: unit.into(),
            field,
            amount,
        }
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn field(&self) -> Field {
        self.field
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }
}

#[derive(Debug, Parser, Clone)]
pub struct OverrideClearArgs {
    /// The unit id.
    unit: String,

    /// The figure to go back to computing. Leave out to clear all of the unit's overrides.
    #[arg(value_enum)]
    field: Option<Field>,
}

impl OverrideClearArgs {
    pub fn new(unit: impl Into<String>, field: Option<Field>) -> Self {
        Self {
            unit: unit.into(),
            field,
        }
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn field(&self) -> Option<Field> {
        self.field
    }
}

#[derive(Debug, Parser, Clone)]
pub struct OverrideClearAllArgs {
    /// Confirm. A backup of the overrides is written first.
    #[arg(long)]
    yes: bool,
}

impl OverrideClearAllArgs {
    pub fn new(yes: bool) -> Self {
        Self { yes }
    }

    pub fn yes(&self) -> bool {
        self.yes
    }
}

/// Args for the `bills import` command.
#[derive(Debug, Parser, Clone)]
pub struct ImportArgs {
    /// The JSON document to import. It must have a `units` array.
    file: PathBuf,

    /// Confirm replacing the current state. A backup of it is written first.
    #[arg(long)]
    yes: bool,
}

impl ImportArgs {
    pub fn new(file: impl Into<PathBuf>, yes: bool) -> Self {
        Self {
            file: file.into(),
            yes,
        }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn yes(&self) -> bool {
        self.yes
    }
}

/// Args for the `bills export` command.
#[derive(Debug, Default, Parser, Clone)]
pub struct ExportArgs {
    /// Where to write the document. Leave out to print it to stdout.
    file: Option<PathBuf>,
}

impl ExportArgs {
    pub fn new(file: Option<PathBuf>) -> Self {
        Self { file }
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }
}

/// Args for the `bills reset` command.
#[derive(Debug, Parser, Clone)]
pub struct ResetArgs {
    /// Confirm. A backup of the current state is written first.
    #[arg(long)]
    yes: bool,
}

impl ResetArgs {
    pub fn new(yes: bool) -> Self {
        Self { yes }
    }

    pub fn yes(&self) -> bool {
        self.yes
    }
}

fn default_bills_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("bills"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --bills-home or BILLS_HOME instead of relying on the default \
                bills home directory. If you continue using the program right now, you may have \
                problems!",
            );
            PathBuf::from("bills")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}
