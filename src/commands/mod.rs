//! Command handlers for the bills CLI.
//!
//! Every handler loads what it needs from the home directory, does one thing and writes back.
//! Errors leave this module tagged with an `ErrorType`.

mod extra;
mod init;
mod overrides;
mod reset;
mod set;
mod show;
mod transfer;
mod unit;

use crate::error::{ErrorType, IntoResult};
use crate::Result;
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info};

pub use extra::{extra_add, extra_remove};
pub use init::init;
pub use overrides::{override_clear, override_clear_all, override_set};
pub use reset::reset;
pub use set::{set_aseo, set_electricity, set_gas, set_reading, set_water};
pub use show::{show, summary};
pub use transfer::{export, import};
pub use unit::{unit_add, unit_remove, unit_update};

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data and a report for the terminal.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,

    /// Text meant for stdout, such as a table or an exported document.
    #[serde(skip)]
    report: Option<String>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
            report: None,
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
            report: None,
        }
    }

    /// Attach text that `print` writes to stdout.
    pub fn with_report(mut self, report: impl Into<String>) -> Self {
        self.report = Some(report.into());
        self
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    pub fn report(&self) -> Option<&str> {
        self.report.as_deref()
    }

    /// Print the report (if it exists) to stdout, the message to `info!` and the structured data
    /// (if it exists) as JSON to `debug!`.
    pub fn print(&self) {
        if let Some(report) = self.report() {
            print!("{report}");
            if !report.ends_with('\n') {
                println!();
            }
        }
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

/// Refuses a destructive command that was not confirmed with `--yes`.
fn confirmed(yes: bool, what: &str) -> Result<()> {
    if yes {
        return Ok(());
    }
    Err(anyhow::anyhow!("Refusing to {what} without --yes")).pub_result(ErrorType::Request)
}

/// Returns "s" when `n` is not 1, for building messages.
fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}
