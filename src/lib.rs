//! Splits a building's monthly utility receipts among its units.
//!
//! The `engine` module holds the allocation itself, a pure function over the `model` types. The
//! rest of the crate keeps the inputs in a home directory and drives the engine from the `bills`
//! command line.

pub mod args;
mod backup;
pub mod commands;
mod config;
pub mod engine;
mod error;
pub mod model;
pub mod render;
mod store;
mod utils;


pub use backup::Backup;
pub use config::Config;
pub use error::{error_type, Error, ErrorType, Result};
pub use store::parse_overrides;
