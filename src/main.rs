use building_bills::args::{
    Args, Command, ExtraCommand, OverrideCommand, SetCommand, UnitCommand,
};
use building_bills::{commands, Config, Result};
use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().bills_home().path();

    if let Command::Init = args.command() {
        commands::init(home).await?.print();
        return Ok(());
    }

    let config = Config::load(home).await?;
    let _: () = match args.command() {
        Command::Init => {}

        Command::Show(show_args) => commands::show(config, show_args.clone()).await?.print(),

        Command::Summary(summary_args) => commands::summary(config, summary_args.clone())
            .await?
            .print(),

        Command::Unit(unit_args) => match unit_args.command() {
            UnitCommand::Add(args) => commands::unit_add(config, args.clone()).await?.print(),
            UnitCommand::Remove(args) => {
                commands::unit_remove(config, args.clone()).await?.print()
            }
            UnitCommand::Update(args) => {
                commands::unit_update(config, args.clone()).await?.print()
            }
        },

        Command::Set(set_args) => match set_args.command() {
            SetCommand::Electricity(args) => {
                commands::set_electricity(config, args.clone())
                    .await?
                    .print()
            }
            SetCommand::Reading(args) => commands::set_reading(config, args.clone()).await?.print(),
            SetCommand::Water(args) => commands::set_water(config, args.clone()).await?.print(),
            SetCommand::Gas(args) => commands::set_gas(config, args.clone()).await?.print(),
            SetCommand::Aseo(args) => commands::set_aseo(config, args.clone()).await?.print(),
        },

        Command::Extra(extra_args) => match extra_args.command() {
            ExtraCommand::Add(args) => commands::extra_add(config, args.clone()).await?.print(),
            ExtraCommand::Remove(args) => {
                commands::extra_remove(config, args.clone()).await?.print()
            }
        },

        Command::Override(override_args) => match override_args.command() {
            OverrideCommand::Set(args) => {
                commands::override_set(config, args.clone()).await?.print()
            }
            OverrideCommand::Clear(args) => {
                commands::override_clear(config, args.clone())
                    .await?
                    .print()
            }
            OverrideCommand::ClearAll(args) => {
                commands::override_clear_all(config, args.clone())
                    .await?
                    .print()
            }
        },

        Command::Import(import_args) => commands::import(config, import_args.clone())
            .await?
            .print(),

        Command::Export(export_args) => commands::export(config, export_args.clone())
            .await?
            .print(),

        Command::Reset(reset_args) => commands::reset(config, reset_args.clone()).await?.print(),
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={level},building_bills={level}",
                env!("CARGO_CRATE_NAME"),
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
