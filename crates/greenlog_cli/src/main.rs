//! GreenLog command-line entry point.
//!
//! # Responsibility
//! - Parse arguments, start logging, open the repository once.
//! - Map command outcomes to exit codes: 0 ok, 1 refused or failed, 2 usage.

mod commands;
mod config;

use clap::Parser;
use commands::Cli;
use greenlog_core::{JsonFileStore, MeasurementRepository};
use std::process::ExitCode;

fn main() -> ExitCode {
    // clap exits with status 2 on usage errors.
    let cli = Cli::parse();
    cli.config.start_logging();

    let mut repo = MeasurementRepository::open(JsonFileStore::new(&cli.config.data_file));
    let mut stdout = std::io::stdout().lock();
    match cli.command.run(&mut repo, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("event=cli_command module=cli status=error");
            eprintln!("error: {err}");
            ExitCode::from(1)
        }
    }
}
