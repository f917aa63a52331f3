// ============================================================================
// mediakit-cli/src/main.rs
// ============================================================================
//
// MEDIAKIT CLI: Entry point for the `mediakit` binary
//
// Parses the command line, installs logging (console plus an optional per-run
// log file) and runs the selected command. Any command error is printed and
// turned into exit code 1.

use clap::Parser;
use std::process;

use mediakit_cli::{Cli, logging, run};
use mediakit_core::terminal_output::print_error;

fn main() {
    let cli = Cli::parse();

    let log_file = match logging::init(
        cli.global.verbose,
        cli.global.log_dir.as_deref(),
        cli.command.name(),
    ) {
        Ok(log_file) => log_file,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    };
    if let Some(log_file) = &log_file {
        log::info!("Log file: {}", log_file.display());
    }
    log::debug!("Command line: {:?}", cli);

    if let Err(e) = run(cli) {
        log::error!("{}", e);
        print_error(&e.to_string());
        process::exit(1);
    }
}
