//! Binary entry point for smoon.
//!
//! Parses the command line and hands off to the command implementations in
//! the library.

use smoon::args::{CliAction, ParsedArgs};
use smoon::commands::{help, status, watch};
use smoon::constants::{EXIT_FAILURE, EXIT_SUCCESS};
use smoon::{log_end, log_error, log_pipe, log_version};

fn main() {
    let parsed = ParsedArgs::parse(std::env::args());

    let result = match parsed.action {
        CliAction::ShowVersion => {
            log_version!();
            log_end!();
            Ok(())
        }
        CliAction::ShowHelp => {
            help::display_help();
            Ok(())
        }
        CliAction::HelpCommand { command } => {
            help::run_help_command(command.as_deref());
            Ok(())
        }
        CliAction::ShowHelpDueToError => {
            help::show_command_usage(None);
            log_pipe!();
            log_error!("Run 'smoon --help' for all options");
            log_end!();
            std::process::exit(EXIT_FAILURE);
        }
        CliAction::Status { options, at, json } => {
            status::run_status(&options, at.as_deref(), json)
        }
        CliAction::Watch { options } => watch::run_watch(&options),
    };

    if let Err(e) = result {
        // JSON mode silences the logger; errors still have to reach the user.
        smoon::logger::Log::set_enabled(true);
        log_pipe!();
        log_error!("{e:#}");
        log_end!();
        std::process::exit(EXIT_FAILURE);
    }

    std::process::exit(EXIT_SUCCESS);
}
