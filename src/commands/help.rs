//! Help output.

/// Show brief usage for a command (used after usage errors).
pub fn show_command_usage(command: Option<&str>) {
    match command {
        Some("status" | "s") => log_block_start!(
            "Usage: smoon status [--lat <deg> --lon <deg>] [--at <time>] [--json]"
        ),
        Some("watch" | "w") => log_block_start!("Usage: smoon watch [--lat <deg> --lon <deg>]"),
        _ => log_block_start!("Usage: smoon [OPTIONS] [COMMAND]"),
    }
}

/// `smoon help [command]`
pub fn run_help_command(command: Option<&str>) {
    match command {
        None => display_help(),
        Some("status" | "s") => display_status_help(),
        Some("watch" | "w") => display_watch_help(),
        Some("help") => display_help_help(),
        Some(unknown) => {
            log_warning!("Unknown command: {unknown}");
            display_help();
        }
    }
}

/// General help, also shown for `--help`.
pub fn display_help() {
    log_version!();
    log_block_start!("Usage: smoon [OPTIONS] [COMMAND]");
    log_block_start!("Commands:");
    log_indented!("status, s        Show the moon for a location and time (default)");
    log_indented!("watch, w         Keep watching and send moon notifications");
    log_indented!("help [COMMAND]   Show detailed help for a command");
    log_block_start!("Options:");
    log_indented!("--lat <deg>          Latitude (-90 to 90), use with --lon");
    log_indented!("--lon <deg>          Longitude (-180 to 180), use with --lat");
    log_indented!("--at <time>          Moment to compute for, \"YYYY-MM-DD HH:MM:SS\" local");
    log_indented!("-j, --json           Print the state as JSON (status only)");
    log_indented!("-c, --config <dir>   Use a custom configuration directory");
    log_indented!("-d, --debug          Show detailed diagnostic output");
    log_indented!("-h, --help           Print help information");
    log_indented!("-V, --version        Print version information");
    log_end!();
}

fn display_status_help() {
    log_version!();
    log_block_start!("status - Show the current lunar state");
    log_block_start!("Usage: smoon status [--lat <deg> --lon <deg>] [--at <time>] [--json]");
    log_block_start!("Location:");
    log_indented!("Taken from --lat/--lon, then the configuration file, then the");
    log_indented!("last location given on the command line, then London.");
    log_block_start!("Examples:");
    log_indented!("smoon status --lat 48.8566 --lon 2.3522");
    log_indented!("smoon status --at \"2025-04-13 22:00:00\" --json");
    log_end!();
}

fn display_watch_help() {
    log_version!();
    log_block_start!("watch - Recompute periodically and notify");
    log_block_start!("Usage: smoon watch [--lat <deg> --lon <deg>]");
    log_block_start!("Notifications:");
    log_indented!("Moon visible       when the moon is above the horizon, every 6 hours at most");
    log_indented!("High illumination  at 85% or more, once a day at most");
    log_block_start!("Configuration:");
    log_indented!("refresh_interval   seconds between evaluations (30-3600, default 300)");
    log_indented!("notifications      \"granted\", \"denied\" or \"ask\"");
    log_end!();
}

fn display_help_help() {
    log_version!();
    log_block_start!("help - Display help information");
    log_block_start!("Usage: smoon help [COMMAND]");
    log_block_start!("Examples:");
    log_indented!("smoon help");
    log_indented!("smoon help watch");
    log_end!();
}
