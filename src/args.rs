//! Command-line argument parsing.
//!
//! smoon takes an optional subcommand (`status`, `watch`, `help`) followed by
//! flags. Flags may appear before or after the subcommand and accept both
//! `--flag value` and `--flag=value` forms.

/// Options shared by the `status` and `watch` commands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOptions {
    pub debug_enabled: bool,
    pub config_dir: Option<String>,
    /// Coordinates given with `--lat` and `--lon`; always both or neither.
    pub coordinates: Option<(f64, f64)>,
}

/// What the command line asks smoon to do.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Print the moon state once (default command).
    Status {
        options: RunOptions,
        /// Raw `--at` value, interpreted by the status command.
        at: Option<String>,
        json: bool,
    },
    /// Recompute periodically and send notifications.
    Watch { options: RunOptions },
    /// `smoon help [command]`
    HelpCommand { command: Option<String> },
    ShowHelp,
    ShowVersion,
    /// Show help after a usage error and exit with failure.
    ShowHelpDueToError,
}

/// Result of parsing command-line arguments.
pub struct ParsedArgs {
    pub action: CliAction,
}

#[derive(Clone, Copy, PartialEq)]
enum Command {
    Status,
    Watch,
    Help,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "status" | "s" => Some(Self::Status),
            "watch" | "w" => Some(Self::Watch),
            "help" => Some(Self::Help),
            _ => None,
        }
    }
}

fn usage_error(message: &str) -> ParsedArgs {
    log_error!("{message}");
    ParsedArgs {
        action: CliAction::ShowHelpDueToError,
    }
}

impl ParsedArgs {
    /// Parse command-line arguments, including the program name.
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args_vec: Vec<String> = args
            .into_iter()
            .skip(1)
            .map(|s| s.as_ref().to_string())
            .collect();

        let mut command: Option<Command> = None;
        let mut help_topic: Option<String> = None;
        let mut options = RunOptions::default();
        let mut latitude: Option<f64> = None;
        let mut longitude: Option<f64> = None;
        let mut at: Option<String> = None;
        let mut json = false;
        let mut display_help = false;
        let mut display_version = false;

        let mut idx = 0;
        while idx < args_vec.len() {
            let arg = args_vec[idx].as_str();
            let (flag, inline_value) = match arg.split_once('=') {
                Some((flag, value)) if flag.starts_with("--") => (flag, Some(value.to_string())),
                _ => (arg, None),
            };

            // Value of a flag that takes one, from `--flag=value` or the next argument.
            let mut take_value = |name: &str| -> Result<String, String> {
                if let Some(value) = inline_value.clone() {
                    return Ok(value);
                }
                idx += 1;
                args_vec
                    .get(idx)
                    .cloned()
                    .ok_or_else(|| format!("Missing value for {name}"))
            };

            match flag {
                "--help" | "-h" => display_help = true,
                "--version" | "-V" | "-v" => display_version = true,
                "--debug" | "-d" => options.debug_enabled = true,
                "--json" | "-j" => json = true,
                "--config" | "-c" => match take_value("--config") {
                    Ok(dir) => options.config_dir = Some(dir),
                    Err(e) => return usage_error(&e),
                },
                "--lat" => match take_value("--lat").map(|v| parse_coordinate("--lat", &v)) {
                    Ok(Ok(value)) => latitude = Some(value),
                    Ok(Err(e)) | Err(e) => return usage_error(&e),
                },
                "--lon" => match take_value("--lon").map(|v| parse_coordinate("--lon", &v)) {
                    Ok(Ok(value)) => longitude = Some(value),
                    Ok(Err(e)) | Err(e) => return usage_error(&e),
                },
                "--at" => match take_value("--at") {
                    Ok(value) => at = Some(value),
                    Err(e) => return usage_error(&e),
                },
                _ if flag.starts_with('-') && flag.len() > 1 => {
                    return usage_error(&format!("Unknown option: {arg}"));
                }
                _ => match (command, Command::from_arg(arg)) {
                    (None, Some(parsed)) => command = Some(parsed),
                    (Some(Command::Help), _) if help_topic.is_none() => {
                        help_topic = Some(arg.to_string());
                    }
                    (Some(_), Some(_)) => {
                        return usage_error(&format!("Cannot use multiple commands at once: '{arg}'"));
                    }
                    _ => return usage_error(&format!("Unknown command: {arg}")),
                },
            }
            idx += 1;
        }

        if display_version {
            return ParsedArgs {
                action: CliAction::ShowVersion,
            };
        }
        if command == Some(Command::Help) {
            return ParsedArgs {
                action: CliAction::HelpCommand {
                    command: help_topic,
                },
            };
        }
        if display_help {
            return ParsedArgs {
                action: CliAction::ShowHelp,
            };
        }

        options.coordinates = match (latitude, longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            (None, None) => None,
            _ => return usage_error("--lat and --lon must be given together"),
        };

        let action = match command.unwrap_or(Command::Status) {
            Command::Watch => {
                if json || at.is_some() {
                    return usage_error("--json and --at only apply to the status command");
                }
                CliAction::Watch { options }
            }
            _ => CliAction::Status { options, at, json },
        };

        ParsedArgs { action }
    }
}

fn parse_coordinate(flag: &str, value: &str) -> Result<f64, String> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("Invalid value for {flag}: '{value}' is not a number"))
}
