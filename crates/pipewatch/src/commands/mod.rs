use std::path::PathBuf;

use clap::ArgMatches;
use tracing::error;

use pipewatch_core::PipewatchConfig;
use pipewatch_core::events;

mod countdown;
mod filters;
mod nav;
mod signals;

pub fn run_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let command = matches.subcommand_name().unwrap_or_default();
    events::log_app_startup(command);

    let explicit = matches.get_one::<PathBuf>("config");
    let config = match PipewatchConfig::load_with_override(explicit.map(PathBuf::as_path)) {
        Ok(config) => config,
        Err(e) => {
            events::log_app_error(&e);
            return Err(e.into());
        }
    };

    let result = match matches.subcommand() {
        Some(("filters", sub_matches)) => filters::handle_filters_command(sub_matches, &config),
        Some(("countdown", sub_matches)) => {
            countdown::handle_countdown_command(sub_matches, &config)
        }
        Some(("nav", sub_matches)) => nav::handle_nav_command(sub_matches),
        Some(("signals", _)) => signals::handle_signals_command(),
        _ => {
            error!(event = "cli.command_unknown");
            Err("Unknown command".into())
        }
    };

    events::log_app_shutdown(command, result.is_ok());
    result
}
