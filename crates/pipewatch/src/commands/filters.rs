use std::sync::Arc;

use chrono::NaiveDate;
use clap::ArgMatches;
use tracing::{error, info};

use pipewatch_core::events;
use pipewatch_core::{
    Branch, BuildConfiguration, Command, DashboardStore, DispatchError, JobType, PipewatchConfig,
    SignalKind, Store, Subscription, SystemClock,
};

pub(crate) fn handle_filters_command(
    matches: &ArgMatches,
    config: &PipewatchConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let commands = filter_commands(matches).inspect_err(|e| events::log_app_error(e))?;
    info!(event = "cli.filters_started", command_count = commands.len());

    // The countdown panel spawns its ticker on mount, so the store needs a
    // runtime context even though nothing here awaits.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let _guard = runtime.enter();

    let mut store = DashboardStore::mount(config, Arc::new(SystemClock));
    let _printers: Vec<Subscription> = SignalKind::ALL
        .into_iter()
        .map(|kind| {
            store.bus().subscribe(kind, |signal| {
                match serde_json::to_string(signal) {
                    Ok(line) => println!("{line}"),
                    Err(e) => error!(event = "cli.filters_signal_encode_failed", error = %e),
                }
            })
        })
        .collect();

    for command in commands {
        store.dispatch(command)?;
    }

    info!(event = "cli.filters_completed");
    Ok(())
}

/// Translate the command line into the form interactions a user would
/// perform, ending with apply and the optional clear or external reset.
fn filter_commands(matches: &ArgMatches) -> Result<Vec<Command>, DispatchError> {
    let mut commands = Vec::new();

    if let Some(branch) = matches.get_one::<String>("branch") {
        commands.push(Command::SetBranch {
            branch: branch.parse::<Branch>()?,
        });
    }

    if let Some(tags) = matches.get_many::<String>("config-tag") {
        for tag in tags {
            commands.push(Command::ToggleConfiguration {
                configuration: tag.parse::<BuildConfiguration>()?,
            });
        }
    }

    if let Some(job) = matches.get_one::<String>("job") {
        commands.push(Command::SetJobType {
            job_type: job.parse::<JobType>()?,
        });
    }

    if let Some(date) = matches.get_one::<NaiveDate>("from") {
        commands.push(Command::SetStartDate { date: Some(*date) });
    }

    if let Some(date) = matches.get_one::<NaiveDate>("to") {
        commands.push(Command::SetEndDate { date: Some(*date) });
    }

    commands.push(Command::ApplyFilters);

    if matches.get_flag("clear") {
        commands.push(Command::ClearFilters);
    } else if matches.get_flag("external-reset") {
        commands.push(Command::ResetAllFilters);
    }

    Ok(commands)
}
