use tracing::info;

use pipewatch_core::SignalKind;

pub(crate) fn handle_signals_command() -> Result<(), Box<dyn std::error::Error>> {
    info!(event = "cli.signals_started");

    for kind in SignalKind::ALL {
        let direction = if kind.is_incoming() { "incoming" } else { "outgoing" };
        println!("{:<34} {}", kind.name(), direction);
    }

    info!(event = "cli.signals_completed", count = SignalKind::ALL.len());
    Ok(())
}
