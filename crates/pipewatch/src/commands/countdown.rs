use std::sync::Arc;
use std::time::Duration;

use clap::ArgMatches;
use tokio::time::Instant;
use tracing::info;

use pipewatch_core::{CountdownScheduler, CountdownView, PipewatchConfig, SystemClock};

pub(crate) fn handle_countdown_command(
    matches: &ArgMatches,
    config: &PipewatchConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let seconds = matches.get_one::<u64>("seconds").copied().unwrap_or(0);
    let refresh_every = matches.get_one::<u64>("refresh-every").copied();
    let json_output = matches.get_flag("json");

    info!(
        event = "cli.countdown_started",
        seconds = seconds,
        json_output = json_output
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let ticks = runtime.block_on(run_countdown(config, seconds, refresh_every, json_output))?;

    info!(event = "cli.countdown_completed", ticks = ticks);
    Ok(())
}

async fn run_countdown(
    config: &PipewatchConfig,
    seconds: u64,
    refresh_every: Option<u64>,
    json_output: bool,
) -> Result<u64, Box<dyn std::error::Error>> {
    let scheduler = CountdownScheduler::mount(Arc::new(SystemClock), config.tick_interval());
    let mut updates = scheduler.watch();
    print_view(&scheduler.view(), json_output, false)?;

    let deadline = (seconds > 0).then(|| Instant::now() + Duration::from_secs(seconds));
    let mut ticks = 0u64;

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = updates.borrow_and_update().clone();
                print_view(&view, json_output, false)?;
                ticks += 1;

                if let Some(every) = refresh_every
                    && ticks % every == 0
                {
                    let refreshed = scheduler.refresh();
                    // Already printed below; don't report it again as a tick.
                    updates.borrow_and_update();
                    print_view(&refreshed, json_output, true)?;
                }
            }
            _ = tokio::signal::ctrl_c() => break,
            _ = wait_until(deadline) => break,
        }
    }

    scheduler.unmount();
    Ok(ticks)
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

fn print_view(
    view: &CountdownView,
    json_output: bool,
    refreshed: bool,
) -> Result<(), serde_json::Error> {
    if json_output {
        println!("{}", serde_json::to_string(view)?);
    } else {
        println!("{}", render_view(view, refreshed));
    }
    Ok(())
}

fn render_view(view: &CountdownView, refreshed: bool) -> String {
    let marker = if refreshed { "  (refreshed)" } else { "" };
    format!(
        "{:<15} | Next run in {}{}",
        view.label, view.countdown_text, marker
    )
}
