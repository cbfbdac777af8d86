use clap::ArgMatches;
use tracing::info;

use pipewatch_core::events;
use pipewatch_core::header::{REGISTRATION, TITLE};
use pipewatch_core::{DispatchError, HeaderState};

pub(crate) fn handle_nav_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let mut header = HeaderState::new();
    if matches.get_flag("open") {
        header.set_menu_open(true);
    }

    println!("{}", render_header(&header));

    if let Some(href) = matches.get_one::<String>("go") {
        match header.navigate(href) {
            Some(item) => {
                info!(event = "cli.nav_completed", href = item.href);
                println!();
                println!("→ {} ({})", item.label, item.href);
                println!("Menu: {}", menu_label(&header));
            }
            None => {
                let err = DispatchError::UnknownNavTarget { href: href.clone() };
                events::log_app_error(&err);
                return Err(err.into());
            }
        }
    }

    Ok(())
}

fn menu_label(header: &HeaderState) -> &'static str {
    if header.is_menu_open() { "open" } else { "closed" }
}

fn render_header(header: &HeaderState) -> String {
    let mut out = format!("{TITLE}\n");
    for item in header.items() {
        out.push_str(&format!("  {:<10} {:<12} [{}]\n", item.label, item.href, item.icon));
    }
    out.push_str(&format!("Menu: {}\n", menu_label(header)));
    out.push_str(REGISTRATION);
    out
}
