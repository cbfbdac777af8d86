use clap::{Arg, ArgAction, Command, value_parser};

pub fn build_cli() -> Command {
    Command::new("pipewatch")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Terminal host for the CI status dashboard panels")
        .long_about("pipewatch mounts the CI status dashboard panels (filters, build status countdown, navigation) on a shared signal bus and drives them from the command line. Every signal a panel broadcasts is printed as JSON so integrations can be exercised without a browser.")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Config file layered over ~/.pipewatch and ./.pipewatch")
                .value_parser(value_parser!(std::path::PathBuf))
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("filters")
                .about("Fill in the filter panel, apply it, and print the broadcast signals")
                .arg(
                    Arg::new("branch")
                        .long("branch")
                        .short('b')
                        .help("Branch to filter on")
                        .value_parser(["main", "develop", "feature/*"])
                )
                .arg(
                    Arg::new("config-tag")
                        .long("config-tag")
                        .short('t')
                        .help("Toggle a build configuration (repeatable: toggling twice deselects)")
                        .action(ArgAction::Append)
                )
                .arg(
                    Arg::new("job")
                        .long("job")
                        .short('j')
                        .help("Job type to filter on (Build, Test, Package)")
                )
                .arg(
                    Arg::new("from")
                        .long("from")
                        .help("Start of the run date range (YYYY-MM-DD)")
                        .value_parser(value_parser!(chrono::NaiveDate))
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("End of the run date range (YYYY-MM-DD)")
                        .value_parser(value_parser!(chrono::NaiveDate))
                )
                .arg(
                    Arg::new("clear")
                        .long("clear")
                        .help("Clear the filters after applying them")
                        .action(ArgAction::SetTrue)
                )
                .arg(
                    Arg::new("external-reset")
                        .long("external-reset")
                        .help("Publish MainApp:ClearFilters after applying, as a host application would")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("clear")
                )
        )
        .subcommand(
            Command::new("countdown")
                .about("Show the build status and count down to the next scheduled run")
                .arg(
                    Arg::new("seconds")
                        .long("seconds")
                        .short('s')
                        .help("Stop after this many seconds (0 runs until Ctrl-C)")
                        .value_parser(value_parser!(u64))
                        .default_value("0")
                )
                .arg(
                    Arg::new("refresh-every")
                        .long("refresh-every")
                        .short('r')
                        .help("Manually refresh the status every N ticks")
                        .value_parser(value_parser!(u64).range(1..))
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Output each update as a JSON line")
                        .action(ArgAction::SetTrue)
                )
        )
        .subcommand(
            Command::new("nav")
                .about("Print the header navigation")
                .arg(
                    Arg::new("open")
                        .long("open")
                        .help("Open the mobile navigation menu")
                        .action(ArgAction::SetTrue)
                )
                .arg(
                    Arg::new("go")
                        .long("go")
                        .help("Follow a navigation link (e.g. #builds)")
                )
        )
        .subcommand(Command::new("signals").about("List the broadcast signals and their direction"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_build() {
        let app = build_cli();
        assert_eq!(app.get_name(), "pipewatch");
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        build_cli().debug_assert();
    }

    #[test]
    fn test_filters_repeatable_config_tag() {
        let matches = build_cli()
            .try_get_matches_from(vec![
                "pipewatch",
                "filters",
                "--branch",
                "develop",
                "-t",
                "Debug",
                "-t",
                "Release",
                "--from",
                "2024-01-01",
            ])
            .unwrap();
        let sub = matches.subcommand_matches("filters").unwrap();
        let tags: Vec<&String> = sub.get_many::<String>("config-tag").unwrap().collect();
        assert_eq!(tags, ["Debug", "Release"]);
        assert_eq!(sub.get_one::<String>("branch").unwrap(), "develop");
        assert!(sub.get_one::<chrono::NaiveDate>("from").is_some());
    }

    #[test]
    fn test_filters_rejects_unknown_branch() {
        let result =
            build_cli().try_get_matches_from(vec!["pipewatch", "filters", "--branch", "trunk"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_filters_clear_conflicts_with_external_reset() {
        let result = build_cli().try_get_matches_from(vec![
            "pipewatch",
            "filters",
            "--clear",
            "--external-reset",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_countdown_defaults() {
        let matches = build_cli()
            .try_get_matches_from(vec!["pipewatch", "countdown"])
            .unwrap();
        let sub = matches.subcommand_matches("countdown").unwrap();
        assert_eq!(*sub.get_one::<u64>("seconds").unwrap(), 0);
        assert!(sub.get_one::<u64>("refresh-every").is_none());
    }

    #[test]
    fn test_countdown_refresh_every_must_be_positive() {
        let result = build_cli().try_get_matches_from(vec![
            "pipewatch",
            "countdown",
            "--refresh-every",
            "0",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_verbose_flag() {
        let matches = build_cli()
            .try_get_matches_from(vec!["pipewatch", "signals", "-v"])
            .unwrap();
        assert!(matches.get_flag("verbose"));
    }
}
