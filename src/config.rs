//! Session settings resolved from command-line flags and the environment.

use crate::cli::Cli;
use crate::policy::SortPolicy;
use crate::time_format::TimeFormat;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Notation for time arguments when a command does not override it
    pub time_format: TimeFormat,
    pub sort_policy: SortPolicy,
    /// `None` disables the activity log
    pub log_file: Option<PathBuf>,
    pub quiet: bool,
}

impl From<&Cli> for Config {
    fn from(cli: &Cli) -> Self {
        Config {
            time_format: cli.time_format,
            sort_policy: cli.sort,
            log_file: (!cli.no_log_file).then(|| cli.log_file.clone()),
            quiet: cli.quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_from_cli() {
        let cli = Cli::try_parse_from([
            "dayplan",
            "--time-format",
            "military",
            "--sort",
            "priority",
            "--log-file",
            "/tmp/day.log",
            "-q",
        ])
        .unwrap();
        let config = Config::from(&cli);
        assert_eq!(config.time_format, TimeFormat::Military);
        assert_eq!(config.sort_policy, SortPolicy::Priority);
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/day.log")));
        assert!(config.quiet);
    }

    #[test]
    fn test_no_log_file_disables_log() {
        let cli = Cli::try_parse_from(["dayplan", "--no-log-file"]).unwrap();
        assert_eq!(Config::from(&cli).log_file, None);
    }
}
