//! Command-line arguments

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use smsoft_core::{Overrides, SortMode};

/// Report apps in a Meraki Systems Manager network
#[derive(Parser, Debug)]
#[command(name = "smsoft", version, about, long_about = None)]
pub struct Args {
    /// Sort by apps or system
    #[arg(value_enum, value_name = "SORT")]
    pub sort: SortArg,

    /// Dashboard API key
    #[arg(long)]
    pub apikey: Option<String>,

    /// Network ID
    #[arg(long)]
    pub net: Option<String>,

    /// List apps for 1 pc
    #[arg(long)]
    pub pc: Option<String>,

    /// List of apps to ignore, one per line
    #[arg(long, value_name = "PATH")]
    pub ignore: Option<PathBuf>,

    /// Only output apps
    #[arg(long)]
    pub quiet: bool,

    /// Config file with deployment defaults
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Dashboard API base URL
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Report grouping as given on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    /// Every app seen on the network
    Apps,
    /// Apps grouped by device
    System,
}

impl From<SortArg> for SortMode {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Apps => SortMode::Apps,
            SortArg::System => SortMode::System,
        }
    }
}

impl Args {
    /// Command-line values handed to the resolver
    #[must_use]
    pub fn overrides(&self) -> Overrides {
        Overrides {
            api_key: self.apikey.clone(),
            network_id: self.net.clone(),
            device: self.pc.clone(),
            ignore_file: self.ignore.clone(),
            quiet: self.quiet,
            sort: self.sort.into(),
        }
    }

    /// Default log filter for the requested verbosity
    #[must_use]
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_command_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_sort_is_required() {
        assert!(Args::try_parse_from(["smsoft"]).is_err());
        assert!(Args::try_parse_from(["smsoft", "packages"]).is_err());
    }

    #[test]
    fn test_full_command_line() {
        let args = Args::try_parse_from([
            "smsoft",
            "system",
            "--apikey",
            "k",
            "--net",
            "N_1",
            "--pc",
            "Carol",
            "--ignore",
            "ignore.txt",
            "--quiet",
        ])
        .unwrap();

        let overrides = args.overrides();
        assert_eq!(overrides.sort, SortMode::System);
        assert_eq!(overrides.api_key.as_deref(), Some("k"));
        assert_eq!(overrides.network_id.as_deref(), Some("N_1"));
        assert_eq!(overrides.device.as_deref(), Some("Carol"));
        assert_eq!(overrides.ignore_file, Some(PathBuf::from("ignore.txt")));
        assert!(overrides.quiet);
    }

    #[test]
    fn test_minimal_command_line() {
        let args = Args::try_parse_from(["smsoft", "apps"]).unwrap();
        let overrides = args.overrides();
        assert_eq!(overrides.sort, SortMode::Apps);
        assert!(overrides.api_key.is_none());
        assert!(overrides.network_id.is_none());
        assert!(!overrides.quiet);
        assert_eq!(args.log_level(), "warn");
    }

    #[test]
    fn test_verbosity() {
        let args = Args::try_parse_from(["smsoft", "apps", "-vv"]).unwrap();
        assert_eq!(args.log_level(), "debug");
    }
}
