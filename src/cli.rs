// Command-line arguments
//
// Each flag can also come from a PENGUIN_DASH_* environment variable; the
// flag wins when both are set.

use std::path::PathBuf;

use clap::Parser;

use crate::config::Preset;

/// Penguin Dash - interactive Palmer Penguins dashboard
#[derive(Parser, Debug)]
#[command(name = "penguin-dash")]
#[command(version)]
#[command(about = "Interactive Palmer Penguins dashboard", long_about = None)]
pub struct Cli {
    /// Dataset file (.csv, .json or .parquet)
    #[arg(long, env = "PENGUIN_DASH_DATA")]
    pub data: Option<PathBuf>,

    /// JSON config file overriding preset values
    #[arg(long, env = "PENGUIN_DASH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Built-in dashboard variant to start from
    #[arg(long, value_enum, env = "PENGUIN_DASH_PRESET")]
    pub preset: Option<Preset>,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    pub print_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_flags() {
        let cli = Cli::try_parse_from([
            "penguin-dash",
            "--data",
            "penguins.parquet",
            "--preset",
            "split-filters",
            "--print-config",
        ])
        .unwrap();
        assert_eq!(cli.data, Some(PathBuf::from("penguins.parquet")));
        assert_eq!(cli.preset, Some(Preset::SplitFilters));
        assert!(cli.print_config);
    }

    #[test]
    fn rejects_unknown_preset() {
        assert!(Cli::try_parse_from(["penguin-dash", "--preset", "fancy"]).is_err());
    }
}
