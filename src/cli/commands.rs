//! CLI commands and argument parsing

use clap::{Parser, Subcommand};

/// Fivetran lineage importer CLI
#[derive(Parser, Debug)]
#[command(name = "fivetran-lineage")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Fivetran API key (falls back to FIVETRAN_API_KEY)
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Fivetran API secret (falls back to FIVETRAN_API_SECRET)
    #[arg(long, global = true)]
    pub api_secret: Option<String>,

    /// API base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value = "40")]
    pub timeout_secs: u64,

    /// Maximum concurrent in-flight requests (0 = unbounded)
    #[arg(long, global = true, default_value = "0")]
    pub max_concurrent_requests: u16,

    /// Response cache TTL in seconds
    #[arg(long, global = true, default_value = "3600")]
    pub cache_ttl_secs: u64,

    /// Parallel schema fetches during fan-out
    #[arg(long, global = true, default_value = "5")]
    pub fan_out_width: usize,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List groups in the account
    Groups,

    /// List connectors in a group
    Connectors {
        /// Group id
        #[arg(long)]
        group: String,
    },

    /// Print lineage mappings for every connector in a group
    Mappings {
        /// Group id
        #[arg(long)]
        group: String,
    },

    /// Interactive import: prompt for credentials, pick a group, print mappings
    Import,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parses() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_mappings_args() {
        let cli = Cli::parse_from(["fivetran-lineage", "mappings", "--group", "g1"]);
        match cli.command {
            Commands::Mappings { group } => assert_eq!(group, "g1"),
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.fan_out_width, 5);
        assert_eq!(cli.cache_ttl_secs, 3600);
    }

    #[test]
    fn test_global_overrides() {
        let cli = Cli::parse_from([
            "fivetran-lineage",
            "groups",
            "--max-concurrent-requests",
            "3",
            "--fan-out-width",
            "7",
        ]);
        assert_eq!(cli.max_concurrent_requests, 3);
        assert_eq!(cli.fan_out_width, 7);
    }
}
