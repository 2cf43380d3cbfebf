use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::constants::{ENV_CONFIG, ENV_ROWS_PER_PAGE};

#[derive(Parser)]
#[command(name = "fmak")]
#[command(version, about = "Search filter to SQL compiler", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Rows per search page (limit is rows + 1)
    #[arg(long, global = true, env = ENV_ROWS_PER_PAGE)]
    pub rows_per_page: Option<u32>,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Compile the distinct-values query for a column
    Distinct {
        /// Column whose distinct values are listed
        #[arg(long)]
        column: String,
        /// Filters as inline JSON or @path to a JSON file
        #[arg(long, short = 'f')]
        filters: String,
    },
    /// Compile the paged search query
    Search {
        /// Zero-based page index
        #[arg(long, default_value_t = 0)]
        page: u32,
        /// Filters as inline JSON or @path to a JSON file
        #[arg(long, short = 'f')]
        filters: String,
    },
    /// List filterable columns with their table, type and priority
    Columns,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub config: Option<PathBuf>,
    pub rows_per_page: Option<u32>,
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Commands) {
    let cli = Cli::parse();
    let config = CliConfig {
        config: cli.config,
        rows_per_page: cli.rows_per_page,
    };
    (config, cli.command)
}
