//! Clap derive structures for the `smartcity` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use smartcity_core::CityId;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// smartcity -- browse, search and favorite cities
#[derive(Debug, Parser)]
#[command(
    name = "smartcity",
    version,
    about = "Browse, search and favorite cities from the command line",
    long_about = "Fetches the city dataset once per run, then searches it locally.\n\n\
        Favorites are kept in a preferences file and survive between runs.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (defaults to the platform config dir)
    #[arg(long, env = "SMARTCITY_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Dataset host (overrides config)
    #[arg(long, env = "SMARTCITY_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Request timeout in milliseconds (overrides config)
    #[arg(long, env = "SMARTCITY_TIMEOUT_MS", global = true)]
    pub timeout_ms: Option<u64>,

    /// Favorites preference file (overrides config)
    #[arg(long, env = "SMARTCITY_FAVORITES_FILE", global = true)]
    pub favorites_file: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SMARTCITY_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true, hide = true)]
    pub log_json: bool,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Download the city list and report how many cities it holds
    Fetch,

    /// Print the cached list, then the freshly fetched one
    #[command(alias = "ls")]
    List(ListArgs),

    /// Search cities by name
    #[command(alias = "s")]
    Search(SearchArgs),

    /// Show one city
    Show(ShowArgs),

    /// Show the map pin for a city
    Map(MapArgs),

    /// Manage favorite cities
    #[command(alias = "fav")]
    Favorites(FavoritesArgs),

    /// Clear local data (favorites too, unless the clear policy says otherwise)
    Clear,

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Command Arguments ────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Max rows to print (0 = all)
    #[arg(long, short = 'l', default_value = "50")]
    pub limit: usize,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Case-insensitive substring of the city name (longer than `search.min_query_len`)
    pub query: String,

    /// Max rows to print (0 = all)
    #[arg(long, short = 'l', default_value = "50")]
    pub limit: usize,

    /// Only show favorites
    #[arg(long, short = 'f')]
    pub favorites: bool,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// City id
    pub id: CityId,

    /// Fetch the city list before looking the id up
    #[arg(long)]
    pub fetch: bool,
}

#[derive(Debug, Args)]
pub struct MapArgs {
    /// City id
    pub id: CityId,
}

#[derive(Debug, Args)]
pub struct FavoritesArgs {
    #[command(subcommand)]
    pub command: FavoritesCommand,
}

#[derive(Debug, Subcommand)]
pub enum FavoritesCommand {
    /// Mark a city as favorite
    Add {
        /// City id
        id: CityId,
    },

    /// Unmark a favorite city
    #[command(alias = "rm")]
    Remove {
        /// City id
        id: CityId,
    },

    /// List favorite cities
    #[command(alias = "ls")]
    List,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a config file with default values
    Init,

    /// Display current resolved configuration
    Show,

    /// Print the config file path
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
