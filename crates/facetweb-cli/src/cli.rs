//! CLI argument parsing and command definitions.
//!
//! Global flags select the configuration file, verbosity, and optionally
//! override the search backend; subcommands expand terms, serve the HTTP
//! endpoint, build a local index, and manage configuration.

use clap::{Parser, Subcommand};

// ============================================================================
// CLI argument types
// ============================================================================

/// Top-level CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "facetweb", author, about, long_about = None)]
pub struct CliArgs {
    /// Path to configuration file.
    #[arg(short, long, env = "FACETWEB_CONFIG", global = true)]
    pub config: Option<String>,

    /// Override the configured search backend (azure, tantivy, mock).
    #[arg(short, long, global = true)]
    pub backend: Option<String>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Expand a term into a facet graph and print it as JSON.
    Expand {
        /// Root term or query. Blank expands the whole index.
        #[arg(default_value = "")]
        term: String,

        /// Facet field to expand (defaults to `search.default_field`).
        #[arg(short, long)]
        field: Option<String>,

        /// Pretty-print the JSON output.
        #[arg(long)]
        pretty: bool,

        /// Print graph statistics and validation to stderr.
        #[arg(long)]
        stats: bool,
    },

    /// Serve the graph endpoint over HTTP.
    Serve {
        /// Port to listen on (defaults to `server.port`).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Build a local facet index from JSON-lines documents.
    Index {
        /// JSON-lines input file.
        #[arg(short, long)]
        input: String,

        /// Index directory (defaults to `search.index_path`).
        #[arg(short, long)]
        output: Option<String>,

        /// Replace an existing index.
        #[arg(short, long)]
        force: bool,
    },

    /// Print version information.
    Version,

    /// Check that the configured backend can be created.
    Health,

    /// Configuration operations.
    Config(ConfigCommand),
}

/// Config-specific subcommands.
#[derive(Parser, Debug)]
pub struct ConfigCommand {
    /// Config subcommand to execute.
    #[command(subcommand)]
    pub command: ConfigAction,
}

/// Available config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the resolved config file path.
    Path,

    /// Print the effective configuration as TOML.
    Show,

    /// Create a default configuration file.
    Init {
        /// Output file path (defaults to XDG config path).
        #[arg(short, long)]
        file: Option<String>,

        /// Overwrite existing file.
        #[arg(long)]
        force: bool,
    },

    /// Export configuration as environment variables.
    Export {
        /// Format as Docker --env flags.
        #[arg(long)]
        docker_env: bool,
    },
}

// ============================================================================
// Tests
// ============================================================================
