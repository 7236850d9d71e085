//! FacetwebCli application.
//!
//! Owns the loaded configuration, installs logging, and dispatches
//! subcommands to their handlers.

use crate::cli::{CliArgs, Command};
use crate::config::FacetwebConfig;
use crate::expand_handlers::{self, ExpandOptions};
use crate::{config_handlers, server};
use facetweb_core::Result;
use facetweb_search::create_search_backend;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

// ============================================================================
// FacetwebCli
// ============================================================================

/// The facetweb command-line application.
pub struct FacetwebCli {
    name: String,
    config: Arc<FacetwebConfig>,
    version: String,
}

impl FacetwebCli {
    /// Create from CLI args, loading config from file/env and applying the
    /// `--backend` override.
    pub fn from_args(name: impl Into<String>, args: &CliArgs) -> Result<Self> {
        let config =
            FacetwebConfig::load(args.config.as_deref())?.with_backend(args.backend.as_deref());
        Ok(Self::new(name, config))
    }

    /// Create a new CLI application.
    pub fn new(name: impl Into<String>, config: FacetwebConfig) -> Self {
        Self {
            name: name.into(),
            config: Arc::new(config),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Override the version string.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// The loaded configuration.
    pub fn config(&self) -> &FacetwebConfig {
        &self.config
    }

    /// Initialise tracing-based logging.
    ///
    /// Uses `RUST_LOG` env var if set, otherwise defaults based on verbosity flags.
    pub fn init_logging(&self, verbose: bool, quiet: bool) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else if quiet {
            EnvFilter::new("warn")
        } else if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        };

        // Ignore error if a subscriber is already set (e.g. in tests).
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }

    /// Run the CLI with the given arguments.
    pub async fn run(&self, args: CliArgs) -> Result<()> {
        self.init_logging(args.verbose, args.quiet);

        match args.command {
            Some(Command::Version) => {
                println!("{} {}", self.name, self.version);
                Ok(())
            }
            Some(Command::Health) => {
                let backend = create_search_backend(&self.config.search)?;
                println!("{}: healthy (backend: {})", self.name, backend.name());
                Ok(())
            }
            Some(Command::Expand {
                term,
                field,
                pretty,
                stats,
            }) => {
                let options = ExpandOptions {
                    term,
                    field,
                    pretty,
                    stats,
                };
                expand_handlers::handle_expand(&self.config, options).await
            }
            Some(Command::Serve { port }) => server::serve(&self.config, port).await,
            Some(Command::Index {
                input,
                output,
                force,
            }) => self.handle_index(input, output, force),
            Some(Command::Config(config_cmd)) => {
                config_handlers::handle_config_command(args.config.as_deref(), config_cmd.command)
            }
            None => {
                println!("{} {}: use --help for usage", self.name, self.version);
                Ok(())
            }
        }
    }

    #[cfg(feature = "fts-tantivy")]
    fn handle_index(&self, input: String, output: Option<String>, force: bool) -> Result<()> {
        let options = crate::index_handlers::IndexOptions {
            input,
            output,
            force,
        };
        crate::index_handlers::handle_index(&self.config, options)
    }

    #[cfg(not(feature = "fts-tantivy"))]
    fn handle_index(&self, _input: String, _output: Option<String>, _force: bool) -> Result<()> {
        Err(facetweb_core::Error::config(
            "the index command requires the `fts-tantivy` feature",
        ))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::CliArgs;
    use clap::Parser;

    fn mock_config() -> FacetwebConfig {
        FacetwebConfig::default().with_backend(Some("mock"))
    }

    #[test]
    fn test_facetweb_cli_new() {
        let cli = FacetwebCli::new("facetweb", mock_config());
        assert_eq!(cli.name, "facetweb");
        assert_eq!(cli.config().search.backend, "mock");
    }

    #[test]
    fn test_facetweb_cli_with_version() {
        let cli = FacetwebCli::new("facetweb", mock_config()).with_version("1.2.3");
        assert_eq!(cli.version, "1.2.3");
    }

    #[tokio::test]
    async fn test_run_version_command() {
        let cli = FacetwebCli::new("facetweb", mock_config()).with_version("0.1.0");
        let args = CliArgs::parse_from(["facetweb", "version"]);
        assert!(cli.run(args).await.is_ok());
    }

    #[tokio::test]
    async fn test_run_health_command() {
        let cli = FacetwebCli::new("facetweb", mock_config());
        let args = CliArgs::parse_from(["facetweb", "health"]);
        assert!(cli.run(args).await.is_ok());
    }

    #[tokio::test]
    async fn test_run_health_fails_for_unknown_backend() {
        let config = FacetwebConfig::default().with_backend(Some("solr"));
        let cli = FacetwebCli::new("facetweb", config);
        let args = CliArgs::parse_from(["facetweb", "health"]);
        assert!(cli.run(args).await.is_err());
    }

    #[tokio::test]
    async fn test_run_no_command() {
        let cli = FacetwebCli::new("facetweb", mock_config());
        let args = CliArgs::parse_from(["facetweb"]);
        assert!(cli.run(args).await.is_ok());
    }

    #[tokio::test]
    async fn test_run_expand_command() {
        let cli = FacetwebCli::new("facetweb", mock_config());
        let args = CliArgs::parse_from(["facetweb", "expand", "aspirin", "--stats"]);
        assert!(cli.run(args).await.is_ok());
    }

    #[cfg(feature = "fts-tantivy")]
    #[tokio::test]
    async fn test_run_index_command() {
        let dir = tempfile::TempDir::new().unwrap();
        let input = dir.path().join("docs.jsonl");
        std::fs::write(&input, "{\"content\": \"aspirin\", \"keyphrases\": \"aspirin\"}\n").unwrap();
        let output = dir.path().join("index");

        let cli = FacetwebCli::new("facetweb", mock_config());
        let args = CliArgs::parse_from([
            "facetweb",
            "index",
            "--input",
            input.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
        ]);
        assert!(cli.run(args).await.is_ok());
        assert!(output.exists());
    }

    #[test]
    fn test_init_logging_default() {
        let cli = FacetwebCli::new("facetweb", mock_config());
        // Should not panic
        cli.init_logging(false, false);
    }

    #[test]
    fn test_init_logging_verbose_and_quiet() {
        let cli = FacetwebCli::new("facetweb", mock_config());
        cli.init_logging(true, false);
        cli.init_logging(false, true);
    }

    // ------------------------------------------------------------------------
    // FacetwebConfig integration tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_from_args_with_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
                [expansion]
                level2_max_facets = 5
                [search]
                backend = "tantivy"
            "#,
        )
        .unwrap();

        let args = CliArgs::parse_from(["facetweb", "--config", path.to_str().unwrap()]);
        let cli = FacetwebCli::from_args("facetweb", &args).unwrap();
        assert_eq!(cli.config().expansion.level2_max_facets, 5);
        assert_eq!(cli.config().search.backend, "tantivy");
    }

    #[test]
    fn test_from_args_backend_override() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[search]\nbackend = \"tantivy\"\n").unwrap();

        let args = CliArgs::parse_from([
            "facetweb",
            "--config",
            path.to_str().unwrap(),
            "--backend",
            "mock",
        ]);
        let cli = FacetwebCli::from_args("facetweb", &args).unwrap();
        assert_eq!(cli.config().search.backend, "mock");
    }

    #[tokio::test]
    async fn test_config_command_dispatch() {
        let cli = FacetwebCli::new("facetweb", mock_config());
        let args = CliArgs::parse_from(["facetweb", "config", "path"]);
        assert!(cli.run(args).await.is_ok());
    }
}
