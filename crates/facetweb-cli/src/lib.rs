//! Command-line interface and HTTP endpoint for facetweb.
//!
//! # Key Abstractions
//!
//! - [`FacetwebCli`]: loads configuration, installs logging, runs commands
//! - [`FacetwebConfig`]: file, environment, and default configuration
//! - [`server::router`]: the axum router behind `facetweb serve`

#![doc = include_str!("../README.md")]

pub mod app;
pub mod cli;
pub mod config;
pub mod config_handlers;
pub mod expand_handlers;
#[cfg(feature = "fts-tantivy")]
pub mod index_handlers;
pub mod server;

pub use app::FacetwebCli;
pub use cli::{CliArgs, Command, ConfigAction, ConfigCommand};
pub use config::{FacetwebConfig, ServerConfig};
pub use expand_handlers::{ExpandOptions, build_graph};
pub use server::{AppState, GraphParams, HealthResponse, router};
