//! Facet expansion graph builder for facetweb.
//!
//! This crate turns facet counts into a node/edge graph. A root query is
//! expanded twice: once for its own top facet values, then once per value,
//! scoped to the root. Every distinct term becomes a node.
//!
//! # Key Abstractions
//!
//! - [`GraphBuilder`]: runs the expansion over a [`FacetQuery`]
//! - [`NodeMap`]: first-seen term to id assignment, owned by one build
//! - [`Graph`]: the serializable result
//! - [`compute_stats`] / [`validate_graph`]: structural analysis with petgraph
//!
//! [`FacetQuery`]: facetweb_search::FacetQuery

#![doc = include_str!("../README.md")]

pub mod builder;
pub mod config;
pub mod stats;
pub mod types;
pub mod validation;

pub use builder::{ExpansionReport, FailedQuery, GraphBuilder};
pub use config::ExpansionConfig;
pub use stats::{DegreeDirection, GraphStats, compute_stats, quick_summary, top_nodes_by_degree};
pub use types::{Edge, Graph, GraphNode, NodeId, NodeMap, ROOT_ID, sanitize_label};
pub use validation::{ValidationIssue, ValidationResult, is_valid, validate_graph};
