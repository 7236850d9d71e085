//! Facet query layer and search backends for facetweb.
//!
//! This crate provides [`FacetQuery`], the single entry point the graph
//! builder uses to fetch facet counts, and the [`SearchBackend`]
//! implementations behind it:
//!
//! - [`AzureSearchBackend`]: Azure Cognitive Search compatible REST service
//! - [`ScriptedSearchBackend`]: in-memory scripted responses for tests and demos
//! - `TantivyFacetBackend`: local Tantivy index (feature-gated)
//!
//! # Features
//!
//! - `fts-tantivy`: Enable the local Tantivy facet index and its indexer

#![doc = include_str!("../README.md")]

pub mod azure;
pub mod backend;
pub mod facet;
pub mod mock;
pub mod query;
pub mod types;

#[cfg(feature = "fts-tantivy")]
pub mod indexer;
#[cfg(feature = "fts-tantivy")]
pub mod tantivy_search;

pub use azure::AzureSearchBackend;
pub use backend::{SearchBackend, create_search_backend};
pub use facet::FacetQuery;
pub use mock::ScriptedSearchBackend;
pub use query::{MATCH_ALL, composite_query, or_match_all, quote_phrase};
pub use types::{FacetCount, FacetRequest, FacetResult, SearchConfig};

#[cfg(feature = "fts-tantivy")]
pub use indexer::{FacetDocument, FacetIndexer};
#[cfg(feature = "fts-tantivy")]
pub use tantivy_search::TantivyFacetBackend;
