//! Local facet backend using Tantivy.
//!
//! This module provides `TantivyFacetBackend`, a search backend that answers
//! facet requests from a Tantivy index on disk. It is intended for offline
//! use and tests where a managed search service is not available.
//!
//! # Index layout
//!
//! - `content`: tokenized text (default tokenizer, positions recorded)
//! - one facet field per configured facet name, each value stored as the
//!   single-segment facet `/<value>`
//!
//! Queries are parsed by [`parse_query`](crate::query::parse_query): every
//! phrase and term is required (AND semantics), `*` matches all documents.
//!
//! # Usage
//!
//! ```rust,ignore
//! use facetweb_search::{SearchConfig, TantivyFacetBackend, FacetRequest, SearchBackend};
//!
//! let config = SearchConfig {
//!     index_path: Some("/path/to/index".to_string()),
//!     ..Default::default()
//! };
//!
//! let backend = TantivyFacetBackend::new(&config)?;
//! let result = backend.search(FacetRequest::new("aspirin", "symptom", 15)).await?;
//! ```

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use facetweb_core::{Error, Result};
use tantivy::collector::FacetCollector;
use tantivy::query::{AllQuery, BooleanQuery, Occur, PhraseQuery, Query, TermQuery};
use tantivy::schema::{Facet, FacetOptions, Field, FieldType, IndexRecordOption, Schema, TEXT};
use tantivy::tokenizer::{
    LowerCaser, RemoveLongFilter, SimpleTokenizer, TextAnalyzer, TokenStream,
};
use tantivy::{Index, IndexReader, ReloadPolicy, Term};

use crate::backend::SearchBackend;
use crate::query::{ParsedQuery, parse_query};
use crate::types::{FacetCount, FacetRequest, FacetResult, SearchConfig};

/// Name of the full-text field.
pub const CONTENT_FIELD: &str = "content";

// ============================================================================
// Schema
// ============================================================================

/// Field handles for a facet index.
#[derive(Debug, Clone)]
pub struct FacetSchema {
    /// The full-text field.
    pub content: Field,
    /// Facet fields by name.
    pub facets: HashMap<String, Field>,
}

impl FacetSchema {
    /// Build a new schema with the given facet fields.
    pub fn build(facet_fields: &[String]) -> (Schema, Self) {
        let mut builder = Schema::builder();
        let content = builder.add_text_field(CONTENT_FIELD, TEXT);
        let facets = facet_fields
            .iter()
            .map(|name| {
                let field = builder.add_facet_field(name, FacetOptions::default());
                (name.clone(), field)
            })
            .collect();
        (builder.build(), Self { content, facets })
    }

    /// Recover field handles from an existing index schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema has no `content` field.
    pub fn from_schema(schema: &Schema) -> Result<Self> {
        let content = schema.get_field(CONTENT_FIELD).map_err(|e| {
            Error::invalid_data(format!("index has no '{CONTENT_FIELD}' field: {e}"))
        })?;
        let facets = schema
            .fields()
            .filter(|(_, entry)| matches!(entry.field_type(), FieldType::Facet(_)))
            .map(|(field, entry)| (entry.name().to_string(), field))
            .collect();
        Ok(Self { content, facets })
    }
}

// ============================================================================
// Backend
// ============================================================================

/// Tantivy-based facet backend.
pub struct TantivyFacetBackend {
    reader: IndexReader,
    schema: FacetSchema,
}

impl TantivyFacetBackend {
    /// Create a new Tantivy facet backend.
    ///
    /// Opens an existing index at the configured path.
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let index_path = config
            .index_path
            .as_ref()
            .ok_or_else(|| Error::config("index_path is required for the tantivy backend"))?;
        Self::open(Path::new(index_path))
    }

    /// Open the index at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::not_found("Index", path.display().to_string()));
        }

        let index = Index::open_in_dir(path)
            .map_err(|e| Error::operation(format!("Failed to open index: {e}")))?;
        let schema = FacetSchema::from_schema(&index.schema())?;

        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::OnCommitWithDelay)
            .try_into()
            .map_err(|e| Error::operation(format!("Failed to create reader: {e}")))?;

        log::info!(
            "Opened facet index at {} ({} facet field(s))",
            path.display(),
            schema.facets.len()
        );

        Ok(Self { reader, schema })
    }

    /// Build a Tantivy query from a parsed query string.
    fn build_query(&self, parsed: &ParsedQuery) -> Box<dyn Query> {
        if parsed.is_match_all() {
            return Box::new(AllQuery);
        }

        let field = self.schema.content;
        let mut clauses: Vec<(Occur, Box<dyn Query>)> = Vec::new();

        for phrase in &parsed.phrases {
            if let Some(pq) = create_phrase_query(field, phrase) {
                clauses.push((Occur::Must, pq));
            }
        }

        for term in &parsed.terms {
            for token in analyze(term) {
                let tq = TermQuery::new(
                    Term::from_field_text(field, &token),
                    IndexRecordOption::Basic,
                );
                clauses.push((Occur::Must, Box::new(tq)));
            }
        }

        if clauses.is_empty() {
            return Box::new(AllQuery);
        }

        Box::new(BooleanQuery::new(clauses))
    }
}

#[async_trait]
impl SearchBackend for TantivyFacetBackend {
    async fn search(&self, request: FacetRequest) -> Result<FacetResult> {
        if !self.schema.facets.contains_key(&request.field) {
            return Err(Error::malformed(format!(
                "index has no facet field '{}'",
                request.field
            )));
        }

        let query = self.build_query(&parse_query(&request.query));
        let searcher = self.reader.searcher();
        let field = request.field;
        let limit = request.max_facet_values;

        // Segment reads block, so collection runs on the blocking pool.
        let values = tokio::task::spawn_blocking(move || -> Result<Vec<FacetCount>> {
            let mut collector = FacetCollector::for_field(&field);
            collector.add_facet(Facet::root());

            let counts = searcher
                .search(query.as_ref(), &collector)
                .map_err(|e| Error::backend(format!("Search failed: {e}")))?;

            Ok(counts
                .top_k(Facet::root(), limit)
                .into_iter()
                .filter_map(|(facet, count)| {
                    facet
                        .to_path()
                        .last()
                        .map(|value| FacetCount::new(*value, count))
                })
                .collect())
        })
        .await
        .map_err(|e| Error::backend(format!("Search task failed: {e}")))??;

        Ok(FacetResult::new(values))
    }

    fn name(&self) -> &str {
        "tantivy"
    }
}

impl std::fmt::Debug for TantivyFacetBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TantivyFacetBackend")
            .field("facets", &self.schema.facets.keys().collect::<Vec<_>>())
            .finish()
    }
}

// ============================================================================
// Analysis helpers
// ============================================================================

/// Tokenize text the same way the `TEXT` field's default tokenizer does.
pub(crate) fn analyze(text: &str) -> Vec<String> {
    let mut analyzer = TextAnalyzer::builder(SimpleTokenizer::default())
        .filter(RemoveLongFilter::limit(40))
        .filter(LowerCaser)
        .build();
    let mut tokens = Vec::new();
    let mut stream = analyzer.token_stream(text);
    while let Some(token) = stream.next() {
        tokens.push(token.text.clone());
    }
    tokens
}

/// Create an exact-phrase query, or a term query for one-token phrases.
fn create_phrase_query(field: Field, phrase: &str) -> Option<Box<dyn Query>> {
    let terms: Vec<Term> = analyze(phrase)
        .into_iter()
        .map(|tok| Term::from_field_text(field, &tok))
        .collect();

    match terms.len() {
        0 => None,
        1 => Some(Box::new(TermQuery::new(
            terms[0].clone(),
            IndexRecordOption::Basic,
        ))),
        _ => Some(Box::new(PhraseQuery::new(terms))),
    }
}

// ============================================================================
// Tests
// ============================================================================
