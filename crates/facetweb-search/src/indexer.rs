//! Index writer for the local facet backend.
//!
//! Builds a Tantivy index with the layout [`TantivyFacetBackend`] expects
//! from JSON-lines documents:
//!
//! ```json
//! {"content": "Aspirin relieves headache", "symptom": ["headache", "fever"]}
//! ```
//!
//! Facet values may be a string or an array of strings; fields that are not
//! configured as facets are ignored.
//!
//! [`TantivyFacetBackend`]: crate::tantivy_search::TantivyFacetBackend

use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::Path;

use facetweb_core::{Error, Result};
use serde_json::Value;
use tantivy::schema::Facet;
use tantivy::{Index, IndexWriter, TantivyDocument};

use crate::tantivy_search::{CONTENT_FIELD, FacetSchema};

/// Writer heap budget in bytes.
const WRITER_HEAP_BYTES: usize = 50_000_000;

/// A document to be indexed: free text plus facet values per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetDocument {
    /// Full-text content.
    pub content: String,
    /// Facet values keyed by facet field name.
    pub facets: BTreeMap<String, Vec<String>>,
}

impl FacetDocument {
    /// Create a document with the given content and no facets.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            facets: BTreeMap::new(),
        }
    }

    /// Add values for a facet field.
    pub fn with_facet_values<I, S>(mut self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.facets
            .entry(field.into())
            .or_default()
            .extend(values.into_iter().map(Into::into));
        self
    }

    /// Build a document from a JSON object, keeping only `facet_fields`.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is not an object or a facet field holds
    /// something other than a string or an array of strings.
    pub fn from_json(value: &Value, facet_fields: &[String]) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| Error::invalid_data("document must be a JSON object"))?;

        let content = object
            .get(CONTENT_FIELD)
            .and_then(Value::as_str)
            .unwrap_or_default();
        let mut doc = Self::new(content);

        for field in facet_fields {
            let values = match object.get(field) {
                None | Some(Value::Null) => continue,
                Some(Value::String(s)) => vec![s.clone()],
                Some(Value::Array(items)) => items
                    .iter()
                    .map(|item| {
                        item.as_str().map(String::from).ok_or_else(|| {
                            Error::invalid_data(format!("facet '{field}' must hold strings"))
                        })
                    })
                    .collect::<Result<Vec<_>>>()?,
                Some(_) => {
                    return Err(Error::invalid_data(format!(
                        "facet '{field}' must be a string or an array of strings"
                    )));
                }
            };
            doc = doc.with_facet_values(field.clone(), values);
        }

        Ok(doc)
    }
}

/// Writes documents into a new facet index.
pub struct FacetIndexer {
    writer: IndexWriter,
    schema: FacetSchema,
    facet_fields: Vec<String>,
    added: usize,
}

impl FacetIndexer {
    /// Create a new, empty index at `path` with the given facet fields.
    ///
    /// # Errors
    ///
    /// Fails if the directory cannot be created or already holds an index.
    pub fn create(path: &Path, facet_fields: &[String]) -> Result<Self> {
        std::fs::create_dir_all(path).map_err(|e| Error::io_with_path(e, path))?;

        let (schema, fields) = FacetSchema::build(facet_fields);
        let index = Index::create_in_dir(path, schema)
            .map_err(|e| Error::operation(format!("Failed to create index: {e}")))?;
        let writer: IndexWriter = index
            .writer(WRITER_HEAP_BYTES)
            .map_err(|e| Error::operation(format!("Failed to create index writer: {e}")))?;

        Ok(Self {
            writer,
            schema: fields,
            facet_fields: facet_fields.to_vec(),
            added: 0,
        })
    }

    /// Add a single document.
    ///
    /// Facet fields unknown to the index and blank values are skipped.
    pub fn add_document(&mut self, doc: &FacetDocument) -> Result<()> {
        let mut tantivy_doc = TantivyDocument::default();
        tantivy_doc.add_text(self.schema.content, &doc.content);

        for (name, values) in &doc.facets {
            let Some(&field) = self.schema.facets.get(name) else {
                continue;
            };
            for value in values.iter().filter(|v| !v.trim().is_empty()) {
                tantivy_doc.add_facet(field, Facet::from_path([value.as_str()]));
            }
        }

        self.writer
            .add_document(tantivy_doc)
            .map_err(|e| Error::operation(format!("Failed to add document: {e}")))?;
        self.added += 1;
        Ok(())
    }

    /// Add every non-blank line of a JSON-lines reader.
    ///
    /// Returns the number of documents added.
    pub fn add_json_lines<R: BufRead>(&mut self, reader: R) -> Result<usize> {
        let mut count = 0;
        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let value: Value = serde_json::from_str(&line).map_err(|e| {
                Error::invalid_data(format!("line {}: {e}", line_no + 1))
            })?;
            let doc = FacetDocument::from_json(&value, &self.facet_fields)?;
            self.add_document(&doc)?;
            count += 1;
        }
        Ok(count)
    }

    /// Number of documents added so far.
    pub fn added(&self) -> usize {
        self.added
    }

    /// Commit pending documents to disk.
    pub fn commit(&mut self) -> Result<()> {
        self.writer
            .commit()
            .map_err(|e| Error::operation(format!("Failed to commit index: {e}")))?;
        log::info!("Committed {} document(s) to facet index", self.added);
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
