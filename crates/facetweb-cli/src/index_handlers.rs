//! Handler for `facetweb index`: build a local Tantivy facet index from
//! JSON-lines documents.

use crate::config::FacetwebConfig;
use facetweb_core::{Error, Result};
use facetweb_search::FacetIndexer;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Options for index builds.
#[derive(Debug, Clone)]
pub struct IndexOptions {
    /// JSON-lines input file.
    pub input: String,
    /// Index directory (defaults to `search.index_path`).
    pub output: Option<String>,
    /// Replace an existing index.
    pub force: bool,
}

/// Build an index and print a summary.
pub fn handle_index(config: &FacetwebConfig, options: IndexOptions) -> Result<()> {
    let output = resolve_output(config, options.output.as_deref())?;
    let count = build_index(
        Path::new(&options.input),
        &output,
        &config.search.facet_fields,
        options.force,
    )?;

    println!("Indexed {count} document(s) into {}", output.display());
    println!("Facet fields: {}", config.search.facet_fields.join(", "));
    Ok(())
}

/// Index every document of `input` into a new index at `output`.
///
/// The index is built in a staging directory next to `output` and moved
/// into place only after every document was added and committed, so a
/// failed rebuild leaves an existing index untouched.
///
/// Returns the number of documents added.
pub fn build_index(
    input: &Path,
    output: &Path,
    facet_fields: &[String],
    force: bool,
) -> Result<usize> {
    if output.exists() && !force {
        return Err(Error::config(format!(
            "Index already exists at {}. Use --force to replace it.",
            output.display()
        )));
    }

    let file = std::fs::File::open(input).map_err(|e| Error::io_with_path(e, input))?;

    let parent = output
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    std::fs::create_dir_all(parent).map_err(|e| Error::io_with_path(e, parent))?;
    let staging = tempfile::Builder::new()
        .prefix(".facetweb-index-")
        .tempdir_in(parent)
        .map_err(|e| Error::io_with_path(e, parent))?;

    let count = {
        let mut indexer = FacetIndexer::create(staging.path(), facet_fields)?;
        let count = indexer.add_json_lines(BufReader::new(file))?;
        indexer.commit()?;
        count
    };

    if output.exists() {
        log::info!("Replacing existing index at {}", output.display());
        std::fs::remove_dir_all(output).map_err(|e| Error::io_with_path(e, output))?;
    }
    std::fs::rename(staging.path(), output).map_err(|e| Error::io_with_path(e, output))?;

    Ok(count)
}

fn resolve_output(config: &FacetwebConfig, explicit: Option<&str>) -> Result<PathBuf> {
    explicit
        .or(config.search.index_path.as_deref())
        .map(PathBuf::from)
        .ok_or_else(|| Error::config("No index directory: pass --output or set search.index_path"))
}

// ============================================================================
// Tests
// ============================================================================
