//! Knowledge document ingestion.
//!
//! `.txt` and `.pdf` files are accepted by extension and read as text. Bytes that
//! are not valid UTF-8 are replaced rather than rejected, so a PDF yields whatever
//! text its raw stream happens to contain.

use crate::agent::template::KnowledgeDocument;
use crate::error::ApiError;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

const ACCEPTED_EXTENSIONS: [&str; 2] = ["txt", "pdf"];

/// Documents read from a set of paths, plus the ones that were passed over.
#[derive(Debug, Default)]
pub struct DocumentBatch {
    pub documents: Vec<KnowledgeDocument>,
    pub skipped: Vec<(PathBuf, String)>,
}

fn media_type_for(extension: &str) -> &'static str {
    match extension {
        "pdf" => "application/pdf",
        _ => "text/plain",
    }
}

/// Lowercased extension if the file type is accepted.
pub fn validate_file_type(path: &Path) -> Result<String, ApiError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    if ACCEPTED_EXTENSIONS.contains(&extension.as_str()) {
        Ok(extension)
    } else {
        Err(ApiError::DocumentError(format!(
            "Unsupported file type for {}: only .txt and .pdf are accepted",
            path.display()
        )))
    }
}

pub fn load_document(path: &Path) -> Result<KnowledgeDocument, ApiError> {
    let extension = validate_file_type(path)?;
    let bytes = std::fs::read(path).map_err(|e| {
        ApiError::DocumentError(format!("Failed to read {}: {}", path.display(), e))
    })?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    debug!(document = %name, bytes = bytes.len(), "Loaded knowledge document");
    Ok(KnowledgeDocument {
        name,
        content: String::from_utf8_lossy(&bytes).into_owned(),
        media_type: Some(media_type_for(&extension).to_string()),
        size: Some(bytes.len() as u64),
    })
}

/// Load each path; unreadable or unsupported files are skipped, not fatal.
pub fn load_documents<P: AsRef<Path>>(paths: &[P]) -> DocumentBatch {
    let mut batch = DocumentBatch::default();
    for path in paths {
        let path = path.as_ref();
        match load_document(path) {
            Ok(doc) => batch.documents.push(doc),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping knowledge document");
                batch.skipped.push((path.to_path_buf(), e.to_string()));
            }
        }
    }
    batch
}

/// Walk `dir` for accepted files in sorted path order.
pub fn load_dir(dir: &Path) -> Result<DocumentBatch, ApiError> {
    if !dir.is_dir() {
        return Err(ApiError::DocumentError(format!(
            "Not a directory: {}",
            dir.display()
        )));
    }

    let mut paths = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            ApiError::DocumentError(format!("Failed to walk {}: {}", dir.display(), e))
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if validate_file_type(entry.path()).is_ok() {
            paths.push(entry.into_path());
        }
    }
    Ok(load_documents(&paths))
}
