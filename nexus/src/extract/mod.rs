//! Plain-text extraction from office documents

mod docx;
mod pdf;
mod pptx;

pub use docx::extract_docx_text;
pub use pdf::extract_pdf_text;
pub use pptx::extract_pptx_text;

#[cfg(test)]
pub(crate) use pdf::write_test_pdf;
#[cfg(test)]
pub(crate) use pptx::write_test_pptx;

use anyhow::{Result, bail};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extract plain text from a document, dispatching on file extension.
pub fn extract_text(path: &Path) -> Result<String> {
    match extension_of(path).as_deref() {
        Some("docx") => extract_docx_text(path),
        Some("pdf") => extract_pdf_text(path),
        Some("pptx") => extract_pptx_text(path),
        _ => bail!(
            "Unsupported file format: {}. Use .docx, .pdf, or .pptx.",
            path.display()
        ),
    }
}

/// True if a path looks like a requirement document (.docx or .pdf).
pub fn is_requirement_document(path: &Path) -> bool {
    matches!(extension_of(path).as_deref(), Some("docx") | Some("pdf"))
}

/// Find all requirement documents in the given directory.
///
/// Results are sorted by path so batch output is deterministic.
pub fn find_documents(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    if recursive {
        for entry in WalkDir::new(dir).follow_links(true) {
            let entry = entry?;
            if entry.file_type().is_file() && is_requirement_document(entry.path()) {
                files.push(entry.path().to_path_buf());
            }
        }
    } else {
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_file() && is_requirement_document(&path) {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(OsStr::to_str)
        .map(|ext| ext.to_ascii_lowercase())
}
