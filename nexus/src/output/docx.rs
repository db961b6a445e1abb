//! DOCX report serialization

use anyhow::{Context, Result};
use docx_rs::{Docx, Paragraph, Run};
use std::fs::File;
use std::path::Path;

/// Write generated report text to a `.docx`, one paragraph per line.
pub fn write_docx(path: &Path, content: &str) -> Result<()> {
    let mut docx = Docx::new();
    for line in content.lines() {
        docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(line)));
    }

    let file = File::create(path)
        .with_context(|| format!("Failed to create DOCX file: {}", path.display()))?;
    docx.build()
        .pack(file)
        .with_context(|| format!("Failed to write DOCX file: {}", path.display()))?;
    Ok(())
}
