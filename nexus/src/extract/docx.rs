//! DOCX text extraction

use anyhow::{Context, Result};
use std::path::Path;

/// Extract paragraph and table text from a `.docx` file, one line per
/// paragraph, blank paragraphs dropped.
pub fn extract_docx_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read DOCX file: {}", path.display()))?;
    let docx = docx_rs::read_docx(&bytes)
        .map_err(|e| anyhow::anyhow!("Failed to parse DOCX file {}: {:?}", path.display(), e))?;

    let mut lines = Vec::new();
    for child in &docx.document.children {
        collect_document_child(child, &mut lines);
    }
    Ok(lines.join("\n"))
}

fn collect_document_child(child: &docx_rs::DocumentChild, lines: &mut Vec<String>) {
    match child {
        docx_rs::DocumentChild::Paragraph(paragraph) => {
            let text = paragraph_text(paragraph);
            if !text.trim().is_empty() {
                lines.push(text);
            }
        }
        docx_rs::DocumentChild::Table(table) => collect_table(table, lines),
        _ => {}
    }
}

fn paragraph_text(paragraph: &docx_rs::Paragraph) -> String {
    let mut buffer = String::new();
    for child in &paragraph.children {
        collect_paragraph_child(child, &mut buffer);
    }
    buffer
}

fn collect_paragraph_child(child: &docx_rs::ParagraphChild, buffer: &mut String) {
    match child {
        docx_rs::ParagraphChild::Run(run) => collect_run(run, buffer),
        docx_rs::ParagraphChild::Hyperlink(link) => {
            for link_child in &link.children {
                collect_paragraph_child(link_child, buffer);
            }
        }
        docx_rs::ParagraphChild::Insert(insert) => {
            for insert_child in &insert.children {
                if let docx_rs::InsertChild::Run(run) = insert_child {
                    collect_run(run, buffer);
                }
            }
        }
        _ => {}
    }
}

fn collect_run(run: &docx_rs::Run, buffer: &mut String) {
    for child in &run.children {
        match child {
            docx_rs::RunChild::Text(text) => buffer.push_str(&text.text),
            docx_rs::RunChild::InstrTextString(text) => buffer.push_str(text),
            docx_rs::RunChild::Tab(_) | docx_rs::RunChild::PTab(_) => buffer.push('\t'),
            docx_rs::RunChild::Break(_) => buffer.push('\n'),
            docx_rs::RunChild::Sym(sym) => buffer.push_str(&sym.char),
            _ => {}
        }
    }
}

fn collect_table(table: &docx_rs::Table, lines: &mut Vec<String>) {
    for row in &table.rows {
        let docx_rs::TableChild::TableRow(row) = row;
        let mut cells = Vec::new();
        for cell in &row.cells {
            let docx_rs::TableRowChild::TableCell(cell) = cell;
            let text = table_cell_text(cell);
            if !text.trim().is_empty() {
                cells.push(text);
            }
        }
        if !cells.is_empty() {
            lines.push(cells.join(" | "));
        }
    }
}

fn table_cell_text(cell: &docx_rs::TableCell) -> String {
    let mut parts = Vec::new();
    for content in &cell.children {
        match content {
            docx_rs::TableCellContent::Paragraph(paragraph) => {
                let text = paragraph_text(paragraph);
                if !text.trim().is_empty() {
                    parts.push(text);
                }
            }
            docx_rs::TableCellContent::Table(table) => {
                let mut nested = Vec::new();
                collect_table(table, &mut nested);
                if !nested.is_empty() {
                    parts.push(nested.join(" "));
                }
            }
            _ => {}
        }
    }
    parts.join(" ")
}
