//! PPTX text extraction
//!
//! A `.pptx` is a zip archive with one XML document per slide under
//! `ppt/slides/`. Text lives in `<a:t>` run elements; everything else is
//! layout. The runs are collected with a plain scanner instead of a full
//! XML parser.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use zip::ZipArchive;

/// Extract all slide text from a `.pptx` file, slides in deck order,
/// one line per text run.
pub fn extract_pptx_text(path: &Path) -> Result<String> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open PPTX file: {}", path.display()))?;
    let mut archive = ZipArchive::new(file)
        .with_context(|| format!("Failed to read PPTX archive: {}", path.display()))?;

    let mut slide_names: Vec<(usize, String)> = archive
        .file_names()
        .filter_map(|name| slide_number(name).map(|n| (n, name.to_string())))
        .collect();
    slide_names.sort();

    let mut lines = Vec::new();
    for (_, name) in slide_names {
        let mut xml = String::new();
        archive
            .by_name(&name)
            .with_context(|| format!("Missing slide entry {} in {}", name, path.display()))?
            .read_to_string(&mut xml)
            .with_context(|| format!("Failed to read slide {} in {}", name, path.display()))?;

        for run in text_runs(&xml) {
            let run = run.trim();
            if !run.is_empty() {
                lines.push(unescape_xml(run));
            }
        }
    }

    Ok(lines.join("\n"))
}

/// Parse the slide index out of an archive entry name like
/// `ppt/slides/slide12.xml`.
fn slide_number(name: &str) -> Option<usize> {
    let rest = name.strip_prefix("ppt/slides/slide")?;
    let digits = rest.strip_suffix(".xml")?;
    digits.parse().ok()
}

/// Collect the contents of every `<a:t>...</a:t>` element in slide XML.
fn text_runs(xml: &str) -> Vec<&str> {
    let mut runs = Vec::new();
    let mut rest = xml;

    while let Some(start) = rest.find("<a:t") {
        let after_tag = &rest[start + 4..];
        // Must be "<a:t>" or "<a:t ...>"; skip other elements like <a:tc>
        let Some(gt) = after_tag.find('>') else { break };
        let head = &after_tag[..gt];
        // Self-closing empty run
        if head.ends_with('/') {
            rest = &after_tag[gt + 1..];
            continue;
        }
        if !(head.is_empty() || head.starts_with(' ')) {
            rest = &after_tag[gt + 1..];
            continue;
        }
        let body = &after_tag[gt + 1..];
        match body.find("</a:t>") {
            Some(end) => {
                runs.push(&body[..end]);
                rest = &body[end + 6..];
            }
            None => break,
        }
    }

    runs
}

/// Decode the predefined XML entities.
fn unescape_xml(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Build a minimal `.pptx` with one slide per given string. Test fixture.
#[cfg(test)]
pub(crate) fn write_test_pptx(path: &Path, slides: &[&str]) {
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    let file = File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default();

    for (i, text) in slides.iter().enumerate() {
        let name = format!("ppt/slides/slide{}.xml", i + 1);
        let xml = format!(
            "<p:sld><p:cSld><p:spTree><p:sp><p:txBody><a:p><a:r><a:t>{}</a:t></a:r></a:p></p:txBody></p:sp></p:spTree></p:cSld></p:sld>",
            text
        );
        zip.start_file(name, options).unwrap();
        zip.write_all(xml.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
}
