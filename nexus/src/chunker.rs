//! Document chunking for bounded-size model calls.

use regex::Regex;
use std::sync::OnceLock;

/// Default maximum chunk size in characters.
pub const DEFAULT_MAX_CHUNK_SIZE: usize = 3000;

static HEADING_SEAM: OnceLock<Regex> = OnceLock::new();

/// Matches section-heading seams at the start of a line: a numbered heading
/// ("3. ") or a heading keyword.
fn heading_seam() -> &'static Regex {
    HEADING_SEAM.get_or_init(|| {
        Regex::new(r"(?mi)^[ \t]*(?:\d+\.\s|(?:chapter|section|module|feature)\b)")
            .expect("heading seam regex should compile")
    })
}

/// Split document text into size-bounded chunks.
///
/// Chunks are cut at section-heading seams, each heading staying with the
/// section it introduces; consecutive sections are packed greedily up to
/// `max_chunk_size`. If the heading heuristic finds nothing to cut, the text
/// is packed by paragraph instead. A single section or paragraph longer than
/// the bound becomes an oversized chunk of its own rather than being cut
/// mid-sentence.
///
/// Chunks are contiguous slices of the input (only chunk-edge whitespace is
/// trimmed away), so concatenating them preserves every non-whitespace
/// character of the original text.
pub fn split_into_chunks(text: &str, max_chunk_size: usize) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }
    if text.chars().count() <= max_chunk_size {
        return vec![text.to_string()];
    }

    let sections = split_at_headings(text);
    let mut chunks = pack_spans(&sections, max_chunk_size);

    // No usable section structure: fall back to paragraph packing
    if chunks.len() == 1 {
        let paragraphs: Vec<&str> = text.split_inclusive("\n\n").collect();
        if paragraphs.len() > 1 {
            chunks = pack_spans(&paragraphs, max_chunk_size);
        }
    }

    chunks
}

/// Cut text into contiguous spans at heading seams, each span keeping its
/// leading heading.
fn split_at_headings(text: &str) -> Vec<&str> {
    let mut starts = vec![0];
    for m in heading_seam().find_iter(text) {
        if m.start() > 0 {
            starts.push(m.start());
        }
    }
    starts.dedup();

    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(text.len());
            &text[start..end]
        })
        .collect()
}

/// Greedily pack contiguous spans into chunks bounded by `max_size`
/// characters.
fn pack_spans(spans: &[&str], max_size: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0;

    for span in spans {
        let span_chars = span.chars().count();
        if !current.is_empty() && current_chars + span_chars > max_size {
            push_trimmed(&mut chunks, &current);
            current.clear();
            current_chars = 0;
        }
        current.push_str(span);
        current_chars += span_chars;
    }
    push_trimmed(&mut chunks, &current);

    chunks
}

fn push_trimmed(chunks: &mut Vec<String>, chunk: &str) {
    let trimmed = chunk.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn non_whitespace(s: &str) -> String {
        s.chars().filter(|c| !c.is_whitespace()).collect()
    }

    #[test]
    fn test_short_text_single_chunk() {
        let text = "  A short requirement document.  ";
        let chunks = split_into_chunks(text, 3000);
        assert_eq!(chunks, vec!["A short requirement document."]);
    }

    #[test]
    fn test_empty_text() {
        assert!(split_into_chunks("", 3000).is_empty());
        assert!(split_into_chunks("   \n\n  ", 3000).is_empty());
    }

    #[test]
    fn test_section_headings_start_new_chunks() {
        let mut text = String::new();
        for i in 1..=6 {
            text.push_str(&format!("{}. Requirement group\n{}\n", i, "x".repeat(40)));
        }
        let chunks = split_into_chunks(&text, 100);
        assert!(chunks.len() > 1);
        // Every chunk after packing starts at a heading seam
        for chunk in &chunks {
            assert!(chunk.chars().next().unwrap().is_ascii_digit());
        }
    }

    #[test]
    fn test_keyword_headings_detected() {
        let text = format!(
            "Intro text {}\nSECTION one body {}\nModule two body {}",
            "a".repeat(50),
            "b".repeat(50),
            "c".repeat(50)
        );
        let chunks = split_into_chunks(&text, 80);
        assert!(chunks.len() >= 2);
        assert!(chunks.iter().any(|c| c.starts_with("SECTION")));
    }

    #[test]
    fn test_paragraph_fallback_without_headings() {
        let paragraph = "word ".repeat(30).trim().to_string();
        let text = format!("{p}\n\n{p}\n\n{p}\n\n{p}", p = paragraph);
        let chunks = split_into_chunks(&text, 400);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.len() <= 400, "chunk too long: {}", chunk.len());
        }
    }

    #[test]
    fn test_concatenation_preserves_non_whitespace() {
        let mut text = String::from("Preamble paragraph.\n\n");
        for i in 1..=8 {
            text.push_str(&format!(
                "{}. Feature group {}\nDetails: {}.\n\n",
                i,
                i,
                "detail ".repeat(30)
            ));
        }
        let chunks = split_into_chunks(&text, 300);
        assert!(chunks.len() > 1);
        assert_eq!(non_whitespace(&chunks.concat()), non_whitespace(&text));
    }

    #[test]
    fn test_paragraph_fallback_preserves_non_whitespace() {
        let text = format!(
            "{}\n\n{}\n\n{}",
            "alpha ".repeat(40),
            "beta ".repeat(40),
            "gamma ".repeat(40)
        );
        let chunks = split_into_chunks(&text, 200);
        assert!(chunks.len() > 1);
        assert_eq!(non_whitespace(&chunks.concat()), non_whitespace(&text));
    }

    #[test]
    fn test_oversized_section_kept_whole() {
        let text = format!(
            "1. Small section\nbody\n2. Big section\n{}",
            "y".repeat(500)
        );
        let chunks = split_into_chunks(&text, 100);
        // The big section exceeds the bound but is not cut
        assert!(chunks.iter().any(|c| c.len() > 100));
        assert_eq!(
            non_whitespace(&chunks.concat()),
            text.chars().filter(|c| !c.is_whitespace()).collect::<String>()
        );
    }

    #[test]
    fn test_bound_counts_characters_not_bytes() {
        // Accented text is longer in bytes than in characters; the bound
        // applies to characters, so two spans that fit by character count
        // pack into one chunk even though their byte length exceeds it
        let span = "número válido\n";
        assert_eq!(span.chars().count(), 14);
        assert!(span.len() > 14);
        let chunks = pack_spans(&[span, span], 28);
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn test_decimal_numbers_are_not_headings() {
        // A numbered heading needs whitespace after the dot, so "3.14" at
        // the start of a line does not open a new section
        let text = "The ratio is\n3.14 approximately";
        let spans = split_at_headings(text);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans.concat(), text);
    }
}
