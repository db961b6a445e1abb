//! Structured records parsed from model output, and the per-run summary.

use serde::Deserialize;

/// One test case parsed from the model's JSON array.
///
/// Every field the model may omit defaults to empty; downstream serialization
/// writes empty cells rather than failing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TestCase {
    pub name: String,
    pub description: String,
    pub steps: Vec<String>,
    pub expected_result: String,
    pub priority: String,
}

/// Ordered per-file outcome log for one batch run.
#[derive(Debug, Default)]
pub struct RunSummary {
    lines: Vec<String>,
    pub files_processed: usize,
    pub files_failed: usize,
}

impl RunSummary {
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Render the summary block shown after a batch completes.
    pub fn render(&self) -> String {
        let mut out = String::from("--- Run summary ---\n");
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out.push_str(&format!(
            "Processed: {}, Failed: {}",
            self.files_processed, self.files_failed
        ));
        out
    }
}
