//! CSV serialization of test-case matrices

use anyhow::{Context, Result};
use std::path::Path;

use crate::record::TestCase;

/// Fixed column header of every generated matrix.
const MATRIX_HEADER: [&str; 5] = [
    "Test Case Name",
    "Description",
    "Steps",
    "Expected Result",
    "Priority",
];

/// Separator between steps within the single Steps cell.
const STEP_SEPARATOR: &str = " | ";

/// Write test cases to a CSV matrix with the fixed column schema.
///
/// Missing record fields come through as empty cells.
pub fn write_matrix_csv(path: &Path, cases: &[TestCase]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;

    writer.write_record(MATRIX_HEADER)?;
    for case in cases {
        let steps = case.steps.join(STEP_SEPARATOR);
        writer.write_record([
            case.name.as_str(),
            case.description.as_str(),
            steps.as_str(),
            case.expected_result.as_str(),
            case.priority.as_str(),
        ])?;
    }

    writer
        .flush()
        .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_rows(path: &Path) -> Vec<Vec<String>> {
        let mut reader = csv::Reader::from_path(path).unwrap();
        reader
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn test_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matrix.csv");

        let cases = vec![TestCase {
            name: "Login".into(),
            description: "Valid credentials".into(),
            steps: vec!["Open page".into(), "Submit".into()],
            expected_result: "Dashboard".into(),
            priority: "High".into(),
        }];
        write_matrix_csv(&path, &cases).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with(
            "Test Case Name,Description,Steps,Expected Result,Priority"
        ));

        let rows = read_rows(&path);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][2], "Open page | Submit");
    }

    #[test]
    fn test_missing_fields_become_empty_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matrix.csv");

        // Only the name is populated, everything else defaulted
        let cases = vec![TestCase {
            name: "Bare".into(),
            ..TestCase::default()
        }];
        write_matrix_csv(&path, &cases).unwrap();

        let rows = read_rows(&path);
        assert_eq!(rows[0], vec!["Bare", "", "", "", ""]);
    }

    #[test]
    fn test_empty_case_list_writes_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matrix.csv");
        write_matrix_csv(&path, &[]).unwrap();

        let rows = read_rows(&path);
        assert!(rows.is_empty());
        assert!(std::fs::read_to_string(&path)
            .unwrap()
            .contains("Test Case Name"));
    }
}
