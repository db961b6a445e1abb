//! Output serialization: CSV test matrices and DOCX reports.

mod csv;
mod docx;

pub use csv::write_matrix_csv;
pub use docx::write_docx;
