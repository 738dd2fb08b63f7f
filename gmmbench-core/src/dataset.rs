//! CSV Dataset Loading
//!
//! Datasets are comma-separated numeric rows with a uniform column count,
//! loaded into an `(n_samples, n_features)` matrix. Blank lines and lines
//! starting with `#` are skipped; every other field must be a finite number.

use ndarray::Array2;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure while loading a dataset
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The file could not be read
    #[error("Failed to read dataset {path}: {source}")]
    Io {
        /// Dataset path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Only blank or comment lines
    #[error("Dataset contains no data rows")]
    Empty,

    /// A field is empty, not a number, or not finite
    #[error("Invalid value {value:?} at line {line}, column {column}")]
    InvalidField {
        /// 1-based line number
        line: usize,
        /// 1-based column number
        column: usize,
        /// Field text after trimming
        value: String,
    },

    /// A row's column count differs from the first data row
    #[error("Line {line} has {found} columns, expected {expected}")]
    RaggedRow {
        /// 1-based line number
        line: usize,
        /// Columns in the first data row
        expected: usize,
        /// Columns in this row
        found: usize,
    },

    /// Parsed values do not form a matrix
    #[error("Dataset shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

/// Load a numeric CSV file into a matrix.
pub fn load_csv(path: impl AsRef<Path>) -> Result<Array2<f64>, DatasetError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_csv(&content)
}

/// Parse numeric CSV text into a matrix.
pub fn parse_csv(content: &str) -> Result<Array2<f64>, DatasetError> {
    let mut values = Vec::new();
    let mut columns = None;
    let mut rows = 0;

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut found = 0;
        for (col, field) in trimmed.split(',').enumerate() {
            let field = field.trim();
            let value = field
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| DatasetError::InvalidField {
                    line: line_no,
                    column: col + 1,
                    value: field.to_string(),
                })?;
            values.push(value);
            found += 1;
        }

        let expected = *columns.get_or_insert(found);
        if found != expected {
            return Err(DatasetError::RaggedRow {
                line: line_no,
                expected,
                found,
            });
        }
        rows += 1;
    }

    let Some(columns) = columns else {
        return Err(DatasetError::Empty);
    };

    Ok(Array2::from_shape_vec((rows, columns), values)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_simple() {
        let data = parse_csv("1,2\n3,4\n5,6\n").unwrap();
        assert_eq!(data.shape(), &[3, 2]);
        assert_eq!(data[[0, 0]], 1.0);
        assert_eq!(data[[2, 1]], 6.0);
    }

    #[test]
    fn test_skips_blank_and_comment_lines() {
        let data = parse_csv("# x,y\n\n 1.5 , -2e3\n\n3,4\r\n").unwrap();
        assert_eq!(data.shape(), &[2, 2]);
        assert_eq!(data[[0, 1]], -2000.0);
    }

    #[test]
    fn test_single_column() {
        let data = parse_csv("1\n2\n3").unwrap();
        assert_eq!(data.shape(), &[3, 1]);
    }

    #[test]
    fn test_rejects_non_numeric() {
        let err = parse_csv("x,y\n1,2\n").unwrap_err();
        assert!(matches!(
            err,
            DatasetError::InvalidField { line: 1, column: 1, .. }
        ));

        let err = parse_csv("1,2\n3,\n").unwrap_err();
        assert!(matches!(
            err,
            DatasetError::InvalidField { line: 2, column: 2, .. }
        ));

        assert!(parse_csv("1,nan\n").is_err());
        assert!(parse_csv("inf,1\n").is_err());
    }

    #[test]
    fn test_rejects_ragged_rows() {
        let err = parse_csv("1,2\n3,4,5\n").unwrap_err();
        assert!(matches!(
            err,
            DatasetError::RaggedRow {
                line: 2,
                expected: 2,
                found: 3
            }
        ));
    }

    #[test]
    fn test_rejects_empty() {
        assert!(matches!(parse_csv(""), Err(DatasetError::Empty)));
        assert!(matches!(parse_csv("# only a comment\n\n"), Err(DatasetError::Empty)));
    }

    #[test]
    fn test_load_csv_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "0.1,0.2,0.3").unwrap();
        writeln!(file, "0.4,0.5,0.6").unwrap();

        let data = load_csv(file.path()).unwrap();
        assert_eq!(data.shape(), &[2, 3]);
    }

    #[test]
    fn test_load_csv_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_csv(dir.path().join("missing.csv")).unwrap_err();
        assert!(matches!(err, DatasetError::Io { .. }));
    }
}
