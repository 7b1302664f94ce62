//! Errors raised while building a metrics report.

use std::path::PathBuf;

use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReportError>;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("cannot open {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot derive output file name from {}", .0.display())]
    InvalidPath(PathBuf),

    #[error("required column `{0}` is missing")]
    MissingColumn(String),

    /// A cell that does not hold a finite number.
    #[error("column `{column}` has a non-numeric value {value:?} on line {line}")]
    InvalidValue { column: String, line: u64, value: String },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to draw chart: {0}")]
    Render(String),

    #[error("cannot write {}: {message}", .path.display())]
    Write { path: PathBuf, message: String },
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for ReportError {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        ReportError::Render(err.to_string())
    }
}
