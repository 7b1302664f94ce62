//! End-to-end report generation: load the table, draw the figure, write it next to the input.

use std::path::{Path, PathBuf};

use log::info;

use crate::dataset::MetricsTable;
use crate::error::{ReportError, Result};
use crate::panel::{FigureLayout, PANELS};
use crate::render::render_figure;

pub const OUTPUT_SUFFIX: &str = "_all_metrics.png";

/// Returns `<dir>/<stem>_all_metrics.png` for an input at `<dir>/<stem>.<ext>`.
pub fn output_path(input: &Path) -> Result<PathBuf> {
    let stem = input
        .file_stem()
        .ok_or_else(|| ReportError::InvalidPath(input.to_path_buf()))?;
    let mut name = stem.to_os_string();
    name.push(OUTPUT_SUFFIX);
    Ok(input.with_file_name(name))
}

/// Builds the report for `input` and returns the written file.
pub fn render_report(input: &Path) -> Result<PathBuf> {
    let output = output_path(input)?;
    let table = MetricsTable::load(input)?;
    render_figure(&table, &FigureLayout::default(), &output)?;
    info!("Saved {} panels to {}", PANELS.len(), output.display());
    Ok(output)
}
