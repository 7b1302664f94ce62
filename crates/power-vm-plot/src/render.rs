//! Drawing of the six-panel figure.

use std::ffi::OsString;
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::dataset::MetricsTable;
use crate::error::{ReportError, Result};
use crate::panel::{
    FigureLayout, PanelSpec, GRID_COLUMNS, GRID_ROWS, PANELS, TIME_AXIS_LABEL, VM_COUNT_COLOR, VM_COUNT_LABEL,
};

const FONT: &str = "sans-serif";

/// Widest span handed to plotters, its tick computation does not terminate on an infinite width.
const MAX_SPAN: f64 = f64::MAX * 0.8;

/// Span of the values widened by 5% on both ends.
///
/// A constant series gets 5% of its magnitude (at least 0.5) on each side, an empty one `0..1`.
/// The result always has finite bounds and a finite width, values near `f64::MAX` may be cut off.
pub fn axis_range(values: &[f64]) -> Range<f64> {
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| (lo.min(*x), hi.max(*x)));
    if min > max {
        return 0.0..1.0;
    }
    // half of the span, computed this way it cannot overflow
    let half_span = max / 2. - min / 2.;
    let pad = if half_span > 0. {
        half_span * 0.1
    } else {
        f64::max(min.abs() * 0.05, 0.5)
    };
    let mut lo = min - pad;
    let mut hi = max + pad;
    if !lo.is_finite() {
        lo = min;
    }
    if !hi.is_finite() {
        hi = max;
    }
    if !(hi - lo).is_finite() {
        lo = min;
        hi = max;
    }
    if !(hi - lo).is_finite() {
        let mid = lo / 2. + hi / 2.;
        lo = mid - MAX_SPAN / 2.;
        hi = mid + MAX_SPAN / 2.;
    }
    lo..hi
}

/// Sibling file the bitmap is encoded into before it replaces `output`.
fn partial_path(output: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(output.file_name().unwrap_or_default());
    name.push(".partial.png");
    output.with_file_name(name)
}

fn discard(path: &Path) {
    if path.exists() {
        if let Err(e) = fs::remove_file(path) {
            warn!("Cannot remove unfinished image {}: {}", path.display(), e);
        }
    }
}

/// Renders the figure into a PNG file at `output`.
///
/// The image is drawn into a sibling file and moved over `output` only once it is complete,
/// so a failure leaves an existing image untouched.
pub(crate) fn render_figure(table: &MetricsTable, layout: &FigureLayout, output: &Path) -> Result<()> {
    let partial = partial_path(output);
    let root = BitMapBackend::new(&partial, (layout.width, layout.height)).into_drawing_area();
    if let Err(err) = draw_figure(&root, table, layout) {
        // dropping the backend flushes the bitmap drawn so far
        drop(root);
        discard(&partial);
        return Err(err.into());
    }
    let presented = root.present();
    drop(root);
    if let Err(e) = presented {
        discard(&partial);
        return Err(ReportError::Write {
            path: output.to_path_buf(),
            message: e.to_string(),
        });
    }
    fs::rename(&partial, output).map_err(|e| {
        discard(&partial);
        ReportError::Write {
            path: output.to_path_buf(),
            message: e.to_string(),
        }
    })
}

pub(crate) fn draw_figure<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    table: &MetricsTable,
    layout: &FigureLayout,
) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;
    let body = root.titled(&layout.title, (FONT, layout.title_font_size).into_font())?;
    let bottom = (layout.height as f64 * layout.bottom_margin) as i32;
    let grid = body.margin(0, bottom, 0, 0).split_evenly((GRID_ROWS, GRID_COLUMNS));

    let x_range = axis_range(table.timestamps());
    let vm_range = axis_range(table.vm_counts());
    for (area, spec) in grid.iter().zip(PANELS.iter()) {
        draw_panel(area, table, spec, layout, x_range.clone(), vm_range.clone())?;
        debug!("Drew panel \"{}\"", spec.title);
    }
    Ok(())
}

fn time_label_style(layout: &FigureLayout) -> TextStyle<'static> {
    (FONT, layout.label_font_size)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Bottom))
}

/// Anchor of the time axis description: centered, at the bottom of the x label area.
fn time_label_position(panel: (u32, u32), layout: &FigureLayout) -> (i32, i32) {
    (panel.0 as i32 / 2, panel.1 as i32 - layout.panel_margin)
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    table: &MetricsTable,
    spec: &PanelSpec,
    layout: &FigureLayout,
    x_range: Range<f64>,
    vm_range: Range<f64>,
) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let values = table.metric(spec.metric);
    let metric_style = (FONT, layout.label_font_size).into_font().color(&spec.color);
    let vm_style = (FONT, layout.label_font_size).into_font().color(&VM_COUNT_COLOR);

    let mut chart = ChartBuilder::on(area)
        .caption(spec.title, (FONT, layout.caption_font_size).into_font())
        .margin(layout.panel_margin)
        .x_label_area_size(layout.x_label_area)
        .y_label_area_size(layout.y_label_area)
        .right_y_label_area_size(layout.y_label_area)
        .build_cartesian_2d(x_range.clone(), axis_range(values))?
        .set_secondary_coord(x_range, vm_range);

    // a mesh has one description style for both axes, the time label is drawn separately
    chart
        .configure_mesh()
        .light_line_style(WHITE)
        .y_desc(spec.axis_label)
        .y_label_style(metric_style.clone())
        .axis_desc_style(metric_style)
        .draw()?;
    chart
        .configure_secondary_axes()
        .y_desc(VM_COUNT_LABEL)
        .label_style(vm_style.clone())
        .axis_desc_style(vm_style)
        .draw()?;
    area.draw_text(
        TIME_AXIS_LABEL,
        &time_label_style(layout),
        time_label_position(area.dim_in_pixel(), layout),
    )?;

    let timestamps = table.timestamps().iter().copied();
    chart.draw_series(LineSeries::new(
        timestamps.clone().zip(values.iter().copied()),
        spec.color.stroke_width(layout.line_width),
    ))?;
    chart.draw_secondary_series(LineSeries::new(
        timestamps.zip(table.vm_counts().iter().copied()),
        VM_COUNT_COLOR.stroke_width(layout.line_width),
    ))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_drawable(range: &Range<f64>) {
        assert!(range.start.is_finite(), "{:?}", range);
        assert!(range.end.is_finite(), "{:?}", range);
        assert!((range.end - range.start).is_finite(), "{:?}", range);
        assert!(range.start < range.end, "{:?}", range);
    }

    #[test]
    fn test_axis_range_pads_span() {
        let range = axis_range(&[10., 30., 20.]);
        assert!((range.start - 9.).abs() < 1e-9);
        assert!((range.end - 31.).abs() < 1e-9);
    }

    #[test]
    fn test_axis_range_constant_series() {
        assert_eq!(axis_range(&[0.]), -0.5..0.5);
        let range = axis_range(&[200., 200.]);
        assert!((range.start - 190.).abs() < 1e-9);
        assert!((range.end - 210.).abs() < 1e-9);
    }

    #[test]
    fn test_axis_range_empty_series() {
        assert_eq!(axis_range(&[]), 0.0..1.0);
    }

    #[test]
    // Padding 1.75e308 by 5% overflows f64.
    fn test_axis_range_near_float_limit() {
        let range = axis_range(&[0., 1.75e308]);
        assert_drawable(&range);
        assert_eq!(range, 0.0..1.75e308);
    }

    #[test]
    // The span of this series alone is larger than f64::MAX.
    fn test_axis_range_wider_than_float_limit() {
        assert_drawable(&axis_range(&[-1.7e308, 1.7e308]));
        assert_drawable(&axis_range(&[f64::MIN, f64::MAX]));
        assert_drawable(&axis_range(&[f64::MAX]));
        assert_drawable(&axis_range(&[f64::MIN]));
    }

    #[test]
    fn test_partial_path_is_hidden_sibling() {
        assert_eq!(
            partial_path(Path::new("/data/run_all_metrics.png")),
            PathBuf::from("/data/.run_all_metrics.png.partial.png")
        );
    }

    #[test]
    fn test_time_label_is_neutral() {
        let layout = FigureLayout::default();
        let style = time_label_style(&layout);
        assert_eq!(style.color.rgb, (0, 0, 0));
        assert!(PANELS.iter().all(|p| (p.color.0, p.color.1, p.color.2) != style.color.rgb));
        assert_eq!(time_label_position((700, 360), &layout), (350, 360 - layout.panel_margin));
    }
}
