//! Fixed description of the report figure.

use plotters::style::RGBColor;

use crate::dataset::Metric;

/// One chart of the grid: a metric on the left axis, the VM count on the right one.
#[derive(Debug, Clone, Copy)]
pub struct PanelSpec {
    pub metric: Metric,
    /// Left axis description, includes the unit.
    pub axis_label: &'static str,
    pub color: RGBColor,
    pub title: &'static str,
}

pub const VM_COUNT_COLOR: RGBColor = RGBColor(0xd6, 0x27, 0x28);
pub const VM_COUNT_LABEL: &str = "Number of VMs";
pub const TIME_AXIS_LABEL: &str = "Timestamp";

pub const GRID_ROWS: usize = 3;
pub const GRID_COLUMNS: usize = 2;

/// Panels in grid order, row by row.
pub const PANELS: [PanelSpec; GRID_ROWS * GRID_COLUMNS] = [
    PanelSpec {
        metric: Metric::Watts,
        axis_label: "Watts",
        color: RGBColor(0x1f, 0x77, 0xb4),
        title: "Watts and number of VMs",
    },
    PanelSpec {
        metric: Metric::MemoryUsage,
        axis_label: "Memory (MB)",
        color: RGBColor(0x2c, 0xa0, 0x2c),
        title: "Memory and number of VMs",
    },
    PanelSpec {
        metric: Metric::CpuUsage,
        axis_label: "CPU (%)",
        color: RGBColor(0xff, 0x7f, 0x0e),
        title: "CPU and number of VMs",
    },
    PanelSpec {
        metric: Metric::Volts,
        axis_label: "Volts",
        color: RGBColor(0x94, 0x67, 0xbd),
        title: "Volts and number of VMs",
    },
    PanelSpec {
        metric: Metric::Amps,
        axis_label: "Amps",
        color: RGBColor(0x8c, 0x56, 0x4b),
        title: "Amps and number of VMs",
    },
    PanelSpec {
        metric: Metric::Kwh,
        axis_label: "kWh",
        color: RGBColor(0xe3, 0x77, 0xc2),
        title: "kWh and number of VMs",
    },
];

/// Figure geometry and typography. The report always uses the default.
#[derive(Debug, Clone)]
pub(crate) struct FigureLayout {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub title_font_size: u32,
    pub caption_font_size: u32,
    pub label_font_size: u32,
    /// Fraction of the figure height left blank under the grid.
    pub bottom_margin: f64,
    pub panel_margin: i32,
    pub x_label_area: i32,
    pub y_label_area: i32,
    pub line_width: u32,
}

impl Default for FigureLayout {
    fn default() -> Self {
        Self {
            width: 1400,
            height: 1200,
            title: "System measurements and number of VMs over time".to_string(),
            title_font_size: 26,
            caption_font_size: 18,
            label_font_size: 14,
            bottom_margin: 0.03,
            panel_margin: 12,
            x_label_area: 45,
            y_label_area: 65,
            line_width: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panels_cover_every_metric_once() {
        for metric in Metric::ALL {
            assert_eq!(PANELS.iter().filter(|p| p.metric == metric).count(), 1);
        }
        assert_eq!(PANELS.map(|p| p.metric), Metric::ALL);
    }

    #[test]
    fn test_vm_color_is_distinct() {
        assert!(PANELS.iter().all(|p| p.color != VM_COUNT_COLOR));
    }
}
