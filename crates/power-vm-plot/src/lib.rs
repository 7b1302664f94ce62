//! Renders CSV logs of host power and virtualization measurements into a single PNG report.
//!
//! The report is a 3x2 grid of panels. Each panel plots one metric (power, memory, CPU, voltage,
//! current, energy) against the timestamp, with the number of running VMs on a secondary axis.

pub mod dataset;
pub mod error;
pub mod panel;
pub mod render;
pub mod report;

pub use dataset::{Metric, MetricsTable};
pub use error::{ReportError, Result};
pub use report::{output_path, render_report};
