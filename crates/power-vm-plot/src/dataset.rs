//! Column-oriented table of power and virtualization measurements.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ErrorKind, ReaderBuilder, StringRecord, Trim};
use log::info;
use serde::Deserialize;

use crate::error::{ReportError, Result};

pub const TIMESTAMP_COLUMN: &str = "timestamp";
pub const VM_COUNT_COLUMN: &str = "num_vm";

/// Metrics plotted against the VM count, one per panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Watts,
    MemoryUsage,
    CpuUsage,
    Volts,
    Amps,
    Kwh,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::Watts,
        Metric::MemoryUsage,
        Metric::CpuUsage,
        Metric::Volts,
        Metric::Amps,
        Metric::Kwh,
    ];

    /// Name of the CSV column holding this metric.
    pub const fn column(self) -> &'static str {
        match self {
            Metric::Watts => "watts",
            Metric::MemoryUsage => "memory_usage",
            Metric::CpuUsage => "cpu_usage",
            Metric::Volts => "volts",
            Metric::Amps => "amps",
            Metric::Kwh => "kwh",
        }
    }
}

/// Columns that must be present in the header row, in the usual file order.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    TIMESTAMP_COLUMN,
    Metric::Watts.column(),
    VM_COUNT_COLUMN,
    Metric::MemoryUsage.column(),
    Metric::CpuUsage.column(),
    Metric::Volts.column(),
    Metric::Amps.column(),
    Metric::Kwh.column(),
];

#[derive(Debug, Deserialize)]
struct MetricsRecord {
    timestamp: f64,
    watts: f64,
    num_vm: f64,
    memory_usage: f64,
    cpu_usage: f64,
    volts: f64,
    amps: f64,
    kwh: f64,
}

impl MetricsRecord {
    fn values(&self) -> [(&'static str, f64); 8] {
        [
            (TIMESTAMP_COLUMN, self.timestamp),
            (Metric::Watts.column(), self.watts),
            (VM_COUNT_COLUMN, self.num_vm),
            (Metric::MemoryUsage.column(), self.memory_usage),
            (Metric::CpuUsage.column(), self.cpu_usage),
            (Metric::Volts.column(), self.volts),
            (Metric::Amps.column(), self.amps),
            (Metric::Kwh.column(), self.kwh),
        ]
    }
}

/// Measurements in file order, one vector per required column.
#[derive(Debug, Clone, Default)]
pub struct MetricsTable {
    timestamps: Vec<f64>,
    vm_counts: Vec<f64>,
    watts: Vec<f64>,
    memory_usage: Vec<f64>,
    cpu_usage: Vec<f64>,
    volts: Vec<f64>,
    amps: Vec<f64>,
    kwh: Vec<f64>,
}

impl MetricsTable {
    /// Reads the table from a CSV file with a header row.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_reader(file)?;
        info!("Loaded {} rows from {}", table.len(), path.display());
        Ok(table)
    }

    /// Reads the table from any CSV source. Extra columns are ignored.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
        let headers = rdr.headers()?.clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(ReportError::MissingColumn(column.to_string()));
            }
        }

        let mut table = Self::default();
        let mut raw = StringRecord::new();
        while rdr.read_record(&mut raw)? {
            let record: MetricsRecord = raw
                .deserialize(Some(&headers))
                .map_err(|e| invalid_value(e, &raw, &headers))?;
            for (column, value) in record.values() {
                if !value.is_finite() {
                    let idx = headers.iter().position(|h| h == column);
                    return Err(ReportError::InvalidValue {
                        column: column.to_string(),
                        line: line_of(&raw),
                        value: idx.and_then(|i| raw.get(i)).unwrap_or_default().to_string(),
                    });
                }
            }
            table.push(record);
        }
        Ok(table)
    }

    fn push(&mut self, record: MetricsRecord) {
        self.timestamps.push(record.timestamp);
        self.vm_counts.push(record.num_vm);
        self.watts.push(record.watts);
        self.memory_usage.push(record.memory_usage);
        self.cpu_usage.push(record.cpu_usage);
        self.volts.push(record.volts);
        self.amps.push(record.amps);
        self.kwh.push(record.kwh);
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamps(&self) -> &[f64] {
        &self.timestamps
    }

    pub fn vm_counts(&self) -> &[f64] {
        &self.vm_counts
    }

    pub fn metric(&self, metric: Metric) -> &[f64] {
        match metric {
            Metric::Watts => &self.watts,
            Metric::MemoryUsage => &self.memory_usage,
            Metric::CpuUsage => &self.cpu_usage,
            Metric::Volts => &self.volts,
            Metric::Amps => &self.amps,
            Metric::Kwh => &self.kwh,
        }
    }
}

fn line_of(raw: &StringRecord) -> u64 {
    raw.position().map(|p| p.line()).unwrap_or_default()
}

fn invalid_value(err: csv::Error, raw: &StringRecord, headers: &StringRecord) -> ReportError {
    let field = match err.kind() {
        ErrorKind::Deserialize { err, .. } => err.field(),
        _ => None,
    };
    match field.map(|f| f as usize) {
        Some(idx) => ReportError::InvalidValue {
            column: headers.get(idx).unwrap_or_default().to_string(),
            line: line_of(raw),
            value: raw.get(idx).unwrap_or_default().to_string(),
        },
        None => ReportError::Csv(err),
    }
}
