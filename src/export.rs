//! Export functionality for TAS run logs
//!
//! Builds the merged sensor time series and writes it as CSV with the
//! columns `timestamp,sensor,value,elapsed_time`.

use crate::parser::DashboardRunLog;
use crate::types::{SensorKind, TimeSeriesTable};
use crate::Result;
use std::collections::BTreeMap;
use std::path::PathBuf;

#[cfg(feature = "csv")]
use crate::conversion::format_timestamp;
#[cfg(feature = "csv")]
use std::io::Write;

/// Column names of the exported table
pub const CSV_HEADER: [&str; 4] = ["timestamp", "sensor", "value", "elapsed_time"];

/// Export options for controlling table contents and destination
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Add CG speed rows next to speed and power
    pub include_cg_speed: bool,
    /// Write to this file instead of stdout
    pub output: Option<PathBuf>,
}

/// Summary of a finished export
#[derive(Debug, Clone, Default)]
pub struct ExportReport {
    pub rows: usize,
    pub counts: BTreeMap<SensorKind, usize>,
    pub output: Option<PathBuf>,
}

/// Read every sensor pass the options ask for and merge them by timestamp
pub fn build_table(log: &DashboardRunLog, options: &ExportOptions) -> Result<TimeSeriesTable> {
    let speed = log.speed_records()?;
    let power = log.power_records()?;

    let table = if options.include_cg_speed {
        let cg_speed = log.cg_speed_records()?;
        TimeSeriesTable::combined(speed, cg_speed, power)
    } else {
        TimeSeriesTable::assemble(speed, power)
    };
    Ok(table)
}

/// Write a table as CSV, values and elapsed times with 6 decimals
#[cfg(feature = "csv")]
pub fn write_table_csv<W: Write>(table: &TimeSeriesTable, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(CSV_HEADER)?;

    for row in &table.rows {
        csv_writer.write_record([
            format_timestamp(&row.timestamp),
            row.sensor.to_string(),
            format!("{:.6}", row.value),
            format!("{:.6}", row.elapsed_time),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Export a run log to CSV, either to `options.output` or to stdout
#[cfg(feature = "csv")]
pub fn export_to_csv(log: &DashboardRunLog, options: &ExportOptions) -> Result<ExportReport> {
    let table = build_table(log, options)?;

    match &options.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let file = std::fs::File::create(path)?;
            write_table_csv(&table, std::io::BufWriter::new(file))?;
        }
        None => {
            let stdout = std::io::stdout();
            write_table_csv(&table, stdout.lock())?;
        }
    }

    Ok(ExportReport {
        rows: table.len(),
        counts: table.counts(),
        output: options.output.clone(),
    })
}

#[cfg(all(test, feature = "csv"))]
mod tests {
    use super::*;
    use crate::conversion::parse_epoch_timestamp;
    use crate::types::TimeSeriesRow;

    #[test]
    fn test_write_table_csv() {
        let ts = parse_epoch_timestamp("1700000000.5").unwrap();
        let table = TimeSeriesTable {
            rows: vec![
                TimeSeriesRow {
                    timestamp: ts,
                    sensor: SensorKind::Speed,
                    value: 9.8765,
                    elapsed_time: 2.0,
                },
                TimeSeriesRow {
                    timestamp: ts,
                    sensor: SensorKind::Power,
                    value: 250.5,
                    elapsed_time: 0.5,
                },
            ],
        };

        let mut out = Vec::new();
        write_table_csv(&table, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        let stamp = format_timestamp(&ts);
        assert_eq!(lines[0], "timestamp,sensor,value,elapsed_time");
        assert_eq!(lines[1], format!("{stamp},speed,9.876500,2.000000"));
        assert_eq!(lines[2], format!("{stamp},power,250.500000,0.500000"));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_empty_table_has_header_only() {
        let mut out = Vec::new();
        write_table_csv(&TimeSeriesTable::new(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "timestamp,sensor,value,elapsed_time\n");
    }
}
