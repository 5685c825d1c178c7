//! TAS Parser Library
//!
//! A Rust library for parsing Track Aero System (TAS) dashboard run logs:
//! tab-delimited logs of ANT+ wheel speed and power sensor traffic recorded
//! by a bicycle aerodynamics measurement device.
//!
//! # Features
//!
//! - **`csv`** (default): Enable CSV export functionality
//! - **`cli`** (default): Build the command-line interface binary
//! - **`json`**: Enable JSON rendering of the log settings
//! - **`serde`**: Enable serialization/deserialization of types
//!
//! # Quick Start
//!
//! Open a log and read its speed records:
//! ```rust,no_run
//! use tas_parser::DashboardRunLog;
//!
//! let log = DashboardRunLog::open("dashboardRun.txt").unwrap();
//! println!("Run number: {:?}", log.settings().run_number());
//! for record in log.speed().unwrap() {
//!     let record = record.unwrap();
//!     println!("{} {:.6} m/s over {:.6} s", record.timestamp, record.value, record.elapsed_time);
//! }
//! ```
//!
//! Export speed, CG speed and power to a CSV file:
//! ```rust,no_run
//! use tas_parser::{export_to_csv, DashboardRunLog, ExportOptions};
//!
//! let log = DashboardRunLog::open("dashboardRun.txt").unwrap();
//! let options = ExportOptions {
//!     include_cg_speed: true,
//!     output: Some("run.csv".into()),
//! };
//! let report = export_to_csv(&log, &options).unwrap();
//! println!("Exported {} rows", report.rows);
//! ```
//!
//! # Public API
//!
//! ## Parsing
//! - [`DashboardRunLog`] - Run log on disk with its parsed settings
//! - [`parse_settings`] - Read the header settings sections from any reader
//! - [`SensorFrameScanner`] - Lazy announcement/broadcast pairing over any reader
//! - [`SpeedChannel`], [`PowerChannel`] - Sensor line shapes for the scanner
//!
//! ## Data Types
//! - [`LogSettings`] - Header settings keyed by lower-cased label
//! - [`SpeedSensorRecord`], [`PowerSensorRecord`] - One reading per interval
//! - [`TimeSeriesTable`] - Merged readings sorted by timestamp
//!
//! ## Export
//! - [`build_table`] - Merge sensor passes into a table
//! - [`write_table_csv`] - Write a table as CSV
//! - [`export_to_csv`] - Build and write in one step

pub mod conversion;
pub mod error;
pub mod export;
pub mod parser;
pub mod types;

pub use conversion::*;
pub use error::*;
pub use export::*;
pub use parser::*;
pub use types::*;
