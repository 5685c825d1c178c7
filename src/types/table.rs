use crate::types::{PowerSensorRecord, SensorKind, SpeedSensorRecord};
use chrono::{DateTime, Local};
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One row of the merged sensor time series
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimeSeriesRow {
    pub timestamp: DateTime<Local>,
    pub sensor: SensorKind,
    pub value: f64,
    pub elapsed_time: f64,
}

impl TimeSeriesRow {
    pub fn from_speed(record: &SpeedSensorRecord) -> Self {
        Self {
            timestamp: record.timestamp,
            sensor: SensorKind::Speed,
            value: record.value,
            elapsed_time: record.elapsed_time,
        }
    }

    pub fn from_cg_speed(record: &SpeedSensorRecord) -> Self {
        Self {
            sensor: SensorKind::CgSpeed,
            ..Self::from_speed(record)
        }
    }

    pub fn from_power(record: &PowerSensorRecord) -> Self {
        Self {
            timestamp: record.timestamp,
            sensor: SensorKind::Power,
            value: record.value,
            elapsed_time: record.elapsed_time,
        }
    }
}

/// Rows from one or more sensors, ordered by timestamp.
///
/// Rows sharing a timestamp keep the order they were added in.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimeSeriesTable {
    pub rows: Vec<TimeSeriesRow>,
}

impl TimeSeriesTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Speed and power rows merged by timestamp (the CLI table)
    pub fn assemble<S, P>(speed: S, power: P) -> Self
    where
        S: IntoIterator<Item = SpeedSensorRecord>,
        P: IntoIterator<Item = PowerSensorRecord>,
    {
        let mut table = Self::new();
        table.extend_speed(speed);
        table.extend_power(power);
        table.sort();
        table
    }

    /// Speed, CG speed and power rows in one table indexed by timestamp
    pub fn combined<S, C, P>(speed: S, cg_speed: C, power: P) -> Self
    where
        S: IntoIterator<Item = SpeedSensorRecord>,
        C: IntoIterator<Item = SpeedSensorRecord>,
        P: IntoIterator<Item = PowerSensorRecord>,
    {
        let mut table = Self::new();
        table.extend_speed(speed);
        table.extend_cg_speed(cg_speed);
        table.extend_power(power);
        table.sort();
        table
    }

    pub fn extend_speed<S: IntoIterator<Item = SpeedSensorRecord>>(&mut self, records: S) {
        self.rows
            .extend(records.into_iter().map(|r| TimeSeriesRow::from_speed(&r)));
    }

    pub fn extend_cg_speed<C: IntoIterator<Item = SpeedSensorRecord>>(&mut self, records: C) {
        self.rows
            .extend(records.into_iter().map(|r| TimeSeriesRow::from_cg_speed(&r)));
    }

    pub fn extend_power<P: IntoIterator<Item = PowerSensorRecord>>(&mut self, records: P) {
        self.rows
            .extend(records.into_iter().map(|r| TimeSeriesRow::from_power(&r)));
    }

    /// Stable sort by timestamp
    pub fn sort(&mut self) {
        self.rows.sort_by_key(|row| row.timestamp);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows per sensor kind
    pub fn counts(&self) -> BTreeMap<SensorKind, usize> {
        let mut counts = BTreeMap::new();
        for row in &self.rows {
            *counts.entry(row.sensor).or_insert(0) += 1;
        }
        counts
    }
}
