use crate::conversion::wheel_speed;
use chrono::{DateTime, Local};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One resolved wheel speed (or CG speed) reading
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpeedSensorRecord {
    pub timestamp: DateTime<Local>,
    /// Speed as broadcast by the device
    pub value: f64,
    /// Measurement interval in seconds
    pub elapsed_time: f64,
    /// Cumulative revolution count at interval end
    pub count: u64,
    pub circumference: f64,
}

impl SpeedSensorRecord {
    /// Speed recomputed from the raw revolution counter and interval
    pub fn wheel_speed(&self) -> Option<f64> {
        let ticks = (self.elapsed_time * crate::conversion::SPEED_TICKS_PER_SECOND).round();
        wheel_speed(self.circumference, self.count, ticks as u64)
    }
}

/// One resolved power meter reading
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PowerSensorRecord {
    pub timestamp: DateTime<Local>,
    pub value: f64,
    /// Cumulative event counter
    pub event_count: u64,
    /// Measurement interval in seconds
    pub elapsed_time: f64,
}

/// Sensor tag attached to each row of a time series table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SensorKind {
    Speed,
    CgSpeed,
    Power,
}

impl SensorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SensorKind::Speed => "speed",
            SensorKind::CgSpeed => "cg_speed",
            SensorKind::Power => "power",
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
