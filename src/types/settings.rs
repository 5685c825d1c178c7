use crate::error::{Result, TasError};
use std::collections::BTreeMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Header field value: either a bare value or a value with two parameters
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum SettingValue {
    Scalar(String),
    Triple(String, String, String),
}

impl SettingValue {
    /// The leading value, present in both shapes
    pub fn value(&self) -> &str {
        match self {
            SettingValue::Scalar(value) => value,
            SettingValue::Triple(value, _, _) => value,
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Scalar(value) => write!(f, "'{}'", value),
            SettingValue::Triple(value, param1, param2) => {
                write!(f, "('{}', '{}', '{}')", value, param1, param2)
            }
        }
    }
}

/// Announced ANT+ sensor name, e.g. `SPD_12345`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SensorId {
    pub name: String,
    pub id: String,
}

impl SensorId {
    /// Split `<TYPE>_<ID>` into its parts; anything else is not a sensor name
    pub fn parse(name: &str) -> Option<Self> {
        let mut parts = name.split('_');
        let (_kind, id) = match (parts.next(), parts.next(), parts.next()) {
            (Some(kind), Some(id), None) if !kind.is_empty() && !id.is_empty() => (kind, id),
            _ => return None,
        };
        Some(Self {
            name: name.to_string(),
            id: id.to_string(),
        })
    }
}

/// Speed sensor identity and wheel circumference
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpeedSensorConfig {
    pub sensor: SensorId,
    pub circumference: f64,
}

/// Power meter identity and angular offset
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PowerSensorConfig {
    pub sensor: SensorId,
    pub offset: i64,
}

/// Settings read from the "Time and Date" and "Rider and Device Data" header sections.
///
/// Keys are the lower-cased header labels (`start date`, `run number`,
/// `speed`, `power`, ...).
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct LogSettings {
    fields: BTreeMap<String, SettingValue>,
}

impl LogSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: &str, value: SettingValue) {
        self.fields.insert(label.to_lowercase(), value);
    }

    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.fields.get(key)
    }

    /// Leading value of a field regardless of its shape
    pub fn scalar(&self, key: &str) -> Option<&str> {
        self.get(key).map(SettingValue::value)
    }

    pub fn start_date(&self) -> Option<&str> {
        self.scalar("start date")
    }

    pub fn start_time(&self) -> Option<&str> {
        self.scalar("start time")
    }

    pub fn run_number(&self) -> Option<&str> {
        self.scalar("run number")
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SettingValue)> {
        self.fields.iter()
    }

    /// Speed sensor from the `SPEED <name> <circumference> <param>` entry
    pub fn speed_sensor(&self) -> Result<SpeedSensorConfig> {
        let (sensor, circumference, _) = self.sensor_entry("speed")?;
        let circumference = circumference.parse::<f64>().map_err(|_| {
            TasError::InvalidFileFormat(format!(
                "speed circumference is not a number: '{}'",
                circumference
            ))
        })?;
        Ok(SpeedSensorConfig {
            sensor,
            circumference,
        })
    }

    /// Power meter from the `POWER <name> <offset> <param>` entry
    pub fn power_sensor(&self) -> Result<PowerSensorConfig> {
        let (sensor, offset, _) = self.sensor_entry("power")?;
        let offset = offset.parse::<i64>().map_err(|_| {
            TasError::InvalidFileFormat(format!("power offset is not an integer: '{}'", offset))
        })?;
        Ok(PowerSensorConfig { sensor, offset })
    }

    fn sensor_entry(&self, key: &str) -> Result<(SensorId, &str, &str)> {
        match self.get(key) {
            Some(SettingValue::Triple(name, param1, param2)) => {
                let sensor = SensorId::parse(name).ok_or_else(|| {
                    TasError::InvalidFileFormat(format!(
                        "{} sensor name '{}' is not of the form TYPE_ID",
                        key, name
                    ))
                })?;
                Ok((sensor, param1.as_str(), param2.as_str()))
            }
            Some(SettingValue::Scalar(value)) => Err(TasError::InvalidFileFormat(format!(
                "{} entry '{}' is missing its calibration parameters",
                key, value
            ))),
            None => Err(TasError::InvalidFileFormat(format!(
                "no '{}' entry in Rider and Device Data",
                key
            ))),
        }
    }

    /// Render the settings as a JSON object
    #[cfg(feature = "json")]
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for LogSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "'{}': {}", key, value)?;
        }
        write!(f, "}}")
    }
}
