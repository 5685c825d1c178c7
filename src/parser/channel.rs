//! Speed, CG speed and power channels for the sensor frame scanner
//!
//! Raw ANT+ data lines look like
//! `SPD_12345<TAB>1700000000.100000<TAB>S<TAB>0<TAB>2048<TAB>50<TAB><TAB>...`
//! and the device's derived values like
//! `SPEED<TAB>SPD_12345<TAB>1700000000.500000<TAB>9.876500`.

use crate::conversion::{parse_epoch_timestamp, power_ticks_to_seconds, speed_ticks_to_seconds};
use crate::error::Result;
use crate::parser::scanner::{Announce, DedupPolicy, SensorChannel};
use crate::types::{
    PowerSensorConfig, PowerSensorRecord, SensorKind, SpeedSensorConfig, SpeedSensorRecord,
};
use regex::{Captures, Regex};

/// Raw fields of a wheel speed announcement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeedInterval {
    /// Interval length in 1/1024 s ticks
    pub ticks: u64,
    /// Cumulative wheel revolutions
    pub count: u64,
}

/// Raw fields of a power meter announcement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerInterval {
    pub event_count: u64,
    /// Interval length in 0.5 ms ticks
    pub ticks: u64,
}

fn speed_announce_pattern(id: &str) -> Result<Regex> {
    Ok(Regex::new(&format!(
        r"^[A-Z0-9]+_{id}\t(?P<timestamp>\d+\.\d+)\tS\t0\t(?P<timer>\d+)\t(?P<count>\d+)\t\t",
        id = regex::escape(id)
    ))?)
}

fn broadcast_pattern(prefix: &str, id: &str) -> Result<Regex> {
    Ok(Regex::new(&format!(
        r"^{prefix}[A-Z0-9]+_{id}\t(?P<timestamp>\d+\.\d+)\t(?P<value>\d+\.\d+)$",
        prefix = prefix,
        id = regex::escape(id)
    ))?)
}

fn parse_u64(caps: &Captures, group: &str) -> Option<u64> {
    caps.name(group)?.as_str().parse().ok()
}

/// Wheel speed sensor channel.
///
/// The same announcement lines drive both the device's `SPEED` broadcast
/// and its lean-corrected `CG_SPEED` broadcast; only the broadcast pattern
/// and the dedup policy differ.
pub struct SpeedChannel {
    kind: SensorKind,
    announce: Regex,
    broadcast: Regex,
    circumference: f64,
}

impl SpeedChannel {
    /// `SPEED` broadcasts, first value per interval
    pub fn new(config: &SpeedSensorConfig) -> Result<Self> {
        Ok(Self {
            kind: SensorKind::Speed,
            announce: speed_announce_pattern(&config.sensor.id)?,
            broadcast: broadcast_pattern(r"SPEED\t", &config.sensor.id)?,
            circumference: config.circumference,
        })
    }

    /// `CG_SPEED` broadcasts, last value per interval.
    ///
    /// The device sends several corrected values per interval and the final
    /// one is taken as authoritative. Whether an average would be better is
    /// still open.
    pub fn cg_speed(config: &SpeedSensorConfig) -> Result<Self> {
        Ok(Self {
            kind: SensorKind::CgSpeed,
            announce: speed_announce_pattern(&config.sensor.id)?,
            broadcast: broadcast_pattern("CG_SPEED_", &config.sensor.id)?,
            circumference: config.circumference,
        })
    }

    pub fn kind(&self) -> SensorKind {
        self.kind
    }
}

impl SensorChannel for SpeedChannel {
    type Interval = SpeedInterval;
    type Record = SpeedSensorRecord;

    fn name(&self) -> &'static str {
        self.kind.as_str()
    }

    fn policy(&self) -> DedupPolicy {
        match self.kind {
            SensorKind::CgSpeed => DedupPolicy::Last,
            _ => DedupPolicy::First,
        }
    }

    fn match_announce(&self, line: &str) -> Option<Announce<SpeedInterval>> {
        let caps = self.announce.captures(line)?;
        let ticks = parse_u64(&caps, "timer")?;
        let count = parse_u64(&caps, "count")?;
        if ticks == 0 {
            return Some(Announce::Idle);
        }
        Some(Announce::Interval(SpeedInterval { ticks, count }))
    }

    fn match_value(&self, line: &str, interval: &SpeedInterval) -> Option<SpeedSensorRecord> {
        let caps = self.broadcast.captures(line)?;
        Some(SpeedSensorRecord {
            timestamp: parse_epoch_timestamp(&caps["timestamp"])?,
            value: caps["value"].parse().ok()?,
            elapsed_time: speed_ticks_to_seconds(interval.ticks),
            count: interval.count,
            circumference: self.circumference,
        })
    }
}

/// Power meter channel
pub struct PowerChannel {
    announce: Regex,
    broadcast: Regex,
}

impl PowerChannel {
    pub fn new(config: &PowerSensorConfig) -> Result<Self> {
        let announce = Regex::new(&format!(
            r"^[A-Z0-9]+_{id}\t(?P<timestamp>\d+\.\d+)\tS\t(?P<event_count>\d+)\t(?P<elapsed_time>\d+)\t(?P<torque_ticks>\d+)\t(?P<slope>\d+)\t",
            id = regex::escape(&config.sensor.id)
        ))?;
        Ok(Self {
            announce,
            broadcast: broadcast_pattern(r"POWER\t", &config.sensor.id)?,
        })
    }
}

impl SensorChannel for PowerChannel {
    type Interval = PowerInterval;
    type Record = PowerSensorRecord;

    fn name(&self) -> &'static str {
        SensorKind::Power.as_str()
    }

    fn policy(&self) -> DedupPolicy {
        DedupPolicy::First
    }

    fn match_announce(&self, line: &str) -> Option<Announce<PowerInterval>> {
        let caps = self.announce.captures(line)?;
        let event_count = parse_u64(&caps, "event_count")?;
        let ticks = parse_u64(&caps, "elapsed_time")?;
        // Event count 0 is a no-op tick
        if event_count == 0 {
            return Some(Announce::Idle);
        }
        Some(Announce::Interval(PowerInterval { event_count, ticks }))
    }

    fn match_value(&self, line: &str, interval: &PowerInterval) -> Option<PowerSensorRecord> {
        let caps = self.broadcast.captures(line)?;
        Some(PowerSensorRecord {
            timestamp: parse_epoch_timestamp(&caps["timestamp"])?,
            value: caps["value"].parse().ok()?,
            event_count: interval.event_count,
            elapsed_time: power_ticks_to_seconds(interval.ticks),
        })
    }
}
