use crate::error::Result;
use crate::parser::channel::{PowerChannel, SpeedChannel};
use crate::parser::header::parse_settings;
use crate::parser::scanner::{SensorChannel, SensorFrameScanner};
use crate::types::{LogSettings, PowerSensorRecord, SpeedSensorRecord};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Options applied to every pass over a run log
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    /// Print scanner diagnostics to stderr
    pub debug: bool,
}

/// Records read lazily from a fresh pass over the log file
pub type SensorRecords<C> = SensorFrameScanner<BufReader<File>, C>;

/// A TAS dashboard run log on disk.
///
/// Settings are read once when the log is opened. Each call to [`speed`],
/// [`power`] or [`cg_speed`] opens the file again and returns an independent
/// lazy pass over it; the file is closed when that iterator is dropped.
///
/// [`speed`]: DashboardRunLog::speed
/// [`power`]: DashboardRunLog::power
/// [`cg_speed`]: DashboardRunLog::cg_speed
#[derive(Debug, Clone)]
pub struct DashboardRunLog {
    path: PathBuf,
    settings: LogSettings,
    options: ParseOptions,
}

impl DashboardRunLog {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path, ParseOptions::default())
    }

    pub fn open_with<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if options.debug {
            let metadata = std::fs::metadata(&path)?;
            eprintln!("=== PARSING RUN LOG ===");
            eprintln!("File: {} ({} bytes)", path.display(), metadata.len());
        }

        let file = File::open(&path)?;
        let settings = parse_settings(BufReader::new(file), options.debug)?;

        Ok(Self {
            path,
            settings,
            options,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self) -> &LogSettings {
        &self.settings
    }

    /// Wheel speed, first broadcast value per measurement interval
    pub fn speed(&self) -> Result<SensorRecords<SpeedChannel>> {
        let channel = SpeedChannel::new(&self.settings.speed_sensor()?)?;
        self.scan(channel)
    }

    /// Center of gravity speed, last broadcast value per measurement interval
    pub fn cg_speed(&self) -> Result<SensorRecords<SpeedChannel>> {
        let channel = SpeedChannel::cg_speed(&self.settings.speed_sensor()?)?;
        self.scan(channel)
    }

    /// Power, first broadcast value per measurement interval
    pub fn power(&self) -> Result<SensorRecords<PowerChannel>> {
        let channel = PowerChannel::new(&self.settings.power_sensor()?)?;
        self.scan(channel)
    }

    pub fn speed_records(&self) -> Result<Vec<SpeedSensorRecord>> {
        self.speed()?.collect()
    }

    pub fn cg_speed_records(&self) -> Result<Vec<SpeedSensorRecord>> {
        self.cg_speed()?.collect()
    }

    pub fn power_records(&self) -> Result<Vec<PowerSensorRecord>> {
        self.power()?.collect()
    }

    fn scan<C: SensorChannel>(&self, channel: C) -> Result<SensorRecords<C>> {
        let file = File::open(&self.path)?;
        Ok(SensorFrameScanner::new(BufReader::new(file), channel).with_debug(self.options.debug))
    }
}
