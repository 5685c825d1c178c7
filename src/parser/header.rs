use crate::error::{Result, TasError};
use crate::parser::stream::LogLineStream;
use crate::types::{LogSettings, SettingValue};
use regex::Regex;
use std::io::BufRead;

pub const TIME_AND_DATE_SECTION: &str = "Time and Date";
pub const RIDER_AND_DEVICE_SECTION: &str = "Rider and Device Data";

const SECTION_END: &str = "###";

const TIME_AND_DATE_FIELD: &str =
    r"^#\t\t(?P<label>Start Date|Start Time|Run Number):?\t(?P<value>[^\t]+)$";
const RIDER_AND_DEVICE_FIELD: &str =
    r"^#\t\t(?P<label>[A-Z_]+)\t(?P<value>[^\t]+)(?:\t(?P<param1>[^\t]+)\t(?P<param2>[^\t]+))?$";

/// Parse the two settings sections from the top of a run log.
///
/// Lines inside a section that do not have the expected field shape are
/// skipped. Only a missing section marker is an error.
pub fn parse_settings<R: BufRead>(reader: R, debug: bool) -> Result<LogSettings> {
    let time_field = Regex::new(TIME_AND_DATE_FIELD)?;
    let rider_field = Regex::new(RIDER_AND_DEVICE_FIELD)?;

    let mut stream = LogLineStream::new(reader);
    let mut settings = LogSettings::new();

    seek_section(&mut stream, TIME_AND_DATE_SECTION)?;
    read_section(&mut stream, &time_field, &mut settings, debug)?;

    seek_section(&mut stream, RIDER_AND_DEVICE_SECTION)?;
    read_section(&mut stream, &rider_field, &mut settings, debug)?;

    if debug {
        eprintln!("Parsed {} settings: {}", settings.len(), settings);
    }

    Ok(settings)
}

fn seek_section<R: BufRead>(stream: &mut LogLineStream<R>, name: &str) -> Result<()> {
    let marker = format!("#\t{}", name);
    while let Some(line) = stream.next_line()? {
        if line.starts_with(&marker) {
            return Ok(());
        }
    }
    Err(TasError::MissingSection(name.to_string()))
}

fn read_section<R: BufRead>(
    stream: &mut LogLineStream<R>,
    field: &Regex,
    settings: &mut LogSettings,
    debug: bool,
) -> Result<()> {
    while let Some(line) = stream.next_line()? {
        if line.starts_with(SECTION_END) {
            break;
        }

        let Some(caps) = field.captures(&line) else {
            if debug {
                eprintln!("Skipping settings line {}: {:?}", stream.line_number, line);
            }
            continue;
        };

        let value = caps["value"].to_string();
        let setting = match (caps.name("param1"), caps.name("param2")) {
            (Some(param1), Some(param2)) => SettingValue::Triple(
                value,
                param1.as_str().to_string(),
                param2.as_str().to_string(),
            ),
            _ => SettingValue::Scalar(value),
        };
        settings.insert(&caps["label"], setting);
    }
    Ok(())
}
