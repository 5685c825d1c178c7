use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use std::path::PathBuf;
use tas_parser::{export_to_csv, DashboardRunLog, ExportOptions, ParseOptions};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_SHA"),
    ", built ",
    env!("VERGEN_BUILD_DATE"),
    ")"
);

fn build_command() -> Command {
    Command::new("TAS Parser")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(LONG_VERSION)
        .about("Read a Track Aero System dashboard run log and print its speed and power readings as CSV.")
        .arg(
            Arg::new("file")
                .help("Alphamantis Track Aero System dashboard run log file")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .help("Print parsing diagnostics to stderr")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("all-sensors")
                .long("all-sensors")
                .help("Include center of gravity speed (cg_speed) rows in the table")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .help("Write the CSV table to FILE instead of stdout")
                .value_name("FILE"),
        )
}

fn export_options(matches: &ArgMatches) -> ExportOptions {
    ExportOptions {
        include_cg_speed: matches.get_flag("all-sensors"),
        output: matches.get_one::<String>("output").map(PathBuf::from),
    }
}

fn main() -> Result<()> {
    let matches = build_command().get_matches();

    let file = matches
        .get_one::<String>("file")
        .context("No run log file given")?;
    let debug = matches.get_flag("debug");
    let options = export_options(&matches);

    let log = DashboardRunLog::open_with(file, ParseOptions { debug })
        .with_context(|| format!("Failed to read run log: {file}"))?;

    let report = export_to_csv(&log, &options)
        .with_context(|| format!("Failed to export run log: {file}"))?;

    if let Some(path) = &report.output {
        eprintln!("Exported {} rows to: {}", report.rows, path.display());
    }
    if debug {
        for (sensor, count) in &report.counts {
            eprintln!("{sensor}: {count} rows");
        }
    }

    eprintln!("{}", log.settings());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_is_valid() {
        build_command().debug_assert();
    }

    #[test]
    fn test_defaults_match_plain_invocation() {
        let matches = build_command()
            .try_get_matches_from(["tas_parser", "run.txt"])
            .unwrap();
        assert_eq!(matches.get_one::<String>("file").unwrap(), "run.txt");
        assert!(!matches.get_flag("debug"));

        let options = export_options(&matches);
        assert!(!options.include_cg_speed);
        assert!(options.output.is_none());
    }

    #[test]
    fn test_export_flags() {
        let matches = build_command()
            .try_get_matches_from([
                "tas_parser",
                "--all-sensors",
                "-o",
                "out/run.csv",
                "run.txt",
            ])
            .unwrap();
        let options = export_options(&matches);
        assert!(options.include_cg_speed);
        assert_eq!(options.output, Some(PathBuf::from("out/run.csv")));
    }

    #[test]
    fn test_file_is_required() {
        assert!(build_command()
            .try_get_matches_from(["tas_parser"])
            .is_err());
    }
}
