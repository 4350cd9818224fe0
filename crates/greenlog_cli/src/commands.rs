//! Command parsing and dispatch.
//!
//! # Responsibility
//! - Declare the command tree parsed by `clap`.
//! - Run commands against one repository and print results.
//!
//! # Invariants
//! - Record writes go through `MeasurementService` so readings are checked.
//! - Nothing is written when parsing fails.

use crate::config::CliConfig;
use chrono::{Local, NaiveDate, NaiveTime};
use clap::{Args, Parser, Subcommand};
use greenlog_core::{
    core_version, DocumentStore, MeasurementRepository, MeasurementService, Readings, Record,
    RepoError, ServiceError, SummaryReport, ALL_GREENHOUSES_LABEL,
};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "greenlog")]
#[command(about = "Greenhouse temperature, humidity and CO2 log")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(flatten)]
    pub config: CliConfig,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Manage greenhouses.
    Greenhouse {
        #[command(subcommand)]
        command: GreenhouseCommand,
    },
    /// Manage measurement records.
    Record {
        #[command(subcommand)]
        command: RecordCommand,
    },
    /// Print per-day averages, oldest first.
    Averages {
        #[arg(long)]
        greenhouse: Option<String>,
    },
    /// Print or write the summary report.
    Report {
        #[arg(long)]
        greenhouse: Option<String>,
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Print the version.
    Version,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum GreenhouseCommand {
    List,
    Add {
        name: String,
    },
    Rename {
        old: String,
        new: String,
    },
    /// Remove a greenhouse and all of its records.
    Remove {
        name: String,
    },
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum RecordCommand {
    /// List records, newest first.
    List {
        #[arg(long)]
        greenhouse: Option<String>,
    },
    Add {
        greenhouse: String,
        /// YYYY-MM-DD
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
        /// HH:MM
        #[arg(value_parser = parse_time)]
        time: NaiveTime,
        #[command(flatten)]
        readings: ReadingArgs,
    },
    /// Overwrite the readings of an existing record.
    Update {
        id: String,
        #[command(flatten)]
        readings: ReadingArgs,
    },
    Delete {
        id: String,
    },
}

/// Positional readings shared by `record add` and `record update`.
#[derive(Debug, Clone, Copy, PartialEq, Args)]
pub struct ReadingArgs {
    #[arg(allow_negative_numbers = true)]
    pub temp_max: f64,
    #[arg(allow_negative_numbers = true)]
    pub temp_min: f64,
    pub hr_max: f64,
    pub hr_min: f64,
    pub co2: f64,
}

impl From<ReadingArgs> for Readings {
    fn from(value: ReadingArgs) -> Self {
        Self {
            temp_max: value.temp_max,
            temp_min: value.temp_min,
            hr_max: value.hr_max,
            hr_min: value.hr_min,
            co2: value.co2,
        }
    }
}

#[derive(Debug)]
pub enum CliError {
    /// The operation was refused; nothing was written.
    Rejected(String),
    Service(ServiceError),
    Repo(RepoError),
    Io(std::io::Error),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rejected(message) => write!(f, "{message}"),
            Self::Service(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "storage failure: {err}"),
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Rejected(_) => None,
            Self::Service(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<ServiceError> for CliError {
    fn from(value: ServiceError) -> Self {
        match value {
            ServiceError::Repo(err) => Self::Repo(err),
            other => Self::Service(other),
        }
    }
}

impl From<RepoError> for CliError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl Command {
    /// Runs the command, writing human-readable output to `out`.
    pub fn run<S: DocumentStore>(
        self,
        repo: &mut MeasurementRepository<S>,
        out: &mut impl Write,
    ) -> Result<(), CliError> {
        match self {
            Self::Version => writeln!(out, "greenlog {}", core_version())?,
            Self::Greenhouse {
                command: GreenhouseCommand::List,
            } => {
                for name in repo.greenhouses() {
                    writeln!(out, "{name}")?;
                }
            }
            Self::Greenhouse {
                command: GreenhouseCommand::Add { name },
            } => {
                if !repo.add_greenhouse(&name)? {
                    return Err(CliError::Rejected(format!(
                        "greenhouse name `{}` is empty or already exists",
                        name.trim()
                    )));
                }
                writeln!(out, "added greenhouse `{}`", name.trim())?;
            }
            Self::Greenhouse {
                command: GreenhouseCommand::Rename { old, new },
            } => {
                if !repo.rename_greenhouse(&old, &new)? {
                    return Err(CliError::Rejected(format!(
                        "cannot rename `{old}` to `{}`: unknown greenhouse, or new name empty or taken",
                        new.trim()
                    )));
                }
                writeln!(out, "renamed `{old}` to `{}`", new.trim())?;
            }
            Self::Greenhouse {
                command: GreenhouseCommand::Remove { name },
            } => {
                if !repo.remove_greenhouse(&name)? {
                    return Err(CliError::Rejected(format!(
                        "cannot remove `{name}`: unknown greenhouse or the last one left"
                    )));
                }
                writeln!(out, "removed greenhouse `{name}` and its records")?;
            }
            Self::Record {
                command: RecordCommand::List { greenhouse },
            } => {
                let mut records = repo.list_records(greenhouse.as_deref());
                // Newest observation first.
                records.sort_by(|a, b| (b.date, b.time).cmp(&(a.date, a.time)));
                write_record_table(out, &records)?;
            }
            Self::Record {
                command:
                    RecordCommand::Add {
                        greenhouse,
                        date,
                        time,
                        readings,
                    },
            } => {
                let record = MeasurementService::new(repo).record_measurement(
                    &greenhouse,
                    date,
                    time,
                    readings.into(),
                )?;
                writeln!(out, "added record {}", record.id)?;
            }
            Self::Record {
                command: RecordCommand::Update { id, readings },
            } => {
                let record =
                    MeasurementService::new(repo).correct_measurement(&id, readings.into())?;
                writeln!(out, "updated record {}", record.id)?;
            }
            Self::Record {
                command: RecordCommand::Delete { id },
            } => {
                MeasurementService::new(repo).delete_measurement(&id)?;
                writeln!(out, "deleted record {id}")?;
            }
            Self::Averages { greenhouse } => {
                let days = repo.daily_averages(greenhouse.as_deref());
                writeln!(
                    out,
                    "{:<12}{:>10}{:>10}{:>10}{:>10}{:>10}{:>10}{:>10}",
                    "fecha", "temp_max", "temp_min", "temp_avg", "hr_max", "hr_min", "hr_avg", "co2"
                )?;
                for day in days {
                    writeln!(
                        out,
                        "{:<12}{:>10.1}{:>10.1}{:>10.1}{:>10.1}{:>10.1}{:>10.1}{:>10.0}",
                        day.date.to_string(),
                        day.temp_max_mean,
                        day.temp_min_mean,
                        day.temp_avg,
                        day.hr_max_mean,
                        day.hr_min_mean,
                        day.hr_avg,
                        day.co2_mean
                    )?;
                }
            }
            Self::Report { greenhouse, output } => {
                let greenhouse = greenhouse.filter(|name| !name.is_empty());
                let days = repo.daily_averages(greenhouse.as_deref());
                let scope = greenhouse.as_deref().unwrap_or(ALL_GREENHOUSES_LABEL);
                let report = SummaryReport::build(scope, &days, Local::now().naive_local())
                    .ok_or_else(|| {
                        CliError::Rejected(format!("no records to report for `{scope}`"))
                    })?;
                let text = report.render_text();
                match output {
                    Some(path) => {
                        std::fs::write(&path, text)?;
                        writeln!(out, "report written to {}", path.display())?;
                    }
                    None => write!(out, "{text}")?,
                }
            }
        }
        Ok(())
    }
}

fn write_record_table(out: &mut impl Write, records: &[&Record]) -> std::io::Result<()> {
    writeln!(
        out,
        "{:<22}{:<12}{:<7}{:<20}{:>9}{:>9}{:>8}{:>8}{:>8}",
        "id", "fecha", "hora", "invernadero", "temp_max", "temp_min", "hr_max", "hr_min", "co2"
    )?;
    for record in records {
        writeln!(
            out,
            "{:<22}{:<12}{:<7}{:<20}{:>9.1}{:>9.1}{:>8.1}{:>8.1}{:>8.0}",
            record.id,
            record.date.to_string(),
            record.time.format("%H:%M").to_string(),
            record.greenhouse,
            record.temp_max,
            record.temp_min,
            record.hr_max,
            record.hr_min,
            record.co2
        )?;
    }
    Ok(())
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| format!("invalid date `{value}`, expected YYYY-MM-DD"))
}

fn parse_time(value: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| format!("invalid time `{value}`, expected HH:MM"))
}
