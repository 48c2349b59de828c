use crate::astro::calendar::days_of_month;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Invalid month-day '{0}'. Expected MM-DD such as 03-21")]
    MonthDayFormat(String),
    #[error("'{0}' is not a calendar date")]
    ImpossibleDate(String),
    #[error("{label} must be between {min} and {max}, got {value}")]
    OutOfRange {
        label: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
    #[error("Invalid day offset '{0}'. Use an integer, 'yesterday' or 'tomorrow'")]
    DayOffset(String),
    #[error("Unknown output format '{0}'. Supported formats: text, csv, json")]
    OutputFormat(String),
}

/// A recurring calendar cutoff such as the start of the early-spring wave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MonthDay {
    pub month: u32,
    pub day: u32,
}

impl MonthDay {
    pub fn new(month: u32, day: u32) -> Result<Self, ConfigError> {
        // 2024 is a leap year, so 02-29 is accepted
        if !(1..=12).contains(&month) || day == 0 || day > days_of_month(2024, month) {
            return Err(ConfigError::ImpossibleDate(format!("{:02}-{:02}", month, day)));
        }
        Ok(Self { month, day })
    }

    /// Day of year of this cutoff in `year`; 02-29 falls back to 02-28 in
    /// common years.
    pub fn day_of_year(self, year: i32) -> u32 {
        let before: u32 = (1..self.month).map(|m| days_of_month(year, m)).sum();
        before + self.day.min(days_of_month(year, self.month))
    }
}

impl FromStr for MonthDay {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (month, day) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| ConfigError::MonthDayFormat(s.to_string()))?;
        let parse = |part: &str| {
            if part.is_empty() || part.len() > 2 || !part.chars().all(|c| c.is_ascii_digit()) {
                return Err(ConfigError::MonthDayFormat(s.to_string()));
            }
            part.parse::<u32>()
                .map_err(|_| ConfigError::MonthDayFormat(s.to_string()))
        };
        MonthDay::new(parse(month)?, parse(day)?)
    }
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

/// Observer position and per-observer calendar settings. Angles in degrees,
/// altitude in metres above the ellipsoid.
#[derive(Debug, Clone, PartialEq)]
pub struct Observer {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    pub horizon_morning: f64,
    pub horizon_evening: f64,
    pub day_parts: u32,
    pub night_parts: u32,
    pub early_spring: MonthDay,
    pub early_fall: MonthDay,
    /// Name seasonal hours with Roman numerals instead of daytime phases.
    pub roman: bool,
}

impl Observer {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude: 0.0,
            horizon_morning: 0.0,
            horizon_evening: 0.0,
            day_parts: 12,
            night_parts: 12,
            early_spring: MonthDay { month: 1, day: 10 },
            early_fall: MonthDay { month: 8, day: 1 },
            roman: false,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        super::validation::validate_latitude(self.latitude)?;
        super::validation::validate_longitude(self.longitude)?;
        super::validation::validate_horizon(self.horizon_morning, "Morning horizon")?;
        super::validation::validate_horizon(self.horizon_evening, "Evening horizon")?;
        super::validation::validate_parts(self.day_parts, "Day parts")?;
        super::validation::validate_parts(self.night_parts, "Night parts")?;
        Ok(())
    }
}

/// Which calendar day, relative to the requested one, a snapshot describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DayOffset(pub i32);

impl FromStr for DayOffset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "yesterday" => Ok(DayOffset(-1)),
            "today" => Ok(DayOffset(0)),
            "tomorrow" => Ok(DayOffset(1)),
            other => other
                .parse::<i32>()
                .ok()
                .filter(|n| n.abs() <= 36_600)
                .map(DayOffset)
                .ok_or_else(|| ConfigError::DayOffset(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Csv,
    Json,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(ConfigError::OutputFormat(s.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format: OutputFormat,
    pub headers: bool,
    /// Resolve category keys through the English label table.
    pub labels: bool,
    /// Include the snapshots of the surrounding days.
    pub neighbors: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            headers: true,
            labels: false,
            neighbors: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Parameters {
    pub observer: Observer,
    pub deltat: f64,
    pub timezone: Option<String>,
    pub offset: DayOffset,
    pub output: OutputOptions,
    pub perf: bool,
}

impl Parameters {
    pub fn new(observer: Observer) -> Self {
        Self {
            observer,
            deltat: crate::astro::DEFAULT_DELTA_T,
            timezone: None,
            offset: DayOffset::default(),
            output: OutputOptions::default(),
            perf: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Snapshot,
    Schedule,
}
