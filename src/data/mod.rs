pub mod config;
pub mod time_utils;
pub mod validation;

pub use config::{
    Command, ConfigError, DayOffset, MonthDay, Observer, OutputFormat, OutputOptions, Parameters,
};
pub use time_utils::{Moment, Zone, get_zone, parse_datetime_string};
pub use validation::*;
