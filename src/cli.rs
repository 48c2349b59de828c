//! Command-line parsing and validation.

use crate::error::CliError;
use astroday::data::{
    self, Command, DayOffset, MonthDay, Observer, OutputFormat, Parameters,
};
use std::collections::HashSet;

type CliResult<T> = Result<T, CliError>;

type ApplyFn = fn(Option<&str>, &mut Parameters) -> CliResult<()>;

enum OptKind {
    Value(ApplyFn),
    Flag(ApplyFn),
}

struct OptionSpec {
    name: &'static str,
    kind: OptKind,
}

/// Everything the command line asked for.
pub struct CliInput {
    pub datetime: String,
    pub command: Command,
    pub params: Parameters,
}

const OPTION_SPECS: &[OptionSpec] = &[
    OptionSpec {
        name: "format",
        kind: OptKind::Value(|value, params| {
            let v = required_value("format", value)?;
            params.output.format = v.parse::<OutputFormat>()?;
            Ok(())
        }),
    },
    OptionSpec {
        name: "deltat",
        kind: OptKind::Value(|value, params| {
            params.deltat = parse_f64("deltat", required_value("deltat", value)?)?;
            Ok(())
        }),
    },
    OptionSpec {
        name: "timezone",
        kind: OptKind::Value(|value, params| {
            params.timezone = Some(required_value("timezone", value)?.to_string());
            Ok(())
        }),
    },
    OptionSpec {
        name: "altitude",
        kind: OptKind::Value(|value, params| {
            params.observer.altitude = parse_f64("altitude", required_value("altitude", value)?)?;
            Ok(())
        }),
    },
    OptionSpec {
        name: "horizon-morning",
        kind: OptKind::Value(|value, params| {
            params.observer.horizon_morning =
                parse_f64("horizon-morning", required_value("horizon-morning", value)?)?;
            Ok(())
        }),
    },
    OptionSpec {
        name: "horizon-evening",
        kind: OptKind::Value(|value, params| {
            params.observer.horizon_evening =
                parse_f64("horizon-evening", required_value("horizon-evening", value)?)?;
            Ok(())
        }),
    },
    OptionSpec {
        name: "day-parts",
        kind: OptKind::Value(|value, params| {
            params.observer.day_parts = parse_u32("day-parts", required_value("day-parts", value)?)?;
            Ok(())
        }),
    },
    OptionSpec {
        name: "night-parts",
        kind: OptKind::Value(|value, params| {
            params.observer.night_parts =
                parse_u32("night-parts", required_value("night-parts", value)?)?;
            Ok(())
        }),
    },
    OptionSpec {
        name: "early-spring",
        kind: OptKind::Value(|value, params| {
            params.observer.early_spring =
                required_value("early-spring", value)?.parse::<MonthDay>()?;
            Ok(())
        }),
    },
    OptionSpec {
        name: "early-fall",
        kind: OptKind::Value(|value, params| {
            params.observer.early_fall = required_value("early-fall", value)?.parse::<MonthDay>()?;
            Ok(())
        }),
    },
    OptionSpec {
        name: "offset",
        kind: OptKind::Value(|value, params| {
            params.offset = required_value("offset", value)?.parse::<DayOffset>()?;
            Ok(())
        }),
    },
    OptionSpec {
        name: "roman",
        kind: OptKind::Flag(|_, params| {
            params.observer.roman = true;
            Ok(())
        }),
    },
    OptionSpec {
        name: "neighbors",
        kind: OptKind::Flag(|_, params| {
            params.output.neighbors = true;
            Ok(())
        }),
    },
    OptionSpec {
        name: "labels",
        kind: OptKind::Flag(|_, params| {
            params.output.labels = true;
            Ok(())
        }),
    },
    OptionSpec {
        name: "headers",
        kind: OptKind::Flag(|_, params| {
            params.output.headers = true;
            Ok(())
        }),
    },
    OptionSpec {
        name: "no-headers",
        kind: OptKind::Flag(|_, params| {
            params.output.headers = false;
            Ok(())
        }),
    },
    OptionSpec {
        name: "perf",
        kind: OptKind::Flag(|_, params| {
            params.perf = true;
            Ok(())
        }),
    },
    OptionSpec {
        name: "help",
        kind: OptKind::Flag(|_, _| Err(CliError::Exit(get_help_text()))),
    },
    OptionSpec {
        name: "version",
        kind: OptKind::Flag(|_, _| Err(CliError::Exit(get_version_text()))),
    },
];

pub fn parse_cli(args: Vec<String>) -> CliResult<CliInput> {
    if args.len() < 2 {
        return Err(CliError::Exit(
            "Usage: astroday [OPTIONS] <lat> <lon> [dateTime] <snapshot|schedule>".to_string(),
        ));
    }

    let mut params = Parameters::new(Observer::new(0.0, 0.0));
    let mut positional = Vec::new();
    let mut applied_options: HashSet<&'static str> = HashSet::new();

    for arg in args.into_iter().skip(1) {
        if let Some(stripped) = arg.strip_prefix("--") {
            let (name, value) = stripped
                .split_once('=')
                .map(|(n, v)| (n, Some(v)))
                .unwrap_or((stripped, None));
            apply_option(name, value, &mut params, &mut applied_options)?;
        } else {
            positional.push(arg);
        }
    }

    if let Some(first) = positional.first()
        && first == "help"
    {
        let message = positional
            .get(1)
            .map(|command| get_command_help(command))
            .unwrap_or_else(get_help_text);
        return Err(CliError::Exit(message));
    }

    let (command, datetime) = parse_positional_args(&positional, &mut params)?;
    validate_command_options(command, &applied_options)?;
    params.observer.validate()?;

    Ok(CliInput {
        datetime,
        command,
        params,
    })
}

fn parse_f64(label: &str, value: &str) -> CliResult<f64> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| {
            CliError::from(format!(
                "Invalid {} value: {}",
                label.replace('-', " "),
                value
            ))
        })
}

fn parse_u32(label: &str, value: &str) -> CliResult<u32> {
    value.parse::<u32>().map_err(|_| {
        CliError::from(format!(
            "Invalid {} value: {}",
            label.replace('-', " "),
            value
        ))
    })
}

fn apply_option(
    name: &str,
    value: Option<&str>,
    params: &mut Parameters,
    applied: &mut HashSet<&'static str>,
) -> CliResult<()> {
    let Some(spec) = OPTION_SPECS.iter().find(|s| s.name == name) else {
        return Err(format!("Unknown option: --{}", name).into());
    };

    match spec.kind {
        OptKind::Value(handler) => {
            if applied.contains(spec.name) {
                return Err(format!("Option --{} cannot be used multiple times", spec.name).into());
            }
            let val = required_value(spec.name, value)?;
            handler(Some(val), params)?;
        }
        OptKind::Flag(handler) => {
            if value.is_some() {
                return Err(format!("Option --{} does not take a value", spec.name).into());
            }
            handler(None, params)?;
        }
    }

    applied.insert(spec.name);
    Ok(())
}

fn required_value<'a>(flag: &'static str, value: Option<&'a str>) -> CliResult<&'a str> {
    value.ok_or_else(|| CliError::from(format!("Option --{} requires a value", flag)))
}

fn parse_positional_args(
    positional_args: &[String],
    params: &mut Parameters,
) -> CliResult<(Command, String)> {
    let command_index = positional_args
        .iter()
        .position(|arg| arg == "snapshot" || arg == "schedule")
        .ok_or("No command found".to_string())?;

    let command = match positional_args[command_index].as_str() {
        "schedule" => Command::Schedule,
        _ => Command::Snapshot,
    };

    if command_index + 1 != positional_args.len() {
        return Err("The command must be the last argument".into());
    }

    let (lat_str, lon_str, datetime) = match &positional_args[..command_index] {
        [lat, lon] => (lat, lon, "now".to_string()),
        [lat, lon, datetime] => (lat, lon, datetime.clone()),
        [] | [_] => return Err("Need latitude and longitude before the command".into()),
        _ => return Err("Too many arguments".into()),
    };

    let lat = lat_str
        .parse::<f64>()
        .map_err(|_| CliError::from(format!("Invalid latitude: {}", lat_str)))?;
    let lon = lon_str
        .parse::<f64>()
        .map_err(|_| CliError::from(format!("Invalid longitude: {}", lon_str)))?;
    params.observer.latitude = data::validate_latitude(lat)?;
    params.observer.longitude = data::validate_longitude(lon)?;

    Ok((command, datetime))
}

fn validate_command_options(command: Command, applied: &HashSet<&'static str>) -> CliResult<()> {
    if command == Command::Schedule && applied.contains("neighbors") {
        return Err("Option --neighbors not valid for schedule command".into());
    }
    Ok(())
}

fn get_version_text() -> String {
    format!(
        "astroday {}\n Build: {} ({})\n Built: {}\n Features: {}",
        env!("CARGO_PKG_VERSION"),
        env!("BUILD_PROFILE"),
        env!("BUILD_TARGET"),
        env!("BUILD_DATE"),
        env!("BUILD_FEATURES")
    )
}

fn get_help_text() -> String {
    let defaults = Parameters::new(Observer::new(0.0, 0.0));
    format!(
        r#"astroday {}
Sun and Moon almanac for one observer and day: positions, rise/set and
twilight, seasonal hours, seasons and the day's event schedule.

Usage:
  astroday [OPTIONS] <latitude> <longitude> [dateTime] <snapshot|schedule>

Examples:
  astroday 52.5 13.4 snapshot
  astroday 52.5 13.4 2024-06-21T12:00 snapshot --timezone=Europe/Berlin
  astroday 69.6 18.9 2024-12-21 snapshot --format=json --neighbors
  astroday 48.2 16.4 now schedule --labels

Arguments:
  <latitude>         Latitude in decimal degrees, -90 to +90.
  <longitude>        Longitude in decimal degrees, -180 to +180.
  [dateTime]         Date/time: ISO, unix timestamp or 'now'. Default: now
                       2024-01-01           date only (local midnight)
                       2024-01-01T12:00:00  date and time
                       2024-01-01 12:00     date and time (space separator)
                       1704067200           unix timestamp (seconds)

Options:
  --deltat=<seconds>        Delta T in seconds. Default: {}
  --format=<format>         Output format: text, csv, json. Default: text
  --timezone=<tz>           Timezone offset (+01:00) or IANA name (Europe/Berlin).
  --offset=<days>           Day relative to dateTime: integer, yesterday, tomorrow.
  --altitude=<meters>       Observer altitude above the ellipsoid. Default: {}
  --horizon-morning=<deg>   Custom morning horizon. Default: {}
  --horizon-evening=<deg>   Custom evening horizon. Default: {}
  --day-parts=<n>           Seasonal hours per day, 1 to 24. Default: {}
  --night-parts=<n>         Seasonal hours per night, 1 to 24. Default: {}
  --early-spring=<MM-DD>    Start of the phenological spring wave. Default: {}
  --early-fall=<MM-DD>      Start of the phenological fall wave. Default: {}
  --roman                   Name seasonal hours with Roman numerals.
  --labels                  Print English labels instead of canonical names.
  --[no-]headers            Include headers in CSV output. Default: {}
  --perf                    Print performance statistics to stderr.
  --help                    Show this help message and exit.
  --version                 Print version information and exit.

Commands:
  snapshot                  All fields of the day at the given time.
  schedule                  The day's events split into recent and upcoming.

Run 'astroday help <command>' for command-specific options.
"#,
        env!("CARGO_PKG_VERSION"),
        defaults.deltat,
        defaults.observer.altitude,
        defaults.observer.horizon_morning,
        defaults.observer.horizon_evening,
        defaults.observer.day_parts,
        defaults.observer.night_parts,
        defaults.observer.early_spring,
        defaults.observer.early_fall,
        defaults.output.headers
    )
}

fn get_command_help(command: &str) -> String {
    match command {
        "snapshot" => r#"Usage:
  astroday [OPTIONS] <latitude> <longitude> [dateTime] snapshot

Prints every field of the day: observer and time scales, Sun and Moon
positions, rise/set/transit, twilight, seasonal hour, seasons and change flags.
Times that do not occur on the day print as ---.

Options:
  --neighbors               Also print the snapshots of the two days before and after.

Examples:
  astroday 52.5 13.4 2024-06-21T12:00 snapshot
  astroday 52.5 13.4 2024-06-21T12:00 snapshot --format=csv --no-headers
"#
        .to_string(),
        "schedule" => r#"Usage:
  astroday [OPTIONS] <latitude> <longitude> [dateTime] schedule

Prints the day's events relative to the given time: recent events, most
recent first, then upcoming events in order, followed by the first event
of the next day.

Examples:
  astroday 52.5 13.4 now schedule
  astroday 52.5 13.4 2024-03-30T12:00 schedule --timezone=Europe/Berlin --format=json
"#
        .to_string(),
        _ => format!(
            "Unknown command: {}\n\nRun 'astroday --help' for usage.",
            command
        ),
    }
}
