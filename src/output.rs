//! Output dispatch and the shared pieces of the text, CSV and JSON writers.

mod formatters;

use crate::error::OutputError;
use crate::planner::OutputPlan;
use astroday::astro::fields::format_hhmm;
use astroday::astro::{Almanac, DaySnapshot, FieldValue, ScheduledEvent};
use astroday::data::{Command, OutputFormat};
use astroday::labels::{self, Canonical, LabelLookup};
use formatters::{CsvFormatter, Formatter, JsonFormatter, TextFormatter};
use std::io::{self, BufWriter, Write};
use unicode_width::UnicodeWidthStr;

/// Offsets of the neighbouring snapshots, in the order JSON output nests them.
const NEIGHBOR_KEYS: [i32; 4] = [2, 1, -1, -2];

/// Write the almanac to stdout; returns the number of rows written.
pub fn dispatch_output(
    almanac: &Almanac,
    command: Command,
    plan: &OutputPlan,
) -> Result<usize, OutputError> {
    let stdout = io::stdout().lock();
    let mut writer = BufWriter::new(stdout);
    let lookup = label_lookup(plan.labels);

    let count = {
        let mut formatter: Box<dyn Formatter + '_> = match plan.format {
            OutputFormat::Text => Box::new(TextFormatter::new(&mut writer, lookup.as_ref())),
            OutputFormat::Csv => Box::new(CsvFormatter::new(
                &mut writer,
                lookup.as_ref(),
                plan.headers,
            )),
            OutputFormat::Json => Box::new(JsonFormatter::new(&mut writer, lookup.as_ref())),
        };
        match command {
            Command::Snapshot => formatter.write_snapshot(almanac, plan.neighbors)?,
            Command::Schedule => formatter.write_schedule(almanac)?,
        }
    };
    writer.flush()?;
    Ok(count)
}

fn label_lookup(labels: bool) -> Box<dyn LabelLookup> {
    if labels {
        labels::for_language("en").unwrap_or_else(|| Box::new(Canonical))
    } else {
        Box::new(Canonical)
    }
}

/// Display text of one value, with category keys resolved through `lookup`.
pub(crate) fn display_value(lookup: &dyn LabelLookup, field: &str, value: &FieldValue) -> String {
    match value {
        FieldValue::Category(key) => lookup.category(field, key).into_owned(),
        other => other.to_string(),
    }
}

/// Field table of the requested day, optionally with one column per
/// neighbouring day. Rows follow the field order of the requested day;
/// fields only a neighbour has are appended, and missing cells stay empty.
pub(crate) fn snapshot_table(
    almanac: &Almanac,
    neighbors: bool,
    lookup: &dyn LabelLookup,
) -> (Vec<String>, Vec<Vec<String>>) {
    let days: Vec<&DaySnapshot> = if neighbors {
        almanac.days().iter().collect()
    } else {
        vec![almanac.today()]
    };
    let maps: Vec<_> = days.iter().map(|day| day.fields()).collect();

    let mut names: Vec<&'static str> = Vec::new();
    let today_first = std::iter::once(almanac.today().fields());
    for map in today_first.chain(maps.iter().cloned()) {
        for (name, _) in map {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }

    let mut headers = vec!["Field".to_string()];
    if neighbors {
        headers.extend(days.iter().map(|day| day.offset.to_string()));
    } else {
        headers.push("Value".to_string());
    }

    let rows = names
        .into_iter()
        .map(|name| {
            let mut row = vec![lookup.field(name).into_owned()];
            row.extend(maps.iter().map(|map| {
                map.iter()
                    .find(|(field, _)| *field == name)
                    .map(|(field, value)| display_value(lookup, field, value))
                    .unwrap_or_default()
            }));
            row
        })
        .collect();
    (headers, rows)
}

/// Local time of a schedule entry; the look-ahead entry of the next day is
/// marked with `+1`.
pub(crate) fn schedule_time(entry: &ScheduledEvent) -> String {
    if entry.hour >= 24.0 {
        format!("{} +1", format_hhmm(entry.hour - 24.0))
    } else {
        format_hhmm(entry.hour)
    }
}

pub(crate) fn schedule_table(
    almanac: &Almanac,
    lookup: &dyn LabelLookup,
) -> (Vec<String>, Vec<Vec<String>>) {
    let partition = almanac.partition();
    let headers = ["When", "Time", "Event", "Value"]
        .map(String::from)
        .to_vec();
    let section = |name: &str, entries: &[ScheduledEvent]| -> Vec<Vec<String>> {
        entries
            .iter()
            .map(|entry| {
                vec![
                    name.to_string(),
                    schedule_time(entry),
                    lookup.field(entry.event.field).into_owned(),
                    entry
                        .event
                        .value
                        .as_deref()
                        .map(|value| lookup.category(entry.event.field, value).into_owned())
                        .unwrap_or_default(),
                ]
            })
            .collect()
    };
    let mut rows = section("recent", &partition.recent);
    rows.extend(section("upcoming", &partition.upcoming));
    (headers, rows)
}

fn pad(text: &str, width: usize) -> String {
    format!("{}{}", text, " ".repeat(width.saturating_sub(text.width())))
}

fn rule(widths: &[usize], left: char, middle: char, right: char) -> String {
    let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
    format!("{}{}{}", left, segments.join(&middle.to_string()), right)
}

/// Box-drawn table sized by display width.
pub(crate) fn write_box_table<W: Write>(
    writer: &mut W,
    headers: &[String],
    rows: &[Vec<String>],
) -> io::Result<()> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.width());
        }
    }

    let line = |cells: &[String]| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!(" {} ", pad(cell, *width)))
            .collect();
        format!("│{}│", padded.join("│"))
    };

    writeln!(writer, "{}", rule(&widths, '┌', '┬', '┐'))?;
    writeln!(writer, "{}", line(headers))?;
    writeln!(writer, "{}", rule(&widths, '├', '┼', '┤'))?;
    for row in rows {
        writeln!(writer, "{}", line(row))?;
    }
    writeln!(writer, "{}", rule(&widths, '└', '┴', '┘'))?;
    Ok(())
}

pub(crate) fn csv_escape(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub(crate) fn json_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// JSON text of one value: numbers unquoted, flags as booleans.
pub(crate) fn json_value(lookup: &dyn LabelLookup, field: &str, value: &FieldValue) -> String {
    match value {
        FieldValue::Bool(flag) => flag.to_string(),
        FieldValue::Number { value: number, .. } if !number.is_finite() => "null".to_string(),
        other if other.is_numeric() => other.to_string(),
        other => json_string(&display_value(lookup, field, other)),
    }
}

/// One JSON object of a snapshot's fields, with the neighbouring snapshots
/// nested under their offsets when `neighbors` is set.
pub(crate) fn snapshot_json(
    almanac: &Almanac,
    neighbors: bool,
    lookup: &dyn LabelLookup,
) -> String {
    let mut members = day_members(almanac.today(), lookup);
    if neighbors {
        for offset in NEIGHBOR_KEYS {
            if let Some(day) = almanac.day(offset) {
                members.push(format!(
                    "{}:{{{}}}",
                    json_string(&offset.to_string()),
                    day_members(day, lookup).join(",")
                ));
            }
        }
    }
    format!("{{{}}}", members.join(","))
}

fn day_members(day: &DaySnapshot, lookup: &dyn LabelLookup) -> Vec<String> {
    day.fields()
        .iter()
        .map(|(name, value)| {
            format!(
                "{}:{}",
                json_string(&lookup.field(name)),
                json_value(lookup, name, value)
            )
        })
        .collect()
}

pub(crate) fn schedule_json(almanac: &Almanac, lookup: &dyn LabelLookup) -> (String, usize) {
    let partition = almanac.partition();
    let entries = |list: &[ScheduledEvent]| -> String {
        let items: Vec<String> = list
            .iter()
            .map(|entry| {
                let value = entry
                    .event
                    .value
                    .as_deref()
                    .map(|v| json_string(&lookup.category(entry.event.field, v)))
                    .unwrap_or_else(|| "null".to_string());
                format!(
                    r#"{{"time":{},"hour":{:.4},"event":{},"value":{}}}"#,
                    json_string(&schedule_time(entry)),
                    entry.hour,
                    json_string(&lookup.field(entry.event.field)),
                    value
                )
            })
            .collect();
        format!("[{}]", items.join(","))
    };
    let count = partition.recent.len() + partition.upcoming.len();
    (
        format!(
            r#"{{"recent":{},"upcoming":{}}}"#,
            entries(&partition.recent),
            entries(&partition.upcoming)
        ),
        count,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use astroday::labels::English;

    #[test]
    fn test_json_string_escapes() {
        assert_eq!(json_string("a\"b\\c\n"), r#""a\"b\\c\n""#);
        assert_eq!(json_string("\u{1}"), r#""\u0001""#);
    }

    #[test]
    fn test_csv_escape() {
        assert_eq!(csv_escape("plain"), "plain");
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_box_table_aligns_by_display_width() {
        let headers = vec!["Field".to_string(), "Value".to_string()];
        let rows = vec![
            vec!["SunAlt".to_string(), "12.5°".to_string()],
            vec!["ObsDate".to_string(), "2024-06-21".to_string()],
        ];
        let mut out = Vec::new();
        write_box_table(&mut out, &headers, &rows).unwrap();
        let text = String::from_utf8(out).unwrap();
        let widths: Vec<usize> = text.lines().map(|line| line.width()).collect();
        assert_eq!(widths.len(), 6);
        assert!(widths.iter().all(|w| *w == widths[0]), "{}", text);
        assert!(text.starts_with('┌'));
    }

    #[test]
    fn test_json_value_kinds() {
        let lookup = English;
        assert_eq!(json_value(&lookup, "ObsIsDST", &FieldValue::Bool(true)), "true");
        assert_eq!(json_value(&lookup, "ObsDayofyear", &FieldValue::Integer(12)), "12");
        assert_eq!(
            json_value(&lookup, "SunRise", &FieldValue::Text("---".to_string())),
            "\"---\""
        );
    }
}
