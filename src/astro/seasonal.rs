//! Seasonal (temporal) hours: daylight and night split into equal parts.

use super::calendar::mod_positive;
use super::riseset::{Absence, EventTime};

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Daytime phase names indexed by seasonal hour for the twelve-part convention.
/// The first twelve entries are day hours 1..12, the rest night hours -1..-12.
pub const DAYTIME_NAMES: [&str; 24] = [
    "early_morning",
    "early_morning",
    "morning",
    "morning",
    "forenoon",
    "noon",
    "noon",
    "afternoon",
    "afternoon",
    "late_afternoon",
    "evening",
    "evening",
    "dusk",
    "early_night",
    "early_night",
    "night",
    "night",
    "midnight",
    "midnight",
    "night",
    "night",
    "late_night",
    "late_night",
    "dawn",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Regime {
    Normal,
    PolarDay,
    PolarNight,
}

/// Seasonal-hour state of one local day at one local time.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonalHours {
    /// 1..=day_parts during daylight, -1..=-night_parts at night. Never zero.
    pub index: i32,
    pub day_parts: u32,
    pub night_parts: u32,
    /// Length in hours of one daytime part (0 during polar night).
    pub day_length: f64,
    /// Length in hours of one night part (0 during polar day).
    pub night_length: f64,
    /// Local start time of each daytime part.
    pub day_boundaries: Vec<f64>,
    /// Local start time of each night part.
    pub night_boundaries: Vec<f64>,
    /// Local time of the next part boundary after `now`.
    pub next_boundary: f64,
}

impl SeasonalHours {
    /// Signed index of every boundary with its local time, ordered by index.
    pub fn boundaries(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        let day = self
            .day_boundaries
            .iter()
            .enumerate()
            .map(|(k, t)| (k as i32 + 1, *t));
        let night = self
            .night_boundaries
            .iter()
            .enumerate()
            .map(|(k, t)| (-(k as i32 + 1), *t));
        day.chain(night)
    }
}

fn regime(rise: EventTime, set: EventTime) -> Regime {
    match (rise, set) {
        (EventTime::Absent(Absence::AlwaysAbove), _) | (_, EventTime::Absent(Absence::AlwaysAbove)) => {
            Regime::PolarDay
        }
        (EventTime::Absent(Absence::AlwaysBelow), _) | (_, EventTime::Absent(Absence::AlwaysBelow)) => {
            Regime::PolarNight
        }
        _ => Regime::Normal,
    }
}

fn part_index(elapsed: f64, length: f64, parts: u32) -> i32 {
    let index = (elapsed / length).floor() as i64 + 1;
    index.clamp(1, parts as i64) as i32
}

/// Seasonal-hour index, part lengths and boundaries at local time `now`.
///
/// A missing sunrise counts as local midnight, a missing sunset as the end of
/// the day. When the Sun neither rises nor sets the whole day is one set of
/// parts, positive in polar day and negative in polar night. When sunset
/// comes before sunrise, the daylight ending at sunset began at
/// `previous_rise`, the previous day's local sunrise, or at today's sunrise a
/// day earlier when that is unknown.
pub fn seasonal_hours(
    rise: EventTime,
    set: EventTime,
    previous_rise: Option<f64>,
    now: f64,
    day_parts: u32,
    night_parts: u32,
) -> SeasonalHours {
    let day_parts = day_parts.max(1);
    let night_parts = night_parts.max(1);
    let now = mod_positive(now, 24.0);

    let mut result = match regime(rise, set) {
        Regime::PolarDay => {
            let length = 24.0 / day_parts as f64;
            SeasonalHours {
                index: part_index(now, length, day_parts),
                day_parts,
                night_parts,
                day_length: length,
                night_length: 0.0,
                day_boundaries: (0..day_parts).map(|k| k as f64 * length).collect(),
                night_boundaries: Vec::new(),
                next_boundary: 0.0,
            }
        }
        Regime::PolarNight => {
            let length = 24.0 / night_parts as f64;
            SeasonalHours {
                index: -part_index(now, length, night_parts),
                day_parts,
                night_parts,
                day_length: 0.0,
                night_length: length,
                day_boundaries: Vec::new(),
                night_boundaries: (0..night_parts).map(|k| k as f64 * length).collect(),
                next_boundary: 0.0,
            }
        }
        Regime::Normal => {
            let rise = rise.hours().unwrap_or(0.0);
            let set = set.hours().unwrap_or(24.0);
            let (rise, daylight) = if set >= rise {
                (rise, set - rise)
            } else {
                let anchor = previous_rise.unwrap_or(rise);
                (anchor, (set + 24.0 - anchor).min(24.0))
            };
            let night = 24.0 - daylight;
            let day_length = daylight / day_parts as f64;
            let night_length = night / night_parts as f64;

            let elapsed = mod_positive(now - rise, 24.0);
            let index = if elapsed < daylight || night <= 0.0 {
                part_index(elapsed, day_length, day_parts)
            } else {
                -part_index(elapsed - daylight, night_length, night_parts)
            };

            SeasonalHours {
                index,
                day_parts,
                night_parts,
                day_length,
                night_length,
                day_boundaries: (0..day_parts)
                    .map(|k| mod_positive(rise + k as f64 * day_length, 24.0))
                    .collect(),
                night_boundaries: if night > 0.0 {
                    (0..night_parts)
                        .map(|k| mod_positive(set + k as f64 * night_length, 24.0))
                        .collect()
                } else {
                    Vec::new()
                },
                next_boundary: 0.0,
            }
        }
    };

    result.next_boundary = result
        .boundaries()
        .map(|(_, t)| mod_positive(t - now, 24.0))
        .filter(|ahead| *ahead > 1e-9)
        .fold(None, |best: Option<f64>, ahead| {
            Some(best.map_or(ahead, |b| b.min(ahead)))
        })
        .map_or(now, |ahead| mod_positive(now + ahead, 24.0));
    result
}

/// Canonical daytime key for a seasonal-hour index.
///
/// Named phases exist only for twelve day and twelve night parts. Roman mode
/// numbers the parts through the whole day instead, daylight first.
pub fn daytime(index: i32, day_parts: u32, night_parts: u32, roman: bool) -> Option<(usize, String)> {
    if index == 0 {
        return None;
    }
    let position = if index > 0 {
        index as usize - 1
    } else {
        day_parts as usize + (-index) as usize - 1
    };
    if roman {
        return Some((position, to_roman(position as u32 + 1)));
    }
    if day_parts == 12 && night_parts == 12 {
        DAYTIME_NAMES
            .get(position)
            .map(|name| (position, (*name).to_string()))
    } else {
        None
    }
}

pub fn to_roman(mut value: u32) -> String {
    const NUMERALS: [(u32, &str); 6] = [
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];
    let mut out = String::new();
    for (weight, symbol) in NUMERALS {
        while value >= weight {
            out.push_str(symbol);
            value -= weight;
        }
    }
    out
}

/// Minutes above and below the horizon on one local day, summing to 24 h.
///
/// Missing rise counts as midnight and missing set as the end of the day;
/// circumpolar days give 24:00 or 0:00 of visibility.
pub fn visible_minutes(rise: EventTime, set: EventTime) -> (i64, i64) {
    let visible = match regime(rise, set) {
        Regime::PolarDay => MINUTES_PER_DAY,
        Regime::PolarNight => 0,
        Regime::Normal => {
            let rise = (rise.hours().unwrap_or(0.0) * 60.0).round() as i64;
            let set = (set.hours().unwrap_or(24.0) * 60.0).round() as i64;
            if set >= rise {
                (set - rise).min(MINUTES_PER_DAY)
            } else {
                set + MINUTES_PER_DAY - rise
            }
        }
    };
    (visible, MINUTES_PER_DAY - visible)
}
