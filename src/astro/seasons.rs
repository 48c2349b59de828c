//! Astronomical, meteorological and phenological season classification.

use super::calendar::{DEG, is_leap_year};
use crate::data::MonthDay;

/// Mean Earth radius used for great-circle distances, km.
pub const MEAN_EARTH_RADIUS: f64 = 6371.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn key(self) -> &'static str {
        match self {
            Season::Winter => "winter",
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Fall => "fall",
        }
    }
}

/// Season from fixed day-of-year ranges; winter wraps across the new year.
pub fn astronomical_season(day_of_year: u32) -> Season {
    match day_of_year {
        80..=172 => Season::Spring,
        173..=265 => Season::Summer,
        266..=353 => Season::Fall,
        _ => Season::Winter,
    }
}

/// Season from calendar months; winter is December to February.
pub fn meteorological_season(month: u32) -> Season {
    match month {
        3..=5 => Season::Spring,
        6..=8 => Season::Summer,
        9..=11 => Season::Fall,
        _ => Season::Winter,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhenoSeason {
    Winter,
    EarlySpring,
    FirstSpring,
    FullSpring,
    EarlySummer,
    MidSummer,
    LateSummer,
    EarlyFall,
    FullFall,
    LateFall,
}

impl PhenoSeason {
    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn key(self) -> &'static str {
        match self {
            PhenoSeason::Winter => "winter",
            PhenoSeason::EarlySpring => "earlyspring",
            PhenoSeason::FirstSpring => "firstspring",
            PhenoSeason::FullSpring => "fullspring",
            PhenoSeason::EarlySummer => "earlysummer",
            PhenoSeason::MidSummer => "midsummer",
            PhenoSeason::LateSummer => "latesummer",
            PhenoSeason::EarlyFall => "earlyfall",
            PhenoSeason::FullFall => "fullfall",
            PhenoSeason::LateFall => "latefall",
        }
    }
}

/// Where the spring wave starts: south-western Portugal.
pub const EARLY_SPRING_ORIGIN: (f64, f64) = (37.136633, -8.817837);
/// Where the fall wave starts: southern Finland.
pub const EARLY_FALL_ORIGIN: (f64, f64) = (60.161880, 24.952656);
/// Propagation speed of both waves, km per day.
pub const WAVE_SPEED: f64 = 44.0;

const LATITUDE_WINDOW: (f64, f64) = (35.0, 71.0);
const LONGITUDE_WINDOW: (f64, f64) = (-11.0, 25.0);

/// Spring-wave stages after early spring, each reached once the front has
/// travelled a further fraction of the observer's distance to the origin.
const SPRING_STAGES: [(f64, PhenoSeason); 4] = [
    (0.1, PhenoSeason::FirstSpring),
    (0.2, PhenoSeason::FullSpring),
    (0.3, PhenoSeason::EarlySummer),
    (0.4, PhenoSeason::MidSummer),
];

const FALL_STAGES: [(f64, PhenoSeason); 2] = [
    (0.5, PhenoSeason::FullFall),
    (1.0, PhenoSeason::LateFall),
];

/// Stage reached by a wave front that has travelled `front` km. The first
/// stage starts on arrival at the observer, the intermediate ones at
/// `(1 + fraction) * to_origin` and `last` once the front reaches the
/// opposite origin. Thresholds never decrease, so a stage squeezed out by a
/// nearby opposite origin is skipped rather than reordered.
fn wave_stage(
    front: f64,
    to_origin: f64,
    between_origins: f64,
    first: PhenoSeason,
    stages: &[(f64, PhenoSeason)],
    last: PhenoSeason,
) -> PhenoSeason {
    let mut stage = first;
    let mut threshold = to_origin;
    let thresholds = stages
        .iter()
        .map(|(fraction, stage)| ((1.0 + fraction) * to_origin, *stage))
        .chain(std::iter::once((between_origins, last)));
    for (distance, next) in thresholds {
        threshold = threshold.max(distance);
        if front < threshold {
            break;
        }
        stage = next;
    }
    stage
}

/// Great-circle distance in km between two points given in degrees.
pub fn geodesic_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (lat1, lon1, lat2, lon2) = (lat1 * DEG, lon1 * DEG, lat2 * DEG, lon2 * DEG);
    let cos_angle = lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * (lon2 - lon1).cos();
    MEAN_EARTH_RADIUS * cos_angle.clamp(-1.0, 1.0).acos()
}

pub fn in_phenological_window(lat: f64, lon: f64) -> bool {
    (LATITUDE_WINDOW.0..=LATITUDE_WINDOW.1).contains(&lat)
        && (LONGITUDE_WINDOW.0..=LONGITUDE_WINDOW.1).contains(&lon)
}

/// Phenological stage for an observer (degrees) on a day of the year.
/// `None` outside the Central-European window the wave model covers.
pub fn phenological_season(
    lat: f64,
    lon: f64,
    year: i32,
    day_of_year: u32,
    early_spring: MonthDay,
    early_fall: MonthDay,
) -> Option<PhenoSeason> {
    if !in_phenological_window(lat, lon) {
        return None;
    }

    let between_origins = geodesic_distance(
        EARLY_SPRING_ORIGIN.0,
        EARLY_SPRING_ORIGIN.1,
        EARLY_FALL_ORIGIN.0,
        EARLY_FALL_ORIGIN.1,
    );
    let to_spring = geodesic_distance(lat, lon, EARLY_SPRING_ORIGIN.0, EARLY_SPRING_ORIGIN.1);
    let to_fall = geodesic_distance(lat, lon, EARLY_FALL_ORIGIN.0, EARLY_FALL_ORIGIN.1);

    let mut spring_start = early_spring.day_of_year(year) as f64;
    if is_leap_year(year) {
        spring_start -= 1.0;
    }
    let fall_start = early_fall.day_of_year(year) as f64;
    let day = day_of_year as f64;

    let fall_front = WAVE_SPEED * (day - fall_start);
    if fall_front >= to_fall {
        return Some(wave_stage(
            fall_front,
            to_fall,
            between_origins,
            PhenoSeason::EarlyFall,
            &FALL_STAGES,
            PhenoSeason::Winter,
        ));
    }

    let spring_front = WAVE_SPEED * (day - spring_start);
    if spring_front < to_spring {
        return Some(PhenoSeason::Winter);
    }
    Some(wave_stage(
        spring_front,
        to_spring,
        between_origins,
        PhenoSeason::EarlySpring,
        &SPRING_STAGES,
        PhenoSeason::LateSummer,
    ))
}
