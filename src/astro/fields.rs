//! Flat field map of a snapshot under stable canonical names.

use super::calendar::{RAD, mod_positive};
use super::riseset::EventTime;
use super::snapshot::DaySnapshot;
use std::fmt;

/// Placeholder for events that do not occur.
pub const ABSENT: &str = "---";

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Number { value: f64, decimals: usize },
    Integer(i64),
    Bool(bool),
    /// Formatted date, time or duration.
    Text(String),
    /// Canonical category key, resolvable through a label lookup.
    Category(String),
}

impl FieldValue {
    fn number(value: f64, decimals: usize) -> Self {
        FieldValue::Number { value, decimals }
    }

    fn category(key: &str) -> Self {
        FieldValue::Category(key.to_string())
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            FieldValue::Number { .. } | FieldValue::Integer(_) | FieldValue::Bool(_)
        )
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number { value, decimals } => write!(f, "{:.*}", decimals, value),
            FieldValue::Integer(value) => write!(f, "{}", value),
            FieldValue::Bool(value) => write!(f, "{}", if *value { 1 } else { 0 }),
            FieldValue::Text(text) | FieldValue::Category(text) => f.write_str(text),
        }
    }
}

/// `HH:MM` of a local time of day, rounded to the minute.
pub fn format_hhmm(hours: f64) -> String {
    let minutes = (mod_positive(hours, 24.0) * 60.0).round() as i64 % (24 * 60);
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// `HH:MM:SS` of a local time of day, rounded to the second.
pub fn format_hhmmss(hours: f64) -> String {
    let seconds = (mod_positive(hours, 24.0) * 3600.0).round() as i64 % 86_400;
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        seconds / 60 % 60,
        seconds % 60
    )
}

/// `HH:MM` of a duration in minutes; a full day prints as `24:00`.
pub fn format_duration(minutes: i64) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

pub fn format_event(time: EventTime) -> String {
    match time {
        EventTime::At(hours) => format_hhmm(hours),
        EventTime::Absent(_) => ABSENT.to_string(),
    }
}

pub type FieldMap = Vec<(&'static str, FieldValue)>;

fn angle(radians: f64) -> FieldValue {
    FieldValue::number(radians * RAD, 1)
}

fn km(value: f64) -> FieldValue {
    FieldValue::number(value.round(), 0)
}

fn event(time: EventTime) -> FieldValue {
    FieldValue::Text(format_event(time))
}

impl DaySnapshot {
    /// Ordered canonical fields of this snapshot.
    pub fn fields(&self) -> FieldMap {
        let observer = &self.observer;
        let moment = &self.moment;
        let sun = &self.sun;
        let moon = &self.moon;
        let mut fields: FieldMap = vec![
            ("ObsDate", FieldValue::Text(moment.date().format("%Y-%m-%d").to_string())),
            ("ObsTime", FieldValue::Text(moment.local().format("%H:%M:%S").to_string())),
            ("ObsTimezone", FieldValue::number(moment.offset_hours, 2)),
            ("ObsIsDST", FieldValue::Bool(moment.is_dst)),
            ("ObsLat", FieldValue::number(observer.latitude, 4)),
            ("ObsLon", FieldValue::number(observer.longitude, 4)),
            ("ObsAlt", FieldValue::number(observer.altitude, 0)),
            ("ObsJD", FieldValue::number(moment.jd, 5)),
            ("ObsGMST", FieldValue::Text(format_hhmmss(moment.gmst))),
            ("ObsLMST", FieldValue::Text(format_hhmmss(self.lmst))),
            ("ObsDayofyear", FieldValue::Integer(moment.day_of_year() as i64)),
            ("ObsHorMorning", FieldValue::number(observer.horizon_morning, 1)),
            ("ObsHorEvening", FieldValue::number(observer.horizon_evening, 1)),
            ("ObsSeason", FieldValue::category(self.season.key())),
            ("ObsSeasonN", FieldValue::Integer(self.season.index() as i64)),
            ("ObsMeteoSeason", FieldValue::category(self.meteo_season.key())),
            ("ObsMeteoSeasonN", FieldValue::Integer(self.meteo_season.index() as i64)),
        ];
        if let Some(pheno) = self.pheno_season {
            fields.push(("ObsPhenoSeason", FieldValue::category(pheno.key())));
            fields.push(("ObsPhenoSeasonN", FieldValue::Integer(pheno.index() as i64)));
        }

        fields.extend([
            ("SunLon", angle(sun.coord.lon)),
            ("SunLat", angle(sun.coord.lat)),
            ("SunRa", angle(sun.coord.ra)),
            ("SunDec", angle(sun.coord.dec)),
            ("SunAz", angle(sun.apparent.az)),
            ("SunAlt", angle(sun.apparent.alt)),
            ("SunDiameter", FieldValue::number(sun.coord.diameter * RAD * 60.0, 1)),
            ("SunDistance", km(sun.coord.distance)),
            ("SunDistanceObserver", km(sun.distance_observer)),
            ("SunSign", FieldValue::category(sun.coord.sign.key())),
            ("SunSignN", FieldValue::Integer(sun.coord.sign.index() as i64)),
            ("SunRise", event(sun.events.rise)),
            ("SunSet", event(sun.events.set)),
            ("SunTransit", event(sun.events.transit)),
            ("SunHrsVisible", FieldValue::Text(format_duration(sun.visible_minutes))),
            ("SunHrsInvisible", FieldValue::Text(format_duration(sun.invisible_minutes))),
            ("CivilTwilightMorning", event(sun.events.civil.morning)),
            ("CivilTwilightEvening", event(sun.events.civil.evening)),
            ("NauticTwilightMorning", event(sun.events.nautic.morning)),
            ("NauticTwilightEvening", event(sun.events.nautic.evening)),
            ("AstroTwilightMorning", event(sun.events.astro.morning)),
            ("AstroTwilightEvening", event(sun.events.astro.evening)),
            ("CustomTwilightMorning", event(sun.events.custom.morning)),
            ("CustomTwilightEvening", event(sun.events.custom.evening)),
            ("MoonLon", angle(moon.coord.lon)),
            ("MoonLat", angle(moon.coord.lat)),
            ("MoonRa", angle(moon.coord.ra)),
            ("MoonDec", angle(moon.coord.dec)),
            ("MoonAz", angle(moon.apparent.az)),
            ("MoonAlt", angle(moon.apparent.alt)),
            ("MoonDiameter", FieldValue::number(moon.coord.diameter * RAD * 60.0, 1)),
            ("MoonDistance", km(moon.coord.distance)),
            (
                "MoonDistanceObserver",
                km(moon.coord.distance_topocentric.unwrap_or(moon.coord.distance)),
            ),
            ("MoonSign", FieldValue::category(moon.coord.sign.key())),
            ("MoonSignN", FieldValue::Integer(moon.coord.sign.index() as i64)),
            ("MoonAge", angle(moon.coord.age)),
            ("MoonPhaseN", FieldValue::number(moon.coord.phase, 2)),
            ("MoonPhaseI", FieldValue::Integer(moon.coord.phase_bucket.index() as i64)),
            ("MoonPhaseS", FieldValue::category(moon.coord.phase_bucket.key())),
            ("MoonRise", event(moon.events.rise)),
            ("MoonSet", event(moon.events.set)),
            ("MoonTransit", event(moon.events.transit)),
            ("MoonHrsVisible", FieldValue::Text(format_duration(moon.visible_minutes))),
            ("MoonHrsInvisible", FieldValue::Text(format_duration(moon.invisible_minutes))),
            ("DaySeasonalHr", FieldValue::Integer(self.seasonal.index as i64)),
            (
                "DaySeasonalHrLenDay",
                FieldValue::Text(format_duration((self.seasonal.day_length * 60.0).round() as i64)),
            ),
            (
                "DaySeasonalHrLenNight",
                FieldValue::Text(format_duration(
                    (self.seasonal.night_length * 60.0).round() as i64,
                )),
            ),
            ("DaySeasonalHrsDay", FieldValue::Integer(self.seasonal.day_parts as i64)),
            ("DaySeasonalHrsNight", FieldValue::Integer(self.seasonal.night_parts as i64)),
            ("DaySeasonalHrNextT", FieldValue::Text(format_hhmm(self.seasonal.next_boundary))),
        ]);

        if let Some((position, key)) = &self.daytime {
            fields.push(("Daytime", FieldValue::Category(key.clone())));
            fields.push(("DaytimeN", FieldValue::Integer(*position as i64)));
        }

        for (attribute, flag) in self.changes.iter() {
            fields.push((attribute.change_field(), FieldValue::category(flag.key())));
        }
        fields
    }

    pub fn field(&self, name: &str) -> Option<FieldValue> {
        self.fields()
            .into_iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::astro::riseset::Absence;
    use crate::astro::snapshot::DaySnapshot;
    use crate::data::{Moment, Observer, Zone};
    use chrono::{FixedOffset, NaiveDate};
    use proptest::prelude::*;

    fn snapshot(lat: f64, lon: f64, y: i32, m: u32, d: u32) -> DaySnapshot {
        let zone = Zone::Fixed(FixedOffset::east_opt(7200).unwrap());
        let moment = Moment::from_local(
            NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(12, 0, 0).unwrap(),
            zone,
            65.0,
        );
        DaySnapshot::compute(&Observer::new(lat, lon), &moment, 0)
    }

    fn minutes(text: &str) -> i64 {
        let (h, m) = text.split_once(':').unwrap();
        h.parse::<i64>().unwrap() * 60 + m.parse::<i64>().unwrap()
    }

    #[test]
    fn test_time_formats() {
        assert_eq!(format_hhmm(6.5), "06:30");
        assert_eq!(format_hhmm(23.9999), "00:00");
        assert_eq!(format_hhmm(-0.25), "23:45");
        assert_eq!(format_hhmmss(18.697374558), "18:41:50");
        assert_eq!(format_duration(1440), "24:00");
        assert_eq!(format_duration(75), "01:15");
        assert_eq!(format_event(EventTime::Absent(Absence::AlwaysAbove)), ABSENT);
    }

    #[test]
    fn test_value_display() {
        assert_eq!(FieldValue::number(12.345, 1).to_string(), "12.3");
        assert_eq!(FieldValue::number(149_597_870.4, 0).to_string(), "149597870");
        assert_eq!(FieldValue::Bool(true).to_string(), "1");
        assert!(!FieldValue::category("fullmoon").is_numeric());
    }

    #[test]
    fn test_solstice_visible_hours_fill_the_day() {
        let snap = snapshot(50.0, 10.0, 2024, 6, 21);
        let visible = snap.field("SunHrsVisible").unwrap().to_string();
        let invisible = snap.field("SunHrsInvisible").unwrap().to_string();
        assert_eq!(minutes(&visible) + minutes(&invisible), 24 * 60);
        assert!(minutes(&visible) > 16 * 60);

        let rise = minutes(&snap.field("SunRise").unwrap().to_string());
        let set = minutes(&snap.field("SunSet").unwrap().to_string());
        let transit = minutes(&snap.field("SunTransit").unwrap().to_string());
        assert!(((transit - rise) - (set - transit)).abs() <= 5);
    }

    #[test]
    fn test_polar_day_fields() {
        let snap = snapshot(70.0, 20.0, 2024, 6, 21);
        assert_eq!(snap.field("SunRise"), Some(FieldValue::Text(ABSENT.to_string())));
        assert_eq!(snap.field("SunSet"), Some(FieldValue::Text(ABSENT.to_string())));
        assert_eq!(
            snap.field("SunHrsVisible"),
            Some(FieldValue::Text("24:00".to_string()))
        );
    }

    #[test]
    fn test_field_names_are_unique() {
        let snap = snapshot(50.0, 10.0, 2024, 3, 21);
        let fields = snap.fields();
        let mut names: Vec<_> = fields.iter().map(|(name, _)| *name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), fields.len());
        assert!(snap.field("Daytime").is_some());
        assert!(snap.field("ObsPhenoSeason").is_some());
    }

    #[test]
    fn test_pheno_fields_absent_outside_europe() {
        let snap = snapshot(40.7, -74.0, 2024, 3, 21);
        assert!(snap.field("ObsPhenoSeason").is_none());
        assert!(snap.field("ObsSeason").is_some());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_midsummer_above_arctic_circle(lat in 66.5f64..89.0, lon in -180.0f64..180.0) {
            let snap = snapshot(lat, lon, 2024, 6, 21);
            prop_assert_eq!(snap.field("SunRise"), Some(FieldValue::Text(ABSENT.to_string())));
            prop_assert_eq!(snap.field("SunSet"), Some(FieldValue::Text(ABSENT.to_string())));
            prop_assert_eq!(
                snap.field("SunHrsVisible"),
                Some(FieldValue::Text("24:00".to_string()))
            );
        }

        #[test]
        fn prop_phase_fraction_in_unit_range(day in 0i64..4000) {
            let snap = snapshot(45.0, 5.0, 2015, 1, 1);
            let moment = snap.moment.shifted_days(day);
            let other = DaySnapshot::compute(&snap.observer, &moment, 0);
            prop_assert!((0.0..=1.0).contains(&other.moon.coord.phase));
            prop_assert!(other.moon.coord.phase_bucket.index() < 8);
        }
    }
}
