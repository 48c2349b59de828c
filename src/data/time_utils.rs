use crate::astro::calendar::{calc_jd, gmst, gmst_to_lmst};
use chrono::{
    DateTime, Datelike, Days, Duration, FixedOffset, Local, NaiveDate, NaiveDateTime, Offset,
    TimeZone, Timelike, Utc,
};
use chrono_tz::{OffsetComponents, Tz};
use iana_time_zone::get_timezone;
use std::env;
use std::sync::OnceLock;

static SYSTEM_TIMEZONE: OnceLock<Zone> = OnceLock::new();
const SYSTEM_TZ_OVERRIDE_ENV: &str = "ASTRODAY_SYSTEM_TIMEZONE";

fn timezone_gap_error(dt_str: &str) -> String {
    format!(
        "Datetime does not exist in timezone (likely DST gap): {}",
        dt_str
    )
}

enum ParsedDateTime {
    Now,
    Fixed(DateTime<FixedOffset>),
    Naive(NaiveDateTime),
    DateOnly(NaiveDate),
    UnixTimestamp(i64),
}

fn parse_datetime_input(dt_str: &str) -> Result<ParsedDateTime, String> {
    if dt_str == "now" {
        return Ok(ParsedDateTime::Now);
    }

    if let Ok(timestamp) = dt_str.parse::<i64>()
        && timestamp.abs() >= 10000
    {
        return Ok(ParsedDateTime::UnixTimestamp(timestamp));
    }

    if dt_str.contains('T') {
        if let Ok(fixed_dt) = DateTime::parse_from_rfc3339(dt_str) {
            return Ok(ParsedDateTime::Fixed(fixed_dt));
        }

        let naive_dt = NaiveDateTime::parse_from_str(dt_str, "%Y-%m-%dT%H:%M:%S")
            .or_else(|_| NaiveDateTime::parse_from_str(dt_str, "%Y-%m-%dT%H:%M"))
            .map_err(|e| format!("Failed to parse naive datetime: {}", e))?;
        return Ok(ParsedDateTime::Naive(naive_dt));
    }

    if dt_str.contains(' ') && dt_str.contains(':') {
        let naive_dt = NaiveDateTime::parse_from_str(dt_str, "%Y-%m-%d %H:%M:%S")
            .or_else(|_| NaiveDateTime::parse_from_str(dt_str, "%Y-%m-%d %H:%M"))
            .map_err(|e| format!("Failed to parse naive datetime: {}", e))?;
        return Ok(ParsedDateTime::Naive(naive_dt));
    }

    let naive_date = NaiveDate::parse_from_str(dt_str, "%Y-%m-%d")
        .map_err(|e| format!("Failed to parse date: {}", e))?;
    Ok(ParsedDateTime::DateOnly(naive_date))
}

/// Time zone of the observer's local calendar.
#[derive(Debug, Clone, PartialEq)]
pub enum Zone {
    Fixed(FixedOffset),
    Named(Tz),
}

impl Zone {
    pub fn to_datetime_from_utc(&self, dt: &NaiveDateTime) -> DateTime<FixedOffset> {
        match self {
            Zone::Fixed(offset) => offset.from_utc_datetime(dt),
            Zone::Named(tz) => Utc.from_utc_datetime(dt).with_timezone(tz).fixed_offset(),
        }
    }

    /// Local time to an instant. Ambiguous times take the earlier instant;
    /// `None` inside a DST gap.
    pub fn to_datetime_from_local(&self, dt: &NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        match self {
            Zone::Fixed(offset) => offset.from_local_datetime(dt).earliest(),
            Zone::Named(tz) => tz.from_local_datetime(dt).earliest().map(|d| d.fixed_offset()),
        }
    }

    /// Like [`Zone::to_datetime_from_local`], but a time inside a DST gap is
    /// moved forward by the length of the gap.
    pub fn resolve_local(&self, dt: &NaiveDateTime) -> DateTime<FixedOffset> {
        self.to_datetime_from_local(dt).unwrap_or_else(|| {
            let before = self
                .to_datetime_from_utc(&(*dt - Duration::hours(24)))
                .offset()
                .local_minus_utc();
            self.to_datetime_from_utc(&(*dt - Duration::seconds(before as i64)))
        })
    }

    /// Whether daylight saving time is in force at the UTC instant `dt`.
    /// Fixed offsets never observe DST.
    pub fn is_dst(&self, dt: &NaiveDateTime) -> bool {
        match self {
            Zone::Fixed(_) => false,
            Zone::Named(tz) => !tz.offset_from_utc_datetime(dt).dst_offset().is_zero(),
        }
    }
}

pub fn parse_datetime_string(dt_str: &str, zone: &Zone) -> Result<DateTime<FixedOffset>, String> {
    match parse_datetime_input(dt_str)? {
        ParsedDateTime::Now => Ok(zone.to_datetime_from_utc(&Utc::now().naive_utc())),
        ParsedDateTime::Fixed(dt) => Ok(zone.to_datetime_from_utc(&dt.naive_utc())),
        ParsedDateTime::Naive(naive_dt) => zone
            .to_datetime_from_local(&naive_dt)
            .ok_or_else(|| timezone_gap_error(dt_str)),
        ParsedDateTime::DateOnly(date) => zone
            .to_datetime_from_local(&date.and_time(chrono::NaiveTime::MIN))
            .ok_or_else(|| timezone_gap_error(dt_str)),
        ParsedDateTime::UnixTimestamp(ts) => {
            let utc_dt = DateTime::<Utc>::from_timestamp(ts, 0)
                .ok_or_else(|| format!("Invalid unix timestamp: {}", ts))?;
            Ok(zone.to_datetime_from_utc(&utc_dt.naive_utc()))
        }
    }
}

pub fn parse_timezone_spec(spec: &str) -> Option<Zone> {
    if spec.is_empty() {
        return None;
    }
    parse_tz_offset(spec)
        .map(Zone::Fixed)
        .or_else(|| spec.parse::<Tz>().ok().map(Zone::Named))
}

fn detect_system_timezone() -> Zone {
    parse_timezone_env(env::var(SYSTEM_TZ_OVERRIDE_ENV).ok())
        .or_else(|| parse_timezone_env(get_timezone().ok()))
        .unwrap_or_else(|| Zone::Fixed(Local::now().offset().fix()))
}

/// Zone from an explicit override, then `TZ`, then the system setting.
pub fn get_zone(override_tz: Option<&str>) -> Result<Zone, String> {
    if let Some(spec) = override_tz.map(str::trim) {
        return parse_timezone_spec(spec).ok_or_else(|| format!("Unknown timezone: {}", spec));
    }
    Ok(parse_timezone_env(env::var("TZ").ok())
        .unwrap_or_else(|| SYSTEM_TIMEZONE.get_or_init(detect_system_timezone).clone()))
}

pub fn parse_tz_offset(tz: &str) -> Option<FixedOffset> {
    let (sign, rest) = match tz.as_bytes().first()? {
        b'+' => (1, &tz[1..]),
        b'-' => (-1, &tz[1..]),
        _ => return None,
    };

    let (hours, minutes) = if let Some((h, m)) = rest.split_once(':') {
        (h.parse::<i32>().ok()?, m.parse::<i32>().ok()?)
    } else {
        (rest.parse::<i32>().ok()?, 0)
    };

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

fn parse_timezone_env(value: Option<String>) -> Option<Zone> {
    value
        .as_deref()
        .map(str::trim)
        .and_then(parse_timezone_spec)
}

/// One instant seen on the observer's local calendar, with the derived
/// astronomical time scales.
#[derive(Debug, Clone, PartialEq)]
pub struct Moment {
    pub instant: DateTime<FixedOffset>,
    pub zone: Zone,
    /// UTC offset in hours, fractional for half-hour zones.
    pub offset_hours: f64,
    pub is_dst: bool,
    /// ΔT = TDT - UT in seconds.
    pub delta_t: f64,
    /// Julian date at 0h UT of the local calendar date.
    pub jd0: f64,
    /// Julian date of the instant (UT).
    pub jd: f64,
    pub tdt: f64,
    /// Greenwich mean sidereal time in hours.
    pub gmst: f64,
}

impl Moment {
    pub fn new(instant: DateTime<FixedOffset>, zone: Zone, delta_t: f64) -> Self {
        let instant = zone.to_datetime_from_utc(&instant.naive_utc());
        let utc = instant.naive_utc();
        let local = instant.naive_local();
        let jd0 = calc_jd(local.day(), local.month(), local.year());
        let ut_hours = utc.num_seconds_from_midnight() as f64 / 3600.0;
        let jd = calc_jd(utc.day(), utc.month(), utc.year()) + ut_hours / 24.0;
        Self {
            offset_hours: instant.offset().local_minus_utc() as f64 / 3600.0,
            is_dst: zone.is_dst(&utc),
            delta_t,
            jd0,
            jd,
            tdt: jd + delta_t / 86400.0,
            gmst: gmst(jd),
            instant,
            zone,
        }
    }

    pub fn from_local(local: NaiveDateTime, zone: Zone, delta_t: f64) -> Self {
        let instant = zone.resolve_local(&local);
        Self::new(instant, zone, delta_t)
    }

    pub fn at_utc(utc: DateTime<Utc>, zone: Zone, delta_t: f64) -> Self {
        Self::new(utc.fixed_offset(), zone, delta_t)
    }

    pub fn local(&self) -> NaiveDateTime {
        self.instant.naive_local()
    }

    pub fn date(&self) -> NaiveDate {
        self.instant.date_naive()
    }

    /// Local clock time in fractional hours.
    pub fn hour(&self) -> f64 {
        self.local().num_seconds_from_midnight() as f64 / 3600.0
    }

    pub fn day_of_year(&self) -> u32 {
        self.instant.ordinal()
    }

    /// Local mean sidereal time in hours for a longitude in radians.
    pub fn lmst(&self, lon: f64) -> f64 {
        gmst_to_lmst(self.gmst, lon)
    }

    /// The same local clock time `days` calendar days away, with offset and
    /// DST re-resolved for that day.
    pub fn shifted_days(&self, days: i64) -> Self {
        let local = self.local();
        let shifted = if days >= 0 {
            local.checked_add_days(Days::new(days as u64))
        } else {
            local.checked_sub_days(Days::new(days.unsigned_abs()))
        };
        match shifted {
            Some(local) => Self::from_local(local, self.zone.clone(), self.delta_t),
            None => self.clone(),
        }
    }
}
