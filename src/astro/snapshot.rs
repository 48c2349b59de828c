//! Everything computed for one observer on one local day.

use super::calendar::DEG;
use super::moon::{MoonCoord, moon_position};
use super::refraction::refraction;
use super::riseset::{EventTime, RiseSetTimes, SunRiseSet, moon_rise, sun_rise};
use super::schedule::{Event, Schedule};
use super::seasonal::{SeasonalHours, daytime, seasonal_hours, visible_minutes};
use super::seasons::{
    PhenoSeason, Season, astronomical_season, meteorological_season, phenological_season,
};
use super::sun::{SunCoord, sun_position};
use super::transform::{Horizontal, ObserverCart, equ_polar_to_cart, observer_to_equ_cart};
use crate::data::{Moment, Observer};
use chrono::Datelike;

/// Categorical attributes tracked across neighbouring days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Attribute {
    Season,
    MeteoSeason,
    PhenoSeason,
    SunSign,
    MoonSign,
    MoonPhase,
    Dst,
}

impl Attribute {
    pub const ALL: [Attribute; 7] = [
        Attribute::Season,
        Attribute::MeteoSeason,
        Attribute::PhenoSeason,
        Attribute::SunSign,
        Attribute::MoonSign,
        Attribute::MoonPhase,
        Attribute::Dst,
    ];

    /// Canonical field carrying the attribute's value.
    pub fn field(self) -> &'static str {
        match self {
            Attribute::Season => "ObsSeason",
            Attribute::MeteoSeason => "ObsMeteoSeason",
            Attribute::PhenoSeason => "ObsPhenoSeason",
            Attribute::SunSign => "SunSign",
            Attribute::MoonSign => "MoonSign",
            Attribute::MoonPhase => "MoonPhaseS",
            Attribute::Dst => "ObsIsDST",
        }
    }

    pub fn change_field(self) -> &'static str {
        match self {
            Attribute::Season => "ObsSeasonChange",
            Attribute::MeteoSeason => "ObsMeteoSeasonChange",
            Attribute::PhenoSeason => "ObsPhenoSeasonChange",
            Attribute::SunSign => "SunSignChange",
            Attribute::MoonSign => "MoonSignChange",
            Attribute::MoonPhase => "MoonPhaseSChange",
            Attribute::Dst => "ObsIsDSTChange",
        }
    }

    /// Whether the value can only change at local midnight.
    pub fn is_day_granular(self) -> bool {
        matches!(
            self,
            Attribute::Season | Attribute::MeteoSeason | Attribute::PhenoSeason
        )
    }

    fn slot(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeFlag {
    ChangesTomorrow,
    ChangedToday,
}

impl ChangeFlag {
    pub fn key(self) -> &'static str {
        match self {
            ChangeFlag::ChangesTomorrow => "changes_tomorrow",
            ChangeFlag::ChangedToday => "changed_today",
        }
    }
}

/// At most one flag per attribute; the first one set wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChangeFlags([Option<ChangeFlag>; 7]);

impl ChangeFlags {
    pub fn get(&self, attribute: Attribute) -> Option<ChangeFlag> {
        self.0[attribute.slot()]
    }

    /// Returns false when the attribute already carries a flag.
    pub fn mark(&mut self, attribute: Attribute, flag: ChangeFlag) -> bool {
        let slot = &mut self.0[attribute.slot()];
        if slot.is_some() {
            return false;
        }
        *slot = Some(flag);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = (Attribute, ChangeFlag)> + '_ {
        Attribute::ALL
            .into_iter()
            .filter_map(|attribute| self.get(attribute).map(|flag| (attribute, flag)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SunSnapshot {
    pub coord: SunCoord,
    /// Horizontal place with refraction applied.
    pub apparent: Horizontal,
    /// Distance from the observer, km.
    pub distance_observer: f64,
    pub events: SunRiseSet,
    pub visible_minutes: i64,
    pub invisible_minutes: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MoonSnapshot {
    pub coord: MoonCoord,
    pub apparent: Horizontal,
    pub events: RiseSetTimes,
    pub visible_minutes: i64,
    pub invisible_minutes: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DaySnapshot {
    /// Days from the requested day, -2..=2.
    pub offset: i32,
    pub observer: Observer,
    pub moment: Moment,
    /// Local mean sidereal time, hours.
    pub lmst: f64,
    pub sun: SunSnapshot,
    pub moon: MoonSnapshot,
    pub seasonal: SeasonalHours,
    /// Position of the seasonal hour in the day and its daytime key.
    pub daytime: Option<(usize, String)>,
    pub season: Season,
    pub meteo_season: Season,
    pub pheno_season: Option<PhenoSeason>,
    pub changes: ChangeFlags,
    pub schedule: Schedule,
}

fn apparent(horizontal: Option<Horizontal>) -> Horizontal {
    let Horizontal { az, alt } = horizontal.unwrap_or(Horizontal { az: 0.0, alt: 0.0 });
    Horizontal {
        az,
        alt: alt + refraction(alt) * DEG,
    }
}

fn observer_cart(observer: &Observer, moment: &Moment) -> ObserverCart {
    observer_to_equ_cart(
        observer.longitude * DEG,
        observer.latitude * DEG,
        observer.altitude / 1000.0,
        moment.gmst,
    )
}

impl DaySnapshot {
    /// Compute the snapshot for `observer` at `moment`; `offset` only labels it.
    pub fn compute(observer: &Observer, moment: &Moment, offset: i32) -> Self {
        let lon = observer.longitude * DEG;
        let lat = observer.latitude * DEG;
        let lmst = moment.lmst(lon);
        let lmst_rad = lmst * 15.0 * DEG;
        let cart = observer_cart(observer, moment);

        let sun = sun_position(moment.tdt, Some((lat, lmst_rad)));
        let sun_cart = equ_polar_to_cart(sun.ra, sun.dec, sun.distance);
        let moon = moon_position(sun.lon, sun.anomaly_mean, moment.tdt, Some((&cart, lmst_rad)));

        let sun_events = sun_rise(
            moment.jd0,
            moment.delta_t,
            lon,
            lat,
            moment.offset_hours,
            observer.horizon_morning,
            observer.horizon_evening,
            false,
        );
        let moon_events = moon_rise(
            moment.jd0,
            moment.delta_t,
            lon,
            lat,
            cart.radius,
            moment.offset_hours,
            false,
        );

        let (sun_visible, sun_invisible) = visible_minutes(sun_events.rise, sun_events.set);
        let (moon_visible, moon_invisible) = visible_minutes(moon_events.rise, moon_events.set);

        let previous_rise = match (sun_events.rise, sun_events.set) {
            (EventTime::At(rise), EventTime::At(set)) if set < rise => {
                let yesterday = moment.shifted_days(-1);
                sun_rise(
                    yesterday.jd0,
                    yesterday.delta_t,
                    lon,
                    lat,
                    yesterday.offset_hours,
                    observer.horizon_morning,
                    observer.horizon_evening,
                    false,
                )
                .rise
                .hours()
            }
            _ => None,
        };
        let seasonal = seasonal_hours(
            sun_events.rise,
            sun_events.set,
            previous_rise,
            moment.hour(),
            observer.day_parts,
            observer.night_parts,
        );
        let daytime = daytime(
            seasonal.index,
            observer.day_parts,
            observer.night_parts,
            observer.roman,
        );

        let date = moment.date();
        let pheno_season = phenological_season(
            observer.latitude,
            observer.longitude,
            date.year(),
            moment.day_of_year(),
            observer.early_spring,
            observer.early_fall,
        );

        let mut snapshot = DaySnapshot {
            offset,
            observer: observer.clone(),
            moment: moment.clone(),
            lmst,
            sun: SunSnapshot {
                apparent: apparent(sun.horizontal),
                distance_observer: sun_cart.distance_to(&cart.cart),
                coord: sun,
                events: sun_events,
                visible_minutes: sun_visible,
                invisible_minutes: sun_invisible,
            },
            moon: MoonSnapshot {
                apparent: apparent(moon.horizontal),
                coord: moon,
                events: moon_events,
                visible_minutes: moon_visible,
                invisible_minutes: moon_invisible,
            },
            seasonal,
            daytime,
            season: astronomical_season(moment.day_of_year()),
            meteo_season: meteorological_season(date.month()),
            pheno_season,
            changes: ChangeFlags::default(),
            schedule: Schedule::new(),
        };
        snapshot.schedule = snapshot.own_events();
        snapshot
    }

    /// Canonical value of a categorical attribute; `None` when it does not
    /// apply (phenological season outside its window).
    pub fn attribute(&self, attribute: Attribute) -> Option<String> {
        match attribute {
            Attribute::Season => Some(self.season.key().to_string()),
            Attribute::MeteoSeason => Some(self.meteo_season.key().to_string()),
            Attribute::PhenoSeason => self.pheno_season.map(|p| p.key().to_string()),
            Attribute::SunSign => Some(self.sun.coord.sign.key().to_string()),
            Attribute::MoonSign => Some(self.moon.coord.sign.key().to_string()),
            Attribute::MoonPhase => Some(self.moon.coord.phase_bucket.key().to_string()),
            Attribute::Dst => Some(dst_key(self.moment.is_dst).to_string()),
        }
    }

    fn own_events(&self) -> Schedule {
        let mut schedule = Schedule::new();
        let sun = &self.sun.events;
        let timed = [
            (sun.astro.morning, "AstroTwilightMorning"),
            (sun.nautic.morning, "NauticTwilightMorning"),
            (sun.civil.morning, "CivilTwilightMorning"),
            (sun.custom.morning, "CustomTwilightMorning"),
            (sun.rise, "SunRise"),
            (sun.transit, "SunTransit"),
            (sun.set, "SunSet"),
            (sun.custom.evening, "CustomTwilightEvening"),
            (sun.civil.evening, "CivilTwilightEvening"),
            (sun.nautic.evening, "NauticTwilightEvening"),
            (sun.astro.evening, "AstroTwilightEvening"),
            (self.moon.events.rise, "MoonRise"),
            (self.moon.events.transit, "MoonTransit"),
            (self.moon.events.set, "MoonSet"),
        ];
        for (time, field) in timed {
            schedule.insert_at(time, Event::new(field));
        }
        for (index, hour) in self.seasonal.boundaries() {
            schedule.insert(hour, Event::with_value("DaySeasonalHr", index.to_string()));
        }
        schedule
    }
}

pub fn dst_key(is_dst: bool) -> &'static str {
    if is_dst { "dst" } else { "standard" }
}

/// Categorical value of an intraday attribute at an arbitrary moment,
/// without the rest of the snapshot.
pub fn attribute_at(attribute: Attribute, moment: &Moment) -> Option<String> {
    let sun = sun_position(moment.tdt, None);
    let moon = || moon_position(sun.lon, sun.anomaly_mean, moment.tdt, None);
    match attribute {
        Attribute::SunSign => Some(sun.sign.key().to_string()),
        Attribute::MoonSign => Some(moon().sign.key().to_string()),
        Attribute::MoonPhase => Some(moon().phase_bucket.key().to_string()),
        Attribute::Dst => Some(dst_key(moment.is_dst).to_string()),
        Attribute::Season => Some(astronomical_season(moment.day_of_year()).key().to_string()),
        Attribute::MeteoSeason => Some(meteorological_season(moment.date().month()).key().to_string()),
        Attribute::PhenoSeason => None,
    }
}
