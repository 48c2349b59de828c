//! Human-readable labels for canonical field names and category keys.

use std::borrow::Cow;

/// Resolves canonical names into display text for one language.
pub trait LabelLookup {
    /// ISO 639-1 code of the labels this lookup produces.
    fn language(&self) -> &str;

    /// Display name of a canonical field.
    fn field<'a>(&self, name: &'a str) -> Cow<'a, str>;

    /// Display text of a category key emitted for `field`.
    fn category<'a>(&self, field: &str, key: &'a str) -> Cow<'a, str>;
}

/// Returns canonical names unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Canonical;

impl LabelLookup for Canonical {
    fn language(&self) -> &str {
        "und"
    }

    fn field<'a>(&self, name: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(name)
    }

    fn category<'a>(&self, _field: &str, key: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(key)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct English;

const ENGLISH_FIELDS: &[(&str, &str)] = &[
    ("ObsDate", "Date"),
    ("ObsTime", "Time"),
    ("ObsTimezone", "UTC offset (h)"),
    ("ObsIsDST", "Daylight saving time"),
    ("ObsLat", "Latitude"),
    ("ObsLon", "Longitude"),
    ("ObsAlt", "Altitude (m)"),
    ("ObsJD", "Julian date"),
    ("ObsGMST", "Greenwich sidereal time"),
    ("ObsLMST", "Local sidereal time"),
    ("ObsDayofyear", "Day of year"),
    ("ObsHorMorning", "Morning horizon"),
    ("ObsHorEvening", "Evening horizon"),
    ("ObsSeason", "Season"),
    ("ObsSeasonN", "Season number"),
    ("ObsMeteoSeason", "Meteorological season"),
    ("ObsMeteoSeasonN", "Meteorological season number"),
    ("ObsPhenoSeason", "Phenological season"),
    ("ObsPhenoSeasonN", "Phenological season number"),
    ("SunLon", "Sun ecliptic longitude"),
    ("SunLat", "Sun ecliptic latitude"),
    ("SunRa", "Sun right ascension"),
    ("SunDec", "Sun declination"),
    ("SunAz", "Sun azimuth"),
    ("SunAlt", "Sun altitude"),
    ("SunDiameter", "Sun diameter (')"),
    ("SunDistance", "Sun distance (km)"),
    ("SunDistanceObserver", "Sun distance from observer (km)"),
    ("SunSign", "Sun sign"),
    ("SunSignN", "Sun sign number"),
    ("SunRise", "Sunrise"),
    ("SunSet", "Sunset"),
    ("SunTransit", "Solar noon"),
    ("SunHrsVisible", "Daylight"),
    ("SunHrsInvisible", "Night"),
    ("CivilTwilightMorning", "Civil dawn"),
    ("CivilTwilightEvening", "Civil dusk"),
    ("NauticTwilightMorning", "Nautical dawn"),
    ("NauticTwilightEvening", "Nautical dusk"),
    ("AstroTwilightMorning", "Astronomical dawn"),
    ("AstroTwilightEvening", "Astronomical dusk"),
    ("CustomTwilightMorning", "Morning horizon crossing"),
    ("CustomTwilightEvening", "Evening horizon crossing"),
    ("MoonLon", "Moon ecliptic longitude"),
    ("MoonLat", "Moon ecliptic latitude"),
    ("MoonRa", "Moon right ascension"),
    ("MoonDec", "Moon declination"),
    ("MoonAz", "Moon azimuth"),
    ("MoonAlt", "Moon altitude"),
    ("MoonDiameter", "Moon diameter (')"),
    ("MoonDistance", "Moon distance (km)"),
    ("MoonDistanceObserver", "Moon distance from observer (km)"),
    ("MoonSign", "Moon sign"),
    ("MoonSignN", "Moon sign number"),
    ("MoonAge", "Moon age"),
    ("MoonPhaseN", "Moon illumination"),
    ("MoonPhaseI", "Moon phase number"),
    ("MoonPhaseS", "Moon phase"),
    ("MoonRise", "Moonrise"),
    ("MoonSet", "Moonset"),
    ("MoonTransit", "Moon transit"),
    ("MoonHrsVisible", "Moon visible"),
    ("MoonHrsInvisible", "Moon not visible"),
    ("DaySeasonalHr", "Seasonal hour"),
    ("DaySeasonalHrLenDay", "Seasonal hour length (day)"),
    ("DaySeasonalHrLenNight", "Seasonal hour length (night)"),
    ("DaySeasonalHrsDay", "Seasonal hours per day"),
    ("DaySeasonalHrsNight", "Seasonal hours per night"),
    ("DaySeasonalHrNextT", "Next seasonal hour"),
    ("Daytime", "Daytime"),
    ("DaytimeN", "Daytime number"),
    ("ObsSeasonChange", "Season change"),
    ("ObsMeteoSeasonChange", "Meteorological season change"),
    ("ObsPhenoSeasonChange", "Phenological season change"),
    ("SunSignChange", "Sun sign change"),
    ("MoonSignChange", "Moon sign change"),
    ("MoonPhaseSChange", "Moon phase change"),
    ("ObsIsDSTChange", "Daylight saving change"),
];

const ENGLISH_CATEGORIES: &[(&str, &str)] = &[
    ("winter", "Winter"),
    ("spring", "Spring"),
    ("summer", "Summer"),
    ("fall", "Fall"),
    ("earlyspring", "Early spring"),
    ("firstspring", "First spring"),
    ("fullspring", "Full spring"),
    ("earlysummer", "Early summer"),
    ("midsummer", "Midsummer"),
    ("latesummer", "Late summer"),
    ("earlyfall", "Early fall"),
    ("fullfall", "Full fall"),
    ("latefall", "Late fall"),
    ("aries", "Aries"),
    ("taurus", "Taurus"),
    ("gemini", "Gemini"),
    ("cancer", "Cancer"),
    ("leo", "Leo"),
    ("virgo", "Virgo"),
    ("libra", "Libra"),
    ("scorpio", "Scorpio"),
    ("sagittarius", "Sagittarius"),
    ("capricorn", "Capricorn"),
    ("aquarius", "Aquarius"),
    ("pisces", "Pisces"),
    ("newmoon", "New moon"),
    ("waxingcrescent", "Waxing crescent"),
    ("firstquarter", "First quarter"),
    ("waxinggibbous", "Waxing gibbous"),
    ("fullmoon", "Full moon"),
    ("waninggibbous", "Waning gibbous"),
    ("lastquarter", "Last quarter"),
    ("waningcrescent", "Waning crescent"),
    ("early_morning", "Early morning"),
    ("morning", "Morning"),
    ("forenoon", "Forenoon"),
    ("noon", "Noon"),
    ("afternoon", "Afternoon"),
    ("late_afternoon", "Late afternoon"),
    ("evening", "Evening"),
    ("dusk", "Dusk"),
    ("early_night", "Early night"),
    ("night", "Night"),
    ("midnight", "Midnight"),
    ("late_night", "Late night"),
    ("dawn", "Dawn"),
    ("dst", "Daylight saving time"),
    ("standard", "Standard time"),
    ("changes_tomorrow", "changes tomorrow"),
    ("changed_today", "changed today"),
];

fn lookup(table: &[(&str, &'static str)], key: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(canonical, _)| *canonical == key)
        .map(|(_, label)| *label)
}

impl LabelLookup for English {
    fn language(&self) -> &str {
        "en"
    }

    fn field<'a>(&self, name: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(lookup(ENGLISH_FIELDS, name).unwrap_or(name))
    }

    fn category<'a>(&self, _field: &str, key: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(lookup(ENGLISH_CATEGORIES, key).unwrap_or(key))
    }
}

/// Label lookup for a language code; `None` for unsupported languages.
pub fn for_language(code: &str) -> Option<Box<dyn LabelLookup>> {
    match code.to_ascii_lowercase().as_str() {
        "en" => Some(Box::new(English)),
        "und" | "canonical" => Some(Box::new(Canonical)),
        _ => None,
    }
}
