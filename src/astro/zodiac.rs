//! Categorical attributes derived from ecliptic longitude and lunar age.

use super::calendar::{RAD, mod_positive};
use std::f64::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Zodiac {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl Zodiac {
    pub const ALL: [Zodiac; 12] = [
        Zodiac::Aries,
        Zodiac::Taurus,
        Zodiac::Gemini,
        Zodiac::Cancer,
        Zodiac::Leo,
        Zodiac::Virgo,
        Zodiac::Libra,
        Zodiac::Scorpio,
        Zodiac::Sagittarius,
        Zodiac::Capricorn,
        Zodiac::Aquarius,
        Zodiac::Pisces,
    ];

    /// Sign for an ecliptic longitude in radians; twelve equal 30° sectors.
    pub fn from_longitude(lon: f64) -> Self {
        let index = (mod_positive(lon * RAD, 360.0) / 30.0).floor() as usize;
        Self::ALL[index.min(11)]
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn key(self) -> &'static str {
        match self {
            Zodiac::Aries => "aries",
            Zodiac::Taurus => "taurus",
            Zodiac::Gemini => "gemini",
            Zodiac::Cancer => "cancer",
            Zodiac::Leo => "leo",
            Zodiac::Virgo => "virgo",
            Zodiac::Libra => "libra",
            Zodiac::Scorpio => "scorpio",
            Zodiac::Sagittarius => "sagittarius",
            Zodiac::Capricorn => "capricorn",
            Zodiac::Aquarius => "aquarius",
            Zodiac::Pisces => "pisces",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MoonPhase {
    NewMoon,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    FullMoon,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

/// Half-width of the window around new moon and the quarters that is reported
/// as the main phase: one day of mean lunar motion.
pub const MAIN_PHASE_WINDOW: f64 = 1.0 / 29.53 * 2.0 * PI;

impl MoonPhase {
    pub const ALL: [MoonPhase; 8] = [
        MoonPhase::NewMoon,
        MoonPhase::WaxingCrescent,
        MoonPhase::FirstQuarter,
        MoonPhase::WaxingGibbous,
        MoonPhase::FullMoon,
        MoonPhase::WaningGibbous,
        MoonPhase::LastQuarter,
        MoonPhase::WaningCrescent,
    ];

    /// Phase bucket for a lunar age in radians (0 = new, π = full).
    ///
    /// Within [`MAIN_PHASE_WINDOW`] of an exact new, quarter or full instant the
    /// even bucket of that instant is reported; everywhere else the odd bucket
    /// between the two neighbouring main phases.
    pub fn from_age(age: f64) -> Self {
        let quarter = PI / 2.0;
        let p = mod_positive(age, quarter);
        let bucket = if p < MAIN_PHASE_WINDOW || p > quarter - MAIN_PHASE_WINDOW {
            2 * (age / quarter).round() as i64
        } else {
            2 * (age / quarter).floor() as i64 + 1
        };
        Self::ALL[bucket.rem_euclid(8) as usize]
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn key(self) -> &'static str {
        match self {
            MoonPhase::NewMoon => "newmoon",
            MoonPhase::WaxingCrescent => "waxingcrescent",
            MoonPhase::FirstQuarter => "firstquarter",
            MoonPhase::WaxingGibbous => "waxinggibbous",
            MoonPhase::FullMoon => "fullmoon",
            MoonPhase::WaningGibbous => "waninggibbous",
            MoonPhase::LastQuarter => "lastquarter",
            MoonPhase::WaningCrescent => "waningcrescent",
        }
    }
}
