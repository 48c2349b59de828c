//! Julian dates, month arithmetic and mean sidereal time.
//!
//! Everything here is valid for 1900-03-01 through 2100-02-28; outside that
//! window the closed forms lose precision but never fail.

use std::f64::consts::PI;

pub const DEG: f64 = PI / 180.0;
pub const RAD: f64 = 180.0 / PI;

/// Julian date of 2000 January 1.5 (epoch J2000).
pub const J2000: f64 = 2_451_545.0;

const DAYS_OF_MONTH: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Floored modulo; the result always has the sign of `b`.
pub fn mod_positive(a: f64, b: f64) -> f64 {
    a - (a / b).floor() * b
}

/// Normalise an angle to [0, 2π).
pub fn mod_2pi(x: f64) -> f64 {
    mod_positive(x, 2.0 * PI)
}

/// Fractional part towards negative infinity.
pub fn frac(x: f64) -> f64 {
    x - x.floor()
}

/// Julian date at 0h UT of the given Gregorian calendar date.
pub fn calc_jd(day: u32, month: u32, year: i32) -> f64 {
    let (mut year, mut month) = (year as f64, month as f64);
    if month <= 2.0 {
        year -= 1.0;
        month += 12.0;
    }
    // 1900-01-01 0h UT, shifted by the constant the linear month model needs
    let mut jd = 2_415_020.5 - 64.0;
    jd += ((year - 1900.0) * 365.25).trunc();
    jd += (30.6001 * (1.0 + month)).trunc();
    jd + day as f64
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` (1-12) of `year`.
pub fn days_of_month(year: i32, month: u32) -> u32 {
    let index = (month.clamp(1, 12) - 1) as usize;
    if index == 1 && is_leap_year(year) {
        29
    } else {
        DAYS_OF_MONTH[index]
    }
}

/// Greenwich mean sidereal time in hours, [0, 24).
pub fn gmst(jd: f64) -> f64 {
    let ut = frac(jd - 0.5) * 24.0;
    let jd0 = (jd - 0.5).floor() + 0.5;
    let t = (jd0 - J2000) / 36525.0;
    let t0 = 6.697374558 + t * (2400.051336 + t * 0.000025862);
    mod_positive(t0 + ut * 1.002737909, 24.0)
}

/// Universal time in hours at which the given GMST occurs on the UT day of `jd`.
///
/// Not normalised: sidereal times past 24h map past 24h UT.
pub fn gmst_to_ut(jd: f64, gmst: f64) -> f64 {
    let jd0 = (jd - 0.5).floor() + 0.5;
    let t = (jd0 - J2000) / 36525.0;
    let t0 = mod_positive(6.697374558 + t * (2400.051336 + t * 0.000025862), 24.0);
    0.9972695663 * (gmst - t0)
}

/// Local mean sidereal time in hours for a longitude given in radians.
pub fn gmst_to_lmst(gmst: f64, lon: f64) -> f64 {
    mod_positive(gmst + RAD * lon / 15.0, 24.0)
}
