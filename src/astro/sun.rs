//! Low-precision solar ephemeris from mean elements referenced to 1990.0.

use super::calendar::{DEG, mod_2pi};
use super::transform::{EARTH_EQUATORIAL_RADIUS, Horizontal, ecl_to_equ, equ_to_altaz};
use super::zodiac::Zodiac;
use std::f64::consts::PI;

/// Julian date of the 1990.0 element epoch.
pub const ELEMENT_EPOCH: f64 = 2_447_891.5;

const ECLIPTIC_LONGITUDE_AT_EPOCH: f64 = 279.403303 * DEG;
const PERIGEE_LONGITUDE_AT_EPOCH: f64 = 282.768422 * DEG;
const ECCENTRICITY: f64 = 0.016713;
const SEMI_MAJOR_AXIS_KM: f64 = 149_598_500.0;
const DIAMETER_AT_ONE_AU: f64 = 0.533128 * DEG;
const TROPICAL_YEAR_DAYS: f64 = 365.242191;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunCoord {
    pub lon: f64,
    pub lat: f64,
    pub ra: f64,
    pub dec: f64,
    pub anomaly_mean: f64,
    /// Distance from the Earth's centre in km.
    pub distance: f64,
    /// Angular diameter in radians.
    pub diameter: f64,
    /// Horizontal parallax in radians.
    pub parallax: f64,
    pub sign: Zodiac,
    /// Present only when observer latitude and local sidereal time were given.
    pub horizontal: Option<Horizontal>,
}

/// Sun position at terrestrial dynamical time `tdt`. `observer` is the
/// geodetic latitude and local sidereal time, both in radians.
pub fn sun_position(tdt: f64, observer: Option<(f64, f64)>) -> SunCoord {
    let d = tdt - ELEMENT_EPOCH;
    let anomaly_mean =
        2.0 * PI / TROPICAL_YEAR_DAYS * d + ECLIPTIC_LONGITUDE_AT_EPOCH - PERIGEE_LONGITUDE_AT_EPOCH;
    let nu = anomaly_mean + 2.0 * ECCENTRICITY * anomaly_mean.sin();

    let lon = mod_2pi(nu + PERIGEE_LONGITUDE_AT_EPOCH);
    let lat = 0.0;
    let relative = (1.0 - ECCENTRICITY * ECCENTRICITY) / (1.0 + ECCENTRICITY * nu.cos());
    let distance = relative * SEMI_MAJOR_AXIS_KM;

    let equ = ecl_to_equ(lon, lat, tdt);
    let horizontal = observer.map(|(lat, lmst)| equ_to_altaz(equ.ra, equ.dec, lat, lmst));

    SunCoord {
        lon,
        lat,
        ra: equ.ra,
        dec: equ.dec,
        anomaly_mean,
        distance,
        diameter: DIAMETER_AT_ONE_AU / relative,
        parallax: EARTH_EQUATORIAL_RADIUS / distance,
        sign: Zodiac::from_longitude(lon),
        horizontal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::astro::calendar::{RAD, calc_jd};

    #[test]
    fn test_equinox_and_solstice_longitudes() {
        let march = sun_position(calc_jd(20, 3, 2024) + 0.5, None);
        let lon = march.lon * RAD;
        assert!(lon < 1.5 || lon > 358.5, "march lon {}", lon);

        let june = sun_position(calc_jd(21, 6, 2024) + 0.5, None);
        assert!((june.lon * RAD - 90.0).abs() < 1.0);
        assert!((june.dec * RAD - 23.44).abs() < 0.1);
    }

    #[test]
    fn test_distance_extremes() {
        let perihelion = sun_position(calc_jd(3, 1, 2024), None);
        let aphelion = sun_position(calc_jd(5, 7, 2024), None);
        assert!(perihelion.distance < 147_200_000.0);
        assert!(aphelion.distance > 152_000_000.0);
        assert!(perihelion.diameter > aphelion.diameter);
    }

    #[test]
    fn test_horizontal_only_with_observer() {
        let tdt = calc_jd(1, 5, 2024) + 0.5;
        assert!(sun_position(tdt, None).horizontal.is_none());
        assert!(sun_position(tdt, Some((0.9, 1.0))).horizontal.is_some());
    }

    #[test]
    fn test_sign_follows_longitude() {
        let sun = sun_position(calc_jd(1, 8, 2024), None);
        assert_eq!(sun.sign, Zodiac::Leo);
    }
}
