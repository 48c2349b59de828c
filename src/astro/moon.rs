//! Lunar ephemeris: mean elements of 1990.0 plus the leading perturbations.

use super::calendar::{DEG, mod_2pi};
use super::sun::ELEMENT_EPOCH;
use super::transform::{
    Equatorial, Horizontal, ObserverCart, ecl_to_equ, equ_to_altaz, geo_equ_to_topo_equ,
};
use super::zodiac::{MoonPhase, Zodiac};

const MEAN_LONGITUDE_AT_EPOCH: f64 = 318.351648 * DEG;
const PERIGEE_AT_EPOCH: f64 = 36.340410 * DEG;
const NODE_AT_EPOCH: f64 = 318.510107 * DEG;
const INCLINATION: f64 = 5.145396 * DEG;
const ECCENTRICITY: f64 = 0.054900;
const SEMI_MAJOR_AXIS_KM: f64 = 384_401.0;
const DIAMETER_AT_MEAN_DISTANCE: f64 = 0.5181 * DEG;
const PARALLAX_AT_MEAN_DISTANCE: f64 = 0.9507 * DEG;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoonCoord {
    pub lon: f64,
    pub lat: f64,
    /// Right ascension and declination; topocentric when an observer was given.
    pub ra: f64,
    pub dec: f64,
    /// Geocentric place, always retained.
    pub geocentric: Equatorial,
    /// True orbital longitude.
    pub orbit_lon: f64,
    /// Distance from the Earth's centre in km.
    pub distance: f64,
    /// Distance from the observer in km, when an observer was given.
    pub distance_topocentric: Option<f64>,
    pub diameter: f64,
    pub parallax: f64,
    /// Elongation from the Sun in [0, 2π): 0 new, π full.
    pub age: f64,
    /// Illuminated fraction in [0, 1].
    pub phase: f64,
    pub phase_bucket: MoonPhase,
    pub sign: Zodiac,
    pub horizontal: Option<Horizontal>,
}

/// Moon position at `tdt` given the Sun's ecliptic longitude and mean anomaly.
/// `observer` carries the observer vector and local sidereal time (radians).
pub fn moon_position(
    sun_lon: f64,
    sun_anomaly_mean: f64,
    tdt: f64,
    observer: Option<(&ObserverCart, f64)>,
) -> MoonCoord {
    let d = tdt - ELEMENT_EPOCH;

    let l = 13.1763966 * DEG * d + MEAN_LONGITUDE_AT_EPOCH;
    let anomaly = l - 0.1114041 * DEG * d - PERIGEE_AT_EPOCH;
    let node = NODE_AT_EPOCH - 0.0529539 * DEG * d;

    let c = l - sun_lon;
    let evection = 1.2739 * DEG * (2.0 * c - anomaly).sin();
    let annual = 0.1858 * DEG * sun_anomaly_mean.sin();
    let a3 = 0.37 * DEG * sun_anomaly_mean.sin();
    let anomaly_corrected = anomaly + evection - annual - a3;
    let centre = 6.2886 * DEG * anomaly_corrected.sin();
    let a4 = 0.214 * DEG * (2.0 * anomaly_corrected).sin();
    let l2 = l + evection + centre - annual + a4;
    let variation = 0.6583 * DEG * (2.0 * (l2 - sun_lon)).sin();
    let orbit_lon = l2 + variation;

    let node_corrected = node - 0.16 * DEG * sun_anomaly_mean.sin();
    let arg = orbit_lon - node_corrected;
    let lon = mod_2pi(node_corrected + (arg.sin() * INCLINATION.cos()).atan2(arg.cos()));
    let lat = (arg.sin() * INCLINATION.sin()).asin();

    let geocentric = ecl_to_equ(lon, lat, tdt);

    let relative = (1.0 - ECCENTRICITY * ECCENTRICITY)
        / (1.0 + ECCENTRICITY * (anomaly_corrected + centre).cos());
    let distance = relative * SEMI_MAJOR_AXIS_KM;

    let age = mod_2pi(orbit_lon - sun_lon);
    let phase = 0.5 * (1.0 - age.cos());

    let (ra, dec, distance_topocentric, horizontal) = match observer {
        Some((obs, lmst)) => {
            let topo = geo_equ_to_topo_equ(geocentric.ra, geocentric.dec, distance, obs, lmst);
            let hz = equ_to_altaz(topo.ra, topo.dec, obs.lat, lmst);
            (topo.ra, topo.dec, Some(topo.distance), Some(hz))
        }
        None => (geocentric.ra, geocentric.dec, None, None),
    };

    MoonCoord {
        lon,
        lat,
        ra,
        dec,
        geocentric,
        orbit_lon,
        distance,
        distance_topocentric,
        diameter: DIAMETER_AT_MEAN_DISTANCE / relative,
        parallax: PARALLAX_AT_MEAN_DISTANCE / relative,
        age,
        phase,
        phase_bucket: MoonPhase::from_age(age),
        sign: Zodiac::from_longitude(lon),
        horizontal,
    }
}
