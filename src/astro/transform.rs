//! Ecliptic, equatorial and horizontal frames, parallax and observer geometry.
//!
//! All angles are radians. Right ascension and azimuth come back in [0, 2π).

use super::calendar::{DEG, J2000, mod_2pi};
use std::f64::consts::PI;

/// WGS84 semi-major axis in km.
pub const EARTH_EQUATORIAL_RADIUS: f64 = 6378.137;
/// WGS84 inverse flattening.
pub const EARTH_INVERSE_FLATTENING: f64 = 298.257223563;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Equatorial {
    pub ra: f64,
    pub dec: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Horizontal {
    pub az: f64,
    pub alt: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cartesian {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Cartesian {
    pub fn distance_to(&self, other: &Cartesian) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2) + (self.z - other.z).powi(2))
            .sqrt()
    }
}

/// Topocentric place of a body as seen from the observer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Topocentric {
    pub distance: f64,
    pub dec: f64,
    pub ra: f64,
}

/// Observer position in the geocentric equatorial frame aligned to the vernal equinox.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverCart {
    pub cart: Cartesian,
    /// Distance from the Earth's centre in km.
    pub radius: f64,
    /// Geodetic longitude and latitude, kept for the parallax correction.
    pub lon: f64,
    pub lat: f64,
}

/// Mean obliquity of the ecliptic for the given terrestrial dynamical time.
pub fn obliquity(tdt: f64) -> f64 {
    let t = (tdt - J2000) / 36525.0;
    (23.0 + (26.0 + 21.45 / 60.0) / 60.0 + t * (-46.815 + t * (-0.0006 + t * 0.00181)) / 3600.0)
        * DEG
}

pub fn ecl_to_equ(lon: f64, lat: f64, tdt: f64) -> Equatorial {
    let eps = obliquity(tdt);
    let (sineps, coseps) = eps.sin_cos();
    let sinlon = lon.sin();
    Equatorial {
        ra: mod_2pi((sinlon * coseps - lat.tan() * sineps).atan2(lon.cos())),
        dec: (lat.sin() * coseps + lat.cos() * sineps * sinlon).asin(),
    }
}

/// Horizontal coordinates for an observer at geodetic latitude `lat` and local
/// sidereal time `lmst` (radians). Azimuth is measured from north through east.
pub fn equ_to_altaz(ra: f64, dec: f64, lat: f64, lmst: f64) -> Horizontal {
    let (sindec, cosdec) = dec.sin_cos();
    let (sinlha, coslha) = (lmst - ra).sin_cos();
    let (sinlat, coslat) = lat.sin_cos();
    let n = -cosdec * sinlha;
    let d = sindec * coslat - cosdec * coslha * sinlat;
    Horizontal {
        az: mod_2pi(n.atan2(d)),
        alt: (sindec * sinlat + cosdec * coslha * coslat).asin(),
    }
}

pub fn equ_polar_to_cart(lon: f64, lat: f64, distance: f64) -> Cartesian {
    let rcd = lat.cos() * distance;
    Cartesian {
        x: rcd * lon.cos(),
        y: rcd * lon.sin(),
        z: distance * lat.sin(),
    }
}

/// Inverse of [`equ_polar_to_cart`]: returns (lon, lat, distance).
pub fn cart_to_polar(cart: &Cartesian) -> (f64, f64, f64) {
    let distance = (cart.x * cart.x + cart.y * cart.y + cart.z * cart.z).sqrt();
    if distance == 0.0 {
        return (0.0, 0.0, 0.0);
    }
    (
        mod_2pi(cart.y.atan2(cart.x)),
        (cart.z / distance).asin(),
        distance,
    )
}

/// Geocentric cartesian position of an observer at geodetic `lon`/`lat`
/// (radians) and `height_km` above the ellipsoid, rotated by `gmst` (hours).
pub fn observer_to_equ_cart(lon: f64, lat: f64, height_km: f64, gmst: f64) -> ObserverCart {
    let co = lat.cos();
    let si = lat.sin();
    let fl = (1.0 - 1.0 / EARTH_INVERSE_FLATTENING).powi(2);
    let si2 = si * si;
    let u = 1.0 / (co * co + fl * si2).sqrt();
    let a = EARTH_EQUATORIAL_RADIUS * u + height_km;
    let b = EARTH_EQUATORIAL_RADIUS * fl * u + height_km;
    let radius = (a * a * co * co + b * b * si2).sqrt();

    let mut geocentric_lat = (a * co / radius).clamp(-1.0, 1.0).acos();
    if lat < 0.0 {
        geocentric_lat = -geocentric_lat;
    }

    let greenwich = equ_polar_to_cart(lon, geocentric_lat, radius);
    let rot = gmst / 24.0 * 2.0 * PI;
    let (sinrot, cosrot) = rot.sin_cos();

    ObserverCart {
        cart: Cartesian {
            x: greenwich.x * cosrot - greenwich.y * sinrot,
            y: greenwich.x * sinrot + greenwich.y * cosrot,
            z: greenwich.z,
        },
        radius,
        lon,
        lat,
    }
}

/// Parallax correction of a geocentric place: difference of the body and
/// observer vectors, converted back to polar form. `lmst` is in radians.
pub fn geo_equ_to_topo_equ(
    ra: f64,
    dec: f64,
    distance: f64,
    observer: &ObserverCart,
    lmst: f64,
) -> Topocentric {
    let (sindec, cosdec) = dec.sin_cos();
    let (sinlst, coslst) = lmst.sin_cos();
    let (sinlat, coslat) = observer.lat.sin_cos();
    let rho = observer.radius;

    let x = distance * cosdec * ra.cos() - rho * coslat * coslst;
    let y = distance * cosdec * ra.sin() - rho * coslat * sinlst;
    let z = distance * sindec - rho * sinlat;

    let topo_distance = (x * x + y * y + z * z).sqrt();
    Topocentric {
        distance: topo_distance,
        dec: (z / topo_distance).asin(),
        ra: mod_2pi(y.atan2(x)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_obliquity_at_j2000() {
        let eps = obliquity(J2000) / DEG;
        assert!((eps - 23.439291).abs() < 1e-5, "eps {}", eps);
    }

    #[test]
    fn test_ecliptic_origin_maps_to_equatorial_origin() {
        let equ = ecl_to_equ(0.0, 0.0, J2000);
        assert!(equ.ra.abs() < 1e-12);
        assert!(equ.dec.abs() < 1e-12);
    }

    #[test]
    fn test_summer_solstice_point_declination_equals_obliquity() {
        let equ = ecl_to_equ(90.0 * DEG, 0.0, J2000);
        assert!((equ.dec - obliquity(J2000)).abs() < 1e-12);
        assert!((equ.ra - 90.0 * DEG).abs() < 1e-9);
    }

    #[test]
    fn test_meridian_body_altitude() {
        // On the meridian a body culminates at 90° - |lat - dec|, due south.
        let lat = 50.0 * DEG;
        let dec = 20.0 * DEG;
        let hz = equ_to_altaz(1.0, dec, lat, 1.0);
        assert!((hz.alt - 60.0 * DEG).abs() < 1e-12);
        assert!((hz.az - PI).abs() < 1e-9);
    }

    #[test]
    fn test_azimuth_is_normalised() {
        for lmst in [0.0, 1.0, 3.0, 5.0, 6.2] {
            let hz = equ_to_altaz(0.3, -0.2, 0.8, lmst);
            assert!((0.0..2.0 * PI).contains(&hz.az));
        }
    }

    #[test]
    fn test_observer_radius_at_equator_and_pole() {
        let equator = observer_to_equ_cart(0.0, 0.0, 0.0, 0.0);
        assert!((equator.radius - EARTH_EQUATORIAL_RADIUS).abs() < 1e-9);
        let pole = observer_to_equ_cart(0.0, 90.0 * DEG, 0.0, 0.0);
        assert!((pole.radius - 6356.752).abs() < 1e-3, "polar {}", pole.radius);
    }

    #[test]
    fn test_observer_cart_round_trip_distance() {
        let obs = observer_to_equ_cart(10.0 * DEG, 50.0 * DEG, 0.3, 7.3);
        let (_, _, distance) = cart_to_polar(&obs.cart);
        assert!(((distance - obs.radius) / obs.radius).abs() < 1e-6);
    }

    #[test]
    fn test_southern_observer_has_negative_z() {
        let obs = observer_to_equ_cart(0.0, -33.9 * DEG, 0.0, 0.0);
        assert!(obs.cart.z < 0.0);
    }

    #[test]
    fn test_topocentric_correction_at_zenith_shortens_distance() {
        let obs = observer_to_equ_cart(0.0, 0.0, 0.0, 0.0);
        let topo = geo_equ_to_topo_equ(0.0, 0.0, 384_400.0, &obs, 0.0);
        assert!((topo.distance - (384_400.0 - EARTH_EQUATORIAL_RADIUS)).abs() < 1e-6);
        assert!(topo.dec.abs() < 1e-12);
    }
}
