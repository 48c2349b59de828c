//! Atmospheric refraction for a fixed standard atmosphere.

use super::calendar::{DEG, RAD};

const PRESSURE_HPA: f64 = 1015.0;
const TEMPERATURE_C: f64 = 10.0;

/// Apparent lift in degrees for a body at true altitude `alt` (radians).
///
/// Zero below -2° and at or above 90°. Above 15° a closed form is used; closer
/// to the horizon a three-step secant refinement of the Bennett model solves
/// for the apparent altitude.
pub fn refraction(alt: f64) -> f64 {
    let altdeg = alt * RAD;
    if !(-2.0..90.0).contains(&altdeg) {
        return 0.0;
    }
    if altdeg > 15.0 {
        return 0.00452 * PRESSURE_HPA / ((273.0 + TEMPERATURE_C) * alt.tan());
    }

    let p = (PRESSURE_HPA - 80.0) / 930.0;
    let q = 0.0048 * (TEMPERATURE_C - 10.0);

    let mut y = altdeg;
    let mut d = 0.0;
    let mut y0 = y;
    let mut d0 = d;
    for _ in 0..3 {
        let n = 1.0 / ((y + 7.31 / (y + 4.4)) * DEG).tan();
        d = n * p / (60.0 + q * (n + 39.0));
        let step = y - y0;
        let slope = d - d0 - step;
        let next = if step != 0.0 && slope != 0.0 {
            y - step * (altdeg + d - y) / slope
        } else {
            altdeg + d
        };
        y0 = y;
        d0 = d;
        y = next;
    }
    d
}
