use serde::Serialize;
use utoipa::ToSchema;

use super::time::lst_hours;
use crate::observer::Observer;

/// Position on the celestial sphere: right ascension in hours [0, 24),
/// declination in degrees [-90, 90].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct Equatorial {
    pub ra_hours: f64,
    pub dec_deg: f64,
}

/// Horizon-relative position: altitude in degrees above the horizon,
/// azimuth in degrees [0, 360) with north at 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct Horizontal {
    pub altitude_deg: f64,
    pub azimuth_deg: f64,
}

pub fn wrap_ra_hours(ra: f64) -> f64 {
    ra.rem_euclid(24.0)
}

pub fn wrap_azimuth_deg(az: f64) -> f64 {
    az.rem_euclid(360.0)
}

/// Angular separation of two points on the celestial sphere, in
/// degrees [0, 180]. Haversine form, so small separations keep full
/// precision and d(x, x) is exactly zero.
pub fn angular_distance_deg(a: Equatorial, b: Equatorial) -> f64 {
    let ra1 = (a.ra_hours * 15.0).to_radians();
    let dec1 = a.dec_deg.to_radians();
    let ra2 = (b.ra_hours * 15.0).to_radians();
    let dec2 = b.dec_deg.to_radians();

    let d_ra = ra2 - ra1;
    let d_dec = dec2 - dec1;

    let h = (d_dec / 2.0).sin().powi(2)
        + dec1.cos() * dec2.cos() * (d_ra / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    c.to_degrees()
}

/// Alt/az seen by the observer to RA/Dec, using the observer's
/// timestamp for the sidereal frame.
pub fn horizontal_to_equatorial(h: Horizontal, observer: &Observer) -> Equatorial {
    let lst = lst_hours(observer.timestamp, observer.longitude_deg);

    let alt = h.altitude_deg.to_radians();
    let az = h.azimuth_deg.to_radians();
    let lat = observer.lat_rad();

    let dec = (alt.sin() * lat.sin() + alt.cos() * lat.cos() * az.cos()).asin();

    // atan2(0, 0) at the poles/zenith yields 0, which is a consistent
    // hour angle for the degenerate geometry.
    let ha = (-alt.cos() * lat.cos() * az.sin()).atan2(alt.sin() - lat.sin() * dec.sin());

    let ra = lst - ha.to_degrees() / 15.0;

    Equatorial {
        ra_hours: wrap_ra_hours(ra),
        dec_deg: dec.to_degrees(),
    }
}

/// RA/Dec to alt/az for the observer's site and timestamp.
pub fn equatorial_to_horizontal(eq: Equatorial, observer: &Observer) -> Horizontal {
    let lst = lst_hours(observer.timestamp, observer.longitude_deg);

    let ha = ((lst - eq.ra_hours) * 15.0).to_radians();
    let dec = eq.dec_deg.to_radians();
    let lat = observer.lat_rad();

    let alt = (dec.sin() * lat.sin() + dec.cos() * lat.cos() * ha.cos()).asin();
    let az = (-dec.cos() * lat.cos() * ha.sin()).atan2(dec.sin() - lat.sin() * alt.sin());

    Horizontal {
        altitude_deg: alt.to_degrees(),
        azimuth_deg: wrap_azimuth_deg(az.to_degrees()),
    }
}
