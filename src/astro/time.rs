use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::observer::Observer;

const UNIX_EPOCH_JD: f64 = 2_440_587.5;
const J2000_JD: f64 = 2_451_545.0;

/// Julian Date of a UTC instant. The input already carries the UTC
/// instant, so no process-local offset enters the conversion.
pub fn julian_date(t: DateTime<Utc>) -> f64 {
    t.timestamp_millis() as f64 / 86_400_000.0 + UNIX_EPOCH_JD
}

/// Greenwich Mean Sidereal Time in hours [0, 24).
///
/// Standard 4-term polynomial in days/centuries since J2000.
pub fn gmst_hours(t: DateTime<Utc>) -> f64 {
    let jd = julian_date(t);
    let d = jd - J2000_JD;
    let tc = d / 36525.0;

    let gmst_deg = 280.46061837 + 360.98564736629 * d + 0.000387933 * tc * tc
        - (tc * tc * tc) / 38710000.0;

    gmst_deg.rem_euclid(360.0) / 15.0
}

/// Local Sidereal Time in hours [0, 24) for an east-positive longitude.
pub fn lst_hours(t: DateTime<Utc>, longitude_east_deg: f64) -> f64 {
    (gmst_hours(t) + longitude_east_deg / 15.0).rem_euclid(24.0)
}

/// Celestial coordinates of the point directly overhead.
///
/// RA at zenith equals the local sidereal time; declination equals the
/// observer's latitude. Spherical-Earth, non-refracted approximation.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct ZenithFrame {
    pub ra_hours: f64,
    pub dec_deg: f64,
    pub lst_hours: f64,
    pub julian_date: f64,
}

impl ZenithFrame {
    pub fn for_observer(observer: &Observer) -> Self {
        let lst = lst_hours(observer.timestamp, observer.longitude_deg);
        Self {
            ra_hours: lst,
            dec_deg: observer.latitude_deg,
            lst_hours: lst,
            julian_date: julian_date(observer.timestamp),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn julian_date_of_unix_epoch() {
        let epoch = Utc.timestamp_opt(0, 0).unwrap();
        assert!((julian_date(epoch) - 2_440_587.5).abs() < 1e-9);
    }

    #[test]
    fn julian_date_of_j2000() {
        // J2000.0 = 2000-01-01 12:00:00 UTC (TT offset ignored at this precision)
        let t = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        assert!((julian_date(t) - 2_451_545.0).abs() < 1e-9);
    }

    #[test]
    fn gmst_in_range() {
        let t = Utc.with_ymd_and_hms(2024, 3, 1, 21, 30, 0).unwrap();
        let gmst = gmst_hours(t);
        assert!((0.0..24.0).contains(&gmst));
    }

    #[test]
    fn lst_wraps_negative_longitude() {
        let t = Utc.with_ymd_and_hms(2024, 3, 1, 0, 15, 0).unwrap();
        let lst = lst_hours(t, -170.0);
        assert!((0.0..24.0).contains(&lst));
    }

    #[test]
    fn sidereal_day_advances_faster_than_solar() {
        // Over one solar day LST advances ~24h 3m 56.6s, i.e. ~24.0657h,
        // leaving a residual of roughly 0.0657h mod 24.
        let t0 = Utc.with_ymd_and_hms(2024, 6, 10, 4, 0, 0).unwrap();
        let t1 = t0 + chrono::Duration::seconds(86_400);
        let lst0 = lst_hours(t0, 77.6513);
        let lst1 = lst_hours(t1, 77.6513);
        let advance = (lst1 - lst0).rem_euclid(24.0);
        assert!((advance - 0.0657).abs() < 0.001, "advance was {advance}");
    }

    #[test]
    fn zenith_frame_tracks_observer() {
        let t = Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 0).unwrap();
        let obs = Observer::new(12.8688, 77.6513, 920.0, t).unwrap();
        let frame = ZenithFrame::for_observer(&obs);
        assert_eq!(frame.dec_deg, 12.8688);
        assert!((frame.ra_hours - frame.lst_hours).abs() < 1e-12);
        assert!((frame.ra_hours - lst_hours(t, 77.6513)).abs() < 1e-12);
    }
}
