use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Error, PartialEq)]
pub enum ObserverError {
    #[error("latitude {0} outside [-90, 90]")]
    Latitude(f64),
    #[error("longitude {0} outside [-180, 180]")]
    Longitude(f64),
    #[error("altitude {0} must be a non-negative number of meters")]
    Altitude(f64),
}

/// An observing site at a fixed instant. Immutable for the duration of
/// one scan; all frame and look-angle math keys off these four values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct Observer {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_m: f64,
    pub timestamp: DateTime<Utc>,
}

impl Observer {
    /// Validates coordinates before any feed is contacted. NaN fails
    /// every range check, so malformed input is rejected here rather
    /// than surfacing as NaN downstream.
    pub fn new(
        latitude_deg: f64,
        longitude_deg: f64,
        altitude_m: f64,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, ObserverError> {
        if !(-90.0..=90.0).contains(&latitude_deg) {
            return Err(ObserverError::Latitude(latitude_deg));
        }
        if !(-180.0..=180.0).contains(&longitude_deg) {
            return Err(ObserverError::Longitude(longitude_deg));
        }
        if !altitude_m.is_finite() || altitude_m < 0.0 {
            return Err(ObserverError::Altitude(altitude_m));
        }
        Ok(Self {
            latitude_deg,
            longitude_deg,
            altitude_m,
            timestamp,
        })
    }

    pub fn lat_rad(&self) -> f64 {
        self.latitude_deg.to_radians()
    }

    pub fn lon_rad(&self) -> f64 {
        self.longitude_deg.to_radians()
    }

    pub fn position_ecef_km(&self) -> [f64; 3] {
        // WGS-84 constants
        let a = 6378.137;
        let e2 = 0.00669437999014;
        let lat = self.lat_rad();
        let lon = self.lon_rad();
        let sin_lat = lat.sin();
        let cos_lat = lat.cos();
        let sin_lon = lon.sin();
        let cos_lon = lon.cos();
        let n = a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        let alt_km = self.altitude_m / 1000.0;
        let x = (n + alt_km) * cos_lat * cos_lon;
        let y = (n + alt_km) * cos_lat * sin_lon;
        let z = (n * (1.0 - e2) + alt_km) * sin_lat;
        [x, y, z]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn accepts_valid_coordinates() {
        let obs = Observer::new(12.8688, 77.6513, 920.0, ts()).unwrap();
        assert_eq!(obs.latitude_deg, 12.8688);
    }

    #[test]
    fn rejects_out_of_range() {
        assert_eq!(
            Observer::new(91.0, 0.0, 0.0, ts()),
            Err(ObserverError::Latitude(91.0))
        );
        assert_eq!(
            Observer::new(0.0, -180.5, 0.0, ts()),
            Err(ObserverError::Longitude(-180.5))
        );
        assert_eq!(
            Observer::new(0.0, 0.0, -1.0, ts()),
            Err(ObserverError::Altitude(-1.0))
        );
    }

    #[test]
    fn rejects_nan() {
        assert!(Observer::new(f64::NAN, 0.0, 0.0, ts()).is_err());
        assert!(Observer::new(0.0, f64::NAN, 0.0, ts()).is_err());
        assert!(Observer::new(0.0, 0.0, f64::NAN, ts()).is_err());
    }

    #[test]
    fn ecef_at_equator_prime_meridian() {
        let obs = Observer::new(0.0, 0.0, 0.0, ts()).unwrap();
        let pos = obs.position_ecef_km();
        assert!((pos[0] - 6378.137).abs() < 1e-6);
        assert!(pos[1].abs() < 1e-9);
        assert!(pos[2].abs() < 1e-9);
    }
}
