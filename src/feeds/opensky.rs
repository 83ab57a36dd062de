use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use super::error::FeedError;
use crate::astro::{self, Horizontal};
use crate::observer::Observer;
use crate::target::{CelestialTarget, TargetDetail};

/// Half-width of the query bounding box around the observer, in
/// degrees of latitude/longitude (roughly a 200 km radius).
const BBOX_HALF_WIDTH_DEG: f64 = 2.0;

/// Altitude band an aircraft must report to be considered overhead
/// traffic, in meters.
#[derive(Debug, Clone, Copy)]
pub struct CruisingBand {
    pub min_m: f64,
    pub max_m: f64,
}

impl CruisingBand {
    pub fn contains(&self, altitude_m: f64) -> bool {
        (self.min_m..=self.max_m).contains(&altitude_m)
    }
}

#[derive(Debug, Deserialize)]
struct StatesResponse {
    states: Option<Vec<Vec<Value>>>,
}

/// One aircraft record decoded from the positional array-of-fields
/// shape: [0] icao24, [1] callsign, [2] origin country, [4] last
/// contact, [5] lon, [6] lat, [7] baro altitude, [8] on ground,
/// [9] velocity, [10] true track, [13] geo altitude.
#[derive(Debug, Clone, PartialEq)]
pub struct StateVector {
    pub icao24: String,
    pub callsign: Option<String>,
    pub origin_country: String,
    pub last_contact: Option<i64>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub baro_altitude_m: Option<f64>,
    pub on_ground: bool,
    pub velocity_ms: Option<f64>,
    pub true_track_deg: Option<f64>,
    pub geo_altitude_m: Option<f64>,
}

impl StateVector {
    pub fn from_row(row: &[Value]) -> Option<Self> {
        let icao24 = row.first()?.as_str()?.to_string();
        Some(Self {
            icao24,
            callsign: field_str(row, 1),
            origin_country: field_str(row, 2).unwrap_or_default(),
            last_contact: row.get(4).and_then(Value::as_i64),
            longitude: field_f64(row, 5),
            latitude: field_f64(row, 6),
            baro_altitude_m: field_f64(row, 7),
            on_ground: row.get(8).and_then(Value::as_bool).unwrap_or(false),
            velocity_ms: field_f64(row, 9),
            true_track_deg: field_f64(row, 10),
            geo_altitude_m: field_f64(row, 13),
        })
    }

    /// Geometric altitude when reported, barometric otherwise.
    pub fn altitude_m(&self) -> Option<f64> {
        self.geo_altitude_m.or(self.baro_altitude_m)
    }
}

fn field_str(row: &[Value], index: usize) -> Option<String> {
    row.get(index)
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn field_f64(row: &[Value], index: usize) -> Option<f64> {
    row.get(index).and_then(Value::as_f64).filter(|v| v.is_finite())
}

/// Map a decoded state vector into the common target schema.
///
/// Returns `None` for records missing a position or any altitude,
/// outside the cruising band, on the ground, or below the observer's
/// horizon.
pub fn normalize_state(
    state: &StateVector,
    observer: &Observer,
    band: CruisingBand,
) -> Option<CelestialTarget> {
    let (lat, lon) = (state.latitude?, state.longitude?);
    let plane_altitude_m = state.altitude_m()?;

    if state.on_ground || !band.contains(plane_altitude_m) {
        return None;
    }

    let ground_distance_km =
        astro::haversine_km(observer.latitude_deg, observer.longitude_deg, lat, lon);
    let bearing = astro::bearing_deg(observer.latitude_deg, observer.longitude_deg, lat, lon);

    let altitude_delta_m = plane_altitude_m - observer.altitude_m;
    let elevation_deg = altitude_delta_m
        .atan2(ground_distance_km * 1000.0)
        .to_degrees();
    if elevation_deg <= 0.0 {
        return None;
    }

    let horizontal = Horizontal {
        altitude_deg: elevation_deg,
        azimuth_deg: bearing,
    };
    let position = astro::horizontal_to_equatorial(horizontal, observer);

    let name = match &state.callsign {
        Some(callsign) => format!("Flight {callsign}"),
        None => format!("Aircraft {}", state.icao24.to_uppercase()),
    };

    Some(CelestialTarget {
        name,
        position: Some(position),
        horizontal: Some(horizontal),
        magnitude: None,
        zenith_distance_deg: None,
        detail: TargetDetail::Airplane {
            callsign: state.callsign.clone().unwrap_or_default(),
            icao24: state.icao24.to_uppercase(),
            country: state.origin_country.clone(),
            latitude_deg: lat,
            longitude_deg: lon,
            plane_altitude_m,
            ground_distance_km,
            velocity_kmh: state.velocity_ms.map(|v| v * 3.6),
            heading_deg: state.true_track_deg,
            last_contact: state.last_contact,
            origin: None,
            destination: None,
        },
    })
}

/// Client for the aircraft state-vector service (OpenSky API shape).
pub struct OpenSkyClient {
    http: reqwest::Client,
    base_url: String,
    band: CruisingBand,
    display_cap: usize,
}

impl OpenSkyClient {
    pub fn new(
        base_url: impl Into<String>,
        band: CruisingBand,
        display_cap: usize,
        timeout: Duration,
    ) -> Result<Self, FeedError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            band,
            display_cap,
        })
    }

    /// Fetch aircraft inside the bounding box around the observer and
    /// normalize the overhead ones, highest elevation first.
    pub async fn fetch_airplanes(&self, observer: &Observer) -> Result<Vec<CelestialTarget>, FeedError> {
        let lamin = observer.latitude_deg - BBOX_HALF_WIDTH_DEG;
        let lamax = observer.latitude_deg + BBOX_HALF_WIDTH_DEG;
        let lomin = observer.longitude_deg - BBOX_HALF_WIDTH_DEG;
        let lomax = observer.longitude_deg + BBOX_HALF_WIDTH_DEG;

        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("lamin", lamin.to_string()),
                ("lamax", lamax.to_string()),
                ("lomin", lomin.to_string()),
                ("lomax", lomax.to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FeedError::Status {
                endpoint: "opensky",
                status: response.status(),
            });
        }

        let body: StatesResponse = response.json().await?;
        let rows = body.states.unwrap_or_default();
        log::debug!("received {} aircraft state vectors", rows.len());

        let mut airplanes: Vec<CelestialTarget> = rows
            .iter()
            .filter_map(|row| StateVector::from_row(row))
            .filter_map(|state| normalize_state(&state, observer, self.band))
            .collect();

        airplanes.sort_by(|a, b| {
            let alt_a = a.horizontal.map(|h| h.altitude_deg).unwrap_or(0.0);
            let alt_b = b.horizontal.map(|h| h.altitude_deg).unwrap_or(0.0);
            alt_b.partial_cmp(&alt_a).unwrap_or(std::cmp::Ordering::Equal)
        });
        airplanes.truncate(self.display_cap);

        Ok(airplanes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn observer() -> Observer {
        let t = Utc.with_ymd_and_hms(2024, 3, 1, 18, 30, 0).unwrap();
        Observer::new(12.8688, 77.6513, 920.0, t).unwrap()
    }

    fn band() -> CruisingBand {
        CruisingBand {
            min_m: 1000.0,
            max_m: 15000.0,
        }
    }

    fn row(altitude_m: f64, lat: f64, lon: f64) -> Vec<Value> {
        vec![
            json!("800abc"),
            json!("IGO6113 "),
            json!("India"),
            json!(null),
            json!(1709317800),
            json!(lon),
            json!(lat),
            json!(altitude_m),
            json!(false),
            json!(230.0),
            json!(85.0),
            json!(null),
            json!(null),
            json!(altitude_m),
        ]
    }

    #[test]
    fn decodes_state_vector_fields() {
        let r = row(8000.0, 13.1, 77.7);
        let state = StateVector::from_row(&r).unwrap();
        assert_eq!(state.icao24, "800abc");
        assert_eq!(state.callsign.as_deref(), Some("IGO6113"));
        assert_eq!(state.origin_country, "India");
        assert_eq!(state.altitude_m(), Some(8000.0));
        assert!(!state.on_ground);
    }

    #[test]
    fn cruising_aircraft_is_included() {
        let state = StateVector::from_row(&row(8000.0, 13.1, 77.7)).unwrap();
        let target = normalize_state(&state, &observer(), band()).unwrap();
        assert!(target.is_above_horizon());
        assert_eq!(target.name, "Flight IGO6113");
        match &target.detail {
            TargetDetail::Airplane {
                velocity_kmh,
                plane_altitude_m,
                ..
            } => {
                assert_eq!(*plane_altitude_m, 8000.0);
                assert!((velocity_kmh.unwrap() - 828.0).abs() < 1e-9);
            }
            other => panic!("unexpected detail {other:?}"),
        }
    }

    #[test]
    fn altitude_band_excludes_low_and_high() {
        let obs = observer();
        let low = StateVector::from_row(&row(500.0, 13.1, 77.7)).unwrap();
        assert!(normalize_state(&low, &obs, band()).is_none());
        let high = StateVector::from_row(&row(20_000.0, 13.1, 77.7)).unwrap();
        assert!(normalize_state(&high, &obs, band()).is_none());
    }

    #[test]
    fn missing_position_is_discarded() {
        let mut r = row(8000.0, 13.1, 77.7);
        r[5] = json!(null);
        r[6] = json!(null);
        let state = StateVector::from_row(&r).unwrap();
        assert!(normalize_state(&state, &observer(), band()).is_none());
    }

    #[test]
    fn missing_both_altitudes_is_discarded() {
        let mut r = row(8000.0, 13.1, 77.7);
        r[7] = json!(null);
        r[13] = json!(null);
        let state = StateVector::from_row(&r).unwrap();
        assert!(normalize_state(&state, &observer(), band()).is_none());
    }

    #[test]
    fn geometric_altitude_preferred_over_barometric() {
        let mut r = row(8000.0, 13.1, 77.7);
        r[7] = json!(7600.0);
        r[13] = json!(7900.0);
        let state = StateVector::from_row(&r).unwrap();
        assert_eq!(state.altitude_m(), Some(7900.0));
    }

    #[test]
    fn aircraft_below_observer_horizon_is_discarded() {
        // High-altitude observer looking down on in-band traffic.
        let t = Utc.with_ymd_and_hms(2024, 3, 1, 18, 30, 0).unwrap();
        let highland = Observer::new(12.8688, 77.6513, 2500.0, t).unwrap();
        let state = StateVector::from_row(&row(1200.0, 13.1, 77.7)).unwrap();
        assert!(normalize_state(&state, &highland, band()).is_none());
    }

    #[test]
    fn anonymous_aircraft_named_by_icao() {
        let mut r = row(8000.0, 13.1, 77.7);
        r[1] = json!("  ");
        let state = StateVector::from_row(&r).unwrap();
        let target = normalize_state(&state, &observer(), band()).unwrap();
        assert_eq!(target.name, "Aircraft 800ABC");
    }
}
