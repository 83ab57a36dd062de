use serde::Serialize;
use utoipa::ToSchema;

use crate::astro::{Equatorial, Horizontal};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TargetKind {
    Planet,
    Star,
    Satellite,
    Airplane,
    MinorBody,
}

/// Kind-specific payload carried alongside the common angular fields.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TargetDetail {
    Planet,
    Star {
        constellation: String,
        spectral_type: String,
    },
    Satellite {
        range_km: f64,
        group: String,
    },
    Airplane {
        callsign: String,
        icao24: String,
        country: String,
        latitude_deg: f64,
        longitude_deg: f64,
        plane_altitude_m: f64,
        ground_distance_km: f64,
        velocity_kmh: Option<f64>,
        heading_deg: Option<f64>,
        last_contact: Option<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        origin: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        destination: Option<String>,
    },
    MinorBody {
        class: String,
        description: String,
        /// False for static reference entries returned when no body
        /// resolved above the horizon.
        live: bool,
    },
}

/// One sky object in the common schema every feed normalizes into.
///
/// `position` is absent only for non-live minor-body reference
/// entries; everything ranked against the zenith carries it.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CelestialTarget {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Equatorial>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub horizontal: Option<Horizontal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub magnitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zenith_distance_deg: Option<f64>,
    pub detail: TargetDetail,
}

impl CelestialTarget {
    pub fn kind(&self) -> TargetKind {
        match self.detail {
            TargetDetail::Planet => TargetKind::Planet,
            TargetDetail::Star { .. } => TargetKind::Star,
            TargetDetail::Satellite { .. } => TargetKind::Satellite,
            TargetDetail::Airplane { .. } => TargetKind::Airplane,
            TargetDetail::MinorBody { .. } => TargetKind::MinorBody,
        }
    }

    pub fn angular_position(&self) -> Option<Equatorial> {
        self.position
    }

    pub fn is_above_horizon(&self) -> bool {
        self.horizontal
            .map(|h| h.altitude_deg > 0.0)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_detail() {
        let target = CelestialTarget {
            name: "Sirius".into(),
            position: Some(Equatorial {
                ra_hours: 6.7525,
                dec_deg: -16.7161,
            }),
            horizontal: None,
            magnitude: Some(-1.46),
            zenith_distance_deg: None,
            detail: TargetDetail::Star {
                constellation: "Canis Major".into(),
                spectral_type: "A1V".into(),
            },
        };
        assert_eq!(target.kind(), TargetKind::Star);
        assert_eq!(target.kind().to_string(), "star");
        assert!(!target.is_above_horizon());
    }

    #[test]
    fn horizon_check_needs_positive_altitude() {
        let mut target = CelestialTarget {
            name: "ISS (ZARYA)".into(),
            position: None,
            horizontal: Some(Horizontal {
                altitude_deg: 0.0,
                azimuth_deg: 120.0,
            }),
            magnitude: None,
            zenith_distance_deg: None,
            detail: TargetDetail::Satellite {
                range_km: 420.0,
                group: "stations".into(),
            },
        };
        assert!(!target.is_above_horizon());
        target.horizontal = Some(Horizontal {
            altitude_deg: 35.0,
            azimuth_deg: 120.0,
        });
        assert!(target.is_above_horizon());
    }
}
