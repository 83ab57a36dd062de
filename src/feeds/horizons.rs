use std::time::Duration;

use futures::future::join_all;
use serde::Deserialize;

use super::error::FeedError;
use crate::astro::{self, Equatorial, Horizontal};
use crate::observer::Observer;
use crate::target::{CelestialTarget, TargetDetail};

/// Solar-system bodies queried every scan, keyed by ephemeris command id.
pub const SOLAR_SYSTEM_BODIES: &[(&str, &str)] = &[
    ("10", "Sun"),
    ("301", "Moon"),
    ("199", "Mercury"),
    ("299", "Venus"),
    ("499", "Mars"),
    ("599", "Jupiter"),
    ("699", "Saturn"),
    ("799", "Uranus"),
    ("899", "Neptune"),
];

/// Minor bodies checked for zenith proximity: (command id, name, class).
pub const MINOR_BODIES: &[(&str, &str, &str)] = &[
    ("1", "Ceres", "Dwarf Planet"),
    ("134340", "Pluto", "Dwarf Planet"),
    ("136199", "Eris", "Dwarf Planet"),
    ("136472", "Makemake", "Dwarf Planet"),
    ("136108", "Haumea", "Dwarf Planet"),
    ("4", "Vesta", "Asteroid"),
    ("2", "Pallas", "Asteroid"),
    ("10", "Hygiea", "Asteroid"),
    ("704", "Interamnia", "Asteroid"),
    ("52", "Europa (Asteroid)", "Asteroid"),
];

#[derive(Debug, Deserialize)]
struct HorizonsResponse {
    result: Option<String>,
}

/// One parsed ephemeris row. Horizontal coordinates are present only
/// when the provider returned the optional az/el columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EphemerisRow {
    pub equatorial: Equatorial,
    pub horizontal: Option<Horizontal>,
}

/// Best-effort parse of line-oriented ephemeris text.
///
/// Takes the first well-formed unindented row between the `$$SOE` and
/// `$$EOE` markers: token 2 is RA in degrees, token 3 declination,
/// tokens 4 and 5 azimuth/altitude when present. The provider's
/// column layout is not a stable contract, so a block with no row
/// that tokenizes into finite numbers yields `None`.
pub fn parse_ephemeris(result: &str) -> Option<EphemerisRow> {
    let mut in_data = false;
    for line in result.lines() {
        if line.contains("$$SOE") {
            in_data = true;
            continue;
        }
        if line.contains("$$EOE") {
            break;
        }
        if !in_data || line.trim().is_empty() || line.starts_with(' ') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 4 {
            continue;
        }

        let ra_deg = match parts[2].parse::<f64>() {
            Ok(v) if v.is_finite() => v,
            _ => continue,
        };
        let dec_deg = match parts[3].parse::<f64>() {
            Ok(v) if v.is_finite() => v,
            _ => continue,
        };

        let horizontal = if parts.len() >= 6 {
            match (parts[4].parse::<f64>(), parts[5].parse::<f64>()) {
                (Ok(az), Ok(alt)) if az.is_finite() && alt.is_finite() => Some(Horizontal {
                    altitude_deg: alt,
                    azimuth_deg: astro::wrap_azimuth_deg(az),
                }),
                _ => None,
            }
        } else {
            None
        };

        return Some(EphemerisRow {
            equatorial: Equatorial {
                ra_hours: astro::wrap_ra_hours(ra_deg / 15.0),
                dec_deg,
            },
            horizontal,
        });
    }

    None
}

/// Client for the positional-ephemeris service (JPL Horizons API shape).
pub struct HorizonsClient {
    http: reqwest::Client,
    base_url: String,
}

impl HorizonsClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FeedError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// Observer-centered ephemeris query over a 0.001-day window
    /// around the observer's timestamp.
    async fn query_body(&self, id: &str, observer: &Observer) -> Result<Option<EphemerisRow>, FeedError> {
        let jd = astro::julian_date(observer.timestamp);
        let site_coord = format!(
            "{},{},{}",
            observer.longitude_deg,
            observer.latitude_deg,
            observer.altitude_m / 1000.0
        );
        let start_time = format!("JD{jd}");
        let stop_time = format!("JD{}", jd + 0.001);

        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("format", "json"),
                ("COMMAND", id),
                ("OBJ_DATA", "NO"),
                ("MAKE_EPHEM", "YES"),
                ("EPHEM_TYPE", "OBSERVER"),
                ("CENTER", "coord@399"),
                ("COORD_TYPE", "GEODETIC"),
                ("SITE_COORD", site_coord.as_str()),
                ("START_TIME", start_time.as_str()),
                ("STOP_TIME", stop_time.as_str()),
                ("STEP_SIZE", "1m"),
                ("QUANTITIES", "1,4"),
                ("REF_SYSTEM", "ICRF"),
                ("CAL_FORMAT", "CAL"),
                ("TIME_DIGITS", "MINUTES"),
                ("ANG_FORMAT", "DEG"),
                ("APPARENT", "AIRLESS"),
                ("RANGE_UNITS", "AU"),
                ("SUPPRESS_RANGE_RATE", "YES"),
                ("SKIP_DAYLT", "NO"),
                ("EXTRA_PREC", "NO"),
                ("CSV_FORMAT", "YES"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FeedError::Status {
                endpoint: "horizons",
                status: response.status(),
            });
        }

        let body: HorizonsResponse = response.json().await?;
        Ok(body.result.as_deref().and_then(parse_ephemeris))
    }

    fn build_target(row: EphemerisRow, name: &str, observer: &Observer, detail: TargetDetail) -> CelestialTarget {
        // The transformer fills in whichever frame the row lacked.
        let horizontal = row
            .horizontal
            .unwrap_or_else(|| astro::equatorial_to_horizontal(row.equatorial, observer));
        CelestialTarget {
            name: name.to_string(),
            position: Some(row.equatorial),
            horizontal: Some(horizontal),
            magnitude: None,
            zenith_distance_deg: None,
            detail,
        }
    }

    /// Fetch the nine major solar-system bodies. Individual body
    /// failures are logged and skipped.
    pub async fn fetch_planets(&self, observer: &Observer) -> Result<Vec<CelestialTarget>, FeedError> {
        let queries = SOLAR_SYSTEM_BODIES
            .iter()
            .map(|(id, name)| async move { (*name, self.query_body(id, observer).await) });

        let mut targets = Vec::new();
        for (name, result) in join_all(queries).await {
            match result {
                Ok(Some(row)) => {
                    targets.push(Self::build_target(row, name, observer, TargetDetail::Planet))
                }
                Ok(None) => log::debug!("no ephemeris row for {name}"),
                Err(e) => log::warn!("failed to fetch ephemeris for {name}: {e}"),
            }
        }
        Ok(targets)
    }

    /// Fetch the minor-body watch list. Same soft-failure behavior as
    /// `fetch_planets`; the ranking engine decides the above-horizon
    /// fallback.
    pub async fn fetch_minor_bodies(&self, observer: &Observer) -> Result<Vec<CelestialTarget>, FeedError> {
        let queries = MINOR_BODIES
            .iter()
            .map(|(id, name, class)| async move { (*name, *class, self.query_body(id, observer).await) });

        let mut targets = Vec::new();
        for (name, class, result) in join_all(queries).await {
            match result {
                Ok(Some(row)) => targets.push(Self::build_target(
                    row,
                    name,
                    observer,
                    TargetDetail::MinorBody {
                        class: class.to_string(),
                        description: minor_body_description(class),
                        live: true,
                    },
                )),
                Ok(None) => log::debug!("no ephemeris row for {name}"),
                Err(e) => log::warn!("failed to fetch ephemeris for {name}: {e}"),
            }
        }
        Ok(targets)
    }
}

pub fn minor_body_description(class: &str) -> String {
    match class {
        "Dwarf Planet" => "Dwarf planet in the solar system".to_string(),
        "Asteroid" => "Asteroid in the solar system".to_string(),
        "Comet" => "Icy body with characteristic tail when near the Sun".to_string(),
        _ => "Interesting celestial object".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
API VERSION: 1.2\n\
$$SOE\n\
2024-Mar-01 18:30   90.12345  15.67890  210.5  45.2\n\
$$EOE\n";

    #[test]
    fn parses_first_data_row() {
        let row = parse_ephemeris(SAMPLE).unwrap();
        assert!((row.equatorial.ra_hours - 90.12345 / 15.0).abs() < 1e-9);
        assert!((row.equatorial.dec_deg - 15.6789).abs() < 1e-9);
        let h = row.horizontal.unwrap();
        assert!((h.azimuth_deg - 210.5).abs() < 1e-9);
        assert!((h.altitude_deg - 45.2).abs() < 1e-9);
    }

    #[test]
    fn four_token_row_has_no_horizontal() {
        let text = "$$SOE\n2024-Mar-01 18:30 120.0 -5.5\n$$EOE\n";
        let row = parse_ephemeris(text).unwrap();
        assert!(row.horizontal.is_none());
        assert!((row.equatorial.ra_hours - 8.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_text_without_markers() {
        assert_eq!(parse_ephemeris("no ephemeris here"), None);
    }

    #[test]
    fn rejects_empty_block() {
        assert_eq!(parse_ephemeris("$$SOE\n$$EOE\n"), None);
    }

    #[test]
    fn rejects_unparseable_tokens() {
        let text = "$$SOE\n2024-Mar-01 18:30 n/a n/a\n$$EOE\n";
        assert_eq!(parse_ephemeris(text), None);
    }

    #[test]
    fn skips_indented_lines() {
        let text = "$$SOE\n   continuation line with words\n2024-Mar-01 18:30 45.0 10.0\n$$EOE\n";
        let row = parse_ephemeris(text).unwrap();
        assert!((row.equatorial.ra_hours - 3.0).abs() < 1e-9);
    }

    #[test]
    fn parse_is_idempotent() {
        assert_eq!(parse_ephemeris(SAMPLE), parse_ephemeris(SAMPLE));
    }

    #[test]
    fn ra_wraps_into_range() {
        let text = "$$SOE\n2024-Mar-01 18:30 359.9 0.0\n$$EOE\n";
        let row = parse_ephemeris(text).unwrap();
        assert!((0.0..24.0).contains(&row.equatorial.ra_hours));
    }
}
