use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use sgp4::{Constants, Elements};

use super::error::FeedError;
use crate::astro::{self, Horizontal};
use crate::observer::Observer;
use crate::target::{CelestialTarget, TargetDetail};

/// Azimuth/elevation/range of a satellite as seen from the observer.
#[derive(Debug, Clone, Copy)]
pub struct LookAngles {
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
    pub range_km: f64,
}

/// Propagate a TLE to the observer's timestamp and reduce the state
/// vector to look angles (TEME -> ECEF -> ENU).
pub fn look_angles(
    observer: &Observer,
    elements: &Elements,
    constants: &Constants,
    timestamp: DateTime<Utc>,
) -> Result<LookAngles, FeedError> {
    let minutes = elements
        .datetime_to_minutes_since_epoch(&timestamp.naive_utc())
        .map_err(|e| FeedError::Propagation(e.to_string()))?;

    let prediction = constants
        .propagate(minutes)
        .map_err(|e| FeedError::Propagation(e.to_string()))?;

    let sidereal =
        sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&timestamp.naive_utc()));

    let sat_ecef = teme_to_ecef_position(prediction.position, sidereal);
    let sta_ecef = observer.position_ecef_km();

    let dr = [
        sat_ecef[0] - sta_ecef[0],
        sat_ecef[1] - sta_ecef[1],
        sat_ecef[2] - sta_ecef[2],
    ];
    let range_km = (dr[0] * dr[0] + dr[1] * dr[1] + dr[2] * dr[2]).sqrt();

    let enu = ecef_to_enu(dr, observer.lat_rad(), observer.lon_rad());
    let azimuth_deg = enu.0.atan2(enu.1).to_degrees().rem_euclid(360.0);
    let elevation_deg = if range_km > 0.0 {
        (enu.2 / range_km).asin().to_degrees()
    } else {
        0.0
    };

    Ok(LookAngles {
        azimuth_deg,
        elevation_deg,
        range_km,
    })
}

fn teme_to_ecef_position(pos_teme: [f64; 3], gmst: f64) -> [f64; 3] {
    let cos_gmst = gmst.cos();
    let sin_gmst = gmst.sin();
    [
        pos_teme[0] * cos_gmst + pos_teme[1] * sin_gmst,
        -pos_teme[0] * sin_gmst + pos_teme[1] * cos_gmst,
        pos_teme[2],
    ]
}

fn ecef_to_enu(dr: [f64; 3], lat_rad: f64, lon_rad: f64) -> (f64, f64, f64) {
    let sin_lat = lat_rad.sin();
    let cos_lat = lat_rad.cos();
    let sin_lon = lon_rad.sin();
    let cos_lon = lon_rad.cos();

    let east = -sin_lon * dr[0] + cos_lon * dr[1];
    let north = -sin_lat * cos_lon * dr[0] - sin_lat * sin_lon * dr[1] + cos_lat * dr[2];
    let up = cos_lat * cos_lon * dr[0] + cos_lat * sin_lon * dr[1] + sin_lat * dr[2];
    (east, north, up)
}

/// Parse multi-satellite TLE content into (name, line1, line2) blocks.
/// Handles both the 2-line and named 3-line forms.
pub fn parse_multi_tle(content: &str) -> Vec<(Option<String>, String, String)> {
    let lines: Vec<&str> = content
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    let mut result = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if lines[i].starts_with("1 ") && i + 1 < lines.len() && lines[i + 1].starts_with("2 ") {
            result.push((None, lines[i].to_string(), lines[i + 1].to_string()));
            i += 2;
        } else if i + 2 < lines.len()
            && lines[i + 1].starts_with("1 ")
            && lines[i + 2].starts_with("2 ")
        {
            result.push((
                Some(lines[i].to_string()),
                lines[i + 1].to_string(),
                lines[i + 2].to_string(),
            ));
            i += 3;
        } else {
            i += 1; // Skip unknown line
        }
    }

    result
}

/// Client for the TLE catalog service (CelesTrak GP API shape). The
/// heavy lifting after the fetch is done by the `sgp4` propagator.
pub struct CelestrakClient {
    http: reqwest::Client,
    base_url: String,
    groups: Vec<String>,
    fetch_cap: usize,
}

impl CelestrakClient {
    pub fn new(
        base_url: impl Into<String>,
        groups: Vec<String>,
        fetch_cap: usize,
        timeout: Duration,
    ) -> Result<Self, FeedError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            groups,
            fetch_cap,
        })
    }

    async fn fetch_group(&self, group: &str, observer: &Observer) -> Result<Vec<CelestialTarget>, FeedError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[("GROUP", group), ("FORMAT", "TLE")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FeedError::Status {
                endpoint: "celestrak",
                status: response.status(),
            });
        }

        let tle_text = response.text().await?;
        Ok(self.normalize_group(&tle_text, group, observer))
    }

    /// Run every TLE block through the propagator and keep objects
    /// above the horizon. Records that fail to parse or propagate are
    /// skipped so one bad element set cannot poison the group.
    fn normalize_group(&self, tle_text: &str, group: &str, observer: &Observer) -> Vec<CelestialTarget> {
        let mut targets = Vec::new();

        for (name, line1, line2) in parse_multi_tle(tle_text) {
            let elements = match Elements::from_tle(name.clone(), line1.as_bytes(), line2.as_bytes()) {
                Ok(e) => e,
                Err(e) => {
                    log::debug!("skipping unparseable TLE in {group}: {e}");
                    continue;
                }
            };
            let constants = match Constants::from_elements(&elements) {
                Ok(c) => c,
                Err(e) => {
                    log::debug!("skipping TLE with bad elements in {group}: {e}");
                    continue;
                }
            };

            let angles = match look_angles(observer, &elements, &constants, observer.timestamp) {
                Ok(a) => a,
                Err(e) => {
                    log::debug!("propagation failed in {group}: {e}");
                    continue;
                }
            };

            if angles.elevation_deg <= 0.0 {
                continue;
            }

            let horizontal = Horizontal {
                altitude_deg: angles.elevation_deg,
                azimuth_deg: angles.azimuth_deg,
            };
            let position = astro::horizontal_to_equatorial(horizontal, observer);
            let sat_name = name.unwrap_or_else(|| format!("NORAD {}", elements.norad_id));

            targets.push(CelestialTarget {
                name: sat_name,
                position: Some(position),
                horizontal: Some(horizontal),
                magnitude: None,
                zenith_distance_deg: None,
                detail: TargetDetail::Satellite {
                    range_km: angles.range_km,
                    group: group.to_string(),
                },
            });
        }

        targets
    }

    /// Fetch all configured groups. A failing group degrades to empty
    /// while the others are kept. The combined list is ordered by
    /// elevation (highest first) and truncated to the fetch cap.
    pub async fn fetch_satellites(&self, observer: &Observer) -> Result<Vec<CelestialTarget>, FeedError> {
        let fetches = self
            .groups
            .iter()
            .map(|group| async move { (group.as_str(), self.fetch_group(group, observer).await) });

        let mut satellites = Vec::new();
        for (group, result) in join_all(fetches).await {
            match result {
                Ok(targets) => satellites.extend(targets),
                Err(e) => log::warn!("failed to fetch satellite group {group}: {e}"),
            }
        }

        satellites.sort_by(|a, b| {
            let alt_a = a.horizontal.map(|h| h.altitude_deg).unwrap_or(0.0);
            let alt_b = b.horizontal.map(|h| h.altitude_deg).unwrap_or(0.0);
            alt_b.partial_cmp(&alt_a).unwrap_or(std::cmp::Ordering::Equal)
        });
        satellites.truncate(self.fetch_cap);

        Ok(satellites)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_named_tle_block() {
        let text = "\
ISS (ZARYA)
1 25544U 98067A   24061.50000000  .00016717  00000-0  30777-3 0  9993
2 25544  51.6400 208.9163 0006317  69.9862 290.2900 15.49815310436543";
        let blocks = parse_multi_tle(text);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].0.as_deref(), Some("ISS (ZARYA)"));
        assert!(blocks[0].1.starts_with("1 25544"));
    }

    #[test]
    fn parses_bare_two_line_block() {
        let text = "\
1 25544U 98067A   24061.50000000  .00016717  00000-0  30777-3 0  9993
2 25544  51.6400 208.9163 0006317  69.9862 290.2900 15.49815310436543";
        let blocks = parse_multi_tle(text);
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].0.is_none());
    }

    #[test]
    fn skips_junk_between_blocks() {
        let text = "\
-- catalog header --
SAT-A
1 25544U 98067A   24061.50000000  .00016717  00000-0  30777-3 0  9993
2 25544  51.6400 208.9163 0006317  69.9862 290.2900 15.49815310436543
trailing garbage";
        let blocks = parse_multi_tle(text);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].0.as_deref(), Some("SAT-A"));
    }

    #[test]
    fn empty_input_yields_no_blocks() {
        assert!(parse_multi_tle("").is_empty());
    }
}
