mod cache;
mod rank;

pub use cache::{Clock, SystemClock, TtlCache};
pub use rank::RankSettings;

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::astro::{self, ZenithFrame};
use crate::config::Config;
use crate::feeds::{
    self, CelestrakClient, CruisingBand, FeedError, HorizonsClient, OpenSkyClient, RouteClient,
};
use crate::observer::Observer;
use crate::target::CelestialTarget;

/// Zenith coordinates formatted for display alongside the raw frame.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FrameDisplay {
    pub ra: String,
    pub dec: String,
    pub lst: String,
}

impl FrameDisplay {
    fn for_frame(frame: &ZenithFrame) -> Self {
        Self {
            ra: astro::format_ra(frame.ra_hours),
            dec: astro::format_dec(frame.dec_deg),
            lst: astro::format_ra(frame.lst_hours),
        }
    }
}

/// The aggregated result of one scan.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SkyReport {
    pub scan_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub observer: Observer,
    pub frame: ZenithFrame,
    pub frame_display: FrameDisplay,
    pub zenith_objects: Vec<CelestialTarget>,
    pub nearby_objects: Vec<CelestialTarget>,
    pub satellites: Vec<CelestialTarget>,
    pub airplanes: Vec<CelestialTarget>,
    pub planets: Vec<CelestialTarget>,
    pub stars: Vec<CelestialTarget>,
    pub minor_bodies: Vec<CelestialTarget>,
}

/// Merge the normalized per-feed lists into the final report. Pure:
/// all fetching and timing out happened before this point.
#[allow(clippy::too_many_arguments)]
pub fn aggregate(
    observer: Observer,
    frame: ZenithFrame,
    mut planets: Vec<CelestialTarget>,
    mut airplanes: Vec<CelestialTarget>,
    mut satellites: Vec<CelestialTarget>,
    mut stars: Vec<CelestialTarget>,
    mut minor_bodies: Vec<CelestialTarget>,
    settings: &RankSettings,
) -> SkyReport {
    rank::attach_zenith_distances(&mut planets, &frame);
    rank::attach_zenith_distances(&mut airplanes, &frame);
    rank::attach_zenith_distances(&mut satellites, &frame);
    rank::attach_zenith_distances(&mut stars, &frame);
    rank::attach_zenith_distances(&mut minor_bodies, &frame);

    let mut candidates: Vec<CelestialTarget> = Vec::new();
    candidates.extend(planets.iter().cloned());
    candidates.extend(airplanes.iter().cloned());
    candidates.extend(satellites.iter().cloned());
    candidates.extend(stars.iter().cloned());
    let (zenith_objects, nearby_objects) = rank::partition_by_zenith(&candidates, settings);

    SkyReport {
        scan_id: Uuid::new_v4(),
        generated_at: observer.timestamp,
        observer,
        frame_display: FrameDisplay::for_frame(&frame),
        frame,
        zenith_objects,
        nearby_objects,
        satellites: rank::filter_satellites(&satellites, settings),
        airplanes: rank::cap_by_distance(&airplanes, settings.airplane_cap),
        planets: rank::cap_by_distance(&planets, settings.planet_cap),
        stars,
        minor_bodies: rank::rank_minor_bodies(&minor_bodies, settings),
    }
}

/// Owns the feed clients, ranking settings and scan cache, and runs
/// the fetch-normalize-rank pipeline for each request.
pub struct Scanner {
    horizons: HorizonsClient,
    celestrak: CelestrakClient,
    opensky: OpenSkyClient,
    routes: Option<RouteClient>,
    settings: RankSettings,
    feed_deadline: Duration,
    cache: TtlCache<SkyReport>,
}

impl Scanner {
    pub fn from_config(config: &Config) -> Result<Self, FeedError> {
        let feeds_cfg = &config.feeds;
        let timeout = feeds_cfg.timeout;

        let horizons = HorizonsClient::new(feeds_cfg.horizons_url.as_str(), timeout)?;
        let celestrak = CelestrakClient::new(
            feeds_cfg.celestrak_url.as_str(),
            feeds_cfg.satellite_groups.clone(),
            feeds_cfg.satellite_fetch_cap,
            timeout,
        )?;
        let opensky = OpenSkyClient::new(
            feeds_cfg.opensky_url.as_str(),
            CruisingBand {
                min_m: feeds_cfg.min_airplane_altitude_m,
                max_m: feeds_cfg.max_airplane_altitude_m,
            },
            config.ranking.airplane_cap,
            timeout,
        )?;
        let routes = match &feeds_cfg.routes_api_key {
            Some(key) if !key.is_empty() => Some(RouteClient::new(
                feeds_cfg.routes_url.as_str(),
                key.as_str(),
                timeout,
            )?),
            _ => {
                log::info!("no route API key configured, skipping flight route enrichment");
                None
            }
        };

        Ok(Self {
            horizons,
            celestrak,
            opensky,
            routes,
            settings: config.ranking.clone(),
            feed_deadline: timeout,
            cache: TtlCache::new(feeds_cfg.cache_ttl),
        })
    }

    /// Run one scan. Feed failures and timeouts degrade their own
    /// category to an empty list; this method itself cannot fail.
    pub async fn scan(&self, observer: Observer) -> SkyReport {
        let frame = ZenithFrame::for_observer(&observer);

        let key = cache::scan_key(&observer, self.cache.ttl());
        if let Some(report) = self.cache.get(&key) {
            log::debug!("serving scan from cache for {key}");
            return report;
        }

        log::info!(
            "scanning sky at ({:.4}, {:.4}), LST {:.4}h",
            observer.latitude_deg,
            observer.longitude_deg,
            frame.lst_hours
        );

        // All remote feeds go out together; the slowest one bounds the
        // scan, not the sum.
        let (planets, mut airplanes, satellites, minor_bodies) = tokio::join!(
            bounded("planets", self.feed_deadline, self.horizons.fetch_planets(&observer)),
            bounded(
                "airplanes",
                self.feed_deadline,
                self.opensky.fetch_airplanes(&observer)
            ),
            bounded(
                "satellites",
                self.feed_deadline,
                self.celestrak.fetch_satellites(&observer)
            ),
            bounded(
                "minor bodies",
                self.feed_deadline,
                self.horizons.fetch_minor_bodies(&observer)
            ),
        );

        let stars = feeds::stars_near_zenith(&frame, &observer, self.settings.nearby_tolerance_deg);

        // Secondary fan-out, only after the airplane list is known.
        // Unresolved routes leave the base data untouched.
        if let Some(routes) = &self.routes {
            if !airplanes.is_empty()
                && tokio::time::timeout(
                    self.feed_deadline,
                    routes.enrich_airplanes(&mut airplanes),
                )
                .await
                .is_err()
            {
                log::warn!("route enrichment timed out, keeping base airplane data");
            }
        }

        let report = aggregate(
            observer,
            frame,
            planets,
            airplanes,
            satellites,
            stars,
            minor_bodies,
            &self.settings,
        );

        log::info!(
            "scan complete: {} at zenith, {} nearby, {} satellites, {} airplanes",
            report.zenith_objects.len(),
            report.nearby_objects.len(),
            report.satellites.len(),
            report.airplanes.len()
        );

        self.cache.insert(key, report.clone());
        report
    }
}

/// Await a feed with a deadline; unavailable or slow feeds degrade to
/// an empty list without disturbing their siblings.
async fn bounded<F>(feed: &str, deadline: Duration, fetch: F) -> Vec<CelestialTarget>
where
    F: Future<Output = Result<Vec<CelestialTarget>, FeedError>>,
{
    match tokio::time::timeout(deadline, fetch).await {
        Ok(Ok(targets)) => targets,
        Ok(Err(e)) => {
            log::warn!("{feed} feed unavailable: {e}");
            Vec::new()
        }
        Err(_) => {
            log::warn!("{feed} feed timed out after {deadline:?}");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::astro::{Equatorial, Horizontal};
    use crate::target::TargetDetail;
    use chrono::TimeZone;

    fn observer() -> Observer {
        let t = Utc.with_ymd_and_hms(2024, 3, 1, 18, 30, 0).unwrap();
        Observer::new(12.8688, 77.6513, 920.0, t).unwrap()
    }

    fn mocked_frame() -> ZenithFrame {
        ZenithFrame {
            ra_hours: 6.0,
            dec_deg: 12.8688,
            lst_hours: 6.0,
            julian_date: 2_460_371.270_833,
        }
    }

    fn sun_at(ra_hours: f64, dec_deg: f64) -> CelestialTarget {
        CelestialTarget {
            name: "Sun".to_string(),
            position: Some(Equatorial { ra_hours, dec_deg }),
            horizontal: Some(Horizontal {
                altitude_deg: 85.0,
                azimuth_deg: 10.0,
            }),
            magnitude: None,
            zenith_distance_deg: None,
            detail: TargetDetail::Planet,
        }
    }

    #[test]
    fn sun_near_zenith_lands_in_zenith_objects() {
        let settings = RankSettings::default();
        let report = aggregate(
            observer(),
            mocked_frame(),
            vec![sun_at(6.0, 15.0)],
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            &settings,
        );

        assert_eq!(report.zenith_objects.len(), 1);
        assert_eq!(report.zenith_objects[0].name, "Sun");
        let distance = report.zenith_objects[0].zenith_distance_deg.unwrap();
        assert!(
            (distance - 2.1312).abs() < 0.01,
            "distance from zenith was {distance}"
        );
        assert!(report.nearby_objects.is_empty());
        // The per-kind planet list carries the same object.
        assert_eq!(report.planets.len(), 1);
    }

    #[test]
    fn categories_degrade_independently() {
        let settings = RankSettings::default();
        let report = aggregate(
            observer(),
            mocked_frame(),
            vec![sun_at(6.0, 15.0)],
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            &settings,
        );

        assert!(report.airplanes.is_empty());
        assert!(report.satellites.is_empty());
        // Minor bodies fall back to the non-live reference list.
        assert_eq!(report.minor_bodies.len(), settings.minor_body_cap);
        assert!(report.minor_bodies.iter().all(|b| b.position.is_none()));
    }

    #[test]
    fn frame_display_strings_are_formatted() {
        let settings = RankSettings::default();
        let report = aggregate(
            observer(),
            mocked_frame(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            &settings,
        );
        assert_eq!(report.frame_display.ra, "06h 00m 00s");
        assert_eq!(report.frame_display.lst, "06h 00m 00s");
        assert!(report.frame_display.dec.starts_with("+12\u{00b0}"));
    }

    #[test]
    fn far_object_excluded_from_ranked_sets_but_kept_per_kind() {
        let settings = RankSettings::default();
        let report = aggregate(
            observer(),
            mocked_frame(),
            vec![sun_at(6.0, 40.0)], // ~27 degrees from zenith
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            &settings,
        );
        assert!(report.zenith_objects.is_empty());
        assert!(report.nearby_objects.is_empty());
        assert_eq!(report.planets.len(), 1);
    }
}
