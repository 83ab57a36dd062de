use std::cmp::Ordering;

use serde::Deserialize;

use crate::astro::{self, Equatorial, ZenithFrame};
use crate::target::{CelestialTarget, TargetDetail};

/// Tolerances and caps applied when classifying candidates against
/// the zenith. Doubles as the `ranking:` config section.
#[derive(Debug, Clone, Deserialize)]
pub struct RankSettings {
    #[serde(default = "default_zenith_tolerance")]
    pub zenith_tolerance_deg: f64,
    #[serde(default = "default_nearby_tolerance")]
    pub nearby_tolerance_deg: f64,
    #[serde(default = "default_satellite_cap")]
    pub satellite_cap: usize,
    #[serde(default = "default_constellation_cap")]
    pub constellation_cap: usize,
    #[serde(default = "default_capped_constellation")]
    pub capped_constellation: String,
    #[serde(default = "default_airplane_cap")]
    pub airplane_cap: usize,
    #[serde(default = "default_planet_cap")]
    pub planet_cap: usize,
    #[serde(default = "default_minor_body_cap")]
    pub minor_body_cap: usize,
}

fn default_zenith_tolerance() -> f64 {
    5.0
}
fn default_nearby_tolerance() -> f64 {
    10.0
}
fn default_satellite_cap() -> usize {
    7
}
fn default_constellation_cap() -> usize {
    3
}
fn default_capped_constellation() -> String {
    "starlink".to_string()
}
fn default_airplane_cap() -> usize {
    20
}
fn default_planet_cap() -> usize {
    15
}
fn default_minor_body_cap() -> usize {
    5
}

impl Default for RankSettings {
    fn default() -> Self {
        Self {
            zenith_tolerance_deg: default_zenith_tolerance(),
            nearby_tolerance_deg: default_nearby_tolerance(),
            satellite_cap: default_satellite_cap(),
            constellation_cap: default_constellation_cap(),
            capped_constellation: default_capped_constellation(),
            airplane_cap: default_airplane_cap(),
            planet_cap: default_planet_cap(),
            minor_body_cap: default_minor_body_cap(),
        }
    }
}

/// Attach the angular distance from the zenith to every candidate
/// that has a resolved position.
pub fn attach_zenith_distances(targets: &mut [CelestialTarget], frame: &ZenithFrame) {
    let zenith = Equatorial {
        ra_hours: frame.ra_hours,
        dec_deg: frame.dec_deg,
    };
    for target in targets {
        target.zenith_distance_deg = target
            .angular_position()
            .map(|position| astro::angular_distance_deg(zenith, position));
    }
}

fn by_zenith_distance(a: &CelestialTarget, b: &CelestialTarget) -> Ordering {
    // Candidates without a distance sink to the end; the stable sort
    // keeps original order among ties.
    match (a.zenith_distance_deg, b.zenith_distance_deg) {
        (Some(da), Some(db)) => da.partial_cmp(&db).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn eligible(target: &CelestialTarget) -> bool {
    target.zenith_distance_deg.is_some() && target.is_above_horizon()
}

/// Split candidates into the at-zenith and nearby sets, each sorted
/// closest-first. Everything beyond the nearby tolerance is excluded
/// here but survives in its per-kind list.
pub fn partition_by_zenith(
    candidates: &[CelestialTarget],
    settings: &RankSettings,
) -> (Vec<CelestialTarget>, Vec<CelestialTarget>) {
    let mut zenith: Vec<CelestialTarget> = Vec::new();
    let mut nearby: Vec<CelestialTarget> = Vec::new();

    for target in candidates.iter().filter(|t| eligible(t)) {
        let distance = target.zenith_distance_deg.unwrap_or(f64::MAX);
        if distance <= settings.zenith_tolerance_deg {
            zenith.push(target.clone());
        } else if distance <= settings.nearby_tolerance_deg {
            nearby.push(target.clone());
        }
    }

    zenith.sort_by(by_zenith_distance);
    nearby.sort_by(by_zenith_distance);
    (zenith, nearby)
}

/// Keep the closest satellites while bounding how many members of
/// the configured mega-constellation make the list. Once a cap is
/// hit, further members of that sub-group are skipped but other
/// satellites are still considered.
pub fn filter_satellites(
    satellites: &[CelestialTarget],
    settings: &RankSettings,
) -> Vec<CelestialTarget> {
    let needle = settings.capped_constellation.to_lowercase();
    let mut sorted: Vec<CelestialTarget> =
        satellites.iter().filter(|t| eligible(t)).cloned().collect();
    sorted.sort_by(by_zenith_distance);

    let mut kept = Vec::new();
    let mut constellation_count = 0usize;

    for satellite in sorted {
        let in_constellation =
            !needle.is_empty() && satellite.name.to_lowercase().contains(&needle);

        if in_constellation {
            if constellation_count < settings.constellation_cap {
                constellation_count += 1;
                kept.push(satellite);
            }
        } else {
            kept.push(satellite);
        }

        if kept.len() >= settings.satellite_cap {
            break;
        }
    }

    kept
}

/// Ascending-distance sort plus a display cap; used for the airplane
/// and planet lists, which carry no diversity constraint.
pub fn cap_by_distance(targets: &[CelestialTarget], cap: usize) -> Vec<CelestialTarget> {
    let mut kept: Vec<CelestialTarget> = targets.iter().filter(|t| eligible(t)).cloned().collect();
    kept.sort_by(by_zenith_distance);
    kept.truncate(cap);
    kept
}

/// Minor bodies above the horizon, closest first, capped. When none
/// resolved above the horizon the static reference list is returned
/// instead, tagged non-live so consumers can tell observed entries
/// from background material.
pub fn rank_minor_bodies(
    bodies: &[CelestialTarget],
    settings: &RankSettings,
) -> Vec<CelestialTarget> {
    let ranked = cap_by_distance(bodies, settings.minor_body_cap);
    if !ranked.is_empty() {
        return ranked;
    }

    log::info!("no minor bodies above the horizon, using reference list");
    reference_minor_bodies(settings.minor_body_cap)
}

/// Static descriptive entries used when no live minor-body position
/// resolves. No coordinates: these are not observable right now.
fn reference_minor_bodies(cap: usize) -> Vec<CelestialTarget> {
    let entries: &[(&str, &str, &str)] = &[
        (
            "Ceres",
            "Dwarf Planet",
            "Largest object in the asteroid belt between Mars and Jupiter",
        ),
        (
            "Pluto",
            "Dwarf Planet",
            "Dwarf planet in the Kuiper Belt, formerly the 9th planet",
        ),
        (
            "Eris",
            "Dwarf Planet",
            "Most massive dwarf planet, discovery led to Pluto's reclassification",
        ),
        (
            "Makemake",
            "Dwarf Planet",
            "Trans-Neptunian dwarf planet named after Easter Island deity",
        ),
        (
            "Haumea",
            "Dwarf Planet",
            "Unusually elongated dwarf planet with rings and two moons",
        ),
    ];

    entries
        .iter()
        .take(cap)
        .map(|&(name, class, description)| CelestialTarget {
            name: name.to_string(),
            position: None,
            horizontal: None,
            magnitude: None,
            zenith_distance_deg: None,
            detail: TargetDetail::MinorBody {
                class: class.to_string(),
                description: description.to_string(),
                live: false,
            },
        })
        .collect()
}
