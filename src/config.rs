use std::time::Duration;

use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::scan::RankSettings;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub web: WebConfig,
    pub feeds: FeedsConfig,
    pub ranking: RankSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub bind: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedsConfig {
    pub horizons_url: String,
    pub celestrak_url: String,
    pub opensky_url: String,
    pub routes_url: String,
    /// Route enrichment is skipped entirely when no key is set.
    pub routes_api_key: Option<String>,
    pub satellite_groups: Vec<String>,
    /// How many satellites survive the fetch-side elevation sort
    /// before the ranking engine applies the diversity cap.
    pub satellite_fetch_cap: usize,
    pub min_airplane_altitude_m: f64,
    pub max_airplane_altitude_m: f64,
    /// Per-feed deadline; a feed that misses it degrades to empty.
    #[serde(deserialize_with = "de_duration")]
    pub timeout: Duration,
    #[serde(deserialize_with = "de_duration")]
    pub cache_ttl: Duration,
}

impl Default for FeedsConfig {
    fn default() -> Self {
        Self {
            horizons_url: "https://ssd.jpl.nasa.gov/api/horizons.api".to_string(),
            celestrak_url: "https://celestrak.org/NORAD/elements/gp.php".to_string(),
            opensky_url: "https://opensky-network.org/api/states/all".to_string(),
            routes_url: "https://api.aviationstack.com/v1/flights".to_string(),
            routes_api_key: None,
            satellite_groups: vec![
                "stations".to_string(),
                "visual".to_string(),
                "starlink".to_string(),
                "iridium-NEXT".to_string(),
                "galileo".to_string(),
                "gps-ops".to_string(),
            ],
            satellite_fetch_cap: 15,
            min_airplane_altitude_m: 1000.0,
            max_airplane_altitude_m: 15000.0,
            timeout: Duration::from_secs(10),
            cache_ttl: Duration::from_secs(300),
        }
    }
}

fn de_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    humantime::parse_duration(s.trim()).map_err(serde::de::Error::custom)
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_yields_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.web.bind, "0.0.0.0:8080");
        assert_eq!(config.feeds.timeout, Duration::from_secs(10));
        assert_eq!(config.feeds.cache_ttl, Duration::from_secs(300));
        assert_eq!(config.feeds.satellite_groups.len(), 6);
        assert_eq!(config.ranking.satellite_cap, 7);
    }

    #[test]
    fn durations_parse_human_readable() {
        let yaml = "\
feeds:
  timeout: 8s
  cache_ttl: 2m
ranking:
  zenith_tolerance_deg: 3.5
";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.feeds.timeout, Duration::from_secs(8));
        assert_eq!(config.feeds.cache_ttl, Duration::from_secs(120));
        assert_eq!(config.ranking.zenith_tolerance_deg, 3.5);
        // Unspecified fields keep their defaults.
        assert_eq!(config.ranking.nearby_tolerance_deg, 10.0);
    }

    #[test]
    fn rejects_bad_duration() {
        let yaml = "feeds:\n  timeout: soon\n";
        assert!(serde_yaml::from_str::<Config>(yaml).is_err());
    }
}
