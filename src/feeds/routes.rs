use std::time::Duration;

use futures::future::join_all;
use serde::Deserialize;

use super::error::FeedError;
use crate::target::{CelestialTarget, TargetDetail};

/// ICAO airline prefix to IATA code, for carriers whose transponder
/// callsigns do not match the flight-data service's IATA keys.
const ICAO_TO_IATA: &[(&str, &str)] = &[
    ("IGO", "6E"),
    ("AIC", "AI"),
    ("UAL", "UA"),
    ("DAL", "DL"),
    ("SWA", "WN"),
    ("AAL", "AA"),
    ("AFR", "AF"),
    ("BAW", "BA"),
    ("DLH", "LH"),
    ("KLM", "KL"),
    ("UAE", "EK"),
    ("QTR", "QR"),
    ("SIA", "SQ"),
    ("JAL", "JL"),
    ("ANA", "NH"),
];

/// Approximate IATA flight code for a transponder callsign like
/// `IGO6113`: a 2-3 letter airline prefix, digits, optional suffix
/// letter. Returns `None` for unknown carriers or other shapes.
pub fn extract_iata_from_callsign(callsign: &str) -> Option<String> {
    let prefix_len = callsign
        .chars()
        .take_while(|c| c.is_ascii_uppercase())
        .count();
    if !(2..=3).contains(&prefix_len) {
        return None;
    }

    let (prefix, rest) = callsign.split_at(prefix_len);
    let digits_len = rest.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits_len == 0 {
        return None;
    }

    let suffix = &rest[digits_len..];
    if !(suffix.is_empty() || (suffix.len() == 1 && suffix.chars().all(|c| c.is_ascii_uppercase()))) {
        return None;
    }

    ICAO_TO_IATA
        .iter()
        .find(|(icao, _)| *icao == prefix)
        .map(|(_, iata)| format!("{}{}", iata, &rest[..digits_len]))
}

/// Origin/destination IATA pair resolved for one callsign.
#[derive(Debug, Clone)]
pub struct FlightRoute {
    pub origin: String,
    pub destination: String,
}

#[derive(Debug, Deserialize)]
struct FlightsResponse {
    data: Option<Vec<FlightRecord>>,
}

#[derive(Debug, Deserialize)]
struct FlightRecord {
    departure: Option<Endpoint>,
    arrival: Option<Endpoint>,
}

#[derive(Debug, Deserialize)]
struct Endpoint {
    iata: Option<String>,
}

/// Client for the flight-route lookup service. Optional: without an
/// API key the enrichment step is skipped entirely.
pub struct RouteClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl RouteClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, FeedError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    async fn query(&self, param: &str, value: &str) -> Result<Option<FlightRoute>, FeedError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[("access_key", self.api_key.as_str()), (param, value)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FeedError::Status {
                endpoint: "flight routes",
                status: response.status(),
            });
        }

        let body: FlightsResponse = response.json().await?;
        let record = match body.data.unwrap_or_default().into_iter().next() {
            Some(r) => r,
            None => return Ok(None),
        };

        let origin = record.departure.and_then(|d| d.iata);
        let destination = record.arrival.and_then(|a| a.iata);
        match (origin, destination) {
            (Some(origin), Some(destination)) => Ok(Some(FlightRoute {
                origin,
                destination,
            })),
            _ => Ok(None),
        }
    }

    /// Resolve a route for one callsign: direct ICAO-callsign lookup
    /// first, then the IATA-prefix fallback. All failures collapse to
    /// `None`; enrichment never blocks a scan.
    pub async fn flight_route(&self, callsign: &str) -> Option<FlightRoute> {
        let callsign = callsign.trim();
        if callsign.is_empty() {
            return None;
        }

        match self.query("flight_icao", callsign).await {
            Ok(Some(route)) => return Some(route),
            Ok(None) => {}
            Err(e) => log::debug!("route lookup failed for {callsign}: {e}"),
        }

        if let Some(iata) = extract_iata_from_callsign(callsign) {
            match self.query("flight_iata", &iata).await {
                Ok(Some(route)) => return Some(route),
                Ok(None) => {}
                Err(e) => log::debug!("route lookup failed for {iata}: {e}"),
            }
        }

        None
    }

    /// Fan out route lookups for every airplane with a callsign and
    /// attach whatever resolves. Airplanes without a resolvable route
    /// keep their base data.
    pub async fn enrich_airplanes(&self, airplanes: &mut [CelestialTarget]) {
        let callsigns: Vec<Option<String>> = airplanes
            .iter()
            .map(|target| match &target.detail {
                TargetDetail::Airplane { callsign, .. } if !callsign.trim().is_empty() => {
                    Some(callsign.clone())
                }
                _ => None,
            })
            .collect();

        let lookups = callsigns.iter().map(|maybe| async move {
            match maybe {
                Some(callsign) => self.flight_route(callsign).await,
                None => None,
            }
        });
        let routes = join_all(lookups).await;

        let mut resolved = 0usize;
        for (target, route) in airplanes.iter_mut().zip(routes) {
            if let (
                TargetDetail::Airplane {
                    origin, destination, ..
                },
                Some(route),
            ) = (&mut target.detail, route)
            {
                *origin = Some(route.origin);
                *destination = Some(route.destination);
                resolved += 1;
            }
        }
        log::debug!("resolved routes for {resolved}/{} airplanes", airplanes.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_icao_prefixes() {
        assert_eq!(extract_iata_from_callsign("IGO6113").as_deref(), Some("6E6113"));
        assert_eq!(extract_iata_from_callsign("BAW117").as_deref(), Some("BA117"));
        assert_eq!(extract_iata_from_callsign("UAE12K").as_deref(), Some("EK12"));
    }

    #[test]
    fn rejects_unknown_or_malformed_callsigns() {
        assert_eq!(extract_iata_from_callsign("XYZ999"), None);
        assert_eq!(extract_iata_from_callsign("IGO"), None);
        assert_eq!(extract_iata_from_callsign("igo6113"), None);
        assert_eq!(extract_iata_from_callsign("IGO61A3"), None);
        assert_eq!(extract_iata_from_callsign(""), None);
    }
}
