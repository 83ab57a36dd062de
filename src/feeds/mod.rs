mod celestrak;
mod error;
mod horizons;
mod opensky;
mod routes;
mod stars;

pub use celestrak::CelestrakClient;
pub use error::FeedError;
pub use horizons::HorizonsClient;
pub use opensky::{CruisingBand, OpenSkyClient};
pub use routes::RouteClient;
pub use stars::stars_near_zenith;
