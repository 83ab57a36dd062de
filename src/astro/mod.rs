mod coords;
mod format;
mod geo;
mod time;

pub use coords::{
    angular_distance_deg, equatorial_to_horizontal, horizontal_to_equatorial, wrap_azimuth_deg,
    wrap_ra_hours, Equatorial, Horizontal,
};
pub use format::{format_dec, format_ra};
pub use geo::{bearing_deg, haversine_km};
pub use time::{gmst_hours, julian_date, lst_hours, ZenithFrame};
