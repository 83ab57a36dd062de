/// Right ascension as `HHh MMm SSs`. Also used for sidereal time,
/// which shares the unit.
pub fn format_ra(ra_hours: f64) -> String {
    let hours = ra_hours.floor();
    let minutes = ((ra_hours - hours) * 60.0).floor();
    let seconds = (((ra_hours - hours) * 60.0 - minutes) * 60.0).floor();
    format!("{:02}h {:02}m {:02}s", hours as u32, minutes as u32, seconds as u32)
}

/// Declination as `±DD° MM' SS"`.
pub fn format_dec(dec_deg: f64) -> String {
    let sign = if dec_deg >= 0.0 { '+' } else { '-' };
    let abs = dec_deg.abs();
    let degrees = abs.floor();
    let arcmin = ((abs - degrees) * 60.0).floor();
    let arcsec = (((abs - degrees) * 60.0 - arcmin) * 60.0).floor();
    format!(
        "{}{:02}\u{00b0} {:02}' {:02}\"",
        sign, degrees as u32, arcmin as u32, arcsec as u32
    )
}
