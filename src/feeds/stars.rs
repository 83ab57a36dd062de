use crate::astro::{self, Equatorial, ZenithFrame};
use crate::observer::Observer;
use crate::target::{CelestialTarget, TargetDetail};

/// Built-in bright-star catalog: (name, RA hours, Dec degrees,
/// visual magnitude, constellation, spectral type). Covers the
/// naked-eye stars down to roughly magnitude 3.
const CATALOG: &[(&str, f64, f64, f64, &str, &str)] = &[
    ("Sirius", 6.7525, -16.7161, -1.46, "Canis Major", "A1V"),
    ("Canopus", 6.3992, -52.6956, -0.74, "Carina", "A9II"),
    ("Alpha Centauri A", 14.6599, -60.8350, -0.27, "Centaurus", "G2V"),
    ("Arcturus", 14.2610, 19.1825, -0.05, "Boötes", "K1.5III"),
    // Magnitude 0 to 0.5
    ("Vega", 18.6156, 38.7836, 0.03, "Lyra", "A0V"),
    ("Capella", 5.2781, 45.9980, 0.08, "Auriga", "G5III"),
    ("Rigel", 5.2423, -8.2017, 0.13, "Orion", "B8Ia"),
    ("Procyon", 7.6553, 5.2247, 0.34, "Canis Minor", "F5IV"),
    ("Achernar", 1.6285, -57.2367, 0.46, "Eridanus", "B3Vpe"),
    ("Betelgeuse", 5.9195, 7.4070, 0.50, "Orion", "M2Iab"),
    // Magnitude 0.5 to 1.0
    ("Hadar", 14.0637, -60.3730, 0.61, "Centaurus", "B1III"),
    ("Altair", 19.8464, 8.8683, 0.76, "Aquila", "A7V"),
    ("Acrux", 12.4433, -63.0990, 0.77, "Crux", "B0.5IV"),
    ("Aldebaran", 4.5987, 16.5093, 0.85, "Taurus", "K5III"),
    ("Spica", 13.4199, -11.1613, 0.98, "Virgo", "B1V"),
    // Magnitude 1.0 to 1.5
    ("Antares", 16.4901, -26.4320, 1.06, "Scorpius", "M1Ib"),
    ("Pollux", 7.7553, 28.0262, 1.14, "Gemini", "K0III"),
    ("Fomalhaut", 22.9608, -29.6222, 1.16, "Piscis Austrinus", "A3V"),
    ("Deneb", 20.6906, 45.2803, 1.25, "Cygnus", "A2Ia"),
    ("Mimosa", 12.7953, -59.6889, 1.25, "Crux", "B0.5III"),
    ("Regulus", 10.1395, 11.9672, 1.35, "Leo", "B7V"),
    ("Adhara", 6.9771, -28.9720, 1.50, "Canis Major", "B2II"),
    // Magnitude 1.5 to 2.0
    ("Castor", 7.5766, 31.8883, 1.58, "Gemini", "A1V"),
    ("Gacrux", 12.5194, -57.1131, 1.63, "Crux", "M3.5III"),
    ("Bellatrix", 5.4188, 6.3497, 1.64, "Orion", "B2III"),
    ("Shaula", 17.5603, -37.1038, 1.63, "Scorpius", "B1.5IV"),
    ("Elnath", 5.4381, 28.6075, 1.65, "Taurus", "B7III"),
    ("Miaplacidus", 9.2200, -69.7172, 1.68, "Carina", "A1III"),
    ("Alnilam", 5.6036, -1.2019, 1.69, "Orion", "B0Ia"),
    ("Regor", 8.1583, -47.3367, 1.74, "Vela", "WC8"),
    ("Alnair", 22.1372, -46.9611, 1.74, "Grus", "B7IV"),
    ("Alioth", 12.9004, 55.9598, 1.76, "Ursa Major", "A0p"),
    ("Alnitak", 5.6794, -1.9425, 1.77, "Orion", "O9Ib"),
    ("Dubhe", 11.0621, 61.7509, 1.79, "Ursa Major", "K0III"),
    ("Mirfak", 3.4054, 49.8612, 1.79, "Perseus", "F5Ib"),
    ("Wezen", 7.1397, -26.3932, 1.84, "Canis Major", "F8Ia"),
    ("Sargas", 17.6223, -42.9978, 1.87, "Scorpius", "F1II"),
    ("Kaus Australis", 18.4028, -34.3846, 1.85, "Sagittarius", "B9.5III"),
    ("Avior", 8.3753, -59.5097, 1.86, "Carina", "K3II"),
    ("Alkaid", 13.7923, 49.3133, 1.86, "Ursa Major", "B3V"),
    ("Menkalinan", 5.9925, 44.9475, 1.90, "Auriga", "A2IV"),
    ("Atria", 16.8110, -69.0278, 1.92, "Triangulum Australe", "K2IIb-IIIa"),
    ("Alhena", 6.6283, 16.3994, 1.93, "Gemini", "A0IV"),
    ("Peacock", 20.4274, -56.7350, 1.94, "Pavo", "B2IV"),
    ("Alsephina", 2.0970, -51.5164, 1.95, "Hydrus", "A1V"),
    ("Polaris", 2.5301, 89.2641, 1.98, "Ursa Minor", "F7Ib"),
    // Magnitude 2.0 to 2.5
    ("Mirzam", 6.3783, -17.9559, 2.00, "Canis Major", "B1II-III"),
    ("Alphard", 9.4597, -8.6586, 2.00, "Hydra", "K3II-III"),
    ("Hamal", 2.1196, 23.4624, 2.00, "Aries", "K2III"),
    ("Nunki", 18.9210, -26.2967, 2.02, "Sagittarius", "B2.5V"),
    ("Diphda", 0.7265, -17.9867, 2.04, "Cetus", "K0III"),
    ("Mizar", 13.3988, 54.9254, 2.04, "Ursa Major", "A2V"),
    ("Kochab", 14.8451, 74.1555, 2.08, "Ursa Minor", "K4III"),
    ("Saiph", 5.7959, -9.6697, 2.09, "Orion", "B0.5Ia"),
    ("Alpheratz", 0.1398, 29.0905, 2.06, "Andromeda", "A0p"),
    ("Rasalhague", 17.5822, 12.5600, 2.08, "Ophiuchus", "A5III"),
    ("Algol", 3.1362, 40.9557, 2.12, "Perseus", "B8V"),
    ("Denebola", 11.8177, 14.5721, 2.14, "Leo", "A3V"),
    ("Schedar", 0.6751, 56.5373, 2.23, "Cassiopeia", "K0III"),
    ("Naos", 8.0596, -40.0031, 2.25, "Puppis", "O5Ia"),
    ("Izar", 14.7499, 27.0742, 2.37, "Boötes", "K0II-III"),
    ("Enif", 21.7364, 9.8750, 2.39, "Pegasus", "K2Ib"),
    ("Scheat", 23.0628, 28.0828, 2.42, "Pegasus", "M2.5II-III"),
    ("Sabik", 17.1730, -15.7249, 2.43, "Ophiuchus", "A2.5IV"),
    ("Phecda", 11.8971, 53.6948, 2.44, "Ursa Major", "A0V"),
    ("Alderamin", 21.3099, 62.5855, 2.44, "Cepheus", "A7IV-V"),
    ("Aludra", 7.4014, -29.3031, 2.45, "Canis Major", "B5Ia"),
    ("Markab", 23.0794, 15.2053, 2.49, "Pegasus", "B9III"),
    // Magnitude 2.5 to 3.0, selected
    ("Menkar", 3.0379, 4.0897, 2.53, "Cetus", "M1.5III"),
    ("Zubenelgenubi", 14.8479, -16.0417, 2.75, "Libra", "A3IV"),
    ("Acrab", 16.8359, -19.8058, 2.56, "Scorpius", "B0.5V"),
    ("Ankaa", 0.4381, -42.3061, 2.39, "Phoenix", "K0III"),
    ("Merak", 11.0307, 56.3824, 2.37, "Ursa Major", "A1V"),
    ("Eltanin", 17.9434, 51.4889, 2.23, "Draco", "K5III"),
    ("Menkalinen", 5.9925, 44.9475, 2.62, "Auriga", "A1V"),
    ("Caph", 0.1527, 59.1497, 2.27, "Cassiopeia", "F2III-IV"),
    ("Gienah", 12.2634, -17.5419, 2.59, "Corvus", "B8III"),
    ("Muhlifain", 12.6947, -48.9596, 2.69, "Centaurus", "A2IV"),
    ("Aspidiske", 9.2850, -59.2754, 2.76, "Carina", "A8Ib"),
    ("Dschubba", 16.0059, -22.6217, 2.29, "Scorpius", "B0.3IV"),
    ("Kaus Media", 18.3493, -29.8281, 2.70, "Sagittarius", "K2III"),
    ("Algieba", 10.3328, 19.8415, 2.61, "Leo", "K0III"),
    ("Zosma", 11.2358, 20.5236, 2.56, "Leo", "A4V"),
    ("Thuban", 14.0733, 64.3756, 3.65, "Draco", "A0III"),
    ("Alphecca", 15.5781, 26.7147, 2.23, "Corona Borealis", "A0V"),
    ("Unukalhai", 15.7378, 6.4256, 2.63, "Serpens", "K2III"),
    ("Rasalgethi", 17.2446, 14.3903, 3.48, "Hercules", "M5Ib-II"),
    ("Albireo", 19.5125, 27.9597, 3.18, "Cygnus", "K3II"),
    ("Tarazed", 19.7709, 10.6133, 2.72, "Aquila", "K3II"),
    ("Sadalmelik", 22.0964, -0.3199, 2.96, "Aquarius", "G2Ib"),
    ("Sadalsuud", 21.5256, -5.5711, 2.87, "Aquarius", "G0Ib"),
];

/// Catalog stars within `tolerance_deg` of the zenith, closest first.
///
/// The catalog is static, so this is the one feed that is synchronous
/// and cannot fail; an empty result just means no bright star is
/// overhead right now.
pub fn stars_near_zenith(
    frame: &ZenithFrame,
    observer: &Observer,
    tolerance_deg: f64,
) -> Vec<CelestialTarget> {
    let zenith = Equatorial {
        ra_hours: frame.ra_hours,
        dec_deg: frame.dec_deg,
    };

    let mut stars: Vec<CelestialTarget> = CATALOG
        .iter()
        .filter_map(|&(name, ra_hours, dec_deg, magnitude, constellation, spectral_type)| {
            let position = Equatorial {
                ra_hours: astro::wrap_ra_hours(ra_hours),
                dec_deg,
            };
            let distance = astro::angular_distance_deg(zenith, position);
            if distance > tolerance_deg {
                return None;
            }
            Some(CelestialTarget {
                name: name.to_string(),
                position: Some(position),
                horizontal: Some(astro::equatorial_to_horizontal(position, observer)),
                magnitude: Some(magnitude),
                zenith_distance_deg: Some(distance),
                detail: TargetDetail::Star {
                    constellation: constellation.to_string(),
                    spectral_type: spectral_type.to_string(),
                },
            })
        })
        .collect();

    stars.sort_by(|a, b| {
        a.zenith_distance_deg
            .partial_cmp(&b.zenith_distance_deg)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    stars
}
