/// Geographic centre of India, used when a district is not listed.
pub const INDIA_CENTER: (f64, f64) = (20.5937, 78.9629);

const DISTRICT_COORDINATES: [(&str, f64, f64); 8] = [
    ("Pune", 18.5204, 73.8567),
    ("Mumbai", 19.0760, 72.8777),
    ("Nagpur", 21.1458, 79.0882),
    ("Nashik", 19.9975, 73.7898),
    ("Amravati", 20.9374, 77.7796),
    ("Delhi", 28.6139, 77.2090),
    ("Ludhiana", 30.9010, 75.8573),
    ("Chandigarh", 30.7333, 76.7794),
];

/// Latitude and longitude for a district name, matched case-insensitively.
pub fn district_coordinates(district: &str) -> Option<(f64, f64)> {
    let district = district.trim();
    DISTRICT_COORDINATES
        .iter()
        .find(|(name, _, _)| name.eq_ignore_ascii_case(district))
        .map(|&(_, lat, lon)| (lat, lon))
}

/// Coordinates for a forecast lookup, falling back to the centre of India.
pub fn location_for(district: Option<&str>) -> (f64, f64) {
    match district {
        Some(name) => district_coordinates(name).unwrap_or_else(|| {
            tracing::debug!(district = %name, "Unknown district, using India centre");
            INDIA_CENTER
        }),
        None => INDIA_CENTER,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_district_is_case_insensitive() {
        assert_eq!(district_coordinates("pune"), Some((18.5204, 73.8567)));
        assert_eq!(district_coordinates(" Ludhiana "), Some((30.9010, 75.8573)));
    }

    #[test]
    fn unknown_district_falls_back_to_centre() {
        assert_eq!(district_coordinates("Atlantis"), None);
        assert_eq!(location_for(Some("Atlantis")), INDIA_CENTER);
        assert_eq!(location_for(None), INDIA_CENTER);
    }
}
