use serde::{Deserialize, Serialize};

/// Crops with a dedicated application schedule. Everything else is `General`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Crop {
    Rice,
    Wheat,
    Maize,
    Cotton,
    Sugarcane,
    Potato,
    Tomato,
    General,
}

impl Crop {
    /// Case-insensitive substring dispatch, e.g. "Basmati Rice" → Rice.
    /// Checked in a fixed order so "Paddy (Wheat rotation)" resolves to Rice.
    pub fn from_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        let has = |needle: &str| lower.contains(needle);

        if has("rice") || has("paddy") {
            Crop::Rice
        } else if has("wheat") {
            Crop::Wheat
        } else if has("maize") || has("corn") {
            Crop::Maize
        } else if has("cotton") {
            Crop::Cotton
        } else if has("sugarcane") {
            Crop::Sugarcane
        } else if has("potato") {
            Crop::Potato
        } else if has("tomato") {
            Crop::Tomato
        } else {
            Crop::General
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Crop::Rice => "Rice/Paddy",
            Crop::Wheat => "Wheat",
            Crop::Maize => "Maize/Corn",
            Crop::Cotton => "Cotton",
            Crop::Sugarcane => "Sugarcane",
            Crop::Potato => "Potato",
            Crop::Tomato => "Tomato",
            Crop::General => "General",
        }
    }
}

impl std::fmt::Display for Crop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One growth-stage application in a crop schedule.
///
/// `quantity_percent` is the share of the named fertilizer class applied at
/// this stage, not a share of the total N/P/K requirement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationStage {
    pub stage: String,
    pub time: String,
    pub fertilizer: String,
    pub quantity_percent: f64,
    pub note: String,
}

impl ApplicationStage {
    pub fn new(stage: &str, time: &str, fertilizer: &str, quantity_percent: f64, note: &str) -> Self {
        Self {
            stage: stage.to_string(),
            time: time.to_string(),
            fertilizer: fertilizer.to_string(),
            quantity_percent,
            note: note.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crop_from_name_matches_substrings() {
        assert_eq!(Crop::from_name("Basmati Rice"), Crop::Rice);
        assert_eq!(Crop::from_name("PADDY"), Crop::Rice);
        assert_eq!(Crop::from_name("Durum wheat"), Crop::Wheat);
        assert_eq!(Crop::from_name("Sweet Corn"), Crop::Maize);
        assert_eq!(Crop::from_name("maize"), Crop::Maize);
        assert_eq!(Crop::from_name("Bt Cotton"), Crop::Cotton);
        assert_eq!(Crop::from_name("Sugarcane"), Crop::Sugarcane);
        assert_eq!(Crop::from_name("Sweet potato"), Crop::Potato);
        assert_eq!(Crop::from_name("Cherry Tomato"), Crop::Tomato);
    }

    #[test]
    fn unlisted_crops_fall_back_to_general() {
        assert_eq!(Crop::from_name("Onion"), Crop::General);
        assert_eq!(Crop::from_name("Soybean"), Crop::General);
        assert_eq!(Crop::from_name(""), Crop::General);
    }
}
