use crate::error::Result;
use crate::models::{CoreSoilValues, NutrientTarget, Season, SoilSample};

const DEFAULT_EC: f64 = 1.0;
const DEFAULT_MOISTURE: f64 = 30.0;

/// Inputs to a nutrient requirement model.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionFeatures {
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
    pub ph: f64,
    pub ec: f64,
    pub moisture: f64,
    pub crop: String,
    pub season: Season,
}

impl PredictionFeatures {
    /// Missing EC and moisture take the model's defaults.
    pub fn from_sample(
        core: &CoreSoilValues,
        sample: &SoilSample,
        crop: &str,
        season: &str,
    ) -> Self {
        Self {
            nitrogen: core.nitrogen,
            phosphorus: core.phosphorus,
            potassium: core.potassium,
            ph: core.ph,
            ec: sample.ec.unwrap_or(DEFAULT_EC),
            moisture: sample.moisture.unwrap_or(DEFAULT_MOISTURE),
            crop: crop.to_string(),
            season: Season::resolve(season),
        }
    }
}

/// Predicts N, P₂O₅ and K₂O requirements in kg/ha.
pub trait NutrientPredictor: Send + Sync {
    fn name(&self) -> &'static str;

    fn predict(&self, features: &PredictionFeatures) -> Result<NutrientTarget>;
}

/// Crops the reference model knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModelCrop {
    Rice,
    Wheat,
    Maize,
    Cotton,
    Sugarcane,
    Potato,
    Tomato,
    Onion,
    Soybean,
    Groundnut,
}

impl ModelCrop {
    fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "rice" | "paddy" => Some(ModelCrop::Rice),
            "wheat" => Some(ModelCrop::Wheat),
            "maize" | "corn" => Some(ModelCrop::Maize),
            "cotton" => Some(ModelCrop::Cotton),
            "sugarcane" => Some(ModelCrop::Sugarcane),
            "potato" => Some(ModelCrop::Potato),
            "tomato" => Some(ModelCrop::Tomato),
            "onion" => Some(ModelCrop::Onion),
            "soybean" => Some(ModelCrop::Soybean),
            "groundnut" => Some(ModelCrop::Groundnut),
            _ => None,
        }
    }

    /// Base (N, P₂O₅, K₂O) requirement in kg/ha for a non-deficient soil.
    fn base_requirement(&self) -> (f64, f64, f64) {
        let n = match self {
            ModelCrop::Rice | ModelCrop::Wheat | ModelCrop::Maize => 120.0,
            ModelCrop::Cotton | ModelCrop::Sugarcane => 150.0,
            _ => 80.0,
        };
        let p = match self {
            ModelCrop::Cotton | ModelCrop::Potato | ModelCrop::Tomato => 60.0,
            ModelCrop::Sugarcane => 80.0,
            _ => 40.0,
        };
        let k = match self {
            ModelCrop::Sugarcane | ModelCrop::Potato => 80.0,
            ModelCrop::Cotton | ModelCrop::Wheat => 40.0,
            _ => 30.0,
        };
        (n, p, k)
    }
}

/// Deterministic agronomic reference model.
///
/// Scales each crop's base requirement by the soil deficiency against a
/// reference level, then applies season, pH and salinity adjustments.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferencePredictor;

impl ReferencePredictor {
    pub fn new() -> Self {
        Self
    }
}

fn deficiency_factor(soil_value: f64, reference: f64) -> f64 {
    1.0 + (reference - soil_value).max(0.0) / reference
}

impl NutrientPredictor for ReferencePredictor {
    fn name(&self) -> &'static str {
        "reference"
    }

    fn predict(&self, features: &PredictionFeatures) -> Result<NutrientTarget> {
        let crop = ModelCrop::from_str(&features.crop).unwrap_or_else(|| {
            tracing::warn!(crop = %features.crop, "Unknown crop for prediction, using Rice");
            ModelCrop::Rice
        });
        let (base_n, base_p, base_k) = crop.base_requirement();

        let mut n = base_n * deficiency_factor(features.nitrogen, 40.0);
        let mut p = base_p * deficiency_factor(features.phosphorus, 35.0);
        let mut k = base_k * deficiency_factor(features.potassium, 35.0);

        match features.season {
            Season::Kharif => {
                n *= 1.1;
                p *= 1.05;
            }
            Season::Rabi => p *= 1.1,
            Season::Zaid => {}
        }

        if features.ph < 5.5 || features.ph > 7.5 {
            p *= 1.2;
        }
        if features.ec > 2.0 {
            k *= 1.15;
        }

        tracing::debug!(n, p, k, crop = ?crop, season = %features.season, "Predicted nutrients");

        Ok(NutrientTarget::new(n, p, k))
    }
}
