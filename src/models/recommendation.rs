use super::fertilizer::FertilizerLineItem;
use super::improvement::SoilImprovement;
use super::schedule::{ApplicationStage, Crop};
use super::soil::NutrientTarget;
use super::units::serialize_2dp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NutrientBand {
    Low,
    Moderate,
    High,
}

impl NutrientBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            NutrientBand::Low => "LOW",
            NutrientBand::Moderate => "MODERATE",
            NutrientBand::High => "HIGH",
        }
    }
}

impl std::fmt::Display for NutrientBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhBand {
    Acidic,
    Neutral,
    Alkaline,
}

impl PhBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhBand::Acidic => "ACIDIC",
            PhBand::Neutral => "NEUTRAL",
            PhBand::Alkaline => "ALKALINE",
        }
    }
}

impl std::fmt::Display for PhBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Banded reading of the soil test that drives the narrative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoilAssessment {
    pub nitrogen: NutrientBand,
    pub phosphorus: NutrientBand,
    pub potassium: NutrientBand,
    pub ph: PhBand,
    pub high_salinity: bool,
}

/// Totals across the allocated (non-biofertilizer) products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FertilizerSummary {
    pub fertilizer_names: String,
    #[serde(serialize_with = "serialize_2dp")]
    pub total_kg_per_hectare: f64,
    #[serde(serialize_with = "serialize_2dp")]
    pub total_kg_per_acre: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub crop_name: String,
    pub crop: Crop,
    pub season: String,
    pub nutrient_target: NutrientTarget,
    pub field_area_hectares: f64,
    pub line_items: Vec<FertilizerLineItem>,
    pub summary: FertilizerSummary,
    #[serde(serialize_with = "serialize_2dp")]
    pub rough_cost_estimate: f64,
    #[serde(serialize_with = "serialize_2dp")]
    pub total_verified_cost: f64,
    pub application_timing: String,
    pub application_method: String,
    pub soil_assessment: SoilAssessment,
    pub soil_improvements: Vec<SoilImprovement>,
    pub application_schedule: Vec<ApplicationStage>,
    pub biofertilizer_recommended: bool,
    pub weather_advisory: Option<String>,
    pub reasoning: String,
    pub predictor: String,
    pub created_at: DateTime<Utc>,
}

impl Recommendation {
    pub fn verified_items(&self) -> impl Iterator<Item = &FertilizerLineItem> {
        self.line_items.iter().filter(|item| item.verified)
    }

    pub fn unverified_items(&self) -> impl Iterator<Item = &FertilizerLineItem> {
        self.line_items.iter().filter(|item| !item.verified)
    }
}
