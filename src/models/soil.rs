use crate::error::{FertError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Season {
    Kharif,
    Rabi,
    Zaid,
}

impl Season {
    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Kharif => "Kharif",
            Season::Rabi => "Rabi",
            Season::Zaid => "Zaid",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "kharif" | "monsoon" => Some(Season::Kharif),
            "rabi" | "winter" => Some(Season::Rabi),
            "zaid" | "summer" => Some(Season::Zaid),
            _ => None,
        }
    }

    /// Resolve a free-text season, falling back to Kharif.
    pub fn resolve(s: &str) -> Self {
        Self::from_str(s).unwrap_or_else(|| {
            tracing::warn!(season = %s, "Unknown season, using Kharif");
            Season::Kharif
        })
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Laboratory or sensor soil test results.
///
/// Nutrients are in mg/kg, EC in dS/m, moisture and organic carbon in percent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SoilSample {
    pub nitrogen: Option<f64>,
    pub phosphorus: Option<f64>,
    pub potassium: Option<f64>,
    pub ph: Option<f64>,
    pub ec: Option<f64>,
    pub moisture: Option<f64>,
    pub organic_carbon: Option<f64>,
}

/// The four soil values every recommendation requires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoreSoilValues {
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
    pub ph: f64,
}

impl SoilSample {
    /// Check each present value against its accepted range.
    pub fn validate(&self) -> Result<()> {
        check_range("nitrogen", self.nitrogen, 0.0, f64::INFINITY)?;
        check_range("phosphorus", self.phosphorus, 0.0, f64::INFINITY)?;
        check_range("potassium", self.potassium, 0.0, 500.0)?;
        check_range("pH", self.ph, 3.5, 9.5)?;
        check_range("EC", self.ec, 0.0, 20.0)?;
        check_range("moisture", self.moisture, 0.0, 100.0)?;
        check_range("organic carbon", self.organic_carbon, 0.0, 10.0)?;
        Ok(())
    }

    pub fn core(&self) -> Result<CoreSoilValues> {
        match (self.nitrogen, self.phosphorus, self.potassium, self.ph) {
            (Some(nitrogen), Some(phosphorus), Some(potassium), Some(ph)) => Ok(CoreSoilValues {
                nitrogen,
                phosphorus,
                potassium,
                ph,
            }),
            _ => Err(FertError::InvalidData(
                "Soil data must have N, P, K, and pH values for generating recommendations"
                    .into(),
            )),
        }
    }
}

fn check_range(label: &str, value: Option<f64>, min: f64, max: f64) -> Result<()> {
    match value {
        Some(v) if v.is_nan() || v < min || v > max => Err(FertError::InvalidData(format!(
            "{} value {} is outside the accepted range {}-{}",
            label, v, min, max
        ))),
        _ => Ok(()),
    }
}

/// The field a recommendation is generated for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldProfile {
    pub crop_name: String,
    pub season: String,
    pub field_area_hectares: f64,
    pub district: Option<String>,
    pub state: Option<String>,
}

impl FieldProfile {
    pub fn new(crop_name: impl Into<String>, season: impl Into<String>, area: f64) -> Self {
        Self {
            crop_name: crop_name.into(),
            season: season.into(),
            field_area_hectares: area,
            district: None,
            state: None,
        }
    }

    pub fn with_district(mut self, district: impl Into<String>) -> Self {
        self.district = Some(district.into());
        self
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.crop_name.trim().is_empty() {
            return Err(FertError::InvalidData("Crop name is required".into()));
        }
        if self.field_area_hectares <= 0.0 || !self.field_area_hectares.is_finite() {
            return Err(FertError::InvalidData(format!(
                "Field area must be greater than 0 hectares (got {})",
                self.field_area_hectares
            )));
        }
        Ok(())
    }
}

/// Nutrient requirement in kg/ha. N as N, P as P₂O₅, K as K₂O.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NutrientTarget {
    #[serde(serialize_with = "super::units::serialize_2dp")]
    pub nitrogen_kg_ha: f64,
    #[serde(serialize_with = "super::units::serialize_2dp")]
    pub phosphorus_kg_ha: f64,
    #[serde(serialize_with = "super::units::serialize_2dp")]
    pub potassium_kg_ha: f64,
}

impl NutrientTarget {
    /// Negative or NaN inputs are treated as no requirement.
    pub fn new(nitrogen: f64, phosphorus: f64, potassium: f64) -> Self {
        Self {
            nitrogen_kg_ha: non_negative(nitrogen),
            phosphorus_kg_ha: non_negative(phosphorus),
            potassium_kg_ha: non_negative(potassium),
        }
    }
}

fn non_negative(v: f64) -> f64 {
    if v > 0.0 {
        v
    } else {
        0.0
    }
}
