use super::units::{per_acre, serialize_2dp};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Text shown in place of a bag price when the product is not in the
/// verified price table.
pub const PRICE_UNAVAILABLE: &str = "Govt. price not available";

/// Note attached to line items whose price could not be verified.
pub const UNVERIFIED_NOTE: &str = "Price not verified by Govt of India";

/// The nutrient a catalog product is the designated source for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NutrientRole {
    Nitrogen,
    Phosphorus,
    Potassium,
}

impl NutrientRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            NutrientRole::Nitrogen => "nitrogen",
            NutrientRole::Phosphorus => "phosphorus",
            NutrientRole::Potassium => "potassium",
        }
    }
}

impl std::fmt::Display for NutrientRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FertilizerProduct {
    pub name: String,
    pub nitrogen_fraction: f64,
    pub phosphorus_fraction: f64,
    pub potassium_fraction: f64,
    /// Reference retail cost in ₹ per kg, used only for the rough estimate.
    pub reference_cost_per_kg: f64,
}

impl FertilizerProduct {
    /// Build a product from the familiar N-P-K percentage grade.
    pub fn from_grade(name: impl Into<String>, n: f64, p: f64, k: f64, cost_per_kg: f64) -> Self {
        Self {
            name: name.into(),
            nitrogen_fraction: n / 100.0,
            phosphorus_fraction: p / 100.0,
            potassium_fraction: k / 100.0,
            reference_cost_per_kg: cost_per_kg,
        }
    }

    pub fn fraction(&self, role: NutrientRole) -> f64 {
        match role {
            NutrientRole::Nitrogen => self.nitrogen_fraction,
            NutrientRole::Phosphorus => self.phosphorus_fraction,
            NutrientRole::Potassium => self.potassium_fraction,
        }
    }

    pub fn kind(&self) -> FertilizerKind {
        FertilizerKind::from_display_name(&self.name)
    }
}

/// Commercial fertilizer families recognised for price lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FertilizerKind {
    Urea,
    Dap,
    Mop,
    Ssp,
    /// Complex fertilizer with its grade normalised to `a:b:c`.
    Npk(String),
    Biofertilizer,
    Other(String),
}

impl FertilizerKind {
    /// Classify a product display name such as "DAP (Diammonium Phosphate)".
    pub fn from_display_name(name: &str) -> Self {
        let base = name.split('(').next().unwrap_or(name).trim();
        let lower = base.to_lowercase();

        match lower.as_str() {
            "urea" => FertilizerKind::Urea,
            "dap" => FertilizerKind::Dap,
            "mop" => FertilizerKind::Mop,
            "ssp" => FertilizerKind::Ssp,
            _ if lower.starts_with("npk") => {
                FertilizerKind::Npk(normalize_grade(base.get(3..).unwrap_or("").trim()))
            }
            _ if lower.starts_with("biofertilizer") => FertilizerKind::Biofertilizer,
            _ => FertilizerKind::Other(base.to_string()),
        }
    }

    /// Key used in the verified price table.
    pub fn price_key(&self) -> String {
        match self {
            FertilizerKind::Urea => "Urea".to_string(),
            FertilizerKind::Dap => "DAP".to_string(),
            FertilizerKind::Mop => "MOP".to_string(),
            FertilizerKind::Ssp => "SSP".to_string(),
            FertilizerKind::Npk(grade) => format!("NPK {}", grade),
            FertilizerKind::Biofertilizer => "Biofertilizer".to_string(),
            FertilizerKind::Other(name) => name.clone(),
        }
    }
}

fn normalize_grade(grade: &str) -> String {
    grade
        .split(|c: char| c == '-' || c == ':' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(":")
}

/// Price per 50 kg bag, or the unavailable sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BagPrice {
    PerBag(u32),
    Unavailable,
}

impl BagPrice {
    pub fn amount(&self) -> Option<u32> {
        match self {
            BagPrice::PerBag(p) => Some(*p),
            BagPrice::Unavailable => None,
        }
    }
}

impl std::fmt::Display for BagPrice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BagPrice::PerBag(p) => write!(f, "₹{}", p),
            BagPrice::Unavailable => write!(f, "{}", PRICE_UNAVAILABLE),
        }
    }
}

impl Serialize for BagPrice {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            BagPrice::PerBag(p) => serializer.serialize_u32(*p),
            BagPrice::Unavailable => serializer.serialize_str(PRICE_UNAVAILABLE),
        }
    }
}

impl<'de> Deserialize<'de> for BagPrice {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Amount(u32),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Amount(p) => BagPrice::PerBag(p),
            Raw::Text(_) => BagPrice::Unavailable,
        })
    }
}

/// Nutrients (kg/ha) a line item supplies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutrientSupply {
    #[serde(serialize_with = "serialize_2dp")]
    pub nitrogen_kg_ha: f64,
    #[serde(serialize_with = "serialize_2dp")]
    pub phosphorus_kg_ha: f64,
    #[serde(serialize_with = "serialize_2dp")]
    pub potassium_kg_ha: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FertilizerLineItem {
    pub product_name: String,
    pub kind: FertilizerKind,
    #[serde(serialize_with = "serialize_2dp")]
    pub quantity_kg_per_hectare: f64,
    #[serde(serialize_with = "serialize_2dp")]
    pub quantity_kg_per_acre: f64,
    #[serde(serialize_with = "serialize_2dp")]
    pub quantity_total: f64,
    /// Human-readable contribution, e.g. "23.5 kg N + 60.0 kg P₂O₅".
    pub provides: String,
    pub supplies: NutrientSupply,
    pub price_per_50kg_bag: BagPrice,
    pub bags_required: Option<u32>,
    #[serde(serialize_with = "serialize_2dp")]
    pub cost: f64,
    pub verified: bool,
    pub note: Option<String>,
    pub application_stage: Option<String>,
}

impl FertilizerLineItem {
    /// A freshly allocated item carrying only its rough catalog cost.
    pub fn new(
        product: &FertilizerProduct,
        kg_per_hectare: f64,
        field_area_hectares: f64,
        supplies: NutrientSupply,
        provides: impl Into<String>,
    ) -> Self {
        Self {
            product_name: product.name.clone(),
            kind: product.kind(),
            quantity_kg_per_hectare: kg_per_hectare,
            quantity_kg_per_acre: per_acre(kg_per_hectare),
            quantity_total: kg_per_hectare * field_area_hectares,
            provides: provides.into(),
            supplies,
            price_per_50kg_bag: BagPrice::Unavailable,
            bags_required: None,
            cost: kg_per_hectare * product.reference_cost_per_kg,
            verified: false,
            note: None,
            application_stage: None,
        }
    }
}
