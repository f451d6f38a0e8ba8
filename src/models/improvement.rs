use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImprovementKind {
    AcidicSoil,
    AlkalineSoil,
    HighSalinity,
    LowOrganicMatter,
    ModerateOrganicMatter,
    VeryLowPhosphorus,
    MultipleIssues,
    Maintenance,
}

/// A soil amendment suggestion. Independent of the fertilizer line items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilImprovement {
    pub kind: ImprovementKind,
    pub issue: String,
    pub recommendation: String,
    pub quantity: String,
    pub purpose: String,
    /// Computed dose for amendments whose rate depends on the soil value.
    pub quantity_kg_ha: Option<u32>,
}

impl SoilImprovement {
    pub fn new(
        kind: ImprovementKind,
        issue: impl Into<String>,
        recommendation: impl Into<String>,
        quantity: impl Into<String>,
        purpose: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            issue: issue.into(),
            recommendation: recommendation.into(),
            quantity: quantity.into(),
            purpose: purpose.into(),
            quantity_kg_ha: None,
        }
    }

    pub fn with_dose(mut self, kg_ha: u32) -> Self {
        self.quantity_kg_ha = Some(kg_ha);
        self
    }
}
