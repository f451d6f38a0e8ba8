use crate::models::units::round2;
use crate::models::{
    BagPrice, CoreSoilValues, FertilizerLineItem, NutrientBand, NutrientTarget, PhBand,
    SoilAssessment,
};
use std::fmt::Write;

/// Band thresholds in mg/kg: (low below, moderate below).
const NITROGEN_BANDS: (f64, f64) = (20.0, 30.0);
const PHOSPHORUS_BANDS: (f64, f64) = (15.0, 25.0);
const POTASSIUM_BANDS: (f64, f64) = (15.0, 25.0);
const HIGH_SALINITY_EC: f64 = 2.0;

fn band(value: f64, (low, moderate): (f64, f64)) -> NutrientBand {
    if value < low {
        NutrientBand::Low
    } else if value < moderate {
        NutrientBand::Moderate
    } else {
        NutrientBand::High
    }
}

pub fn ph_band(ph: f64) -> PhBand {
    if ph < 5.5 {
        PhBand::Acidic
    } else if ph > 7.5 {
        PhBand::Alkaline
    } else {
        PhBand::Neutral
    }
}

pub fn assess(core: &CoreSoilValues, ec: Option<f64>) -> SoilAssessment {
    SoilAssessment {
        nitrogen: band(core.nitrogen, NITROGEN_BANDS),
        phosphorus: band(core.phosphorus, PHOSPHORUS_BANDS),
        potassium: band(core.potassium, POTASSIUM_BANDS),
        ph: ph_band(core.ph),
        high_salinity: ec.is_some_and(|ec| ec > HIGH_SALINITY_EC),
    }
}

/// Soil assessment and nutrient target section of the narrative.
pub fn soil_analysis(
    crop: &str,
    season: &str,
    core: &CoreSoilValues,
    ec: Option<f64>,
    assessment: &SoilAssessment,
    target: &NutrientTarget,
) -> String {
    let mut lines = vec![format!("**Soil Analysis for {} ({} season)**\n", crop, season)];

    lines.push(format!(
        "- Nitrogen level ({:.1} mg/kg) is {}. {}",
        core.nitrogen,
        assessment.nitrogen,
        match assessment.nitrogen {
            NutrientBand::Low => "Soil requires significant nitrogen supplementation.",
            NutrientBand::Moderate => "Some nitrogen fertilization recommended.",
            NutrientBand::High => "Minimal nitrogen needed.",
        }
    ));
    lines.push(format!(
        "- Phosphorus level ({:.1} mg/kg) is {}. {}",
        core.phosphorus,
        assessment.phosphorus,
        match assessment.phosphorus {
            NutrientBand::Low => "Adequate P fertilization is critical.",
            NutrientBand::Moderate => "Balanced P application needed.",
            NutrientBand::High => "Maintenance dose sufficient.",
        }
    ));
    lines.push(format!(
        "- Potassium level ({:.1} mg/kg) is {}. {}",
        core.potassium,
        assessment.potassium,
        match assessment.potassium {
            NutrientBand::Low => "K fertilizer essential for crop quality.",
            NutrientBand::Moderate => "Standard K dose recommended.",
            NutrientBand::High => "Reduced K application acceptable.",
        }
    ));
    lines.push(format!(
        "- Soil pH ({:.1}) is {}. {}",
        core.ph,
        assessment.ph,
        match assessment.ph {
            PhBand::Acidic => "Consider liming to improve nutrient availability.",
            PhBand::Alkaline => "May affect phosphorus availability.",
            PhBand::Neutral => "Optimal for nutrient uptake.",
        }
    ));

    if let (true, Some(ec)) = (assessment.high_salinity, ec) {
        lines.push(format!(
            "- Electrical Conductivity ({:.1} dS/m) is HIGH. Saline stress may occur; potassium helps tolerance.",
            ec
        ));
    }

    lines.push("\n**Recommended Nutrients (kg/ha):**".to_string());
    lines.push(format!("- Nitrogen (N): {:.1} kg/ha", target.nitrogen_kg_ha));
    lines.push(format!("- Phosphorus (P₂O₅): {:.1} kg/ha", target.phosphorus_kg_ha));
    lines.push(format!("- Potassium (K₂O): {:.1} kg/ha", target.potassium_kg_ha));

    lines.join("\n")
}

/// Fertilizer section of the narrative. Costs and the total are the repriced
/// whole-bag figures, not the rough catalog estimate, so the text agrees with
/// `total_verified_cost`.
pub fn fertilizer_summary(
    line_items: &[FertilizerLineItem],
    total_verified_cost: f64,
    timing: &str,
    method: &str,
) -> String {
    let mut out = String::from("### Fertilizer Recommendations\n\n");

    for (i, item) in line_items.iter().enumerate() {
        let _ = writeln!(out, "**{}. {}**", i + 1, item.product_name);
        let _ = writeln!(
            out,
            "   - Quantity: {} kg/hectare ({} kg/acre)",
            round2(item.quantity_kg_per_hectare),
            round2(item.quantity_kg_per_acre)
        );
        let _ = writeln!(out, "   - Provides: {}", item.provides);
        if let Some(stage) = &item.application_stage {
            let _ = writeln!(out, "   - Apply as: {}", stage);
        }
        match item.price_per_50kg_bag {
            BagPrice::PerBag(_) => {
                let _ = writeln!(out, "   - Cost: ₹{}\n", round2(item.cost));
            }
            BagPrice::Unavailable => {
                let _ = writeln!(out, "   - Cost: {}\n", item.price_per_50kg_bag);
            }
        }
    }

    let _ = writeln!(
        out,
        "**Total Verified Cost:** ₹{}\n",
        round2(total_verified_cost)
    );
    let _ = writeln!(out, "**Application Timing:**\n{}\n", timing);
    let _ = write!(out, "**Application Method:**\n{}", method);

    out
}
