use crate::models::{ImprovementKind, SoilImprovement};

const TARGET_PH: f64 = 6.5;

/// Soil amendment suggestions from pH, salinity, organic carbon and
/// phosphorus.
///
/// Each rule is checked once, in order. The green manure rule looks at how
/// many suggestions have accumulated by the time it runs, so it must stay
/// after the others. When nothing triggers a single maintenance suggestion
/// is returned.
pub fn advise(
    ph: f64,
    ec: Option<f64>,
    organic_carbon: Option<f64>,
    _nitrogen: Option<f64>,
    phosphorus: Option<f64>,
    _potassium: Option<f64>,
) -> Vec<SoilImprovement> {
    let mut improvements = Vec::new();

    if ph < 5.5 {
        let lime = lime_requirement(ph);
        improvements.push(
            SoilImprovement::new(
                ImprovementKind::AcidicSoil,
                "Acidic Soil (pH < 5.5)",
                "Agricultural Lime (CaCO₃)",
                format!("{} kg/ha", lime),
                "Raise pH to neutral range (6.0-7.0), improve nutrient availability",
            )
            .with_dose(lime),
        );
    } else if ph > 7.5 {
        let gypsum = gypsum_requirement(ph);
        improvements.push(
            SoilImprovement::new(
                ImprovementKind::AlkalineSoil,
                "Alkaline Soil (pH > 7.5)",
                "Gypsum (CaSO₄·2H₂O)",
                format!("{} kg/ha", gypsum),
                "Lower pH, improve phosphorus availability, reduce sodicity",
            )
            .with_dose(gypsum),
        );
    }

    if ec.is_some_and(|ec| ec > 2.0) {
        improvements.push(SoilImprovement::new(
            ImprovementKind::HighSalinity,
            "High Salinity (EC > 2.0 dS/m)",
            "Gypsum + Leaching",
            "500-750 kg/ha + 7.5cm irrigation",
            "Displace sodium, improve soil structure, leach excess salts",
        ));
    }

    match organic_carbon {
        Some(oc) if oc < 0.5 => improvements.push(SoilImprovement::new(
            ImprovementKind::LowOrganicMatter,
            "Low Organic Matter (OC < 0.5%)",
            "Farmyard Manure (FYM) or Compost",
            "8-10 tonnes/ha",
            "Improve soil structure, water retention, microbial activity",
        )),
        Some(oc) if oc < 0.75 => improvements.push(SoilImprovement::new(
            ImprovementKind::ModerateOrganicMatter,
            "Moderate Organic Matter",
            "Farmyard Manure (FYM) or Vermicompost",
            "5-7 tonnes/ha",
            "Maintain soil health, enhance nutrient cycling",
        )),
        _ => {}
    }

    if phosphorus.is_some_and(|p| p < 10.0) {
        improvements.push(SoilImprovement::new(
            ImprovementKind::VeryLowPhosphorus,
            "Very Low Phosphorus",
            "Rock Phosphate or Bone Meal",
            "300-400 kg/ha",
            "Long-term P availability, especially in acidic soils",
        ));
    }

    if improvements.len() >= 2 {
        improvements.push(SoilImprovement::new(
            ImprovementKind::MultipleIssues,
            "Multiple Soil Health Issues",
            "Green Manure (Dhaincha/Sunhemp)",
            "20-25 kg seed/ha",
            "Add organic matter, fix nitrogen, break pest cycles",
        ));
    }

    if improvements.is_empty() {
        improvements.push(SoilImprovement::new(
            ImprovementKind::Maintenance,
            "Soil Health Maintenance",
            "Farmyard Manure (FYM)",
            "3-5 tonnes/ha",
            "Maintain optimal soil conditions, sustained productivity",
        ));
    }

    improvements
}

/// Agricultural lime in kg/ha: 1000 kg per pH unit below 6.5, truncated to
/// whole kilograms and kept within 500-3000.
pub fn lime_requirement(ph: f64) -> u32 {
    let increase = TARGET_PH - ph;
    if increase <= 0.0 {
        return 0;
    }
    (increase * 1000.0).trunc().clamp(500.0, 3000.0) as u32
}

/// Gypsum in kg/ha for alkaline soils.
pub fn gypsum_requirement(ph: f64) -> u32 {
    if ph <= 7.5 {
        0
    } else if ph > 8.5 {
        750
    } else if ph > 8.0 {
        500
    } else {
        350
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(items: &[SoilImprovement]) -> Vec<ImprovementKind> {
        items.iter().map(|i| i.kind).collect()
    }

    #[test]
    fn acidic_soil_gets_lime() {
        let result = advise(5.0, None, None, None, None, None);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].kind, ImprovementKind::AcidicSoil);
        assert_eq!(result[0].quantity_kg_ha, Some(1500));
        assert_eq!(result[0].quantity, "1500 kg/ha");
    }

    #[test]
    fn lime_is_clamped() {
        assert_eq!(lime_requirement(6.2), 500);
        assert_eq!(lime_requirement(3.0), 3000);
        assert_eq!(lime_requirement(7.0), 0);
    }

    #[test]
    fn lime_truncates_fractional_kilograms() {
        // (6.5 - 5.4) * 1000 is 1099.9999999999995 in f64
        assert_eq!(lime_requirement(5.4), 1099);
        assert_eq!(lime_requirement(5.3995), 1100);
        assert_eq!(lime_requirement(4.2345), 2265);
    }

    #[test]
    fn gypsum_tiers() {
        assert_eq!(gypsum_requirement(8.8), 750);
        assert_eq!(gypsum_requirement(8.5), 500);
        assert_eq!(gypsum_requirement(8.2), 500);
        assert_eq!(gypsum_requirement(8.0), 350);
        assert_eq!(gypsum_requirement(7.6), 350);
        assert_eq!(gypsum_requirement(7.5), 0);

        let result = advise(8.8, None, None, None, None, None);
        assert_eq!(result[0].kind, ImprovementKind::AlkalineSoil);
        assert_eq!(result[0].quantity_kg_ha, Some(750));
    }

    #[test]
    fn neutral_soil_gets_maintenance_only() {
        let result = advise(6.8, Some(0.5), Some(0.9), Some(30.0), Some(20.0), Some(30.0));
        assert_eq!(kinds(&result), vec![ImprovementKind::Maintenance]);
    }

    #[test]
    fn organic_carbon_bands() {
        let low = advise(6.8, None, Some(0.3), None, None, None);
        assert_eq!(kinds(&low), vec![ImprovementKind::LowOrganicMatter]);

        let moderate = advise(6.8, None, Some(0.5), None, None, None);
        assert_eq!(kinds(&moderate), vec![ImprovementKind::ModerateOrganicMatter]);

        let adequate = advise(6.8, None, Some(0.75), None, None, None);
        assert_eq!(kinds(&adequate), vec![ImprovementKind::Maintenance]);
    }

    #[test]
    fn two_issues_add_green_manure_last() {
        let result = advise(5.0, Some(2.5), None, None, None, None);
        assert_eq!(
            kinds(&result),
            vec![
                ImprovementKind::AcidicSoil,
                ImprovementKind::HighSalinity,
                ImprovementKind::MultipleIssues,
            ]
        );
    }

    #[test]
    fn single_issue_has_no_green_manure() {
        let result = advise(6.8, Some(3.0), None, None, None, None);
        assert_eq!(kinds(&result), vec![ImprovementKind::HighSalinity]);
    }

    #[test]
    fn evaluation_order_is_fixed() {
        let result = advise(8.3, Some(2.2), Some(0.4), Some(10.0), Some(6.0), Some(10.0));
        assert_eq!(
            kinds(&result),
            vec![
                ImprovementKind::AlkalineSoil,
                ImprovementKind::HighSalinity,
                ImprovementKind::LowOrganicMatter,
                ImprovementKind::VeryLowPhosphorus,
                ImprovementKind::MultipleIssues,
            ]
        );
    }

    #[test]
    fn advice_is_idempotent() {
        let first = advise(5.2, Some(2.1), Some(0.6), Some(12.0), Some(8.0), Some(40.0));
        let second = advise(5.2, Some(2.1), Some(0.6), Some(12.0), Some(8.0), Some(40.0));
        assert_eq!(first, second);
    }
}
