use crate::models::units::per_acre;
use crate::models::{FertilizerKind, FertilizerLineItem, FertilizerSummary};

/// Totals across the allocated products, leaving out the biofertilizer
/// seed treatment.
pub fn summarise(line_items: &[FertilizerLineItem]) -> FertilizerSummary {
    let allocated: Vec<&FertilizerLineItem> = line_items
        .iter()
        .filter(|item| item.kind != FertilizerKind::Biofertilizer)
        .collect();

    let total_kg_per_hectare: f64 = allocated
        .iter()
        .map(|item| item.quantity_kg_per_hectare)
        .sum();

    FertilizerSummary {
        fertilizer_names: allocated
            .iter()
            .map(|item| item.product_name.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        total_kg_per_hectare,
        total_kg_per_acre: per_acre(total_kg_per_hectare),
    }
}

/// Total nutrients delivered by the line items, in kg/ha of N, P₂O₅, K₂O.
pub fn delivered_nutrients(line_items: &[FertilizerLineItem]) -> (f64, f64, f64) {
    line_items.iter().fold((0.0, 0.0, 0.0), |(n, p, k), item| {
        (
            n + item.supplies.nitrogen_kg_ha,
            p + item.supplies.phosphorus_kg_ha,
            k + item.supplies.potassium_kg_ha,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::allocation::allocate;
    use crate::logic::catalog::FertilizerCatalog;
    use crate::logic::pricing::biofertilizer_item;
    use crate::models::NutrientTarget;

    #[test]
    fn summary_skips_biofertilizer() {
        let mut items = allocate(
            &FertilizerCatalog::standard(),
            &NutrientTarget::new(120.0, 60.0, 30.0),
            1.0,
        )
        .line_items;
        items.push(biofertilizer_item(1.0));

        let summary = summarise(&items);
        assert_eq!(
            summary.fertilizer_names,
            "DAP (Diammonium Phosphate), MOP (Muriate of Potash), Urea"
        );
        let expected: f64 = items[..3].iter().map(|i| i.quantity_kg_per_hectare).sum();
        assert!((summary.total_kg_per_hectare - expected).abs() < 1e-9);
        assert!((summary.total_kg_per_acre - expected * 0.4047).abs() < 1e-9);
    }

    #[test]
    fn empty_items_summarise_to_zero() {
        let summary = summarise(&[]);
        assert_eq!(summary.fertilizer_names, "");
        assert_eq!(summary.total_kg_per_hectare, 0.0);
    }

    #[test]
    fn delivered_nutrients_meet_target() {
        let items = allocate(
            &FertilizerCatalog::standard(),
            &NutrientTarget::new(120.0, 60.0, 30.0),
            2.0,
        )
        .line_items;
        let (n, p, k) = delivered_nutrients(&items);
        assert!((n - 120.0).abs() < 1e-6);
        assert!((p - 60.0).abs() < 1e-6);
        assert!((k - 30.0).abs() < 1e-6);
    }
}
