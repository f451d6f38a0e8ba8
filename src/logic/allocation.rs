use super::catalog::FertilizerCatalog;
use crate::models::{FertilizerLineItem, NutrientRole, NutrientSupply, NutrientTarget};

const APPLICATION_METHOD: &str = "\
**Application Methods:**
- **Broadcasting**: Spread fertilizer evenly before final plowing
- **Drilling**: Place fertilizer in rows 5-7 cm deep alongside seeds
- **Band Placement**: Apply in bands 5 cm away from plant rows
- **Top Dressing**: Broadcast nitrogen fertilizer and irrigate immediately

**Important Notes:**
- Apply fertilizers on moist soil
- Incorporate fertilizers into soil to prevent loss
- Avoid direct contact with seeds
- Irrigate after top dressing to activate nutrients";

/// Output of the greedy allocation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    pub line_items: Vec<FertilizerLineItem>,
    /// Sum of catalog reference costs. Superseded by repricing.
    pub rough_total_cost: f64,
    pub application_timing: String,
    pub application_method: String,
}

/// Map nutrient targets onto straight fertilizers.
///
/// Fixed order: the phosphorus source first (its nitrogen counts toward the
/// N target), then the potassium source, then the nitrogen source for
/// whatever N is still owed. A nutrient requirement of exactly zero emits
/// no line item.
pub fn allocate(
    catalog: &FertilizerCatalog,
    target: &NutrientTarget,
    field_area_hectares: f64,
) -> Allocation {
    let mut line_items = Vec::new();
    let mut n_remaining = target.nitrogen_kg_ha;
    let required_p = target.phosphorus_kg_ha;
    let required_k = target.potassium_kg_ha;

    if required_p > 0.0 {
        let product = catalog.for_role(NutrientRole::Phosphorus);
        let kg_ha = required_p / product.phosphorus_fraction;
        let n_supplied = kg_ha * product.nitrogen_fraction;
        let supplies = NutrientSupply {
            nitrogen_kg_ha: n_supplied,
            phosphorus_kg_ha: required_p,
            potassium_kg_ha: kg_ha * product.potassium_fraction,
        };
        let provides = if n_supplied > 0.0 {
            format!("{:.1} kg N + {:.1} kg P₂O₅", n_supplied, required_p)
        } else {
            format!("{:.1} kg P₂O₅", required_p)
        };

        line_items.push(FertilizerLineItem::new(
            product,
            kg_ha,
            field_area_hectares,
            supplies,
            provides,
        ));
        n_remaining = (n_remaining - n_supplied).max(0.0);
    }

    if required_k > 0.0 {
        let product = catalog.for_role(NutrientRole::Potassium);
        let kg_ha = required_k / product.potassium_fraction;
        let supplies = NutrientSupply {
            nitrogen_kg_ha: 0.0,
            phosphorus_kg_ha: 0.0,
            potassium_kg_ha: required_k,
        };

        line_items.push(FertilizerLineItem::new(
            product,
            kg_ha,
            field_area_hectares,
            supplies,
            format!("{:.1} kg K₂O", required_k),
        ));
    }

    if n_remaining > 0.0 {
        let product = catalog.for_role(NutrientRole::Nitrogen);
        let kg_ha = n_remaining / product.nitrogen_fraction;
        let supplies = NutrientSupply {
            nitrogen_kg_ha: n_remaining,
            phosphorus_kg_ha: 0.0,
            potassium_kg_ha: 0.0,
        };

        line_items.push(FertilizerLineItem::new(
            product,
            kg_ha,
            field_area_hectares,
            supplies,
            format!("{:.1} kg N", n_remaining),
        ));
    }

    let rough_total_cost = line_items.iter().map(|item| item.cost).sum();

    tracing::debug!(
        items = line_items.len(),
        rough_total_cost,
        "Allocated nutrient targets"
    );

    Allocation {
        line_items,
        rough_total_cost,
        application_timing: application_timing(target),
        application_method: APPLICATION_METHOD.to_string(),
    }
}

/// Basal guidance for P/K and the standard three-way N split.
pub fn application_timing(target: &NutrientTarget) -> String {
    let mut timing = Vec::new();

    if target.phosphorus_kg_ha > 0.0 || target.potassium_kg_ha > 0.0 {
        timing.push("**Basal Application** (at sowing/planting): Apply all DAP and MOP");
    }

    if target.nitrogen_kg_ha > 0.0 {
        timing.push("**Basal Application** (at sowing): 25-30% of Urea");
        timing.push("**First Top Dressing** (3-4 weeks after sowing): 35-40% of Urea");
        timing.push("**Second Top Dressing** (6-7 weeks after sowing): 30-35% of Urea");
    }

    timing.join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FertilizerKind;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 0.01
    }

    fn run(n: f64, p: f64, k: f64, area: f64) -> Allocation {
        allocate(
            &FertilizerCatalog::standard(),
            &NutrientTarget::new(n, p, k),
            area,
        )
    }

    #[test]
    fn splits_nitrogen_between_dap_and_urea() {
        let result = run(120.0, 60.0, 30.0, 1.0);
        assert_eq!(result.line_items.len(), 3);

        let dap = &result.line_items[0];
        assert_eq!(dap.kind, FertilizerKind::Dap);
        assert!(approx(dap.quantity_kg_per_hectare, 130.43));
        assert!(approx(dap.supplies.nitrogen_kg_ha, 23.48));
        assert_eq!(dap.provides, "23.5 kg N + 60.0 kg P₂O₅");

        let mop = &result.line_items[1];
        assert_eq!(mop.kind, FertilizerKind::Mop);
        assert!(approx(mop.quantity_kg_per_hectare, 50.0));

        let urea = &result.line_items[2];
        assert_eq!(urea.kind, FertilizerKind::Urea);
        assert!(approx(urea.supplies.nitrogen_kg_ha, 96.52));
        assert!(approx(urea.quantity_kg_per_hectare, 209.83));
    }

    #[test]
    fn quantities_scale_by_acre_and_area() {
        let result = run(0.0, 0.0, 60.0, 2.5);
        let mop = &result.line_items[0];
        assert!(approx(mop.quantity_kg_per_hectare, 100.0));
        assert!(approx(mop.quantity_kg_per_acre, 40.47));
        assert!(approx(mop.quantity_total, 250.0));
        assert!(approx(mop.cost, 1700.0));
    }

    #[test]
    fn zero_requirements_emit_no_items() {
        let result = run(0.0, 0.0, 0.0, 1.0);
        assert!(result.line_items.is_empty());
        assert_eq!(result.rough_total_cost, 0.0);
        assert_eq!(result.application_timing, "");

        let only_k = run(0.0, 0.0, 25.0, 1.0);
        assert_eq!(only_k.line_items.len(), 1);
        assert_eq!(only_k.line_items[0].kind, FertilizerKind::Mop);

        let only_n = run(46.0, 0.0, 0.0, 1.0);
        assert_eq!(only_n.line_items.len(), 1);
        assert!(approx(only_n.line_items[0].quantity_kg_per_hectare, 100.0));
    }

    #[test]
    fn no_item_for_any_zero_nutrient() {
        for (n, p, k) in [
            (0.0, 10.0, 10.0),
            (10.0, 0.0, 10.0),
            (10.0, 10.0, 0.0),
            (0.0, 0.0, 10.0),
        ] {
            let result = run(n, p, k, 1.0);
            let has = |kind: FertilizerKind| result.line_items.iter().any(|i| i.kind == kind);
            assert_eq!(has(FertilizerKind::Dap), p > 0.0);
            assert_eq!(has(FertilizerKind::Mop), k > 0.0);
            if n == 0.0 {
                assert!(!has(FertilizerKind::Urea));
            }
        }
    }

    #[test]
    fn dap_nitrogen_surplus_never_goes_negative() {
        // 100 kg P₂O₅ via DAP supplies ~39 kg N, more than the 10 kg asked for.
        let result = run(10.0, 100.0, 0.0, 1.0);
        assert_eq!(result.line_items.len(), 1);
        assert_eq!(result.line_items[0].kind, FertilizerKind::Dap);
        assert!(result.line_items[0].supplies.nitrogen_kg_ha > 10.0);
    }

    #[test]
    fn contributions_cover_target() {
        let result = run(150.0, 45.0, 40.0, 1.0);
        let n: f64 = result.line_items.iter().map(|i| i.supplies.nitrogen_kg_ha).sum();
        let p: f64 = result.line_items.iter().map(|i| i.supplies.phosphorus_kg_ha).sum();
        let k: f64 = result.line_items.iter().map(|i| i.supplies.potassium_kg_ha).sum();
        assert!(approx(n, 150.0));
        assert!(approx(p, 45.0));
        assert!(approx(k, 40.0));
    }

    #[test]
    fn rough_cost_uses_reference_prices() {
        let result = run(120.0, 60.0, 30.0, 1.0);
        let expected = 130.434_782_6 * 27.0 + 50.0 * 17.0 + 209.829_867_7 * 6.0;
        assert!((result.rough_total_cost - expected).abs() < 0.05);
    }

    #[test]
    fn timing_reflects_nutrients_present() {
        let both = application_timing(&NutrientTarget::new(100.0, 40.0, 0.0));
        assert!(both.starts_with("**Basal Application** (at sowing/planting)"));
        assert!(both.contains("First Top Dressing"));
        assert_eq!(both.split(" | ").count(), 4);

        let pk_only = application_timing(&NutrientTarget::new(0.0, 0.0, 20.0));
        assert_eq!(pk_only.split(" | ").count(), 1);
        assert!(!pk_only.contains("Urea"));

        let n_only = application_timing(&NutrientTarget::new(80.0, 0.0, 0.0));
        assert_eq!(n_only.split(" | ").count(), 3);
    }

    #[test]
    fn method_text_is_constant() {
        let a = run(10.0, 0.0, 0.0, 1.0);
        let b = run(0.0, 20.0, 30.0, 4.0);
        assert_eq!(a.application_method, b.application_method);
        assert!(a.application_method.contains("Band Placement"));
    }
}
