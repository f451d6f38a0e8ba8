use crate::db::RecommendationRecord;
use crate::logic::calculations::delivered_nutrients;
use crate::logic::pricing::GOVERNMENT_PRICE_SOURCE;
use crate::logic::PriceTable;
use crate::models::units::round2;
use crate::models::{ApplicationStage, NutrientTarget, Recommendation, SoilImprovement};
use std::fmt::Write;

/// Terminal report for a full recommendation.
pub fn recommendation(rec: &Recommendation) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Fertilizer plan: {} ({}), {} ha",
        rec.crop_name,
        rec.season,
        round2(rec.field_area_hectares)
    );
    let _ = writeln!(out, "{}", "=".repeat(60));
    out.push_str(&nutrient_target(&rec.nutrient_target));

    let _ = writeln!(out, "\nProducts");
    for (i, item) in rec.line_items.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {}. {:<40} {:>8} kg/ha {:>8} kg total",
            i + 1,
            item.product_name,
            round2(item.quantity_kg_per_hectare),
            round2(item.quantity_total)
        );
        let price = match (item.bags_required, item.price_per_50kg_bag.amount()) {
            (Some(bags), Some(per_bag)) => {
                format!("{} bag(s) at ₹{} = ₹{}", bags, per_bag, round2(item.cost))
            }
            _ => item.price_per_50kg_bag.to_string(),
        };
        let _ = writeln!(out, "     {} | {}", item.provides, price);
        if let Some(note) = &item.note {
            let _ = writeln!(out, "     note: {}", note);
        }
    }
    let _ = writeln!(
        out,
        "  Total: {} kg/ha ({} kg/acre)",
        round2(rec.summary.total_kg_per_hectare),
        round2(rec.summary.total_kg_per_acre)
    );
    let (n, p, k) = delivered_nutrients(&rec.line_items);
    let _ = writeln!(
        out,
        "  Delivers (kg/ha): N {}  P₂O₅ {}  K₂O {}",
        round2(n),
        round2(p),
        round2(k)
    );
    let _ = writeln!(
        out,
        "  Verified cost: ₹{} over {} item(s)   (catalog estimate ₹{})",
        round2(rec.total_verified_cost),
        rec.verified_items().count(),
        round2(rec.rough_cost_estimate)
    );
    let unpriced = rec.unverified_items().count();
    if unpriced > 0 {
        let _ = writeln!(out, "  {} item(s) without a verified price", unpriced);
    }

    let _ = writeln!(out, "\nTiming");
    for part in rec.application_timing.split(" | ") {
        let _ = writeln!(out, "  - {}", part.replace("**", ""));
    }

    out.push('\n');
    out.push_str(&schedule(&rec.application_schedule));
    out.push('\n');
    out.push_str(&improvements(&rec.soil_improvements));

    if let Some(advice) = &rec.weather_advisory {
        let _ = writeln!(out, "\nWeather");
        for part in advice.split(" | ") {
            let _ = writeln!(out, "  - {}", part);
        }
    }

    out
}

pub fn nutrient_target(target: &NutrientTarget) -> String {
    format!(
        "Nutrient target (kg/ha): N {}  P₂O₅ {}  K₂O {}\n",
        round2(target.nitrogen_kg_ha),
        round2(target.phosphorus_kg_ha),
        round2(target.potassium_kg_ha)
    )
}

pub fn schedule(stages: &[ApplicationStage]) -> String {
    let mut out = String::from("Schedule\n");
    for stage in stages {
        let _ = writeln!(
            out,
            "  {:<30} {:<32} {} ({}%)",
            stage.stage, stage.time, stage.fertilizer, stage.quantity_percent
        );
        let _ = writeln!(out, "  {:<30} {}", "", stage.note);
    }
    out
}

pub fn improvements(items: &[SoilImprovement]) -> String {
    let mut out = String::from("Soil improvement\n");
    for item in items {
        let _ = writeln!(
            out,
            "  {}: {}, {}",
            item.issue, item.recommendation, item.quantity
        );
        let _ = writeln!(out, "    {}", item.purpose);
    }
    out
}

pub fn price_table(table: &PriceTable) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Verified prices per 50 kg bag ({})",
        table.region().unwrap_or("national")
    );
    for (name, entry) in table.entries() {
        let _ = writeln!(
            out,
            "  {:<16} {:<12} ₹{}",
            name, entry.npk_composition, entry.price_per_50kg_bag
        );
    }
    let _ = writeln!(
        out,
        "\nSource: {}, {} ({})",
        GOVERNMENT_PRICE_SOURCE.authority,
        GOVERNMENT_PRICE_SOURCE.scheme,
        GOVERNMENT_PRICE_SOURCE.last_updated
    );
    let _ = writeln!(out, "{}", GOVERNMENT_PRICE_SOURCE.note);
    out
}

pub fn history(records: &[RecommendationRecord]) -> String {
    if records.is_empty() {
        return "No saved recommendations\n".to_string();
    }

    let mut out = String::new();
    for record in records {
        let rec = &record.recommendation;
        let _ = writeln!(
            out,
            "{:>5}  {}  {:<16} {:<7} {:>6} ha  ₹{}",
            record.id,
            rec.created_at.format("%Y-%m-%d %H:%M"),
            rec.crop_name,
            rec.season,
            round2(rec.field_area_hectares),
            round2(rec.total_verified_cost)
        );
    }
    out
}
