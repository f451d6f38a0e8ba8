use crate::models::{ApplicationStage, Crop};

/// Growth-stage schedule for `crop_name`.
///
/// Stage percentages are fixed per crop; the nutrient totals do not change
/// them and are accepted so callers can pass the full requirement through.
pub fn schedule(crop_name: &str, _total_n: f64, _total_p: f64, _total_k: f64) -> Vec<ApplicationStage> {
    let crop = Crop::from_name(crop_name);
    tracing::debug!(crop = %crop_name, schedule = %crop, "Selected application schedule");
    crop_schedule(crop)
}

pub fn crop_schedule(crop: Crop) -> Vec<ApplicationStage> {
    match crop {
        Crop::Rice => vec![
            ApplicationStage::new(
                "Basal (At transplanting)",
                "Day 0",
                "DAP + MOP",
                100.0,
                "Apply 1 day before transplanting",
            ),
            ApplicationStage::new(
                "First Top Dressing",
                "20-25 days after transplanting",
                "Urea",
                50.0,
                "Apply during active tillering stage",
            ),
            ApplicationStage::new(
                "Second Top Dressing",
                "40-45 days after transplanting",
                "Urea",
                50.0,
                "Apply before panicle initiation",
            ),
        ],
        Crop::Wheat => vec![
            ApplicationStage::new(
                "Basal (At sowing)",
                "Day 0",
                "DAP + MOP + Urea (33%)",
                33.0,
                "Apply with seed drill or broadcast before sowing",
            ),
            ApplicationStage::new(
                "Crown Root Initiation",
                "21 days after sowing",
                "Urea",
                33.0,
                "First irrigation + fertilizer application",
            ),
            ApplicationStage::new(
                "Late Jointing/Booting",
                "40-45 days after sowing",
                "Urea",
                34.0,
                "Second irrigation + final N application",
            ),
        ],
        Crop::Maize => vec![
            ApplicationStage::new(
                "Basal (At sowing)",
                "Day 0",
                "DAP + MOP",
                100.0,
                "Apply 5-7cm below and beside seed",
            ),
            ApplicationStage::new(
                "Knee-High Stage",
                "25-30 days after sowing",
                "Urea",
                50.0,
                "Side dress before first irrigation",
            ),
            ApplicationStage::new(
                "Pre-Tasseling",
                "45-50 days after sowing",
                "Urea",
                50.0,
                "Apply before flowering for good cob development",
            ),
        ],
        Crop::Cotton => vec![
            ApplicationStage::new(
                "Basal (At sowing)",
                "Day 0",
                "DAP + MOP + Urea (25%)",
                25.0,
                "Apply in furrows before sowing",
            ),
            ApplicationStage::new(
                "Square Formation",
                "30-35 days after sowing",
                "Urea",
                37.5,
                "Apply with first irrigation",
            ),
            ApplicationStage::new(
                "Flowering Stage",
                "60-65 days after sowing",
                "Urea",
                37.5,
                "Apply during peak flowering",
            ),
        ],
        Crop::Sugarcane => vec![
            ApplicationStage::new(
                "Basal (At planting)",
                "Day 0",
                "DAP + MOP",
                100.0,
                "Apply in furrows, mix with soil",
            ),
            ApplicationStage::new(
                "Tillering Stage",
                "30-40 days after planting",
                "Urea",
                50.0,
                "Apply and earthing up",
            ),
            ApplicationStage::new(
                "Grand Growth",
                "90-120 days after planting",
                "Urea",
                50.0,
                "Apply before rapid cane elongation",
            ),
        ],
        Crop::Potato => vec![
            ApplicationStage::new(
                "Basal (At planting)",
                "Day 0",
                "DAP + MOP + Urea (33%)",
                33.0,
                "Apply in furrows, cover with soil",
            ),
            ApplicationStage::new(
                "Earthing Up",
                "25-30 days after planting",
                "Urea",
                33.0,
                "Apply and earth up ridges",
            ),
            ApplicationStage::new(
                "Tuber Bulking",
                "45-50 days after planting",
                "Urea + MOP",
                34.0,
                "Final application for tuber development",
            ),
        ],
        Crop::Tomato => vec![
            ApplicationStage::new(
                "Basal (Before transplanting)",
                "Day -1",
                "DAP + MOP",
                100.0,
                "Apply and incorporate into beds",
            ),
            ApplicationStage::new(
                "Vegetative Growth",
                "15-20 days after transplanting",
                "Urea",
                33.0,
                "Apply around plants, avoid stem contact",
            ),
            ApplicationStage::new(
                "Flowering & Fruiting",
                "35-40 days after transplanting",
                "Urea",
                67.0,
                "Split into 2 applications during fruit development",
            ),
        ],
        Crop::General => vec![
            ApplicationStage::new(
                "Basal (At sowing/planting)",
                "Day 0",
                "DAP + MOP",
                100.0,
                "Apply before or at planting",
            ),
            ApplicationStage::new(
                "First Top Dressing",
                "3-4 weeks after planting",
                "Urea",
                50.0,
                "Apply during active vegetative growth",
            ),
            ApplicationStage::new(
                "Second Top Dressing",
                "6-7 weeks after planting",
                "Urea",
                50.0,
                "Apply before flowering/fruiting",
            ),
        ],
    }
}
