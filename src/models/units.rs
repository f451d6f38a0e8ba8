use serde::Serializer;

/// kg/ha multiplied by this gives kg/acre.
pub const KG_PER_HA_TO_KG_PER_ACRE: f64 = 0.4047;

/// Retail fertilizer is sold in 50 kg bags.
pub const BAG_WEIGHT_KG: f64 = 50.0;

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn per_acre(kg_per_hectare: f64) -> f64 {
    kg_per_hectare * KG_PER_HA_TO_KG_PER_ACRE
}

/// Number of whole bags needed to cover `quantity_kg`.
///
/// Bag counts follow the quantity as printed (2 dp), so a computed
/// 50.000000001 kg still buys a single bag.
pub fn bags_for(quantity_kg: f64) -> u32 {
    let printed = round2(quantity_kg.max(0.0));
    (printed / BAG_WEIGHT_KG).ceil() as u32
}

/// Serialize an `f64` rounded to 2 decimal places. Internal values keep
/// full precision; rounding happens only on the way out.
pub fn serialize_2dp<S>(value: &f64, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_f64(round2(*value))
}
