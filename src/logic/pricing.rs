use super::state_prices::{state_price, PriceClass};
use crate::models::units::{bags_for, per_acre};
use crate::models::{
    BagPrice, FertilizerKind, FertilizerLineItem, NutrientSupply, UNVERIFIED_NOTE,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Organic carbon (%) below which a biofertilizer seed treatment is added.
pub const BIOFERTILIZER_OC_THRESHOLD: f64 = 0.75;
const BIOFERTILIZER_KG_PER_HA: f64 = 2.0;
const BIOFERTILIZER_NAME: &str = "Biofertilizer (Rhizobium/Azotobacter)";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceEntry {
    pub price_per_50kg_bag: u32,
    pub npk_composition: String,
    #[serde(default)]
    pub nitrogen_percent: f64,
    #[serde(default)]
    pub phosphorus_percent: f64,
    #[serde(default)]
    pub potassium_percent: f64,
}

impl PriceEntry {
    fn new(price: u32, composition: &str, n: f64, p: f64, k: f64) -> Self {
        Self {
            price_per_50kg_bag: price,
            npk_composition: composition.to_string(),
            nitrogen_percent: n,
            phosphorus_percent: p,
            potassium_percent: k,
        }
    }
}

/// Provenance of the verified price table.
#[derive(Debug, Clone, Copy)]
pub struct PriceSource {
    pub authority: &'static str,
    pub scheme: &'static str,
    pub last_updated: &'static str,
    pub note: &'static str,
    pub website: &'static str,
}

pub const GOVERNMENT_PRICE_SOURCE: PriceSource = PriceSource {
    authority: "Department of Fertilizers, Ministry of Chemicals and Fertilizers, Government of India",
    scheme: "Nutrient Based Subsidy (NBS) Scheme",
    last_updated: "December 2024",
    note: "Prices are indicative retail prices including subsidies and may vary by state and dealer. Urea price is controlled by Government.",
    website: "https://fert.nic.in/",
};

/// Verified prices per 50 kg bag, keyed by base fertilizer name.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceTable {
    entries: BTreeMap<String, PriceEntry>,
    region: Option<String>,
}

/// Line items after repricing.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedItems {
    pub line_items: Vec<FertilizerLineItem>,
    pub total_verified_cost: f64,
    pub biofertilizer_recommended: bool,
}

impl PriceTable {
    pub fn government() -> Self {
        let entries = [
            ("Urea", PriceEntry::new(266, "46-0-0", 46.0, 0.0, 0.0)),
            ("DAP", PriceEntry::new(1350, "18-46-0", 18.0, 46.0, 0.0)),
            ("MOP", PriceEntry::new(1700, "0-0-60", 0.0, 0.0, 60.0)),
            ("NPK 10:26:26", PriceEntry::new(1450, "10-26-26", 10.0, 26.0, 26.0)),
            ("NPK 12:32:16", PriceEntry::new(1500, "12-32-16", 12.0, 32.0, 16.0)),
            ("NPK 17:17:17", PriceEntry::new(1425, "17-17-17", 17.0, 17.0, 17.0)),
            ("NPK 20:20:0:13", PriceEntry::new(1200, "20-20-0-13", 20.0, 20.0, 0.0)),
            ("SSP", PriceEntry::new(450, "0-16-0", 0.0, 16.0, 0.0)),
        ];

        Self {
            entries: entries
                .into_iter()
                .map(|(name, entry)| (name.to_string(), entry))
                .collect(),
            region: None,
        }
    }

    /// Add or replace entries, e.g. from the config file.
    pub fn with_overrides(mut self, overrides: &BTreeMap<String, PriceEntry>) -> Self {
        for (name, entry) in overrides {
            self.entries.insert(name.clone(), entry.clone());
        }
        self
    }

    /// Copy of this table with state-level bag prices applied. Unknown states
    /// keep the national prices.
    pub fn for_state(&self, state: &str) -> Self {
        let mut table = self.clone();
        let mut applied = false;

        for (name, entry) in table.entries.iter_mut() {
            let Some(class) = price_class(name) else {
                continue;
            };
            if let Some(price) = state_price(state, class) {
                entry.price_per_50kg_bag = price;
                applied = true;
            }
        }

        if applied {
            table.region = Some(state.trim().to_string());
        } else {
            tracing::warn!(state = %state, "No state price data, using national prices");
        }

        table
    }

    pub fn lookup(&self, kind: &FertilizerKind) -> Option<&PriceEntry> {
        self.entries.get(&kind.price_key())
    }

    pub fn entries(&self) -> impl Iterator<Item = (&String, &PriceEntry)> {
        self.entries.iter()
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// Replace rough costs with bag-based verified costs. Returns the total
    /// over verified items only.
    pub fn reprice(&self, line_items: &mut [FertilizerLineItem]) -> f64 {
        let mut total = 0.0;

        for item in line_items.iter_mut() {
            match self.lookup(&item.kind) {
                Some(entry) => {
                    let bags = bags_for(item.quantity_total);
                    item.price_per_50kg_bag = BagPrice::PerBag(entry.price_per_50kg_bag);
                    item.bags_required = Some(bags);
                    item.cost = f64::from(bags) * f64::from(entry.price_per_50kg_bag);
                    item.verified = true;
                    item.note = None;
                    total += item.cost;
                }
                None => {
                    tracing::info!(
                        product = %item.product_name,
                        key = %item.kind.price_key(),
                        "No verified price, excluding from total"
                    );
                    item.price_per_50kg_bag = BagPrice::Unavailable;
                    item.bags_required = None;
                    item.cost = 0.0;
                    item.verified = false;
                    item.note = Some(UNVERIFIED_NOTE.to_string());
                }
            }
        }

        total
    }

    /// Reprice allocated items and append the biofertilizer seed treatment
    /// when organic carbon is known and low.
    pub fn resolve(
        &self,
        mut line_items: Vec<FertilizerLineItem>,
        organic_carbon: Option<f64>,
        field_area_hectares: f64,
    ) -> PricedItems {
        let total_verified_cost = self.reprice(&mut line_items);

        let biofertilizer_recommended =
            organic_carbon.is_some_and(|oc| oc < BIOFERTILIZER_OC_THRESHOLD);
        if biofertilizer_recommended {
            line_items.push(biofertilizer_item(field_area_hectares));
        }

        PricedItems {
            line_items,
            total_verified_cost,
            biofertilizer_recommended,
        }
    }
}

impl Default for PriceTable {
    fn default() -> Self {
        Self::government()
    }
}

fn price_class(key: &str) -> Option<PriceClass> {
    match key {
        "Urea" => Some(PriceClass::Urea),
        "DAP" => Some(PriceClass::Dap),
        "MOP" => Some(PriceClass::Mop),
        _ if key.starts_with("NPK") => Some(PriceClass::Npk),
        _ => None,
    }
}

/// Seed-treatment biofertilizer. Never priced.
pub fn biofertilizer_item(field_area_hectares: f64) -> FertilizerLineItem {
    FertilizerLineItem {
        product_name: BIOFERTILIZER_NAME.to_string(),
        kind: FertilizerKind::Biofertilizer,
        quantity_kg_per_hectare: BIOFERTILIZER_KG_PER_HA,
        quantity_kg_per_acre: per_acre(BIOFERTILIZER_KG_PER_HA),
        quantity_total: BIOFERTILIZER_KG_PER_HA * field_area_hectares,
        provides: "Nitrogen fixing, Organic carbon boost".to_string(),
        supplies: NutrientSupply::default(),
        price_per_50kg_bag: BagPrice::Unavailable,
        bags_required: None,
        cost: 0.0,
        verified: false,
        note: Some(UNVERIFIED_NOTE.to_string()),
        application_stage: Some("Seed Treatment".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::allocation::allocate;
    use crate::logic::catalog::FertilizerCatalog;
    use crate::models::{FertilizerProduct, NutrientTarget};

    fn allocated(n: f64, p: f64, k: f64, area: f64) -> Vec<FertilizerLineItem> {
        allocate(
            &FertilizerCatalog::standard(),
            &NutrientTarget::new(n, p, k),
            area,
        )
        .line_items
    }

    fn item_for(name: &str, kg_ha: f64, area: f64) -> FertilizerLineItem {
        let product = FertilizerProduct::from_grade(name, 29.0, 5.0, 5.0, 20.0);
        FertilizerLineItem::new(&product, kg_ha, area, NutrientSupply::default(), "")
    }

    #[test]
    fn reprices_by_whole_bags() {
        let table = PriceTable::government();
        let mut items = allocated(120.0, 60.0, 30.0, 1.0);
        let total = table.reprice(&mut items);

        // DAP 130.43 kg → 3 bags, MOP 50 kg → 1 bag, Urea 209.83 kg → 5 bags
        assert_eq!(items[0].bags_required, Some(3));
        assert_eq!(items[0].cost, 3.0 * 1350.0);
        assert_eq!(items[1].bags_required, Some(1));
        assert_eq!(items[1].cost, 1700.0);
        assert_eq!(items[2].bags_required, Some(5));
        assert_eq!(items[2].cost, 5.0 * 266.0);
        assert_eq!(total, 4050.0 + 1700.0 + 1330.0);
        assert!(items.iter().all(|i| i.verified));
    }

    #[test]
    fn unknown_product_is_unverified() {
        let table = PriceTable::government();
        let mut items = vec![item_for("NPK 29-5-5", 100.0, 1.0)];
        let total = table.reprice(&mut items);

        assert_eq!(total, 0.0);
        assert_eq!(items[0].price_per_50kg_bag, BagPrice::Unavailable);
        assert_eq!(items[0].cost, 0.0);
        assert!(!items[0].verified);
        assert_eq!(items[0].note.as_deref(), Some(UNVERIFIED_NOTE));
    }

    #[test]
    fn total_equals_sum_of_verified_costs() {
        let table = PriceTable::government();
        let mut items = allocated(90.0, 40.0, 20.0, 3.2);
        items.push(item_for("NPK 29-5-5", 80.0, 3.2));
        items.push(item_for("NPK 10-26-26", 80.0, 3.2));
        let total = table.reprice(&mut items);

        let verified_sum: f64 = items.iter().filter(|i| i.verified).map(|i| i.cost).sum();
        assert_eq!(total, verified_sum);
        assert!(items.iter().filter(|i| !i.verified).all(|i| i.cost == 0.0));
        // catalog grade "10-26-26" matches table key "NPK 10:26:26"
        assert!(items[4].verified);
    }

    #[test]
    fn low_organic_carbon_adds_biofertilizer() {
        let table = PriceTable::government();
        let priced = table.resolve(allocated(100.0, 50.0, 0.0, 2.0), Some(0.4), 2.0);

        assert!(priced.biofertilizer_recommended);
        let bio = priced.line_items.last().unwrap();
        assert_eq!(bio.kind, FertilizerKind::Biofertilizer);
        assert_eq!(bio.quantity_kg_per_hectare, 2.0);
        assert_eq!(bio.quantity_total, 4.0);
        assert_eq!(bio.cost, 0.0);
        assert!(!bio.verified);
        assert_eq!(bio.application_stage.as_deref(), Some("Seed Treatment"));

        let verified_sum: f64 = priced.line_items.iter().filter(|i| i.verified).map(|i| i.cost).sum();
        assert_eq!(priced.total_verified_cost, verified_sum);
    }

    #[test]
    fn biofertilizer_requires_known_low_carbon() {
        let table = PriceTable::government();
        let unknown = table.resolve(allocated(100.0, 0.0, 0.0, 1.0), None, 1.0);
        assert!(!unknown.biofertilizer_recommended);
        assert_eq!(unknown.line_items.len(), 1);

        let adequate = table.resolve(allocated(100.0, 0.0, 0.0, 1.0), Some(0.75), 1.0);
        assert!(!adequate.biofertilizer_recommended);

        let low = table.resolve(Vec::new(), Some(0.74), 1.0);
        assert_eq!(low.line_items.len(), 1);
    }

    #[test]
    fn state_prices_override_national() {
        let national = PriceTable::government();
        let kerala = national.for_state("Kerala");
        assert_eq!(kerala.region(), Some("Kerala"));
        assert_eq!(kerala.lookup(&FertilizerKind::Urea).unwrap().price_per_50kg_bag, 272);
        assert_eq!(kerala.lookup(&FertilizerKind::Dap).unwrap().price_per_50kg_bag, 1370);
        assert_eq!(
            kerala
                .lookup(&FertilizerKind::Npk("17:17:17".into()))
                .unwrap()
                .price_per_50kg_bag,
            1475
        );
        // SSP has no state column
        assert_eq!(kerala.lookup(&FertilizerKind::Ssp).unwrap().price_per_50kg_bag, 450);
    }

    #[test]
    fn unknown_state_keeps_national_prices() {
        let national = PriceTable::government();
        let table = national.for_state("Nowhere");
        assert_eq!(table.region(), None);
        assert_eq!(table, national);
    }

    #[test]
    fn overrides_add_entries() {
        let mut overrides = BTreeMap::new();
        overrides.insert(
            "NPK 29:5:5".to_string(),
            PriceEntry::new(1100, "29-5-5", 29.0, 5.0, 5.0),
        );
        let table = PriceTable::government().with_overrides(&overrides);
        let mut items = vec![item_for("NPK 29-5-5", 100.0, 1.0)];
        assert_eq!(table.reprice(&mut items), 2200.0);
    }
}
