use crate::error::{FertError, Result};
use crate::models::{FertilizerProduct, NutrientRole};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Names of the products designated as the source for each nutrient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleAssignment {
    pub nitrogen: String,
    pub phosphorus: String,
    pub potassium: String,
}

impl Default for RoleAssignment {
    fn default() -> Self {
        Self {
            nitrogen: "Urea".into(),
            phosphorus: "DAP (Diammonium Phosphate)".into(),
            potassium: "MOP (Muriate of Potash)".into(),
        }
    }
}

/// Read-only product catalog.
///
/// Constructed once at startup. Every role product is checked to carry a
/// non-zero fraction of its nutrient so allocation never divides by zero.
#[derive(Debug, Clone)]
pub struct FertilizerCatalog {
    products: Vec<FertilizerProduct>,
    nitrogen_source: usize,
    phosphorus_source: usize,
    potassium_source: usize,
}

impl FertilizerCatalog {
    pub fn new(products: Vec<FertilizerProduct>, roles: &RoleAssignment) -> Result<Self> {
        let mut seen = HashSet::new();
        for product in &products {
            if product.name.trim().is_empty() {
                return Err(FertError::Catalog("product with empty name".into()));
            }
            if !seen.insert(product.name.as_str()) {
                return Err(FertError::Catalog(format!(
                    "duplicate product '{}'",
                    product.name
                )));
            }
            for role in [
                NutrientRole::Nitrogen,
                NutrientRole::Phosphorus,
                NutrientRole::Potassium,
            ] {
                let fraction = product.fraction(role);
                if !(0.0..=1.0).contains(&fraction) {
                    return Err(FertError::Catalog(format!(
                        "'{}' has {} fraction {} outside 0-1",
                        product.name, role, fraction
                    )));
                }
            }
            let cost = product.reference_cost_per_kg;
            if cost.is_nan() || cost < 0.0 {
                return Err(FertError::Catalog(format!(
                    "'{}' has a negative or missing reference cost",
                    product.name
                )));
            }
        }

        let nitrogen_source = role_index(&products, &roles.nitrogen, NutrientRole::Nitrogen)?;
        let phosphorus_source =
            role_index(&products, &roles.phosphorus, NutrientRole::Phosphorus)?;
        let potassium_source = role_index(&products, &roles.potassium, NutrientRole::Potassium)?;

        tracing::debug!(products = products.len(), "Fertilizer catalog loaded");

        Ok(Self {
            products,
            nitrogen_source,
            phosphorus_source,
            potassium_source,
        })
    }

    /// Common straight and complex fertilizers sold in India, ₹/kg.
    pub fn standard() -> Self {
        let products = vec![
            FertilizerProduct::from_grade("Urea", 46.0, 0.0, 0.0, 6.0),
            FertilizerProduct::from_grade("DAP (Diammonium Phosphate)", 18.0, 46.0, 0.0, 27.0),
            FertilizerProduct::from_grade("MOP (Muriate of Potash)", 0.0, 0.0, 60.0, 17.0),
            FertilizerProduct::from_grade("SSP (Single Super Phosphate)", 0.0, 16.0, 0.0, 8.0),
            FertilizerProduct::from_grade("NPK 10-26-26", 10.0, 26.0, 26.0, 22.0),
            FertilizerProduct::from_grade("NPK 12-32-16", 12.0, 32.0, 16.0, 24.0),
            FertilizerProduct::from_grade("NPK 14-35-14", 14.0, 35.0, 14.0, 25.0),
            FertilizerProduct::from_grade("NPK 17-17-17", 17.0, 17.0, 17.0, 20.0),
            FertilizerProduct::from_grade("NPK 19-19-19", 19.0, 19.0, 19.0, 21.0),
            FertilizerProduct::from_grade("NPK 20-20-0-13", 20.0, 20.0, 0.0, 18.0),
            FertilizerProduct::from_grade("NPK 28-28-0", 28.0, 28.0, 0.0, 23.0),
        ];

        Self {
            products,
            nitrogen_source: 0,
            phosphorus_source: 1,
            potassium_source: 2,
        }
    }

    pub fn for_role(&self, role: NutrientRole) -> &FertilizerProduct {
        let index = match role {
            NutrientRole::Nitrogen => self.nitrogen_source,
            NutrientRole::Phosphorus => self.phosphorus_source,
            NutrientRole::Potassium => self.potassium_source,
        };
        &self.products[index]
    }

    pub fn products(&self) -> &[FertilizerProduct] {
        &self.products
    }
}

impl Default for FertilizerCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn role_index(products: &[FertilizerProduct], name: &str, role: NutrientRole) -> Result<usize> {
    let index = products
        .iter()
        .position(|p| p.name == name)
        .ok_or_else(|| {
            FertError::Catalog(format!("{} source '{}' is not in the catalog", role, name))
        })?;

    if products[index].fraction(role) <= 0.0 {
        return Err(FertError::Catalog(format!(
            "{} source '{}' contains no {}",
            role, name, role
        )));
    }

    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_passes_validation() {
        let standard = FertilizerCatalog::standard();
        let validated =
            FertilizerCatalog::new(standard.products().to_vec(), &RoleAssignment::default())
                .unwrap();
        assert_eq!(validated.products().len(), 11);
        assert_eq!(validated.for_role(NutrientRole::Nitrogen).name, "Urea");
        assert_eq!(
            validated.for_role(NutrientRole::Phosphorus).name,
            standard.for_role(NutrientRole::Phosphorus).name
        );
    }

    #[test]
    fn role_products_have_expected_grades() {
        let catalog = FertilizerCatalog::standard();
        let dap = catalog.for_role(NutrientRole::Phosphorus);
        assert!((dap.nitrogen_fraction - 0.18).abs() < 1e-12);
        assert!((dap.phosphorus_fraction - 0.46).abs() < 1e-12);
        let mop = catalog.for_role(NutrientRole::Potassium);
        assert!((mop.potassium_fraction - 0.60).abs() < 1e-12);
        let urea = catalog.for_role(NutrientRole::Nitrogen);
        assert!((urea.nitrogen_fraction - 0.46).abs() < 1e-12);
    }

    #[test]
    fn standard_names_are_unique() {
        let catalog = FertilizerCatalog::standard();
        let names: HashSet<_> = catalog.products().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names.len(), catalog.products().len());
        assert!(names.contains("NPK 17-17-17"));
        assert!(!names.contains("NPK 29-5-5"));
    }

    #[test]
    fn rejects_role_product_without_its_nutrient() {
        let products = vec![
            FertilizerProduct::from_grade("Urea", 46.0, 0.0, 0.0, 6.0),
            FertilizerProduct::from_grade("DAP", 18.0, 46.0, 0.0, 27.0),
            FertilizerProduct::from_grade("MOP", 0.0, 0.0, 60.0, 17.0),
        ];
        let roles = RoleAssignment {
            nitrogen: "Urea".into(),
            phosphorus: "MOP".into(),
            potassium: "MOP".into(),
        };
        let err = FertilizerCatalog::new(products, &roles).unwrap_err();
        assert!(matches!(err, FertError::Catalog(_)));
    }

    #[test]
    fn rejects_missing_role_product() {
        let products = vec![FertilizerProduct::from_grade("Urea", 46.0, 0.0, 0.0, 6.0)];
        assert!(FertilizerCatalog::new(products, &RoleAssignment::default()).is_err());
    }

    #[test]
    fn rejects_duplicates_and_bad_fractions() {
        let mut products = FertilizerCatalog::standard().products().to_vec();
        products.push(FertilizerProduct::from_grade("Urea", 46.0, 0.0, 0.0, 6.0));
        assert!(FertilizerCatalog::new(products, &RoleAssignment::default()).is_err());

        let mut products = FertilizerCatalog::standard().products().to_vec();
        products.push(FertilizerProduct::from_grade("Bogus", 120.0, 0.0, 0.0, 6.0));
        assert!(FertilizerCatalog::new(products, &RoleAssignment::default()).is_err());
    }
}
