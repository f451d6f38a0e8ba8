pub mod allocation;
pub mod assembler;
pub mod calculations;
pub mod catalog;
pub mod predictor;
pub mod pricing;
pub mod reasoning;
pub mod schedule;
pub mod soil_improvement;
pub mod state_prices;

pub use assembler::{assemble, RecommendationRequest, RecommendationService};
pub use catalog::{FertilizerCatalog, RoleAssignment};
pub use predictor::{NutrientPredictor, ReferencePredictor};
pub use pricing::{PriceEntry, PriceTable};
