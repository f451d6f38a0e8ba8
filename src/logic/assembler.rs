use super::allocation::allocate;
use super::calculations::summarise;
use super::catalog::FertilizerCatalog;
use super::predictor::{NutrientPredictor, PredictionFeatures};
use super::pricing::PriceTable;
use super::reasoning::{assess, fertilizer_summary, soil_analysis};
use super::schedule::schedule;
use super::soil_improvement::advise;
use crate::datasources::{location_for, OpenMeteoClient};
use crate::error::Result;
use crate::models::{
    CoreSoilValues, Crop, FieldProfile, NutrientTarget, Recommendation, Season, SoilSample,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;

/// Soil test plus the field it was taken from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub soil: SoilSample,
    pub field: FieldProfile,
}

impl RecommendationRequest {
    pub fn new(soil: SoilSample, field: FieldProfile) -> Self {
        Self { soil, field }
    }

    /// Range checks plus the N/P/K/pH precondition.
    pub fn validate(&self) -> Result<CoreSoilValues> {
        self.field.validate()?;
        self.soil.validate()?;
        self.soil.core()
    }
}

/// Build a recommendation from an already predicted nutrient target.
///
/// Pure and synchronous: no I/O, no shared state. The weather advisory, if
/// any, has been fetched by the caller.
pub fn assemble(
    catalog: &FertilizerCatalog,
    prices: &PriceTable,
    request: &RecommendationRequest,
    target: NutrientTarget,
    predictor: &str,
    weather_advisory: Option<String>,
) -> Result<Recommendation> {
    let core = request.validate()?;
    let soil = &request.soil;
    let field = &request.field;
    let area = field.field_area_hectares;

    let allocation = allocate(catalog, &target, area);
    let rough_cost_estimate = allocation.rough_total_cost;
    let priced = prices.resolve(allocation.line_items, soil.organic_carbon, area);

    let soil_improvements = advise(
        core.ph,
        soil.ec,
        soil.organic_carbon,
        Some(core.nitrogen),
        Some(core.phosphorus),
        Some(core.potassium),
    );
    let application_schedule = schedule(
        &field.crop_name,
        target.nitrogen_kg_ha,
        target.phosphorus_kg_ha,
        target.potassium_kg_ha,
    );

    let season = Season::from_str(&field.season)
        .map(|s| s.as_str().to_string())
        .unwrap_or_else(|| field.season.trim().to_string());
    let soil_assessment = assess(&core, soil.ec);

    let mut reasoning = soil_analysis(
        &field.crop_name,
        &season,
        &core,
        soil.ec,
        &soil_assessment,
        &target,
    );
    reasoning.push_str("\n\n");
    reasoning.push_str(&fertilizer_summary(
        &priced.line_items,
        priced.total_verified_cost,
        &allocation.application_timing,
        &allocation.application_method,
    ));
    if let Some(advice) = &weather_advisory {
        reasoning.push_str("\n\n**Weather Advisory:** ");
        reasoning.push_str(advice);
    }

    tracing::info!(
        crop = %field.crop_name,
        items = priced.line_items.len(),
        total_verified_cost = priced.total_verified_cost,
        region = prices.region().unwrap_or("national"),
        "Assembled recommendation"
    );

    Ok(Recommendation {
        crop_name: field.crop_name.clone(),
        crop: Crop::from_name(&field.crop_name),
        season,
        nutrient_target: target,
        field_area_hectares: area,
        summary: summarise(&priced.line_items),
        line_items: priced.line_items,
        rough_cost_estimate,
        total_verified_cost: priced.total_verified_cost,
        application_timing: allocation.application_timing,
        application_method: allocation.application_method,
        soil_assessment,
        soil_improvements,
        application_schedule,
        biofertilizer_recommended: priced.biofertilizer_recommended,
        weather_advisory,
        reasoning,
        predictor: predictor.to_string(),
        created_at: Utc::now(),
    })
}

/// Long-lived entry point holding the predictor, catalog and price table.
///
/// Constructed once at startup; all shared state is read-only so one
/// service can serve any number of concurrent requests.
pub struct RecommendationService {
    predictor: Arc<dyn NutrientPredictor>,
    catalog: Arc<FertilizerCatalog>,
    prices: Arc<PriceTable>,
    weather: Option<OpenMeteoClient>,
    weather_timeout: Duration,
}

impl RecommendationService {
    pub fn new(
        predictor: Arc<dyn NutrientPredictor>,
        catalog: Arc<FertilizerCatalog>,
        prices: Arc<PriceTable>,
    ) -> Self {
        Self {
            predictor,
            catalog,
            prices,
            weather: None,
            weather_timeout: Duration::from_secs(5),
        }
    }

    pub fn with_weather(mut self, client: OpenMeteoClient) -> Self {
        self.weather_timeout = Duration::from_secs(client.config().timeout_secs);
        self.weather = Some(client);
        self
    }

    pub fn predictor_name(&self) -> &'static str {
        self.predictor.name()
    }

    /// Nutrient target for a request, without allocation or pricing.
    pub fn predict(&self, request: &RecommendationRequest) -> Result<NutrientTarget> {
        let core = request.validate()?;
        let features = PredictionFeatures::from_sample(
            &core,
            &request.soil,
            &request.field.crop_name,
            &request.field.season,
        );
        self.predictor.predict(&features)
    }

    /// Predict, allocate, price and explain.
    pub async fn generate(&self, request: &RecommendationRequest) -> Result<Recommendation> {
        let target = self.predict(request)?;
        let advisory = self.weather_advisory(&request.field).await;

        let prices = match request.field.state.as_deref() {
            Some(state) if !state.trim().is_empty() => Cow::Owned(self.prices.for_state(state)),
            _ => Cow::Borrowed(self.prices.as_ref()),
        };

        assemble(
            &self.catalog,
            &prices,
            request,
            target,
            self.predictor.name(),
            advisory,
        )
    }

    /// Timing advice for the field's district. Any failure yields `None`.
    async fn weather_advisory(&self, field: &FieldProfile) -> Option<String> {
        let client = self.weather.as_ref()?;
        let (latitude, longitude) = location_for(field.district.as_deref());

        match tokio::time::timeout(
            self.weather_timeout,
            client.timing_advice(latitude, longitude),
        )
        .await
        {
            Ok(Ok(advice)) => Some(advice.text().to_string()),
            Ok(Err(e)) => {
                tracing::warn!("Weather advisory unavailable: {}", e);
                None
            }
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.weather_timeout.as_secs(),
                    "Weather advisory timed out"
                );
                None
            }
        }
    }
}
