use crate::config::WeatherConfig;
use crate::error::{FertError, Result};
use serde::Deserialize;

/// Daily rain above this many millimetres counts as a rainy day.
const SIGNIFICANT_RAIN_MM: f64 = 5.0;
/// Days of the forecast considered for application timing.
const LOOKAHEAD_DAYS: usize = 3;

pub struct OpenMeteoClient {
    client: reqwest::Client,
    config: WeatherConfig,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    daily: Option<DailyBlock>,
}

#[derive(Debug, Deserialize)]
struct DailyBlock {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    rain_sum: Vec<Option<f64>>,
    #[serde(default)]
    precipitation_sum: Vec<Option<f64>>,
}

/// Daily rain totals in millimetres, first day first.
#[derive(Debug, Clone, PartialEq)]
pub struct RainOutlook {
    pub dates: Vec<String>,
    pub rain_mm: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherAdvice {
    HeavyRain,
    LightRain,
    Clear,
}

impl WeatherAdvice {
    /// Classify by the number of significant rain days in the first three.
    pub fn from_outlook(outlook: &RainOutlook) -> Self {
        let rainy_days = outlook
            .rain_mm
            .iter()
            .take(LOOKAHEAD_DAYS)
            .filter(|&&mm| mm > SIGNIFICANT_RAIN_MM)
            .count();

        match rainy_days {
            0 => WeatherAdvice::Clear,
            1 => WeatherAdvice::LightRain,
            _ => WeatherAdvice::HeavyRain,
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            WeatherAdvice::HeavyRain => {
                "Heavy rain expected in next 3 days | Postpone top dressing application | Wait for dry weather to prevent nutrient loss"
            }
            WeatherAdvice::LightRain => {
                "Light rain expected | Safe to apply basal fertilizers | Delay top dressing by 2-3 days"
            }
            WeatherAdvice::Clear => {
                "Good weather for fertilizer application | Apply as per schedule | Irrigate after top dressing if no rain expected"
            }
        }
    }
}

impl std::fmt::Display for WeatherAdvice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text())
    }
}

impl OpenMeteoClient {
    pub fn new(config: WeatherConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &WeatherConfig {
        &self.config
    }

    fn forecast_url(&self, latitude: f64, longitude: f64) -> String {
        format!(
            "{}?latitude={}&longitude={}&daily=temperature_2m_max,temperature_2m_min,precipitation_sum,rain_sum&timezone={}&forecast_days={}",
            self.config.base_url.trim_end_matches('/'),
            latitude,
            longitude,
            self.config.timezone,
            self.config.forecast_days
        )
    }

    /// Fetch the daily rain outlook for a location.
    pub async fn fetch_rain_outlook(&self, latitude: f64, longitude: f64) -> Result<RainOutlook> {
        let url = self.forecast_url(latitude, longitude);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FertError::DataSourceUnavailable(format!("Open-Meteo: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FertError::DataSourceUnavailable(format!(
                "Open-Meteo returned {}: {}",
                status, body
            )));
        }

        let forecast: ForecastResponse = response.json().await.map_err(|e| {
            FertError::DataSourceUnavailable(format!("Failed to parse Open-Meteo response: {}", e))
        })?;

        parse_outlook(forecast)
    }

    /// Fertilizer timing advice for a location.
    pub async fn timing_advice(&self, latitude: f64, longitude: f64) -> Result<WeatherAdvice> {
        let outlook = self.fetch_rain_outlook(latitude, longitude).await?;
        let advice = WeatherAdvice::from_outlook(&outlook);
        tracing::debug!(?advice, rain_mm = ?outlook.rain_mm, "Weather advice");
        Ok(advice)
    }
}

fn parse_outlook(forecast: ForecastResponse) -> Result<RainOutlook> {
    let daily = forecast
        .daily
        .ok_or_else(|| FertError::InvalidData("Open-Meteo response has no daily block".into()))?;

    // Older responses may lack rain_sum; total precipitation is close enough.
    let source = if daily.rain_sum.is_empty() {
        daily.precipitation_sum
    } else {
        daily.rain_sum
    };

    Ok(RainOutlook {
        dates: daily.time,
        rain_mm: source.into_iter().map(|mm| mm.unwrap_or(0.0)).collect(),
    })
}
