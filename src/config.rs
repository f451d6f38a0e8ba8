use crate::error::{FertError, Result};
use crate::logic::{FertilizerCatalog, PriceEntry, PriceTable, RoleAssignment};
use crate::models::FertilizerProduct;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

const APP_DIR: &str = "fertadvisor";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub field: FieldConfig,
    pub weather: WeatherConfig,
    pub pricing: PricingConfig,
    pub catalog: Option<CatalogConfig>,
}

/// Defaults for fields not given on the command line.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FieldConfig {
    pub crop_name: String,
    pub season: String,
    pub field_area_hectares: f64,
    pub district: Option<String>,
    pub state: Option<String>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            crop_name: "Rice".into(),
            season: "Kharif".into(),
            field_area_hectares: 1.0,
            district: None,
            state: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub enabled: bool,
    pub base_url: String,
    pub timeout_secs: u64,
    pub forecast_days: u32,
    pub timezone: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://api.open-meteo.com/v1/forecast".into(),
            timeout_secs: 5,
            forecast_days: 7,
            timezone: "Asia/Kolkata".into(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PricingConfig {
    /// State whose bag prices replace the national ones.
    pub state: Option<String>,
    /// Extra or replacement entries keyed by base fertilizer name.
    pub prices: BTreeMap<String, PriceEntry>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    pub products: Vec<ProductConfig>,
    #[serde(default)]
    pub roles: RoleAssignment,
}

/// A catalog product as written in the config file, grade in percent.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProductConfig {
    pub name: String,
    #[serde(default)]
    pub n: f64,
    #[serde(default)]
    pub p: f64,
    #[serde(default)]
    pub k: f64,
    #[serde(default)]
    pub cost_per_kg: f64,
}

impl Config {
    /// Load from an explicit path or the standard locations. A missing file
    /// yields the defaults unless the path was given explicitly.
    pub fn load(config_override: Option<&PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => {
                if !p.exists() {
                    return Err(FertError::Config(format!(
                        "Config file not found at {:?}",
                        p
                    )));
                }
                p.clone()
            }
            None => match Self::find_config_path() {
                Some(p) => p,
                None => {
                    tracing::debug!("No config file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        tracing::debug!(path = ?config_path, "Loading config");

        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| FertError::Config(format!("Failed to read config: {}", e)))?;

        Self::parse(&config_str)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let content = Self::substitute_env_vars(content)?;

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| FertError::Config(format!("Failed to parse config: {}", e)))?;

        // Fail at load time rather than at allocation time.
        config.build_catalog()?;

        Ok(config)
    }

    /// First existing config in `config/config.yaml` or the XDG config dir.
    fn find_config_path() -> Option<PathBuf> {
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Some(local_config);
        }

        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR).join("config.yaml"))
            .filter(|p| p.exists())
    }

    fn substitute_env_vars(content: &str) -> Result<String> {
        let mut result = content.to_string();

        let re = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
            .map_err(|e| FertError::Config(format!("Invalid substitution pattern: {}", e)))?;

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            if let Ok(value) = std::env::var(var_name) {
                result = result.replace(placeholder, &value);
            }
        }

        Ok(result)
    }

    /// The configured catalog, or the standard one.
    pub fn build_catalog(&self) -> Result<FertilizerCatalog> {
        match &self.catalog {
            Some(catalog) => {
                let products = catalog
                    .products
                    .iter()
                    .map(|p| FertilizerProduct::from_grade(&p.name, p.n, p.p, p.k, p.cost_per_kg))
                    .collect();
                FertilizerCatalog::new(products, &catalog.roles)
            }
            None => Ok(FertilizerCatalog::standard()),
        }
    }

    /// National prices with config overrides. State prices are applied per
    /// request.
    pub fn build_price_table(&self) -> PriceTable {
        PriceTable::government().with_overrides(&self.pricing.prices)
    }

    pub fn data_dir(data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        if let Some(dir) = data_dir_override {
            std::fs::create_dir_all(dir)?;
            return Ok(dir.clone());
        }

        if let Ok(dir) = std::env::var("FERTADVISOR_DATA_DIR") {
            let p = PathBuf::from(dir);
            std::fs::create_dir_all(&p)?;
            return Ok(p);
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| FertError::Config("Cannot determine data directory".into()))?
            .join(APP_DIR);

        std::fs::create_dir_all(&data_dir)?;
        Ok(data_dir)
    }

    pub fn db_path(data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        Ok(Self::data_dir(data_dir_override)?.join("fertadvisor.db"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FertilizerKind, NutrientRole};

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::parse("{}").unwrap();
        assert_eq!(config.field.crop_name, "Rice");
        assert_eq!(config.weather.timeout_secs, 5);
        assert_eq!(config.weather.forecast_days, 7);
        assert!(config.catalog.is_none());
        assert_eq!(config.build_catalog().unwrap().products().len(), 11);
    }

    #[test]
    fn parses_sections() {
        let yaml = r#"
field:
  crop_name: Wheat
  season: Rabi
  field_area_hectares: 2.5
  district: Ludhiana
  state: Punjab
weather:
  enabled: false
  timeout_secs: 2
pricing:
  prices:
    "NPK 29:5:5":
      price_per_50kg_bag: 1100
      npk_composition: "29-5-5"
"#;
        let config = Config::parse(yaml).unwrap();
        assert_eq!(config.field.crop_name, "Wheat");
        assert_eq!(config.field.field_area_hectares, 2.5);
        assert_eq!(config.field.district.as_deref(), Some("Ludhiana"));
        assert!(!config.weather.enabled);
        assert_eq!(config.weather.timeout_secs, 2);
        assert_eq!(config.weather.timezone, "Asia/Kolkata");

        let table = config.build_price_table();
        let entry = table
            .lookup(&FertilizerKind::Npk("29:5:5".into()))
            .unwrap();
        assert_eq!(entry.price_per_50kg_bag, 1100);
        assert!(table.lookup(&FertilizerKind::Urea).is_some());
    }

    #[test]
    fn custom_catalog_is_validated() {
        let yaml = r#"
catalog:
  products:
    - { name: "Ammonium Sulphate", n: 20.6, cost_per_kg: 12 }
    - { name: "SSP", p: 16, cost_per_kg: 8 }
    - { name: "SOP", k: 50, cost_per_kg: 40 }
  roles:
    nitrogen: "Ammonium Sulphate"
    phosphorus: "SSP"
    potassium: "SOP"
"#;
        let config = Config::parse(yaml).unwrap();
        let catalog = config.build_catalog().unwrap();
        assert_eq!(catalog.for_role(NutrientRole::Phosphorus).name, "SSP");

        let broken = yaml.replace("potassium: \"SOP\"", "potassium: \"SSP\"");
        let err = Config::parse(&broken).unwrap_err();
        assert!(matches!(err, FertError::Catalog(_)));
    }

    #[test]
    fn env_vars_are_substituted() {
        std::env::set_var("FERTADVISOR_TEST_STATE", "Kerala");
        let config = Config::parse("pricing:\n  state: ${FERTADVISOR_TEST_STATE}\n").unwrap();
        assert_eq!(config.pricing.state.as_deref(), Some("Kerala"));
    }

    #[test]
    fn explicit_missing_path_is_error() {
        let path = PathBuf::from("/nonexistent/fertadvisor.yaml");
        assert!(Config::load(Some(&path)).is_err());
    }
}
