use crate::config::FieldConfig;
use crate::models::{FieldProfile, SoilSample};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "fertadvisor",
    version,
    about = "Soil-test driven fertilizer recommendations"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config.yaml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override SQLite data directory
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a full fertilizer recommendation
    Recommend {
        #[command(flatten)]
        soil: SoilArgs,
        #[command(flatten)]
        field: FieldArgs,
        /// Skip the weather advisory lookup
        #[arg(long)]
        no_weather: bool,
        /// Print JSON instead of the text report
        #[arg(long)]
        json: bool,
        /// Do not store the result
        #[arg(long)]
        no_save: bool,
    },
    /// Print predicted nutrient targets only
    Predict {
        #[command(flatten)]
        soil: SoilArgs,
        #[command(flatten)]
        field: FieldArgs,
        #[arg(long)]
        json: bool,
    },
    /// Print the growth-stage schedule for a crop
    Schedule { crop: String },
    /// Print soil amendment advice
    Improve {
        #[command(flatten)]
        soil: SoilArgs,
    },
    /// Print the verified price table
    Prices {
        /// Apply state-level prices
        #[arg(long)]
        state: Option<String>,
    },
    /// List saved recommendations
    History {
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
    /// Print a saved recommendation
    Show {
        id: i64,
        #[arg(long)]
        json: bool,
    },
    /// Validate config and test the weather service
    Check,
}

/// Soil test values. N, P, K in mg/kg, EC in dS/m, moisture and organic
/// carbon in percent.
#[derive(Args, Debug, Clone, Default)]
pub struct SoilArgs {
    #[arg(short = 'n', long)]
    pub nitrogen: Option<f64>,
    #[arg(short = 'p', long)]
    pub phosphorus: Option<f64>,
    #[arg(short = 'k', long)]
    pub potassium: Option<f64>,
    #[arg(long)]
    pub ph: Option<f64>,
    #[arg(long)]
    pub ec: Option<f64>,
    #[arg(long)]
    pub moisture: Option<f64>,
    #[arg(long)]
    pub organic_carbon: Option<f64>,
}

impl From<SoilArgs> for SoilSample {
    fn from(args: SoilArgs) -> Self {
        SoilSample {
            nitrogen: args.nitrogen,
            phosphorus: args.phosphorus,
            potassium: args.potassium,
            ph: args.ph,
            ec: args.ec,
            moisture: args.moisture,
            organic_carbon: args.organic_carbon,
        }
    }
}

/// Field details; anything omitted comes from the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct FieldArgs {
    #[arg(long)]
    pub crop: Option<String>,
    #[arg(long)]
    pub season: Option<String>,
    /// Field area in hectares
    #[arg(long)]
    pub area: Option<f64>,
    #[arg(long)]
    pub district: Option<String>,
    #[arg(long)]
    pub state: Option<String>,
}

impl FieldArgs {
    pub fn into_profile(self, defaults: &FieldConfig) -> FieldProfile {
        FieldProfile {
            crop_name: self.crop.unwrap_or_else(|| defaults.crop_name.clone()),
            season: self.season.unwrap_or_else(|| defaults.season.clone()),
            field_area_hectares: self.area.unwrap_or(defaults.field_area_hectares),
            district: self.district.or_else(|| defaults.district.clone()),
            state: self.state.or_else(|| defaults.state.clone()),
        }
    }
}
