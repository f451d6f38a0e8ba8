mod cli;
mod config;
mod datasources;
mod db;
mod error;
mod logic;
mod models;
mod report;

use clap::Parser;
use cli::{Cli, Commands, FieldArgs, SoilArgs};
use config::Config;
use datasources::{location_for, OpenMeteoClient};
use db::Database;
use error::{FertError, Result};
use logic::soil_improvement::advise;
use logic::state_prices::known_states;
use logic::{RecommendationRequest, RecommendationService, ReferencePredictor};
use models::{Crop, SoilSample};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // RUST_LOG wins over -v
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_ref())?;

    match cli.command {
        Commands::Recommend {
            soil,
            field,
            no_weather,
            json,
            no_save,
        } => {
            let request = build_request(soil, field, &config);
            let service = build_service(&config, !no_weather)?;
            let recommendation = service.generate(&request).await?;

            if !no_save {
                let db = Database::open(&Config::db_path(cli.data_dir.as_ref())?)?;
                let id = db.save_recommendation(&request, &recommendation)?;
                tracing::info!(id, path = ?db.path(), "Recommendation saved");
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&recommendation)?);
            } else {
                print!("{}", report::recommendation(&recommendation));
            }
        }
        Commands::Predict { soil, field, json } => {
            let request = build_request(soil, field, &config);
            let service = build_service(&config, false)?;
            let target = service.predict(&request)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&target)?);
            } else {
                println!("Predictor: {}", service.predictor_name());
                print!("{}", report::nutrient_target(&target));
            }
        }
        Commands::Schedule { crop } => {
            println!("{} schedule", Crop::from_name(&crop));
            print!(
                "{}",
                report::schedule(&logic::schedule::schedule(&crop, 0.0, 0.0, 0.0))
            );
        }
        Commands::Improve { soil } => {
            let sample = SoilSample::from(soil);
            sample.validate()?;
            let ph = sample
                .ph
                .ok_or_else(|| FertError::InvalidData("--ph is required".into()))?;
            let items = advise(
                ph,
                sample.ec,
                sample.organic_carbon,
                sample.nitrogen,
                sample.phosphorus,
                sample.potassium,
            );
            print!("{}", report::improvements(&items));
        }
        Commands::Prices { state } => {
            let national = config.build_price_table();
            let state = state.or_else(|| config.pricing.state.clone());
            let table = match state.as_deref() {
                Some(s) => national.for_state(s),
                None => national,
            };
            print!("{}", report::price_table(&table));
            if state.is_some() && table.region().is_none() {
                println!("\nState prices available for: {}", known_states().join(", "));
            }
        }
        Commands::History { limit } => {
            let db = Database::open(&Config::db_path(cli.data_dir.as_ref())?)?;
            print!("{}", report::history(&db.list_recommendations(limit)?));
        }
        Commands::Show { id, json } => {
            let db = Database::open(&Config::db_path(cli.data_dir.as_ref())?)?;
            let record = db
                .get_recommendation(id)?
                .ok_or_else(|| FertError::NotFound(format!("recommendation {}", id)))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&record.recommendation)?);
            } else {
                print!("{}", report::recommendation(&record.recommendation));
            }
        }
        Commands::Check => check(&config).await?,
    }

    Ok(())
}

fn build_request(soil: SoilArgs, field: FieldArgs, config: &Config) -> RecommendationRequest {
    let mut profile = field.into_profile(&config.field);
    if profile.state.is_none() {
        profile.state = config.pricing.state.clone();
    }
    RecommendationRequest::new(SoilSample::from(soil), profile)
}

fn build_service(config: &Config, with_weather: bool) -> Result<RecommendationService> {
    let service = RecommendationService::new(
        Arc::new(ReferencePredictor::new()),
        Arc::new(config.build_catalog()?),
        Arc::new(config.build_price_table()),
    );

    if with_weather && config.weather.enabled {
        Ok(service.with_weather(OpenMeteoClient::new(config.weather.clone())))
    } else {
        Ok(service)
    }
}

async fn check(config: &Config) -> Result<()> {
    let catalog = config.build_catalog()?;
    println!("Catalog: {} products OK", catalog.products().len());
    println!(
        "Price table: {} entries",
        config.build_price_table().entries().count()
    );

    if !config.weather.enabled {
        println!("Weather: disabled");
        return Ok(());
    }

    let client = OpenMeteoClient::new(config.weather.clone());
    let (latitude, longitude) = location_for(config.field.district.as_deref());
    let timeout = std::time::Duration::from_secs(config.weather.timeout_secs);

    match tokio::time::timeout(timeout, client.timing_advice(latitude, longitude)).await {
        Ok(Ok(advice)) => println!("Weather: OK ({})", advice),
        Ok(Err(e)) => println!("Weather: OFFLINE ({})", e),
        Err(_) => println!("Weather: OFFLINE (timed out)"),
    }

    Ok(())
}
