//! Data ingestion orchestrator - seeds, imports and exports reference data

use anyhow::{Context, Result};
use land_price_backend::config::Config;
use land_price_backend::reference::fetch::{fetch_source, Source};
use land_price_backend::reference::{export, parse, seed, write, PgReferenceData, WriteStats};
use sqlx::PgPool;
use std::env;
use std::fs;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true)
        .init();

    info!("Starting reference data pipeline");

    let config = Config::from_env()?;
    info!("Configuration loaded");

    let db = PgPool::connect(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(&db).await?;
    info!("Database connected");

    // Pipelines to run: command line args, or seed + whichever sources are configured
    let args: Vec<String> = env::args().collect();
    let pipelines = if args.len() > 1 {
        args[1..].to_vec()
    } else {
        default_pipelines(&config)
    };

    for pipeline in pipelines {
        info!("Running pipeline: {}", pipeline);

        let result = match pipeline.as_str() {
            "seed" => seed::seed_database(&db).await,
            "cities" => run_cities(&config, &db).await,
            "localities" => run_localities(&config, &db).await,
            "multipliers" => run_multipliers(&config, &db).await,
            "export" => run_export(&config, &db).await,
            _ => {
                warn!("Unknown pipeline: {}", pipeline);
                continue;
            }
        };

        match result {
            Ok(stats) => info!("✓ {} completed: {}", pipeline, stats),
            Err(e) => error!("✗ {} failed: {:#}", pipeline, e),
        }
    }

    info!("Reference data pipeline complete");

    Ok(())
}

fn default_pipelines(config: &Config) -> Vec<String> {
    let mut pipelines = vec!["seed".to_string()];
    if config.cities_source.is_some() {
        pipelines.push("cities".to_string());
    }
    if config.localities_source.is_some() {
        pipelines.push("localities".to_string());
    }
    if config.multipliers_source.is_some() {
        pipelines.push("multipliers".to_string());
    }
    pipelines
}

fn source_for(configured: &Option<String>, key: &str) -> Result<Source> {
    configured
        .as_deref()
        .map(Source::parse)
        .with_context(|| format!("{} is not set", key))
}

/// Import cities: fetch, parse, write
async fn run_cities(config: &Config, db: &PgPool) -> Result<WriteStats> {
    info!("=== Cities Pipeline ===");
    let source = source_for(&config.cities_source, "CITIES_SOURCE")?;

    info!("Step 1/3: Fetching data...");
    let raw = fetch_source(&source, &config.temp_dir).await?;

    info!("Step 2/3: Parsing data...");
    let cities = parse::parse_cities(&raw)?;
    info!("✓ Parsed {} cities", cities.len());

    info!("Step 3/3: Writing to database...");
    write::write_cities(db, cities).await
}

/// Import localities; rows whose city is unknown are skipped on write
async fn run_localities(config: &Config, db: &PgPool) -> Result<WriteStats> {
    info!("=== Localities Pipeline ===");
    let source = source_for(&config.localities_source, "LOCALITIES_SOURCE")?;

    info!("Step 1/3: Fetching data...");
    let raw = fetch_source(&source, &config.temp_dir).await?;

    info!("Step 2/3: Parsing data...");
    let localities = parse::parse_localities(&raw)?;
    info!("✓ Parsed {} localities", localities.len());

    info!("Step 3/3: Writing to database...");
    write::write_localities(db, localities).await
}

/// Import infrastructure multipliers
async fn run_multipliers(config: &Config, db: &PgPool) -> Result<WriteStats> {
    info!("=== Infrastructure Multipliers Pipeline ===");
    let source = source_for(&config.multipliers_source, "MULTIPLIERS_SOURCE")?;

    info!("Step 1/3: Fetching data...");
    let raw = fetch_source(&source, &config.temp_dir).await?;

    info!("Step 2/3: Parsing data...");
    let factors = parse::parse_multipliers(&raw)?;
    info!("✓ Parsed {} multipliers", factors.len());

    info!("Step 3/3: Writing to database...");
    write::write_multipliers(db, factors).await
}

/// Write every table as CSV into EXPORT_DIR
async fn run_export(config: &Config, db: &PgPool) -> Result<WriteStats> {
    info!("=== Export Pipeline ===");
    fs::create_dir_all(&config.export_dir)
        .with_context(|| format!("Cannot create export dir {:?}", config.export_dir))?;

    let provider = PgReferenceData::new(db.clone());
    let cities = provider.list_cities(None).await?;
    let localities = export::load_localities(db).await?;
    let factors = provider.list_all_factors().await?;
    let estimates = export::load_estimates(db).await?;

    let files = [
        ("cities.csv", export::cities_to_csv(&cities)?, cities.len()),
        ("localities.csv", export::localities_to_csv(&localities)?, localities.len()),
        ("infrastructure_multipliers.csv", export::multipliers_to_csv(&factors)?, factors.len()),
        ("price_estimates.csv", export::estimates_to_csv(&estimates)?, estimates.len()),
    ];

    let mut stats = WriteStats::default();
    for (name, csv, rows) in files {
        let path = config.export_dir.join(name);
        fs::write(&path, csv).with_context(|| format!("Cannot write {:?}", path))?;
        info!("✓ Exported {} rows to {:?}", rows, path);
        stats.inserted += rows;
    }

    Ok(stats)
}
