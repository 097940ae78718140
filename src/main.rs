mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command, NearestArgs, ValueArgs};
use housing_comps::config::AppConfig;
use housing_comps::geocode::NominatimGeocoder;
use housing_comps::query::{PriceRange, QueryEngine, QuerySpec};
use housing_comps::store::InMemoryStore;
use housing_comps::valuation::{PropertyValuator, Subject};
use housing_comps::{GeoPoint, QueryError};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let mut config = AppConfig::from_env();
    if let Some(path) = cli.data {
        config.data_path = path;
    }

    info!("🏠 Housing Comps");
    let store = InMemoryStore::from_json_file(&config.data_path).await?;
    let engine = QueryEngine::new(store);

    match cli.command {
        Command::Nearest(args) => run_nearest(&engine, args).await,
        Command::Value(args) => run_value(&engine, &config, args).await,
    }
}

/// Tag a query failure with its code; caller errors are logged as rejections.
fn rejected(err: QueryError) -> anyhow::Error {
    let code = err.code();
    if err.is_caller_error() {
        warn!("Rejected query [{}]: {}", code, err);
    }
    anyhow::Error::new(err).context(format!("Query failed ({code})"))
}

async fn run_nearest(engine: &QueryEngine<InMemoryStore>, args: NearestArgs) -> Result<()> {
    let spec = QuerySpec::new(
        GeoPoint::new(args.lat, args.lon),
        args.k,
        args.dataset.into(),
        args.filter.to_filter(),
    )
    .with_price_range(PriceRange::from_sentinel(args.range).map_err(rejected)?);

    let outcome = engine.find_k_nearest(&spec).await.map_err(rejected)?;
    if let Some(diagnostic) = outcome.diagnostic {
        info!("Empty result: {}", diagnostic);
    }

    for (i, neighbor) in outcome.neighbors.iter().enumerate() {
        let record = &neighbor.record;
        match &record.unit {
            Some(unit) => println!("{}. {}/{} (${})", i + 1, unit, record.street_address, record.price),
            None => println!("{}. {} (${})", i + 1, record.street_address, record.price),
        }
        println!(
            "   {} bed, {} bath, {} car, type {}",
            record.bedrooms, record.bathrooms, record.parking, record.property_type
        );
        println!("   {:.0} m away, recorded {}", neighbor.distance_m, record.record_date);
        println!("   ID: {}", record.id);
        println!();
    }

    if let Some(path) = args.output {
        let json = serde_json::to_string_pretty(&outcome)?;
        tokio::fs::write(&path, json)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("💾 Saved {} listings to {}", outcome.len(), path.display());
    }

    Ok(())
}

async fn run_value(
    engine: &QueryEngine<InMemoryStore>,
    config: &AppConfig,
    args: ValueArgs,
) -> Result<()> {
    let geocoder = NominatimGeocoder::new(config.geocoder.clone())?;
    let valuator = PropertyValuator::new(engine, &geocoder, config.valuation.clone());
    let subject = Subject {
        address: args.address,
        area: args.area,
        filter: args.filter.to_filter(),
    };

    match valuator.income_based(&subject).await.map_err(rejected)? {
        Some(v) => println!(
            "Income approach:     ${:.0} (median rent ${:.0}, {} rentals)",
            v.estimate, v.median_price, v.comparables
        ),
        None => println!("Income approach:     insufficient rental data"),
    }
    match valuator.comparison_based(&subject).await.map_err(rejected)? {
        Some(v) => println!(
            "Comparison approach: ${:.0} ({} sales)",
            v.estimate, v.comparables
        ),
        None => println!("Comparison approach: insufficient sales data"),
    }

    Ok(())
}
