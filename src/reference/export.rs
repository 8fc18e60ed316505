//! Export functions - reference data and estimate history as CSV

use crate::reference::types::{EstimateRow, LocalityExportRow};
use crate::valuation::types::{InfrastructureFactor, LocationRecord};
use anyhow::Result;
use sqlx::PgPool;
use tracing::info;

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV: {}", e))?;
    Ok(String::from_utf8(bytes)?)
}

fn optional<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

pub fn cities_to_csv(cities: &[LocationRecord]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "name",
        "state",
        "base_price_per_sqft",
        "growth_rate",
        "population",
        "tier",
    ])?;

    for city in cities {
        writer.write_record([
            city.name.clone(),
            city.region.clone(),
            city.base_price.to_string(),
            city.growth_rate.to_string(),
            optional(&city.population),
            optional(&city.tier),
        ])?;
    }

    finish(writer)
}

pub fn localities_to_csv(localities: &[LocalityExportRow]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "name",
        "city_name",
        "state",
        "price_per_sqft",
        "location_multiplier",
        "area_type",
        "pin_code",
    ])?;

    for locality in localities {
        writer.write_record([
            locality.name.clone(),
            locality.city_name.clone(),
            locality.state.clone(),
            locality.price_per_sqft.to_string(),
            locality.location_multiplier.to_string(),
            optional(&locality.area_type),
            optional(&locality.pin_code),
        ])?;
    }

    finish(writer)
}

pub fn multipliers_to_csv(factors: &[InfrastructureFactor]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["factor_type", "factor_value", "multiplier", "description"])?;

    for factor in factors {
        writer.write_record([
            factor.factor_type.to_string(),
            factor.factor_value.clone(),
            factor.multiplier.to_string(),
            optional(&factor.description),
        ])?;
    }

    finish(writer)
}

pub fn estimates_to_csv(estimates: &[EstimateRow]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "id",
        "state",
        "city",
        "locality",
        "plot_size_sqft",
        "road_width_ft",
        "nearby_schools",
        "nearby_metro",
        "commercial_area",
        "year",
        "area_type",
        "estimated_price_per_sqft",
        "total_estimated_price",
        "confidence_score",
        "created_at",
    ])?;

    for e in estimates {
        writer.write_record([
            e.id.to_string(),
            e.state.clone(),
            e.city.clone(),
            optional(&e.locality),
            e.plot_size_sqft.to_string(),
            e.road_width_ft.to_string(),
            e.nearby_schools.to_string(),
            e.nearby_metro.to_string(),
            e.commercial_area.to_string(),
            e.year.to_string(),
            e.area_type.clone(),
            e.estimated_price_per_sqft.to_string(),
            e.total_estimated_price.to_string(),
            e.confidence_score.to_string(),
            e.created_at.to_rfc3339(),
        ])?;
    }

    finish(writer)
}

/// Load localities joined with their city, ordered by state, city, name
pub async fn load_localities(db: &PgPool) -> Result<Vec<LocalityExportRow>> {
    let rows = sqlx::query_as::<_, LocalityExportRow>(
        r#"
        SELECT l.name, c.name AS city_name, c.state, l.price_per_sqft, l.location_multiplier,
               l.area_type, l.pin_code
        FROM localities l
        JOIN cities c ON c.id = l.city_id
        ORDER BY c.state, c.name, l.name
        "#,
    )
    .fetch_all(db)
    .await?;

    info!("Loaded {} localities for export", rows.len());
    Ok(rows)
}

/// Load estimate history, newest first
pub async fn load_estimates(db: &PgPool) -> Result<Vec<EstimateRow>> {
    let rows = sqlx::query_as::<_, EstimateRow>(
        r#"
        SELECT id, state, city, locality, plot_size_sqft, road_width_ft, nearby_schools,
               nearby_metro, commercial_area, year, area_type, estimated_price_per_sqft,
               total_estimated_price, confidence_score, created_at
        FROM price_estimates
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(db)
    .await?;

    info!("Loaded {} estimates for export", rows.len());
    Ok(rows)
}
