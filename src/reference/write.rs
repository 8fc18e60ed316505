//! Write functions - persist reference data to PostgreSQL

use crate::reference::types::{CityImport, LocalityImport, WriteStats};
use crate::valuation::types::InfrastructureFactor;
use anyhow::Result;
use sqlx::PgPool;
use tracing::{debug, info, warn};

/// Outcome of writing one record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Written {
    Inserted,
    Updated,
    Skipped,
}

impl WriteStats {
    fn record(&mut self, written: Written) {
        match written {
            Written::Inserted => self.inserted += 1,
            Written::Updated => self.updated += 1,
            Written::Skipped => self.skipped += 1,
        }
    }
}

/// Write cities, updating existing ones matched by (name, state)
pub async fn write_cities(db: &PgPool, cities: Vec<CityImport>) -> Result<WriteStats> {
    info!("Writing {} cities to database", cities.len());

    let mut stats = WriteStats::default();

    for city in cities {
        match write_single_city(db, &city).await {
            Ok(written) => stats.record(written),
            Err(e) => {
                warn!("Failed to write city {}, {}: {}", city.name, city.state, e);
                stats.errors += 1;
            }
        }
    }

    info!("Cities write complete: {}", stats);

    Ok(stats)
}

async fn write_single_city(db: &PgPool, city: &CityImport) -> Result<Written> {
    let existing = find_city_id(db, &city.name, &city.state).await?;

    match existing {
        None => {
            sqlx::query(
                r#"
                INSERT INTO cities (
                    name, state, base_price_per_sqft, growth_rate, population, tier,
                    created_at, updated_at
                ) VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW())
                "#,
            )
            .bind(&city.name)
            .bind(&city.state)
            .bind(city.base_price_per_sqft)
            .bind(city.growth_rate)
            .bind(city.population)
            .bind(&city.tier)
            .execute(db)
            .await?;

            debug!("Inserted city: {}, {}", city.name, city.state);
            Ok(Written::Inserted)
        }
        Some(id) => {
            sqlx::query(
                r#"
                UPDATE cities SET
                    base_price_per_sqft = $1, growth_rate = $2, population = $3, tier = $4,
                    updated_at = NOW()
                WHERE id = $5
                "#,
            )
            .bind(city.base_price_per_sqft)
            .bind(city.growth_rate)
            .bind(city.population)
            .bind(&city.tier)
            .bind(id)
            .execute(db)
            .await?;

            debug!("Updated city: {}, {} (id: {})", city.name, city.state, id);
            Ok(Written::Updated)
        }
    }
}

async fn find_city_id(db: &PgPool, name: &str, state: &str) -> Result<Option<i32>> {
    let id = sqlx::query_scalar::<_, i32>("SELECT id FROM cities WHERE name = $1 AND state = $2")
        .bind(name)
        .bind(state)
        .fetch_optional(db)
        .await?;
    Ok(id)
}

/// Write localities; rows whose city is not in the database are skipped
pub async fn write_localities(db: &PgPool, localities: Vec<LocalityImport>) -> Result<WriteStats> {
    info!("Writing {} localities to database", localities.len());

    let mut stats = WriteStats::default();

    for locality in localities {
        match write_single_locality(db, &locality).await {
            Ok(written) => stats.record(written),
            Err(e) => {
                warn!("Failed to write locality {}: {}", locality.name, e);
                stats.errors += 1;
            }
        }
    }

    info!("Localities write complete: {}", stats);

    Ok(stats)
}

async fn write_single_locality(db: &PgPool, locality: &LocalityImport) -> Result<Written> {
    let Some(city_id) = find_city_id(db, &locality.city_name, &locality.state).await? else {
        warn!(
            "City not found: {}, {} (locality {})",
            locality.city_name, locality.state, locality.name
        );
        return Ok(Written::Skipped);
    };

    let existing = sqlx::query_scalar::<_, i32>(
        "SELECT id FROM localities WHERE name = $1 AND city_id = $2",
    )
    .bind(&locality.name)
    .bind(city_id)
    .fetch_optional(db)
    .await?;

    match existing {
        None => {
            sqlx::query(
                r#"
                INSERT INTO localities (
                    name, city_id, price_per_sqft, location_multiplier, area_type, pin_code,
                    created_at, updated_at
                ) VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW())
                "#,
            )
            .bind(&locality.name)
            .bind(city_id)
            .bind(locality.price_per_sqft)
            .bind(locality.location_multiplier)
            .bind(&locality.area_type)
            .bind(&locality.pin_code)
            .execute(db)
            .await?;

            debug!("Inserted locality: {} (city_id: {})", locality.name, city_id);
            Ok(Written::Inserted)
        }
        Some(id) => {
            sqlx::query(
                r#"
                UPDATE localities SET
                    price_per_sqft = $1, location_multiplier = $2, area_type = $3, pin_code = $4,
                    updated_at = NOW()
                WHERE id = $5
                "#,
            )
            .bind(locality.price_per_sqft)
            .bind(locality.location_multiplier)
            .bind(&locality.area_type)
            .bind(&locality.pin_code)
            .bind(id)
            .execute(db)
            .await?;

            debug!("Updated locality: {} (id: {})", locality.name, id);
            Ok(Written::Updated)
        }
    }
}

/// Write infrastructure multipliers, keyed by (factor_type, factor_value)
pub async fn write_multipliers(
    db: &PgPool,
    factors: Vec<InfrastructureFactor>,
) -> Result<WriteStats> {
    info!("Writing {} infrastructure multipliers to database", factors.len());

    let mut stats = WriteStats::default();

    for factor in factors {
        match write_single_multiplier(db, &factor).await {
            Ok(written) => stats.record(written),
            Err(e) => {
                warn!(
                    "Failed to write multiplier {}={}: {}",
                    factor.factor_type, factor.factor_value, e
                );
                stats.errors += 1;
            }
        }
    }

    info!("Multipliers write complete: {}", stats);

    Ok(stats)
}

async fn write_single_multiplier(db: &PgPool, factor: &InfrastructureFactor) -> Result<Written> {
    let existing = sqlx::query_scalar::<_, i32>(
        "SELECT id FROM infrastructure_multipliers WHERE factor_type = $1 AND factor_value = $2",
    )
    .bind(factor.factor_type.as_str())
    .bind(&factor.factor_value)
    .fetch_optional(db)
    .await?;

    match existing {
        None => {
            sqlx::query(
                r#"
                INSERT INTO infrastructure_multipliers (
                    factor_type, factor_value, multiplier, description, created_at, updated_at
                ) VALUES ($1, $2, $3, $4, NOW(), NOW())
                "#,
            )
            .bind(factor.factor_type.as_str())
            .bind(&factor.factor_value)
            .bind(factor.multiplier)
            .bind(&factor.description)
            .execute(db)
            .await?;
            Ok(Written::Inserted)
        }
        Some(id) => {
            sqlx::query(
                r#"
                UPDATE infrastructure_multipliers SET
                    multiplier = $1, description = $2, updated_at = NOW()
                WHERE id = $3
                "#,
            )
            .bind(factor.multiplier)
            .bind(&factor.description)
            .bind(id)
            .execute(db)
            .await?;
            Ok(Written::Updated)
        }
    }
}
