//! Estimate history - every served estimate is recorded in price_estimates

use crate::valuation::types::{EstimateRequest, EstimateResult};
use anyhow::{Context, Result};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

fn money(value: f64) -> Result<Decimal> {
    Decimal::from_f64(value)
        .map(|d| d.round_dp(2))
        .with_context(|| format!("{} cannot be stored as NUMERIC", value))
}

pub async fn record_estimate(
    db: &PgPool,
    request: &EstimateRequest,
    result: &EstimateResult,
) -> Result<Uuid> {
    let id = Uuid::new_v4();

    sqlx::query(
        r#"
        INSERT INTO price_estimates (
            id, state, city, locality, plot_size_sqft, road_width_ft,
            nearby_schools, nearby_metro, commercial_area, year, area_type,
            estimated_price_per_sqft, total_estimated_price, confidence_score, created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, NOW())
        "#,
    )
    .bind(id)
    .bind(&request.region)
    .bind(&request.location)
    .bind(&request.sub_location)
    .bind(request.plot_size)
    .bind(request.road_width)
    .bind(request.nearby_schools)
    .bind(request.nearby_metro)
    .bind(request.commercial_area)
    .bind(request.target_year)
    .bind(request.land_use.to_string())
    .bind(money(result.price_per_unit)?)
    .bind(money(result.total_price)?)
    .bind(money(result.confidence)?)
    .execute(db)
    .await
    .context("Failed to record estimate")?;

    Ok(id)
}
