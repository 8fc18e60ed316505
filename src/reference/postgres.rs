//! Reference data provider backed by PostgreSQL

use crate::reference::types::{CityRow, LocalityRow, MultiplierRow};
use crate::valuation::provider::ReferenceData;
use crate::valuation::types::{
    FactorType, InfrastructureFactor, LocationRecord, SubLocationRecord,
};
use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::warn;

const CITY_COLUMNS: &str =
    "id, name, state, base_price_per_sqft, growth_rate, population, tier";
const LOCALITY_COLUMNS: &str =
    "id, city_id, name, price_per_sqft, location_multiplier, area_type, pin_code";

#[derive(Clone)]
pub struct PgReferenceData {
    db: PgPool,
}

impl PgReferenceData {
    pub fn new(db: PgPool) -> Self {
        PgReferenceData { db }
    }

    pub fn pool(&self) -> &PgPool {
        &self.db
    }

    /// All cities, optionally restricted to one state, ordered by name
    pub async fn list_cities(&self, state: Option<&str>) -> Result<Vec<LocationRecord>> {
        let rows = match state {
            Some(state) => {
                sqlx::query_as::<_, CityRow>(&format!(
                    "SELECT {} FROM cities WHERE state = $1 ORDER BY name",
                    CITY_COLUMNS
                ))
                .bind(state)
                .fetch_all(&self.db)
                .await?
            }
            None => {
                sqlx::query_as::<_, CityRow>(&format!(
                    "SELECT {} FROM cities ORDER BY name",
                    CITY_COLUMNS
                ))
                .fetch_all(&self.db)
                .await?
            }
        };
        Ok(rows.into_iter().map(LocationRecord::from).collect())
    }

    /// First city with this name, optionally within one state
    pub async fn find_city(&self, name: &str, state: Option<&str>) -> Result<Option<LocationRecord>> {
        let row = sqlx::query_as::<_, CityRow>(&format!(
            "SELECT {} FROM cities WHERE name = $1 AND ($2::TEXT IS NULL OR state = $2) ORDER BY id LIMIT 1",
            CITY_COLUMNS
        ))
        .bind(name)
        .bind(state)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(LocationRecord::from))
    }

    /// Localities of one city, ordered by name
    pub async fn list_localities(&self, city_id: i32) -> Result<Vec<SubLocationRecord>> {
        let rows = sqlx::query_as::<_, LocalityRow>(&format!(
            "SELECT {} FROM localities WHERE city_id = $1 ORDER BY name",
            LOCALITY_COLUMNS
        ))
        .bind(city_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(SubLocationRecord::from).collect())
    }

    /// Every multiplier row in table order; rows with unknown types are skipped
    pub async fn list_all_factors(&self) -> Result<Vec<InfrastructureFactor>> {
        let rows = sqlx::query_as::<_, MultiplierRow>(
            "SELECT id, factor_type, factor_value, multiplier, description \
             FROM infrastructure_multipliers ORDER BY factor_type, id",
        )
        .fetch_all(&self.db)
        .await?;
        Ok(into_factors(rows))
    }
}

fn into_factors(rows: Vec<MultiplierRow>) -> Vec<InfrastructureFactor> {
    rows.into_iter()
        .filter_map(|row| {
            let id = row.id;
            match InfrastructureFactor::try_from(row) {
                Ok(factor) => Some(factor),
                Err(e) => {
                    warn!("Skipping infrastructure multiplier {}: {}", id, e);
                    None
                }
            }
        })
        .collect()
}

#[async_trait]
impl ReferenceData for PgReferenceData {
    async fn find_location(&self, name: &str, region: &str) -> Result<Option<LocationRecord>> {
        let row = sqlx::query_as::<_, CityRow>(&format!(
            "SELECT {} FROM cities WHERE name = $1 AND state = $2",
            CITY_COLUMNS
        ))
        .bind(name)
        .bind(region)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(LocationRecord::from))
    }

    async fn find_sub_location(
        &self,
        name: &str,
        parent: &LocationRecord,
    ) -> Result<Option<SubLocationRecord>> {
        let row = sqlx::query_as::<_, LocalityRow>(&format!(
            "SELECT {} FROM localities WHERE name = $1 AND city_id = $2",
            LOCALITY_COLUMNS
        ))
        .bind(name)
        .bind(parent.id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(SubLocationRecord::from))
    }

    async fn list_infrastructure_factors(
        &self,
        factor_type: FactorType,
    ) -> Result<Vec<InfrastructureFactor>> {
        let rows = sqlx::query_as::<_, MultiplierRow>(
            "SELECT id, factor_type, factor_value, multiplier, description \
             FROM infrastructure_multipliers WHERE factor_type = $1 ORDER BY id",
        )
        .bind(factor_type.as_str())
        .fetch_all(&self.db)
        .await?;
        Ok(into_factors(rows))
    }

    async fn find_infrastructure_factor(
        &self,
        factor_type: FactorType,
        factor_value: &str,
    ) -> Result<Option<InfrastructureFactor>> {
        let row = sqlx::query_as::<_, MultiplierRow>(
            "SELECT id, factor_type, factor_value, multiplier, description \
             FROM infrastructure_multipliers WHERE factor_type = $1 AND factor_value = $2 \
             ORDER BY id LIMIT 1",
        )
        .bind(factor_type.as_str())
        .bind(factor_value)
        .fetch_optional(&self.db)
        .await?;
        row.map(InfrastructureFactor::try_from).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_factors_skips_unknown_types() {
        let rows = vec![
            MultiplierRow {
                id: 1,
                factor_type: "road_width".to_string(),
                factor_value: "0-12".to_string(),
                multiplier: 0.9,
                description: None,
            },
            MultiplierRow {
                id: 2,
                factor_type: "flood_zone".to_string(),
                factor_value: "yes".to_string(),
                multiplier: 0.7,
                description: None,
            },
        ];

        let factors = into_factors(rows);
        assert_eq!(factors.len(), 1);
        assert_eq!(factors[0].factor_type, FactorType::RoadWidth);
    }

    #[tokio::test]
    #[ignore] // Requires a running database with the migrations applied
    async fn test_lookup_seeded_city() {
        dotenvy::dotenv().ok();
        let url = std::env::var("DATABASE_URL").unwrap();
        let db = PgPool::connect(&url).await.unwrap();
        let provider = PgReferenceData::new(db);

        let mumbai = provider.find_location("Mumbai", "Maharashtra").await.unwrap();
        assert!(mumbai.is_some());

        let bands = provider
            .list_infrastructure_factors(FactorType::RoadWidth)
            .await
            .unwrap();
        assert!(!bands.is_empty());
    }
}
