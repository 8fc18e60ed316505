//! Data types for the reference data pipeline and its Postgres tables

use crate::valuation::types::{
    FactorType, InfrastructureFactor, LandUse, LocationRecord, SubLocationRecord, Tier,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{Cursor, Read};
use std::path::PathBuf;
use uuid::Uuid;

/// Raw data from a reference source - tagged union
#[derive(Debug)]
pub enum RawData {
    File(PathBuf),
    Bytes(Bytes),
    Csv(String),
}

impl RawData {
    /// Open the payload for CSV reading, whatever its origin
    pub fn reader(&self) -> anyhow::Result<Box<dyn Read + '_>> {
        match self {
            RawData::File(path) => {
                let file = fs::File::open(path)
                    .map_err(|e| anyhow::anyhow!("Cannot open {:?}: {}", path, e))?;
                Ok(Box::new(file))
            }
            RawData::Bytes(bytes) => Ok(Box::new(Cursor::new(bytes.as_ref()))),
            RawData::Csv(text) => Ok(Box::new(Cursor::new(text.as_bytes()))),
        }
    }
}

/// City row as imported from CSV, before it has a database id
#[derive(Debug, Clone, PartialEq)]
pub struct CityImport {
    pub name: String,
    pub state: String,
    pub base_price_per_sqft: f64,
    pub growth_rate: f64,
    pub population: Option<i64>,
    pub tier: Option<String>,
}

/// Locality row as imported from CSV; the parent city is resolved on write
#[derive(Debug, Clone, PartialEq)]
pub struct LocalityImport {
    pub name: String,
    pub city_name: String,
    pub state: String,
    pub price_per_sqft: f64,
    pub location_multiplier: f64,
    pub area_type: String,
    pub pin_code: Option<String>,
}

/// Database row from cities table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CityRow {
    pub id: i32,
    pub name: String,
    pub state: String,
    pub base_price_per_sqft: f64,
    pub growth_rate: f64,
    pub population: Option<i64>,
    pub tier: Option<String>,
}

impl From<CityRow> for LocationRecord {
    fn from(row: CityRow) -> Self {
        LocationRecord {
            id: row.id,
            name: row.name,
            region: row.state,
            base_price: row.base_price_per_sqft,
            growth_rate: row.growth_rate,
            population: row.population,
            tier: row.tier.as_deref().and_then(Tier::parse_label),
        }
    }
}

/// Database row from localities table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LocalityRow {
    pub id: i32,
    pub city_id: i32,
    pub name: String,
    pub price_per_sqft: f64,
    pub location_multiplier: f64,
    pub area_type: Option<String>,
    pub pin_code: Option<String>,
}

impl From<LocalityRow> for SubLocationRecord {
    fn from(row: LocalityRow) -> Self {
        SubLocationRecord {
            id: row.id,
            location_id: row.city_id,
            name: row.name,
            price: row.price_per_sqft,
            location_multiplier: row.location_multiplier,
            classification: row.area_type.as_deref().map(LandUse::parse),
            postal_code: row.pin_code,
        }
    }
}

/// Locality joined with its city, for export
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LocalityExportRow {
    pub name: String,
    pub city_name: String,
    pub state: String,
    pub price_per_sqft: f64,
    pub location_multiplier: f64,
    pub area_type: Option<String>,
    pub pin_code: Option<String>,
}

/// Database row from infrastructure_multipliers table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MultiplierRow {
    pub id: i32,
    pub factor_type: String,
    pub factor_value: String,
    pub multiplier: f64,
    pub description: Option<String>,
}

impl TryFrom<MultiplierRow> for InfrastructureFactor {
    type Error = anyhow::Error;

    fn try_from(row: MultiplierRow) -> Result<Self, Self::Error> {
        Ok(InfrastructureFactor {
            factor_type: row.factor_type.parse::<FactorType>()?,
            factor_value: row.factor_value,
            multiplier: row.multiplier,
            description: row.description,
        })
    }
}

/// Database row from price_estimates table
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EstimateRow {
    pub id: Uuid,
    pub state: String,
    pub city: String,
    pub locality: Option<String>,
    pub plot_size_sqft: f64,
    pub road_width_ft: f64,
    pub nearby_schools: bool,
    pub nearby_metro: bool,
    pub commercial_area: bool,
    pub year: i32,
    pub area_type: String,
    pub estimated_price_per_sqft: Decimal,
    pub total_estimated_price: Decimal,
    pub confidence_score: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Write operation statistics
#[derive(Debug, Default, Clone, PartialEq)]
pub struct WriteStats {
    pub inserted: usize,
    pub updated: usize,
    pub skipped: usize,
    pub errors: usize,
}

impl std::fmt::Display for WriteStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "inserted: {}, updated: {}, skipped: {}, errors: {}",
            self.inserted, self.updated, self.skipped, self.errors
        )
    }
}

impl std::ops::AddAssign for WriteStats {
    fn add_assign(&mut self, other: WriteStats) {
        self.inserted += other.inserted;
        self.updated += other.updated;
        self.skipped += other.skipped;
        self.errors += other.errors;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_city_row_into_record() {
        let row = CityRow {
            id: 7,
            name: "Pune".to_string(),
            state: "Maharashtra".to_string(),
            base_price_per_sqft: 16000.0,
            growth_rate: 0.08,
            population: Some(3_124_458),
            tier: Some("Tier 1".to_string()),
        };

        let record = LocationRecord::from(row);
        assert_eq!(record.region, "Maharashtra");
        assert_eq!(record.tier, Some(Tier::Tier1));

        let unknown_tier = CityRow {
            tier: Some("Metro".to_string()),
            ..CityRow {
                id: 1,
                name: "X".to_string(),
                state: "Y".to_string(),
                base_price_per_sqft: 1.0,
                growth_rate: 0.0,
                population: None,
                tier: None,
            }
        };
        assert_eq!(LocationRecord::from(unknown_tier).tier, None);
    }

    #[test]
    fn test_multiplier_row_rejects_unknown_type() {
        let row = MultiplierRow {
            id: 1,
            factor_type: "parking".to_string(),
            factor_value: "yes".to_string(),
            multiplier: 1.05,
            description: None,
        };
        assert!(InfrastructureFactor::try_from(row).is_err());
    }

    #[test]
    fn test_raw_data_reader() {
        let raw = RawData::Csv("a,b\n1,2\n".to_string());
        let mut text = String::new();
        raw.reader().unwrap().read_to_string(&mut text).unwrap();
        assert_eq!(text, "a,b\n1,2\n");

        let raw = RawData::Bytes(Bytes::from_static(b"x"));
        let mut text = String::new();
        raw.reader().unwrap().read_to_string(&mut text).unwrap();
        assert_eq!(text, "x");
    }

    #[test]
    fn test_write_stats_accumulate() {
        let mut total = WriteStats::default();
        total += WriteStats { inserted: 2, updated: 1, skipped: 0, errors: 0 };
        total += WriteStats { inserted: 1, updated: 0, skipped: 3, errors: 1 };
        assert_eq!(total.to_string(), "inserted: 3, updated: 1, skipped: 3, errors: 1");
    }
}
