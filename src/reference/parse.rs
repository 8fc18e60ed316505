//! Parse functions - transform raw CSV into reference records

use crate::reference::types::{CityImport, LocalityImport, RawData};
use crate::reference::utils::{non_empty, parse_number};
use crate::valuation::types::{FactorType, InfrastructureFactor, LandUse};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{info, warn};

/// Default annual growth when a city row leaves it blank
pub const DEFAULT_GROWTH_RATE: f64 = 0.05;

pub const DEFAULT_LOCATION_MULTIPLIER: f64 = 1.0;

#[derive(Debug, Deserialize)]
struct CityCsvRow {
    name: String,
    state: String,
    base_price_per_sqft: String,
    #[serde(default)]
    growth_rate: Option<String>,
    #[serde(default)]
    population: Option<String>,
    #[serde(default)]
    tier: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LocalityCsvRow {
    name: String,
    city_name: String,
    state: String,
    price_per_sqft: String,
    #[serde(default)]
    location_multiplier: Option<String>,
    #[serde(default)]
    area_type: Option<String>,
    #[serde(default)]
    pin_code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MultiplierCsvRow {
    factor_type: String,
    factor_value: String,
    multiplier: String,
    #[serde(default)]
    description: Option<String>,
}

/// Deserialize every row, converting each and skipping the ones that fail
fn parse_rows<R, T, F>(raw: &RawData, label: &str, convert: F) -> Result<Vec<T>>
where
    R: DeserializeOwned,
    F: Fn(R) -> Result<T>,
{
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(raw.reader()?);

    let mut records = Vec::new();
    let mut parse_errors = 0;

    for (idx, result) in reader.deserialize::<R>().enumerate() {
        let converted = result
            .map_err(anyhow::Error::from)
            .and_then(&convert);
        match converted {
            Ok(record) => records.push(record),
            Err(e) => {
                parse_errors += 1;
                if parse_errors <= 10 {
                    // Only log first 10 errors
                    warn!("Failed to parse {} row {}: {}", label, idx, e);
                }
            }
        }
    }

    info!(
        "Parsed {} {} rows ({} errors)",
        records.len(),
        label,
        parse_errors
    );

    Ok(records)
}

fn required_number(raw: &str, column: &str) -> Result<f64> {
    parse_number(raw).with_context(|| format!("{} is not a number: {:?}", column, raw))
}

fn city_row(row: CityCsvRow) -> Result<CityImport> {
    let base_price_per_sqft = required_number(&row.base_price_per_sqft, "base_price_per_sqft")?;
    if base_price_per_sqft <= 0.0 {
        return Err(anyhow::anyhow!("base_price_per_sqft must be positive"));
    }

    let growth_rate = match non_empty(row.growth_rate) {
        Some(raw) => required_number(&raw, "growth_rate")?,
        None => DEFAULT_GROWTH_RATE,
    };

    let population = match non_empty(row.population) {
        Some(raw) => Some(
            raw.replace(',', "")
                .parse::<i64>()
                .with_context(|| format!("population is not an integer: {:?}", raw))?,
        ),
        None => None,
    };

    Ok(CityImport {
        name: row.name,
        state: row.state,
        base_price_per_sqft,
        growth_rate,
        population,
        tier: non_empty(row.tier),
    })
}

fn locality_row(row: LocalityCsvRow) -> Result<LocalityImport> {
    let price_per_sqft = required_number(&row.price_per_sqft, "price_per_sqft")?;
    if price_per_sqft <= 0.0 {
        return Err(anyhow::anyhow!("price_per_sqft must be positive"));
    }

    let location_multiplier = match non_empty(row.location_multiplier) {
        Some(raw) => required_number(&raw, "location_multiplier")?,
        None => DEFAULT_LOCATION_MULTIPLIER,
    };

    let area_type = non_empty(row.area_type)
        .map(|raw| LandUse::parse(&raw))
        .unwrap_or(LandUse::Residential);

    Ok(LocalityImport {
        name: row.name,
        city_name: row.city_name,
        state: row.state,
        price_per_sqft,
        location_multiplier,
        area_type: area_type.to_string(),
        pin_code: non_empty(row.pin_code),
    })
}

fn multiplier_row(row: MultiplierCsvRow) -> Result<InfrastructureFactor> {
    let multiplier = required_number(&row.multiplier, "multiplier")?;
    if multiplier <= 0.0 {
        return Err(anyhow::anyhow!("multiplier must be positive"));
    }

    Ok(InfrastructureFactor {
        factor_type: row.factor_type.parse::<FactorType>()?,
        factor_value: row.factor_value,
        multiplier,
        description: non_empty(row.description),
    })
}

/// Parse a cities CSV (name, state, base_price_per_sqft, growth_rate, population, tier)
pub fn parse_cities(raw: &RawData) -> Result<Vec<CityImport>> {
    parse_rows(raw, "city", city_row)
}

/// Parse a localities CSV (name, city_name, state, price_per_sqft, location_multiplier,
/// area_type, pin_code)
pub fn parse_localities(raw: &RawData) -> Result<Vec<LocalityImport>> {
    parse_rows(raw, "locality", locality_row)
}

/// Parse an infrastructure multipliers CSV (factor_type, factor_value, multiplier, description)
pub fn parse_multipliers(raw: &RawData) -> Result<Vec<InfrastructureFactor>> {
    parse_rows(raw, "multiplier", multiplier_row)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cities() {
        let raw = RawData::Csv(
            "name,state,base_price_per_sqft,growth_rate,population,tier\n\
             Mumbai,Maharashtra,25000,0.08,12442373,Tier 1\n\
             Shimla,Himachal Pradesh,\"4,500\",,,\n\
             Broken,Nowhere,abc,0.05,,\n"
                .to_string(),
        );

        let cities = parse_cities(&raw).unwrap();
        assert_eq!(cities.len(), 2);

        assert_eq!(cities[0].name, "Mumbai");
        assert_eq!(cities[0].population, Some(12_442_373));
        assert_eq!(cities[0].tier.as_deref(), Some("Tier 1"));

        assert_eq!(cities[1].base_price_per_sqft, 4500.0);
        assert_eq!(cities[1].growth_rate, DEFAULT_GROWTH_RATE);
        assert_eq!(cities[1].population, None);
        assert_eq!(cities[1].tier, None);
    }

    #[test]
    fn test_parse_cities_without_optional_columns() {
        let raw = RawData::Csv("name,state,base_price_per_sqft\nKochi,Kerala,7000\n".to_string());
        let cities = parse_cities(&raw).unwrap();
        assert_eq!(cities.len(), 1);
        assert_eq!(cities[0].growth_rate, DEFAULT_GROWTH_RATE);
    }

    #[test]
    fn test_parse_localities() {
        let raw = RawData::Csv(
            "name,city_name,state,price_per_sqft,location_multiplier,area_type,pin_code\n\
             Bandra West,Mumbai,Maharashtra,45000,1.8,residential,400050\n\
             Lower Parel,Mumbai,Maharashtra,55000,2.2,Commercial,\n\
             Nariman Point,Mumbai,Maharashtra,-1,1.0,commercial,400021\n"
                .to_string(),
        );

        let localities = parse_localities(&raw).unwrap();
        assert_eq!(localities.len(), 2);
        assert_eq!(localities[0].pin_code.as_deref(), Some("400050"));
        assert_eq!(localities[0].location_multiplier, 1.8);
        assert_eq!(localities[1].area_type, "commercial");
        assert_eq!(localities[1].location_multiplier, 2.2);
        assert_eq!(localities[1].pin_code, None);
    }

    #[test]
    fn test_locality_multiplier_defaults_when_absent() {
        let raw = RawData::Csv(
            "name,city_name,state,price_per_sqft
             Wakad,Pune,Maharashtra,15000
"
                .to_string(),
        );

        let localities = parse_localities(&raw).unwrap();
        assert_eq!(localities.len(), 1);
        assert_eq!(localities[0].location_multiplier, DEFAULT_LOCATION_MULTIPLIER);
        assert_eq!(localities[0].area_type, "residential");
    }

    #[test]
    fn test_parse_multipliers() {
        let raw = RawData::Csv(
            "factor_type,factor_value,multiplier,description\n\
             road_width,20-30,1.1,Wide residential roads\n\
             nearby_metro,yes,1.25,\n\
             parking,yes,1.05,Unknown factor\n"
                .to_string(),
        );

        let factors = parse_multipliers(&raw).unwrap();
        assert_eq!(factors.len(), 2);
        assert_eq!(factors[0].factor_type, FactorType::RoadWidth);
        assert_eq!(factors[0].description.as_deref(), Some("Wide residential roads"));
        assert_eq!(factors[1].factor_type, FactorType::NearbyMetro);
        assert_eq!(factors[1].description, None);
    }
}
