//! Core data types for the valuation engine
//! Reference records are read-only inputs; requests and results live for one call

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// City classification tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    #[serde(rename = "Tier 1")]
    Tier1,
    #[serde(rename = "Tier 2")]
    Tier2,
    #[serde(rename = "Tier 3")]
    Tier3,
    #[serde(rename = "Tier 4")]
    Tier4,
}

impl Tier {
    /// Parse a stored tier label. Unknown labels mean "no tier".
    pub fn parse_label(label: &str) -> Option<Tier> {
        match label.trim().to_ascii_lowercase().as_str() {
            "tier 1" => Some(Tier::Tier1),
            "tier 2" => Some(Tier::Tier2),
            "tier 3" => Some(Tier::Tier3),
            "tier 4" => Some(Tier::Tier4),
            _ => None,
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::Tier1 => write!(f, "Tier 1"),
            Tier::Tier2 => write!(f, "Tier 2"),
            Tier::Tier3 => write!(f, "Tier 3"),
            Tier::Tier4 => write!(f, "Tier 4"),
        }
    }
}

/// Land-use classification of a plot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LandUse {
    Residential,
    Commercial,
    Agricultural,
    Industrial,
    /// Anything outside the fixed set; priced neutrally
    Other(String),
}

impl LandUse {
    pub fn parse(label: &str) -> LandUse {
        match label.trim().to_ascii_lowercase().as_str() {
            "residential" => LandUse::Residential,
            "commercial" => LandUse::Commercial,
            "agricultural" => LandUse::Agricultural,
            "industrial" => LandUse::Industrial,
            _ => LandUse::Other(label.trim().to_string()),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, LandUse::Other(_))
    }
}

impl From<String> for LandUse {
    fn from(value: String) -> Self {
        LandUse::parse(&value)
    }
}

impl From<LandUse> for String {
    fn from(value: LandUse) -> Self {
        value.to_string()
    }
}

impl std::fmt::Display for LandUse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LandUse::Residential => write!(f, "residential"),
            LandUse::Commercial => write!(f, "commercial"),
            LandUse::Agricultural => write!(f, "agricultural"),
            LandUse::Industrial => write!(f, "industrial"),
            LandUse::Other(label) => write!(f, "{}", label),
        }
    }
}

/// Categories of infrastructure multipliers in the reference table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorType {
    RoadWidth,
    NearbySchools,
    NearbyMetro,
    CommercialArea,
    AirportProximity,
    ItParkProximity,
}

impl FactorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FactorType::RoadWidth => "road_width",
            FactorType::NearbySchools => "nearby_schools",
            FactorType::NearbyMetro => "nearby_metro",
            FactorType::CommercialArea => "commercial_area",
            FactorType::AirportProximity => "airport_proximity",
            FactorType::ItParkProximity => "it_park_proximity",
        }
    }
}

impl std::fmt::Display for FactorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FactorType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "road_width" => Ok(FactorType::RoadWidth),
            "nearby_schools" => Ok(FactorType::NearbySchools),
            "nearby_metro" => Ok(FactorType::NearbyMetro),
            "commercial_area" => Ok(FactorType::CommercialArea),
            "airport_proximity" => Ok(FactorType::AirportProximity),
            "it_park_proximity" => Ok(FactorType::ItParkProximity),
            other => Err(anyhow::anyhow!("Unknown factor type: {}", other)),
        }
    }
}

/// City-level reference record, unique by (name, region)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub id: i32,
    pub name: String,
    pub region: String,
    pub base_price: f64,
    pub growth_rate: f64,
    pub population: Option<i64>,
    pub tier: Option<Tier>,
}

/// Locality within a city; its price overrides the city's base price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubLocationRecord {
    pub id: i32,
    pub location_id: i32,
    pub name: String,
    pub price: f64,
    /// Relative premium recorded with the locality; not part of pricing
    pub location_multiplier: f64,
    pub classification: Option<LandUse>,
    pub postal_code: Option<String>,
}

/// One row of the infrastructure multiplier table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfrastructureFactor {
    pub factor_type: FactorType,
    /// Band specification ("20-30", ">40") or category token ("yes"/"no")
    pub factor_value: String,
    pub multiplier: f64,
    pub description: Option<String>,
}

/// Input to one estimation call. Assumed validated by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateRequest {
    pub region: String,
    pub location: String,
    pub sub_location: Option<String>,
    pub plot_size: f64,
    pub road_width: f64,
    pub nearby_schools: bool,
    pub nearby_metro: bool,
    pub commercial_area: bool,
    pub target_year: i32,
    pub land_use: LandUse,
}

impl EstimateRequest {
    /// Request with neutral site characteristics, useful as a starting point
    pub fn new(region: impl Into<String>, location: impl Into<String>, target_year: i32) -> Self {
        EstimateRequest {
            region: region.into(),
            location: location.into(),
            sub_location: None,
            plot_size: 1000.0,
            road_width: 20.0,
            nearby_schools: false,
            nearby_metro: false,
            commercial_area: false,
            target_year,
            land_use: LandUse::Residential,
        }
    }
}

/// The five multiplicative components of an estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    #[serde(rename = "base_price_per_sqft")]
    pub base_price: f64,
    pub location_multiplier: f64,
    pub infrastructure_multiplier: f64,
    pub year_trend_factor: f64,
    #[serde(rename = "area_type_multiplier")]
    pub land_use_multiplier: f64,
}

/// Output of one estimation call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateResult {
    #[serde(rename = "estimated_price_per_sqft")]
    pub price_per_unit: f64,
    #[serde(rename = "total_estimated_price")]
    pub total_price: f64,
    #[serde(rename = "confidence_score")]
    pub confidence: f64,
    pub data_sources: Vec<String>,
    #[serde(rename = "calculation_breakdown")]
    pub breakdown: Breakdown,
}

/// Round half away from zero to 2 decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_labels() {
        assert_eq!(Tier::parse_label("Tier 1"), Some(Tier::Tier1));
        assert_eq!(Tier::parse_label(" tier 4 "), Some(Tier::Tier4));
        assert_eq!(Tier::parse_label("Metro"), None);
        assert_eq!(Tier::Tier2.to_string(), "Tier 2");
    }

    #[test]
    fn test_land_use_parse() {
        assert_eq!(LandUse::parse("Commercial"), LandUse::Commercial);
        assert_eq!(
            LandUse::parse("forest"),
            LandUse::Other("forest".to_string())
        );
        assert!(!LandUse::parse("forest").is_known());
    }

    #[test]
    fn test_land_use_serde_as_string() {
        let json = serde_json::to_string(&LandUse::Agricultural).unwrap();
        assert_eq!(json, "\"agricultural\"");

        let parsed: LandUse = serde_json::from_str("\"wetland\"").unwrap();
        assert_eq!(parsed, LandUse::Other("wetland".to_string()));
    }

    #[test]
    fn test_factor_type_tokens() {
        assert_eq!(
            "it_park_proximity".parse::<FactorType>().unwrap(),
            FactorType::ItParkProximity
        );
        assert_eq!(FactorType::NearbyMetro.to_string(), "nearby_metro");
        assert!("parking".parse::<FactorType>().is_err());
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(10890.000000000004), 10890.0);
        assert_eq!(round2(1.005_1), 1.01);
        assert_eq!(round2(2.0), 2.0);
    }
}
