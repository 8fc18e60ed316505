//! Estimate request parameters - decoding and validation at the API boundary

use crate::api::error::ValidationError;
use crate::valuation::types::{EstimateRequest, LandUse};
use serde::Deserialize;

pub const MIN_YEAR: i32 = 2020;
pub const MAX_YEAR: i32 = 2030;
pub const DEFAULT_PLOT_SIZE_SQFT: f64 = 1000.0;
pub const DEFAULT_ROAD_WIDTH_FT: f64 = 20.0;

/// A parameter given as JSON scalar or query-string text
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Scalar {
    fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Number(n) => Some(*n),
            Scalar::Text(s) => s.trim().parse::<f64>().ok(),
            Scalar::Bool(_) => None,
        }
    }

    fn as_year(&self) -> Option<i32> {
        match self {
            Scalar::Number(n) if n.fract() == 0.0 => Some(*n as i32),
            Scalar::Text(s) => s.trim().parse::<i32>().ok(),
            _ => None,
        }
    }

    fn is_truthy(&self) -> bool {
        match self {
            Scalar::Bool(b) => *b,
            Scalar::Number(n) => *n == 1.0,
            Scalar::Text(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EstimateParams {
    pub state: Option<String>,
    pub city: Option<String>,
    pub locality: Option<String>,
    pub plot_size_sqft: Option<Scalar>,
    pub road_width_ft: Option<Scalar>,
    pub nearby_schools: Option<Scalar>,
    pub nearby_metro: Option<Scalar>,
    pub commercial_area: Option<Scalar>,
    pub year: Option<Scalar>,
    pub area_type: Option<String>,
}

fn required_text(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn number_or(
    value: &Option<Scalar>,
    field: &'static str,
    default: f64,
) -> Result<f64, ValidationError> {
    match value {
        None => Ok(default),
        Some(scalar) => scalar
            .as_f64()
            .filter(|n| n.is_finite())
            .ok_or(ValidationError::InvalidNumber(field)),
    }
}

fn flag(value: &Option<Scalar>) -> bool {
    value.as_ref().map(Scalar::is_truthy).unwrap_or(false)
}

impl EstimateParams {
    /// Check ranges and fill defaults, producing a request the engine can trust
    pub fn validate(&self, default_year: i32) -> Result<EstimateRequest, ValidationError> {
        let (Some(region), Some(location)) = (required_text(&self.state), required_text(&self.city))
        else {
            return Err(ValidationError::MissingLocation);
        };

        let plot_size = number_or(&self.plot_size_sqft, "plot_size_sqft", DEFAULT_PLOT_SIZE_SQFT)?;
        let road_width = number_or(&self.road_width_ft, "road_width_ft", DEFAULT_ROAD_WIDTH_FT)?;
        let target_year = match &self.year {
            None => default_year,
            Some(scalar) => scalar.as_year().ok_or(ValidationError::InvalidYear)?,
        };

        if plot_size <= 0.0 {
            return Err(ValidationError::NonPositivePlotSize);
        }
        if road_width < 0.0 {
            return Err(ValidationError::NegativeRoadWidth);
        }
        if !(MIN_YEAR..=MAX_YEAR).contains(&target_year) {
            return Err(ValidationError::YearOutOfRange {
                year: target_year,
                min: MIN_YEAR,
                max: MAX_YEAR,
            });
        }

        let land_use = match required_text(&self.area_type) {
            None => LandUse::Residential,
            Some(label) => {
                let land_use = LandUse::parse(&label);
                if !land_use.is_known() {
                    return Err(ValidationError::InvalidAreaType(label));
                }
                land_use
            }
        };

        Ok(EstimateRequest {
            region,
            location,
            sub_location: required_text(&self.locality),
            plot_size,
            road_width,
            nearby_schools: flag(&self.nearby_schools),
            nearby_metro: flag(&self.nearby_metro),
            commercial_area: flag(&self.commercial_area),
            target_year,
            land_use,
        })
    }
}
