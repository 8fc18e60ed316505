//! Fixed pricing policies: confidence levels and hardcoded multiplier defaults

use crate::valuation::types::{LandUse, Tier};

/// Confidence assigned by how specific the resolved location data is
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidencePolicy {
    /// City resolved, no locality requested
    pub location: f64,
    /// City and locality resolved
    pub sub_location: f64,
    /// Locality requested but not found
    pub missing_sub_location: f64,
    /// City not resolved, regional average used
    pub fallback: f64,
}

impl Default for ConfidencePolicy {
    fn default() -> Self {
        ConfidencePolicy {
            location: 0.7,
            sub_location: 0.9,
            missing_sub_location: 0.6,
            fallback: 0.3,
        }
    }
}

/// Road-width multipliers applied when the reference table has no matching band
#[derive(Debug, Clone, PartialEq)]
pub struct RoadWidthLadder {
    /// (minimum width, multiplier), highest threshold first
    pub steps: Vec<(f64, f64)>,
    /// Widths strictly below this are narrow
    pub narrow_below: f64,
    pub narrow_multiplier: f64,
}

impl Default for RoadWidthLadder {
    fn default() -> Self {
        RoadWidthLadder {
            steps: vec![(40.0, 1.3), (30.0, 1.2), (20.0, 1.1)],
            narrow_below: 12.0,
            narrow_multiplier: 0.9,
        }
    }
}

impl RoadWidthLadder {
    pub fn multiplier(&self, road_width: f64) -> f64 {
        if let Some((_, multiplier)) = self.steps.iter().find(|(min, _)| road_width >= *min) {
            return *multiplier;
        }
        if road_width < self.narrow_below {
            return self.narrow_multiplier;
        }
        1.0
    }
}

/// Multipliers used for amenity flags when the table has no "yes" row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmenityDefaults {
    pub nearby_schools: f64,
    pub nearby_metro: f64,
    pub commercial_area: f64,
}

impl Default for AmenityDefaults {
    fn default() -> Self {
        AmenityDefaults {
            nearby_schools: 1.1,
            nearby_metro: 1.25,
            commercial_area: 1.15,
        }
    }
}

/// Everything the engine prices with besides reference data
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValuationPolicy {
    pub confidence: ConfidencePolicy,
    pub road_width: RoadWidthLadder,
    pub amenities: AmenityDefaults,
}

pub fn tier_multiplier(tier: Tier) -> f64 {
    match tier {
        Tier::Tier1 => 1.5,
        Tier::Tier2 => 1.2,
        Tier::Tier3 => 1.0,
        Tier::Tier4 => 0.8,
    }
}

/// Population bands, checked highest first; only the first match applies
pub const POPULATION_BANDS: [(i64, f64); 3] = [
    (10_000_000, 1.3),
    (5_000_000, 1.2),
    (1_000_000, 1.1),
];

pub fn population_multiplier(population: Option<i64>) -> f64 {
    let Some(population) = population else {
        return 1.0;
    };
    POPULATION_BANDS
        .iter()
        .find(|(threshold, _)| population > *threshold)
        .map(|(_, multiplier)| *multiplier)
        .unwrap_or(1.0)
}

pub fn land_use_multiplier(land_use: &LandUse) -> f64 {
    match land_use {
        LandUse::Residential => 1.0,
        LandUse::Commercial => 1.8,
        LandUse::Agricultural => 0.3,
        LandUse::Industrial => 1.5,
        LandUse::Other(_) => 1.0,
    }
}
