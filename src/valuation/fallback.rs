//! Degraded estimate for locations missing from the reference data

use crate::valuation::engine::ValuationConfig;
use crate::valuation::multipliers::year_trend_factor;
use crate::valuation::types::{round2, Breakdown, EstimateResult};
use tracing::info;

/// Average price per sqft for regions with known market levels
pub const REGIONAL_AVERAGES: [(&str, f64); 10] = [
    ("Maharashtra", 8000.0),
    ("Karnataka", 6500.0),
    ("Delhi", 25000.0),
    ("Tamil Nadu", 5500.0),
    ("Gujarat", 4500.0),
    ("Rajasthan", 3500.0),
    ("Uttar Pradesh", 3000.0),
    ("West Bengal", 4000.0),
    ("Punjab", 4200.0),
    ("Haryana", 6000.0),
];

/// Used for every region not in [`REGIONAL_AVERAGES`]
pub const NATIONAL_AVERAGE: f64 = 3500.0;

pub fn regional_average(region: &str) -> f64 {
    REGIONAL_AVERAGES
        .iter()
        .find(|(name, _)| *name == region)
        .map(|(_, price)| *price)
        .unwrap_or(NATIONAL_AVERAGE)
}

/// Regional average projected by inflation only. Location, infrastructure
/// and land-use components are fixed at 1.0.
pub fn estimate_fallback(
    config: &ValuationConfig,
    confidence: f64,
    region: &str,
    location_name: &str,
    plot_size: f64,
    target_year: i32,
) -> EstimateResult {
    let base_price = regional_average(region);
    let year_factor = year_trend_factor(config.inflation_rate, target_year, config.base_year);

    info!(
        "No reference data for {}, {}: using regional average {}",
        location_name, region, base_price
    );

    let price_per_unit = round2(base_price * year_factor);

    EstimateResult {
        price_per_unit,
        total_price: round2(price_per_unit * plot_size),
        confidence: round2(confidence),
        data_sources: vec![format!("Regional average: {}", region)],
        breakdown: Breakdown {
            base_price: round2(base_price),
            location_multiplier: 1.0,
            infrastructure_multiplier: 1.0,
            year_trend_factor: round2(year_factor),
            land_use_multiplier: 1.0,
        },
    }
}
