//! Multiplier sub-calculations composed by the engine

use crate::valuation::band::band_matches;
use crate::valuation::policy::{
    population_multiplier, tier_multiplier, AmenityDefaults, RoadWidthLadder,
};
use crate::valuation::provider::ReferenceData;
use crate::valuation::types::{FactorType, InfrastructureFactor, LocationRecord};
use tracing::{debug, warn};

/// Tier factor times population-band factor
pub fn location_multiplier(location: &LocationRecord) -> f64 {
    let tier = location.tier.map(tier_multiplier).unwrap_or(1.0);
    let population = population_multiplier(location.population);

    debug!(
        "Location multiplier for {}: tier {:?} -> {}, population {:?} -> {}",
        location.name, location.tier, tier, location.population, population
    );

    tier * population
}

/// Compound growth from the base year to the target year
pub fn year_trend_factor(annual_rate: f64, target_year: i32, base_year: i32) -> f64 {
    (1.0 + annual_rate).powi(target_year - base_year)
}

/// First row, in table order, whose band contains the road width
pub fn first_matching_band(
    factors: &[InfrastructureFactor],
    road_width: f64,
) -> Option<&InfrastructureFactor> {
    factors
        .iter()
        .find(|f| band_matches(road_width, &f.factor_value))
}

/// Site infrastructure inputs for one estimate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SiteFactors {
    pub road_width: f64,
    pub nearby_schools: bool,
    pub nearby_metro: bool,
    pub commercial_area: bool,
}

/// Road width and amenity multipliers composed multiplicatively
pub async fn infrastructure_multiplier<P>(
    provider: &P,
    ladder: &RoadWidthLadder,
    amenities: &AmenityDefaults,
    site: SiteFactors,
) -> f64
where
    P: ReferenceData + ?Sized,
{
    let mut multiplier = road_width_multiplier(provider, ladder, site.road_width).await;

    if site.nearby_schools {
        multiplier *=
            amenity_multiplier(provider, FactorType::NearbySchools, amenities.nearby_schools).await;
    }
    if site.nearby_metro {
        multiplier *=
            amenity_multiplier(provider, FactorType::NearbyMetro, amenities.nearby_metro).await;
    }
    if site.commercial_area {
        multiplier *=
            amenity_multiplier(provider, FactorType::CommercialArea, amenities.commercial_area)
                .await;
    }

    multiplier
}

/// Table search first; the ladder is consulted only when no band matches
async fn road_width_multiplier<P>(provider: &P, ladder: &RoadWidthLadder, road_width: f64) -> f64
where
    P: ReferenceData + ?Sized,
{
    let table = match provider
        .list_infrastructure_factors(FactorType::RoadWidth)
        .await
    {
        Ok(rows) => rows,
        Err(e) => {
            warn!("Road width bands unavailable, using default ladder: {}", e);
            Vec::new()
        }
    };

    match first_matching_band(&table, road_width) {
        Some(row) => {
            debug!(
                "Road width {} matched band {} (x{})",
                road_width, row.factor_value, row.multiplier
            );
            row.multiplier
        }
        None => {
            let multiplier = ladder.multiplier(road_width);
            debug!("Road width {} matched no band, ladder gives x{}", road_width, multiplier);
            multiplier
        }
    }
}

/// "yes" row of a flag factor, or the hardcoded default
async fn amenity_multiplier<P>(provider: &P, factor_type: FactorType, default: f64) -> f64
where
    P: ReferenceData + ?Sized,
{
    match provider.find_infrastructure_factor(factor_type, "yes").await {
        Ok(Some(row)) => row.multiplier,
        Ok(None) => default,
        Err(e) => {
            warn!("Lookup of {} failed, using default x{}: {}", factor_type, default, e);
            default
        }
    }
}
