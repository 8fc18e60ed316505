//! Valuation engine - composes base price and multipliers into an estimate

use crate::valuation::fallback;
use crate::valuation::multipliers::{
    infrastructure_multiplier, location_multiplier, year_trend_factor, SiteFactors,
};
use crate::valuation::policy::{land_use_multiplier, ValuationPolicy};
use crate::valuation::provider::ReferenceData;
use crate::valuation::types::{round2, Breakdown, EstimateRequest, EstimateResult};
use tracing::{debug, warn};

/// Process-wide pricing constants
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValuationConfig {
    /// Year the reference prices are quoted in
    pub base_year: i32,
    pub inflation_rate: f64,
}

impl Default for ValuationConfig {
    fn default() -> Self {
        ValuationConfig {
            base_year: 2024,
            inflation_rate: 0.06,
        }
    }
}

/// Stateless estimator over a read-only reference data provider.
/// Safe to share across concurrent requests.
pub struct ValuationEngine<P> {
    provider: P,
    config: ValuationConfig,
    policy: ValuationPolicy,
}

impl<P: ReferenceData> ValuationEngine<P> {
    pub fn new(provider: P, config: ValuationConfig) -> Self {
        Self::with_policy(provider, config, ValuationPolicy::default())
    }

    pub fn with_policy(provider: P, config: ValuationConfig, policy: ValuationPolicy) -> Self {
        ValuationEngine {
            provider,
            config,
            policy,
        }
    }

    pub fn config(&self) -> &ValuationConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Estimate price per sqft and total price for a plot.
    /// Never fails: an unknown city degrades to the regional fallback.
    pub async fn estimate(&self, request: &EstimateRequest) -> EstimateResult {
        let location = match self
            .provider
            .find_location(&request.location, &request.region)
            .await
        {
            Ok(Some(location)) => location,
            Ok(None) => return self.estimate_fallback_for(request),
            Err(e) => {
                warn!(
                    "City lookup failed for {}, {}: {}",
                    request.location, request.region, e
                );
                return self.estimate_fallback_for(request);
            }
        };

        let confidence_policy = &self.policy.confidence;
        let mut base_price = location.base_price;
        let mut confidence = confidence_policy.location;
        let mut data_sources = vec![format!("City: {}", location.name)];

        if let Some(ref sub_name) = request.sub_location {
            let sub_location = match self.provider.find_sub_location(sub_name, &location).await {
                Ok(found) => found,
                Err(e) => {
                    warn!("Locality lookup failed for {}: {}", sub_name, e);
                    None
                }
            };

            match sub_location {
                Some(sub_location) => {
                    base_price = sub_location.price;
                    confidence = confidence_policy.sub_location;
                    data_sources.push(format!("Locality: {}", sub_location.name));
                }
                None => {
                    debug!("Locality {} not found in {}", sub_name, location.name);
                    confidence = confidence_policy.missing_sub_location;
                }
            }
        }

        let location_mult = location_multiplier(&location);

        let site = SiteFactors {
            road_width: request.road_width,
            nearby_schools: request.nearby_schools,
            nearby_metro: request.nearby_metro,
            commercial_area: request.commercial_area,
        };
        let infra_mult = infrastructure_multiplier(
            &self.provider,
            &self.policy.road_width,
            &self.policy.amenities,
            site,
        )
        .await;

        let trend = year_trend_factor(
            self.config.inflation_rate + location.growth_rate,
            request.target_year,
            self.config.base_year,
        );

        let land_use_mult = land_use_multiplier(&request.land_use);

        let raw_price = base_price * location_mult * infra_mult * trend * land_use_mult;
        let price_per_unit = round2(raw_price);

        debug!(
            "Estimate for {}, {}: {} x {} x {} x {} x {} = {}",
            location.name,
            location.region,
            base_price,
            location_mult,
            infra_mult,
            trend,
            land_use_mult,
            raw_price
        );

        EstimateResult {
            price_per_unit,
            total_price: round2(price_per_unit * request.plot_size),
            confidence: round2(confidence),
            data_sources,
            breakdown: Breakdown {
                base_price: round2(base_price),
                location_multiplier: round2(location_mult),
                infrastructure_multiplier: round2(infra_mult),
                year_trend_factor: round2(trend),
                land_use_multiplier: round2(land_use_mult),
            },
        }
    }

    /// Regional-average estimate used when the city cannot be resolved
    pub fn estimate_fallback(
        &self,
        region: &str,
        location_name: &str,
        plot_size: f64,
        target_year: i32,
    ) -> EstimateResult {
        fallback::estimate_fallback(
            &self.config,
            self.policy.confidence.fallback,
            region,
            location_name,
            plot_size,
            target_year,
        )
    }

    fn estimate_fallback_for(&self, request: &EstimateRequest) -> EstimateResult {
        self.estimate_fallback(
            &request.region,
            &request.location,
            request.plot_size,
            request.target_year,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::valuation::memory::InMemoryReferenceData;
    use crate::valuation::policy::ConfidencePolicy;
    use crate::valuation::types::{
        FactorType, InfrastructureFactor, LandUse, LocationRecord, SubLocationRecord, Tier,
    };
    use anyhow::Result;
    use approx::assert_relative_eq;
    use async_trait::async_trait;

    fn engine_with(data: InMemoryReferenceData) -> ValuationEngine<InMemoryReferenceData> {
        ValuationEngine::new(data, ValuationConfig::default())
    }

    /// One tier-3 city with a locality and a 20-30 road band
    fn reference() -> InMemoryReferenceData {
        let mut data = InMemoryReferenceData::new();
        let city = data.add_location(
            "Test City",
            "Test State",
            5000.0,
            0.06,
            None,
            Some(Tier::Tier3),
        );
        data.add_sub_location(
            city,
            "Test Locality",
            6000.0,
            1.2,
            Some(LandUse::Residential),
            Some("123456"),
        );
        data.add_factor(FactorType::RoadWidth, "20-30", 1.1);
        data
    }

    fn request() -> EstimateRequest {
        EstimateRequest::new("Test State", "Test City", 2024)
    }

    #[tokio::test]
    async fn test_commercial_plot_with_school() {
        let engine = engine_with(reference());
        let req = EstimateRequest {
            road_width: 25.0,
            nearby_schools: true,
            land_use: LandUse::Commercial,
            ..request()
        };

        let result = engine.estimate(&req).await;

        // 5000 x 1.0 x (1.1 x 1.1) x 1.0 x 1.8
        assert_eq!(result.price_per_unit, 10890.0);
        assert_eq!(result.total_price, 10_890_000.0);
        assert_eq!(result.confidence, 0.7);
        assert_eq!(result.data_sources, vec!["City: Test City"]);
        assert_eq!(result.breakdown.infrastructure_multiplier, 1.21);
        assert_eq!(result.breakdown.land_use_multiplier, 1.8);
        assert_eq!(result.breakdown.year_trend_factor, 1.0);
    }

    #[tokio::test]
    async fn test_locality_overrides_base_price() {
        let engine = engine_with(reference());
        let req = EstimateRequest {
            sub_location: Some("Test Locality".to_string()),
            ..request()
        };

        let result = engine.estimate(&req).await;

        assert_eq!(result.breakdown.base_price, 6000.0);
        assert_eq!(result.confidence, 0.9);
        assert_eq!(
            result.data_sources,
            vec!["City: Test City", "Locality: Test Locality"]
        );
        // road width 20 sits inside "20-30"
        assert_eq!(result.price_per_unit, 6600.0);
    }

    #[tokio::test]
    async fn test_missing_locality_lowers_confidence() {
        let engine = engine_with(reference());
        let req = EstimateRequest {
            sub_location: Some("Unknown Locality".to_string()),
            ..request()
        };

        let result = engine.estimate(&req).await;

        assert_eq!(result.confidence, 0.6);
        assert_eq!(result.breakdown.base_price, 5000.0);
        assert_eq!(result.data_sources, vec!["City: Test City"]);
    }

    #[tokio::test]
    async fn test_unknown_city_uses_fallback() {
        let engine = engine_with(reference());
        let req = EstimateRequest::new("Nowhere State", "Nowhere City", 2024);

        let result = engine.estimate(&req).await;

        assert_eq!(result.price_per_unit, 3500.0);
        assert_eq!(result.total_price, 3_500_000.0);
        assert_eq!(result.confidence, 0.3);
        assert_eq!(result.breakdown.location_multiplier, 1.0);
        assert_eq!(result.breakdown.infrastructure_multiplier, 1.0);
        assert!(result.data_sources[0].contains("Nowhere State"));
    }

    #[tokio::test]
    async fn test_year_trend_compounds_growth_and_inflation() {
        let engine = engine_with(reference());

        let past = engine.estimate(&EstimateRequest { target_year: 2022, ..request() }).await;
        let now = engine.estimate(&request()).await;
        let future = engine.estimate(&EstimateRequest { target_year: 2027, ..request() }).await;

        assert!(past.price_per_unit < now.price_per_unit);
        assert!(now.price_per_unit < future.price_per_unit);
        // (1 + 0.06 + 0.06)^3
        assert_eq!(future.breakdown.year_trend_factor, 1.4);
        assert_relative_eq!(
            future.price_per_unit,
            5500.0 * 1.12_f64.powi(3),
            epsilon = 0.01
        );
    }

    #[tokio::test]
    async fn test_unknown_land_use_is_neutral() {
        let engine = engine_with(reference());
        let residential = engine.estimate(&request()).await;
        let other = engine
            .estimate(&EstimateRequest {
                land_use: LandUse::Other("mixed".to_string()),
                ..request()
            })
            .await;

        assert_eq!(other.breakdown.land_use_multiplier, 1.0);
        assert_eq!(other.price_per_unit, residential.price_per_unit);
    }

    #[tokio::test]
    async fn test_totals_and_components_are_consistent() {
        let mut data = reference();
        let metro = data.add_location(
            "Metro City",
            "Test State",
            18000.0,
            0.09,
            Some(8_443_675),
            Some(Tier::Tier1),
        );
        data.add_sub_location(metro, "Tech Park", 22000.0, 1.0, None, None);
        let engine = engine_with(data);

        let plots = [1.0, 333.3, 1000.0, 2417.75];
        for (i, plot_size) in plots.iter().enumerate() {
            let req = EstimateRequest {
                region: "Test State".to_string(),
                location: "Metro City".to_string(),
                sub_location: Some("Tech Park".to_string()),
                plot_size: *plot_size,
                road_width: 10.0 + 10.0 * i as f64,
                nearby_schools: i % 2 == 0,
                nearby_metro: true,
                commercial_area: i % 2 == 1,
                target_year: 2021 + i as i32 * 2,
                land_use: LandUse::Industrial,
            };
            let result = engine.estimate(&req).await;
            let b = result.breakdown;

            assert_eq!(result.total_price, round2(result.price_per_unit * plot_size));
            // breakdown components are rounded, so their product drifts slightly
            assert_relative_eq!(
                result.price_per_unit,
                b.base_price
                    * b.location_multiplier
                    * b.infrastructure_multiplier
                    * b.year_trend_factor
                    * b.land_use_multiplier,
                max_relative = 0.01
            );
            assert!(b.location_multiplier > 0.0);
            assert!(b.infrastructure_multiplier > 0.0);
            assert!(b.year_trend_factor > 0.0);
            assert!(b.land_use_multiplier > 0.0);
            assert!((0.0..=1.0).contains(&result.confidence));
        }
    }

    #[tokio::test]
    async fn test_custom_confidence_policy() {
        let policy = ValuationPolicy {
            confidence: ConfidencePolicy {
                location: 0.5,
                sub_location: 0.95,
                missing_sub_location: 0.4,
                fallback: 0.1,
            },
            ..ValuationPolicy::default()
        };
        let engine = ValuationEngine::with_policy(reference(), ValuationConfig::default(), policy);

        let city = engine.estimate(&request()).await;
        assert_eq!(city.confidence, 0.5);

        let locality = engine
            .estimate(&EstimateRequest {
                sub_location: Some("Test Locality".to_string()),
                ..request()
            })
            .await;
        assert_eq!(locality.confidence, 0.95);

        let missing = engine
            .estimate(&EstimateRequest {
                sub_location: Some("Unknown Locality".to_string()),
                ..request()
            })
            .await;
        assert_eq!(missing.confidence, 0.4);

        let fallback = engine
            .estimate(&EstimateRequest::new("Nowhere State", "Nowhere City", 2024))
            .await;
        assert_eq!(fallback.confidence, 0.1);

        // prices do not depend on the confidence policy
        let default_engine = engine_with(reference());
        assert_eq!(
            city.price_per_unit,
            default_engine.estimate(&request()).await.price_per_unit
        );
    }

    struct FailingProvider;

    #[async_trait]
    impl ReferenceData for FailingProvider {
        async fn find_location(&self, _: &str, _: &str) -> Result<Option<LocationRecord>> {
            Err(anyhow::anyhow!("connection refused"))
        }

        async fn find_sub_location(
            &self,
            _: &str,
            _: &LocationRecord,
        ) -> Result<Option<SubLocationRecord>> {
            Err(anyhow::anyhow!("connection refused"))
        }

        async fn list_infrastructure_factors(
            &self,
            _: FactorType,
        ) -> Result<Vec<InfrastructureFactor>> {
            Err(anyhow::anyhow!("connection refused"))
        }

        async fn find_infrastructure_factor(
            &self,
            _: FactorType,
            _: &str,
        ) -> Result<Option<InfrastructureFactor>> {
            Err(anyhow::anyhow!("connection refused"))
        }
    }

    #[tokio::test]
    async fn test_provider_errors_read_as_not_found() {
        let engine = ValuationEngine::new(FailingProvider, ValuationConfig::default());
        let result = engine
            .estimate(&EstimateRequest::new("Delhi", "New Delhi", 2024))
            .await;

        assert_eq!(result.confidence, 0.3);
        assert_eq!(result.price_per_unit, 25000.0);
    }
}
