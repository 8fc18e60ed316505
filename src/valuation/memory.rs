//! Vector-backed reference data, used in tests and without a database

use crate::valuation::provider::ReferenceData;
use crate::valuation::types::{
    FactorType, InfrastructureFactor, LandUse, LocationRecord, SubLocationRecord, Tier,
};
use anyhow::Result;
use async_trait::async_trait;

#[derive(Debug, Clone, Default)]
pub struct InMemoryReferenceData {
    locations: Vec<LocationRecord>,
    sub_locations: Vec<SubLocationRecord>,
    factors: Vec<InfrastructureFactor>,
}

impl InMemoryReferenceData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a city and return its id
    pub fn add_location(
        &mut self,
        name: &str,
        region: &str,
        base_price: f64,
        growth_rate: f64,
        population: Option<i64>,
        tier: Option<Tier>,
    ) -> i32 {
        let id = self.locations.len() as i32 + 1;
        self.locations.push(LocationRecord {
            id,
            name: name.to_string(),
            region: region.to_string(),
            base_price,
            growth_rate,
            population,
            tier,
        });
        id
    }

    pub fn add_sub_location(
        &mut self,
        location_id: i32,
        name: &str,
        price: f64,
        location_multiplier: f64,
        classification: Option<LandUse>,
        postal_code: Option<&str>,
    ) -> i32 {
        let id = self.sub_locations.len() as i32 + 1;
        self.sub_locations.push(SubLocationRecord {
            id,
            location_id,
            name: name.to_string(),
            price,
            location_multiplier,
            classification,
            postal_code: postal_code.map(str::to_string),
        });
        id
    }

    pub fn add_factor(&mut self, factor_type: FactorType, factor_value: &str, multiplier: f64) {
        self.factors.push(InfrastructureFactor {
            factor_type,
            factor_value: factor_value.to_string(),
            multiplier,
            description: None,
        });
    }

    pub fn push_factor(&mut self, factor: InfrastructureFactor) {
        self.factors.push(factor);
    }

    pub fn locations(&self) -> &[LocationRecord] {
        &self.locations
    }
}

#[async_trait]
impl ReferenceData for InMemoryReferenceData {
    async fn find_location(&self, name: &str, region: &str) -> Result<Option<LocationRecord>> {
        Ok(self
            .locations
            .iter()
            .find(|l| l.name == name && l.region == region)
            .cloned())
    }

    async fn find_sub_location(
        &self,
        name: &str,
        parent: &LocationRecord,
    ) -> Result<Option<SubLocationRecord>> {
        Ok(self
            .sub_locations
            .iter()
            .find(|s| s.location_id == parent.id && s.name == name)
            .cloned())
    }

    async fn list_infrastructure_factors(
        &self,
        factor_type: FactorType,
    ) -> Result<Vec<InfrastructureFactor>> {
        Ok(self
            .factors
            .iter()
            .filter(|f| f.factor_type == factor_type)
            .cloned()
            .collect())
    }

    async fn find_infrastructure_factor(
        &self,
        factor_type: FactorType,
        factor_value: &str,
    ) -> Result<Option<InfrastructureFactor>> {
        Ok(self
            .factors
            .iter()
            .find(|f| f.factor_type == factor_type && f.factor_value == factor_value)
            .cloned())
    }
}
