//! Read-only query contract for reference data

use crate::valuation::types::{
    FactorType, InfrastructureFactor, LocationRecord, SubLocationRecord,
};
use anyhow::Result;
use async_trait::async_trait;

/// Source of city, locality and infrastructure reference data.
///
/// `Ok(None)` and `Err(_)` are both treated as "not found" by the engine;
/// implementations should not retry internally.
#[async_trait]
pub trait ReferenceData: Send + Sync {
    async fn find_location(&self, name: &str, region: &str) -> Result<Option<LocationRecord>>;

    async fn find_sub_location(
        &self,
        name: &str,
        parent: &LocationRecord,
    ) -> Result<Option<SubLocationRecord>>;

    /// All rows of one factor type, in a stable order
    async fn list_infrastructure_factors(
        &self,
        factor_type: FactorType,
    ) -> Result<Vec<InfrastructureFactor>>;

    async fn find_infrastructure_factor(
        &self,
        factor_type: FactorType,
        factor_value: &str,
    ) -> Result<Option<InfrastructureFactor>>;
}
