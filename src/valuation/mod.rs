//! Land valuation core - multiplicative pricing model over reference data

pub mod band;
pub mod engine;
pub mod fallback;
pub mod memory;
pub mod multipliers;
pub mod policy;
pub mod provider;
pub mod types;

pub use band::{band_matches, Band};
pub use engine::{ValuationConfig, ValuationEngine};
pub use memory::InMemoryReferenceData;
pub use policy::{AmenityDefaults, ConfidencePolicy, RoadWidthLadder, ValuationPolicy};
pub use provider::ReferenceData;
pub use types::*;
