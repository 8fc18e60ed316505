//! Land price estimation - valuation engine, reference data and HTTP API

pub mod api;
pub mod config;
pub mod reference;
pub mod valuation;
