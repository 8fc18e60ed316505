//! Reference data module - Postgres provider plus the fetch/parse/write pipeline

pub mod export;
pub mod fetch;
pub mod parse;
pub mod postgres;
pub mod seed;
pub mod types;
pub mod utils;
pub mod write;

pub use postgres::PgReferenceData;
pub use types::*;
