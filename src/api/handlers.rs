use crate::api::error::{ApiError, ValidationError};
use crate::api::format::format_inr;
use crate::api::history::record_estimate;
use crate::api::params::EstimateParams;
use crate::api::AppState;
use crate::valuation::types::{EstimateRequest, EstimateResult, LandUse, Tier};
use axum::extract::{Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

pub const API_VERSION: &str = "1.0";

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "Land Price Estimator API".to_string(),
        version: API_VERSION.to_string(),
    })
}

#[derive(Debug, Serialize)]
pub struct EstimateData {
    #[serde(flatten)]
    pub result: EstimateResult,
    pub formatted_price_per_sqft: String,
    pub formatted_total_price: String,
}

#[derive(Debug, Serialize)]
pub struct EstimateMetadata {
    pub api_version: &'static str,
    pub timestamp: DateTime<Utc>,
    pub estimate_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct EstimateResponse {
    pub success: bool,
    pub data: EstimateData,
    pub metadata: EstimateMetadata,
}

pub async fn estimate_query(
    State(state): State<AppState>,
    Query(params): Query<EstimateParams>,
) -> Result<Json<EstimateResponse>, ApiError> {
    run_estimate(&state, &params).await
}

pub async fn estimate_json(
    State(state): State<AppState>,
    Json(params): Json<EstimateParams>,
) -> Result<Json<EstimateResponse>, ApiError> {
    run_estimate(&state, &params).await
}

async fn run_estimate(
    state: &AppState,
    params: &EstimateParams,
) -> Result<Json<EstimateResponse>, ApiError> {
    let request: EstimateRequest = params.validate(state.engine.config().base_year)?;
    let result = state.engine.estimate(&request).await;

    info!(
        "Estimate for {}, {} ({}): {} per sqft, confidence {}",
        request.location, request.region, request.target_year, result.price_per_unit, result.confidence
    );

    let estimate_id = match record_estimate(state.engine.provider().pool(), &request, &result).await {
        Ok(id) => Some(id),
        Err(e) => {
            warn!("Estimate not recorded: {:#}", e);
            None
        }
    };

    Ok(Json(EstimateResponse {
        success: true,
        data: EstimateData {
            formatted_price_per_sqft: format_inr(result.price_per_unit),
            formatted_total_price: format_inr(result.total_price),
            result,
        },
        metadata: EstimateMetadata {
            api_version: API_VERSION,
            timestamp: Utc::now(),
            estimate_id,
        },
    }))
}

#[derive(Debug, Deserialize)]
pub struct CitiesQuery {
    pub state: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CitySummary {
    pub id: i32,
    pub name: String,
    pub state: String,
    pub tier: Option<Tier>,
    pub base_price_per_sqft: f64,
}

#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub success: bool,
    pub data: Vec<T>,
}

pub async fn cities(
    State(state): State<AppState>,
    Query(query): Query<CitiesQuery>,
) -> Result<Json<ListResponse<CitySummary>>, ApiError> {
    let filter = query.state.as_deref().filter(|s| !s.trim().is_empty());
    let cities = state.engine.provider().list_cities(filter).await?;

    let data = cities
        .into_iter()
        .map(|city| CitySummary {
            id: city.id,
            name: city.name,
            state: city.region,
            tier: city.tier,
            base_price_per_sqft: city.base_price,
        })
        .collect();

    Ok(Json(ListResponse {
        success: true,
        data,
    }))
}

#[derive(Debug, Deserialize)]
pub struct LocalitiesQuery {
    pub city: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LocalitySummary {
    pub id: i32,
    pub name: String,
    pub price_per_sqft: f64,
    pub location_multiplier: f64,
    pub area_type: Option<LandUse>,
    pub pin_code: Option<String>,
}

pub async fn localities(
    State(state): State<AppState>,
    Query(query): Query<LocalitiesQuery>,
) -> Result<Json<ListResponse<LocalitySummary>>, ApiError> {
    let city_name = query
        .city
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(ValidationError::MissingParameter("city"))?;
    let state_filter = query.state.as_deref().filter(|s| !s.trim().is_empty());

    let provider = state.engine.provider();
    let city = provider
        .find_city(city_name, state_filter)
        .await?
        .ok_or_else(|| ApiError::NotFound("City not found".to_string()))?;

    let data = provider
        .list_localities(city.id)
        .await?
        .into_iter()
        .map(|locality| LocalitySummary {
            id: locality.id,
            name: locality.name,
            price_per_sqft: locality.price,
            location_multiplier: locality.location_multiplier,
            area_type: locality.classification,
            pin_code: locality.postal_code,
        })
        .collect();

    Ok(Json(ListResponse {
        success: true,
        data,
    }))
}
