//! HTTP route handlers.

use std::time::Instant;

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    http::{Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::NaiveDate;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, error};

use crate::aggregator::{AggregateError, rank_offers};
use crate::catalog;
use crate::domain::{CriteriaError, SearchCriteria};

use super::dto::*;
use super::state::AppState;

const API_VERSION: &str = "1.0.0";

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .route("/search", post(search).fallback(post_only))
        .route("/routes", get(list_routes).fallback(get_only))
        .route("/cities", get(cities))
        .route("/platforms", get(platforms))
        .fallback(not_found)
        .layer(cors())
        .with_state(state)
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

async fn home() -> Json<ApiResponse<VersionInfo>> {
    Json(ApiResponse::success(
        "Welcome to Bus Booking Aggregator API",
        Some(VersionInfo {
            version: API_VERSION,
        }),
    ))
}

async fn health() -> Json<ApiResponse<()>> {
    Json(ApiResponse::success("Service is healthy", None))
}

/// Search all providers with a JSON body.
async fn search(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SearchResponse>, AppError> {
    let req: SearchBody = serde_json::from_slice(&body).map_err(|_| AppError::BadRequest {
        message: "Invalid JSON request body".to_string(),
    })?;

    if req.from_city.trim().is_empty() || req.to_city.trim().is_empty() {
        return Err(AppError::BadRequest {
            message: "from_city and to_city are required".to_string(),
        });
    }

    let date = travel_date(req.date.as_deref())?;
    let criteria = SearchCriteria::new(
        &req.from_city,
        &req.to_city,
        date,
        passengers_or_default(req.passengers),
    )?;

    run_search(&state, criteria).await
}

/// Search all providers with query parameters.
async fn list_routes(
    State(state): State<AppState>,
    query: Result<Query<RoutesQuery>, QueryRejection>,
) -> Result<Json<SearchResponse>, AppError> {
    let Query(req) = query.map_err(|e| AppError::BadRequest {
        message: e.body_text(),
    })?;

    if req.from.trim().is_empty() || req.to.trim().is_empty() {
        return Err(AppError::BadRequest {
            message: "from and to parameters are required".to_string(),
        });
    }

    let date = travel_date(req.date.as_deref())?;
    let criteria = SearchCriteria::new(
        &req.from,
        &req.to,
        date,
        passengers_from_query(req.passengers.as_deref()),
    )?;

    run_search(&state, criteria).await
}

/// Parse an optional date, defaulting to tomorrow.
fn travel_date(raw: Option<&str>) -> Result<NaiveDate, AppError> {
    match raw.map(str::trim).filter(|d| !d.is_empty()) {
        Some(raw) => parse_date(raw).ok_or_else(|| AppError::BadRequest {
            message: "Invalid date format. Use YYYY-MM-DD".to_string(),
        }),
        None => Ok(tomorrow()),
    }
}

async fn run_search(
    state: &AppState,
    criteria: SearchCriteria,
) -> Result<Json<SearchResponse>, AppError> {
    for city in [criteria.origin(), criteria.destination()] {
        if catalog::find_location(city).is_none() {
            return Err(AppError::BadRequest {
                message: format!("Unknown city: {city}"),
            });
        }
    }

    let started = Instant::now();
    let round = state.aggregator.search(&criteria).await?;
    let routes = rank_offers(round.offers);

    Ok(Json(SearchResponse::new(routes, started.elapsed())))
}

async fn cities() -> Json<ApiResponse<Vec<CityResult>>> {
    Json(ApiResponse::success(
        "Cities retrieved successfully",
        Some(CityResult::all()),
    ))
}

async fn platforms(State(state): State<AppState>) -> Json<ApiResponse<Vec<PlatformResult>>> {
    let platforms = state
        .aggregator
        .providers()
        .map(PlatformResult::from)
        .collect();

    Json(ApiResponse::success(
        "Platforms retrieved successfully",
        Some(platforms),
    ))
}

async fn post_only() -> AppError {
    AppError::MethodNotAllowed {
        message: "Only POST method is allowed".to_string(),
    }
}

async fn get_only() -> AppError {
    AppError::MethodNotAllowed {
        message: "Only GET method is allowed".to_string(),
    }
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound {
        message: format!("No route for {}", uri.path()),
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    MethodNotAllowed { message: String },
    Internal { message: String },
}

impl From<CriteriaError> for AppError {
    fn from(e: CriteriaError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<AggregateError> for AppError {
    fn from(e: AggregateError) -> Self {
        AppError::Internal {
            message: format!("Search failed: {e}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::MethodNotAllowed { message } => (StatusCode::METHOD_NOT_ALLOWED, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            debug!(%status, %message, "request rejected");
        }

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}
