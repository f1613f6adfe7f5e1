/* src/routes.rs */

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, error, warn};

use crate::error::GeoIpError;
use crate::format::is_well_formed_ipv4;
use crate::middleware::{ClientAddress, ClientAddressLayer};
use crate::provider::{LocationProvider, LocationRecord};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn LocationProvider>,
}

impl AppState {
    pub fn new(provider: Arc<dyn LocationProvider>) -> Self {
        Self { provider }
    }
}

/// Error response in the `{statusCode, message, error}` shape clients expect.
#[derive(Debug)]
pub struct HttpError(pub GeoIpError);

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = if self.0.is_client_error() {
            debug!("Client error response generated: {}", self.0);
            StatusCode::BAD_REQUEST
        } else {
            error!("Server error response generated: {}", self.0);
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let body = json!({
            "statusCode": status.as_u16(),
            "message": self.0.to_string(),
            "error": status.canonical_reason().unwrap_or("Error"),
        });

        (status, Json(body)).into_response()
    }
}

impl From<GeoIpError> for HttpError {
    fn from(err: GeoIpError) -> Self {
        HttpError(err)
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
}

#[derive(Debug, Deserialize)]
pub struct LookupParams {
    pub ip: Option<String>,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

/// Locate the caller. Local callers get the server's own egress address.
pub async fn current_location(
    State(state): State<AppState>,
    client: ClientAddress,
) -> Result<Json<LocationRecord>, HttpError> {
    let target = client.lookup_target();
    debug!(
        client = client.address(),
        class = %client.class(),
        "locating current client"
    );

    let record = state.provider.locate(target).await?;
    Ok(Json(record))
}

/// Locate an explicit address given as `?ip=`.
pub async fn query_location(
    State(state): State<AppState>,
    Query(params): Query<LookupParams>,
) -> Result<Json<LocationRecord>, HttpError> {
    let ip = params
        .ip
        .filter(|ip| !ip.is_empty())
        .ok_or(GeoIpError::MissingParameter)?;

    if !is_well_formed_ipv4(&ip) {
        return Err(GeoIpError::MalformedAddress(ip).into());
    }

    let record = state.provider.locate(Some(&ip)).await?;
    Ok(Json(record))
}

/// Build the API router with client address resolution, tracing and CORS.
pub fn build_router(state: AppState, cors_origins: &[String]) -> Router {
    let api = Router::new()
        .route("/health", get(health_check))
        .route("/current", get(current_location))
        .route("/query", get(query_location));

    Router::new()
        .nest("/api/ip-location", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(ClientAddressLayer::default()),
        )
        .with_state(state)
}

fn create_cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            if origin.trim() == "*" {
                warn!("ignoring wildcard CORS origin, credentials are allowed");
                return None;
            }
            match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %origin, "ignoring invalid CORS origin");
                    None
                }
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ])
        .allow_credentials(true)
}
