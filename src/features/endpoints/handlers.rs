use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::core::error::Result;
use crate::features::endpoints::{EndpointDescriptor, EndpointRegistry};
use crate::shared::types::{ApiResponse, Meta};

/// List the LLM endpoints available for testing
#[utoipa::path(
    get,
    path = "/api/endpoints",
    responses(
        (status = 200, description = "Configured endpoints", body = ApiResponse<Vec<EndpointDescriptor>>)
    ),
    tag = "endpoints"
)]
pub async fn list_endpoints(
    State(registry): State<Arc<EndpointRegistry>>,
) -> Result<Json<ApiResponse<Vec<EndpointDescriptor>>>> {
    let endpoints = registry.list_endpoints().to_vec();
    let total = endpoints.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(endpoints),
        None,
        Some(Meta { total }),
    )))
}

/// Get a configured endpoint by name
#[utoipa::path(
    get,
    path = "/api/endpoints/{name}",
    params(
        ("name" = String, Path, description = "Endpoint name")
    ),
    responses(
        (status = 200, description = "Endpoint found", body = ApiResponse<EndpointDescriptor>),
        (status = 404, description = "Endpoint not found")
    ),
    tag = "endpoints"
)]
pub async fn get_endpoint(
    State(registry): State<Arc<EndpointRegistry>>,
    Path(name): Path<String>,
) -> Result<Json<ApiResponse<EndpointDescriptor>>> {
    let endpoint = registry.get_endpoint(&name)?.clone();
    Ok(Json(ApiResponse::success(Some(endpoint), None, None)))
}
