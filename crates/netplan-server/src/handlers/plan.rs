use crate::{config::Config, error::ApiError};
use axum::{extract::State, Json};
use netplan_core::{render_plan, Plan, PlanRequest, RouterConfig};
use std::sync::Arc;

fn execute(config: &Config, mut request: PlanRequest) -> Result<Plan, ApiError> {
    request.strict_interfaces |= config.planner.strict_interfaces;
    Ok(request.execute(config.planner.max_subnets)?)
}

/// Compute addressing for a topology
#[utoipa::path(
    post,
    path = "/api/plan",
    tag = "plan",
    request_body = PlanRequest,
    responses(
        (status = 200, description = "Per-router addressing", body = Plan),
        (status = 400, description = "Invalid request", body = crate::models::ErrorResponse),
        (status = 422, description = "Topology does not fit the address plan", body = crate::models::ErrorResponse)
    )
)]
pub async fn create_plan(
    State(config): State<Arc<Config>>,
    Json(request): Json<PlanRequest>,
) -> Result<Json<Plan>, ApiError> {
    execute(&config, request).map(Json)
}

/// Compute addressing and render device configuration for every router
#[utoipa::path(
    post,
    path = "/api/plan/configs",
    tag = "plan",
    request_body = PlanRequest,
    responses(
        (status = 200, description = "Configuration text per router", body = Vec<RouterConfig>),
        (status = 400, description = "Invalid request", body = crate::models::ErrorResponse),
        (status = 422, description = "Topology does not fit the address plan", body = crate::models::ErrorResponse)
    )
)]
pub async fn render_configs(
    State(config): State<Arc<Config>>,
    Json(request): Json<PlanRequest>,
) -> Result<Json<Vec<RouterConfig>>, ApiError> {
    let plan = execute(&config, request)?;
    Ok(Json(render_plan(&plan)))
}
