use crate::{config::Config, error::ApiError, models::PartitionRequest};
use axum::{extract::State, Json};
use netplan_core::{partition_with_limit, Subnet};
use std::sync::Arc;
use tracing::debug;

/// Split a network into subnets of a longer prefix
#[utoipa::path(
    post,
    path = "/api/subnets/partition",
    tag = "subnets",
    request_body = PartitionRequest,
    responses(
        (status = 200, description = "Subnets, first and last block excluded", body = Vec<Subnet>),
        (status = 400, description = "Invalid address or prefixes", body = crate::models::ErrorResponse)
    )
)]
pub async fn partition_subnets(
    State(config): State<Arc<Config>>,
    Json(request): Json<PartitionRequest>,
) -> Result<Json<Vec<Subnet>>, ApiError> {
    debug!(
        "Partition request for {}/{} -> /{}",
        request.network, request.original_prefix, request.new_prefix
    );
    let subnets = partition_with_limit(
        &request.network,
        request.original_prefix,
        request.new_prefix,
        config.planner.max_subnets,
    )?;
    Ok(Json(subnets))
}
