use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Split request for a single address block
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PartitionRequest {
    /// Base network address (e.g., 10.0.0.0)
    pub network: String,

    /// Prefix length of the base network (e.g., 16)
    pub original_prefix: u8,

    /// Prefix length of the resulting subnets (e.g., 24)
    pub new_prefix: u8,
}

/// Error body returned by every endpoint
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
