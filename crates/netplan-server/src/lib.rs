pub mod config;
pub mod error;
pub mod handlers;
pub mod models;

pub use config::Config;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health_check,
        handlers::partition::partition_subnets,
        handlers::plan::create_plan,
        handlers::plan::render_configs,
    ),
    components(
        schemas(
            models::PartitionRequest,
            models::ErrorResponse,
            models::HealthResponse,
            netplan_core::Subnet,
            netplan_core::PlanRequest,
            netplan_core::Plan,
            netplan_core::Router,
            netplan_core::Connection,
            netplan_core::RouterSpec,
            netplan_core::Topology,
            netplan_core::RoutingProtocol,
            netplan_core::Interface,
            netplan_core::PlanWarning,
            netplan_core::RouterConfig,
        )
    ),
    tags(
        (name = "health", description = "Service status"),
        (name = "subnets", description = "Subnet partitioning endpoints"),
        (name = "plan", description = "Topology addressing and device configuration endpoints"),
    )
)]
pub struct ApiDoc;

pub fn create_router(config: Arc<Config>) -> Router {
    let app = Router::new()
        .route("/api/subnets/partition", post(handlers::partition::partition_subnets))
        .route("/api/plan", post(handlers::plan::create_plan))
        .route("/api/plan/configs", post(handlers::plan::render_configs))
        .route("/health", get(handlers::health::health_check))
        .with_state(config);

    app.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
}
