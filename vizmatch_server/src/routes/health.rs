use axum::response::Json;
use serde::Serialize;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

pub fn health_router() -> OpenApiRouter {
    OpenApiRouter::new().routes(routes!(health))
}

#[derive(Serialize, ToSchema)]
pub struct Health {
    pub status: String,
}

/// Liveness probe. Reachability only; never part of the search path.
#[utoipa::path(
    get,
    path = "",
    responses(
        (status = 200, description = "The relay is up", body = Health)
    )
)]
#[axum::debug_handler]
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
    })
}
