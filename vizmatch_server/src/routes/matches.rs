use axum::{extract::State, http::StatusCode, response::Json};
use utoipa_axum::{router::OpenApiRouter, routes};
use vizmatch::{ErrorBody, Product, SearchRequest};

use crate::{client::UpstreamClient, models::state::MatcherState};

pub fn matches_router(state: MatcherState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(find_matches))
        .with_state(state)
}

/// Find catalog products visually similar to a query image.
///
/// The body carries exactly one of an inline image or an image URL. The
/// response is the upstream's ranked product array, order untouched; all
/// failures are normalized to the `{"error": ...}` shape.
#[utoipa::path(
    post,
    path = "",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Ranked catalog matches for the query image", body = [Product]),
        (status = 422, description = "Upstream response was not a product array", body = ErrorBody),
        (status = 502, description = "Embedding service unreachable", body = ErrorBody)
    )
)]
#[axum::debug_handler]
pub async fn find_matches(
    State(upstream_client): State<UpstreamClient>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<Vec<Product>>, (StatusCode, Json<ErrorBody>)> {
    let products = upstream_client
        .find_matches(&request)
        .await
        .map_err(|(status, error)| (status, Json(ErrorBody { error })))?;
    Ok(Json(products))
}
