use tokio::net::TcpListener;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(info(
    title = "Visual Product Matcher Relay",
    description = "Forwards visual search requests to the embedding service and normalizes its failures"
))]
struct ApiDoc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize the server state and extract the server binding address.
    let (bind_addr, state) = vizmatch_server::init()?;

    let openapi_router = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .nest(
            "/match",
            vizmatch_server::routes::matches::matches_router(state),
        )
        .nest("/health", vizmatch_server::routes::health::health_router());
    let (router, api) = openapi_router.split_for_parts();
    let router = router
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new())
                .on_response(DefaultOnResponse::new()),
        );

    let listener = TcpListener::bind(bind_addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
