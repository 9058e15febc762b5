#![allow(dead_code)]

use axum::Router;
use reqwest::Response;
use tokio::net::TcpListener;
use utoipa_axum::router::OpenApiRouter;

use vizmatch_server::{client::UpstreamClient, models::state::MatcherState, routes};

pub async fn assert_ok_response(response: Response) -> Result<Response, String> {
    if response.status().is_success() {
        Ok(response)
    } else {
        let body = response.text().await.map_err(|err| format!("{err:?}"))?;
        Err(body)
    }
}

/// Serve any router on an ephemeral local port and return its base URL.
pub async fn spawn(router: Router) -> Result<String, String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .map_err(|err| format!("{err:?}"))?;
    let addr = listener.local_addr().map_err(|err| format!("{err:?}"))?;
    let _ = tokio::spawn(async move { axum::serve(listener, router).await });
    Ok(format!("http://{addr}"))
}

/// Spawn the relay pointed at the given upstream match URL and return the
/// relay's base URL.
pub async fn spawn_relay(upstream_match_url: String) -> Result<String, String> {
    let state = MatcherState {
        upstream_client: UpstreamClient::new(upstream_match_url),
    };
    let openapi_router = OpenApiRouter::new()
        .nest("/match", routes::matches::matches_router(state))
        .nest("/health", routes::health::health_router());
    let (router, _) = openapi_router.split_for_parts();
    spawn(router).await
}

/// A local URL nothing is listening on, for unreachable-upstream tests.
pub async fn unreachable_url() -> Result<String, String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .map_err(|err| format!("{err:?}"))?;
    let addr = listener.local_addr().map_err(|err| format!("{err:?}"))?;
    drop(listener);
    Ok(format!("http://{addr}/match"))
}
