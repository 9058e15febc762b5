use thiserror::Error;
use vizmatch::{ErrorBody, Product, SearchRequest};

/// Everything that can go wrong between the user's input and a completed
/// search. The first two variants are local rejections that never reach the
/// network; the last two terminate an in-flight search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Please select an image file")]
    InvalidFileType,
    #[error("Please provide an image or an image URL")]
    EmptyInput,
    #[error("Cannot connect to server. Please make sure the backend is running. ({0})")]
    Connectivity(String),
    #[error("{0}")]
    Service(String),
}

/// Thin client for the relay's search surface. One request per call, no
/// retries.
#[derive(Clone)]
pub struct MatcherClient {
    base_url: String,
    client: reqwest::Client,
}

impl MatcherClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Submit one search and return the relay's ranked matches in the order
    /// it sent them. Out-of-range similarity scores are clamped into
    /// `[0.0, 1.0]` rather than propagated.
    pub async fn search(&self, request: &SearchRequest) -> Result<Vec<Product>, SearchError> {
        let response = self
            .client
            .post(format!("{}/match", self.base_url))
            .json(request)
            .send()
            .await
            .map_err(|err| SearchError::Connectivity(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .map(|body| body.error)
                .unwrap_or_else(|_| format!("Server error: {}", status.as_u16()));
            return Err(SearchError::Service(message));
        }

        let mut products = response.json::<Vec<Product>>().await.map_err(|err| {
            SearchError::Service(format!("Unexpected response from server: {err}"))
        })?;
        for product in &mut products {
            product.similarity = product.similarity.clamp(0.0, 1.0);
        }
        Ok(products)
    }

    /// Liveness probe against the relay. Not part of the search path.
    pub async fn health(&self) -> bool {
        match self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        Json, Router,
        http::StatusCode,
        routing::{get, post},
    };
    use serde_json::json;
    use tokio::net::TcpListener;
    use vizmatch::SearchRequest;

    use super::{MatcherClient, SearchError};

    async fn spawn(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await });
        format!("http://{addr}")
    }

    /// Bind and immediately drop a listener so the port is almost certainly
    /// closed by the time the client dials it.
    async fn closed_port_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn search_preserves_service_order_and_clamps_scores() {
        let router = Router::new().route(
            "/match",
            post(|| async {
                Json(json!([
                    {"id": "p1", "name": "n1", "category": "c", "description": "d", "image": "i1", "similarity": 1.5},
                    {"id": "p2", "name": "n2", "category": "c", "description": "d", "image": "i2", "similarity": 0.5},
                    {"id": "p3", "name": "n3", "category": "c", "description": "d", "image": "i3", "similarity": -0.2},
                ]))
            }),
        );
        let client = MatcherClient::new(&spawn(router).await);

        let request = SearchRequest::Url("https://x/img.jpg".to_string());
        let products = client.search(&request).await.unwrap();
        let ids = products.iter().map(|p| p.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["p1", "p2", "p3"]);
        assert_eq!(products[0].similarity, 1.0);
        assert_eq!(products[2].similarity, 0.0);
    }

    #[tokio::test]
    async fn empty_results_are_success() {
        let router = Router::new().route("/match", post(|| async { Json(json!([])) }));
        let client = MatcherClient::new(&spawn(router).await);

        let request = SearchRequest::Url("https://x/img.jpg".to_string());
        let products = client.search(&request).await.unwrap();
        assert!(products.is_empty());
    }

    #[tokio::test]
    async fn error_body_message_is_surfaced_verbatim() {
        let router = Router::new().route(
            "/match",
            post(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": "Embedding service error"})),
                )
            }),
        );
        let client = MatcherClient::new(&spawn(router).await);

        let request = SearchRequest::Url("https://x/img.jpg".to_string());
        let err = client.search(&request).await.unwrap_err();
        match err {
            SearchError::Service(message) => assert_eq!(message, "Embedding service error"),
            other => panic!("expected service error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unparsable_error_body_falls_back_to_status_code() {
        let router = Router::new().route(
            "/match",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let client = MatcherClient::new(&spawn(router).await);

        let request = SearchRequest::Url("https://x/img.jpg".to_string());
        let err = client.search(&request).await.unwrap_err();
        match err {
            SearchError::Service(message) => assert_eq!(message, "Server error: 500"),
            other => panic!("expected service error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn transport_failure_is_distinguishable_from_service_errors() {
        let client = MatcherClient::new(&closed_port_url().await);

        let request = SearchRequest::Url("https://x/img.jpg".to_string());
        let err = client.search(&request).await.unwrap_err();
        assert!(matches!(err, SearchError::Connectivity(_)));
        assert!(err.to_string().starts_with("Cannot connect to server"));
    }

    #[tokio::test]
    async fn health_reflects_reachability() {
        let router = Router::new().route("/health", get(|| async { Json(json!({"status": "ok"})) }));
        let reachable = MatcherClient::new(&spawn(router).await);
        assert!(reachable.health().await);

        let unreachable = MatcherClient::new(&closed_port_url().await);
        assert!(!unreachable.health().await);
    }
}
