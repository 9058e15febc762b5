use axum::http::StatusCode;
use vizmatch::{ErrorBody, Product, SearchRequest};

/// Client for the external embedding/similarity service. The relay forwards
/// each request body verbatim and relays the upstream outcome: no retries,
/// no reordering, no score rewriting.
#[derive(Clone)]
pub struct UpstreamClient {
    match_url: String,
    client: reqwest::Client,
}

impl UpstreamClient {
    pub fn new(match_url: String) -> Self {
        Self {
            match_url,
            client: reqwest::Client::new(),
        }
    }

    /// Forward one match request and return the upstream's ranked products.
    /// Failures come back as the status code and message the route handler
    /// should relay: the upstream's own status and error message where
    /// available, `502` when the upstream is unreachable.
    pub async fn find_matches(
        &self,
        request: &SearchRequest,
    ) -> Result<Vec<Product>, (StatusCode, String)> {
        tracing::debug!("forwarding match request to {}", self.match_url);
        let response = self
            .client
            .post(&self.match_url)
            .json(request)
            .send()
            .await
            .map_err(|err| {
                tracing::error!("embedding service unreachable: {err}");
                (
                    StatusCode::BAD_GATEWAY,
                    format!("Embedding service unreachable: {err}"),
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .map(|body| body.error)
                .unwrap_or_else(|_| format!("Embedding service error: {}", status.as_u16()));
            tracing::error!("embedding service failed with {status}: {message}");
            return Err((status, message));
        }

        response.json::<Vec<Product>>().await.map_err(|err| {
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("Unexpected embedding service response: {err}"),
            )
        })
    }
}
