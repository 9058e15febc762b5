use axum::extract::FromRef;

use crate::client::UpstreamClient;

#[derive(Clone)]
pub struct MatcherState {
    pub upstream_client: UpstreamClient,
}

impl FromRef<MatcherState> for UpstreamClient {
    fn from_ref(state: &MatcherState) -> UpstreamClient {
        state.upstream_client.clone()
    }
}
