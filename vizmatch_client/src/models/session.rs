use vizmatch::{Product, filter_by_threshold};

use crate::models::client::SearchError;

/// Default minimum similarity, matching what the UI starts with.
pub const DEFAULT_THRESHOLD: f64 = 0.3;

/// Zero results is a success, not an error, but it still gets a user-facing
/// advisory.
pub const NO_MATCHES_ADVISORY: &str = "No similar products found. Try a different image.";

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SearchStatus {
    Idle,
    Loading,
    Success,
    Error,
}

/// What the front end should show: exactly one of these at a time.
#[derive(Debug, PartialEq)]
pub enum SessionView {
    Idle,
    Loading,
    /// The threshold-filtered subset, in service order.
    Results(Vec<Product>),
    NoMatches,
    Error(String),
}

/// Process-local state for one user's search lifecycle. The session does no
/// I/O itself: callers dispatch the gateway call for the id returned by
/// [`SearchSession::submit`] and feed the single completion event back
/// through [`SearchSession::complete`].
///
/// Overlapping searches resolve newest-submission-wins: a completion for
/// anything but the latest submitted id is dropped on arrival.
pub struct SearchSession {
    status: SearchStatus,
    results: Vec<Product>,
    error_message: Option<String>,
    query_preview: Option<String>,
    threshold: f64,
    latest_request: u64,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchSession {
    pub fn new() -> Self {
        Self {
            status: SearchStatus::Idle,
            results: vec![],
            error_message: None,
            query_preview: None,
            threshold: DEFAULT_THRESHOLD,
            latest_request: 0,
        }
    }

    pub fn status(&self) -> SearchStatus {
        self.status
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn query_preview(&self) -> Option<&str> {
        self.query_preview.as_deref()
    }

    /// The authoritative result order from the service, unfiltered.
    pub fn results(&self) -> &[Product] {
        &self.results
    }

    /// Begin a new search: clears the prior error, records the preview, and
    /// moves to `Loading`. Returns the request id the eventual completion
    /// must carry. The threshold is deliberately left alone so it persists
    /// across searches.
    pub fn submit(&mut self, preview: String) -> u64 {
        self.status = SearchStatus::Loading;
        self.error_message = None;
        self.query_preview = Some(preview);
        self.latest_request += 1;
        self.latest_request
    }

    /// Abandon the in-flight search, if any. The superseded id becomes
    /// stale, so its response is dropped if it ever arrives.
    pub fn cancel(&mut self) {
        if self.status == SearchStatus::Loading {
            self.status = SearchStatus::Idle;
            self.latest_request += 1;
        }
    }

    /// Apply a gateway outcome. Returns false when the completion is stale
    /// (superseded by a newer submit or a cancel) and was discarded.
    pub fn complete(
        &mut self,
        id: u64,
        outcome: Result<Vec<Product>, SearchError>,
    ) -> bool {
        if id != self.latest_request || self.status != SearchStatus::Loading {
            return false;
        }
        match outcome {
            Ok(products) => {
                self.results = products;
                self.status = SearchStatus::Success;
            }
            Err(err) => {
                self.error_message = Some(err.to_string());
                self.results.clear();
                self.status = SearchStatus::Error;
            }
        }
        true
    }

    /// Threshold changes are not state transitions: valid in every state,
    /// and they never re-invoke the gateway. Non-finite input is ignored
    /// (`f64::clamp` would pass NaN through) so the stored threshold stays
    /// in `[0, 1]`.
    pub fn set_threshold(&mut self, threshold: f64) {
        if threshold.is_nan() {
            return;
        }
        self.threshold = threshold.clamp(0.0, 1.0);
    }

    /// The derived subset to display, re-computed from the last stored
    /// results on every call.
    pub fn visible(&self) -> Vec<Product> {
        filter_by_threshold(&self.results, self.threshold)
    }

    pub fn view(&self) -> SessionView {
        match self.status {
            SearchStatus::Idle => SessionView::Idle,
            SearchStatus::Loading => SessionView::Loading,
            SearchStatus::Error => SessionView::Error(
                self.error_message
                    .clone()
                    .unwrap_or_else(|| "Failed to search products".to_string()),
            ),
            SearchStatus::Success if self.results.is_empty() => SessionView::NoMatches,
            SearchStatus::Success => SessionView::Results(self.visible()),
        }
    }
}
