use bon::Builder;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The one-of payload sent to the relay's match endpoint. External tagging
/// makes the wire shape `{"image": ...}` or `{"imageUrl": ...}` with exactly
/// one key ever present.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, ToSchema)]
pub enum SearchRequest {
    /// A self-describing inline image (data URL), renderable without a
    /// second fetch.
    #[serde(rename = "image")]
    Inline(String),
    /// An absolute URL the upstream service fetches itself.
    #[serde(rename = "imageUrl")]
    Url(String),
}

/// One catalog match, already joined with product metadata by the upstream
/// service. Ordering within a response is the authoritative ranking and is
/// never re-sorted downstream.
#[derive(Builder, Clone, Debug, Deserialize, PartialEq, Serialize, ToSchema)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: String,
    pub description: String,
    pub image: String,
    /// Visual closeness to the query image in `[0.0, 1.0]`; higher is more
    /// similar.
    pub similarity: f64,
}

/// Normalized failure shape for all non-200 relay responses.
#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

/// Returns the ordered subsequence of `products` with
/// `similarity >= threshold`, preserving the original relative order.
///
/// This is the only client-side ranking operation: it never re-sorts,
/// deduplicates, or renormalizes scores, and it never mutates its input.
/// At a threshold of 0.0 every product passes; at 1.0 only exact maximal
/// matches survive.
pub fn filter_by_threshold(products: &[Product], threshold: f64) -> Vec<Product> {
    products
        .iter()
        .filter(|product| product.similarity >= threshold)
        .cloned()
        .collect()
}
