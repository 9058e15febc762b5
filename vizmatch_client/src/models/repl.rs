use vizmatch::{Product, SearchRequest};

use crate::models::client::SearchError;

pub enum UserRequest {
    Search {
        preview: String,
        request: SearchRequest,
    },
    SetThreshold(f64),
    ShowResults,
    Health,
    Cancel,
}

pub enum ServerRequest {
    Search { id: u64, request: SearchRequest },
    Health,
}

pub enum ServerResponse {
    Search {
        id: u64,
        outcome: Result<Vec<Product>, SearchError>,
    },
    Health(bool),
}
