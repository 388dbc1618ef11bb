//! Search endpoint

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;

use crate::annotations::Annotation;
use crate::error::Result;
use crate::state::AppState;
use crate::store::SearchQuery;

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub total: u64,
    pub rows: Vec<Annotation>,
}

/// Search annotations
///
/// Every query parameter except `offset` and `limit` is a field filter.
pub async fn search_annotations(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<SearchResponse>> {
    let query = SearchQuery::from_params(params);
    tracing::debug!(?query, "Searching annotations");

    let rows = state.store().search(&query).await?;
    let total = state.store().count(&query).await?;

    Ok(Json(SearchResponse { total, rows }))
}
