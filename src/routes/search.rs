use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, post},
};

use crate::{
    dto::search::{
        BulkIndexResult, SearchFilters, SearchParams, SearchResults, SuggestParams, Suggestions,
    },
    error::AppResult,
    models::SearchDocument,
    response::ApiResponse,
    services::search_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(search))
        .route("/suggestions", get(suggestions))
        .route("/filters", get(filters))
        .route("/index", post(index_product))
        .route("/index/bulk", post(bulk_index))
        .route("/index/{id}", delete(delete_from_index))
}

#[utoipa::path(
    get,
    path = "/api/search",
    params(
        ("q" = String, Query, description = "Full-text query"),
        ("category" = Option<String>, Query, description = "Category filter"),
        ("brand" = Option<String>, Query, description = "Brand filter"),
        ("min_price" = Option<f64>, Query, description = "Minimum price"),
        ("max_price" = Option<f64>, Query, description = "Maximum price"),
        ("skip" = Option<i64>, Query, description = "Rows to skip, default 0"),
        ("limit" = Option<i64>, Query, description = "Page size, default 20"),
    ),
    responses(
        (status = 200, description = "Ranked hits", body = ApiResponse<SearchResults>),
        (status = 422, description = "Missing query"),
        (status = 500, description = "Index error"),
    ),
    tag = "Search"
)]
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<ApiResponse<SearchResults>>> {
    let resp = search_service::search(&state, params).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/search/suggestions",
    params(("q" = String, Query, description = "Name prefix, at least 2 characters")),
    responses(
        (status = 200, description = "Autocomplete suggestions", body = ApiResponse<Suggestions>),
        (status = 500, description = "Index error"),
    ),
    tag = "Search"
)]
pub async fn suggestions(
    State(state): State<AppState>,
    Query(params): Query<SuggestParams>,
) -> AppResult<Json<ApiResponse<Suggestions>>> {
    let resp = search_service::suggestions(&state, params).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/search/filters",
    responses(
        (status = 200, description = "Facets", body = ApiResponse<SearchFilters>),
        (status = 500, description = "Index error"),
    ),
    tag = "Search"
)]
pub async fn filters(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<SearchFilters>>> {
    let resp = search_service::filters(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/search/index",
    request_body = SearchDocument,
    responses(
        (status = 200, description = "Document indexed"),
        (status = 500, description = "Index error"),
    ),
    tag = "Search"
)]
pub async fn index_product(
    State(state): State<AppState>,
    Json(doc): Json<SearchDocument>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = search_service::index_product(&state, doc).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/search/index/bulk",
    request_body = Vec<SearchDocument>,
    responses(
        (status = 200, description = "Bulk upsert completed", body = ApiResponse<BulkIndexResult>),
        (status = 500, description = "Index error"),
    ),
    tag = "Search"
)]
pub async fn bulk_index(
    State(state): State<AppState>,
    Json(docs): Json<Vec<SearchDocument>>,
) -> AppResult<Json<ApiResponse<BulkIndexResult>>> {
    let resp = search_service::bulk_index(&state, docs).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/search/index/{id}",
    params(("id" = i64, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Document removed"),
        (status = 500, description = "Index error"),
    ),
    tag = "Search"
)]
pub async fn delete_from_index(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = search_service::delete_from_index(&state, id).await?;
    Ok(Json(resp))
}
