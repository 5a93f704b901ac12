use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
};

use crate::{
    dto::products::{CreateProductRequest, ProductList, StockUpdateRequest, UpdateProductRequest},
    error::AppResult,
    models::Product,
    response::ApiResponse,
    routes::params::{FeaturedQuery, ProductListQuery},
    services::product_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_product).get(list_products))
        .route("/featured", get(list_featured))
        .route("/category/{category}", get(list_by_category))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/{id}/stock", patch(update_stock))
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(
        ("skip" = Option<i64>, Query, description = "Rows to skip, default 0"),
        ("limit" = Option<i64>, Query, description = "Page size, default 20"),
        ("category" = Option<String>, Query, description = "Filter by category"),
        ("featured" = Option<bool>, Query, description = "Filter by featured flag"),
        ("search" = Option<String>, Query, description = "Name substring filter"),
    ),
    responses(
        (status = 200, description = "List products", body = ApiResponse<ProductList>)
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = product_service::list_products(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(("id" = i64, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Get product", body = ApiResponse<Product>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = product_service::get_product(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ApiResponse<Product>),
        (status = 422, description = "Negative price or stock"),
    ),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Product>>)> {
    let resp = product_service::create_product(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(("id" = i64, Path, description = "Product ID")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Updated product", body = ApiResponse<Product>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateProductRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = product_service::update_product(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(("id" = i64, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Deleted product"),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = product_service::delete_product(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/products/category/{category}",
    params(("category" = String, Path, description = "Category name")),
    tag = "Products"
)]
pub async fn list_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = product_service::list_by_category(&state, &category).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/products/featured",
    params(("limit" = Option<i64>, Query, description = "Max rows, default 10")),
    tag = "Products"
)]
pub async fn list_featured(
    State(state): State<AppState>,
    Query(query): Query<FeaturedQuery>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = product_service::list_featured(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/products/{id}/stock",
    params(("id" = i64, Path, description = "Product ID")),
    request_body = StockUpdateRequest,
    responses(
        (status = 200, description = "Stock updated", body = ApiResponse<Product>),
        (status = 404, description = "Product not found"),
        (status = 422, description = "Negative quantity"),
    ),
    tag = "Products"
)]
pub async fn update_stock(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<StockUpdateRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = product_service::update_stock(&state, id, payload).await?;
    Ok(Json(resp))
}
