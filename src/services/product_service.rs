use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::{
    dto::products::{CreateProductRequest, ProductList, StockUpdateRequest, UpdateProductRequest},
    entity::products::{ActiveModel, Column, Entity as Products, Model as ProductModel},
    error::{AppError, AppResult},
    models::Product,
    response::{ApiResponse, Meta},
    routes::params::{FeaturedQuery, ProductListQuery},
    state::AppState,
};

pub async fn list_products(
    state: &AppState,
    query: ProductListQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let (skip, limit) = query.pagination().normalize(20);
    let mut condition = Condition::all();

    if let Some(category) = query.category.as_ref().filter(|c| !c.is_empty()) {
        condition = condition.add(Column::Category.eq(category.clone()));
    }
    if let Some(featured) = query.featured {
        condition = condition.add(Column::Featured.eq(featured));
    }
    if let Some(search) = query.search.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        condition = condition.add(Expr::col(Column::Name).ilike(pattern));
    }

    let finder = Products::find().filter(condition).order_by_asc(Column::Id);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .offset(skip as u64)
        .limit(limit as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(product_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Products",
        ProductList { items },
        Some(Meta::new(skip, limit, total)),
    ))
}

pub async fn get_product(state: &AppState, id: i64) -> AppResult<ApiResponse<Product>> {
    let result = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(product_from_entity);
    let result = match result {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success("Product", result, None))
}

pub async fn create_product(
    state: &AppState,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    validate_price(payload.price)?;
    validate_stock(payload.stock_quantity)?;

    let active = ActiveModel {
        id: NotSet,
        name: Set(payload.name),
        description: Set(payload.description),
        price: Set(payload.price),
        category: Set(payload.category),
        brand: Set(payload.brand),
        stock_quantity: Set(payload.stock_quantity),
        image_url: Set(payload.image_url),
        featured: Set(payload.featured),
        created_at: NotSet,
        updated_at: NotSet,
    };
    let product = active.insert(&state.orm).await?;

    tracing::info!(product_id = product.id, "product created");

    Ok(ApiResponse::success(
        "Product created",
        product_from_entity(product),
        Some(Meta::empty()),
    ))
}

pub async fn update_product(
    state: &AppState,
    id: i64,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    if let Some(price) = payload.price {
        validate_price(price)?;
    }
    if let Some(stock) = payload.stock_quantity {
        validate_stock(stock)?;
    }

    let existing = Products::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    // Merge only the supplied fields.
    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(price) = payload.price {
        active.price = Set(price);
    }
    if let Some(category) = payload.category {
        active.category = Set(category);
    }
    if let Some(brand) = payload.brand {
        active.brand = Set(Some(brand));
    }
    if let Some(stock) = payload.stock_quantity {
        active.stock_quantity = Set(stock);
    }
    if let Some(image_url) = payload.image_url {
        active.image_url = Set(Some(image_url));
    }
    if let Some(featured) = payload.featured {
        active.featured = Set(featured);
    }
    active.updated_at = Set(Utc::now().into());

    let product = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Updated",
        product_from_entity(product),
        Some(Meta::empty()),
    ))
}

pub async fn delete_product(
    state: &AppState,
    id: i64,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = Products::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        "Product deleted successfully",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn list_by_category(
    state: &AppState,
    category: &str,
) -> AppResult<ApiResponse<ProductList>> {
    let items = Products::find()
        .filter(Column::Category.eq(category))
        .order_by_asc(Column::Id)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(product_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Products",
        ProductList { items },
        Some(Meta::empty()),
    ))
}

pub async fn list_featured(
    state: &AppState,
    query: FeaturedQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let limit = query.limit.unwrap_or(10).clamp(1, 100);

    let items = Products::find()
        .filter(Column::Featured.eq(true))
        .order_by_asc(Column::Id)
        .limit(limit as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(product_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Featured products",
        ProductList { items },
        Some(Meta::empty()),
    ))
}

/// Direct setter: the new quantity replaces whatever was there.
pub async fn update_stock(
    state: &AppState,
    id: i64,
    payload: StockUpdateRequest,
) -> AppResult<ApiResponse<Product>> {
    validate_stock(payload.quantity)?;

    let existing = Products::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    let mut active: ActiveModel = existing.into();
    active.stock_quantity = Set(payload.quantity);
    active.updated_at = Set(Utc::now().into());
    let product = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Stock updated",
        product_from_entity(product),
        Some(Meta::empty()),
    ))
}

fn validate_price(price: f64) -> AppResult<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(AppError::Validation(
            "price must be non-negative".to_string(),
        ));
    }
    Ok(())
}

fn validate_stock(stock: i32) -> AppResult<()> {
    if stock < 0 {
        return Err(AppError::Validation(
            "stock_quantity must be non-negative".to_string(),
        ));
    }
    Ok(())
}

fn product_from_entity(model: ProductModel) -> Product {
    Product {
        id: model.id,
        name: model.name,
        description: model.description,
        price: model.price,
        category: model.category,
        brand: model.brand,
        stock_quantity: model.stock_quantity,
        image_url: model.image_url,
        featured: model.featured,
        created_at: model.created_at.with_timezone(&chrono::Utc),
        updated_at: model.updated_at.with_timezone(&chrono::Utc),
    }
}
