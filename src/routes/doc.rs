use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{
            LoginRequest, RefreshRequest, RegisterRequest, ResetPasswordRequest, TokenResponse,
            UpdateProfileRequest, UserResponse, VerifyTokenResponse,
        },
        orders::{
            CreateOrderRequest, OrderItemRequest, OrderList, OrderStats, OrderStatusUpdateRequest,
            OrderWithItems, PaymentStatusUpdateRequest,
        },
        products::{CreateProductRequest, ProductList, StockUpdateRequest, UpdateProductRequest},
        search::{
            BulkIndexResult, PriceRange, SearchFilters, SearchHit, SearchResults, Suggestions,
        },
    },
    models::{Order, OrderItem, Product, SearchDocument, User},
    response::{ApiResponse, Meta},
    routes::{health, orders, params, products as product_routes, search, users},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        users::register,
        users::login,
        users::logout,
        users::get_profile,
        users::update_profile,
        users::reset_password,
        users::verify_token,
        users::refresh,
        orders::create_order,
        orders::get_order,
        orders::list_user_orders,
        orders::list_orders,
        orders::update_status,
        orders::update_payment_status,
        orders::cancel_order,
        orders::track_order,
        orders::order_stats,
        product_routes::list_products,
        product_routes::get_product,
        product_routes::create_product,
        product_routes::update_product,
        product_routes::delete_product,
        product_routes::list_by_category,
        product_routes::list_featured,
        product_routes::update_stock,
        search::search,
        search::suggestions,
        search::filters,
        search::index_product,
        search::bulk_index,
        search::delete_from_index
    ),
    components(
        schemas(
            User,
            Product,
            Order,
            OrderItem,
            SearchDocument,
            RegisterRequest,
            LoginRequest,
            RefreshRequest,
            ResetPasswordRequest,
            UpdateProfileRequest,
            UserResponse,
            TokenResponse,
            VerifyTokenResponse,
            CreateOrderRequest,
            OrderItemRequest,
            OrderStatusUpdateRequest,
            PaymentStatusUpdateRequest,
            OrderWithItems,
            OrderList,
            OrderStats,
            CreateProductRequest,
            UpdateProductRequest,
            StockUpdateRequest,
            ProductList,
            SearchHit,
            SearchResults,
            Suggestions,
            PriceRange,
            SearchFilters,
            BulkIndexResult,
            params::Pagination,
            params::OrderListQuery,
            params::ProductListQuery,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<Order>,
            ApiResponse<OrderWithItems>,
            ApiResponse<OrderList>,
            ApiResponse<OrderStats>,
            ApiResponse<TokenResponse>,
            ApiResponse<UserResponse>,
            ApiResponse<SearchResults>,
            ApiResponse<SearchFilters>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Users", description = "Registration, authentication and profile endpoints"),
        (name = "Orders", description = "Order lifecycle endpoints"),
        (name = "Products", description = "Catalog endpoints"),
        (name = "Search", description = "Full-text search and index maintenance endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
