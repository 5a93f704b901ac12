use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
pub struct Pagination {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

impl Pagination {
    pub fn normalize(self, default_limit: i64) -> (i64, i64) {
        let skip = self.skip.unwrap_or(0).max(0);
        let limit = self.limit.unwrap_or(default_limit).clamp(1, 100);
        (skip, limit)
    }
}

// Query structs carry skip/limit inline rather than via #[serde(flatten)]:
// axum's Query deserializer cannot handle flattened numeric options.

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderListQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<String>,
}

impl OrderListQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            skip: self.skip,
            limit: self.limit,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProductListQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    pub category: Option<String>,
    pub featured: Option<bool>,
    pub search: Option<String>,
}

impl ProductListQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            skip: self.skip,
            limit: self.limit,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct FeaturedQuery {
    pub limit: Option<i64>,
}
