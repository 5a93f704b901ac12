use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct Meta {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    pub total: Option<i64>,
}

impl Meta {
    pub fn new(skip: i64, limit: i64, total: i64) -> Self {
        Self {
            skip: Some(skip),
            limit: Some(limit),
            total: Some(total),
        }
    }

    pub fn empty() -> Self {
        Self {
            skip: None,
            limit: None,
            total: None,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: Option<T>,
    pub meta: Option<Meta>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T, meta: Option<Meta>) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            meta,
        }
    }
}
