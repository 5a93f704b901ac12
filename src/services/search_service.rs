use crate::{
    dto::search::{
        BulkIndexResult, PriceRange, SearchFilters, SearchHit, SearchParams, SearchResults,
        SuggestParams, Suggestions,
    },
    error::{AppError, AppResult},
    es::{build_facets_body, build_search_body, build_suggest_body},
    models::SearchDocument,
    response::{ApiResponse, Meta},
    state::AppState,
};

const SUGGESTION_COUNT: usize = 5;

pub async fn search(
    state: &AppState,
    params: SearchParams,
) -> AppResult<ApiResponse<SearchResults>> {
    let q = params
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::Validation("q is required".to_string()))?;

    let skip = params.skip.unwrap_or(0).max(0);
    let limit = params.limit.unwrap_or(20).clamp(1, 100);

    let body = build_search_body(
        q,
        params.category.as_deref(),
        params.brand.as_deref(),
        params.min_price,
        params.max_price,
        skip,
        limit,
    );
    let resp = state.es.search(&body).await?;

    let results = resp
        .hits
        .hits
        .into_iter()
        .map(|hit| {
            let doc = hit.source;
            SearchHit {
                id: doc.id,
                name: doc.name,
                description: doc.description,
                price: doc.price,
                category: doc.category,
                brand: doc.brand,
                image_url: doc.image_url,
                score: hit.score.unwrap_or(0.0),
            }
        })
        .collect();

    Ok(ApiResponse::success(
        "Search results",
        SearchResults {
            total: resp.hits.total.value,
            results,
        },
        Some(Meta::new(skip, limit, resp.hits.total.value)),
    ))
}

pub async fn suggestions(
    state: &AppState,
    params: SuggestParams,
) -> AppResult<ApiResponse<Suggestions>> {
    let q = params
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| q.chars().count() >= 2)
        .ok_or_else(|| AppError::Validation("q must be at least 2 characters".to_string()))?;

    // Over-fetch so duplicates can be collapsed client-side.
    let body = build_suggest_body(q, (SUGGESTION_COUNT * 4) as i64);
    let resp = state.es.search(&body).await?;

    let mut suggestions: Vec<String> = Vec::new();
    for hit in resp.hits.hits {
        let name = hit.source.name;
        if !suggestions.contains(&name) {
            suggestions.push(name);
        }
        if suggestions.len() == SUGGESTION_COUNT {
            break;
        }
    }

    Ok(ApiResponse::success(
        "Suggestions",
        Suggestions { suggestions },
        Some(Meta::empty()),
    ))
}

pub async fn filters(state: &AppState) -> AppResult<ApiResponse<SearchFilters>> {
    let resp = state.es.search(&build_facets_body()).await?;
    let aggs = resp
        .aggregations
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("missing aggregations in response")))?;

    let categories = aggs
        .categories
        .map(|agg| agg.buckets.into_iter().map(|b| b.key).collect())
        .unwrap_or_default();
    let brands = aggs
        .brands
        .map(|agg| agg.buckets.into_iter().map(|b| b.key).collect())
        .unwrap_or_default();
    let price_range = aggs
        .price_stats
        .map(|stats| PriceRange {
            min: stats.min.unwrap_or(0.0),
            max: stats.max.unwrap_or(0.0),
        })
        .unwrap_or(PriceRange { min: 0.0, max: 0.0 });

    Ok(ApiResponse::success(
        "Filters",
        SearchFilters {
            categories,
            brands,
            price_range,
        },
        Some(Meta::empty()),
    ))
}

pub async fn index_product(
    state: &AppState,
    doc: SearchDocument,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let id = doc.id;
    state.es.index_document(&doc).await?;

    Ok(ApiResponse::success(
        "Product indexed successfully",
        serde_json::json!({ "id": id }),
        Some(Meta::empty()),
    ))
}

pub async fn bulk_index(
    state: &AppState,
    docs: Vec<SearchDocument>,
) -> AppResult<ApiResponse<BulkIndexResult>> {
    let errors = state.es.bulk_index(&docs).await?;
    if errors {
        tracing::warn!(count = docs.len(), "bulk indexing reported item errors");
    }

    Ok(ApiResponse::success(
        "Bulk indexing completed",
        BulkIndexResult {
            indexed: docs.len(),
            errors,
        },
        Some(Meta::empty()),
    ))
}

pub async fn delete_from_index(
    state: &AppState,
    id: i64,
) -> AppResult<ApiResponse<serde_json::Value>> {
    state.es.delete_document(id).await?;

    Ok(ApiResponse::success(
        "Product removed from index",
        serde_json::json!({ "id": id }),
        Some(Meta::empty()),
    ))
}
