use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::AppResult;
use crate::models::SearchDocument;

pub const PRODUCTS_INDEX: &str = "products";

/// Thin client over the Elasticsearch REST API. Owns a connection pool via
/// `reqwest::Client`; all calls target a single product index.
#[derive(Clone)]
pub struct EsClient {
    client: reqwest::Client,
    base_url: String,
    index: String,
}

#[derive(Debug, Deserialize)]
pub struct EsSearchResponse {
    pub hits: EsHits,
    pub aggregations: Option<EsAggregations>,
}

#[derive(Debug, Deserialize)]
pub struct EsHits {
    pub total: EsTotal,
    pub hits: Vec<EsHit>,
}

#[derive(Debug, Deserialize)]
pub struct EsTotal {
    pub value: i64,
}

#[derive(Debug, Deserialize)]
pub struct EsHit {
    #[serde(rename = "_score")]
    pub score: Option<f64>,
    #[serde(rename = "_source")]
    pub source: SearchDocument,
}

#[derive(Debug, Deserialize)]
pub struct EsAggregations {
    pub categories: Option<EsTermsAgg>,
    pub brands: Option<EsTermsAgg>,
    pub price_stats: Option<EsStatsAgg>,
}

#[derive(Debug, Deserialize)]
pub struct EsTermsAgg {
    pub buckets: Vec<EsBucket>,
}

#[derive(Debug, Deserialize)]
pub struct EsBucket {
    pub key: String,
}

#[derive(Debug, Deserialize)]
pub struct EsStatsAgg {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct EsBulkResponse {
    pub errors: bool,
}

impl EsClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            index: PRODUCTS_INDEX.to_string(),
        }
    }

    fn index_url(&self, suffix: &str) -> String {
        format!("{}/{}{}", self.base_url, self.index, suffix)
    }

    /// Create the product index with its analyzer and mappings when absent.
    pub async fn ensure_index(&self) -> AppResult<()> {
        let resp = self.client.head(self.index_url("")).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            self.client
                .put(self.index_url(""))
                .json(&index_mapping())
                .send()
                .await?
                .error_for_status()?;
            tracing::info!(index = %self.index, "created search index");
        } else {
            resp.error_for_status()?;
        }
        Ok(())
    }

    pub async fn search(&self, body: &Value) -> AppResult<EsSearchResponse> {
        let resp = self
            .client
            .post(self.index_url("/_search"))
            .json(body)
            .send()
            .await?
            .error_for_status()?
            .json::<EsSearchResponse>()
            .await?;
        Ok(resp)
    }

    pub async fn index_document(&self, doc: &SearchDocument) -> AppResult<()> {
        self.client
            .put(self.index_url(&format!("/_doc/{}", doc.id)))
            .json(doc)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// Bulk upsert via the NDJSON `_bulk` endpoint. Returns the index-side
    /// per-item error flag.
    pub async fn bulk_index(&self, docs: &[SearchDocument]) -> AppResult<bool> {
        let mut body = String::new();
        for doc in docs {
            let action = json!({ "index": { "_index": self.index, "_id": doc.id } });
            body.push_str(&action.to_string());
            body.push('\n');
            body.push_str(&serde_json::to_string(doc).map_err(anyhow::Error::from)?);
            body.push('\n');
        }

        let resp = self
            .client
            .post(self.index_url("/_bulk"))
            .header("content-type", "application/x-ndjson")
            .body(body)
            .send()
            .await?
            .error_for_status()?
            .json::<EsBulkResponse>()
            .await?;
        Ok(resp.errors)
    }

    /// Force a segment refresh so just-indexed documents become searchable.
    pub async fn refresh(&self) -> AppResult<()> {
        self.client
            .post(self.index_url("/_refresh"))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    pub async fn delete_document(&self, id: i64) -> AppResult<()> {
        self.client
            .delete(self.index_url(&format!("/_doc/{id}")))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

/// Weighted multi-field full-text query with optional term/range filters,
/// ranked by relevance then ascending price.
pub fn build_search_body(
    q: &str,
    category: Option<&str>,
    brand: Option<&str>,
    min_price: Option<f64>,
    max_price: Option<f64>,
    skip: i64,
    limit: i64,
) -> Value {
    let mut filter: Vec<Value> = Vec::new();

    if let Some(category) = category {
        filter.push(json!({ "term": { "category": category } }));
    }
    if let Some(brand) = brand {
        filter.push(json!({ "term": { "brand": brand } }));
    }
    if min_price.is_some() || max_price.is_some() {
        let mut range = serde_json::Map::new();
        if let Some(min_price) = min_price {
            range.insert("gte".into(), json!(min_price));
        }
        if let Some(max_price) = max_price {
            range.insert("lte".into(), json!(max_price));
        }
        filter.push(json!({ "range": { "price": range } }));
    }

    json!({
        "query": {
            "bool": {
                "must": [
                    {
                        "multi_match": {
                            "query": q,
                            "fields": ["name^3", "description", "brand^2", "category"],
                            "fuzziness": "AUTO"
                        }
                    }
                ],
                "filter": filter
            }
        },
        "from": skip,
        "size": limit,
        "sort": [
            { "_score": { "order": "desc" } },
            { "price": { "order": "asc" } }
        ]
    })
}

pub fn build_suggest_body(prefix: &str, size: i64) -> Value {
    json!({
        "query": {
            "match_phrase_prefix": { "name": { "query": prefix } }
        },
        "_source": ["name"],
        "size": size
    })
}

pub fn build_facets_body() -> Value {
    json!({
        "size": 0,
        "aggs": {
            "categories": { "terms": { "field": "category", "size": 20 } },
            "brands": { "terms": { "field": "brand", "size": 50 } },
            "price_stats": { "stats": { "field": "price" } }
        }
    })
}

fn index_mapping() -> Value {
    json!({
        "settings": {
            "analysis": {
                "analyzer": {
                    "product_analyzer": {
                        "type": "custom",
                        "tokenizer": "standard",
                        "filter": ["lowercase", "stop", "snowball"]
                    }
                }
            }
        },
        "mappings": {
            "properties": {
                "id": { "type": "long" },
                "name": {
                    "type": "text",
                    "analyzer": "product_analyzer",
                    "fields": {
                        "keyword": { "type": "keyword" }
                    }
                },
                "description": { "type": "text", "analyzer": "product_analyzer" },
                "price": { "type": "double" },
                "category": { "type": "keyword" },
                "brand": { "type": "keyword" },
                "image_url": { "type": "keyword" }
            }
        }
    })
}
