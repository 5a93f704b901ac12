use brybell_api::es::{build_facets_body, build_search_body, build_suggest_body};
use serde_json::json;

#[test]
fn search_body_weights_name_highest() {
    let body = build_search_body("iphone", None, None, None, None, 0, 20);
    let multi_match = &body["query"]["bool"]["must"][0]["multi_match"];

    assert_eq!(multi_match["query"], json!("iphone"));
    assert_eq!(
        multi_match["fields"],
        json!(["name^3", "description", "brand^2", "category"])
    );
    assert_eq!(multi_match["fuzziness"], json!("AUTO"));
}

#[test]
fn search_body_without_filters_has_empty_filter_clause() {
    let body = build_search_body("case", None, None, None, None, 0, 20);
    assert_eq!(body["query"]["bool"]["filter"], json!([]));
}

#[test]
fn search_body_includes_term_and_range_filters() {
    let body = build_search_body(
        "phone",
        Some("phones"),
        Some("Apple"),
        Some(100.0),
        Some(2000.0),
        10,
        5,
    );
    let filter = &body["query"]["bool"]["filter"];

    assert_eq!(filter[0], json!({ "term": { "category": "phones" } }));
    assert_eq!(filter[1], json!({ "term": { "brand": "Apple" } }));
    assert_eq!(
        filter[2],
        json!({ "range": { "price": { "gte": 100.0, "lte": 2000.0 } } })
    );
    assert_eq!(body["from"], json!(10));
    assert_eq!(body["size"], json!(5));
}

#[test]
fn search_body_with_only_min_price_omits_upper_bound() {
    let body = build_search_body("phone", None, None, Some(50.0), None, 0, 20);
    assert_eq!(
        body["query"]["bool"]["filter"][0],
        json!({ "range": { "price": { "gte": 50.0 } } })
    );
}

#[test]
fn search_body_sorts_by_score_then_price() {
    let body = build_search_body("phone", None, None, None, None, 0, 20);
    assert_eq!(
        body["sort"],
        json!([
            { "_score": { "order": "desc" } },
            { "price": { "order": "asc" } }
        ])
    );
}

#[test]
fn suggest_body_is_a_name_prefix_query() {
    let body = build_suggest_body("iph", 20);
    assert_eq!(
        body["query"]["match_phrase_prefix"]["name"]["query"],
        json!("iph")
    );
    assert_eq!(body["_source"], json!(["name"]));
    assert_eq!(body["size"], json!(20));
}

#[test]
fn facets_body_requests_all_three_aggregations_without_hits() {
    let body = build_facets_body();
    assert_eq!(body["size"], json!(0));
    assert_eq!(
        body["aggs"]["categories"]["terms"],
        json!({ "field": "category", "size": 20 })
    );
    assert_eq!(
        body["aggs"]["brands"]["terms"],
        json!({ "field": "brand", "size": 50 })
    );
    assert_eq!(
        body["aggs"]["price_stats"]["stats"],
        json!({ "field": "price" })
    );
}
