use brybell_api::es::{EsClient, build_facets_body, build_search_body, build_suggest_body};
use brybell_api::models::SearchDocument;

// Integration flow over a live Elasticsearch: index two phones, check that a
// fuzzy name query ranks the exact-name match first. Skipped when no cluster
// is configured.
#[tokio::test]
async fn query_ranks_name_matches_first() -> anyhow::Result<()> {
    let es_url = match std::env::var("TEST_ELASTICSEARCH_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Skipping test: set TEST_ELASTICSEARCH_URL to run search flow tests.");
            return Ok(());
        }
    };

    let es = EsClient::new(&es_url);
    es.ensure_index().await?;

    let docs = vec![
        doc(9001, "iPhone 15", "Apple", 999.0),
        doc(9002, "Samsung Galaxy", "Samsung", 899.0),
    ];
    let errors = es.bulk_index(&docs).await?;
    assert!(!errors);
    es.refresh().await?;

    // The category filter pins the search to this test's documents.
    let body = build_search_body("iphone", Some("flowtest"), None, None, None, 0, 10);
    let resp = es.search(&body).await?;

    assert!(resp.hits.total.value >= 1);
    assert_eq!(resp.hits.hits[0].source.name, "iPhone 15");
    if let Some(second) = resp.hits.hits.get(1) {
        assert!(second.score <= resp.hits.hits[0].score);
    }

    // Prefix autocomplete finds the same document.
    let resp = es.search(&build_suggest_body("iph", 20)).await?;
    assert!(resp.hits.hits.iter().any(|h| h.source.name == "iPhone 15"));

    // Facet aggregations cover the indexed category and brands.
    let resp = es.search(&build_facets_body()).await?;
    let aggs = resp.aggregations.expect("aggregations");
    let categories: Vec<String> = aggs
        .categories
        .expect("categories agg")
        .buckets
        .into_iter()
        .map(|b| b.key)
        .collect();
    assert!(categories.contains(&"flowtest".to_string()));

    for d in &docs {
        es.delete_document(d.id).await?;
    }

    Ok(())
}

fn doc(id: i64, name: &str, brand: &str, price: f64) -> SearchDocument {
    SearchDocument {
        id,
        name: name.into(),
        description: format!("{name} smartphone"),
        price,
        category: "flowtest".into(),
        brand: brand.into(),
        image_url: String::new(),
    }
}
