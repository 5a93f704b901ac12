use brybell_api::{
    config::AppConfig,
    db::{DbPool, create_pool, run_migrations},
    es::EsClient,
    models::SearchDocument,
    services::auth_service::hash_password,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;

    let admin_id = ensure_user(
        &pool,
        "admin@brybell.test",
        "+10000000001",
        "admin123",
        "admin",
    )
    .await?;
    let customer_id = ensure_user(
        &pool,
        "customer@brybell.test",
        "+10000000002",
        "customer123",
        "customer",
    )
    .await?;

    let docs = seed_products(&pool).await?;

    // Catalog writes do not propagate to the index on their own; this is the
    // explicit dual-write.
    let es = EsClient::new(&config.elasticsearch_url);
    es.ensure_index().await?;
    es.bulk_index(&docs).await?;

    println!(
        "Seed completed. Admin ID: {admin_id}, Customer ID: {customer_id}, products indexed: {}",
        docs.len()
    );
    Ok(())
}

async fn ensure_user(
    pool: &DbPool,
    email: &str,
    phone: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<i64> {
    let existing: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?;
    if let Some((id,)) = existing {
        return Ok(id);
    }

    let password_hash = hash_password(password)?;
    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO users (email, phone, password_hash, first_name, last_name, role)
        VALUES ($1, $2, $3, 'Demo', $4, $5)
        RETURNING id
        "#,
    )
    .bind(email)
    .bind(phone)
    .bind(password_hash)
    .bind(role)
    .bind(role)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

async fn seed_products(pool: &DbPool) -> anyhow::Result<Vec<SearchDocument>> {
    let samples: [(&str, &str, f64, &str, &str, i32, bool); 4] = [
        (
            "iPhone 15 Pro Max",
            "Latest iPhone with A17 Pro chip",
            1899.99,
            "phones",
            "Apple",
            50,
            true,
        ),
        (
            "Samsung Galaxy S24",
            "Flagship Android phone",
            1299.99,
            "phones",
            "Samsung",
            80,
            true,
        ),
        (
            "MacBook Air M3",
            "Thin and light laptop",
            1499.00,
            "laptops",
            "Apple",
            30,
            false,
        ),
        (
            "Sony WH-1000XM5",
            "Noise cancelling headphones",
            399.00,
            "audio",
            "Sony",
            120,
            false,
        ),
    ];

    let mut docs = Vec::with_capacity(samples.len());
    for (name, description, price, category, brand, stock, featured) in samples {
        let existing: Option<(i64,)> = sqlx::query_as("SELECT id FROM products WHERE name = $1")
            .bind(name)
            .fetch_optional(pool)
            .await?;

        let id = match existing {
            Some((id,)) => id,
            None => {
                let (id,): (i64,) = sqlx::query_as(
                    r#"
                    INSERT INTO products (name, description, price, category, brand, stock_quantity, featured)
                    VALUES ($1, $2, $3, $4, $5, $6, $7)
                    RETURNING id
                    "#,
                )
                .bind(name)
                .bind(description)
                .bind(price)
                .bind(category)
                .bind(brand)
                .bind(stock)
                .bind(featured)
                .fetch_one(pool)
                .await?;
                id
            }
        };

        docs.push(SearchDocument {
            id,
            name: name.to_string(),
            description: description.to_string(),
            price,
            category: category.to_string(),
            brand: brand.to_string(),
            image_url: String::new(),
        });
    }

    Ok(docs)
}
