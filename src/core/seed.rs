use rust_decimal::Decimal;
use sqlx::PgPool;

/// Idempotent catalog bootstrap: inserts the initial categories and
/// products once, on an empty database. Safe to call on every start.
pub async fn run(pool: &PgPool) -> Result<(), sqlx::Error> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
        .fetch_one(pool)
        .await?;

    if existing > 0 {
        tracing::debug!("Catalog already populated, skipping seed");
        return Ok(());
    }

    let electronics = insert_category(
        pool,
        "Electronics",
        Some("Electronic devices and gadgets"),
    )
    .await?;
    let books = insert_category(pool, "Books", Some("Print and digital books")).await?;
    let clothing = insert_category(pool, "Clothing", Some("Apparel and accessories")).await?;

    insert_product(
        pool,
        "Laptop Pro 15",
        Some("15-inch laptop, 16GB RAM, 512GB SSD"),
        Decimal::new(129_999, 2),
        25,
        electronics,
    )
    .await?;
    insert_product(
        pool,
        "Mechanical RGB Keyboard",
        Some("Gaming keyboard with Cherry MX switches"),
        Decimal::new(8_999, 2),
        150,
        electronics,
    )
    .await?;
    insert_product(
        pool,
        "Clean Code",
        Some("Robert C. Martin's handbook of software craftsmanship"),
        Decimal::new(3_450, 2),
        80,
        books,
    )
    .await?;
    insert_product(
        pool,
        "Design Patterns",
        Some("Gang of Four catalog of reusable designs"),
        Decimal::new(4_200, 2),
        45,
        books,
    )
    .await?;
    insert_product(
        pool,
        "Developer T-Shirt",
        Some("100% cotton programmer t-shirt"),
        Decimal::new(2_499, 2),
        200,
        clothing,
    )
    .await?;

    tracing::info!("Catalog seeded with initial categories and products");
    Ok(())
}

async fn insert_category(
    pool: &PgPool,
    name: &str,
    description: Option<&str>,
) -> Result<i32, sqlx::Error> {
    sqlx::query_scalar("INSERT INTO categories (name, description) VALUES ($1, $2) RETURNING id")
        .bind(name)
        .bind(description)
        .fetch_one(pool)
        .await
}

async fn insert_product(
    pool: &PgPool,
    name: &str,
    description: Option<&str>,
    price: Decimal,
    stock: i32,
    category_id: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO products (name, description, price, stock, category_id) \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(name)
    .bind(description)
    .bind(price)
    .bind(stock)
    .bind(category_id)
    .execute(pool)
    .await?;

    Ok(())
}
