use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum_storefront_api::{config::AppConfig, db::create_pool};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let admin_id = ensure_user(&pool, "admin@example.com", "admin123", "Admin", "admin").await?;
    let user_id = ensure_user(&pool, "user@example.com", "user123", "Demo Customer", "user").await?;
    seed_catalogue(&pool).await?;
    seed_dispute_choices(&pool).await?;

    println!("Seed completed. Admin ID: {admin_id}, User ID: {user_id}");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    email: &str,
    password: &str,
    name: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let row: (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, name, role)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind(name)
    .bind(role)
    .fetch_one(pool)
    .await?;

    println!("Ensured user {email} (role={role})");
    Ok(row.0)
}

async fn seed_catalogue(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let categories = vec![
        ("Laptops", "laptops"),
        ("Keyboards", "keyboards"),
        ("Accessories", "accessories"),
    ];
    for (name, slug) in &categories {
        sqlx::query(
            r#"
            INSERT INTO categories (id, name, slug)
            VALUES ($1, $2, $3)
            ON CONFLICT (slug) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(slug)
        .execute(pool)
        .await?;
    }

    // (name, slug, category slug, description, price in cents, in sale)
    let products = vec![
        ("Crab Book 14", "crab-book-14", "laptops", "Light 14-inch laptop", 129_900_i64, true),
        ("Crab Book 16", "crab-book-16", "laptops", "16-inch workstation", 199_900, true),
        ("Ferris TKL", "ferris-tkl", "keyboards", "Tenkeyless mechanical keyboard", 12_900, true),
        ("Ferris Numpad", "ferris-numpad", "keyboards", "Standalone numpad", 4_900, false),
        ("USB-C Dock", "usb-c-dock", "accessories", "11-in-1 dock", 8_900, true),
    ];
    for (name, slug, category, description, price, in_sale) in products {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, slug, category_id, description, price, in_sale)
            SELECT $1, $2, $3, c.id, $5, $6, $7
            FROM categories c WHERE c.slug = $4
            ON CONFLICT (slug) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(slug)
        .bind(category)
        .bind(description)
        .bind(price)
        .bind(in_sale)
        .execute(pool)
        .await?;
    }

    let properties = vec![
        ("crab-book-14", "Display", "14\" 1920x1200"),
        ("crab-book-14", "Weight", "1.2 kg"),
        ("crab-book-16", "Display", "16\" 2560x1600"),
        ("ferris-tkl", "Switches", "Brown tactile"),
    ];
    for (product_slug, property, value) in properties {
        sqlx::query(
            r#"
            INSERT INTO product_properties (id, name)
            VALUES ($1, $2)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(property)
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO property_values (id, product_id, property_id, value)
            SELECT $1, p.id, pp.id, $4
            FROM products p, product_properties pp
            WHERE p.slug = $2 AND pp.name = $3
            ON CONFLICT (product_id, property_id) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(product_slug)
        .bind(property)
        .bind(value)
        .execute(pool)
        .await?;
    }

    println!("Seeded catalogue");
    Ok(())
}

async fn seed_dispute_choices(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let choices = vec!["Refund", "Replacement", "Rejected"];
    for choice in choices {
        sqlx::query(
            r#"
            INSERT INTO dispute_choices (id, choice)
            VALUES ($1, $2)
            ON CONFLICT (choice) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(choice)
        .execute(pool)
        .await?;
    }

    println!("Seeded dispute choices");
    Ok(())
}
