//! Create a merchant login together with the restaurant it manages.
//!
//! Usage: create_merchant <username> <password> <restaurant name> [description]

use std::env;

use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tableorder_backend::services::auth;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tableorder_backend=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let args: Vec<String> = env::args().collect();
    if args.len() < 4 {
        eprintln!("Usage: cargo run --bin create_merchant <username> <password> <restaurant name> [description]");
        eprintln!("Example: cargo run --bin create_merchant anna s3cret \"Anna's Bistro\"");
        std::process::exit(1);
    }

    let username = args[1].trim();
    let password = args[2].trim();
    let restaurant_name = args[3].trim();
    let description = args.get(4).map(|d| d.trim()).unwrap_or_default();

    if username.is_empty() || password.is_empty() || restaurant_name.is_empty() {
        eprintln!("Username, password and restaurant name must not be blank.");
        std::process::exit(1);
    }

    let database_url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?;
    tracing::info!("Connecting to database...");
    let db = Database::connect(&database_url).await?;
    migration::Migrator::up(&db, None).await?;

    let (merchant, restaurant) =
        auth::create_merchant(&db, username, password, restaurant_name, description).await?;

    println!(
        "Created merchant '{}' (id {}) for restaurant '{}' (id {})",
        merchant.username, merchant.id, restaurant.name, restaurant.id
    );

    Ok(())
}
