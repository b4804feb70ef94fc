#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, Bytes},
    http::{HeaderMap, Request, StatusCode, header},
};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, DbErr, Set};
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use tower::ServiceExt;

use tableorder_backend::{
    AppState, app,
    config::Config,
    entities::{dining_tables, menu_categories, menu_items, merchants, restaurants},
    services::{auth, restaurant},
    session::SESSION_COOKIE,
};

pub const TEST_HOST: &str = "orders.test";

/// Fresh in-memory SQLite database with all migrations applied.
/// A single connection keeps every query on the same in-memory database.
pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1).sqlx_logging(false);

    let db = Database::connect(options).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

pub async fn seed_restaurant(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
    name: &str,
) -> (merchants::Model, restaurants::Model) {
    auth::create_merchant(db, username, password, name, "")
        .await
        .expect("Failed to create merchant")
}

/// Resize the restaurant to `count` tables and return them ordered by number
pub async fn seed_tables(
    db: &DatabaseConnection,
    restaurant_id: i32,
    count: u32,
) -> Vec<dining_tables::Model> {
    let restaurant = restaurant::find_restaurant(db, restaurant_id)
        .await
        .unwrap()
        .expect("restaurant exists");
    restaurant::set_table_count(db, restaurant, count).await.unwrap();
    restaurant::list_tables(db, restaurant_id).await.unwrap()
}

pub async fn seed_category(db: &DatabaseConnection, restaurant_id: i32, name: &str) -> menu_categories::Model {
    menu_categories::ActiveModel {
        restaurant_id: Set(restaurant_id),
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create category")
}

pub async fn seed_item(
    db: &DatabaseConnection,
    category_id: i32,
    name: &str,
    price: Decimal,
) -> menu_items::Model {
    menu_items::ActiveModel {
        category_id: Set(category_id),
        name: Set(name.to_string()),
        description: Set(String::new()),
        price: Set(price),
        available: Set(true),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create menu item")
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is JSON")
    }

    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
    }

    pub fn assert_redirect(&self, to: &str) {
        assert_eq!(self.status, StatusCode::SEE_OTHER, "expected redirect to {to}");
        assert_eq!(self.location(), Some(to));
    }
}

/// The real router plus a cookie jar holding one visitor's session
pub struct TestApp {
    pub db: DatabaseConnection,
    router: Router,
    cookie: Mutex<Option<String>>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db = setup_test_db().await.expect("Failed to set up test DB");
        Self::with_db(db)
    }

    pub fn with_db(db: DatabaseConnection) -> Self {
        let mut config = Config::for_database("sqlite::memory:");
        config.allowed_hosts.push(TEST_HOST.to_string());
        Self::with_config(db, config)
    }

    pub fn with_config(db: DatabaseConnection, config: Config) -> Self {
        let state = AppState::new(db.clone(), config);
        Self {
            db,
            router: app(state),
            cookie: Mutex::new(None),
        }
    }

    /// Another visitor sharing the same application and database
    pub fn visitor(&self) -> Self {
        Self {
            db: self.db.clone(),
            router: self.router.clone(),
            cookie: Mutex::new(None),
        }
    }

    pub fn has_session_cookie(&self) -> bool {
        self.cookie.lock().is_some()
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.get_with_host(uri, TEST_HOST).await
    }

    pub async fn get_with_host(&self, uri: &str, host: &str) -> TestResponse {
        let request = self.request("GET", uri, host).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn post_form(&self, uri: &str, form: &str) -> TestResponse {
        let request = self
            .request("POST", uri, TEST_HOST)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn login(&self, username: &str, password: &str) -> TestResponse {
        self.post_form(
            "/merchant/login/",
            &format!("username={username}&password={password}"),
        )
        .await
    }

    fn request(&self, method: &str, uri: &str, host: &str) -> axum::http::request::Builder {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::HOST, host);
        if let Some(cookie) = self.cookie.lock().as_ref() {
            builder = builder.header(header::COOKIE, cookie.as_str());
        }
        builder
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        for set_cookie in headers.get_all(header::SET_COOKIE) {
            let set_cookie = set_cookie.to_str().unwrap();
            let Some(pair) = set_cookie.split(';').next() else {
                continue;
            };
            let Some((name, value)) = pair.split_once('=') else {
                continue;
            };
            if name != SESSION_COOKIE {
                continue;
            }
            *self.cookie.lock() = if value.is_empty() || set_cookie.contains("Max-Age=0") {
                None
            } else {
                Some(pair.to_string())
            };
        }

        TestResponse { status, headers, body }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_setup_test_db() {
        let db = setup_test_db().await;
        assert!(db.is_ok(), "Test database should migrate");
    }
}
