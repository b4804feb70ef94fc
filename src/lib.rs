// src/lib.rs

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use sea_orm::DatabaseConnection;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::session::{MemorySessionStore, SessionStore};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub sessions: Arc<dyn SessionStore>,
    pub config: Arc<Config>,
}

impl AppState {
    /// State backed by the in-memory session store
    pub fn new(db: DatabaseConnection, config: Config) -> Self {
        Self {
            db,
            sessions: Arc::new(MemorySessionStore::new(config.session_idle)),
            config: Arc::new(config),
        }
    }
}

pub mod entities {
    pub mod prelude;
    pub mod dining_tables;
    pub mod menu_categories;
    pub mod menu_items;
    pub mod merchants;
    pub mod order_items;
    pub mod orders;
    pub mod restaurants;
}

pub mod services {
    pub mod auth;
    pub mod checkout;
    pub mod menu;
    pub mod orders;
    pub mod qr;
    pub mod restaurant;
}

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod session;

/// Build the application router with session handling and request tracing
pub fn app(state: AppState) -> Router {
    use handlers::{customer, menu_admin, merchant, orders, pages, qr};

    Router::new()
        .route("/", get(pages::home))
        .route("/success/", get(pages::order_success))
        .route("/feedback/", get(pages::feedback))
        .route("/table/{table_id}/menu/", get(customer::table_menu))
        .route("/table/{table_id}/order/{item_id}/", get(customer::add_to_cart))
        .route("/table/{table_id}/decrease/{item_id}/", get(customer::decrease_item))
        .route("/table/{table_id}/cart/", get(customer::view_cart))
        .route(
            "/merchant/login/",
            get(merchant::login_page).post(merchant::login),
        )
        .route("/merchant/logout/", get(merchant::logout))
        .route(
            "/merchant/dashboard/",
            get(merchant::dashboard).post(merchant::update_table_count),
        )
        .route("/merchant/order/{order_id}/", get(orders::order_detail))
        .route("/merchant/order/{order_id}/complete/", get(orders::complete_order))
        .route("/merchant/add-category/", post(menu_admin::add_category))
        .route("/merchant/add-menu-item/", post(menu_admin::add_menu_item))
        .route("/qr/{table_id}/", get(qr::generate_qr_code))
        .layer(middleware::from_fn_with_state(state.clone(), session::session_layer))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
