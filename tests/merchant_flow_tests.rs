mod common;

use std::str::FromStr;

use axum::http::StatusCode;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

use tableorder_backend::entities::{
    dining_tables, menu_items, order_items,
    orders::{self, OrderStatus},
    prelude::*,
};
use tableorder_backend::services::{auth, checkout::checkout};
use tableorder_backend::session::Cart;

use crate::common::{TestApp, seed_category, seed_item, seed_restaurant, seed_tables};

const DASHBOARD: &str = "/merchant/dashboard/";
const LOGIN: &str = "/merchant/login/";

async fn logged_in_app() -> (TestApp, i32) {
    let app = TestApp::new().await;
    let (_, restaurant) = seed_restaurant(&app.db, "anna", "s3cret", "Bistro").await;
    app.login("anna", "s3cret").await.assert_redirect(DASHBOARD);
    (app, restaurant.id)
}

async fn table_numbers(app: &TestApp, restaurant_id: i32) -> Vec<i32> {
    tableorder_backend::services::restaurant::list_tables(&app.db, restaurant_id)
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.table_number)
        .collect()
}

/// Place a one-line order at `table_id` directly through the checkout service
async fn place_order(app: &TestApp, table_id: i32, menu_item_id: i32, quantity: u32) -> orders::Model {
    let mut cart = Cart::new();
    for _ in 0..quantity {
        cart.increment(menu_item_id);
    }
    checkout(&app.db, table_id, &cart)
        .await
        .unwrap()
        .order()
        .cloned()
        .expect("order created")
}

#[tokio::test]
async fn test_merchant_routes_redirect_anonymous_visitors() {
    let app = TestApp::new().await;

    app.get(DASHBOARD).await.assert_redirect(LOGIN);
    app.post_form(DASHBOARD, "table_count=5").await.assert_redirect(LOGIN);
    app.get("/merchant/order/1/").await.assert_redirect(LOGIN);
    app.get("/merchant/order/1/complete/").await.assert_redirect(LOGIN);
    app.post_form("/merchant/add-category/", "category_name=Drinks")
        .await
        .assert_redirect(LOGIN);
    app.post_form("/merchant/add-menu-item/", "item_name=Tea&item_price=2&category_id=1")
        .await
        .assert_redirect(LOGIN);

    assert_eq!(MenuCategories::find().count(&app.db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_login_page_renders_without_error() {
    let app = TestApp::new().await;

    let response = app.get(LOGIN).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.json()["error_message"].is_null());
}

#[tokio::test]
async fn test_login_with_blank_fields() {
    let app = TestApp::new().await;
    seed_restaurant(&app.db, "anna", "s3cret", "Bistro").await;

    let response = app.post_form(LOGIN, "username=anna&password=+").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json()["error_message"],
        "Please enter both username and password."
    );
}

#[tokio::test]
async fn test_login_failures_share_one_message() {
    let app = TestApp::new().await;
    seed_restaurant(&app.db, "anna", "s3cret", "Bistro").await;
    auth::create_merchant_account(&app.db, "drifter", "s3cret").await.unwrap();

    for (username, password) in [("anna", "wrong"), ("nobody", "s3cret"), ("drifter", "s3cret")] {
        let response = app.login(username, password).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "{username}");
        assert_eq!(response.json()["error_message"], "Invalid username or password.");
    }

    assert!(!app.has_session_cookie());
    app.get(DASHBOARD).await.assert_redirect(LOGIN);
}

#[tokio::test]
async fn test_login_then_dashboard() {
    let (app, restaurant_id) = logged_in_app().await;
    assert!(app.has_session_cookie());

    let response = app.get(DASHBOARD).await;
    assert_eq!(response.status, StatusCode::OK);

    let json = response.json();
    assert_eq!(json["username"], "anna");
    assert_eq!(json["restaurant"]["id"], restaurant_id);
    assert_eq!(json["restaurant"]["num_tables"], 0);
    assert_eq!(json["orders"], serde_json::json!([]));
}

#[tokio::test]
async fn test_logout_ends_session() {
    let (app, _) = logged_in_app().await;

    app.get("/merchant/logout/").await.assert_redirect("/");
    assert!(!app.has_session_cookie());
    app.get(DASHBOARD).await.assert_redirect(LOGIN);
}

#[tokio::test]
async fn test_table_count_grows_and_shrinks() {
    let (app, restaurant_id) = logged_in_app().await;

    app.post_form(DASHBOARD, "table_count=3").await.assert_redirect(DASHBOARD);
    assert_eq!(table_numbers(&app, restaurant_id).await, vec![1, 2, 3]);

    app.post_form(DASHBOARD, "table_count=5").await.assert_redirect(DASHBOARD);
    assert_eq!(table_numbers(&app, restaurant_id).await, vec![1, 2, 3, 4, 5]);

    let json = app.get(DASHBOARD).await.json();
    assert_eq!(json["restaurant"]["num_tables"], 5);
    assert_eq!(json["tables"].as_array().unwrap().len(), 5);

    app.post_form(DASHBOARD, "table_count=3").await.assert_redirect(DASHBOARD);
    assert_eq!(table_numbers(&app, restaurant_id).await, vec![1, 2, 3]);
    assert_eq!(app.get(DASHBOARD).await.json()["restaurant"]["num_tables"], 3);
}

#[tokio::test]
async fn test_shrinking_tables_cascades_orders() {
    let (app, restaurant_id) = logged_in_app().await;
    let tables = seed_tables(&app.db, restaurant_id, 5).await;
    let category = seed_category(&app.db, restaurant_id, "Mains").await;
    let item = seed_item(&app.db, category.id, "Soup", dec!(4.50)).await;

    let kept = place_order(&app, tables[0].id, item.id, 1).await;
    let doomed = place_order(&app, tables[4].id, item.id, 2).await;

    app.post_form(DASHBOARD, "table_count=3").await.assert_redirect(DASHBOARD);

    assert!(Orders::find_by_id(doomed.id).one(&app.db).await.unwrap().is_none());
    let doomed_lines = OrderItems::find()
        .filter(order_items::Column::OrderId.eq(doomed.id))
        .count(&app.db)
        .await
        .unwrap();
    assert_eq!(doomed_lines, 0);
    assert!(Orders::find_by_id(kept.id).one(&app.db).await.unwrap().is_some());
}

#[tokio::test]
async fn test_large_table_count_spans_several_inserts() {
    let (app, restaurant_id) = logged_in_app().await;
    let category = seed_category(&app.db, restaurant_id, "Mains").await;
    let item = seed_item(&app.db, category.id, "Soup", dec!(4.50)).await;

    app.post_form(DASHBOARD, "table_count=1200").await.assert_redirect(DASHBOARD);
    let numbers = table_numbers(&app, restaurant_id).await;
    assert_eq!(numbers, (1..=1200).collect::<Vec<_>>());

    let tables = seed_tables(&app.db, restaurant_id, 1200).await;
    let doomed = place_order(&app, tables[999].id, item.id, 1).await;

    app.post_form(DASHBOARD, "table_count=2").await.assert_redirect(DASHBOARD);
    assert_eq!(table_numbers(&app, restaurant_id).await, vec![1, 2]);
    assert!(Orders::find_by_id(doomed.id).one(&app.db).await.unwrap().is_none());
    assert_eq!(OrderItems::find().count(&app.db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_invalid_table_count_is_ignored() {
    let (app, restaurant_id) = logged_in_app().await;
    seed_tables(&app.db, restaurant_id, 2).await;

    let forms = [
        "table_count=abc",
        "table_count=0",
        "table_count=-4",
        "table_count=3000000000",
        "",
    ];
    for form in forms {
        app.post_form(DASHBOARD, form).await.assert_redirect(DASHBOARD);
    }

    assert_eq!(table_numbers(&app, restaurant_id).await, vec![1, 2]);
}

#[tokio::test]
async fn test_add_category() {
    let (app, restaurant_id) = logged_in_app().await;

    app.post_form("/merchant/add-category/", "category_name=+Drinks+")
        .await
        .assert_redirect(DASHBOARD);
    app.post_form("/merchant/add-category/", "category_name=+++")
        .await
        .assert_redirect(DASHBOARD);

    let json = app.get(DASHBOARD).await.json();
    let categories = json["categories"].as_array().unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0]["name"], "Drinks");

    let stored = MenuCategories::find().all(&app.db).await.unwrap();
    assert_eq!(stored[0].restaurant_id, restaurant_id);
}

#[tokio::test]
async fn test_add_menu_item() {
    let (app, restaurant_id) = logged_in_app().await;
    let category = seed_category(&app.db, restaurant_id, "Drinks").await;

    let form = format!(
        "item_name=Lemonade&item_price=3.5&item_description=Fresh&category_id={}",
        category.id
    );
    app.post_form("/merchant/add-menu-item/", &form)
        .await
        .assert_redirect(DASHBOARD);

    let items = MenuItems::find().all(&app.db).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "Lemonade");
    assert_eq!(items[0].description, "Fresh");
    assert_eq!(items[0].price, dec!(3.5));
    assert_eq!(items[0].category_id, category.id);
    assert!(items[0].available);
}

#[tokio::test]
async fn test_add_menu_item_rejects_foreign_category() {
    let (app, _) = logged_in_app().await;
    let (_, rival) = seed_restaurant(&app.db, "rival", "pw", "Rival Diner").await;
    let foreign = seed_category(&app.db, rival.id, "Secret Menu").await;

    let form = format!("item_name=Intruder&item_price=1&category_id={}", foreign.id);
    app.post_form("/merchant/add-menu-item/", &form)
        .await
        .assert_redirect(DASHBOARD);

    let injected = MenuItems::find()
        .filter(menu_items::Column::CategoryId.eq(foreign.id))
        .count(&app.db)
        .await
        .unwrap();
    assert_eq!(injected, 0);
}

#[tokio::test]
async fn test_add_menu_item_ignores_invalid_input() {
    let (app, restaurant_id) = logged_in_app().await;
    let category = seed_category(&app.db, restaurant_id, "Drinks").await;
    let id = category.id;

    for form in [
        format!("item_name=Tea&item_price=cheap&category_id={id}"),
        format!("item_name=Tea&item_price=-2&category_id={id}"),
        format!("item_name=&item_price=2&category_id={id}"),
        "item_name=Tea&item_price=2&category_id=abc".to_string(),
        "item_name=Tea&item_price=2".to_string(),
    ] {
        app.post_form("/merchant/add-menu-item/", &form)
            .await
            .assert_redirect(DASHBOARD);
    }

    assert_eq!(MenuItems::find().count(&app.db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_dashboard_lists_own_pending_orders_newest_first() {
    let (app, restaurant_id) = logged_in_app().await;
    let tables = seed_tables(&app.db, restaurant_id, 2).await;
    let category = seed_category(&app.db, restaurant_id, "Mains").await;
    let item = seed_item(&app.db, category.id, "Soup", dec!(4.50)).await;

    let (_, rival) = seed_restaurant(&app.db, "rival", "pw", "Rival Diner").await;
    let rival_tables = seed_tables(&app.db, rival.id, 1).await;
    let rival_category = seed_category(&app.db, rival.id, "Mains").await;
    let rival_item = seed_item(&app.db, rival_category.id, "Stew", dec!(6.00)).await;

    let older = place_order(&app, tables[0].id, item.id, 1).await;
    let newer = place_order(&app, tables[1].id, item.id, 1).await;
    place_order(&app, rival_tables[0].id, rival_item.id, 1).await;

    let json = app.get(DASHBOARD).await.json();
    let listed: Vec<i64> = json["orders"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["id"].as_i64().unwrap())
        .collect();
    assert_eq!(listed, vec![newer.id as i64, older.id as i64]);
    assert_eq!(json["orders"][0]["table"]["table_number"], 2);
}

#[tokio::test]
async fn test_order_detail_shows_lines_and_total() {
    let (app, restaurant_id) = logged_in_app().await;
    let tables = seed_tables(&app.db, restaurant_id, 1).await;
    let category = seed_category(&app.db, restaurant_id, "Mains").await;
    let item = seed_item(&app.db, category.id, "Soup", dec!(4.50)).await;
    let order = place_order(&app, tables[0].id, item.id, 3).await;

    let response = app.get(&format!("/merchant/order/{}/", order.id)).await;
    assert_eq!(response.status, StatusCode::OK);

    let json = response.json();
    assert_eq!(json["order"]["status"], "PENDING");
    assert_eq!(json["items"][0]["quantity"], 3);
    let total = Decimal::from_str(json["total_price"].as_str().unwrap()).unwrap();
    assert_eq!(total, dec!(13.50));
}

#[tokio::test]
async fn test_orders_of_other_restaurants_are_not_found() {
    let (app, _) = logged_in_app().await;
    let (_, rival) = seed_restaurant(&app.db, "rival", "pw", "Rival Diner").await;
    let rival_tables = seed_tables(&app.db, rival.id, 1).await;
    let rival_category = seed_category(&app.db, rival.id, "Mains").await;
    let rival_item = seed_item(&app.db, rival_category.id, "Stew", dec!(6.00)).await;
    let order = place_order(&app, rival_tables[0].id, rival_item.id, 1).await;

    let response = app.get(&format!("/merchant/order/{}/", order.id)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app.get(&format!("/merchant/order/{}/complete/", order.id)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let stored = Orders::find_by_id(order.id).one(&app.db).await.unwrap().unwrap();
    assert_eq!(stored.status, OrderStatus::Pending);
}

#[tokio::test]
async fn test_complete_order_is_idempotent() {
    let (app, restaurant_id) = logged_in_app().await;
    let tables = seed_tables(&app.db, restaurant_id, 1).await;
    let category = seed_category(&app.db, restaurant_id, "Mains").await;
    let item = seed_item(&app.db, category.id, "Soup", dec!(4.50)).await;
    let order = place_order(&app, tables[0].id, item.id, 1).await;

    let complete = format!("/merchant/order/{}/complete/", order.id);
    app.get(&complete).await.assert_redirect(DASHBOARD);
    app.get(&complete).await.assert_redirect(DASHBOARD);

    let stored = Orders::find_by_id(order.id).one(&app.db).await.unwrap().unwrap();
    assert_eq!(stored.status, OrderStatus::Completed);
    assert_eq!(stored.pending_table_id, None);

    let json = app.get(DASHBOARD).await.json();
    assert_eq!(json["orders"], serde_json::json!([]));

    // The table can take a new order once the old one is completed
    let next = place_order(&app, tables[0].id, item.id, 1).await;
    assert_ne!(next.id, order.id);
    let pending = Orders::find()
        .filter(orders::Column::TableId.eq(tables[0].id))
        .filter(orders::Column::Status.eq(OrderStatus::Pending))
        .count(&app.db)
        .await
        .unwrap();
    assert_eq!(pending, 1);
}

#[tokio::test]
async fn test_qr_code_url_is_recorded_once() {
    let (app, restaurant_id) = logged_in_app().await;
    let tables = seed_tables(&app.db, restaurant_id, 1).await;
    let table_id = tables[0].id;

    app.get(&format!("/qr/{table_id}/")).await;
    let first = DiningTables::find_by_id(table_id).one(&app.db).await.unwrap().unwrap();
    assert!(first.qr_code_url.ends_with(&format!("/table/{table_id}/menu/")));

    app.get(&format!("/qr/{table_id}/")).await;
    let recorded = DiningTables::find()
        .filter(dining_tables::Column::QrCodeUrl.eq(first.qr_code_url.clone()))
        .count(&app.db)
        .await
        .unwrap();
    assert_eq!(recorded, 1);
}
