use axum::Json;

use crate::models::customer::{FeedbackView, HomeView, SuccessView};
use crate::session::Session;

use super::LOGIN_PATH;

/// GET /
pub async fn home() -> Json<HomeView> {
    Json(HomeView {
        title: "Table ordering".to_string(),
        merchant_login_url: LOGIN_PATH.to_string(),
    })
}

/// GET /success/
///
/// Confirmation page referencing the table whose cart was last viewed.
pub async fn order_success(session: Session) -> Json<SuccessView> {
    Json(SuccessView {
        table_id: session.last_table_id(),
    })
}

/// GET /feedback/
pub async fn feedback() -> Json<FeedbackView> {
    Json(FeedbackView {
        message: "Thank you for dining with us! We'd love to hear your feedback.".to_string(),
    })
}
