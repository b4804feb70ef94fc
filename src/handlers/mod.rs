pub mod customer;
pub mod menu_admin;
pub mod merchant;
pub mod orders;
pub mod pages;
pub mod qr;

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};

use crate::session::{MerchantIdentity, Session};

pub const LOGIN_PATH: &str = "/merchant/login/";
pub const DASHBOARD_PATH: &str = "/merchant/dashboard/";

pub fn menu_path(table_id: i32) -> String {
    format!("/table/{table_id}/menu/")
}

/// The logged-in merchant. Anonymous requests are redirected to the login page.
#[derive(Debug, Clone)]
pub struct CurrentMerchant(pub MerchantIdentity);

impl<S> FromRequestParts<S> for CurrentMerchant
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        session
            .merchant()
            .map(CurrentMerchant)
            .ok_or_else(|| Redirect::to(LOGIN_PATH).into_response())
    }
}
