use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use thiserror::Error;

use crate::models::common::ErrorResponse;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    BadRequest(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("QR encoding failed: {0}")]
    QrCode(#[from] qrcode::types::QrError),

    #[error("Image encoding failed: {0}")]
    Image(#[from] image::ImageError),
}

impl From<argon2::password_hash::Error> for AppError {
    fn from(e: argon2::password_hash::Error) -> Self {
        AppError::PasswordHash(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_)
            | AppError::PasswordHash(_)
            | AppError::QrCode(_)
            | AppError::Image(_) => {
                tracing::error!(error = %self, "Request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
