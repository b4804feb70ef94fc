use axum::{
    extract::{Path, State},
    http::{HeaderMap, header},
    response::IntoResponse,
};
use tracing::{debug, warn};

use crate::AppState;
use crate::error::AppError;
use crate::services::{qr, restaurant};

/// GET /qr/{table_id}/
///
/// PNG QR code encoding the absolute menu URL of the table. The URL is
/// recorded on the table the first time it is generated. Without a configured
/// public base URL the Host header must name an allowed host.
pub async fn generate_qr_code(
    State(state): State<AppState>,
    Path(table_id): Path<i32>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let (table, _) = restaurant::find_table(&state.db, table_id)
        .await?
        .ok_or(AppError::NotFound("Table"))?;

    let base_url = match &state.config.public_base_url {
        Some(base) => base.clone(),
        None => {
            let host = headers
                .get(header::HOST)
                .and_then(|value| value.to_str().ok())
                .unwrap_or_default();
            let Some(host) = state.config.trusted_host(host) else {
                warn!(table_id, host, "Rejecting QR request for untrusted host");
                return Err(AppError::BadRequest("Invalid Host header"));
            };
            format!("http://{host}")
        }
    };
    let url = qr::menu_url(&base_url, table_id);

    let png = qr::render_png(&url)?;
    restaurant::record_qr_code_url(&state.db, table, &url).await?;

    debug!(table_id, %url, bytes = png.len(), "Generated QR code");

    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}
