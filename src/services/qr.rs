//! QR codes pointing diners at a table's menu

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Luma};
use qrcode::QrCode;

use crate::error::AppError;

/// Absolute URL of the customer menu for `table_id`
pub fn menu_url(base_url: &str, table_id: i32) -> String {
    format!("{}/table/{table_id}/menu/", base_url.trim_end_matches('/'))
}

/// Encode `data` as a QR code PNG
pub fn render_png(data: &str) -> Result<Vec<u8>, AppError> {
    let code = QrCode::new(data.as_bytes())?;
    let image = code.render::<Luma<u8>>().min_dimensions(256, 256).build();

    let mut png = Vec::new();
    DynamicImage::ImageLuma8(image).write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(png)
}
