//! Scaling of uploaded pictures.

use std::io::Cursor;

use bytes::Bytes;
use image::ImageFormat;
use image::imageops::FilterType;

use klink_core::error::{AppError, ErrorKind};
use klink_core::result::AppResult;

/// Scale an encoded image down so it fits inside `max_width` x `max_height`,
/// keeping its aspect ratio, and re-encode it in its original format.
///
/// Decoding runs on the blocking pool.
pub async fn fit_within(data: Bytes, max_width: u32, max_height: u32) -> AppResult<Bytes> {
    tokio::task::spawn_blocking(move || fit_within_blocking(&data, max_width, max_height))
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Internal, "Image task panicked", e))?
}

fn fit_within_blocking(data: &[u8], max_width: u32, max_height: u32) -> AppResult<Bytes> {
    if data.is_empty() {
        return Err(AppError::validation("Empty image data"));
    }

    let format = image::guess_format(data)
        .map_err(|e| AppError::with_source(ErrorKind::Validation, "Unrecognized image format", e))?;
    let img = image::load_from_memory_with_format(data, format)
        .map_err(|e| AppError::with_source(ErrorKind::Validation, "Could not decode image", e))?;

    if img.width() <= max_width && img.height() <= max_height {
        return Ok(Bytes::copy_from_slice(data));
    }

    let resized = img.resize(max_width, max_height, FilterType::Lanczos3);
    // JPEG has no alpha channel.
    let resized = if format == ImageFormat::Jpeg {
        image::DynamicImage::ImageRgb8(resized.to_rgb8())
    } else {
        resized
    };

    let mut out = Cursor::new(Vec::new());
    resized
        .write_to(&mut out, format)
        .map_err(|e| AppError::with_source(ErrorKind::Internal, "Could not encode image", e))?;

    tracing::debug!(
        from_width = img.width(),
        from_height = img.height(),
        to_width = resized.width(),
        to_height = resized.height(),
        "Resized image"
    );

    Ok(Bytes::from(out.into_inner()))
}
