use super::renderer::RenderedImage;
use crate::config::MAX_MARK_WIDTH_RATIO;
use crate::error::{PaymentError, Result};
use image::imageops::{self, FilterType};

/// Places the brand mark in the centre of `base`.
///
/// The mark is decoded from `mark`, scaled with its aspect ratio preserved to
/// fit a box of `ratio` times the base's width and height, and composited over
/// the code. The base keeps its dimensions.
pub fn overlay(base: RenderedImage, mark: &[u8], ratio: f32) -> Result<RenderedImage> {
    if !(ratio > 0.0 && ratio <= MAX_MARK_WIDTH_RATIO) {
        return Err(PaymentError::Compositing(format!(
            "mark ratio {ratio} exceeds the {MAX_MARK_WIDTH_RATIO} occlusion budget"
        )));
    }

    let mark = image::load_from_memory(mark)
        .map_err(|e| PaymentError::Compositing(format!("mark cannot be decoded: {e}")))?;
    if mark.width() == 0 || mark.height() == 0 {
        return Err(PaymentError::Compositing("mark has no pixels".to_string()));
    }

    let (width, height) = (base.width(), base.height());
    let box_width = (width as f32 * ratio).floor() as u32;
    let box_height = (height as f32 * ratio).floor() as u32;
    if box_width == 0 || box_height == 0 {
        return Err(PaymentError::Compositing(format!(
            "base image {width}x{height} is too small to carry a mark"
        )));
    }

    let (fit_width, fit_height) = fit_within(
        (mark.width(), mark.height()),
        (box_width, box_height),
    );
    let resized = imageops::resize(&mark.to_rgba8(), fit_width, fit_height, FilterType::Lanczos3);

    let x = (width - fit_width) / 2;
    let y = (height - fit_height) / 2;
    let mut pixels = base.into_pixels();
    imageops::overlay(&mut pixels, &resized, i64::from(x), i64::from(y));

    Ok(RenderedImage::new(pixels))
}

/// Largest size with the source's aspect ratio that fits the bounding box.
fn fit_within(source: (u32, u32), bounds: (u32, u32)) -> (u32, u32) {
    let (w, h) = (f64::from(source.0), f64::from(source.1));
    let scale = (f64::from(bounds.0) / w).min(f64::from(bounds.1) / h);
    let fit_w = ((w * scale).round() as u32).clamp(1, bounds.0);
    let fit_h = ((h * scale).round() as u32).clamp(1, bounds.1);
    (fit_w, fit_h)
}
