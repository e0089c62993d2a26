use crate::config::ErrorCorrection;
use crate::error::{PaymentError, Result};
use image::{ImageFormat, Rgba, RgbaImage};
use qrcode::{Color, QrCode};
use std::io::Cursor;

const DARK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const LIGHT: Rgba<u8> = Rgba([255, 255, 255, 255]);
/// Upper bound on the RGBA buffer of one rendered code.
pub const MAX_CANVAS_BYTES: u64 = 256 * 1024 * 1024;

/// Lossless RGBA raster that lives between rendering and publishing.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedImage {
    pixels: RgbaImage,
}

impl RenderedImage {
    pub fn new(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn into_pixels(self) -> RgbaImage {
        self.pixels
    }

    /// Encodes the raster as PNG.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut out = Cursor::new(Vec::new());
        self.pixels
            .write_to(&mut out, ImageFormat::Png)
            .map_err(|e| PaymentError::Encoding(format!("PNG encoding failed: {e}")))?;
        Ok(out.into_inner())
    }
}

/// Encodes `payload` as a matrix code.
///
/// Each module is painted as a `scale` x `scale` block and the matrix is
/// surrounded by `quiet_zone` light modules on every side.
pub fn render(
    payload: &str,
    level: ErrorCorrection,
    scale: u32,
    quiet_zone: u32,
) -> Result<RenderedImage> {
    if scale == 0 || quiet_zone == 0 {
        return Err(PaymentError::Encoding(
            "scale and quiet zone must be positive".to_string(),
        ));
    }

    let code = QrCode::with_error_correction_level(payload.as_bytes(), level.into()).map_err(
        |e| {
            PaymentError::Encoding(format!(
                "{} bytes at {level:?} correction: {e}",
                payload.len()
            ))
        },
    )?;

    let modules = code.width() as u64;
    let side = (modules + 2 * u64::from(quiet_zone))
        .checked_mul(u64::from(scale))
        .filter(|side| {
            side.checked_mul(*side)
                .and_then(|area| area.checked_mul(4))
                .is_some_and(|bytes| bytes <= MAX_CANVAS_BYTES)
        })
        .ok_or_else(|| {
            PaymentError::Encoding(format!(
                "scale {scale} with quiet zone {quiet_zone} exceeds the {MAX_CANVAS_BYTES} byte canvas"
            ))
        })?;
    // Both fit in u32 once the canvas is within budget.
    let (modules, side) = (modules as u32, side as u32);
    let colors = code.to_colors();

    let pixels = RgbaImage::from_fn(side, side, |x, y| {
        let (mx, my) = (x / scale, y / scale);
        let inside = (quiet_zone..quiet_zone + modules).contains(&mx)
            && (quiet_zone..quiet_zone + modules).contains(&my);
        if !inside {
            return LIGHT;
        }
        let index = ((my - quiet_zone) * modules + (mx - quiet_zone)) as usize;
        match colors[index] {
            Color::Dark => DARK,
            Color::Light => LIGHT,
        }
    });

    Ok(RenderedImage::new(pixels))
}
