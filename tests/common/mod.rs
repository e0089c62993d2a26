#![allow(dead_code)]

use image::{ImageFormat, Rgba, RgbaImage};
use std::io::{Cursor, Error};
use std::path::Path;

pub const STATIC_QRIS: &str = "00020101021126660014ID.CO.QRIS.WWW01189360091800000000010215ID10200000000010303UMI5204549953033605802ID5914TOKO MAJU JAYA6007JAKARTA6105123456304E891";

pub fn mark_png(width: u32, height: u32) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    RgbaImage::from_pixel(width, height, Rgba([0, 90, 200, 255]))
        .write_to(&mut out, ImageFormat::Png)
        .expect("Failed to encode mark");
    out.into_inner()
}

pub fn write_mark(path: &Path) -> Result<(), Error> {
    std::fs::write(path, mark_png(120, 60))
}
