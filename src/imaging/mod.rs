//! Raster side of the pipeline: matrix-code rendering and brand-mark
//! compositing. Pure pixel work, no I/O.

pub mod compositor;
pub mod renderer;

pub use compositor::overlay;
pub use renderer::{RenderedImage, render};
