//! The drawing-context contract the scene graph renders through.
//!
//! A [`RenderContext`] is an immediate-mode 2D context with a single current
//! path, in the manner of an HTML canvas. The scene graph never rasterizes by
//! itself; it only issues these calls.

use super::color::Color;
use std::path::Path;
use thiserror::Error;

/// Errors raised by a drawing backend.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to create drawing surface: {0}")]
    Surface(String),

    #[error("Failed to write image: {0}")]
    Io(#[from] std::io::Error),

    #[error("PNG export failed: {0}")]
    Export(String),

    #[error("This context cannot export images")]
    Unsupported,
}

/// A decoded raster image, ready to be drawn.
///
/// Pixels are 32-bit premultiplied ARGB in native byte order (Cairo's
/// `ARgb32` layout), `stride` bytes per row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pub width: i32,
    pub height: i32,
    pub stride: i32,
    pub data: Vec<u8>,
}

impl ImageData {
    /// Creates a fully transparent image.
    pub fn blank(width: i32, height: i32) -> Self {
        let stride = width.max(0) * 4;
        Self {
            width,
            height,
            stride,
            data: vec![0; (stride * height.max(0)) as usize],
        }
    }
}

/// Immediate-mode drawing operations used by items.
pub trait RenderContext {
    /// Pixel size of the drawable area.
    fn size(&self) -> (f64, f64);

    /// Resizes the drawable area, discarding its contents.
    fn resize(&mut self, width: f64, height: f64) -> Result<(), RenderError>;

    fn begin_path(&mut self);
    fn close_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn bezier_curve_to(&mut self, cp1x: f64, cp1y: f64, cp2x: f64, cp2y: f64, x: f64, y: f64);
    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    /// Adds an elliptical arc centred on (`x`, `y`).
    #[allow(clippy::too_many_arguments)]
    fn ellipse(
        &mut self,
        x: f64,
        y: f64,
        rx: f64,
        ry: f64,
        rotation: f64,
        start: f64,
        end: f64,
    );

    /// Adds a circular arc from angle `start` to angle `end`.
    fn arc(&mut self, x: f64, y: f64, r: f64, start: f64, end: f64, anticlockwise: bool);

    /// Fills the current path, keeping it.
    fn fill(&mut self);
    /// Strokes the current path, keeping it.
    fn stroke(&mut self);

    fn set_fill_color(&mut self, color: Color);
    fn set_stroke_color(&mut self, color: Color);
    fn set_line_width(&mut self, width: f64);
    /// Empty pattern means solid.
    fn set_line_dash(&mut self, pattern: &[f64]);
    fn set_shadow(&mut self, offset_x: f64, offset_y: f64, blur: f64, color: Color);

    fn set_font(&mut self, size: f64, family: &str);
    /// Rendered width of `text` in the current font.
    fn measure_text(&mut self, text: &str) -> f64;
    /// Fills `text` with its top edge at `y`.
    fn fill_text(&mut self, text: &str, x: f64, y: f64);
    /// Strokes `text` with its top edge at `y`.
    fn stroke_text(&mut self, text: &str, x: f64, y: f64);

    fn draw_image(&mut self, image: &ImageData, x: f64, y: f64, width: f64, height: f64);

    /// Erases a rectangle to transparent.
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    /// Encodes the current contents as PNG into `path`.
    fn write_png(&self, path: &Path) -> Result<(), RenderError>;
}
