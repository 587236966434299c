//! Cairo-based implementation of [`RenderContext`].
//!
//! Draws into an in-memory ARGB32 image surface. Text goes through Pango so
//! that font families resolve the same way as in other GTK software.

use super::color::{self, Color};
use super::context::{ImageData, RenderContext, RenderError};
use std::fs::File;
use std::path::Path;

#[derive(Debug, Clone, Copy)]
struct Shadow {
    offset_x: f64,
    offset_y: f64,
    blur: f64,
    color: Color,
}

impl Shadow {
    fn visible(&self) -> bool {
        !self.color.is_transparent()
            && (self.offset_x != 0.0 || self.offset_y != 0.0 || self.blur > 0.0)
    }
}

/// Drawing context backed by a Cairo image surface.
///
/// Shadows are painted as an offset copy of the shape in the shadow color;
/// blur is not simulated.
pub struct CairoContext {
    surface: cairo::ImageSurface,
    ctx: cairo::Context,
    fill: Color,
    stroke: Color,
    shadow: Shadow,
    font: pango::FontDescription,
}

impl CairoContext {
    /// Creates a transparent `width` x `height` drawing surface.
    pub fn new(width: i32, height: i32) -> Result<Self, RenderError> {
        let (surface, ctx) = create_surface(width, height)?;
        let mut font = pango::FontDescription::new();
        font.set_family("Arial");
        font.set_absolute_size(12.0 * pango::SCALE as f64);

        Ok(Self {
            surface,
            ctx,
            fill: color::BLACK,
            stroke: color::BLACK,
            shadow: Shadow {
                offset_x: 0.0,
                offset_y: 0.0,
                blur: 0.0,
                color: color::TRANSPARENT,
            },
            font,
        })
    }

    fn set_source(&self, color: Color) {
        self.ctx.set_source_rgba(color.r, color.g, color.b, color.a);
    }

    /// Runs `op` on an empty path and puts the caller's path back afterwards.
    ///
    /// Canvas semantics keep the current path across text, image and clear
    /// operations while Cairo would consume or extend it.
    fn with_detached_path(&self, op: impl FnOnce(&cairo::Context)) {
        let saved = self.ctx.copy_path().ok();
        self.ctx.new_path();
        op(&self.ctx);
        self.ctx.new_path();
        if let Some(path) = saved {
            self.ctx.append_path(&path);
        }
    }

    /// Paints the shadow of the current path with `op`.
    fn paint_shadow(&self, op: impl FnOnce(&cairo::Context)) {
        if !self.shadow.visible() {
            return;
        }
        let Ok(path) = self.ctx.copy_path() else {
            return;
        };
        let shadow = self.shadow;
        self.with_detached_path(|ctx| {
            let _ = ctx.save();
            ctx.translate(shadow.offset_x, shadow.offset_y);
            ctx.append_path(&path);
            ctx.set_source_rgba(
                shadow.color.r,
                shadow.color.g,
                shadow.color.b,
                shadow.color.a,
            );
            op(ctx);
            let _ = ctx.restore();
        });
    }

    fn layout(&self, text: &str) -> pango::Layout {
        let layout = pangocairo::functions::create_layout(&self.ctx);
        layout.set_font_description(Some(&self.font));
        layout.set_text(text);
        layout
    }
}

fn create_surface(
    width: i32,
    height: i32,
) -> Result<(cairo::ImageSurface, cairo::Context), RenderError> {
    let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, width.max(1), height.max(1))
        .map_err(|e| RenderError::Surface(e.to_string()))?;
    let ctx = cairo::Context::new(&surface)
        .map_err(|e| RenderError::Surface(e.to_string()))?;
    ctx.set_line_join(cairo::LineJoin::Miter);
    Ok((surface, ctx))
}

impl RenderContext for CairoContext {
    fn size(&self) -> (f64, f64) {
        (self.surface.width() as f64, self.surface.height() as f64)
    }

    fn resize(&mut self, width: f64, height: f64) -> Result<(), RenderError> {
        let (surface, ctx) = create_surface(width.round() as i32, height.round() as i32)?;
        self.surface = surface;
        self.ctx = ctx;
        Ok(())
    }

    fn begin_path(&mut self) {
        self.ctx.new_path();
    }

    fn close_path(&mut self) {
        self.ctx.close_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ctx.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ctx.line_to(x, y);
    }

    fn bezier_curve_to(&mut self, cp1x: f64, cp1y: f64, cp2x: f64, cp2y: f64, x: f64, y: f64) {
        self.ctx.curve_to(cp1x, cp1y, cp2x, cp2y, x, y);
    }

    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ctx.rectangle(x, y, width, height);
    }

    fn ellipse(&mut self, x: f64, y: f64, rx: f64, ry: f64, rotation: f64, start: f64, end: f64) {
        // A zero radius would make the scaled matrix singular.
        if rx <= 0.0 || ry <= 0.0 {
            return;
        }
        let _ = self.ctx.save();
        self.ctx.translate(x, y);
        self.ctx.rotate(rotation);
        self.ctx.scale(rx, ry);
        self.ctx.arc(0.0, 0.0, 1.0, start, end);
        let _ = self.ctx.restore();
    }

    fn arc(&mut self, x: f64, y: f64, r: f64, start: f64, end: f64, anticlockwise: bool) {
        if anticlockwise {
            self.ctx.arc_negative(x, y, r, start, end);
        } else {
            self.ctx.arc(x, y, r, start, end);
        }
    }

    fn fill(&mut self) {
        self.paint_shadow(|ctx| {
            let _ = ctx.fill();
        });
        self.set_source(self.fill);
        let _ = self.ctx.fill_preserve();
    }

    fn stroke(&mut self) {
        self.paint_shadow(|ctx| {
            let _ = ctx.stroke();
        });
        self.set_source(self.stroke);
        let _ = self.ctx.stroke_preserve();
    }

    fn set_fill_color(&mut self, color: Color) {
        self.fill = color;
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.stroke = color;
    }

    fn set_line_width(&mut self, width: f64) {
        self.ctx.set_line_width(width);
    }

    fn set_line_dash(&mut self, pattern: &[f64]) {
        self.ctx.set_dash(pattern, 0.0);
    }

    fn set_shadow(&mut self, offset_x: f64, offset_y: f64, blur: f64, color: Color) {
        self.shadow = Shadow {
            offset_x,
            offset_y,
            blur,
            color,
        };
    }

    fn set_font(&mut self, size: f64, family: &str) {
        let mut font = pango::FontDescription::new();
        font.set_family(family);
        font.set_absolute_size(size.max(1.0) * pango::SCALE as f64);
        self.font = font;
    }

    fn measure_text(&mut self, text: &str) -> f64 {
        let (width, _height) = self.layout(text).pixel_size();
        width as f64
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        let layout = self.layout(text);
        let fill = self.fill;
        self.with_detached_path(|ctx| {
            ctx.move_to(x, y);
            ctx.set_source_rgba(fill.r, fill.g, fill.b, fill.a);
            pangocairo::functions::show_layout(ctx, &layout);
        });
    }

    fn stroke_text(&mut self, text: &str, x: f64, y: f64) {
        let layout = self.layout(text);
        let stroke = self.stroke;
        self.with_detached_path(|ctx| {
            ctx.move_to(x, y);
            pangocairo::functions::layout_path(ctx, &layout);
            ctx.set_source_rgba(stroke.r, stroke.g, stroke.b, stroke.a);
            let _ = ctx.stroke();
        });
    }

    fn draw_image(&mut self, image: &ImageData, x: f64, y: f64, width: f64, height: f64) {
        if image.width <= 0 || image.height <= 0 || width <= 0.0 || height <= 0.0 {
            return;
        }
        let source = match cairo::ImageSurface::create_for_data(
            image.data.clone(),
            cairo::Format::ARgb32,
            image.width,
            image.height,
            image.stride,
        ) {
            Ok(source) => source,
            Err(err) => {
                log::warn!("Cannot wrap image data for drawing: {err}");
                return;
            }
        };
        let scale_x = width / image.width as f64;
        let scale_y = height / image.height as f64;
        self.with_detached_path(|ctx| {
            let _ = ctx.save();
            ctx.translate(x, y);
            ctx.scale(scale_x, scale_y);
            if ctx.set_source_surface(&source, 0.0, 0.0).is_ok() {
                let _ = ctx.paint();
            }
            let _ = ctx.restore();
        });
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.with_detached_path(|ctx| {
            let _ = ctx.save();
            ctx.set_operator(cairo::Operator::Clear);
            ctx.rectangle(x, y, width, height);
            let _ = ctx.fill();
            let _ = ctx.restore();
        });
    }

    fn write_png(&self, path: &Path) -> Result<(), RenderError> {
        self.surface.flush();
        let mut file = File::create(path)?;
        self.surface
            .write_to_png(&mut file)
            .map_err(|e| RenderError::Export(e.to_string()))
    }
}
