//! A [`RenderContext`] that records draw calls instead of rasterizing.
//!
//! Useful for headless hosts and for asserting on the redraw protocol: a
//! reload shows up as one [`DrawCommand::ClearRect`] followed by the draw
//! calls of every item in paint order.

use super::color::Color;
use super::context::{ImageData, RenderContext, RenderError};
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    BeginPath,
    ClosePath,
    MoveTo(f64, f64),
    LineTo(f64, f64),
    BezierCurveTo([f64; 6]),
    Rect(f64, f64, f64, f64),
    Ellipse { x: f64, y: f64, rx: f64, ry: f64 },
    Arc {
        x: f64,
        y: f64,
        r: f64,
        start: f64,
        end: f64,
        anticlockwise: bool,
    },
    Fill(Color),
    Stroke {
        color: Color,
        width: f64,
        dash: Vec<f64>,
    },
    Shadow {
        offset_x: f64,
        offset_y: f64,
        blur: f64,
        color: Color,
    },
    Font(f64, String),
    FillText(String, f64, f64),
    StrokeText(String, f64, f64),
    DrawImage {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    ClearRect(f64, f64, f64, f64),
}

/// Shared, inspectable log of recorded commands.
pub type CommandLog = Rc<RefCell<Vec<DrawCommand>>>;

/// Headless drawing context.
///
/// Text width is approximated as `0.6 * font_size` per character.
#[derive(Debug)]
pub struct RecordingContext {
    width: f64,
    height: f64,
    fill: Color,
    stroke: Color,
    line_width: f64,
    dash: Vec<f64>,
    font_size: f64,
    log: CommandLog,
}

impl RecordingContext {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            fill: super::color::BLACK,
            stroke: super::color::BLACK,
            line_width: 1.0,
            dash: Vec::new(),
            font_size: 12.0,
            log: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Handle to the command log; stays valid after the context is boxed.
    pub fn log(&self) -> CommandLog {
        Rc::clone(&self.log)
    }

    fn push(&self, command: DrawCommand) {
        self.log.borrow_mut().push(command);
    }
}

impl RenderContext for RecordingContext {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: f64, height: f64) -> Result<(), RenderError> {
        self.width = width;
        self.height = height;
        Ok(())
    }

    fn begin_path(&mut self) {
        self.push(DrawCommand::BeginPath);
    }

    fn close_path(&mut self) {
        self.push(DrawCommand::ClosePath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.push(DrawCommand::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.push(DrawCommand::LineTo(x, y));
    }

    fn bezier_curve_to(&mut self, cp1x: f64, cp1y: f64, cp2x: f64, cp2y: f64, x: f64, y: f64) {
        self.push(DrawCommand::BezierCurveTo([cp1x, cp1y, cp2x, cp2y, x, y]));
    }

    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.push(DrawCommand::Rect(x, y, width, height));
    }

    fn ellipse(
        &mut self,
        x: f64,
        y: f64,
        rx: f64,
        ry: f64,
        _rotation: f64,
        _start: f64,
        _end: f64,
    ) {
        self.push(DrawCommand::Ellipse { x, y, rx, ry });
    }

    fn arc(&mut self, x: f64, y: f64, r: f64, start: f64, end: f64, anticlockwise: bool) {
        self.push(DrawCommand::Arc {
            x,
            y,
            r,
            start,
            end,
            anticlockwise,
        });
    }

    fn fill(&mut self) {
        self.push(DrawCommand::Fill(self.fill));
    }

    fn stroke(&mut self) {
        self.push(DrawCommand::Stroke {
            color: self.stroke,
            width: self.line_width,
            dash: self.dash.clone(),
        });
    }

    fn set_fill_color(&mut self, color: Color) {
        self.fill = color;
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.stroke = color;
    }

    fn set_line_width(&mut self, width: f64) {
        self.line_width = width;
    }

    fn set_line_dash(&mut self, pattern: &[f64]) {
        self.dash = pattern.to_vec();
    }

    fn set_shadow(&mut self, offset_x: f64, offset_y: f64, blur: f64, color: Color) {
        if offset_x != 0.0 || offset_y != 0.0 || blur != 0.0 {
            self.push(DrawCommand::Shadow {
                offset_x,
                offset_y,
                blur,
                color,
            });
        }
    }

    fn set_font(&mut self, size: f64, family: &str) {
        self.font_size = size;
        self.push(DrawCommand::Font(size, family.to_string()));
    }

    fn measure_text(&mut self, text: &str) -> f64 {
        text.chars().count() as f64 * self.font_size * 0.6
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        self.push(DrawCommand::FillText(text.to_string(), x, y));
    }

    fn stroke_text(&mut self, text: &str, x: f64, y: f64) {
        self.push(DrawCommand::StrokeText(text.to_string(), x, y));
    }

    fn draw_image(&mut self, _image: &ImageData, x: f64, y: f64, width: f64, height: f64) {
        self.push(DrawCommand::DrawImage {
            x,
            y,
            width,
            height,
        });
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.push(DrawCommand::ClearRect(x, y, width, height));
    }

    fn write_png(&self, _path: &Path) -> Result<(), RenderError> {
        Err(RenderError::Unsupported)
    }
}
