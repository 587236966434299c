//! Scene items: geometry per shape variant, style, tags and hit box.

use super::bbox::BoundingBox;
use super::error::SceneError;
use crate::draw::{ImageData, RenderContext, Style};
use slotmap::new_key_type;
use std::f64::consts::TAU;
use std::fmt;

new_key_type! {
    /// Stable handle of an item on its surface.
    ///
    /// Stays valid across reordering; a deleted item's id never resolves again.
    pub struct ItemId;
}

/// Default start angle of an arc.
pub const DEFAULT_ARC_START: f64 = 0.0;
/// Default end angle of an arc (a full turn).
pub const DEFAULT_ARC_EXTENT: f64 = TAU;

/// Whether a mutation redraws the surface.
///
/// Everything except an explicit [`Reload::Suppress`] reloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Reload {
    #[default]
    Default,
    Suppress,
}

impl Reload {
    pub fn is_enabled(self) -> bool {
        self != Reload::Suppress
    }
}

impl From<bool> for Reload {
    fn from(reload: bool) -> Self {
        if reload {
            Reload::Default
        } else {
            Reload::Suppress
        }
    }
}

/// Variant tag of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemType {
    Line,
    Curve,
    Rectangle,
    Ellipse,
    Arc,
    Image,
    Text,
}

impl ItemType {
    pub fn name(self) -> &'static str {
        match self {
            ItemType::Line => "line",
            ItemType::Curve => "curve",
            ItemType::Rectangle => "rectangle",
            ItemType::Ellipse => "ellipse",
            ItemType::Arc => "arc",
            ItemType::Image => "image",
            ItemType::Text => "text",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// New coordinates for an item.
///
/// [`Coords::At`] fits every variant: it moves the anchor (first endpoint,
/// top-left corner or center) and keeps the size. The other forms redefine
/// the full geometry and must match the item's variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coords {
    At { x: f64, y: f64 },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    Curve {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        cp1x: f64,
        cp1y: f64,
        cp2x: f64,
        cp2y: f64,
    },
    /// Rectangles and images
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Ellipse { x: f64, y: f64, rx: f64, ry: f64 },
    /// Center and radius; angles are left alone
    Arc { x: f64, y: f64, r: f64 },
}

impl Coords {
    fn form(&self) -> &'static str {
        match self {
            Coords::At { .. } => "anchor",
            Coords::Line { .. } => "line",
            Coords::Curve { .. } => "curve",
            Coords::Rect { .. } => "rectangle",
            Coords::Ellipse { .. } => "ellipse",
            Coords::Arc { .. } => "arc",
        }
    }
}

/// Loading state of an image resource.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageStatus {
    /// Waiting for the loader
    Pending,
    Ready(ImageData),
    Failed(String),
}

/// Geometry of an item, one variant per shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    /// Cubic Bézier curve
    Curve {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        cp1x: f64,
        cp1y: f64,
        cp2x: f64,
        cp2y: f64,
    },
    Rectangle {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Ellipse {
        x: f64,
        y: f64,
        rx: f64,
        ry: f64,
    },
    /// Pie slice from `start` to `extent` (an end angle, in radians)
    Arc {
        x: f64,
        y: f64,
        r: f64,
        start: f64,
        extent: f64,
        anticlockwise: bool,
    },
    Image {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        url: String,
        /// Bumped by every new load so that stale results can be discarded
        generation: u64,
        status: ImageStatus,
    },
    /// Text with its top-left corner at (`x`, `y`)
    Text {
        x: f64,
        y: f64,
        text: String,
    },
}

impl Shape {
    pub fn item_type(&self) -> ItemType {
        match self {
            Shape::Line { .. } => ItemType::Line,
            Shape::Curve { .. } => ItemType::Curve,
            Shape::Rectangle { .. } => ItemType::Rectangle,
            Shape::Ellipse { .. } => ItemType::Ellipse,
            Shape::Arc { .. } => ItemType::Arc,
            Shape::Image { .. } => ItemType::Image,
            Shape::Text { .. } => ItemType::Text,
        }
    }

    /// Corners of the hit box, for the variants that have one.
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        match *self {
            Shape::Rectangle {
                x,
                y,
                width,
                height,
            }
            | Shape::Image {
                x,
                y,
                width,
                height,
                ..
            } => Some((x, y, x + width, y + height)),
            Shape::Ellipse { x, y, rx, ry } => Some((x - rx, y - ry, x + rx, y + ry)),
            Shape::Arc { x, y, r, .. } => Some((x - r, y - r, x + r, y + r)),
            Shape::Line { .. } | Shape::Curve { .. } | Shape::Text { .. } => None,
        }
    }

    /// The point [`Coords::At`] moves.
    pub fn anchor(&self) -> (f64, f64) {
        match *self {
            Shape::Line { x1, y1, .. } | Shape::Curve { x1, y1, .. } => (x1, y1),
            Shape::Rectangle { x, y, .. }
            | Shape::Ellipse { x, y, .. }
            | Shape::Arc { x, y, .. }
            | Shape::Image { x, y, .. }
            | Shape::Text { x, y, .. } => (x, y),
        }
    }

    /// Applies new coordinates, failing when their form does not fit.
    pub fn set_coords(&mut self, coords: Coords) -> Result<(), SceneError> {
        match (self, coords) {
            (shape, Coords::At { x, y }) => {
                let (ax, ay) = shape.anchor();
                shape.translate(x - ax, y - ay);
            }
            (
                Shape::Line { x1, y1, x2, y2 },
                Coords::Line {
                    x1: a,
                    y1: b,
                    x2: c,
                    y2: d,
                },
            ) => {
                (*x1, *y1, *x2, *y2) = (a, b, c, d);
            }
            (
                Shape::Curve {
                    x1,
                    y1,
                    x2,
                    y2,
                    cp1x,
                    cp1y,
                    cp2x,
                    cp2y,
                },
                Coords::Curve {
                    x1: a,
                    y1: b,
                    x2: c,
                    y2: d,
                    cp1x: e,
                    cp1y: f,
                    cp2x: g,
                    cp2y: h,
                },
            ) => {
                (*x1, *y1, *x2, *y2) = (a, b, c, d);
                (*cp1x, *cp1y, *cp2x, *cp2y) = (e, f, g, h);
            }
            (
                Shape::Rectangle {
                    x,
                    y,
                    width,
                    height,
                }
                | Shape::Image {
                    x,
                    y,
                    width,
                    height,
                    ..
                },
                Coords::Rect {
                    x: nx,
                    y: ny,
                    width: w,
                    height: h,
                },
            ) => {
                (*x, *y, *width, *height) = (nx, ny, w, h);
            }
            (
                Shape::Ellipse { x, y, rx, ry },
                Coords::Ellipse {
                    x: nx,
                    y: ny,
                    rx: a,
                    ry: b,
                },
            ) => {
                (*x, *y, *rx, *ry) = (nx, ny, a, b);
            }
            (
                Shape::Arc { x, y, r, .. },
                Coords::Arc {
                    x: nx,
                    y: ny,
                    r: nr,
                },
            ) => {
                (*x, *y, *r) = (nx, ny, nr);
            }
            (shape, coords) => {
                return Err(SceneError::CoordsMismatch {
                    item: shape.item_type(),
                    given: coords.form(),
                });
            }
        }
        Ok(())
    }

    /// Translates every point of the shape; sizes are untouched.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        match self {
            Shape::Line { x1, y1, x2, y2 } => {
                *x1 += dx;
                *y1 += dy;
                *x2 += dx;
                *y2 += dy;
            }
            Shape::Curve {
                x1,
                y1,
                x2,
                y2,
                cp1x,
                cp1y,
                cp2x,
                cp2y,
            } => {
                for (px, py) in [(x1, y1), (x2, y2), (cp1x, cp1y), (cp2x, cp2y)] {
                    *px += dx;
                    *py += dy;
                }
            }
            Shape::Rectangle { x, y, .. }
            | Shape::Ellipse { x, y, .. }
            | Shape::Arc { x, y, .. }
            | Shape::Image { x, y, .. }
            | Shape::Text { x, y, .. } => {
                *x += dx;
                *y += dy;
            }
        }
    }

    /// Issues the drawing calls for this shape, offset by `origin`.
    pub fn draw(&self, ctx: &mut dyn RenderContext, style: &Style, origin: (f64, f64)) {
        let (ox, oy) = origin;
        match self {
            Shape::Line { x1, y1, x2, y2 } => {
                ctx.begin_path();
                ctx.move_to(ox + x1, oy + y1);
                ctx.line_to(ox + x2, oy + y2);
                style.paint(ctx);
            }
            Shape::Curve {
                x1,
                y1,
                x2,
                y2,
                cp1x,
                cp1y,
                cp2x,
                cp2y,
            } => {
                ctx.begin_path();
                ctx.move_to(ox + x1, oy + y1);
                ctx.bezier_curve_to(
                    ox + cp1x,
                    oy + cp1y,
                    ox + cp2x,
                    oy + cp2y,
                    ox + x2,
                    oy + y2,
                );
                style.paint(ctx);
            }
            Shape::Rectangle {
                x,
                y,
                width,
                height,
            } => {
                ctx.begin_path();
                ctx.rect(ox + x, oy + y, *width, *height);
                style.paint(ctx);
            }
            Shape::Ellipse { x, y, rx, ry } => {
                ctx.begin_path();
                ctx.ellipse(ox + x, oy + y, *rx, *ry, 0.0, 0.0, TAU);
                style.paint(ctx);
            }
            Shape::Arc {
                x,
                y,
                r,
                start,
                extent,
                anticlockwise,
            } => {
                let (cx, cy) = (ox + x, oy + y);
                ctx.begin_path();
                ctx.move_to(cx, cy);
                ctx.arc(cx, cy, *r, *start, *extent, *anticlockwise);
                ctx.line_to(cx, cy);
                ctx.close_path();
                style.paint(ctx);
            }
            Shape::Image {
                x,
                y,
                width,
                height,
                status,
                ..
            } => {
                // Nothing shows until the resource is decoded.
                let ImageStatus::Ready(image) = status else {
                    return;
                };
                ctx.begin_path();
                ctx.rect(ox + x, oy + y, *width, *height);
                style.apply(ctx);
                style.fill_background(ctx);
                ctx.draw_image(image, ox + x, oy + y, *width, *height);
                style.stroke_border(ctx);
            }
            Shape::Text { x, y, text } => {
                let (tx, ty) = (ox + x, oy + y);
                style.apply(ctx);
                ctx.set_font(style.font_size, &style.font_family);
                let width = ctx.measure_text(text);

                ctx.begin_path();
                ctx.rect(tx, ty, width, style.font_size);
                style.fill_background(ctx);
                style.stroke_border(ctx);

                if style.text_stroke_width > 0.0 {
                    ctx.set_line_width(style.text_stroke_width);
                    ctx.set_stroke_color(style.text_stroke());
                    ctx.set_line_dash(&[]);
                    ctx.stroke_text(text, tx, ty);
                }
                ctx.set_fill_color(style.text_fill());
                ctx.fill_text(text, tx, ty);
            }
        }
    }
}

/// A drawable object owned by a surface.
#[derive(Debug)]
pub struct Item {
    pub(crate) shape: Shape,
    pub(crate) style: Style,
    pub(crate) tags: Vec<String>,
    pub(crate) bbox: Option<BoundingBox>,
}

impl Item {
    pub(crate) fn new(shape: Shape, style: Style) -> Self {
        let bbox = shape
            .bounds()
            .map(|(x1, y1, x2, y2)| BoundingBox::new(x1, y1, x2, y2));
        Self {
            shape,
            style,
            tags: Vec::new(),
            bbox,
        }
    }

    pub fn item_type(&self) -> ItemType {
        self.shape.item_type()
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    /// Tags in insertion order.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn bbox(&self) -> Option<&BoundingBox> {
        self.bbox.as_ref()
    }

    /// Applies new coordinates and keeps the hit box in step.
    pub(crate) fn set_coords(&mut self, coords: Coords) -> Result<(), SceneError> {
        self.shape.set_coords(coords)?;
        self.sync_bbox();
        Ok(())
    }

    pub(crate) fn translate(&mut self, dx: f64, dy: f64) {
        self.shape.translate(dx, dy);
        if let Some(bbox) = self.bbox.as_mut() {
            bbox.move_by(dx, dy);
        }
    }

    fn sync_bbox(&mut self) {
        if let (Some(bbox), Some((x1, y1, x2, y2))) = (self.bbox.as_mut(), self.shape.bounds()) {
            bbox.coords(x1, y1, Some((x2, y2)));
        }
    }

    pub(crate) fn draw(&self, ctx: &mut dyn RenderContext, origin: (f64, f64)) {
        self.shape.draw(ctx, &self.style, origin);
    }
}
