//! Axis-aligned hit boxes.

use super::bus::EventBus;
use super::surface::Surface;
use crate::input::HoverState;

/// Axis-aligned rectangle used for hit testing and spatial queries.
///
/// Width, height and center are derived from the corners and refreshed on
/// every [`coords`](Self::coords) call. A box owned by an item also carries
/// the item's private event bus and its hover state; ad-hoc query boxes
/// simply leave both unused.
#[derive(Debug, Default)]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    width: f64,
    height: f64,
    center_x: f64,
    center_y: f64,
    pub(crate) bus: EventBus<Surface>,
    pub(crate) hover: HoverState,
}

impl BoundingBox {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        let mut bbox = Self::default();
        bbox.coords(x1, y1, Some((x2, y2)));
        bbox
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.center_x, self.center_y)
    }

    /// Moves the near corner to (`x1`, `y1`).
    ///
    /// With a far corner the box is resized to it; without one the current
    /// size is kept and the box is translated.
    pub fn coords(&mut self, x1: f64, y1: f64, far: Option<(f64, f64)>) {
        match far {
            Some((x2, y2)) => {
                self.x2 = x2;
                self.y2 = y2;
                self.width = x2 - x1;
                self.height = y2 - y1;
            }
            None => {
                self.x2 = x1 + self.width;
                self.y2 = y1 + self.height;
            }
        }
        self.x1 = x1;
        self.y1 = y1;
        self.center_x = self.x1 + self.width / 2.0;
        self.center_y = self.y1 + self.height / 2.0;
    }

    /// Size-preserving translation.
    pub fn move_by(&mut self, dx: f64, dy: f64) {
        self.coords(self.x1 + dx, self.y1 + dy, None);
    }

    /// True when the projections of both boxes overlap on both axes.
    ///
    /// Touching edges count. Symmetric.
    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        other.x2 >= self.x1 && other.x1 <= self.x2 && other.y2 >= self.y1 && other.y1 <= self.y2
    }

    /// True when `self` fully contains `other`; shared edges are allowed.
    pub fn contains(&self, other: &BoundingBox) -> bool {
        self.x1 <= other.x1 && self.x2 >= other.x2 && self.y1 <= other.y1 && self.y2 >= other.y2
    }

    /// Point-in-box test, inclusive on every edge.
    pub fn is_targeted_by(&self, x: f64, y: f64) -> bool {
        x >= self.x1 && x <= self.x2 && y >= self.y1 && y <= self.y2
    }

    /// Current enter/leave state.
    pub fn hover(&self) -> HoverState {
        self.hover
    }
}
