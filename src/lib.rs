//! Retained-mode 2D scene graph over a raster drawing context.
//!
//! Items (lines, curves, rectangles, ellipses, arcs, images and text) live on
//! a [`Surface`] that redraws them in paint order, answers spatial queries
//! and turns raw pointer input into per-item events, including synthesized
//! enter/leave and grab/drop gestures.

pub mod config;
pub mod draw;
pub mod input;
pub mod scene;

pub use config::{Config, SceneFile};
pub use draw::{CairoContext, RecordingContext, RenderContext, Style, StylePatch};
pub use input::{Modifiers, PointerEvent, PointerKind};
pub use scene::{
    EventKind, ItemEvent, ItemHandle, ItemId, Reload, SceneError, Selector, Surface, SurfaceOptions,
};
