//! Scene documents: a surface description plus an item list, stored as TOML.
//!
//! # Example TOML
//! ```toml
//! [surface]
//! width = 200
//! height = 100
//! scroll_region = { right = 100 }
//! view = [0, 0]
//!
//! [[items]]
//! type = "rectangle"
//! x = 10
//! y = 10
//! width = 50
//! height = 30
//! tags = ["red"]
//! style = { backgroundColor = "red", borderWidth = 0 }
//! ```

use crate::draw::StylePatch;
use crate::scene::{
    DEFAULT_ARC_EXTENT, DEFAULT_ARC_START, ItemId, ScrollRegion, Surface, SurfaceOptions,
};
use anyhow::{Context, Result};
use log::{debug, info};
use schemars::{JsonSchema, Schema};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Root of a scene file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct SceneFile {
    #[serde(default)]
    pub surface: SurfaceSpec,

    /// Items in paint order
    #[serde(default)]
    pub items: Vec<ItemSpec>,
}

/// Surface size, scrolling and initial view.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct SurfaceSpec {
    /// Width in pixels; used together with `height`
    #[serde(default)]
    pub width: Option<f64>,

    /// Height in pixels; used together with `width`
    #[serde(default)]
    pub height: Option<f64>,

    #[serde(default)]
    pub scroll_region: ScrollRegion,

    /// Initial viewport origin `[x, y]`, clamped to the scroll region
    #[serde(default)]
    pub view: Option<[f64; 2]>,
}

/// One item: its shape plus the attributes every variant shares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ItemSpec {
    #[serde(flatten)]
    pub shape: ShapeSpec,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<StylePatch>,

    /// Cursor shown while hovering the item
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

/// Geometry of an item, selected by its `type` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ShapeSpec {
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
    /// Pie slice; a full disc by default
    Arc {
        x: f64,
        y: f64,
        r: f64,
        #[serde(default = "default_arc_start")]
        start: f64,
        #[serde(default = "default_arc_extent")]
        extent: f64,
        #[serde(default)]
        anticlockwise: bool,
    },
    /// PNG image; relative paths resolve against the scene file's directory
    Image {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        url: String,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
    },
}

fn default_arc_start() -> f64 {
    DEFAULT_ARC_START
}

fn default_arc_extent() -> f64 {
    DEFAULT_ARC_EXTENT
}

impl SceneFile {
    /// Reads and parses a scene file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene from {}", path.display()))?;
        let scene: SceneFile = toml::from_str(&text)
            .with_context(|| format!("Failed to parse scene from {}", path.display()))?;
        info!(
            "Loaded scene {} with {} item(s)",
            path.display(),
            scene.items.len()
        );
        Ok(scene)
    }

    /// JSON schema of the scene format.
    pub fn json_schema() -> Schema {
        schemars::schema_for!(SceneFile)
    }

    /// Options for the surface this scene is drawn on.
    pub fn surface_options(&self) -> SurfaceOptions {
        SurfaceOptions {
            width: self.surface.width,
            height: self.surface.height,
            scroll_region: Some(self.surface.scroll_region),
        }
    }

    /// Creates every item on `surface`, in file order, then applies the view.
    ///
    /// Returns the created items in the same order.
    pub fn build(&self, surface: &mut Surface) -> Vec<ItemId> {
        let ids: Vec<ItemId> = self.items.iter().map(|spec| spec.create(surface)).collect();
        if let Some([x, y]) = self.surface.view {
            surface.coords_view(x, y);
        }
        debug!("Built {} item(s)", ids.len());
        ids
    }
}

impl ItemSpec {
    fn create(&self, surface: &mut Surface) -> ItemId {
        let style = self.style.as_ref();
        let id = match &self.shape {
            ShapeSpec::Line { x1, y1, x2, y2 } => surface.create_line(*x1, *y1, *x2, *y2, style),
            ShapeSpec::Curve {
                x1,
                y1,
                x2,
                y2,
                cp1x,
                cp1y,
                cp2x,
                cp2y,
            } => surface.create_curve(*x1, *y1, *x2, *y2, *cp1x, *cp1y, *cp2x, *cp2y, style),
            ShapeSpec::Rectangle {
                x,
                y,
                width,
                height,
            } => surface.create_rectangle(*x, *y, *width, *height, style),
            ShapeSpec::Ellipse { x, y, rx, ry } => surface.create_ellipse(*x, *y, *rx, *ry, style),
            ShapeSpec::Arc {
                x,
                y,
                r,
                start,
                extent,
                anticlockwise,
            } => surface.create_arc(*x, *y, *r, *start, *extent, *anticlockwise, style),
            ShapeSpec::Image {
                x,
                y,
                width,
                height,
                url,
            } => surface.create_image(*x, *y, *width, *height, url, style),
            ShapeSpec::Text { x, y, text } => surface.create_text(text, *x, *y, style),
        };

        for tag in &self.tags {
            surface.add_tag(id, tag);
        }
        if let Some(cursor) = &self.cursor {
            surface.set_item_cursor(id, cursor);
        }
        id
    }
}
