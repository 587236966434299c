//! Item style: resolved values, sparse patches and application to a context.

use super::color::{self, Color};
use super::context::RenderContext;
use log::warn;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Border line style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    /// Continuous line
    #[default]
    Solid,
    /// Dash length equal to the border width
    Dashed,
}

/// Fully resolved style of an item.
///
/// Colors are kept as the CSS strings the caller supplied; they are parsed
/// when the style is applied to a drawing context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub background_color: String,
    pub border_width: f64,
    pub border_style: BorderStyle,
    pub border_color: String,
    pub color: String,
    pub font_size: f64,
    pub font_family: String,
    pub text_stroke_width: f64,
    pub text_stroke_color: String,
    pub shadow_offset_x: f64,
    pub shadow_offset_y: f64,
    pub shadow_blur: f64,
    pub shadow_color: String,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            background_color: "transparent".to_string(),
            border_width: 1.0,
            border_style: BorderStyle::Solid,
            border_color: "black".to_string(),
            color: "black".to_string(),
            font_size: 12.0,
            font_family: "Arial".to_string(),
            text_stroke_width: 0.0,
            text_stroke_color: "black".to_string(),
            shadow_offset_x: 0.0,
            shadow_offset_y: 0.0,
            shadow_blur: 0.0,
            shadow_color: "black".to_string(),
        }
    }
}

/// Sparse style update. Only present fields are applied.
///
/// Field names follow the camelCase keys used in scene files, e.g.
/// `borderColor = "green"`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StylePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_style: Option<BorderStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_stroke_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_stroke_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow_offset_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow_offset_y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow_blur: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow_color: Option<String>,
}

impl StylePatch {
    /// Shorthand for a patch that only sets the border color.
    pub fn border_color(color: impl Into<String>) -> Self {
        Self {
            border_color: Some(color.into()),
            ..Self::default()
        }
    }

    /// Shorthand for a patch that only sets the background color.
    pub fn background_color(color: impl Into<String>) -> Self {
        Self {
            background_color: Some(color.into()),
            ..Self::default()
        }
    }
}

impl Style {
    /// Resolves a style from an optional patch over the defaults.
    pub fn from_patch(patch: Option<&StylePatch>) -> Self {
        match patch {
            Some(patch) => Self::default().merged(patch),
            None => Self::default(),
        }
    }

    /// Returns `self` overlaid with the fields present in `patch`.
    ///
    /// `self` is always fully resolved, so this is the
    /// defaults ← previous ← patch merge.
    pub fn merged(&self, patch: &StylePatch) -> Self {
        fn pick<T: Clone>(new: &Option<T>, old: &T) -> T {
            new.clone().unwrap_or_else(|| old.clone())
        }

        Self {
            background_color: pick(&patch.background_color, &self.background_color),
            border_width: pick(&patch.border_width, &self.border_width),
            border_style: pick(&patch.border_style, &self.border_style),
            border_color: pick(&patch.border_color, &self.border_color),
            color: pick(&patch.color, &self.color),
            font_size: pick(&patch.font_size, &self.font_size),
            font_family: pick(&patch.font_family, &self.font_family),
            text_stroke_width: pick(&patch.text_stroke_width, &self.text_stroke_width),
            text_stroke_color: pick(&patch.text_stroke_color, &self.text_stroke_color),
            shadow_offset_x: pick(&patch.shadow_offset_x, &self.shadow_offset_x),
            shadow_offset_y: pick(&patch.shadow_offset_y, &self.shadow_offset_y),
            shadow_blur: pick(&patch.shadow_blur, &self.shadow_blur),
            shadow_color: pick(&patch.shadow_color, &self.shadow_color),
        }
    }

    /// Background fill color; transparent when unparseable.
    pub fn background(&self) -> Color {
        resolve_color(&self.background_color, color::TRANSPARENT)
    }

    /// Border stroke color; black when unparseable.
    pub fn border(&self) -> Color {
        resolve_color(&self.border_color, color::BLACK)
    }

    /// Text fill color; black when unparseable.
    pub fn text_fill(&self) -> Color {
        resolve_color(&self.color, color::BLACK)
    }

    /// Text outline color; black when unparseable.
    pub fn text_stroke(&self) -> Color {
        resolve_color(&self.text_stroke_color, color::BLACK)
    }

    /// Shadow color; black when unparseable.
    pub fn shadow(&self) -> Color {
        resolve_color(&self.shadow_color, color::BLACK)
    }

    /// Dash pattern for the border. Empty means a solid line.
    pub fn dash_pattern(&self) -> Vec<f64> {
        match self.border_style {
            BorderStyle::Dashed if self.border_width > 0.0 => vec![self.border_width],
            _ => Vec::new(),
        }
    }

    /// Loads this style's shadow, stroke and fill state into the context.
    ///
    /// Does not paint anything; see [`Style::paint`].
    pub fn apply(&self, ctx: &mut dyn RenderContext) {
        ctx.set_shadow(
            self.shadow_offset_x,
            self.shadow_offset_y,
            self.shadow_blur,
            self.shadow(),
        );
        ctx.set_fill_color(self.background());
        ctx.set_stroke_color(self.border());
        ctx.set_line_width(self.border_width.max(0.0));
        ctx.set_line_dash(&self.dash_pattern());
    }

    /// Applies the style, then fills and strokes the context's current path.
    ///
    /// The fill is skipped for a transparent background and the stroke for a
    /// zero border width.
    pub fn paint(&self, ctx: &mut dyn RenderContext) {
        self.apply(ctx);
        self.fill_background(ctx);
        self.stroke_border(ctx);
    }

    /// Fills the current path with the background color unless it is transparent.
    pub fn fill_background(&self, ctx: &mut dyn RenderContext) {
        if !self.background().is_transparent() {
            ctx.fill();
        }
    }

    /// Strokes the current path with the border when its width is positive.
    pub fn stroke_border(&self, ctx: &mut dyn RenderContext) {
        if self.border_width > 0.0 {
            ctx.stroke();
        }
    }
}

fn resolve_color(spec: &str, fallback: Color) -> Color {
    Color::parse(spec).unwrap_or_else(|err| {
        warn!("{err}, using fallback");
        fallback
    })
}
