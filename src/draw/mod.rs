//! Rendering primitives: colors, item styles and drawing backends.
//!
//! The scene graph talks to pixels only through [`RenderContext`]:
//! - [`CairoContext`]: rasterizes into a Cairo image surface and exports PNG
//! - [`RecordingContext`]: logs every call as a [`DrawCommand`] for headless use
//!
//! Image resources are decoded off-thread by an [`ImageLoader`].

pub mod color;
pub mod context;
pub mod image;
pub mod recording;
pub mod render;
pub mod style;

// Re-export commonly used types at module level
pub use color::Color;
pub use context::{ImageData, RenderContext, RenderError};
pub use image::{FileImageLoader, ImageLoadError, ImageLoader};
pub use recording::{CommandLog, DrawCommand, RecordingContext};
pub use render::CairoContext;
pub use style::{BorderStyle, Style, StylePatch};

// Re-export color constants for public API
#[allow(unused_imports)]
pub use color::{BLACK, BLUE, GREEN, ORANGE, RED, TRANSPARENT, WHITE, YELLOW};
