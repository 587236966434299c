//! Retained-mode scene graph over a [`RenderContext`](crate::draw::RenderContext).
//!
//! A [`Surface`] owns its items in paint order, redraws them on every visible
//! change and turns raw pointer input into per-item events. Items are
//! addressed by [`ItemId`] or, in bulk, by a [`Selector`].

mod bbox;
mod bus;
mod dispatch;
mod error;
mod events;
mod handle;
mod item;
mod query;
mod selector;
mod surface;

#[cfg(test)]
mod tests;

// Re-export commonly used types at module level
pub use bbox::BoundingBox;
pub use bus::{EventBus, Listener, dispatch, listener};
pub use error::SceneError;
pub use events::{EventKind, ItemEvent, WheelDelta};
pub use handle::ItemHandle;
pub use item::{
    Coords, DEFAULT_ARC_EXTENT, DEFAULT_ARC_START, ImageStatus, Item, ItemId, ItemType, Reload,
    Shape,
};
pub use selector::{Selector, WILDCARD};
pub use surface::{
    CURSORS, DEFAULT_CURSOR, DEFAULT_SAVE_NAME, ScrollRegion, Surface, SurfaceListener,
    SurfaceOptions, Viewport,
};
