use super::item::{ItemId, ItemType};
use crate::draw::RenderError;
use thiserror::Error;

/// Errors raised by scene operations.
///
/// Selector misses are not errors: an unknown tag resolves to nothing and
/// the operation becomes a no-op.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("Unknown event name '{0}'")]
    UnknownEvent(String),

    #[error("{given} coordinates do not fit a {item} item")]
    CoordsMismatch {
        item: ItemType,
        given: &'static str,
    },

    #[error("Item {0:?} does not exist")]
    UnknownItem(ItemId),

    #[error("Operation needs a {expected} item, found {found}")]
    WrongItemType {
        expected: ItemType,
        found: ItemType,
    },

    #[error(transparent)]
    Render(#[from] RenderError),
}
