//! Pointer input and gesture state machines.
//!
//! This module models what a host feeds into a surface: raw pointer events
//! with their modifier keys, and the small state machines that turn a stream
//! of them into grab/drop and enter/leave gestures.

pub mod events;
pub mod gesture;
pub mod modifiers;

// Re-export commonly used types at module level
pub use events::{PointerEvent, PointerKind};
pub use gesture::{Gesture, GestureState, HoverChange, HoverState};
pub use modifiers::Modifiers;
