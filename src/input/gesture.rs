//! Gesture state machines derived from raw pointer events.
//!
//! Two small machines live here:
//! - [`GestureState`]: surface-wide grab/drop tracking while a button is held
//! - [`HoverState`]: per-hit-box enter/leave tracking
//!
//! Both are pure: they consume raw kinds and report the gesture to emit,
//! leaving dispatch to the caller.

use super::events::PointerKind;

/// Gesture derived from a pressed pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    /// Pointer moved while a button is held
    Grab,
    /// Button released or pointer left while a button was held
    Drop,
}

/// Grab/drop state machine.
///
/// ```text
/// Idle    --mousedown-------------> Pressed
/// Pressed --mousemove-------------> Pressed  (emit grab)
/// Pressed --mouseup / mouseleave--> Idle     (emit drop)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureState {
    /// No button held
    #[default]
    Idle,
    /// A button went down and has not been released yet
    Pressed,
}

impl GestureState {
    /// Feeds one raw event and returns the gesture it derives, if any.
    pub fn advance(&mut self, kind: PointerKind) -> Option<Gesture> {
        match (*self, kind) {
            (GestureState::Idle, PointerKind::MouseDown) => {
                *self = GestureState::Pressed;
                None
            }
            (GestureState::Pressed, PointerKind::MouseMove) => Some(Gesture::Grab),
            (GestureState::Pressed, PointerKind::MouseUp | PointerKind::MouseLeave) => {
                *self = GestureState::Idle;
                Some(Gesture::Drop)
            }
            _ => None,
        }
    }

    pub fn is_pressed(&self) -> bool {
        matches!(self, GestureState::Pressed)
    }
}

/// Change of hover state reported by [`HoverState::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverChange {
    Enter,
    Leave,
}

/// Enter/leave state machine of one hit box.
///
/// ```text
/// Outside --mousemove targeting the box--------------> Inside   (emit enter)
/// Inside  --mousemove missing the box, or mouseleave--> Outside (emit leave)
/// ```
///
/// Every other input leaves the state alone and emits nothing, so hovering
/// over a box produces exactly one enter no matter how often the pointer moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoverState {
    #[default]
    Outside,
    Inside,
}

impl HoverState {
    /// Feeds one event; `targeted` tells whether its target set holds the box.
    pub fn advance(&mut self, kind: PointerKind, targeted: bool) -> Option<HoverChange> {
        match (*self, kind) {
            (HoverState::Outside, PointerKind::MouseMove) if targeted => {
                *self = HoverState::Inside;
                Some(HoverChange::Enter)
            }
            (HoverState::Inside, PointerKind::MouseMove) if !targeted => {
                *self = HoverState::Outside;
                Some(HoverChange::Leave)
            }
            (HoverState::Inside, PointerKind::MouseLeave) => {
                *self = HoverState::Outside;
                Some(HoverChange::Leave)
            }
            _ => None,
        }
    }

    pub fn is_inside(&self) -> bool {
        matches!(self, HoverState::Inside)
    }
}
