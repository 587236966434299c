//! Raw pointer events as delivered by the host.

use super::modifiers::Modifiers;

/// Kind of a raw pointer event.
///
/// These are the primitives a host forwards to the surface; derived
/// gestures (grab, drop, per-item enter/leave) are synthesized from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    /// Primary button click
    Click,
    /// Secondary button click (context menu request)
    ContextMenu,
    /// Double click
    DblClick,
    /// Scroll wheel
    Wheel,
    /// Pointer motion
    MouseMove,
    /// Button pressed
    MouseDown,
    /// Button released
    MouseUp,
    /// Pointer left the surface element
    MouseLeave,
    /// Pointer entered the surface element
    MouseEnter,
}

/// A raw pointer event in client (host window) coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    /// Client X coordinate, before the element offset is removed
    pub client_x: f64,
    /// Client Y coordinate, before the element offset is removed
    pub client_y: f64,
    /// Modifier keys held while the event fired
    pub modifiers: Modifiers,
    /// Vertical wheel delta; only wheel events carry one
    pub delta_y: Option<f64>,
}

impl PointerEvent {
    /// Creates an event with no modifiers held.
    pub fn new(kind: PointerKind, client_x: f64, client_y: f64) -> Self {
        Self {
            kind,
            client_x,
            client_y,
            modifiers: Modifiers::new(),
            delta_y: None,
        }
    }

    /// Creates a wheel event with the given vertical delta.
    pub fn wheel(client_x: f64, client_y: f64, delta_y: f64) -> Self {
        Self {
            delta_y: Some(delta_y),
            ..Self::new(PointerKind::Wheel, client_x, client_y)
        }
    }

    /// Returns the event with `modifiers` attached.
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}
