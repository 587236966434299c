//! Event names and the payload delivered to listeners.

use super::error::SceneError;
use super::item::ItemId;
use crate::input::{Gesture, HoverChange, PointerKind};
use std::fmt;
use std::str::FromStr;

/// Name of an event on a surface or item bus.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    ContextMenu,
    DblClick,
    Wheel,
    MouseMove,
    MouseDown,
    MouseUp,
    /// Pointer moved while a button is held
    Grab,
    /// End of a grab
    Drop,
    MouseLeave,
    MouseEnter,
    /// Item removed from its surface
    Delete,
    /// Image resource decoded and drawn
    Load,
    /// Image resource could not be loaded
    LoadError,
    /// Caller-defined event, only ever emitted explicitly
    Custom(String),
}

impl EventKind {
    /// Builds a caller-defined event name.
    pub fn custom(name: impl Into<String>) -> Self {
        EventKind::Custom(name.into())
    }

    pub fn name(&self) -> &str {
        match self {
            EventKind::Click => "click",
            EventKind::ContextMenu => "contextmenu",
            EventKind::DblClick => "dblclick",
            EventKind::Wheel => "wheel",
            EventKind::MouseMove => "mousemove",
            EventKind::MouseDown => "mousedown",
            EventKind::MouseUp => "mouseup",
            EventKind::Grab => "grab",
            EventKind::Drop => "drop",
            EventKind::MouseLeave => "mouseleave",
            EventKind::MouseEnter => "mouseenter",
            EventKind::Delete => "delete",
            EventKind::Load => "load",
            EventKind::LoadError => "loaderror",
            EventKind::Custom(name) => name,
        }
    }

    /// Raw pointer kind this event mirrors, if any.
    pub fn pointer_kind(&self) -> Option<PointerKind> {
        Some(match self {
            EventKind::Click => PointerKind::Click,
            EventKind::ContextMenu => PointerKind::ContextMenu,
            EventKind::DblClick => PointerKind::DblClick,
            EventKind::Wheel => PointerKind::Wheel,
            EventKind::MouseMove => PointerKind::MouseMove,
            EventKind::MouseDown => PointerKind::MouseDown,
            EventKind::MouseUp => PointerKind::MouseUp,
            EventKind::MouseLeave => PointerKind::MouseLeave,
            EventKind::MouseEnter => PointerKind::MouseEnter,
            _ => return None,
        })
    }

    /// Enter/leave are produced per item by the hover machine and never
    /// forwarded from the surface bus.
    pub fn is_hover(&self) -> bool {
        matches!(self, EventKind::MouseEnter | EventKind::MouseLeave)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parses built-in event names. Use [`EventKind::custom`] for anything else.
impl FromStr for EventKind {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "click" => EventKind::Click,
            "contextmenu" => EventKind::ContextMenu,
            "dblclick" => EventKind::DblClick,
            "wheel" => EventKind::Wheel,
            "mousemove" => EventKind::MouseMove,
            "mousedown" => EventKind::MouseDown,
            "mouseup" => EventKind::MouseUp,
            "grab" => EventKind::Grab,
            "drop" => EventKind::Drop,
            "mouseleave" => EventKind::MouseLeave,
            "mouseenter" => EventKind::MouseEnter,
            "delete" => EventKind::Delete,
            "load" => EventKind::Load,
            "loaderror" => EventKind::LoadError,
            other => return Err(SceneError::UnknownEvent(other.to_string())),
        })
    }
}

impl From<PointerKind> for EventKind {
    fn from(kind: PointerKind) -> Self {
        match kind {
            PointerKind::Click => EventKind::Click,
            PointerKind::ContextMenu => EventKind::ContextMenu,
            PointerKind::DblClick => EventKind::DblClick,
            PointerKind::Wheel => EventKind::Wheel,
            PointerKind::MouseMove => EventKind::MouseMove,
            PointerKind::MouseDown => EventKind::MouseDown,
            PointerKind::MouseUp => EventKind::MouseUp,
            PointerKind::MouseLeave => EventKind::MouseLeave,
            PointerKind::MouseEnter => EventKind::MouseEnter,
        }
    }
}

impl From<Gesture> for EventKind {
    fn from(gesture: Gesture) -> Self {
        match gesture {
            Gesture::Grab => EventKind::Grab,
            Gesture::Drop => EventKind::Drop,
        }
    }
}

impl From<HoverChange> for EventKind {
    fn from(change: HoverChange) -> Self {
        match change {
            HoverChange::Enter => EventKind::MouseEnter,
            HoverChange::Leave => EventKind::MouseLeave,
        }
    }
}

/// Scroll direction of a wheel event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelDelta {
    /// Positive vertical delta
    Up,
    /// Zero or negative vertical delta
    Down,
}

impl WheelDelta {
    pub fn from_delta_y(delta_y: f64) -> Self {
        if delta_y > 0.0 {
            WheelDelta::Up
        } else {
            WheelDelta::Down
        }
    }
}

/// Payload handed to every listener.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemEvent {
    pub kind: EventKind,
    /// Surface-local X, with the scroll offset removed
    pub x: f64,
    /// Surface-local Y, with the scroll offset removed
    pub y: f64,
    /// X relative to the surface element (local + scroll offset)
    pub canvas_x: f64,
    /// Y relative to the surface element (local + scroll offset)
    pub canvas_y: f64,
    pub alt: bool,
    pub ctrl: bool,
    pub shift: bool,
    /// Set for wheel events only
    pub delta: Option<WheelDelta>,
    /// Items under the pointer, in paint order
    pub target: Vec<ItemId>,
}

impl ItemEvent {
    /// An event without a pointer position, e.g. `delete` or `load`.
    pub fn bare(kind: EventKind, target: Vec<ItemId>) -> Self {
        Self {
            kind,
            x: 0.0,
            y: 0.0,
            canvas_x: 0.0,
            canvas_y: 0.0,
            alt: false,
            ctrl: false,
            shift: false,
            delta: None,
            target,
        }
    }

    /// Same payload under another name; used for derived events.
    pub fn renamed(&self, kind: EventKind) -> Self {
        Self {
            kind,
            ..self.clone()
        }
    }

    pub fn targets(&self, id: ItemId) -> bool {
        self.target.contains(&id)
    }
}
