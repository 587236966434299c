//! Pointer input: item-event synthesis and propagation.
//!
//! One raw event is handled as follows:
//! 1. convert it into an [`ItemEvent`] (coordinate transform + hit test)
//! 2. emit it on the surface bus, then on the bus of every targeted item
//! 3. advance each hit box's hover machine (mousemove / mouseleave only)
//! 4. emit the grab/drop gesture it derives, if any, the same way
//!
//! Items are visited over a snapshot of the paint order. An item deleted by
//! a listener stops receiving the event; an item created by a listener only
//! sees later events.

use super::bbox::BoundingBox;
use super::bus::{self, Listener};
use super::events::{EventKind, ItemEvent, WheelDelta};
use super::item::ItemId;
use super::surface::Surface;
use crate::input::{PointerEvent, PointerKind};
use log::trace;

impl Surface {
    /// Feeds one raw pointer event from the host.
    ///
    /// The host is expected to suppress its own default handling of the event.
    pub fn handle_pointer(&mut self, raw: &PointerEvent) {
        let gesture = self.gesture.advance(raw.kind);

        let event = self.to_item_event(raw, raw.kind.into());
        trace!(
            "{} at ({}, {}) hits {} item(s)",
            event.kind,
            event.x,
            event.y,
            event.target.len()
        );
        self.emit(&event);

        if let Some(gesture) = gesture {
            let derived = self.to_item_event(raw, gesture.into());
            self.emit(&derived);
        }
    }

    /// Converts a raw event into the payload listeners receive.
    ///
    /// Local coordinates have the element offset and the scroll offset
    /// removed; canvas coordinates add the scroll offset back.
    pub fn to_item_event(&self, raw: &PointerEvent, kind: EventKind) -> ItemEvent {
        let (offset_x, offset_y) = self.element_offset();
        let viewport = self.viewport();
        let x = raw.client_x - offset_x - viewport.x1;
        let y = raw.client_y - offset_y - viewport.y1;

        ItemEvent {
            kind,
            x,
            y,
            canvas_x: x + viewport.x1,
            canvas_y: y + viewport.y1,
            alt: raw.modifiers.alt,
            ctrl: raw.modifiers.ctrl,
            shift: raw.modifiers.shift,
            delta: raw.delta_y.map(WheelDelta::from_delta_y),
            target: self.find_targeted(x, y),
        }
    }

    /// Registers a listener on the surface bus.
    pub fn on(&mut self, kind: EventKind, listener: Listener<Surface>) {
        self.bus.on(kind, listener);
    }

    /// Removes the first registration of `listener` for `kind`.
    pub fn off(&mut self, kind: &EventKind, listener: &Listener<Surface>) -> bool {
        self.bus.off(kind, listener)
    }

    /// Emits `event` on the surface bus and propagates it to items.
    ///
    /// Every kind except mouseenter/mouseleave is forwarded to the items in
    /// its target list. Mousemove and mouseleave also drive the per-item
    /// hover machines, which emit enter/leave on the item buses.
    pub fn emit(&mut self, event: &ItemEvent) {
        let order = self.find_all();
        let listeners = self.bus.snapshot(&event.kind);
        bus::dispatch(self, &listeners, event);

        let hover_input = match event.kind.pointer_kind() {
            Some(kind @ (PointerKind::MouseMove | PointerKind::MouseLeave)) => Some(kind),
            _ => None,
        };
        let forward = !event.kind.is_hover();

        for id in order {
            if forward && event.targets(id) {
                self.emit_on_item(id, event);
            }
            if let Some(kind) = hover_input {
                self.advance_hover(id, kind, event);
            }
        }
    }

    /// Emits `event` on one item's bus. Items without a hit box have none.
    pub(crate) fn emit_on_item(&mut self, id: ItemId, event: &ItemEvent) {
        let Some(bbox) = self.bbox_mut(id) else {
            return;
        };
        let listeners = bbox.bus.snapshot(&event.kind);
        bus::dispatch(self, &listeners, event);
    }

    fn advance_hover(&mut self, id: ItemId, kind: PointerKind, event: &ItemEvent) {
        let Some(bbox) = self.bbox_mut(id) else {
            return;
        };
        if let Some(change) = bbox.hover.advance(kind, event.targets(id)) {
            self.emit_on_item(id, &event.renamed(change.into()));
        }
    }

    fn bbox_mut(&mut self, id: ItemId) -> Option<&mut BoundingBox> {
        self.items.get_mut(id)?.bbox.as_mut()
    }
}
