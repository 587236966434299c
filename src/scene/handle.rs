//! Per-item operations.

use super::bbox::BoundingBox;
use super::bus::{self, listener};
use super::error::SceneError;
use super::events::{EventKind, ItemEvent};
use super::item::{Coords, Item, ItemId, ItemType, Reload, Shape};
use super::surface::{DEFAULT_CURSOR, Surface, SurfaceListener};
use crate::draw::{Style, StylePatch};
use log::debug;

/// Mutable view of one live item.
///
/// Borrowing the surface for the handle's lifetime guarantees the item
/// stays alive; the two operations that can end it ([`delete`](Self::delete)
/// and [`emit`](Self::emit), whose listeners may delete it) consume the handle.
pub struct ItemHandle<'a> {
    surface: &'a mut Surface,
    id: ItemId,
}

impl<'a> ItemHandle<'a> {
    pub(crate) fn new(surface: &'a mut Surface, id: ItemId) -> Self {
        Self { surface, id }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn item(&self) -> &Item {
        &self.surface.items[self.id]
    }

    fn item_mut(&mut self) -> &mut Item {
        &mut self.surface.items[self.id]
    }

    pub fn item_type(&self) -> ItemType {
        self.item().item_type()
    }

    /// Position in the paint order.
    pub fn index(&self) -> usize {
        self.surface.index(self.id).unwrap_or_default()
    }

    pub fn shape(&self) -> &Shape {
        self.item().shape()
    }

    pub fn style(&self) -> &Style {
        self.item().style()
    }

    pub fn bbox(&self) -> Option<&BoundingBox> {
        self.item().bbox()
    }

    fn finish(&mut self, reload: Reload) {
        if reload.is_enabled() {
            self.surface.reload();
        }
    }

    /// Redefines the geometry. See [`Coords`] for the accepted forms.
    pub fn coords(&mut self, coords: Coords, reload: Reload) -> Result<(), SceneError> {
        self.item_mut().set_coords(coords)?;
        self.finish(reload);
        Ok(())
    }

    /// Translates the item by (`dx`, `dy`).
    pub fn move_by(&mut self, dx: f64, dy: f64, reload: Reload) {
        self.item_mut().translate(dx, dy);
        self.finish(reload);
    }

    /// Removes the item from its surface and emits `delete` on it.
    pub fn delete(self, reload: Reload) {
        self.surface.remove_item(self.id);
        if reload.is_enabled() {
            self.surface.reload();
        }
    }

    /// Moves the item to the top of the paint order, keeping tags, style and listeners.
    ///
    /// The item is never removed, so no `delete` event is emitted.
    pub fn overlap(&mut self, reload: Reload) {
        self.surface.raise_item(self.id);
        self.finish(reload);
    }

    /// Appends `tag`; the same tag may be added more than once.
    pub fn add_tag(&mut self, tag: &str) {
        self.item_mut().tags.push(tag.to_string());
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.item().has_tag(tag)
    }

    /// Removes every occurrence of each tag in `tags`.
    pub fn delete_tag(&mut self, tags: &[&str]) {
        self.item_mut()
            .tags
            .retain(|t| !tags.contains(&t.as_str()));
    }

    /// Merges `patch` over the current style.
    pub fn configure(&mut self, patch: &StylePatch, reload: Reload) {
        let item = self.item_mut();
        item.style = item.style.merged(patch);
        self.finish(reload);
    }

    /// Restores the default style.
    pub fn reset_style(&mut self, reload: Reload) {
        self.item_mut().style = Style::default();
        self.finish(reload);
    }

    /// Draws this item over the current contents.
    pub fn draw(&mut self) {
        self.surface.draw_item(self.id);
    }

    /// Registers a listener on the item's own bus.
    ///
    /// Items without a hit box never receive events; returns false for them.
    pub fn on(&mut self, kind: EventKind, listener: SurfaceListener) -> bool {
        let id = self.id;
        match self.item_mut().bbox.as_mut() {
            Some(bbox) => {
                bbox.bus.on(kind, listener);
                true
            }
            None => {
                debug!("Ignoring '{kind}' listener on item {id:?} without hit box");
                false
            }
        }
    }

    /// Removes the first registration of `listener` for `kind`.
    pub fn off(&mut self, kind: &EventKind, listener: &SurfaceListener) -> bool {
        self.item_mut()
            .bbox
            .as_mut()
            .is_some_and(|bbox| bbox.bus.off(kind, listener))
    }

    /// Emits `event` on the item's bus only.
    pub fn emit(self, event: &ItemEvent) {
        let Some(bbox) = self.surface.items[self.id].bbox.as_mut() else {
            return;
        };
        let listeners = bbox.bus.snapshot(&event.kind);
        bus::dispatch(self.surface, &listeners, event);
    }

    /// Shows cursor `name` while the pointer hovers the item, `auto` after it leaves.
    pub fn set_cursor(&mut self, name: &str) {
        let name = name.to_string();
        self.on(
            EventKind::MouseEnter,
            listener(move |surface: &mut Surface, _: &ItemEvent| surface.set_cursor(&name)),
        );
        self.on(
            EventKind::MouseLeave,
            listener(|surface: &mut Surface, _: &ItemEvent| surface.set_cursor(DEFAULT_CURSOR)),
        );
    }

    /// Points an image item at a new resource and reloads.
    ///
    /// Results of earlier loads for this item are discarded when they arrive.
    pub fn set_url(&mut self, url: &str) -> Result<(), SceneError> {
        self.surface.reload_image(self.id, url)?;
        self.surface.reload();
        Ok(())
    }

    /// Replaces the string of a text item.
    pub fn set_text(&mut self, text: &str, reload: Reload) -> Result<(), SceneError> {
        let item = self.item_mut();
        let found = item.item_type();
        let Shape::Text { text: current, .. } = &mut item.shape else {
            return Err(SceneError::WrongItemType {
                expected: ItemType::Text,
                found,
            });
        };
        *current = text.to_string();
        self.finish(reload);
        Ok(())
    }
}
