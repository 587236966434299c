//! Selector resolution, spatial queries and bulk operations.
//!
//! Bulk operations apply the per-item operation with its reload suppressed,
//! then reload once at the end when anything visible may have changed.

use super::bbox::BoundingBox;
use super::events::EventKind;
use super::item::{Coords, ItemId, Reload};
use super::selector::{Selector, WILDCARD};
use super::surface::{Surface, SurfaceListener};
use crate::draw::StylePatch;
use log::{trace, warn};
use std::collections::HashSet;
use std::rc::Rc;

impl Surface {
    /// Resolves `selector` to live items, without duplicates, in first-occurrence order.
    pub fn resolve(&self, selector: impl Into<Selector>) -> Vec<ItemId> {
        let mut raw = Vec::new();
        self.collect(&selector.into(), &mut raw);

        let mut seen = HashSet::with_capacity(raw.len());
        raw.retain(|id| seen.insert(*id));
        raw
    }

    fn collect(&self, selector: &Selector, out: &mut Vec<ItemId>) {
        match selector {
            Selector::All => out.extend(self.order.iter().copied()),
            Selector::Item(id) => {
                if self.items.contains_key(*id) {
                    out.push(*id);
                }
            }
            Selector::Items(ids) => {
                for id in ids {
                    if self.items.contains_key(*id) {
                        out.push(*id);
                    }
                }
            }
            Selector::Tag(tag) => out.extend(self.find_with_tag(tag)),
            Selector::Tags(tags) => {
                for tag in tags {
                    self.collect(&Selector::from(tag), out);
                }
            }
            Selector::Many(selectors) => {
                for nested in selectors {
                    self.collect(nested, out);
                }
            }
        }
    }

    // Queries

    /// Every item, in paint order.
    pub fn find_all(&self) -> Vec<ItemId> {
        self.order.clone()
    }

    pub fn find_with_tag(&self, tag: &str) -> Vec<ItemId> {
        self.order
            .iter()
            .copied()
            .filter(|id| self.items.get(*id).is_some_and(|item| item.has_tag(tag)))
            .collect()
    }

    pub fn tag_exists(&self, tag: &str) -> bool {
        self.order
            .iter()
            .any(|id| self.items.get(*id).is_some_and(|item| item.has_tag(tag)))
    }

    /// Items whose hit box contains the point, in paint order.
    pub fn find_targeted(&self, x: f64, y: f64) -> Vec<ItemId> {
        self.filter_boxes(|bbox| bbox.is_targeted_by(x, y))
    }

    /// Items whose hit box lies entirely inside the query rectangle.
    pub fn find_enclosed(&self, x1: f64, y1: f64, x2: f64, y2: f64) -> Vec<ItemId> {
        let query = BoundingBox::new(x1, y1, x2, y2);
        self.filter_boxes(|bbox| query.contains(bbox))
    }

    /// Items whose hit box overlaps the query rectangle, touching edges included.
    pub fn find_overlapping(&self, x1: f64, y1: f64, x2: f64, y2: f64) -> Vec<ItemId> {
        let query = BoundingBox::new(x1, y1, x2, y2);
        self.filter_boxes(|bbox| query.overlaps(bbox))
    }

    fn filter_boxes(&self, predicate: impl Fn(&BoundingBox) -> bool) -> Vec<ItemId> {
        self.order
            .iter()
            .copied()
            .filter(|id| {
                self.items
                    .get(*id)
                    .and_then(|item| item.bbox())
                    .is_some_and(&predicate)
            })
            .collect()
    }

    // Bulk operations

    /// Moves the anchor of every selected item to (`x`, `y`), keeping sizes.
    pub fn coords(&mut self, selector: impl Into<Selector>, x: f64, y: f64) {
        for id in self.resolve(selector) {
            if let Ok(mut handle) = self.handle(id) {
                // The anchor form fits every variant.
                if let Err(err) = handle.coords(Coords::At { x, y }, Reload::Suppress) {
                    warn!("{err}");
                }
            }
        }
        self.reload();
    }

    /// Translates every selected item by (`dx`, `dy`).
    pub fn move_items(&mut self, selector: impl Into<Selector>, dx: f64, dy: f64) {
        let ids = self.resolve(selector);
        trace!("Moving {} item(s) by ({dx}, {dy})", ids.len());
        for id in ids {
            if let Ok(mut handle) = self.handle(id) {
                handle.move_by(dx, dy, Reload::Suppress);
            }
        }
        self.reload();
    }

    /// Deletes every selected item.
    ///
    /// Items removed by a `delete` listener along the way are skipped.
    pub fn delete(&mut self, selector: impl Into<Selector>) {
        for id in self.resolve(selector) {
            if let Ok(handle) = self.handle(id) {
                handle.delete(Reload::Suppress);
            }
        }
        self.reload();
    }

    /// Raises every selected item to the top, in selector order.
    pub fn overlap(&mut self, selector: impl Into<Selector>) {
        for id in self.resolve(selector) {
            self.raise_item(id);
        }
        self.reload();
    }

    /// Merges `patch` into the style of every selected item.
    pub fn item_configure(&mut self, selector: impl Into<Selector>, patch: &StylePatch) {
        for id in self.resolve(selector) {
            if let Ok(mut handle) = self.handle(id) {
                handle.configure(patch, Reload::Suppress);
            }
        }
        self.reload();
    }

    /// Registers `listener` for `kind` on every selected item that has a hit box.
    pub fn add_item_event(
        &mut self,
        selector: impl Into<Selector>,
        kind: EventKind,
        listener: SurfaceListener,
    ) {
        for id in self.resolve(selector) {
            if let Ok(mut handle) = self.handle(id) {
                handle.on(kind.clone(), Rc::clone(&listener));
            }
        }
    }

    /// Removes one registration of `listener` for `kind` from every selected item.
    pub fn remove_item_event(
        &mut self,
        selector: impl Into<Selector>,
        kind: &EventKind,
        listener: &SurfaceListener,
    ) {
        for id in self.resolve(selector) {
            if let Ok(mut handle) = self.handle(id) {
                handle.off(kind, listener);
            }
        }
    }

    /// Shows cursor `name` while hovering any selected item.
    pub fn set_item_cursor(&mut self, selector: impl Into<Selector>, name: &str) {
        for id in self.resolve(selector) {
            if let Ok(mut handle) = self.handle(id) {
                handle.set_cursor(name);
            }
        }
    }

    /// Adds `tag` to every selected item that lacks it. The wildcard tag is ignored.
    pub fn add_tag(&mut self, selector: impl Into<Selector>, tag: &str) {
        if tag == WILDCARD {
            trace!("Ignoring wildcard tag");
            return;
        }
        for id in self.resolve(selector) {
            match self.items.get_mut(id) {
                Some(item) if !item.has_tag(tag) => item.tags.push(tag.to_string()),
                _ => {}
            }
        }
    }

    /// Adds `tag` to every item.
    pub fn add_tag_all(&mut self, tag: &str) {
        self.add_tag(Selector::All, tag);
    }

    /// Removes `tag` from every selected item and returns the selection.
    pub fn delete_tag(&mut self, selector: impl Into<Selector>, tag: &str) -> Vec<ItemId> {
        let ids = self.resolve(selector);
        for id in &ids {
            if let Some(item) = self.items.get_mut(*id) {
                item.tags.retain(|t| t != tag);
            }
        }
        ids
    }

    /// True when every selected item carries `tag`; vacuously true for an empty selection.
    pub fn has_tag(&self, selector: impl Into<Selector>, tag: &str) -> bool {
        self.resolve(selector)
            .into_iter()
            .all(|id| self.items.get(id).is_some_and(|item| item.has_tag(tag)))
    }
}
