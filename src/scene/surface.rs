//! The scene container: items, viewport, redraw loop and image loading.

use super::bus::{EventBus, Listener};
use super::error::SceneError;
use super::events::{EventKind, ItemEvent};
use super::handle::ItemHandle;
use super::item::{ImageStatus, Item, ItemId, ItemType, Shape};
use crate::draw::image::{ImageLoads, LoadOutcome};
use crate::draw::{FileImageLoader, ImageLoader, RenderContext, Style, StylePatch};
use crate::input::GestureState;
use log::{debug, info, warn};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Cursor names understood as-is; anything else is treated as an image URL.
pub const CURSORS: [&str; 36] = [
    "auto",
    "default",
    "none",
    "context-menu",
    "help",
    "pointer",
    "progress",
    "wait",
    "cell",
    "crosshair",
    "text",
    "vertical-text",
    "alias",
    "copy",
    "move",
    "no-drop",
    "not-allowed",
    "e-resize",
    "n-resize",
    "ne-resize",
    "nw-resize",
    "s-resize",
    "se-resize",
    "sw-resize",
    "w-resize",
    "ew-resize",
    "ns-resize",
    "nesw-resize",
    "nwse-resize",
    "col-resize",
    "row-resize",
    "all-scroll",
    "zoom-in",
    "zoom-out",
    "grab",
    "grabbing",
];

pub const DEFAULT_CURSOR: &str = "auto";

/// File name used by [`Surface::save`] when none is given.
pub const DEFAULT_SAVE_NAME: &str = "canvas";

/// How far the viewport origin may move in each direction.
///
/// The origin x is kept within `[-left, right]` and y within
/// `[-top, bottom]`. All zero means no scrolling.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ScrollRegion {
    pub top: f64,
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
}

/// `[top, left, right, bottom]`
impl From<[f64; 4]> for ScrollRegion {
    fn from([top, left, right, bottom]: [f64; 4]) -> Self {
        Self {
            top,
            left,
            right,
            bottom,
        }
    }
}

/// Visible window over the logical drawing area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Scroll offset X
    pub x1: f64,
    /// Scroll offset Y
    pub y1: f64,
    /// `x1 + width`
    pub x2: f64,
    /// `y1 + height`
    pub y2: f64,
}

/// Construction options for a [`Surface`].
#[derive(Debug, Clone, Default)]
pub struct SurfaceOptions {
    /// Resizes the context when given together with `height`
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub scroll_region: Option<ScrollRegion>,
}

/// Listener type accepted by surface and item buses.
pub type SurfaceListener = Listener<Surface>;

/// Owns the items drawn on one [`RenderContext`].
///
/// Paint order is the order of `order`: later items paint over earlier ones.
/// Every visible change goes through [`reload`](Self::reload), which clears
/// the context and redraws all items.
pub struct Surface {
    ctx: Box<dyn RenderContext>,
    pub(crate) items: SlotMap<ItemId, Item>,
    pub(crate) order: Vec<ItemId>,
    width: f64,
    height: f64,
    viewport: Viewport,
    scroll_region: ScrollRegion,
    element_offset: (f64, f64),
    cursor: String,
    pub(crate) bus: EventBus<Surface>,
    pub(crate) gesture: GestureState,
    images: ImageLoads<ItemId>,
}

impl fmt::Debug for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("viewport", &self.viewport)
            .field("scroll_region", &self.scroll_region)
            .field("items", &self.order.len())
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}

impl Surface {
    /// Binds a surface to `ctx` and draws the (empty) initial view.
    ///
    /// The size comes from `options` when both width and height are given,
    /// otherwise from the context.
    pub fn new(
        mut ctx: Box<dyn RenderContext>,
        options: SurfaceOptions,
    ) -> Result<Self, SceneError> {
        let (width, height) = match (options.width, options.height) {
            (Some(width), Some(height)) => {
                ctx.resize(width, height)?;
                (width, height)
            }
            _ => ctx.size(),
        };

        let mut surface = Self {
            ctx,
            items: SlotMap::with_key(),
            order: Vec::new(),
            width,
            height,
            viewport: Viewport {
                x1: 0.0,
                y1: 0.0,
                x2: width,
                y2: height,
            },
            scroll_region: options.scroll_region.unwrap_or_default(),
            element_offset: (0.0, 0.0),
            cursor: DEFAULT_CURSOR.to_string(),
            bus: EventBus::new(),
            gesture: GestureState::default(),
            images: ImageLoads::new(Arc::new(FileImageLoader::new())),
        };
        debug!("Created {width}x{height} surface");
        surface.coords_view(0.0, 0.0);
        Ok(surface)
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn scroll_region(&self) -> ScrollRegion {
        self.scroll_region
    }

    pub fn context(&self) -> &dyn RenderContext {
        self.ctx.as_ref()
    }

    /// Replaces the loader used for images created from now on.
    pub fn set_image_loader(&mut self, loader: Arc<dyn ImageLoader>) {
        self.images.set_loader(loader);
    }

    /// Position of the surface element inside the host window.
    pub fn set_element_offset(&mut self, x: f64, y: f64) {
        self.element_offset = (x, y);
    }

    pub fn element_offset(&self) -> (f64, f64) {
        self.element_offset
    }

    /// Sets the pointer cursor the host should show over the surface.
    ///
    /// Unknown names are used as a custom cursor image URL.
    pub fn set_cursor(&mut self, name: &str) {
        self.cursor = if CURSORS.contains(&name) {
            name.to_string()
        } else {
            format!("url({name})")
        };
    }

    pub fn cursor(&self) -> &str {
        &self.cursor
    }

    // Viewport

    /// Moves the viewport origin to (`x`, `y`), clamped to the scroll region, and reloads.
    pub fn coords_view(&mut self, x: f64, y: f64) {
        let region = self.scroll_region;
        self.viewport.x1 = clamp_axis(x, region.left, region.right);
        self.viewport.y1 = clamp_axis(y, region.top, region.bottom);
        self.viewport.x2 = self.viewport.x1 + self.width;
        self.viewport.y2 = self.viewport.y1 + self.height;
        self.reload();
    }

    /// Moves the viewport origin by (`dx`, `dy`).
    pub fn move_view(&mut self, dx: f64, dy: f64) {
        self.coords_view(self.viewport.x1 + dx, self.viewport.y1 + dy);
    }

    // Redraw

    /// Clears the surface, scroll margins included, and redraws every item in paint order.
    pub fn reload(&mut self) {
        let region = self.scroll_region;
        self.ctx.clear_rect(
            -region.left,
            -region.top,
            self.width + region.left + region.right,
            self.height + region.top + region.bottom,
        );
        let origin = self.origin();
        for id in &self.order {
            if let Some(item) = self.items.get(*id) {
                item.draw(self.ctx.as_mut(), origin);
            }
        }
    }

    /// Draws one item over the current contents without clearing.
    pub(crate) fn draw_item(&mut self, id: ItemId) {
        let origin = self.origin();
        if let Some(item) = self.items.get(id) {
            item.draw(self.ctx.as_mut(), origin);
        }
    }

    fn origin(&self) -> (f64, f64) {
        (self.viewport.x1, self.viewport.y1)
    }

    /// Writes the current raster contents to `<file_name>.png`.
    ///
    /// Uses `canvas` when no name is given. Returns the written path.
    pub fn save(&self, file_name: Option<&str>) -> Result<PathBuf, SceneError> {
        let name = file_name
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_SAVE_NAME);
        let path = PathBuf::from(format!("{name}.png"));
        self.ctx.write_png(&path)?;
        info!("Saved surface to {}", path.display());
        Ok(path)
    }

    // Items

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.items.contains_key(id)
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(id)
    }

    pub fn item_type(&self, id: ItemId) -> Option<ItemType> {
        self.items.get(id).map(Item::item_type)
    }

    /// Current position of `id` in the paint order.
    pub fn index(&self, id: ItemId) -> Option<usize> {
        self.order.iter().position(|other| *other == id)
    }

    /// Mutable access to one item.
    pub fn handle(&mut self, id: ItemId) -> Result<ItemHandle<'_>, SceneError> {
        if !self.items.contains_key(id) {
            return Err(SceneError::UnknownItem(id));
        }
        Ok(ItemHandle::new(self, id))
    }

    fn insert(&mut self, shape: Shape, style: Option<&StylePatch>) -> ItemId {
        let item = Item::new(shape, Style::from_patch(style));
        let kind = item.item_type();
        let id = self.items.insert(item);
        self.order.push(id);
        debug!(
            "Created {kind} item {id:?} at index {}",
            self.order.len() - 1
        );
        id
    }

    fn insert_and_draw(&mut self, shape: Shape, style: Option<&StylePatch>) -> ItemId {
        let id = self.insert(shape, style);
        self.draw_item(id);
        id
    }

    pub fn create_line(
        &mut self,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        style: Option<&StylePatch>,
    ) -> ItemId {
        self.insert_and_draw(Shape::Line { x1, y1, x2, y2 }, style)
    }

    /// Creates a cubic Bézier curve from (`x1`, `y1`) to (`x2`, `y2`).
    #[allow(clippy::too_many_arguments)]
    pub fn create_curve(
        &mut self,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        cp1x: f64,
        cp1y: f64,
        cp2x: f64,
        cp2y: f64,
        style: Option<&StylePatch>,
    ) -> ItemId {
        self.insert_and_draw(
            Shape::Curve {
                x1,
                y1,
                x2,
                y2,
                cp1x,
                cp1y,
                cp2x,
                cp2y,
            },
            style,
        )
    }

    pub fn create_rectangle(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        style: Option<&StylePatch>,
    ) -> ItemId {
        self.insert_and_draw(
            Shape::Rectangle {
                x,
                y,
                width,
                height,
            },
            style,
        )
    }

    /// Creates an ellipse centred on (`x`, `y`).
    pub fn create_ellipse(
        &mut self,
        x: f64,
        y: f64,
        rx: f64,
        ry: f64,
        style: Option<&StylePatch>,
    ) -> ItemId {
        self.insert_and_draw(Shape::Ellipse { x, y, rx, ry }, style)
    }

    /// Creates a pie slice centred on (`x`, `y`) from angle `start` to angle `extent`.
    ///
    /// See [`DEFAULT_ARC_START`](super::DEFAULT_ARC_START) and
    /// [`DEFAULT_ARC_EXTENT`](super::DEFAULT_ARC_EXTENT) for a full disc.
    #[allow(clippy::too_many_arguments)]
    pub fn create_arc(
        &mut self,
        x: f64,
        y: f64,
        r: f64,
        start: f64,
        extent: f64,
        anticlockwise: bool,
        style: Option<&StylePatch>,
    ) -> ItemId {
        self.insert_and_draw(
            Shape::Arc {
                x,
                y,
                r,
                start,
                extent,
                anticlockwise,
            },
            style,
        )
    }

    /// Creates an image item and starts loading `url` in the background.
    ///
    /// Nothing is drawn until the load completes and is applied by
    /// [`process_image_loads`](Self::process_image_loads).
    pub fn create_image(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        url: &str,
        style: Option<&StylePatch>,
    ) -> ItemId {
        let id = self.insert(
            Shape::Image {
                x,
                y,
                width,
                height,
                url: url.to_string(),
                generation: 0,
                status: ImageStatus::Pending,
            },
            style,
        );
        self.images.request(id, 0, url);
        id
    }

    /// Creates a text item with its top-left corner at (`x`, `y`).
    pub fn create_text(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        style: Option<&StylePatch>,
    ) -> ItemId {
        self.insert_and_draw(
            Shape::Text {
                x,
                y,
                text: text.to_string(),
            },
            style,
        )
    }

    /// Removes an item, then notifies its `delete` listeners.
    pub(crate) fn remove_item(&mut self, id: ItemId) -> bool {
        let Some(mut item) = self.items.remove(id) else {
            return false;
        };
        self.order.retain(|other| *other != id);
        debug!("Deleted {} item {id:?}", item.item_type());

        if let Some(bbox) = item.bbox.as_mut() {
            let listeners = bbox.bus.snapshot(&EventKind::Delete);
            let event = ItemEvent::bare(EventKind::Delete, vec![id]);
            super::bus::dispatch(self, &listeners, &event);
        }
        true
    }

    /// Moves an item to the top of the paint order.
    pub(crate) fn raise_item(&mut self, id: ItemId) {
        if self.items.contains_key(id) {
            self.order.retain(|other| *other != id);
            self.order.push(id);
        }
    }

    /// Starts a new load for an image item; older loads are ignored when they land.
    pub(crate) fn reload_image(&mut self, id: ItemId, new_url: &str) -> Result<(), SceneError> {
        let item = self.items.get_mut(id).ok_or(SceneError::UnknownItem(id))?;
        let found = item.item_type();
        let Shape::Image {
            url,
            generation,
            status,
            ..
        } = &mut item.shape
        else {
            return Err(SceneError::WrongItemType {
                expected: ItemType::Image,
                found,
            });
        };
        *url = new_url.to_string();
        *generation += 1;
        *status = ImageStatus::Pending;
        let generation = *generation;
        self.images.request(id, generation, new_url);
        Ok(())
    }

    // Images

    /// Number of image loads not yet applied.
    pub fn pending_images(&self) -> usize {
        self.images.in_flight()
    }

    /// Applies every finished image load without blocking.
    ///
    /// Returns how many items were updated.
    pub fn process_image_loads(&mut self) -> usize {
        let outcomes = self.images.drain();
        self.apply_image_outcomes(outcomes)
    }

    /// Blocks until all pending loads finished or `timeout` elapsed, then applies them.
    pub fn wait_for_images(&mut self, timeout: Duration) -> usize {
        let outcomes = self.images.wait(timeout);
        self.apply_image_outcomes(outcomes)
    }

    fn apply_image_outcomes(&mut self, outcomes: Vec<LoadOutcome<ItemId>>) -> usize {
        let mut applied = 0;
        for outcome in outcomes {
            if self.apply_image_outcome(outcome) {
                applied += 1;
            }
        }
        applied
    }

    fn apply_image_outcome(&mut self, outcome: LoadOutcome<ItemId>) -> bool {
        let LoadOutcome {
            key: id,
            generation: loaded_generation,
            url: loaded_url,
            result,
        } = outcome;
        let Some(Shape::Image {
            generation, status, ..
        }) = self.items.get_mut(id).map(|item| &mut item.shape)
        else {
            debug!("Dropping image {loaded_url} for removed item {id:?}");
            return false;
        };
        if *generation != loaded_generation {
            debug!("Dropping superseded image {loaded_url}");
            return false;
        }

        let kind = match result {
            Ok(image) => {
                debug!(
                    "Loaded image {loaded_url} ({}x{})",
                    image.width, image.height
                );
                *status = ImageStatus::Ready(image);
                EventKind::Load
            }
            Err(err) => {
                warn!("Failed to load image {loaded_url}: {err}");
                *status = ImageStatus::Failed(err.to_string());
                EventKind::LoadError
            }
        };

        if kind == EventKind::Load {
            self.draw_item(id);
        }
        self.emit_on_item(id, &ItemEvent::bare(kind, vec![id]));
        true
    }
}

/// Clamps a requested origin coordinate into `[-negative, positive]`.
fn clamp_axis(value: f64, negative: f64, positive: f64) -> f64 {
    if value < 0.0 {
        if -value < negative { value } else { -negative }
    } else if value > 0.0 {
        if value < positive { value } else { positive }
    } else {
        0.0
    }
}
