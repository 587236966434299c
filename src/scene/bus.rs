//! Named-event registry shared by surfaces and hit boxes.
//!
//! Listeners receive a mutable context (the [`Surface`](super::Surface) in
//! practice) alongside the event, so they can mutate the scene while it is
//! being dispatched. Dispatch always runs over a snapshot of the listener
//! list taken before the first call.

use super::events::{EventKind, ItemEvent};
use log::{trace, warn};
use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

/// Shared listener handle. Identity (`Rc::ptr_eq`) is what `off` matches on.
pub type Listener<C> = Rc<RefCell<dyn FnMut(&mut C, &ItemEvent)>>;

/// Wraps a closure into a [`Listener`].
pub fn listener<C, F>(callback: F) -> Listener<C>
where
    F: FnMut(&mut C, &ItemEvent) + 'static,
{
    Rc::new(RefCell::new(callback))
}

/// Event name to ordered listener list.
pub struct EventBus<C> {
    events: HashMap<EventKind, Vec<Listener<C>>>,
}

impl<C> Default for EventBus<C> {
    fn default() -> Self {
        Self {
            events: HashMap::new(),
        }
    }
}

impl<C> std::fmt::Debug for EventBus<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: HashMap<&str, usize> = self
            .events
            .iter()
            .map(|(kind, list)| (kind.name(), list.len()))
            .collect();
        f.debug_struct("EventBus").field("events", &counts).finish()
    }
}

impl<C> EventBus<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `listener` to the list for `kind`. Registering twice fires twice.
    pub fn on(&mut self, kind: EventKind, listener: Listener<C>) {
        self.events.entry(kind).or_default().push(listener);
    }

    /// Removes the first registration of `listener` for `kind`.
    ///
    /// Returns false when it was not registered.
    pub fn off(&mut self, kind: &EventKind, listener: &Listener<C>) -> bool {
        let Some(list) = self.events.get_mut(kind) else {
            return false;
        };
        match list.iter().position(|l| Rc::ptr_eq(l, listener)) {
            Some(pos) => {
                list.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Copy of the current list for `kind`, declaring the name if unseen.
    pub fn snapshot(&mut self, kind: &EventKind) -> Vec<Listener<C>> {
        self.events.entry(kind.clone()).or_default().clone()
    }

    /// Number of listeners registered for `kind`.
    pub fn count(&self, kind: &EventKind) -> usize {
        self.events.get(kind).map_or(0, Vec::len)
    }

    /// True once `kind` has been registered or emitted.
    pub fn is_declared(&self, kind: &EventKind) -> bool {
        self.events.contains_key(kind)
    }

    /// Snapshots the listeners for `event` and calls them in order.
    pub fn emit(&mut self, ctx: &mut C, event: &ItemEvent) {
        let listeners = self.snapshot(&event.kind);
        dispatch(ctx, &listeners, event);
    }
}

/// Calls every listener in `listeners` with `event`.
///
/// A panicking listener is logged and the loop moves on. A listener that is
/// already running further up the stack is skipped.
pub fn dispatch<C>(ctx: &mut C, listeners: &[Listener<C>], event: &ItemEvent) {
    trace!(
        "Dispatching {} to {} listener(s)",
        event.kind,
        listeners.len()
    );
    for listener in listeners {
        let Ok(mut callback) = listener.try_borrow_mut() else {
            warn!("Skipping re-entrant '{}' listener", event.kind);
            continue;
        };
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| (*callback)(ctx, event)));
        if let Err(payload) = outcome {
            warn!(
                "Listener for '{}' panicked: {}",
                event.kind,
                panic_message(payload.as_ref())
            );
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg
    } else {
        "non-string panic payload"
    }
}
