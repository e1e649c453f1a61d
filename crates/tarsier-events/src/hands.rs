//! The listener registry and its multiplexer slots.
//!
//! [§ 8.1.8.1 Event handlers](https://html.spec.whatwg.org/multipage/webappapis.html#event-handler-attributes)
//!
//! A legacy host gives each (target, event type) pair exactly one writable
//! callback slot. [`Hands`] owns those slots: the first registration for a
//! pair claims the slot with a multiplexer, after which every dispatch fans
//! out to the registry's ordered handler list for the pair. A foreign
//! handler found in the slot at claim time is absorbed to the front of the
//! list (when preservation is on), so it keeps firing first.

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::rc::Rc;

use tarsier_common::warning::warn_once;
use tarsier_dom::{DomTree, NodeId};
use tarsier_selector::{Eyes, SelectorError};

use crate::event::{Event, EventHandler, EventTarget, HandlerResult};

/// Virtual readiness event accepted by registration.
///
/// Legacy hosts never fire it; registrations are remapped to
/// (`Window`, [`LOAD_EVENT`]) instead.
pub const READY_EVENT: &str = "DOMContentLoaded";

/// The terminal load-completion event of the global environment object.
pub const LOAD_EVENT: &str = "load";

/// What a registration call can aim at: one concrete target, or every
/// element a selector resolves to.
#[derive(Debug, Clone, Copy)]
pub enum Subject<'a> {
    /// A selector string, resolved against the owned document.
    Selector(&'a str),
    /// One concrete target.
    Target(EventTarget),
}

impl<'a> From<&'a str> for Subject<'a> {
    fn from(selectors: &'a str) -> Self {
        Self::Selector(selectors)
    }
}

impl From<EventTarget> for Subject<'_> {
    fn from(target: EventTarget) -> Self {
        Self::Target(target)
    }
}

impl From<NodeId> for Subject<'_> {
    fn from(node: NodeId) -> Self {
        Self::Target(EventTarget::Node(node))
    }
}

/// The single native callback slot of one (target, type) pair.
///
/// Once `Multiplexer` is written the registry owns the slot for good;
/// removing every handler leaves an empty, harmless fan-out rather than
/// restoring the old occupant.
#[derive(Clone)]
enum NativeSlot {
    /// A foreign callback the host page put there (`on<type> = ...`).
    Handler(EventHandler),
    /// The registry's fan-out.
    Multiplexer,
}

/// Bookkeeping for one target that has ever had a listener registered.
struct ListenerEntry {
    /// Identity key; compared directly, never hashed.
    target: EventTarget,
    /// Event types whose pre-existing native handler was absorbed.
    native_preserved: HashSet<String>,
    /// Ordered handler lists, one per event type.
    handlers: HashMap<String, Vec<EventHandler>>,
}

impl ListenerEntry {
    fn new(target: EventTarget) -> Self {
        Self {
            target,
            native_preserved: HashSet::new(),
            handlers: HashMap::new(),
        }
    }
}

/// The listener registry.
///
/// Owns the document tree, the native slot table, and the per-target handler
/// lists. All methods take `&self`; interior mutability makes `on` and
/// `remove_listener` legal from inside a dispatched handler, and dispatch
/// snapshots the handler list so such reentrant calls never disturb the pass
/// in flight.
pub struct Hands {
    document: RefCell<DomTree>,
    eyes: RefCell<Eyes>,
    slots: RefCell<HashMap<(EventTarget, String), NativeSlot>>,
    registry: RefCell<BTreeMap<u64, ListenerEntry>>,
    id_counter: Cell<u64>,
    preserve_native: Cell<bool>,
    legacy_event_normalization: Cell<bool>,
}

impl Hands {
    /// A registry owning `document`. Preservation and legacy normalization
    /// both start enabled - the environments this crate exists for want
    /// both.
    #[must_use]
    pub fn new(document: DomTree) -> Self {
        Self {
            document: RefCell::new(document),
            eyes: RefCell::new(Eyes::new()),
            slots: RefCell::new(HashMap::new()),
            registry: RefCell::new(BTreeMap::new()),
            id_counter: Cell::new(0),
            preserve_native: Cell::new(true),
            legacy_event_normalization: Cell::new(true),
        }
    }

    /// Whether a pre-existing native handler is absorbed (true) or
    /// overwritten (false) when a slot is claimed.
    #[must_use]
    pub fn preserve_native(&self) -> bool {
        self.preserve_native.get()
    }

    /// Toggle native-handler preservation.
    pub fn set_preserve_native(&self, enabled: bool) {
        self.preserve_native.set(enabled);
    }

    /// Whether legacy events are normalized before fan-out.
    #[must_use]
    pub fn legacy_event_normalization(&self) -> bool {
        self.legacy_event_normalization.get()
    }

    /// Toggle legacy event normalization.
    pub fn set_legacy_event_normalization(&self, enabled: bool) {
        self.legacy_event_normalization.set(enabled);
    }

    /// Read access to the owned document.
    ///
    /// # Panics
    ///
    /// Panics if the document is mutably borrowed, e.g. while a
    /// [`Hands::document_mut`] guard is alive.
    #[must_use]
    pub fn document(&self) -> Ref<'_, DomTree> {
        self.document.borrow()
    }

    /// Write access to the owned document.
    ///
    /// # Panics
    ///
    /// Panics if the document is borrowed elsewhere.
    #[must_use]
    pub fn document_mut(&self) -> RefMut<'_, DomTree> {
        self.document.borrow_mut()
    }

    /// Re-scope selector resolution to the subtree under `scope`.
    pub fn watch(&self, scope: NodeId) {
        let _ = self.eyes.borrow_mut().watch(scope);
    }

    /// Resolve a selector string against the owned document.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError`] when the selector has no usable
    /// alternative.
    pub fn search(&self, selectors: &str) -> Result<Vec<NodeId>, SelectorError> {
        self.eyes.borrow().search(&self.document.borrow(), selectors)
    }

    /// Register `callback` for `event_type` on `subject`.
    ///
    /// A selector subject is resolved first and the callback is registered
    /// on each resolved element independently; a concrete subject is
    /// registered directly.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError`] when a selector subject fails to parse.
    /// Registration on a node absent from the tree is not an error - it
    /// warns and does nothing.
    pub fn on<'a>(
        &self,
        subject: impl Into<Subject<'a>>,
        event_type: &str,
        callback: EventHandler,
    ) -> Result<(), SelectorError> {
        match subject.into() {
            Subject::Selector(selectors) => {
                for node in self.search(selectors)? {
                    self.add_listener(
                        EventTarget::Node(node),
                        event_type,
                        Rc::clone(&callback),
                    );
                }
                Ok(())
            }
            Subject::Target(target) => {
                self.add_listener(target, event_type, callback);
                Ok(())
            }
        }
    }

    /// Register `callback` for `event_type` on one concrete target.
    ///
    /// The first registration for a (target, type) pair claims the native
    /// slot: a foreign occupant is absorbed to the front of the handler list
    /// when preservation is on (and simply overwritten when it is off), then
    /// the multiplexer is installed. The claim is permanent - removing every
    /// handler later leaves an empty fan-out, it does not restore the slot.
    pub fn add_listener(&self, target: EventTarget, event_type: &str, callback: EventHandler) {
        if let EventTarget::Node(node) = target
            && self.document.borrow().get(node).is_none()
        {
            warn_once(
                "events",
                &format!("unable to set event handler on missing node {node:?}, skipping"),
            );
            return;
        }

        // Legacy hosts only surface the terminal load event, so readiness
        // registrations move to the global object.
        let (target, event_type) = if event_type == READY_EVENT {
            (EventTarget::Window, LOAD_EVENT)
        } else {
            (target, event_type)
        };

        let mut registry = self.registry.borrow_mut();
        let key = Self::find_key(&registry, target).unwrap_or_else(|| {
            let next = self.id_counter.get() + 1;
            self.id_counter.set(next);
            next
        });
        let entry = registry
            .entry(key)
            .or_insert_with(|| ListenerEntry::new(target));

        if !entry.handlers.contains_key(event_type) {
            self.claim_slot(entry, target, event_type);
        }

        entry
            .handlers
            .entry(event_type.to_string())
            .or_default()
            .push(callback);
    }

    /// Claim the native slot for a pair that has no handler list yet,
    /// absorbing a preserved foreign occupant into the list front.
    fn claim_slot(&self, entry: &mut ListenerEntry, target: EventTarget, event_type: &str) {
        let slot_key = (target, event_type.to_string());
        let mut slots = self.slots.borrow_mut();

        let absorbed = match slots.get(&slot_key) {
            Some(NativeSlot::Handler(native))
                if self.preserve_native.get() && !entry.native_preserved.contains(event_type) =>
            {
                Some(Rc::clone(native))
            }
            _ => None,
        };
        if let Some(native) = absorbed {
            let _ = entry.native_preserved.insert(event_type.to_string());
            entry
                .handlers
                .entry(event_type.to_string())
                .or_default()
                .push(native);
        }

        // Installing the multiplexer also clears a non-preserved occupant,
        // so the old handler cannot fire twice.
        let _ = slots.insert(slot_key, NativeSlot::Multiplexer);
    }

    /// Unregister the first handler equal to `callback` (by reference
    /// identity) for `event_type` on `target`. Unknown targets, types, and
    /// callbacks are silent no-ops.
    pub fn remove_listener(&self, target: EventTarget, event_type: &str, callback: &EventHandler) {
        let mut registry = self.registry.borrow_mut();
        let Some(key) = Self::find_key(&registry, target) else {
            return;
        };
        let Some(entry) = registry.get_mut(&key) else {
            return;
        };
        let Some(handlers) = entry.handlers.get_mut(event_type) else {
            return;
        };
        if let Some(position) = handlers.iter().position(|h| Rc::ptr_eq(h, callback)) {
            let _ = handlers.remove(position);
        }
    }

    /// Deliver `event` to `target`, as the host would when the native slot
    /// fires.
    ///
    /// An empty slot delivers nothing; a foreign handler still occupying the
    /// slot is invoked directly; a multiplexed slot fans out to the handler
    /// list (normalizing a legacy event first when enabled) and returns the
    /// last handler's return value.
    pub fn fire(&self, target: EventTarget, event: &mut Event) -> HandlerResult {
        let slot = self
            .slots
            .borrow()
            .get(&(target, event.event_type.clone()))
            .cloned();
        match slot {
            None => None,
            Some(NativeSlot::Handler(native)) => native(event),
            Some(NativeSlot::Multiplexer) => self.dispatch(target, event),
        }
    }

    /// Fan out to the handler list for (target, event type).
    fn dispatch(&self, target: EventTarget, event: &mut Event) -> HandlerResult {
        // Snapshot before invoking anything: a handler registered during
        // this pass waits for the next dispatch, and a removal during this
        // pass cannot disturb the iteration.
        let snapshot: Vec<EventHandler> = {
            let registry = self.registry.borrow();
            Self::find_key(&registry, target)
                .and_then(|key| registry.get(&key))
                .and_then(|entry| entry.handlers.get(&event.event_type))
                .cloned()
                .unwrap_or_default()
        };

        if self.legacy_event_normalization.get() && !event.has_propagation_fns() {
            event.inject(target);
        }

        let mut result = None;
        for handler in &snapshot {
            result = handler(event);
        }
        result
    }

    /// Model the host page writing `on<type>` on a target before this
    /// registry claims it.
    ///
    /// Once a pair is multiplexed the registry owns its slot exclusively;
    /// a late write is refused with a warning instead of clobbering the
    /// fan-out.
    pub fn set_native_handler(&self, target: EventTarget, event_type: &str, handler: EventHandler) {
        let mut slots = self.slots.borrow_mut();
        let slot_key = (target, event_type.to_string());
        if matches!(slots.get(&slot_key), Some(NativeSlot::Multiplexer)) {
            warn_once(
                "events",
                &format!("refusing to overwrite the multiplexed {event_type} slot"),
            );
            return;
        }
        let _ = slots.insert(slot_key, NativeSlot::Handler(handler));
    }

    /// Whether any callback occupies the native slot for (target, type).
    #[must_use]
    pub fn native_slot_occupied(&self, target: EventTarget, event_type: &str) -> bool {
        self.slots
            .borrow()
            .contains_key(&(target, event_type.to_string()))
    }

    /// Whether the registry's multiplexer occupies the slot for
    /// (target, type).
    #[must_use]
    pub fn is_multiplexed(&self, target: EventTarget, event_type: &str) -> bool {
        matches!(
            self.slots.borrow().get(&(target, event_type.to_string())),
            Some(NativeSlot::Multiplexer)
        )
    }

    /// Number of handlers currently registered for (target, type),
    /// including an absorbed native handler.
    #[must_use]
    pub fn handler_count(&self, target: EventTarget, event_type: &str) -> usize {
        let registry = self.registry.borrow();
        Self::find_key(&registry, target)
            .and_then(|key| registry.get(&key))
            .and_then(|entry| entry.handlers.get(event_type))
            .map_or(0, Vec::len)
    }

    /// Whether a pre-existing native handler was absorbed for
    /// (target, type).
    #[must_use]
    pub fn preserved_native(&self, target: EventTarget, event_type: &str) -> bool {
        let registry = self.registry.borrow();
        Self::find_key(&registry, target)
            .and_then(|key| registry.get(&key))
            .is_some_and(|entry| entry.native_preserved.contains(event_type))
    }

    /// Reverse lookup by target identity.
    ///
    /// Deliberately a linear scan: targets are compared, never hashed, and
    /// registration volume is small and setup-time.
    fn find_key(registry: &BTreeMap<u64, ListenerEntry>, target: EventTarget) -> Option<u64> {
        registry
            .iter()
            .find(|(_, entry)| entry.target == target)
            .map(|(key, _)| *key)
    }
}

impl Default for Hands {
    fn default() -> Self {
        Self::new(DomTree::new())
    }
}
