//! Event objects and handler types.
//!
//! [§ 2.2 Interface Event](https://dom.spec.whatwg.org/#interface-event)
//!
//! Modern hosts create events that already carry `preventDefault` and
//! `stopPropagation`; legacy hosts instead expose the writable fields
//! `returnValue` and `cancelBubble` (and `srcElement` in place of `target`).
//! [`Event`] models both generations: on a modern event the methods flip the
//! standard flags, on a legacy event they stay inert until the registry
//! normalizes the object, after which they route through the legacy fields.

use std::rc::Rc;
use tarsier_dom::NodeId;

/// A handler's return value; `Some(false)` is the conventional legacy
/// "cancel the default action" return.
pub type HandlerResult = Option<bool>;

/// A registered callback. Handlers are compared by reference identity
/// ([`Rc::ptr_eq`]), so the same `Rc` must be used to remove a handler.
pub type EventHandler = Rc<dyn Fn(&mut Event) -> HandlerResult>;

/// What an event can be aimed at: an element of the tree, or the global
/// environment object (which owns the terminal `load` event).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTarget {
    /// The global environment object.
    Window,
    /// An element in the document tree.
    Node(NodeId),
}

/// A dispatched event.
#[derive(Debug, Clone)]
pub struct Event {
    /// The event type this object was created for (`click`, `load`, ...).
    pub event_type: String,

    /// [§ 2.2](https://dom.spec.whatwg.org/#dom-event-target)
    /// Set by modern hosts at creation; synthesized during normalization on
    /// legacy events.
    pub target: Option<EventTarget>,

    /// Legacy stand-in for `target`; consulted first during normalization.
    pub src_element: Option<EventTarget>,

    /// Legacy cancel slot; `Some(false)` means the default action is off.
    pub return_value: Option<bool>,

    /// Legacy propagation slot; `true` stops further propagation.
    pub cancel_bubble: bool,

    default_prevented: bool,
    propagation_stopped: bool,
    /// Whether the host supplied the modern propagation methods.
    native_propagation_fns: bool,
    /// Whether normalization installed legacy fallbacks for them.
    injected: bool,
}

impl Event {
    /// An event as a modern host would create it.
    #[must_use]
    pub fn new(event_type: &str) -> Self {
        Self {
            event_type: event_type.to_string(),
            target: None,
            src_element: None,
            return_value: None,
            cancel_bubble: false,
            default_prevented: false,
            propagation_stopped: false,
            native_propagation_fns: true,
            injected: false,
        }
    }

    /// An event as a legacy host would create it: no propagation methods,
    /// no `target`.
    #[must_use]
    pub fn legacy(event_type: &str) -> Self {
        Self {
            native_propagation_fns: false,
            ..Self::new(event_type)
        }
    }

    /// A legacy event carrying the host's `srcElement` field.
    #[must_use]
    pub fn legacy_from(event_type: &str, src_element: EventTarget) -> Self {
        Self {
            src_element: Some(src_element),
            ..Self::legacy(event_type)
        }
    }

    /// Whether this event currently carries working propagation methods,
    /// native or injected.
    #[must_use]
    pub const fn has_propagation_fns(&self) -> bool {
        self.native_propagation_fns || self.injected
    }

    /// Normalize a legacy event before fan-out: aim `target` at the legacy
    /// `srcElement` when the host set one, otherwise at the element the
    /// multiplexer fired on, and make the propagation methods work through
    /// the legacy fields.
    pub(crate) fn inject(&mut self, fired_on: EventTarget) {
        self.target = Some(self.src_element.unwrap_or(fired_on));
        self.injected = true;
    }

    /// [§ 2.2](https://dom.spec.whatwg.org/#dom-event-preventdefault)
    /// On a legacy event this writes `return_value`; inert until the event
    /// is normalized.
    pub fn prevent_default(&mut self) {
        if self.native_propagation_fns {
            self.default_prevented = true;
        } else if self.injected {
            self.return_value = Some(false);
        }
    }

    /// [§ 2.2](https://dom.spec.whatwg.org/#dom-event-stoppropagation)
    /// On a legacy event this writes `cancel_bubble`; inert until the event
    /// is normalized.
    pub fn stop_propagation(&mut self) {
        if self.native_propagation_fns {
            self.propagation_stopped = true;
        } else if self.injected {
            self.cancel_bubble = true;
        }
    }

    /// Whether the default action was cancelled, through either generation's
    /// mechanism.
    #[must_use]
    pub const fn default_prevented(&self) -> bool {
        self.default_prevented || matches!(self.return_value, Some(false))
    }

    /// Whether propagation was stopped, through either generation's
    /// mechanism.
    #[must_use]
    pub const fn propagation_stopped(&self) -> bool {
        self.propagation_stopped || self.cancel_bubble
    }
}
