//! Listener registry and event fan-out for the Tarsier crates.
//!
//! Legacy host environments expose exactly one native callback slot per
//! (element, event type) - the `on<type>` property - instead of
//! [§ 2.7 Interface EventTarget](https://dom.spec.whatwg.org/#interface-eventtarget)'s
//! `addEventListener`. This crate lets any number of independent listeners
//! share that single slot: the [`Hands`] registry keeps an ordered handler
//! list per (target, type) and installs one multiplexer in the slot that
//! fans out to the list, absorbing a pre-existing native handler so it keeps
//! firing first.
//!
//! Dispatch is flat: no capture or bubble phases, just the ordered list.

mod event;
mod hands;

pub use event::{Event, EventHandler, EventTarget, HandlerResult};
pub use hands::{Hands, LOAD_EVENT, READY_EVENT, Subject};
