//! # Herald Events
//!
//! A strongly typed, synchronous event emitter for in-process notifications.
//!
//! ## Overview
//!
//! An [`EventEmitter`] stores listener callbacks per event name and calls them,
//! in registration order, whenever the event is emitted. Every registration
//! returns a [`ListenerToken`]: invalidating it removes exactly that
//! registration, once.
//!
//! ## Features
//!
//! * **Type-Safe**: Events are declared with [`event_map!`]; each event fixes its
//!   argument tuple, and an emitter only accepts events of its own map.
//! * **Fire-once listeners**: [`EventEmitter::once`] removes itself after the first call.
//! * **Reentrant**: Listeners may register, emit, or invalidate while an emission
//!   is in progress. Each emission works on a copy of the listener list.
//! * **Bulk teardown**: [`EventEmitter::remove_all_listeners`] invalidates every
//!   outstanding token.
//! * **Observable**: Registration, emission and teardown are traced with `tracing`,
//!   and a configurable threshold warns about listener leaks.
//!
//! Delivery is synchronous and listener panics are not caught.
//!
//! # Example
//!
//! ```rust
//! use herald_events::{event_map, EventEmitter};
//! use std::sync::{Arc, Mutex};
//!
//! event_map! {
//!     pub Orders {
//!         Placed = "placed" => (u64, String),
//!         Cancelled = "cancelled" => (u64,),
//!     }
//! }
//!
//! let emitter = EventEmitter::<Orders>::new();
//! let log = Arc::new(Mutex::new(Vec::new()));
//!
//! let sink = Arc::clone(&log);
//! let token = emitter.on::<Placed>(move |(id, customer)| {
//!     sink.lock().unwrap().push(format!("{id}:{customer}"));
//! });
//!
//! emitter.emit::<Placed>((7, "ada".to_owned()));
//! assert_eq!(*log.lock().unwrap(), vec!["7:ada".to_owned()]);
//!
//! assert!(token.invalidate());
//! assert!(!token.invalidate());
//! assert_eq!(emitter.listeners_count(None), 0);
//! ```

mod config;
mod emitter;
mod error;
mod event;
mod token;

pub use config::EmitterConfig;
pub use emitter::EventEmitter;
pub use error::{EmitterError, EmitterErrorExt};
pub use event::{Event, EventMap};
pub use token::ListenerToken;
