/// Marker trait for a family of events accepted by one [`crate::EventEmitter`].
///
/// A map type is never instantiated; it only ties events to the emitter that
/// may carry them, so that emitting an event of another family is a compile
/// error.
pub trait EventMap: 'static {}

/// A single event: its family, its name, and the positional arguments its
/// listeners receive.
///
/// `Args` is usually a tuple (`()` for events without arguments). Listeners
/// receive `&Args`, so tuple patterns work directly in closure parameters:
///
/// ```rust
/// use herald_events::{event_map, EventEmitter};
///
/// event_map! {
///     pub Editor {
///         Saved = "saved" => (String, bool),
///     }
/// }
///
/// let emitter = EventEmitter::<Editor>::new();
/// emitter.on::<Saved>(|(path, forced)| {
///     assert_eq!(path, "notes.md");
///     assert!(*forced);
/// });
/// emitter.emit::<Saved>(("notes.md".to_owned(), true));
/// ```
///
/// Names must be unique within one [`EventMap`]. The emitter keys listeners
/// by name only.
pub trait Event: 'static {
    /// The family this event belongs to.
    type Map: EventMap;
    /// Arguments forwarded to every listener.
    type Args: 'static;
    /// Key under which listeners of this event are stored.
    const NAME: &'static str;
}

/// Declares an [`EventMap`] and its events as uninhabited marker types.
///
/// ```rust
/// use herald_events::{event_map, Event};
///
/// event_map! {
///     /// Events raised by the session layer.
///     pub Session {
///         Opened = "opened" => (u64,),
///         Closed = "closed" => (u64, String),
///         Idle = "idle" => (),
///     }
/// }
///
/// assert_eq!(<Closed as Event>::NAME, "closed");
/// ```
#[macro_export]
macro_rules! event_map {
    (
        $(#[$map_meta:meta])*
        $vis:vis $map:ident {
            $(
                $(#[$event_meta:meta])*
                $event:ident = $name:literal => ($($arg:ty),* $(,)?)
            ),* $(,)?
        }
    ) => {
        $(#[$map_meta])*
        #[derive(Debug, Clone, Copy)]
        $vis enum $map {}

        impl $crate::EventMap for $map {}

        $(
            $(#[$event_meta])*
            #[derive(Debug, Clone, Copy)]
            $vis enum $event {}

            impl $crate::Event for $event {
                type Map = $map;
                type Args = ($($arg,)*);
                const NAME: &'static str = $name;
            }
        )*
    };
}
