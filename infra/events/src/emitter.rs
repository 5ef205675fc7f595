use crate::config::EmitterConfig;
use crate::event::{Event, EventMap};
use crate::token::ListenerToken;
use fxhash::FxHashMap;
use parking_lot::Mutex;
use std::any::Any;
use std::collections::hash_map::Entry;
use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::{debug, error, trace, warn};

/// Identity of one registration. Registering the same closure twice yields two ids.
type ListenerId = u64;

/// A listener with its argument type erased, so one map can hold every event of a family.
type ErasedListener = Arc<dyn Any + Send + Sync>;

struct Listener<A: 'static> {
    callback: Box<dyn Fn(&A) + Send + Sync>,
}

#[derive(Default)]
struct Registry {
    /// An entry exists only while its sequence is non-empty.
    listeners: FxHashMap<&'static str, Vec<(ListenerId, ErasedListener)>>,
    tokens: FxHashMap<ListenerId, ListenerToken>,
}

struct Shared {
    config: EmitterConfig,
    registry: Mutex<Registry>,
    next_id: AtomicU64,
}

impl Shared {
    fn remove_listener(&self, event: &'static str, id: ListenerId) {
        let removed = {
            let mut registry = self.registry.lock();
            let token = registry.tokens.remove(&id);
            let listener = match registry.listeners.entry(event) {
                Entry::Occupied(mut entry) => {
                    let listeners = entry.get_mut();
                    let listener = listeners
                        .iter()
                        .position(|(listener_id, _)| *listener_id == id)
                        .map(|index| listeners.remove(index));
                    if listeners.is_empty() {
                        entry.remove();
                    }
                    listener
                },
                Entry::Vacant(_) => None,
            };
            (token, listener)
        };

        trace!(
            emitter = %self.config.name,
            event,
            id,
            found = removed.1.is_some(),
            "Listener removed"
        );
        // Captured state is released outside the lock.
        drop(removed);
    }

    fn check_leak(&self, event: &'static str, count: usize) {
        let max = self.config.max_listeners;
        if max > 0 && max.checked_add(1) == Some(count) {
            warn!(
                emitter = %self.config.name,
                event,
                count,
                max_listeners = max,
                "Possible listener leak: listener count exceeds the configured maximum"
            );
        }
    }
}

/// A strongly typed, synchronous event emitter.
///
/// Listeners are grouped by event name and called in registration order.
/// Every registration returns a [`ListenerToken`] that removes exactly that
/// registration when invalidated.
///
/// The emitter is a cheap handle: clones share the same listeners. Internal
/// state sits behind a `parking_lot::Mutex` that is never held while a
/// listener runs, so listeners may register, emit, or invalidate on the same
/// emitter without deadlocking.
///
/// # Example
///
/// ```rust
/// use herald_events::{event_map, EventEmitter};
///
/// event_map! {
///     pub Jobs {
///         Started = "started" => (u32,),
///         Finished = "finished" => (u32, bool),
///     }
/// }
///
/// let emitter = EventEmitter::<Jobs>::new();
/// let token = emitter.on::<Finished>(|(id, ok)| println!("job {id} finished: {ok}"));
/// emitter.once::<Started>(|(id,)| println!("first job {id} started"));
///
/// assert_eq!(emitter.listeners_count(None), 2);
/// emitter.emit::<Started>((1,));
/// assert_eq!(emitter.listeners_count_for::<Started>(), 0);
///
/// assert!(token.invalidate());
/// assert!(emitter.event_names().is_empty());
/// ```
pub struct EventEmitter<M: EventMap> {
    shared: Arc<Shared>,
    _map: PhantomData<fn() -> M>,
}

impl<M: EventMap> EventEmitter<M> {
    /// Creates an empty emitter with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EmitterConfig::default())
    }

    /// Creates an empty emitter with the given configuration.
    #[must_use]
    pub fn with_config(config: EmitterConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                config,
                registry: Mutex::new(Registry::default()),
                next_id: AtomicU64::new(1),
            }),
            _map: PhantomData,
        }
    }

    /// Returns the configuration this emitter was created with.
    #[must_use]
    pub fn config(&self) -> &EmitterConfig {
        &self.shared.config
    }

    /// Appends `listener` to the listeners of `E`.
    ///
    /// The same closure logic may be registered any number of times; each
    /// registration is tracked and removed independently.
    pub fn on<E>(&self, listener: impl Fn(&E::Args) + Send + Sync + 'static) -> ListenerToken
    where
        E: Event<Map = M>,
    {
        let listener: Listener<E::Args> = Listener { callback: Box::new(listener) };
        let (id, token) = self.issue_token(E::NAME);
        self.insert(E::NAME, id, &token, Arc::new(listener));
        token
    }

    /// Registers `listener` to be called on the next emission of `E` only.
    ///
    /// The returned token belongs to the internal wrapper registration, so
    /// invalidating it before any emission cancels the listener. After the
    /// wrapper fires it invalidates its own token, and the listener is gone
    /// before any later `emit`.
    pub fn once<E>(&self, listener: impl FnOnce(&E::Args) + Send + 'static) -> ListenerToken
    where
        E: Event<Map = M>,
    {
        let (id, token) = self.issue_token(E::NAME);
        let pending = Mutex::new(Some(listener));

        // The wrapper owns its token before it becomes visible to `emit`.
        let own_token = token.clone();
        let wrapper: Listener<E::Args> = Listener {
            callback: Box::new(move |args: &E::Args| {
                // Taken before the call: a nested emit of the same event must not run it again.
                let listener = pending.lock().take();
                if let Some(listener) = listener {
                    listener(args);
                }
                own_token.invalidate();
            }),
        };

        self.insert(E::NAME, id, &token, Arc::new(wrapper));
        token
    }

    /// Calls every listener of `E` with `args`, in registration order.
    ///
    /// The listener list is copied before the first call. Listeners added
    /// during this pass are not called until the next `emit`; listeners
    /// removed during this pass still receive this call.
    ///
    /// A panicking listener is not caught: the panic reaches the caller and
    /// the remaining listeners of this pass are skipped.
    pub fn emit<E>(&self, args: E::Args)
    where
        E: Event<Map = M>,
    {
        let snapshot: Vec<ErasedListener> = {
            let registry = self.shared.registry.lock();
            registry.listeners.get(E::NAME).map_or_else(Vec::new, |listeners| {
                listeners.iter().map(|(_, listener)| Arc::clone(listener)).collect()
            })
        };

        trace!(
            emitter = %self.shared.config.name,
            event = E::NAME,
            listeners = snapshot.len(),
            "Emitting event"
        );

        for listener in snapshot {
            match listener.downcast_ref::<Listener<E::Args>>() {
                Some(listener) => (listener.callback)(&args),
                None => error!(
                    emitter = %self.shared.config.name,
                    event = E::NAME,
                    args = std::any::type_name::<E::Args>(),
                    "Listener signature does not match the emitted event; skipping"
                ),
            }
        }
    }

    /// Returns the names of all events with at least one listener.
    ///
    /// The order is unspecified.
    #[must_use]
    pub fn event_names(&self) -> Vec<&'static str> {
        self.shared.registry.lock().listeners.keys().copied().collect()
    }

    /// Returns the number of listeners registered for `event`, or for all
    /// events when `event` is `None`. Unknown events count as zero.
    #[must_use]
    pub fn listeners_count(&self, event: Option<&str>) -> usize {
        let registry = self.shared.registry.lock();
        match event {
            Some(event) => registry.listeners.get(event).map_or(0, Vec::len),
            None => registry.listeners.values().map(Vec::len).sum(),
        }
    }

    /// Returns the number of listeners registered for `E`.
    #[must_use]
    pub fn listeners_count_for<E>(&self) -> usize
    where
        E: Event<Map = M>,
    {
        self.listeners_count(Some(E::NAME))
    }

    /// Invalidates every token issued by this emitter that is still valid.
    ///
    /// Afterwards no event has listeners. Safe to call on an empty emitter.
    pub fn remove_all_listeners(&self) {
        let tokens: Vec<ListenerToken> =
            self.shared.registry.lock().tokens.values().cloned().collect();

        debug!(
            emitter = %self.shared.config.name,
            tokens = tokens.len(),
            "Removing all listeners"
        );

        for token in tokens {
            token.invalidate();
        }
    }

    /// Reserves an id for a registration of `event` and builds the token that revokes it.
    fn issue_token(&self, event: &'static str) -> (ListenerId, ListenerToken) {
        let id = self.shared.next_id.fetch_add(1, Ordering::Relaxed);

        let shared: Weak<Shared> = Arc::downgrade(&self.shared);
        let token = ListenerToken::new(move || {
            if let Some(shared) = shared.upgrade() {
                shared.remove_listener(event, id);
            }
        });
        (id, token)
    }

    fn insert(
        &self,
        event: &'static str,
        id: ListenerId,
        token: &ListenerToken,
        listener: ErasedListener,
    ) {
        let count = {
            let mut registry = self.shared.registry.lock();
            let listeners = registry.listeners.entry(event).or_default();
            listeners.push((id, listener));
            let count = listeners.len();
            registry.tokens.insert(id, token.clone());
            count
        };

        trace!(emitter = %self.shared.config.name, event, id, count, "Listener registered");
        self.shared.check_leak(event, count);
    }
}

impl<M: EventMap> Default for EventEmitter<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: EventMap> Clone for EventEmitter<M> {
    fn clone(&self) -> Self {
        Self { shared: Arc::clone(&self.shared), _map: PhantomData }
    }
}

impl<M: EventMap> fmt::Debug for EventEmitter<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.shared.registry.lock();
        f.debug_struct("EventEmitter")
            .field("name", &self.shared.config.name)
            .field("events", &registry.listeners.len())
            .field("tokens", &registry.tokens.len())
            .finish()
    }
}
