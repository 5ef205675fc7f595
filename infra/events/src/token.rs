use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Teardown supplied by the emitter when a listener is registered.
type InvalidateAction = Box<dyn FnOnce() + Send>;

enum TokenState {
    Valid(InvalidateAction),
    Invalidated,
}

/// A one-shot handle that revokes exactly one listener registration.
///
/// Returned by [`crate::EventEmitter::on`] and [`crate::EventEmitter::once`].
/// The token knows nothing about the emitter that issued it; it only owns the
/// teardown action the emitter handed over. Clones share one state, so the
/// action runs at most once no matter which clone is invalidated or how often.
///
/// Dropping a token does not remove the listener.
#[derive(Clone)]
pub struct ListenerToken {
    state: Arc<Mutex<TokenState>>,
}

impl ListenerToken {
    pub(crate) fn new(action: impl FnOnce() + Send + 'static) -> Self {
        Self { state: Arc::new(Mutex::new(TokenState::Valid(Box::new(action)))) }
    }

    /// Revokes the registration this token stands for.
    ///
    /// Returns `true` on the first call, after the listener has been removed.
    /// Every later call, from this token or any clone of it, does nothing and
    /// returns `false`.
    pub fn invalidate(&self) -> bool {
        // The lock is released before the action runs: the action reenters the
        // emitter, and listeners may hold clones of this token.
        let previous = std::mem::replace(&mut *self.state.lock(), TokenState::Invalidated);
        match previous {
            TokenState::Valid(action) => {
                action();
                true
            },
            TokenState::Invalidated => false,
        }
    }

    fn is_valid(&self) -> bool {
        matches!(*self.state.lock(), TokenState::Valid(_))
    }
}

impl fmt::Debug for ListenerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerToken").field("valid", &self.is_valid()).finish()
    }
}
