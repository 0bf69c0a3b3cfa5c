#![forbid(unsafe_code)]

//! Synchronous change notification with RAII subscriptions.
//!
//! # Design
//!
//! A [`Notifier<T>`] keeps its subscribers as weak references. The strong
//! side of each callback lives in the [`Subscription`] guard returned by
//! [`Notifier::subscribe`], so dropping the guard is how a subscriber
//! unregisters. Dead entries are pruned lazily on the next [`Notifier::notify`].
//!
//! # Invariants
//!
//! 1. Callbacks run synchronously, in registration order, inside `notify()`.
//! 2. A callback whose guard was dropped is never invoked afterwards, even if
//!    the drop happens earlier in the same notification round.
//! 3. A callback registered during a notification round is first invoked on
//!    the next round.
//!
//! # Failure Modes
//!
//! - **Subscriber leak**: guards stored forever keep their callbacks alive.
//! - **Panicking callback**: the panic unwinds through `notify()`; later
//!   subscribers in that round are skipped.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::trace;

type CallbackRc<T> = Rc<dyn Fn(&T)>;
type CallbackWeak<T> = Weak<dyn Fn(&T)>;

/// Registry of callbacks interested in changes to a `T`.
///
/// The notifier holds no value of its own: the owner decides when something
/// changed and passes the current state to [`notify`](Self::notify).
pub struct Notifier<T: 'static> {
    subscribers: RefCell<Vec<CallbackWeak<T>>>,
}

impl<T: 'static> Default for Notifier<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> std::fmt::Debug for Notifier<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

impl<T: 'static> Notifier<T> {
    /// Create a notifier with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            subscribers: RefCell::new(Vec::new()),
        }
    }

    /// Register `callback`. It stays registered until the returned guard is
    /// dropped or [`Subscription::unsubscribe`] is called.
    ///
    /// Safe to call from inside a callback that is currently being notified.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let strong: CallbackRc<T> = Rc::new(callback);
        self.subscribers.borrow_mut().push(Rc::downgrade(&strong));
        Subscription {
            _guard: Box::new(strong),
        }
    }

    /// Invoke every live subscriber with `value`, in registration order.
    ///
    /// The subscriber list is not borrowed while callbacks run, so callbacks
    /// may subscribe, unsubscribe, or trigger a nested `notify()`.
    pub fn notify(&self, value: &T) {
        let round: Vec<CallbackWeak<T>> = {
            let mut subscribers = self.subscribers.borrow_mut();
            subscribers.retain(|w| w.strong_count() > 0);
            subscribers.clone()
        };

        trace!(subscribers = round.len(), "notify");

        for weak in &round {
            // Upgrade per call so a guard dropped earlier in this round is honored.
            if let Some(callback) = weak.upgrade() {
                callback(value);
            }
        }
    }

    /// Number of registered subscribers, including dead ones not yet pruned.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    /// Number of subscribers whose guards are still alive.
    #[must_use]
    pub fn live_subscriber_count(&self) -> usize {
        self.subscribers
            .borrow()
            .iter()
            .filter(|w| w.strong_count() > 0)
            .count()
    }
}

/// RAII guard for a registered callback.
///
/// Dropping the guard drops the only strong reference to the callback, so
/// the notifier's weak entry stops upgrading.
#[must_use = "dropping a Subscription unsubscribes its callback"]
pub struct Subscription {
    _guard: Box<dyn std::any::Any>,
}

impl Subscription {
    /// Unregister the callback now. Equivalent to dropping the guard.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
