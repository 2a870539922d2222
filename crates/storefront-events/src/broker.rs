//! Synchronous event dispatcher.

use std::any::{Any, TypeId};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use crate::topic::Topic;

/// Result returned by every event handler.
pub type HandlerResult = anyhow::Result<()>;

/// Type-erased storage for a handler of one payload type.
struct Handler<P>(Box<dyn Fn(&P) -> HandlerResult>);

struct Entry {
    id: u64,
    handler: Rc<dyn Any>,
}

/// Token identifying one registered handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription {
    topic: TypeId,
    name: &'static str,
    id: u64,
}

impl Subscription {
    /// Wire name of the event this handler listens to.
    pub fn topic_name(&self) -> &'static str {
        self.name
    }
}

/// Outcome of a single `publish` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dispatch {
    /// Handlers that ran to completion.
    pub handled: usize,
    /// Handlers that returned an error or panicked.
    pub failed: usize,
}

impl Dispatch {
    /// Total number of handlers invoked.
    pub fn invoked(&self) -> usize {
        self.handled + self.failed
    }

    /// Check if every invoked handler succeeded.
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

/// Publish/subscribe dispatcher.
///
/// Dispatch is synchronous: all handlers registered for an event run, in
/// registration order, before `publish` returns. The handler list is
/// snapshotted per publish, so handlers may subscribe, unsubscribe or
/// publish further events (including the one being dispatched) without
/// affecting the in-flight delivery.
///
/// A failing handler never stops the remaining ones and never reaches the
/// emitter: errors and panics are logged and counted in the returned
/// [`Dispatch`].
///
/// The broker is single-threaded. Share it with `Rc<Broker>`.
#[derive(Default)]
pub struct Broker {
    next_id: Cell<u64>,
    topics: RefCell<HashMap<TypeId, Vec<Entry>>>,
    failures: Cell<u64>,
}

impl Broker {
    /// Create an empty broker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty broker ready to be injected into several owners.
    pub fn shared() -> Rc<Self> {
        Rc::new(Self::new())
    }

    /// Register a handler for `T`.
    pub fn subscribe<T: Topic>(
        &self,
        handler: impl Fn(&T::Payload) -> HandlerResult + 'static,
    ) -> Subscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let handler: Rc<dyn Any> = Rc::new(Handler::<T::Payload>(Box::new(handler)));
        self.topics
            .borrow_mut()
            .entry(TypeId::of::<T>())
            .or_default()
            .push(Entry { id, handler });

        tracing::trace!(topic = T::NAME, subscription = id, "subscribed");

        Subscription {
            topic: TypeId::of::<T>(),
            name: T::NAME,
            id,
        }
    }

    /// Remove a previously registered handler.
    ///
    /// Returns `false` if the subscription was already gone.
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        let mut topics = self.topics.borrow_mut();
        let Some(entries) = topics.get_mut(&subscription.topic) else {
            return false;
        };

        let len_before = entries.len();
        entries.retain(|entry| entry.id != subscription.id);
        let removed = entries.len() < len_before;

        if entries.is_empty() {
            topics.remove(&subscription.topic);
        }
        if removed {
            tracing::trace!(
                topic = subscription.name,
                subscription = subscription.id,
                "unsubscribed"
            );
        }
        removed
    }

    /// Deliver `payload` to every handler currently registered for `T`.
    pub fn publish<T: Topic>(&self, payload: T::Payload) -> Dispatch {
        let snapshot: Vec<(u64, Rc<dyn Any>)> = match self.topics.borrow().get(&TypeId::of::<T>()) {
            Some(entries) => entries
                .iter()
                .map(|entry| (entry.id, Rc::clone(&entry.handler)))
                .collect(),
            None => Vec::new(),
        };

        tracing::debug!(topic = T::NAME, handlers = snapshot.len(), "publish");

        let mut dispatch = Dispatch::default();
        for (id, handler) in snapshot {
            let erased: &dyn Any = handler.as_ref();
            let Some(handler) = erased.downcast_ref::<Handler<T::Payload>>() else {
                continue;
            };

            match panic::catch_unwind(AssertUnwindSafe(|| (handler.0)(&payload))) {
                Ok(Ok(())) => dispatch.handled += 1,
                Ok(Err(error)) => {
                    dispatch.failed += 1;
                    self.failures.set(self.failures.get() + 1);
                    tracing::error!(
                        topic = T::NAME,
                        subscription = id,
                        error = %format!("{error:#}"),
                        "event handler failed"
                    );
                }
                Err(panic) => {
                    dispatch.failed += 1;
                    self.failures.set(self.failures.get() + 1);
                    tracing::error!(
                        topic = T::NAME,
                        subscription = id,
                        panic = panic_message(panic.as_ref()),
                        "event handler panicked"
                    );
                }
            }
        }

        dispatch
    }

    /// Number of handlers currently registered for `T`.
    pub fn subscriber_count<T: Topic>(&self) -> usize {
        self.topics
            .borrow()
            .get(&TypeId::of::<T>())
            .map_or(0, Vec::len)
    }

    /// Failed handler invocations since the broker was created.
    pub fn failure_count(&self) -> u64 {
        self.failures.get()
    }
}

impl fmt::Debug for Broker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let handlers: usize = self.topics.borrow().values().map(Vec::len).sum();
        f.debug_struct("Broker")
            .field("handlers", &handlers)
            .field("failures", &self.failures.get())
            .finish()
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}
