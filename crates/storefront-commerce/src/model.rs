//! Change-notifying base shared by every domain model.

use std::rc::Rc;

use storefront_events::{Broker, Dispatch, Topic};

/// Publishes a model's state changes through the injected broker.
///
/// Models embed a `Notifier` instead of reaching for a global bus, so tests
/// can build as many isolated model graphs as they need.
#[derive(Debug, Clone)]
pub struct Notifier {
    broker: Rc<Broker>,
}

impl Notifier {
    /// Create a notifier bound to `broker`.
    pub fn new(broker: Rc<Broker>) -> Self {
        Self { broker }
    }

    /// Announce a state change.
    pub(crate) fn notify<T: Topic>(&self, payload: T::Payload) -> Dispatch {
        self.broker.publish::<T>(payload)
    }
}
