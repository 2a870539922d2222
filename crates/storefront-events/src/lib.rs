//! Typed publish/subscribe broker for the storefront core.
//!
//! This crate provides:
//! - `Topic` - An event name bound to exactly one payload type
//! - `Broker` - Synchronous, re-entrant dispatcher with snapshot semantics
//! - `Subscription` - Token returned by `subscribe`, used to unsubscribe
//! - `Dispatch` - Per-publish report of handled and failed deliveries
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use storefront_events::{Broker, Topic};
//!
//! enum Greeted {}
//!
//! impl Topic for Greeted {
//!     type Payload = String;
//!     const NAME: &'static str = "greeted";
//! }
//!
//! let broker = Broker::shared();
//! let seen = Rc::new(std::cell::RefCell::new(Vec::new()));
//! let sink = Rc::clone(&seen);
//! broker.subscribe::<Greeted>(move |name| {
//!     sink.borrow_mut().push(name.clone());
//!     Ok(())
//! });
//!
//! let dispatch = broker.publish::<Greeted>("ada".to_string());
//! assert_eq!(dispatch.handled, 1);
//! assert_eq!(seen.borrow().as_slice(), ["ada".to_string()]);
//! ```

mod broker;
mod topic;

pub use broker::*;
pub use topic::*;
