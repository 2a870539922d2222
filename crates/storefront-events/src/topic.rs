//! Event names and their payload types.

use std::fmt::Debug;

/// An event name with exactly one payload type.
///
/// Implementors are normally uninhabited marker enums: the broker never
/// builds a value of the topic itself, it only keys handlers by its type.
/// A topic with no data uses `()` as its payload.
pub trait Topic: 'static {
    /// Data handed to every handler of this event.
    type Payload: Debug + 'static;

    /// Stable wire name (e.g. `"basket:changed"`), used in logs.
    const NAME: &'static str;
}
