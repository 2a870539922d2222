//! Checkout module.
//!
//! Contains the checkout steps, payment methods, form validation, the
//! order model and the request/receipt types exchanged with the server.

mod flow;
mod order;
mod payment;
mod request;
mod validation;

pub use flow::CheckoutStep;
pub use order::{FormState, OrderDraft, OrderModel, SubForm};
pub use payment::PaymentMethod;
pub use request::{OrderReceipt, OrderRequest};
pub use validation::{is_email, is_phone, validate_contacts, validate_delivery, ValidationError};
