//! The closed catalogue of broker topics.
//!
//! Every event the storefront exchanges is declared here, each bound to
//! exactly one payload type. Intent events originate in the view layer,
//! change events in the models, and workflow events in the mediator.

use std::fmt;

use serde::{Deserialize, Serialize};
use storefront_events::Topic;

use crate::basket::BasketSnapshot;
use crate::catalog::Product;
use crate::checkout::{CheckoutStep, OrderReceipt, PaymentMethod, ValidationError};
use crate::ids::ProductId;

/// Macro to declare uninhabited topic markers with their payloads.
macro_rules! define_events {
    ($($(#[$meta:meta])* $name:ident => $payload:ty = $wire:literal;)*) => {
        $(
            $(#[$meta])*
            #[derive(Debug)]
            pub enum $name {}

            impl Topic for $name {
                type Payload = $payload;
                const NAME: &'static str = $wire;
            }
        )*

        #[cfg(test)]
        const EVENT_NAMES: &[&str] = &[$($wire),*];
    };
}

define_events! {
    // Catalog
    /// The catalog content was replaced.
    CatalogLoaded => CatalogSnapshot = "catalog:loaded";
    /// The user picked a product card.
    ProductSelect => ProductRef = "product:select";
    /// A resolved product ready for the preview view.
    ProductPreview => ProductPreviewed = "product:preview";

    // Basket
    /// The user asked to put a product in the basket.
    BasketAdd => ProductRef = "basket:add";
    /// The user asked to take a product out of the basket.
    BasketRemove => ProductRef = "basket:remove";
    /// The user opened the basket.
    BasketOpen => () = "basket:open";
    /// The basket content changed.
    BasketChanged => BasketSnapshot = "basket:changed";

    // Checkout input
    /// The user started checkout from the basket.
    CheckoutOpen => () = "order:open";
    /// The user chose a payment method.
    PaymentSelect => PaymentSelected = "order:payment:select";
    /// The user edited the delivery address.
    AddressInput => AddressEntered = "order:address:set";
    /// The user edited email and phone.
    ContactsInput => ContactsEntered = "order:contacts:set";
    /// The user submitted the delivery sub-form.
    DeliverySubmitted => () = "order:submit";
    /// The user submitted the contacts sub-form.
    ContactsConfirmed => () = "contacts:submit";
    /// Place the order.
    OrderConfirm => () = "order:confirm";
    /// The user dismissed the current dialog.
    ModalClose => () = "modal:close";

    // Checkout validation
    /// Validity of the delivery sub-form.
    DeliveryValidity => FormValidity = "order:form:valid";
    /// Errors of an invalid delivery sub-form.
    DeliveryErrors => FormErrors = "order:form:errors";
    /// Validity of the contacts sub-form.
    ContactsValidity => FormValidity = "contacts:form:valid";
    /// Errors of an invalid contacts sub-form.
    ContactsErrors => FormErrors = "contacts:form:errors";

    // Workflow
    /// The visible checkout step changed.
    CheckoutStepChanged => CheckoutStep = "checkout:step";
    /// An intent was refused by the mediator.
    OrderRejected => OrderRejection = "order:rejected";
    /// Forms must drop their displayed state.
    OrderReset => () = "order:reset";
    /// The server accepted the order.
    OrderSuccess => OrderReceipt = "order:success";
    /// A remote call failed.
    ApiFailed => ApiFailure = "api:failed";
}

/// Payload of [`CatalogLoaded`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub products: Vec<Product>,
}

/// A product referenced by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRef {
    pub product_id: ProductId,
}

impl ProductRef {
    pub fn new(product_id: impl Into<ProductId>) -> Self {
        Self {
            product_id: product_id.into(),
        }
    }
}

/// Payload of [`ProductPreview`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPreviewed {
    pub product: Product,
    /// Whether the product is already in the basket.
    pub in_basket: bool,
}

/// Payload of [`PaymentSelect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSelected {
    pub method: PaymentMethod,
}

/// Payload of [`AddressInput`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressEntered {
    pub address: String,
}

/// Payload of [`ContactsInput`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactsEntered {
    pub email: String,
    pub phone: String,
}

/// Validity flag of one sub-form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormValidity {
    pub valid: bool,
}

/// Ordered error list of one sub-form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormErrors {
    pub errors: Vec<ValidationError>,
}

impl FormErrors {
    /// Error messages joined for display.
    pub fn message(&self) -> String {
        self.errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(". ")
    }
}

/// Why the mediator refused an intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "product_id", rename_all = "snake_case")]
pub enum RejectionReason {
    /// An order submission is already waiting for the server.
    SubmissionInFlight,
    /// Delivery or contacts data is invalid.
    InvalidOrder,
    /// Nothing to order.
    EmptyBasket,
    /// The product has no price.
    NotForSale(ProductId),
    /// The product is not in the catalog.
    UnknownProduct(ProductId),
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionReason::SubmissionInFlight => write!(f, "an order is already being submitted"),
            RejectionReason::InvalidOrder => write!(f, "the order form is incomplete"),
            RejectionReason::EmptyBasket => write!(f, "the basket is empty"),
            RejectionReason::NotForSale(id) => write!(f, "product {} is not for sale", id),
            RejectionReason::UnknownProduct(id) => write!(f, "product {} is not in the catalog", id),
        }
    }
}

/// Payload of [`OrderRejected`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRejection {
    pub reason: RejectionReason,
}

/// Remote operations the mediator performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiOperation {
    FetchProducts,
    SubmitOrder,
}

impl ApiOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiOperation::FetchProducts => "fetch_products",
            ApiOperation::SubmitOrder => "submit_order",
        }
    }
}

/// Payload of [`ApiFailed`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiFailure {
    pub operation: ApiOperation,
    pub message: String,
}
