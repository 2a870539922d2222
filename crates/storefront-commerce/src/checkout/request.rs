//! Order request and receipt exchanged with the server.

use serde::{Deserialize, Serialize};

use crate::checkout::PaymentMethod;
use crate::ids::{OrderId, ProductId};
use crate::money::Money;

/// Outbound order assembled from the basket and the order draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub payment: PaymentMethod,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub total: Money,
    pub items: Vec<ProductId>,
}

/// Server acknowledgement of a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderReceipt {
    pub id: OrderId,
    pub total: Money,
}
