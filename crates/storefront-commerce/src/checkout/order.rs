//! Order model: the checkout draft and its two sub-forms.

use std::rc::Rc;

use serde::{Deserialize, Serialize};
use storefront_events::Broker;

use crate::checkout::validation::{validate_contacts, validate_delivery};
use crate::checkout::{OrderRequest, PaymentMethod, ValidationError};
use crate::events::{ContactsErrors, ContactsValidity, DeliveryErrors, DeliveryValidity};
use crate::events::{FormErrors, FormValidity};
use crate::ids::ProductId;
use crate::model::Notifier;
use crate::money::Money;

/// The two independently validated halves of the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubForm {
    /// Address and payment method.
    Delivery,
    /// Email and phone.
    Contacts,
}

impl SubForm {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubForm::Delivery => "delivery",
            SubForm::Contacts => "contacts",
        }
    }
}

/// Validation state of one sub-form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "errors", rename_all = "snake_case")]
pub enum FormState {
    /// No field of the sub-form has been set yet.
    #[default]
    Untouched,
    /// Last validation failed with these errors, in display order.
    Invalid(Vec<ValidationError>),
    /// Last validation passed.
    Valid,
}

impl FormState {
    fn from_errors(errors: Vec<ValidationError>) -> Self {
        if errors.is_empty() {
            FormState::Valid
        } else {
            FormState::Invalid(errors)
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, FormState::Valid)
    }

    /// Errors of an invalid sub-form; empty otherwise.
    pub fn errors(&self) -> &[ValidationError] {
        match self {
            FormState::Invalid(errors) => errors,
            _ => &[],
        }
    }
}

/// Field values entered so far.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrderDraft {
    pub address: String,
    pub email: String,
    pub phone: String,
    pub payment: Option<PaymentMethod>,
}

/// In-progress checkout data.
///
/// Each setter re-validates only its own sub-form and publishes that
/// sub-form's validity, followed by its errors when invalid.
#[derive(Debug)]
pub struct OrderModel {
    notifier: Notifier,
    draft: OrderDraft,
    delivery: FormState,
    contacts: FormState,
}

impl OrderModel {
    pub fn new(broker: Rc<Broker>) -> Self {
        Self {
            notifier: Notifier::new(broker),
            draft: OrderDraft::default(),
            delivery: FormState::Untouched,
            contacts: FormState::Untouched,
        }
    }

    pub fn set_address(&mut self, address: impl Into<String>) -> &FormState {
        self.draft.address = address.into();
        self.revalidate_delivery()
    }

    pub fn set_payment_method(&mut self, method: PaymentMethod) -> &FormState {
        self.draft.payment = Some(method);
        self.revalidate_delivery()
    }

    pub fn set_email(&mut self, email: impl Into<String>) -> &FormState {
        self.draft.email = email.into();
        self.revalidate_contacts()
    }

    pub fn set_phone(&mut self, phone: impl Into<String>) -> &FormState {
        self.draft.phone = phone.into();
        self.revalidate_contacts()
    }

    /// Set email and phone together, validating once.
    pub fn set_contacts(&mut self, email: impl Into<String>, phone: impl Into<String>) -> &FormState {
        self.draft.email = email.into();
        self.draft.phone = phone.into();
        self.revalidate_contacts()
    }

    /// Re-run validation of one sub-form and publish its result.
    pub fn validate(&mut self, form: SubForm) -> &FormState {
        match form {
            SubForm::Delivery => self.revalidate_delivery(),
            SubForm::Contacts => self.revalidate_contacts(),
        }
    }

    /// Check if both sub-forms hold valid data.
    ///
    /// Computed from the current fields, so an untouched draft is invalid.
    /// Basket emptiness is the caller's concern.
    pub fn is_valid(&self) -> bool {
        validate_delivery(&self.draft.address, self.draft.payment).is_empty()
            && validate_contacts(&self.draft.email, &self.draft.phone).is_empty()
    }

    /// Reset every field and both sub-forms without publishing.
    pub fn clear(&mut self) {
        self.draft = OrderDraft::default();
        self.delivery = FormState::Untouched;
        self.contacts = FormState::Untouched;
    }

    pub fn draft(&self) -> &OrderDraft {
        &self.draft
    }

    pub fn delivery_state(&self) -> &FormState {
        &self.delivery
    }

    pub fn contacts_state(&self) -> &FormState {
        &self.contacts
    }

    pub fn state(&self, form: SubForm) -> &FormState {
        match form {
            SubForm::Delivery => &self.delivery,
            SubForm::Contacts => &self.contacts,
        }
    }

    /// Assemble the outbound request, or `None` while the draft is invalid.
    pub fn to_request(&self, items: Vec<ProductId>, total: Money) -> Option<OrderRequest> {
        if !self.is_valid() {
            return None;
        }
        let payment = self.draft.payment?;
        Some(OrderRequest {
            payment,
            email: self.draft.email.trim().to_string(),
            phone: self.draft.phone.trim().to_string(),
            address: self.draft.address.trim().to_string(),
            total,
            items,
        })
    }

    fn revalidate_delivery(&mut self) -> &FormState {
        let errors = validate_delivery(&self.draft.address, self.draft.payment);
        self.delivery = FormState::from_errors(errors.clone());
        tracing::debug!(form = SubForm::Delivery.as_str(), errors = errors.len(), "validated");

        self.notifier.notify::<DeliveryValidity>(FormValidity {
            valid: errors.is_empty(),
        });
        if !errors.is_empty() {
            self.notifier.notify::<DeliveryErrors>(FormErrors { errors });
        }
        &self.delivery
    }

    fn revalidate_contacts(&mut self) -> &FormState {
        let errors = validate_contacts(&self.draft.email, &self.draft.phone);
        self.contacts = FormState::from_errors(errors.clone());
        tracing::debug!(form = SubForm::Contacts.as_str(), errors = errors.len(), "validated");

        self.notifier.notify::<ContactsValidity>(FormValidity {
            valid: errors.is_empty(),
        });
        if !errors.is_empty() {
            self.notifier.notify::<ContactsErrors>(FormErrors { errors });
        }
        &self.contacts
    }
}
