//! Checkout mediator.
//!
//! The mediator owns the three models, is the only caller of the remote
//! [`CommerceApi`], and turns view intents into model mutations and
//! workflow events.
//!
//! Everything runs on one thread. Order submission is spawned with
//! [`tokio::task::spawn_local`], so the mediator must be driven from
//! inside a [`tokio::task::LocalSet`].

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::rc::Rc;

use storefront_commerce::basket::{BasketModel, BasketSnapshot};
use storefront_commerce::catalog::CatalogModel;
use storefront_commerce::checkout::{
    CheckoutStep, OrderDraft, OrderModel, OrderReceipt, OrderRequest, SubForm,
};
use storefront_commerce::events::*;
use storefront_commerce::ProductId;
use storefront_data::CommerceApi;
use storefront_events::{Broker, Subscription, Topic};
use tokio::task::JoinHandle;

use crate::CheckoutError;

/// Clears the in-flight flag when the submission ends, however it ends.
struct SubmissionGuard(Rc<Cell<bool>>);

impl Drop for SubmissionGuard {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// A validated order holding the in-flight flag.
struct Submission {
    request: OrderRequest,
    guard: SubmissionGuard,
}

type Intent<P> = fn(&Rc<CheckoutMediator>, &P) -> Result<(), CheckoutError>;

/// Coordinates the catalog, basket and order models.
pub struct CheckoutMediator {
    broker: Rc<Broker>,
    api: Rc<dyn CommerceApi>,
    catalog: Rc<CatalogModel>,
    basket: RefCell<BasketModel>,
    order: RefCell<OrderModel>,
    step: Cell<CheckoutStep>,
    submitting: Rc<Cell<bool>>,
    subscriptions: RefCell<Vec<Subscription>>,
}

impl CheckoutMediator {
    /// Build the models on `broker` and subscribe to view intents.
    pub fn new(broker: Rc<Broker>, api: Rc<dyn CommerceApi>) -> Rc<Self> {
        let catalog = Rc::new(CatalogModel::new(Rc::clone(&broker)));
        let basket = BasketModel::new(Rc::clone(&broker), Rc::clone(&catalog));
        let order = OrderModel::new(Rc::clone(&broker));

        let mediator = Rc::new(Self {
            broker,
            api,
            catalog,
            basket: RefCell::new(basket),
            order: RefCell::new(order),
            step: Cell::new(CheckoutStep::Browsing),
            submitting: Rc::new(Cell::new(false)),
            subscriptions: RefCell::new(Vec::new()),
        });
        mediator.attach();
        mediator
    }

    fn attach(self: &Rc<Self>) {
        self.on::<ProductSelect>(|this, r| this.preview(&r.product_id));
        self.on::<BasketAdd>(|this, r| this.add_to_basket(&r.product_id));
        self.on::<BasketRemove>(|this, r| this.remove_from_basket(&r.product_id));
        self.on::<BasketOpen>(|this, _| {
            this.set_step(CheckoutStep::Basket);
            Ok(())
        });
        self.on::<CheckoutOpen>(|this, _| this.open_checkout());
        self.on::<PaymentSelect>(|this, p| {
            this.order_mut()?.set_payment_method(p.method);
            Ok(())
        });
        self.on::<AddressInput>(|this, p| {
            this.order_mut()?.set_address(p.address.clone());
            Ok(())
        });
        self.on::<ContactsInput>(|this, p| {
            this.order_mut()?.set_contacts(p.email.clone(), p.phone.clone());
            Ok(())
        });
        self.on::<DeliverySubmitted>(|this, _| this.submit_delivery());
        self.on::<ContactsConfirmed>(|this, _| this.confirm_contacts());
        self.on::<OrderConfirm>(|this, _| {
            this.confirm_order();
            Ok(())
        });
        self.on::<ModalClose>(|this, _| {
            this.set_step(CheckoutStep::Browsing);
            Ok(())
        });
    }

    /// Subscribe an intent handler holding only a weak reference.
    ///
    /// Rejections are announced with [`OrderRejected`]; other errors go to
    /// the broker's failure path.
    fn on<T: Topic>(self: &Rc<Self>, intent: Intent<T::Payload>) {
        let weak = Rc::downgrade(self);
        let subscription = self.broker.subscribe::<T>(move |payload| {
            let Some(this) = weak.upgrade() else {
                return Ok(());
            };
            match intent(&this, payload) {
                Ok(()) => Ok(()),
                Err(e) => match e.rejection() {
                    Some(reason) => {
                        tracing::warn!(topic = T::NAME, reason = %reason, "intent rejected");
                        this.broker
                            .publish::<OrderRejected>(OrderRejection { reason });
                        Ok(())
                    }
                    None => Err(e.into()),
                },
            }
        });
        self.subscriptions.borrow_mut().push(subscription);
    }

    /// Fetch the catalog and load it into the catalog model.
    pub async fn load_catalog(&self) -> Result<usize, CheckoutError> {
        match self.api.fetch_products().await {
            Ok(products) => {
                let count = products.len();
                self.catalog
                    .set_products(products)
                    .map_err(|_| CheckoutError::ReentrantModelAccess { model: "catalog" })?;
                Ok(count)
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load catalog");
                self.broker.publish::<ApiFailed>(ApiFailure {
                    operation: ApiOperation::FetchProducts,
                    message: e.to_string(),
                });
                Err(e.into())
            }
        }
    }

    /// Start submitting the order in the background.
    ///
    /// The in-flight flag is taken before this returns, so a second call
    /// while the first is pending is rejected without reaching the API.
    /// Returns `None` when the order was rejected.
    pub fn confirm_order(self: &Rc<Self>) -> Option<JoinHandle<()>> {
        let submission = match self.prepare_submission() {
            Ok(submission) => submission,
            Err(e) => {
                self.report(e);
                return None;
            }
        };

        let this = Rc::clone(self);
        Some(tokio::task::spawn_local(async move {
            // Failures are already announced on the broker.
            let _ = this.execute(submission).await;
        }))
    }

    /// Submit the order and wait for the outcome.
    ///
    /// Same checks and effects as [`confirm_order`](Self::confirm_order),
    /// with the result returned to the caller as well.
    pub async fn submit_order(&self) -> Result<OrderReceipt, CheckoutError> {
        let submission = match self.prepare_submission() {
            Ok(submission) => submission,
            Err(e) => {
                self.report(e.clone());
                return Err(e);
            }
        };
        self.execute(submission).await
    }

    fn prepare_submission(&self) -> Result<Submission, CheckoutError> {
        if self.submitting.get() {
            return Err(CheckoutError::SubmissionInFlight);
        }

        let basket = self.basket_ref()?;
        if basket.is_empty() {
            return Err(CheckoutError::EmptyBasket);
        }
        for id in basket.ids() {
            match self.catalog.get_product(id) {
                Some(product) if product.is_for_sale() => {}
                Some(_) => return Err(CheckoutError::NotForSale(id.clone())),
                None => return Err(CheckoutError::UnknownProduct(id.clone())),
            }
        }

        let request = self
            .order_ref()?
            .to_request(basket.ids().to_vec(), basket.total_price())
            .ok_or(CheckoutError::InvalidOrder)?;

        self.submitting.set(true);
        Ok(Submission {
            request,
            guard: SubmissionGuard(Rc::clone(&self.submitting)),
        })
    }

    async fn execute(&self, submission: Submission) -> Result<OrderReceipt, CheckoutError> {
        let Submission { request, guard } = submission;
        tracing::info!(items = request.items.len(), total = %request.total, "submitting order");

        let receipt = match self.api.submit_order(&request).await {
            Ok(receipt) => receipt,
            Err(e) => {
                drop(guard);
                tracing::error!(error = %e, "order submission failed");
                self.broker.publish::<ApiFailed>(ApiFailure {
                    operation: ApiOperation::SubmitOrder,
                    message: e.to_string(),
                });
                return Err(e.into());
            }
        };

        self.basket_mut()?.clear();
        self.order_mut()?.clear();
        drop(guard);

        tracing::info!(order_id = %receipt.id, total = %receipt.total, "order placed");
        self.broker.publish::<OrderReset>(());
        self.broker.publish::<OrderSuccess>(receipt.clone());
        self.set_step(CheckoutStep::Complete);
        Ok(receipt)
    }

    fn preview(&self, product_id: &ProductId) -> Result<(), CheckoutError> {
        let Some(product) = self.catalog.get_product(product_id) else {
            tracing::warn!(product_id = %product_id, "selected product is not in the catalog");
            return Ok(());
        };
        let in_basket = self.basket_ref()?.has(product_id);
        self.broker
            .publish::<ProductPreview>(ProductPreviewed { product, in_basket });
        Ok(())
    }

    fn add_to_basket(&self, product_id: &ProductId) -> Result<(), CheckoutError> {
        if let Some(product) = self.catalog.get_product(product_id) {
            if !product.is_for_sale() {
                return Err(CheckoutError::NotForSale(product_id.clone()));
            }
        }
        self.basket_mut()?.add(product_id.clone());
        Ok(())
    }

    fn remove_from_basket(&self, product_id: &ProductId) -> Result<(), CheckoutError> {
        self.basket_mut()?.remove(product_id);
        Ok(())
    }

    fn open_checkout(&self) -> Result<(), CheckoutError> {
        if self.basket_ref()?.is_empty() {
            return Err(CheckoutError::EmptyBasket);
        }
        self.set_step(CheckoutStep::Delivery);
        Ok(())
    }

    fn submit_delivery(&self) -> Result<(), CheckoutError> {
        let valid = self.order_mut()?.validate(SubForm::Delivery).is_valid();
        if valid {
            self.set_step(CheckoutStep::Contacts);
        } else {
            tracing::debug!("delivery form submitted with errors");
        }
        Ok(())
    }

    fn confirm_contacts(&self) -> Result<(), CheckoutError> {
        let valid = self.order_mut()?.validate(SubForm::Contacts).is_valid();
        if valid {
            self.broker.publish::<OrderConfirm>(());
        } else {
            tracing::debug!("contacts form submitted with errors");
        }
        Ok(())
    }

    fn set_step(&self, step: CheckoutStep) {
        if self.step.replace(step) != step {
            tracing::debug!(step = step.as_str(), "checkout step");
            self.broker.publish::<CheckoutStepChanged>(step);
        }
    }

    /// Announce a failed operation on the broker.
    fn report(&self, error: CheckoutError) {
        match error.rejection() {
            Some(reason) => {
                tracing::warn!(reason = %reason, "order rejected");
                self.broker
                    .publish::<OrderRejected>(OrderRejection { reason });
            }
            None => tracing::error!(error = %error, "checkout failed"),
        }
    }

    fn basket_ref(&self) -> Result<Ref<'_, BasketModel>, CheckoutError> {
        self.basket
            .try_borrow()
            .map_err(|_| CheckoutError::ReentrantModelAccess { model: "basket" })
    }

    fn basket_mut(&self) -> Result<RefMut<'_, BasketModel>, CheckoutError> {
        self.basket
            .try_borrow_mut()
            .map_err(|_| CheckoutError::ReentrantModelAccess { model: "basket" })
    }

    fn order_ref(&self) -> Result<Ref<'_, OrderModel>, CheckoutError> {
        self.order
            .try_borrow()
            .map_err(|_| CheckoutError::ReentrantModelAccess { model: "order" })
    }

    fn order_mut(&self) -> Result<RefMut<'_, OrderModel>, CheckoutError> {
        self.order
            .try_borrow_mut()
            .map_err(|_| CheckoutError::ReentrantModelAccess { model: "order" })
    }

    pub fn broker(&self) -> &Rc<Broker> {
        &self.broker
    }

    pub fn catalog(&self) -> &Rc<CatalogModel> {
        &self.catalog
    }

    pub fn step(&self) -> CheckoutStep {
        self.step.get()
    }

    /// Check if an order submission is waiting for the server.
    pub fn is_submitting(&self) -> bool {
        self.submitting.get()
    }

    pub fn basket_snapshot(&self) -> Result<BasketSnapshot, CheckoutError> {
        Ok(self.basket_ref()?.snapshot())
    }

    pub fn order_draft(&self) -> Result<OrderDraft, CheckoutError> {
        Ok(self.order_ref()?.draft().clone())
    }

    /// Both sub-forms valid and the basket non-empty.
    pub fn is_order_ready(&self) -> Result<bool, CheckoutError> {
        Ok(self.order_ref()?.is_valid() && !self.basket_ref()?.is_empty())
    }
}

impl Drop for CheckoutMediator {
    fn drop(&mut self) {
        for subscription in self.subscriptions.get_mut().drain(..) {
            self.broker.unsubscribe(subscription);
        }
    }
}
