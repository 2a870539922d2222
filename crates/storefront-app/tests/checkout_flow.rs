//! End-to-end checkout flows against an in-memory commerce API.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use async_trait::async_trait;
use storefront_app::{CheckoutError, CheckoutMediator};
use storefront_commerce::catalog::{Category, Product};
use storefront_commerce::checkout::{
    CheckoutStep, OrderDraft, OrderReceipt, OrderRequest, PaymentMethod, ValidationError,
};
use storefront_commerce::events::*;
use storefront_commerce::{Money, ProductId};
use storefront_data::{ApiError, CommerceApi};
use storefront_events::{Broker, Topic};
use tokio::task::LocalSet;

#[derive(Default)]
struct FakeApi {
    products: Vec<Product>,
    submitted: RefCell<Vec<OrderRequest>>,
    fail_orders: Cell<bool>,
    fail_fetch: bool,
}

#[async_trait(?Send)]
impl CommerceApi for FakeApi {
    async fn fetch_products(&self) -> Result<Vec<Product>, ApiError> {
        if self.fail_fetch {
            return Err(ApiError::Connect("connection refused".to_string()));
        }
        Ok(self.products.clone())
    }

    async fn submit_order(&self, request: &OrderRequest) -> Result<OrderReceipt, ApiError> {
        self.submitted.borrow_mut().push(request.clone());
        tokio::task::yield_now().await;

        if self.fail_orders.get() {
            return Err(ApiError::Http {
                status: 500,
                url: "http://fake/order".to_string(),
                message: "Internal error".to_string(),
            });
        }
        Ok(OrderReceipt {
            id: "order-42".into(),
            total: request.total,
        })
    }
}

fn catalog() -> Vec<Product> {
    vec![
        Product::new("p1", "+1 час в сутках", Category::SoftSkill).with_price(Money::new(750)),
        Product::new("p2", "HEX-леденец", Category::Other).with_price(Money::new(1450)),
        Product::new("p3", "Мамка-таймер", Category::SoftSkill),
    ]
}

fn setup(api: FakeApi) -> (Rc<FakeApi>, Rc<CheckoutMediator>) {
    let api = Rc::new(api);
    let mediator = CheckoutMediator::new(Broker::shared(), Rc::clone(&api) as Rc<dyn CommerceApi>);
    (api, mediator)
}

fn fake() -> FakeApi {
    FakeApi {
        products: catalog(),
        ..FakeApi::default()
    }
}

type Log = Rc<RefCell<Vec<&'static str>>>;

fn record<T: Topic>(broker: &Broker, log: &Log) {
    let log = Rc::clone(log);
    broker.subscribe::<T>(move |_| {
        log.borrow_mut().push(T::NAME);
        Ok(())
    });
}

fn collect<T: Topic>(broker: &Broker) -> Rc<RefCell<Vec<T::Payload>>>
where
    T::Payload: Clone,
{
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    broker.subscribe::<T>(move |payload| {
        sink.borrow_mut().push(payload.clone());
        Ok(())
    });
    seen
}

fn record_rejections(broker: &Broker) -> Rc<RefCell<Vec<RejectionReason>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    broker.subscribe::<OrderRejected>(move |rejection| {
        sink.borrow_mut().push(rejection.reason.clone());
        Ok(())
    });
    seen
}

fn fill_order(broker: &Broker) {
    broker.publish::<PaymentSelect>(PaymentSelected {
        method: PaymentMethod::Online,
    });
    broker.publish::<AddressInput>(AddressEntered {
        address: "Moscow, Red Square 1".to_string(),
    });
    broker.publish::<ContactsInput>(ContactsEntered {
        email: "a@b.com".to_string(),
        phone: "+7 900 123 4567".to_string(),
    });
}

async fn settle(mediator: &CheckoutMediator) {
    for _ in 0..100 {
        if !mediator.is_submitting() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("order submission did not finish");
}

#[tokio::test]
async fn test_full_checkout_through_events() {
    LocalSet::new()
        .run_until(async {
            let (api, mediator) = setup(fake());
            let broker = Rc::clone(mediator.broker());
            mediator.load_catalog().await.unwrap();

            let receipts = collect::<OrderSuccess>(&broker);
            let rejections = record_rejections(&broker);
            let steps = collect::<CheckoutStepChanged>(&broker);

            broker.publish::<BasketAdd>(ProductRef::new("p1"));
            broker.publish::<BasketAdd>(ProductRef::new("p2"));
            broker.publish::<BasketOpen>(());
            broker.publish::<CheckoutOpen>(());

            broker.publish::<PaymentSelect>(PaymentSelected {
                method: PaymentMethod::Online,
            });
            broker.publish::<AddressInput>(AddressEntered {
                address: "Moscow, Red Square 1".to_string(),
            });
            broker.publish::<DeliverySubmitted>(());
            assert_eq!(mediator.step(), CheckoutStep::Contacts);

            broker.publish::<ContactsInput>(ContactsEntered {
                email: "a@b.com".to_string(),
                phone: "+7 900 123 4567".to_string(),
            });
            assert!(mediator.is_order_ready().unwrap());

            let log: Log = Rc::new(RefCell::new(Vec::new()));
            record::<BasketChanged>(&broker, &log);
            record::<OrderReset>(&broker, &log);
            record::<OrderSuccess>(&broker, &log);

            broker.publish::<ContactsConfirmed>(());
            assert!(mediator.is_submitting());

            // A second confirmation while the first is pending.
            broker.publish::<OrderConfirm>(());
            assert_eq!(
                *rejections.borrow(),
                vec![RejectionReason::SubmissionInFlight]
            );

            settle(&mediator).await;

            let submitted = api.submitted.borrow();
            assert_eq!(submitted.len(), 1);
            assert_eq!(submitted[0].items, vec![ProductId::new("p1"), ProductId::new("p2")]);
            assert_eq!(submitted[0].total, Money::new(2200));
            assert_eq!(submitted[0].payment, PaymentMethod::Online);

            assert_eq!(
                *receipts.borrow(),
                vec![OrderReceipt {
                    id: "order-42".into(),
                    total: Money::new(2200),
                }]
            );
            assert_eq!(
                *log.borrow(),
                vec!["basket:changed", "order:reset", "order:success"]
            );
            assert_eq!(mediator.basket_snapshot().unwrap().count, 0);
            assert_eq!(mediator.order_draft().unwrap(), OrderDraft::default());
            assert_eq!(
                *steps.borrow(),
                vec![
                    CheckoutStep::Basket,
                    CheckoutStep::Delivery,
                    CheckoutStep::Contacts,
                    CheckoutStep::Complete,
                ]
            );
        })
        .await;
}

#[tokio::test]
async fn test_second_confirm_is_rejected_before_the_api() {
    LocalSet::new()
        .run_until(async {
            let (api, mediator) = setup(fake());
            let broker = Rc::clone(mediator.broker());
            mediator.load_catalog().await.unwrap();
            broker.publish::<BasketAdd>(ProductRef::new("p2"));
            fill_order(&broker);

            let first = mediator.confirm_order().expect("first submission starts");
            assert!(mediator.confirm_order().is_none());
            first.await.unwrap();

            assert_eq!(api.submitted.borrow().len(), 1);
            assert!(!mediator.is_submitting());
        })
        .await;
}

#[tokio::test]
async fn test_failed_submission_keeps_models_for_retry() {
    let api = FakeApi {
        fail_orders: Cell::new(true),
        ..fake()
    };
    let (api, mediator) = setup(api);
    let broker = Rc::clone(mediator.broker());
    mediator.load_catalog().await.unwrap();
    let failures = collect::<ApiFailed>(&broker);
    let resets = collect::<OrderReset>(&broker);

    broker.publish::<BasketAdd>(ProductRef::new("p1"));
    fill_order(&broker);
    let draft = mediator.order_draft().unwrap();

    let err = mediator.submit_order().await.unwrap_err();

    assert!(matches!(err, CheckoutError::Api(ApiError::Http { status: 500, .. })));
    assert_eq!(failures.borrow().len(), 1);
    assert_eq!(failures.borrow()[0].operation, ApiOperation::SubmitOrder);
    assert!(resets.borrow().is_empty());
    assert_eq!(mediator.basket_snapshot().unwrap().count, 1);
    assert_eq!(mediator.order_draft().unwrap(), draft);
    assert!(!mediator.is_submitting());

    api.fail_orders.set(false);
    let receipt = mediator.submit_order().await.unwrap();

    assert_eq!(receipt.total, Money::new(750));
    assert_eq!(api.submitted.borrow().len(), 2);
    assert_eq!(mediator.basket_snapshot().unwrap().count, 0);
}

#[tokio::test]
async fn test_incomplete_order_is_not_sent() {
    let (api, mediator) = setup(fake());
    let broker = Rc::clone(mediator.broker());
    mediator.load_catalog().await.unwrap();
    let rejections = record_rejections(&broker);

    broker.publish::<BasketAdd>(ProductRef::new("p1"));
    broker.publish::<AddressInput>(AddressEntered {
        address: "Moscow".to_string(),
    });

    let err = mediator.submit_order().await.unwrap_err();

    assert_eq!(err, CheckoutError::InvalidOrder);
    assert_eq!(*rejections.borrow(), vec![RejectionReason::InvalidOrder]);
    assert!(api.submitted.borrow().is_empty());
}

#[tokio::test]
async fn test_empty_basket_is_not_sent() {
    let (api, mediator) = setup(fake());
    let broker = Rc::clone(mediator.broker());
    mediator.load_catalog().await.unwrap();
    fill_order(&broker);

    let err = mediator.submit_order().await.unwrap_err();

    assert_eq!(err, CheckoutError::EmptyBasket);
    assert!(api.submitted.borrow().is_empty());
}

#[tokio::test]
async fn test_invalid_contacts_do_not_confirm() {
    let (api, mediator) = setup(fake());
    let broker = Rc::clone(mediator.broker());
    mediator.load_catalog().await.unwrap();
    let errors = collect::<ContactsErrors>(&broker);
    let confirms: Log = Rc::new(RefCell::new(Vec::new()));
    record::<OrderConfirm>(&broker, &confirms);

    broker.publish::<BasketAdd>(ProductRef::new("p1"));
    broker.publish::<ContactsInput>(ContactsEntered {
        email: String::new(),
        phone: "123".to_string(),
    });
    broker.publish::<ContactsConfirmed>(());

    assert!(confirms.borrow().is_empty());
    assert!(api.submitted.borrow().is_empty());
    assert_eq!(
        errors.borrow().last().map(|e| e.errors.clone()),
        Some(vec![ValidationError::PhoneRequired])
    );
}

#[tokio::test]
async fn test_contacts_outcome_is_announced() {
    let (api, mediator) = setup(fake());
    let broker = Rc::clone(mediator.broker());
    mediator.load_catalog().await.unwrap();
    let validity = collect::<ContactsValidity>(&broker);
    let rejections = record_rejections(&broker);
    broker.publish::<BasketAdd>(ProductRef::new("p1"));

    // Invalid contacts: no rejection, only the validity flag.
    broker.publish::<ContactsInput>(ContactsEntered {
        email: "not-an-email".to_string(),
        phone: "+7 900 123 4567".to_string(),
    });
    broker.publish::<ContactsConfirmed>(());
    assert_eq!(validity.borrow().last().map(|v| v.valid), Some(false));
    assert!(rejections.borrow().is_empty());

    // Valid contacts with no delivery data: confirmed, then rejected.
    broker.publish::<ContactsInput>(ContactsEntered {
        email: "a@b.com".to_string(),
        phone: "+7 900 123 4567".to_string(),
    });
    broker.publish::<ContactsConfirmed>(());
    assert_eq!(validity.borrow().last().map(|v| v.valid), Some(true));
    assert_eq!(*rejections.borrow(), vec![RejectionReason::InvalidOrder]);
    assert!(!mediator.is_submitting());
    assert!(api.submitted.borrow().is_empty());
}

#[tokio::test]
async fn test_catalog_replaced_from_its_own_handler_is_refused() {
    let (_api, mediator) = setup(fake());
    let broker = Rc::clone(mediator.broker());
    let catalog = Rc::downgrade(mediator.catalog());
    broker.subscribe::<CatalogLoaded>(move |_| {
        if let Some(catalog) = catalog.upgrade() {
            catalog.set_products(Vec::new())?;
        }
        Ok(())
    });

    let loaded = mediator.load_catalog().await.unwrap();

    assert_eq!(loaded, 3);
    assert_eq!(mediator.catalog().len(), 3);
    assert_eq!(broker.failure_count(), 1);
}

#[tokio::test]
async fn test_product_select_previews() {
    let (_api, mediator) = setup(fake());
    let broker = Rc::clone(mediator.broker());
    mediator.load_catalog().await.unwrap();
    let previews = collect::<ProductPreview>(&broker);

    broker.publish::<ProductSelect>(ProductRef::new("p2"));
    broker.publish::<BasketAdd>(ProductRef::new("p2"));
    broker.publish::<ProductSelect>(ProductRef::new("p2"));
    broker.publish::<ProductSelect>(ProductRef::new("missing"));

    let previews = previews.borrow();
    assert_eq!(previews.len(), 2);
    assert_eq!(previews[0].product.title, "HEX-леденец");
    assert!(!previews[0].in_basket);
    assert!(previews[1].in_basket);
    assert_eq!(broker.failure_count(), 0);
}

#[tokio::test]
async fn test_catalog_failure_is_reported() {
    let api = FakeApi {
        fail_fetch: true,
        ..fake()
    };
    let (_api, mediator) = setup(api);
    let failures = collect::<ApiFailed>(mediator.broker());

    let err = mediator.load_catalog().await.unwrap_err();

    assert!(matches!(err, CheckoutError::Api(ApiError::Connect(_))));
    assert_eq!(failures.borrow()[0].operation, ApiOperation::FetchProducts);
    assert!(mediator.catalog().is_empty());
}

#[test]
fn test_reentrant_basket_mutation_is_contained() {
    let (_api, mediator) = setup(fake());
    let broker = Rc::clone(mediator.broker());
    mediator.catalog().set_products(catalog()).unwrap();

    let fired = Rc::new(Cell::new(false));
    let inner = Rc::clone(&broker);
    let once = Rc::clone(&fired);
    broker.subscribe::<BasketChanged>(move |_| {
        if !once.replace(true) {
            inner.publish::<BasketAdd>(ProductRef::new("p2"));
        }
        Ok(())
    });

    broker.publish::<BasketAdd>(ProductRef::new("p1"));

    assert!(fired.get());
    assert_eq!(broker.failure_count(), 1);
    let snapshot = mediator.basket_snapshot().unwrap();
    assert_eq!(snapshot.count, 1);
    assert_eq!(snapshot.items[0].id, ProductId::new("p1"));
}
