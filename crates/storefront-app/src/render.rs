//! Render collaborator.
//!
//! A [`Renderer`] turns snapshots into view text; [`ViewBinding`]
//! subscribes one to the change events, the same way view components
//! would, and hands each rendered view to a sink.

use std::rc::Rc;

use console::style;
use storefront_commerce::basket::BasketSnapshot;
use storefront_commerce::catalog::Product;
use storefront_commerce::checkout::{CheckoutStep, OrderDraft, OrderReceipt, SubForm};
use storefront_commerce::events::*;
use storefront_events::{Broker, Subscription};

/// Turns snapshots into displayable views.
pub trait Renderer {
    fn product_card(&self, product: &Product) -> String;

    fn catalog(&self, products: &[Product]) -> String {
        products
            .iter()
            .map(|p| self.product_card(p))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn preview(&self, preview: &ProductPreviewed) -> String;

    fn basket(&self, basket: &BasketSnapshot) -> String;

    fn order_draft(&self, draft: &OrderDraft) -> String;

    fn form_errors(&self, form: SubForm, errors: &FormErrors) -> String;

    /// Shown when the order forms drop their displayed state.
    fn reset(&self) -> String;

    fn step(&self, step: CheckoutStep) -> String;

    fn rejection(&self, rejection: &OrderRejection) -> String;

    fn api_failure(&self, failure: &ApiFailure) -> String;

    fn receipt(&self, receipt: &OrderReceipt) -> String;
}

/// Plain terminal renderer.
#[derive(Debug, Clone)]
pub struct TextRenderer {
    cdn_base: String,
    show_images: bool,
}

impl TextRenderer {
    pub fn new(cdn_base: impl Into<String>) -> Self {
        Self {
            cdn_base: cdn_base.into(),
            show_images: false,
        }
    }

    /// Include image URLs in product cards.
    pub fn with_images(mut self, show: bool) -> Self {
        self.show_images = show;
        self
    }
}

impl Renderer for TextRenderer {
    fn product_card(&self, product: &Product) -> String {
        let mut card = format!(
            "{:<36}  {:<24}  {:>16}  {}",
            product.id,
            product.title,
            product.price_label(),
            style(product.category.display_name()).dim()
        );
        if self.show_images && !product.image.is_empty() {
            card.push_str(&format!("\n    {}", style(product.image_url(&self.cdn_base)).dim()));
        }
        card
    }

    fn preview(&self, preview: &ProductPreviewed) -> String {
        let product = &preview.product;
        let action = if !product.is_for_sale() {
            "Not for sale"
        } else if preview.in_basket {
            "In basket"
        } else {
            "Buy"
        };
        let mut view = format!(
            "{}\n{}\n{}  [{}]",
            style(&product.title).bold(),
            product.category.display_name(),
            product.price_label(),
            action
        );
        if !product.description.is_empty() {
            view.push('\n');
            view.push_str(&product.description);
        }
        view
    }

    fn basket(&self, basket: &BasketSnapshot) -> String {
        if basket.count == 0 {
            return "Basket is empty".to_string();
        }
        let mut lines: Vec<String> = basket
            .items
            .iter()
            .enumerate()
            .map(|(i, p)| format!("{:>3}. {:<32} {:>16}", i + 1, p.title, p.price_label()))
            .collect();
        lines.push(format!("Total: {} ({} items)", style(basket.total).bold(), basket.count));
        lines.join("\n")
    }

    fn order_draft(&self, draft: &OrderDraft) -> String {
        let payment = draft
            .payment
            .map(|p| p.display_name())
            .unwrap_or("not selected");
        format!(
            "Payment: {}\nAddress: {}\nEmail: {}\nPhone: {}",
            payment, draft.address, draft.email, draft.phone
        )
    }

    fn form_errors(&self, form: SubForm, errors: &FormErrors) -> String {
        format!("{} {}: {}", style("✗").red(), form.as_str(), errors.message())
    }

    fn reset(&self) -> String {
        style("Order forms cleared").dim().to_string()
    }

    fn step(&self, step: CheckoutStep) -> String {
        format!("{} {}", style(format!("[{}/5]", step.number())).dim(), step.display_name())
    }

    fn rejection(&self, rejection: &OrderRejection) -> String {
        format!("{} {}", style("⚠").yellow(), rejection.reason)
    }

    fn api_failure(&self, failure: &ApiFailure) -> String {
        format!(
            "{} {} failed: {}",
            style("✗").red(),
            failure.operation.as_str(),
            failure.message
        )
    }

    fn receipt(&self, receipt: &OrderReceipt) -> String {
        format!(
            "{} Order {} placed, charged {}",
            style("✓").green(),
            receipt.id,
            receipt.total
        )
    }
}

/// Destination of rendered views.
pub type ViewSink = Rc<dyn Fn(String)>;

/// A renderer subscribed to change events. Unsubscribes on drop.
pub struct ViewBinding {
    broker: Rc<Broker>,
    subscriptions: Vec<Subscription>,
}

impl ViewBinding {
    /// Subscribe `renderer` to every change event on `broker`.
    pub fn bind(broker: &Rc<Broker>, renderer: Rc<dyn Renderer>, sink: ViewSink) -> Self {
        let mut subscriptions = Vec::new();

        macro_rules! view {
            ($topic:ty, |$r:ident, $p:ident| $body:expr) => {{
                let $r = Rc::clone(&renderer);
                let sink = Rc::clone(&sink);
                subscriptions.push(broker.subscribe::<$topic>(move |$p| {
                    sink($body);
                    Ok(())
                }));
            }};
        }

        view!(CatalogLoaded, |r, p| r.catalog(&p.products));
        view!(ProductPreview, |r, p| r.preview(p));
        view!(BasketChanged, |r, p| r.basket(p));
        view!(DeliveryErrors, |r, p| r.form_errors(SubForm::Delivery, p));
        view!(ContactsErrors, |r, p| r.form_errors(SubForm::Contacts, p));
        view!(OrderReset, |r, _p| r.reset());
        view!(CheckoutStepChanged, |r, p| r.step(*p));
        view!(OrderRejected, |r, p| r.rejection(p));
        view!(ApiFailed, |r, p| r.api_failure(p));
        view!(OrderSuccess, |r, p| r.receipt(p));

        Self {
            broker: Rc::clone(broker),
            subscriptions,
        }
    }

    /// Number of events the binding listens to.
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}

impl Drop for ViewBinding {
    fn drop(&mut self) {
        for subscription in self.subscriptions.drain(..) {
            self.broker.unsubscribe(subscription);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use storefront_commerce::catalog::Category;
    use storefront_commerce::checkout::{PaymentMethod, ValidationError};
    use storefront_commerce::{Money, ProductId};

    fn plain() -> TextRenderer {
        console::set_colors_enabled(false);
        TextRenderer::new("https://cdn.example/content/weblarek")
    }

    #[test]
    fn test_preview_actions() {
        let renderer = plain();
        let product = Product::new("p1", "HEX-леденец", Category::Other).with_price(Money::new(1450));

        let view = renderer.preview(&ProductPreviewed {
            product: product.clone(),
            in_basket: true,
        });
        assert!(view.contains("1450 synapses"));
        assert!(view.contains("[In basket]"));

        let priceless = Product::new("p3", "Мамка-таймер", Category::SoftSkill);
        let view = renderer.preview(&ProductPreviewed {
            product: priceless,
            in_basket: false,
        });
        assert!(view.contains("Priceless"));
        assert!(view.contains("[Not for sale]"));
    }

    #[test]
    fn test_basket_view() {
        let renderer = plain();
        assert_eq!(
            renderer.basket(&BasketSnapshot {
                items: Vec::new(),
                total: Money::zero(),
                count: 0
            }),
            "Basket is empty"
        );

        let view = renderer.basket(&BasketSnapshot {
            items: vec![Product::new("p1", "Бэкенд-антистресс", Category::Other)
                .with_price(Money::new(1000))],
            total: Money::new(1000),
            count: 1,
        });
        assert!(view.contains("1. Бэкенд-антистресс"));
        assert!(view.contains("Total: 1000 synapses (1 items)"));
    }

    #[test]
    fn test_card_with_image() {
        let renderer = plain().with_images(true);
        let product = Product::new("p1", "Фреймворк куки судьбы", Category::Additional)
            .with_image("/Soft_Flower.svg");
        let card = renderer.product_card(&product);
        assert!(card.contains("https://cdn.example/content/weblarek/Soft_Flower.svg"));
    }

    #[test]
    fn test_draft_and_errors() {
        let renderer = plain();
        let draft = OrderDraft {
            payment: Some(PaymentMethod::Cash),
            address: "Moscow".to_string(),
            ..OrderDraft::default()
        };
        assert!(renderer.order_draft(&draft).starts_with("Payment: Cash on delivery"));

        let errors = FormErrors {
            errors: vec![ValidationError::EmailRequired, ValidationError::PhoneRequired],
        };
        assert_eq!(
            renderer.form_errors(SubForm::Contacts, &errors),
            "✗ contacts: Email is required. Phone is required"
        );
    }

    #[test]
    fn test_binding_forwards_and_unbinds() {
        let broker = Broker::shared();
        let views = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&views);

        let binding = ViewBinding::bind(
            &broker,
            Rc::new(plain()),
            Rc::new(move |view| sink.borrow_mut().push(view)),
        );
        assert_eq!(binding.len(), 10);

        broker.publish::<OrderRejected>(OrderRejection {
            reason: RejectionReason::NotForSale(ProductId::new("p3")),
        });
        assert_eq!(views.borrow().as_slice(), ["⚠ product p3 is not for sale".to_string()]);

        broker.publish::<OrderReset>(());
        assert_eq!(views.borrow().len(), 2);
        assert_eq!(views.borrow()[1], "Order forms cleared");

        drop(binding);
        broker.publish::<OrderRejected>(OrderRejection {
            reason: RejectionReason::EmptyBasket,
        });
        assert_eq!(views.borrow().len(), 2);
        assert_eq!(broker.subscriber_count::<BasketChanged>(), 0);
        assert_eq!(broker.subscriber_count::<OrderReset>(), 0);
    }
}
