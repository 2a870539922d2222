//! Place an order by driving the checkout events.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use anyhow::{bail, Context as _, Result};
use dialoguer::{Input, Select};
use storefront_commerce::checkout::{CheckoutStep, OrderReceipt, PaymentMethod};
use storefront_commerce::events::*;
use tokio::sync::mpsc;

use super::{CheckoutArgs, Session};
use crate::context::Context;

enum Outcome {
    Placed(OrderReceipt),
    Failed(String),
}

/// Run the checkout command.
pub async fn run(args: CheckoutArgs, ctx: &Context) -> Result<()> {
    let mut payment = args
        .payment
        .as_deref()
        .map(str::parse::<PaymentMethod>)
        .transpose()?;
    let interactive = !args.no_input && ctx.output.is_interactive();

    let session = Session::open(ctx, false)?;
    let mediator = &session.mediator;
    let broker = mediator.broker();

    let (tx, mut outcomes) = mpsc::unbounded_channel();
    let placed = tx.clone();
    broker.subscribe::<OrderSuccess>(move |receipt| {
        let _ = placed.send(Outcome::Placed(receipt.clone()));
        Ok(())
    });
    broker.subscribe::<ApiFailed>(move |failure| {
        if failure.operation == ApiOperation::SubmitOrder {
            let _ = tx.send(Outcome::Failed(failure.message.clone()));
        }
        Ok(())
    });

    let contacts_valid = Rc::new(Cell::new(false));
    let valid = Rc::clone(&contacts_valid);
    broker.subscribe::<ContactsValidity>(move |validity| {
        valid.set(validity.valid);
        Ok(())
    });
    let rejection = Rc::new(RefCell::new(None));
    let rejected = Rc::clone(&rejection);
    broker.subscribe::<OrderRejected>(move |r| {
        *rejected.borrow_mut() = Some(r.reason.clone());
        Ok(())
    });

    session.load_catalog(ctx).await?;

    ctx.output.header("Basket");
    for id in &args.products {
        broker.publish::<ProductSelect>(ProductRef::new(id.as_str()));
        broker.publish::<BasketAdd>(ProductRef::new(id.as_str()));
    }
    broker.publish::<BasketOpen>(());
    broker.publish::<CheckoutOpen>(());
    if mediator.step() != CheckoutStep::Delivery {
        bail!("Checkout could not be started");
    }

    ctx.output.header("Delivery");
    let mut address = args.address.clone();
    loop {
        if payment.is_none() && interactive {
            payment = Some(prompt_payment()?);
        }
        if let Some(method) = payment {
            broker.publish::<PaymentSelect>(PaymentSelected { method });
        }
        if address.is_none() && interactive {
            address = Some(prompt("Delivery address", "")?);
        }
        broker.publish::<AddressInput>(AddressEntered {
            address: address.clone().unwrap_or_default(),
        });

        broker.publish::<DeliverySubmitted>(());
        if mediator.step() == CheckoutStep::Contacts {
            break;
        }
        if !interactive {
            bail!("Delivery details are incomplete");
        }
        address = None;
    }

    ctx.output.header("Contacts");
    let mut email = args.email.clone();
    let mut phone = args.phone.clone();
    loop {
        if interactive {
            if email.is_none() {
                email = Some(prompt("Email", "")?);
            }
            if phone.is_none() {
                phone = Some(prompt("Phone", "")?);
            }
        }
        let entered = ContactsEntered {
            email: email.clone().unwrap_or_default(),
            phone: phone.clone().unwrap_or_default(),
        };
        rejection.take();
        broker.publish::<ContactsInput>(entered.clone());

        broker.publish::<ContactsConfirmed>(());
        if mediator.is_submitting() {
            break;
        }
        if let Some(reason) = rejection.take() {
            bail!("The order was rejected: {}", reason);
        }
        if contacts_valid.get() {
            bail!("The order was not submitted");
        }
        if !interactive {
            bail!("Contact details are incomplete");
        }
        email = Some(prompt("Email", &entered.email)?);
        phone = Some(prompt("Phone", &entered.phone)?);
    }

    // The draft is cleared only once the server accepts the order.
    if !ctx.output.is_json() {
        ctx.output.header("Order");
        ctx.output.view(&session.renderer.order_draft(&mediator.order_draft()?));
    }

    let spinner = ctx.output.spinner("Placing order...");
    let outcome = outcomes.recv().await;
    spinner.finish_and_clear();

    match outcome.context("Order submission ended without a result")? {
        Outcome::Placed(receipt) => {
            if ctx.output.is_json() {
                ctx.output.json(&receipt);
            }
            Ok(())
        }
        Outcome::Failed(message) => bail!("Order failed: {}", message),
    }
}

fn prompt_payment() -> Result<PaymentMethod> {
    let labels: Vec<&str> = PaymentMethod::ALL.iter().map(|m| m.display_name()).collect();
    let selection = Select::new()
        .with_prompt("Payment method")
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(PaymentMethod::ALL[selection])
}

fn prompt(label: &str, initial: &str) -> Result<String> {
    let value = Input::<String>::new()
        .with_prompt(label)
        .with_initial_text(initial)
        .allow_empty(true)
        .interact_text()?;
    Ok(value)
}
