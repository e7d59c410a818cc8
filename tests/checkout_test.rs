use canteen_storefront::cart_actor::mock::{create_mock_handle, expect_snapshot};
use canteen_storefront::cart_actor::{CartActor, CartHandle, CartState};
use canteen_storefront::checkout::{
    CheckoutError, CheckoutForm, HostedCheckout, OrderSubmission, PaymentGateway, Redirect,
    RedirectTarget,
};
use canteen_storefront::clients::mock::{BackendCall, FailureSwitches, InMemoryBackend};
use canteen_storefront::clients::ApiError;
use canteen_storefront::config::CheckoutMode;
use canteen_storefront::model::{MenuItemRef, OrderType};
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

struct Harness {
    backend: Arc<InMemoryBackend>,
    gateway: HostedCheckout,
    redirects: mpsc::Receiver<Redirect>,
    submission: OrderSubmission,
    cart: CartHandle,
    actor: JoinHandle<()>,
}

impl Harness {
    async fn start(backend: Arc<InMemoryBackend>) -> Self {
        let (actor, cart) = CartActor::new(16);
        let actor = tokio::spawn(actor.run(backend.clone()));
        // Wait for the initial load so the empty-cart guard sees real data.
        cart.refresh().await.unwrap();

        let (sender, redirects) = mpsc::channel(4);
        let gateway = HostedCheckout::new(CheckoutMode::Sandbox, sender);
        gateway.mark_ready();

        let submission = OrderSubmission::new(
            backend.clone(),
            Arc::new(gateway.clone()) as Arc<dyn PaymentGateway>,
            cart.clone(),
        );
        Self {
            backend,
            gateway,
            redirects,
            submission,
            cart,
            actor,
        }
    }

    async fn stop(self) {
        drop(self.submission);
        drop(self.cart);
        self.actor.await.unwrap();
    }

    fn order_creations(&self) -> usize {
        self.backend
            .count_calls(|c| matches!(c, BackendCall::CreateOrder(_)))
    }
}

fn samosa() -> MenuItemRef {
    MenuItemRef::new("665f1c2b9a1e4b0012ab3401", "Samosa", Decimal::from(25))
}

fn stocked_backend() -> Arc<InMemoryBackend> {
    let backend = Arc::new(InMemoryBackend::new());
    backend.seed_line(samosa(), 4);
    backend
}

fn dine_in_form() -> CheckoutForm {
    CheckoutForm {
        first_name: " Asha ".into(),
        last_name: "Rao".into(),
        table_number: "12".into(),
        phone: "9876543210".into(),
        ..CheckoutForm::default()
    }
}

fn delivery_form() -> CheckoutForm {
    CheckoutForm {
        first_name: "Asha".into(),
        last_name: "Rao".into(),
        hostel: "Kaveri".into(),
        room_number: "214".into(),
        floor: "2".into(),
        phone: "9876543210".into(),
        ..CheckoutForm::default()
    }
}

#[tokio::test]
async fn dine_in_checkout_creates_the_order_and_redirects() {
    let mut harness = Harness::start(stocked_backend()).await;

    let order = harness
        .submission
        .submit(OrderType::DineIn, &dine_in_form())
        .await
        .unwrap();

    assert_eq!(order.order_id, "ORD-0001");
    assert_eq!(order.order_type, OrderType::DineIn);
    assert_eq!(order.item_count(), 4);
    let details = order.dine_in_details.as_ref().unwrap();
    assert_eq!(details.first_name, "Asha");
    assert_eq!(details.table_number, "12");

    let redirect = harness.redirects.recv().await.unwrap();
    assert_eq!(
        redirect.url,
        "https://payments-test.cashfree.com/order/#session_test"
    );
    assert_eq!(redirect.target, RedirectTarget::SameTab);
    assert_eq!(harness.order_creations(), 1);

    harness.stop().await;
}

#[tokio::test]
async fn delivery_checkout_carries_the_address() {
    let mut harness = Harness::start(stocked_backend()).await;

    let order = harness
        .submission
        .submit(OrderType::Delivery, &delivery_form())
        .await
        .unwrap();

    let details = order.delivery_details.as_ref().unwrap();
    assert_eq!(details.hostel, "Kaveri");
    assert_eq!(details.room_number, "214");
    assert!(order.dine_in_details.is_none());
    assert!(harness.redirects.recv().await.is_some());

    harness.stop().await;
}

#[tokio::test]
async fn invalid_form_never_reaches_the_backend() {
    let harness = Harness::start(stocked_backend()).await;
    let form = CheckoutForm {
        phone: "98765-43210".into(),
        ..dine_in_form()
    };

    let err = harness
        .submission
        .submit(OrderType::DineIn, &form)
        .await
        .unwrap_err();

    let CheckoutError::Validation(errors) = &err else {
        panic!("expected validation error, got {err:?}");
    };
    assert!(errors.fields.phone);
    assert_eq!(
        err.general_message(),
        "Please enter a valid 10-digit phone number"
    );
    assert_eq!(harness.order_creations(), 0);

    harness.stop().await;
}

#[tokio::test]
async fn delivery_requires_the_address_fields() {
    let harness = Harness::start(stocked_backend()).await;

    // A dine-in form lacks hostel, room and floor.
    let err = harness
        .submission
        .submit(OrderType::Delivery, &dine_in_form())
        .await
        .unwrap_err();

    assert_eq!(err.general_message(), "Please fill in all required fields");
    assert_eq!(harness.order_creations(), 0);

    harness.stop().await;
}

#[tokio::test]
async fn empty_cart_is_refused_before_order_creation() {
    let harness = Harness::start(Arc::new(InMemoryBackend::new())).await;

    let err = harness
        .submission
        .submit(OrderType::DineIn, &dine_in_form())
        .await
        .unwrap_err();

    assert_eq!(err, CheckoutError::EmptyCart);
    assert_eq!(
        err.general_message(),
        "Your cart is empty. Add items before checking out."
    );
    assert_eq!(harness.order_creations(), 0);

    harness.stop().await;
}

#[tokio::test]
async fn backend_failure_surfaces_as_order_creation_error() {
    let harness = Harness::start(stocked_backend()).await;
    harness.backend.set_failures(FailureSwitches {
        create_order: true,
        ..FailureSwitches::default()
    });

    let err = harness
        .submission
        .submit(OrderType::DineIn, &dine_in_form())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CheckoutError::OrderCreation(ApiError::Service { status: 500, .. })
    ));
    assert_eq!(err.general_message(), "Failed to create order. Please try again.");
    assert_eq!(err.dangling_order_id(), None);

    harness.stop().await;
}

#[tokio::test]
async fn unready_gateway_leaves_an_unpaid_order() {
    let backend = stocked_backend();
    let (actor, cart) = CartActor::new(16);
    let actor = tokio::spawn(actor.run(backend.clone()));
    cart.refresh().await.unwrap();

    let (sender, mut redirects) = mpsc::channel(1);
    let gateway = HostedCheckout::new(CheckoutMode::Production, sender);
    let submission = OrderSubmission::new(backend.clone(), Arc::new(gateway), cart.clone());

    let err = submission
        .submit(OrderType::DineIn, &dine_in_form())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        CheckoutError::GatewayNotReady {
            order_id: "ORD-0001".into()
        }
    );
    assert_eq!(
        err.general_message(),
        "Payment gateway not available. Please try again later."
    );
    assert_eq!(err.dangling_order_id(), Some("ORD-0001"));
    assert!(redirects.try_recv().is_err());

    drop(submission);
    drop(cart);
    actor.await.unwrap();
}

#[tokio::test]
async fn order_without_payment_session_cannot_be_paid() {
    let mut harness = Harness::start(stocked_backend()).await;
    harness.backend.set_payment_session(Some("   "));

    let err = harness
        .submission
        .submit(OrderType::DineIn, &dine_in_form())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        CheckoutError::MissingPaymentSession {
            order_id: "ORD-0001".into()
        }
    );
    assert_eq!(
        err.general_message(),
        "Failed to initialize payment. Please try again."
    );
    assert!(harness.redirects.try_recv().is_err());
    assert!(harness.gateway.is_ready());

    harness.stop().await;
}

#[tokio::test]
async fn closed_ui_channel_is_a_payment_initiation_error() {
    let backend = stocked_backend();
    let (actor, cart) = CartActor::new(16);
    let actor = tokio::spawn(actor.run(backend.clone()));
    cart.refresh().await.unwrap();

    let (sender, redirects) = mpsc::channel(1);
    drop(redirects);
    let gateway = HostedCheckout::new(CheckoutMode::Sandbox, sender);
    gateway.mark_ready();
    let submission = OrderSubmission::new(backend.clone(), Arc::new(gateway), cart.clone());

    let err = submission
        .submit(OrderType::DineIn, &dine_in_form())
        .await
        .unwrap_err();

    assert!(matches!(err, CheckoutError::PaymentInitiation { .. }));
    assert_eq!(err.dangling_order_id(), Some("ORD-0001"));

    drop(submission);
    drop(cart);
    actor.await.unwrap();
}

#[tokio::test]
async fn guard_trusts_a_cart_that_is_still_loading() {
    let backend = stocked_backend();
    let (cart, mut requests) = create_mock_handle(4);
    let (sender, _redirects) = mpsc::channel(1);
    let gateway = HostedCheckout::new(CheckoutMode::Sandbox, sender);
    gateway.mark_ready();
    let submission = OrderSubmission::new(backend.clone(), Arc::new(gateway), cart);

    let responder = tokio::spawn(async move {
        let respond_to = expect_snapshot(&mut requests).await.unwrap();
        let loading = CartState {
            is_loading: true,
            ..CartState::default()
        };
        respond_to.send(Ok(loading)).unwrap();
    });

    let order = submission
        .submit(OrderType::DineIn, &dine_in_form())
        .await
        .unwrap();
    responder.await.unwrap();
    assert_eq!(order.order_id, "ORD-0001");
}

#[tokio::test]
async fn guard_uses_the_cart_store_view() {
    let backend = stocked_backend();
    let (cart, mut requests) = create_mock_handle(4);
    let (sender, _redirects) = mpsc::channel(1);
    let gateway = HostedCheckout::new(CheckoutMode::Sandbox, sender);
    gateway.mark_ready();
    let submission = OrderSubmission::new(backend.clone(), Arc::new(gateway), cart);

    let responder = tokio::spawn(async move {
        let respond_to = expect_snapshot(&mut requests).await.unwrap();
        respond_to.send(Ok(CartState::default())).unwrap();
    });

    let err = submission
        .submit(OrderType::DineIn, &dine_in_form())
        .await
        .unwrap_err();
    responder.await.unwrap();

    // The backend cart has lines, but the store says empty.
    assert_eq!(err, CheckoutError::EmptyCart);
    assert_eq!(
        backend.count_calls(|c| matches!(c, BackendCall::CreateOrder(_))),
        0
    );
}

#[tokio::test]
async fn stopped_cart_store_leaves_the_check_to_the_backend() {
    let backend = Arc::new(InMemoryBackend::new());
    let (cart, requests) = create_mock_handle(1);
    drop(requests);
    let (sender, _redirects) = mpsc::channel(1);
    let gateway = HostedCheckout::new(CheckoutMode::Sandbox, sender);
    gateway.mark_ready();
    let submission = OrderSubmission::new(backend.clone(), Arc::new(gateway), cart);

    let err = submission
        .submit(OrderType::DineIn, &dine_in_form())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        CheckoutError::OrderCreation(ApiError::Rejected("Cart is empty".into()))
    );
}

#[tokio::test]
async fn delivery_availability_reads_settings() {
    let harness = Harness::start(stocked_backend()).await;
    assert!(harness.submission.delivery_enabled().await);

    harness.backend.set_delivery_enabled(false);
    assert!(!harness.submission.delivery_enabled().await);

    harness.backend.set_delivery_enabled(true);
    harness.backend.set_failures(FailureSwitches {
        delivery_settings: true,
        ..FailureSwitches::default()
    });
    assert!(!harness.submission.delivery_enabled().await);

    harness.stop().await;
}
