use crate::cart_actor::{CartActor, CartHandle};
use crate::checkout::{HostedCheckout, OrderSubmission, PaymentGateway, Redirect};
use crate::clients::{image_url, CartApi, CartClient, HttpCore, MenuClient, OrderApi, OrderClient};
use crate::config::StorefrontConfig;
use crate::order_status::OrderStatusResolver;
use crate::session::SessionIdentity;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};
use tracing::{error, info};

const CART_BUFFER: usize = 32;
const REDIRECT_BUFFER: usize = 4;

/// Runtime wiring for one storefront session.
///
/// `Storefront` owns the running cart actor and hands out the components a UI
/// needs:
/// - **cart**: the session cart
/// - **checkout**: order submission and delivery availability
/// - **status**: payment outcome for the return page
/// - **menu**: catalog reads
///
/// # Example
///
/// ```ignore
/// let (storefront, mut redirects) = Storefront::new(StorefrontConfig::from_env()?);
///
/// storefront.cart.add_to_cart(item).await?;
/// storefront.checkout.submit(OrderType::DineIn, &form).await?;
/// let redirect = redirects.recv().await;
///
/// storefront.shutdown().await?;
/// ```
pub struct Storefront {
    pub config: StorefrontConfig,
    pub cart: CartHandle,
    pub checkout: OrderSubmission,
    pub status: OrderStatusResolver,
    pub menu: MenuClient,
    handles: Vec<JoinHandle<()>>,
}

impl Storefront {
    /// Connects to the configured backend and starts the cart actor.
    ///
    /// Returns the storefront and the receiver on which payment redirects
    /// arrive. Must be called from within a Tokio runtime.
    pub fn new(config: StorefrontConfig) -> (Self, mpsc::Receiver<Redirect>) {
        let http = HttpCore::new(&config.api_base_url);
        let session = SessionIdentity::from_dir(config.session_dir.as_deref());

        let cart_api: Arc<dyn CartApi> = Arc::new(CartClient::new(http.clone(), session.clone()));
        let orders: Arc<dyn OrderApi> = Arc::new(OrderClient::new(http.clone(), session));

        let (redirect_sender, redirects) = mpsc::channel(REDIRECT_BUFFER);
        // Hosted checkout is a plain redirect, so there is no script to fetch.
        let gateway: Arc<dyn PaymentGateway> = Arc::new(HostedCheckout::load(
            config.checkout_mode,
            redirect_sender,
            std::future::ready(Ok(())),
        ));

        let storefront = Self::with_backends(config, cart_api, orders, gateway, MenuClient::new(http));
        (storefront, redirects)
    }

    /// Wires the storefront around the given backends.
    pub fn with_backends(
        config: StorefrontConfig,
        cart_api: Arc<dyn CartApi>,
        orders: Arc<dyn OrderApi>,
        gateway: Arc<dyn PaymentGateway>,
        menu: MenuClient,
    ) -> Self {
        let (cart_actor, cart) = CartActor::new(CART_BUFFER);
        let cart_handle = tokio::spawn(cart_actor.run(cart_api));

        let checkout = OrderSubmission::new(orders.clone(), gateway, cart.clone());
        let status = OrderStatusResolver::new(orders);

        info!(api = %config.api_base_url, "Storefront started");
        Self {
            config,
            cart,
            checkout,
            status,
            menu,
            handles: vec![cart_handle],
        }
    }

    /// Image reference checked against the configured host allowlist.
    pub fn image_url(&self, raw: &str) -> Option<String> {
        image_url(raw, &self.config.image_hosts)
    }

    /// Drops every handle and waits for the actors to drain and exit.
    ///
    /// Cart handles cloned out of the storefront keep the actor alive until
    /// they are dropped as well.
    pub async fn shutdown(self) -> Result<(), JoinError> {
        info!("Shutting down storefront...");
        let Self {
            cart,
            checkout,
            handles,
            ..
        } = self;
        drop(cart);
        drop(checkout);

        for handle in handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Actor task failed");
                return Err(e);
            }
        }

        info!("Storefront shutdown complete.");
        Ok(())
    }
}
